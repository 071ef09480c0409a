use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::record::Marker;

/// Owned form of a trace line as received on the host.
#[derive(PartialEq, Eq, Debug, Clone, Hash, Serialize, Deserialize)]
pub struct TraceLine {
    pub marker: Marker,
    pub file: String,
    pub line: u32,
    pub function: String,
    pub message: Option<String>,
}

impl TraceLine {
    /// Parses one line of serial output. The terminator is optional.
    pub fn parse(text: &str) -> Result<Self> {
        let text = text.trim_end_matches(['\r', '\n']);

        let (marker, rest) = if let Some(rest) = text.strip_prefix(Marker::ERROR_PREFIX) {
            (Marker::Error, rest)
        } else if let Some(rest) = text.strip_prefix(Marker::PLAIN_PREFIX) {
            (Marker::Plain, rest)
        } else {
            bail!("Line does not start with a trace marker");
        };

        let (file, line, rest) =
            split_location(rest).context("Trace line has no `file:line: ` location")?;

        let (function, message) = match split_message(rest) {
            Some((function, message)) => (function, Some(message.to_owned())),
            None => (rest, None),
        };

        if function.is_empty() {
            bail!("Trace line has an empty function name");
        }

        Ok(TraceLine {
            marker,
            file: file.to_owned(),
            line,
            function: function.to_owned(),
            message,
        })
    }

    pub fn is_error(&self) -> bool {
        self.marker == Marker::Error
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).expect("Internal error during TraceLine serialization")
    }

    pub fn from_json<T>(s: T) -> Result<Self>
    where
        T: AsRef<str>,
    {
        serde_json::from_str::<Self>(s.as_ref()).context("Malformed JSON for TraceLine")
    }
}

/// Renders the line exactly as the device printed it, without the terminator.
impl fmt::Display for TraceLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}:{}: {}",
            self.marker.prefix(),
            self.file,
            self.line,
            self.function
        )?;
        if let Some(message) = &self.message {
            write!(f, ": {}", message)?;
        }
        Ok(())
    }
}

/// Finds the first `:<digits>: ` and splits around it. File names may
/// themselves contain colons (drive letters), so earlier colons are skipped.
fn split_location(s: &str) -> Option<(&str, u32, &str)> {
    let bytes = s.as_bytes();

    for (colon, _) in s.match_indices(':') {
        let digits_start = colon + 1;
        let digits_len = bytes[digits_start..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count();
        if digits_len == 0 {
            continue;
        }

        let digits_end = digits_start + digits_len;
        if let Some(rest) = s[digits_end..].strip_prefix(": ") {
            let line = s[digits_start..digits_end].parse().ok()?;
            return Some((&s[..colon], line, rest));
        }
    }

    None
}

/// Splits `function: message` at the first `": "` outside of brackets, so
/// signatures like `fn f(x: u32)` stay intact.
fn split_message(s: &str) -> Option<(&str, &str)> {
    let bytes = s.as_bytes();
    let mut depth = 0usize;

    for (i, &b) in bytes.iter().enumerate() {
        match b {
            b'(' | b'[' | b'<' | b'{' => depth += 1,
            b'>' if i > 0 && bytes[i - 1] == b'-' => {}
            b')' | b']' | b'>' | b'}' => depth = depth.saturating_sub(1),
            b':' if depth == 0 && bytes.get(i + 1) == Some(&b' ') => {
                return Some((&s[..i], &s[i + 2..]));
            }
            _ => {}
        }
    }

    None
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parses_here_line() {
        let tl = TraceLine::parse("    main.c:42: loop\r\n").unwrap();
        assert_eq!(
            tl,
            TraceLine {
                marker: Marker::Plain,
                file: "main.c".into(),
                line: 42,
                function: "loop".into(),
                message: None,
            }
        );
    }

    #[test]
    fn parses_dump_line() {
        let tl = TraceLine::parse("    main.c:42: loop: x = 7").unwrap();
        assert_eq!(tl.function, "loop");
        assert_eq!(tl.message.as_deref(), Some("x = 7"));
        assert!(!tl.is_error());
    }

    #[test]
    fn parses_error_line() {
        let tl = TraceLine::parse("******* ERROR: main.c:42: loop: sensor lost\n").unwrap();
        assert!(tl.is_error());
        assert_eq!(tl.message.as_deref(), Some("sensor lost"));
    }

    #[test]
    fn windows_full_path() {
        let tl = TraceLine::parse("    C:\\work\\sketch\\main.cpp:7: setup").unwrap();
        assert_eq!(tl.file, "C:\\work\\sketch\\main.cpp");
        assert_eq!(tl.line, 7);
        assert_eq!(tl.function, "setup");
    }

    #[test]
    fn signature_keeps_parameter_colons() {
        let text = "    lib.rs:10: fn scale<T: Copy>(v: T, k: u8) -> T: k = 3";
        let tl = TraceLine::parse(text).unwrap();
        assert_eq!(tl.function, "fn scale<T: Copy>(v: T, k: u8) -> T");
        assert_eq!(tl.message.as_deref(), Some("k = 3"));
        assert_eq!(tl.to_string(), text);
    }

    #[test]
    fn rust_paths_are_not_split() {
        let tl = TraceLine::parse("    main.rs:5: firmware::app::poll: ready").unwrap();
        assert_eq!(tl.function, "firmware::app::poll");
        assert_eq!(tl.message.as_deref(), Some("ready"));
    }

    #[test]
    fn rejects_non_trace_text() {
        assert!(TraceLine::parse("hello world").is_err());
        assert!(TraceLine::parse("    no location here").is_err());
        assert!(TraceLine::parse("    main.c:42: ").is_err());
    }

    #[test]
    fn json_round_trip() {
        let tl = TraceLine::parse("******* ERROR: main.c:1: f: boom").unwrap();
        assert_eq!(TraceLine::from_json(tl.to_json()).unwrap(), tl);
    }
}
