use core::fmt;

/// Terminator written after every trace record, matching Arduino's `println`.
pub const LINE_ENDING: &str = "\r\n";

/// Distinguishes ordinary traces from error traces by their line prefix.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum Marker {
    Plain,
    Error,
}

impl Marker {
    pub const PLAIN_PREFIX: &'static str = "    ";
    pub const ERROR_PREFIX: &'static str = "******* ERROR: ";

    pub const fn prefix(self) -> &'static str {
        match self {
            Marker::Plain => Self::PLAIN_PREFIX,
            Marker::Error => Self::ERROR_PREFIX,
        }
    }
}

/// Where a trace was emitted from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Location {
    pub file: &'static str,
    pub line: u32,
    pub function: &'static str,
}

impl Location {
    pub const fn new(file: &'static str, line: u32, function: &'static str) -> Self {
        Location {
            file,
            line,
            function,
        }
    }
}

/// What follows the function name on a trace line.
#[derive(Clone, Copy)]
pub enum Payload<'a> {
    /// Nothing, the line ends with the function name.
    Here,
    /// A formatted message.
    Message(fmt::Arguments<'a>),
    /// A label immediately followed by a rendered value.
    Labeled {
        label: &'a str,
        value: Option<&'a dyn fmt::Display>,
    },
}

impl fmt::Debug for Payload<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Payload::Here => f.write_str("Here"),
            Payload::Message(args) => f.debug_tuple("Message").field(args).finish(),
            Payload::Labeled { label, .. } => f
                .debug_struct("Labeled")
                .field("label", label)
                .finish_non_exhaustive(),
        }
    }
}

/// One trace line, built at the call site and rendered straight to the port.
#[derive(Clone, Copy, Debug)]
pub struct TraceRecord<'a> {
    pub marker: Marker,
    pub location: Location,
    pub payload: Payload<'a>,
}

impl<'a> TraceRecord<'a> {
    pub fn here(marker: Marker, location: Location) -> Self {
        TraceRecord {
            marker,
            location,
            payload: Payload::Here,
        }
    }

    /// A record carrying `message`. A message that renders to no text
    /// renders like [`TraceRecord::here`].
    pub fn message(marker: Marker, location: Location, message: fmt::Arguments<'a>) -> Self {
        let payload = if renders_empty(message) {
            Payload::Here
        } else {
            Payload::Message(message)
        };

        TraceRecord {
            marker,
            location,
            payload,
        }
    }

    /// A record carrying `label` followed by `value`. An empty label drops
    /// the value and renders like [`TraceRecord::here`].
    pub fn labeled(
        marker: Marker,
        location: Location,
        label: &'a str,
        value: Option<&'a dyn fmt::Display>,
    ) -> Self {
        let payload = if label.is_empty() {
            Payload::Here
        } else {
            Payload::Labeled { label, value }
        };

        TraceRecord {
            marker,
            location,
            payload,
        }
    }
}

/// Sink that stops at the first non-empty write.
struct EmptyCheck {
    empty: bool,
}

impl fmt::Write for EmptyCheck {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        if s.is_empty() {
            return Ok(());
        }
        self.empty = false;
        Err(fmt::Error)
    }
}

fn renders_empty(args: fmt::Arguments<'_>) -> bool {
    if let Some(s) = args.as_str() {
        return s.is_empty();
    }

    let mut check = EmptyCheck { empty: true };
    let _ = fmt::Write::write_fmt(&mut check, args);
    check.empty
}

/// Renders the record without [`LINE_ENDING`].
impl fmt::Display for TraceRecord<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Location {
            file,
            line,
            function,
        } = self.location;

        write!(f, "{}{}:{}: {}", self.marker.prefix(), file, line, function)?;

        match self.payload {
            Payload::Here => Ok(()),
            Payload::Message(args) => write!(f, ": {}", args),
            Payload::Labeled { label, value } => {
                write!(f, ": {}", label)?;
                if let Some(value) = value {
                    write!(f, "{}", value)?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const LOOP: Location = Location::new("main.c", 42, "loop");

    #[test]
    fn here_prints_function_only() {
        let rec = TraceRecord::here(Marker::Plain, LOOP);
        assert_eq!(rec.to_string(), "    main.c:42: loop");
    }

    #[test]
    fn labeled_value_is_concatenated() {
        let x = 7;
        let rec = TraceRecord::labeled(Marker::Plain, LOOP, "x = ", Some(&x));
        assert_eq!(rec.to_string(), "    main.c:42: loop: x = 7");
    }

    #[test]
    fn empty_label_ignores_value() {
        let x = 7;
        let rec = TraceRecord::labeled(Marker::Plain, LOOP, "", Some(&x));
        assert_eq!(rec.to_string(), "    main.c:42: loop");
    }

    #[test]
    fn label_without_value() {
        let rec = TraceRecord::labeled(Marker::Plain, LOOP, "checkpoint", None);
        assert_eq!(rec.to_string(), "    main.c:42: loop: checkpoint");
    }

    #[test]
    fn error_marker_prefix() {
        let rec = TraceRecord::here(Marker::Error, LOOP);
        assert_eq!(rec.to_string(), "******* ERROR: main.c:42: loop");

        let x = 7;
        let rec = TraceRecord::labeled(Marker::Error, LOOP, "x = ", Some(&x));
        assert_eq!(rec.to_string(), "******* ERROR: main.c:42: loop: x = 7");
    }

    #[test]
    fn messages() {
        let n = 3;
        let rendered = TraceRecord::message(Marker::Plain, LOOP, format_args!("retry {}", n))
            .to_string();
        assert_eq!(rendered, "    main.c:42: loop: retry 3");

        let rendered =
            TraceRecord::message(Marker::Error, LOOP, format_args!("sensor lost")).to_string();
        assert_eq!(rendered, "******* ERROR: main.c:42: loop: sensor lost");
    }

    #[test]
    fn empty_static_message_is_here() {
        assert!(matches!(
            TraceRecord::message(Marker::Plain, LOOP, format_args!("")).payload,
            Payload::Here
        ));
        assert_eq!(
            TraceRecord::message(Marker::Plain, LOOP, format_args!("")).to_string(),
            "    main.c:42: loop"
        );
    }

    #[test]
    fn message_empty_at_runtime_is_here() {
        let empty = String::new();
        assert!(matches!(
            TraceRecord::message(Marker::Plain, LOOP, format_args!("{}", empty)).payload,
            Payload::Here
        ));
        assert_eq!(
            TraceRecord::message(Marker::Error, LOOP, format_args!("{}{}", empty, "")).to_string(),
            "******* ERROR: main.c:42: loop"
        );

        let word = "up";
        assert_eq!(
            TraceRecord::message(Marker::Plain, LOOP, format_args!("{}", word)).to_string(),
            "    main.c:42: loop: up"
        );
    }
}
