use serde::Serialize;
use serialtrace_core::record::Marker;
use serialtrace_core::trace_line::TraceLine;
use tracing::warn;

/// Longest line buffered before it is cut and reported as text. Guards
/// against a wrong baud rate turning the whole capture into one line.
pub const MAX_LINE_LEN: usize = 4096;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StreamItem {
    Trace(TraceLine),
    /// Any other output the program printed on the same port.
    Text { text: String },
}

impl StreamItem {
    pub fn as_trace(&self) -> Option<&TraceLine> {
        match self {
            StreamItem::Trace(tl) => Some(tl),
            StreamItem::Text { .. } => None,
        }
    }
}

/// Splits a raw serial byte stream into lines and classifies them.
///
/// Data may arrive in arbitrary chunks; a partial line is kept until its
/// terminator shows up.
#[derive(Default)]
pub struct StreamParser {
    line: Vec<u8>,
}

impl StreamParser {
    pub fn new() -> Self {
        StreamParser { line: Vec::new() }
    }

    pub fn push_and_parse<'b>(
        &'b mut self,
        data: &'b [u8],
    ) -> impl Iterator<Item = StreamItem> + 'b {
        StreamParserIter {
            inner: self,
            incoming: data,
        }
    }

    /// Flushes a trailing line that never got its terminator.
    pub fn finish(&mut self) -> Option<StreamItem> {
        self.take_line()
    }

    fn take_line(&mut self) -> Option<StreamItem> {
        if self.line.last() == Some(&b'\r') {
            self.line.pop();
        }
        if self.line.is_empty() {
            return None;
        }

        let text = String::from_utf8_lossy(&self.line).into_owned();
        self.line.clear();

        Some(classify(text))
    }

    /// Emits an overlong line up to its last complete UTF-8 character and
    /// keeps the rest buffered.
    fn cut_line(&mut self) -> StreamItem {
        let rest = self.line.split_off(utf8_cut(&self.line));
        let text = String::from_utf8_lossy(&self.line).into_owned();
        self.line = rest;

        classify(text)
    }
}

/// Length of `bytes` without a trailing incomplete UTF-8 sequence.
fn utf8_cut(bytes: &[u8]) -> usize {
    let len = bytes.len();

    for back in 1..=len.min(4) {
        let i = len - back;
        let width = match bytes[i] {
            0x80..=0xBF => continue,
            0xC0..=0xDF => 2,
            0xE0..=0xEF => 3,
            0xF0..=0xF7 => 4,
            _ => 1,
        };
        return if back < width && i > 0 { i } else { len };
    }

    len
}

fn classify(text: String) -> StreamItem {
    let looks_like_trace =
        text.starts_with(Marker::ERROR_PREFIX) || text.starts_with(Marker::PLAIN_PREFIX);

    if looks_like_trace {
        match TraceLine::parse(&text) {
            Ok(tl) => return StreamItem::Trace(tl),
            Err(e) => warn!("Treating malformed trace line {:?} as text: {:#}", text, e),
        }
    }

    StreamItem::Text { text }
}

pub struct StreamParserIter<'b> {
    inner: &'b mut StreamParser,
    incoming: &'b [u8],
}

impl<'b> Iterator for StreamParserIter<'b> {
    type Item = StreamItem;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((&b, rest)) = self.incoming.split_first() {
            self.incoming = rest;

            if b == b'\n' {
                if let Some(item) = self.inner.take_line() {
                    return Some(item);
                }
                continue;
            }

            self.inner.line.push(b);
            if self.inner.line.len() >= MAX_LINE_LEN {
                warn!("Line exceeds {} bytes, cutting it", MAX_LINE_LEN);
                return Some(self.inner.cut_line());
            }
        }

        None
    }
}
