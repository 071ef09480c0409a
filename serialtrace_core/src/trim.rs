//! Compile-time reduction of source paths to their last segment.
//!
//! Everything here is `const fn`, so a call site can evaluate it in a `const`
//! or `static` initializer and only the trimmed bytes end up in the binary.

use core::str;

const fn is_separator(b: u8) -> bool {
    b == b'/' || b == b'\\'
}

/// Byte offset just past the last `/` or `\` in `path`, or 0 if there is none.
pub const fn basename_start(path: &str) -> usize {
    let bytes = path.as_bytes();
    let mut i = bytes.len();

    while i > 0 {
        if is_separator(bytes[i - 1]) {
            return i;
        }
        i -= 1;
    }

    0
}

/// Everything after the last path separator of `path`.
///
/// Returns `path` itself when it contains no separator, and an empty string
/// when it ends with one.
pub const fn basename(path: &str) -> &str {
    let (_, tail) = path.as_bytes().split_at(basename_start(path));
    // SAFETY: separators are ASCII, so splitting right after one lands on a char boundary.
    unsafe { str::from_utf8_unchecked(tail) }
}

/// How file names are shown in trace lines.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PathMode {
    /// Only the final path segment.
    Basename,
    /// The path exactly as the compiler reports it.
    FullPath,
}

impl PathMode {
    /// Mode selected at build time through the `fullpath` feature.
    pub const CONFIGURED: PathMode = if cfg!(feature = "fullpath") {
        PathMode::FullPath
    } else {
        PathMode::Basename
    };

    pub const fn apply(self, path: &str) -> &str {
        match self {
            PathMode::Basename => basename(path),
            PathMode::FullPath => path,
        }
    }

    pub const fn trimmed_len(self, path: &str) -> usize {
        self.apply(path).len()
    }
}

/// Trims `path` according to [`PathMode::CONFIGURED`].
pub const fn trim(path: &str) -> &str {
    PathMode::CONFIGURED.apply(path)
}

/// Length of [`trim`]`(path)`, usable as a const generic argument.
pub const fn trimmed_len(path: &str) -> usize {
    PathMode::CONFIGURED.trimmed_len(path)
}

/// Fixed-size copy of a trimmed path.
///
/// Meant to live in a `static` initialized from `file!()`: the source literal
/// is only consumed during const evaluation, so the binary carries just `N`
/// bytes per distinct call site.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TrimmedLiteral<const N: usize> {
    buf: [u8; N],
}

impl<const N: usize> TrimmedLiteral<N> {
    /// Trims with the configured mode. `N` must be [`trimmed_len`]`(path)`,
    /// otherwise const evaluation fails.
    pub const fn new(path: &str) -> Self {
        Self::with_mode(PathMode::CONFIGURED, path)
    }

    pub const fn with_mode(mode: PathMode, path: &str) -> Self {
        let src = path.as_bytes();
        let mut buf = [0u8; N];
        let mut collected = 0;
        let mut i = src.len();

        // Walk backwards, filling the buffer from its end, until a separator
        // or the start of the literal.
        while i > 0 {
            let b = src[i - 1];
            if matches!(mode, PathMode::Basename) && is_separator(b) {
                break;
            }
            if collected == N {
                panic!("TrimmedLiteral is shorter than the trimmed path");
            }
            buf[N - 1 - collected] = b;
            collected += 1;
            i -= 1;
        }

        if collected != N {
            panic!("TrimmedLiteral is longer than the trimmed path");
        }

        TrimmedLiteral { buf }
    }

    pub const fn as_str(&self) -> &str {
        // SAFETY: the buffer is a suffix of a `&str` that starts right after
        // an ASCII separator (or at the start), so it is valid UTF-8.
        unsafe { str::from_utf8_unchecked(&self.buf) }
    }

    pub const fn len(&self) -> usize {
        N
    }

    pub const fn is_empty(&self) -> bool {
        N == 0
    }
}

impl<const N: usize> AsRef<str> for TrimmedLiteral<N> {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}
