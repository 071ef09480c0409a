//! Build-time configuration.
//!
//! Cargo features select what is compiled in; `SERIALTRACE_BAUD` in the build
//! environment overrides the default line speed.

use serialtrace_core::PathMode;

include!(concat!(env!("OUT_DIR"), "/config.rs"));

/// `false` when the `enable` feature is off and every call-site macro is a no-op.
pub const ENABLED: bool = cfg!(feature = "enable");

/// Trimmed file names go to the `.serialtrace_strings` section.
pub const PROGMEM: bool = cfg!(feature = "progmem");

pub const PATH_MODE: PathMode = PathMode::CONFIGURED;

pub const LITERAL_SECTION_NAME: &str = serialtrace_core::LITERAL_SECTION_NAME;

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn section_name_matches_placement() {
        let attr = format!("#[link_section = \"{}\"]", LITERAL_SECTION_NAME);
        assert!(include_str!("macros.rs").contains(&attr));
        assert!(include_str!("../serialtrace_linker.x.in").contains(LITERAL_SECTION_NAME));
    }

    #[test]
    fn flags_follow_features() {
        assert_eq!(ENABLED, cfg!(feature = "enable"));
        assert_eq!(PROGMEM, cfg!(feature = "progmem"));
        assert!(DEFAULT_BAUD > 0);
    }
}
