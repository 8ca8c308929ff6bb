//! Version-dependent jextract flags.

use std::ops::RangeInclusive;

/// How generated code gets at the native library. Each option is spelled
/// differently depending on the jextract release.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoaderOption {
    /// `--source`: emit Java sources instead of class files.
    SourceFiles,
    /// `--use-system-load-library`: load libraries with `System.loadLibrary`.
    SystemLoadLibrary,
}

impl LoaderOption {
    pub fn flag(&self) -> &'static str {
        match self {
            Self::SourceFiles => "--source",
            Self::SystemLoadLibrary => "--use-system-load-library",
        }
    }
}

/// Which option a jextract version understands, by inclusive version range.
///
/// The ranges cover every version; releases before 19 are treated like the
/// oldest supported one.
pub const FLAG_POLICY: &[(RangeInclusive<u32>, LoaderOption)] = &[
    (0..=21, LoaderOption::SourceFiles),
    (22..=u32::MAX, LoaderOption::SystemLoadLibrary),
];

/// The loader option supported by `version`.
pub fn loader_option(version: u32) -> Option<LoaderOption> {
    FLAG_POLICY
        .iter()
        .find(|(range, _)| range.contains(&version))
        .map(|(_, option)| *option)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_ranges() {
        assert_eq!(loader_option(0), Some(LoaderOption::SourceFiles));
        assert_eq!(loader_option(18), Some(LoaderOption::SourceFiles));
        assert_eq!(loader_option(19), Some(LoaderOption::SourceFiles));
        assert_eq!(loader_option(21), Some(LoaderOption::SourceFiles));
        assert_eq!(loader_option(22), Some(LoaderOption::SystemLoadLibrary));
        assert_eq!(loader_option(25), Some(LoaderOption::SystemLoadLibrary));
        assert_eq!(loader_option(u32::MAX), Some(LoaderOption::SystemLoadLibrary));
    }

    #[test]
    fn test_policy_covers_every_version() {
        let mut next = 0u32;
        for (range, _) in FLAG_POLICY {
            assert_eq!(*range.start(), next);
            match range.end().checked_add(1) {
                Some(end) => next = end,
                None => return,
            }
        }
        panic!("versions from {next} have no loader option");
    }
}
