//! Platform detection.
//!
//! Maps raw operating system and architecture strings onto the closed set of
//! platforms jextract is distributed for. Matching is case-insensitive and by
//! substring, so verbose values like `"Windows 11"` or `"Mac OS X"` resolve the
//! same way as their short forms. Unknown values never fail: the operating
//! system falls back to Linux and the architecture to x64.
//!
//! ```rust
//! use jextract_store::platform::{Architecture, OperatingSystem, Platform};
//!
//! let platform = Platform::identify("Mac OS X", "aarch64");
//! assert_eq!(platform.operating_system, OperatingSystem::Mac);
//! assert_eq!(platform.architecture, Architecture::Aarch64);
//! ```

use std::fmt;

/// Operating systems jextract is published for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatingSystem {
    /// Microsoft Windows.
    Windows,
    /// Apple macOS.
    Mac,
    /// Linux, and the fallback for anything unrecognized.
    Linux,
}

impl OperatingSystem {
    /// Find the operating system named by `value`, defaulting to Linux.
    pub fn identify(value: &str) -> Self {
        let value = value.to_lowercase();
        if value.contains("windows") {
            Self::Windows
        } else if value.contains("mac") {
            Self::Mac
        } else {
            Self::Linux
        }
    }

    /// Lower-case name used in distribution data keys.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Windows => "windows",
            Self::Mac => "mac",
            Self::Linux => "linux",
        }
    }
}

/// Processor architectures jextract is published for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Architecture {
    /// 64-bit ARM.
    Aarch64,
    /// 64-bit x86, and the fallback for anything unrecognized.
    X64,
}

impl Architecture {
    /// Find the architecture named by `value`, defaulting to x64.
    pub fn identify(value: &str) -> Self {
        if value.to_lowercase().contains("aarch64") {
            Self::Aarch64
        } else {
            Self::X64
        }
    }

    /// Lower-case name used in distribution data keys.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Aarch64 => "aarch64",
            Self::X64 => "x64",
        }
    }
}

/// A platform where jextract can be installed and run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Platform {
    pub operating_system: OperatingSystem,
    pub architecture: Architecture,
}

impl Platform {
    pub fn new(operating_system: OperatingSystem, architecture: Architecture) -> Self {
        Self {
            operating_system,
            architecture,
        }
    }

    /// Identify a platform from raw OS and architecture strings.
    pub fn identify(os: &str, arch: &str) -> Self {
        Self::new(OperatingSystem::identify(os), Architecture::identify(arch))
    }

    /// The platform this process runs on.
    pub fn current() -> Self {
        Self::identify(std::env::consts::OS, std::env::consts::ARCH)
    }

    pub fn is_windows(&self) -> bool {
        self.operating_system == OperatingSystem::Windows
    }

    pub fn is_mac(&self) -> bool {
        self.operating_system == OperatingSystem::Mac
    }

    pub fn is_linux(&self) -> bool {
        self.operating_system == OperatingSystem::Linux
    }
}

impl Default for Platform {
    fn default() -> Self {
        Self::current()
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}",
            self.operating_system.as_str(),
            self.architecture.as_str()
        )
    }
}
