//! jextract command lines.
//!
//! jextract is treated as an opaque command line tool. This module only knows
//! how to spell its arguments: [`GenerateBindings`] for producing bindings
//! from a header and [`DumpIncludes`] for writing the symbols a header
//! declares into an arg file. Flags that differ between jextract releases are
//! chosen by the [`policy`] table from the version of the installation that
//! will run them.
//!
//! ```rust
//! use jextract_store::generator::{GenerateBindings, GeneratorArgs, IncludeKind};
//!
//! let mut bindings = GenerateBindings::new("include/bass.h", "build/generated");
//! bindings.target_package = Some("com.un4seen.bass".into());
//! bindings.include(IncludeKind::Function, "BASS_Init");
//! bindings.use_system_load_library = true;
//!
//! let args: Vec<String> = bindings
//!     .args(22)
//!     .iter()
//!     .map(|a| a.to_string_lossy().into_owned())
//!     .collect();
//! assert!(args.contains(&"--use-system-load-library".to_string()));
//! assert_eq!(args.last().map(String::as_str), Some("include/bass.h"));
//! ```

pub mod policy;

pub use policy::{loader_option, LoaderOption, FLAG_POLICY};

use std::collections::{BTreeMap, BTreeSet};
use std::ffi::OsString;
use std::path::PathBuf;

/// Anything that can be turned into jextract arguments for a given version.
pub trait GeneratorArgs {
    /// Arguments for a jextract of major version `version`.
    fn args(&self, version: u32) -> Vec<OsString>;
}

/// Symbol categories that can be whitelisted with `--include-<kind>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum IncludeKind {
    Function,
    Constant,
    Struct,
    Union,
    Typedef,
    Var,
}

impl IncludeKind {
    pub const ALL: [IncludeKind; 6] = [
        Self::Function,
        Self::Constant,
        Self::Struct,
        Self::Union,
        Self::Typedef,
        Self::Var,
    ];

    /// The jextract flag for this category.
    pub fn flag(&self) -> &'static str {
        match self {
            Self::Function => "--include-function",
            Self::Constant => "--include-constant",
            Self::Struct => "--include-struct",
            Self::Union => "--include-union",
            Self::Typedef => "--include-typedef",
            Self::Var => "--include-var",
        }
    }
}

/// Arguments for generating bindings from a library header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerateBindings {
    /// The header file to generate bindings for.
    pub header: PathBuf,
    /// Directory the generated sources are written to.
    pub output: PathBuf,
    /// Directories appended to the include search path.
    pub includes: Vec<PathBuf>,
    /// Package of the generated classes, `unnamed` if missing.
    pub target_package: Option<String>,
    /// Name of the generated header class, derived from the header if missing.
    pub header_class_name: Option<String>,
    /// Macros in `name=value` or `name` form.
    pub macros: Vec<String>,
    /// Symbols to include, grouped by category.
    pub whitelist: BTreeMap<IncludeKind, BTreeSet<String>>,
    /// Libraries the generated header class loads.
    pub libraries: Vec<String>,
    /// Load libraries through the system library loader (jextract 22 and newer).
    pub use_system_load_library: bool,
    /// Emit source files instead of class files (jextract 21 and older,
    /// including releases before 19).
    pub generate_source_files: bool,
    /// An arg file, typically produced by [`DumpIncludes`].
    pub arg_file: Option<PathBuf>,
}

impl GenerateBindings {
    pub fn new(header: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            header: header.into(),
            output: output.into(),
            ..Self::default()
        }
    }

    /// Whitelist a symbol of the given category.
    pub fn include(&mut self, kind: IncludeKind, symbol: impl Into<String>) -> &mut Self {
        self.whitelist.entry(kind).or_default().insert(symbol.into());
        self
    }
}

impl GeneratorArgs for GenerateBindings {
    fn args(&self, version: u32) -> Vec<OsString> {
        let mut args: Vec<OsString> = Vec::new();
        push_includes(&mut args, &self.includes);
        args.push("--output".into());
        args.push(self.output.clone().into());
        if let Some(ref package) = self.target_package {
            args.push("-t".into());
            args.push(package.into());
        }
        if let Some(ref name) = self.header_class_name {
            args.push("--header-class-name".into());
            args.push(name.into());
        }
        for definition in &self.macros {
            args.push("-D".into());
            args.push(definition.into());
        }
        for (kind, symbols) in &self.whitelist {
            for symbol in symbols {
                args.push(kind.flag().into());
                args.push(symbol.into());
            }
        }
        for library in &self.libraries {
            args.push("-l".into());
            args.push(library.into());
        }
        match loader_option(version) {
            Some(option @ LoaderOption::SourceFiles) if self.generate_source_files => {
                args.push(option.flag().into());
            }
            Some(option @ LoaderOption::SystemLoadLibrary) if self.use_system_load_library => {
                args.push(option.flag().into());
            }
            _ => {}
        }
        if let Some(ref arg_file) = self.arg_file {
            let mut arg = OsString::from("@");
            arg.push(arg_file);
            args.push(arg);
        }
        args.push(self.header.clone().into());
        args
    }
}

/// Arguments for dumping every symbol a header declares into an arg file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DumpIncludes {
    /// The header file to inspect.
    pub header: PathBuf,
    /// Where the arg file is written.
    pub arg_file: PathBuf,
    /// Directories appended to the include search path.
    pub includes: Vec<PathBuf>,
}

impl DumpIncludes {
    pub fn new(header: impl Into<PathBuf>, arg_file: impl Into<PathBuf>) -> Self {
        Self {
            header: header.into(),
            arg_file: arg_file.into(),
            includes: Vec::new(),
        }
    }
}

impl GeneratorArgs for DumpIncludes {
    fn args(&self, _version: u32) -> Vec<OsString> {
        let mut args: Vec<OsString> = Vec::new();
        push_includes(&mut args, &self.includes);
        args.push("--dump-includes".into());
        args.push(self.arg_file.clone().into());
        args.push(self.header.clone().into());
        args
    }
}

fn push_includes(args: &mut Vec<OsString>, includes: &[PathBuf]) {
    for dir in includes {
        args.push("-I".into());
        args.push(dir.clone().into());
    }
}
