//! Flat `key=value` properties documents.
//!
//! Distribution data is stored in the classic properties format: one entry per
//! line, `#` or `!` comments, `=`, `:` or whitespace as separator, and a
//! trailing backslash to continue a value on the next line. A [`Properties`]
//! can be layered on top of a parent so that lookups fall through to the
//! parent when a key is absent.
//!
//! ```rust
//! use jextract_store::distribution::Properties;
//! use std::sync::Arc;
//!
//! let defaults = Arc::new(Properties::parse("a = 1\nb = 2\n"));
//! let layered = Properties::parse("b = 3\n").with_defaults(defaults);
//! assert_eq!(layered.get("a"), Some("1"));
//! assert_eq!(layered.get("b"), Some("3"));
//! ```

use crate::error::{Error, Result};

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock};
use tracing::debug;

/// A parsed properties document, optionally layered over defaults.
#[derive(Debug, Clone, Default)]
pub struct Properties {
    entries: HashMap<String, String>,
    defaults: Option<Arc<Properties>>,
}

impl Properties {
    /// Parse a properties document. Malformed lines are never an error: a line
    /// without a separator is a key with an empty value.
    pub fn parse(text: &str) -> Self {
        let mut entries = HashMap::new();
        for line in logical_lines(text) {
            let (key, value) = split_entry(&line);
            if !key.is_empty() {
                entries.insert(key, value);
            }
        }
        Self {
            entries,
            defaults: None,
        }
    }

    /// Layer this document on top of `defaults`.
    pub fn with_defaults(mut self, defaults: Arc<Properties>) -> Self {
        self.defaults = Some(defaults);
        self
    }

    /// Look up `key` here, then in the defaults.
    pub fn get(&self, key: &str) -> Option<&str> {
        match self.entries.get(key) {
            Some(value) => Some(value.as_str()),
            None => self.defaults.as_ref().and_then(|d| d.get(key)),
        }
    }

    /// Number of entries in this layer, not counting defaults.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Join continuation lines and drop blanks and comments.
fn logical_lines(text: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current: Option<String> = None;

    for raw in text.lines() {
        let trimmed = raw.trim_start();
        let line = match current.take() {
            Some(mut pending) => {
                pending.push_str(trimmed);
                pending
            }
            None => {
                if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('!') {
                    continue;
                }
                trimmed.to_string()
            }
        };

        let trailing = line.chars().rev().take_while(|c| *c == '\\').count();
        if trailing % 2 == 1 {
            let mut pending = line;
            pending.pop();
            current = Some(pending);
        } else {
            lines.push(line);
        }
    }
    if let Some(pending) = current {
        lines.push(pending);
    }
    lines
}

/// Split a logical line at its first unescaped separator and unescape both halves.
fn split_entry(line: &str) -> (String, String) {
    let chars: Vec<char> = line.chars().collect();
    let mut i = 0;
    let mut key_end = chars.len();
    while i < chars.len() {
        match chars[i] {
            '\\' => i += 2,
            '=' | ':' => {
                key_end = i;
                break;
            }
            c if c.is_whitespace() => {
                key_end = i;
                break;
            }
            _ => i += 1,
        }
    }
    let key_end = key_end.min(chars.len());

    let mut j = key_end;
    while j < chars.len() && chars[j].is_whitespace() {
        j += 1;
    }
    if j < chars.len() && (chars[j] == '=' || chars[j] == ':') {
        j += 1;
    }
    while j < chars.len() && chars[j].is_whitespace() {
        j += 1;
    }

    let key: String = chars[..key_end].iter().collect();
    let value: String = chars[j..].iter().collect();
    (unescape(&key), unescape(value.trim_end()))
}

fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('f') => out.push('\u{c}'),
            Some('u') => {
                let code: String = chars.by_ref().take(4).collect();
                match u32::from_str_radix(&code, 16).ok().and_then(char::from_u32) {
                    Some(decoded) => out.push(decoded),
                    None => {
                        out.push_str("\\u");
                        out.push_str(&code);
                    }
                }
            }
            Some(other) => out.push(other),
            None => {}
        }
    }
    out
}

/// Memoized properties, parsed at most once per source for the cache's lifetime.
///
/// The bundled defaults are parsed on first use. Every override file is
/// parsed once per distinct path and layered over the defaults.
#[derive(Debug)]
pub struct PropertiesCache {
    bundled: &'static str,
    defaults: OnceLock<Arc<Properties>>,
    files: Mutex<HashMap<PathBuf, Arc<Properties>>>,
}

impl PropertiesCache {
    pub fn new(bundled: &'static str) -> Self {
        Self {
            bundled,
            defaults: OnceLock::new(),
            files: Mutex::new(HashMap::new()),
        }
    }

    /// The bundled default data.
    pub fn defaults(&self) -> Arc<Properties> {
        self.defaults
            .get_or_init(|| Arc::new(Properties::parse(self.bundled)))
            .clone()
    }

    /// The data for an optional override file.
    ///
    /// `None`, or a path that does not exist, yields the defaults alone.
    pub fn properties(&self, path: Option<&Path>) -> Result<Arc<Properties>> {
        let Some(path) = path else {
            return Ok(self.defaults());
        };
        if !path.exists() {
            debug!("Distribution override {:?} does not exist, using defaults", path);
            return Ok(self.defaults());
        }

        if let Some(cached) = self.lock()?.get(path) {
            return Ok(cached.clone());
        }

        // Read without the lock held; if another caller got there first its
        // result is kept so every lookup of a path sees the same data.
        debug!("Loading distribution override {:?}", path);
        let text = std::fs::read_to_string(path)?;
        let parsed = Arc::new(Properties::parse(&text).with_defaults(self.defaults()));
        Ok(self
            .lock()?
            .entry(path.to_path_buf())
            .or_insert(parsed)
            .clone())
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<PathBuf, Arc<Properties>>>> {
        self.files
            .lock()
            .map_err(|_| Error::Internal("properties cache lock poisoned".into()))
    }
}
