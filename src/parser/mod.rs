//! Block scanning and comment-marker lookup.
//!
//! `StyleRegistry` maps file extensions to the line-comment marker used by that
//! language; `scan` turns a file's lines into regions using that marker.
//!
//! Invariants:
//!     - Every extension maps to exactly one marker
//!     - Extensions are stored lowercase without the leading dot ("ts" not ".ts")

pub mod markers;
mod scanner;

use crate::config::Config;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

pub use scanner::scan;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScanError {
    #[error("line {line}: DEBUG START inside the block opened at line {open_line}")]
    MalformedNesting { line: usize, open_line: usize },
    #[error("line {line}: DEBUG END without a matching DEBUG START")]
    UnmatchedEnd { line: usize },
    #[error("line {line}: DEBUG START is never closed")]
    UnterminatedBlock { line: usize },
}

impl ScanError {
    /// Line of the offending marker.
    pub fn line(&self) -> usize {
        match self {
            ScanError::MalformedNesting { line, .. }
            | ScanError::UnmatchedEnd { line }
            | ScanError::UnterminatedBlock { line } => *line,
        }
    }
}

/// The line-comment marker of one language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentStyle {
    marker: String,
}

impl CommentStyle {
    pub fn new(marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
        }
    }

    pub fn marker(&self) -> &str {
        &self.marker
    }
}

const SLASH_EXTENSIONS: &[&str] = &[
    "ts", "tsx", "js", "jsx", "mjs", "cjs", "rs", "go", "c", "h", "cc", "cpp", "hpp", "cs", "java",
    "kt", "kts", "swift", "scala", "dart", "php",
];
const HASH_EXTENSIONS: &[&str] = &[
    "py", "rb", "sh", "bash", "zsh", "pl", "r", "yaml", "yml", "toml",
];
const DASH_EXTENSIONS: &[&str] = &["lua", "sql", "hs"];

fn normalize_ext(ext: &str) -> String {
    ext.trim().trim_start_matches('.').to_ascii_lowercase()
}

/// Extension → comment style lookup.
#[derive(Debug, Clone)]
pub struct StyleRegistry {
    styles: HashMap<String, CommentStyle>,
}

impl StyleRegistry {
    /// Registry with the built-in marker table.
    pub fn new() -> Self {
        let mut styles = HashMap::new();
        for (exts, marker) in [
            (SLASH_EXTENSIONS, "//"),
            (HASH_EXTENSIONS, "#"),
            (DASH_EXTENSIONS, "--"),
        ] {
            for ext in exts {
                styles.insert(ext.to_string(), CommentStyle::new(marker));
            }
        }
        Self { styles }
    }

    /// Built-ins plus `[markers]` from the config, restricted to `extensions`
    /// (or to the config's `extensions` when none are given).
    pub fn configured(config: &Config, extensions: &[String]) -> Self {
        let mut registry = Self::new();

        for (ext, marker) in &config.markers {
            let marker = marker.trim();
            if marker.is_empty() {
                tracing::warn!(extension = %ext, "ignoring empty comment marker");
                continue;
            }
            registry.insert(ext, CommentStyle::new(marker));
        }

        let allowed = if extensions.is_empty() {
            config.extensions.as_slice()
        } else {
            extensions
        };
        if !allowed.is_empty() {
            registry.restrict(allowed);
        }

        registry
    }

    pub fn insert(&mut self, ext: &str, style: CommentStyle) {
        self.styles.insert(normalize_ext(ext), style);
    }

    /// Keep only the given extensions.
    pub fn restrict(&mut self, extensions: &[String]) {
        let keep: Vec<String> = extensions.iter().map(|e| normalize_ext(e)).collect();
        for ext in &keep {
            if !self.styles.contains_key(ext) {
                tracing::warn!(extension = %ext, "no comment marker known for extension");
            }
        }
        self.styles.retain(|ext, _| keep.contains(ext));
    }

    /// Get the comment style for a file path based on its extension
    pub fn style_for(&self, file_path: &Path) -> Option<&CommentStyle> {
        let ext = file_path.extension()?.to_str()?;
        self.styles.get(&normalize_ext(ext))
    }

    pub fn is_supported(&self, file_path: &Path) -> bool {
        self.style_for(file_path).is_some()
    }

    pub fn supported_extensions(&self) -> Vec<&str> {
        self.styles.keys().map(|s| s.as_str()).collect()
    }
}

impl Default for StyleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_builtin_markers() {
        let registry = StyleRegistry::new();
        let marker = |p: &str| registry.style_for(Path::new(p)).map(|s| s.marker().to_string());

        assert_eq!(marker("app.ts").as_deref(), Some("//"));
        assert_eq!(marker("src/main.rs").as_deref(), Some("//"));
        assert_eq!(marker("tool.py").as_deref(), Some("#"));
        assert_eq!(marker("query.sql").as_deref(), Some("--"));
        assert_eq!(marker("APP.TS").as_deref(), Some("//"));
        assert!(marker("README.md").is_none());
        assert!(marker("Makefile").is_none());
    }

    #[test]
    fn test_configured_overrides_and_restricts() {
        let config = Config {
            markers: BTreeMap::from([
                ("vue".to_string(), "//".to_string()),
                (".ini".to_string(), ";".to_string()),
                ("bad".to_string(), "  ".to_string()),
            ]),
            ..Default::default()
        };
        let registry = StyleRegistry::configured(&config, &[]);
        assert!(registry.is_supported(Path::new("App.vue")));
        assert_eq!(
            registry.style_for(Path::new("setup.ini")).unwrap().marker(),
            ";"
        );
        assert!(!registry.is_supported(Path::new("x.bad")));

        let registry = StyleRegistry::configured(&config, &["ts".to_string(), ".ini".to_string()]);
        let mut exts = registry.supported_extensions();
        exts.sort();
        assert_eq!(exts, vec!["ini", "ts"]);
    }

    #[test]
    fn test_config_extensions_used_when_cli_empty() {
        let config = Config {
            extensions: vec!["py".to_string()],
            ..Default::default()
        };
        let registry = StyleRegistry::configured(&config, &[]);
        assert!(registry.is_supported(Path::new("a.py")));
        assert!(!registry.is_supported(Path::new("a.ts")));
    }

    #[test]
    fn test_scan_error_line() {
        assert_eq!(
            ScanError::MalformedNesting {
                line: 7,
                open_line: 2
            }
            .line(),
            7
        );
        assert_eq!(
            ScanError::UnmatchedEnd { line: 4 }.to_string(),
            "line 4: DEBUG END without a matching DEBUG START"
        );
    }
}
