//! File selection: which files a toggle run or a watch session covers.
//!
//! Directory walks go through the ignore crate (gitignore, default excluded
//! directories, user exclude globs). Watch mode also needs to decide for a
//! single path reported by the file watcher whether it belongs to the set,
//! which `FileSelector::matches` answers with the same rules.
//!
//! Invariants:
//!     - Default exclusions (node_modules, .git, etc.) are always applied
//!     - CLI --exclude patterns are combined with debug-toggle.toml exclude patterns
//!     - Only files with a known comment marker are ever selected

use crate::error::ToggleError;
use crate::parser::StyleRegistry;
use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::gitignore::Gitignore;
use ignore::overrides::OverrideBuilder;
use ignore::WalkBuilder;
use std::path::{Component, Path, PathBuf};

/// Configuration for file exclusion during directory walking
#[derive(Debug, Clone)]
pub struct ExclusionConfig {
    /// Glob patterns to exclude (from --exclude flags and the config file)
    pub patterns: Vec<String>,
    /// Whether to respect .gitignore files (default: true)
    pub respect_gitignore: bool,
}

impl Default for ExclusionConfig {
    fn default() -> Self {
        Self {
            patterns: Vec::new(),
            respect_gitignore: true,
        }
    }
}

/// Default directories that are always excluded
const DEFAULT_EXCLUDED_DIRS: &[&str] = &[
    "node_modules",
    ".git",
    "target",
    "__pycache__",
    "vendor",
    ".venv",
    "venv",
    "dist",
    "build",
    ".next",
    ".nuxt",
];

/// Build a WalkBuilder with the given exclusion configuration
pub fn build_walker(root: &Path, config: &ExclusionConfig) -> WalkBuilder {
    let mut builder = WalkBuilder::new(root);

    builder.git_ignore(config.respect_gitignore);
    builder.git_global(config.respect_gitignore);
    builder.git_exclude(config.respect_gitignore);
    // Outside a git repository .gitignore would otherwise be skipped
    builder.require_git(false);

    // Don't respect hidden files filter (we handle .git explicitly)
    builder.hidden(false);

    let mut overrides = OverrideBuilder::new(root);

    for dir in DEFAULT_EXCLUDED_DIRS {
        let _ = overrides.add(&format!("!{}/**", dir));
        let _ = overrides.add(&format!("!{}", dir));
    }

    // Override patterns are inclusive by default, so user patterns get a ! prefix
    for pattern in &config.patterns {
        let exclude_pattern = format!("!{}", pattern);
        if let Err(e) = overrides.add(&exclude_pattern) {
            tracing::warn!(pattern = %pattern, error = %e, "invalid exclude pattern");
        }
    }

    if let Ok(built) = overrides.build() {
        builder.overrides(built);
    }

    builder
}

/// Build a GlobSet from patterns for matching single paths
pub fn build_exclude_globset(patterns: &[String]) -> Option<GlobSet> {
    if patterns.is_empty() {
        return None;
    }

    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        match Glob::new(pattern) {
            Ok(glob) => {
                builder.add(glob);
            }
            Err(e) => {
                tracing::warn!(pattern = %pattern, error = %e, "invalid exclude pattern");
            }
        }
    }

    builder.build().ok()
}

/// Check if a directory name should be excluded by default
pub fn is_default_excluded_dir(name: &str) -> bool {
    DEFAULT_EXCLUDED_DIRS.contains(&name)
}

/// Resolves a target path into the files to process, and answers membership
/// questions for paths reported later by the file watcher.
#[derive(Debug, Clone)]
pub struct FileSelector {
    root: PathBuf,
    recursive: bool,
    styles: StyleRegistry,
    exclusion: ExclusionConfig,
    exclude_set: Option<GlobSet>,
    gitignore: Option<Gitignore>,
}

impl FileSelector {
    pub fn new(
        root: impl Into<PathBuf>,
        recursive: bool,
        styles: StyleRegistry,
        exclusion: ExclusionConfig,
    ) -> Self {
        let root = root.into();
        let exclude_set = build_exclude_globset(&exclusion.patterns);
        let gitignore = if exclusion.respect_gitignore && root.is_dir() {
            let (matcher, err) = Gitignore::new(root.join(".gitignore"));
            if let Some(e) = err {
                tracing::debug!(error = %e, "ignoring unreadable .gitignore");
            }
            Some(matcher)
        } else {
            None
        };

        Self {
            root,
            recursive,
            styles,
            exclusion,
            exclude_set,
            gitignore,
        }
    }

    /// The file or directory this selector covers.
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn is_recursive(&self) -> bool {
        self.recursive
    }

    pub fn styles(&self) -> &StyleRegistry {
        &self.styles
    }

    /// Resolve the root into an ordered file list.
    ///
    /// A file root passes through (it must have a known comment marker); a
    /// directory root yields its supported files, recursively if requested.
    pub fn resolve(&self) -> Result<Vec<PathBuf>, ToggleError> {
        if self.root.is_file() {
            if !self.styles.is_supported(&self.root) {
                return Err(ToggleError::UnsupportedFile(self.root.clone()));
            }
            return Ok(vec![self.root.clone()]);
        }
        if !self.root.is_dir() {
            return Err(ToggleError::NotFound(self.root.clone()));
        }
        Ok(self.collect())
    }

    fn collect(&self) -> Vec<PathBuf> {
        let mut walker = build_walker(&self.root, &self.exclusion);
        if !self.recursive {
            walker.max_depth(Some(1));
        }

        let mut files: Vec<PathBuf> = walker
            .build()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    tracing::warn!(error = %e, "skipping unreadable entry");
                    None
                }
            })
            .map(|entry| entry.into_path())
            .filter(|path| path.is_file() && self.styles.is_supported(path))
            .collect();

        // Deterministic ordering + de-dup
        files.sort();
        files.dedup();
        files
    }

    /// Whether `path` belongs to the selected file set. The file does not need
    /// to exist (deleted files are still members).
    pub fn matches(&self, path: &Path) -> bool {
        if !self.styles.is_supported(path) {
            return false;
        }
        if path == self.root {
            return true;
        }
        let Ok(relative) = path.strip_prefix(&self.root) else {
            return false;
        };

        let mut dirs = 0;
        for component in relative.parent().into_iter().flat_map(Path::components) {
            if let Component::Normal(name) = component {
                if is_default_excluded_dir(&name.to_string_lossy()) {
                    return false;
                }
                dirs += 1;
            }
        }
        if !self.recursive && dirs > 0 {
            return false;
        }

        if self
            .exclude_set
            .as_ref()
            .is_some_and(|set| set.is_match(relative))
        {
            return false;
        }

        if let Some(gitignore) = &self.gitignore {
            if gitignore
                .matched_path_or_any_parents(path, false)
                .is_ignore()
            {
                return false;
            }
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn selector(root: &Path, recursive: bool, patterns: &[&str]) -> FileSelector {
        FileSelector::new(
            root,
            recursive,
            StyleRegistry::new(),
            ExclusionConfig {
                patterns: patterns.iter().map(|p| p.to_string()).collect(),
                respect_gitignore: true,
            },
        )
    }

    fn touch(root: &Path, rel: &str) -> PathBuf {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "x\n").unwrap();
        path
    }

    #[test]
    fn test_default_excluded_dirs() {
        assert!(is_default_excluded_dir("node_modules"));
        assert!(is_default_excluded_dir(".git"));
        assert!(is_default_excluded_dir("target"));
        assert!(!is_default_excluded_dir("src"));
    }

    #[test]
    fn test_exclusion_config_default() {
        let config = ExclusionConfig::default();
        assert!(config.patterns.is_empty());
        assert!(config.respect_gitignore);
    }

    #[test]
    fn test_build_exclude_globset() {
        assert!(build_exclude_globset(&[]).is_none());

        let patterns = vec!["*.test.ts".to_string(), "docs/**".to_string()];
        let globset = build_exclude_globset(&patterns).unwrap();
        assert!(globset.is_match("foo.test.ts"));
        assert!(globset.is_match("docs/readme.md"));
        assert!(!globset.is_match("main.ts"));
    }

    #[test]
    fn test_resolve_non_recursive() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let a = touch(root, "a.ts");
        let b = touch(root, "b.py");
        touch(root, "notes.md");
        touch(root, "src/nested.ts");

        let files = selector(root, false, &[]).resolve().unwrap();
        assert_eq!(files, vec![a, b]);
    }

    #[test]
    fn test_resolve_recursive_with_exclusions() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let a = touch(root, "a.ts");
        let nested = touch(root, "src/nested.ts");
        touch(root, "node_modules/lib/index.js");
        touch(root, "generated/api.ts");
        touch(root, "ignored/skip.ts");
        fs::write(root.join(".gitignore"), "ignored/\n").unwrap();

        let files = selector(root, true, &["generated/**"]).resolve().unwrap();
        assert_eq!(files, vec![a, nested]);
    }

    #[test]
    fn test_resolve_single_file() {
        let temp_dir = TempDir::new().unwrap();
        let file = touch(temp_dir.path(), "one.ts");
        assert_eq!(selector(&file, false, &[]).resolve().unwrap(), vec![file]);

        let md = touch(temp_dir.path(), "notes.md");
        assert!(matches!(
            selector(&md, false, &[]).resolve(),
            Err(ToggleError::UnsupportedFile(_))
        ));
    }

    #[test]
    fn test_resolve_missing_root() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("nope");
        assert!(matches!(
            selector(&missing, false, &[]).resolve(),
            Err(ToggleError::NotFound(_))
        ));
    }

    #[test]
    fn test_matches() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::write(root.join(".gitignore"), "ignored/\n*.gen.ts\n").unwrap();

        let flat = selector(root, false, &[]);
        assert!(flat.matches(&root.join("new.ts")));
        assert!(!flat.matches(&root.join("src/new.ts")));
        assert!(!flat.matches(&root.join("README.md")));

        let deep = selector(root, true, &["generated/**"]);
        assert!(deep.matches(&root.join("src/new.ts")));
        assert!(!deep.matches(&root.join("generated/api.ts")));
        assert!(!deep.matches(&root.join("node_modules/x/index.js")));
        assert!(!deep.matches(&root.join("ignored/a.ts")));
        assert!(!deep.matches(&root.join("api.gen.ts")));
        assert!(!deep.matches(Path::new("/elsewhere/a.ts")));
    }

    #[test]
    fn test_matches_single_file_root() {
        let temp_dir = TempDir::new().unwrap();
        let file = touch(temp_dir.path(), "one.ts");
        let single = selector(&file, false, &[]);
        assert!(single.matches(&file));
        assert!(!single.matches(&temp_dir.path().join("two.ts")));
    }
}
