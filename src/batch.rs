//! Batch driver: apply one request to a list of files.
//!
//! Files are independent, so they are processed in parallel; the report keeps
//! the input order. A failing file never stops the others.

use crate::applier::{apply_to_file, FileOutcome, FileStatus};
use crate::error::ToggleError;
use crate::parser::StyleRegistry;
use crate::types::ToggleRequest;
use rayon::prelude::*;
use std::path::PathBuf;

#[derive(Debug)]
pub struct BatchEntry {
    pub path: PathBuf,
    pub result: Result<FileOutcome, ToggleError>,
}

#[derive(Debug, Default)]
pub struct BatchReport {
    pub entries: Vec<BatchEntry>,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.entries.len()
    }

    pub fn changed(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| matches!(&e.result, Ok(outcome) if outcome.changed()))
            .count()
    }

    pub fn unchanged(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| matches!(&e.result, Ok(outcome) if outcome.status == FileStatus::Unchanged))
            .count()
    }

    pub fn failed(&self) -> usize {
        self.entries.iter().filter(|e| e.result.is_err()).count()
    }

    pub fn succeeded(&self) -> usize {
        self.total() - self.failed()
    }

    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }
}

pub fn run_batch(
    files: &[PathBuf],
    styles: &StyleRegistry,
    request: &ToggleRequest,
    dry_run: bool,
) -> BatchReport {
    let entries = files
        .par_iter()
        .map(|path| {
            let result = match styles.style_for(path) {
                Some(style) => apply_to_file(path, style, request, dry_run),
                None => Err(ToggleError::UnsupportedFile(path.clone())),
            };
            BatchEntry {
                path: path.clone(),
                result,
            }
        })
        .collect();

    BatchReport { entries }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Mode;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_batch_continues_after_error_and_keeps_order() {
        let temp_dir = TempDir::new().unwrap();
        let mut files = Vec::new();
        for (name, content) in [
            ("a.ts", "// DEBUG START\nx();\n// DEBUG END\n"),
            ("b.ts", "// DEBUG START\nunterminated();\n"),
            ("c.py", "# DEBUG START\nprint(1)\n# DEBUG END\n"),
            ("d.ts", "const plain = 1;\n"),
            ("e.md", "# notes\n"),
        ] {
            let path = temp_dir.path().join(name);
            fs::write(&path, content).unwrap();
            files.push(path);
        }

        let report = run_batch(
            &files,
            &StyleRegistry::new(),
            &ToggleRequest::all(Mode::Comment),
            false,
        );

        let order: Vec<_> = report.entries.iter().map(|e| e.path.clone()).collect();
        assert_eq!(order, files);
        assert_eq!(report.total(), 5);
        assert_eq!(report.changed(), 2);
        assert_eq!(report.unchanged(), 1);
        assert_eq!(report.failed(), 2);
        assert_eq!(report.succeeded(), 3);
        assert!(!report.is_success());

        assert!(matches!(
            report.entries[4].result,
            Err(ToggleError::UnsupportedFile(_))
        ));
        assert_eq!(
            fs::read_to_string(&files[2]).unwrap(),
            "# DEBUG START\n# print(1)\n# DEBUG END\n"
        );
    }

    #[test]
    fn test_batch_empty() {
        let report = run_batch(
            &[],
            &StyleRegistry::new(),
            &ToggleRequest::all(Mode::Toggle),
            false,
        );
        assert_eq!(report.total(), 0);
        assert!(report.is_success());
    }
}
