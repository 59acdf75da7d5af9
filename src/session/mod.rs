//! Interactive watch session.
//!
//! The session owns the index of watched files and is the only thing that
//! mutates it. Typed commands and file-system notifications both arrive as
//! `SessionEvent`s on one channel and are handled strictly one at a time, so a
//! notification that lands while a command is writing files waits until the
//! write-back is done.
//!
//! Invariants:
//!     - The session is either Idle, Applying or Reconciling, never two at once
//!     - Commands always re-read files from disk, never reuse cached regions
//!     - An index entry whose fingerprint matches the file on disk is not rescanned

mod command;
mod event;

pub use command::{is_exit_command, parse_command, Command, HELP_TEXT, USAGE_HINT};
pub use event::{ChangeKind, FsChange, SessionEvent};

use crate::applier::{fingerprint, read_source, SourceText};
use crate::batch::run_batch;
use crate::error::ToggleError;
use crate::exclusion::FileSelector;
use crate::parser::{scan, CommentStyle, ScanError};
use crate::report::{display_path, outcome_line, TagSummary};
use crate::types::{Region, ToggleRequest};
use std::collections::BTreeMap;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::mpsc::Receiver;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Applying,
    Reconciling,
}

/// Whether the event loop should keep going.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// What the session knows about one watched file.
#[derive(Debug, Clone)]
pub struct FileEntry {
    pub fingerprint: String,
    pub scan: Result<Vec<Region>, ScanError>,
}

impl FileEntry {
    fn from_content(content: &str, style: &CommentStyle) -> Self {
        let source = SourceText::parse(content);
        Self {
            fingerprint: fingerprint(content),
            scan: scan(source.lines(), style),
        }
    }

    pub fn is_errored(&self) -> bool {
        self.scan.is_err()
    }
}

pub struct WatchSession {
    selector: FileSelector,
    index: BTreeMap<PathBuf, FileEntry>,
    state: SessionState,
}

impl WatchSession {
    /// Resolve and scan every file under the selector. Failing to read the
    /// root is the only fatal error; per-file problems mark files errored.
    pub fn start(selector: FileSelector) -> Result<Self, ToggleError> {
        let files = selector.resolve()?;
        let mut index = BTreeMap::new();

        for path in files {
            let Some(style) = selector.styles().style_for(&path) else {
                continue;
            };
            match read_source(&path) {
                Ok(content) => {
                    index.insert(path, FileEntry::from_content(&content, style));
                }
                Err(e) => tracing::warn!(error = %e, "skipping unreadable file"),
            }
        }

        tracing::debug!(files = index.len(), root = %selector.root().display(), "session started");

        Ok(Self {
            selector,
            index,
            state: SessionState::Idle,
        })
    }

    pub fn root(&self) -> &Path {
        self.selector.root()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn file_count(&self) -> usize {
        self.index.len()
    }

    pub fn entry(&self, path: &Path) -> Option<&FileEntry> {
        self.index.get(path)
    }

    /// Tags across all cleanly scanned files.
    pub fn tag_summary(&self) -> TagSummary {
        let mut summary = TagSummary::new();
        for entry in self.index.values() {
            if let Ok(regions) = &entry.scan {
                summary.add_regions(regions);
            }
        }
        summary
    }

    fn shown(&self, path: &Path) -> String {
        display_path(self.selector.root(), path)
    }

    fn transition(&mut self, state: SessionState) {
        tracing::debug!(from = ?self.state, to = ?state, "session state");
        self.state = state;
    }

    /// Drain events until `exit`, end of input, or the channel closes.
    pub fn run<W: Write>(&mut self, events: &Receiver<SessionEvent>, out: &mut W) -> io::Result<()> {
        prompt(out)?;
        for event in events.iter() {
            let is_input = matches!(event, SessionEvent::Input(_));
            if self.handle(event, out)? == Flow::Exit {
                break;
            }
            if is_input {
                prompt(out)?;
            }
        }
        Ok(())
    }

    /// Handle a single event to completion.
    pub fn handle<W: Write>(&mut self, event: SessionEvent, out: &mut W) -> io::Result<Flow> {
        match event {
            SessionEvent::Input(line) => self.handle_input(&line, out),
            SessionEvent::InputClosed => Ok(Flow::Exit),
            SessionEvent::Fs(change) => {
                self.transition(SessionState::Reconciling);
                let result = self.reconcile(&change, out);
                self.transition(SessionState::Idle);
                result.map(|_| Flow::Continue)
            }
        }
    }

    fn handle_input<W: Write>(&mut self, line: &str, out: &mut W) -> io::Result<Flow> {
        let command = match parse_command(line) {
            Ok(Some(command)) => command,
            Ok(None) => return Ok(Flow::Continue),
            Err(e @ ToggleError::UnknownCommand(_)) => {
                writeln!(out, "{}. {}", e, USAGE_HINT)?;
                return Ok(Flow::Continue);
            }
            Err(e) => {
                writeln!(out, "Error: {}", e)?;
                return Ok(Flow::Continue);
            }
        };

        match command {
            Command::Apply(request) => {
                self.transition(SessionState::Applying);
                let result = self.apply(&request, out);
                self.transition(SessionState::Idle);
                result?;
            }
            Command::List => self.list(out)?,
            Command::Help => writeln!(out, "{}", HELP_TEXT)?,
            Command::Exit => return Ok(Flow::Exit),
        }
        Ok(Flow::Continue)
    }

    fn apply<W: Write>(&mut self, request: &ToggleRequest, out: &mut W) -> io::Result<()> {
        let targets: Vec<PathBuf> = self
            .index
            .iter()
            .filter(|(_, entry)| !entry.is_errored())
            .map(|(path, _)| path.clone())
            .collect();
        let skipped = self.index.len() - targets.len();

        let report = run_batch(&targets, self.selector.styles(), request, false);

        for entry in &report.entries {
            let shown = self.shown(&entry.path);
            match &entry.result {
                Ok(outcome) => {
                    if outcome.changed() {
                        writeln!(out, "{}", outcome_line(&shown, &entry.result))?;
                    }
                    if let Some(style) = self.selector.styles().style_for(&entry.path) {
                        self.index.insert(
                            entry.path.clone(),
                            FileEntry::from_content(&outcome.content, style),
                        );
                    }
                }
                Err(e) => {
                    writeln!(out, "{}", outcome_line(&shown, &entry.result))?;
                    match e {
                        ToggleError::NotFound(_) => {
                            self.index.remove(&entry.path);
                        }
                        ToggleError::Scan { error, .. } => {
                            tracing::debug!(path = %entry.path.display(), line = error.line(), "marking file errored");
                            if let Some(indexed) = self.index.get_mut(&entry.path) {
                                indexed.scan = Err(error.clone());
                            }
                        }
                        _ => {}
                    }
                }
            }
        }

        writeln!(
            out,
            "changed: {}, unchanged: {}, errors: {}",
            report.changed(),
            report.unchanged(),
            report.failed()
        )?;
        if skipped > 0 {
            writeln!(out, "skipped {} file(s) with scan errors (see 'list')", skipped)?;
        }
        Ok(())
    }

    fn list<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let summary = self.tag_summary();
        if summary.is_empty() {
            writeln!(
                out,
                "No DEBUG blocks found in {} watched file(s)",
                self.index.len() - self.errored().count()
            )?;
        }
        for line in summary.lines() {
            writeln!(out, "{}", line)?;
        }

        for (path, error) in self.errored() {
            writeln!(out, "errored: {}: {}", self.shown(path), error)?;
        }
        Ok(())
    }

    fn errored(&self) -> impl Iterator<Item = (&PathBuf, &ScanError)> {
        self.index
            .iter()
            .filter_map(|(path, entry)| entry.scan.as_ref().err().map(|e| (path, e)))
    }

    fn reconcile<W: Write>(&mut self, change: &FsChange, out: &mut W) -> io::Result<()> {
        let path = &change.path;
        let known = self.index.contains_key(path);
        if !known && !self.selector.matches(path) {
            tracing::debug!(path = %path.display(), "ignoring change outside the watched set");
            return Ok(());
        }
        let Some(style) = self.selector.styles().style_for(path).cloned() else {
            return Ok(());
        };
        let shown = self.shown(path);

        let content = match read_source(path) {
            Ok(content) => content,
            Err(e) => {
                if self.index.remove(path).is_some() {
                    match e {
                        ToggleError::NotFound(_) => writeln!(out, "- no longer watching {}", shown)?,
                        other => writeln!(out, "- no longer watching {}: {}", shown, other)?,
                    }
                }
                return Ok(());
            }
        };

        if self
            .index
            .get(path)
            .is_some_and(|entry| entry.fingerprint == fingerprint(&content))
        {
            tracing::debug!(path = %path.display(), kind = ?change.kind, "content unchanged");
            return Ok(());
        }

        let entry = FileEntry::from_content(&content, &style);
        if !known {
            writeln!(out, "+ watching {}", shown)?;
        }
        match &entry.scan {
            Err(error) => {
                tracing::debug!(path = %path.display(), line = error.line(), "scan failed");
                writeln!(out, "warning: {}: {}", shown, error)?
            }
            Ok(_) if known => writeln!(out, "~ reloaded {}", shown)?,
            Ok(_) => {}
        }
        self.index.insert(path.clone(), entry);
        Ok(())
    }
}

fn prompt<W: Write>(out: &mut W) -> io::Result<()> {
    write!(out, "> ")?;
    out.flush()
}
