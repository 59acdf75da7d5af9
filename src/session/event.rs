use std::path::PathBuf;

/// The kind of change detected for a file
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ChangeKind {
    Created,
    Modified,
    Deleted,
}

impl ChangeKind {
    /// Fold a newer event for the same path into a pending one:
    /// Create + Modify = Create, anything + Delete = Delete, otherwise the newest wins.
    pub fn coalesce(self, next: ChangeKind) -> ChangeKind {
        match (self, next) {
            (ChangeKind::Created, ChangeKind::Modified) => ChangeKind::Created,
            (_, ChangeKind::Deleted) => ChangeKind::Deleted,
            (_, new) => new,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FsChange {
    pub path: PathBuf,
    pub kind: ChangeKind,
}

/// Everything the session reacts to, delivered through one ordered channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// A line typed by the user
    Input(String),
    /// The input stream ended
    InputClosed,
    Fs(FsChange),
}
