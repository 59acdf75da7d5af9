//! Watch command: an interactive session over a file or directory.
//!
//! Three producers feed the session's single event channel: the stdin reader
//! (typed commands), and the notify callback whose raw events pass through a
//! debounce forwarder that coalesces bursts per path. The session consumes the
//! channel on the main thread, one event at a time.
//!
//! Shutdown: `exit`/`quit` or end of input stops the reader after it forwards
//! the line; the session returns, the shutdown flag is raised, the watcher is
//! dropped (closing the notify channel) and both threads are joined.

use super::selector_for;
use crate::cli::WatchArgs;
use crate::config::Config;
use crate::parser::StyleRegistry;
use crate::session::{is_exit_command, ChangeKind, FsChange, SessionEvent, WatchSession, USAGE_HINT};
use anyhow::{Context, Result};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::collections::HashMap;
use std::io::{self, BufRead};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

const POLL_INTERVAL: Duration = Duration::from_millis(50);
/// A burst that never goes quiet is still flushed after `debounce * MAX_WAIT_FACTOR`.
const MAX_WAIT_FACTOR: u32 = 10;

pub fn run_watch(args: &WatchArgs, root: &Path) -> Result<()> {
    let config = Config::load(root);

    // notify reports canonical paths; the index has to use the same ones
    let mut target = args.target.clone();
    let requested = root.join(&target.path);
    target.path = requested
        .canonicalize()
        .with_context(|| format!("Failed to read watch root {}", requested.display()))?;

    let selector = selector_for(&target, &config, root);
    let styles = selector.styles().clone();
    let watch_root = selector.root().to_path_buf();
    let (watch_path, mode) = if watch_root.is_dir() {
        let mode = if selector.is_recursive() {
            RecursiveMode::Recursive
        } else {
            RecursiveMode::NonRecursive
        };
        (watch_root.clone(), mode)
    } else {
        // Watch the parent so editors that replace the file are still seen
        let parent = watch_root
            .parent()
            .map(PathBuf::from)
            .unwrap_or_else(|| watch_root.clone());
        (parent, RecursiveMode::NonRecursive)
    };

    let mut session = WatchSession::start(selector)
        .with_context(|| format!("Failed to start watching {}", watch_root.display()))?;

    let debounce = Duration::from_millis(args.debounce.unwrap_or(config.watch.debounce_ms));
    let shutdown = Arc::new(AtomicBool::new(false));
    let (event_tx, event_rx) = mpsc::channel();

    // Set up file watcher
    let (notify_tx, notify_rx) = mpsc::channel();
    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| match res {
            Ok(event) => {
                let _ = notify_tx.send(event);
            }
            Err(e) => tracing::warn!(error = %e, "file watcher error"),
        },
        notify::Config::default(),
    )?;
    watcher
        .watch(&watch_path, mode)
        .with_context(|| format!("Failed to watch {}", watch_path.display()))?;
    tracing::debug!(path = %watch_path.display(), ?mode, debounce_ms = debounce.as_millis() as u64, "watching");

    let forwarder = {
        let events = event_tx.clone();
        let shutdown = Arc::clone(&shutdown);
        thread::spawn(move || forward_changes(notify_rx, events, &styles, debounce, &shutdown))
    };
    let reader = {
        let events = event_tx.clone();
        let shutdown = Arc::clone(&shutdown);
        thread::spawn(move || read_input(events, &shutdown))
    };
    drop(event_tx);

    println!(
        "Watching {} file(s) in {}. {}",
        session.file_count(),
        session.root().display(),
        USAGE_HINT
    );

    let result = {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        session.run(&event_rx, &mut out)
    };
    println!();

    shutdown.store(true, Ordering::SeqCst);
    if let Err(e) = watcher.unwatch(&watch_path) {
        tracing::debug!(error = %e, "unwatch failed");
    }
    drop(watcher);

    if forwarder.join().is_err() {
        tracing::warn!("change forwarder panicked");
    }
    // The reader is parked on stdin unless it saw exit or end of input
    if result.is_ok() && reader.join().is_err() {
        tracing::warn!("input reader panicked");
    }

    result.context("Failed to write session output")
}

/// Forward stdin lines until an exit command or end of input.
fn read_input(events: Sender<SessionEvent>, shutdown: &AtomicBool) {
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                tracing::warn!(error = %e, "failed to read input");
                break;
            }
        };
        let exit = is_exit_command(&line);
        if events.send(SessionEvent::Input(line)).is_err() || exit {
            return;
        }
        if shutdown.load(Ordering::SeqCst) {
            return;
        }
    }
    let _ = events.send(SessionEvent::InputClosed);
}

/// Debounce loop: collect notify events per path and forward them once the
/// burst has been quiet for `debounce`, or once the oldest pending change has
/// waited `debounce * MAX_WAIT_FACTOR`.
fn forward_changes(
    notify_rx: Receiver<Event>,
    events: Sender<SessionEvent>,
    styles: &StyleRegistry,
    debounce: Duration,
    shutdown: &AtomicBool,
) {
    let max_wait = debounce * MAX_WAIT_FACTOR;
    let mut pending: HashMap<PathBuf, ChangeKind> = HashMap::new();
    let mut last_event = Instant::now();
    let mut first_pending: Option<Instant> = None;

    loop {
        if shutdown.load(Ordering::SeqCst) {
            break;
        }
        match notify_rx.recv_timeout(POLL_INTERVAL) {
            Ok(event) => {
                collect_event(&event, &mut pending, styles);
                last_event = Instant::now();
                if first_pending.is_none() && !pending.is_empty() {
                    first_pending = Some(last_event);
                }
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }

        let Some(first) = first_pending else {
            continue;
        };
        if last_event.elapsed() >= debounce || first.elapsed() >= max_wait {
            first_pending = None;
            if flush_pending(&mut pending, &events).is_err() {
                break;
            }
        }
    }
    tracing::debug!("change forwarder stopped");
}

fn collect_event(event: &Event, pending: &mut HashMap<PathBuf, ChangeKind>, styles: &StyleRegistry) {
    let kind = match &event.kind {
        EventKind::Create(_) => ChangeKind::Created,
        EventKind::Modify(_) => ChangeKind::Modified,
        EventKind::Remove(_) => ChangeKind::Deleted,
        _ => return,
    };

    for path in &event.paths {
        if !styles.is_supported(path) {
            continue;
        }
        pending
            .entry(path.clone())
            .and_modify(|existing| *existing = existing.coalesce(kind))
            .or_insert(kind);
    }
}

/// Send pending changes in path order. Fails once the session is gone.
fn flush_pending(
    pending: &mut HashMap<PathBuf, ChangeKind>,
    events: &Sender<SessionEvent>,
) -> Result<(), mpsc::SendError<SessionEvent>> {
    let mut changes: Vec<_> = pending.drain().collect();
    changes.sort_by(|a, b| a.0.cmp(&b.0));

    for (path, kind) in changes {
        events.send(SessionEvent::Fs(FsChange { path, kind }))?;
    }
    Ok(())
}
