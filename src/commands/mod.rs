mod list;
mod toggle;
mod watch;

pub use list::*;
pub use toggle::*;
pub use watch::*;

use crate::cli::TargetOptions;
use crate::config::Config;
use crate::exclusion::FileSelector;
use crate::parser::StyleRegistry;
use std::path::{Path, PathBuf};

/// Selector for a command's target PATH, resolved against `root` and shaped
/// by the config file and the command-line target options.
fn selector_for(target: &TargetOptions, config: &Config, root: &Path) -> FileSelector {
    // Collecting components drops `.` segments ("./src" and "." included)
    let path: PathBuf = root.join(&target.path).components().collect();

    FileSelector::new(
        path,
        target.recursive,
        StyleRegistry::configured(config, &target.ext),
        target.exclusion_config(&config.exclude),
    )
}
