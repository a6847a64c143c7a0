use std::path::PathBuf;

use thiserror::Error;

/// Startup faults raised by the display and audio hosts.
///
/// Everything here is fatal: assets are fixed at build time, so a missing
/// sprite or sound folder means a broken install, not a transient condition.
#[derive(Debug, Error)]
pub enum PetError {
    #[error("asset `{}` not found", .0.display())]
    MissingAsset(PathBuf),

    #[error("cannot read sound folder `{}`", path.display())]
    SoundFolder {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("display init failed: {0}")]
    Display(String),
}
