//! Asset lookup. Debug builds read straight from the source tree, release
//! builds from next to the executable; `SLIMEPET_ASSETS` overrides both.

use std::path::{Path, PathBuf};

use crate::error::PetError;

const ASSETS_ENV: &str = "SLIMEPET_ASSETS";

pub fn asset_root() -> PathBuf {
    if let Some(root) = std::env::var_os(ASSETS_ENV) {
        return PathBuf::from(root);
    }
    if cfg!(debug_assertions) {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
    } else {
        std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf))
            .unwrap_or_default()
    }
}

pub fn resolve(relative: impl AsRef<Path>) -> PathBuf {
    asset_root().join(relative)
}

pub fn require_file(path: &Path) -> Result<(), PetError> {
    if path.is_file() {
        Ok(())
    } else {
        Err(PetError::MissingAsset(path.to_path_buf()))
    }
}

/// `*.wav` files in `folder`, sorted.
pub fn list_clips(folder: &Path) -> Result<Vec<PathBuf>, PetError> {
    let entries = std::fs::read_dir(folder).map_err(|source| PetError::SoundFolder {
        path: folder.to_path_buf(),
        source,
    })?;

    let mut clips: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file() && is_wav(path))
        .collect();
    clips.sort();
    Ok(clips)
}

fn is_wav(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("wav"))
}
