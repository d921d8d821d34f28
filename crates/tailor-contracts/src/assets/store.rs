use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::layout::TexturePaths;

#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("texture file not found: {}", path.display())]
    MissingAsset { path: PathBuf },
    #[error("texture io failed ({}): {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl AssetError {
    fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackupStatus {
    Created,
    AlreadyPresent,
    NoLiveAsset,
}

impl BackupStatus {
    /// Whether the backup slot holds a copy after the call.
    pub fn exists(self) -> bool {
        !matches!(self, Self::NoLiveAsset)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestoreStatus {
    Restored,
    NothingToRestore,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceOrigin {
    /// Read from an existing backup slot.
    Backup,
    /// The live texture was copied into the empty backup slot first.
    BackedUpLive,
}

/// Conditioning image handed to synthesis.
#[derive(Debug, Clone)]
pub struct SourceTexture {
    pub bytes: Vec<u8>,
    pub path: PathBuf,
    pub origin: SourceOrigin,
}

/// Sole owner of the live texture file and its backup slot.
///
/// The backup slot is written at most once: it is the pre-editing baseline that every
/// synthesis conditions on and that `restore` brings back.
#[derive(Debug, Clone)]
pub struct AssetStore {
    paths: TexturePaths,
}

impl AssetStore {
    pub fn new(paths: TexturePaths) -> Self {
        Self { paths }
    }

    pub fn paths(&self) -> &TexturePaths {
        &self.paths
    }

    pub fn live_path(&self) -> &Path {
        &self.paths.live
    }

    pub fn backup_path(&self) -> &Path {
        &self.paths.backup
    }

    pub fn has_live(&self) -> bool {
        self.paths.live.is_file()
    }

    pub fn has_backup(&self) -> bool {
        self.paths.backup.is_file()
    }

    pub fn backup(&self) -> Result<BackupStatus, AssetError> {
        if self.has_backup() {
            return Ok(BackupStatus::AlreadyPresent);
        }
        if !self.has_live() {
            return Ok(BackupStatus::NoLiveAsset);
        }
        copy_verbatim(&self.paths.live, &self.paths.backup)?;
        Ok(BackupStatus::Created)
    }

    pub fn restore(&self) -> Result<RestoreStatus, AssetError> {
        if !self.has_backup() {
            return Ok(RestoreStatus::NothingToRestore);
        }
        copy_verbatim(&self.paths.backup, &self.paths.live)?;
        Ok(RestoreStatus::Restored)
    }

    pub fn current_source_for_edit(&self) -> Result<SourceTexture, AssetError> {
        let origin = match self.backup()? {
            BackupStatus::AlreadyPresent => SourceOrigin::Backup,
            BackupStatus::Created => SourceOrigin::BackedUpLive,
            BackupStatus::NoLiveAsset => {
                return Err(AssetError::MissingAsset {
                    path: self.paths.live.clone(),
                })
            }
        };
        let path = self.paths.backup.clone();
        let bytes = fs::read(&path).map_err(|err| AssetError::io(&path, err))?;
        Ok(SourceTexture {
            bytes,
            path,
            origin,
        })
    }

    /// Replaces the live texture. A failed write never leaves a truncated texture behind.
    pub fn commit(&self, image_bytes: &[u8]) -> Result<(), AssetError> {
        replace_file(&self.paths.live, |staging| fs::write(staging, image_bytes))
    }

    pub fn read_live(&self) -> Result<Vec<u8>, AssetError> {
        read_existing(&self.paths.live)
    }

    pub fn read_backup(&self) -> Result<Vec<u8>, AssetError> {
        read_existing(&self.paths.backup)
    }
}

fn read_existing(path: &Path) -> Result<Vec<u8>, AssetError> {
    fs::read(path).map_err(|err| match err.kind() {
        io::ErrorKind::NotFound => AssetError::MissingAsset {
            path: path.to_path_buf(),
        },
        _ => AssetError::io(path, err),
    })
}

fn copy_verbatim(from: &Path, to: &Path) -> Result<(), AssetError> {
    replace_file(to, |staging| fs::copy(from, staging).map(|_| ()))
}

/// Fills a hidden sibling of `target` and renames it over `target`, so readers only
/// ever see the old file or the complete new one.
fn replace_file(
    target: &Path,
    fill: impl FnOnce(&Path) -> io::Result<()>,
) -> Result<(), AssetError> {
    if let Some(parent) = target.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|err| AssetError::io(parent, err))?;
    }
    let staging = staging_path(target);
    let written = fill(&staging).and_then(|()| fs::rename(&staging, target));
    if let Err(err) = written {
        let _ = fs::remove_file(&staging);
        return Err(AssetError::io(target, err));
    }
    Ok(())
}

fn staging_path(target: &Path) -> PathBuf {
    let name = target
        .file_name()
        .and_then(|value| value.to_str())
        .unwrap_or("texture");
    target.with_file_name(format!(".{name}.partial"))
}
