use std::path::{Path, PathBuf};

pub const DEFAULT_TEXTURE_PATH: &str = "runtime/mark_free_t04.2048/texture_00.png";

/// Where the live texture and its single backup slot live on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TexturePaths {
    pub live: PathBuf,
    pub backup: PathBuf,
}

impl TexturePaths {
    pub fn new(live: impl Into<PathBuf>, backup: impl Into<PathBuf>) -> Self {
        Self {
            live: live.into(),
            backup: backup.into(),
        }
    }

    /// Places the backup next to the live texture as `<stem>_backup.<ext>`.
    pub fn with_sibling_backup(live: impl Into<PathBuf>) -> Self {
        let live = live.into();
        let backup = sibling_backup_path(&live);
        Self { live, backup }
    }

    pub fn dir(&self) -> &Path {
        self.live.parent().unwrap_or_else(|| Path::new("."))
    }
}

impl Default for TexturePaths {
    fn default() -> Self {
        Self::with_sibling_backup(DEFAULT_TEXTURE_PATH)
    }
}

fn sibling_backup_path(live: &Path) -> PathBuf {
    let stem = live
        .file_stem()
        .and_then(|value| value.to_str())
        .filter(|value| !value.is_empty())
        .unwrap_or("texture");
    let name = match live.extension().and_then(|value| value.to_str()) {
        Some(ext) if !ext.is_empty() => format!("{stem}_backup.{ext}"),
        _ => format!("{stem}_backup"),
    };
    live.with_file_name(name)
}
