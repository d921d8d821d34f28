mod layout;
mod store;

use sha2::{Digest, Sha256};

pub use layout::{TexturePaths, DEFAULT_TEXTURE_PATH};
pub use store::{
    AssetError, AssetStore, BackupStatus, RestoreStatus, SourceOrigin, SourceTexture,
};

/// Canonical edge length of the live texture, in pixels. Textures are square.
pub const TEXTURE_SIZE: u32 = 2048;

/// Hex sha256 of a byte buffer, used to identify texture states in the event log.
pub fn fingerprint(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}
