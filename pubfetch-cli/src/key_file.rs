//! The remembered NCBI API key in `~/.pubfetch.cfg`

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use pubfetch_client::{ClientConfig, EUtilsClient};
use tracing::{debug, info, warn};

pub const KEY_FILE_NAME: &str = ".pubfetch.cfg";

pub fn default_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(KEY_FILE_NAME))
}

/// Trimmed key stored at `path`, if the file exists and is not blank
pub fn read_key(path: &Path) -> Option<String> {
    let content = fs::read_to_string(path).ok()?;
    let key = content.trim();
    (!key.is_empty()).then(|| key.to_string())
}

pub fn save_key(path: &Path, key: &str) -> Result<()> {
    fs::write(path, key)
        .with_context(|| format!("Failed to write API key to {}", path.display()))
}

/// Pick the API key for this run.
///
/// A given key wins. When it came from the command line and differs from the stored
/// one, NCBI is asked to accept it first: an accepted key is saved for next time, a
/// rejected one is dropped with a warning. If the check itself fails the key is used
/// for this run but not saved. Without a given key the stored one is used.
pub async fn resolve_api_key(
    given: Option<&str>,
    from_command_line: bool,
    path: Option<&Path>,
    config: &ClientConfig,
) -> Option<String> {
    if let Some(key) = given.map(str::trim).filter(|k| !k.is_empty()) {
        let Some(path) = path.filter(|_| from_command_line) else {
            return Some(key.to_string());
        };
        if read_key(path).as_deref() == Some(key) {
            return Some(key.to_string());
        }

        let client = EUtilsClient::with_config(config.clone().with_api_key(key));
        match client.check_api_key().await {
            Ok(true) => {
                info!("NCBI accepted the API key");
                match save_key(path, key) {
                    Ok(()) => debug!(path = %path.display(), "Saved API key"),
                    Err(err) => warn!(error = %err, "Could not remember API key"),
                }
                return Some(key.to_string());
            }
            Ok(false) => {
                warn!("NCBI rejected the API key, continuing without it; please check it");
                return None;
            }
            Err(err) => {
                warn!(error = %err, "Could not check the API key; using it without saving");
                return Some(key.to_string());
            }
        }
    }

    if let Some((path, key)) = path.and_then(|p| read_key(p).map(|key| (p, key))) {
        debug!(path = %path.display(), "Using stored API key");
        return Some(key);
    }

    warn!(
        "No NCBI API key; requests are limited to 3 per second. \
         Set NCBI_API_KEY or pass --api-key to raise the limit"
    );
    None
}
