//! Sticker pack configuration

use std::path::Path;

use serde::Deserialize;

use crate::error::Error;
use crate::normalize::{NormalizeOptions, types::DEFAULT_WEBP_QUALITY};

const DEFAULT_CREDENTIAL_SERVICE_ID: &str = "org.stickers.desktop";
const DEFAULT_IDENTITY_KEYS: &[&str] = &["uuid_id", "number_id"];
const DEFAULT_PASSWORD_KEY: &str = "password";

/// Settings for normalizing and uploading packs
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct StickerPackConfig {
    /// Sticker service endpoint; `None` leaves the choice to the transport
    pub server_url: Option<String>,
    /// Ask the transport for a websocket connection
    pub use_websocket: bool,
    /// Keyring service the credentials are stored under
    pub credential_service_id: String,
    /// Username lookup keys, highest priority first
    pub identity_keys: Vec<String>,
    /// Password lookup key
    pub password_key: String,
    /// Lossy WebP quality (0-100) for static stickers
    pub webp_quality: f32,
}

impl Default for StickerPackConfig {
    fn default() -> Self {
        Self {
            server_url: None,
            use_websocket: true,
            credential_service_id: DEFAULT_CREDENTIAL_SERVICE_ID.to_string(),
            identity_keys: DEFAULT_IDENTITY_KEYS
                .iter()
                .map(|k| k.to_string())
                .collect(),
            password_key: DEFAULT_PASSWORD_KEY.to_string(),
            webp_quality: DEFAULT_WEBP_QUALITY,
        }
    }
}

impl StickerPackConfig {
    /// Normalizer options derived from this config
    pub fn normalize_options(&self) -> NormalizeOptions {
        NormalizeOptions {
            webp_quality: self.webp_quality,
        }
    }
}

/// Load a JSON config file
///
/// A missing file yields the defaults. Unknown fields are ignored and absent
/// fields take their defaults.
pub fn load_config(path: &Path) -> Result<StickerPackConfig, Error> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(
                target: "sticker_core::config",
                path = %path.display(),
                "No config file, using defaults"
            );
            return Ok(StickerPackConfig::default());
        }
        Err(e) => {
            return Err(Error::Config(format!(
                "Failed to read {}: {}",
                path.display(),
                e
            )));
        }
    };

    serde_json::from_slice(&bytes)
        .map_err(|e| Error::Config(format!("Failed to parse {}: {}", path.display(), e)))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(&dir.path().join("stickers.json")).unwrap();
        assert_eq!(config, StickerPackConfig::default());
        assert!(config.use_websocket);
        assert_eq!(config.identity_keys, vec!["uuid_id", "number_id"]);
        assert_eq!(config.password_key, "password");
        assert_eq!(config.webp_quality, 80.0);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"server_url": "https://stickers.example", "webp_quality": 65, "extra": 1}}"#
        )
        .unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.server_url.as_deref(), Some("https://stickers.example"));
        assert_eq!(config.webp_quality, 65.0);
        assert_eq!(config.normalize_options().webp_quality, 65.0);
        assert_eq!(config.credential_service_id, "org.stickers.desktop");
    }

    #[test]
    fn test_malformed_file_is_config_error() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();

        let err = load_config(file.path()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
    }
}
