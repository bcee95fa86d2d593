//! Host-supplied bounds for the codec.
//!
//! The host hands a JSON object to `CodecConfig::from_json` once at startup.
//! Omitted fields take their defaults, so `{}` is a valid configuration.

use serde::{Deserialize, Serialize};

use crate::error::{ListError, ListResult};

pub const DEFAULT_MAX_ITEMS: usize = 100;
pub const DEFAULT_MAX_NAME_LEN: usize = 256;
pub const DEFAULT_MAX_PAYLOAD_BYTES: usize = 8 * 1024;
pub const DEFAULT_LINK_BASE: &str = "https://thyme.app/list";

/// Limits applied by `ListCodec` on both encode and decode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// Maximum number of items, tombstones included.
    pub max_items: usize,
    /// Maximum length in characters of the list title and of each item name.
    pub max_name_len: usize,
    /// Maximum length in bytes of the complete link.
    pub max_payload_bytes: usize,
    /// URL the payload is attached to as a query parameter.
    pub link_base: String,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            max_items: DEFAULT_MAX_ITEMS,
            max_name_len: DEFAULT_MAX_NAME_LEN,
            max_payload_bytes: DEFAULT_MAX_PAYLOAD_BYTES,
            link_base: DEFAULT_LINK_BASE.to_string(),
        }
    }
}

impl CodecConfig {
    /// Parse and validate a JSON configuration object.
    pub fn from_json(raw: &str) -> ListResult<Self> {
        let config: Self =
            serde_json::from_str(raw).map_err(|e| ListError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ListResult<()> {
        if self.max_items == 0 {
            return Err(ListError::InvalidConfig("max_items must be positive".into()));
        }
        if self.max_name_len == 0 {
            return Err(ListError::InvalidConfig("max_name_len must be positive".into()));
        }
        if self.max_payload_bytes == 0 {
            return Err(ListError::InvalidConfig(
                "max_payload_bytes must be positive".into(),
            ));
        }
        if self.link_base.is_empty() || self.link_base.contains(['?', '#']) {
            return Err(ListError::InvalidConfig(format!(
                "link_base must be a non-empty URL without query or fragment: {:?}",
                self.link_base
            )));
        }
        Ok(())
    }
}
