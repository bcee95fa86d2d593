//! Translation between a `ToDoList` and the link attached to a message.
//!
//! # Design
//! `ListCodec` holds only its `CodecConfig` and carries no state between
//! calls, the same way the list itself carries no transport identity. The
//! host moves links in and out of messages; the codec never touches them.
//!
//! # Wire format
//! `<link_base>?list=<payload>` where `payload` is unpadded URL-safe base64
//! of a compact JSON object:
//!
//! ```text
//! {"v":1,"name":"Groceries","createdBy":"p1","items":[{"id":"..","name":".."}]}
//! ```
//!
//! `v` is the format version. A payload without it is read as version 0, the
//! unversioned layout with the same field names. Unknown fields are ignored
//! so older readers survive additions.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::CodecConfig;
use crate::error::{Limit, ListError, ListResult};
use crate::types::{Link, ListItem, ToDoList};

/// Version written by `encode`.
pub const FORMAT_VERSION: u32 = 1;

/// Query parameter that carries the payload.
pub const PAYLOAD_PARAM: &str = "list";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WireListRef<'a> {
    v: u32,
    name: &'a str,
    created_by: &'a str,
    items: &'a [ListItem],
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireList {
    #[serde(default)]
    v: u32,
    name: String,
    #[serde(default)]
    created_by: String,
    items: Vec<ListItem>,
}

/// Stateless encoder/decoder bound to one configuration.
#[derive(Debug, Clone, Default)]
pub struct ListCodec {
    config: CodecConfig,
}

impl ListCodec {
    pub fn new(config: CodecConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Serialize `list` into a link. Same list, same bytes.
    ///
    /// Lists outside the configured bounds are rejected with
    /// `PayloadTooLarge`; nothing is ever truncated.
    pub fn encode(&self, list: &ToDoList) -> ListResult<Link> {
        list.validate_ids()?;
        self.check_bounds(list)?;

        let wire = WireListRef {
            v: FORMAT_VERSION,
            name: &list.name,
            created_by: &list.created_by,
            items: &list.items,
        };
        let json = serde_json::to_vec(&wire)
            .map_err(|e| ListError::MalformedPayload(format!("serialization failed: {e}")))?;
        let link = format!(
            "{}?{}={}",
            self.config.link_base,
            PAYLOAD_PARAM,
            URL_SAFE_NO_PAD.encode(json)
        );
        check_limit(Limit::PayloadBytes, self.config.max_payload_bytes, link.len())?;

        debug!(items = list.items.len(), bytes = link.len(), "encoded list");
        Ok(Link::new(link))
    }

    /// Parse a link back into a list.
    ///
    /// Accepts either a full URL carrying the `list` query parameter or the
    /// bare payload.
    pub fn decode(&self, link: &Link) -> ListResult<ToDoList> {
        let raw = link.as_str().trim();
        check_limit(Limit::PayloadBytes, self.config.max_payload_bytes, raw.len())?;

        let payload = extract_payload(raw)?;
        let json = URL_SAFE_NO_PAD
            .decode(payload.trim_end_matches('='))
            .map_err(|e| ListError::MalformedPayload(format!("invalid base64: {e}")))?;
        let wire: WireList = serde_json::from_slice(&json)
            .map_err(|e| ListError::MalformedPayload(format!("invalid list: {e}")))?;

        if wire.v > FORMAT_VERSION {
            debug!(
                version = wire.v,
                supported = FORMAT_VERSION,
                "decoding newer list format, unknown fields ignored"
            );
        }

        let list = ToDoList {
            name: wire.name,
            created_by: wire.created_by,
            items: wire.items,
        };
        list.validate_ids()?;
        if wire.v >= 1 {
            check_stamps(&list.items)?;
        }
        self.check_bounds(&list)?;

        debug!(version = wire.v, items = list.items.len(), "decoded list");
        Ok(list)
    }

    fn check_bounds(&self, list: &ToDoList) -> ListResult<()> {
        check_limit(Limit::ItemCount, self.config.max_items, list.items.len())?;
        let max_name = self.config.max_name_len;
        check_limit(Limit::NameLength, max_name, list.name.chars().count())?;
        for item in &list.items {
            check_limit(Limit::NameLength, max_name, item.name.chars().count())?;
        }
        Ok(())
    }
}

fn check_limit(limit: Limit, max: usize, actual: usize) -> ListResult<()> {
    if actual > max {
        return Err(ListError::PayloadTooLarge { limit, max, actual });
    }
    Ok(())
}

/// A set flag needs a nonzero stamp. Unversioned payloads predate stamps
/// and are exempt.
fn check_stamps(items: &[ListItem]) -> ListResult<()> {
    for item in items {
        if item.checked && item.checked_at == 0 {
            return Err(ListError::MalformedPayload(format!(
                "item `{}` is checked without `checkedAt`",
                item.id
            )));
        }
        if item.deleted && item.deleted_at == 0 {
            return Err(ListError::MalformedPayload(format!(
                "item `{}` is deleted without `deletedAt`",
                item.id
            )));
        }
    }
    Ok(())
}

/// Pull the payload out of a link, or take the whole string if it has no
/// query part.
fn extract_payload(raw: &str) -> ListResult<&str> {
    let Some((_, query)) = raw.split_once('?') else {
        return Ok(raw);
    };
    let query = query.split('#').next().unwrap_or_default();
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == PAYLOAD_PARAM)
        .map(|(_, value)| value)
        .ok_or_else(|| {
            ListError::MalformedPayload(format!("missing `{PAYLOAD_PARAM}` query parameter"))
        })
}
