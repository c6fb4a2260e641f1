/// Options accepted by `copy_all_links`
use std::fmt::Debug;

use log::warn;
use serde::{Deserialize, Serialize};

pub const DEFAULT_MAX_ICON_DIMENSION: u32 = 64;
pub const DEFAULT_FAVICON_SERVICE: &str = "https://www.google.com/s2/favicons?sz=64";

/// Per-invocation settings; every field may be omitted on the JS side
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct CopyOptions {
    /// Resolve and embed a small icon before each link
    pub include_favicons: bool,
    /// Largest width or height of a re-encoded icon, in pixels
    pub max_icon_dimension: u32,
    /// Favicon lookup service; `domain_url=<origin>` is appended to its query
    pub favicon_service: String,
}

impl CopyOptions {
    pub fn new() -> Self {
        CopyOptions {
            include_favicons: true,
            max_icon_dimension: DEFAULT_MAX_ICON_DIMENSION,
            favicon_service: DEFAULT_FAVICON_SERVICE.to_string(),
        }
    }

    /// Settle on the options for one invocation
    ///
    /// `None` means the caller passed nothing (`null` / `undefined`).
    /// Options that failed to parse fall back to the defaults.
    pub fn from_parsed<E: Debug>(parsed: Option<Result<CopyOptions, E>>) -> CopyOptions {
        match parsed {
            None => CopyOptions::default(),
            Some(Ok(options)) => options,
            Some(Err(e)) => {
                warn!("Ignoring invalid copy options: {:?}", e);
                CopyOptions::default()
            }
        }
    }

    pub fn icon_dimension(&self) -> u32 {
        self.max_icon_dimension.max(1)
    }
}

impl Default for CopyOptions {
    fn default() -> Self {
        Self::new()
    }
}
