/// Favicon resolution: find an icon for a tab and normalize it to an inline PNG
///
/// Every step is best-effort. A candidate that cannot be fetched, decoded or
/// re-encoded is logged and skipped; a tab with no usable candidate simply
/// has no icon.

use std::io::Cursor;

use base64::Engine;
use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig, STANDARD};
use base64::engine::DecodePaddingMode;
use futures::future::join_all;
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat};
use log::debug;
use percent_encoding::percent_decode_str;
use url::Url;

use crate::error::IconError;
use crate::options::CopyOptions;
use crate::tab_data::{ResolvedTabEntry, TabEntry};

const PNG_DATA_URI_PREFIX: &str = "data:image/png;base64,";

// Data URIs in the wild are not always padded.
const LENIENT_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Loads the raw bytes behind an icon URL
#[allow(async_fn_in_trait)]
pub trait IconFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, IconError>;
}

/// Turns tabs into inline PNG data URIs using an ordered fallback chain
pub struct FaviconResolver<F> {
    fetcher: F,
    max_dimension: u32,
    lookup_service: String,
}

impl<F: IconFetcher> FaviconResolver<F> {
    pub fn new(fetcher: F, options: &CopyOptions) -> Self {
        FaviconResolver {
            fetcher,
            max_dimension: options.icon_dimension(),
            lookup_service: options.favicon_service.clone(),
        }
    }

    /// Resolve icons for all entries concurrently, keeping input order
    pub async fn resolve_all(&self, entries: Vec<TabEntry>) -> Vec<ResolvedTabEntry> {
        join_all(entries.into_iter().map(|entry| async move {
            let icon = self.resolve_icon(&entry).await;
            ResolvedTabEntry::new(entry, icon)
        }))
        .await
    }

    /// First candidate that yields a usable icon, as a PNG data URI
    pub async fn resolve_icon(&self, entry: &TabEntry) -> Option<String> {
        for candidate in icon_candidates(entry, &self.lookup_service) {
            match self.try_candidate(&candidate).await {
                Ok(data_uri) => return Some(data_uri),
                Err(err) => debug!("Skipping favicon candidate {}: {}", candidate, err),
            }
        }

        debug!("No favicon for {}", entry.url);
        None
    }

    async fn try_candidate(&self, candidate: &str) -> Result<String, IconError> {
        let bytes = if is_data_uri(candidate) {
            decode_data_uri(candidate)?
        } else {
            self.fetcher.fetch(candidate).await?
        };

        if bytes.is_empty() {
            return Err(IconError::EmptyBody);
        }

        let png = normalize_icon(&bytes, self.max_dimension)?;
        Ok(png_data_uri(&png))
    }
}

/// Ordered, de-duplicated icon locations for a tab
///
/// 1. Icons the browser already knows about
/// 2. `<origin>/favicon.ico` (http/https only)
/// 3. The lookup service keyed by origin (http/https only)
pub fn icon_candidates(entry: &TabEntry, lookup_service: &str) -> Vec<String> {
    let mut candidates = Vec::new();

    for source in &entry.icon_sources {
        push_unique(&mut candidates, source.trim().to_string());
    }

    let parsed = match Url::parse(&entry.url) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => parsed,
        _ => return candidates,
    };
    let origin = parsed.origin().ascii_serialization();

    push_unique(&mut candidates, format!("{}/favicon.ico", origin));

    if let Ok(lookup) = Url::parse_with_params(lookup_service, &[("domain_url", origin.as_str())]) {
        push_unique(&mut candidates, lookup.to_string());
    }

    candidates
}

fn push_unique(candidates: &mut Vec<String>, candidate: String) {
    if !candidate.is_empty() && !candidates.contains(&candidate) {
        candidates.push(candidate);
    }
}

fn is_data_uri(candidate: &str) -> bool {
    candidate
        .get(..5)
        .is_some_and(|scheme| scheme.eq_ignore_ascii_case("data:"))
}

/// Decode the payload of a `data:` URI (base64 or percent-encoded)
pub fn decode_data_uri(uri: &str) -> Result<Vec<u8>, IconError> {
    if !is_data_uri(uri) {
        return Err(IconError::InvalidDataUri);
    }

    let (meta, payload) = uri[5..].split_once(',').ok_or(IconError::InvalidDataUri)?;

    if meta.trim().to_ascii_lowercase().ends_with(";base64") {
        let compact: String = payload.chars().filter(|c| !c.is_ascii_whitespace()).collect();
        LENIENT_BASE64
            .decode(compact)
            .map_err(|_| IconError::InvalidDataUri)
    } else {
        Ok(percent_decode_str(payload).collect())
    }
}

/// Validate icon bytes and convert them to PNG
///
/// PNG input is returned unchanged. Anything else is decoded, each side is
/// clamped to `1..=max_dimension`, and the result is re-encoded as RGBA PNG.
pub fn normalize_icon(bytes: &[u8], max_dimension: u32) -> Result<Vec<u8>, IconError> {
    let decoded =
        image::load_from_memory(bytes).map_err(|err| IconError::Decode(err.to_string()))?;

    if image::guess_format(bytes).ok() == Some(ImageFormat::Png) {
        return Ok(bytes.to_vec());
    }

    let max = max_dimension.max(1);
    let (width, height) = (decoded.width(), decoded.height());
    let (target_width, target_height) = (width.clamp(1, max), height.clamp(1, max));

    let resized = if (target_width, target_height) == (width, height) {
        decoded
    } else {
        decoded.resize_exact(target_width, target_height, FilterType::Triangle)
    };

    let mut png = Vec::new();
    DynamicImage::ImageRgba8(resized.to_rgba8())
        .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
        .map_err(|err| IconError::Encode(err.to_string()))?;

    Ok(png)
}

pub fn png_data_uri(png: &[u8]) -> String {
    format!("{}{}", PNG_DATA_URI_PREFIX, STANDARD.encode(png))
}
