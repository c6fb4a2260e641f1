/// Tab Link Copier - Chrome Extension that copies every tab in a window as a link list
/// Built with Rust + WASM

mod browser;
pub mod copier;
pub mod error;
pub mod favicon;
pub mod formatter;
pub mod issue_key;
pub mod options;
pub mod tab_data;

use log::error;
use wasm_bindgen::prelude::*;

use crate::browser::{BrowserFetcher, ChromeTabs};
use crate::favicon::FaviconResolver;
use crate::options::CopyOptions;
use crate::tab_data::{RawTab, ResolvedTabEntry};

// Set up panic hook for better error messages in the browser console
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());
}

/// Toolbar button handler: copy every tab of the clicked tab's window
///
/// Failures are logged and swallowed; the clipboard is left untouched.
#[wasm_bindgen]
pub async fn copy_all_links(tab: JsValue, options: JsValue) {
    let options = parse_options(options);

    let activation: RawTab = match serde_wasm_bindgen::from_value(tab) {
        Ok(tab) => tab,
        Err(e) => {
            error!("No active tab to copy from: {:?}", e);
            return;
        }
    };

    let resolver = FaviconResolver::new(BrowserFetcher, &options);
    if let Err(e) = copier::copy_window_links(&ChromeTabs, &resolver, &activation, &options).await {
        error!("Copy aborted: {}", e);
    }
}

pub fn parse_options(options: JsValue) -> CopyOptions {
    let parsed = if options.is_null() || options.is_undefined() {
        None
    } else {
        Some(serde_wasm_bindgen::from_value(options))
    };

    CopyOptions::from_parsed(parsed)
}

// Re-export the formatter for JavaScript access
#[wasm_bindgen]
pub fn format_tab_list(entries: JsValue) -> Result<JsValue, JsValue> {
    let entries: Vec<ResolvedTabEntry> = serde_wasm_bindgen::from_value(entries)
        .map_err(|e| JsValue::from_str(&format!("Failed to parse entries: {:?}", e)))?;

    let payload = formatter::format_list(&entries).map_err(|e| JsValue::from_str(&e.to_string()))?;

    serde_wasm_bindgen::to_value(&payload).map_err(|e| JsValue::from_str(&format!("{:?}", e)))
}

#[wasm_bindgen]
pub fn detect_issue_key(url: &str, title: Option<String>) -> Option<String> {
    issue_key::detect_issue_key(url, title.as_deref())
}
