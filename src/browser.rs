/// Browser implementations of the workflow's collaborators

use js_sys::Uint8Array;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    RequestCache, RequestCredentials, RequestInit, RequestRedirect, Response, Window,
    WorkerGlobalScope,
};

use crate::copier::TabHost;
use crate::error::{CopyError, IconError};
use crate::favicon::IconFetcher;
use crate::tab_data::{ClipboardMode, LinkPayload, RawTab};

// Import JS bridge functions
#[wasm_bindgen(module = "/js/bridge.js")]
extern "C" {
    #[wasm_bindgen(catch)]
    async fn queryWindowTabs(window_id: i32) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn writeClipboardInTab(tab_id: i32, html: &str, text: &str) -> Result<JsValue, JsValue>;
}

/// `chrome.tabs` + `chrome.scripting`
pub struct ChromeTabs;

impl TabHost for ChromeTabs {
    async fn query_tabs(&self, window_id: i32) -> Result<Vec<RawTab>, CopyError> {
        let tabs_js = queryWindowTabs(window_id)
            .await
            .map_err(|e| CopyError::TabQuery(format!("{:?}", e)))?;

        serde_wasm_bindgen::from_value(tabs_js)
            .map_err(|e| CopyError::TabQuery(format!("Failed to parse tabs: {:?}", e)))
    }

    async fn write_clipboard(
        &self,
        tab_id: i32,
        payload: &LinkPayload,
    ) -> Result<ClipboardMode, CopyError> {
        let report = writeClipboardInTab(tab_id, &payload.html, &payload.text)
            .await
            .map_err(|e| CopyError::ClipboardWrite(format!("{:?}", e)))?;

        ClipboardMode::from_report(report.as_string().as_deref())
    }
}

/// `fetch` from the service worker (or a window, when run from a page)
///
/// Credentials are never sent; the HTTP cache and redirects behave as usual.
pub struct BrowserFetcher;

impl IconFetcher for BrowserFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, IconError> {
        let init = RequestInit::new();
        init.set_credentials(RequestCredentials::Omit);
        init.set_cache(RequestCache::Default);
        init.set_redirect(RequestRedirect::Follow);

        let global = js_sys::global();
        let promise = if let Some(scope) = global.dyn_ref::<WorkerGlobalScope>() {
            scope.fetch_with_str_and_init(url, &init)
        } else if let Some(window) = global.dyn_ref::<Window>() {
            window.fetch_with_str_and_init(url, &init)
        } else {
            return Err(IconError::Fetch("fetch is unavailable in this context".to_string()));
        };

        let response: Response = JsFuture::from(promise)
            .await
            .map_err(|e| IconError::Fetch(format!("{:?}", e)))?
            .dyn_into()
            .map_err(|e| IconError::Fetch(format!("not a Response: {:?}", e)))?;

        if !response.ok() {
            return Err(IconError::Status(response.status()));
        }

        let body = response
            .array_buffer()
            .map_err(|e| IconError::Fetch(format!("{:?}", e)))?;
        let buffer = JsFuture::from(body)
            .await
            .map_err(|e| IconError::Fetch(format!("{:?}", e)))?;

        Ok(Uint8Array::new(&buffer).to_vec())
    }
}
