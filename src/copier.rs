/// The copy workflow: activation → tabs → icons → payload → clipboard

use log::info;

use crate::error::CopyError;
use crate::favicon::{FaviconResolver, IconFetcher};
use crate::formatter::format_list;
use crate::options::CopyOptions;
use crate::tab_data::{
    ActivationContext, ClipboardMode, LinkPayload, RawTab, ResolvedTabEntry, capture_entries,
};

/// The browser-side collaborators the workflow needs
#[allow(async_fn_in_trait)]
pub trait TabHost {
    /// Every tab in the given window, in tab-strip order
    async fn query_tabs(&self, window_id: i32) -> Result<Vec<RawTab>, CopyError>;

    /// Write both renderings from within the given tab's page
    async fn write_clipboard(
        &self,
        tab_id: i32,
        payload: &LinkPayload,
    ) -> Result<ClipboardMode, CopyError>;
}

/// Copy every tab in the activated window to the clipboard
///
/// Nothing is written unless every step before the clipboard write
/// succeeded. Icon failures never abort the copy.
pub async fn copy_window_links<H, F>(
    host: &H,
    resolver: &FaviconResolver<F>,
    activation: &RawTab,
    options: &CopyOptions,
) -> Result<ClipboardMode, CopyError>
where
    H: TabHost,
    F: IconFetcher,
{
    let context = ActivationContext::from_tab(activation)?;

    let tabs = host.query_tabs(context.window_id).await?;
    let entries = capture_entries(tabs);
    if entries.is_empty() {
        return Err(CopyError::EmptyInput);
    }

    let resolved = if options.include_favicons {
        resolver.resolve_all(entries).await
    } else {
        entries.into_iter().map(ResolvedTabEntry::without_icon).collect()
    };

    let payload = format_list(&resolved)?;
    let mode = host.write_clipboard(context.tab_id, &payload).await?;

    info!(
        "Copied {} links from window {} ({:?})",
        resolved.len(),
        context.window_id,
        mode
    );
    Ok(mode)
}
