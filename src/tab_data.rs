/// Data structures for Tab Link Copier
use serde::{Deserialize, Serialize};

use crate::error::CopyError;

/// Chrome's sentinel for "not a real tab" (`chrome.tabs.TAB_ID_NONE`)
pub const TAB_ID_NONE: i32 = -1;

/// A tab as reported by `chrome.tabs.query` or `chrome.action.onClicked`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RawTab {
    #[serde(default)]
    pub id: Option<i32>,
    #[serde(default)]
    pub window_id: Option<i32>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub pending_url: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub fav_icon_url: Option<String>,
}

impl RawTab {
    /// The committed URL, or the pending one while the tab is still loading
    pub fn usable_url(&self) -> Option<&str> {
        non_empty(self.url.as_deref()).or_else(|| non_empty(self.pending_url.as_deref()))
    }

    /// Capture the tab for copying; tabs without any URL yield `None`
    pub fn into_entry(self) -> Option<TabEntry> {
        let url = self.usable_url()?.to_string();
        let icon_sources = non_empty(self.fav_icon_url.as_deref())
            .map(|icon| vec![icon.to_string()])
            .unwrap_or_default();

        Some(TabEntry {
            title: self.title.unwrap_or_default(),
            url,
            icon_sources,
        })
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Capture every tab that has a URL, keeping window order
pub fn capture_entries(tabs: Vec<RawTab>) -> Vec<TabEntry> {
    tabs.into_iter().filter_map(RawTab::into_entry).collect()
}

/// The tab and window an activation refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivationContext {
    pub tab_id: i32,
    pub window_id: i32,
}

impl ActivationContext {
    pub fn from_tab(tab: &RawTab) -> Result<ActivationContext, CopyError> {
        let tab_id = match tab.id {
            Some(id) if id != TAB_ID_NONE => id,
            _ => return Err(CopyError::NoActiveTab),
        };
        let window_id = tab.window_id.ok_or(CopyError::NoWindow)?;

        Ok(ActivationContext { tab_id, window_id })
    }
}

/// A tab captured for one copy invocation
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TabEntry {
    #[serde(default)]
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub icon_sources: Vec<String>,
}

impl TabEntry {
    pub fn new(title: &str, url: &str) -> TabEntry {
        TabEntry {
            title: title.to_string(),
            url: url.to_string(),
            icon_sources: Vec::new(),
        }
    }
}

/// A captured tab plus its inline icon, if one could be resolved
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedTabEntry {
    #[serde(flatten)]
    pub tab: TabEntry,
    #[serde(default, alias = "faviconDataUri")]
    pub icon_image: Option<String>,
}

impl ResolvedTabEntry {
    pub fn new(tab: TabEntry, icon_image: Option<String>) -> ResolvedTabEntry {
        ResolvedTabEntry { tab, icon_image }
    }

    pub fn without_icon(tab: TabEntry) -> ResolvedTabEntry {
        ResolvedTabEntry::new(tab, None)
    }
}

/// The two clipboard renderings of a tab list
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct LinkPayload {
    pub html: String,
    pub text: String,
}

/// Which clipboard path the page ended up using
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipboardMode {
    Rich,
    PlainText,
}

impl ClipboardMode {
    /// Interpret the report returned by the injected clipboard writer
    pub fn from_report(report: Option<&str>) -> Result<ClipboardMode, CopyError> {
        match report {
            Some("rich") => Ok(ClipboardMode::Rich),
            Some("plain") => Ok(ClipboardMode::PlainText),
            Some("unavailable") => Err(CopyError::ClipboardUnavailable),
            other => Err(CopyError::ClipboardWrite(format!(
                "unexpected clipboard report: {:?}",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_tab(url: Option<&str>, pending_url: Option<&str>, title: Option<&str>) -> RawTab {
        RawTab {
            id: Some(7),
            window_id: Some(1),
            url: url.map(str::to_string),
            pending_url: pending_url.map(str::to_string),
            title: title.map(str::to_string),
            fav_icon_url: None,
        }
    }

    #[test]
    fn test_usable_url_prefers_committed_url() {
        let tab = raw_tab(Some("https://a.example"), Some("https://b.example"), None);
        assert_eq!(tab.usable_url(), Some("https://a.example"));
    }

    #[test]
    fn test_usable_url_falls_back_to_pending() {
        let tab = raw_tab(Some(""), Some("https://b.example"), None);
        assert_eq!(tab.usable_url(), Some("https://b.example"));

        let tab = raw_tab(None, None, Some("Loading"));
        assert_eq!(tab.usable_url(), None);
    }

    #[test]
    fn test_capture_entries_drops_tabs_without_url() {
        let mut with_icon = raw_tab(Some("https://a.example"), None, Some("A"));
        with_icon.fav_icon_url = Some("https://a.example/icon.png".to_string());

        let tabs = vec![
            with_icon,
            raw_tab(None, None, Some("Blank")),
            raw_tab(None, Some("https://c.example"), None),
        ];

        let entries = capture_entries(tabs);

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].title, "A");
        assert_eq!(entries[0].icon_sources, vec!["https://a.example/icon.png"]);
        assert_eq!(entries[1].url, "https://c.example");
        assert_eq!(entries[1].title, "");
        assert!(entries[1].icon_sources.is_empty());
    }

    #[test]
    fn test_activation_context() {
        let tab = raw_tab(Some("https://a.example"), None, None);
        assert_eq!(
            ActivationContext::from_tab(&tab),
            Ok(ActivationContext { tab_id: 7, window_id: 1 })
        );
    }

    #[test]
    fn test_activation_context_errors() {
        let mut tab = raw_tab(Some("https://a.example"), None, None);
        tab.id = Some(TAB_ID_NONE);
        assert_eq!(ActivationContext::from_tab(&tab), Err(CopyError::NoActiveTab));

        tab.id = None;
        assert_eq!(ActivationContext::from_tab(&tab), Err(CopyError::NoActiveTab));

        tab.id = Some(3);
        tab.window_id = None;
        assert_eq!(ActivationContext::from_tab(&tab), Err(CopyError::NoWindow));
    }

    #[test]
    fn test_clipboard_report() {
        assert_eq!(ClipboardMode::from_report(Some("rich")), Ok(ClipboardMode::Rich));
        assert_eq!(ClipboardMode::from_report(Some("plain")), Ok(ClipboardMode::PlainText));
        assert_eq!(
            ClipboardMode::from_report(Some("unavailable")),
            Err(CopyError::ClipboardUnavailable)
        );
        assert!(matches!(
            ClipboardMode::from_report(None),
            Err(CopyError::ClipboardWrite(_))
        ));
    }

    #[test]
    fn test_deserialize_chrome_tab() {
        let json = concat!(
            r#"{"id":4,"windowId":2,"pendingUrl":"https://x.example","#,
            r#""title":"X","favIconUrl":"","active":true}"#
        );
        let tab: RawTab = serde_json::from_str(json).unwrap();

        assert_eq!(tab.id, Some(4));
        assert_eq!(tab.window_id, Some(2));
        assert_eq!(tab.usable_url(), Some("https://x.example"));

        let entry = tab.into_entry().unwrap();
        assert!(entry.icon_sources.is_empty());
    }

    #[test]
    fn test_resolved_entry_accepts_favicon_alias() {
        let json = concat!(
            r#"{"title":"T","url":"https://t.example","#,
            r#""faviconDataUri":"data:image/png;base64,AAA"}"#
        );
        let entry: ResolvedTabEntry = serde_json::from_str(json).unwrap();

        assert_eq!(entry.tab.url, "https://t.example");
        assert_eq!(entry.icon_image.as_deref(), Some("data:image/png;base64,AAA"));
    }
}
