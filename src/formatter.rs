/// Link list formatting: HTML and plain-text renderings of a tab list

use crate::error::CopyError;
use crate::issue_key::{detect_issue_key, normalize_title};
use crate::tab_data::{LinkPayload, ResolvedTabEntry};

const ICON_STYLE: &str = "width:16px;height:16px;vertical-align:middle;margin-right:6px;";

/// Render every entry as a list item and a text line, in input order
///
/// Entries without a URL are skipped. Fails with `EmptyInput` when none
/// are left.
pub fn format_list(entries: &[ResolvedTabEntry]) -> Result<LinkPayload, CopyError> {
    let mut html_items = Vec::new();
    let mut text_items = Vec::new();

    for entry in entries.iter().filter(|e| !e.tab.url.is_empty()) {
        let url = entry.tab.url.as_str();
        let trimmed = entry.tab.title.trim();
        let title = if trimmed.is_empty() { url } else { trimmed };
        let title_is_explicit = !trimmed.is_empty() && !echoes_url(trimmed, url);

        let link = format_link(title, url, title_is_explicit);
        let icon = entry
            .icon_image
            .as_deref()
            .filter(|src| !src.is_empty())
            .map(icon_html)
            .unwrap_or_default();

        html_items.push(format!("<li>{}{}</li>", icon, link.html));
        text_items.push(link.text);
    }

    if html_items.is_empty() {
        return Err(CopyError::EmptyInput);
    }

    Ok(LinkPayload {
        html: format!("<ul>{}</ul>", html_items.concat()),
        text: text_items.join("\n"),
    })
}

/// Render a single link
///
/// `title_is_explicit` must be false when `title` is only a stand-in for
/// the URL; title-based key detection is skipped in that case.
pub fn format_link(title: &str, url: &str, title_is_explicit: bool) -> LinkPayload {
    let href = escape_attribute(url);
    let title_hint = if title_is_explicit { Some(title) } else { None };

    match detect_issue_key(url, title_hint) {
        Some(key) => {
            let remainder = if title_is_explicit {
                normalize_title(title, &key)
            } else {
                String::new()
            };

            if remainder.is_empty() {
                LinkPayload {
                    html: format!(r#"<a href="{}">{}</a>"#, href, escape_html(&key)),
                    text: format!("{} ({})", key, url),
                }
            } else {
                LinkPayload {
                    html: format!(
                        r#"<a href="{}">{}</a> {}"#,
                        href,
                        escape_html(&key),
                        escape_html(&remainder)
                    ),
                    text: format!("{} {} ({})", key, remainder, url),
                }
            }
        }
        None => LinkPayload {
            html: format!(r#"<a href="{}">{}</a>"#, href, escape_html(title)),
            text: format!("{} ({})", title, url),
        },
    }
}

/// Chrome titles untitled pages with their URL, sometimes without the scheme
fn echoes_url(title: &str, url: &str) -> bool {
    let bare = url.split_once("://").map_or(url, |(_, rest)| rest);
    [url, bare]
        .iter()
        .any(|candidate| title == *candidate || title == candidate.trim_end_matches('/'))
}

fn icon_html(src: &str) -> String {
    format!(
        r#"<img src="{}" alt="" style="{}">"#,
        escape_attribute(src),
        ICON_STYLE
    )
}

/// Escape text content for an HTML body
pub fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Escape a double-quoted attribute value (quotes only)
pub fn escape_attribute(value: &str) -> String {
    value.replace('"', "&quot;").replace('\'', "&#39;")
}
