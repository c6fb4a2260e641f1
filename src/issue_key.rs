/// Issue-tracker key detection and title cleanup
use std::sync::LazyLock;

use regex::Regex;
use url::Url;

// ASCII word boundaries: keys glued to CJK or accented text still match.
static ISSUE_KEY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?-u:\b)([A-Z]{2,10}-[0-9]{1,6})(?-u:\b)")
        .expect("issue key regex should compile")
});

static JIRA_LABEL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(^|\.)jira\.").expect("jira host regex should compile"));

static BRANDING_SUFFIX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\s*[-|:]?\s*Jira.*$").expect("branding regex should compile")
});

/// Whether a hostname looks like an issue tracker
///
/// Matches self-hosted instances (`jira.example.com`, `tools.jira.corp`)
/// and Atlassian cloud sites (`company.atlassian.net`).
pub fn is_tracker_host(host: &str) -> bool {
    let host = host.to_ascii_lowercase();
    JIRA_LABEL_RE.is_match(&host) || host == "atlassian.net" || host.ends_with(".atlassian.net")
}

/// Find the issue key a link refers to
///
/// Algorithm:
/// 1. If the URL parses and its host passes `is_tracker_host`, search the
///    path, then every decoded query value joined by spaces
/// 2. Otherwise, if a title is supplied, search its upper-cased form
/// 3. Else there is no key
///
/// Only pass a title the tab actually had. A title that defaulted to the
/// URL would turn every `/WORD-123` path on any host into a key.
///
/// Examples:
/// - https://jira.internal.example.com/browse/OPS-42 → OPS-42
/// - https://jira.example.com/issues/?selectedIssue=OPS-77 → OPS-77
/// - https://wiki.example.com/page + "[OPS-100] Spec" → OPS-100
/// - https://wiki.example.com/OPS-99 with no title → none
pub fn detect_issue_key(url: &str, title: Option<&str>) -> Option<String> {
    if let Some(key) = Url::parse(url).ok().and_then(|parsed| key_from_tracker_url(&parsed)) {
        return Some(key);
    }

    title
        .filter(|t| !t.is_empty())
        .and_then(|t| find_key(&t.to_uppercase()))
}

fn key_from_tracker_url(parsed: &Url) -> Option<String> {
    if !is_tracker_host(parsed.host_str()?) {
        return None;
    }

    if let Some(key) = find_key(parsed.path()) {
        return Some(key);
    }

    if parsed.query().is_some_and(|q| !q.is_empty()) {
        let values: Vec<String> = parsed
            .query_pairs()
            .map(|(_, value)| value.into_owned())
            .collect();
        return find_key(&values.join(" "));
    }

    None
}

fn find_key(haystack: &str) -> Option<String> {
    ISSUE_KEY_RE
        .captures(haystack)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Strip tracker branding and the leading key from a page title
///
/// "OPS-55 Improve logging" → "Improve logging"
/// "[OPS-55] Improve logging - Jira" → "Improve logging"
pub fn normalize_title(title: &str, key: &str) -> String {
    if title.is_empty() {
        return String::new();
    }

    let cleaned = BRANDING_SUFFIX_RE.replace(title, "");

    let key_prefix = format!(r"(?i)^\s*\[?{}\]?\s*[-:|]?\s*", regex::escape(key));
    let cleaned = match Regex::new(&key_prefix) {
        Ok(re) => re.replace(&cleaned, "").into_owned(),
        Err(_) => cleaned.into_owned(),
    };

    cleaned.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_from_data_center_path() {
        let url = "https://jira.internal.example.com/browse/OPS-42";
        assert_eq!(detect_issue_key(url, Some("Some Title")), Some("OPS-42".to_string()));
    }

    #[test]
    fn test_key_from_query_parameter() {
        let url = "https://jira.example.com/issues/?selectedIssue=OPS-77";
        assert_eq!(detect_issue_key(url, Some("Some Title")), Some("OPS-77".to_string()));
    }

    #[test]
    fn test_key_from_cloud_host_ignores_title() {
        let url = "https://company.atlassian.net/browse/OPS-55";
        assert_eq!(detect_issue_key(url, Some("ABC-1 unrelated")), Some("OPS-55".to_string()));
        assert_eq!(detect_issue_key(url, None), Some("OPS-55".to_string()));
    }

    #[test]
    fn test_non_tracker_host_without_title() {
        let url = "https://wiki.example.com/OPS-99";
        assert_eq!(detect_issue_key(url, None), None);
        assert_eq!(detect_issue_key(url, Some("")), None);
    }

    #[test]
    fn test_explicit_title_on_non_tracker_host() {
        let url = "https://wiki.example.com/page";
        assert_eq!(detect_issue_key(url, Some("[OPS-100] Spec")), Some("OPS-100".to_string()));
        assert_eq!(detect_issue_key(url, Some("ops-101 lower case")), Some("OPS-101".to_string()));
    }

    #[test]
    fn test_key_next_to_non_ascii_text() {
        let url = "https://wiki.example.com/page";
        let expected = Some("OPS-12".to_string());

        assert_eq!(detect_issue_key(url, Some("課題OPS-12 ログ改善")), expected);
        assert_eq!(detect_issue_key(url, Some("éOPS-12 fix")), expected);
        assert_eq!(detect_issue_key(url, Some("OPS-12ä fix")), expected);
        assert_eq!(detect_issue_key(url, Some("1OPS-12 fix")), None);
    }

    #[test]
    fn test_tracker_host_without_key_falls_back_to_title() {
        let url = "https://jira.example.com/secure/Dashboard.jspa";
        assert_eq!(detect_issue_key(url, Some("Board")), None);
        assert_eq!(detect_issue_key(url, Some("DEV-9 board")), Some("DEV-9".to_string()));
    }

    #[test]
    fn test_unparseable_url_uses_title_only() {
        assert_eq!(detect_issue_key("not a url OPS-1", None), None);
        assert_eq!(detect_issue_key("not a url", Some("OPS-1 thing")), Some("OPS-1".to_string()));
    }

    #[test]
    fn test_key_pattern_bounds() {
        let url = "https://wiki.example.com/page";
        assert_eq!(detect_issue_key(url, Some("A-1")), None);
        assert_eq!(detect_issue_key(url, Some("ABCDEFGHIJK-1")), None);
        assert_eq!(detect_issue_key(url, Some("OPS-1234567")), None);
    }

    #[test]
    fn test_is_tracker_host() {
        assert!(is_tracker_host("jira.example.com"));
        assert!(is_tracker_host("tools.jira.corp.net"));
        assert!(is_tracker_host("JIRA.Example.com"));
        assert!(is_tracker_host("company.atlassian.net"));
        assert!(is_tracker_host("atlassian.net"));
        assert!(!is_tracker_host("notjira.example.com"));
        assert!(!is_tracker_host("atlassian.net.evil.com"));
        assert!(!is_tracker_host("wiki.example.com"));
    }

    #[test]
    fn test_normalize_title() {
        assert_eq!(normalize_title("OPS-55 Improve logging", "OPS-55"), "Improve logging");
        assert_eq!(normalize_title("[OPS-55] Improve logging - Jira", "OPS-55"), "Improve logging");
        assert_eq!(
            normalize_title("ops-55: Improve logging | JIRA Cloud", "OPS-55"),
            "Improve logging"
        );
        assert_eq!(normalize_title("Improve logging", "OPS-55"), "Improve logging");
    }

    #[test]
    fn test_normalize_title_empty_remainder() {
        assert_eq!(normalize_title("OPS-55", "OPS-55"), "");
        assert_eq!(normalize_title("[OPS-55] - Jira", "OPS-55"), "");
        assert_eq!(normalize_title("", "OPS-55"), "");
    }
}
