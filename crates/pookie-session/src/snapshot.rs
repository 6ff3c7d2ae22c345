//! Snapshot encoding
//!
//! The persisted record is:
//! ```text
//! { "tabs": [Tab], "activeId": string|null, "sidebarWidth": number, "theme": "dark"|"light"|"frosted" }
//! ```
//! Decoding is field by field. Whatever is missing or malformed takes the
//! value from a defaults session, so a decoded session always satisfies the
//! session invariants.

use serde::Serialize;
use serde_json::{Map, Value};

use pookie_tabs::Tab;

use crate::session::Session;
use crate::theme::Theme;

/// Storage slot holding the session snapshot.
pub const SNAPSHOT_KEY: &str = "pookie.tabs.v1";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SnapshotRecord<'a> {
    tabs: &'a [Tab],
    active_id: Option<&'a str>,
    sidebar_width: u32,
    theme: Theme,
}

/// Serialize the persisted fields of `session`.
pub fn encode_snapshot(session: &Session) -> serde_json::Result<String> {
    serde_json::to_string(&SnapshotRecord {
        tabs: &session.tabs,
        active_id: session.active_id.as_deref(),
        sidebar_width: session.sidebar_width,
        theme: session.theme,
    })
}

/// Rebuild a session from a stored snapshot.
///
/// Returns `None` when `raw` is not JSON or is `null`; the caller keeps what
/// it has. Any other non-object root decodes as an empty record. `use_webview` is carried over from `defaults`.
pub fn decode_snapshot(raw: &str, defaults: &Session) -> Option<Session> {
    let value: Value = match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(e) => {
            tracing::debug!(error = %e, "Snapshot is not valid JSON");
            return None;
        }
    };

    let empty = Map::new();
    let record = match &value {
        Value::Object(record) => record,
        Value::Null => {
            tracing::debug!("Snapshot is null");
            return None;
        }
        _ => {
            tracing::debug!("Snapshot is not a JSON object, using defaults");
            &empty
        }
    };

    let tabs = decode_tabs(record).unwrap_or_else(|| {
        tracing::debug!("Snapshot has no usable tabs, using defaults");
        defaults.tabs.clone()
    });

    let active_id = record
        .get("activeId")
        .and_then(Value::as_str)
        .filter(|id| tabs.iter().any(|t| t.id == *id))
        .map(str::to_string)
        .or_else(|| tabs.first().map(|t| t.id.clone()));

    let sidebar_width = record
        .get("sidebarWidth")
        .and_then(Value::as_f64)
        .filter(|w| w.is_finite())
        .map(|w| Session::clamp_sidebar_width(w.round() as i64))
        .unwrap_or(defaults.sidebar_width);

    let theme = record
        .get("theme")
        .and_then(Value::as_str)
        .and_then(|t| t.parse::<Theme>().ok())
        .unwrap_or(defaults.theme);

    Some(Session {
        tabs,
        active_id,
        sidebar_width,
        theme,
        use_webview: defaults.use_webview,
    })
}

/// Usable tab entries in stored order. Malformed entries, empty ids and
/// repeated ids are dropped. `None` if nothing usable remains.
fn decode_tabs(record: &Map<String, Value>) -> Option<Vec<Tab>> {
    let entries = record.get("tabs")?.as_array()?;

    let mut tabs: Vec<Tab> = Vec::with_capacity(entries.len());
    for entry in entries {
        match serde_json::from_value::<Tab>(entry.clone()) {
            Ok(tab) if tab.id.is_empty() => {
                tracing::debug!("Dropping stored tab without id");
            }
            Ok(tab) if tabs.iter().any(|t| t.id == tab.id) => {
                tracing::debug!(tab_id = %tab.id, "Dropping stored tab with repeated id");
            }
            Ok(tab) => tabs.push(tab),
            Err(e) => {
                tracing::debug!(error = %e, "Dropping malformed stored tab");
            }
        }
    }

    if tabs.is_empty() {
        None
    } else {
        Some(tabs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pookie_tabs::{NewTab, HOME_URL};
    use serde_json::json;

    fn tab_json(id: &str, url: &str) -> Value {
        json!({ "id": id, "title": id, "url": url, "favicon": null, "incognito": false })
    }

    #[test]
    fn test_encode_field_names() {
        let session = Session::default();
        let value: Value = serde_json::from_str(&encode_snapshot(&session).unwrap()).unwrap();

        assert_eq!(value["activeId"], json!(session.active_id));
        assert_eq!(value["sidebarWidth"], 280);
        assert_eq!(value["theme"], "dark");
        assert_eq!(value["tabs"][0]["url"], HOME_URL);
        assert!(value.get("useWebview").is_none());
    }

    #[test]
    fn test_round_trip() {
        let mut session = Session::default();
        let mut tab = Tab::new(NewTab::default().with_url("https://example.com").incognito(true));
        tab.favicon = Some("https://example.com/favicon.ico".to_string());
        let id = session.push_active(tab);
        session.sidebar_width = 333;
        session.theme = Theme::Frosted;

        let raw = encode_snapshot(&session).unwrap();
        let restored = decode_snapshot(&raw, &Session::default()).unwrap();

        assert_eq!(restored.tabs, session.tabs);
        assert_eq!(restored.active_id.as_deref(), Some(id.as_str()));
        assert_eq!(restored.sidebar_width, 333);
        assert_eq!(restored.theme, Theme::Frosted);
    }

    #[test]
    fn test_unparsable_is_rejected() {
        let defaults = Session::default();
        assert!(decode_snapshot("{not json", &defaults).is_none());
        assert!(decode_snapshot("null", &defaults).is_none());
    }

    #[test]
    fn test_non_object_root_decodes_as_defaults() {
        let defaults = Session::default();

        for raw in ["[1,2,3]", r#""x""#, "42", "true"] {
            let restored = decode_snapshot(raw, &defaults).unwrap();
            assert_eq!(restored, defaults, "{}", raw);
        }
    }

    #[test]
    fn test_empty_or_missing_tabs_use_defaults() {
        let defaults = Session::default();

        for raw in [r#"{"tabs":[]}"#, r#"{}"#, r#"{"tabs":"nope"}"#] {
            let restored = decode_snapshot(raw, &defaults).unwrap();
            assert_eq!(restored.tabs, defaults.tabs);
            assert_eq!(restored.active_id, defaults.active_id);
            assert!(restored.is_consistent());
        }
    }

    #[test]
    fn test_unknown_active_id_falls_back_to_first() {
        let raw = json!({
            "tabs": [tab_json("a", "https://a.test"), tab_json("b", "https://b.test")],
            "activeId": "zzz",
        })
        .to_string();

        let restored = decode_snapshot(&raw, &Session::default()).unwrap();
        assert_eq!(restored.active_id.as_deref(), Some("a"));

        let raw = json!({ "tabs": [tab_json("a", "https://a.test")], "activeId": 7 }).to_string();
        let restored = decode_snapshot(&raw, &Session::default()).unwrap();
        assert_eq!(restored.active_id.as_deref(), Some("a"));
    }

    #[test]
    fn test_bad_entries_are_dropped() {
        let raw = json!({
            "tabs": [
                tab_json("a", "https://a.test"),
                { "id": "b" },
                tab_json("a", "https://dup.test"),
                tab_json("", "https://blank.test"),
                { "id": "c", "title": "C", "url": "https://c.test" },
            ],
            "activeId": "c",
        })
        .to_string();

        let restored = decode_snapshot(&raw, &Session::default()).unwrap();
        let ids: Vec<&str> = restored.tabs.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
        assert_eq!(restored.tabs[0].url, "https://a.test");
        assert_eq!(restored.active_id.as_deref(), Some("c"));
        assert!(restored.is_consistent());
    }

    #[test]
    fn test_scalar_fields_fall_back_or_clamp() {
        let defaults = Session::default();

        let raw = json!({ "sidebarWidth": "wide", "theme": "neon" }).to_string();
        let restored = decode_snapshot(&raw, &defaults).unwrap();
        assert_eq!(restored.sidebar_width, defaults.sidebar_width);
        assert_eq!(restored.theme, Theme::Dark);

        let raw = json!({ "sidebarWidth": 9000, "theme": "light" }).to_string();
        let restored = decode_snapshot(&raw, &defaults).unwrap();
        assert_eq!(restored.sidebar_width, 420);
        assert_eq!(restored.theme, Theme::Light);

        let raw = json!({ "sidebarWidth": 250.6 }).to_string();
        assert_eq!(decode_snapshot(&raw, &defaults).unwrap().sidebar_width, 251);
    }

    #[test]
    fn test_use_webview_comes_from_defaults() {
        let defaults = Session::new(true);
        let restored = decode_snapshot("{}", &defaults).unwrap();
        assert!(restored.use_webview);
    }
}
