use anyhow::{Context, Result, anyhow};
use serde::Deserialize;
use serde_json::Value;

use super::record::SessionRecord;

#[derive(Deserialize)]
struct SessionEnvelope {
    sessions: Vec<SessionRecord>,
}

/// Accepts either a bare array of records or `{"sessions": [...]}`.
pub(super) fn parse_sessions(raw: &str) -> Result<Vec<SessionRecord>> {
    let parsed: Value = serde_json::from_str(raw).context("invalid JSON in session list")?;

    let is_envelope = parsed
        .as_object()
        .is_some_and(|object| object.contains_key("sessions"));

    let records = if parsed.is_array() {
        Vec::<SessionRecord>::deserialize(parsed)
            .context("invalid session entry in session list")?
    } else if is_envelope {
        SessionEnvelope::deserialize(parsed)
            .context("invalid session entry in session list")?
            .sessions
    } else {
        return Err(anyhow!(
            "unexpected JSON shape; expected an array of sessions or a `sessions` field"
        ));
    };

    Ok(dedup_by_id(records))
}

fn dedup_by_id(records: Vec<SessionRecord>) -> Vec<SessionRecord> {
    let mut seen = std::collections::HashSet::with_capacity(records.len());
    let total = records.len();
    let unique = records
        .into_iter()
        .filter(|record| seen.insert(record.id.clone()))
        .collect::<Vec<_>>();

    if unique.len() != total {
        tracing::warn!(
            dropped = total - unique.len(),
            "session list contained duplicate ids; keeping the first of each"
        );
    }

    unique
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bare_array_with_defaults() {
        let raw = r#"[
            {"id": "s1", "name": "Physics", "nodeCount": 3,
             "stats": {"documents": 2, "textNodes": 1, "images": 0, "websites": 0, "totalWords": 540},
             "lastModified": 1700000000000},
            {"id": "s2", "name": "Recipes"}
        ]"#;

        let records = parse_sessions(raw).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].node_count, 3);
        assert_eq!(records[0].stats.total_words, 540);
        assert_eq!(records[0].last_modified, 1_700_000_000_000);
        assert_eq!(records[1].description, None);
        assert_eq!(records[1].node_count, 0);
        assert_eq!(records[1].stats.documents, 0);
    }

    #[test]
    fn parses_sessions_envelope() {
        let raw = r#"{"sessions": [{"id": "a", "name": "A", "description": "notes"}]}"#;
        let records = parse_sessions(raw).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].description.as_deref(), Some("notes"));
    }

    #[test]
    fn rejects_unexpected_shapes() {
        assert!(parse_sessions("42").is_err());
        assert!(parse_sessions(r#"{"items": []}"#).is_err());
        assert!(parse_sessions(r#"[{"name": "missing id"}]"#).is_err());
        assert!(parse_sessions("not json").is_err());
    }

    #[test]
    fn duplicate_ids_keep_first_entry() {
        let raw = r#"[{"id": "a", "name": "first"}, {"id": "a", "name": "second"}]"#;
        let records = parse_sessions(raw).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "first");
    }
}
