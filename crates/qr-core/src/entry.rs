//! Entry type definitions

use chrono::{DateTime, SubsecRound, Utc};
use rand::Rng;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

use crate::document::URL_DOCUMENT_TYPE;

/// Prefix of every generated entry id
pub const ID_PREFIX: &str = "QR-";

/// Number of random characters after the prefix
pub const ID_RANDOM_LEN: usize = 9;

const ID_ALPHABET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// A QR code and the document it points at
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    /// Opaque id, `QR-` followed by 9 uppercase base36 characters
    #[serde(default, deserialize_with = "null_as_empty")]
    pub id: String,

    /// Free-text label (may be empty)
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,

    /// External URL or inlined `data:` URI
    #[serde(default)]
    pub document_url: Option<String>,

    /// MIME type of an attached file, or `"url"` for an external link
    #[serde(default)]
    pub document_type: Option<String>,

    /// Creation timestamp, millisecond precision
    #[serde(default, with = "iso_millis")]
    pub created_at: Option<DateTime<Utc>>,

    /// Fields this version does not know about, kept as-is
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Entry {
    /// Create a new entry with a fresh id, empty title and no document
    pub fn new() -> Self {
        Self {
            id: generate_id(),
            title: String::new(),
            document_url: None,
            document_type: None,
            created_at: Some(Utc::now().trunc_subsecs(3)),
            extra: Map::new(),
        }
    }

    /// Point this entry at an external URL
    pub fn link_url(&mut self, url: impl Into<String>) {
        self.document_url = Some(url.into());
        self.document_type = Some(URL_DOCUMENT_TYPE.to_string());
    }

    /// Attach an inlined document
    pub fn attach_data_uri(&mut self, data_uri: String, mime: String) {
        self.document_url = Some(data_uri);
        self.document_type = Some(mime);
    }

    /// Whether the document is an external link
    pub fn is_link(&self) -> bool {
        self.document_type.as_deref() == Some(URL_DOCUMENT_TYPE)
    }

    /// Whether any document is linked
    pub fn has_document(&self) -> bool {
        self.document_url.as_deref().is_some_and(|url| !url.is_empty())
    }
}

impl Default for Entry {
    fn default() -> Self {
        Self::new()
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Timestamps as `2024-03-01T12:30:00.000Z`, the form browsers write
mod iso_millis {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(time) => serializer.serialize_str(&time.to_rfc3339_opts(SecondsFormat::Millis, true)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<DateTime<Utc>>::deserialize(deserializer)
    }
}

/// Get the `id` of a stored record, if it has a string one
pub fn record_id(record: &Value) -> Option<&str> {
    record.get("id").and_then(Value::as_str)
}

/// Read a stored record as an [`Entry`]
pub fn parse_record(record: &Value) -> Option<Entry> {
    match Entry::deserialize(record) {
        Ok(entry) => Some(entry),
        Err(e) => {
            warn!("Skipping malformed entry {:?}: {}", record_id(record), e);
            None
        }
    }
}

/// Read every well-formed record, skipping the rest
pub fn parse_records(records: &[Value]) -> Vec<Entry> {
    records.iter().filter_map(parse_record).collect()
}

/// Generate a new entry id (`QR-` + 9 uppercase base36 characters)
pub fn generate_id() -> String {
    let mut rng = rand::thread_rng();
    let mut id = String::with_capacity(ID_PREFIX.len() + ID_RANDOM_LEN);
    id.push_str(ID_PREFIX);
    for _ in 0..ID_RANDOM_LEN {
        let idx = rng.gen_range(0..ID_ALPHABET.len());
        id.push(ID_ALPHABET[idx] as char);
    }
    id
}

/// Check an id against the generated format
pub fn is_valid_id(id: &str) -> bool {
    id.strip_prefix(ID_PREFIX).is_some_and(|rest| {
        rest.len() == ID_RANDOM_LEN
            && rest
                .bytes()
                .all(|b| b.is_ascii_digit() || b.is_ascii_uppercase())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_id_format() {
        for _ in 0..200 {
            let id = generate_id();
            assert!(is_valid_id(&id), "bad id: {}", id);
        }
    }

    #[test]
    fn test_is_valid_id_rejects() {
        assert!(!is_valid_id("QR-ABC"));
        assert!(!is_valid_id("QR-abcdefghi"));
        assert!(!is_valid_id("XX-ABCDEFGHI"));
        assert!(!is_valid_id("QR-ABCDEFGHIJ"));
    }

    #[test]
    fn test_new_entry_is_blank() {
        let entry = Entry::new();
        assert!(entry.title.is_empty());
        assert!(!entry.has_document());
        assert_eq!(entry.document_type, None);
    }

    #[test]
    fn test_wire_shape() {
        let entry = Entry::new();
        let json = serde_json::to_value(&entry).unwrap();
        let obj = json.as_object().unwrap();

        assert!(obj.contains_key("id"));
        assert!(obj.contains_key("createdAt"));
        assert_eq!(obj["documentUrl"], Value::Null);
        assert_eq!(obj["documentType"], Value::Null);
        assert_eq!(obj["title"], "");
    }

    #[test]
    fn test_parses_browser_written_entry() {
        let raw = r#"{
            "id": "QR-ABC123XYZ",
            "title": "Invoice",
            "documentUrl": "https://example.com/doc.pdf",
            "documentType": "url",
            "createdAt": "2024-03-01T12:30:00.000Z",
            "color": "red"
        }"#;

        let entry: Entry = serde_json::from_str(raw).unwrap();
        assert_eq!(entry.id, "QR-ABC123XYZ");
        assert!(entry.is_link());
        assert_eq!(entry.extra["color"], "red");

        let back = serde_json::to_value(&entry).unwrap();
        assert_eq!(back["color"], "red");
        assert_eq!(back["createdAt"], "2024-03-01T12:30:00.000Z");
    }

    #[test]
    fn test_new_entry_survives_reparse() {
        let entry = Entry::new();
        let back: Entry = serde_json::from_value(serde_json::to_value(&entry).unwrap()).unwrap();
        assert_eq!(back, entry);
    }

    #[test]
    fn test_sparse_and_null_fields() {
        let entry: Entry = serde_json::from_str(r#"{"id":"QR-ABC123XYZ","title":null}"#).unwrap();
        assert_eq!(entry.title, "");
        assert_eq!(entry.created_at, None);
        assert!(!entry.has_document());
    }

    #[test]
    fn test_parse_records_skips_malformed() {
        let records = vec![
            serde_json::json!({ "id": "QR-ABC123XYZ", "title": "ok" }),
            serde_json::json!({ "id": "QR-DEF456UVW", "createdAt": 17 }),
            serde_json::json!("not an entry"),
        ];

        let entries = parse_records(&records);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].title, "ok");
        assert_eq!(record_id(&records[1]), Some("QR-DEF456UVW"));
        assert_eq!(record_id(&records[2]), None);
    }

    #[test]
    fn test_link_url_marks_type() {
        let mut entry = Entry::new();
        entry.link_url("https://example.com");
        assert!(entry.is_link());
        assert!(entry.has_document());
    }
}
