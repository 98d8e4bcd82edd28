//! Client state: the cached collection and the mutations applied to it
//!
//! Every mutation changes the local list first and then pushes the whole
//! list back. A failed push is reported but the local change is kept.
//!
//! The cache holds the records as fetched. Edits touch only `title`,
//! `documentUrl` and `documentType` of the one record they target, so
//! records this client cannot read are written back untouched.

use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::api::CollectionApi;
use qr_core::document::{read_data_uri, validate_url};
use qr_core::entry::{parse_record, parse_records, record_id};
use qr_core::{DocumentSource, Entry, QrError, Result, SecurityCode};

/// Holds the session's entries and mediates create/update/delete
pub struct QrManager<A: CollectionApi> {
    /// Collection API
    api: A,
    /// Locally cached records
    records: Vec<Value>,
    /// Code used for writes and checked before edits
    security_code: SecurityCode,
    /// Largest file that may be inlined
    max_document_bytes: Option<usize>,
}

impl<A: CollectionApi> QrManager<A> {
    /// Create a manager with an empty cache
    pub fn new(api: A, security_code: SecurityCode) -> Self {
        Self {
            api,
            records: Vec::new(),
            security_code,
            max_document_bytes: None,
        }
    }

    /// Refuse to inline files larger than `limit` bytes
    pub fn with_max_document_bytes(mut self, limit: Option<usize>) -> Self {
        self.max_document_bytes = limit;
        self
    }

    /// Fetch the collection into the cache
    pub async fn load(&mut self) -> Result<()> {
        self.records = self.api.list_entries().await?;
        debug!("Loaded {} records", self.records.len());
        Ok(())
    }

    /// Get the cached entries that can be read, in stored order
    pub fn entries(&self) -> Vec<Entry> {
        parse_records(&self.records)
    }

    /// Get a cached entry by id
    pub fn get(&self, id: &str) -> Option<Entry> {
        self.record(id).and_then(parse_record)
    }

    fn record(&self, id: &str) -> Option<&Value> {
        self.records.iter().find(|record| record_id(record) == Some(id))
    }

    /// Append a blank entry and persist
    pub async fn add(&mut self) -> Result<Entry> {
        let entry = Entry::new();
        self.records.push(serde_json::to_value(&entry)?);
        info!("Added entry {}", entry.id);

        self.persist(self.security_code.expose()).await?;
        Ok(entry)
    }

    /// Remove an entry after `confirm` agrees, then persist
    pub async fn remove<F>(&mut self, id: &str, confirm: F) -> Result<()>
    where
        F: FnOnce(&Entry) -> bool,
    {
        let entry = self
            .get(id)
            .ok_or_else(|| QrError::EntryNotFound(id.to_string()))?;

        if !confirm(&entry) {
            debug!("Removal of {} cancelled", id);
            return Err(QrError::Cancelled);
        }

        self.records.retain(|record| record_id(record) != Some(id));
        info!("Removed entry {}", id);

        self.persist(self.security_code.expose()).await
    }

    /// Set the title and document of an entry, then persist with `secret`
    pub async fn update(
        &mut self,
        id: &str,
        title: &str,
        source: DocumentSource,
        secret: &str,
    ) -> Result<Entry> {
        if !self.security_code.verify(secret) {
            warn!("Edit of {} rejected: invalid security code", id);
            return Err(QrError::Unauthorized);
        }

        if self.get(id).is_none() {
            return Err(QrError::EntryNotFound(id.to_string()));
        }

        // resolve the document before touching the entry
        let document = match source {
            DocumentSource::File(path) => {
                let (uri, mime) = read_data_uri(&path, self.max_document_bytes).await?;
                Some((uri, mime))
            }
            DocumentSource::Url(url) if !url.is_empty() => {
                validate_url(&url)?;
                Some((url, qr_core::URL_DOCUMENT_TYPE.to_string()))
            }
            DocumentSource::Url(_) | DocumentSource::Keep => None,
        };

        let fields = self
            .records
            .iter_mut()
            .find(|record| record_id(record) == Some(id))
            .and_then(Value::as_object_mut)
            .ok_or_else(|| QrError::EntryNotFound(id.to_string()))?;

        set_fields(fields, title, document);
        let updated = parse_record(&Value::Object(fields.clone()))
            .ok_or_else(|| QrError::InvalidDocument(format!("Entry {} cannot be read", id)))?;
        info!("Updated entry {}", id);

        self.persist(secret).await?;
        Ok(updated)
    }

    async fn persist(&self, secret: &str) -> Result<()> {
        self.api.replace_all(&self.records, secret).await.map_err(|e| {
            warn!("Failed to save collection: {}", e);
            e
        })
    }
}

fn set_fields(fields: &mut Map<String, Value>, title: &str, document: Option<(String, String)>) {
    fields.insert("title".to_string(), Value::String(title.to_string()));
    if let Some((url, document_type)) = document {
        fields.insert("documentUrl".to_string(), Value::String(url));
        fields.insert("documentType".to_string(), Value::String(document_type));
    }
}
