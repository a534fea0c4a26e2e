//! Batch import of documents from JSON arrays or CSV files.
//!
//! Both entry points are best-effort folds: one bad item never aborts the
//! batch. Each input item produces a [`ImportDetail`] echoing the original
//! item plus its status and assigned id, and the outcome carries a
//! success/fail tally. The whole operation fails only when the input itself
//! is unusable (not a JSON array, unreadable CSV).

use docstash_core::error::ImportError;
use docstash_core::store::DocumentStore;
use serde::Serialize;
use serde_json::{Map, Value, json};
use tracing::warn;

/// Keys claimed by the document envelope; everything else is payload.
pub const RESERVED_KEYS: &[&str] = &["doc_type", "identifier"];

/// Outcome of a batch import.
#[derive(Debug, Serialize)]
pub struct ImportOutcome {
    pub success: usize,
    pub fail: usize,
    pub details: Vec<ImportDetail>,
}

/// Per-item import result, echoing the original item.
#[derive(Debug, Serialize)]
pub struct ImportDetail {
    pub item: Value,
    pub status: ImportStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportStatus {
    Ok,
    Fail,
}

impl ImportOutcome {
    fn new() -> Self {
        Self {
            success: 0,
            fail: 0,
            details: Vec::new(),
        }
    }

    fn record_ok(&mut self, item: Value, id: i64) {
        self.success += 1;
        self.details.push(ImportDetail {
            item,
            status: ImportStatus::Ok,
            id: Some(id),
        });
    }

    fn record_fail(&mut self, item: Value) {
        self.fail += 1;
        self.details.push(ImportDetail {
            item,
            status: ImportStatus::Fail,
            id: None,
        });
    }
}

/// Produce a new mapping containing all key/value pairs except the reserved
/// ones.
pub fn without_reserved_keys(map: &Map<String, Value>, reserved: &[&str]) -> Map<String, Value> {
    map.iter()
        .filter(|(k, _)| !reserved.contains(&k.as_str()))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

fn optional_str(map: &Map<String, Value>, key: &str) -> Option<String> {
    map.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

/// Import a JSON array of objects.
///
/// For each object, `doc_type`/`identifier` are taken from the item; the
/// payload is the explicit `data` object when present, otherwise all
/// remaining non-reserved fields. Non-object items fail individually.
pub async fn import_json(store: &dyn DocumentStore, items: &[Value]) -> ImportOutcome {
    let mut outcome = ImportOutcome::new();

    for item in items {
        let Some(map) = item.as_object() else {
            warn!("Skipping non-object import item");
            outcome.record_fail(item.clone());
            continue;
        };

        let doc_type = optional_str(map, "doc_type");
        let identifier = optional_str(map, "identifier");

        let data = match map.get("data") {
            Some(Value::Object(data)) => Value::Object(data.clone()),
            _ => Value::Object(without_reserved_keys(map, RESERVED_KEYS)),
        };

        match store
            .insert(doc_type.as_deref(), identifier.as_deref(), &data)
            .await
        {
            Ok(id) => outcome.record_ok(item.clone(), id),
            Err(e) => {
                warn!(error = %e, "Import item failed to store");
                outcome.record_fail(item.clone());
            }
        }
    }

    outcome
}

/// Import CSV bytes, header-driven.
///
/// The `doc_type` and `identifier` columns are lifted into the document
/// envelope (an empty cell counts as absent); every other column becomes a
/// string field of the payload.
pub async fn import_csv(
    store: &dyn DocumentStore,
    bytes: &[u8],
) -> Result<ImportOutcome, ImportError> {
    let mut reader = csv::Reader::from_reader(bytes);
    let headers = reader
        .headers()
        .map_err(|e| ImportError::InvalidInput(format!("unreadable CSV header: {e}")))?
        .clone();

    let mut outcome = ImportOutcome::new();

    for record in reader.records() {
        let record = match record {
            Ok(r) => r,
            Err(e) => {
                warn!(error = %e, "Skipping malformed CSV record");
                outcome.record_fail(json!({ "row_error": e.to_string() }));
                continue;
            }
        };

        let row: Map<String, Value> = headers
            .iter()
            .zip(record.iter())
            .map(|(h, v)| (h.to_string(), Value::String(v.to_string())))
            .collect();

        let doc_type = optional_str(&row, "doc_type");
        let identifier = optional_str(&row, "identifier");
        let data = Value::Object(without_reserved_keys(&row, RESERVED_KEYS));

        match store
            .insert(doc_type.as_deref(), identifier.as_deref(), &data)
            .await
        {
            Ok(id) => outcome.record_ok(Value::Object(row), id),
            Err(e) => {
                warn!(error = %e, "CSV row failed to store");
                outcome.record_fail(Value::Object(row));
            }
        }
    }

    Ok(outcome)
}
