use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::ElasticError;

/// Builds an NDJSON `_bulk` body that indexes (creates or fully replaces) each document by id.
pub fn bulk_index_body<'a, T, I>(index: &str, documents: I) -> Result<String, ElasticError>
where
    T: Serialize + 'a,
    I: IntoIterator<Item = (&'a str, &'a T)>,
{
    let mut body = String::new();
    for (id, document) in documents {
        let action = json!({ "index": { "_index": index, "_id": id } });
        let source = serde_json::to_string(document)
            .map_err(|e| ElasticError::ParsingError(format!("Failed to encode document: {}", e)))?;

        body.push_str(&action.to_string());
        body.push('\n');
        body.push_str(&source);
        body.push('\n');
    }

    Ok(body)
}

#[derive(Debug, Deserialize)]
pub struct BulkResponse {
    #[serde(default)]
    pub took: u64,
    pub errors: bool,
    #[serde(default)]
    pub items: Vec<BulkItem>,
}

/// One entry of `items`, keyed by the action that produced it (`index`, `create`, ...).
#[derive(Debug, Deserialize)]
pub struct BulkItem {
    #[serde(flatten)]
    pub actions: std::collections::HashMap<String, BulkItemResult>,
}

#[derive(Debug, Deserialize)]
pub struct BulkItemResult {
    #[serde(rename = "_id", default)]
    pub id: Option<String>,
    pub status: u16,
    #[serde(default)]
    pub error: Option<Value>,
}

impl BulkResponse {
    /// Items the engine rejected, as `(id, reason)` pairs.
    pub fn failures(&self) -> Vec<(String, String)> {
        self.items
            .iter()
            .flat_map(|item| item.actions.values())
            .filter(|result| result.error.is_some() || result.status >= 300)
            .map(|result| {
                let reason = result
                    .error
                    .as_ref()
                    .map(|e| e.to_string())
                    .unwrap_or_else(|| format!("status {}", result.status));
                (result.id.clone().unwrap_or_default(), reason)
            })
            .collect()
    }
}
