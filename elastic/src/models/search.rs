use serde::Deserialize;
use serde_json::Value;

/// Body of a `_search` response. Only the parts the gateway reads are modelled.
#[derive(Debug, Deserialize)]
pub struct SearchResponse<T> {
    #[serde(default)]
    pub took: Option<u64>,
    #[serde(default)]
    pub timed_out: bool,
    pub hits: Hits<T>,
}

#[derive(Debug, Deserialize)]
pub struct Hits<T> {
    #[serde(default)]
    pub total: Option<TotalHits>,
    #[serde(default = "Vec::new")]
    pub hits: Vec<Hit<T>>,
}

#[derive(Debug, Deserialize)]
pub struct TotalHits {
    pub value: u64,
    pub relation: String,
}

#[derive(Debug, Deserialize)]
pub struct Hit<T> {
    #[serde(rename = "_index")]
    pub index: String,
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_score", default)]
    pub score: Option<f64>,
    #[serde(rename = "_source")]
    pub source: Option<T>,
    #[serde(default)]
    pub sort: Option<Vec<Value>>,
}

impl<T> SearchResponse<T> {
    /// Consumes the response and returns the `_source` of every hit, in rank order.
    ///
    /// Hits without a source (e.g. when `_source` was disabled) are skipped.
    pub fn into_sources(self) -> Vec<T> {
        self.hits
            .hits
            .into_iter()
            .filter_map(|hit| hit.source)
            .collect()
    }
}
