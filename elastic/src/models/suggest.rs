use std::collections::HashMap;

use serde::Deserialize;

/// A `_search` response that carried a `suggest` section.
///
/// Suggestions come back grouped by the name the request gave each suggester.
#[derive(Debug, Default, Deserialize)]
pub struct SuggestResponse {
    #[serde(default)]
    pub suggest: HashMap<String, Vec<SuggestEntry>>,
}

#[derive(Debug, Deserialize)]
pub struct SuggestEntry {
    pub text: String,
    #[serde(default)]
    pub offset: usize,
    #[serde(default)]
    pub length: usize,
    #[serde(default)]
    pub options: Vec<SuggestOption>,
}

#[derive(Debug, Deserialize)]
pub struct SuggestOption {
    pub text: String,
    #[serde(rename = "_id", default)]
    pub id: Option<String>,
    #[serde(rename = "_score", default)]
    pub score: Option<f64>,
}

impl SuggestResponse {
    pub fn group(&self, name: &str) -> Option<&[SuggestEntry]> {
        self.suggest.get(name).map(Vec::as_slice)
    }
}
