//! Mock engine implementation for testing.

use std::cmp::Ordering;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering as AtomicOrdering};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use itertools::Itertools;

use crate::domain::search::query::{Query, RangeValue};
use crate::domain::search::traits::{
    CompletionLookup, EngineSearch, Result, SearchEngine, SearchError,
};
use crate::domain::search::types::{
    CourseDocument, CourseField, IndexReport, SortOrder, SuggestionEntry, SuggestionGroups,
};

/// In-memory engine that evaluates [`Query`] trees against a list of documents.
///
/// Text matching mimics a `multi_match` with `AUTO` fuzziness: lowercase word tokens, any
/// query token within the allowed edit distance of any field token is a hit. Completion
/// matches suggest inputs by case-insensitive prefix.
///
/// # Examples
///
/// ```ignore
/// let engine = MockSearchEngine::new().with_documents(vec![doc1, doc2]);
/// // or an engine that is down:
/// let engine = MockSearchEngine::new().failing();
/// ```
#[derive(Clone, Default)]
pub struct MockSearchEngine {
    documents: Arc<RwLock<Vec<CourseDocument>>>,
    failing: Arc<AtomicBool>,
    /// `(from, size)` of every search call
    search_calls: Arc<RwLock<Vec<(u64, u32)>>>,
    complete_calls: Arc<AtomicUsize>,
    index_created: Arc<AtomicBool>,
}

#[allow(dead_code)]
impl MockSearchEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add initial documents, replacing any with the same id.
    pub fn with_documents(self, docs: Vec<CourseDocument>) -> Self {
        {
            let mut documents = self.documents.write().unwrap();
            for doc in docs {
                upsert(&mut documents, doc);
            }
        }
        self
    }

    /// Make every engine call fail, as if the cluster were unreachable.
    pub fn failing(self) -> Self {
        self.failing.store(true, AtomicOrdering::SeqCst);
        self
    }

    pub fn search_calls(&self) -> Vec<(u64, u32)> {
        self.search_calls.read().unwrap().clone()
    }

    pub fn complete_calls(&self) -> usize {
        self.complete_calls.load(AtomicOrdering::SeqCst)
    }

    pub fn all_documents(&self) -> Vec<CourseDocument> {
        self.documents.read().unwrap().clone()
    }

    pub fn index_created(&self) -> bool {
        self.index_created.load(AtomicOrdering::SeqCst)
    }

    fn check_available(&self) -> Result<()> {
        if self.failing.load(AtomicOrdering::SeqCst) {
            return Err(SearchError::EngineError(
                "ResponseError: connection refused".to_string(),
            ));
        }
        Ok(())
    }
}

fn upsert(documents: &mut Vec<CourseDocument>, doc: CourseDocument) {
    match documents.iter_mut().find(|existing| existing.id == doc.id) {
        Some(existing) => *existing = doc,
        None => documents.push(doc),
    }
}

fn tokens(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .collect()
}

fn auto_fuzziness(term: &str) -> usize {
    match term.chars().count() {
        0..=2 => 0,
        3..=5 => 1,
        _ => 2,
    }
}

fn levenshtein(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    let mut previous: Vec<usize> = (0..=b.len()).collect();

    for (i, ca) in a.chars().enumerate() {
        let mut current = vec![i + 1; b.len() + 1];
        for (j, cb) in b.iter().enumerate() {
            let substitution = previous[j] + usize::from(ca != *cb);
            current[j + 1] = substitution.min(previous[j + 1] + 1).min(current[j] + 1);
        }
        previous = current;
    }

    previous[b.len()]
}

fn text_field<'a>(doc: &'a CourseDocument, field: CourseField) -> Option<&'a str> {
    match field {
        CourseField::Title => Some(doc.title.as_str()),
        CourseField::Description => doc.description.as_deref(),
        CourseField::Category => doc.category.as_deref(),
        CourseField::Type => doc.course_type.as_deref(),
        CourseField::GradeRange => doc.grade_range.as_deref(),
        CourseField::NextSessionDate => doc.next_session_date.as_deref(),
        CourseField::MinAge | CourseField::MaxAge | CourseField::Price | CourseField::Suggest => {
            None
        }
    }
}

fn numeric_field(doc: &CourseDocument, field: CourseField) -> Option<f64> {
    match field {
        CourseField::MinAge => doc.min_age.map(f64::from),
        CourseField::MaxAge => doc.max_age.map(f64::from),
        CourseField::Price => doc.price,
        _ => None,
    }
}

fn within(doc: &CourseDocument, field: CourseField, bound: &RangeValue, ord: Ordering) -> bool {
    let actual = match bound {
        RangeValue::Int(v) => numeric_field(doc, field)
            .and_then(|actual| actual.partial_cmp(&(*v as f64))),
        RangeValue::Float(v) => numeric_field(doc, field).and_then(|actual| actual.partial_cmp(v)),
        // Fixed-width UTC timestamps order lexicographically.
        RangeValue::Date(v) => text_field(doc, field).map(|actual| actual.cmp(v.as_str())),
    };

    matches!(actual, Some(o) if o == ord || o == Ordering::Equal)
}

fn evaluate(doc: &CourseDocument, query: &Query) -> bool {
    match query {
        Query::MatchAll => true,
        Query::Bool { must, filter } => {
            must.iter().all(|q| evaluate(doc, q)) && filter.iter().all(|q| evaluate(doc, q))
        }
        Query::MultiMatch { text, fields } => {
            let doc_tokens: Vec<String> = fields
                .iter()
                .filter_map(|field| text_field(doc, *field))
                .flat_map(tokens)
                .collect();

            tokens(text).iter().any(|term| {
                let max_edits = auto_fuzziness(term);
                doc_tokens
                    .iter()
                    .any(|candidate| levenshtein(term, candidate) <= max_edits)
            })
        }
        Query::Term { field, value } => text_field(doc, *field) == Some(value.as_str()),
        Query::Range { field, gte, lte } => {
            gte.as_ref()
                .map_or(true, |b| within(doc, *field, b, Ordering::Greater))
                && lte
                    .as_ref()
                    .map_or(true, |b| within(doc, *field, b, Ordering::Less))
        }
    }
}

/// Orders two documents on a sort field. Documents missing the field always sort last.
fn compare(a: &CourseDocument, b: &CourseDocument, field: CourseField, order: SortOrder) -> Ordering {
    let ordering = match field {
        CourseField::MinAge | CourseField::MaxAge | CourseField::Price => {
            match (numeric_field(a, field), numeric_field(b, field)) {
                (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
                (Some(_), None) => return Ordering::Less,
                (None, Some(_)) => return Ordering::Greater,
                (None, None) => Ordering::Equal,
            }
        }
        _ => match (text_field(a, field), text_field(b, field)) {
            (Some(x), Some(y)) => x.cmp(y),
            (Some(_), None) => return Ordering::Less,
            (None, Some(_)) => return Ordering::Greater,
            (None, None) => Ordering::Equal,
        },
    };

    match order {
        SortOrder::Asc => ordering,
        SortOrder::Desc => ordering.reverse(),
    }
}

#[async_trait]
impl SearchEngine for MockSearchEngine {
    async fn search(&self, request: &EngineSearch<'_>) -> Result<Vec<CourseDocument>> {
        self.search_calls
            .write()
            .unwrap()
            .push((request.from, request.size));
        self.check_available()?;

        let documents = self.documents.read().unwrap();
        let mut hits: Vec<CourseDocument> = documents
            .iter()
            .filter(|doc| evaluate(doc, request.query))
            .cloned()
            .collect();

        hits.sort_by(|a, b| compare(a, b, request.sort.field, request.sort.order));

        Ok(hits
            .into_iter()
            .skip(request.from as usize)
            .take(request.size as usize)
            .collect())
    }

    async fn complete(&self, lookup: &CompletionLookup<'_>) -> Result<SuggestionGroups> {
        self.complete_calls.fetch_add(1, AtomicOrdering::SeqCst);
        self.check_available()?;

        let prefix = lookup.prefix.to_lowercase();
        let documents = self.documents.read().unwrap();
        let candidates = documents
            .iter()
            .flat_map(|doc| doc.suggest.iter())
            .filter(|input| input.to_lowercase().starts_with(&prefix))
            .cloned();

        let options: Vec<String> = if lookup.skip_duplicates {
            candidates.unique().take(lookup.size).collect()
        } else {
            candidates.take(lookup.size).collect()
        };

        let mut groups = SuggestionGroups::new();
        groups.insert(
            lookup.group.to_string(),
            vec![SuggestionEntry { options }],
        );
        Ok(groups)
    }

    async fn ensure_index(&self) -> Result<bool> {
        self.check_available()?;
        let created = !self.index_created.swap(true, AtomicOrdering::SeqCst);
        Ok(created)
    }

    async fn index_documents(&self, docs: &[CourseDocument]) -> Result<IndexReport> {
        self.check_available()?;

        let mut documents = self.documents.write().unwrap();
        for doc in docs {
            upsert(&mut documents, doc.clone());
        }

        Ok(IndexReport {
            indexed: docs.len(),
            failed: vec![],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(id: &str, title: &str) -> CourseDocument {
        CourseDocument {
            id: id.to_string(),
            title: title.to_string(),
            description: None,
            category: None,
            course_type: None,
            grade_range: None,
            min_age: None,
            max_age: None,
            price: None,
            next_session_date: None,
            suggest: vec![],
        }
    }

    #[test]
    fn levenshtein_distances() {
        assert_eq!(levenshtein("robotics", "robotics"), 0);
        assert_eq!(levenshtein("robbotics", "robotics"), 1);
        assert_eq!(levenshtein("chess", "chesss"), 1);
        assert_eq!(levenshtein("chess", "cheese"), 2);
        assert_eq!(levenshtein("", "abc"), 3);
    }

    #[test]
    fn fuzziness_scales_with_term_length() {
        assert_eq!(auto_fuzziness("ab"), 0);
        assert_eq!(auto_fuzziness("chess"), 1);
        assert_eq!(auto_fuzziness("robotics"), 2);
    }

    #[tokio::test]
    async fn upsert_replaces_by_id() {
        let engine = MockSearchEngine::new();
        engine
            .index_documents(&[doc("1", "Old"), doc("2", "Other")])
            .await
            .unwrap();
        engine.index_documents(&[doc("1", "New")]).await.unwrap();

        let all = engine.all_documents();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].title, "New");
    }

    #[tokio::test]
    async fn missing_sort_values_go_last() {
        let mut cheap = doc("1", "Cheap");
        cheap.price = Some(5.0);
        let unpriced = doc("2", "Unpriced");
        let mut dear = doc("3", "Dear");
        dear.price = Some(50.0);

        let engine = MockSearchEngine::new().with_documents(vec![unpriced, dear, cheap]);
        let query = Query::MatchAll;

        for order in [SortOrder::Asc, SortOrder::Desc] {
            let hits = engine
                .search(&EngineSearch {
                    query: &query,
                    sort: crate::domain::search::types::ResolvedSort {
                        field: CourseField::Price,
                        order,
                    },
                    from: 0,
                    size: 10,
                })
                .await
                .unwrap();
            assert_eq!(hits.last().unwrap().id, "2");
        }
    }

    #[tokio::test]
    async fn failing_engine_errors() {
        let engine = MockSearchEngine::new().failing();
        assert!(engine.ensure_index().await.is_err());
        assert!(engine.index_documents(&[doc("1", "A")]).await.is_err());
    }
}
