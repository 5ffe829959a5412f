//! Query construction for course searches.
//!
//! A [`SearchRequest`] is turned into a [`Query`] tree which the engine adapter renders as
//! Elasticsearch query DSL via [`Query::to_dsl`]. Filters are described as an ordered list
//! of optional [`FilterSpec`]s and folded into clauses, so each one can be tested without an
//! engine.

use serde_json::{json, Map, Value};

use super::types::{CourseField, SearchRequest};

/// Fields searched by the free-text relevance clause.
pub const TEXT_FIELDS: [CourseField; 2] = [CourseField::Title, CourseField::Description];

#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    MatchAll,
    Bool {
        must: Vec<Query>,
        filter: Vec<Query>,
    },
    /// Relevance match across fields, with `AUTO` fuzziness (edit distance scales with term length).
    MultiMatch {
        text: String,
        fields: Vec<CourseField>,
    },
    Term {
        field: CourseField,
        value: String,
    },
    /// Inclusive on both ends; a missing bound is open.
    Range {
        field: CourseField,
        gte: Option<RangeValue>,
        lte: Option<RangeValue>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum RangeValue {
    Int(i64),
    Float(f64),
    Date(String),
}

impl RangeValue {
    fn to_dsl(&self) -> Value {
        match self {
            RangeValue::Int(v) => json!(v),
            RangeValue::Float(v) => json!(v),
            RangeValue::Date(v) => json!(v),
        }
    }
}

impl Query {
    pub fn to_dsl(&self) -> Value {
        match self {
            Query::MatchAll => json!({ "match_all": {} }),
            Query::Bool { must, filter } => {
                let mut bool_query = Map::new();
                if !must.is_empty() {
                    bool_query.insert(
                        "must".to_string(),
                        Value::Array(must.iter().map(Query::to_dsl).collect()),
                    );
                }
                if !filter.is_empty() {
                    bool_query.insert(
                        "filter".to_string(),
                        Value::Array(filter.iter().map(Query::to_dsl).collect()),
                    );
                }
                json!({ "bool": bool_query })
            }
            Query::MultiMatch { text, fields } => {
                let fields: Vec<&str> = fields.iter().map(|f| f.as_ref()).collect();
                json!({
                    "multi_match": {
                        "query": text,
                        "fields": fields,
                        "fuzziness": "AUTO"
                    }
                })
            }
            Query::Term { field, value } => json!({ "term": { field.as_ref(): value } }),
            Query::Range { field, gte, lte } => {
                let mut bounds = Map::new();
                if let Some(gte) = gte {
                    bounds.insert("gte".to_string(), gte.to_dsl());
                }
                if let Some(lte) = lte {
                    bounds.insert("lte".to_string(), lte.to_dsl());
                }
                json!({ "range": { field.as_ref(): bounds } })
            }
        }
    }
}

/// One optional predicate. `None` inputs produce no clause.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterSpec<'a> {
    /// Bounds the document's `minAge` only; its `maxAge` is never consulted.
    Age { min: Option<i32>, max: Option<i32> },
    Category(Option<&'a str>),
    CourseType(Option<&'a str>),
    /// Lower bound on `nextSessionDate`.
    StartDate(Option<&'a str>),
    Price { min: Option<f64>, max: Option<f64> },
}

impl FilterSpec<'_> {
    pub fn to_clause(&self) -> Option<Query> {
        match *self {
            FilterSpec::Age { min, max } => range(
                CourseField::MinAge,
                min.map(|v| RangeValue::Int(v.into())),
                max.map(|v| RangeValue::Int(v.into())),
            ),
            FilterSpec::Category(value) => term(CourseField::Category, value),
            FilterSpec::CourseType(value) => term(CourseField::Type, value),
            FilterSpec::StartDate(value) => range(
                CourseField::NextSessionDate,
                value.map(|v| RangeValue::Date(v.to_string())),
                None,
            ),
            FilterSpec::Price { min, max } => range(
                CourseField::Price,
                min.map(RangeValue::Float),
                max.map(RangeValue::Float),
            ),
        }
    }
}

fn term(field: CourseField, value: Option<&str>) -> Option<Query> {
    value.map(|value| Query::Term {
        field,
        value: value.to_string(),
    })
}

fn range(field: CourseField, gte: Option<RangeValue>, lte: Option<RangeValue>) -> Option<Query> {
    if gte.is_none() && lte.is_none() {
        return None;
    }
    Some(Query::Range { field, gte, lte })
}

#[derive(Debug, Clone, Copy, Default)]
pub struct QueryOptions {
    /// Turn `minPrice`/`maxPrice` into a range filter. Off by default: the parameters are
    /// accepted but ignored unless this is set.
    pub apply_price_filter: bool,
}

/// The main query plus the filter clauses it was built from.
#[derive(Debug, Clone, PartialEq)]
pub struct ComposedQuery {
    pub query: Query,
    pub filters: Vec<Query>,
}

/// Lists the filter descriptors for a request, in clause order.
pub fn filter_specs<'a>(request: &'a SearchRequest, options: &QueryOptions) -> Vec<FilterSpec<'a>> {
    let mut specs = vec![
        FilterSpec::Age {
            min: request.min_age,
            max: request.max_age,
        },
        FilterSpec::Category(request.category.as_deref()),
        FilterSpec::CourseType(request.course_type.as_deref()),
        FilterSpec::StartDate(request.start_date.as_deref()),
    ];

    if options.apply_price_filter {
        specs.push(FilterSpec::Price {
            min: request.min_price,
            max: request.max_price,
        });
    }

    specs
}

pub fn build_filters(specs: &[FilterSpec<'_>]) -> Vec<Query> {
    specs.iter().filter_map(FilterSpec::to_clause).collect()
}

/// Builds the query for a search request.
///
/// Without search text the main query is `match_all` and the filters are left off it; they
/// are still returned in [`ComposedQuery::filters`].
pub fn build_query(request: &SearchRequest, options: &QueryOptions) -> ComposedQuery {
    let filters = build_filters(&filter_specs(request, options));

    let query = match request.search_text() {
        Some(text) => Query::Bool {
            must: vec![Query::MultiMatch {
                text: text.to_string(),
                fields: TEXT_FIELDS.to_vec(),
            }],
            filter: filters.clone(),
        },
        None => Query::MatchAll,
    };

    ComposedQuery { query, filters }
}
