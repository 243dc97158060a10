//! Typed search request DSL.
//!
//! Queries are assembled from [`Query`] variants with builder functions and
//! turned into the engine's JSON document tree only when the request is sent.

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

/// Value compared by a `term` query.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TermValue {
    Text(String),
    Bool(bool),
}

impl From<bool> for TermValue {
    fn from(value: bool) -> Self {
        TermValue::Bool(value)
    }
}

impl From<&str> for TermValue {
    fn from(value: &str) -> Self {
        TermValue::Text(value.to_string())
    }
}

impl From<String> for TermValue {
    fn from(value: String) -> Self {
        TermValue::Text(value)
    }
}

/// A single node of the query tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    /// Analyzed full-text match on one field.
    Match {
        field: String,
        query: String,
        boost: Option<f32>,
    },
    /// Analyzed match of one text against several fields (best field wins).
    MultiMatch { query: String, fields: Vec<String> },
    /// Exact, unanalyzed equality.
    Term { field: String, value: TermValue },
    /// Keyword prefix.
    Prefix { field: String, value: String },
    /// Lucene regular expression over a keyword field.
    Regexp { field: String, pattern: String },
    /// The field has at least one indexed value.
    Exists { field: String },
    Bool(BoolQuery),
    FunctionScore(FunctionScoreQuery),
}

impl Query {
    pub fn match_field(field: impl Into<String>, query: impl Into<String>) -> Self {
        Query::Match {
            field: field.into(),
            query: query.into(),
            boost: None,
        }
    }

    pub fn match_boosted(field: impl Into<String>, query: impl Into<String>, boost: f32) -> Self {
        Query::Match {
            field: field.into(),
            query: query.into(),
            boost: Some(boost),
        }
    }

    pub fn multi_match<I, S>(query: impl Into<String>, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Query::MultiMatch {
            query: query.into(),
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    pub fn term(field: impl Into<String>, value: impl Into<TermValue>) -> Self {
        Query::Term {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn prefix(field: impl Into<String>, value: impl Into<String>) -> Self {
        Query::Prefix {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn regexp(field: impl Into<String>, pattern: impl Into<String>) -> Self {
        Query::Regexp {
            field: field.into(),
            pattern: pattern.into(),
        }
    }

    pub fn exists(field: impl Into<String>) -> Self {
        Query::Exists {
            field: field.into(),
        }
    }
}

impl From<BoolQuery> for Query {
    fn from(query: BoolQuery) -> Self {
        Query::Bool(query)
    }
}

impl From<FunctionScoreQuery> for Query {
    fn from(query: FunctionScoreQuery) -> Self {
        Query::FunctionScore(query)
    }
}

/// Serializes as a one-entry object `{ key: value }`.
struct Keyed<'a, T: ?Sized>(&'a str, &'a T);

impl<T: Serialize + ?Sized> Serialize for Keyed<'_, T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(self.0, self.1)?;
        map.end()
    }
}

#[derive(Serialize)]
struct MatchBody<'a> {
    query: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    boost: Option<f32>,
}

#[derive(Serialize)]
struct MultiMatchBody<'a> {
    query: &'a str,
    fields: &'a [String],
}

#[derive(Serialize)]
struct ExistsBody<'a> {
    field: &'a str,
}

impl Serialize for Query {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        match self {
            Query::Match {
                field,
                query,
                boost,
            } => map.serialize_entry(
                "match",
                &Keyed(
                    field,
                    &MatchBody {
                        query,
                        boost: *boost,
                    },
                ),
            )?,
            Query::MultiMatch { query, fields } => {
                map.serialize_entry("multi_match", &MultiMatchBody { query, fields })?
            }
            Query::Term { field, value } => map.serialize_entry("term", &Keyed(field, value))?,
            Query::Prefix { field, value } => {
                map.serialize_entry("prefix", &Keyed(field, value))?
            }
            Query::Regexp { field, pattern } => {
                map.serialize_entry("regexp", &Keyed(field, pattern))?
            }
            Query::Exists { field } => map.serialize_entry("exists", &ExistsBody { field })?,
            Query::Bool(query) => map.serialize_entry("bool", query)?,
            Query::FunctionScore(query) => map.serialize_entry("function_score", query)?,
        }
        map.end()
    }
}

/// Boolean combination of clauses.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BoolQuery {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub must: Vec<Query>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub should: Vec<Query>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub filter: Vec<Query>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub must_not: Vec<Query>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum_should_match: Option<u32>,
}

impl BoolQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn must(mut self, query: impl Into<Query>) -> Self {
        self.must.push(query.into());
        self
    }

    pub fn should(mut self, query: impl Into<Query>) -> Self {
        self.should.push(query.into());
        self
    }

    pub fn filter(mut self, query: impl Into<Query>) -> Self {
        self.filter.push(query.into());
        self
    }

    pub fn filters(mut self, queries: impl IntoIterator<Item = Query>) -> Self {
        self.filter.extend(queries);
        self
    }

    pub fn must_not(mut self, query: impl Into<Query>) -> Self {
        self.must_not.push(query.into());
        self
    }

    pub fn minimum_should_match(mut self, minimum: u32) -> Self {
        self.minimum_should_match = Some(minimum);
        self
    }
}

/// How the weights of matching functions are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreMode {
    Sum,
}

/// A constant boost applied when `filter` matches.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeightFunction {
    pub filter: Query,
    pub weight: f32,
}

/// A base query whose score is adjusted by independent boost functions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionScoreQuery {
    pub query: Box<Query>,
    pub functions: Vec<WeightFunction>,
    pub score_mode: ScoreMode,
}

impl FunctionScoreQuery {
    pub fn new(query: impl Into<Query>, score_mode: ScoreMode) -> Self {
        Self {
            query: Box::new(query.into()),
            functions: Vec::new(),
            score_mode,
        }
    }

    pub fn weight(mut self, filter: impl Into<Query>, weight: f32) -> Self {
        self.functions.push(WeightFunction {
            filter: filter.into(),
            weight,
        });
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

/// One sort criterion; `_score` sorts by relevance.
#[derive(Debug, Clone, PartialEq)]
pub struct SortClause {
    pub field: String,
    pub order: SortOrder,
}

impl SortClause {
    pub fn score_desc() -> Self {
        Self {
            field: "_score".to_string(),
            order: SortOrder::Desc,
        }
    }

    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            order: SortOrder::Asc,
        }
    }
}

#[derive(Serialize)]
struct SortBody {
    order: SortOrder,
}

impl Serialize for SortClause {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        Keyed(&self.field, &SortBody { order: self.order }).serialize(serializer)
    }
}

/// A complete search request body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchRequest {
    pub from: u32,
    pub size: u32,
    pub query: Query,
    #[serde(rename = "_source", skip_serializing_if = "Option::is_none")]
    pub source: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sort: Vec<SortClause>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub track_total_hits: Option<bool>,
}

impl SearchRequest {
    /// Request the result window `[offset, offset + limit)` of `query`.
    pub fn new(query: impl Into<Query>, offset: u32, limit: u32) -> Self {
        Self {
            from: offset,
            size: limit,
            query: query.into(),
            source: None,
            sort: Vec::new(),
            track_total_hits: None,
        }
    }

    pub fn source<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.source = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    pub fn sort_by(mut self, clause: SortClause) -> Self {
        self.sort.push(clause);
        self
    }

    /// Ask for an exact total instead of the engine's capped estimate.
    pub fn track_total_hits(mut self) -> Self {
        self.track_total_hits = Some(true);
        self
    }
}
