//! OpenSearch query builders.
//!
//! Node and hardware searches are a multi-field prefix match filtered by the
//! caller's flag switches. Address searches either rank by street alone or,
//! when a house term is given, add tiered house-name boosts on top of the
//! street match.

use search_service_shared::{AddressQuery, HardwareFilter, IndexKind, NodeFilter, SearchQuery};

use crate::dsl::{
    BoolQuery, FunctionScoreQuery, Query, ScoreMode, SearchRequest, SortClause,
};
use crate::opensearch::index_config::{edge, keyword, searchable_fields};

/// Boost of the street match in address searches.
pub const STREET_BOOST: f32 = 3.0;

/// Weight added when the house name equals the house term exactly.
pub const EXACT_HOUSE_WEIGHT: f32 = 100.0;

/// Weight added when the house name starts with the house term and the next
/// character is not a digit ("12" boosts "12A" but not "123").
pub const HOUSE_PREFIX_WEIGHT: f32 = 50.0;

/// Weight added when the house name matches the house term via edge n-grams.
pub const FUZZY_HOUSE_WEIGHT: f32 = 25.0;

const STREET_NAME: &str = "street_name";
const STREET_TYPE: &str = "street_type";
const HOUSE_NAME: &str = "house_name";

/// Build a node search from the free-text query and flag filter.
pub fn build_node_search(query: &SearchQuery, filter: &NodeFilter) -> SearchRequest {
    let mut filters = Vec::new();
    if filter.use_is_delete {
        filters.push(flag_filter("is_delete", filter.is_delete));
    }
    if filter.use_is_passive {
        filters.push(flag_filter("is_passive", filter.is_passive));
    }

    build_text_search(IndexKind::Nodes, query, filters)
}

/// Build a hardware search from the free-text query and flag filter.
pub fn build_hardware_search(query: &SearchQuery, filter: &HardwareFilter) -> SearchRequest {
    let mut filters = Vec::new();
    if filter.use_is_delete {
        filters.push(flag_filter("is_delete", filter.is_delete));
    }

    build_text_search(IndexKind::Hardware, query, filters)
}

/// Build an address search.
///
/// Results are always ordered by relevance, ties broken by the exact house
/// name ascending.
pub fn build_address_search(query: &AddressQuery) -> SearchRequest {
    match query.house_term() {
        None => build_street_query(query),
        Some(house) => build_house_query(query, house),
    }
}

/// Match the free text against every searchable edge field of `kind`.
fn build_text_search(kind: IndexKind, query: &SearchQuery, filters: Vec<Query>) -> SearchRequest {
    let bool_query = BoolQuery::new()
        .must(Query::multi_match(&query.query, searchable_fields(kind)))
        .filters(filters);

    SearchRequest::new(bool_query, query.offset, query.limit)
}

/// Filter on a boolean flag.
///
/// `true` is an exact match. `false` also accepts documents lacking the field
/// entirely, which is how unflagged rows were stored before flags were
/// normalized.
fn flag_filter(field: &str, value: bool) -> Query {
    if value {
        return Query::term(field, true);
    }

    BoolQuery::new()
        .should(Query::term(field, false))
        .should(BoolQuery::new().must_not(Query::exists(field)))
        .minimum_should_match(1)
        .into()
}

fn street_match(street: &str) -> Query {
    Query::match_boosted(edge(STREET_NAME), street, STREET_BOOST)
}

fn build_street_query(query: &AddressQuery) -> SearchRequest {
    SearchRequest::new(street_match(&query.street_query), query.offset, query.limit)
        .source([STREET_NAME, STREET_TYPE])
        .sort_by(SortClause::score_desc())
        .sort_by(SortClause::asc(keyword(HOUSE_NAME)))
}

fn build_house_query(query: &AddressQuery, house: &str) -> SearchRequest {
    let house_keyword = keyword(HOUSE_NAME);

    let base = BoolQuery::new()
        .must(street_match(&query.street_query))
        .should(Query::match_field(edge(HOUSE_NAME), house))
        .minimum_should_match(1);

    let prefix_without_more_digits = BoolQuery::new()
        .must(Query::prefix(&house_keyword, house))
        .must(Query::regexp(
            &house_keyword,
            format!("{}[^0-9].*", escape_regexp(house)),
        ));

    let scored = FunctionScoreQuery::new(base, ScoreMode::Sum)
        .weight(Query::term(&house_keyword, house), EXACT_HOUSE_WEIGHT)
        .weight(prefix_without_more_digits, HOUSE_PREFIX_WEIGHT)
        .weight(Query::match_field(edge(HOUSE_NAME), house), FUZZY_HOUSE_WEIGHT);

    SearchRequest::new(scored, query.offset, query.limit)
        .sort_by(SortClause::score_desc())
        .sort_by(SortClause::asc(house_keyword))
        .track_total_hits()
}

/// Escape characters with special meaning in Lucene regular expressions.
fn escape_regexp(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(
            c,
            '.' | '?' | '+' | '*' | '|' | '{' | '}' | '[' | ']' | '(' | ')' | '"' | '\\' | '#'
                | '@' | '&' | '<' | '>' | '~'
        ) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
