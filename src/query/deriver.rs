//! Filter → sort → paginate over in-memory record slices.
//!
//! Every admin list (notices, inquiries, tenders, ...) runs the same
//! pipeline. Record types describe which fields are searchable, filterable
//! and sortable through [`Listable`]; [`derive`] does the rest.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::cmp::Reverse;
use std::collections::{BTreeMap, HashMap};

use super::QueryError;
use crate::api::pagination::{PaginationMeta, PaginationParams};

/// Filter value meaning "no filter", as sent by the status/category dropdowns.
pub const FILTER_ALL: &str = "all";

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn parse(s: &str) -> Result<Self, QueryError> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(QueryError::InvalidSortOrder(other.to_string())),
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

/// Active sort column and direction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub field: String,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn new(field: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }
}

/// Comparable projection of a record field.
///
/// Values of different kinds order by variant; within a kind, text is
/// compared case-insensitively and everything else numerically.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum SortValue {
    Missing,
    Text(String),
    Integer(i64),
    Decimal(Decimal),
    Date(NaiveDate),
    Timestamp(DateTime<Utc>),
}

impl SortValue {
    pub fn text(value: &str) -> Self {
        Self::Text(value.to_lowercase())
    }

    pub fn count(value: u64) -> Self {
        Self::Integer(i64::try_from(value).unwrap_or(i64::MAX))
    }
}

impl From<Option<DateTime<Utc>>> for SortValue {
    fn from(value: Option<DateTime<Utc>>) -> Self {
        value.map_or(Self::Missing, Self::Timestamp)
    }
}

/// A record type that can be listed through the deriver.
pub trait Listable {
    /// Plural, human-readable name used in empty-state messages
    const LABEL: &'static str;

    /// Fields matched by the free-text search
    const SEARCH_FIELDS: &'static [&'static str];

    /// Fields that accept an equality filter
    const FILTER_FIELDS: &'static [&'static str];

    /// Fields the list can be sorted by
    const SORT_FIELDS: &'static [&'static str];

    /// Sort applied when the caller names none
    const DEFAULT_SORT: (&'static str, SortDirection);

    fn search_text(&self, field: &str) -> Option<&str>;

    fn filter_value(&self, field: &str) -> Option<Cow<'_, str>>;

    fn sort_value(&self, field: &str) -> SortValue;
}

/// Fully-resolved list request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub filters: BTreeMap<String, String>,
    pub search: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<SortDirection>,
    pub page: u32,
    pub page_size: u32,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            filters: BTreeMap::new(),
            search: None,
            sort_by: None,
            sort_order: None,
            page: 1,
            page_size: 10,
        }
    }
}

const RESERVED_KEYS: &[&str] = &["search", "q", "sort_by", "sort_order", "page", "per_page"];

impl ListQuery {
    /// Build a query from raw query-string parameters.
    ///
    /// Reserved keys drive search, sort and pagination; every other key is
    /// treated as a filter.
    pub fn from_params(
        params: &HashMap<String, String>,
        default_page_size: u32,
    ) -> Result<Self, QueryError> {
        let pagination = PaginationParams {
            page: parse_number(params, "page")?,
            per_page: parse_number(params, "per_page")?,
        };

        let search = params
            .get("search")
            .or_else(|| params.get("q"))
            .and_then(|s| normalize_search(s));

        let sort_order = params
            .get("sort_order")
            .map(|s| SortDirection::parse(s))
            .transpose()?;

        let sort_by = params
            .get("sort_by")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        let filters = params
            .iter()
            .filter(|(key, _)| !RESERVED_KEYS.contains(&key.as_str()))
            .filter_map(|(key, value)| {
                normalize_filter(value).map(|value| (key.clone(), value))
            })
            .collect();

        Ok(Self {
            filters,
            search,
            sort_by,
            sort_order,
            page: pagination.page(),
            page_size: pagination.per_page_or(default_page_size),
        })
    }

    /// Reject filter and sort fields the record type does not declare.
    pub fn validate<T: Listable>(&self) -> Result<(), QueryError> {
        for field in self.filters.keys() {
            ensure_filter_field::<T>(field)?;
        }
        if let Some(field) = &self.sort_by {
            ensure_sort_field::<T>(field)?;
        }
        Ok(())
    }

    /// The sort actually applied for record type `T`.
    pub fn resolved_sort<T: Listable>(&self) -> SortSpec {
        let (default_field, default_direction) = T::DEFAULT_SORT;
        match &self.sort_by {
            Some(field) => SortSpec::new(field.clone(), self.sort_order.unwrap_or_default()),
            None => SortSpec::new(
                default_field,
                self.sort_order.unwrap_or(default_direction),
            ),
        }
    }

    pub fn has_active_filters(&self) -> bool {
        !self.filters.is_empty() || self.search.is_some()
    }
}

pub fn ensure_filter_field<T: Listable>(field: &str) -> Result<(), QueryError> {
    if T::FILTER_FIELDS.contains(&field) {
        Ok(())
    } else {
        Err(QueryError::UnknownFilter(field.to_string()))
    }
}

pub fn ensure_sort_field<T: Listable>(field: &str) -> Result<(), QueryError> {
    if T::SORT_FIELDS.contains(&field) {
        Ok(())
    } else {
        Err(QueryError::UnknownSortField(field.to_string()))
    }
}

/// Trimmed filter value, or `None` when the value means "no filter".
pub fn normalize_filter(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() || value.eq_ignore_ascii_case(FILTER_ALL) {
        None
    } else {
        Some(value.to_string())
    }
}

/// Trimmed search text, or `None` when blank.
pub fn normalize_search(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

fn parse_number(params: &HashMap<String, String>, key: &'static str) -> Result<Option<u32>, QueryError> {
    params
        .get(key)
        .map(|raw| {
            raw.trim()
                .parse::<u32>()
                .map_err(|_| QueryError::InvalidNumber {
                    param: key,
                    value: raw.clone(),
                })
        })
        .transpose()
}

/// Whether `record` satisfies every active filter and the search text.
pub fn matches<T: Listable>(record: &T, query: &ListQuery) -> bool {
    let filters_match = query.filters.iter().all(|(field, expected)| {
        record
            .filter_value(field)
            .is_some_and(|actual| actual.eq_ignore_ascii_case(expected))
    });
    if !filters_match {
        return false;
    }

    match &query.search {
        None => true,
        Some(needle) => {
            let needle = needle.to_lowercase();
            T::SEARCH_FIELDS.iter().any(|field| {
                record
                    .search_text(field)
                    .is_some_and(|text| text.to_lowercase().contains(&needle))
            })
        }
    }
}

pub fn filter_records<'a, T: Listable>(records: &'a [T], query: &ListQuery) -> Vec<&'a T> {
    records.iter().filter(|r| matches(*r, query)).collect()
}

/// Stable single-key sort. Descending reverses the comparator, so records
/// with equal keys keep their relative order in both directions.
pub fn sort_records<T: Listable>(records: &mut [&T], sort: &SortSpec) {
    match sort.direction {
        SortDirection::Asc => records.sort_by_cached_key(|r| r.sort_value(&sort.field)),
        SortDirection::Desc => {
            records.sort_by_cached_key(|r| Reverse(r.sort_value(&sort.field)))
        }
    }
}

/// Slice one page out of `items`, clamping the requested page into
/// `[1, total_pages]`.
pub fn paginate<U>(items: &[U], page: u32, page_size: u32) -> (&[U], PaginationMeta) {
    let page_size = page_size.max(1);
    let total_items = items.len() as u64;
    let total_pages = PaginationMeta::total_pages(total_items, page_size);
    let page = page.clamp(1, total_pages.max(1));

    let start = ((page - 1) as usize).saturating_mul(page_size as usize).min(items.len());
    let end = start.saturating_add(page_size as usize).min(items.len());
    let window = &items[start..end];

    (
        window,
        PaginationMeta::for_window(page, page_size, total_items, window.len()),
    )
}

/// Output of one deriver pass
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub meta: PaginationMeta,
    pub empty_message: Option<String>,
}

/// Run the full filter → sort → paginate pipeline.
pub fn derive<T: Listable + Clone>(records: &[T], query: &ListQuery) -> Page<T> {
    let mut matched = filter_records(records, query);
    sort_records(&mut matched, &query.resolved_sort::<T>());

    let (window, meta) = paginate(&matched, query.page, query.page_size);
    let items: Vec<T> = window.iter().map(|r| (*r).clone()).collect();

    let empty_message = matched.is_empty().then(|| empty_message::<T>(query));

    Page {
        items,
        meta,
        empty_message,
    }
}

pub fn empty_message<T: Listable>(query: &ListQuery) -> String {
    if query.has_active_filters() {
        format!("No {} match the current filters", T::LABEL)
    } else {
        format!("No {} found", T::LABEL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Row {
        id: u32,
        title: String,
        status: &'static str,
        hits: u64,
    }

    impl Listable for Row {
        const LABEL: &'static str = "rows";
        const SEARCH_FIELDS: &'static [&'static str] = &["title"];
        const FILTER_FIELDS: &'static [&'static str] = &["status"];
        const SORT_FIELDS: &'static [&'static str] = &["title", "hits"];
        const DEFAULT_SORT: (&'static str, SortDirection) = ("hits", SortDirection::Desc);

        fn search_text(&self, field: &str) -> Option<&str> {
            match field {
                "title" => Some(&self.title),
                _ => None,
            }
        }

        fn filter_value(&self, field: &str) -> Option<Cow<'_, str>> {
            match field {
                "status" => Some(Cow::Borrowed(self.status)),
                _ => None,
            }
        }

        fn sort_value(&self, field: &str) -> SortValue {
            match field {
                "title" => SortValue::text(&self.title),
                "hits" => SortValue::count(self.hits),
                _ => SortValue::Missing,
            }
        }
    }

    fn rows(n: u32) -> Vec<Row> {
        (1..=n)
            .map(|id| Row {
                id,
                title: format!("Row {:02}", id),
                status: if id % 2 == 0 { "published" } else { "draft" },
                hits: u64::from(id),
            })
            .collect()
    }

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn eighteen_rows_split_into_two_pages() {
        let records = rows(18);
        let query = ListQuery::from_params(
            &params(&[("page", "2"), ("per_page", "10"), ("sort_by", "title")]),
            10,
        )
        .unwrap();

        let page = derive(&records, &query);
        assert_eq!(page.meta.total_pages, 2);
        assert_eq!(page.items.len(), 8);
        assert_eq!(page.items[0].id, 11);
        assert_eq!(page.meta.summary, "Showing 11 to 18 of 18 entries");
        assert!(page.empty_message.is_none());
    }

    #[test]
    fn all_filter_value_is_inactive() {
        let query = ListQuery::from_params(&params(&[("status", "all"), ("q", "  ")]), 10).unwrap();
        assert!(query.filters.is_empty());
        assert!(query.search.is_none());
    }

    #[test]
    fn filters_and_search_are_conjunctive() {
        let records = rows(20);
        let query = ListQuery::from_params(
            &params(&[("status", "Published"), ("search", "row 1")]),
            10,
        )
        .unwrap();

        let page = derive(&records, &query);
        let ids: Vec<u32> = page.items.iter().map(|r| r.id).collect();
        // default sort is hits desc
        assert_eq!(ids, vec![18, 16, 14, 12, 10]);
    }

    #[test]
    fn empty_result_has_message_and_zero_pages() {
        let records = rows(5);
        let query = ListQuery::from_params(&params(&[("search", "nothing")]), 10).unwrap();

        let page = derive(&records, &query);
        assert!(page.items.is_empty());
        assert_eq!(page.meta.total_pages, 0);
        assert_eq!(page.meta.page, 1);
        assert_eq!(
            page.empty_message.as_deref(),
            Some("No rows match the current filters")
        );
    }

    #[test]
    fn page_past_the_end_is_clamped() {
        let records = rows(12);
        let query = ListQuery::from_params(&params(&[("page", "9")]), 5).unwrap();
        let page = derive(&records, &query);
        assert_eq!(page.meta.page, 3);
        assert_eq!(page.items.len(), 2);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let query = ListQuery::from_params(&params(&[("colour", "red")]), 10).unwrap();
        assert!(matches!(
            query.validate::<Row>(),
            Err(QueryError::UnknownFilter(field)) if field == "colour"
        ));

        let query = ListQuery::from_params(&params(&[("sort_by", "status")]), 10).unwrap();
        assert!(matches!(
            query.validate::<Row>(),
            Err(QueryError::UnknownSortField(_))
        ));
    }

    #[test]
    fn bad_numbers_and_sort_order_are_rejected() {
        assert!(ListQuery::from_params(&params(&[("page", "two")]), 10).is_err());
        assert!(ListQuery::from_params(&params(&[("sort_order", "up")]), 10).is_err());
    }

    #[test]
    fn sort_order_alone_applies_to_default_field() {
        let query = ListQuery::from_params(&params(&[("sort_order", "asc")]), 10).unwrap();
        assert_eq!(
            query.resolved_sort::<Row>(),
            SortSpec::new("hits", SortDirection::Asc)
        );
    }

    #[test]
    fn text_sort_ignores_case() {
        let records = vec![
            Row { id: 1, title: "beta".into(), status: "draft", hits: 0 },
            Row { id: 2, title: "Alpha".into(), status: "draft", hits: 0 },
            Row { id: 3, title: "alpha".into(), status: "draft", hits: 0 },
        ];
        let mut refs: Vec<&Row> = records.iter().collect();
        sort_records(&mut refs, &SortSpec::new("title", SortDirection::Asc));
        let ids: Vec<u32> = refs.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    fn arb_rows() -> impl Strategy<Value = Vec<Row>> {
        prop::collection::vec(
            ("[a-zA-Z ]{0,8}", prop::bool::ANY, 0u64..50),
            0..60,
        )
        .prop_map(|items| {
            items
                .into_iter()
                .enumerate()
                .map(|(i, (title, published, hits))| Row {
                    id: i as u32,
                    title,
                    status: if published { "published" } else { "draft" },
                    hits,
                })
                .collect()
        })
    }

    proptest! {
        #[test]
        fn filter_yields_subset_satisfying_predicate(records in arb_rows(), needle in "[a-z]{0,2}") {
            let query = ListQuery {
                filters: BTreeMap::from([("status".to_string(), "published".to_string())]),
                search: normalize_search(&needle),
                ..ListQuery::default()
            };
            let filtered = filter_records(&records, &query);
            prop_assert!(filtered.len() <= records.len());
            for r in filtered {
                prop_assert_eq!(r.status, "published");
                prop_assert!(needle.is_empty() || r.title.to_lowercase().contains(&needle));
            }
        }

        #[test]
        fn sort_is_idempotent(records in arb_rows(), desc in prop::bool::ANY, by_title in prop::bool::ANY) {
            let spec = SortSpec::new(
                if by_title { "title" } else { "hits" },
                if desc { SortDirection::Desc } else { SortDirection::Asc },
            );
            let mut once: Vec<&Row> = records.iter().collect();
            sort_records(&mut once, &spec);
            let mut twice = once.clone();
            sort_records(&mut twice, &spec);
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn pages_cover_the_list_exactly_once(records in arb_rows(), page_size in 1u32..15) {
            let query = ListQuery { page_size, ..ListQuery::default() };
            let mut expected = filter_records(&records, &query);
            sort_records(&mut expected, &query.resolved_sort::<Row>());
            let expected: Vec<u32> = expected.iter().map(|r| r.id).collect();

            let first = derive(&records, &query);
            let total_pages = first.meta.total_pages;
            prop_assert_eq!(total_pages == 0, records.is_empty());

            let mut seen = Vec::new();
            for page in 1..=total_pages {
                let page = derive(&records, &ListQuery { page, ..query.clone() });
                seen.extend(page.items.iter().map(|r| r.id));
            }
            prop_assert_eq!(seen, expected);
        }
    }
}
