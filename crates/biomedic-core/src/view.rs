// ABOUTME: Filter-sort-paginate engine: a pure function from records + view inputs to one visible page.
// ABOUTME: Filters on name/manufacturer/description, keeps list order, slices by page, attaches highlights.

use serde::{Deserialize, Serialize};

use crate::highlight::Highlights;
use crate::record::EquipmentRecord;

/// Inputs to one view computation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewQuery {
    /// Free-text search as typed; trimmed before use.
    pub text: String,
    pub favorites_only: bool,
    /// 1-based page number.
    pub page: usize,
    pub page_size: usize,
}

impl ViewQuery {
    /// The trimmed, lowercased search term. Empty means "no text filter".
    pub fn term(&self) -> String {
        self.text.trim().to_lowercase()
    }
}

/// One record on the visible page, with the spans to highlight.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisibleRecord<'a> {
    pub record: &'a EquipmentRecord,
    pub highlights: Highlights,
}

/// The computed page plus pagination metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewPage<'a> {
    pub items: Vec<VisibleRecord<'a>>,
    pub filtered_count: usize,
    pub total_pages: usize,
    /// The requested page, raised to 1 if 0 was requested. Never lowered to
    /// `total_pages`: a page past the end yields an empty slice.
    pub current_page: usize,
}

/// Whether `record` passes the text filter for an already-lowercased term.
/// Model and serial number are deliberately not searched.
pub fn matches_term(record: &EquipmentRecord, term: &str) -> bool {
    term.is_empty()
        || record.name.to_lowercase().contains(term)
        || record.manufacturer.to_lowercase().contains(term)
        || record.description.to_lowercase().contains(term)
}

/// Every record that survives the favorites restriction and the text filter,
/// in list order.
pub fn filter_records<'a, F>(
    records: &'a [EquipmentRecord],
    query: &ViewQuery,
    is_favorite: F,
) -> Vec<&'a EquipmentRecord>
where
    F: Fn(&str) -> bool,
{
    let term = query.term();
    records
        .iter()
        .filter(|r| !query.favorites_only || is_favorite(&r.name))
        .filter(|r| matches_term(r, &term))
        .collect()
}

/// `ceil(count / page_size)`, 0 for an empty list. A zero page size is
/// treated as 1.
pub fn total_pages(count: usize, page_size: usize) -> usize {
    count.div_ceil(page_size.max(1))
}

/// Compute the visible page. Callers reset `query.page` to 1 whenever the
/// text, favorites flag, or page size changes; the engine never does.
pub fn compute_view<'a, F>(
    records: &'a [EquipmentRecord],
    query: &ViewQuery,
    is_favorite: F,
) -> ViewPage<'a>
where
    F: Fn(&str) -> bool,
{
    let filtered = filter_records(records, query, is_favorite);
    let page_size = query.page_size.max(1);
    let current_page = query.page.max(1);
    let term = query.term();

    let items = filtered
        .iter()
        .skip((current_page - 1).saturating_mul(page_size))
        .take(page_size)
        .map(|&record| VisibleRecord {
            record,
            highlights: Highlights::for_record(record, &term),
        })
        .collect();

    ViewPage {
        items,
        filtered_count: filtered.len(),
        total_pages: total_pages(filtered.len(), page_size),
        current_page,
    }
}
