// ABOUTME: Case-insensitive literal match spans for highlighting search hits on a record card.
// ABOUTME: The query is never interpreted as a pattern; spans are byte ranges into the original text.

use serde::{Deserialize, Serialize};

use crate::record::EquipmentRecord;

/// Half-open byte range `[start, end)` into the highlighted text. Both ends
/// fall on char boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

/// Match spans for every field a card displays. Model and serial number are
/// highlighted even though they do not take part in filtering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Highlights {
    pub name: Vec<Span>,
    pub manufacturer: Vec<Span>,
    pub model: Vec<Span>,
    pub serial_number: Vec<Span>,
    pub description: Vec<Span>,
}

impl Highlights {
    pub fn for_record(record: &EquipmentRecord, query: &str) -> Self {
        Self {
            name: find_matches(&record.name, query),
            manufacturer: find_matches(&record.manufacturer, query),
            model: find_matches(&record.model, query),
            serial_number: find_matches(&record.serial_number, query),
            description: find_matches(&record.description, query),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_empty()
            && self.manufacturer.is_empty()
            && self.model.is_empty()
            && self.serial_number.is_empty()
            && self.description.is_empty()
    }
}

/// Find every non-overlapping, case-insensitive occurrence of `needle` in
/// `text`, scanning left to right. An empty needle matches nothing.
pub fn find_matches(text: &str, needle: &str) -> Vec<Span> {
    let needle: Vec<char> = needle.chars().flat_map(char::to_lowercase).collect();
    if needle.is_empty() || text.is_empty() {
        return Vec::new();
    }

    // Lowercased chars of `text`, each tagged with the byte range of the
    // original char it came from.
    let folded: Vec<(char, usize, usize)> = text
        .char_indices()
        .flat_map(|(start, c)| {
            let end = start + c.len_utf8();
            c.to_lowercase().map(move |lc| (lc, start, end))
        })
        .collect();

    let mut spans: Vec<Span> = Vec::new();
    let mut i = 0;
    while i + needle.len() <= folded.len() {
        let window = &folded[i..i + needle.len()];
        if window.iter().zip(&needle).all(|((c, _, _), n)| c == n) {
            let span = Span {
                start: window[0].1,
                end: window[needle.len() - 1].2,
            };
            match spans.last_mut() {
                Some(last) if span.start < last.end => last.end = last.end.max(span.end),
                _ => spans.push(span),
            }
            i += needle.len();
        } else {
            i += 1;
        }
    }
    spans
}
