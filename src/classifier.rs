//! Column classification.
//!
//! Header cells are matched against keyword lists per [`SemanticField`]. A cell
//! is a candidate for a field when its normalized text contains one of the
//! field's keywords, or a keyword contains the normalized text. Every candidate
//! is reported; ties are left to whoever confirms the mapping.

use crate::types::{ColumnMapping, ColumnMatch, HeaderRow, SemanticField};
use std::collections::BTreeMap;
use tracing::{debug, info};

const DATE_KEYWORDS: &[&str] = &[
    "date",
    "transaction date",
    "posting date",
    "posted",
    "value date",
    "trans date",
    "txn date",
];

const DESCRIPTION_KEYWORDS: &[&str] = &[
    "description",
    "narrative",
    "narration",
    "details",
    "particulars",
    "memo",
];

const DEBIT_KEYWORDS: &[&str] = &[
    "debit",
    "debit amount",
    "dr amount",
    "withdrawal",
    "paid out",
    "money out",
];

const CREDIT_KEYWORDS: &[&str] = &[
    "credit",
    "credit amount",
    "cr amount",
    "deposit",
    "paid in",
    "money in",
];

const PAYEE_KEYWORDS: &[&str] = &[
    "payee",
    "beneficiary",
    "merchant",
    "counterparty",
    "recipient",
    "name",
];

const REFERENCE_KEYWORDS: &[&str] = &["reference", "ref no", "transaction id", "fitid"];

const CHECK_NUMBER_KEYWORDS: &[&str] = &[
    "check number",
    "cheque number",
    "check no",
    "cheque no",
    "chq no",
];

/// Lower-case keyword lists per field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternSet {
    keywords: BTreeMap<SemanticField, Vec<String>>,
}

impl PatternSet {
    /// Build a pattern set from explicit keyword lists. Keywords are trimmed and
    /// lower-cased; empty ones are dropped.
    pub fn new<I, K, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (SemanticField, K)>,
        K: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut keywords: BTreeMap<SemanticField, Vec<String>> = BTreeMap::new();
        for (field, words) in entries {
            let list = keywords.entry(field).or_default();
            list.extend(
                words
                    .into_iter()
                    .map(|w| w.as_ref().trim().to_lowercase())
                    .filter(|w| !w.is_empty()),
            );
        }
        Self { keywords }
    }

    /// Keywords for `field`; empty when the field has none.
    pub fn keywords(&self, field: SemanticField) -> &[String] {
        self.keywords.get(&field).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Whether `header` (already normalized) is a candidate for `field`.
    fn matches(&self, field: SemanticField, header: &str) -> bool {
        self.keywords(field)
            .iter()
            .any(|k| header.contains(k.as_str()) || k.contains(header))
    }
}

impl Default for PatternSet {
    fn default() -> Self {
        Self::new([
            (SemanticField::Date, DATE_KEYWORDS),
            (SemanticField::Description, DESCRIPTION_KEYWORDS),
            (SemanticField::Debit, DEBIT_KEYWORDS),
            (SemanticField::Credit, CREDIT_KEYWORDS),
            (SemanticField::Payee, PAYEE_KEYWORDS),
            (SemanticField::Reference, REFERENCE_KEYWORDS),
            (SemanticField::CheckNumber, CHECK_NUMBER_KEYWORDS),
        ])
    }
}

/// Candidate columns per field, as produced by [`classify`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ColumnSuggestions {
    matches: BTreeMap<SemanticField, Vec<ColumnMatch>>,
}

impl ColumnSuggestions {
    /// All candidates for `field`, in column order.
    pub fn candidates(&self, field: SemanticField) -> &[ColumnMatch] {
        self.matches.get(&field).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The candidate for `field` when there is exactly one.
    pub fn sole_candidate(&self, field: SemanticField) -> Option<&ColumnMatch> {
        match self.candidates(field) {
            [only] => Some(only),
            _ => None,
        }
    }

    /// Mapping made of every field with exactly one candidate.
    ///
    /// Never applied by the library itself; a caller must opt in. A column that
    /// is the sole candidate of several fields goes to the first of them in
    /// [`SemanticField::ALL`] order.
    pub fn unambiguous_mapping(&self) -> ColumnMapping {
        SemanticField::ALL
            .iter()
            .filter_map(|f| self.sole_candidate(*f))
            .fold(ColumnMapping::new(), |mapping, m| {
                mapping.with(m.field, m.column).unwrap_or(mapping)
            })
    }

    /// Total number of (field, column) candidates.
    pub fn len(&self) -> usize {
        self.matches.values().map(Vec::len).sum()
    }

    /// Whether no header cell matched any field.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Suggest candidate columns for every field. Pure; never touches a mapping.
pub fn classify(header: &HeaderRow, patterns: &PatternSet) -> ColumnSuggestions {
    let mut matches: BTreeMap<SemanticField, Vec<ColumnMatch>> = BTreeMap::new();

    for cell in header.cells() {
        let normalized = cell.text.trim().to_lowercase();
        if normalized.is_empty() {
            continue;
        }

        for field in SemanticField::ALL {
            if patterns.matches(field, &normalized) {
                debug!(column = cell.column, header = %cell.text, %field, "candidate column");
                matches.entry(field).or_default().push(ColumnMatch {
                    field,
                    column: cell.column,
                    header: cell.text.clone(),
                });
            }
        }
    }

    let suggestions = ColumnSuggestions { matches };
    info!(candidates = suggestions.len(), "classified header columns");
    suggestions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Row;

    fn header(cells: &[&str]) -> HeaderRow {
        let row: Row = cells.iter().copied().collect();
        HeaderRow::from_row(&row)
    }

    fn columns(s: &ColumnSuggestions, field: SemanticField) -> Vec<usize> {
        s.candidates(field).iter().map(|m| m.column).collect()
    }

    #[test]
    fn test_classify_typical_header() {
        let h = header(&["Transaction Date", "Narrative", "Debit Amount", "Credit Amount"]);
        let s = classify(&h, &PatternSet::default());

        assert_eq!(columns(&s, SemanticField::Date), vec![0]);
        assert_eq!(columns(&s, SemanticField::Description), vec![1]);
        assert_eq!(columns(&s, SemanticField::Debit), vec![2]);
        assert_eq!(columns(&s, SemanticField::Credit), vec![3]);
        assert!(s.candidates(SemanticField::Payee).is_empty());
        assert_eq!(s.candidates(SemanticField::Debit)[0].header, "Debit Amount");
    }

    #[test]
    fn test_abbreviation_contained_in_keyword() {
        let h = header(&["Date", "Dr", "Cr"]);
        let s = classify(&h, &PatternSet::default());

        assert_eq!(columns(&s, SemanticField::Debit), vec![1]);
        assert!(columns(&s, SemanticField::Credit).contains(&2));
    }

    #[test]
    fn test_ties_are_all_surfaced() {
        let h = header(&["Posting Date", "Value Date", "Debit", "Credit"]);
        let s = classify(&h, &PatternSet::default());

        assert_eq!(columns(&s, SemanticField::Date), vec![0, 1]);
        assert!(s.sole_candidate(SemanticField::Date).is_none());
        assert_eq!(s.sole_candidate(SemanticField::Debit).map(|m| m.column), Some(2));
    }

    #[test]
    fn test_unambiguous_mapping_skips_ties() {
        let h = header(&["Posting Date", "Value Date", "Debit", "Credit"]);
        let mapping = classify(&h, &PatternSet::default()).unambiguous_mapping();

        assert_eq!(mapping.get(SemanticField::Date), None);
        assert_eq!(mapping.get(SemanticField::Debit), Some(2));
        assert_eq!(mapping.get(SemanticField::Credit), Some(3));
    }

    #[test]
    fn test_custom_patterns_are_normalized() {
        let patterns = PatternSet::new([(SemanticField::Date, vec!["  DATUM ", ""])]);
        assert_eq!(patterns.keywords(SemanticField::Date), &["datum".to_string()]);
        assert!(patterns.keywords(SemanticField::Debit).is_empty());

        let s = classify(&header(&["Datum", "Soll"]), &patterns);
        assert_eq!(columns(&s, SemanticField::Date), vec![0]);
        assert_eq!(s.len(), 1);
    }
}
