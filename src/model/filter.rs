//! The filter and sort configuration applied to the expense list.

use crate::model::{Category, Expense};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// The field the expense list is sorted on.
#[derive(
    Debug, Default, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    #[default]
    Date,
    Amount,
}

serde_plain::derive_display_from_serialize!(SortBy);
serde_plain::derive_fromstr_from_deserialize!(SortBy);

#[derive(
    Debug, Default, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum SortDir {
    Asc,
    #[default]
    Desc,
}

serde_plain::derive_display_from_serialize!(SortDir);
serde_plain::derive_fromstr_from_deserialize!(SortDir);

/// The active filter. The default shows everything, newest date first.
///
/// `from_date` and `to_date` are inclusive and each may be absent. Nothing checks that
/// `from_date <= to_date`; an inverted range simply matches nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseFilter {
    pub category: Option<Category>,
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
    pub search: Option<String>,
    pub sort_by: SortBy,
    pub sort_dir: SortDir,
}

impl ExpenseFilter {
    /// True if `expense` passes the category, date range and note search restrictions.
    pub fn matches(&self, expense: &Expense) -> bool {
        self.category.map_or(true, |c| c == expense.category)
            && in_range(expense.date, self.from_date, self.to_date)
            && self.matches_search(expense)
    }

    fn matches_search(&self, expense: &Expense) -> bool {
        match self.search.as_deref() {
            None | Some("") => true,
            Some(query) => expense
                .note_str()
                .to_lowercase()
                .contains(&query.to_lowercase()),
        }
    }

    /// Returns a new list holding the matching expenses, sorted. `expenses` is left untouched.
    /// The sort is stable, so ties keep their order from `expenses`.
    pub fn apply(&self, expenses: &[Expense]) -> Vec<Expense> {
        let mut rows: Vec<Expense> = expenses
            .iter()
            .filter(|e| self.matches(e))
            .cloned()
            .collect();
        rows.sort_by(|a, b| self.compare(a, b));
        rows
    }

    fn compare(&self, a: &Expense, b: &Expense) -> Ordering {
        let ordering = match self.sort_by {
            SortBy::Date => a.date.cmp(&b.date),
            SortBy::Amount => a.amount.value().cmp(&b.amount.value()),
        };
        match self.sort_dir {
            SortDir::Asc => ordering,
            SortDir::Desc => ordering.reverse(),
        }
    }

    /// Applies `patch`, leaving the fields it does not mention unchanged.
    pub fn merge(&mut self, patch: FilterPatch) {
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(from_date) = patch.from_date {
            self.from_date = from_date;
        }
        if let Some(to_date) = patch.to_date {
            self.to_date = to_date;
        }
        if let Some(search) = patch.search {
            self.search = search;
        }
        if let Some(sort_by) = patch.sort_by {
            self.sort_by = sort_by;
        }
        if let Some(sort_dir) = patch.sort_dir {
            self.sort_dir = sort_dir;
        }
    }
}

/// A partial update to an `ExpenseFilter`.
///
/// For the optional filter fields, `None` means "leave as is" and `Some(None)` means "clear".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterPatch {
    pub category: Option<Option<Category>>,
    pub from_date: Option<Option<NaiveDate>>,
    pub to_date: Option<Option<NaiveDate>>,
    pub search: Option<Option<String>>,
    pub sort_by: Option<SortBy>,
    pub sort_dir: Option<SortDir>,
}

impl FilterPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn category(mut self, category: Option<Category>) -> Self {
        self.category = Some(category);
        self
    }

    pub fn from_date(mut self, from_date: Option<NaiveDate>) -> Self {
        self.from_date = Some(from_date);
        self
    }

    pub fn to_date(mut self, to_date: Option<NaiveDate>) -> Self {
        self.to_date = Some(to_date);
        self
    }

    pub fn search(mut self, search: Option<String>) -> Self {
        self.search = Some(search);
        self
    }

    pub fn sort_by(mut self, sort_by: SortBy) -> Self {
        self.sort_by = Some(sort_by);
        self
    }

    pub fn sort_dir(mut self, sort_dir: SortDir) -> Self {
        self.sort_dir = Some(sort_dir);
        self
    }

    pub fn is_empty(&self) -> bool {
        self == &FilterPatch::default()
    }
}

/// Inclusive range check where either bound may be missing.
pub fn in_range(date: NaiveDate, from: Option<NaiveDate>, to: Option<NaiveDate>) -> bool {
    from.map_or(true, |from| date >= from) && to.map_or(true, |to| date <= to)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Amount, ExpenseDraft};
    use chrono::Utc;
    use std::str::FromStr;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::from_str(s).unwrap()
    }

    fn expense(id: &str, amount: &str, category: Category, d: &str, note: Option<&str>) -> Expense {
        let draft = ExpenseDraft::new(
            Amount::from_str(amount).unwrap(),
            category,
            note.map(String::from),
            date(d),
        );
        Expense::from_draft(id, Utc::now(), draft)
    }

    fn sample() -> Vec<Expense> {
        vec![
            expense("a", "9.99", Category::Food, "2025-11-02", Some("Sandwich")),
            expense("b", "120.00", Category::Bills, "2025-11-01", Some("Electricity")),
            expense("c", "35.50", Category::Travel, "2025-11-03", Some("Taxi")),
            expense("d", "22.00", Category::Food, "2025-11-03", None),
        ]
    }

    fn ids(rows: &[Expense]) -> Vec<&str> {
        rows.iter().map(|e| e.id()).collect()
    }

    #[test]
    fn test_default_sorts_by_date_descending() {
        let rows = ExpenseFilter::default().apply(&sample());
        assert_eq!(ids(&rows), vec!["c", "d", "a", "b"]);
    }

    #[test]
    fn test_amount_ascending() {
        let mut filter = ExpenseFilter::default();
        filter.merge(FilterPatch::new().sort_by(SortBy::Amount).sort_dir(SortDir::Asc));
        let rows = filter.apply(&sample());
        assert_eq!(ids(&rows), vec!["a", "d", "c", "b"]);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let mut filter = ExpenseFilter::default();
        filter.merge(FilterPatch::new().sort_dir(SortDir::Asc));
        let rows = filter.apply(&sample());
        // c and d share a date and keep their relative order in both directions
        assert_eq!(ids(&rows), vec!["b", "a", "c", "d"]);
        let again = filter.apply(&sample());
        assert_eq!(ids(&rows), ids(&again));
    }

    #[test]
    fn test_category_filter() {
        let mut filter = ExpenseFilter::default();
        filter.merge(FilterPatch::new().category(Some(Category::Food)));
        let rows = filter.apply(&sample());
        assert!(rows.iter().all(|e| e.category == Category::Food));
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_date_range_is_inclusive() {
        let mut filter = ExpenseFilter::default();
        filter.merge(
            FilterPatch::new()
                .from_date(Some(date("2025-11-01")))
                .to_date(Some(date("2025-11-02"))),
        );
        let rows = filter.apply(&sample());
        assert_eq!(ids(&rows), vec!["a", "b"]);
    }

    #[test]
    fn test_open_ended_ranges() {
        let d = date("2025-11-02");
        assert!(in_range(d, None, None));
        assert!(in_range(d, Some(d), None));
        assert!(in_range(d, None, Some(d)));
        assert!(!in_range(d, Some(date("2025-11-03")), None));
        assert!(!in_range(d, None, Some(date("2025-11-01"))));
    }

    #[test]
    fn test_search_is_case_insensitive_and_missing_note_is_empty() {
        let mut filter = ExpenseFilter::default();
        filter.merge(FilterPatch::new().search(Some("TAX".into())));
        assert_eq!(ids(&filter.apply(&sample())), vec!["c"]);

        filter.merge(FilterPatch::new().search(Some(String::new())));
        assert_eq!(filter.apply(&sample()).len(), 4);
    }

    #[test]
    fn test_soundness_and_completeness() {
        let mut filter = ExpenseFilter::default();
        filter.merge(
            FilterPatch::new()
                .category(Some(Category::Food))
                .from_date(Some(date("2025-11-03"))),
        );
        let all = sample();
        let rows = filter.apply(&all);
        for e in &all {
            let included = rows.iter().any(|r| r.id() == e.id());
            assert_eq!(included, filter.matches(e), "mismatch for {}", e.id());
        }
    }

    #[test]
    fn test_apply_does_not_reorder_input() {
        let all = sample();
        let before = ids(&all).join(",");
        let _ = ExpenseFilter::default().apply(&all);
        assert_eq!(ids(&all).join(","), before);
    }

    #[test]
    fn test_merge_leaves_unset_fields_and_clears_explicitly() {
        let mut filter = ExpenseFilter::default();
        filter.merge(FilterPatch::new().category(Some(Category::Bills)));
        filter.merge(FilterPatch::new().sort_by(SortBy::Amount));
        assert_eq!(filter.category, Some(Category::Bills));
        assert_eq!(filter.sort_by, SortBy::Amount);
        filter.merge(FilterPatch::new().category(None));
        assert_eq!(filter.category, None);
        assert_eq!(filter.sort_by, SortBy::Amount);
    }

    #[test]
    fn test_inverted_range_matches_nothing() {
        let mut filter = ExpenseFilter::default();
        filter.merge(
            FilterPatch::new()
                .from_date(Some(date("2025-11-03")))
                .to_date(Some(date("2025-11-01"))),
        );
        assert!(filter.apply(&sample()).is_empty());
    }
}
