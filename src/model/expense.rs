use crate::error::Res;
use crate::model::{Amount, Category};
use crate::utils::generate_expense_id;
use anyhow::ensure;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A single spending event.
///
/// The `id` and `created_at` are assigned once, by the server or locally when there is no server,
/// and cannot be changed afterwards. The remaining fields are public so that an edit copy can be
/// modified before it is saved.
///
/// Serialized with camelCase field names, e.g.:
/// ```json
/// {
///   "id": "5f0c1b0e-8d1e-4c1e-9f3a-2f0d3b1c4a5e",
///   "amount": 9.99,
///   "category": "Food",
///   "note": "Sandwich",
///   "date": "2025-11-02",
///   "createdAt": "2025-11-02T09:15:30Z"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    id: String,
    pub amount: Amount,
    pub category: Category,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub date: NaiveDate,
    created_at: DateTime<Utc>,
}

impl Expense {
    /// Builds an expense from a draft once an id and creation time have been assigned.
    pub fn from_draft(
        id: impl Into<String>,
        created_at: DateTime<Utc>,
        draft: ExpenseDraft,
    ) -> Self {
        Self {
            id: id.into(),
            amount: draft.amount,
            category: draft.category,
            note: draft.note,
            date: draft.date,
            created_at,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// The note, or an empty string when there is none.
    pub fn note_str(&self) -> &str {
        self.note.as_deref().unwrap_or_default()
    }

    /// The user-supplied fields, without `id` and `created_at`.
    pub fn to_draft(&self) -> ExpenseDraft {
        ExpenseDraft {
            amount: self.amount,
            category: self.category,
            note: self.note.clone(),
            date: self.date,
        }
    }
}

/// The fields of an `Expense` that the user supplies. This is the body of a create request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseDraft {
    pub amount: Amount,
    pub category: Category,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub date: NaiveDate,
}

impl ExpenseDraft {
    /// Creates a draft. A blank note is treated as no note.
    pub fn new(
        amount: Amount,
        category: Category,
        note: Option<String>,
        date: NaiveDate,
    ) -> Self {
        Self {
            amount,
            category,
            note: note.filter(|n| !n.trim().is_empty()),
            date,
        }
    }

    /// Checks the rules the entry form enforces: an amount of at least one cent and below one
    /// trillion. Amounts are sent as JSON numbers, which keep about 15 significant digits.
    pub fn validate(&self) -> Res<()> {
        ensure!(
            self.amount.value() >= min_amount(),
            "The amount must be at least 0.01, got {}",
            self.amount.value()
        );
        ensure!(
            self.amount.value() < max_amount(),
            "The amount must be less than {}, got {}",
            max_amount(),
            self.amount.value()
        );
        Ok(())
    }
}

fn min_amount() -> Decimal {
    Decimal::new(1, 2)
}

fn max_amount() -> Decimal {
    Decimal::new(1_000_000_000_000, 0)
}

/// The sample data a fresh local-only install starts with.
pub(crate) fn demo_expenses() -> Vec<Expense> {
    let now = Utc::now();
    [
        ("9.99", Category::Food, "Sandwich", "2025-11-02"),
        ("120.00", Category::Bills, "Electricity", "2025-11-01"),
        ("35.50", Category::Travel, "Taxi", "2025-11-03"),
        ("22.00", Category::Food, "Lunch", "2025-11-03"),
    ]
    .into_iter()
    .filter_map(|(amount, category, note, date)| {
        let draft = ExpenseDraft::new(
            Amount::from_str(amount).ok()?,
            category,
            Some(note.to_string()),
            NaiveDate::from_str(date).ok()?,
        );
        Some(Expense::from_draft(generate_expense_id(), now, draft))
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(amount: &str) -> ExpenseDraft {
        ExpenseDraft::new(
            Amount::from_str(amount).unwrap(),
            Category::Food,
            Some("Sandwich".into()),
            NaiveDate::from_ymd_opt(2025, 11, 2).unwrap(),
        )
    }

    #[test]
    fn test_json_shape() {
        let created_at = DateTime::parse_from_rfc3339("2025-11-02T09:15:30Z")
            .unwrap()
            .with_timezone(&Utc);
        let expense = Expense::from_draft("e1", created_at, draft("9.99"));
        let value = serde_json::to_value(&expense).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "id": "e1",
                "amount": 9.99,
                "category": "Food",
                "note": "Sandwich",
                "date": "2025-11-02",
                "createdAt": "2025-11-02T09:15:30Z"
            })
        );
    }

    #[test]
    fn test_missing_note_deserializes() {
        let json = r#"{"id":"x","amount":120,"category":"Bills","date":"2025-11-01","createdAt":"2025-11-01T00:00:00Z"}"#;
        let expense: Expense = serde_json::from_str(json).unwrap();
        assert_eq!(expense.note, None);
        assert_eq!(expense.note_str(), "");
        assert_eq!(expense.id(), "x");
    }

    #[test]
    fn test_blank_note_is_none() {
        let d = ExpenseDraft::new(
            Amount::from_str("1").unwrap(),
            Category::Other,
            Some("   ".into()),
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
        );
        assert_eq!(d.note, None);
    }

    #[test]
    fn test_validate_amount() {
        assert!(draft("0.01").validate().is_ok());
        assert!(draft("0").validate().is_err());
        assert!(draft("-5").validate().is_err());
        assert!(draft("999999999999.99").validate().is_ok());
        let err = draft("50000000000000000000000000000").validate().unwrap_err();
        assert!(err.to_string().contains("less than 1000000000000"), "{err}");
    }

    #[test]
    fn test_to_draft_drops_identity() {
        let expense = Expense::from_draft("e1", Utc::now(), draft("3"));
        assert_eq!(expense.to_draft(), draft("3"));
    }

    #[test]
    fn test_demo_expenses_have_unique_ids() {
        let demo = demo_expenses();
        assert_eq!(demo.len(), 4);
        assert_ne!(demo[0].id(), demo[1].id());
    }
}
