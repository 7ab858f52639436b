//! Aggregations over a list of expenses: the grand total, totals per category and totals per
//! month. Every running total is rounded to the cent after each step.

use crate::model::{Amount, Category, Expense};
use std::collections::BTreeMap;

/// The rounded sum of all amounts. Zero for an empty list.
pub fn total(expenses: &[Expense]) -> Amount {
    expenses.iter().map(|e| e.amount).sum::<Amount>().round2()
}

/// Totals per category, in the order each category is first encountered in `expenses`.
pub fn by_category(expenses: &[Expense]) -> Vec<(Category, Amount)> {
    let mut totals: Vec<(Category, Amount)> = Vec::new();
    for expense in expenses {
        match totals.iter_mut().find(|(c, _)| *c == expense.category) {
            Some((_, sum)) => *sum = (*sum + expense.amount).round2(),
            None => totals.push((expense.category, expense.amount.round2())),
        }
    }
    totals
}

/// Totals per calendar month, keyed `YYYY-MM` and ordered oldest first.
pub fn by_month(expenses: &[Expense]) -> Vec<(String, Amount)> {
    let mut totals: BTreeMap<String, Amount> = BTreeMap::new();
    for expense in expenses {
        let month = expense.date.format("%Y-%m").to_string();
        let sum = totals.entry(month).or_default();
        *sum = (*sum + expense.amount).round2();
    }
    totals.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ExpenseDraft;
    use chrono::{NaiveDate, Utc};
    use std::str::FromStr;

    fn amount(s: &str) -> Amount {
        Amount::from_str(s).unwrap()
    }

    fn expense(amt: &str, category: Category, date: &str) -> Expense {
        let draft = ExpenseDraft::new(
            amount(amt),
            category,
            None,
            NaiveDate::from_str(date).unwrap(),
        );
        Expense::from_draft(crate::utils::generate_expense_id(), Utc::now(), draft)
    }

    #[test]
    fn test_total_of_nothing_is_zero() {
        assert_eq!(total(&[]), Amount::ZERO);
        assert_eq!(total(&[]).to_string(), "0.00");
    }

    #[test]
    fn test_total_rounds_to_cents() {
        let rows = vec![
            expense("0.105", Category::Food, "2025-11-01"),
            expense("0.0", Category::Food, "2025-11-01"),
        ];
        assert_eq!(total(&rows), amount("0.11"));
    }

    #[test]
    fn test_by_category_keeps_first_encounter_order() {
        let rows = vec![
            expense("120.00", Category::Bills, "2025-11-01"),
            expense("9.99", Category::Food, "2025-11-02"),
            expense("22.00", Category::Food, "2025-11-03"),
        ];
        assert_eq!(
            by_category(&rows),
            vec![
                (Category::Bills, amount("120.00")),
                (Category::Food, amount("31.99"))
            ]
        );
    }

    #[test]
    fn test_by_month_sorted_oldest_first() {
        let rows = vec![
            expense("5", Category::Other, "2025-12-01"),
            expense("1.25", Category::Health, "2025-11-30"),
            expense("2.25", Category::Health, "2025-11-02"),
        ];
        assert_eq!(
            by_month(&rows),
            vec![
                ("2025-11".to_string(), amount("3.50")),
                ("2025-12".to_string(), amount("5"))
            ]
        );
    }
}
