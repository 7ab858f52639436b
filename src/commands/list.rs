use crate::args::FilterArgs;
use crate::commands::Out;
use crate::model::{Currency, Expense};
use crate::{Result, Store};

/// Applies the filter options and lists the matching expenses, one per line.
pub async fn list(store: &mut Store, args: &FilterArgs) -> Result<Out<Vec<Expense>>> {
    apply_filter(store, args);
    let rows = store.filtered_expenses().to_vec();
    let currency = store.currency();

    let mut message = format!(
        "Showing {} of {} expenses, total {}",
        rows.len(),
        store.expenses().len(),
        store.total().display_with(currency)
    );
    for expense in &rows {
        message.push('\n');
        message.push_str(&format_row(expense, currency));
    }
    Ok(Out::new(message, rows))
}

/// Resets the filter if asked to, then merges in the options that were given.
pub(super) fn apply_filter(store: &mut Store, args: &FilterArgs) {
    if args.reset() {
        store.reset_filter();
    }
    let patch = args.patch();
    if !patch.is_empty() {
        store.set_filter(patch);
    }
}

fn format_row(expense: &Expense, currency: Currency) -> String {
    format!(
        "{}  {}  {:<8}  {:>12}  {}",
        expense.id(),
        expense.date,
        expense.category.label(),
        expense.amount.display_with(currency),
        expense.note_str()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Category, ExpenseFilter};
    use crate::test::TestEnv;
    use clap::Parser;

    fn filter_args(words: &[&str]) -> FilterArgs {
        FilterArgs::try_parse_from(std::iter::once("list").chain(words.iter().copied())).unwrap()
    }

    #[tokio::test]
    async fn test_list_sorted_by_amount() {
        let env = TestEnv::new().await;
        let mut store = env.store().await;

        let out = list(&mut store, &filter_args(&["--sort-by", "amount", "--sort-dir", "asc"]))
            .await
            .unwrap();

        let amounts: Vec<String> = out
            .structure()
            .unwrap()
            .iter()
            .map(|e| e.amount.to_string())
            .collect();
        assert_eq!(amounts, vec!["9.99", "22.00", "35.50", "120.00"]);
        assert!(out.message().starts_with("Showing 4 of 4 expenses, total ₨187.49"));
    }

    #[tokio::test]
    async fn test_list_filter_persists_until_reset() {
        let env = TestEnv::new().await;
        let mut store = env.store().await;

        let out = list(&mut store, &filter_args(&["--category", "food"]))
            .await
            .unwrap();
        assert_eq!(out.structure().unwrap().len(), 2);
        assert!(out
            .structure()
            .unwrap()
            .iter()
            .all(|e| e.category == Category::Food));

        let out = list(&mut store, &filter_args(&[])).await.unwrap();
        assert_eq!(out.structure().unwrap().len(), 2);

        let out = list(&mut store, &filter_args(&["--reset"])).await.unwrap();
        assert_eq!(out.structure().unwrap().len(), 4);
        assert_eq!(store.filter(), &ExpenseFilter::default());
    }

    #[tokio::test]
    async fn test_list_search_matches_nothing() {
        let env = TestEnv::new().await;
        let mut store = env.store().await;
        let out = list(&mut store, &filter_args(&["--search", "pizza"]))
            .await
            .unwrap();
        assert!(out.structure().unwrap().is_empty());
        assert!(out.message().contains("total ₨0.00"));
    }
}
