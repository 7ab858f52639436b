use crate::args::FilterArgs;
use crate::commands::list::apply_filter;
use crate::commands::Out;
use crate::model::{Amount, Category, Currency};
use crate::{Result, Store};
use serde::Serialize;

/// Totals over the expenses that match the filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub count: usize,
    pub currency: Currency,
    pub total: Amount,
    pub by_category: Vec<(Category, Amount)>,
    pub by_month: Vec<(String, Amount)>,
}

/// Applies the filter options and reports the total, the totals per category and the totals per
/// month.
pub async fn summary(store: &mut Store, args: &FilterArgs) -> Result<Out<Summary>> {
    apply_filter(store, args);
    let currency = store.currency();
    let summary = Summary {
        count: store.filtered_expenses().len(),
        currency,
        total: store.total(),
        by_category: store.totals_by_category().to_vec(),
        by_month: store.totals_by_month().to_vec(),
    };

    let mut message = format!(
        "{} expenses, total {}",
        summary.count,
        summary.total.display_with(currency)
    );
    if !summary.by_category.is_empty() {
        message.push_str("\n\nBy category:");
        for (category, amount) in &summary.by_category {
            message.push_str(&format!(
                "\n  {:<8}  {:>12}",
                category.label(),
                amount.display_with(currency)
            ));
        }
        message.push_str("\n\nBy month:");
        for (month, amount) in &summary.by_month {
            message.push_str(&format!(
                "\n  {month:<8}  {:>12}",
                amount.display_with(currency)
            ));
        }
    }
    Ok(Out::new(message, summary))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::TestEnv;
    use clap::Parser;
    use std::str::FromStr;

    fn filter_args(words: &[&str]) -> FilterArgs {
        FilterArgs::try_parse_from(std::iter::once("summary").chain(words.iter().copied())).unwrap()
    }

    fn amount(s: &str) -> Amount {
        Amount::from_str(s).unwrap()
    }

    #[tokio::test]
    async fn test_summary() {
        let env = TestEnv::new().await;
        let mut store = env.store().await;
        store.set_currency(Currency::Usd).await;

        let out = summary(&mut store, &filter_args(&[])).await.unwrap();
        let summary = out.structure().unwrap();

        assert_eq!(summary.count, 4);
        assert_eq!(summary.total, amount("187.49"));
        // newest first: the two expenses from 2025-11-03 lead
        assert_eq!(
            summary.by_category,
            vec![
                (Category::Travel, amount("35.50")),
                (Category::Food, amount("31.99")),
                (Category::Bills, amount("120.00")),
            ]
        );
        assert_eq!(summary.by_month, vec![("2025-11".to_string(), amount("187.49"))]);
        assert!(out.message().starts_with("4 expenses, total $187.49"));
    }

    #[tokio::test]
    async fn test_summary_with_date_range() {
        let env = TestEnv::new().await;
        let mut store = env.store().await;

        let out = summary(
            &mut store,
            &filter_args(&["--from", "2025-11-02", "--to", "2025-11-02"]),
        )
        .await
        .unwrap();

        let summary = out.structure().unwrap();
        assert_eq!(summary.count, 1);
        assert_eq!(summary.by_category, vec![(Category::Food, amount("9.99"))]);
    }
}
