use crate::args::AddArgs;
use crate::commands::Out;
use crate::model::Expense;
use crate::{Result, Store};

/// Validates the options and records a new expense.
pub async fn add(store: &mut Store, args: &AddArgs) -> Result<Out<Expense>> {
    let draft = args.draft()?;
    let created = store.add(draft).await?;
    Ok(Out::new(
        format!(
            "Added {} {} on {} with id {}",
            created.category.label(),
            created.amount.display_with(store.currency()),
            created.date,
            created.id()
        ),
        created,
    ))
}
