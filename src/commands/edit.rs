use crate::args::EditArgs;
use crate::commands::Out;
use crate::error::{Error, ErrorType};
use crate::model::Expense;
use crate::{Result, Store};
use anyhow::anyhow;

/// Changes the given fields of an existing expense.
pub async fn edit(store: &mut Store, args: &EditArgs) -> Result<Out<Expense>> {
    let Some(original) = store.find(args.id()).cloned() else {
        return Err(Error::new(
            ErrorType::NotFound,
            anyhow!("There is no expense with id '{}'", args.id()),
        ));
    };
    if args.is_empty() {
        return Ok(Out::new(
            format!("Nothing to change for expense {}", original.id()),
            original,
        ));
    }

    let mut updated = original.clone();
    args.apply(&mut updated)?;
    store.begin_edit(&original);
    let saved = store.save_edit(updated).await?;
    Ok(Out::new(format!("Updated expense {}", saved.id()), saved))
}
