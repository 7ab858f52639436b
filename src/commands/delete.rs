use crate::args::DeleteArgs;
use crate::commands::Out;
use crate::model::Expense;
use crate::{Result, Store};

/// Deletes an expense. Deleting an id that does not exist is not an error.
pub async fn delete(store: &mut Store, args: &DeleteArgs) -> Result<Out<Expense>> {
    match store.remove(args.id()).await? {
        Some(removed) => Ok(Out::new(format!("Deleted expense {}", removed.id()), removed)),
        None => Ok(format!("There is no expense with id '{}', nothing was deleted", args.id()).into()),
    }
}

/// Restores the most recently deleted expense under a new id.
pub async fn undo(store: &mut Store) -> Result<Out<Expense>> {
    match store.undo_delete().await? {
        Some(restored) => Ok(Out::new(
            format!("Restored the deleted expense as {}", restored.id()),
            restored,
        )),
        None => Ok("Nothing to undo".into()),
    }
}
