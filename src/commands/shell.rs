use crate::args::{ShellCommand, ShellLine, StoreCommand};
use crate::commands::{dispatch, Out};
use crate::{Result, Store};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{error, info};

/// Reads commands line by line from `input` and runs them against `store` until `exit` or the end
/// of the input. A failing command is reported and the shell carries on.
pub async fn shell<R>(store: &mut Store, input: R) -> Result<Out<()>>
where
    R: AsyncBufRead + Unpin,
{
    info!("Type a command such as 'list' or 'add --amount 5 --category Food', 'help' for the list of commands or 'exit' to leave");
    if let Some(message) = store.error() {
        error!("{message}");
    }

    let mut lines = input.lines();
    let mut count = 0usize;
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                error!("Unable to read from the input: {e}");
                break;
            }
        };
        let command = match ShellLine::parse_line(&line) {
            Ok(Some(ShellCommand::Store(command))) => command,
            Ok(Some(ShellCommand::Exit)) => break,
            Ok(None) => continue,
            Err(e) => {
                info!("{e}");
                continue;
            }
        };
        count += 1;
        match dispatch(store, &command).await {
            Ok(()) if matches!(command, StoreCommand::Delete(_)) => {
                if let Some(hint) = undo_hint(store) {
                    info!("{hint}");
                }
            }
            Ok(()) => {}
            Err(e) => error!("{e}"),
        }
    }
    Ok(format!("Ran {count} commands, goodbye").into())
}

/// Tells the user how long the last deletion can be undone, if there is one to undo.
fn undo_hint(store: &Store) -> Option<String> {
    store.last_deleted().map(|deleted| {
        format!(
            "Run 'undo' within {} seconds to restore {}",
            store.undo_window().as_secs(),
            deleted.id()
        )
    })
}
