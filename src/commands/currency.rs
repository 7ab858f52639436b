use crate::args::CurrencyArgs;
use crate::commands::Out;
use crate::model::Currency;
use crate::{Result, Store};

/// Switches the display currency, or shows the current one and the choices when no code is given.
pub async fn currency(store: &mut Store, args: &CurrencyArgs) -> Result<Out<Currency>> {
    if let Some(code) = args.code() {
        store.set_currency(code).await;
        return Ok(Out::new(
            format!("Amounts will be shown in {}", code.label()),
            code,
        ));
    }

    let current = store.currency();
    let mut message = format!("Amounts are shown in {}. Available currencies:", current.label());
    for c in Currency::ALL {
        let marker = if c == current { "*" } else { " " };
        message.push_str(&format!("\n{marker} {c}  {}  {}", c.symbol(), c.label()));
    }
    Ok(Out::new(message, current))
}
