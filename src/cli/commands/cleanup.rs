//! `wft cleanup` command - Remove partially-created orders
//!
//! An order saved without any tools or picks is the leftover of an
//! interrupted create/import and carries no fulfillment history.

use console::style;
use dialoguer::{theme::ColorfulTheme, Confirm};
use miette::{IntoDiagnostic, Result};

use crate::cli::helpers::open_store;
use crate::cli::GlobalOpts;
use crate::core::{OrderSnapshot, OrderStore};
use crate::reconcile::is_partially_created;

#[derive(clap::Args, Debug)]
pub struct CleanupArgs {
    /// List what would be deleted without deleting
    #[arg(long)]
    pub dry_run: bool,

    /// Skip confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

/// Partially-created orders in the store; unreadable orders are logged and skipped
pub fn find_partial_orders<S: OrderStore + ?Sized>(store: &S) -> Result<Vec<OrderSnapshot>> {
    let mut partial = Vec::new();
    for so_number in store.order_numbers()? {
        match store.fetch(&so_number) {
            Ok(Some(snapshot)) if is_partially_created(&snapshot) => partial.push(snapshot),
            Ok(_) => {}
            Err(e) => {
                tracing::warn!(so_number = %so_number, error = %e, "skipping unreadable order");
            }
        }
    }
    Ok(partial)
}

pub fn run(args: CleanupArgs, global: &GlobalOpts) -> Result<()> {
    let (_project, _config, mut store) = open_store(global)?;
    let partial = find_partial_orders(&store)?;

    if partial.is_empty() {
        println!("{} No partially-created orders found", style("✓").green());
        return Ok(());
    }

    println!(
        "Found {} partially-created order(s):",
        style(partial.len()).yellow()
    );
    for snapshot in &partial {
        println!(
            "  {} {} {}",
            style("•").dim(),
            style(snapshot.so_number()).cyan(),
            style(format!(
                "({}, {} line item(s), no tools)",
                snapshot.order.customer_name,
                snapshot.line_items.len()
            ))
            .dim()
        );
    }

    if args.dry_run {
        println!();
        println!("{}", style("Dry run: nothing deleted.").dim());
        return Ok(());
    }

    if !args.yes {
        let confirmed = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(format!("Delete {} order(s)?", partial.len()))
            .default(false)
            .interact()
            .into_diagnostic()?;
        if !confirmed {
            println!("{}", style("Cancelled.").dim());
            return Ok(());
        }
    }

    let mut deleted = 0usize;
    for snapshot in &partial {
        match store.delete_order(snapshot.so_number()) {
            Ok(true) => deleted += 1,
            Ok(false) => {
                tracing::warn!(so_number = %snapshot.so_number(), "order already gone");
            }
            Err(e) => {
                tracing::warn!(so_number = %snapshot.so_number(), error = %e, "delete failed");
            }
        }
    }

    println!(
        "{} Deleted {} of {} partially-created order(s)",
        style("✓").green(),
        deleted,
        partial.len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::MemoryOrderStore;
    use crate::entities::{LineItem, Order, Tool};

    #[test]
    fn test_find_partial_orders() {
        let mut partial = OrderSnapshot::new(Order::new("100", "Acme"));
        partial
            .line_items
            .push(LineItem::new("100", "613279", 24).with_id("li-1"));

        let mut complete = OrderSnapshot::new(Order::new("200", "Acme"));
        complete.tools.push(Tool::new("200", "200-1").with_id("t1"));

        let store = MemoryOrderStore::with_orders([partial, complete]);
        let found = find_partial_orders(&store).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].so_number(), "100");
    }
}
