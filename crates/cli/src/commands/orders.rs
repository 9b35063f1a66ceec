//! Orders commands.
//!
//! # Usage
//!
//! ```bash
//! vd-cli orders list --from 2024-01-01 --to 2024-01-31 --status processing
//! vd-cli orders bulk packing-slip 1001 1002 1003
//! ```

use vendor_desk_admin::ConsoleError;
use vendor_desk_admin::ConsoleState;
use vendor_desk_admin::screens::OrdersScreen;
use vendor_desk_core::listing::BulkAction;
use vendor_desk_core::types::{OrderId, StatusTab, format_amount};

/// Filter and page picked on the command line.
#[derive(Debug, Clone)]
pub struct ListQuery {
    pub search: String,
    pub from: Option<String>,
    pub to: Option<String>,
    pub tab: StatusTab,
    pub page: u32,
}

/// Print tab counts and one page of orders.
#[allow(clippy::print_stdout)]
pub async fn list(state: &ConsoleState, query: &ListQuery) -> Result<(), ConsoleError> {
    let mut screen = OrdersScreen::new(state.config().page_size, state.editor_settings());
    screen.load(state.client()).await?;

    screen.set_search(&query.search);
    screen.set_dates(query.from.as_deref(), query.to.as_deref());
    screen.set_tab(query.tab);
    screen.set_page(query.page);

    let counts = screen.counts();
    let tabs: Vec<String> = std::iter::once(format!("All ({})", counts.total()))
        .chain(
            counts
                .iter()
                .map(|(status, count)| format!("{} ({count})", status.label())),
        )
        .collect();
    println!("{}", tabs.join("  "));
    println!();

    let (rows, meta) = screen.page();
    if rows.is_empty() {
        println!("No orders match.");
        return Ok(());
    }
    for order in rows {
        println!(
            "#{:<10} {:<12} {:<11} {:<24} {:>12}",
            order.id,
            order.date,
            order.status.label(),
            order.customer_name,
            format_amount(order.total, "$"),
        );
    }
    println!();
    println!(
        "Page {} of {} ({} orders)",
        meta.page, meta.total_pages, meta.total_items
    );
    Ok(())
}

/// Ask the backend for documents covering `ids`.
#[allow(clippy::print_stdout)]
pub async fn bulk(
    state: &ConsoleState,
    action: BulkAction,
    ids: Vec<OrderId>,
) -> Result<(), ConsoleError> {
    let mut screen = OrdersScreen::new(state.config().page_size, state.editor_settings());
    for id in ids {
        if !screen.selection().contains(&id) {
            screen.toggle_row(id);
        }
    }

    let count = screen.selection().len();
    screen.request_documents(state.client(), action.key()).await?;
    println!("Requested {} for {count} orders", action.label());
    Ok(())
}
