//! `knuspr orders`, `knuspr upcoming`, `knuspr order`

use std::io::Write;

use knuspr_client::KnusprClient;
use knuspr_core::Order;

use super::table::{Align, Table};
use super::{CommandError, OutputFormat, format_price, price_or_dash, write_json};

pub async fn history(
    client: &mut KnusprClient,
    limit: usize,
    format: OutputFormat,
    out: &mut impl Write,
) -> Result<(), CommandError> {
    let orders = client
        .scoped(move |client| Box::pin(async move { client.get_order_history(limit, 0).await }))
        .await?;

    render_list("Order History", &orders, format, out)
}

pub async fn upcoming(
    client: &mut KnusprClient,
    format: OutputFormat,
    out: &mut impl Write,
) -> Result<(), CommandError> {
    let orders = client
        .scoped(|client| Box::pin(async move { client.get_upcoming_orders().await }))
        .await?;

    render_list("Upcoming Orders", &orders, format, out)
}

pub async fn detail(
    client: &mut KnusprClient,
    order_id: String,
    format: OutputFormat,
    out: &mut impl Write,
) -> Result<(), CommandError> {
    let order = client
        .scoped(move |client| {
            Box::pin(async move { client.get_order_detail(&order_id).await })
        })
        .await?;

    render_detail(&order, format, out)
}

fn render_list(
    title: &str,
    orders: &[Order],
    format: OutputFormat,
    out: &mut impl Write,
) -> Result<(), CommandError> {
    if format == OutputFormat::Json {
        return write_json(out, orders);
    }
    if orders.is_empty() {
        writeln!(out, "No orders found")?;
        return Ok(());
    }

    let mut table = Table::new(
        title,
        &[
            ("ID", Align::Left),
            ("Date", Align::Left),
            ("Status", Align::Left),
            ("Total", Align::Right),
        ],
    );
    for order in orders {
        table.add_row(vec![
            order.display_id(),
            order.display_date().unwrap_or("-").to_owned(),
            order.status.clone().unwrap_or_else(|| "-".to_owned()),
            price_or_dash(order.display_total()),
        ]);
    }
    table.write(out)?;
    Ok(())
}

fn render_detail(order: &Order, format: OutputFormat, out: &mut impl Write) -> Result<(), CommandError> {
    if format == OutputFormat::Json {
        return write_json(out, order);
    }

    writeln!(out, "Order {}", order.display_id())?;
    writeln!(out, "Status: {}", order.status.as_deref().unwrap_or("unknown"))?;
    writeln!(out, "Date: {}", order.display_date().unwrap_or("unknown"))?;
    if let Some(total) = order.display_total() {
        writeln!(out, "Total: {} EUR", format_price(total))?;
    }

    let products = order.all_products();
    if products.is_empty() {
        return Ok(());
    }

    writeln!(out)?;
    let mut table = Table::new(
        "Products",
        &[
            ("Name", Align::Left),
            ("Qty", Align::Right),
            ("Price", Align::Right),
        ],
    );
    for product in products {
        table.add_row(vec![
            product.display_name().to_owned(),
            product
                .quantity
                .map_or_else(|| "?".to_owned(), |q| q.to_string()),
            price_or_dash(product.price),
        ]);
    }
    table.write(out)?;
    Ok(())
}
