//! `knuspr cart`, `knuspr add`, `knuspr remove`

use std::io::Write;

use knuspr_client::KnusprClient;
use knuspr_core::{Cart, ProductId};
use serde_json::json;

use super::table::{Align, Table};
use super::{CommandError, OutputFormat, format_price, write_json};

pub async fn show(
    client: &mut KnusprClient,
    format: OutputFormat,
    out: &mut impl Write,
) -> Result<(), CommandError> {
    let cart = client
        .scoped(|client| Box::pin(async move { client.get_cart().await }))
        .await?;

    render_cart(&cart, format, out)
}

pub async fn add(
    client: &mut KnusprClient,
    product_id: ProductId,
    quantity: u32,
    format: OutputFormat,
    out: &mut impl Write,
) -> Result<(), CommandError> {
    let added = client
        .scoped(move |client| {
            Box::pin(async move { client.add_to_cart(product_id, quantity).await })
        })
        .await?;

    if format == OutputFormat::Json {
        return write_json(out, &json!({"productId": added, "quantity": quantity}));
    }
    writeln!(out, "Added product {added} (qty: {quantity}) to cart")?;
    Ok(())
}

pub async fn remove(
    client: &mut KnusprClient,
    order_field_id: String,
    format: OutputFormat,
    out: &mut impl Write,
) -> Result<(), CommandError> {
    let field_id = order_field_id.clone();
    let removed = client
        .scoped(move |client| {
            Box::pin(async move { client.remove_from_cart(&field_id).await })
        })
        .await?;

    if format == OutputFormat::Json {
        return write_json(
            out,
            &json!({"orderFieldId": order_field_id, "removed": removed}),
        );
    }
    writeln!(out, "Removed item {order_field_id} from cart")?;
    Ok(())
}

fn render_cart(cart: &Cart, format: OutputFormat, out: &mut impl Write) -> Result<(), CommandError> {
    if format == OutputFormat::Json {
        return write_json(out, cart);
    }
    if cart.is_empty() {
        writeln!(out, "Cart is empty")?;
        return Ok(());
    }

    let mut table = Table::new(
        format!(
            "Cart ({} items, {} EUR)",
            cart.total_items,
            format_price(cart.total_price)
        ),
        &[
            ("Field ID", Align::Left),
            ("Name", Align::Left),
            ("Qty", Align::Right),
            ("Price", Align::Right),
        ],
    );
    for item in &cart.items {
        table.add_row(vec![
            item.order_field_id.clone(),
            item.product_name.clone(),
            item.quantity.to_string(),
            format_price(item.price),
        ]);
    }
    table.write(out)?;
    Ok(())
}
