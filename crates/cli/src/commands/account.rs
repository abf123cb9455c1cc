//! `knuspr account`

use std::io::Write;

use knuspr_client::KnusprClient;
use knuspr_core::AccountData;

use super::{CommandError, OutputFormat, format_price, write_json};

pub async fn show(
    client: &mut KnusprClient,
    format: OutputFormat,
    out: &mut impl Write,
) -> Result<(), CommandError> {
    let data = client
        .scoped(|client| Box::pin(async move { client.get_account_data().await }))
        .await?;

    render(&data, format, out)
}

fn render(data: &AccountData, format: OutputFormat, out: &mut impl Write) -> Result<(), CommandError> {
    if format == OutputFormat::Json {
        return write_json(out, data);
    }

    let or_dash = |id: Option<String>| id.unwrap_or_else(|| "-".to_owned());

    writeln!(out, "Account")?;
    writeln!(out, "User ID: {}", or_dash(data.user_id.map(|id| id.to_string())))?;
    writeln!(
        out,
        "Address ID: {}",
        or_dash(data.address_id.map(|id| id.to_string()))
    )?;

    let status = if data.premium.is_premium {
        "Active"
    } else {
        "Inactive"
    };
    writeln!(out, "Premium: {status}")?;
    if let Some(valid_until) = &data.premium.valid_until {
        writeln!(out, "Valid until: {valid_until}")?;
    }

    writeln!(
        out,
        "Cart: {} items, {} EUR",
        data.cart.total_items,
        format_price(data.cart.total_price)
    )?;
    Ok(())
}
