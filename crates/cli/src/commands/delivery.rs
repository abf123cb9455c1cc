//! `knuspr slots`

use std::io::Write;

use knuspr_client::KnusprClient;
use knuspr_core::DeliverySlot;

use super::table::{Align, Table};
use super::{CommandError, OutputFormat, price_or_dash, write_json};

pub async fn slots(
    client: &mut KnusprClient,
    format: OutputFormat,
    out: &mut impl Write,
) -> Result<(), CommandError> {
    let slots = client
        .scoped(|client| Box::pin(async move { client.get_delivery_slots().await }))
        .await?;

    render(&slots, format, out)
}

fn render(
    slots: &[DeliverySlot],
    format: OutputFormat,
    out: &mut impl Write,
) -> Result<(), CommandError> {
    if format == OutputFormat::Json {
        return write_json(out, slots);
    }
    if slots.is_empty() {
        writeln!(out, "No delivery slots available")?;
        return Ok(());
    }

    let mut table = Table::new(
        "Delivery Slots",
        &[
            ("ID", Align::Left),
            ("Start", Align::Left),
            ("End", Align::Left),
            ("Available", Align::Left),
            ("Price", Align::Right),
        ],
    );
    for slot in slots {
        table.add_row(vec![
            slot.id
                .as_ref()
                .map_or_else(|| "-".to_owned(), ToString::to_string),
            slot.start.clone().unwrap_or_else(|| "-".to_owned()),
            slot.end.clone().unwrap_or_else(|| "-".to_owned()),
            if slot.is_available { "Yes" } else { "No" }.to_owned(),
            price_or_dash(slot.price),
        ]);
    }
    table.write(out)?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_slot_table_marks_availability() {
        let slots: Vec<DeliverySlot> = serde_json::from_value(json!([
            {"id": 1, "start": "08:00", "end": "10:00", "is_available": true, "price": 3.9},
            {"id": "s2", "start": "10:00", "end": "12:00", "is_available": false}
        ]))
        .unwrap();

        let mut out = Vec::new();
        render(&slots, OutputFormat::Text, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.starts_with("Delivery Slots\n"));
        assert!(text.contains("3.90"));
        assert!(text.contains("Yes"));
        assert!(text.contains("No"));
        assert!(text.contains("s2"));
    }

    #[test]
    fn test_no_slots_notice() {
        let mut out = Vec::new();
        render(&[], OutputFormat::Text, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "No delivery slots available\n");
    }
}
