//! `knuspr search`

use std::io::Write;

use knuspr_client::KnusprClient;
use knuspr_core::SearchResult;

use super::table::{Align, Table};
use super::{CommandError, OutputFormat, format_price, write_json};

pub async fn search(
    client: &mut KnusprClient,
    query: String,
    limit: usize,
    format: OutputFormat,
    out: &mut impl Write,
) -> Result<(), CommandError> {
    let term = query.clone();
    let results = client
        .scoped(move |client| Box::pin(async move { client.search_products(&term, limit).await }))
        .await?;

    render(&query, &results, format, out)
}

fn render(
    query: &str,
    results: &[SearchResult],
    format: OutputFormat,
    out: &mut impl Write,
) -> Result<(), CommandError> {
    if format == OutputFormat::Json {
        return write_json(out, results);
    }
    if results.is_empty() {
        writeln!(out, "No results for '{query}'")?;
        return Ok(());
    }

    let mut table = Table::new(
        format!("Search: {query}"),
        &[
            ("ID", Align::Left),
            ("Name", Align::Left),
            ("Price", Align::Right),
            ("Amount", Align::Left),
            ("Brand", Align::Left),
        ],
    );
    for result in results {
        table.add_row(vec![
            result.id.to_string(),
            result.name.clone(),
            format_price(result.price_value()),
            result.amount.clone(),
            result.brand.clone(),
        ]);
    }
    table.write(out)?;
    Ok(())
}
