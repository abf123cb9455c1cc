//! Plain-text tables with a title, a header row and aligned columns.

use std::io::{self, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
}

pub struct Table {
    title: String,
    columns: Vec<(&'static str, Align)>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(title: impl Into<String>, columns: &[(&'static str, Align)]) -> Self {
        Self {
            title: title.into(),
            columns: columns.to_vec(),
            rows: Vec::new(),
        }
    }

    pub fn add_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    pub fn write(&self, out: &mut impl Write) -> io::Result<()> {
        let widths = self.widths();

        writeln!(out, "{}", self.title)?;
        let headers: Vec<String> = self.columns.iter().map(|(h, _)| (*h).to_owned()).collect();
        writeln!(out, "{}", self.format_row(&headers, &widths))?;
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        writeln!(out, "{}", rule.join("  "))?;

        for row in &self.rows {
            writeln!(out, "{}", self.format_row(row, &widths))?;
        }
        Ok(())
    }

    /// Widest cell per column, header included, in characters.
    fn widths(&self) -> Vec<usize> {
        self.columns
            .iter()
            .enumerate()
            .map(|(i, (header, _))| {
                self.rows
                    .iter()
                    .filter_map(|row| row.get(i))
                    .map(|cell| cell.chars().count())
                    .fold(header.chars().count(), usize::max)
            })
            .collect()
    }

    fn format_row(&self, cells: &[String], widths: &[usize]) -> String {
        let padded: Vec<String> = cells
            .iter()
            .zip(&self.columns)
            .zip(widths)
            .map(|((cell, (_, align)), &width)| match align {
                Align::Left => format!("{cell:<width$}"),
                Align::Right => format!("{cell:>width$}"),
            })
            .collect();
        padded.join("  ").trim_end().to_owned()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_columns_are_aligned() {
        let mut table = Table::new("Cart", &[("ID", Align::Left), ("Price", Align::Right)]);
        table.add_row(vec!["1".to_owned(), "1.49".to_owned()]);
        table.add_row(vec!["1002".to_owned(), "10.00".to_owned()]);

        let mut out = Vec::new();
        table.write(&mut out).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Cart\nID    Price\n----  -----\n1      1.49\n1002  10.00\n"
        );
    }

    #[test]
    fn test_width_counts_characters_not_bytes() {
        let mut table = Table::new("T", &[("Name", Align::Left), ("Qty", Align::Right)]);
        table.add_row(vec!["Käse".to_owned(), "1".to_owned()]);

        let mut out = Vec::new();
        table.write(&mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Käse    1\n"));
    }
}
