//! ASCII table rendering for query results.
//!
//! Two passes: compute column widths from the widest of header and values
//! (capped), then draw MySQL-style `+---+` boxes. Values arrive already
//! stringified by the database layer.

use std::fmt::Write;

const MAX_COLUMN_WIDTH: usize = 50;

pub struct TableFormatter<'a> {
    headers: &'a [String],
    widths: Vec<usize>,
    rows: &'a [Vec<String>],
}

impl<'a> TableFormatter<'a> {
    pub fn new(headers: &'a [String], rows: &'a [Vec<String>]) -> Self {
        let mut widths: Vec<usize> = headers
            .iter()
            .map(|h| h.chars().count().clamp(1, MAX_COLUMN_WIDTH))
            .collect();

        for row in rows {
            for (i, value) in row.iter().enumerate() {
                if let Some(width) = widths.get_mut(i) {
                    *width = (*width).max(value.chars().count()).min(MAX_COLUMN_WIDTH);
                }
            }
        }

        Self {
            headers,
            widths,
            rows,
        }
    }

    pub fn render(&self) -> String {
        let mut output = String::new();

        self.write_separator(&mut output);
        self.write_row(&mut output, self.headers.iter());
        self.write_separator(&mut output);

        for row in self.rows {
            self.write_row(&mut output, row.iter());
        }

        self.write_separator(&mut output);
        // Drop the trailing newline so callers decide the spacing.
        output.pop();

        output
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn write_separator(&self, output: &mut String) {
        output.push('+');
        for width in &self.widths {
            for _ in 0..(*width + 2) {
                output.push('-');
            }
            output.push('+');
        }
        output.push('\n');
    }

    fn write_row<'v>(&self, output: &mut String, values: impl Iterator<Item = &'v String>) {
        output.push('|');
        for (i, value) in values.enumerate() {
            let width = self.widths.get(i).copied().unwrap_or(1);
            let _ = write!(output, " {:<width$} |", truncate(value, width));
        }
        output.push('\n');
    }
}

fn truncate(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    let kept: String = value.chars().take(width.saturating_sub(3)).collect();
    format!("{kept}...")
}
