// Copyright 2021-2024 SecureDNA Stiftung (SecureDNA Foundation) <licensing@securedna.org>
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::fmt;

use serde::Serialize;

use shared_types::search::HitRecord;

/// Text that replaces the hits table when the search request fails.
pub const FAILURE_MESSAGE: &str = "Failed to load hits!";

/// Column headings, in the order of [`HitRow::cells`].
pub const COLUMNS: [&str; 4] = ["#", "Gene", "Protein (aa)", "DNA (bp)"];

/// One rendered row of the hits table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HitRow {
    /// 1-based position in the server's ordering.
    pub index: usize,
    pub gene_id: String,
    pub protein_length: usize,
    pub dna_length: usize,
}

impl HitRow {
    pub fn from_hit(index: usize, hit: &HitRecord) -> Self {
        Self {
            index,
            gene_id: hit.gene_id().into_owned(),
            protein_length: hit.protein_sequence().len(),
            dna_length: hit.dna_sequence().len(),
        }
    }

    /// Rows for `hits`, keeping the server's order.
    pub fn from_hits(hits: &[HitRecord]) -> Vec<Self> {
        hits.iter()
            .enumerate()
            .map(|(i, hit)| Self::from_hit(i + 1, hit))
            .collect()
    }

    pub fn cells(&self) -> [String; 4] {
        [
            self.index.to_string(),
            self.gene_id.clone(),
            self.protein_length.to_string(),
            self.dna_length.to_string(),
        ]
    }
}

/// Where the page renders to: the DOM in a browser, a text table in a terminal.
pub trait HitsView {
    /// Removes every rendered hit row, keeping the table itself.
    fn clear_rows(&mut self);

    fn append_rows(&mut self, rows: &[HitRow]);

    /// Replaces the whole table with a static message. Nothing can be
    /// rendered into the table afterwards.
    fn replace_table(&mut self, message: &str);

    /// Called after a successful render; downloads can be offered from now on.
    fn enable_downloads(&mut self);
}

/// Plain-text hits table for terminals.
#[derive(Debug, Default)]
pub struct TextTable {
    rows: Vec<HitRow>,
    replaced_by: Option<String>,
    downloads_enabled: bool,
}

impl TextTable {
    pub fn rows(&self) -> &[HitRow] {
        &self.rows
    }

    /// The message the table was replaced with, if any.
    pub fn replaced_by(&self) -> Option<&str> {
        self.replaced_by.as_deref()
    }

    pub fn downloads_enabled(&self) -> bool {
        self.downloads_enabled
    }
}

impl HitsView for TextTable {
    fn clear_rows(&mut self) {
        self.rows.clear();
    }

    fn append_rows(&mut self, rows: &[HitRow]) {
        if self.replaced_by.is_none() {
            self.rows.extend_from_slice(rows);
        }
    }

    fn replace_table(&mut self, message: &str) {
        self.rows.clear();
        self.replaced_by = Some(message.to_owned());
    }

    fn enable_downloads(&mut self) {
        self.downloads_enabled = true;
    }
}

impl fmt::Display for TextTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(message) = &self.replaced_by {
            return writeln!(f, "{message}");
        }

        let cells: Vec<[String; 4]> = self.rows.iter().map(HitRow::cells).collect();
        let mut widths = COLUMNS.map(str::len);
        for row in &cells {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.len());
            }
        }

        write_line(f, COLUMNS.as_slice(), &widths)?;
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        write_line(f, rule.as_slice(), &widths)?;
        for row in &cells {
            write_line(f, row.as_slice(), &widths)?;
        }
        Ok(())
    }
}

/// Writes one table line: the gene column left-aligned, numbers right-aligned.
fn write_line<S: AsRef<str>>(
    f: &mut fmt::Formatter<'_>,
    cells: &[S],
    widths: &[usize; 4],
) -> fmt::Result {
    for (column, (cell, width)) in cells.iter().zip(widths).enumerate() {
        if column > 0 {
            f.write_str("  ")?;
        }
        let (cell, width) = (cell.as_ref(), *width);
        if column == 1 {
            write!(f, "{cell:<width$}")?;
        } else {
            write!(f, "{cell:>width$}")?;
        }
    }
    writeln!(f)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(gene_id: &str, protein: &str, dna: &str) -> HitRecord {
        HitRecord::from_iter([
            ("gene_id", gene_id),
            ("protein_sequence", protein),
            ("dna_sequence", dna),
        ])
    }

    #[test]
    fn rows_keep_server_order() {
        let rows = HitRow::from_hits(&[hit("b", "MK", "ATGAAA"), hit("a", "M", "ATG")]);
        let ids: Vec<_> = rows.iter().map(|r| (r.index, r.gene_id.as_str())).collect();
        assert_eq!(ids, [(1, "b"), (2, "a")]);
        assert_eq!(rows[0].protein_length, 2);
        assert_eq!(rows[0].dna_length, 6);
    }

    #[test]
    fn text_table_renders_aligned_columns() {
        let mut table = TextTable::default();
        table.append_rows(&HitRow::from_hits(&[hit("g1", "AAA", "ATG")]));
        assert_eq!(
            table.to_string(),
            concat!(
                "#  Gene  Protein (aa)  DNA (bp)\n",
                "-  ----  ------------  --------\n",
                "1  g1               3         3\n",
            )
        );
    }

    #[test]
    fn replaced_table_shows_only_the_message() {
        let mut table = TextTable::default();
        table.append_rows(&HitRow::from_hits(&[hit("g1", "AAA", "ATG")]));
        table.replace_table(FAILURE_MESSAGE);
        table.append_rows(&HitRow::from_hits(&[hit("g2", "AAA", "ATG")]));
        assert!(table.rows().is_empty());
        assert_eq!(table.replaced_by(), Some(FAILURE_MESSAGE));
        assert_eq!(table.to_string(), "Failed to load hits!\n");
    }
}
