//! Column-aligned table output.
//!
//! The [`Presenter`] trait is the sink the status aggregator feeds; rows are
//! buffered and only rendered on `flush`, so column widths are computed over
//! the whole table.

use std::io::{self, Write};

use unicode_width::UnicodeWidthStr;

/// Ordered-column row sink with a final flush.
pub trait Presenter {
    /// Append one row of columns.
    fn row(&mut self, columns: Vec<String>);

    /// Render everything appended so far.
    fn flush(&mut self) -> io::Result<()>;
}

/// Renders rows as a left-aligned table separated by two spaces.
///
/// With `discard_empty_columns` set, a column whose cells are all empty is
/// omitted from the rendered output entirely.
pub struct TableWriter<W: Write> {
    out: W,
    rows: Vec<Vec<String>>,
    padding: usize,
    discard_empty_columns: bool,
}

impl<W: Write> TableWriter<W> {
    pub fn new(out: W) -> Self {
        TableWriter {
            out,
            rows: Vec::new(),
            padding: 2,
            discard_empty_columns: false,
        }
    }

    pub fn discard_empty_columns(mut self) -> Self {
        self.discard_empty_columns = true;
        self
    }
}

impl<W: Write> Presenter for TableWriter<W> {
    fn row(&mut self, columns: Vec<String>) {
        self.rows.push(columns);
    }

    fn flush(&mut self) -> io::Result<()> {
        let column_count = self.rows.iter().map(Vec::len).max().unwrap_or(0);
        if column_count == 0 {
            return self.out.flush();
        }

        let mut keep: Vec<usize> = (0..column_count).collect();
        if self.discard_empty_columns {
            keep.retain(|&i| {
                self.rows
                    .iter()
                    .any(|row| row.get(i).is_some_and(|cell| !cell.is_empty()))
            });
        }

        let widths: Vec<usize> = keep
            .iter()
            .map(|&i| {
                self.rows
                    .iter()
                    .filter_map(|row| row.get(i))
                    .map(|cell| cell.width())
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        for row in &self.rows {
            let mut line = String::new();
            for (pos, &i) in keep.iter().enumerate() {
                let cell = row.get(i).map(String::as_str).unwrap_or("");
                line.push_str(cell);
                if pos + 1 < keep.len() {
                    let pad = widths[pos] - cell.width() + self.padding;
                    line.extend(std::iter::repeat(' ').take(pad));
                }
            }
            writeln!(self.out, "{}", line.trim_end())?;
        }

        self.rows.clear();
        self.out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(rows: Vec<Vec<&str>>, discard: bool) -> String {
        let mut buf = Vec::new();
        {
            let mut table = TableWriter::new(&mut buf);
            if discard {
                table = table.discard_empty_columns();
            }
            for row in rows {
                table.row(row.into_iter().map(String::from).collect());
            }
            table.flush().unwrap();
        }
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_columns_align() {
        let out = render(
            vec![
                vec!["NAME", "ZONE", "STATUS"],
                vec!["a", "us-west1-a", "RUNNING"],
                vec!["machine2", "us-east1-b", "TERMINATED"],
            ],
            false,
        );
        assert_eq!(
            out,
            "NAME      ZONE        STATUS\n\
             a         us-west1-a  RUNNING\n\
             machine2  us-east1-b  TERMINATED\n"
        );
    }

    #[test]
    fn test_empty_columns_discarded() {
        let out = render(
            vec![
                vec!["NAME", "", "STATUS"],
                vec!["a", "", "RUNNING"],
            ],
            true,
        );
        assert_eq!(out, "NAME  STATUS\na     RUNNING\n");
    }

    #[test]
    fn test_trailing_empty_cells_trimmed() {
        let out = render(
            vec![
                vec!["NAME", "DEFAULT"],
                vec!["a", ""],
                vec!["b", "*"],
            ],
            false,
        );
        assert_eq!(out, "NAME  DEFAULT\na\nb     *\n");
    }

    #[test]
    fn test_flush_with_no_rows() {
        let out = render(vec![], false);
        assert_eq!(out, "");
    }

    #[test]
    fn test_ragged_rows() {
        let out = render(
            vec![vec!["A", "B", "C"], vec!["1"]],
            false,
        );
        assert_eq!(out, "A  B  C\n1\n");
    }
}
