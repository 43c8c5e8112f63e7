//! Paragraph-level content: enriched strings and tables.

use serde::{Deserialize, Serialize};

/// A hyperlink anchored in the text of an [`EnrichedString`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Link {
    /// Link target (URL or legal reference).
    pub target: String,

    /// Character offset of the anchor in the text.
    pub position: usize,

    /// Length of the anchor, in characters.
    pub content_size: usize,
}

/// A piece of prose with its links, or a table.
///
/// A string node is either prose (with links) or a table, never both: when
/// `table` is set, `text` is empty. Use [`EnrichedString::from_table`] to
/// build table alineas. Loading rejects a table carrying text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawEnrichedString")]
pub struct EnrichedString {
    pub text: String,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<Link>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub table: Option<Table>,

    /// False when the Parametrization Applier deactivated this paragraph.
    #[serde(skip_serializing_if = "is_true")]
    pub active: bool,
}

#[derive(Deserialize)]
struct RawEnrichedString {
    #[serde(default)]
    text: String,
    #[serde(default)]
    links: Vec<Link>,
    #[serde(default)]
    table: Option<Table>,
    #[serde(default = "default_active")]
    active: bool,
}

impl TryFrom<RawEnrichedString> for EnrichedString {
    type Error = String;

    fn try_from(raw: RawEnrichedString) -> Result<Self, Self::Error> {
        if raw.table.is_some() && !raw.text.is_empty() {
            return Err(format!(
                "a table alinea cannot also carry text ('{}')",
                raw.text
            ));
        }
        Ok(Self {
            text: raw.text,
            links: raw.links,
            table: raw.table,
            active: raw.active,
        })
    }
}

impl Default for EnrichedString {
    fn default() -> Self {
        Self::new(String::new())
    }
}

fn default_active() -> bool {
    true
}

fn is_true(value: &bool) -> bool {
    *value
}

impl EnrichedString {
    /// Create an active prose string without links.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            links: Vec::new(),
            table: None,
            active: true,
        }
    }

    /// Create a table-only string.
    pub fn from_table(table: Table) -> Self {
        Self {
            text: String::new(),
            links: Vec::new(),
            table: Some(table),
            active: true,
        }
    }

    #[must_use]
    pub fn with_links(mut self, links: Vec<Link>) -> Self {
        self.links = links;
        self
    }

    #[must_use]
    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    pub fn is_table(&self) -> bool {
        self.table.is_some()
    }

    /// Lines of this paragraph. Tables render one line per grid row.
    pub fn text_lines(&self) -> Vec<String> {
        match &self.table {
            Some(table) => table
                .to_grid()
                .into_iter()
                .map(|row| row.join(" | "))
                .collect(),
            None => self.text.split('\n').map(String::from).collect(),
        }
    }
}

/// A table cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub content: EnrichedString,

    #[serde(default = "default_span")]
    pub colspan: usize,

    #[serde(default = "default_span")]
    pub rowspan: usize,
}

fn default_span() -> usize {
    1
}

impl Cell {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: EnrichedString::new(content),
            colspan: 1,
            rowspan: 1,
        }
    }

    /// Set the column span. Spans below 1 are raised to 1.
    #[must_use]
    pub fn with_colspan(mut self, colspan: usize) -> Self {
        self.colspan = colspan.max(1);
        self
    }

    /// Set the row span. Spans below 1 are raised to 1.
    #[must_use]
    pub fn with_rowspan(mut self, rowspan: usize) -> Self {
        self.rowspan = rowspan.max(1);
        self
    }
}

/// A table row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    pub cells: Vec<Cell>,

    #[serde(default)]
    pub is_header: bool,
}

impl Row {
    pub fn new(cells: Vec<Cell>) -> Self {
        Self {
            cells,
            is_header: false,
        }
    }

    pub fn header(cells: Vec<Cell>) -> Self {
        Self {
            cells,
            is_header: true,
        }
    }
}

/// A table, as an ordered sequence of rows.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Table {
    pub rows: Vec<Row>,
}

impl Table {
    pub fn new(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    /// Check that header rows are all at the top of the table.
    ///
    /// Returns true when every row is a header, or when the header rows form a
    /// contiguous prefix (possibly empty).
    pub fn headers_form_prefix(&self) -> bool {
        let mut body_started = false;
        for row in &self.rows {
            if row.is_header && body_started {
                return false;
            }
            if !row.is_header {
                body_started = true;
            }
        }
        true
    }

    /// Expand column and row spans into a dense grid of cell texts.
    ///
    /// A spanning cell's text is repeated in every grid slot it covers.
    /// Slots covered by no cell are empty strings.
    pub fn to_grid(&self) -> Vec<Vec<String>> {
        let widths = self.row_widths();
        let mut grid: Vec<Vec<Option<&str>>> =
            widths.iter().map(|width| vec![None; *width]).collect();

        for (row_rank, row) in self.rows.iter().enumerate() {
            let mut col_index = 0;
            for cell in &row.cells {
                let Some(free) = next_free_slot(&grid[row_rank], col_index) else {
                    break;
                };
                col_index = free;
                for dest_row in grid.iter_mut().skip(row_rank).take(cell.rowspan) {
                    for slot in dest_row.iter_mut().skip(col_index).take(cell.colspan) {
                        *slot = Some(cell.content.text.as_str());
                    }
                }
            }
        }

        grid.into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|slot| slot.unwrap_or_default().to_string())
                    .collect()
            })
            .collect()
    }

    /// Number of grid slots in each row, counting cells spanning down from above.
    fn row_widths(&self) -> Vec<usize> {
        let mut widths = vec![0; self.rows.len()];
        for (row_rank, row) in self.rows.iter().enumerate() {
            for cell in &row.cells {
                for width in widths.iter_mut().skip(row_rank).take(cell.rowspan) {
                    *width += cell.colspan;
                }
            }
        }
        widths
    }
}

fn next_free_slot(row: &[Option<&str>], start: usize) -> Option<usize> {
    (start..row.len()).find(|index| row[*index].is_none())
}
