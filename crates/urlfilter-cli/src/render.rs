//! Terminal table rendering.
//!
//! Layout is done by `comfy-table`, which measures CJK region names by
//! display width. Columns are capped at a maximum width. Numeric columns are
//! right-aligned with thousands separators; missing values render as `N/A`.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{
    Attribute, Cell, CellAlignment, ColumnConstraint, ContentArrangement, Row, Width,
};
use urlfilter::{Number, Schema};

use crate::dataset::Record;
use crate::schema::survey_label;

/// Placeholder for missing values.
pub const MISSING: &str = "N/A";

/// One table column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub field: String,
    pub label: String,
    pub numeric: bool,
}

impl Column {
    pub fn new(field: impl Into<String>, label: impl Into<String>, numeric: bool) -> Self {
        Column {
            field: field.into(),
            label: label.into(),
            numeric,
        }
    }
}

/// A table layout for a dataset.
#[derive(Debug, Clone)]
pub struct Table {
    columns: Vec<Column>,
    max_width: usize,
    styled: bool,
}

impl Table {
    pub fn new(columns: Vec<Column>) -> Self {
        Table {
            columns,
            max_width: 24,
            styled: false,
        }
    }

    /// Columns for `records`: schema fields first, in schema order, then
    /// any other field in name order. Fields of numeric criteria are numeric.
    pub fn for_dataset(schema: &Schema, records: &[Record]) -> Self {
        let mut columns: Vec<Column> = Vec::new();
        let mut push = |field: &str, numeric: bool| {
            if columns.iter().all(|c| c.field != field) {
                let label = survey_label(field).unwrap_or(field);
                columns.push(Column::new(field, label, numeric));
            }
        };

        for spec in schema {
            push(&spec.field, spec.kind.is_numeric());
        }
        let mut rest: Vec<&str> = records.iter().flat_map(Record::field_names).collect();
        rest.sort_unstable();
        rest.dedup();
        for field in rest {
            push(field, false);
        }

        Table::new(columns)
    }

    /// Caps every column at `width` display columns.
    pub fn with_max_width(mut self, width: usize) -> Self {
        self.max_width = width.max(1);
        self
    }

    /// Enables bold headers.
    pub fn with_style(mut self, styled: bool) -> Self {
        self.styled = styled;
        self
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Renders `rows` under a header row. Every record takes one line;
    /// cells wider than the column cap are cut with `…`.
    pub fn render(&self, rows: &[&Record]) -> String {
        let mut table = comfy_table::Table::new();
        table
            .load_preset(UTF8_FULL_CONDENSED)
            .apply_modifier(UTF8_ROUND_CORNERS)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_truncation_indicator("…");
        if self.styled {
            table.enforce_styling();
        } else {
            table.force_no_tty();
        }

        table.set_header(self.columns.iter().map(|column| {
            let header = Cell::new(&column.label);
            if self.styled {
                header.add_attribute(Attribute::Bold)
            } else {
                header
            }
        }));
        for record in rows {
            let mut row = Row::from(
                self.columns
                    .iter()
                    .map(|column| Cell::new(cell(column, record))),
            );
            row.max_height(1);
            table.add_row(row);
        }

        let cap = u16::try_from(self.max_width).unwrap_or(u16::MAX);
        table.set_constraints(
            self.columns
                .iter()
                .map(|_| ColumnConstraint::UpperBoundary(Width::Fixed(cap))),
        );
        for (index, column) in self.columns.iter().enumerate() {
            if column.numeric {
                align_column(&mut table, index, CellAlignment::Right);
            }
        }

        table.to_string()
    }
}

fn align_column(table: &mut comfy_table::Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

/// The display text of one cell.
pub fn cell(column: &Column, record: &Record) -> String {
    match record.get(&column.field) {
        None | Some("") => MISSING.to_string(),
        Some(raw) if column.numeric => Number::parse(raw)
            .map(format_number)
            .unwrap_or_else(|| raw.to_string()),
        Some(raw) => raw.to_string(),
    }
}

/// Formats a number with thousands separators and at most three decimals.
///
/// ```
/// use urlfilter::Number;
/// use urlfilter_cli::render::format_number;
///
/// assert_eq!(format_number(Number::from(1523400)), "1,523,400");
/// assert_eq!(format_number(Number::new(201115.5).unwrap()), "201,115.5");
/// ```
pub fn format_number(n: Number) -> String {
    let value = n.get();
    let fixed = if n.is_integral() {
        format!("{:.0}", value.abs())
    } else {
        format!("{:.3}", value.abs())
    };
    let (int, frac) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let frac = frac.trim_end_matches('0');

    let mut out = String::with_capacity(fixed.len() + int.len() / 3 + 1);
    if value < 0.0 && (int != "0" || !frac.is_empty()) {
        out.push('-');
    }
    for (i, c) in int.chars().enumerate() {
        if i > 0 && (int.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    if !frac.is_empty() {
        out.push('.');
        out.push_str(frac);
    }
    out
}
