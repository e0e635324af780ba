//! Plain-text tables with optional markdown rendering and CSV export.

use crate::utils::text_processing::truncate;
use crossterm::style::{Color, Stylize};
use csv::{Terminator, WriterBuilder};
use std::collections::HashMap;
use std::path::Path;

/// Shown in place of an empty cell.
const EMPTY_CELL: &str = "-";

/// One table row, keyed by column key.
pub type Row = HashMap<String, String>;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Alignment {
    #[default]
    Left,
    Right,
    Center,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TableStyle {
    #[default]
    Default,
    Markdown,
}

impl TableStyle {
    /// `md` selects markdown, anything else the default layout.
    ///
    pub fn from_name(name: &str) -> TableStyle {
        match name {
            "md" => TableStyle::Markdown,
            _ => TableStyle::Default,
        }
    }
}

/// Picks a foreground colour for a cell from its value.
pub type CellColor = fn(&str) -> Option<Color>;

/// Column definition. Inactive columns keep their data but are neither
/// rendered nor exported.
///
#[derive(Clone, Debug)]
pub struct Column {
    pub key: String,
    pub title: String,
    pub alignment: Alignment,
    pub active: bool,
    pub max_width: Option<usize>,
    pub cell_color: Option<CellColor>,
}

impl Column {
    pub fn new(key: &str, title: &str) -> Column {
        Column {
            key: key.to_string(),
            title: title.to_string(),
            alignment: Alignment::Left,
            active: true,
            max_width: None,
            cell_color: None,
        }
    }

    pub fn with_alignment(mut self, alignment: Alignment) -> Column {
        self.alignment = alignment;
        self
    }

    pub fn with_max_width(mut self, max_width: usize) -> Column {
        self.max_width = Some(max_width);
        self
    }

    pub fn with_active(mut self, active: bool) -> Column {
        self.active = active;
        self
    }

    pub fn with_cell_color(mut self, cell_color: CellColor) -> Column {
        self.cell_color = Some(cell_color);
        self
    }
}

pub struct Table {
    columns: Vec<Column>,
    rows: Vec<Row>,
    style: TableStyle,
    colors: bool,
}

impl Table {
    pub fn new(columns: Vec<Column>) -> Table {
        Table {
            columns,
            rows: vec![],
            style: TableStyle::Default,
            colors: false,
        }
    }

    pub fn with_style(mut self, style: TableStyle) -> Table {
        self.style = style;
        self
    }

    /// Colour cells of columns that have a cell colour. Only the default
    /// style is coloured.
    ///
    pub fn with_colors(mut self, colors: bool) -> Table {
        self.colors = colors;
        self
    }

    pub fn with_rows(mut self, rows: Vec<Row>) -> Table {
        self.rows = rows;
        self
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn active_columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter().filter(|column| column.active)
    }

    fn headers(&self) -> Vec<String> {
        self.active_columns().map(|c| c.title.clone()).collect()
    }

    /// Cell values of the active columns, with empty cells replaced and long
    /// values truncated.
    ///
    fn cells(&self) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|row| {
                self.active_columns()
                    .map(|column| {
                        let value = row
                            .get(&column.key)
                            .map(String::as_str)
                            .filter(|value| !value.is_empty())
                            .unwrap_or(EMPTY_CELL);
                        match column.max_width {
                            Some(max) => truncate(value, max),
                            None => value.to_string(),
                        }
                    })
                    .collect()
            })
            .collect()
    }

    pub fn render(&self) -> String {
        let columns: Vec<&Column> = self.active_columns().collect();
        let mut headers = self.headers();
        let mut cells = self.cells();
        if self.style == TableStyle::Markdown {
            let escape = |value: &mut String| *value = value.replace('|', "\\|");
            headers.iter_mut().for_each(escape);
            cells.iter_mut().flatten().for_each(escape);
        }

        let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
        for row in &cells {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }

        match self.style {
            TableStyle::Default => {
                let line = |values: &[String], header: bool| {
                    values
                        .iter()
                        .zip(&columns)
                        .zip(&widths)
                        .map(|((value, column), width)| {
                            let alignment = if header { Alignment::Left } else { column.alignment };
                            let cell = pad(value, *width, alignment);
                            let color = column
                                .cell_color
                                .filter(|_| self.colors && !header)
                                .and_then(|cell_color| cell_color(value));
                            match color {
                                Some(color) => format!(" {} ", cell.with(color)),
                                None => format!(" {} ", cell),
                            }
                        })
                        .collect::<String>()
                        .trim_end()
                        .to_string()
                };
                let mut lines = vec![line(&headers, true)];
                lines.extend(cells.iter().map(|row| line(row, false)));
                lines.join("\n")
            }
            TableStyle::Markdown => {
                let line = |values: &[String]| {
                    let inner = values
                        .iter()
                        .zip(&columns)
                        .zip(&widths)
                        .map(|((value, column), width)| pad(value, *width, column.alignment))
                        .collect::<Vec<_>>()
                        .join(" | ");
                    format!("| {} |", inner)
                };
                let separator = columns
                    .iter()
                    .zip(&widths)
                    .map(|(column, width)| {
                        let dashes = "-".repeat((*width).max(3));
                        match column.alignment {
                            Alignment::Left => dashes,
                            Alignment::Right => format!("{}:", &dashes[1..]),
                            Alignment::Center => format!(":{}:", &dashes[2..]),
                        }
                    })
                    .collect::<Vec<_>>()
                    .join(" | ");

                let mut lines = vec![line(&headers), format!("| {} |", separator)];
                lines.extend(cells.iter().map(|row| line(row)));
                lines.join("\n")
            }
        }
    }

    /// Write the active columns as CSV, header first, with CRLF line ends.
    ///
    pub fn export_csv(&self, path: &Path) -> Result<(), csv::Error> {
        let mut writer = WriterBuilder::new()
            .terminator(Terminator::CRLF)
            .from_path(path)?;
        writer.write_record(self.headers())?;
        for row in self.cells() {
            writer.write_record(&row)?;
        }
        writer.flush()?;
        Ok(())
    }
}

fn pad(value: &str, width: usize, alignment: Alignment) -> String {
    let fill = width.saturating_sub(value.chars().count());
    match alignment {
        Alignment::Left => format!("{}{}", value, " ".repeat(fill)),
        Alignment::Right => format!("{}{}", " ".repeat(fill), value),
        Alignment::Center => {
            let left = fill / 2;
            format!("{}{}{}", " ".repeat(left), value, " ".repeat(fill - left))
        }
    }
}
