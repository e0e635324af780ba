//! Terminal output.
//!
//! Result data (tables, charts) goes to stdout. Progress and status messages
//! go to stderr.

mod chart;
mod spinner;
mod table;

pub use chart::{bar_len, BarChart, Series};
pub use spinner::spin;
pub use table::{Alignment, Column, Row, Table, TableStyle};

use crossterm::style::Stylize;
use std::fmt::Display;

pub fn info(message: impl Display) {
    eprintln!("{}", message.to_string().dim());
}

pub fn success(message: impl Display) {
    eprintln!("{}", message.to_string().green());
}

pub fn warn(message: impl Display) {
    eprintln!("{}", message.to_string().yellow());
}

pub fn error(message: impl Display) {
    eprintln!("{}", message.to_string().red().bold());
}
