use std::fmt;
use crate::input_loader::{Row, STATUS_COLUMN};
use crate::product::{Field, ProductDetail, NOT_AVAILABLE};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowStatus {
    Found,
    NotFound,
    InvalidModel,
}

impl RowStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            RowStatus::Found => "Found",
            RowStatus::NotFound => "Not found",
            RowStatus::InvalidModel => "Invalid model",
        }
    }
}

impl fmt::Display for RowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Writes every scraped attribute into `row` and marks it found.
pub fn merge(mut row: Row, detail: &ProductDetail) -> Row {
    row.set(STATUS_COLUMN, RowStatus::Found.as_str());
    for field in Field::ALL {
        row.set(field.column(), detail.cell(field));
    }
    row
}

/// Marks a row that never reached a detail page; all attributes go back to the sentinel.
pub fn mark_unresolved(mut row: Row, status: RowStatus) -> Row {
    row.set(STATUS_COLUMN, status.as_str());
    for field in Field::ALL {
        row.set(field.column(), NOT_AVAILABLE);
    }
    row
}
