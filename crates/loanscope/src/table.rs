//! Record table for the current filtered view.

use loanscope_core::{CategoricalField, NumericField, Record};
use serde::{Deserialize, Serialize};

/// Column definition for the record table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableColumn {
    /// Column key (field name in data)
    pub key: String,
    /// Display header
    pub header: String,
    /// Text alignment
    pub align: TextAlign,
}

impl TableColumn {
    /// Create a new left-aligned column.
    #[must_use]
    pub fn new(key: impl Into<String>, header: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            header: header.into(),
            align: TextAlign::Left,
        }
    }

    /// Set text alignment.
    #[must_use]
    pub const fn align(mut self, align: TextAlign) -> Self {
        self.align = align;
        self
    }
}

/// Text alignment within a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TextAlign {
    #[default]
    Left,
    Right,
}

/// A cell value in the table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CellValue {
    Text(String),
    Number(f64),
}

impl CellValue {
    /// Get display text for the cell.
    #[must_use]
    pub fn display(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Number(n) => format!("{n}"),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

/// One record as table cells, in column order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRow {
    /// Record id (load position)
    pub id: usize,
    pub cells: Vec<CellValue>,
}

/// The rows handed to a table renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TablePage {
    pub columns: Vec<TableColumn>,
    pub rows: Vec<TableRow>,
    /// Records in the view, shown or not
    pub total_matching: usize,
}

impl TablePage {
    /// Get a cell by row index and column key.
    #[must_use]
    pub fn cell(&self, row: usize, key: &str) -> Option<&CellValue> {
        let col = self.columns.iter().position(|c| c.key == key)?;
        self.rows.get(row)?.cells.get(col)
    }
}

enum Column {
    Text(CategoricalField, &'static str),
    Number(NumericField, &'static str),
}

const COLUMNS: [Column; 10] = [
    Column::Text(CategoricalField::ClientId, "Cliente"),
    Column::Number(NumericField::Age, "Edad"),
    Column::Text(CategoricalField::Nationality, "Nacionalidad"),
    Column::Text(CategoricalField::Commune, "Comuna"),
    Column::Text(CategoricalField::ContractType, "Contrato"),
    Column::Number(NumericField::Income, "Ingresos"),
    Column::Number(NumericField::RiskScore, "Score"),
    Column::Number(NumericField::TotalDebt, "Deuda"),
    Column::Number(NumericField::RequestedAmount, "Monto"),
    Column::Text(CategoricalField::Decision, "Decisión"),
];

impl Column {
    fn definition(&self) -> TableColumn {
        match self {
            Self::Text(field, header) => TableColumn::new(field.name(), *header),
            Self::Number(field, header) => {
                TableColumn::new(field.name(), *header).align(TextAlign::Right)
            }
        }
    }

    fn cell(&self, record: &Record) -> CellValue {
        match self {
            Self::Text(field, _) => record.categorical(*field).into(),
            Self::Number(field, _) => record.numeric(*field).into(),
        }
    }
}

/// The first `limit` records of `view`, in view (load) order.
#[must_use]
pub fn table_page(view: &[&Record], limit: usize) -> TablePage {
    TablePage {
        columns: COLUMNS.iter().map(Column::definition).collect(),
        rows: view
            .iter()
            .take(limit)
            .map(|record| TableRow {
                id: record.id,
                cells: COLUMNS.iter().map(|c| c.cell(record)).collect(),
            })
            .collect(),
        total_matching: view.len(),
    }
}
