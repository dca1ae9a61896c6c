//! Render-agnostic export contracts.
//!
//! Spreadsheet, PDF and chart-snapshot rendering are external collaborators;
//! this module fixes what they receive: the column set and order, the header
//! labels, the monthly-summary sheet shape, and the download filenames.

use crate::error::Result;
use crate::model::{Field, Ledger, Month};
use crate::monthly::MonthlySummary;

/// One exported column: the row field it reads and its fallback label.
#[derive(Debug, Clone, Copy)]
pub struct ColumnSpec {
    pub field: Field,
    pub label: &'static str,
}

/// General-table column set, in the fixed export order.
pub const GENERAL_COLUMNS: [ColumnSpec; 10] = [
    ColumnSpec {
        field: Field::Activity,
        label: "ACTIVIDAD",
    },
    ColumnSpec {
        field: Field::Description,
        label: "DESCRIPCION",
    },
    ColumnSpec {
        field: Field::Place,
        label: "INSTITUCIÓN",
    },
    ColumnSpec {
        field: Field::DateSpec,
        label: "FECHA",
    },
    ColumnSpec {
        field: Field::ContractCeiling,
        label: "OS",
    },
    ColumnSpec {
        field: Field::Expense,
        label: "EGRESO ($)",
    },
    ColumnSpec {
        field: Field::OperationalStatus,
        label: "ESTATUS",
    },
    ColumnSpec {
        field: Field::AdministrativeStatus,
        label: "ESTATUS ADM",
    },
    ColumnSpec {
        field: Field::Receipt,
        label: "HES",
    },
    ColumnSpec {
        field: Field::Invoice,
        label: "FACTURA",
    },
];

/// A table ready for an external renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct TableExport {
    pub title: String,
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Produces a spreadsheet or PDF file from a prepared table.
pub trait TableRenderer {
    fn render(&self, table: &TableExport) -> Result<Vec<u8>>;
}

/// The general table: header cells prefer the header row's own label text and
/// fall back to the fixed labels; the body is every row after the header
/// (metadata row included, as the dashboard exports it).
pub fn general_table(ledger: &Ledger) -> TableExport {
    let header_row = ledger.rows.first();
    let header = GENERAL_COLUMNS
        .iter()
        .map(|column| {
            let custom = header_row.map(|row| row.get(column.field)).unwrap_or("");
            if custom.is_empty() {
                column.label.to_string()
            } else {
                custom.to_string()
            }
        })
        .collect();

    let rows = ledger
        .rows
        .iter()
        .skip(1)
        .map(|row| {
            GENERAL_COLUMNS
                .iter()
                .map(|column| row.get(column.field).to_string())
                .collect()
        })
        .collect();

    TableExport {
        title: format!("Tabla general {}", ledger.year),
        header,
        rows,
    }
}

/// The monthly-summary sheet: Día / Actividad / Monto, amounts to two
/// decimals, closed by a TOTAL row.
pub fn monthly_sheet(month: Month, summary: &MonthlySummary) -> TableExport {
    let mut rows: Vec<Vec<String>> = summary
        .details
        .iter()
        .map(|d| {
            vec![
                d.day_label.clone(),
                d.activity.clone(),
                format!("{:.2}", d.amount),
            ]
        })
        .collect();
    rows.push(vec![
        String::new(),
        "TOTAL:".to_string(),
        format!("{:.2}", summary.total),
    ]);

    TableExport {
        title: format!("Resumen de {}", month.name()),
        header: vec![
            "Día".to_string(),
            "Actividad".to_string(),
            "Monto".to_string(),
        ],
        rows,
    }
}

pub fn general_table_filename(year: &str, extension: &str) -> String {
    format!("tabla_general_{year}.{extension}")
}

pub fn monthly_summary_filename(month: Month, year: &str, extension: &str) -> String {
    format!("resumen_{}_{year}.{extension}", month.name())
}

pub fn contract_state_filename(year: &str) -> String {
    format!("estado_contrato_{year}.pdf")
}

pub fn chart_snapshot_filename(month: Month) -> String {
    format!("graficas_{}.png", month.name())
}
