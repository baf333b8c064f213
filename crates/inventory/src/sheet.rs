//! Fixed-column stock sheet.
//!
//! A sheet is a grid of text cells as produced or consumed by a spreadsheet
//! library. Column order: item name, lot number, quantity, location name,
//! arrival date, expiry date, document number.

use std::str::FromStr;

use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use thiserror::Error;

use brewops_core::date::{format_day, parse_day};
use brewops_core::location::find_by_name as find_location;
use brewops_core::Location;

use crate::export::ExportRow;
use crate::item::{MasterItem, find_by_name as find_item};
use crate::ledger::WarehouseItem;

/// Header row written on export.
pub const SHEET_HEADER: [&str; 7] = [
    "Item",
    "Lot",
    "Quantity",
    "Location",
    "Arrival date",
    "Expiry date",
    "Document",
];

const COL_ITEM: usize = 0;
const COL_LOT: usize = 1;
const COL_QUANTITY: usize = 2;
const COL_LOCATION: usize = 3;
const COL_ARRIVAL: usize = 4;
const COL_EXPIRY: usize = 5;
const COL_DOCUMENT: usize = 6;

/// Reason a sheet row was not imported.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RowError {
    #[error("item name is empty")]
    MissingItem,

    #[error("unknown item '{0}'")]
    UnknownItem(String),

    #[error("lot number is empty")]
    MissingLot,

    #[error("quantity '{0}' is not a positive number")]
    InvalidQuantity(String),

    #[error("unknown location '{0}'")]
    UnknownLocation(String),

    #[error("{column} '{value}' is not a date")]
    InvalidDate { column: &'static str, value: String },

    #[error("expiry date is before arrival date")]
    ExpiryBeforeArrival,
}

/// A row left out of an import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRow {
    /// 1-based row number as shown by spreadsheet tools.
    pub row: usize,
    pub reason: RowError,
}

/// Outcome of importing a sheet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub imported: Vec<WarehouseItem>,
    pub skipped: Vec<SkippedRow>,
}

impl ImportReport {
    pub fn summary(&self) -> String {
        format!("imported {}, skipped {}", self.imported.len(), self.skipped.len())
    }
}

impl core::fmt::Display for ImportReport {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.summary())
    }
}

fn cell(row: &[String], col: usize) -> &str {
    row.get(col).map(|c| c.trim()).unwrap_or("")
}

/// Spreadsheet serial day numbers count from 1899-12-30.
fn from_serial(value: &str) -> Option<NaiveDate> {
    let serial = Decimal::from_str(value).ok()?.floor().to_u64()?;
    if serial == 0 {
        return None;
    }
    NaiveDate::from_ymd_opt(1899, 12, 30)?.checked_add_days(Days::new(serial))
}

fn parse_cell_date(value: &str, column: &'static str) -> Result<NaiveDate, RowError> {
    parse_day(value)
        .ok()
        .or_else(|| from_serial(value))
        .ok_or_else(|| RowError::InvalidDate {
            column,
            value: value.to_string(),
        })
}

fn parse_quantity_cell(value: &str) -> Option<Decimal> {
    Decimal::from_str(&value.replace(',', ".")).ok()
}

fn parse_row(
    row: &[String],
    items: &[MasterItem],
    locations: &[Location],
) -> Result<WarehouseItem, RowError> {
    let name = cell(row, COL_ITEM);
    if name.is_empty() {
        return Err(RowError::MissingItem);
    }
    let item = find_item(items, name).ok_or_else(|| RowError::UnknownItem(name.to_string()))?;

    let lot = cell(row, COL_LOT);
    if lot.is_empty() {
        return Err(RowError::MissingLot);
    }

    let raw_quantity = cell(row, COL_QUANTITY);
    let quantity = parse_quantity_cell(raw_quantity)
        .filter(|q| *q > Decimal::ZERO)
        .ok_or_else(|| RowError::InvalidQuantity(raw_quantity.to_string()))?;

    let location_name = cell(row, COL_LOCATION);
    let location = find_location(locations, location_name)
        .ok_or_else(|| RowError::UnknownLocation(location_name.to_string()))?;

    let arrival_date = parse_cell_date(cell(row, COL_ARRIVAL), "arrival date")?;
    let expiry_date = match cell(row, COL_EXPIRY) {
        "" => None,
        value => Some(parse_cell_date(value, "expiry date")?),
    };
    if expiry_date.is_some_and(|expiry| expiry < arrival_date) {
        return Err(RowError::ExpiryBeforeArrival);
    }

    let document_number = Some(cell(row, COL_DOCUMENT))
        .filter(|doc| !doc.is_empty())
        .map(str::to_string);

    Ok(WarehouseItem {
        master_item_id: item.id,
        lot_number: lot.to_string(),
        location_id: location.id,
        quantity,
        arrival_date,
        expiry_date,
        document_number,
    })
}

/// `true` when the row carries the column labels rather than data.
fn is_header(row: &[String]) -> bool {
    cell(row, COL_ITEM).eq_ignore_ascii_case(SHEET_HEADER[COL_ITEM])
        && cell(row, COL_QUANTITY).eq_ignore_ascii_case(SHEET_HEADER[COL_QUANTITY])
}

/// Import stock rows from a sheet.
///
/// The first row is treated as a header when its item and quantity cells
/// carry the column labels. Blank rows are ignored. Every other row is either
/// imported or reported as skipped with its reason.
pub fn import_sheet(grid: &[Vec<String>], items: &[MasterItem], locations: &[Location]) -> ImportReport {
    let mut report = ImportReport::default();

    let has_header = grid.first().is_some_and(|first| is_header(first));
    let start = usize::from(has_header);

    for (idx, row) in grid.iter().enumerate().skip(start) {
        if row.iter().all(|c| c.trim().is_empty()) {
            continue;
        }
        match parse_row(row, items, locations) {
            Ok(parsed) => report.imported.push(parsed),
            Err(reason) => {
                tracing::warn!(row = idx + 1, %reason, "sheet row skipped");
                report.skipped.push(SkippedRow { row: idx + 1, reason });
            }
        }
    }

    tracing::info!(
        imported = report.imported.len(),
        skipped = report.skipped.len(),
        "sheet import finished"
    );
    report
}

/// Render export rows as a sheet, header first.
pub fn export_sheet(rows: &[ExportRow<'_>]) -> Vec<Vec<String>> {
    let mut grid = Vec::with_capacity(rows.len() + 1);
    grid.push(SHEET_HEADER.iter().map(|h| h.to_string()).collect());
    grid.extend(rows.iter().map(|r| {
        vec![
            r.item.name.clone(),
            r.row.lot_number.clone(),
            r.row.quantity.normalize().to_string(),
            r.location.map(|l| l.name.clone()).unwrap_or_default(),
            format_day(r.row.arrival_date),
            r.row.expiry_date.map(format_day).unwrap_or_default(),
            r.row.document_number.clone().unwrap_or_default(),
        ]
    }));
    grid
}
