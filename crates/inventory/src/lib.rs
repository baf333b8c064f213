//! Inventory domain module: master items, categories and the warehouse stock
//! ledger.
//!
//! This crate contains the business rules for stock moves, reporting filters
//! and spreadsheet import/export, implemented purely as deterministic domain
//! logic (no IO, no storage).

pub mod category;
pub mod export;
pub mod item;
pub mod ledger;
pub mod movement;
pub mod sheet;

pub use category::{Category, children_of, expand_with_children, validate_new_category};
pub use export::{ExportFilter, ExportRow};
pub use item::{ItemKind, MasterItem};
pub use ledger::{StockLedger, WarehouseItem, expiring_within};
pub use movement::{MoveRejection, MoveRequest, MoveSelection, parse_quantity, validate_move};
pub use sheet::{ImportReport, SHEET_HEADER, SkippedRow, export_sheet, import_sheet};
