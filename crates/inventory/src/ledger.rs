//! Warehouse stock ledger: per-location, per-lot quantities of master items.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use brewops_core::date::add_days;
use brewops_core::{DomainError, DomainResult, LocationId, MasterItemId};

use crate::movement::MoveRequest;

/// One ledger row: a lot of an item sitting at a location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarehouseItem {
    pub master_item_id: MasterItemId,
    pub lot_number: String,
    pub location_id: LocationId,
    pub quantity: Decimal,
    pub arrival_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<NaiveDate>,
    /// Delivery note / invoice the lot arrived with.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_number: Option<String>,
}

impl WarehouseItem {
    /// `true` for the exact (item, lot, location) triple.
    pub fn is(&self, item: MasterItemId, lot: &str, location: LocationId) -> bool {
        self.master_item_id == item && self.lot_number == lot && self.location_id == location
    }

    pub fn in_stock(&self) -> bool {
        self.quantity > Decimal::ZERO
    }
}

/// Quantity recorded for the exact (item, lot, location) triple.
pub fn quantity_of(rows: &[WarehouseItem], item: MasterItemId, lot: &str, location: LocationId) -> Decimal {
    rows.iter()
        .filter(|row| row.is(item, lot, location))
        .map(|row| row.quantity)
        .sum()
}

/// Rows still in stock whose expiry falls on or before `today + days`, soonest first.
pub fn expiring_within(rows: &[WarehouseItem], today: NaiveDate, days: u32) -> Vec<&WarehouseItem> {
    let horizon = add_days(today, days);
    let mut expiring: Vec<&WarehouseItem> = rows
        .iter()
        .filter(|row| row.in_stock())
        .filter(|row| row.expiry_date.is_some_and(|expiry| expiry <= horizon))
        .collect();
    expiring.sort_by_key(|row| row.expiry_date);
    expiring
}

/// In-memory ledger owned by the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StockLedger {
    rows: Vec<WarehouseItem>,
}

impl StockLedger {
    pub fn new(rows: Vec<WarehouseItem>) -> DomainResult<Self> {
        let mut ledger = Self::default();
        ledger.receive(rows)?;
        Ok(ledger)
    }

    pub fn rows(&self) -> &[WarehouseItem] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<WarehouseItem> {
        self.rows
    }

    /// Append received lots. Negative quantities are refused as a whole.
    pub fn receive(&mut self, rows: impl IntoIterator<Item = WarehouseItem>) -> DomainResult<()> {
        let rows: Vec<WarehouseItem> = rows.into_iter().collect();
        if let Some(bad) = rows.iter().find(|row| row.quantity < Decimal::ZERO) {
            return Err(DomainError::validation(format!(
                "lot '{}' has a negative quantity",
                bad.lot_number
            )));
        }
        self.rows.extend(rows);
        Ok(())
    }

    pub fn quantity_of(&self, item: MasterItemId, lot: &str, location: LocationId) -> Decimal {
        quantity_of(&self.rows, item, lot, location)
    }

    /// Total quantity of an item across all lots and locations.
    pub fn total_for(&self, item: MasterItemId) -> Decimal {
        self.rows
            .iter()
            .filter(|row| row.master_item_id == item)
            .map(|row| row.quantity)
            .sum()
    }

    /// Locations holding any stock of `item`, in ledger order.
    pub fn locations_holding(&self, item: MasterItemId) -> Vec<LocationId> {
        let mut locations = Vec::new();
        for row in self.rows.iter().filter(|row| row.master_item_id == item && row.in_stock()) {
            if !locations.contains(&row.location_id) {
                locations.push(row.location_id);
            }
        }
        locations
    }

    /// Lots of `item` in stock at `location`, in ledger order.
    pub fn lots_at(&self, item: MasterItemId, location: LocationId) -> Vec<&str> {
        let mut lots: Vec<&str> = Vec::new();
        for row in &self.rows {
            let held = row.master_item_id == item && row.location_id == location && row.in_stock();
            if held && !lots.contains(&row.lot_number.as_str()) {
                lots.push(row.lot_number.as_str());
            }
        }
        lots
    }

    /// Items in stock at `location`, in ledger order.
    pub fn items_at(&self, location: LocationId) -> Vec<MasterItemId> {
        let mut items = Vec::new();
        for row in self.rows.iter().filter(|row| row.location_id == location && row.in_stock()) {
            if !items.contains(&row.master_item_id) {
                items.push(row.master_item_id);
            }
        }
        items
    }

    /// Execute an approved move.
    ///
    /// Source rows are drawn down oldest arrival first and dropped once empty.
    /// The quantity lands on the destination row for the same lot, or on a new
    /// row carrying the source lot's arrival, expiry and document data.
    pub fn apply_move(&mut self, request: &MoveRequest) -> DomainResult<()> {
        if request.from == request.to {
            return Err(DomainError::validation("source and destination are the same"));
        }
        if request.quantity <= Decimal::ZERO {
            return Err(DomainError::validation("quantity must be positive"));
        }
        let available = self.quantity_of(request.master_item_id, &request.lot_number, request.from);
        if request.quantity > available {
            return Err(DomainError::invariant(format!(
                "stock cannot go negative (requested {}, available {})",
                request.quantity, available
            )));
        }

        let mut source_idx: Vec<usize> = (0..self.rows.len())
            .filter(|&i| self.rows[i].is(request.master_item_id, &request.lot_number, request.from))
            .collect();
        source_idx.sort_by_key(|&i| self.rows[i].arrival_date);

        let template = self.rows[source_idx[0]].clone();
        let mut remaining = request.quantity;
        let mut drained = Vec::new();
        for &i in &source_idx {
            let taken = remaining.min(self.rows[i].quantity);
            if taken.is_zero() {
                continue;
            }
            self.rows[i].quantity -= taken;
            remaining -= taken;
            if self.rows[i].quantity.is_zero() {
                drained.push(i);
            }
            if remaining.is_zero() {
                break;
            }
        }
        // Drop only the rows this move emptied.
        let mut idx = 0;
        self.rows.retain(|_| {
            let keep = !drained.contains(&idx);
            idx += 1;
            keep
        });

        match self
            .rows
            .iter_mut()
            .find(|row| row.is(request.master_item_id, &request.lot_number, request.to))
        {
            Some(row) => row.quantity += request.quantity,
            None => self.rows.push(WarehouseItem {
                location_id: request.to,
                quantity: request.quantity,
                ..template
            }),
        }

        tracing::debug!(
            item = %request.master_item_id,
            lot = %request.lot_number,
            from = %request.from,
            to = %request.to,
            quantity = %request.quantity,
            "stock moved"
        );
        Ok(())
    }
}
