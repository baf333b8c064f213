//! Command handlers.
//!
//! Each handler reads the snapshot, calls into the domain crates, and reports
//! whether it changed anything so the caller knows to save.

use std::collections::HashSet;
use std::fs;
use std::io::Write;

use anyhow::{Context, Result, anyhow, bail};
use chrono::{NaiveDate, Utc};
use serde::Serialize;

use brewops_brewing::{
    AvailabilityQuery, OccupancyWindow, TransferSelection, apply_transfer, available_tanks,
    occupancy_board, plan_transfer,
};
use brewops_core::date::{format_day, parse_day, utc_day};
use brewops_core::{CategoryId, find_by_id};
use brewops_inventory::{
    Category, ExportFilter, MoveSelection, children_of, expiring_within, export_sheet, import_sheet,
    parse_quantity, validate_move, validate_new_category,
};

use crate::cli::{
    AvailableArgs, BoardArgs, CategoryAddArgs, CategoryCommands, Commands, ExpiringArgs,
    ExportArgs, ImportArgs, MoveArgs, StockCommands, TankCommands, TransferArgs,
};
use crate::state::AppState;

/// Whether a command mutated the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Unchanged,
    Changed,
}

fn today() -> NaiveDate {
    utc_day(&Utc::now())
}

fn day_or_today(value: Option<&str>) -> Result<NaiveDate> {
    match value {
        Some(value) => Ok(parse_day(value)?),
        None => Ok(today()),
    }
}

fn print_json<T: Serialize + ?Sized>(out: &mut dyn Write, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("failed to render JSON")?;
    writeln!(out, "{json}")?;
    Ok(())
}

pub fn dispatch(state: &mut AppState, command: &Commands, json: bool, out: &mut dyn Write) -> Result<Outcome> {
    match command {
        Commands::Tanks(TankCommands::Available(args)) => tanks_available(state, args, json, out),
        Commands::Tanks(TankCommands::Board(args)) => tanks_board(state, args, json, out),
        Commands::Tanks(TankCommands::Transfer(args)) => tanks_transfer(state, args, json, out),
        Commands::Stock(StockCommands::Move(args)) => stock_move(state, args, json, out),
        Commands::Stock(StockCommands::Export(args)) => stock_export(state, args, json, out),
        Commands::Stock(StockCommands::Import(args)) => stock_import(state, args, json, out),
        Commands::Stock(StockCommands::Expiring(args)) => stock_expiring(state, args, json, out),
        Commands::Categories(CategoryCommands::Add(args)) => category_add(state, args, json, out),
        Commands::Categories(CategoryCommands::List) => category_list(state, json, out),
    }
}

fn tanks_available(state: &AppState, args: &AvailableArgs, json: bool, out: &mut dyn Write) -> Result<Outcome> {
    let date = parse_day(&args.date)?;
    let batch = args.batch.as_deref().map(|key| state.batch(key)).transpose()?;

    let required_volume_l = match (&args.volume, batch) {
        (Some(volume), _) => parse_quantity(volume)?,
        (None, Some(batch)) => find_by_id(&state.recipes, &batch.recipe_id)
            .map(|recipe| recipe.target_volume_l)
            .ok_or_else(|| anyhow!("recipe of batch {} not found; pass --volume", batch.label()))?,
        (None, None) => bail!("pass --volume or --batch"),
    };

    let query = AvailabilityQuery {
        date,
        required_volume_l,
        batch_id: batch.map(|b| b.id),
        current_fermenter_id: batch.and_then(|b| b.fermenter_id),
    };
    let tanks = available_tanks(&query, &state.locations, &state.batches, &state.recipes);

    if json {
        print_json(out, &tanks)?;
    } else if tanks.is_empty() {
        writeln!(out, "no destination available on {}", format_day(date))?;
    } else {
        for tank in tanks {
            writeln!(out, "{} ({} L)", tank.name, tank.capacity_l().normalize())?;
        }
    }
    Ok(Outcome::Unchanged)
}

#[derive(Debug, Serialize)]
struct BoardEntry<'a> {
    tank: &'a str,
    batch: Option<String>,
    window: Option<OccupancyWindow>,
}

fn tanks_board(state: &AppState, args: &BoardArgs, json: bool, out: &mut dyn Write) -> Result<Outcome> {
    let date = day_or_today(args.date.as_deref())?;
    let board = occupancy_board(date, &state.locations, &state.batches, &state.recipes);

    let entries: Vec<BoardEntry<'_>> = board
        .iter()
        .map(|slot| BoardEntry {
            tank: &slot.tank.name,
            batch: slot.occupant.map(|(batch, _)| batch.label()),
            window: slot.occupant.map(|(_, window)| window),
        })
        .collect();

    if json {
        print_json(out, &entries)?;
    } else {
        for entry in &entries {
            match (&entry.batch, &entry.window) {
                (Some(batch), Some(window)) => writeln!(out, "{}: {} ({})", entry.tank, batch, window)?,
                _ => writeln!(out, "{}: free", entry.tank)?,
            }
        }
    }
    Ok(Outcome::Unchanged)
}

fn tanks_transfer(state: &mut AppState, args: &TransferArgs, json: bool, out: &mut dyn Write) -> Result<Outcome> {
    let batch = state.batch(&args.batch)?;
    let selection = TransferSelection {
        batch_id: batch.id,
        destination: args.to.as_deref().map(|key| state.location(key)).transpose()?.map(|l| l.id),
        date: parse_day(&args.date)?,
        required_volume_l: args.volume.as_deref().map(parse_quantity).transpose()?,
    };

    let request = plan_transfer(&selection, &state.locations, &state.batches, &state.recipes)
        .map_err(|rejection| anyhow!("transfer refused: {rejection}"))?;
    let label = batch.label();
    apply_transfer(&mut state.batches, &request)?;

    tracing::info!(batch = %label, to = %request.to, "batch transferred");
    if json {
        print_json(out, &request)?;
    } else {
        let tank = state.location(&request.to.to_string())?;
        writeln!(out, "{} moved to {} on {}", label, tank.name, format_day(request.date))?;
    }
    Ok(Outcome::Changed)
}

fn stock_move(state: &mut AppState, args: &MoveArgs, json: bool, out: &mut dyn Write) -> Result<Outcome> {
    let selection = MoveSelection {
        master_item_id: args.item.as_deref().map(|key| state.item(key)).transpose()?.map(|i| i.id),
        lot_number: args.lot.clone(),
        source: args.from.as_deref().map(|key| state.location(key)).transpose()?.map(|l| l.id),
        destination: args.to.as_deref().map(|key| state.location(key)).transpose()?.map(|l| l.id),
        quantity: args.quantity.as_deref().map(parse_quantity).transpose()?,
    };

    let request = validate_move(&selection, state.stock.rows())
        .map_err(|rejection| anyhow!("move refused: {rejection}"))?;
    state.stock.apply_move(&request)?;

    tracing::info!(lot = %request.lot_number, quantity = %request.quantity, "stock moved");
    if json {
        print_json(out, &request)?;
    } else {
        let from = state.location(&request.from.to_string())?;
        let to = state.location(&request.to.to_string())?;
        writeln!(
            out,
            "moved {} of lot {} from {} to {}",
            request.quantity.normalize(),
            request.lot_number,
            from.name,
            to.name
        )?;
    }
    Ok(Outcome::Changed)
}

fn stock_export(state: &AppState, args: &ExportArgs, json: bool, out: &mut dyn Write) -> Result<Outcome> {
    let location_ids = args
        .locations
        .iter()
        .map(|key| state.location(key).map(|l| l.id))
        .collect::<Result<HashSet<_>>>()?;
    let category_ids = args
        .categories
        .iter()
        .map(|key| state.category(key).map(|c| c.id))
        .collect::<Result<HashSet<_>>>()?;
    let filter = ExportFilter {
        location_ids,
        category_ids,
        name_query: args.name.clone(),
    };

    let rows = filter.apply(state.stock.rows(), &state.master_items, &state.categories, &state.locations);
    let sheet = export_sheet(&rows);
    tracing::info!(rows = rows.len(), "stock exported");

    match &args.out {
        Some(path) => {
            let rendered = serde_json::to_string_pretty(&sheet).context("failed to render sheet")?;
            fs::write(path, rendered).with_context(|| format!("failed to write {}", path.display()))?;
            writeln!(out, "exported {} rows to {}", rows.len(), path.display())?;
        }
        None if json => print_json(out, &sheet)?,
        None => {
            for line in &sheet {
                writeln!(out, "{}", line.join("\t"))?;
            }
        }
    }
    Ok(Outcome::Unchanged)
}

#[derive(Debug, Serialize)]
struct ImportSummary {
    imported: usize,
    skipped: Vec<SkippedLine>,
}

#[derive(Debug, Serialize)]
struct SkippedLine {
    row: usize,
    reason: String,
}

fn stock_import(state: &mut AppState, args: &ImportArgs, json: bool, out: &mut dyn Write) -> Result<Outcome> {
    let raw = fs::read_to_string(&args.file)
        .with_context(|| format!("failed to read {}", args.file.display()))?;
    let grid: Vec<Vec<String>> = serde_json::from_str(&raw)
        .with_context(|| format!("{} is not a sheet (array of rows of text)", args.file.display()))?;

    let report = import_sheet(&grid, &state.master_items, &state.locations);
    let imported = report.imported.len();
    state.stock.receive(report.imported.iter().cloned())?;

    if json {
        let summary = ImportSummary {
            imported,
            skipped: report
                .skipped
                .iter()
                .map(|s| SkippedLine { row: s.row, reason: s.reason.to_string() })
                .collect(),
        };
        print_json(out, &summary)?;
    } else {
        writeln!(out, "{report}")?;
        for skipped in &report.skipped {
            writeln!(out, "  row {}: {}", skipped.row, skipped.reason)?;
        }
    }

    Ok(if imported > 0 { Outcome::Changed } else { Outcome::Unchanged })
}

fn stock_expiring(state: &AppState, args: &ExpiringArgs, json: bool, out: &mut dyn Write) -> Result<Outcome> {
    let today = day_or_today(args.today.as_deref())?;
    let rows = expiring_within(state.stock.rows(), today, args.days);

    if json {
        print_json(out, &rows)?;
    } else if rows.is_empty() {
        writeln!(out, "nothing expires within {} days", args.days)?;
    } else {
        for row in rows {
            let item = find_by_id(&state.master_items, &row.master_item_id)
                .map(|i| i.name.as_str())
                .unwrap_or("?");
            let location = find_by_id(&state.locations, &row.location_id)
                .map(|l| l.name.as_str())
                .unwrap_or("?");
            let expiry = row.expiry_date.map(format_day).unwrap_or_default();
            writeln!(out, "{expiry} {item} lot {} at {location}: {}", row.lot_number, row.quantity.normalize())?;
        }
    }
    Ok(Outcome::Unchanged)
}

fn category_add(state: &mut AppState, args: &CategoryAddArgs, json: bool, out: &mut dyn Write) -> Result<Outcome> {
    let parent_id = args.parent.as_deref().map(|key| state.category(key)).transpose()?.map(|c| c.id);
    validate_new_category(&state.categories, &args.name, parent_id)?;

    let category = Category {
        id: CategoryId::new(),
        name: args.name.trim().to_string(),
        parent_id,
    };
    if json {
        print_json(out, &category)?;
    } else {
        writeln!(out, "added category {}", category.name)?;
    }
    state.categories.push(category);
    Ok(Outcome::Changed)
}

fn category_list(state: &AppState, json: bool, out: &mut dyn Write) -> Result<Outcome> {
    if json {
        print_json(out, &state.categories)?;
        return Ok(Outcome::Unchanged);
    }
    for top in state.categories.iter().filter(|c| c.parent_id.is_none()) {
        writeln!(out, "{}", top.name)?;
        for child in children_of(&state.categories, top.id) {
            writeln!(out, "  {}", child.name)?;
        }
    }
    Ok(Outcome::Unchanged)
}
