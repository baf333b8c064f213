//! Command-line surface.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "brewops", about = "Brewery tank scheduling and warehouse stock", version)]
pub struct Cli {
    #[arg(long, global = true, help = "State snapshot file (overrides BREWOPS_STATE)")]
    pub state: Option<PathBuf>,
    #[arg(long, global = true, help = "Log format: json or pretty (overrides BREWOPS_LOG_FORMAT)")]
    pub log_format: Option<String>,
    #[arg(
        long,
        global = true,
        action = ArgAction::SetTrue,
        help = "Render command output as pretty JSON"
    )]
    pub json: bool,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    #[command(subcommand)]
    Tanks(TankCommands),
    #[command(subcommand)]
    Stock(StockCommands),
    #[command(subcommand)]
    Categories(CategoryCommands),
}

#[derive(Debug, Subcommand)]
pub enum TankCommands {
    /// Tanks that can receive a batch on a date.
    Available(AvailableArgs),
    /// Which batch holds each tank on a date.
    Board(BoardArgs),
    /// Move a batch into another tank.
    Transfer(TransferArgs),
}

#[derive(Debug, Args)]
pub struct AvailableArgs {
    #[arg(long, help = "Day of the transfer (YYYY-MM-DD)")]
    pub date: String,
    #[arg(long, help = "Required volume in litres (defaults to the batch recipe's target)")]
    pub volume: Option<String>,
    #[arg(long, help = "Batch being transferred (number or id)")]
    pub batch: Option<String>,
}

#[derive(Debug, Args)]
pub struct BoardArgs {
    #[arg(long, help = "Day to show (YYYY-MM-DD, defaults to today)")]
    pub date: Option<String>,
}

#[derive(Debug, Args)]
pub struct TransferArgs {
    #[arg(long, help = "Batch to move (number or id)")]
    pub batch: String,
    #[arg(long, help = "Destination tank (name or id)")]
    pub to: Option<String>,
    #[arg(long, help = "Day of the transfer (YYYY-MM-DD)")]
    pub date: String,
    #[arg(long, help = "Required volume in litres (defaults to the recipe's target)")]
    pub volume: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum StockCommands {
    /// Move a lot between locations.
    Move(MoveArgs),
    /// Export ledger rows as a sheet.
    Export(ExportArgs),
    /// Import ledger rows from a sheet.
    Import(ImportArgs),
    /// Lots expiring soon.
    Expiring(ExpiringArgs),
}

#[derive(Debug, Args)]
pub struct MoveArgs {
    #[arg(long, help = "Item (name or id)")]
    pub item: Option<String>,
    #[arg(long)]
    pub lot: Option<String>,
    #[arg(long, help = "Source location (name or id)")]
    pub from: Option<String>,
    #[arg(long, help = "Destination location (name or id)")]
    pub to: Option<String>,
    #[arg(long)]
    pub quantity: Option<String>,
}

#[derive(Debug, Args)]
pub struct ExportArgs {
    #[arg(long = "location", help = "Location to include (name or id, repeatable)")]
    pub locations: Vec<String>,
    #[arg(long = "category", help = "Category to include (name or id, repeatable)")]
    pub categories: Vec<String>,
    #[arg(long, help = "Item name contains (case-insensitive)")]
    pub name: Option<String>,
    #[arg(long, help = "Write the sheet to this file instead of stdout")]
    pub out: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct ImportArgs {
    #[arg(long, help = "Sheet file (JSON array of rows of text cells)")]
    pub file: PathBuf,
}

#[derive(Debug, Args)]
pub struct ExpiringArgs {
    #[arg(long, help = "Reference day (YYYY-MM-DD, defaults to today)")]
    pub today: Option<String>,
    #[arg(long, default_value_t = 30)]
    pub days: u32,
}

#[derive(Debug, Subcommand)]
pub enum CategoryCommands {
    /// Add a category.
    Add(CategoryAddArgs),
    /// List categories with their children.
    List,
}

#[derive(Debug, Args)]
pub struct CategoryAddArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long, help = "Parent category (name or id)")]
    pub parent: Option<String>,
}
