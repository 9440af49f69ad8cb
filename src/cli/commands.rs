use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "cl", about = concat!("cl v", env!("CARGO_PKG_VERSION"), " - a local checklist"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Run against a different directory (the parent of .checklist/)
    #[arg(short = 'C', long = "dir", global = true)]
    pub dir: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a .checklist/ directory here
    Init(InitArgs),
    /// List categories and their items
    List(ListArgs),
    /// List categories only
    Categories,
    /// Add an item
    Add(AddArgs),
    /// Change an item's text or category
    Edit(EditArgs),
    /// Delete an item
    Rm(IdArg),
    /// Flip an item between done and not done
    Toggle(IdArg),
    /// Category management
    Category(CategoryCmd),
    /// Validate stored data
    Check,
}

#[derive(Args)]
pub struct InitArgs {
    /// Rewrite checklist.toml even if .checklist/ already exists
    #[arg(long)]
    pub force: bool,
}

#[derive(Args)]
pub struct ListArgs {
    /// Only show this category (id)
    pub category: Option<String>,
}

#[derive(Args)]
pub struct IdArg {
    pub id: String,
}

#[derive(Args)]
pub struct AddArgs {
    /// Item text
    pub text: String,
    /// Category id (default: the first category)
    #[arg(long, short)]
    pub category: Option<String>,
}

#[derive(Args)]
pub struct EditArgs {
    /// Item id
    pub id: String,
    /// New text
    #[arg(long)]
    pub text: Option<String>,
    /// Move to this category id
    #[arg(long, short)]
    pub category: Option<String>,
}

#[derive(Args)]
pub struct CategoryCmd {
    #[command(subcommand)]
    pub action: CategoryAction,
}

#[derive(Subcommand)]
pub enum CategoryAction {
    /// Create a category
    Add(CategoryAddArgs),
    /// Rename a category or change its time
    Edit(CategoryEditArgs),
    /// Delete a category; its items move to the first remaining category
    Rm(IdArg),
    /// Mark every item in a category done
    Done(IdArg),
    /// Mark every item in a category not done
    Undone(IdArg),
}

#[derive(Args)]
pub struct CategoryAddArgs {
    /// Category name
    pub name: String,
    /// Optional time label, e.g. 08:30
    #[arg(long)]
    pub time: Option<String>,
}

#[derive(Args)]
pub struct CategoryEditArgs {
    /// Category id
    pub id: String,
    /// New name
    #[arg(long)]
    pub name: Option<String>,
    /// New time label
    #[arg(long, conflicts_with = "clear_time")]
    pub time: Option<String>,
    /// Remove the time label
    #[arg(long)]
    pub clear_time: bool,
}
