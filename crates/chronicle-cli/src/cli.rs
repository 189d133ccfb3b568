//! CLI command definitions and argument parsing.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Chronicle CLI - Manage a community archive of documents, photos and letters.
#[derive(Debug, Parser)]
#[command(name = "chronicle")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true, env = "CHRONICLE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Database file, overriding the configured one
    #[arg(short, long, global = true, env = "CHRONICLE_DATABASE")]
    pub database: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (IDs only)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Archive a new item
    Add(AddArgs),

    /// Show one item
    Show(ShowArgs),

    /// List items, newest first
    List(ListArgs),

    /// Delete an item with its date, facets and translations
    Delete(DeleteArgs),

    /// Set or preview fuzzy dates
    Date(DateCommand),

    /// Group dated items into periods
    Timeline(TimelineArgs),

    /// Cite an item
    Cite(CiteArgs),

    /// Browse or seed the facet taxonomy
    Facets(FacetsCommand),

    /// Most used tags
    Tags(TagsArgs),

    /// Manage translations
    Translate(TranslateCommand),
}

/// Date options shared by `add`, `date set` and `date render`.
#[derive(Debug, Clone, Default, Args)]
pub struct DateArgs {
    /// Exact date (YYYY-MM-DD)
    #[arg(long, conflicts_with_all = ["from", "to"])]
    pub date: Option<String>,

    /// Start of a period (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<String>,

    /// End of a period (YYYY-MM-DD); defaults to --from
    #[arg(long, requires = "from")]
    pub to: Option<String>,

    /// Mark the date as uncertain
    #[arg(long)]
    pub approximate: bool,

    /// Precision: day, month, year, decade, century or era (inferred when omitted)
    #[arg(long)]
    pub precision: Option<String>,

    /// Text shown instead of the computed rendering
    #[arg(long)]
    pub display: Option<String>,
}

/// Arguments for the add command.
#[derive(Debug, Clone, Parser)]
pub struct AddArgs {
    /// Item title
    pub title: String,

    /// File to archive
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// Item type: document, photo, text, archive or other (guessed from the file)
    #[arg(short = 't', long = "type")]
    pub item_type: Option<String>,

    /// Description
    #[arg(long)]
    pub description: Option<String>,

    /// Comma-separated tags
    #[arg(long, value_delimiter = ',')]
    pub tags: Vec<String>,

    #[command(flatten)]
    pub date: DateArgs,

    /// Uploader name
    #[arg(short, long)]
    pub uploader: Option<String>,

    /// Suggest tags, facets and a translation with the configured LLM
    #[arg(long)]
    pub enrich: bool,
}

/// Arguments for the show command.
#[derive(Debug, Parser)]
pub struct ShowArgs {
    /// Item ID
    pub id: String,
}

/// Arguments for the list command.
#[derive(Debug, Parser)]
pub struct ListArgs {
    /// Filter by item type
    #[arg(short = 't', long = "type")]
    pub item_type: Option<String>,

    /// Filter by tag
    #[arg(long)]
    pub tag: Option<String>,

    /// Items per page
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Page number, starting at 1
    #[arg(short, long, default_value = "1")]
    pub page: usize,
}

/// Arguments for the delete command.
#[derive(Debug, Parser)]
pub struct DeleteArgs {
    /// Item ID
    pub id: String,

    /// Skip confirmation prompt
    #[arg(short = 'y', long)]
    pub yes: bool,
}

/// Date subcommands.
#[derive(Debug, Parser)]
pub struct DateCommand {
    #[command(subcommand)]
    pub action: DateAction,
}

/// Date actions.
#[derive(Debug, Subcommand)]
pub enum DateAction {
    /// Replace the date of an item
    Set {
        /// Item ID
        id: String,
        #[command(flatten)]
        date: DateArgs,
    },

    /// Print how a date would be displayed
    Render {
        #[command(flatten)]
        date: DateArgs,
    },
}

/// Arguments for the timeline command.
#[derive(Debug, Parser)]
pub struct TimelineArgs {
    /// Grouping: auto, era, century, decade, year or month
    #[arg(short, long, default_value = "auto")]
    pub level: String,

    /// Only items overlapping this start date (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<String>,

    /// Only items overlapping this end date (YYYY-MM-DD)
    #[arg(long)]
    pub to: Option<String>,

    /// Only items with one of these comma-separated tags
    #[arg(long, value_delimiter = ',')]
    pub tags: Vec<String>,

    /// Only items with one of these comma-separated facet IDs
    #[arg(long, value_delimiter = ',')]
    pub facets: Vec<i64>,

    /// Only items of this type
    #[arg(short = 't', long = "type")]
    pub item_type: Option<String>,

    /// Period order: asc or desc
    #[arg(short, long, default_value = "desc")]
    pub sort: String,

    /// Maximum number of items
    #[arg(long)]
    pub limit: Option<usize>,
}

/// Arguments for the cite command.
#[derive(Debug, Parser)]
pub struct CiteArgs {
    /// Item ID
    pub id: String,

    /// Style: apa, mla, chicago, bibtex, plain or all
    #[arg(short, long, default_value = "all")]
    pub style: String,

    /// URL where the item can be viewed
    #[arg(long)]
    pub url: Option<String>,
}

/// Facet subcommands.
#[derive(Debug, Parser)]
pub struct FacetsCommand {
    #[command(subcommand)]
    pub action: FacetsAction,
}

/// Facet actions.
#[derive(Debug, Subcommand)]
pub enum FacetsAction {
    /// List facets by category
    List {
        /// Only this category
        #[arg(long)]
        category: Option<String>,
    },

    /// Insert the default taxonomy into an empty archive
    Seed,
}

/// Arguments for the tags command.
#[derive(Debug, Parser)]
pub struct TagsArgs {
    /// Maximum number of tags
    #[arg(short, long)]
    pub limit: Option<usize>,
}

/// Translation subcommands.
#[derive(Debug, Parser)]
pub struct TranslateCommand {
    #[command(subcommand)]
    pub action: TranslateAction,
}

/// Translation actions.
#[derive(Debug, Subcommand)]
pub enum TranslateAction {
    /// Add a translation to an item
    Add {
        /// Item ID
        id: String,

        /// Language code of the translation
        #[arg(short, long)]
        language: String,

        /// Translated text
        #[arg(long, conflicts_with = "file")]
        text: Option<String>,

        /// Read the translated text from a file
        #[arg(long)]
        file: Option<PathBuf>,

        /// Author name
        #[arg(short, long)]
        author: Option<String>,

        /// Publish instead of saving as a draft
        #[arg(long)]
        publish: bool,
    },

    /// List translations of an item
    List {
        /// Item ID
        id: String,

        /// Only this language
        #[arg(short, long)]
        language: Option<String>,
    },

    /// Vote on a translation; repeating a vote withdraws it
    Vote {
        /// Translation ID
        translation_id: i64,

        /// up or down
        vote: String,

        /// Voter name
        #[arg(long)]
        voter: Option<String>,
    },
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}
