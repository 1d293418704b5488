//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueHint};

use crate::cli::error::{CliError, CliResult};
use crate::config::OutputFormat;
use crate::domain::ItemId;

/// In-memory hierarchical item store: query, cascade-delete and flatten item trees
#[derive(Parser, Debug)]
#[command(name = "treegrid")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug output, repeat for more (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// Config file, layered on top of the global config
    #[arg(long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Item id given on the command line.
#[derive(Args, Debug, Clone)]
pub struct IdArg {
    /// Item id (integer-looking ids are numeric unless --string-id)
    pub id: String,

    /// Treat the id as a string even if it looks like a number
    #[arg(long)]
    pub string_id: bool,
}

impl IdArg {
    /// Blank ids are rejected; an item cannot carry one.
    pub fn item_id(&self) -> CliResult<ItemId> {
        if self.id.trim().is_empty() {
            return Err(CliError::InvalidArgs("item id must not be empty".into()));
        }
        if self.string_id {
            return Ok(ItemId::Str(self.id.clone()));
        }
        match self.id.parse() {
            Ok(id) => Ok(id),
            Err(never) => match never {},
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the flattened grid rows
    Flatten {
        /// Item file (.json or .toml)
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Output format (default from config)
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,
    },

    /// Show the item forest as tree
    Tree {
        /// Item file (.json or .toml)
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Print one item as JSON
    Get {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        #[command(flatten)]
        id: IdArg,
    },

    /// List children of an item
    Children {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        #[command(flatten)]
        id: IdArg,
        /// Include all descendants
        #[arg(short, long)]
        all: bool,
    },

    /// List the ancestor chain of an item (item first)
    Parents {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        #[command(flatten)]
        id: IdArg,
    },

    /// Remove an item and its descendants, then print the remaining rows
    Remove {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        #[command(flatten)]
        id: IdArg,
    },

    /// Validate an item file and report dangling items
    Check {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Show effective settings
    Config,

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}
