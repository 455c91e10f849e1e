//! CLI Tooling
//!
//! Command definitions for the `wt5` binary and their execution. Every command
//! returns the text to print so output stays testable.

use crate::collection::Item;
use crate::config::{ConfigLoader, Wt5Config};
use crate::error::ApiError;
use crate::logging::LoggingConfig;
use crate::store::node;
use crate::tree;
use crate::units::{self, Unit};
use clap::{Parser, Subcommand, ValueEnum};
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use owo_colors::OwoColorize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// wt5 CLI - inspect collection files and convert spectroscopy units
#[derive(Parser, Debug)]
#[command(name = "wt5")]
#[command(about = "Inspect wt5 collection files and convert spectroscopy units")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path (layered over the global config)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long, global = true)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file, file+stderr)
    #[arg(long, global = true)]
    pub log_output: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the tree of a wt5 file
    Tree {
        /// Store file to open (read in place, never modified)
        path: PathBuf,

        /// Object inside the file to print
        #[arg(default_value = "/")]
        internal_path: String,

        /// Also list attributes of every node
        #[arg(short, long)]
        verbose: bool,

        /// Levels of nesting to print (ignored for data objects)
        #[arg(short = 'd', short_alias = 'L', long)]
        depth: Option<usize>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Convert values between units (nm, wn, eV, meV, Hz, THz, GHz)
    Convert {
        /// Values and one or two unit tokens, in any order
        #[arg(required = true, allow_negative_numbers = true)]
        args: Vec<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// CLI context holding the loaded configuration
pub struct CliContext {
    config: Wt5Config,
}

impl CliContext {
    /// Create a new CLI context
    pub fn new(config_path: Option<PathBuf>) -> Result<Self, ApiError> {
        let config = match &config_path {
            Some(path) => ConfigLoader::load_from_file(path)?,
            None => ConfigLoader::load()?,
        };
        Ok(Self { config })
    }

    /// Context over an already-built configuration
    pub fn with_config(config: Wt5Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Wt5Config {
        &self.config
    }

    /// Logging settings with the command-line overrides applied
    pub fn logging_config(&self, cli: &Cli) -> LoggingConfig {
        let mut logging = self.config.logging.clone();
        if let Some(level) = &cli.log_level {
            logging.level = level.clone();
        }
        if let Some(format) = &cli.log_format {
            logging.format = format.clone();
        }
        if let Some(output) = &cli.log_output {
            logging.output = output.clone();
        }
        logging
    }

    /// Execute a CLI command
    pub fn execute(&self, command: &Commands) -> Result<String, ApiError> {
        match command {
            Commands::Tree {
                path,
                internal_path,
                verbose,
                depth,
                format,
            } => self.tree(path, internal_path, *verbose, *depth, *format),
            Commands::Convert { args } => convert(args),
        }
    }

    fn tree(
        &self,
        path: &Path,
        internal_path: &str,
        verbose: bool,
        depth: Option<usize>,
        format: OutputFormat,
    ) -> Result<String, ApiError> {
        let depth = depth.unwrap_or(self.config.tree.depth);
        let root = crate::open(path, true, Some(self.config.storage.temp_files()))?;
        let item = resolve_internal(root, internal_path)?;
        info!(file = %path.display(), internal_path, class = item.class_name(), "Printing tree");

        if format == OutputFormat::Json {
            let summary = tree::summarize(&item, depth)?;
            return serde_json::to_string_pretty(&summary)
                .map_err(|e| ApiError::InvalidArgument(format!("Failed to serialize tree: {}", e)));
        }
        let text = match &item {
            Item::Collection(collection) => collection.format_tree(verbose, depth)?,
            Item::Data(data) => data.format_tree(verbose)?,
            Item::Group(group) => format!("{} ({})\n", group.name(), group.fullpath()),
        };
        Ok(self.decorate(text.trim_end()))
    }

    /// Bold the header line when colored output is configured
    fn decorate(&self, text: &str) -> String {
        if !self.config.output.color {
            return text.to_string();
        }
        match text.split_once('\n') {
            Some((header, rest)) => format!("{}\n{}", header.bold(), rest),
            None => format!("{}", text.bold()),
        }
    }
}

fn resolve_internal(root: Item, internal_path: &str) -> Result<Item, ApiError> {
    if node::segments(internal_path).next().is_none() {
        return Ok(root);
    }
    match &root {
        Item::Collection(collection) => collection.get_path(internal_path),
        _ => Err(ApiError::ItemNotFound(node::normalize(internal_path))),
    }
}

/// Convert every numeric argument.
///
/// One unit token: each value into every other unit, as a table. Two unit
/// tokens: each value from the first into the second, one per line.
pub fn convert(args: &[String]) -> Result<String, ApiError> {
    let mut unit_args = Vec::new();
    let mut values = Vec::new();
    for arg in args {
        if units::is_unit(arg) {
            unit_args.push(arg.parse::<Unit>()?);
        } else {
            let value = arg.parse::<f64>().map_err(|_| {
                ApiError::InvalidArgument(format!("'{}' is neither a number nor a unit", arg))
            })?;
            values.push(value);
        }
    }
    if values.is_empty() {
        return Err(ApiError::InvalidArgument("no values to convert".to_string()));
    }
    debug!(?unit_args, count = values.len(), "Converting values");

    match unit_args.as_slice() {
        [from] => {
            let mut table = Table::new();
            table.load_preset(UTF8_BORDERS_ONLY);
            let mut header = vec!["Unit".to_string()];
            header.extend(values.iter().map(|v| format!("{} {}", v, from)));
            table.set_header(header);
            for unit in Unit::ALL.iter().filter(|u| *u != from) {
                let mut row = vec![unit.to_string()];
                row.extend(values.iter().map(|v| units::convert(*v, *from, *unit).to_string()));
                table.add_row(row);
            }
            Ok(table.to_string())
        }
        [from, to] => Ok(values
            .iter()
            .map(|v| units::convert(*v, *from, *to).to_string())
            .collect::<Vec<_>>()
            .join("\n")),
        _ => Err(ApiError::InvalidArgument(format!(
            "expected one or two unit tokens, got {}",
            unit_args.len()
        ))),
    }
}
