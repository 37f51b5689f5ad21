//! Command-line interface argument parsing for betonera-tui.
//!
//! - `betonera-tui` opens the inspection list
//! - `betonera-tui list --json` prints inspections with their progress
//! - `betonera-tui export --number 12` exports a completed inspection
//! - `betonera-tui order mantos,mediciones,puntos` sets the grid axis order
//! - `betonera-tui photos --number 12` prints the photo checklist
//! - `betonera-tui attach 12 301 a.jpg b.jpg` adds photos to a checklist item

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

/// Terminal app for recording concrete inspection measurements.
///
/// Each inspection holds a grid of layers, measurements and points that is
/// filled in from the keyboard and exported as a workbook plus an image.
#[derive(Parser, Debug)]
#[command(name = "betonera-tui")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory holding the database, exports and log file
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Launch the TUI (default)
    Open,

    /// Print inspections with their progress
    List {
        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Export a completed inspection to a workbook and an image
    Export {
        /// Inspection number
        #[arg(short, long)]
        number: i64,
    },

    /// Print the grid axis order, or set it
    /// Example: "mantos,mediciones,puntos"
    Order { value: Option<String> },

    /// Print the photo checklist of an inspection
    Photos {
        /// Inspection number
        #[arg(short, long)]
        number: i64,
    },

    /// Copy image files in as photos of a checklist item
    Attach {
        /// Inspection number
        number: i64,
        /// Checklist item id, e.g. 301
        item: u32,
        /// Image files, attached in order
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }

    pub fn command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Open)
    }
}

/// Environment variable overriding the data directory
pub const DATA_DIR_ENV: &str = "BETONERA_DIR";

/// Configuration derived from CLI arguments
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub db_path: PathBuf,
    pub excel_dir: PathBuf,
    pub image_dir: PathBuf,
    /// Root of the per-inspection photo folders
    pub photo_dir: PathBuf,
    pub log_path: PathBuf,
    pub verbose: bool,
    /// Event poll timeout in milliseconds
    pub tick_rate_ms: u64,
}

impl AppConfig {
    /// Create AppConfig from the parsed CLI
    pub fn from_cli(cli: &Cli) -> Self {
        let data_dir = resolve_data_dir(
            cli.data_dir.clone(),
            std::env::var_os(DATA_DIR_ENV).map(PathBuf::from),
        );
        Self::for_data_dir(&data_dir, cli.verbose)
    }

    /// Derive every path from the data directory
    pub fn for_data_dir(data_dir: &Path, verbose: bool) -> Self {
        AppConfig {
            data_dir: data_dir.to_path_buf(),
            db_path: data_dir.join("betonera.db"),
            excel_dir: data_dir.join("excels"),
            image_dir: data_dir.join("images"),
            photo_dir: data_dir.join("photos"),
            log_path: data_dir.join("betonera.log"),
            verbose,
            tick_rate_ms: 250,
        }
    }
}

/// Pick the data directory: explicit flag, then environment, then the
/// platform data dir, then the working directory
fn resolve_data_dir(explicit: Option<PathBuf>, env: Option<PathBuf>) -> PathBuf {
    explicit
        .or(env)
        .unwrap_or_else(|| {
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("betonera")
        })
}
