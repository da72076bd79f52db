use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "glider")]
#[command(author, version, about)]
#[command(long_about = "A markdown slide-deck presentation engine.\n\n\
    A deck is a YAML descriptor listing markdown slides (file paths or\n\
    inline content) with layered style overrides.\n\n\
    Examples:\n  \
    glider deck.yaml             Present a deck\n  \
    glider export deck.yaml      Render every slide to standalone HTML\n  \
    glider config show           Print the active configuration")]
#[command(propagate_version = true)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    /// Deck descriptor to present (prompted for when omitted)
    pub file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Do not open the rendered slide in the system viewer
    #[arg(long)]
    pub no_open: bool,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Export slides as standalone HTML documents
    Export {
        /// Deck descriptor to export
        file: PathBuf,

        /// Output directory for HTML files
        #[arg(short, long, default_value = "export")]
        output_dir: PathBuf,
    },

    /// View and modify configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Display current configuration
    Show,

    /// Print the configuration file path
    Path,

    /// Set a configuration value
    Set {
        /// Configuration key (e.g. window.width, slides.default_directory)
        key: String,

        /// Value to set
        value: String,
    },
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        match self.command {
            Some(Commands::Export { file, output_dir }) => {
                if !file.exists() {
                    anyhow::bail!("File not found: {}", file.display());
                }
                crate::commands::export::run(&file, &output_dir)
            }
            Some(Commands::Config { command }) => crate::commands::config::run(command),
            None => crate::app::run(self.file, !self.no_open),
        }
    }
}
