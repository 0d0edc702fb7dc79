use clap::{Parser, Subcommand, ValueEnum, ValueHint};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Interactive Node.js debugging lab", long_about = None)]
pub struct Cli {
    /// Set the logging level (overrides the configuration file)
    #[arg(long, global = true)]
    pub log_level: Option<tracing::Level>,

    /// Configuration file layered over the default locations
    #[arg(long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Settle every simulated run immediately
    #[arg(long, global = true)]
    pub instant: bool,

    /// Lesson catalog (YAML or JSON) replacing the built-in one
    #[arg(long, global = true, value_hint = ValueHint::FilePath)]
    pub catalog: Option<PathBuf>,

    /// Directory for exported files and downloads
    #[arg(long, global = true, value_hint = ValueHint::DirPath)]
    pub export_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Line-driven session over every panel (default)
    Session,
    /// Detect the sample's bugs and optionally fix some of them
    Detect {
        /// Bug ids to mark fixed, in order
        #[arg(long = "fix", value_name = "ID")]
        fixes: Vec<u32>,
    },
    /// Run every walkthrough step and print its output
    Walkthrough,
    /// Run commands in the debug console and print the log
    Console {
        /// Commands, one per argument
        #[arg(required = true)]
        commands: Vec<String>,
        /// Also write the log to the export directory
        #[arg(long)]
        export: bool,
    },
    /// List the catalog's lesson content
    Catalog {
        #[arg(long, value_enum, default_value_t = CatalogFormat::Plain)]
        format: CatalogFormat,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum CatalogFormat {
    Plain,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_follow_subcommands() {
        let cli = Cli::parse_from(["dlab-cli", "console", "help", "--instant"]);
        assert!(cli.instant);
        assert!(matches!(cli.command, Some(Commands::Console { ref commands, export: false }) if commands == &["help"]));
    }
}
