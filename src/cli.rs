use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "hexguide")]
#[command(version = "0.1.0")]
#[command(about = "Draft and collection guidance from the Hex API event feed", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Config directory
    #[arg(short, long, default_value = "config", env = "HEXGUIDE_CONFIG_DIR")]
    pub config: PathBuf,

    /// Price feed file or URL (overrides sources.prices)
    #[arg(long)]
    pub prices: Option<String>,

    /// Collection cache path (overrides sources.collection_cache)
    #[arg(long)]
    pub collection: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Watch the API data file and print guidance for every new message
    Watch {
        /// API data file (overrides sources.api_data)
        #[arg(long)]
        api_data: Option<PathBuf>,
    },
    /// Print the price table
    Prices,
    /// Print owned cards
    Collection,
    /// Dispatch one event message and print its guidance
    Dispatch {
        /// Raw JSON message, e.g. '["Logout","Dylan"]'
        message: String,
    },
    /// Rewrite the collection cache, optionally to another file
    Save {
        /// Target file (defaults to the configured cache)
        target: Option<PathBuf>,
    },
}

impl Cli {
    /// `watch` when no subcommand was given
    pub fn command_or_default(&self) -> Commands {
        self.command
            .clone()
            .unwrap_or(Commands::Watch { api_data: None })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_command_is_watch() {
        let cli = Cli::try_parse_from(["hexguide"]).unwrap();
        assert_eq!(cli.command_or_default(), Commands::Watch { api_data: None });
        assert_eq!(cli.config, PathBuf::from("config"));
    }

    #[test]
    fn test_dispatch_and_overrides() {
        let cli = Cli::try_parse_from([
            "hexguide",
            "--prices",
            "prices.txt",
            "--collection",
            "/tmp/collection.cache",
            "dispatch",
            r#"["Logout","Dylan"]"#,
        ])
        .unwrap();

        assert_eq!(cli.prices.as_deref(), Some("prices.txt"));
        assert_eq!(cli.collection, Some(PathBuf::from("/tmp/collection.cache")));
        assert_eq!(
            cli.command_or_default(),
            Commands::Dispatch {
                message: r#"["Logout","Dylan"]"#.to_string()
            }
        );
    }

    #[test]
    fn test_save_with_target() {
        let cli = Cli::try_parse_from(["hexguide", "save", "backup.cache"]).unwrap();
        assert_eq!(
            cli.command,
            Some(Commands::Save {
                target: Some(PathBuf::from("backup.cache"))
            })
        );
    }
}
