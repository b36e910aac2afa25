use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Script Deck - browse, preview and run course-project scripts
#[derive(Parser, Debug)]
#[command(name = "scriptdeck")]
#[command(about = "A terminal navigator for course-project scripts")]
#[command(version)]
pub struct Cli {
    /// Directory holding the configuration, state and event log.
    ///
    /// Defaults to the directory containing the executable.
    #[arg(long, global = true, env = "SCRIPTDECK_HOME")]
    pub home: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// List the configured units
    Units,
    /// List the folders of a unit
    Folders {
        /// Unit key (e.g. 1)
        unit: String,
    },
    /// List the scripts of a folder inside a unit
    Scripts {
        /// Unit key
        unit: String,
        /// Folder name inside the unit
        folder: String,
    },
    /// Search a unit for scripts whose name contains QUERY
    Search {
        /// Unit key
        unit: String,
        /// Case-insensitive part of the file name
        query: String,
    },
    /// List recently run scripts, most recent first
    Recent,
    /// List favorite scripts
    Favorites,
    /// Toggle the favorite mark of a script
    Favorite {
        path: PathBuf,
    },
    /// Run a script with the configured interpreter
    Run {
        path: PathBuf,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
        /// Do not ask for arguments
        #[arg(long)]
        no_args: bool,
        /// Arguments passed to the script (skips the argument prompt)
        #[arg(last = true)]
        args: Vec<String>,
    },
    /// Print the text of a script
    Preview {
        path: PathBuf,
        /// Print every line, ignoring the preview limit
        #[arg(long)]
        all: bool,
    },
    /// Open a script in the configured editor
    Edit {
        path: PathBuf,
    },
    /// Open the folder containing a path in the file manager
    Reveal {
        path: PathBuf,
    },
    /// Print the effective configuration
    Config {
        /// Print only the location of the configuration document
        #[arg(long)]
        path: bool,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        <Self as clap::Parser>::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_no_args() {
        // No subcommand starts the navigator
        let cli = Cli::try_parse_from(["scriptdeck"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_cli_home_is_global() {
        let cli = Cli::try_parse_from(["scriptdeck", "recent", "--home", "/tmp/deck"]).unwrap();
        assert_eq!(cli.home, Some(PathBuf::from("/tmp/deck")));
        assert_eq!(cli.command, Some(Commands::Recent));
    }

    #[test]
    fn test_cli_run_with_trailing_args() {
        let cli = Cli::try_parse_from([
            "scriptdeck",
            "run",
            "--yes",
            "u1/a.py",
            "--",
            "--flag",
            "two words",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Run {
                path,
                yes,
                no_args,
                args,
            }) => {
                assert_eq!(path, PathBuf::from("u1/a.py"));
                assert!(yes);
                assert!(!no_args);
                assert_eq!(args, vec!["--flag".to_string(), "two words".to_string()]);
            }
            other => panic!("Expected Run command, got {other:?}"),
        }
    }

    #[test]
    fn test_cli_scripts_requires_folder() {
        assert!(Cli::try_parse_from(["scriptdeck", "scripts", "1"]).is_err());
        let cli = Cli::try_parse_from(["scriptdeck", "scripts", "1", "lab1"]).unwrap();
        assert_eq!(
            cli.command,
            Some(Commands::Scripts {
                unit: "1".to_string(),
                folder: "lab1".to_string()
            })
        );
    }

    #[test]
    fn test_cli_config_path_flag() {
        let cli = Cli::try_parse_from(["scriptdeck", "config", "--path"]).unwrap();
        assert_eq!(cli.command, Some(Commands::Config { path: true }));
    }
}
