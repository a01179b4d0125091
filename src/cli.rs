use clap::Parser;
use std::path::PathBuf;

/// Tasks, topics and notes in the terminal
#[derive(Debug, Parser)]
#[command(name = "tuido", version, about)]
pub struct Cli {
    /// Folder with config.yaml, tasks.json, topics.json and notes.md
    #[arg(short, long, value_name = "DIR")]
    pub data_folder: Option<PathBuf>,

    /// Log debug messages to tuido.log
    #[arg(short, long)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_data_folder() {
        let cli = Cli::parse_from(["tuido", "--data-folder", "/tmp/todo", "-v"]);
        assert_eq!(cli.data_folder, Some(PathBuf::from("/tmp/todo")));
        assert!(cli.verbose);

        let cli = Cli::parse_from(["tuido"]);
        assert_eq!(cli.data_folder, None);
        assert!(!cli.verbose);
    }
}
