use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "shop", about = concat!("shop v", env!("CARGO_PKG_VERSION"), " - a shopping list that remembers"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Storage namespace (default: from config, else "myShoppingListApp")
    #[arg(long, global = true)]
    pub namespace: Option<String>,

    /// Directory holding stored lists
    #[arg(short = 'D', long = "data-dir", global = true)]
    pub data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List items
    List(ListArgs),
    /// Add an item
    Add(AddArgs),
    /// Rename an item in place
    Edit(EditArgs),
    /// Remove an item
    Rm(RmArgs),
    /// Remove every item and erase the stored list
    Clear,
    /// Print the stored record as-is
    Record,
    /// View or edit the config file
    Config(ConfigCmd),
}

#[derive(Args)]
pub struct ListArgs {
    /// Only show items containing this text
    #[arg(long, short)]
    pub filter: Option<String>,
}

#[derive(Args)]
pub struct AddArgs {
    /// Item text (words are joined with spaces)
    #[arg(required = true, num_args = 1..)]
    pub text: Vec<String>,
}

#[derive(Args)]
pub struct EditArgs {
    /// Position of the item (1-based, as shown by `list`)
    pub position: usize,
    /// New item text (words are joined with spaces)
    #[arg(required = true, num_args = 1..)]
    pub text: Vec<String>,
}

#[derive(Args)]
pub struct RmArgs {
    /// Position of the item (1-based, as shown by `list`)
    pub position: usize,
    /// Skip the confirmation prompt
    #[arg(long, short)]
    pub yes: bool,
}

#[derive(Args)]
pub struct ConfigCmd {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show the effective configuration
    Show,
    /// Set the default storage namespace
    SetNamespace {
        /// New namespace
        namespace: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn add_joins_words() {
        let cli = Cli::parse_from(["shop", "add", "almond", "milk"]);
        match cli.command {
            Some(Commands::Add(args)) => assert_eq!(args.text.join(" "), "almond milk"),
            _ => panic!("expected add"),
        }
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::parse_from(["shop", "list", "--json", "--namespace", "party"]);
        assert!(cli.json);
        assert_eq!(cli.namespace.as_deref(), Some("party"));
    }

    #[test]
    fn no_subcommand_means_tui() {
        let cli = Cli::parse_from(["shop"]);
        assert!(cli.command.is_none());
    }
}
