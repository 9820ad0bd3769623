use std::io::{self, BufRead, Write};

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::config_io::{self, Settings};
use crate::io::file_storage::FileStorage;
use crate::io::storage::Storage;
use crate::logging;
use crate::ops::filter;
use crate::ops::list_store::{ListError, ListStore, storage_key};

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

/// Resolve config file values and command-line overrides.
pub fn load_settings(cli: &Cli) -> Result<Settings, Box<dyn std::error::Error>> {
    let settings = config_io::resolve_settings(
        config_io::config_path(),
        cli.namespace.clone(),
        cli.data_dir.clone(),
    )?;
    Ok(settings)
}

/// Start logging and run the TUI (no subcommand) or one command.
pub fn dispatch(cli: Cli, settings: Settings) -> Result<(), Box<dyn std::error::Error>> {
    let json = cli.json;

    let Some(cmd) = cli.command else {
        // The TUI owns the terminal, so its logs go to a file
        logging::init_file(&settings.data_dir);
        return crate::tui::run(settings);
    };

    logging::init_stderr();
    match cmd {
        Commands::List(args) => cmd_list(&settings, args, json),
        Commands::Add(args) => cmd_add(&settings, args, json),
        Commands::Edit(args) => cmd_edit(&settings, args, json),
        Commands::Rm(args) => cmd_rm(&settings, args, json),
        Commands::Clear => cmd_clear(&settings),
        Commands::Record => cmd_record(&settings, json),
        Commands::Config(args) => cmd_config(&settings, args, json),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Open the file-backed store for the configured namespace.
pub fn open_store(settings: &Settings) -> Result<ListStore<FileStorage>, Box<dyn std::error::Error>> {
    let storage = FileStorage::open(&settings.data_dir)?;
    // Reject namespaces that cannot name a file before touching anything
    storage.path_for(&storage_key(&settings.namespace))?;
    Ok(ListStore::open(storage, &settings.namespace))
}

/// Open the store with the data directory locked until it is dropped, so
/// a whole write command runs against one consistent list.
pub fn open_store_locked(
    settings: &Settings,
) -> Result<ListStore<FileStorage>, Box<dyn std::error::Error>> {
    let mut storage = FileStorage::open(&settings.data_dir)?;
    storage.path_for(&storage_key(&settings.namespace))?;
    storage.lock()?;
    Ok(ListStore::open(storage, &settings.namespace))
}

/// Convert a 1-based position from the command line to an index.
fn position_to_index(position: usize) -> Result<usize, Box<dyn std::error::Error>> {
    position
        .checked_sub(1)
        .ok_or_else(|| "positions start at 1".into())
}

/// Ask on stderr, read the answer from stdin. Only "y"/"yes" confirms.
fn confirm(prompt: &str) -> io::Result<bool> {
    let mut stderr = io::stderr();
    write!(stderr, "{} [y/N] ", prompt)?;
    stderr.flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    let answer = answer.trim().to_lowercase();
    Ok(answer == "y" || answer == "yes")
}

// ---------------------------------------------------------------------------
// Read command handlers
// ---------------------------------------------------------------------------

fn cmd_list(
    settings: &Settings,
    args: ListArgs,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let store = open_store(settings)?;
    let filter_text = args.filter.unwrap_or_default();
    let visible = filter::visible_indices(store.items(), &filter_text);

    if json {
        let items: Vec<ItemJson> = visible
            .iter()
            .filter_map(|&i| store.get(i).map(|item| item_to_json(i, item)))
            .collect();
        println!("{}", serde_json::to_string_pretty(&items)?);
        return Ok(());
    }

    if store.is_empty() {
        println!("(no items)");
        return Ok(());
    }
    for i in visible {
        if let Some(item) = store.get(i) {
            println!("{}", format_item_line(i, item));
        }
    }
    Ok(())
}

fn cmd_record(settings: &Settings, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let storage = FileStorage::open(&settings.data_dir)?;
    let key = storage_key(&settings.namespace);
    let value = storage.get_item(&key)?;

    if json {
        // Raw value when it parses as JSON at all, otherwise as a string
        let out = match &value {
            Some(v) => serde_json::from_str(v).unwrap_or_else(|_| serde_json::Value::String(v.clone())),
            None => serde_json::Value::Null,
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    match value {
        Some(v) => println!("{}", v),
        None => println!("(no record)"),
    }
    Ok(())
}

fn cmd_config(
    settings: &Settings,
    args: ConfigCmd,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    match args.action {
        ConfigAction::Show => {
            let out = ConfigJson {
                config_path: settings.config_path.display().to_string(),
                namespace: settings.namespace.clone(),
                key: storage_key(&settings.namespace),
                data_dir: settings.data_dir.display().to_string(),
                show_key_hints: settings.ui.show_key_hints,
            };
            if json {
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                println!("config:    {}", out.config_path);
                println!("namespace: {}", out.namespace);
                println!("key:       {}", out.key);
                println!("data dir:  {}", out.data_dir);
            }
            Ok(())
        }
        ConfigAction::SetNamespace { namespace } => {
            let namespace = namespace.trim();
            if namespace.is_empty() {
                return Err("namespace cannot be empty".into());
            }
            // Same key rules as the file-backed store
            FileStorage::open(&settings.data_dir)?.path_for(&storage_key(namespace))?;
            let mut doc = config_io::read_config_doc(&settings.config_path)?;
            config_io::set_namespace(&mut doc, namespace);
            config_io::write_config_doc(&settings.config_path, &doc)?;
            tracing::info!(namespace, path = %settings.config_path.display(), "namespace updated");
            println!("namespace set to {}", namespace);
            Ok(())
        }
    }
}

// ---------------------------------------------------------------------------
// Write command handlers
// ---------------------------------------------------------------------------

fn cmd_add(settings: &Settings, args: AddArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = open_store_locked(settings)?;
    let item = store.add(&args.text.join(" "))?;
    let index = store.len() - 1;
    if json {
        println!("{}", serde_json::to_string(&item_to_json(index, &item))?);
    } else {
        println!("{}", format_item_line(index, &item));
    }
    Ok(())
}

fn cmd_edit(
    settings: &Settings,
    args: EditArgs,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let index = position_to_index(args.position)?;
    let mut store = open_store_locked(settings)?;
    let item = store.rename(index, &args.text.join(" "))?;
    if json {
        println!("{}", serde_json::to_string(&item_to_json(index, &item))?);
    } else {
        println!("{}", format_item_line(index, &item));
    }
    Ok(())
}

fn cmd_rm(settings: &Settings, args: RmArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let index = position_to_index(args.position)?;
    let mut store = open_store(settings)?;
    let Some(item) = store.get(index).cloned() else {
        return Err(ListError::NotFound(index).into());
    };

    if !args.yes && !confirm(&format!("Remove \"{}\"? Are you sure?", item))? {
        eprintln!("cancelled");
        return Ok(());
    }

    // Not locked across the prompt; the item must still be at `index`
    let removed = store.remove_checked(index, &item)?;
    if json {
        println!("{}", serde_json::to_string(&item_to_json(index, &removed))?);
    } else {
        println!("removed {}", removed);
    }
    Ok(())
}

fn cmd_clear(settings: &Settings) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = open_store_locked(settings)?;
    let count = store.len();
    store.clear()?;
    println!(
        "cleared {} item{}",
        count,
        if count == 1 { "" } else { "s" }
    );
    Ok(())
}
