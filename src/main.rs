use clap::Parser;
use shoplist::cli::commands::Cli;
use shoplist::cli::handlers;

fn main() {
    let cli = Cli::parse();

    let result = handlers::load_settings(&cli).and_then(|settings| handlers::dispatch(cli, settings));

    if let Err(e) = result {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
