use clap::Parser;
use log::{error, info};

use svgnotes::{App, Cli, Config, NoteStorage};

pub fn initialize_logger() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .format_module_path(true)
        .init();

    info!("Logger initialized");
}

fn main() {
    initialize_logger();

    let cli = Cli::parse();

    let mut config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    if let Some(notes_dir) = cli.notes_dir {
        config.notes_dir = notes_dir;
    }

    info!("Using notes directory: {}", config.notes_dir.display());

    let storage = NoteStorage::new(config);
    let app = App::new(storage, cli.verbose);

    if let Err(e) = app.run(cli.command) {
        error!("Command failed: {}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
