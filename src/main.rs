use anyhow::{bail, Context};
use dotenvy::dotenv;
use log::info;

use contacts::core::bootstrap::{table_counts, BootstrapManager};
use contacts::core::config::{ContactsConfig, DEFAULT_CONFIG_FILE};
use contacts::ContactsService;

const USAGE: &str = "\
Usage: contacts [--config <file>] <command>

Commands:
  migrate           Apply pending database migrations
  seed              Insert the default locations that are missing
  status            Show row counts of every contacts table
  upcoming [days]   List special dates in the next days (default 30)

Options:
  --config <file>   Configuration file (default contacts.toml)
  -h, --help        Show this message";

fn open(config: &ContactsConfig) -> anyhow::Result<ContactsService> {
    let service = ContactsService::from_config(config)
        .with_context(|| format!("failed to open {}", config.database.url))?;
    Ok(service)
}

fn main() -> anyhow::Result<()> {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .write_style(env_logger::WriteStyle::Always)
        .init();

    let mut args: Vec<String> = std::env::args().skip(1).collect();
    let config_path = match args.iter().position(|a| a == "--config") {
        Some(idx) => {
            if idx + 1 >= args.len() {
                bail!("--config needs a file path");
            }
            let path = args.remove(idx + 1);
            args.remove(idx);
            path
        }
        None => DEFAULT_CONFIG_FILE.to_string(),
    };

    let Some(command) = args.first().cloned() else {
        println!("{USAGE}");
        return Ok(());
    };
    if command == "--help" || command == "-h" {
        println!("{USAGE}");
        return Ok(());
    }

    let mut config = ContactsConfig::load_from(&config_path)
        .with_context(|| format!("invalid configuration in {config_path}"))?;
    info!("Using database {}", config.database.url);

    match command.as_str() {
        "migrate" => {
            config.database.run_migrations = true;
            open(&config)?;
            println!("Migrations applied to {}", config.database.url);
        }
        "seed" => {
            config.bootstrap.seed_locations = false;
            let service = BootstrapManager::new(config).start()?;
            let added = service.seed_default_locations()?;
            println!("Added {added} default locations");
        }
        "status" => {
            let service = open(&config)?;
            for count in table_counts(&service)? {
                println!("{:<30} {:>8}", count.table, count.rows);
            }
        }
        "upcoming" => {
            let days = match args.get(1) {
                Some(days) => days
                    .parse::<u32>()
                    .with_context(|| format!("invalid number of days: {days}"))?,
                None => 30,
            };
            let service = open(&config)?;
            let today = chrono::Local::now().date_naive();
            for occurrence in service.upcoming_special_dates(today, days)? {
                println!("{}  {}", occurrence.on, occurrence.special_date);
            }
        }
        other => {
            eprintln!("Unknown command: {other}");
            eprintln!("Run 'contacts --help' for usage information");
            bail!("unknown command {other}");
        }
    }
    Ok(())
}
