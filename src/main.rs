mod ai;
mod api;
mod config;
mod db;
mod error;
mod models;
mod secrets;
mod services;
mod sync;
mod text;

use config::Config;
use db::{RecordStore, Tables};
use error::Result;

const SERVICES: [&str; 3] = ["github", "medium", "youtube"];

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging (info and up by default)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    let config = Config::from_env()?;

    match (args.get(1).map(String::as_str), args.get(2)) {
        (Some("--sync"), Some(service)) if service == "all" => {
            let mut failed = false;
            for service in SERVICES {
                // jobs are independent: one failure doesn't stop the others
                if let Err(e) = sync::run_service(service, &config).await {
                    tracing::error!("{} sync failed: {}", service, e);
                    failed = true;
                }
            }
            if failed {
                std::process::exit(1);
            }
        }
        (Some("--sync"), Some(service)) if SERVICES.contains(&service.as_str()) => {
            sync::run_service(service, &config).await?;
        }
        (Some("--query"), Some(path)) => {
            let store = RecordStore::open(&config.db_path, Tables::from_config(&config)).await?;
            let (route_key, params) = api::route_request("GET", path);
            let response = api::handle_request(&store, &route_key, &params).await;
            println!("{}", response.body);
            if response.status_code >= 400 {
                std::process::exit(1);
            }
        }
        _ => {
            eprintln!("Usage: portfolio-sync --sync <github|medium|youtube|all>");
            eprintln!("       portfolio-sync --query <path>    e.g. --query /api/repos");
            std::process::exit(2);
        }
    }

    Ok(())
}
