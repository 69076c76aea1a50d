//! Tracity: data API with query-intent resolution and generated insights.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

mod import;
mod routes;
mod state;

use state::AppState;
use tracity_insight::{build_generator, LlmConfig};
use tracity_store::{DocumentStore, SqliteStore};

fn resolve_data_dir() -> PathBuf {
    std::env::var("TRACITY_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let exe_dir = std::env::current_exe()
                .ok()
                .and_then(|p| p.parent().map(|p| p.to_path_buf()));
            if let Some(dir) = exe_dir {
                let parent_data = dir.join("../data");
                if parent_data.exists() {
                    return parent_data;
                }
            }
            PathBuf::from("data")
        })
}

fn open_store(path: &Path) -> anyhow::Result<SqliteStore> {
    SqliteStore::open(path).map_err(|e| anyhow::anyhow!("Failed to open store: {}", e))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() > 1 {
        match args[1].as_str() {
            "import" => {
                if args.len() < 4 {
                    eprintln!("Usage: tracity import <collection> <file.json>");
                    std::process::exit(1);
                }
                let config = tracity_core::TracityConfig::from_env(resolve_data_dir())?;
                let store = open_store(&config.data_paths.database)?;
                let stored = import::run(&store, &args[2], Path::new(&args[3])).await?;
                println!("Imported {} records into {}", stored, args[2]);
                return Ok(());
            }
            "--help" | "-h" | "help" => {
                println!("Tracity: data API with AI insights");
                println!();
                println!("Usage: tracity [command]");
                println!();
                println!("Commands:");
                println!("  (none)                         Start the server");
                println!("  import <collection> <file>     Load a JSON array of records");
                println!("  help                           Show this help message");
                return Ok(());
            }
            _ => {
                eprintln!("Unknown command: {}. Use 'tracity help' for usage.", args[1]);
                std::process::exit(1);
            }
        }
    }

    let data_dir = resolve_data_dir();
    info!("Data directory: {}", data_dir.display());

    let config = tracity_core::TracityConfig::from_env(&data_dir)?;

    let store: Arc<dyn DocumentStore> = Arc::new(open_store(&config.data_paths.database)?);
    let llm_config = LlmConfig::load(&config.data_paths.llm_config_file);
    let generator = build_generator(&llm_config);

    let state = Arc::new(AppState::new(config, store, generator));
    let addr = format!("0.0.0.0:{}", state.config.port);
    let app = routes::build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Tracity server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
