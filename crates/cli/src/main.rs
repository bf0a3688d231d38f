use anyhow::{Context, Result};
use funil_import::{export, ImportDriver};
use funil_storage::SqliteLeadStore;
use tracing::info;

mod config;

use config::{Config, Mode};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let config = Config::from_env()?;
    let text = std::fs::read_to_string(&config.input)
        .with_context(|| format!("reading {}", config.input.display()))?;

    match config.mode {
        Mode::Online => run_online(&config, &text).await,
        Mode::Export => run_export(&config, &text),
    }
}

async fn run_online(config: &Config, text: &str) -> Result<()> {
    if let Some(parent) = config.db_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    let pool = funil_storage::create_db(&config.db_path)
        .await
        .with_context(|| format!("opening database {}", config.db_path.display()))?;

    let driver = ImportDriver::new(SqliteLeadStore::new(pool), config.import_options());
    let report = driver.import(text).await?;

    println!("{}", serde_json::to_string_pretty(&report)?);
    if report.failure.is_some() {
        std::process::exit(1);
    }
    Ok(())
}

fn run_export(config: &Config, text: &str) -> Result<()> {
    let report = export(text, &config.import_options(), config.already_persisted)?;

    std::fs::create_dir_all(&config.out_dir)
        .with_context(|| format!("creating {}", config.out_dir.display()))?;
    for script in &report.scripts {
        let path = config.out_dir.join(format!("batch_{:03}.sql", script.batch));
        std::fs::write(&path, &script.sql)
            .with_context(|| format!("writing {}", path.display()))?;
        info!("wrote {}", path.display());
    }
    let verify_path = config.out_dir.join("verify.sql");
    std::fs::write(&verify_path, &report.verification)
        .with_context(|| format!("writing {}", verify_path.display()))?;
    info!("wrote {}", verify_path.display());

    let summary = serde_json::json!({
        "total_rows": report.total_rows,
        "scripts": report.scripts.len(),
        "stats": report.stats,
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
