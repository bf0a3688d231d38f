use anyhow::{bail, Context, Result};
use funil_import::ImportOptions;
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Persist batches to the SQLite store.
    Online,
    /// Render batches as SQL script files.
    Export,
}

/// Run configuration, read from `FUNIL_*` environment variables.
/// The command surface is a no-flag script invocation.
#[derive(Debug)]
pub struct Config {
    pub owner_id: String,
    pub input: PathBuf,
    pub mode: Mode,
    pub batch_size: usize,
    pub year: i32,
    pub db_path: PathBuf,
    pub out_dir: PathBuf,
    /// Resume cursor for export mode, where there is no store to ask.
    pub already_persisted: usize,
}

const DEFAULT_BATCH_SIZE: usize = 50;
const DEFAULT_YEAR: i32 = 2023;

impl Config {
    pub fn from_env() -> Result<Self> {
        let owner_id = env::var("FUNIL_OWNER_ID").context("FUNIL_OWNER_ID is required")?;
        let input: PathBuf = env::var("FUNIL_INPUT")
            .context("FUNIL_INPUT is required (path to the source CSV)")?
            .into();

        let mode = match env::var("FUNIL_MODE").as_deref() {
            Ok("online") | Err(_) => Mode::Online,
            Ok("export") => Mode::Export,
            Ok(other) => bail!("FUNIL_MODE must be 'online' or 'export', got '{other}'"),
        };

        let batch_size = env_parse("FUNIL_BATCH_SIZE", DEFAULT_BATCH_SIZE)?;
        if batch_size == 0 {
            bail!("FUNIL_BATCH_SIZE must be at least 1");
        }
        let year = env_parse("FUNIL_YEAR", DEFAULT_YEAR)?;
        let already_persisted = env_parse("FUNIL_ALREADY_PERSISTED", 0)?;

        let db_path = match env::var("FUNIL_DB") {
            Ok(path) => PathBuf::from(path),
            Err(_) => default_db_path()?,
        };
        let out_dir = env::var("FUNIL_OUT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("sql-out"));

        Ok(Config {
            owner_id,
            input,
            mode,
            batch_size,
            year,
            db_path,
            out_dir,
            already_persisted,
        })
    }

    pub fn import_options(&self) -> ImportOptions {
        ImportOptions {
            owner_id: self.owner_id.clone(),
            batch_size: self.batch_size,
            year: self.year,
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw.parse().with_context(|| format!("invalid {key}: '{raw}'")),
        Err(_) => Ok(default),
    }
}

fn default_db_path() -> Result<PathBuf> {
    let dirs = directories::ProjectDirs::from("com", "funil", "Funil")
        .context("could not resolve an application data directory; set FUNIL_DB")?;
    Ok(dirs.data_dir().join("leads.db"))
}
