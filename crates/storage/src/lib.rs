pub mod db;

pub use db::{create_db, create_db_in_memory, DbPool, SqliteLeadStore};
