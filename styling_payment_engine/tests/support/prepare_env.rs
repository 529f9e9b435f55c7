use std::path::PathBuf;

use log::*;
use styling_payment_engine::SqliteDatabase;

pub fn random_db_path() -> String {
    let path = std::env::temp_dir().join(format!("spe_test_store_{}.db", rand::random::<u64>()));
    format!("sqlite://{}", path.display())
}

pub fn random_fallback_path() -> PathBuf {
    std::env::temp_dir().join(format!("spe_test_fallback_{}.jsonl", rand::random::<u64>()))
}

/// Creates a fresh database with the full schema.
pub async fn prepare_test_env(url: &str) -> SqliteDatabase {
    dotenvy::from_filename(".env.test").ok();
    let _ = env_logger::try_init();
    debug!("🚀️ Logging initialised");
    let db = SqliteDatabase::new_with_url(url, 5).await.expect("Error creating connection to database");
    db.run_migrations().await.expect("Error running DB migrations");
    info!("🚀️ Test database ready at {url}");
    db
}
