use std::sync::Arc;

use anyhow::{Context, Result};
use sqlx::MySqlPool;
use tracing::{info, warn};

use crate::auth::password::hash_password;
use crate::config::Config;
use crate::model::user::UserCredentials;
use crate::store::{Store, memory::MemoryStore, mysql::MySqlStore};

pub async fn init_db(database_url: &str) -> Result<MySqlPool> {
    MySqlPool::connect(database_url)
        .await
        .context("Failed to connect to database")
}

/// MySQL when `DATABASE_URL` is set, otherwise an in-memory store seeded from `DEV_USERS`.
pub async fn init_store(config: &Config) -> Result<Arc<dyn Store>> {
    if let Some(url) = &config.database_url {
        let pool = init_db(url).await?;
        info!("Using MySQL store");
        return Ok(Arc::new(MySqlStore::new(pool)));
    }

    warn!(
        users = config.dev_users.len(),
        "DATABASE_URL not set, using in-memory store"
    );

    let users = config
        .dev_users
        .iter()
        .enumerate()
        .map(|(i, u)| {
            Ok(UserCredentials {
                id: i as u64 + 1,
                username: u.username.clone(),
                password: hash_password(&u.password)
                    .map_err(|e| anyhow::anyhow!("failed to hash password for {}: {e}", u.username))?,
                is_manager: u.is_manager,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Arc::new(MemoryStore::with_users(users)))
}
