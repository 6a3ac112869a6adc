use std::sync::Arc;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use tokio::sync::Mutex;

use crate::auth::JwtService;
use crate::core::Config;
use crate::db::DbService;
use crate::utils::AppResult;

/// Shared server state, cloned into every handler
///
/// All fields are cheap to clone: the database handle and services are
/// reference-counted internally.
///
/// | Field | Meaning |
/// |-------|---------|
/// | config | Immutable configuration |
/// | db | Embedded database handle |
/// | jwt_service | Token validation |
/// | write_lock | Serializes order settlement writes |
#[derive(Clone, Debug)]
pub struct ServerState {
    /// Server configuration
    pub config: Config,
    /// Embedded database (SurrealDB)
    pub db: Surreal<Db>,
    /// JWT validation service
    pub jwt_service: Arc<JwtService>,
    /// Held across multi-statement settlement transactions so that
    /// concurrent mutations of the same order interleave at statement
    /// boundaries only
    pub write_lock: Arc<Mutex<()>>,
}

impl ServerState {
    pub fn new(config: Config, db: Surreal<Db>, jwt_service: Arc<JwtService>) -> Self {
        Self {
            config,
            db,
            jwt_service,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Open the database, apply the schema, and assemble the state
    pub async fn initialize(config: &Config) -> AppResult<Self> {
        let db_service = DbService::new(&config.db_path).await?;
        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));

        Ok(Self::new(config.clone(), db_service.db, jwt_service))
    }

    pub fn get_db(&self) -> Surreal<Db> {
        self.db.clone()
    }

    pub fn get_jwt_service(&self) -> Arc<JwtService> {
        self.jwt_service.clone()
    }

    pub fn get_write_lock(&self) -> Arc<Mutex<()>> {
        self.write_lock.clone()
    }
}
