use crate::config::Config;
use crate::db::{Connection, ConnectionType};
use diesel::r2d2::{ConnectionManager, Pool, PoolError};
use diesel::PgConnection;
use std::cell::RefCell;
use std::rc::Rc;

type R2D2Pool = Pool<ConnectionManager<PgConnection>>;

#[derive(Clone)]
pub struct Database {
    connection_pool: R2D2Pool,
}

impl Database {
    pub fn from_config(config: &Config) -> Database {
        Database {
            connection_pool: create_connection_pool(config),
        }
    }

    pub fn get_connection(&self) -> Result<Connection, PoolError> {
        let connection = self.connection_pool.get()?;
        Ok(ConnectionType::R2D2(Rc::new(RefCell::new(connection))).into())
    }
}

fn create_connection_pool(config: &Config) -> R2D2Pool {
    let connection_manager = ConnectionManager::new(config.database_url.clone());

    Pool::builder()
        .min_idle(Some(1))
        .max_size(config.database_pool_size)
        .build(connection_manager)
        .expect("Failed to create connection pool.")
}
