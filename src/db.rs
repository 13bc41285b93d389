use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool};

pub type DbPool = Pool<ConnectionManager<PgConnection>>;

/// The database is provisioned for a small, fixed number of connections.
const MAX_CONNECTIONS: u32 = 5;

pub fn create_pool(database_url: &str) -> DbPool {
    let manager = ConnectionManager::<PgConnection>::new(database_url);
    Pool::builder()
        .max_size(MAX_CONNECTIONS)
        .build(manager)
        .expect("Failed to create database connection pool")
}
