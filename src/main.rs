use std::{sync::Arc, time::Duration};

use recipe_api::{
    handle_rejection, routes, Config, DB_CONNECT_ATTEMPTS, DB_CONNECT_INTERVAL_SECONDS,
};
use sqlx::{postgres::PgPoolOptions, Executor, Pool, Postgres};
use warp::Filter;

const SCHEMA: &str = include_str!("../migrations/0001_initial.sql");

#[tokio::main]
async fn main() {
    env_logger::init();

    let config = Config::load();
    let pool = wait_for_db(&config.database_url).await;

    pool.execute(SCHEMA)
        .await
        .expect("Failed to apply database schema");

    let port = config.port;
    let api = routes(pool, Arc::new(config)).recover(handle_rejection);

    log::info!("Listening on 0.0.0.0:{port}");
    warp::serve(api).run(([0, 0, 0, 0], port)).await;
}

/// Blocks until the database accepts connections, retrying on a fixed
/// interval for a bounded number of attempts.
async fn wait_for_db(url: &str) -> Pool<Postgres> {
    let mut attempts = DB_CONNECT_ATTEMPTS;

    loop {
        match PgPoolOptions::new().max_connections(5).connect(url).await {
            Ok(pool) => return pool,
            Err(e) => {
                attempts -= 1;
                if attempts == 0 {
                    log::error!("Database unavailable: {e}");
                    std::process::exit(1);
                }

                log::info!("Waiting for database...");
                tokio::time::sleep(Duration::from_secs(DB_CONNECT_INTERVAL_SECONDS)).await;
            }
        }
    }
}
