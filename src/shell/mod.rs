// Composition root.
//
// Responsibilities
// - Read config from environment.
// - Instantiate concrete infrastructure implementations.
// - Wire implementations into the services and serve the router.

pub mod config;
pub mod http;
pub mod state;

use std::sync::Arc;

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use tracing::info;

use crate::modules::tasks::adapters::postgres::PostgresTaskStore;
use crate::modules::tasks::service::TaskService;
use crate::modules::users::adapters::people_api::PeopleApiClient;
use crate::modules::users::adapters::postgres::PostgresUserStore;
use crate::modules::users::service::UserService;
use crate::shell::config::Config;
use crate::shell::state::AppState;

pub async fn run() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await
        .context("failed to connect to database")?;
    info!("connected to PostgreSQL");

    if config.run_migrations {
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("failed to run migrations")?;
        info!("migrations applied");
    }

    let task_store = Arc::new(PostgresTaskStore::new(pool.clone()));
    let user_store = Arc::new(PostgresUserStore::new(pool));
    let people = Arc::new(PeopleApiClient::new(config.people_api_url.clone()));

    let state = AppState {
        tasks: Arc::new(TaskService::new(task_store.clone(), task_store)),
        users: Arc::new(UserService::new(user_store, people)),
    };

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;
    info!(addr = %config.bind_addr, "serving");
    axum::serve(listener, http::router(state))
        .await
        .context("server stopped")?;
    Ok(())
}
