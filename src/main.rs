mod classifier;
mod config;
mod constants;
mod domain;
mod logging;
mod models;
mod policy;
mod preprocess;
mod routes;
mod services;

use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;

use classifier::VitClassifier;
use config::Config;
use services::history::{HistoryStore, MemoryHistoryStore, PgHistoryStore};
use services::model::ModelProvider;

/// Shared service context handed to every request
pub struct AppState {
    pub model: Arc<ModelProvider>,
    pub history: Arc<dyn HistoryStore>,
}

#[tokio::main]
async fn main() {
    logging::init();
    let config = Config::from_env();

    let history: Arc<dyn HistoryStore> = match &config.database_url {
        Some(database_url) => {
            let pool = PgPoolOptions::new()
                .max_connections(config.db_max_connections)
                .connect(database_url)
                .await
                .expect("Failed to connect to database");

            let store = PgHistoryStore::new(pool)
                .await
                .expect("Failed to prepare predictions table");
            log::info!("Storing predictions in Postgres");
            Arc::new(store)
        }
        None => {
            log::warn!("DATABASE_URL not set, predictions are kept in memory only");
            Arc::new(MemoryHistoryStore::new())
        }
    };

    // Load in the background; requests get "not ready" until it is published
    let model = Arc::new(ModelProvider::new());
    match config.model_source.clone() {
        Some(source) => {
            let model = model.clone();
            tokio::spawn(async move {
                model.load(move || VitClassifier::load(&source)).await;
            });
        }
        None => log::error!("Failed to load model: set MODEL_DIR or MODEL_REPO"),
    }

    let state = Arc::new(AppState { model, history });
    let app = routes::build_app(state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .unwrap_or_else(|e| panic!("Failed to bind to {}: {}", addr, e));

    log::info!("Listening on http://{}", addr);
    axum::serve(listener, app).await.expect("Server failed");
}
