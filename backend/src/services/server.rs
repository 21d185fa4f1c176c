use anyhow::Result;
use log::{debug, info};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::api::handlers::AppState;
use crate::api::routes::create_router;
use crate::config::settings::AppConfig;
use crate::database::SqliteRepository;
use crate::services::league::LeagueService;
use crate::store::{Collection, Repository, Write};

pub struct ServerService {
    port: u16,
    config: AppConfig,
}

impl ServerService {
    pub fn new(port: u16, config: AppConfig) -> Self {
        Self { port, config }
    }

    pub async fn run(&self) -> Result<()> {
        let repo = SqliteRepository::open(&self.config.storage.database_path)?;
        log_changes(&repo);

        let league = LeagueService::open(Box::new(repo), self.config.league.clone())?;
        let state = Arc::new(AppState::new(league));

        let app = create_router(state)
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive());

        let addr = SocketAddr::from(([0, 0, 0, 0], self.port));
        info!("Server listening on {}", addr);

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app).await?;

        Ok(())
    }
}

fn log_changes(repo: &dyn Repository) {
    for collection in Collection::ALL {
        repo.subscribe(
            collection,
            Box::new(move |write: &Write| debug!("Stored change in {}: {}", collection, write.key())),
        );
    }
}
