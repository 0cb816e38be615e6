//! Application Startup
//!
//! Store selection, state wiring and server initialization.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{middleware, Router};
use sqlx::PgPool;
use tokio::net::TcpListener;

use crate::application::services::{
    AuthService, AuthServiceImpl, CategoryService, CategoryServiceImpl,
    ChatRoomParticipantService, ChatRoomParticipantServiceImpl, ChatRoomService,
    ChatRoomServiceImpl, HostService, HostServiceImpl, UserService, UserServiceImpl,
};
use crate::config::{Settings, StorageBackend};
use crate::infrastructure::database::{self, PgUnitOfWork, UnitOfWork};
use crate::infrastructure::memory::MemoryUnitOfWork;
use crate::presentation::http::{handlers, routes};
use crate::presentation::middleware::{cors, logging};
use crate::shared::snowflake::SnowflakeGenerator;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub uow: Arc<dyn UnitOfWork>,
    /// Set when running on PostgreSQL
    pub db: Option<PgPool>,
    pub auth_service: Arc<dyn AuthService>,
    pub user_service: Arc<dyn UserService>,
    pub category_service: Arc<dyn CategoryService>,
    pub chat_room_service: Arc<dyn ChatRoomService>,
    pub participant_service: Arc<dyn ChatRoomParticipantService>,
    pub host_service: Arc<dyn HostService>,
}

impl AppState {
    /// Wire every service over one unit of work
    pub fn new(settings: Settings, uow: Arc<dyn UnitOfWork>, db: Option<PgPool>) -> Self {
        let snowflake = Arc::new(SnowflakeGenerator::new(
            u64::from(settings.snowflake.machine_id),
            settings.snowflake.epoch,
        ));

        let participants = Arc::new(ChatRoomParticipantServiceImpl::new(
            uow.clone(),
            snowflake.clone(),
        ));
        let chat_rooms = ChatRoomServiceImpl::new(uow.clone(), participants.clone(), snowflake.clone());

        Self {
            auth_service: Arc::new(AuthServiceImpl::new(uow.clone(), settings.jwt.clone())),
            user_service: Arc::new(UserServiceImpl::new(uow.clone(), snowflake.clone())),
            category_service: Arc::new(CategoryServiceImpl::new(uow.clone())),
            chat_room_service: Arc::new(chat_rooms),
            participant_service: participants,
            host_service: Arc::new(HostServiceImpl::new(uow.clone(), snowflake)),
            settings: Arc::new(settings),
            uow,
            db,
        }
    }
}

/// Build the full router with middleware applied
pub fn build_router(state: AppState) -> Router {
    let cors = cors::create_cors_layer(&state.settings.cors);

    let router = routes::create_router(state)
        .layer(middleware::from_fn(logging::track_http_metrics));

    logging::add_tracing(router).layer(cors)
}

/// Open the configured store
async fn open_store(settings: &Settings) -> Result<(Arc<dyn UnitOfWork>, Option<PgPool>)> {
    match settings.database.backend {
        StorageBackend::Postgres => {
            let pool = database::create_pool(&settings.database)
                .await
                .context("failed to connect to PostgreSQL")?;
            tracing::info!("Database connection pool created");

            if settings.database.run_migrations {
                database::run_migrations(&pool)
                    .await
                    .context("failed to run migrations")?;
                tracing::info!("Database migrations applied");
            }

            Ok((Arc::new(PgUnitOfWork::new(pool.clone())), Some(pool)))
        }
        StorageBackend::Memory => {
            tracing::warn!(
                "Using the in-memory store (tests and local development only); data is lost on shutdown"
            );
            Ok((Arc::new(MemoryUnitOfWork::new()), None))
        }
    }
}

/// Application instance
pub struct Application {
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Build the application from settings
    pub async fn build(settings: Settings) -> Result<Self> {
        handlers::health::init_server_start();

        let (uow, db) = open_store(&settings).await?;
        let addr = settings.server_addr();

        let router = build_router(AppState::new(settings, uow, db));

        let listener = TcpListener::bind(&addr)
            .await
            .with_context(|| format!("failed to bind {}", addr))?;
        tracing::info!("Listening on {}", addr);

        Ok(Self { listener, router })
    }

    /// Run the server until ctrl-c
    pub async fn run_until_stopped(self) -> Result<()> {
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        Ok(())
    }

    /// Get the bound address
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        return;
    }
    tracing::info!("Shutdown signal received");
}
