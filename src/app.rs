//! Application bootstrap: owns the database handle and the module registry
//! from startup until shutdown.

use std::future::Future;

use anyhow::Context;
use axum::Router;
use shelf_db::Database;
use shelf_kernel::{settings::Settings, InitCtx, ModuleRegistry};

use crate::modules;

/// A fully bootstrapped service: tables created, modules initialized.
pub struct Application {
    settings: Settings,
    db: Database,
    registry: ModuleRegistry,
}

impl Application {
    /// Open the database, create module tables, and initialize every module.
    pub async fn build(settings: Settings) -> anyhow::Result<Self> {
        let db = Database::connect(&settings.database.url, settings.database.max_connections)
            .await
            .context("failed to open database")?;

        let mut registry = ModuleRegistry::new();
        modules::register_all(&mut registry);

        if let Err(err) = prepare(&settings, &db, &registry).await {
            db.close().await;
            return Err(err);
        }

        Ok(Self {
            settings,
            db,
            registry,
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Assemble the HTTP router over the owned database handle.
    pub fn router(&self) -> anyhow::Result<Router> {
        let ctx = InitCtx {
            settings: &self.settings,
            db: &self.db,
        };
        shelf_http::build_router(&self.registry, &ctx)
    }

    /// Serve until Ctrl-C or SIGTERM.
    pub async fn run(self) -> anyhow::Result<()> {
        self.run_until(shelf_http::shutdown_signal()).await
    }

    /// Serve until `shutdown` resolves, then stop modules and close the database.
    pub async fn run_until<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let router = self.router()?;
        let ctx = InitCtx {
            settings: &self.settings,
            db: &self.db,
        };

        let served = match self.registry.start_all(&ctx).await {
            Ok(()) => shelf_http::serve(router, &self.settings, shutdown).await,
            Err(err) => Err(err),
        };

        let stopped = self.shutdown().await;
        served.and(stopped)
    }

    /// Stop modules in reverse order and release the database.
    pub async fn shutdown(self) -> anyhow::Result<()> {
        let stopped = self.registry.stop_all().await;
        self.db.close().await;
        stopped
    }
}

async fn prepare(settings: &Settings, db: &Database, registry: &ModuleRegistry) -> anyhow::Result<()> {
    registry.apply_tables(db).await?;

    let ctx = InitCtx { settings, db };
    registry.init_all(&ctx).await
}
