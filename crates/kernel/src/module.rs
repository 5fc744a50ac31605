use async_trait::async_trait;
use axum::Router;
use shelf_db::Database;

/// Context provided to modules during initialization and route construction
pub struct InitCtx<'a> {
    pub settings: &'a crate::settings::Settings,
    pub db: &'a Database,
}

/// Idempotent table definition contributed by a module.
///
/// Statements run on every startup, so they must use `IF NOT EXISTS` forms.
#[derive(Debug, Clone)]
pub struct TableDefinition {
    pub id: &'static str,
    pub ddl: &'static str,
}

/// Core module trait that all shelf modules must implement
#[async_trait]
pub trait Module: Sync + Send {
    /// Unique name for this module; also the mount path of its routes
    fn name(&self) -> &'static str;

    /// Initialize the module with the provided context
    /// Called during application startup after tables exist
    async fn init(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        Ok(())
    }

    /// Return the Axum router for this module's routes
    /// Routes will be mounted under `/{module_name}`
    fn routes(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<Router> {
        Ok(Router::new())
    }

    /// Return OpenAPI specification fragment for this module as JSON
    /// Will be merged with other modules' specs
    fn openapi(&self) -> Option<serde_json::Value> {
        None
    }

    /// Return table definitions owned by this module
    fn tables(&self) -> Vec<TableDefinition> {
        vec![]
    }

    /// Called once the HTTP listener is about to accept connections
    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        Ok(())
    }

    /// Stop the module and clean up resources
    /// Called during application shutdown, before the database closes
    async fn stop(&self) -> anyhow::Result<()> {
        Ok(())
    }
}
