//! Shelf application library
//!
//! Book catalogue modules plus the bootstrap that wires them to storage and
//! the HTTP server.

pub mod app;
pub mod modules;

pub use app::Application;
