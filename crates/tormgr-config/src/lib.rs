//! Configuration and session persistence for the tormgr client
//!
//! This crate provides:
//! - File path utilities for config and cache files
//! - Configuration file loading (TOML, environment-selected)
//! - Application configuration (AppConfig)
//! - The session store and its persistence backends

pub mod app_config;
pub mod config_file;
pub mod paths;
pub mod session;

pub use app_config::{ApiConfig, AppConfig};
pub use config_file::load_config_file;
pub use paths::{app_config_path, cache_dir, config_dir, session_path};
pub use session::{
    FileBackend, MemoryBackend, SessionBackend, SessionStore, SharedSession, STORAGE_ROOT,
};
