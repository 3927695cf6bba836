//! Configuration and file management for the appdb update checker
//!
//! This crate provides:
//! - File path utilities for config files
//! - Configuration file loading (TOML)
//! - Application configuration (AppConfig)
//! - Ignored apps persistence

pub mod app_config;
pub mod config_file;
pub mod ignored_apps;
pub mod paths;

pub use app_config::AppConfig;
pub use config_file::load_config_file;
pub use ignored_apps::IgnoredApps;
pub use paths::{app_config_path, config_dir, ignored_apps_path};
