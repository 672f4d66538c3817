/// Database configuration and connection management
pub mod database;

/// Report settings loaded from an optional TOML file
pub mod settings;
