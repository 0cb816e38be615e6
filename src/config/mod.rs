//! # Configuration Module
//!
//! Layered settings: built-in defaults, `config/default.toml`,
//! `config/{RUN_ENV}.toml`, `APP__` prefixed environment variables, then
//! plain overrides such as `DATABASE_URL`, `STORAGE_BACKEND` and `JWT_SECRET`.
//! A `.env` file is loaded first when present.
//!
//! ```rust,ignore
//! use tikichat_server::config::Settings;
//!
//! let settings = Settings::load()?;
//! println!("Store backend: {:?}", settings.database.backend);
//! ```

mod settings;

pub use settings::*;
