//! Common utilities and shared types for moddesk.
//!
//! - **Configuration**: Application settings via [`Config`]
//! - **Error handling**: Unified error types via [`AppError`] and [`AppResult`]
//! - **Telemetry**: Tracing subscriber setup via [`init_tracing`]
//!
//! # Example
//!
//! ```no_run
//! use moddesk_common::{AppResult, Config, init_tracing};
//!
//! fn example() -> AppResult<()> {
//!     let config = Config::load()?;
//!     init_tracing(&config.logging)?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod telemetry;

pub use config::{Config, DatabaseConfig, LoggingConfig};
pub use error::{AppError, AppResult};
pub use telemetry::init_tracing;
