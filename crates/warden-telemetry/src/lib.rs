//! Warden Telemetry - Logging and operation spans for the warden
//! security engine.
//!
//! This crate provides:
//! - Configurable logging setup (pretty, compact or JSON) over
//!   `tracing-subscriber` with an `EnvFilter`
//! - [`OperationContext`], a span tying together the log lines of one
//!   login or logout
//!
//! With the `config` feature, a [`LogConfig`] can be built from the
//! `[logging]` section of a `warden_config::Config`.
//!
//! # Example
//!
//! ```rust,no_run
//! use tracing::Instrument;
//! use warden_telemetry::{LogConfig, LogFormat, OperationContext, setup_logging};
//!
//! # async fn run() -> Result<(), warden_telemetry::TelemetryError> {
//! let config = LogConfig::new("debug")
//!     .with_format(LogFormat::Json)
//!     .with_directive("warden_session=trace");
//!
//! setup_logging(&config)?;
//!
//! let ctx = OperationContext::new("login").with_principal("alice");
//!
//! async { tracing::info!("authenticating") }
//!     .instrument(ctx.span())
//!     .await;
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

mod context;
mod error;
mod logging;

pub use context::OperationContext;
pub use error::{TelemetryError, TelemetryResult};
pub use logging::{LogConfig, LogFormat, LogTarget, setup_default_logging, setup_logging};
