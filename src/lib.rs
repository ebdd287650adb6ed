#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::module_name_repetitions)]

use anyhow::Result;

// Declare library modules
mod app;
mod cli;
pub mod lookup;
pub mod providers;
pub mod results;
mod sanitize;
pub mod server;
mod user_config;

/// Runs the main application logic.
///
/// This function initializes logging, parses command-line arguments, loads
/// the user configuration and then either prints a report for one number,
/// prints usage, or serves the HTTP API until interrupted.
///
/// # Errors
///
/// Returns an error if the configured default region is not supported, the
/// API server cannot bind its address, or writing the output fails.
pub async fn run() -> Result<()> {
  env_logger::Builder::from_env(
    env_logger::Env::default().default_filter_or("warn"),
  )
  .try_init()
  .ok();

  let app = app::App::new()?;
  app.run().await
}
