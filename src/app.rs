use crate::cli::{Cli, Mode};
use crate::lookup::Lookup;
use crate::providers::country::IsoCountryRegistry;
use crate::providers::libphone::LibPhonenumber;
use crate::providers::CountryRegistry;
use crate::results::{self, write_banner, write_usage};
use crate::server;
use crate::user_config::{self, UserConfig};
use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use log::debug;
use std::io;
use std::sync::Arc;

pub struct App {
  cli: Cli,
  config: UserConfig,
  lookup: Arc<Lookup>,
}

impl App {
  pub fn new() -> Result<Self> {
    Self::from_parts(Cli::parse(), user_config::load())
  }

  pub fn from_parts(cli: Cli, mut config: UserConfig) -> Result<Self> {
    if let Some(region) = &cli.region {
      config.default_region.clone_from(region);
    }

    let registry: Option<Arc<dyn CountryRegistry>> = if config.country_registry
    {
      Some(Arc::new(IsoCountryRegistry))
    } else {
      None
    };

    let lookup =
      Lookup::new(Arc::new(LibPhonenumber), registry, &config.default_region)
        .context("Invalid default region")?;
    debug!("Default region: {}", lookup.default_region());

    Ok(Self {
      cli,
      config,
      lookup: Arc::new(lookup),
    })
  }

  pub async fn run(&self) -> Result<()> {
    if self.cli.config_show {
      return serde_json::to_string_pretty(&self.config)
        .map(|s| println!("{s}"))
        .context("Failed to serialize configuration");
    }

    match self.cli.mode() {
      Mode::Usage => Self::print_usage(),
      Mode::Report(number) => self.run_report(&number),
      Mode::Serve => self.run_server().await,
    }
  }

  fn print_usage() -> Result<()> {
    write_usage(&mut io::stdout()).context("Failed to write usage")
  }

  fn run_report(&self, number: &str) -> Result<()> {
    let outcome = self.lookup.lookup(number);
    if self.cli.json {
      results::print_json(&outcome)
    } else {
      results::print_human_readable(&outcome)
    }
  }

  async fn run_server(&self) -> Result<()> {
    let addr = self.config.bind_addr();
    write_banner(&mut io::stdout()).context("Failed to write banner")?;
    println!(
      "{}",
      style(format!(
        "[i] API running at http://{addr}{}/search=<number>",
        server::ROUTE_PREFIX
      ))
      .yellow()
    );
    println!(
      "{}",
      style("[i] Press Ctrl+C to stop the server and exit.\n").yellow()
    );

    let app = server::router(Arc::clone(&self.lookup));
    server::serve(&addr, app).await?;

    println!("{}", style("\n[•] API stopped by user. Exiting...").red());
    Ok(())
  }
}
