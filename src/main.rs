//! # lpse-scraper CLI Entry Point
//!
//! Opens a portal session, walks the tender listing, and prints the packages
//! as JSON on stdout. Logs go to stderr.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, warn};

use lpse_scraper_lib::domain::{Category, ListingFilter, Package};
use lpse_scraper_lib::infrastructure::logging::{init_logging_with_config, log_system_info};
use lpse_scraper_lib::infrastructure::{AppConfig, ConfigManager, LpseClient};

/// Tender listing scraper for LPSE e-procurement portals.
#[derive(Parser, Debug)]
#[command(name = "lpse-scraper", version, about)]
struct Cli {
    /// Configuration file (defaults to the user config directory)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Portal origin, e.g. https://lpse.pu.go.id
    #[arg(long)]
    host: Option<String>,

    /// Rows per listing page
    #[arg(long)]
    page_size: Option<u32>,

    /// Stop after this many pages (0 = all)
    #[arg(long)]
    pages: Option<u32>,

    /// Only tenders of this agency (rkn_nama)
    #[arg(long)]
    agency: Option<String>,

    /// Free-text search
    #[arg(long)]
    search: Option<String>,

    /// Tender category, e.g. PEKERJAAN_KONSTRUKSI
    #[arg(long)]
    category: Option<Category>,

    /// Fetch the announcement page of every package
    #[arg(long)]
    details: bool,

    /// Write JSON to this file instead of stdout
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Debug-level logging
    #[arg(long, short)]
    verbose: bool,

    /// Rewrite the configuration file with defaults before running
    #[arg(long)]
    reset_config: bool,
}

impl Cli {
    fn apply(&self, config: &mut AppConfig) {
        if let Some(host) = &self.host {
            config.portal.host.clone_from(host);
        }
        if let Some(page_size) = self.page_size {
            config.portal.page_size = page_size;
        }
        if let Some(pages) = self.pages {
            config.portal.max_pages = pages;
        }
        if self.details {
            config.portal.fetch_details = true;
        }
        if self.verbose {
            config.logging.level = "debug".to_string();
        }
    }

    fn filter(&self) -> ListingFilter {
        ListingFilter {
            agency: self.agency.clone(),
            search: self.search.clone(),
            category: self.category,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;
    runtime.block_on(run(cli))
}

async fn run(cli: Cli) -> Result<()> {
    let manager = match &cli.config {
        Some(path) => ConfigManager::with_path(path),
        None => ConfigManager::new()?,
    };
    let mut config = if cli.reset_config {
        manager.reset_to_defaults().await?
    } else {
        manager.load_config().await?
    };
    cli.apply(&mut config);

    init_logging_with_config(&config.logging)?;
    log_system_info();

    let mut client = LpseClient::from_portal_config(&config.portal)?;
    client.init().await.context("Failed to open LPSE session")?;

    let portal = &config.portal;
    let mut packages = client.packages(portal.page_size, cli.filter())?;
    let mut collected: Vec<Package> = Vec::new();
    let mut pages = 0;

    while packages.next().await {
        pages += 1;
        let mut batch = packages.take_packages();
        if portal.fetch_details {
            for package in &mut batch {
                if let Err(e) = client.announcement(package).await {
                    warn!("⚠️  Announcement for {} failed: {}", package.code, e);
                }
            }
        }
        collected.extend(batch);

        if portal.max_pages != 0 && pages >= portal.max_pages {
            info!("Page limit {} reached", portal.max_pages);
            break;
        }
    }

    info!(
        "✅ Collected {} packages from {} page(s) ({} filtered of {})",
        collected.len(),
        pages,
        packages.items_filtered_total,
        packages.items_total
    );

    let json = serde_json::to_string_pretty(&collected)?;
    match &cli.output {
        Some(path) => tokio::fs::write(path, json)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => println!("{json}"),
    }

    match packages.error.take() {
        Some(e) => Err(e).context(format!("Listing stopped after page {pages}")),
        None => Ok(()),
    }
}
