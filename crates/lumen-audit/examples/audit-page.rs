//! Example: Scan a page for accessibility violations.
//!
//! ```text
//! cargo run -p lumen-audit --example audit-page -- https://example.com
//! ```
//!
//! Configuration comes from `~/.config/lumen/config.toml` and the
//! `LUMEN_*` environment variables.

use anyhow::Context;
use lumen_audit::{AxeBuilder, PageEngine};
use lumen_browser::BrowserEngine;
use lumen_core::AppConfig;
use tracing::info;

fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,lumen=debug"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let url = std::env::args()
        .nth(1)
        .context("usage: audit-page <url> [css-selector-to-exclude]...")?;
    let excluded: Vec<String> = std::env::args().skip(2).collect();

    let config = AppConfig::load_with_env().context("loading configuration")?;
    info!(
        retries = config.scanning.retries,
        interval_ms = config.scanning.interval_ms,
        "Auditing {}",
        url
    );

    let browser = BrowserEngine::with_config(&config.browser).await?;
    let engine = PageEngine::new(browser.open(&url).await?);

    let builder = excluded
        .into_iter()
        .fold(AxeBuilder::from_config(&config), |builder, selector| {
            builder.exclude(selector)
        })
        .with_tags(["wcag2a", "wcag2aa"]);

    let result = builder.analyze(&engine).await?;
    result.log_summary();

    browser.close().await?;

    if result.has_violations() {
        anyhow::bail!("{} accessibility violation(s) found", result.violation_count());
    }
    Ok(())
}
