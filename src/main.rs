use anyhow::{Context, Result};
use clap::Parser;
use ghsummary::config::{self, Config};
use ghsummary::svg;
use ghsummary::{ActivitySummaryFetcher, HttpSource, report};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> Result<()> {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    fmt()
        .with_env_filter(config::log_filter(rust_log.as_deref()))
        .with_writer(std::io::stderr)
        .init();

    let config = Config::parse();
    let today = config.today();

    let source = HttpSource::new(&config.github_api, &config.contributions_api)?;
    let summary = ActivitySummaryFetcher::new(source)
        .fetch(&config.user, today)
        .await;

    if config.json {
        let json =
            serde_json::to_string_pretty(&summary).context("Failed to serialize summary")?;
        println!("{json}");
    } else {
        print!("{}", report::render_text(&summary, today));
    }

    if let Some(dir) = &config.svg_dir {
        for path in svg::write_cards(dir, &summary, today)? {
            info!(path = %path.display(), "wrote stats card");
        }
    }

    Ok(())
}
