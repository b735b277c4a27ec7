//! Command-line front-end: price one corridor across every configured
//! provider and print the outcome as JSON.

use anyhow::{Context, Result};
use clap::Parser;
use remit_quotes::application::services::{
    AggregateQuoteCache, AggregatorEngine, QuoteFilters,
};
use remit_quotes::config::Settings;
use remit_quotes::domain::entities::QuoteRequest;
use remit_quotes::infrastructure::telemetry::init_tracing;
use rust_decimal::Decimal;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "remit-quotes")]
#[command(about = "Compare remittance quotes across providers")]
struct Args {
    /// Sending country (ISO 3166 alpha-2)
    #[arg(long)]
    from_country: String,

    /// Receiving country (ISO 3166 alpha-2)
    #[arg(long)]
    to_country: String,

    /// Sending currency (ISO 4217)
    #[arg(long)]
    from_currency: String,

    /// Receiving currency (ISO 4217)
    #[arg(long)]
    to_currency: String,

    /// Amount to send
    #[arg(long)]
    amount: String,

    /// Sort policy: best_rate, lowest_fee, fastest_time or best_value
    #[arg(long)]
    sort: Option<String>,

    /// Drop quotes with a higher fee
    #[arg(long)]
    max_fee: Option<Decimal>,

    /// Drop quotes slower than this many minutes
    #[arg(long)]
    max_delivery_minutes: Option<u32>,

    /// Provider id to skip (repeatable)
    #[arg(long)]
    exclude: Vec<String>,

    /// Bypass the per-provider cache
    #[arg(long)]
    no_cache: bool,

    /// Return one cached ranked list instead of a full batch report
    #[arg(long)]
    aggregate: bool,

    /// Aggregate cache TTL in seconds
    #[arg(long, requires = "aggregate")]
    ttl: Option<u64>,

    /// Settings file (TOML, YAML or JSON)
    #[arg(long, short)]
    config: Option<PathBuf>,
}

impl Args {
    fn filters(&self) -> QuoteFilters {
        let mut filters = QuoteFilters::new();
        if let Some(max_fee) = self.max_fee {
            filters = filters.with_max_fee(max_fee);
        }
        if let Some(minutes) = self.max_delivery_minutes {
            filters = filters.with_max_delivery_minutes(minutes);
        }
        filters
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let settings = Settings::load(args.config.as_deref()).context("loading settings")?;
    init_tracing(&settings.logging)?;

    let request = QuoteRequest::parse(
        &args.from_country,
        &args.to_country,
        &args.from_currency,
        &args.to_currency,
        &args.amount,
    )
    .context("invalid quote request")?;

    let registry = Arc::new(settings.build_registry()?);
    let cache = settings.build_cache().await?;
    let engine = AggregatorEngine::new(
        registry,
        Some(Arc::clone(&cache)),
        Arc::new(settings.parameter_mapping()),
        settings.ttl_policy(),
        settings.aggregation_config(),
    );

    let output = if args.aggregate {
        let wrapper = AggregateQuoteCache::new(engine, cache, settings.aggregate_cache_config());
        let quotes = wrapper.get_or_compute(&request, args.ttl).await?;
        serde_json::to_string_pretty(&quotes)?
    } else {
        let mut options = engine
            .default_options()
            .with_cache(!args.no_cache)
            .with_filters(args.filters());
        for id in &args.exclude {
            options = options.exclude(id.as_str());
        }
        if let Some(sort) = &args.sort {
            options = options.sort_by(sort.as_str());
        }
        let result = engine.dispatch(&request, &options).await?;
        serde_json::to_string_pretty(&result)?
    };

    println!("{output}");
    Ok(())
}
