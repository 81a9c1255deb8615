// src/main.rs
use anyhow::Result;
use clap::Parser;
use pagekeep::{Args, run};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt as _, util::SubscriberInitExt as _};

fn main() -> Result<()> {
    let args = Args::parse();
    let default_filter = if args.verbose { "pagekeep=debug" } else { "pagekeep=info" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    run(args)
}
