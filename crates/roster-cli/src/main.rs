//! Roster binary.
//!
//! # Usage
//!
//! ```bash
//! # Register a recipient with its primary device in a store file
//! roster --store roster.cbor register +15551234567 --device 1
//!
//! # Link two more devices, then list everything
//! roster --store roster.cbor add-devices +15551234567 2 3
//! roster --store roster.cbor list
//!
//! # Render a request without touching any store
//! roster request prekey +15551234567 2
//! ```

use clap::Parser;
use roster_cli::Args;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = args.config();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry().with(fmt::layer().with_writer(std::io::stderr)).with(filter).init();

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    roster_cli::run(&config, &args.command, &mut out)?;

    Ok(())
}
