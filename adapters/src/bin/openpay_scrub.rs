//! Transcript scrubber
//!
//! Reads a captured Openpay transcript from the file given as the first
//! argument (or stdin) and writes the PCI-safe version to stdout.

use anyhow::{Context, Result};
use openpay_adapter::scrub;
use std::io::{self, Read, Write};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let transcript = match std::env::args().nth(1) {
        Some(path) => {
            info!("Scrubbing transcript from {}", path);
            std::fs::read_to_string(&path).with_context(|| format!("reading {}", path))?
        }
        None => {
            info!("Scrubbing transcript from stdin");
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("reading stdin")?;
            buffer
        }
    };

    let scrubbed = scrub(&transcript);
    io::stdout()
        .write_all(scrubbed.as_bytes())
        .context("writing stdout")?;

    info!("Scrubbed {} bytes", transcript.len());
    Ok(())
}
