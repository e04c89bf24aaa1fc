use std::io::{self, Write};
use std::process::ExitCode;

use anyhow::Context;
use gvoice_sms::GoogleVoiceClient;
use gvoice_sms::cli;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<ExitCode> {
    // stdout carries the progress trail and the JSON result, so logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let mut out = io::stdout().lock();
    let exit = cli::run(std::env::args_os().skip(1), GoogleVoiceClient::new, &mut out)
        .await
        .context("writing to stdout")?;
    out.flush().context("flushing stdout")?;

    Ok(exit.into())
}
