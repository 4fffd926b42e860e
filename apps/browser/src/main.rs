use std::{io, path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::Parser;
use client_core::{BeerGateway, HttpBeerGateway, ListController, MissingBeerGateway};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

mod config;
mod render;

#[derive(Parser, Debug)]
#[command(about = "Browse the beer catalog and filter it by name")]
struct Args {
    /// Catalog backend base url; overrides config and environment.
    #[arg(long)]
    api_url: Option<String>,
    #[arg(long, default_value = "browser.toml")]
    config: PathBuf,
    /// Initial search term.
    #[arg(long, default_value = "")]
    search: String,
    /// Print the list once and exit instead of reading search terms from stdin.
    #[arg(long)]
    once: bool,
}

#[derive(Debug, PartialEq, Eq)]
enum InputCommand<'a> {
    Quit,
    Reload,
    Search(&'a str),
}

fn parse_input(line: &str) -> InputCommand<'_> {
    let line = line.trim_end_matches(['\r', '\n']);
    match line.trim() {
        ":quit" | ":q" => InputCommand::Quit,
        ":reload" => InputCommand::Reload,
        _ => InputCommand::Search(line),
    }
}

fn build_gateway(settings: &config::Settings) -> Result<Arc<dyn BeerGateway>> {
    let Some(api_url) = settings.catalog_url() else {
        tracing::warn!("no catalog url configured; the beer list will fail to load");
        return Ok(Arc::new(MissingBeerGateway));
    };

    let gateway = HttpBeerGateway::new(api_url, settings.request_timeout())
        .context("failed to build catalog gateway")?;
    tracing::info!(endpoint = %gateway.endpoint(), "starting beer browser");
    Ok(Arc::new(gateway))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();
    let (mut settings, warnings) = config::load_settings(&args.config)?;
    if let Some(api_url) = args.api_url {
        settings.api_url = api_url;
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&settings.log_filter)),
        )
        .with_writer(io::stderr)
        .init();
    for warning in &warnings {
        tracing::warn!("{warning}");
    }

    let mut controller = ListController::new(build_gateway(&settings)?);
    controller.set_search_term(args.search);
    controller.activate();

    let mut stdout = io::stdout();
    render::render_view(&mut stdout, &controller)?;

    if args.once {
        controller.resolve().await;
        render::render_view(&mut stdout, &controller)?;
        controller.teardown();
        return Ok(());
    }

    run_interactive(
        &mut controller,
        BufReader::new(tokio::io::stdin()),
        &mut stdout,
    )
    .await
}

/// Feeds each input line to the controller as a search term until `:quit`
/// or end of input, re-rendering after every change. Tears the controller
/// down on exit.
async fn run_interactive<R, W>(
    controller: &mut ListController,
    input: R,
    out: &mut W,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: io::Write,
{
    let mut lines = input.lines();

    loop {
        tokio::select! {
            changed = controller.resolve(), if controller.has_outstanding_fetch() => {
                if changed {
                    render::render_view(out, controller)?;
                }
            }
            line = lines.next_line() => {
                let Some(line) = line.context("failed to read search input")? else {
                    break;
                };
                match parse_input(&line) {
                    InputCommand::Quit => break,
                    InputCommand::Reload => controller.activate(),
                    InputCommand::Search(term) => controller.set_search_term(term),
                }
                render::render_view(out, controller)?;
            }
        }
    }

    controller.teardown();
    Ok(())
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
