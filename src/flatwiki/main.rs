use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use flatwiki::api::WikiApi;
use flatwiki::config::{WikiConfig, DEFAULT_CONFIG_FILE};
use flatwiki::server::{template_routes, WikiServer};
use flatwiki::store::fs::DiskStore;
use pagetmpl::Renderer;
use std::path::PathBuf;
use std::sync::Arc;

mod args;
use args::Cli;

fn main() {
    if let Err(e) = run() {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = load_config(&cli)?;
    config
        .prepare_storage()
        .with_context(|| format!("cannot use storage {}", config.storage_dir.display()))?;
    log::info!("storage directory: {}", config.storage_dir.display());

    let renderer = build_renderer(&config)?;
    let store = DiskStore::new(&config.storage_dir).with_file_suffix(&config.file_suffix);
    let server = WikiServer::new(WikiApi::new(Arc::new(store)), renderer);

    let bound = server.bind(&config.listen_addr)?;
    log::info!("listening on http://{}", config.listen_addr);
    bound.run(config.workers)
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn load_config(cli: &Cli) -> Result<WikiConfig> {
    let path = cli
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
    let mut config = WikiConfig::load(&path)
        .with_context(|| format!("cannot load config {}", path.display()))?;

    if let Some(storage) = &cli.storage {
        config.storage_dir = storage.clone();
    }
    if let Some(assets) = &cli.assets {
        config.assets_dir = Some(assets.clone());
    }
    if let Some(addr) = &cli.addr {
        config.listen_addr = addr.clone();
    }
    if let Some(workers) = cli.workers {
        config.workers = workers;
    }
    Ok(config)
}

fn build_renderer(config: &WikiConfig) -> Result<Renderer> {
    let mut renderer =
        Renderer::with_defaults(template_routes()).context("built-in templates failed to load")?;

    if let Some(assets) = &config.assets_dir {
        let html_dir = assets.join("html");
        if html_dir.is_dir() {
            match renderer.load_dir(&html_dir) {
                Ok(loaded) => log::info!("loaded {} templates from {}", loaded, html_dir.display()),
                Err(e) => log::warn!("template override skipped: {}", e),
            }
        } else {
            log::warn!("no html/ folder in {}, using built-in templates", assets.display());
        }
    }
    Ok(renderer)
}
