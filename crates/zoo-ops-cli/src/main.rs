mod cli;
mod commands;
mod config;

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::{debug, info, Level};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use zoo_ops_core::{find_user, open_preferences, AppContext, HttpZooApi, InMemoryZooApi, Session, Stores, ZooApi};

use crate::cli::Cli;
use crate::commands::Ctx;
use crate::config::{Config, LogFormat};

fn init_tracing(verbose: u8, format: LogFormat) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));

    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_current_span(false).with_writer(std::io::stderr))
            .init(),
        LogFormat::Text => registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_line_number(true)
                    .with_writer(std::io::stderr),
            )
            .init(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = Config::from_env();
    init_tracing(cli.verbose, config.log_format);

    if let Some(url) = cli.api_url.clone() {
        config.api_url = url;
    }
    if let Some(path) = cli.prefs.clone() {
        config.prefs_path = path;
    }
    debug!("Config: {:?}", config);

    let api: Arc<dyn ZooApi> = if cli.demo {
        info!("Using seeded demo data");
        Arc::new(InMemoryZooApi::seeded())
    } else {
        Arc::new(HttpZooApi::with_timeout(&config.api_url, config.http_timeout)?)
    };
    let stores = Stores::new(api);

    let prefs = open_preferences(Some(&config.prefs_path))?;
    let mut app = AppContext::from_preferences(&prefs)?;
    if let Some(lang) = cli.lang {
        app.language = lang;
        app.save_preferences(&prefs)?;
    }

    let user = find_user(&stores, &cli.user).await?;
    info!("Signed in as {} ({})", user.name, user.role);
    app.sign_in(user.clone());

    let ctx = Ctx {
        stores,
        session: Session::new(user, app.language),
        prefs: &prefs,
    };
    commands::run(cli.command, &ctx).await
}
