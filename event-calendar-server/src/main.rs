use std::{env, sync::Arc};

use anyhow::Context;
use chrono::Utc;
use event_calendar::{
    hooks::{register_event_hooks, Action, ActionContext, Registry},
    MemoryStore,
};
use log::{info, warn};
use tokio::{net::TcpListener, signal};

mod cli;
mod routes;
mod source;
mod updater;

use routes::App;

const LOG_VAR: &str = "LOG";
const DEFAULT_LOG_FILTERS: &str = "event_calendar=info,event_calendar_server=info";

fn setup_logging() {
    let filters = env::var(LOG_VAR).unwrap_or_else(|_| DEFAULT_LOG_FILTERS.to_string());

    pretty_env_logger::formatted_builder()
        .parse_filters(&filters)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    setup_logging();

    let args = cli::parse(env::args().skip(1).collect());

    let mut registry = Registry::new();
    register_event_hooks(&mut registry);

    let client = reqwest::Client::new();
    let events = args
        .source
        .load(&client)
        .await
        .with_context(|| format!("Failed to load events from {}", args.source))?;
    info!("Loaded {} events from {}", events.len(), args.source);

    let app = Arc::new(App {
        store: MemoryStore::new(events),
        registry,
        config: args.config,
    });

    app.registry.do_action(
        Action::Init,
        &ActionContext {
            store: &app.store,
            now: app.config.local(Utc::now()),
        },
    );

    let updater = updater::spawn(
        Arc::clone(&app),
        args.source,
        client,
        args.update_interval,
    );

    let listener = TcpListener::bind(args.address).await?;
    info!("Listening at http://{}", args.address);

    axum::serve(listener, routes::router(app))
        .with_graceful_shutdown(shutdown())
        .await?;

    updater.abort();
    Ok(())
}

async fn shutdown() {
    if let Err(err) = signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {err}");
        std::future::pending::<()>().await;
    }

    info!("Shutting down");
}
