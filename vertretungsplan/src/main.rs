use chrono::Local;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vertretungsplan::board::{ClassBoard, today};
use vertretungsplan::config::Config;
use vertretungsplan::dsb::{DsbClient, DsbError};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("invalid configuration: {e}");
            std::process::exit(2);
        }
    };

    let client = match DsbClient::new(config.dsb.clone()) {
        Ok(client) => client,
        Err(e) => {
            error!("failed to create DSB client: {e}");
            std::process::exit(2);
        }
    };

    // Fail fast if the account or backend is unusable
    let mut board = match refresh(&client).await {
        Ok(board) => board,
        Err(e) => {
            error!("initial fetch failed: {e}");
            std::process::exit(1);
        }
    };
    publish(&board, &config);

    let mut interval = tokio::time::interval(config.polling.interval);
    interval.tick().await; // First tick is immediate, skip it
    loop {
        interval.tick().await;

        if !config.polling.should_refresh(Local::now().time(), true) {
            debug!("outside polling window, skipping refresh");
            continue;
        }

        match refresh(&client).await {
            Ok(fresh) => {
                board = fresh;
                publish(&board, &config);
            }
            Err(e) => warn!("refresh failed, keeping previous plan: {e}"),
        }
    }
}

async fn refresh(client: &DsbClient) -> Result<ClassBoard, DsbError> {
    let entries = client.fetch_entries().await?;
    let board = ClassBoard::build(entries, today());
    info!(
        classes = board.by_class.len(),
        entries = board.total_entries(),
        last_updated = board.last_updated.as_deref().unwrap_or("-"),
        "plan refreshed"
    );
    Ok(board)
}

fn publish(board: &ClassBoard, config: &Config) {
    let json = match &config.tutor_group {
        Some(group) => {
            let view = board.view(group);
            info!(group = %group, status = %view.status, "tutor group status");
            serde_json::to_string_pretty(&view)
        }
        None => serde_json::to_string_pretty(board),
    };

    match json {
        Ok(json) => println!("{json}"),
        Err(e) => error!("failed to serialise plan: {e}"),
    }
}
