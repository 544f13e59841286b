use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use video_viewer::config::Settings;
use video_viewer::host::{Direction, HostAdapter, HostEvent, Refetch};
use video_viewer::platform::{spawn_base_url_fetch, PlatformClient};
use video_viewer::realtime::spawn_realtime;
use video_viewer::VideoViewer;

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    let settings = Settings::load()?;
    let record_id = settings
        .platform
        .record_id
        .clone()
        .context("platform.record_id is not configured")?;

    tracing::info!(
        "Viewing videos of {} ({})",
        record_id,
        settings.platform.object_api_name.as_deref().unwrap_or("unknown object")
    );

    let client = PlatformClient::new(
        settings.platform.api_url.clone(),
        settings.platform.token.clone(),
    );
    let (event_tx, event_rx) = mpsc::channel(100);

    // Both fetches race; the viewer copes with either order.
    spawn_base_url_fetch(client.clone(), event_tx.clone());
    let mut refetch = Refetch::new(client, record_id.clone(), event_tx.clone());
    refetch.spawn();

    if settings.platform.realtime {
        spawn_realtime(
            settings.platform.api_url.clone(),
            record_id,
            settings.platform.token.clone(),
            event_tx.clone(),
        );
    }

    let controls = tokio::spawn(read_controls(event_tx));
    let adapter = HostAdapter::new(settings.viewer(), event_rx).with_refetch(refetch);

    tokio::select! {
        _ = adapter.run(print_view) => {}
        _ = controls => tracing::info!("Quit requested"),
        _ = tokio::signal::ctrl_c() => tracing::info!("Interrupted"),
    }

    Ok(())
}

fn init_logging() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

/// Print the current view as one JSON line.
fn print_view(viewer: &VideoViewer) {
    match serde_json::to_string(&viewer.view_model()) {
        Ok(json) => println!("{}", json),
        Err(e) => tracing::warn!("Failed to serialize view: {}", e),
    }
}

/// Map stdin commands to host events: `n`ext, `p`revious, `e` for a
/// player error, `r`efresh, `q`uit.
async fn read_controls(event_tx: mpsc::Sender<HostEvent>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            // No terminal attached; keep running on pushed events alone.
            Ok(None) => return std::future::pending().await,
            Err(e) => {
                tracing::warn!("Failed to read controls: {}", e);
                return std::future::pending().await;
            }
        };

        let event = match line.trim() {
            "n" | "next" => HostEvent::Navigate(Direction::Next),
            "p" | "prev" | "previous" => HostEvent::Navigate(Direction::Previous),
            "e" | "error" => HostEvent::PlaybackFailed,
            "r" | "refresh" => HostEvent::RefreshRequested,
            "q" | "quit" => return,
            "" => continue,
            other => {
                tracing::warn!("Unknown command: {}", other);
                continue;
            }
        };

        if event_tx.send(event).await.is_err() {
            return;
        }
    }
}
