//! Star systems fetcher worker.

use crate::star_systems::types::{FetchRequest, SystemRecord, SystemsChannels, SystemsResult};
use anyhow::{Context, Result};
use std::sync::{
    Arc, Mutex,
    mpsc::{self},
};
use std::thread;
use std::time::Duration;

/// Starts the fetch worker. A request with no complete response within
/// `timeout` comes back as `SystemsResult::Failed`.
pub fn start_systems_worker(timeout: Duration) -> Result<SystemsChannels> {
    let (cmd_tx, cmd_rx) = mpsc::channel::<FetchRequest>();
    let (res_tx, res_rx) = mpsc::channel::<SystemsResult>();

    let client = reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .context("building http client")?;
    let rt = tokio::runtime::Runtime::new().context("creating tokio runtime")?;
    thread::Builder::new()
        .name("systems-fetcher".to_string())
        .spawn(move || {
            rt.block_on(async move {
                while let Ok(FetchRequest { seq, url }) = cmd_rx.recv() {
                    let msg = match fetch_systems(&client, &url).await {
                        Ok(systems) => {
                            println!("[SYSTEMS FETCH] seq={} SUCCESS count={}", seq, systems.len());
                            SystemsResult::Loaded { seq, systems }
                        }
                        // Reported once, when the result is applied.
                        Err(err) => SystemsResult::Failed {
                            seq,
                            error: format!("{err:#}"),
                        },
                    };
                    if res_tx.send(msg).is_err() {
                        break;
                    }
                }
            });
        })
        .context("spawning systems fetcher thread")?;

    Ok(SystemsChannels {
        cmd_tx,
        res_rx: Arc::new(Mutex::new(res_rx)),
    })
}

async fn fetch_systems(client: &reqwest::Client, url: &str) -> Result<Vec<SystemRecord>> {
    let resp = client
        .get(url)
        .header("accept", "application/json")
        .send()
        .await?;
    let status = resp.status();
    let body = resp.text().await?;
    if !status.is_success() {
        anyhow::bail!("HTTP {} for {}", status, url);
    }
    parse_systems(&body)
}

/// Decodes the `/api/systems/` body. Fields missing from a record take their defaults.
pub fn parse_systems(body: &str) -> Result<Vec<SystemRecord>> {
    let systems: Vec<SystemRecord> =
        serde_json::from_str(body).context("systems body is not an array of system records")?;
    Ok(systems)
}

/// Appends `path` below the base URL's own path, so `http://host/prefix`
/// keeps its `/prefix`.
pub fn systems_url(base_url: &str, path: &str) -> Result<String> {
    let mut base =
        reqwest::Url::parse(base_url).with_context(|| format!("bad base url {base_url}"))?;
    if !base.path().ends_with('/') {
        let dir = format!("{}/", base.path());
        base.set_path(&dir);
    }
    let url = base
        .join(path.trim_start_matches('/'))
        .with_context(|| format!("bad systems path {path}"))?;
    Ok(url.to_string())
}
