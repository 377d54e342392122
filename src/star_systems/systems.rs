//! Star systems systems (requests, results, adoption).

use crate::config::ViewerConfig;
use crate::star_systems::fetcher::{start_systems_worker, systems_url};
use crate::star_systems::types::{
    FetchGate, FetchRequest, StoreUpdate, SystemsChannels, SystemsCommand, SystemsConfig,
    SystemsStore,
};
use crate::view::{ActiveSystem, SystemSource, ViewCommand};
use bevy::prelude::*;
use std::time::Duration;

pub fn setup_systems_worker(
    mut commands: Commands,
    config: Res<ViewerConfig>,
    mut requests: MessageWriter<SystemsCommand>,
) {
    match systems_url(&config.api_base_url, &config.systems_path) {
        Ok(url) => {
            info!("[INIT] systems endpoint {}", url);
            commands.insert_resource(SystemsConfig { url });
        }
        Err(err) => {
            error!("[INIT] systems endpoint unavailable: {:#}", err);
            return;
        }
    }

    let timeout = Duration::from_secs(config.fetch_timeout_secs.max(1));
    match start_systems_worker(timeout) {
        Ok(channels) => {
            info!("[INIT] systems worker started");
            commands.insert_resource(channels);
        }
        Err(err) => {
            error!("[INIT] systems worker failed to start: {:#}", err);
            return;
        }
    }

    if config.fetch_on_startup {
        requests.write(SystemsCommand::Load);
    }
}

pub fn handle_systems_commands(
    mut reader: MessageReader<SystemsCommand>,
    mut gate: ResMut<FetchGate>,
    store: Res<SystemsStore>,
    mut active: ResMut<ActiveSystem>,
    mut view_commands: MessageWriter<ViewCommand>,
    systems_config: Option<Res<SystemsConfig>>,
    channels: Option<Res<SystemsChannels>>,
) {
    for cmd in reader.read() {
        match *cmd {
            SystemsCommand::Load => {
                let (Some(systems_config), Some(channels)) = (&systems_config, &channels) else {
                    warn!("[SYSTEMS FETCH] worker not running, load ignored");
                    continue;
                };
                let Some(seq) = gate.request() else {
                    debug!("[SYSTEMS FETCH] load coalesced into in-flight request");
                    continue;
                };
                send_fetch(channels, &mut gate, seq, &systems_config.url);
            }
            SystemsCommand::Adopt(index) => {
                adopt(&store, &mut active, &mut view_commands, index);
            }
            SystemsCommand::AdoptNext => {
                if store.systems.is_empty() {
                    info!("[SYSTEMS] nothing fetched yet");
                    continue;
                }
                let next = match active.source {
                    SystemSource::Store(i) => (i + 1) % store.systems.len(),
                    _ => 0,
                };
                adopt(&store, &mut active, &mut view_commands, next);
            }
        }
    }
}

pub fn apply_systems_results(
    mut store: ResMut<SystemsStore>,
    mut gate: ResMut<FetchGate>,
    channels: Option<Res<SystemsChannels>>,
    systems_config: Option<Res<SystemsConfig>>,
) {
    let Some(channels) = channels else { return };
    let results: Vec<_> = {
        let Ok(guard) = channels.res_rx.lock() else {
            return;
        };
        guard.try_iter().collect()
    };

    for result in results {
        let seq = result.seq();
        match store.apply(result) {
            StoreUpdate::Replaced { count } => {
                info!("[SYSTEMS FETCH] seq={} loaded {} systems", seq, count);
            }
            StoreUpdate::Stale { seq, applied_seq } => {
                debug!(
                    "[SYSTEMS FETCH] dropping seq={} (already holding seq={})",
                    seq, applied_seq
                );
            }
            StoreUpdate::Failed { error } => {
                error!("[SYSTEMS FETCH] seq={} failed: {}", seq, error);
            }
        }

        if let Some(follow_up) = gate.complete(seq) {
            if let Some(systems_config) = &systems_config {
                send_fetch(&channels, &mut gate, follow_up, &systems_config.url);
            }
        }
    }
}

fn send_fetch(channels: &SystemsChannels, gate: &mut FetchGate, seq: u64, url: &str) {
    let request = FetchRequest {
        seq,
        url: url.to_string(),
    };
    if let Err(err) = channels.cmd_tx.send(request) {
        error!("[SYSTEMS FETCH] failed to queue seq={}: {}", seq, err);
        gate.complete(seq);
    }
}

/// Takes the `ResMut` so change detection only fires when the system is actually replaced.
fn adopt(
    store: &SystemsStore,
    active: &mut ResMut<ActiveSystem>,
    view_commands: &mut MessageWriter<ViewCommand>,
    index: usize,
) {
    let Some(record) = store.systems.get(index) else {
        warn!(
            "[SYSTEMS] cannot adopt system {} ({} fetched)",
            index,
            store.systems.len()
        );
        return;
    };
    info!("[SYSTEMS] adopting '{}' (id={})", record.name, record.id);
    active.record = record.clone();
    active.source = SystemSource::Store(index);
    view_commands.write(ViewCommand::SetStarSystemView);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;
    use crate::star_systems::types::{SystemRecord, SystemsResult};
    use std::sync::{Arc, Mutex, mpsc};

    fn app_with_store() -> App {
        let mut app = App::new();
        app.add_message::<SystemsCommand>()
            .add_message::<ViewCommand>()
            .init_resource::<FetchGate>()
            .insert_resource(SystemsStore {
                systems: vec![
                    SystemRecord {
                        id: 10,
                        name: "Alpha".to_string(),
                        ..default()
                    },
                    SystemRecord {
                        id: 11,
                        name: "Beta".to_string(),
                        ..default()
                    },
                ],
                applied_seq: 1,
                ..default()
            })
            .insert_resource(ActiveSystem {
                record: catalog::solar_system(),
                source: SystemSource::Catalog,
            })
            .add_systems(Update, handle_systems_commands);
        app
    }

    #[test]
    fn adopt_next_cycles_through_store() {
        let mut app = app_with_store();

        app.world_mut().write_message(SystemsCommand::AdoptNext);
        app.update();
        assert_eq!(app.world().resource::<ActiveSystem>().record.id, 10);

        app.world_mut().write_message(SystemsCommand::AdoptNext);
        app.update();
        assert_eq!(app.world().resource::<ActiveSystem>().record.id, 11);

        app.world_mut().write_message(SystemsCommand::AdoptNext);
        app.update();
        let active = app.world().resource::<ActiveSystem>();
        assert_eq!(active.record.id, 10);
        assert_eq!(active.source, SystemSource::Store(0));
    }

    #[test]
    fn adopt_out_of_range_keeps_active_system() {
        let mut app = app_with_store();

        app.world_mut().write_message(SystemsCommand::Adopt(9));
        app.update();

        let active = app.world().resource::<ActiveSystem>();
        assert_eq!(active.source, SystemSource::Catalog);
        assert_eq!(active.record, catalog::solar_system());
    }

    #[test]
    fn results_are_drained_into_store() {
        let (cmd_tx, _cmd_rx) = mpsc::channel();
        let (res_tx, res_rx) = mpsc::channel();
        let mut app = App::new();
        app.init_resource::<SystemsStore>()
            .init_resource::<FetchGate>()
            .insert_resource(SystemsChannels {
                cmd_tx,
                res_rx: Arc::new(Mutex::new(res_rx)),
            })
            .add_systems(Update, apply_systems_results);

        let seq = app.world_mut().resource_mut::<FetchGate>().request().unwrap();
        res_tx
            .send(SystemsResult::Loaded {
                seq,
                systems: vec![SystemRecord {
                    id: 1,
                    ..default()
                }],
            })
            .unwrap();
        app.update();

        let store = app.world().resource::<SystemsStore>();
        assert_eq!(store.systems.len(), 1);
        assert_eq!(store.systems[0].id, 1);
        assert!(!app.world().resource::<FetchGate>().is_loading());
    }

    #[test]
    fn failed_result_keeps_store_and_releases_gate() {
        let (cmd_tx, _cmd_rx) = mpsc::channel();
        let (res_tx, res_rx) = mpsc::channel();
        let mut app = App::new();
        app.insert_resource(SystemsStore {
            systems: vec![SystemRecord {
                id: 5,
                ..default()
            }],
            ..default()
        })
        .init_resource::<FetchGate>()
        .insert_resource(SystemsChannels {
            cmd_tx,
            res_rx: Arc::new(Mutex::new(res_rx)),
        })
        .add_systems(Update, apply_systems_results);

        let seq = app.world_mut().resource_mut::<FetchGate>().request().unwrap();
        res_tx
            .send(SystemsResult::Failed {
                seq,
                error: "HTTP 500".to_string(),
            })
            .unwrap();
        app.update();

        let store = app.world().resource::<SystemsStore>();
        assert_eq!(store.systems.len(), 1);
        assert_eq!(store.systems[0].id, 5);
        assert!(!app.world().resource::<FetchGate>().is_loading());
    }

    fn app_with_worker_channels() -> (
        App,
        mpsc::Receiver<FetchRequest>,
        mpsc::Sender<SystemsResult>,
    ) {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (res_tx, res_rx) = mpsc::channel();
        let mut app = App::new();
        app.add_message::<SystemsCommand>()
            .add_message::<ViewCommand>()
            .init_resource::<SystemsStore>()
            .init_resource::<FetchGate>()
            .insert_resource(ActiveSystem {
                record: catalog::solar_system(),
                source: SystemSource::Catalog,
            })
            .insert_resource(SystemsConfig {
                url: "http://localhost:8080/api/systems/".to_string(),
            })
            .insert_resource(SystemsChannels {
                cmd_tx,
                res_rx: Arc::new(Mutex::new(res_rx)),
            })
            .add_systems(
                Update,
                (handle_systems_commands, apply_systems_results).chain(),
            );
        (app, cmd_rx, res_tx)
    }

    #[test]
    fn load_after_timed_out_request_fetches_again() {
        let (mut app, cmd_rx, res_tx) = app_with_worker_channels();

        app.world_mut().write_message(SystemsCommand::Load);
        app.update();
        let first = cmd_rx.try_recv().expect("first request queued");

        // Still waiting on the server: this load is held back.
        app.world_mut().write_message(SystemsCommand::Load);
        app.update();
        assert!(cmd_rx.try_recv().is_err());
        assert!(app.world().resource::<FetchGate>().is_loading());

        // The client timeout turns the stuck request into a failure.
        res_tx
            .send(SystemsResult::Failed {
                seq: first.seq,
                error: "operation timed out".to_string(),
            })
            .unwrap();
        app.update();
        let follow_up = cmd_rx.try_recv().expect("held-back load is sent");
        assert!(follow_up.seq > first.seq);

        res_tx
            .send(SystemsResult::Failed {
                seq: follow_up.seq,
                error: "operation timed out".to_string(),
            })
            .unwrap();
        app.update();
        assert!(!app.world().resource::<FetchGate>().is_loading());

        app.world_mut().write_message(SystemsCommand::Load);
        app.update();
        let later = cmd_rx.try_recv().expect("later load is not swallowed");
        assert!(later.seq > follow_up.seq);
    }

    #[test]
    fn each_failed_fetch_is_reported_once() {
        let (mut app, cmd_rx, res_tx) = app_with_worker_channels();

        for attempt in 1..=3u32 {
            app.world_mut().write_message(SystemsCommand::Load);
            app.update();
            let request = cmd_rx.try_recv().expect("request queued");
            res_tx
                .send(SystemsResult::Failed {
                    seq: request.seq,
                    error: format!("HTTP 503 (attempt {attempt})"),
                })
                .unwrap();
            app.update();
            app.update();

            let store = app.world().resource::<SystemsStore>();
            assert_eq!(store.failed_fetches, attempt);
            assert!(store.systems.is_empty());
        }
    }
}
