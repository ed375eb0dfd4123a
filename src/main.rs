use anyhow::Context;
use async_trait::async_trait;
use hexdeck::{
    init_logging, spawn_channel, AppSettings, AppState, ChannelConfig, ConfigSyncStore, FileCache,
    GaitRegistry, GaitSimulator, GeometryModel, OfflineRemote, PoseRegistry, ProfileRegistry,
    RemoteConfigClient, ResyncHandler, ServoTestSequencer, StoreConfig, TcpTransport,
    ViewModelReconciler,
};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

/// Refreshes cached configuration from the controller after every
/// successful (re)connection.
struct StoreResync {
    store: Arc<ConfigSyncStore>,
    profiles: Arc<Mutex<ProfileRegistry>>,
}

#[async_trait]
impl ResyncHandler for StoreResync {
    async fn resync(&self) {
        let profile = self.profiles.lock().await.current().to_string();
        self.store.load(&profile).await;
        for doc in ["profiles", "gaits", "poses"] {
            self.store.load_document(doc).await;
        }
        tracing::info!(%profile, "configuration resynchronized");
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = AppSettings::default_path()
        .and_then(|path| AppSettings::load_or_default(&path))
        .unwrap_or_default();
    init_logging(&settings.log_filter)?;
    tracing::info!(
        version = hexdeck::VERSION,
        built = hexdeck::BUILD_DATE,
        "starting hexdeck"
    );

    let cache = FileCache::for_app().context("opening config cache")?;
    // The controller's config endpoint is not deployed yet; the durable
    // cache is the source of truth until it is.
    let remote: Arc<dyn RemoteConfigClient> = Arc::new(OfflineRemote);
    let store = Arc::new(ConfigSyncStore::new(
        Box::new(cache),
        remote,
        StoreConfig {
            structural_keys: settings.structural_keys.clone(),
            debounce_window: Duration::from_millis(settings.debounce_ms),
        },
    ));

    let profiles = Arc::new(Mutex::new(ProfileRegistry::load(store.clone()).await));
    let gaits = GaitRegistry::load(store.clone()).await;
    let _poses = PoseRegistry::load(store.clone()).await;

    let current = profiles.lock().await.current().to_string();
    let config = store.load(&current).await;
    let geometry = GeometryModel::resolve(&config);
    tracing::info!(profile = %current, reach = geometry.max_reach(), "geometry resolved");

    let state = Arc::new(AppState::new());
    let resync = Arc::new(StoreResync {
        store: store.clone(),
        profiles: profiles.clone(),
    });
    let channel = spawn_channel(
        Arc::new(TcpTransport),
        state.clone(),
        Some(resync),
        ChannelConfig {
            address: settings.remote_addr.clone(),
            ..ChannelConfig::default()
        },
    );
    let sequencer = ServoTestSequencer::new(state.clone(), channel.sender());

    let mut reconciler = ViewModelReconciler::new(state.clone(), geometry, Instant::now());
    if let Some(gait) = gaits.active_gait() {
        reconciler.start_simulation(GaitSimulator::from_gait(
            &gait.name,
            &gait.metadata,
            Instant::now(),
        ));
    }

    let mut ticker = tokio::time::interval(settings.tick_period());
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    let mut last_source = None;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let view = reconciler.tick(Instant::now());
                if last_source != Some(view.source) {
                    tracing::debug!(source = ?view.source, connection = %view.connection, "pose source");
                    last_source = Some(view.source);
                }
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("shutting down");
                break;
            }
        }
    }

    sequencer.cancel();
    if let Err(e) = store.flush_pending().await {
        tracing::warn!(error = %e, "failed to flush pending config writes");
    }
    channel.shutdown();
    Ok(())
}
