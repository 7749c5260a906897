//! Wiring from configuration to a running [`Runtime`].

use std::path::Path;

use anyhow::{Context, Result, bail};
use stookwijzer::{
    CachedLocation, ClientConfig, FeatureClient, LocateOptions, Runtime, RuntimeSettings, Session,
    Severity, StaticLocation, StatusMessage, SystemClock, UiEvent,
};
use stookwijzer_config::{ConfigLoader, FilePreferences, Paths, StookwijzerConfig};
use tracing::debug;

use crate::render::TerminalRenderer;

pub type CliRuntime = Runtime<
    FeatureClient,
    CachedLocation<StaticLocation>,
    FilePreferences,
    TerminalRenderer,
    SystemClock,
>;

/// Loads configuration, layering `explicit` above the discovered files.
pub fn load_config(explicit: Option<&Path>) -> Result<StookwijzerConfig> {
    let mut loader = ConfigLoader::new();
    if let Some(path) = explicit {
        loader = loader.with_file(path);
    }
    loader.load().context("Failed to load configuration")
}

pub fn client_config(config: &StookwijzerConfig) -> ClientConfig {
    let service = &config.service;
    ClientConfig {
        endpoint: service.endpoint.clone(),
        type_name: service.type_name.clone(),
        srs_name: service.srs_name.clone(),
        bbox_half_width: service.bbox_half_width,
        location_count: service.location_count,
        timeout: service.request_timeout(),
    }
}

pub fn runtime_settings(config: &StookwijzerConfig) -> RuntimeSettings {
    RuntimeSettings {
        demo_point: config.demo.point(),
        locate: LocateOptions {
            high_accuracy: config.location.high_accuracy,
            timeout: config.location.timeout(),
            maximum_age: config.location.maximum_age(),
        },
        debounce: config.lookup.debounce(),
    }
}

/// A terminal has no positioning hardware; the configured point stands in.
fn locator(config: &StookwijzerConfig) -> CachedLocation<StaticLocation> {
    let provider = match config.location.fixed_point() {
        Some(point) => StaticLocation::Fixed(point),
        None => StaticLocation::Unsupported,
    };
    CachedLocation::new(provider)
}

pub fn build(config: &StookwijzerConfig) -> Result<CliRuntime> {
    let client =
        FeatureClient::new(client_config(config)).context("Failed to create HTTP client")?;
    let preferences_path = config.preferences_path(&Paths::new())?;
    debug!(path = %preferences_path.display(), "opening preferences");
    let preferences = FilePreferences::open_or_empty(preferences_path);

    Ok(Runtime::new(
        client,
        locator(config),
        preferences,
        TerminalRenderer::new(),
        SystemClock,
        runtime_settings(config),
    ))
}

/// Single-threaded async runtime the lookup loop runs on.
pub fn async_runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")
}

/// Dispatches `events`, waits for every lookup they start, and fails when
/// the session ends on an error.
pub fn run_once(config: &StookwijzerConfig, events: Vec<UiEvent>) -> Result<()> {
    async_runtime()?.block_on(async {
        let mut runtime = build(config)?;
        for event in events {
            runtime.dispatch(event);
        }
        runtime.settle().await;
        outcome(runtime.session())
    })
}

fn outcome(session: &Session) -> Result<()> {
    match session.frame().status {
        Some(status @ StatusMessage::MissingCoordinates) => bail!("{}", status.text()),
        Some(status) if status.severity() == Severity::Error => {
            let detail = session.last_error().unwrap_or_default();
            bail!("{} {detail}", status.text())
        }
        _ => Ok(()),
    }
}
