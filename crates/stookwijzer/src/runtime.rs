//! Runtime layer that executes kernel effects.
//!
//! The kernel is pure and produces effects. The runtime owns the IO: it
//! starts fetches and location requests, cancels superseded ones, persists
//! preferences, paints frames and feeds completions back into the kernel.
//!
//! Everything runs on one thread. Operations in flight live in a
//! [`FuturesUnordered`] that is polled alongside incoming UI events and the
//! postcode debounce deadline.
//!
//! ## Example
//!
//! ```ignore
//! use stookwijzer::{Runtime, RuntimeSettings, UiEvent};
//! use stookwijzer::runtime::{MemoryStorage, SystemClock};
//!
//! let mut runtime = Runtime::new(client, locator, storage, renderer, SystemClock, settings);
//! runtime.dispatch(UiEvent::Startup);
//! runtime.settle().await;
//! ```

use std::time::Duration;

use futures::StreamExt;
use futures::future::{FutureExt, LocalBoxFuture};
use futures::stream::FuturesUnordered;
use stookwijzer_kernel::{
    Clock, Debouncer, Effect, Input, LocateOutcome, LookupOutcome, POSTCODE_KEY, Renderer,
    Session, Storage, StorageError, THEME_KEY, apply,
};
use stookwijzer_types::{GeoPoint, Instant, LookupQuery, LookupRequest, SequenceId, Theme};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::location::{self, LocateOptions, LocationProvider};
use crate::source::{FeatureSource, lookup_outcome};

/// What the user did.
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    /// The page loaded.
    Startup,
    /// The check button, with the coordinate fields as typed.
    CheckCoordinates { latitude: String, longitude: String },
    /// A keystroke changed the postcode field.
    PostcodeEdited(String),
    PostcodeBlurred,
    PostcodeEnter,
    PostcodeSubmitted,
    PostcodeEscape,
    Locate,
    Demo,
    Refresh,
    ToggleTheme,
    SetTheme(Theme),
}

/// Runtime knobs that come from configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RuntimeSettings {
    pub demo_point: GeoPoint,
    pub locate: LocateOptions,
    pub debounce: Duration,
}

impl Default for RuntimeSettings {
    fn default() -> Self {
        Self {
            demo_point: GeoPoint::new(5.1214, 52.0907),
            locate: LocateOptions::default(),
            debounce: stookwijzer_kernel::debounce::DEFAULT_DELAY,
        }
    }
}

/// An operation that finished, before it is stamped and fed to the kernel.
enum Completion {
    Lookup {
        request: LookupRequest,
        outcome: LookupOutcome,
    },
    Location {
        sequence: SequenceId,
        outcome: LocateOutcome,
    },
}

/// Runtime that executes kernel effects using pluggable seams.
///
/// Generic over the feature source, location provider, storage, renderer
/// and clock so tests can drive every IO edge by hand.
pub struct Runtime<F, L, S, R, C>
where
    F: FeatureSource,
    L: LocationProvider,
    S: Storage,
    R: Renderer,
    C: Clock,
{
    source: F,
    locator: L,
    storage: S,
    renderer: R,
    clock: C,
    settings: RuntimeSettings,

    session: Session,
    debouncer: Debouncer,
    /// Zero point for debounce deadlines.
    epoch: tokio::time::Instant,
    /// Token of the operation issued under the latest sequence id.
    active: Option<(SequenceId, CancellationToken)>,
    pending: FuturesUnordered<LocalBoxFuture<'static, Completion>>,
}

impl<F, L, S, R, C> Runtime<F, L, S, R, C>
where
    F: FeatureSource,
    L: LocationProvider,
    S: Storage,
    R: Renderer,
    C: Clock,
{
    pub fn new(
        source: F,
        locator: L,
        storage: S,
        renderer: R,
        clock: C,
        settings: RuntimeSettings,
    ) -> Self {
        Self {
            source,
            locator,
            storage,
            renderer,
            clock,
            settings,
            session: Session::new(),
            debouncer: Debouncer::new(settings.debounce),
            epoch: tokio::time::Instant::now(),
            active: None,
            pending: FuturesUnordered::new(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Operations started but not yet fed back.
    pub fn pending_operations(&self) -> usize {
        self.pending.len()
    }

    /// Whether anything can still change the session without user input.
    pub fn is_idle(&self) -> bool {
        self.pending.is_empty() && self.debouncer.deadline().is_none()
    }

    // ========================================================================
    // Events
    // ========================================================================

    /// Applies a user event and starts whatever IO it calls for.
    pub fn dispatch(&mut self, event: UiEvent) {
        debug!(?event, "ui event");
        match event {
            UiEvent::Startup => {
                let saved_postcode = self.storage.get(POSTCODE_KEY);
                let saved_theme = self.storage.get(THEME_KEY);
                self.feed(Input::Startup {
                    saved_postcode,
                    saved_theme,
                });
            }
            UiEvent::CheckCoordinates {
                latitude,
                longitude,
            } => self.feed(Input::CheckCoordinates {
                latitude,
                longitude,
            }),
            UiEvent::PostcodeEdited(text) => {
                let now = self.elapsed();
                self.debouncer
                    .edit(&text, self.session.last_postcode(), now);
                self.feed(Input::PostcodeEdited(text));
            }
            UiEvent::PostcodeBlurred => {
                self.feed(Input::PostcodeBlurred);
                self.flush_postcode();
            }
            UiEvent::PostcodeEnter | UiEvent::PostcodeSubmitted => self.flush_postcode(),
            UiEvent::PostcodeEscape => {
                let revert_to = self.debouncer.escape(self.session.last_postcode());
                self.feed(Input::PostcodeEscaped { revert_to });
            }
            UiEvent::Locate => self.feed(Input::RequestLocation),
            UiEvent::Demo => self.feed(Input::Demo(self.settings.demo_point)),
            UiEvent::Refresh => self.feed(Input::Refresh),
            UiEvent::ToggleTheme => self.feed(Input::ToggleTheme),
            UiEvent::SetTheme(theme) => self.feed(Input::SetTheme(theme)),
        }
    }

    /// Waits for the next completion or debounce deadline and applies it.
    ///
    /// Returns `false` when there is nothing left to wait for.
    pub async fn step(&mut self) -> bool {
        if self.is_idle() {
            return false;
        }
        let deadline = self.debouncer.deadline().map(|at| self.epoch + at);

        tokio::select! {
            Some(completion) = self.pending.next() => self.complete(completion),
            () = sleep_until(deadline) => self.fire_debounce(),
        }
        true
    }

    /// Steps until nothing is in flight and no deadline is armed.
    pub async fn settle(&mut self) {
        while self.step().await {}
    }

    /// Serves UI events until the channel closes, then settles.
    pub async fn run(&mut self, mut events: mpsc::Receiver<UiEvent>) {
        loop {
            let deadline = self.debouncer.deadline().map(|at| self.epoch + at);
            tokio::select! {
                event = events.recv() => match event {
                    Some(event) => self.dispatch(event),
                    None => break,
                },
                Some(completion) = self.pending.next(), if !self.pending.is_empty() => {
                    self.complete(completion);
                }
                () = sleep_until(deadline) => self.fire_debounce(),
            }
        }
        self.settle().await;
    }

    // ========================================================================
    // Kernel plumbing
    // ========================================================================

    fn feed(&mut self, input: Input) {
        let session = std::mem::take(&mut self.session);
        let (session, effects) = apply(session, input);
        self.session = session;
        self.execute_effects(effects);
    }

    fn complete(&mut self, completion: Completion) {
        let at = self.clock.now();
        let input = match completion {
            Completion::Lookup { request, outcome } => {
                if request.sequence != self.session.latest() {
                    debug!(sequence = %request.sequence, "discarding stale lookup");
                }
                if let LookupOutcome::Failed(reason) = &outcome {
                    warn!(sequence = %request.sequence, %reason, "lookup failed");
                }
                Input::LookupCompleted {
                    request,
                    outcome,
                    at,
                }
            }
            Completion::Location { sequence, outcome } => {
                if let LocateOutcome::Failed(error) = &outcome {
                    warn!(%sequence, %error, "location unavailable");
                }
                Input::LocationResolved { sequence, outcome }
            }
        };
        self.feed(input);
        self.release_finished();
    }

    fn flush_postcode(&mut self) {
        let text = self.session.frame().postcode_text.clone();
        if let Some(code) = self.debouncer.flush(&text, self.session.last_postcode()) {
            self.feed(Input::CheckPostcode(code));
        }
    }

    fn fire_debounce(&mut self) {
        let now = self.elapsed();
        if let Some(code) = self.debouncer.fire(now, self.session.last_postcode()) {
            debug!(postcode = %code, "debounced postcode released");
            self.feed(Input::CheckPostcode(code));
        }
    }

    fn elapsed(&self) -> Duration {
        tokio::time::Instant::now().saturating_duration_since(self.epoch)
    }

    /// Drops the active token once its operation is no longer in flight.
    fn release_finished(&mut self) {
        if let Some((sequence, _)) = &self.active
            && self.session.in_flight() != Some(*sequence)
        {
            self.active = None;
        }
    }

    // ========================================================================
    // Effect execution
    // ========================================================================

    pub fn execute_effects(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            self.execute_effect(effect);
        }
    }

    fn execute_effect(&mut self, effect: Effect) {
        match effect {
            Effect::Cancel(sequence) => {
                if let Some((active, token)) = self.active.take() {
                    if active == sequence {
                        debug!(%sequence, "cancelling superseded operation");
                        token.cancel();
                    } else {
                        self.active = Some((active, token));
                    }
                }
            }
            Effect::Fetch(request) => {
                info!(sequence = %request.sequence, mode = ?request.mode(), "lookup issued");
                let token = self.activate(request.sequence);
                let source = self.source.clone();
                let fetch = match &request.query {
                    LookupQuery::ByLocation(point) => {
                        source.fetch_by_location(*point, token).boxed_local()
                    }
                    LookupQuery::ByPostcode(code) => {
                        source.fetch_by_postcode(code.clone(), token).boxed_local()
                    }
                };
                self.pending.push(
                    async move {
                        let outcome = lookup_outcome(fetch.await);
                        Completion::Lookup { request, outcome }
                    }
                    .boxed_local(),
                );
            }
            Effect::AcquireLocation { sequence } => {
                info!(%sequence, "location requested");
                let token = self.activate(sequence);
                let locate = location::acquire(self.locator.clone(), self.settings.locate);
                self.pending.push(
                    async move {
                        let outcome = tokio::select! {
                            biased;
                            () = token.cancelled() => LocateOutcome::Cancelled,
                            result = locate => match result {
                                Ok(point) => LocateOutcome::Fixed(point),
                                Err(error) => LocateOutcome::Failed(error),
                            },
                        };
                        Completion::Location { sequence, outcome }
                    }
                    .boxed_local(),
                );
            }
            Effect::PersistPostcode(code) => {
                self.persist(POSTCODE_KEY, code.as_str());
            }
            Effect::PersistTheme(theme) => {
                self.persist(THEME_KEY, theme.as_str());
            }
            Effect::Render => self.renderer.render(self.session.frame()),
        }
    }

    fn activate(&mut self, sequence: SequenceId) -> CancellationToken {
        let token = CancellationToken::new();
        self.active = Some((sequence, token.clone()));
        token
    }

    fn persist(&mut self, key: &str, value: &str) {
        if let Err(StorageError { key, reason }) = self.storage.set(key, value) {
            warn!(%key, %reason, "preference not saved");
        }
    }
}

async fn sleep_until(deadline: Option<tokio::time::Instant>) {
    match deadline {
        Some(at) => tokio::time::sleep_until(at).await,
        None => std::future::pending().await,
    }
}

// ============================================================================
// Production Implementations
// ============================================================================

/// System clock using the real wall time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl SystemClock {
    pub fn new() -> Self {
        Self
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        chrono::Utc::now()
    }
}

/// In-memory preference storage for tests and ephemeral sessions.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    values: std::collections::BTreeMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populates a key.
    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.values.insert(key.to_string(), value.to_string());
        self
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
