//! Runtime tests.
//!
//! The fake source hands every request to the test as a pending reply, so
//! tests decide when and in which order operations complete.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::future::Future;
use std::rc::Rc;
use std::time::Duration;

use chrono::{TimeZone, Utc};
use serde_json::json;
use stookwijzer_client::FetchError;
use stookwijzer_kernel::{
    Clock, Frame, POSTCODE_KEY, Phase, Renderer, StatusMessage, Storage, THEME_KEY,
    region_feature,
};
use stookwijzer_types::{
    GeoPoint, GeolocationError, Instant, LookupMode, LookupQuery, Postcode4, RegionFeature, Theme,
};
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;

use crate::location::StaticLocation;
use crate::runtime::{MemoryStorage, Runtime, RuntimeSettings, UiEvent};
use crate::source::{FeatureSource, FetchResult};

// ============================================================================
// Test Helpers
// ============================================================================

struct Call {
    query: LookupQuery,
    cancel: CancellationToken,
    reply: oneshot::Sender<FetchResult>,
}

impl Call {
    fn respond(self, result: FetchResult) {
        let _ = self.reply.send(result);
    }
}

#[derive(Clone, Default)]
struct FakeSource {
    calls: Rc<RefCell<VecDeque<Call>>>,
    /// Keep answering after cancellation, like a transport that cannot abort.
    ignore_cancel: bool,
}

impl FakeSource {
    fn stubborn() -> Self {
        Self {
            ignore_cancel: true,
            ..Self::default()
        }
    }

    fn take(&self) -> Call {
        self.calls
            .borrow_mut()
            .pop_front()
            .expect("no outstanding call")
    }

    fn outstanding(&self) -> usize {
        self.calls.borrow().len()
    }

    fn request(
        self,
        query: LookupQuery,
        cancel: CancellationToken,
    ) -> impl Future<Output = FetchResult> + 'static {
        let (reply, answer) = oneshot::channel();
        self.calls.borrow_mut().push_back(Call {
            query,
            cancel: cancel.clone(),
            reply,
        });
        let ignore_cancel = self.ignore_cancel;

        async move {
            if ignore_cancel {
                return answer.await.unwrap_or(Err(FetchError::Cancelled));
            }
            tokio::select! {
                biased;
                () = cancel.cancelled() => Err(FetchError::Cancelled),
                result = answer => result.unwrap_or(Err(FetchError::Cancelled)),
            }
        }
    }
}

impl FeatureSource for FakeSource {
    fn fetch_by_location(
        self,
        point: GeoPoint,
        cancel: CancellationToken,
    ) -> impl Future<Output = FetchResult> + 'static {
        self.request(LookupQuery::ByLocation(point), cancel)
    }

    fn fetch_by_postcode(
        self,
        code: Postcode4,
        cancel: CancellationToken,
    ) -> impl Future<Output = FetchResult> + 'static {
        self.request(LookupQuery::ByPostcode(code), cancel)
    }
}

#[derive(Default)]
struct Recorder {
    frames: Vec<Frame>,
}

impl Renderer for Recorder {
    fn render(&mut self, frame: &Frame) {
        self.frames.push(frame.clone());
    }
}

struct FixedClock(Instant);

impl Clock for FixedClock {
    fn now(&self) -> Instant {
        self.0
    }
}

type TestRuntime = Runtime<FakeSource, StaticLocation, MemoryStorage, Recorder, FixedClock>;

fn now() -> Instant {
    Utc.with_ymd_and_hms(2026, 1, 15, 12, 0, 0).unwrap()
}

fn utrecht() -> GeoPoint {
    GeoPoint::new(5.1214, 52.0907)
}

fn code(s: &str) -> Postcode4 {
    Postcode4::parse(s).unwrap()
}

fn feature(pc4: &str, advice: i64) -> RegionFeature {
    let properties = json!({
        "pc4": pc4,
        "model_runtime": "15-01-2026 06:00",
        "advies_0": advice, "advies_6": advice, "advies_12": advice, "advies_18": advice,
        "definitief_0": true, "definitief_6": true, "definitief_12": false, "definitief_18": false,
    });
    let serde_json::Value::Object(properties) = properties else {
        unreachable!()
    };
    region_feature(&properties, None)
}

fn runtime_with(
    source: &FakeSource,
    locator: StaticLocation,
    storage: MemoryStorage,
) -> TestRuntime {
    Runtime::new(
        source.clone(),
        locator,
        storage,
        Recorder::default(),
        FixedClock(now()),
        RuntimeSettings::default(),
    )
}

fn runtime(source: &FakeSource) -> TestRuntime {
    runtime_with(source, StaticLocation::Unsupported, MemoryStorage::new())
}

fn check(point: GeoPoint) -> UiEvent {
    UiEvent::CheckCoordinates {
        latitude: point.lat().to_string(),
        longitude: point.lon().to_string(),
    }
}

fn resolved_postcode(runtime: &TestRuntime) -> Option<String> {
    runtime
        .session()
        .feature()
        .and_then(|f| f.postcode.as_ref())
        .map(ToString::to_string)
}

// ============================================================================
// Startup and persistence
// ============================================================================

#[tokio::test]
async fn startup_restores_preferences_and_looks_up_saved_postcode() {
    let source = FakeSource::default();
    let storage = MemoryStorage::new()
        .with(POSTCODE_KEY, "3811")
        .with(THEME_KEY, "light");
    let mut runtime = runtime_with(&source, StaticLocation::Unsupported, storage);

    runtime.dispatch(UiEvent::Startup);
    assert_eq!(runtime.session().frame().theme, Theme::Light);

    let call = source.take();
    assert_eq!(call.query, LookupQuery::ByPostcode(code("3811")));
    call.respond(Ok(Some(feature("3811", 1))));
    runtime.settle().await;

    assert_eq!(runtime.session().phase(), Phase::Success);
    assert_eq!(resolved_postcode(&runtime).as_deref(), Some("3811"));
    assert!(runtime.session().frame().result.is_some());
    assert!(!runtime.session().frame().busy);
}

#[tokio::test]
async fn accepted_postcode_is_persisted() {
    let source = FakeSource::default();
    let mut runtime = runtime(&source);

    runtime.dispatch(UiEvent::PostcodeEdited("1012".to_string()));
    runtime.dispatch(UiEvent::PostcodeSubmitted);
    source.take().respond(Ok(Some(feature("1012", 2))));
    runtime.settle().await;

    assert_eq!(runtime.storage().get(POSTCODE_KEY).as_deref(), Some("1012"));
}

#[tokio::test]
async fn theme_toggle_is_persisted_and_rendered() {
    let source = FakeSource::default();
    let mut runtime = runtime(&source);

    runtime.dispatch(UiEvent::ToggleTheme);

    assert_eq!(runtime.storage().get(THEME_KEY).as_deref(), Some("light"));
    let last = runtime.renderer().frames.last().expect("nothing rendered");
    assert_eq!(last.theme, Theme::Light);
    assert!(runtime.is_idle());
}

// ============================================================================
// Latest wins
// ============================================================================

#[tokio::test]
async fn superseded_lookup_is_cancelled() {
    let source = FakeSource::default();
    let mut runtime = runtime(&source);

    runtime.dispatch(check(utrecht()));
    runtime.dispatch(check(GeoPoint::new(4.89, 52.37)));
    assert_eq!(source.outstanding(), 2);

    let first = source.take();
    let second = source.take();
    assert!(first.cancel.is_cancelled());
    assert!(!second.cancel.is_cancelled());

    // The cancelled fetch finishes on its own and changes nothing.
    assert!(runtime.step().await);
    assert_eq!(runtime.pending_operations(), 1);
    assert!(runtime.session().is_busy());

    second.respond(Ok(Some(feature("1012", 3))));
    runtime.settle().await;
    assert_eq!(resolved_postcode(&runtime).as_deref(), Some("1012"));
}

#[tokio::test]
async fn late_response_from_superseded_lookup_is_discarded() {
    let source = FakeSource::stubborn();
    let mut runtime = runtime(&source);

    runtime.dispatch(check(utrecht()));
    runtime.dispatch(check(GeoPoint::new(4.89, 52.37)));
    let first = source.take();
    let second = source.take();

    second.respond(Ok(Some(feature("1012", 3))));
    assert!(runtime.step().await);
    let after_latest = runtime.session().clone();

    first.respond(Ok(Some(feature("3511", 1))));
    assert!(runtime.step().await);

    assert_eq!(runtime.session(), &after_latest);
    assert_eq!(resolved_postcode(&runtime).as_deref(), Some("1012"));
    assert!(runtime.is_idle());
}

#[tokio::test]
async fn late_failure_from_superseded_lookup_is_discarded() {
    let source = FakeSource::stubborn();
    let mut runtime = runtime(&source);

    runtime.dispatch(check(utrecht()));
    runtime.dispatch(check(GeoPoint::new(4.89, 52.37)));
    let first = source.take();
    let second = source.take();

    second.respond(Ok(Some(feature("1012", 3))));
    runtime.step().await;
    first.respond(Err(FetchError::Network {
        status: 503,
        body: "down".to_string(),
    }));
    runtime.settle().await;

    assert_eq!(runtime.session().phase(), Phase::Success);
    assert_eq!(runtime.session().frame().status, None);
}

// ============================================================================
// Outcomes
// ============================================================================

#[tokio::test]
async fn unknown_postcode_reports_no_result() {
    let source = FakeSource::default();
    let mut runtime = runtime(&source);

    runtime.dispatch(UiEvent::PostcodeEdited("9999".to_string()));
    runtime.dispatch(UiEvent::PostcodeEnter);
    source.take().respond(Ok(None));
    runtime.settle().await;

    assert_eq!(runtime.session().phase(), Phase::NoResult);
    assert_eq!(
        runtime.session().frame().status,
        Some(StatusMessage::NoResultForPostcode)
    );
    assert_eq!(runtime.storage().get(POSTCODE_KEY), None);
}

#[tokio::test]
async fn failure_keeps_previous_feature() {
    let source = FakeSource::default();
    let mut runtime = runtime(&source);

    runtime.dispatch(check(utrecht()));
    source.take().respond(Ok(Some(feature("3511", 1))));
    runtime.settle().await;

    runtime.dispatch(UiEvent::Refresh);
    source.take().respond(Err(FetchError::Network {
        status: 500,
        body: "boom".to_string(),
    }));
    runtime.settle().await;

    assert_eq!(runtime.session().phase(), Phase::Failed);
    assert_eq!(
        runtime.session().frame().status,
        Some(StatusMessage::FetchFailed)
    );
    assert_eq!(resolved_postcode(&runtime).as_deref(), Some("3511"));
    assert!(runtime.session().last_error().is_some());
}

#[tokio::test]
async fn every_frame_change_is_rendered_once() {
    let source = FakeSource::default();
    let mut runtime = runtime(&source);

    runtime.dispatch(check(utrecht()));
    source.take().respond(Ok(Some(feature("3511", 1))));
    runtime.settle().await;

    let frames = &runtime.renderer().frames;
    assert_eq!(frames.len(), 2);
    assert!(frames[0].busy);
    assert!(frames[1].result.is_some());
    assert_eq!(frames.last(), Some(runtime.session().frame()));
}

// ============================================================================
// Postcode input
// ============================================================================

#[tokio::test(start_paused = true)]
async fn typing_is_debounced() {
    let source = FakeSource::default();
    let mut runtime = runtime(&source);
    let started = tokio::time::Instant::now();

    runtime.dispatch(UiEvent::PostcodeEdited("38".to_string()));
    runtime.dispatch(UiEvent::PostcodeEdited("381".to_string()));
    runtime.dispatch(UiEvent::PostcodeEdited("3811".to_string()));
    assert_eq!(source.outstanding(), 0);

    assert!(runtime.step().await);
    assert!(started.elapsed() >= Duration::from_millis(350));
    assert_eq!(source.outstanding(), 1);
    assert_eq!(source.take().query, LookupQuery::ByPostcode(code("3811")));
}

#[tokio::test(start_paused = true)]
async fn blur_looks_up_immediately_and_disarms_the_timer() {
    let source = FakeSource::default();
    let mut runtime = runtime(&source);

    runtime.dispatch(UiEvent::PostcodeEdited("1012".to_string()));
    runtime.dispatch(UiEvent::PostcodeBlurred);
    assert_eq!(source.outstanding(), 1);
    assert!(!runtime.session().frame().postcode_focused);

    source.take().respond(Ok(Some(feature("1012", 1))));
    runtime.settle().await;
    assert_eq!(source.outstanding(), 0);
}

#[tokio::test(start_paused = true)]
async fn accepted_postcode_is_not_looked_up_again() {
    let source = FakeSource::default();
    let mut runtime = runtime(&source);

    runtime.dispatch(UiEvent::PostcodeEdited("1012".to_string()));
    runtime.dispatch(UiEvent::PostcodeSubmitted);
    source.take().respond(Ok(Some(feature("1012", 1))));
    runtime.settle().await;

    runtime.dispatch(UiEvent::PostcodeEdited("1012 ".to_string()));
    assert!(runtime.is_idle());
    runtime.dispatch(UiEvent::PostcodeEnter);
    assert_eq!(source.outstanding(), 0);
}

#[tokio::test(start_paused = true)]
async fn escape_reverts_without_lookup() {
    let source = FakeSource::default();
    let mut runtime = runtime(&source);

    runtime.dispatch(UiEvent::PostcodeEdited("1012".to_string()));
    runtime.dispatch(UiEvent::PostcodeSubmitted);
    source.take().respond(Ok(Some(feature("1012", 1))));
    runtime.settle().await;

    runtime.dispatch(UiEvent::PostcodeEdited("3811".to_string()));
    runtime.dispatch(UiEvent::PostcodeEscape);

    assert!(!runtime.step().await);
    assert_eq!(source.outstanding(), 0);
    assert_eq!(runtime.session().frame().postcode_text, "1012");
}

// ============================================================================
// Location
// ============================================================================

#[tokio::test]
async fn location_fix_starts_a_location_lookup() {
    let source = FakeSource::default();
    let mut runtime = runtime_with(
        &source,
        StaticLocation::Fixed(utrecht()),
        MemoryStorage::new(),
    );

    runtime.dispatch(UiEvent::Locate);
    assert_eq!(
        runtime.session().frame().status,
        Some(StatusMessage::Locating)
    );

    assert!(runtime.step().await);
    let call = source.take();
    assert_eq!(call.query, LookupQuery::ByLocation(utrecht()));
    assert_eq!(
        runtime.session().frame().status,
        Some(StatusMessage::LocationFound)
    );

    call.respond(Ok(Some(feature("3511", 0))));
    runtime.settle().await;
    assert_eq!(runtime.session().resolved_by(), Some(LookupMode::ByLocation));
    assert_eq!(runtime.session().frame().coordinates, Some(utrecht()));
}

#[tokio::test]
async fn unsupported_location_reports_unavailable() {
    let source = FakeSource::default();
    let mut runtime = runtime(&source);

    runtime.dispatch(UiEvent::Startup);
    runtime.settle().await;

    assert_eq!(runtime.session().phase(), Phase::Failed);
    assert_eq!(
        runtime.session().frame().status,
        Some(StatusMessage::LocationUnavailable)
    );
    assert_eq!(source.outstanding(), 0);
}

#[tokio::test]
async fn location_fix_superseded_by_postcode_is_ignored() {
    let source = FakeSource::default();
    let mut runtime = runtime_with(
        &source,
        StaticLocation::Fixed(utrecht()),
        MemoryStorage::new(),
    );

    runtime.dispatch(UiEvent::Locate);
    runtime.dispatch(UiEvent::PostcodeEdited("1012".to_string()));
    runtime.dispatch(UiEvent::PostcodeSubmitted);

    // The location request was cancelled and the postcode lookup is the only fetch.
    assert!(runtime.step().await);
    assert_eq!(source.outstanding(), 1);
    let call = source.take();
    assert_eq!(call.query, LookupQuery::ByPostcode(code("1012")));

    call.respond(Ok(Some(feature("1012", 2))));
    runtime.settle().await;
    assert_eq!(runtime.session().resolved_by(), Some(LookupMode::ByPostcode));
}

#[tokio::test]
async fn demo_checks_the_demo_point() {
    let source = FakeSource::default();
    let mut runtime = runtime(&source);

    runtime.dispatch(UiEvent::Demo);

    assert_eq!(
        runtime.session().frame().status,
        Some(StatusMessage::DemoFilled)
    );
    assert_eq!(
        source.take().query,
        LookupQuery::ByLocation(RuntimeSettings::default().demo_point)
    );
}

#[test]
fn geolocation_errors_read_well() {
    assert_eq!(
        GeolocationError::PermissionDenied.to_string(),
        "location permission denied"
    );
}
