//! Unit tests for stookwijzer-kernel
//!
//! The coordinator is pure (no IO), so every path is driven by feeding
//! inputs and inspecting the returned session and effects.

use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use serde_json::json;
use stookwijzer_types::{
    AdviceCode, Finality, GeoPoint, GeolocationError, LookupMode, LookupQuery, LookupRequest,
    Postcode4, RegionFeature, SequenceId, Theme,
};

use crate::effects::Effect;
use crate::feature::region_feature;
use crate::input::{Input, LocateOutcome, LookupOutcome};
use crate::kernel::apply;
use crate::segments::SegmentPosition;
use crate::state::{Phase, Session, StatusMessage};
use crate::view::Tone;

// ============================================================================
// Test Helpers
// ============================================================================

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 15, 12, 0, 0).unwrap()
}

fn utrecht() -> GeoPoint {
    GeoPoint::new(5.1214, 52.0907)
}

fn code(text: &str) -> Postcode4 {
    Postcode4::parse(text).unwrap()
}

/// A feature for `pc4` whose model ran at 06:00 Amsterdam time today.
fn test_feature(pc4: &str, advice: i64) -> RegionFeature {
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

/// Applies an input, discarding effects.
fn step(session: Session, input: Input) -> Session {
    apply(session, input).0
}

/// The fetch request among `effects`.
fn fetched(effects: &[Effect]) -> LookupRequest {
    effects
        .iter()
        .find_map(|e| match e {
            Effect::Fetch(request) => Some(request.clone()),
            _ => None,
        })
        .expect("no fetch effect")
}

fn check(point: GeoPoint) -> Input {
    Input::CheckCoordinates {
        latitude: point.lat().to_string(),
        longitude: point.lon().to_string(),
    }
}

fn found(request: &LookupRequest, feature: RegionFeature) -> Input {
    Input::LookupCompleted {
        request: request.clone(),
        outcome: LookupOutcome::Found(Box::new(feature)),
        at: now(),
    }
}

fn completed(request: &LookupRequest, outcome: LookupOutcome) -> Input {
    Input::LookupCompleted {
        request: request.clone(),
        outcome,
        at: now(),
    }
}

/// A session that has resolved `pc4` by postcode.
fn session_with_postcode(pc4: &str) -> Session {
    let (session, effects) = apply(Session::new(), Input::CheckPostcode(code(pc4)));
    let request = fetched(&effects);
    step(session, found(&request, test_feature(pc4, 1)))
}

// ============================================================================
// Startup
// ============================================================================

#[test]
fn startup_restores_saved_postcode() {
    let (session, effects) = apply(
        Session::new(),
        Input::Startup {
            saved_postcode: Some(" 3811 ab".into()),
            saved_theme: Some("light".into()),
        },
    );

    let request = fetched(&effects);
    assert_eq!(request.query, LookupQuery::ByPostcode(code("3811")));
    assert_eq!(request.sequence, SequenceId::new(1));
    assert_eq!(session.last_postcode(), Some(&code("3811")));
    assert_eq!(session.frame().postcode_text, "3811");
    assert_eq!(session.frame().theme, Theme::Light);
    assert!(session.is_busy());
    assert!(effects.contains(&Effect::Render));
}

#[test]
fn startup_without_valid_postcode_locates() {
    let (session, effects) = apply(
        Session::new(),
        Input::Startup {
            saved_postcode: Some("garbage".into()),
            saved_theme: None,
        },
    );

    assert!(effects.contains(&Effect::AcquireLocation {
        sequence: SequenceId::new(1)
    }));
    assert_eq!(session.frame().status, Some(StatusMessage::Locating));
    assert_eq!(session.frame().theme, Theme::Dark);
    assert_eq!(session.last_postcode(), None);
}

// ============================================================================
// Sequencing
// ============================================================================

#[test]
fn new_trigger_cancels_in_flight() {
    let (session, first) = apply(Session::new(), check(utrecht()));
    let a = fetched(&first);
    assert!(!first.iter().any(|e| matches!(e, Effect::Cancel(_))));

    let (session, second) = apply(session, Input::CheckPostcode(code("3811")));
    let b = fetched(&second);

    assert_eq!(second[0], Effect::Cancel(a.sequence));
    assert!(b.sequence > a.sequence);
    assert_eq!(session.in_flight(), Some(b.sequence));
    assert_eq!(session.phase(), Phase::Loading { sequence: b.sequence });
}

#[test]
fn late_completion_of_superseded_request_is_ignored() {
    let (session, effects) = apply(Session::new(), check(utrecht()));
    let a = fetched(&effects);
    let (session, effects) = apply(session, Input::CheckPostcode(code("3811")));
    let b = fetched(&effects);

    // B resolves first, then A straggles in.
    let session = step(session, found(&b, test_feature("3811", 2)));
    let settled = session.clone();
    let (session, effects) = apply(session, found(&a, test_feature("3511", 0)));

    assert!(effects.is_empty());
    assert_eq!(session, settled);
    assert_eq!(session.feature().unwrap().postcode, Some(code("3811")));
    assert_eq!(session.resolved_by(), Some(LookupMode::ByPostcode));
    assert_eq!(session.frame().tone, Tone::Red);
}

#[test]
fn late_failure_of_superseded_request_is_ignored() {
    let (session, effects) = apply(Session::new(), check(utrecht()));
    let a = fetched(&effects);
    let (session, _) = apply(session, Input::CheckPostcode(code("3811")));

    let before = session.clone();
    let (session, effects) = apply(session, completed(&a, LookupOutcome::Failed("503".into())));
    assert!(effects.is_empty());
    assert_eq!(session, before);
    assert!(session.is_busy());
}

#[test]
fn cancellation_is_never_shown() {
    let session = session_with_postcode("3811");
    let (session, effects) = apply(session, Input::CheckPostcode(code("1012")));
    let request = fetched(&effects);

    // Even the latest request stays silent when it reports cancellation.
    let before = session.clone();
    let (session, effects) = apply(session, completed(&request, LookupOutcome::Cancelled));
    assert!(effects.is_empty());
    assert_eq!(session, before);
    assert_eq!(session.frame().status, Some(StatusMessage::Loading));
    assert_eq!(session.feature().unwrap().postcode, Some(code("3811")));
}

// ============================================================================
// Outcomes
// ============================================================================

#[test]
fn postcode_success_persists_and_renders() {
    let (session, effects) = apply(Session::new(), Input::CheckPostcode(code("3811")));
    let request = fetched(&effects);
    let (session, effects) = apply(session, found(&request, test_feature("3811", 0)));

    assert!(effects.contains(&Effect::PersistPostcode(code("3811"))));
    assert!(effects.contains(&Effect::Render));
    assert_eq!(session.phase(), Phase::Success);
    assert_eq!(session.last_postcode(), Some(&code("3811")));
    assert_eq!(session.in_flight(), None);

    let frame = session.frame();
    assert!(!frame.busy);
    assert_eq!(frame.status, None);
    assert_eq!(frame.tone, Tone::Yellow);
    assert_eq!(frame.headline.headline, "LET OP");
    assert_eq!(frame.result.as_ref().unwrap().postcode, "3811");
}

#[test]
fn location_success_clears_accepted_postcode() {
    let session = session_with_postcode("3811");
    let (session, effects) = apply(session, check(utrecht()));
    let request = fetched(&effects);
    let (session, effects) = apply(session, found(&request, test_feature("3511", 2)));

    assert!(!effects.iter().any(|e| matches!(e, Effect::PersistPostcode(_))));
    assert_eq!(session.last_postcode(), None);
    assert_eq!(session.resolved_by(), Some(LookupMode::ByLocation));
    assert_eq!(session.frame().coordinates, Some(utrecht()));
    assert_eq!(session.frame().postcode_text, "3511");
}

#[test]
fn focused_postcode_field_is_not_overwritten() {
    let session = step(Session::new(), Input::PostcodeEdited("10".into()));
    let (session, effects) = apply(session, check(utrecht()));
    let request = fetched(&effects);
    let session = step(session, found(&request, test_feature("3511", 2)));
    assert_eq!(session.frame().postcode_text, "10");
}

#[test]
fn no_result_resets_to_unknown() {
    let session = session_with_postcode("3811");
    let (session, effects) = apply(session, check(utrecht()));
    let request = fetched(&effects);
    let session = step(session, completed(&request, LookupOutcome::NoResult));

    assert_eq!(session.phase(), Phase::NoResult);
    assert_eq!(session.feature(), None);
    let frame = session.frame();
    assert_eq!(frame.status, Some(StatusMessage::NoResultForLocation));
    assert_eq!(frame.tone, Tone::Neutral);
    assert_eq!(frame.headline.headline, "ONBEKEND");
    assert!(frame.result.is_none());
    assert!(!frame.busy);
}

#[test]
fn no_result_wording_depends_on_mode() {
    let (session, effects) = apply(Session::new(), Input::CheckPostcode(code("9999")));
    let request = fetched(&effects);
    let session = step(session, completed(&request, LookupOutcome::NoResult));
    assert_eq!(
        session.frame().status.map(StatusMessage::text),
        Some("Geen resultaat voor deze postcode.")
    );
}

#[test]
fn failure_keeps_feature_and_reenables() {
    let session = session_with_postcode("3811");
    let (session, effects) = apply(session, Input::Refresh);
    let request = fetched(&effects);
    let session = step(
        session,
        completed(&request, LookupOutcome::Failed("WFS request failed (502)".into())),
    );

    assert_eq!(session.phase(), Phase::Failed);
    assert_eq!(session.last_error(), Some("WFS request failed (502)"));
    assert_eq!(session.feature().unwrap().postcode, Some(code("3811")));
    let frame = session.frame();
    assert_eq!(frame.status, Some(StatusMessage::FetchFailed));
    assert_eq!(frame.tone, Tone::Neutral);
    assert!(!frame.busy);
}

// ============================================================================
// Triggers
// ============================================================================

#[test]
fn invalid_coordinates_supersede_without_fetching() {
    let (session, effects) = apply(Session::new(), check(utrecht()));
    let a = fetched(&effects);

    let (session, effects) = apply(
        session,
        Input::CheckCoordinates {
            latitude: String::new(),
            longitude: "5.1".into(),
        },
    );
    assert_eq!(effects[0], Effect::Cancel(a.sequence));
    assert!(!effects.iter().any(|e| matches!(e, Effect::Fetch(_))));
    assert_eq!(session.frame().status, Some(StatusMessage::MissingCoordinates));
    assert!(!session.is_busy());
    assert_eq!(session.in_flight(), None);

    // A's result no longer applies.
    let (_, effects) = apply(session, found(&a, test_feature("3511", 2)));
    assert!(effects.is_empty());
}

#[test]
fn refresh_prefers_postcode_then_coordinates_then_location() {
    let session = session_with_postcode("3811");
    let (_, effects) = apply(session, Input::Refresh);
    assert_eq!(fetched(&effects).query, LookupQuery::ByPostcode(code("3811")));

    let (session, effects) = apply(Session::new(), Input::Demo(utrecht()));
    let request = fetched(&effects);
    let session = step(session, completed(&request, LookupOutcome::Failed("x".into())));
    let (_, effects) = apply(session, Input::Refresh);
    assert_eq!(fetched(&effects).query, LookupQuery::ByLocation(utrecht()));

    let (_, effects) = apply(Session::new(), Input::Refresh);
    assert!(matches!(effects[0], Effect::AcquireLocation { .. }));
}

#[test]
fn demo_fills_coordinates() {
    let (session, effects) = apply(Session::new(), Input::Demo(utrecht()));
    assert_eq!(fetched(&effects).query, LookupQuery::ByLocation(utrecht()));
    assert_eq!(session.frame().coordinates, Some(utrecht()));
    assert_eq!(session.frame().status, Some(StatusMessage::DemoFilled));
}

#[test]
fn location_fix_starts_lookup() {
    let (session, effects) = apply(Session::new(), Input::RequestLocation);
    let Effect::AcquireLocation { sequence } = effects[0] else {
        panic!("expected location request, got {effects:?}");
    };
    assert_eq!(session.phase(), Phase::Locating { sequence });

    let (session, effects) = apply(
        session,
        Input::LocationResolved {
            sequence,
            outcome: LocateOutcome::Fixed(utrecht()),
        },
    );
    // The finished location request is not cancelled.
    assert!(!effects.iter().any(|e| matches!(e, Effect::Cancel(_))));
    let request = fetched(&effects);
    assert!(request.sequence > sequence);
    assert_eq!(request.query, LookupQuery::ByLocation(utrecht()));
    assert_eq!(session.frame().status, Some(StatusMessage::LocationFound));
}

#[test]
fn location_failure_is_reported() {
    let (session, effects) = apply(Session::new(), Input::RequestLocation);
    let Effect::AcquireLocation { sequence } = effects[0] else {
        panic!("expected location request");
    };
    let session = step(
        session,
        Input::LocationResolved {
            sequence,
            outcome: LocateOutcome::Failed(GeolocationError::PermissionDenied),
        },
    );
    assert_eq!(session.frame().status, Some(StatusMessage::LocationUnavailable));
    assert!(!session.is_busy());
    assert_eq!(session.last_error(), Some("location permission denied"));
}

#[test]
fn superseded_location_fix_is_ignored() {
    let (session, effects) = apply(Session::new(), Input::RequestLocation);
    let Effect::AcquireLocation { sequence } = effects[0] else {
        panic!("expected location request");
    };
    let (session, _) = apply(session, Input::CheckPostcode(code("3811")));
    let before = session.clone();
    let (session, effects) = apply(
        session,
        Input::LocationResolved {
            sequence,
            outcome: LocateOutcome::Fixed(utrecht()),
        },
    );
    assert!(effects.is_empty());
    assert_eq!(session, before);
}

// ============================================================================
// Preferences and field state
// ============================================================================

#[test]
fn theme_toggle_persists() {
    let (session, effects) = apply(Session::new(), Input::ToggleTheme);
    assert_eq!(session.frame().theme, Theme::Light);
    assert_eq!(effects, vec![Effect::PersistTheme(Theme::Light), Effect::Render]);

    let (session, _) = apply(session, Input::SetTheme(Theme::Dark));
    assert_eq!(session.frame().theme, Theme::Dark);
}

#[test]
fn escape_reverts_to_accepted_postcode() {
    let session = session_with_postcode("3811");
    let session = step(session, Input::PostcodeEdited("99".into()));
    assert!(session.frame().postcode_focused);

    let session = step(
        session,
        Input::PostcodeEscaped {
            revert_to: Some(code("3811")),
        },
    );
    assert_eq!(session.frame().postcode_text, "3811");
    assert!(!session.frame().postcode_focused);
}

#[test]
fn unchanged_frame_is_not_rendered() {
    let session = step(Session::new(), Input::PostcodeBlurred);
    let (_, effects) = apply(session, Input::PostcodeBlurred);
    assert!(effects.is_empty());
}

// ============================================================================
// End to end
// ============================================================================

#[test]
fn stale_forecast_shows_last_segment() {
    // Model ran 30 hours before `now`: every segment is in the past.
    let runtime = now() - TimeDelta::hours(30);
    let amsterdam = runtime.with_timezone(&crate::timezone::ADVISORY_ZONE);
    let properties = json!({
        "pc4": "3811",
        "model_runtime": amsterdam.format("%d-%m-%Y %H:%M").to_string(),
        "advies_0": 2, "advies_6": 1, "advies_12": 0, "advies_18": -1,
        "definitief_0": true, "definitief_6": true, "definitief_12": false,
    });
    let serde_json::Value::Object(properties) = properties else {
        unreachable!()
    };
    let feature = region_feature(&properties, None);
    assert_eq!(feature.model_runtime, Some(runtime));

    let (session, effects) = apply(Session::new(), Input::CheckPostcode(code("3811")));
    let request = fetched(&effects);
    let session = step(session, found(&request, feature));

    let view = session.frame().result.clone().unwrap();
    let resolved = view.current.resolved.unwrap();
    assert!(resolved.segment.end <= now());
    assert_eq!(resolved.position, SegmentPosition::Stale);
    assert_eq!(resolved.index, 3);
    assert_eq!(view.current.advice, AdviceCode::None);
    assert_eq!(view.current.finality, Finality::Unknown);
    assert_eq!(view.tone, Tone::Neutral);
    assert_eq!(view.segments.len(), 4);
}
