//! The coordinator - pure functional core of `Stookwijzer`.
//!
//! [`apply`] folds one input into the session and returns the effects the
//! runtime must perform. It never touches the network, a clock or storage.
//!
//! Every trigger takes the next sequence id and cancels whatever was in
//! flight. A completion is applied only if its sequence id is still the
//! latest; anything older is dropped without a trace, and cancellations are
//! never shown.
//!
//! # Example
//!
//! ```ignore
//! let session = Session::new();
//! let (session, effects) = apply(session, Input::RequestLocation);
//! // Runtime executes effects, then feeds completions back in...
//! ```

use stookwijzer_types::{GeoPoint, Instant, LookupQuery, LookupRequest, Postcode4, Theme};

use crate::effects::Effect;
use crate::input::{Input, LocateOutcome, LookupOutcome, parse_coordinates};
use crate::state::{Phase, Session, StatusMessage};
use crate::view::{Headline, Tone, build_view};

/// Applies an input to the session, producing the next session and effects.
///
/// Takes ownership of the session; nothing is cloned except the frame used to
/// decide whether a render is needed.
pub fn apply(session: Session, input: Input) -> (Session, Vec<Effect>) {
    let before = session.frame().clone();
    let mut effects = Vec::new();

    let session = match input {
        // ====================================================================
        // Triggers
        // ====================================================================
        Input::Startup {
            saved_postcode,
            saved_theme,
        } => {
            let mut session = session;
            session.frame_mut().theme = Theme::from_name(saved_theme.as_deref());

            match saved_postcode.as_deref().and_then(Postcode4::normalize) {
                Some(code) => {
                    session.frame_mut().postcode_text = code.to_string();
                    let session = session.with_last_postcode(Some(code.clone()));
                    issue_lookup(
                        session,
                        LookupQuery::ByPostcode(code),
                        StatusMessage::Loading,
                        &mut effects,
                    )
                }
                None => request_location(session, &mut effects),
            }
        }

        Input::CheckCoordinates {
            latitude,
            longitude,
        } => match parse_coordinates(&latitude, &longitude) {
            Ok(point) => check_point(session, point, StatusMessage::Loading, &mut effects),
            Err(error) => {
                // Still supersedes whatever was in flight.
                let (mut session, _, superseded) = session.with_next_sequence();
                effects.extend(superseded.map(Effect::Cancel));
                let frame = session.frame_mut();
                frame.busy = false;
                frame.status = Some(StatusMessage::MissingCoordinates);
                session.with_phase(Phase::Idle).with_error(error.to_string())
            }
        },

        Input::CheckPostcode(code) => issue_lookup(
            session,
            LookupQuery::ByPostcode(code),
            StatusMessage::Loading,
            &mut effects,
        ),

        Input::RequestLocation => request_location(session, &mut effects),

        Input::Demo(point) => check_point(session, point, StatusMessage::DemoFilled, &mut effects),

        Input::Refresh => {
            if let Some(code) = session.last_postcode().cloned() {
                issue_lookup(
                    session,
                    LookupQuery::ByPostcode(code),
                    StatusMessage::Loading,
                    &mut effects,
                )
            } else if let Some(point) = session.frame().coordinates {
                check_point(session, point, StatusMessage::Loading, &mut effects)
            } else {
                request_location(session, &mut effects)
            }
        }

        // ====================================================================
        // Preferences and field state
        // ====================================================================
        Input::ToggleTheme => {
            let theme = session.frame().theme.toggled();
            set_theme(session, theme, &mut effects)
        }

        Input::SetTheme(theme) => set_theme(session, theme, &mut effects),

        Input::PostcodeEdited(text) => {
            let mut session = session;
            let frame = session.frame_mut();
            frame.postcode_text = text;
            frame.postcode_focused = true;
            session
        }

        Input::PostcodeBlurred => {
            let mut session = session;
            session.frame_mut().postcode_focused = false;
            session
        }

        Input::PostcodeEscaped { revert_to } => {
            let mut session = session;
            let frame = session.frame_mut();
            if let Some(code) = revert_to {
                frame.postcode_text = code.to_string();
            }
            frame.postcode_focused = false;
            session
        }

        // ====================================================================
        // Completions
        // ====================================================================
        Input::LookupCompleted {
            request,
            outcome,
            at,
        } => {
            if matches!(outcome, LookupOutcome::Cancelled) || !session.is_latest(request.sequence)
            {
                return (session, effects);
            }
            complete_lookup(session, request, outcome, at, &mut effects)
        }

        Input::LocationResolved { sequence, outcome } => {
            if matches!(outcome, LocateOutcome::Cancelled) || !session.is_latest(sequence) {
                return (session, effects);
            }
            match outcome {
                LocateOutcome::Fixed(point) => {
                    let session = session.with_phase(Phase::Idle);
                    check_point(session, point, StatusMessage::LocationFound, &mut effects)
                }
                LocateOutcome::Failed(error) => {
                    let mut session = session;
                    let frame = session.frame_mut();
                    frame.busy = false;
                    frame.status = Some(StatusMessage::LocationUnavailable);
                    session.with_phase(Phase::Failed).with_error(error.to_string())
                }
                LocateOutcome::Cancelled => session,
            }
        }
    };

    if *session.frame() != before {
        effects.push(Effect::Render);
    }
    (session, effects)
}

/// Takes the next sequence id and starts a geodata lookup under it.
fn issue_lookup(
    session: Session,
    query: LookupQuery,
    status: StatusMessage,
    effects: &mut Vec<Effect>,
) -> Session {
    let (mut session, sequence, superseded) = session.with_next_sequence();
    effects.extend(superseded.map(Effect::Cancel));

    let frame = session.frame_mut();
    frame.busy = true;
    frame.status = Some(status);
    frame.result = None;

    effects.push(Effect::Fetch(LookupRequest::new(sequence, query)));
    session.with_phase(Phase::Loading { sequence })
}

fn check_point(
    mut session: Session,
    point: GeoPoint,
    status: StatusMessage,
    effects: &mut Vec<Effect>,
) -> Session {
    session.frame_mut().coordinates = Some(point);
    issue_lookup(session, LookupQuery::ByLocation(point), status, effects)
}

fn request_location(session: Session, effects: &mut Vec<Effect>) -> Session {
    let (mut session, sequence, superseded) = session.with_next_sequence();
    effects.extend(superseded.map(Effect::Cancel));

    let frame = session.frame_mut();
    frame.busy = true;
    frame.status = Some(StatusMessage::Locating);

    effects.push(Effect::AcquireLocation { sequence });
    session.with_phase(Phase::Locating { sequence })
}

fn set_theme(mut session: Session, theme: Theme, effects: &mut Vec<Effect>) -> Session {
    session.frame_mut().theme = theme;
    effects.push(Effect::PersistTheme(theme));
    session
}

fn complete_lookup(
    mut session: Session,
    request: LookupRequest,
    outcome: LookupOutcome,
    at: Instant,
    effects: &mut Vec<Effect>,
) -> Session {
    let mode = request.mode();
    let frame = session.frame_mut();
    frame.busy = false;

    match outcome {
        LookupOutcome::Found(feature) => {
            let view = build_view(&feature, at);
            frame.status = None;
            frame.tone = view.tone;
            frame.headline = view.headline;
            if let Some(code) = &feature.postcode
                && !frame.postcode_focused
            {
                frame.postcode_text = code.to_string();
            }
            frame.result = Some(view);

            let session = match request.query {
                LookupQuery::ByPostcode(code) => {
                    effects.push(Effect::PersistPostcode(code.clone()));
                    session.with_last_postcode(Some(code))
                }
                LookupQuery::ByLocation(point) => {
                    session.frame_mut().coordinates = Some(point);
                    session.with_last_postcode(None)
                }
            };
            session
                .with_phase(Phase::Success)
                .with_feature(*feature, mode)
        }

        LookupOutcome::NoResult => {
            frame.status = Some(StatusMessage::no_result(mode));
            frame.tone = Tone::Neutral;
            frame.headline = Headline::unknown();
            frame.result = None;
            session.with_phase(Phase::NoResult).without_feature()
        }

        LookupOutcome::Failed(reason) => {
            frame.status = Some(StatusMessage::FetchFailed);
            frame.tone = Tone::Neutral;
            session.with_phase(Phase::Failed).with_error(reason)
        }

        LookupOutcome::Cancelled => session,
    }
}
