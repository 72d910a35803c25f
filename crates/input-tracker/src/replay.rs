//! Virtual-time replay of position scripts.
//!
//! Samples are delivered at their scripted timestamps and ticks are
//! generated on a fixed grid anchored at the first entry, so a replay gives
//! the same transitions on every run.

use serde::Serialize;
use shakefind_controller::{EnlargementController, EnlargementState, DWELL_MS};
use shakefind_platform_core::CursorHost;
use shakefind_pointer_model::ScriptedPosition;

/// A state change observed during replay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReplayEvent {
    pub at_ms: u64,
    #[serde(flatten)]
    pub state: EnlargementState,
}

/// Run `script` through `controller` and return every state change.
///
/// After the last entry ticks keep coming until the dwell of a pending
/// enlargement has run out.
pub fn replay<H: CursorHost>(
    controller: &mut EnlargementController<H>,
    script: &[ScriptedPosition],
    tick_interval_ms: u64,
) -> Vec<ReplayEvent> {
    let Some(first) = script.first() else {
        return Vec::new();
    };

    let interval = tick_interval_ms.max(1);
    // `None` once the tick grid runs past the end of the time range.
    let mut next_tick_ms = Some(first.timestamp_ms);
    let mut events = Vec::new();

    for entry in script {
        while let Some(at_ms) = next_tick_ms.filter(|&at| at <= entry.timestamp_ms) {
            tick(controller, at_ms, &mut events);
            next_tick_ms = at_ms.checked_add(interval);
        }

        let before = controller.state();
        if let Err(e) = controller.on_sample(entry.position(), entry.timestamp_ms) {
            tracing::debug!(error = %e, at_ms = entry.timestamp_ms, "Replay sample failed");
        }
        record(before, controller.state(), entry.timestamp_ms, &mut events);
    }

    let last_ms = script.last().map_or(first.timestamp_ms, |e| e.timestamp_ms);
    let drain_until_ms = last_ms
        .saturating_add(DWELL_MS)
        .saturating_add(interval.saturating_mul(2));
    while controller.state().is_enlarged() {
        let Some(at_ms) = next_tick_ms.filter(|&at| at <= drain_until_ms) else {
            break;
        };
        tick(controller, at_ms, &mut events);
        next_tick_ms = at_ms.checked_add(interval);
    }

    events
}

fn tick<H: CursorHost>(
    controller: &mut EnlargementController<H>,
    now_ms: u64,
    events: &mut Vec<ReplayEvent>,
) {
    let before = controller.state();
    if let Err(e) = controller.on_tick(now_ms) {
        tracing::debug!(error = %e, at_ms = now_ms, "Replay tick failed");
    }
    record(before, controller.state(), now_ms, events);
}

fn record(
    before: EnlargementState,
    after: EnlargementState,
    at_ms: u64,
    events: &mut Vec<ReplayEvent>,
) {
    if before != after {
        events.push(ReplayEvent { at_ms, state: after });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shakefind_platform_core::RecordingHost;
    use shakefind_pointer_model::{horizontal_shake, PointerPosition};

    fn controller() -> EnlargementController<RecordingHost> {
        EnlargementController::start(RecordingHost::new()).unwrap()
    }

    #[test]
    fn shake_enlarges_then_restores_on_tick_grid() {
        let script = horizontal_shake(PointerPosition::new(300, 300), 0, 11, 40, 50);
        let mut controller = controller();

        let events = replay(&mut controller, &script, 100);

        assert_eq!(
            events,
            vec![
                ReplayEvent {
                    at_ms: 400,
                    state: EnlargementState::Enlarged { since_ms: 400 }
                },
                ReplayEvent {
                    at_ms: 1_000,
                    state: EnlargementState::Normal
                },
            ]
        );
        assert_eq!(controller.host().install_count(), 1);
        assert_eq!(controller.host().restore_count(), 1);
    }

    #[test]
    fn slow_motion_produces_no_events() {
        let script: Vec<ScriptedPosition> = (0..20)
            .map(|i| ScriptedPosition::new(i * 100, (i * 5) as i32, 0))
            .collect();
        let mut controller = controller();

        assert!(replay(&mut controller, &script, 100).is_empty());
        assert_eq!(controller.host().install_count(), 0);
    }

    #[test]
    fn huge_tick_interval_saturates_instead_of_overflowing() {
        let script = horizontal_shake(PointerPosition::new(300, 300), 0, 11, 40, 50);
        let interval = u64::MAX / 2 + 1;
        let mut controller = controller();

        let events = replay(&mut controller, &script, interval);

        assert_eq!(
            events,
            vec![
                ReplayEvent {
                    at_ms: 400,
                    state: EnlargementState::Enlarged { since_ms: 400 }
                },
                ReplayEvent {
                    at_ms: interval,
                    state: EnlargementState::Normal
                },
            ]
        );
        assert_eq!(controller.host().restore_count(), 1);
    }

    #[test]
    fn tick_grid_stops_at_the_end_of_time() {
        let script = vec![
            ScriptedPosition::new(u64::MAX - 10, 0, 0),
            ScriptedPosition::new(u64::MAX, 5, 0),
        ];
        let mut controller = controller();

        assert!(replay(&mut controller, &script, 100).is_empty());
    }

    #[test]
    fn empty_script_does_nothing() {
        let mut controller = controller();
        assert!(replay(&mut controller, &[], 100).is_empty());
    }

    #[test]
    fn events_serialize_flat() {
        let event = ReplayEvent {
            at_ms: 400,
            state: EnlargementState::Enlarged { since_ms: 400 },
        };
        let json = serde_json::to_value(event).unwrap();
        assert_eq!(json["at_ms"], 400);
        assert_eq!(json["state"], "enlarged");
        assert_eq!(json["since_ms"], 400);
    }
}
