// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The scene transition state machine.
//!
//! One transition animates one direction — a scene fading in (incoming) or
//! out (outgoing) — over a fixed duration. At most one transition is in
//! flight per scene controller; starting another while one is active is
//! rejected, never queued. Time is supplied by the caller as seconds on the
//! frame loop's clock, keeping the machine a pure function of its inputs.

use std::fmt;

/// A transition is considered complete once its raw fraction passes this,
/// so float accumulation can never leave it a hair short of done.
const COMPLETE_FRACTION: f32 = 0.9999;

/// Which way a scene is transitioning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionDirection {
    /// The scene is becoming active, fading from 0 to full opacity.
    Incoming,
    /// The scene is being replaced, fading from full opacity to 0.
    Outgoing,
}

/// Shapes the raw elapsed fraction of a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimingCurve {
    /// No shaping.
    Linear,
    /// Slow start, fast finish.
    #[default]
    EaseIn,
    /// Fast start, slow finish.
    EaseOut,
}

impl TimingCurve {
    /// Maps a raw fraction in `[0, 1]` to a shaped fraction in `[0, 1]`.
    pub fn apply(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            TimingCurve::Linear => t,
            TimingCurve::EaseIn => t * t,
            TimingCurve::EaseOut => 1.0 - (1.0 - t) * (1.0 - t),
        }
    }
}

/// Why a transition could not be started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionError {
    /// A transition is already in flight; it must reach its terminal state
    /// before a new one may start.
    AlreadyActive {
        /// The direction of the transition currently in flight.
        active: TransitionDirection,
    },
}

impl fmt::Display for TransitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransitionError::AlreadyActive { active } => {
                write!(f, "A {active:?} transition is already active")
            }
        }
    }
}

impl std::error::Error for TransitionError {}

/// Result of advancing a transition by one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransitionProgress {
    /// No transition is running.
    Idle,
    /// The transition is animating; contains the shaped fraction in
    /// `[0, 1]`.
    Active(f32),
    /// The transition reached its end this frame. Reported exactly once.
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Phase {
    Idle,
    Started,
    Animating,
    Ended,
}

/// State machine for a single scene transition.
///
/// `Idle → Started → Animating → Ended`; `Ended` and `Idle` both permit a
/// new `start`. The machine never reads the clock itself — callers pass the
/// frame timestamp — so tests can drive it deterministically.
#[derive(Debug, Clone)]
pub struct SceneTransition {
    phase: Phase,
    direction: Option<TransitionDirection>,
    curve: TimingCurve,
    duration_seconds: f64,
    start_seconds: f64,
}

impl SceneTransition {
    /// Creates an idle transition.
    pub fn new() -> Self {
        Self {
            phase: Phase::Idle,
            direction: None,
            curve: TimingCurve::default(),
            duration_seconds: 0.0,
            start_seconds: 0.0,
        }
    }

    /// `true` while a transition is in flight (started or animating).
    pub fn is_active(&self) -> bool {
        matches!(self.phase, Phase::Started | Phase::Animating)
    }

    /// The direction of the current or most recent transition.
    pub fn direction(&self) -> Option<TransitionDirection> {
        self.direction
    }

    /// Starts a transition at time `now`.
    ///
    /// Rejected with [`TransitionError::AlreadyActive`] while another
    /// transition is in flight. Starting over an `Ended` transition is
    /// allowed; the machine is reused.
    pub fn start(
        &mut self,
        direction: TransitionDirection,
        duration_seconds: f64,
        curve: TimingCurve,
        now_seconds: f64,
    ) -> Result<(), TransitionError> {
        if self.is_active() {
            return Err(TransitionError::AlreadyActive {
                active: self.direction.expect("active transition has a direction"),
            });
        }
        self.phase = Phase::Started;
        self.direction = Some(direction);
        self.curve = curve;
        self.duration_seconds = duration_seconds.max(0.0);
        self.start_seconds = now_seconds;
        log::debug!(
            "SceneTransition: started {direction:?} over {duration_seconds:.2}s ({curve:?})"
        );
        Ok(())
    }

    /// Advances the transition to time `now`.
    ///
    /// Returns the shaped fraction while animating, `Completed` exactly
    /// once when the duration elapses (a zero duration completes on the
    /// first advance), and `Idle` otherwise.
    pub fn advance(&mut self, now_seconds: f64) -> TransitionProgress {
        match self.phase {
            Phase::Idle | Phase::Ended => TransitionProgress::Idle,
            Phase::Started | Phase::Animating => {
                let raw = if self.duration_seconds <= 0.0 {
                    1.0
                } else {
                    ((now_seconds - self.start_seconds) / self.duration_seconds) as f32
                };
                if raw < COMPLETE_FRACTION {
                    self.phase = Phase::Animating;
                    TransitionProgress::Active(self.curve.apply(raw))
                } else {
                    self.phase = Phase::Ended;
                    TransitionProgress::Completed
                }
            }
        }
    }

    /// Forces the transition to its terminal state without animating.
    pub fn end(&mut self) {
        if self.is_active() {
            log::debug!("SceneTransition: {:?} ended early", self.direction);
        }
        self.phase = Phase::Ended;
    }
}

impl Default for SceneTransition {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn starts_only_from_terminal_states() {
        let mut transition = SceneTransition::new();
        transition
            .start(TransitionDirection::Incoming, 1.0, TimingCurve::Linear, 0.0)
            .unwrap();

        // A second start while active is rejected, whatever the direction.
        let err = transition
            .start(TransitionDirection::Outgoing, 1.0, TimingCurve::Linear, 0.1)
            .unwrap_err();
        assert_eq!(
            err,
            TransitionError::AlreadyActive {
                active: TransitionDirection::Incoming
            }
        );
        let err = transition
            .start(TransitionDirection::Incoming, 1.0, TimingCurve::Linear, 0.1)
            .unwrap_err();
        assert!(matches!(err, TransitionError::AlreadyActive { .. }));
    }

    #[test]
    fn advances_through_fraction_to_completion() {
        let mut transition = SceneTransition::new();
        transition
            .start(TransitionDirection::Incoming, 2.0, TimingCurve::Linear, 10.0)
            .unwrap();

        match transition.advance(11.0) {
            TransitionProgress::Active(t) => assert_relative_eq!(t, 0.5, epsilon = 1e-6),
            other => panic!("expected Active at the midpoint, got {other:?}"),
        }
        assert_eq!(transition.advance(12.5), TransitionProgress::Completed);
        // Completion is reported exactly once.
        assert_eq!(transition.advance(13.0), TransitionProgress::Idle);
        assert!(!transition.is_active());
    }

    #[test]
    fn restart_is_allowed_after_completion() {
        let mut transition = SceneTransition::new();
        transition
            .start(TransitionDirection::Outgoing, 1.0, TimingCurve::Linear, 0.0)
            .unwrap();
        assert_eq!(transition.advance(2.0), TransitionProgress::Completed);

        transition
            .start(TransitionDirection::Incoming, 1.0, TimingCurve::Linear, 2.0)
            .unwrap();
        assert!(transition.is_active());
        assert_eq!(transition.direction(), Some(TransitionDirection::Incoming));
    }

    #[test]
    fn zero_duration_completes_immediately() {
        let mut transition = SceneTransition::new();
        transition
            .start(TransitionDirection::Incoming, 0.0, TimingCurve::EaseIn, 5.0)
            .unwrap();
        assert_eq!(transition.advance(5.0), TransitionProgress::Completed);
    }

    #[test]
    fn ease_in_shapes_the_fraction() {
        let mut transition = SceneTransition::new();
        transition
            .start(TransitionDirection::Incoming, 2.0, TimingCurve::EaseIn, 0.0)
            .unwrap();
        match transition.advance(1.0) {
            TransitionProgress::Active(t) => assert_relative_eq!(t, 0.25, epsilon = 1e-6),
            other => panic!("expected Active, got {other:?}"),
        }
    }

    #[test]
    fn timing_curves_are_clamped_and_monotone_at_ends() {
        for curve in [TimingCurve::Linear, TimingCurve::EaseIn, TimingCurve::EaseOut] {
            assert_eq!(curve.apply(-1.0), 0.0);
            assert_eq!(curve.apply(0.0), 0.0);
            assert_relative_eq!(curve.apply(1.0), 1.0);
            assert_relative_eq!(curve.apply(2.0), 1.0);
        }
    }

    #[test]
    fn end_forces_terminal_state() {
        let mut transition = SceneTransition::new();
        transition
            .start(TransitionDirection::Incoming, 10.0, TimingCurve::Linear, 0.0)
            .unwrap();
        transition.end();
        assert!(!transition.is_active());
        assert_eq!(transition.advance(1.0), TransitionProgress::Idle);
        // And a new transition may begin.
        assert!(transition
            .start(TransitionDirection::Outgoing, 1.0, TimingCurve::Linear, 1.0)
            .is_ok());
    }
}
