//! Paced replay of the boards produced by a transition.
//!
//! The rules engine resolves a whole turn (capture chains and the computer's
//! reply included) in one step. A front end that wants to show each jump
//! separately hands the frames to an [`Animator`], which calls back once per
//! frame and waits a fixed interval in between. Timing never affects game
//! state.

use std::thread;
use std::time::Duration;

use crate::constants::{AI_THINK_DELAY_MS, CHAIN_STEP_DELAY_MS};
use crate::game::{Frame, GameSession};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Animator {
    /// Pause between consecutive frames.
    pub interval: Duration,
    /// Pause before the first frame played by the computer.
    pub think: Duration,
}

impl Default for Animator {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(CHAIN_STEP_DELAY_MS),
            think: Duration::from_millis(AI_THINK_DELAY_MS),
        }
    }
}

impl Animator {
    /// An animator that never sleeps.
    pub fn instant() -> Self {
        Self {
            interval: Duration::ZERO,
            think: Duration::ZERO,
        }
    }

    pub fn with_interval(interval: Duration) -> Self {
        Self {
            interval,
            think: interval.min(Duration::from_millis(AI_THINK_DELAY_MS)),
        }
    }

    /// Pauses to insert before each frame.
    ///
    /// The first frame is shown immediately unless it belongs to the
    /// computer; later frames wait `interval`, plus `think` whenever the side
    /// changes to the computer's.
    pub fn schedule(&self, session: &GameSession, frames: &[Frame]) -> Vec<Duration> {
        let ai_side = session.mode().ai_side();
        let mut prev_side = None;
        frames
            .iter()
            .enumerate()
            .map(|(i, frame)| {
                let mut wait = if i == 0 { Duration::ZERO } else { self.interval };
                if ai_side == Some(frame.side) && prev_side != Some(frame.side) {
                    wait += self.think;
                }
                prev_side = Some(frame.side);
                wait
            })
            .collect()
    }

    /// Call `render` for each frame, sleeping according to [`Animator::schedule`].
    pub fn play<F>(&self, session: &GameSession, frames: &[Frame], mut render: F)
    where
        F: FnMut(&Frame),
    {
        for (frame, wait) in frames.iter().zip(self.schedule(session, frames)) {
            if !wait.is_zero() {
                thread::sleep(wait);
            }
            render(frame);
        }
    }
}
