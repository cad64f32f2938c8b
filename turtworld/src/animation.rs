//! Character animation state derived from movement.

use serde::{Deserialize, Serialize};

/// Seconds each frame is shown.
pub const FRAME_DURATION: f32 = 0.1;

/// Horizontal speed below which a grounded character counts as idle.
const RUN_THRESHOLD: f32 = 0.1;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnimationState {
    #[default]
    Idle,
    Run,
    Jump,
    Fall,
}

impl AnimationState {
    /// Number of frames in this state's loop.
    pub fn frame_count(self) -> usize {
        match self {
            AnimationState::Idle => 4,
            AnimationState::Run => 6,
            AnimationState::Jump | AnimationState::Fall => 1,
        }
    }

    /// Pick the state for a body's current motion.
    pub fn from_motion(velocity_x: f32, velocity_y: f32, grounded: bool) -> Self {
        if !grounded {
            if velocity_y < 0.0 {
                AnimationState::Jump
            } else {
                AnimationState::Fall
            }
        } else if velocity_x.abs() > RUN_THRESHOLD {
            AnimationState::Run
        } else {
            AnimationState::Idle
        }
    }
}

/// What a renderer needs to pick a sprite cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimationFrame {
    pub state: AnimationState,
    pub index: usize,
}

/// Looping frame counter that restarts whenever the state changes.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CharacterAnimation {
    state: AnimationState,
    frame_index: usize,
    frame_time: f32,
}

impl CharacterAnimation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, dt: f32, velocity_x: f32, velocity_y: f32, grounded: bool) {
        let state = AnimationState::from_motion(velocity_x, velocity_y, grounded);
        if state != self.state {
            self.state = state;
            self.frame_index = 0;
            self.frame_time = 0.0;
        }

        if dt.is_nan() || dt <= 0.0 {
            return;
        }

        self.frame_time += dt;
        if self.frame_time >= FRAME_DURATION {
            self.frame_time = 0.0;
            self.frame_index = (self.frame_index + 1) % self.state.frame_count();
        }
    }

    pub fn state(&self) -> AnimationState {
        self.state
    }

    pub fn current_frame(&self) -> AnimationFrame {
        AnimationFrame {
            state: self.state,
            index: self.frame_index,
        }
    }
}
