use crate::config::{SENSITIVITY_INITIAL, SENSITIVITY_MAX, SENSITIVITY_MIN, SENSITIVITY_STEP};

/// Canonical wheel signal, independent of how the platform reports it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollDirection {
    Up,
    Down,
}

impl ScrollDirection {
    /// Maps a vertical wheel delta (positive = away from the user) to a direction.
    pub fn from_wheel_delta(dy: f32) -> Option<Self> {
        if dy > 0.0 {
            Some(Self::Up)
        } else if dy < 0.0 {
            Some(Self::Down)
        } else {
            None
        }
    }
}

/// UI-owned view settings.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    sensitivity: f32,
    fullscreen: bool,
}

impl ViewState {
    pub fn new() -> Self {
        Self {
            sensitivity: SENSITIVITY_INITIAL,
            fullscreen: false,
        }
    }

    pub fn sensitivity(&self) -> f32 {
        self.sensitivity
    }

    pub fn fullscreen(&self) -> bool {
        self.fullscreen
    }

    pub fn scroll(&mut self, direction: ScrollDirection) {
        self.sensitivity = match direction {
            ScrollDirection::Up => (self.sensitivity + SENSITIVITY_STEP).min(SENSITIVITY_MAX),
            ScrollDirection::Down => (self.sensitivity - SENSITIVITY_STEP).max(SENSITIVITY_MIN),
        };
    }

    /// Applies one step per non-zero wheel event. Returns the number of steps.
    pub fn scroll_all(&mut self, wheel_deltas: impl IntoIterator<Item = f32>) -> usize {
        let mut steps = 0;
        for direction in wheel_deltas
            .into_iter()
            .filter_map(ScrollDirection::from_wheel_delta)
        {
            self.scroll(direction);
            steps += 1;
        }
        steps
    }

    /// F11. Returns the new fullscreen state.
    pub fn toggle_fullscreen(&mut self) -> bool {
        self.fullscreen = !self.fullscreen;
        self.fullscreen
    }

    /// Escape.
    pub fn end_fullscreen(&mut self) {
        self.fullscreen = false;
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new()
    }
}
