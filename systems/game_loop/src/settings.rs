use std::time::Duration;

/// Amount each speed command changes the frame delay by.
pub const DELAY_STEP: Duration = Duration::from_millis(5);
/// Shortest frame delay the speed commands reach.
pub const MIN_DELAY: Duration = Duration::from_millis(10);
/// Longest frame delay the speed commands reach.
pub const MAX_DELAY: Duration = Duration::from_millis(100);

/// Target duration of one frame, adjustable in [`DELAY_STEP`] notches.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct FrameDelay(Duration);

impl FrameDelay {
    /// Wraps `delay` without clamping it.
    ///
    /// The speed commands only move the delay while it is inside
    /// [`MIN_DELAY`]..=[`MAX_DELAY`], so a configured value outside that
    /// range stays put in one direction.
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self(delay)
    }

    /// The wrapped duration.
    #[must_use]
    pub const fn get(self) -> Duration {
        self.0
    }

    /// One notch faster, unless the delay is already at the minimum.
    #[must_use]
    pub fn shorter(self) -> Self {
        if self.0 > MIN_DELAY {
            Self(self.0.saturating_sub(DELAY_STEP))
        } else {
            self
        }
    }

    /// One notch slower, unless the delay is already at the maximum.
    #[must_use]
    pub fn longer(self) -> Self {
        if self.0 < MAX_DELAY {
            Self(self.0.saturating_add(DELAY_STEP))
        } else {
            self
        }
    }
}

impl Default for FrameDelay {
    fn default() -> Self {
        Self(Duration::from_millis(50))
    }
}

/// Options a session is started with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GameSettings {
    /// Initial frame delay.
    pub frame_delay: FrameDelay,
    /// Base seed; each level mixes in its number.
    pub seed: u64,
    /// Level a new game starts on.
    pub first_level: u32,
    /// Stops the session after this many frames in total.
    pub max_frames: Option<u64>,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            frame_delay: FrameDelay::default(),
            seed: 0,
            first_level: 1,
            max_frames: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn speed_commands_stop_at_the_bounds() {
        let mut delay = FrameDelay::default();
        for _ in 0..20 {
            delay = delay.shorter();
        }
        assert_eq!(delay.get(), MIN_DELAY);

        for _ in 0..40 {
            delay = delay.longer();
        }
        assert_eq!(delay.get(), MAX_DELAY);
    }

    #[test]
    fn delay_outside_the_range_only_moves_back_in() {
        let slow = FrameDelay::new(Duration::from_millis(200));
        assert_eq!(slow.longer(), slow);
        assert_eq!(slow.shorter().get(), Duration::from_millis(195));
    }
}
