//! Health pool.
//!
//! The maximum follows the aggregated `max_health` attribute; the current
//! value is game state and always stays within `[0, maximum]`.

/// Current and maximum health of a combatant.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HealthMeter {
    current: f32,
    maximum: f32,
}

impl HealthMeter {
    /// Creates a full meter.
    pub fn new(maximum: f32) -> Self {
        let maximum = maximum.max(0.0);
        Self {
            current: maximum,
            maximum,
        }
    }

    /// Creates a meter at an explicit value, clamped to `[0, maximum]`.
    pub fn with_current(current: f32, maximum: f32) -> Self {
        let maximum = maximum.max(0.0);
        Self {
            current: current.clamp(0.0, maximum),
            maximum,
        }
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    pub fn maximum(&self) -> f32 {
        self.maximum
    }

    pub fn is_depleted(&self) -> bool {
        self.current <= 0.0
    }

    /// Current health as a fraction of the maximum (`0.0` when the maximum is zero).
    pub fn fraction(&self) -> f32 {
        if self.maximum > 0.0 {
            self.current / self.maximum
        } else {
            0.0
        }
    }

    /// Removes up to `amount` health and returns what was actually removed.
    pub fn take_damage(&mut self, amount: f32) -> f32 {
        if amount.is_nan() || amount <= 0.0 {
            return 0.0;
        }
        let before = self.current;
        self.current = (self.current - amount).clamp(0.0, self.maximum);
        before - self.current
    }

    /// Restores up to `amount` health and returns what was actually restored.
    pub fn heal(&mut self, amount: f32) -> f32 {
        if amount.is_nan() || amount <= 0.0 {
            return 0.0;
        }
        let before = self.current;
        self.current = (self.current + amount).clamp(0.0, self.maximum);
        self.current - before
    }

    /// Changes the maximum, keeping the current value within the new bounds.
    pub fn set_maximum(&mut self, maximum: f32) {
        self.maximum = maximum.max(0.0);
        self.current = self.current.clamp(0.0, self.maximum);
    }
}
