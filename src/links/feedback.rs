use std::fmt;

/// Read-only reporter of a link's constraint reaction magnitude.
///
/// Computing a reaction reading has a cost, so it is an explicit opt-in: the
/// value is only meaningful after `set_enabled(true)` and at least one
/// simulation step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinkFeedback {
    enabled: bool,
    value: f32,
}

impl LinkFeedback {
    /// Creates a disabled feedback sensor
    pub fn new() -> Self {
        Self { enabled: false, value: 0.0 }
    }

    /// Returns whether reaction sensing is enabled
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Enables or disables reaction sensing
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Returns the most recently computed reaction magnitude.
    ///
    /// Stale or zero before the sensor has been enabled and stepped.
    pub fn get_value(&self) -> f32 {
        self.value
    }

    /// Stores a reaction reading; ignored while disabled
    pub(crate) fn record(&mut self, value: f32) {
        if self.enabled {
            self.value = value;
        }
    }
}

impl Default for LinkFeedback {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for LinkFeedback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "feedback[enabled={}, value={}]", self.enabled, self.value)
    }
}
