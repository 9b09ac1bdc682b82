//! Potentiometer hook filter.
//!
//! A hook pins the reported value of a potentiometer (for example after the
//! host changed the parameter it controls) until the physical control is
//! turned through the pinned point. From then on the filter tracks the
//! control again.

/// Per-channel hook state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HookState {
    /// Tracking the control directly.
    #[default]
    Unhooked,
    /// Pinned; no reading seen yet.
    Hooking,
    /// Pinned; the control is below the pinned value.
    Under,
    /// Pinned; the control is above the pinned value.
    Over,
}

/// Last accepted value of one potentiometer together with its hook state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HookFilter {
    value: u16,
    state: HookState,
}

impl HookFilter {
    /// Feed a fresh reading through the filter and return the value to report.
    pub fn update(&mut self, reading: u16) -> u16 {
        let stored = self.value;
        let (next, accept) = match self.state {
            HookState::Unhooked => (HookState::Unhooked, true),
            HookState::Hooking if reading < stored => (HookState::Under, false),
            HookState::Hooking if reading > stored => (HookState::Over, false),
            HookState::Hooking => (HookState::Unhooked, true),
            HookState::Under if reading >= stored => (HookState::Unhooked, true),
            HookState::Under => (HookState::Under, false),
            HookState::Over if reading <= stored => (HookState::Unhooked, true),
            HookState::Over => (HookState::Over, false),
        };

        self.state = next;
        if accept {
            self.value = reading;
        }
        self.value
    }

    /// Pin the reported value at `value` until the control crosses it.
    pub fn pin(&mut self, value: u16) {
        self.state = HookState::Hooking;
        self.value = value;
    }

    /// Drop the hook and keep the current value.
    pub fn clear(&mut self) {
        self.state = HookState::Unhooked;
    }

    /// Value last reported by [`update`](Self::update) or set by
    /// [`pin`](Self::pin).
    pub fn value(&self) -> u16 {
        self.value
    }

    /// Current hook state.
    pub fn state(&self) -> HookState {
        self.state
    }

    /// `true` in any state other than [`HookState::Unhooked`].
    pub fn is_hooking(&self) -> bool {
        self.state != HookState::Unhooked
    }
}
