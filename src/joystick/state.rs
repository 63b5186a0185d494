use std::collections::HashMap;

use super::event::ControlKey;

/// Result of feeding one reading into [`ControlState::observe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Observation {
    /// The control went from deflected/pressed back to neutral.
    pub released: bool,
    /// Reading recorded for the control before this one.
    pub prior: i16,
}

/// Last seen reading per control.
///
/// Controls that were never observed read as `0`. The map is never cleared,
/// so state survives a device reconnect.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ControlState {
    last: HashMap<ControlKey, i16>,
}

impl ControlState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last recorded reading for `key`, `0` if none was recorded.
    pub fn get(&self, key: ControlKey) -> i16 {
        self.last.get(&key).copied().unwrap_or(0)
    }

    /// Record `signal` for `key` and report whether this is a release.
    pub fn observe(&mut self, key: ControlKey, signal: i16) -> Observation {
        let prior = self.last.insert(key, signal).unwrap_or(0);
        Observation {
            released: prior != 0 && signal == 0,
            prior,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.last.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn unseen_controls_read_zero() {
        let state = ControlState::new();
        assert_eq!(state.get(ControlKey::button(1)), 0);
        assert!(state.is_empty());
    }

    #[test]
    fn first_neutral_reading_is_not_a_release() {
        let mut state = ControlState::new();
        let obs = state.observe(ControlKey::button(1), 0);

        assert!(!obs.released);
        assert_eq!(obs.prior, 0);
        assert!(!state.is_empty());
    }

    #[test]
    fn press_then_release() {
        let mut state = ControlState::new();
        let key = ControlKey::button(1);

        let press = state.observe(key, 1);
        assert!(!press.released);
        assert_eq!(state.get(key), 1);

        let release = state.observe(key, 0);
        assert!(release.released);
        assert_eq!(release.prior, 1);
        assert_eq!(state.get(key), 0);

        // A second neutral reading does not fire again.
        assert!(!state.observe(key, 0).released);
    }

    #[test]
    fn axis_release_reports_last_deflection() {
        let mut state = ControlState::new();
        let key = ControlKey::axis(0);

        state.observe(key, -12000);
        state.observe(key, -32767);
        let release = state.observe(key, 0);

        assert!(release.released);
        assert_eq!(release.prior, -32767);
    }

    #[test]
    fn moving_between_deflections_is_not_a_release() {
        let mut state = ControlState::new();
        let key = ControlKey::axis(1);

        state.observe(key, 500);
        let swing = state.observe(key, -500);

        assert!(!swing.released);
        assert_eq!(swing.prior, 500);
    }

    #[test]
    fn controls_are_tracked_independently() {
        let mut state = ControlState::new();
        state.observe(ControlKey::button(2), 1);

        assert!(!state.observe(ControlKey::axis(2), 0).released);
        assert!(state.observe(ControlKey::button(2), 0).released);
    }

    proptest! {
        #[test]
        fn release_fires_only_when_returning_to_zero(
            index in any::<u8>(),
            prior in any::<i16>(),
            incoming in any::<i16>(),
        ) {
            let mut state = ControlState::new();
            let key = ControlKey::axis(index);
            state.observe(key, prior);

            let obs = state.observe(key, incoming);
            prop_assert_eq!(obs.prior, prior);
            prop_assert_eq!(obs.released, prior != 0 && incoming == 0);
            prop_assert_eq!(state.get(key), incoming);
        }
    }
}
