//! Turns decoded joystick records into the action to run, if any.

use std::collections::HashSet;

use tracing::{debug, trace};

use crate::config::{ActionDescriptor, Profile};
use crate::error::ResolveError;
use crate::joystick::{ControlKey, ControlState, EventRecord};

/// Filters records against the active profile, tracks control state and
/// resolves releases to actions.
#[derive(Debug, Clone)]
pub struct Mapper {
    profile: Profile,
    valid: HashSet<ControlKey>,
    state: ControlState,
}

impl Mapper {
    pub fn new(profile: Profile) -> Self {
        let valid = profile.control_keys().collect();
        Self {
            profile,
            valid,
            state: ControlState::new(),
        }
    }

    /// Whether `key` has an action in the active profile.
    pub fn accepts(&self, key: ControlKey) -> bool {
        self.valid.contains(&key)
    }

    pub fn mapped_controls(&self) -> usize {
        self.valid.len()
    }

    pub fn state(&self) -> &ControlState {
        &self.state
    }

    /// Feed one record through filter, state tracker and resolver.
    ///
    /// Returns the action to dispatch when the record releases a mapped
    /// control. Records for unmapped controls leave the state untouched.
    pub fn handle(
        &mut self,
        record: &EventRecord,
    ) -> Result<Option<&ActionDescriptor>, ResolveError> {
        let Some(key) = record.control_key().filter(|key| self.accepts(*key)) else {
            trace!(
                "Dropping event type={} index={}",
                record.category,
                record.index
            );
            return Ok(None);
        };

        let observation = self.state.observe(key, record.signal());
        if !observation.released {
            return Ok(None);
        }

        self.resolve(key, observation.prior)
    }

    /// Action for a release of `key` whose last reading was `prior`.
    pub fn resolve(
        &self,
        key: ControlKey,
        prior: i16,
    ) -> Result<Option<&ActionDescriptor>, ResolveError> {
        let config = self
            .profile
            .action(key)
            .ok_or(ResolveError::UnconfiguredControl(key))?;

        let action = config.select(prior);
        if action.is_none() {
            debug!("No action for {key} released from {prior}");
        }
        Ok(action)
    }
}
