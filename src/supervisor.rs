//! Keeps the device stream open and drives records through the mapper.

use std::convert::Infallible;
use std::io::Read;

use tracing::{debug, error, info, warn};

use crate::dispatch::Dispatcher;
use crate::error::{DeviceError, StreamError};
use crate::joystick::{read_record, Backoff, DeviceSource, LinkState, ReconnectPolicy, Sleeper};
use crate::mapper::Mapper;

/// Owns the device link and reconnects it when it drops.
pub struct Supervisor<S, Z> {
    source: S,
    sleeper: Z,
    policy: ReconnectPolicy,
    backoff: Backoff,
    state: LinkState,
}

impl<S, Z> Supervisor<S, Z>
where
    S: DeviceSource,
    Z: Sleeper,
{
    pub fn new(source: S, sleeper: Z, policy: ReconnectPolicy) -> Self {
        Self {
            source,
            sleeper,
            policy,
            backoff: Backoff::from_policy(&policy),
            state: LinkState::Disconnected,
        }
    }

    pub fn state(&self) -> LinkState {
        self.state
    }

    /// Read and dispatch forever. Only returns once the device has been
    /// absent for longer than the reconnect policy allows.
    pub fn run<D: Dispatcher>(
        &mut self,
        mapper: &mut Mapper,
        dispatcher: &mut D,
    ) -> Result<Infallible, DeviceError> {
        loop {
            let mut stream = self.connect()?;
            info!("Reading inputs from {}", self.source.path().display());

            let err = pump(&mut stream, mapper, dispatcher);
            drop(stream);

            warn!("Device was disconnected: {}", err);
            self.transition(LinkState::Disconnected);
            self.sleeper.sleep(self.policy.disconnect_pause);
        }
    }

    /// Probe until the device opens, sleeping a growing delay in between.
    pub fn connect(&mut self) -> Result<S::Stream, DeviceError> {
        self.backoff.reset();
        self.transition(LinkState::Probing);

        loop {
            if self.source.is_present() {
                match self.source.open() {
                    Ok(stream) => {
                        self.transition(LinkState::Connected);
                        return Ok(stream);
                    }
                    Err(err) => {
                        warn!("Cannot open {}: {}", self.source.path().display(), err);
                    }
                }
            }

            let Some(delay) = self.backoff.next_delay() else {
                self.transition(LinkState::Aborted);
                return Err(DeviceError::NeverAvailable {
                    path: self.source.path().to_path_buf(),
                    waited: self.backoff.waited(),
                });
            };
            debug!("Sleeping for {:.3} seconds", delay.as_secs_f64());
            self.sleeper.sleep(delay);
        }
    }

    fn transition(&mut self, next: LinkState) {
        if self.state != next {
            debug!("Device link {} -> {}", self.state, next);
            self.state = next;
        }
    }
}

/// Process records until the stream fails, returning the failure.
fn pump<R, D>(stream: &mut R, mapper: &mut Mapper, dispatcher: &mut D) -> StreamError
where
    R: Read,
    D: Dispatcher,
{
    loop {
        let record = match read_record(stream) {
            Ok(record) => record,
            Err(err) => return err,
        };

        match mapper.handle(&record) {
            Ok(Some(action)) => {
                info!("Action {}", action);
                if let Err(err) = dispatcher.dispatch(action) {
                    warn!("Action {} failed: {}", action, err);
                }
            }
            Ok(None) => {}
            Err(err) => error!("Mapping out of sync with filter: {}", err),
        }
    }
}
