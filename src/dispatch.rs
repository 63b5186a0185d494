//! Performs resolved actions: synthetic keystrokes and external commands.

use std::process::{Child, Command};

use tracing::{debug, warn};

use crate::config::{ActionDescriptor, ActionKind, ActionValue};
use crate::error::DispatchError;

pub const DEFAULT_KEY_PROGRAM: &str = "xdotool";

/// Something that can carry out an action.
pub trait Dispatcher {
    fn dispatch(&mut self, action: &ActionDescriptor) -> Result<(), DispatchError>;
}

/// Runs actions as child processes.
///
/// Keystrokes go through `<key_program> key <name>` and block until the
/// program exits. Commands are spawned detached and never waited on; exited
/// ones are reaped on later dispatches so they do not linger as zombies.
#[derive(Debug)]
pub struct ProcessDispatcher {
    key_program: String,
    detached: Vec<Child>,
}

impl ProcessDispatcher {
    pub fn new(key_program: impl Into<String>) -> Self {
        Self {
            key_program: key_program.into(),
            detached: Vec::new(),
        }
    }

    /// Number of spawned commands not yet seen to exit.
    pub fn detached_count(&self) -> usize {
        self.detached.len()
    }

    fn press_key(&self, name: &str) -> Result<(), DispatchError> {
        let status = Command::new(&self.key_program)
            .arg("key")
            .arg(name)
            .status()
            .map_err(|source| DispatchError::Spawn {
                program: self.key_program.clone(),
                source,
            })?;
        debug!("{} key {} exited with {}", self.key_program, name, status);
        Ok(())
    }

    fn launch(&mut self, argv: &[String]) -> Result<(), DispatchError> {
        let Some((program, args)) = argv.split_first() else {
            return Err(DispatchError::InvalidActionValue {
                kind: "command",
                reason: "empty argument list".into(),
            });
        };

        let child = Command::new(program)
            .args(args)
            .spawn()
            .map_err(|source| DispatchError::Spawn {
                program: program.clone(),
                source,
            })?;
        debug!("Spawned {} (pid {})", program, child.id());
        self.detached.push(child);
        Ok(())
    }

    fn reap(&mut self) {
        self.detached.retain_mut(|child| match child.try_wait() {
            Ok(Some(_)) => false,
            Ok(None) => true,
            Err(err) => {
                warn!("Lost track of pid {}: {}", child.id(), err);
                false
            }
        });
    }
}

impl Default for ProcessDispatcher {
    fn default() -> Self {
        Self::new(DEFAULT_KEY_PROGRAM)
    }
}

impl Dispatcher for ProcessDispatcher {
    fn dispatch(&mut self, action: &ActionDescriptor) -> Result<(), DispatchError> {
        self.reap();

        match (&action.kind, &action.value) {
            (ActionKind::Key, ActionValue::Single(name)) => self.press_key(name),
            (ActionKind::Key, ActionValue::List(_)) => Err(DispatchError::InvalidActionValue {
                kind: "key",
                reason: "expected a single key name".into(),
            }),
            (ActionKind::Command, ActionValue::Single(program)) => {
                self.launch(std::slice::from_ref(program))
            }
            (ActionKind::Command, ActionValue::List(argv)) => self.launch(argv),
            (ActionKind::Other(name), _) => Err(DispatchError::UnknownActionType(name.clone())),
        }
    }
}
