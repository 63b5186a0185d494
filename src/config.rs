//! Mapping document: which action each joystick control triggers.
//!
//! The document is YAML with one entry per named profile:
//!
//! ```yaml
//! configurations:
//!   global:
//!     buttons:
//!       3: { type: key, value: a }
//!     axis:
//!       0:
//!         min: { type: command, value: [notify-send, left] }
//!         max: { type: command, value: [notify-send, right] }
//! ```

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use serde_yaml::Value;

use crate::error::ConfigError;
use crate::joystick::{Category, ControlKey};

/// The whole mapping file.
#[derive(Debug, Clone, Deserialize)]
pub struct MappingDocument {
    pub configurations: HashMap<String, Profile>,
}

impl MappingDocument {
    /// Read and parse the mapping file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Take the named profile out of the document.
    pub fn into_profile(mut self, name: &str) -> Result<Profile, ConfigError> {
        self.configurations
            .remove(name)
            .ok_or_else(|| ConfigError::UnknownProfile(name.to_string()))
    }
}

/// Actions for one named profile, keyed by control index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub buttons: HashMap<u8, ActionConfig>,
    #[serde(default)]
    pub axis: HashMap<u8, ActionConfig>,
}

impl Profile {
    /// Configured action for a control, if any.
    pub fn action(&self, key: ControlKey) -> Option<&ActionConfig> {
        match key.category {
            Category::Button => self.buttons.get(&key.index),
            Category::Axis => self.axis.get(&key.index),
        }
    }

    /// Every control that has an action in this profile.
    pub fn control_keys(&self) -> impl Iterator<Item = ControlKey> + '_ {
        let buttons = self.buttons.keys().map(|&index| ControlKey::button(index));
        let axes = self.axis.keys().map(|&index| ControlKey::axis(index));
        buttons.chain(axes)
    }
}

/// Action attached to a control.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "ActionConfigRepr")]
pub enum ActionConfig {
    /// Same action whichever way the control moved.
    Direct(ActionDescriptor),
    /// Separate actions for negative (`min`) and positive (`max`) deflection.
    AxisPair {
        min: Option<ActionDescriptor>,
        max: Option<ActionDescriptor>,
    },
}

impl ActionConfig {
    /// Pick the action for a release whose last reading was `prior`.
    ///
    /// A pair never resolves for a zero reading.
    pub fn select(&self, prior: i16) -> Option<&ActionDescriptor> {
        match self {
            ActionConfig::Direct(action) => Some(action),
            ActionConfig::AxisPair { min, max } => match prior.signum() {
                -1 => min.as_ref(),
                1 => max.as_ref(),
                _ => None,
            },
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ActionConfigRepr {
    Direct(ActionDescriptor),
    Pair(AxisPairRepr),
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct AxisPairRepr {
    min: Option<ActionDescriptor>,
    max: Option<ActionDescriptor>,
}

impl TryFrom<ActionConfigRepr> for ActionConfig {
    type Error = ConfigError;

    fn try_from(repr: ActionConfigRepr) -> Result<Self, Self::Error> {
        match repr {
            ActionConfigRepr::Direct(action) => Ok(ActionConfig::Direct(action)),
            ActionConfigRepr::Pair(AxisPairRepr {
                min: None,
                max: None,
            }) => Err(ConfigError::EmptyAxisPair),
            ActionConfigRepr::Pair(AxisPairRepr { min, max }) => {
                Ok(ActionConfig::AxisPair { min, max })
            }
        }
    }
}

/// A single `{type, value}` entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ActionDescriptor {
    #[serde(rename = "type")]
    pub kind: ActionKind,
    pub value: ActionValue,
}

impl ActionDescriptor {
    pub fn key(name: &str) -> Self {
        Self {
            kind: ActionKind::Key,
            value: ActionValue::Single(name.to_string()),
        }
    }

    pub fn command<S: AsRef<str>>(argv: &[S]) -> Self {
        Self {
            kind: ActionKind::Command,
            value: ActionValue::List(argv.iter().map(|arg| arg.as_ref().to_string()).collect()),
        }
    }
}

impl fmt::Display for ActionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.value)
    }
}

/// Action type. Unrecognised names are kept and only rejected when the
/// action is dispatched.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum ActionKind {
    Key,
    Command,
    Other(String),
}

impl From<String> for ActionKind {
    fn from(name: String) -> Self {
        match name.as_str() {
            "key" => ActionKind::Key,
            "command" => ActionKind::Command,
            _ => ActionKind::Other(name),
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionKind::Key => f.write_str("key"),
            ActionKind::Command => f.write_str("command"),
            ActionKind::Other(name) => f.write_str(name),
        }
    }
}

/// Either a single word or an argument list.
///
/// Scalars are taken as text, so `value: 5` names the `5` key.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "Value")]
pub enum ActionValue {
    Single(String),
    List(Vec<String>),
}

impl TryFrom<Value> for ActionValue {
    type Error = String;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Sequence(items) => items
                .into_iter()
                .map(scalar_to_string)
                .collect::<Result<Vec<_>, _>>()
                .map(ActionValue::List),
            other => scalar_to_string(other).map(ActionValue::Single),
        }
    }
}

fn scalar_to_string(value: Value) -> Result<String, String> {
    match value {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(format!("expected a string or a list of strings, got {other:?}")),
    }
}

impl fmt::Display for ActionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionValue::Single(word) => f.write_str(word),
            ActionValue::List(argv) => write!(f, "{}", argv.join(" ")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"
configurations:
  global:
    buttons:
      3: { type: key, value: a }
      7: { type: key, value: 5 }
    axis:
      0:
        min: { type: command, value: [notify-send, left] }
        max: { type: command, value: [notify-send, right] }
      1: { type: command, value: xterm }
  games:
    buttons:
      0: { type: key, value: Return }
"#;

    #[test]
    fn parses_sample_document() {
        let doc = MappingDocument::from_yaml(SAMPLE).unwrap();
        assert_eq!(doc.configurations.len(), 2);

        let profile = doc.into_profile("global").unwrap();
        assert_eq!(
            profile.action(ControlKey::button(3)),
            Some(&ActionConfig::Direct(ActionDescriptor::key("a")))
        );
        assert_eq!(
            profile.action(ControlKey::button(7)),
            Some(&ActionConfig::Direct(ActionDescriptor::key("5")))
        );
        assert_eq!(
            profile.action(ControlKey::axis(0)),
            Some(&ActionConfig::AxisPair {
                min: Some(ActionDescriptor::command(&["notify-send", "left"])),
                max: Some(ActionDescriptor::command(&["notify-send", "right"])),
            })
        );
        assert_eq!(
            profile.action(ControlKey::axis(1)),
            Some(&ActionConfig::Direct(ActionDescriptor {
                kind: ActionKind::Command,
                value: ActionValue::Single("xterm".into()),
            }))
        );
        assert_eq!(profile.action(ControlKey::axis(3)), None);
    }

    #[test]
    fn control_keys_cover_both_sections() {
        let profile = MappingDocument::from_yaml(SAMPLE)
            .unwrap()
            .into_profile("global")
            .unwrap();
        let mut keys: Vec<_> = profile.control_keys().map(|k| k.to_string()).collect();
        keys.sort();

        assert_eq!(keys, vec!["axis:0", "axis:1", "button:3", "button:7"]);
    }

    #[test]
    fn sections_are_optional() {
        let doc = MappingDocument::from_yaml(
            "configurations:\n  global:\n    axis:\n      2: { type: key, value: Up }\n",
        )
        .unwrap();
        let profile = doc.into_profile("global").unwrap();

        assert!(profile.buttons.is_empty());
        assert_eq!(profile.control_keys().count(), 1);
    }

    #[test]
    fn unknown_profile_is_an_error() {
        let doc = MappingDocument::from_yaml(SAMPLE).unwrap();
        let err = doc.into_profile("missing").unwrap_err();
        assert!(matches!(err, ConfigError::UnknownProfile(name) if name == "missing"));
    }

    #[test]
    fn unknown_action_type_loads() {
        let doc = MappingDocument::from_yaml(
            "configurations:\n  global:\n    buttons:\n      1: { type: macro, value: x }\n",
        )
        .unwrap();
        let profile = doc.into_profile("global").unwrap();

        match profile.action(ControlKey::button(1)) {
            Some(ActionConfig::Direct(action)) => {
                assert_eq!(action.kind, ActionKind::Other("macro".into()));
            }
            other => panic!("unexpected action: {other:?}"),
        }
    }

    #[test]
    fn half_pair_is_allowed() {
        let doc = MappingDocument::from_yaml(
            "configurations:\n  global:\n    axis:\n      1:\n        max: { type: key, value: Right }\n",
        )
        .unwrap();
        let profile = doc.into_profile("global").unwrap();
        let action = profile.action(ControlKey::axis(1)).unwrap();

        assert_eq!(action.select(300), Some(&ActionDescriptor::key("Right")));
        assert_eq!(action.select(-300), None);
    }

    #[test]
    fn empty_pair_is_rejected() {
        let result = MappingDocument::from_yaml(
            "configurations:\n  global:\n    axis:\n      1: {}\n",
        );
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn incomplete_direct_entry_is_rejected() {
        let result = MappingDocument::from_yaml(
            "configurations:\n  global:\n    buttons:\n      1: { type: key }\n",
        );
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn pair_selects_by_sign() {
        let pair = ActionConfig::AxisPair {
            min: Some(ActionDescriptor::key("Left")),
            max: Some(ActionDescriptor::key("Right")),
        };

        assert_eq!(pair.select(-1), Some(&ActionDescriptor::key("Left")));
        assert_eq!(pair.select(i16::MIN), Some(&ActionDescriptor::key("Left")));
        assert_eq!(pair.select(120), Some(&ActionDescriptor::key("Right")));
        assert_eq!(pair.select(0), None);
    }

    #[test]
    fn load_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.yml");

        let err = MappingDocument::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(p) if p == path));
    }

    #[test]
    fn load_reads_file_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let doc = MappingDocument::load(file.path()).unwrap();
        assert!(doc.configurations.contains_key("games"));
    }

    #[test]
    fn descriptor_display() {
        assert_eq!(ActionDescriptor::key("a").to_string(), "key: a");
        assert_eq!(
            ActionDescriptor::command(&["notify-send", "left"]).to_string(),
            "command: notify-send left"
        );
    }
}
