//! Domain description: the finite universe of labels a dialogue state can carry.
//!
//! The featurizer only reads a domain; it never mutates one. A domain is either composed from
//! its intents/entities/slots/actions, or carries an explicit `input_states` list which then
//! takes precedence for [`Domain::input_states`].

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::state::{DEFAULT_ACTIONS, ENTITY_MARKER, INTENT_MARKER, PREV_PREFIX, SLOT_MARKER};

/// A slot and the number of feature dimensions it contributes to a state.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SlotSpec {
    pub name: String,
    /// Number of `slot_<name>_<i>` features (1 for boolean/text slots).
    #[serde(default = "default_slot_dims")]
    pub dims: usize,
}

fn default_slot_dims() -> usize {
    1
}

impl SlotSpec {
    pub fn new(name: impl Into<String>, dims: usize) -> Self {
        Self {
            name: name.into(),
            dims,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Domain {
    #[serde(default)]
    pub intents: Vec<String>,
    #[serde(default)]
    pub entities: Vec<String>,
    #[serde(default)]
    pub slots: Vec<SlotSpec>,
    /// User-declared actions. Default actions are added by [`Domain::action_names`].
    #[serde(default)]
    pub actions: Vec<String>,
    /// Explicit state label list overriding the composed one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_states: Option<Vec<String>>,
}

impl Domain {
    /// Load a domain from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    /// Parse a domain from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let domain: Domain = serde_yaml::from_str(yaml)?;
        Ok(domain)
    }

    /// A domain defined only by its state labels.
    pub fn from_input_states<I, S>(states: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            input_states: Some(states.into_iter().map(Into::into).collect()),
            ..Self::default()
        }
    }

    pub fn intent_states(&self) -> Vec<String> {
        self.intents
            .iter()
            .map(|i| format!("{INTENT_MARKER}_{i}"))
            .collect()
    }

    pub fn entity_states(&self) -> Vec<String> {
        self.entities
            .iter()
            .map(|e| format!("{ENTITY_MARKER}_{e}"))
            .collect()
    }

    pub fn slot_states(&self) -> Vec<String> {
        self.slots
            .iter()
            .flat_map(|s| (0..s.dims).map(move |i| format!("{SLOT_MARKER}_{}_{i}", s.name)))
            .collect()
    }

    /// Default actions first, then user actions in declared order (duplicates removed).
    pub fn action_names(&self) -> Vec<String> {
        let mut names: Vec<String> = DEFAULT_ACTIONS.iter().map(|a| a.to_string()).collect();
        for a in &self.actions {
            if !names.contains(a) {
                names.push(a.clone());
            }
        }
        names
    }

    pub fn prev_action_states(&self) -> Vec<String> {
        self.action_names()
            .iter()
            .map(|a| format!("{PREV_PREFIX}{a}"))
            .collect()
    }

    /// Every label a state may carry, duplicates removed (first occurrence wins).
    pub fn input_states(&self) -> Vec<String> {
        let states = match &self.input_states {
            Some(states) => states.clone(),
            None => {
                let mut states = self.intent_states();
                states.extend(self.entity_states());
                states.extend(self.slot_states());
                states.extend(self.prev_action_states());
                states
            }
        };
        let mut seen = HashSet::with_capacity(states.len());
        states
            .into_iter()
            .filter(|s| seen.insert(s.clone()))
            .collect()
    }

    pub fn num_states(&self) -> usize {
        self.input_states().len()
    }
}
