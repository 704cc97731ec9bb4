//! Binary encoder: one feature per whole state label.

use dsf_core::{Domain, State};
use tracing::debug;

use crate::encoded::Accumulator;
use crate::encoder::StateEncoder;
use crate::vocab::Vocabulary;

/// Writes each known label's weight at the label's index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryEncoder {
    input_state_map: Vocabulary,
}

impl BinaryEncoder {
    pub const NAME: &'static str = "binary";

    pub fn new(input_state_map: Vocabulary) -> Self {
        Self { input_state_map }
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.input_state_map
    }
}

impl StateEncoder for BinaryEncoder {
    fn prepare_from_domain(domain: &Domain) -> Self {
        let encoder = Self::new(Vocabulary::from_tokens(domain.input_states()));
        debug!(num_features = encoder.num_features(), "prepared binary encoder");
        encoder
    }

    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn num_features(&self) -> usize {
        self.input_state_map.len()
    }

    fn feature_names(&self) -> Vec<String> {
        self.input_state_map.tokens().to_vec()
    }

    fn accumulate(&self, state: &State) -> Accumulator {
        let mut acc = Accumulator::new(self.num_features());
        for (label, &weight) in state {
            match self.input_state_map.get(label) {
                Some(idx) => acc.set(idx, weight),
                None => debug!(%label, "label not in vocabulary, ignored"),
            }
        }
        acc
    }
}
