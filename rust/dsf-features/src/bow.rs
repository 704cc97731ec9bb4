//! Bag-of-words encoder: sub-token occurrence counts.

use dsf_core::{split_label, Domain, State};
use tracing::debug;

use crate::encoded::{Accumulator, DtypePolicy};
use crate::encoder::StateEncoder;
use crate::vocab::Vocabulary;

/// Counts how often each vocabulary token occurs among the parts of the state's labels.
///
/// Any label present in the state counts, whatever its weight: this encoder tracks occurrence,
/// not confidence. Output is always integer-typed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BagOfWordsEncoder {
    vocab: Vocabulary,
}

impl BagOfWordsEncoder {
    pub const NAME: &'static str = "bag_of_words";

    pub fn new(vocab: Vocabulary) -> Self {
        Self { vocab }
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocab
    }
}

impl StateEncoder for BagOfWordsEncoder {
    fn prepare_from_domain(domain: &Domain) -> Self {
        let states = domain.input_states();
        let encoder = Self::new(Vocabulary::from_tokens(
            states.iter().flat_map(|s| split_label(s)),
        ));
        debug!(
            states = states.len(),
            num_features = encoder.num_features(),
            "prepared bag-of-words encoder"
        );
        encoder
    }

    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn num_features(&self) -> usize {
        self.vocab.len()
    }

    fn feature_names(&self) -> Vec<String> {
        self.vocab.tokens().to_vec()
    }

    fn dtype_policy(&self) -> DtypePolicy {
        DtypePolicy::Integer
    }

    fn accumulate(&self, state: &State) -> Accumulator {
        let mut acc = Accumulator::new(self.num_features());
        for label in state.keys() {
            for token in split_label(label) {
                if let Some(idx) = self.vocab.get(token) {
                    acc.add(idx, 1.0);
                }
            }
        }
        acc
    }
}
