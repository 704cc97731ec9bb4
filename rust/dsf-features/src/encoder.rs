//! The state encoder contract shared by every strategy.

use std::fmt;

use dsf_core::{Domain, OutputKind, State};

use crate::encoded::{Accumulator, DenseVector, DtypePolicy, Encoded};

/// Turns one dialogue state into a fixed-width numeric vector.
///
/// Implementations are immutable once built, so a single instance can serve concurrent
/// `encode` calls from many threads.
pub trait StateEncoder: fmt::Debug + Send + Sync {
    /// Build the encoder's vocabularies from a domain snapshot.
    fn prepare_from_domain(domain: &Domain) -> Self
    where
        Self: Sized;

    /// Registry name of the strategy.
    fn name(&self) -> &'static str;

    fn num_features(&self) -> usize;

    /// Human-readable name of every feature, by index.
    fn feature_names(&self) -> Vec<String>;

    /// Index -> value contributions of `state`. Unknown labels contribute nothing.
    fn accumulate(&self, state: &State) -> Accumulator;

    fn dtype_policy(&self) -> DtypePolicy {
        DtypePolicy::Infer
    }

    /// Encode `state`; an absent state encodes as all zeros.
    fn encode(&self, state: Option<&State>, output: OutputKind) -> Encoded {
        let acc = match state {
            Some(state) => self.accumulate(state),
            None => Accumulator::new(self.num_features()),
        };
        debug_assert_eq!(acc.width(), self.num_features());
        acc.materialize(output, self.dtype_policy())
    }

    /// Dense encoding of a present state.
    fn encode_dense(&self, state: &State) -> DenseVector {
        match self.encode(Some(state), OutputKind::Dense) {
            Encoded::Dense(d) => d,
            Encoded::Sparse(_) => unreachable!("dense output requested"),
        }
    }
}
