//! Dialogue-level featurization: one encode call per turn.

use dsf_core::{Domain, FeaturizerConfig, OutputKind, State};
use rayon::prelude::*;

use crate::encoded::Encoded;
use crate::encoder::StateEncoder;
use crate::registry;

#[derive(Debug)]
pub struct TrackerFeaturizer {
    encoder: Box<dyn StateEncoder>,
    output: OutputKind,
    max_history: Option<usize>,
}

impl TrackerFeaturizer {
    pub fn new(
        encoder: Box<dyn StateEncoder>,
        output: OutputKind,
        max_history: Option<usize>,
    ) -> Self {
        assert!(max_history != Some(0), "max_history must be >= 1");
        Self {
            encoder,
            output,
            max_history,
        }
    }

    /// Featurizer for the named strategy with dense output and full history.
    pub fn load(name: &str, domain: &Domain) -> Option<Self> {
        let encoder = registry::load(name, domain)?;
        Some(Self::new(encoder, OutputKind::Dense, None))
    }

    pub fn from_config(cfg: &FeaturizerConfig, domain: &Domain) -> Option<Self> {
        let encoder = registry::load(&cfg.strategy, domain)?;
        Some(Self::new(encoder, cfg.output, cfg.max_history))
    }

    pub fn encoder(&self) -> &dyn StateEncoder {
        self.encoder.as_ref()
    }

    pub fn output(&self) -> OutputKind {
        self.output
    }

    pub fn max_history(&self) -> Option<usize> {
        self.max_history
    }

    pub fn num_features(&self) -> usize {
        self.encoder.num_features()
    }

    /// Encoding of an absent state, used for padding.
    pub fn padding(&self) -> Encoded {
        self.encoder.encode(None, self.output)
    }

    /// One encoding per turn, in order.
    pub fn featurize_dialogue(&self, states: &[State]) -> Vec<Encoded> {
        states
            .iter()
            .map(|s| self.encoder.encode(Some(s), self.output))
            .collect()
    }

    /// For every turn, the encodings of the turns leading up to and including it.
    ///
    /// With `max_history = Some(h)` each window holds exactly `h` rows, left-padded with
    /// [`TrackerFeaturizer::padding`]. Without a limit each window holds the full prefix.
    pub fn featurize_windows(&self, states: &[State]) -> Vec<Vec<Encoded>> {
        self.windows(&self.featurize_dialogue(states))
    }

    /// Windowing of already encoded turns, as in [`TrackerFeaturizer::featurize_windows`].
    pub fn windows(&self, encoded: &[Encoded]) -> Vec<Vec<Encoded>> {
        let pad = self.padding();
        (0..encoded.len())
            .map(|t| {
                let start = match self.max_history {
                    Some(h) => (t + 1).saturating_sub(h),
                    None => 0,
                };
                let real = &encoded[start..=t];
                let pad_rows = self
                    .max_history
                    .map_or(0, |h| h.saturating_sub(real.len()));
                let mut window = Vec::with_capacity(pad_rows + real.len());
                window.extend(std::iter::repeat(pad.clone()).take(pad_rows));
                window.extend(real.iter().cloned());
                window
            })
            .collect()
    }

    /// [`TrackerFeaturizer::featurize_dialogue`] for many dialogues, in parallel.
    pub fn featurize_batch(&self, dialogues: &[Vec<State>]) -> Vec<Vec<Encoded>> {
        dialogues
            .par_iter()
            .map(|d| self.featurize_dialogue(d))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoded::Dtype;
    use dsf_core::state_from_pairs;

    fn featurizer(max_history: Option<usize>) -> TrackerFeaturizer {
        let domain = Domain::from_input_states(["intent_greet", "prev_action_listen", "slot_a_0"]);
        let encoder = registry::load("binary", &domain).unwrap();
        TrackerFeaturizer::new(encoder, OutputKind::Dense, max_history)
    }

    fn dialogue() -> Vec<State> {
        vec![
            state_from_pairs([("prev_action_listen", 1.0)]),
            state_from_pairs([("intent_greet", 1.0), ("prev_action_listen", 1.0)]),
            state_from_pairs([("slot_a_0", 1.0)]),
        ]
    }

    #[test]
    fn load_unknown_strategy_is_none() {
        let domain = Domain::from_input_states(["a"]);
        assert!(TrackerFeaturizer::load("non_existent_class", &domain).is_none());
        let mut cfg = FeaturizerConfig::default();
        cfg.strategy = "nope".to_string();
        assert!(TrackerFeaturizer::from_config(&cfg, &domain).is_none());
    }

    #[test]
    fn dialogue_has_one_row_per_turn() {
        let f = featurizer(None);
        let rows = f.featurize_dialogue(&dialogue());
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1].to_f64_vec(), vec![1.0, 1.0, 0.0]);
        assert_eq!(rows[2].to_f64_vec(), vec![0.0, 0.0, 1.0]);
    }

    #[test]
    fn windows_are_left_padded_to_max_history() {
        let f = featurizer(Some(2));
        let windows = f.featurize_windows(&dialogue());
        assert_eq!(windows.len(), 3);
        assert!(windows.iter().all(|w| w.len() == 2));

        let pad = &windows[0][0];
        assert_eq!(pad.to_f64_vec(), vec![0.0; 3]);
        assert_eq!(pad.dtype(), Dtype::Int32);
        assert_eq!(windows[0][1].to_f64_vec(), vec![0.0, 1.0, 0.0]);
        assert_eq!(windows[2][0].to_f64_vec(), vec![1.0, 1.0, 0.0]);
        assert_eq!(windows[2][1].to_f64_vec(), vec![0.0, 0.0, 1.0]);
    }

    #[test]
    fn windows_without_limit_are_prefixes() {
        let f = featurizer(None);
        let windows = f.featurize_windows(&dialogue());
        let lens: Vec<usize> = windows.iter().map(Vec::len).collect();
        assert_eq!(lens, vec![1, 2, 3]);
        assert!(f.featurize_windows(&[]).is_empty());
    }

    #[test]
    fn batch_matches_sequential() {
        let f = featurizer(None);
        let dialogues = vec![dialogue(), dialogue()[1..].to_vec(), Vec::new()];
        let batch = f.featurize_batch(&dialogues);
        assert_eq!(batch.len(), 3);
        for (d, rows) in dialogues.iter().zip(&batch) {
            assert_eq!(rows, &f.featurize_dialogue(d));
        }
    }

    #[test]
    fn windows_accept_absent_turns() {
        let f = featurizer(Some(2));
        let rows = vec![
            f.encoder().encode(None, f.output()),
            f.encoder()
                .encode(Some(&state_from_pairs([("intent_greet", 1.0)])), f.output()),
        ];
        let windows = f.windows(&rows);
        assert_eq!(windows.len(), 2);
        assert_eq!(windows[0], vec![f.padding(), f.padding()]);
        assert_eq!(windows[1][0], f.padding());
        assert_eq!(windows[1][1].to_f64_vec(), vec![1.0, 0.0, 0.0]);
        assert!(f.windows(&[]).is_empty());
    }

    #[test]
    #[should_panic(expected = "max_history")]
    fn zero_history_is_rejected() {
        let _ = featurizer(Some(0));
    }
}
