//! Label-tokenized encoder.
//!
//! Compositional labels are split into sub-tokens so that related labels share features:
//! `intent_greet_formal` and `intent_greet_casual` both light up `greet`. The vector is laid out
//! as `[user tokens | slot labels | bot tokens]`.
//!
//! `slot_`-marked labels only ever match whole slot labels; an undeclared slot value is dropped.
//! User-side features are not conditioned on `prev_action_listen` being present in the state.

use dsf_core::state::{
    has_marker, split_label, tokens_after_marker, ACTION_MARKER, INTENT_MARKER, SLOT_MARKER,
};
use dsf_core::{classify_label, Domain, LabelKind, State};
use tracing::debug;

use crate::encoded::Accumulator;
use crate::encoder::StateEncoder;
use crate::schema::{BOT_FEATURE_PREFIX, SLOT_FEATURE_PREFIX};
use crate::vocab::Vocabulary;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelTokenizerEncoder {
    user_vocab: Vocabulary,
    slot_labels: Vocabulary,
    bot_vocab: Vocabulary,
}

impl LabelTokenizerEncoder {
    pub const NAME: &'static str = "label_tokenizer";

    /// `slot_labels` are whole labels; duplicates keep their first position.
    pub fn new<I, S>(user_vocab: Vocabulary, slot_labels: I, bot_vocab: Vocabulary) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            user_vocab,
            slot_labels: Vocabulary::from_tokens(slot_labels),
            bot_vocab,
        }
    }

    pub fn user_vocab(&self) -> &Vocabulary {
        &self.user_vocab
    }

    pub fn slot_labels(&self) -> &[String] {
        self.slot_labels.tokens()
    }

    pub fn bot_vocab(&self) -> &Vocabulary {
        &self.bot_vocab
    }

    fn slot_offset(&self) -> usize {
        self.user_vocab.len()
    }

    fn bot_offset(&self) -> usize {
        self.user_vocab.len() + self.slot_labels.len()
    }

    fn add_tokens<'a>(
        acc: &mut Accumulator,
        vocab: &Vocabulary,
        offset: usize,
        tokens: impl IntoIterator<Item = &'a str>,
        weight: f64,
    ) {
        for t in tokens {
            if let Some(idx) = vocab.get(t) {
                acc.add(offset + idx, weight);
            }
        }
    }
}

impl StateEncoder for LabelTokenizerEncoder {
    fn prepare_from_domain(domain: &Domain) -> Self {
        let mut user_tokens: Vec<String> = Vec::new();
        let mut slot_labels: Vec<String> = Vec::new();
        let mut bot_tokens: Vec<String> = Vec::new();

        for label in domain.input_states() {
            match classify_label(&label) {
                LabelKind::PrevAction(action) => bot_tokens.extend(
                    tokens_after_marker(action, ACTION_MARKER)
                        .into_iter()
                        .map(str::to_string),
                ),
                LabelKind::Current(l) if has_marker(l, INTENT_MARKER) => user_tokens.extend(
                    tokens_after_marker(l, INTENT_MARKER)
                        .into_iter()
                        .map(str::to_string),
                ),
                LabelKind::Current(l) if has_marker(l, SLOT_MARKER) => {
                    slot_labels.push(l.to_string())
                }
                LabelKind::Current(l) => user_tokens.extend(split_label(l).map(str::to_string)),
            }
        }

        let encoder = Self::new(
            Vocabulary::from_sorted_tokens(user_tokens),
            slot_labels,
            Vocabulary::from_sorted_tokens(bot_tokens),
        );
        debug!(
            user_tokens = encoder.user_vocab.len(),
            slots = encoder.slot_labels.len(),
            bot_tokens = encoder.bot_vocab.len(),
            "prepared label tokenizer encoder"
        );
        encoder
    }

    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn num_features(&self) -> usize {
        self.user_vocab.len() + self.slot_labels.len() + self.bot_vocab.len()
    }

    fn feature_names(&self) -> Vec<String> {
        let mut names = self.user_vocab.tokens().to_vec();
        names.extend(
            self.slot_labels
                .tokens()
                .iter()
                .map(|s| format!("{SLOT_FEATURE_PREFIX}{s}")),
        );
        names.extend(
            self.bot_vocab
                .tokens()
                .iter()
                .map(|t| format!("{BOT_FEATURE_PREFIX}{t}")),
        );
        names
    }

    fn accumulate(&self, state: &State) -> Accumulator {
        let mut acc = Accumulator::new(self.num_features());
        for (label, &weight) in state {
            match classify_label(label) {
                LabelKind::PrevAction(action) => Self::add_tokens(
                    &mut acc,
                    &self.bot_vocab,
                    self.bot_offset(),
                    tokens_after_marker(action, ACTION_MARKER),
                    weight,
                ),
                LabelKind::Current(l) if has_marker(l, INTENT_MARKER) => Self::add_tokens(
                    &mut acc,
                    &self.user_vocab,
                    0,
                    tokens_after_marker(l, INTENT_MARKER),
                    weight,
                ),
                LabelKind::Current(l) if has_marker(l, SLOT_MARKER) => {
                    match self.slot_labels.get(l) {
                        Some(idx) => acc.add(self.slot_offset() + idx, weight),
                        None => debug!(%label, "slot label not in vocabulary, ignored"),
                    }
                }
                LabelKind::Current(l) => match self.slot_labels.get(l) {
                    Some(idx) => acc.add(self.slot_offset() + idx, weight),
                    None => {
                        Self::add_tokens(&mut acc, &self.user_vocab, 0, split_label(l), weight)
                    }
                },
            }
        }
        acc
    }
}
