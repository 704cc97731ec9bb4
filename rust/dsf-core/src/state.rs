//! Dialogue state representation and the label taxonomy shared by all encoders.
//!
//! A state is a sparse map from label to weight. Labels are compositional: parts are joined by
//! [`SPLIT_SYMBOL`], the first part may be a category marker (`intent`, `action`, `entity`,
//! `slot`), and labels describing the previous bot action carry [`PREV_PREFIX`].

use std::collections::BTreeMap;

/// One dialogue turn: label -> weight in [0, 1].
///
/// Ordered so that iteration, and therefore float accumulation order, is deterministic.
pub type State = BTreeMap<String, f64>;

/// Separator between the parts of a compositional label.
pub const SPLIT_SYMBOL: char = '_';

/// Prefix marking labels that describe the previous bot action.
pub const PREV_PREFIX: &str = "prev_";

/// Category marker for user intents (`intent_greet`).
pub const INTENT_MARKER: &str = "intent";
/// Category marker for bot actions (`action_listen`).
pub const ACTION_MARKER: &str = "action";
/// Category marker for entities (`entity_city`).
pub const ENTITY_MARKER: &str = "entity";
/// Category marker for slot features (`slot_city_0`).
pub const SLOT_MARKER: &str = "slot";

pub const ACTION_LISTEN_NAME: &str = "action_listen";
pub const ACTION_RESTART_NAME: &str = "action_restart";
pub const ACTION_DEFAULT_FALLBACK_NAME: &str = "action_default_fallback";

/// Actions every domain knows about, in this order, ahead of user-declared actions.
pub const DEFAULT_ACTIONS: [&str; 3] = [
    ACTION_LISTEN_NAME,
    ACTION_RESTART_NAME,
    ACTION_DEFAULT_FALLBACK_NAME,
];

/// Coarse classification of a state label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelKind<'a> {
    /// `prev_<action>`; carries the action name with the prefix removed.
    PrevAction(&'a str),
    /// Anything describing the current user turn or the tracker's slots.
    Current(&'a str),
}

/// Classify `label` by its previous-action prefix.
pub fn classify_label(label: &str) -> LabelKind<'_> {
    match label.strip_prefix(PREV_PREFIX) {
        Some(action) => LabelKind::PrevAction(action),
        None => LabelKind::Current(label),
    }
}

/// Split a label into its non-empty parts.
pub fn split_label(label: &str) -> impl Iterator<Item = &str> {
    label.split(SPLIT_SYMBOL).filter(|part| !part.is_empty())
}

/// Parts of `label` with a leading `marker` part removed, if present.
pub fn tokens_after_marker<'a>(label: &'a str, marker: &str) -> Vec<&'a str> {
    let mut parts = split_label(label).peekable();
    if parts.peek() == Some(&marker) {
        parts.next();
    }
    parts.collect()
}

/// Whether `label` starts with the `marker` category part.
pub fn has_marker(label: &str, marker: &str) -> bool {
    split_label(label).next() == Some(marker)
}

/// Build a [`State`] from borrowed `(label, weight)` pairs.
pub fn state_from_pairs<'a, I>(pairs: I) -> State
where
    I: IntoIterator<Item = (&'a str, f64)>,
{
    pairs
        .into_iter()
        .map(|(label, weight)| (label.to_string(), weight))
        .collect()
}
