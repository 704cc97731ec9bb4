//! Feature layout v1.
//!
//! The layout of an encoded vector depends on the encoder strategy. All widths are fixed when
//! the encoder is built.
//!
//! ### Binary
//! One feature per input state label, in the order the domain declares them.
//!
//! ### Label-tokenized
//! - **user tokens**: `|user_vocab|` features, sub-tokens of intents (marker dropped) and
//!   entity labels, sorted
//! - **slots**: `|slot_labels|` features, one per slot state, declared order
//! - **bot tokens**: `|bot_vocab|` features, sub-tokens of action names (`action` marker
//!   dropped), sorted
//!
//! ### Bag-of-words
//! One count per distinct sub-token of the domain's input states, first-seen order.

/// Increment this whenever any strategy's layout changes.
pub const FEATURE_SCHEMA_ID: u32 = 1;

/// Prefix used when naming bot-token features in [`crate::StateEncoder::feature_names`].
pub const BOT_FEATURE_PREFIX: &str = "bot:";

/// Prefix used when naming slot features in [`crate::StateEncoder::feature_names`].
pub const SLOT_FEATURE_PREFIX: &str = "slot:";
