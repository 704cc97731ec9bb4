//! Name-keyed lookup of encoder strategies.

use std::fmt;

use dsf_core::Domain;
use tracing::debug;

use crate::binary::BinaryEncoder;
use crate::bow::BagOfWordsEncoder;
use crate::encoder::StateEncoder;
use crate::label_tokenizer::LabelTokenizerEncoder;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    Binary,
    LabelTokenizer,
    BagOfWords,
}

impl Strategy {
    pub const ALL: [Strategy; 3] = [
        Strategy::Binary,
        Strategy::LabelTokenizer,
        Strategy::BagOfWords,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Strategy::Binary => BinaryEncoder::NAME,
            Strategy::LabelTokenizer => LabelTokenizerEncoder::NAME,
            Strategy::BagOfWords => BagOfWordsEncoder::NAME,
        }
    }

    /// Resolve a strategy by its snake-case name or its class-style alias.
    pub fn from_name(name: &str) -> Option<Strategy> {
        match name.trim() {
            "binary" | "BinarySingleStateFeaturizer" => Some(Strategy::Binary),
            "label_tokenizer" | "LabelTokenizerSingleStateFeaturizer" => {
                Some(Strategy::LabelTokenizer)
            }
            "bag_of_words" | "bow" | "BOWSingleStateFeaturizer" => Some(Strategy::BagOfWords),
            _ => None,
        }
    }

    pub fn prepare(self, domain: &Domain) -> Box<dyn StateEncoder> {
        match self {
            Strategy::Binary => Box::new(BinaryEncoder::prepare_from_domain(domain)),
            Strategy::LabelTokenizer => {
                Box::new(LabelTokenizerEncoder::prepare_from_domain(domain))
            }
            Strategy::BagOfWords => Box::new(BagOfWordsEncoder::prepare_from_domain(domain)),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Build the encoder registered under `name`, or `None` if no strategy has that name.
pub fn load(name: &str, domain: &Domain) -> Option<Box<dyn StateEncoder>> {
    let Some(strategy) = Strategy::from_name(name) else {
        debug!(name, "no encoder strategy registered under this name");
        return None;
    };
    Some(strategy.prepare(domain))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_name_is_none() {
        let domain = Domain::from_input_states(["a"]);
        assert!(load("non_existent_class", &domain).is_none());
        assert!(load("", &domain).is_none());
        assert_eq!(Strategy::from_name("Binary"), None);
    }

    #[test]
    fn names_round_trip() {
        for s in Strategy::ALL {
            assert_eq!(Strategy::from_name(s.name()), Some(s));
            assert_eq!(s.to_string(), s.name());
        }
        assert_eq!(
            Strategy::from_name("BOWSingleStateFeaturizer"),
            Some(Strategy::BagOfWords)
        );
        assert_eq!(
            Strategy::from_name("LabelTokenizerSingleStateFeaturizer"),
            Some(Strategy::LabelTokenizer)
        );
    }

    #[test]
    fn loaded_encoder_reports_its_strategy() {
        let domain = Domain::from_input_states(["ab_cd", "ef_gh_kl"]);
        let enc = load("bow", &domain).expect("registered");
        assert_eq!(enc.name(), "bag_of_words");
        assert_eq!(enc.num_features(), 5);

        let enc = load("binary", &domain).expect("registered");
        assert_eq!(enc.num_features(), 2);
    }
}
