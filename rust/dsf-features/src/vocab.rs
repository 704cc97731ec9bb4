//! Token -> index vocabularies.
//!
//! A vocabulary assigns every distinct token a dense index in `0..len`. It is built once and
//! never mutated afterwards; encoders only read it.

use std::collections::BTreeSet;

use rustc_hash::FxHashMap;
use thiserror::Error;

/// Errors for explicitly supplied (rather than derived) vocabularies.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum VocabError {
    #[error("duplicate token {0:?}")]
    DuplicateToken(String),
    #[error("index {index} for token {token:?} is out of range for {len} tokens")]
    IndexOutOfRange {
        token: String,
        index: usize,
        len: usize,
    },
    #[error("index {index} assigned to both {first:?} and {second:?}")]
    DuplicateIndex {
        index: usize,
        first: String,
        second: String,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Vocabulary {
    tokens: Vec<String>,
    index: FxHashMap<String, usize>,
}

impl Vocabulary {
    /// Distinct tokens in first-seen order.
    pub fn from_tokens<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut vocab = Self::default();
        for t in tokens {
            let t = t.as_ref();
            if !vocab.index.contains_key(t) {
                vocab.index.insert(t.to_string(), vocab.tokens.len());
                vocab.tokens.push(t.to_string());
            }
        }
        vocab
    }

    /// Distinct tokens in lexicographic order.
    pub fn from_sorted_tokens<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let sorted: BTreeSet<String> = tokens.into_iter().map(|t| t.as_ref().to_string()).collect();
        Self::from_tokens(sorted)
    }

    /// Vocabulary from an explicit token -> index assignment.
    ///
    /// Indices must be unique and cover `0..len` exactly.
    pub fn from_index_map<I, S>(pairs: I) -> Result<Self, VocabError>
    where
        I: IntoIterator<Item = (S, usize)>,
        S: Into<String>,
    {
        let pairs: Vec<(String, usize)> = pairs.into_iter().map(|(t, i)| (t.into(), i)).collect();
        let len = pairs.len();
        let mut slots: Vec<Option<String>> = vec![None; len];
        let mut index = FxHashMap::default();
        for (token, i) in pairs {
            if i >= len {
                return Err(VocabError::IndexOutOfRange {
                    token,
                    index: i,
                    len,
                });
            }
            if index.contains_key(&token) {
                return Err(VocabError::DuplicateToken(token));
            }
            if let Some(first) = &slots[i] {
                return Err(VocabError::DuplicateIndex {
                    index: i,
                    first: first.clone(),
                    second: token,
                });
            }
            slots[i] = Some(token.clone());
            index.insert(token, i);
        }
        // Unique indices, all < len, len entries: every slot is filled.
        let tokens = slots.into_iter().flatten().collect();
        Ok(Self { tokens, index })
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Index of `token`, if known.
    pub fn get(&self, token: &str) -> Option<usize> {
        self.index.get(token).copied()
    }

    pub fn contains(&self, token: &str) -> bool {
        self.index.contains_key(token)
    }

    /// Token stored at `index`.
    pub fn token(&self, index: usize) -> Option<&str> {
        self.tokens.get(index).map(String::as_str)
    }

    /// Tokens ordered by index.
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> {
        self.tokens.iter().map(String::as_str).enumerate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_seen_order_is_kept_and_duplicates_dropped() {
        let v = Vocabulary::from_tokens(["ab", "cd", "ef", "cd", "ab", "kl"]);
        assert_eq!(v.tokens(), &["ab", "cd", "ef", "kl"]);
        assert_eq!(v.get("ef"), Some(2));
        assert_eq!(v.get("zz"), None);
        assert_eq!(v.token(3), Some("kl"));
        assert_eq!(v.token(4), None);
    }

    #[test]
    fn sorted_order_is_lexicographic() {
        let v = Vocabulary::from_sorted_tokens(["greet", "city", "greet", "affirm"]);
        assert_eq!(v.tokens(), &["affirm", "city", "greet"]);
    }

    #[test]
    fn explicit_map_keeps_given_indices() {
        let v = Vocabulary::from_index_map([("a", 0), ("b", 3), ("c", 2), ("d", 1)]).unwrap();
        assert_eq!(v.len(), 4);
        assert_eq!(v.tokens(), &["a", "d", "c", "b"]);
        assert_eq!(v.get("b"), Some(3));
    }

    #[test]
    fn explicit_map_rejects_inconsistent_indices() {
        assert_eq!(
            Vocabulary::from_index_map([("a", 0), ("b", 2)]),
            Err(VocabError::IndexOutOfRange {
                token: "b".to_string(),
                index: 2,
                len: 2
            })
        );
        assert_eq!(
            Vocabulary::from_index_map([("a", 0), ("b", 0)]),
            Err(VocabError::DuplicateIndex {
                index: 0,
                first: "a".to_string(),
                second: "b".to_string()
            })
        );
        assert_eq!(
            Vocabulary::from_index_map([("a", 0), ("a", 1)]),
            Err(VocabError::DuplicateToken("a".to_string()))
        );
    }

    #[test]
    fn empty_vocabulary() {
        let v = Vocabulary::from_index_map(Vec::<(String, usize)>::new()).unwrap();
        assert!(v.is_empty());
        assert_eq!(v, Vocabulary::default());
    }
}
