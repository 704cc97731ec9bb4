//! dsf-features: Vocabularies, state encoders, and dense/sparse materialization.

pub mod binary;
pub mod bow;
pub mod encoded;
pub mod encoder;
pub mod label_tokenizer;
pub mod registry;
pub mod schema;
pub mod tracker;
pub mod vocab;

pub use binary::BinaryEncoder;
pub use bow::BagOfWordsEncoder;
pub use encoded::{Accumulator, CsrRow, DenseVector, Dtype, DtypePolicy, Encoded, SparseRow};
pub use encoder::StateEncoder;
pub use label_tokenizer::LabelTokenizerEncoder;
pub use registry::{load, Strategy};
pub use schema::FEATURE_SCHEMA_ID;
pub use tracker::TrackerFeaturizer;
pub use vocab::{VocabError, Vocabulary};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
