//! Contact list import pipeline
//!
//! Decoder -> normalizer -> validator -> partitioner -> assignment store. Each stage consumes
//! the complete output of the previous one.

pub mod decoder;
pub mod error;
pub mod normalize;
pub mod partition;
pub mod pipeline;
pub mod record;
pub mod schema;

pub use decoder::{decode, decoder_for, TabularDecoder, TabularFormat};
pub use error::{DecodeError, DistributionError, ImportError, SchemaError};
pub use normalize::{canonical_key, normalize, normalize_all};
pub use partition::{distribute, AgentGroup, DistributionBatch, DEFAULT_POOL_SIZE};
pub use pipeline::{import, parse, persist, prepare, ImportSummary};
pub use record::{CellValue, NormalizedRecord, NumberedRecord, RawRecord, ValidatedRecord};
pub use schema::validate;
