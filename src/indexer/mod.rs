pub mod payload_decoder;
pub mod sign_index_client;

pub use payload_decoder::{DecodedBatch, PayloadDecoder};
pub use sign_index_client::{AttestationReader, SignIndexClient};
