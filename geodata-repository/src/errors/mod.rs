//! Error types for the geodata repository.

mod index_client_error;

pub use index_client_error::IndexClientError;
