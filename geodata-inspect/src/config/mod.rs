//! Configuration for the inspect binary.

mod settings;

pub use settings::Settings;
