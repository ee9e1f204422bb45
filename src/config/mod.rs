//! Configuration loaded from `.metalseal.toml`.

pub mod settings;

pub use settings::Settings;
