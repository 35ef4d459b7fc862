pub mod categorizer;
pub mod discovery;
pub mod error;
pub mod fmt;
pub mod importer;
pub mod models;
pub mod output;
pub mod pipeline;
pub mod rules;
pub mod settings;
pub mod summary;
