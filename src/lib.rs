pub mod analyzers;
pub mod api;
pub mod config;
pub mod envelope;
pub mod error;
pub mod fetch;
pub mod inspect;
pub mod models;
pub mod output;
pub mod pipeline;
