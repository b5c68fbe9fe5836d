pub mod config;
pub mod league;
pub mod logging;
pub mod output;
pub mod scoring;
