pub mod config;
pub mod error;
pub mod export;
pub mod features;
pub mod model;
pub mod training;
pub mod utils;
