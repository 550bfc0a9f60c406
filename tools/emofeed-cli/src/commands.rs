pub mod classify;
pub mod config;
pub mod features;
pub mod model;
