//! Planning services

pub mod clustering;
pub mod config;
pub mod geo;
pub mod loader;
pub mod path;
pub mod pipeline;
pub mod render;
pub mod report;
pub mod surcharge;
