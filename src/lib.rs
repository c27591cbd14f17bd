pub mod company;
pub mod config;
pub mod engine;
pub mod org;
pub mod render;
pub mod source;
