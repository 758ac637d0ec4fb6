// medcot - Medical image chain-of-thought demo backed by hosted vision models
// Author: kelexine (https://github.com/kelexine)

pub mod cli;
pub mod config;
pub mod diagnosis;
pub mod error;
pub mod metrics;
pub mod providers;
pub mod server;
pub mod utils;
pub mod vision;
