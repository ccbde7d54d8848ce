#![forbid(unsafe_code)]

pub mod classifier;
pub mod model;
pub mod randomizer;
pub mod scoring;
pub mod time;

pub use time::Clock;
