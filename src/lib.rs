pub mod cli;
pub mod detect;
pub mod error;
pub mod evaluate;
pub mod metrics;
pub mod model;
pub mod parsers;
pub mod report;
pub mod thresholds;
