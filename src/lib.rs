pub mod cli;
pub mod errors;
pub mod logging;
pub mod pipeline;
pub mod report;
pub mod results;
pub mod runner;
