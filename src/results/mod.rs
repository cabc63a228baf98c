pub mod aggregator;
pub mod attachment;
pub mod environment;
pub mod record;
pub mod scanner;
