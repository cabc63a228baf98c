pub mod model;
pub mod renderer;
pub mod writer;
