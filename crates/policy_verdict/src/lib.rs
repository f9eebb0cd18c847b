mod engine;
mod grader;

pub use engine::*;
pub use grader::*;
