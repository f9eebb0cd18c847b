mod catalog;
mod error;
mod prompt;
mod settings;

pub use catalog::*;
pub use error::*;
pub use prompt::*;
pub use settings::*;
