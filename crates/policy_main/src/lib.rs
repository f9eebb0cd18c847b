mod cli;
mod display;
mod run;

pub use cli::*;
pub use display::*;
pub use run::*;
