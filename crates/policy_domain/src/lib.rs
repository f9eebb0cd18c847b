mod answer_source;
mod catalog;
mod error;
mod evaluation;
mod message;
mod report;
mod status;
mod test_case;

pub use answer_source::*;
pub use catalog::*;
pub use error::*;
pub use evaluation::*;
pub use message::*;
pub use report::*;
pub use status::*;
pub use test_case::*;
