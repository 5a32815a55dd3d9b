pub mod batch;
pub mod fanout;
pub mod mixed;

pub use fanout::{fan_out, FanOut};
pub use mixed::{MixedHistory, MixedQuotes, MixedTables};
