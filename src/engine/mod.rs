pub mod filter;
pub mod ledger;
pub mod progress;

pub use filter::{FilterSummary, StudyFilter, filter_vocabulary};
pub use ledger::Ledger;
pub use progress::{Bucket, UserProgress, WordStat};
