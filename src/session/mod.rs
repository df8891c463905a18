pub mod quiz;
pub mod result;

pub use quiz::{Answer, LedgerEffect, Phase, QuizSession};
pub use result::QuizResult;
