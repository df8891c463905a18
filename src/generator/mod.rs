pub mod hangul;
pub mod quiz;

pub use quiz::{
    DEFAULT_QUESTION_COUNT, OPTION_COUNT, QuestionKind, QuizQuestion, QuizType, generate_quiz,
};
