pub mod loaders;
pub mod question;
pub mod quiz;

pub use loaders::{load_all_quiz_files, load_quiz_document};
pub use question::{Answer, Difficulty, Question, QuestionKind};
pub use quiz::{MultipleChoiceItem, QuizCategory, QuizData, QuizDocument, TrueFalseItem};
