pub mod quiz_loader;

pub use quiz_loader::{load_all_quiz_files, load_quiz_document};
