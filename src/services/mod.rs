pub mod launch_page;
pub mod manifest;
pub mod normalizer;
pub mod quiz_player;
pub mod runtime_api;

pub use launch_page::{launch_page, stylesheet};
pub use manifest::{xml_escape, PackageManifest, XmlElement, XmlWriter};
pub use normalizer::{normalize, DroppedQuestions, NormalizedQuiz};
pub use quiz_player::{player_script, PlayerState, QuizPlayer, ScoreReport, PASSING_SCORE};
pub use runtime_api::{runtime_api_script, InMemoryRuntime, LessonStatus, RuntimeApi};
