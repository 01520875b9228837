//! 测验播放器 - 业务能力层
//!
//! `player_script()` 返回写入包内的 `quiz.js`；`QuizPlayer` 是同一状态机的 Rust 实现，
//! 运行时 API 通过构造参数注入，可以在没有浏览器和 LMS 的情况下模拟学员作答。
//!
//! ```text
//! Loading ──load──▶ Presenting(0) ──select+advance──▶ Presenting(i+1) … ──▶ Reporting
//!    │                    ▲                                                   │
//!    └──(空题库)──▶ NoContent └──────────────────── restart ────────────────────┘
//! ```

use tracing::{debug, info};

use crate::error::PlayerError;
use crate::models::question::{Answer, Question, QuestionKind};
use crate::models::quiz::QuizData;
use crate::services::normalizer::normalize;
use crate::services::runtime_api::{LessonStatus, RuntimeApi, LESSON_STATUS_KEY, SCORE_RAW_KEY};

/// 写入包内的播放器脚本
const QUIZ_JS: &str = include_str!("../assets/quiz.js");

/// 及格线（百分制）
pub const PASSING_SCORE: u32 = 60;

/// 获取播放器脚本
pub fn player_script() -> &'static str {
    QUIZ_JS
}

/// 计算百分制得分：`round(correct / total * 100)`
///
/// 与脚本中的 `Math.round` 保持一致（正数时四舍五入）。
pub fn score_percentage(correct: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((correct as f64 / total as f64) * 100.0).round() as u32
}

/// 根据得分判定通过与否
pub fn status_for(percentage: u32) -> LessonStatus {
    if percentage >= PASSING_SCORE {
        LessonStatus::Passed
    } else {
        LessonStatus::Failed
    }
}

/// 单题作答回顾
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerReview {
    pub question_id: String,
    pub response: Answer,
    pub correct: bool,
}

/// 成绩报告
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreReport {
    pub correct: usize,
    pub total: usize,
    pub percentage: u32,
    pub status: LessonStatus,
    pub answers: Vec<AnswerReview>,
}

/// 播放器状态
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerState {
    /// 等待题目数据
    Loading,
    /// 题库为空，终态
    NoContent,
    /// 正在展示第 index 题（从 0 开始）
    Presenting { index: usize },
    /// 已出成绩
    Reporting(ScoreReport),
}

impl PlayerState {
    fn name(&self) -> &'static str {
        match self {
            PlayerState::Loading => "Loading",
            PlayerState::NoContent => "NoContent",
            PlayerState::Presenting { .. } => "Presenting",
            PlayerState::Reporting(_) => "Reporting",
        }
    }
}

/// 测验播放器
pub struct QuizPlayer<R: RuntimeApi> {
    runtime: R,
    questions: Vec<Question>,
    responses: Vec<Option<Answer>>,
    correct_count: usize,
    state: PlayerState,
}

impl<R: RuntimeApi> QuizPlayer<R> {
    /// 创建播放器，初始状态为 Loading
    pub fn new(runtime: R) -> Self {
        Self {
            runtime,
            questions: Vec::new(),
            responses: Vec::new(),
            correct_count: 0,
            state: PlayerState::Loading,
        }
    }

    /// 装载题目：Loading → Presenting(0)，空列表时 → NoContent
    pub fn load(&mut self, questions: Vec<Question>) -> Result<&PlayerState, PlayerError> {
        if self.state != PlayerState::Loading {
            return Err(PlayerError::invalid(self.state.name(), "load"));
        }

        self.responses = vec![None; questions.len()];
        self.questions = questions;
        self.correct_count = 0;

        self.runtime.initialize();
        if self.questions.is_empty() {
            info!("题库为空，播放器进入无内容状态");
            self.state = PlayerState::NoContent;
        } else {
            self.runtime
                .set_value(LESSON_STATUS_KEY, LessonStatus::Incomplete.as_str());
            self.runtime.commit();
            self.state = PlayerState::Presenting { index: 0 };
        }
        Ok(&self.state)
    }

    /// 从包内 `questions.json` 文本装载，和脚本一样在加载时重新规范化
    pub fn load_json(&mut self, json: &str) -> Result<&PlayerState, PlayerError> {
        let quiz: QuizData =
            serde_json::from_str(json).map_err(|e| PlayerError::InvalidData(e.to_string()))?;
        self.load(normalize(&quiz).questions)
    }

    pub fn state(&self) -> &PlayerState {
        &self.state
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn correct_count(&self) -> usize {
        self.correct_count
    }

    pub fn runtime(&self) -> &R {
        &self.runtime
    }

    pub fn into_runtime(self) -> R {
        self.runtime
    }

    /// 当前题目
    pub fn current(&self) -> Option<&Question> {
        match self.state {
            PlayerState::Presenting { index } => self.questions.get(index),
            _ => None,
        }
    }

    /// 当前题目的作答
    pub fn current_response(&self) -> Option<Answer> {
        match self.state {
            PlayerState::Presenting { index } => self.responses[index],
            _ => None,
        }
    }

    /// 记录当前题目的作答，返回是否答对
    ///
    /// 每题只能作答一次；答对时立即累加正确数。
    pub fn select(&mut self, answer: Answer) -> Result<bool, PlayerError> {
        let PlayerState::Presenting { index } = self.state else {
            return Err(PlayerError::invalid(self.state.name(), "select"));
        };
        if self.responses[index].is_some() {
            return Err(PlayerError::AlreadyAnswered { index });
        }

        let question = &self.questions[index];
        match (question.kind, answer) {
            (QuestionKind::TrueFalse, Answer::Bool(_)) => {}
            (QuestionKind::MultipleChoice, Answer::Index(i)) => {
                let count = question.option_count();
                if i >= count {
                    return Err(PlayerError::OptionOutOfRange { index: i, count });
                }
            }
            _ => {
                return Err(PlayerError::AnswerKindMismatch {
                    question_id: question.id.clone(),
                })
            }
        }

        let correct = question.is_correct(answer);
        self.responses[index] = Some(answer);
        if correct {
            self.correct_count += 1;
        }
        debug!("题目 {} 作答 {} ({})", question.id, answer, if correct { "正确" } else { "错误" });
        Ok(correct)
    }

    /// 当前题目已作答时才能前进
    pub fn can_advance(&self) -> bool {
        self.current_response().is_some()
    }

    /// 前进到下一题；最后一题时出成绩并上报
    pub fn advance(&mut self) -> Result<&PlayerState, PlayerError> {
        let PlayerState::Presenting { index } = self.state else {
            return Err(PlayerError::invalid(self.state.name(), "advance"));
        };
        if self.responses[index].is_none() {
            return Err(PlayerError::NoResponse { index });
        }

        if index + 1 < self.questions.len() {
            self.state = PlayerState::Presenting { index: index + 1 };
        } else {
            self.state = PlayerState::Reporting(self.report());
        }
        Ok(&self.state)
    }

    /// 重新开始：只能在出成绩后调用，题目顺序不变
    pub fn restart(&mut self) -> Result<&PlayerState, PlayerError> {
        if !matches!(self.state, PlayerState::Reporting(_)) {
            return Err(PlayerError::invalid(self.state.name(), "restart"));
        }

        self.responses = vec![None; self.questions.len()];
        self.correct_count = 0;
        self.runtime.initialize();
        self.runtime
            .set_value(LESSON_STATUS_KEY, LessonStatus::Incomplete.as_str());
        self.runtime.commit();
        self.state = PlayerState::Presenting { index: 0 };
        Ok(&self.state)
    }

    fn report(&mut self) -> ScoreReport {
        let total = self.questions.len();
        let percentage = score_percentage(self.correct_count, total);
        let status = status_for(percentage);

        self.runtime.set_value(SCORE_RAW_KEY, &percentage.to_string());
        self.runtime.set_value(LESSON_STATUS_KEY, status.as_str());
        self.runtime.commit();
        self.runtime.finish();

        info!(
            "📊 测验完成: {}/{} 正确, 得分 {}, 状态 {}",
            self.correct_count, total, percentage, status
        );

        let answers = self
            .questions
            .iter()
            .zip(&self.responses)
            .filter_map(|(question, response)| {
                response.map(|response| AnswerReview {
                    question_id: question.id.clone(),
                    response,
                    correct: question.is_correct(response),
                })
            })
            .collect();

        ScoreReport {
            correct: self.correct_count,
            total,
            percentage,
            status,
            answers,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::question::Difficulty;
    use crate::services::runtime_api::InMemoryRuntime;

    fn tf(id: &str, answer: bool) -> Question {
        Question {
            id: id.to_string(),
            kind: QuestionKind::TrueFalse,
            difficulty: Difficulty::Easy,
            prompt: id.to_string(),
            options: None,
            correct_answer: Answer::Bool(answer),
            explanation: None,
        }
    }

    fn mc(id: &str, correct: usize) -> Question {
        Question {
            id: id.to_string(),
            kind: QuestionKind::MultipleChoice,
            difficulty: Difficulty::Normal,
            prompt: id.to_string(),
            options: Some(vec!["a".into(), "b".into(), "c".into(), "d".into()]),
            correct_answer: Answer::Index(correct),
            explanation: None,
        }
    }

    fn five_true_false() -> Vec<Question> {
        (0..5).map(|i| tf(&format!("q{i}"), true)).collect()
    }

    fn play(player: &mut QuizPlayer<InMemoryRuntime>, answers: &[Answer]) {
        for answer in answers {
            player.select(*answer).unwrap();
            player.advance().unwrap();
        }
    }

    #[test]
    fn score_rounds_like_math_round() {
        assert_eq!(score_percentage(3, 5), 60);
        assert_eq!(score_percentage(2, 5), 40);
        assert_eq!(score_percentage(1, 3), 33);
        assert_eq!(score_percentage(2, 3), 67);
        assert_eq!(score_percentage(1, 8), 13);
        assert_eq!(score_percentage(0, 0), 0);
        assert_eq!(status_for(60), LessonStatus::Passed);
        assert_eq!(status_for(59), LessonStatus::Failed);
    }

    #[test]
    fn three_of_five_passes() {
        let mut player = QuizPlayer::new(InMemoryRuntime::new());
        player.load(five_true_false()).unwrap();
        let (t, f) = (Answer::Bool(true), Answer::Bool(false));
        play(&mut player, &[t, f, t, f, t]);

        let PlayerState::Reporting(report) = player.state() else {
            panic!("应处于出成绩状态");
        };
        assert_eq!(report.percentage, 60);
        assert_eq!(report.status, LessonStatus::Passed);
        assert_eq!(report.answers.len(), 5);
        assert!(!report.answers[1].correct);

        let runtime = player.runtime();
        assert_eq!(runtime.get_value(SCORE_RAW_KEY), "60");
        assert_eq!(runtime.get_value(LESSON_STATUS_KEY), "passed");
        assert_eq!(runtime.finish_calls(), 1);
        assert_eq!(runtime.committed().unwrap().lesson_status, LessonStatus::Passed);
    }

    #[test]
    fn two_of_five_fails() {
        let mut player = QuizPlayer::new(InMemoryRuntime::new());
        player.load(five_true_false()).unwrap();
        let (t, f) = (Answer::Bool(true), Answer::Bool(false));
        play(&mut player, &[f, t, f, t, f]);

        let runtime = player.into_runtime();
        assert_eq!(runtime.get_value(SCORE_RAW_KEY), "40");
        assert_eq!(runtime.get_value(LESSON_STATUS_KEY), "failed");
    }

    #[test]
    fn correct_count_updates_when_answer_is_recorded() {
        let mut player = QuizPlayer::new(InMemoryRuntime::new());
        player.load(vec![mc("m0", 2), mc("m1", 0)]).unwrap();
        assert_eq!(player.correct_count(), 0);
        assert!(player.select(Answer::Index(2)).unwrap());
        assert_eq!(player.correct_count(), 1);
    }

    #[test]
    fn advance_requires_a_response() {
        let mut player = QuizPlayer::new(InMemoryRuntime::new());
        player.load(vec![tf("q0", true), tf("q1", false)]).unwrap();

        assert!(!player.can_advance());
        assert_eq!(player.advance().unwrap_err(), PlayerError::NoResponse { index: 0 });

        player.select(Answer::Bool(true)).unwrap();
        assert!(player.can_advance());
        assert_eq!(player.advance().unwrap(), &PlayerState::Presenting { index: 1 });
    }

    #[test]
    fn response_is_recorded_once() {
        let mut player = QuizPlayer::new(InMemoryRuntime::new());
        player.load(vec![tf("q0", true)]).unwrap();
        player.select(Answer::Bool(false)).unwrap();
        assert_eq!(
            player.select(Answer::Bool(true)).unwrap_err(),
            PlayerError::AlreadyAnswered { index: 0 }
        );
        assert_eq!(player.correct_count(), 0);
    }

    #[test]
    fn rejects_answers_that_do_not_fit_the_question() {
        let mut player = QuizPlayer::new(InMemoryRuntime::new());
        player.load(vec![mc("m0", 1), tf("t1", true)]).unwrap();

        assert_eq!(
            player.select(Answer::Index(4)).unwrap_err(),
            PlayerError::OptionOutOfRange { index: 4, count: 4 }
        );
        assert!(matches!(
            player.select(Answer::Bool(true)),
            Err(PlayerError::AnswerKindMismatch { .. })
        ));
        assert!(!player.can_advance());
    }

    #[test]
    fn empty_question_list_enters_no_content() {
        let mut player = QuizPlayer::new(InMemoryRuntime::new());
        assert_eq!(player.load(Vec::new()).unwrap(), &PlayerState::NoContent);
        assert!(player.current().is_none());
        assert!(player.advance().is_err());
        assert!(player.restart().is_err());
        assert_eq!(
            player.runtime().get_value(LESSON_STATUS_KEY),
            "not attempted"
        );
    }

    #[test]
    fn load_sets_incomplete() {
        let mut player = QuizPlayer::new(InMemoryRuntime::new());
        player.load(vec![tf("q0", true)]).unwrap();
        assert_eq!(player.runtime().initialize_calls(), 1);
        assert_eq!(player.runtime().get_value(LESSON_STATUS_KEY), "incomplete");
        assert!(player.load(vec![tf("again", true)]).is_err());
    }

    #[test]
    fn restart_resets_state_and_keeps_order() {
        let mut player = QuizPlayer::new(InMemoryRuntime::new());
        player.load(vec![tf("q0", true), mc("q1", 3)]).unwrap();
        assert!(player.restart().is_err());

        play(&mut player, &[Answer::Bool(true), Answer::Index(3)]);
        let order: Vec<_> = player.questions().iter().map(|q| q.id.clone()).collect();

        assert_eq!(player.restart().unwrap(), &PlayerState::Presenting { index: 0 });
        assert_eq!(player.correct_count(), 0);
        assert_eq!(player.current_response(), None);
        let again: Vec<_> = player.questions().iter().map(|q| q.id.clone()).collect();
        assert_eq!(order, again);

        let runtime = player.runtime();
        assert_eq!(runtime.initialize_calls(), 2);
        assert_eq!(runtime.get_value(LESSON_STATUS_KEY), "incomplete");
    }

    #[test]
    fn load_json_renormalizes_data() {
        let mut player = QuizPlayer::new(InMemoryRuntime::new());
        let state = player
            .load_json(r#"{"hard":{"trueFalse":[{"statement":"s","isTrue":true}],"scramble":[{}]}}"#)
            .unwrap();
        assert_eq!(state, &PlayerState::Presenting { index: 0 });
        assert_eq!(player.questions().len(), 1);
        assert_eq!(player.questions()[0].id, "hard-tf-0");
    }

    #[test]
    fn load_json_rejects_garbage() {
        let mut player = QuizPlayer::new(InMemoryRuntime::new());
        assert!(matches!(player.load_json("[1,2"), Err(PlayerError::InvalidData(_))));
        assert_eq!(player.state(), &PlayerState::Loading);
    }

    #[test]
    fn script_matches_rust_rules() {
        let script = player_script();
        assert!(script.contains(&format!("var PASSING_SCORE = {};", PASSING_SCORE)));
        assert!(script.contains("Math.round((this.correctCount / total) * 100)"));
        assert!(script.contains("var DATA_URL = 'content/questions.json';"));
        assert!(script.contains("var DIFFICULTIES = ['easy', 'normal', 'hard'];"));
        assert!(script.contains("'No questions available.'"));
        assert!(script.contains(LESSON_STATUS_KEY));
        assert!(script.contains(SCORE_RAW_KEY));
    }
}
