//! 题目规范化服务 - 业务能力层
//!
//! 把按难度、题型分组的题库展平成播放器使用的统一题目列表。
//!
//! 顺序：难度（easy → normal → hard）→ 题型声明顺序 → 题型内原始顺序。
//! 播放器不支持的题型直接跳过，但会计数，作为非致命警告返回给调用方。

use std::collections::BTreeMap;

use phf::phf_map;
use serde_json::Value as JsonValue;
use tracing::{debug, warn};

use crate::models::question::{Answer, Difficulty, Question, QuestionKind};
use crate::models::quiz::{QuizCategory, QuizData};

/// 题型字段名 → 中文名称（仅用于日志）
static KIND_LABELS: phf::Map<&'static str, &'static str> = phf_map! {
    "trueFalse" => "判断题",
    "multipleChoice" => "单选题",
    "fillInBlank" => "填空题",
    "fillInTheBlank" => "填空题",
    "scramble" => "排序题",
    "matching" => "连线题",
    "shortAnswer" => "简答题",
};

/// 获取题型的显示名称，未知题型原样返回
pub fn kind_label(key: &str) -> &str {
    KIND_LABELS.get(key).copied().unwrap_or(key)
}

/// 被跳过的题目统计
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DroppedQuestions {
    /// 跳过的题目总数
    pub total: usize,
    /// 按题型字段名统计
    pub by_kind: BTreeMap<String, usize>,
}

impl DroppedQuestions {
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    fn record(&mut self, kind: &str, count: usize) {
        if count == 0 {
            return;
        }
        self.total += count;
        *self.by_kind.entry(kind.to_string()).or_insert(0) += count;
    }
}

/// 规范化结果
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedQuiz {
    pub questions: Vec<Question>,
    pub dropped: DroppedQuestions,
}

/// 规范化题库
///
/// 空题库得到空列表，不是错误。
pub fn normalize(quiz: &QuizData) -> NormalizedQuiz {
    let mut result = NormalizedQuiz::default();

    for difficulty in Difficulty::ALL {
        let Some(category) = quiz.category(difficulty) else {
            continue;
        };
        normalize_category(difficulty, category, &mut result);
    }

    if !result.dropped.is_empty() {
        let summary = result
            .dropped
            .by_kind
            .iter()
            .map(|(kind, count)| format!("{} x{}", kind_label(kind), count))
            .collect::<Vec<_>>()
            .join(", ");
        warn!(
            "⚠️ 播放器不支持的题型已跳过 {} 道: {}",
            result.dropped.total, summary
        );
    }
    debug!("规范化完成，共 {} 道题", result.questions.len());

    result
}

fn normalize_category(difficulty: Difficulty, category: &QuizCategory, out: &mut NormalizedQuiz) {
    for kind in QuestionKind::ALL {
        match kind {
            QuestionKind::TrueFalse => {
                for (index, item) in category.true_false.iter().enumerate() {
                    out.questions.push(Question {
                        id: question_id(difficulty, kind, index),
                        kind,
                        difficulty,
                        prompt: item.statement.clone(),
                        options: None,
                        correct_answer: Answer::Bool(item.is_true),
                        explanation: item.explanation.clone(),
                    });
                }
            }
            QuestionKind::MultipleChoice => {
                for (index, item) in category.multiple_choice.iter().enumerate() {
                    let id = question_id(difficulty, kind, index);
                    if item.correct_answer >= item.options.len() {
                        warn!(
                            "题目 {} 的正确答案下标 {} 超出选项范围 ({} 个选项)",
                            id,
                            item.correct_answer,
                            item.options.len()
                        );
                    }
                    out.questions.push(Question {
                        id,
                        kind,
                        difficulty,
                        prompt: item.question.clone(),
                        options: Some(item.options.clone()),
                        correct_answer: Answer::Index(item.correct_answer),
                        explanation: item.explanation.clone(),
                    });
                }
            }
        }
    }

    for (kind, value) in &category.other {
        out.dropped.record(kind, dropped_count(value));
    }
}

/// 不支持的题型只统计数组里的条目，其他形态的值不算题目
fn dropped_count(value: &JsonValue) -> usize {
    value.as_array().map_or(0, Vec::len)
}

fn question_id(difficulty: Difficulty, kind: QuestionKind, index: usize) -> String {
    format!("{}-{}-{}", difficulty.key(), kind.id_tag(), index)
}
