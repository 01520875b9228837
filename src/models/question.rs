use serde::{Deserialize, Serialize};
use std::fmt;

/// 难度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Normal,
    Hard,
}

impl Difficulty {
    /// 规范化时的难度顺序
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Normal, Difficulty::Hard];

    /// 获取 JSON 中的键名
    pub fn key(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Normal => "normal",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// 播放器支持的题型
///
/// 声明顺序即规范化时同一难度下的题型顺序。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum QuestionKind {
    TrueFalse,
    MultipleChoice,
}

impl QuestionKind {
    pub const ALL: [QuestionKind; 2] = [QuestionKind::TrueFalse, QuestionKind::MultipleChoice];

    /// 题库 JSON 中该题型的字段名
    pub fn key(self) -> &'static str {
        match self {
            QuestionKind::TrueFalse => "trueFalse",
            QuestionKind::MultipleChoice => "multipleChoice",
        }
    }

    /// 题目 ID 中使用的缩写
    pub fn id_tag(self) -> &'static str {
        match self {
            QuestionKind::TrueFalse => "tf",
            QuestionKind::MultipleChoice => "mc",
        }
    }
}

/// 答案：判断题为布尔值，单选题为选项下标
///
/// 正确答案和学员作答使用同一类型，判分按精确相等比较。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Answer {
    Bool(bool),
    Index(usize),
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Answer::Bool(true) => write!(f, "True"),
            Answer::Bool(false) => write!(f, "False"),
            Answer::Index(i) => write!(f, "#{}", i),
        }
    }
}

/// 规范化后的题目
///
/// 只在规范化时创建，之后不再修改。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    /// 包内唯一 ID，形如 `easy-tf-0`
    pub id: String,
    pub kind: QuestionKind,
    pub difficulty: Difficulty,
    pub prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    pub correct_answer: Answer,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

impl Question {
    /// 可选项数量（判断题固定为 2）
    pub fn option_count(&self) -> usize {
        match self.kind {
            QuestionKind::TrueFalse => 2,
            QuestionKind::MultipleChoice => self.options.as_ref().map_or(0, Vec::len),
        }
    }

    /// 判断作答是否正确
    pub fn is_correct(&self, answer: Answer) -> bool {
        answer == self.correct_answer
    }
}
