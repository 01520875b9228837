//! 题库输入数据
//!
//! 按难度分组的原始题目结构，由上游的题目生成环节产出。
//! 打包时会原样写入 `content/questions.json`，因此这里的序列化格式就是包内数据格式。

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;

use crate::models::question::Difficulty;

/// 按难度分组的题库
///
/// 缺失的难度视为空分组，不是错误。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuizData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub easy: Option<QuizCategory>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub normal: Option<QuizCategory>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hard: Option<QuizCategory>,
}

impl QuizData {
    /// 获取指定难度的分组
    pub fn category(&self, difficulty: Difficulty) -> Option<&QuizCategory> {
        match difficulty {
            Difficulty::Easy => self.easy.as_ref(),
            Difficulty::Normal => self.normal.as_ref(),
            Difficulty::Hard => self.hard.as_ref(),
        }
    }

    /// 获取指定难度的分组（可写），不存在时创建空分组
    pub fn category_mut(&mut self, difficulty: Difficulty) -> &mut QuizCategory {
        let slot = match difficulty {
            Difficulty::Easy => &mut self.easy,
            Difficulty::Normal => &mut self.normal,
            Difficulty::Hard => &mut self.hard,
        };
        slot.get_or_insert_with(QuizCategory::default)
    }
}

/// 单个难度下的题目，按题型分组
///
/// 播放器支持的题型有独立字段；其余题型（填空、排序、连线等）原样保存在 `other` 中，
/// 保证重新序列化时数据不丢失。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizCategory {
    #[serde(default)]
    pub true_false: Vec<TrueFalseItem>,
    #[serde(default)]
    pub multiple_choice: Vec<MultipleChoiceItem>,
    #[serde(flatten)]
    pub other: BTreeMap<String, JsonValue>,
}

impl QuizCategory {
    /// 是否没有任何题目（包括不支持的题型）
    pub fn is_empty(&self) -> bool {
        self.true_false.is_empty() && self.multiple_choice.is_empty() && self.other.is_empty()
    }
}

/// 判断题
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrueFalseItem {
    pub statement: String,
    pub is_true: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

/// 单选题
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MultipleChoiceItem {
    pub question: String,
    pub options: Vec<String>,
    /// 正确选项的下标（从 0 开始）
    pub correct_answer: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

/// 一个待打包的题库文件
///
/// 批量模式下从 JSON / TOML 文件加载；`title` 缺省时使用文件名。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub quiz: QuizData,
    #[serde(skip_serializing, skip_deserializing)]
    pub file_path: Option<String>,
}

impl QuizDocument {
    /// 获取包标题，没有标题时回退到文件名
    pub fn display_title(&self) -> String {
        if let Some(title) = self.title.as_ref().filter(|t| !t.trim().is_empty()) {
            return title.clone();
        }
        self.file_path
            .as_deref()
            .and_then(|p| std::path::Path::new(p).file_stem())
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "quiz".to_string())
    }
}
