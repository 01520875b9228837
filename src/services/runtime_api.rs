//! 运行时 API - 业务能力层
//!
//! 两部分：
//! - `runtime_api_script()`：写入包内的 `scorm-api.js`，纯静态文本，可跨导出复用
//! - `RuntimeApi` trait：同一协议的 Rust 接口，注入到播放器状态机中；
//!   `InMemoryRuntime` 是没有宿主 LMS 时的默认实现

use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

/// 写入包内的运行时 API 脚本
const SCORM_API_JS: &str = include_str!("../assets/scorm-api.js");

/// 课程状态键
pub const LESSON_STATUS_KEY: &str = "cmi.core.lesson_status";
/// 原始分数键
pub const SCORE_RAW_KEY: &str = "cmi.core.score.raw";

/// 宿主会探测的方法名，名称固定
pub const METHOD_NAMES: [&str; 8] = [
    "LMSInitialize",
    "LMSFinish",
    "LMSGetValue",
    "LMSSetValue",
    "LMSCommit",
    "LMSGetLastError",
    "LMSGetErrorString",
    "LMSGetDiagnostic",
];

/// 获取运行时 API 脚本
///
/// 与题库内容无关，每次调用返回同一份文本。
pub fn runtime_api_script() -> &'static str {
    SCORM_API_JS
}

/// 课程状态（SCORM 1.2 词表）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LessonStatus {
    #[default]
    NotAttempted,
    Incomplete,
    Completed,
    Passed,
    Failed,
    Browsed,
}

impl LessonStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            LessonStatus::NotAttempted => "not attempted",
            LessonStatus::Incomplete => "incomplete",
            LessonStatus::Completed => "completed",
            LessonStatus::Passed => "passed",
            LessonStatus::Failed => "failed",
            LessonStatus::Browsed => "browsed",
        }
    }

    /// 从词表字符串解析，不在词表内返回 None
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "not attempted" => Some(LessonStatus::NotAttempted),
            "incomplete" => Some(LessonStatus::Incomplete),
            "completed" => Some(LessonStatus::Completed),
            "passed" => Some(LessonStatus::Passed),
            "failed" => Some(LessonStatus::Failed),
            "browsed" => Some(LessonStatus::Browsed),
            _ => None,
        }
    }
}

impl fmt::Display for LessonStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 运行时通信协议
///
/// 方法与 `scorm-api.js` 中的 `LMS*` 方法一一对应。
pub trait RuntimeApi {
    fn initialize(&mut self) -> bool;
    fn finish(&mut self) -> bool;
    /// 只有课程状态和原始分数两个键有意义，其他键返回空字符串
    fn get_value(&self, key: &str) -> String;
    fn set_value(&mut self, key: &str, value: &str) -> bool;
    fn commit(&mut self) -> bool;

    fn get_last_error(&self) -> String {
        "0".to_string()
    }

    fn get_error_string(&self) -> String {
        "No Error".to_string()
    }

    fn get_diagnostic(&self) -> String {
        String::new()
    }
}

/// 运行时状态
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuntimeState {
    pub lesson_status: LessonStatus,
    /// 空字符串在协议中表示"无分数"，这里用 None 表示
    pub score_raw: Option<String>,
}

/// 内存中的运行时实现
///
/// 没有宿主 LMS 时使用，行为与包内脚本一致；另外记录调用次数方便断言。
#[derive(Debug, Clone, Default)]
pub struct InMemoryRuntime {
    state: RuntimeState,
    initialize_calls: usize,
    commit_calls: usize,
    finish_calls: usize,
    /// 最近一次提交时的状态快照
    committed: Option<RuntimeState>,
}

impl InMemoryRuntime {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &RuntimeState {
        &self.state
    }

    pub fn committed(&self) -> Option<&RuntimeState> {
        self.committed.as_ref()
    }

    pub fn initialize_calls(&self) -> usize {
        self.initialize_calls
    }

    pub fn commit_calls(&self) -> usize {
        self.commit_calls
    }

    pub fn finish_calls(&self) -> usize {
        self.finish_calls
    }
}

impl RuntimeApi for InMemoryRuntime {
    fn initialize(&mut self) -> bool {
        self.initialize_calls += 1;
        true
    }

    fn finish(&mut self) -> bool {
        self.finish_calls += 1;
        true
    }

    fn get_value(&self, key: &str) -> String {
        match key {
            LESSON_STATUS_KEY => self.state.lesson_status.as_str().to_string(),
            SCORE_RAW_KEY => self.state.score_raw.clone().unwrap_or_default(),
            _ => String::new(),
        }
    }

    fn set_value(&mut self, key: &str, value: &str) -> bool {
        match key {
            LESSON_STATUS_KEY => match LessonStatus::parse(value) {
                Some(status) => {
                    self.state.lesson_status = status;
                    true
                }
                None => false,
            },
            SCORE_RAW_KEY => {
                if value.is_empty() {
                    self.state.score_raw = None;
                    true
                } else if is_score(value) {
                    self.state.score_raw = Some(value.to_string());
                    true
                } else {
                    false
                }
            }
            // 其他键接受但不保存
            _ => true,
        }
    }

    fn commit(&mut self) -> bool {
        self.commit_calls += 1;
        self.committed = Some(self.state.clone());
        true
    }
}

/// 原始分数的合法写法，与 `scorm-api.js` 中的 `DECIMAL` 相同
const SCORE_PATTERN: &str = r"^[ \t]*[+-]?([0-9]+\.?[0-9]*|\.[0-9]+)[ \t]*$";

fn is_score(value: &str) -> bool {
    static DECIMAL: OnceLock<Option<Regex>> = OnceLock::new();
    DECIMAL
        .get_or_init(|| Regex::new(SCORE_PATTERN).ok())
        .as_ref()
        .is_some_and(|re| re.is_match(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_is_static_and_exposes_every_method() {
        let first = runtime_api_script();
        let second = runtime_api_script();
        assert_eq!(first, second);
        assert!(first.contains("global.API = {"));
        for name in METHOD_NAMES {
            assert!(first.contains(&format!("{}: function", name)), "缺少方法 {}", name);
        }
        assert!(first.contains(LESSON_STATUS_KEY));
        assert!(first.contains(SCORE_RAW_KEY));
        assert!(first.contains("return 'No Error';"));
    }

    #[test]
    fn values_set_are_observable() {
        let mut api = InMemoryRuntime::new();
        assert!(api.initialize());
        assert_eq!(api.get_value(LESSON_STATUS_KEY), "not attempted");
        assert_eq!(api.get_value(SCORE_RAW_KEY), "");

        assert!(api.set_value(LESSON_STATUS_KEY, "incomplete"));
        assert!(api.set_value(SCORE_RAW_KEY, "80"));
        assert_eq!(api.get_value(LESSON_STATUS_KEY), "incomplete");
        assert_eq!(api.get_value(SCORE_RAW_KEY), "80");
    }

    #[test]
    fn unknown_keys_read_empty() {
        let mut api = InMemoryRuntime::new();
        assert!(api.set_value("cmi.core.student_name", "Ada"));
        assert_eq!(api.get_value("cmi.core.student_name"), "");
    }

    #[test]
    fn invalid_values_are_rejected_without_state_change() {
        let mut api = InMemoryRuntime::new();
        assert!(!api.set_value(LESSON_STATUS_KEY, "done"));
        assert!(!api.set_value(SCORE_RAW_KEY, "eighty"));
        assert_eq!(api.state(), &RuntimeState::default());
    }

    #[test]
    fn score_accepts_plain_decimals_only() {
        let mut api = InMemoryRuntime::new();
        for value in ["85", "100", "0", " 42 ", "+7", "66.5", ".5", "5."] {
            assert!(api.set_value(SCORE_RAW_KEY, value), "应接受 {:?}", value);
        }
        for value in ["0x10", "0b1", "1e3", "Infinity", "NaN", "٣", "abc", "  ", "1 2"] {
            assert!(!api.set_value(SCORE_RAW_KEY, value), "应拒绝 {:?}", value);
        }
        assert_eq!(api.get_value(SCORE_RAW_KEY), "5.");
    }

    #[test]
    fn script_uses_the_same_score_grammar() {
        let literal = format!("var DECIMAL = /{}/;", SCORE_PATTERN);
        assert!(runtime_api_script().contains(&literal));
    }

    #[test]
    fn error_queries_are_fixed() {
        let api = InMemoryRuntime::new();
        assert_eq!(api.get_last_error(), "0");
        assert_eq!(api.get_error_string(), "No Error");
        assert_eq!(api.get_diagnostic(), "");
    }

    #[test]
    fn commit_snapshots_state() {
        let mut api = InMemoryRuntime::new();
        api.set_value(SCORE_RAW_KEY, "40");
        assert!(api.commit());
        api.set_value(SCORE_RAW_KEY, "");
        assert_eq!(api.committed().unwrap().score_raw.as_deref(), Some("40"));
        assert_eq!(api.state().score_raw, None);
        assert_eq!(api.commit_calls(), 1);
    }
}
