use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 打包相关错误
    #[error("打包错误: {0}")]
    Package(#[from] PackageError),
    /// 播放器状态机错误
    #[error("播放器错误: {0}")]
    Player(#[from] PlayerError),
    /// 题目文件加载错误
    #[error("加载错误: {0}")]
    Load(#[from] LoadError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
}

/// 打包错误
///
/// 打包要么返回完整一致的归档，要么返回这里的某个错误，不存在半成品。
#[derive(Debug, Error)]
pub enum PackageError {
    /// 题目数据无法序列化为 JSON
    #[error("题目数据序列化失败: {0}")]
    Serialization(#[from] serde_json::Error),
    /// zip 压缩失败
    #[error("压缩归档失败: {0}")]
    Compression(#[from] zip::result::ZipError),
    /// 读写失败
    #[error("归档读写失败: {0}")]
    Io(#[from] std::io::Error),
    /// 同一路径被写入两次
    #[error("归档中存在重复路径: {path}")]
    DuplicateEntry { path: String },
    /// 归档中缺少必需的文件
    #[error("归档中缺少文件: {path}")]
    MissingEntry { path: String },
    /// 清单声明的文件与归档实际内容不一致
    #[error("清单文件列表与归档内容不一致: 声明 {declared:?}, 实际 {actual:?}")]
    ManifestMismatch {
        declared: Vec<String>,
        actual: Vec<String>,
    },
    /// 后台压缩任务异常终止
    #[error("压缩任务异常终止: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

/// 播放器状态机错误
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlayerError {
    /// 当前状态不允许该操作
    #[error("状态 {state} 下不允许操作: {action}")]
    InvalidTransition {
        state: &'static str,
        action: &'static str,
    },
    /// 当前题目尚未作答，不能前进
    #[error("第 {index} 题尚未作答")]
    NoResponse { index: usize },
    /// 当前题目已经作答
    #[error("第 {index} 题已经作答")]
    AlreadyAnswered { index: usize },
    /// 答案类型与题型不符
    #[error("答案类型与题型不符 (题目: {question_id})")]
    AnswerKindMismatch { question_id: String },
    /// 选项索引超出范围
    #[error("选项 {index} 超出范围 (共 {count} 个选项)")]
    OptionOutOfRange { index: usize, count: usize },
    /// questions.json 无法解析
    #[error("题目数据解析失败: {0}")]
    InvalidData(String),
}

/// 题目文件加载错误
#[derive(Debug, Error)]
pub enum LoadError {
    /// 目录不存在
    #[error("目录不存在: {path}")]
    DirectoryNotFound { path: String },
    /// 读取文件失败
    #[error("读取文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// JSON 解析失败
    #[error("JSON解析失败 ({path}): {source}")]
    JsonParseFailed {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    /// TOML 解析失败
    #[error("TOML解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    /// 不支持的文件扩展名
    #[error("不支持的文件类型: {path}")]
    UnsupportedExtension { path: String },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 配置文件读取失败
    #[error("无法读取配置文件 {path}: {source}")]
    FileReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 配置文件解析失败
    #[error("无法解析配置文件 {path}: {source}")]
    FileParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    /// 并发数必须大于 0
    #[error("max_concurrent_exports 必须大于 0")]
    ZeroConcurrency,
}

// ========== 便捷构造函数 ==========

impl PlayerError {
    pub(crate) fn invalid(state: &'static str, action: &'static str) -> Self {
        PlayerError::InvalidTransition { state, action }
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
