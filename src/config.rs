use serde::Deserialize;
use std::path::Path;

use crate::error::ConfigError;

/// 默认配置文件名
pub const DEFAULT_CONFIG_FILE: &str = "quiz_export.toml";

/// 批量导出程序配置
///
/// 只供批量导出程序使用；打包引擎本身只依赖调用参数。
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 题库文件存放目录
    pub quiz_folder: String,
    /// 导出包存放目录
    pub output_dir: String,
    /// 同时导出的包数量
    pub max_concurrent_exports: usize,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 输出日志文件
    pub output_log_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            quiz_folder: "quizzes".to_string(),
            output_dir: "packages".to_string(),
            max_concurrent_exports: 4,
            verbose_logging: false,
            output_log_file: "export_log.txt".to_string(),
        }
    }
}

impl Config {
    /// 从环境变量读取，未设置或无法解析的项使用 `base` 中的值
    pub fn from_env_over(base: Self) -> Self {
        Self {
            quiz_folder: std::env::var("QUIZ_FOLDER").unwrap_or(base.quiz_folder),
            output_dir: std::env::var("OUTPUT_DIR").unwrap_or(base.output_dir),
            max_concurrent_exports: std::env::var("MAX_CONCURRENT_EXPORTS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(base.max_concurrent_exports),
            verbose_logging: std::env::var("VERBOSE_LOGGING")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(base.verbose_logging),
            output_log_file: std::env::var("OUTPUT_LOG_FILE").unwrap_or(base.output_log_file),
        }
    }

    pub fn from_env() -> Self {
        Self::from_env_over(Self::default())
    }

    /// 从 TOML 文件读取，缺失的项使用默认值
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::FileReadFailed {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content).map_err(|source| ConfigError::FileParseFailed {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// 加载配置：配置文件（`CONFIG_FILE` 或默认文件名，存在时）→ 环境变量覆盖
    pub fn load() -> Result<Self, ConfigError> {
        let explicit = std::env::var("CONFIG_FILE").ok();
        let path = explicit.as_deref().unwrap_or(DEFAULT_CONFIG_FILE);

        let base = if explicit.is_some() || Path::new(path).exists() {
            Self::from_toml_file(Path::new(path))?
        } else {
            Self::default()
        };

        let config = Self::from_env_over(base);
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_concurrent_exports == 0 {
            return Err(ConfigError::ZeroConcurrency);
        }
        Ok(())
    }
}
