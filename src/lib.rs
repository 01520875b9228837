//! # Quiz SCORM Export
//!
//! 把按难度分组的题库打包成可被 LMS 加载的 SCORM 1.2 学习包
//!
//! ## 架构设计
//!
//! 本系统采用四层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有归档资源，只暴露存取与压缩能力
//! - `Archive` - 内存中的"路径 → 内容"映射，最终压缩为 zip
//!
//! ### ② 业务能力层（Services）
//! - `normalizer` - 题库规范化（按难度、题型展平）
//! - `runtime_api` - 运行时 API 脚本和 `RuntimeApi` 接口
//! - `quiz_player` - 播放器脚本和同一状态机的 Rust 实现
//! - `manifest` - `imsmanifest.xml` 生成，统一转义
//! - `launch_page` - 启动页和样式表
//!
//! ### ③ 流程层（Workflow）
//! - `PackageAssembler` - 组装一个包（规范化 → 写文件 → 生成清单 → 校验）
//!
//! ### ④ 编排层（Orchestration）
//! - `exporter` - `export_package` / `download_package`
//! - `batch_processor` - 批量导出程序，管理并发
//!
//! ## 包内布局
//!
//! ```text
//! imsmanifest.xml
//! index.html
//! quiz.js
//! scorm-api.js
//! styles.css
//! content/questions.json
//! ```

pub mod config;
pub mod error;
pub mod infrastructure;
pub mod logger;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, AppResult, PackageError, PlayerError};
pub use infrastructure::{read_archive, Archive, PACKAGE_LAYOUT};
pub use models::{Answer, Difficulty, Question, QuestionKind, QuizData, QuizDocument};
pub use orchestrator::{
    download_package, export_package, preview_package, App, ExportStats, ExportedPackage,
};
pub use services::{normalize, InMemoryRuntime, LessonStatus, QuizPlayer, RuntimeApi};
pub use workflow::PackageAssembler;
