//! 批量导出处理器 - 编排层
//!
//! ## 职责
//!
//! 批量导出程序的入口，负责加载题库文件、并发导出和统计。
//!
//! ## 核心功能
//!
//! 1. **应用初始化**：初始化日志文件，校验配置
//! 2. **批量加载**：扫描并加载题库目录下的所有 JSON / TOML 文件
//! 3. **并发控制**：使用 Semaphore 限制同时导出的数量
//! 4. **全局统计**：汇总成功、失败和含跳过题目的包数量
//!
//! 每个导出任务各自组装归档，任务之间不共享可变状态。

use crate::config::Config;
use crate::models::{load_all_quiz_files, QuizDocument};
use crate::orchestrator::exporter::{
    export_package, package_file_name, save_package, unique_package_file_names,
};
use crate::utils::logging::{
    append_log_line, init_log_file, log_quizzes_loaded, log_startup, print_final_stats,
    truncate_text,
};
use anyhow::{Context, Result};
use futures::future::join_all;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{error, info, warn};

/// 应用主结构
pub struct App {
    config: Config,
}

/// 导出统计
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ExportStats {
    pub success: usize,
    pub failed: usize,
    /// 导出成功但有题目因题型不支持被跳过
    pub with_warnings: usize,
    pub total: usize,
}

/// 单个任务的结果
enum TaskOutcome {
    Saved { path: PathBuf, dropped: usize },
    Failed(String),
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        config.validate()?;

        // 初始化日志文件
        init_log_file(&config.output_log_file, &config.output_dir)
            .with_context(|| format!("无法创建日志文件: {}", config.output_log_file))?;

        log_startup(&config);

        Ok(Self { config })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// 运行应用主逻辑
    pub async fn run(&self) -> Result<ExportStats> {
        let documents = load_all_quiz_files(&self.config.quiz_folder)
            .await
            .with_context(|| format!("无法加载题库目录: {}", self.config.quiz_folder))?;

        if documents.is_empty() {
            warn!("⚠️ 没有找到待导出的题库文件，程序结束");
            return Ok(ExportStats::default());
        }

        log_quizzes_loaded(documents.len(), self.config.max_concurrent_exports);

        let stats = self.export_all(documents).await;

        print_final_stats(
            stats.success,
            stats.failed,
            stats.with_warnings,
            stats.total,
            &self.config.output_log_file,
        );

        Ok(stats)
    }

    /// 并发导出所有题库
    async fn export_all(&self, documents: Vec<QuizDocument>) -> ExportStats {
        let semaphore = Arc::new(Semaphore::new(self.config.max_concurrent_exports));
        let output_dir = PathBuf::from(&self.config.output_dir);

        // 文件名在派发任务前统一分配，同名题库不会写到同一个路径
        let titles: Vec<String> = documents.iter().map(QuizDocument::display_title).collect();
        let file_names = unique_package_file_names(titles.iter().map(String::as_str));

        let jobs = documents.into_iter().zip(titles).zip(file_names);
        let handles = jobs.enumerate().map(|(idx, ((document, title), file_name))| {
            let semaphore = semaphore.clone();
            let output_dir = output_dir.clone();

            if file_name != package_file_name(&title) {
                warn!("⚠️ [题库 {}] 文件名重复，改存为: {}", idx + 1, file_name);
            }

            let handle = tokio::spawn(async move {
                let _permit = match semaphore.acquire_owned().await {
                    Ok(permit) => permit,
                    Err(e) => return TaskOutcome::Failed(e.to_string()),
                };
                info!("[题库 {}] 开始导出: {}", idx + 1, truncate_text(&title, 40));

                let result = match export_package(&document.quiz, &title).await {
                    Ok(mut package) => {
                        package.file_name = file_name;
                        save_package(&package, &output_dir)
                            .await
                            .map(|path| (path, package.dropped.total))
                    }
                    Err(e) => Err(e),
                };

                match result {
                    Ok((path, dropped)) => TaskOutcome::Saved { path, dropped },
                    Err(e) => {
                        error!("[题库 {}] ❌ 导出失败: {}", idx + 1, e);
                        TaskOutcome::Failed(e.to_string())
                    }
                }
            });
            (idx + 1, handle)
        });

        let (indices, handles): (Vec<_>, Vec<_>) = handles.unzip();
        let results = join_all(handles).await;

        let mut stats = ExportStats {
            total: results.len(),
            ..Default::default()
        };

        for (index, result) in indices.into_iter().zip(results) {
            let line = match result {
                Ok(TaskOutcome::Saved { path, dropped }) => {
                    stats.success += 1;
                    if dropped > 0 {
                        stats.with_warnings += 1;
                        format!("[{}] ok (跳过 {} 道题): {}", index, dropped, path.display())
                    } else {
                        format!("[{}] ok: {}", index, path.display())
                    }
                }
                Ok(TaskOutcome::Failed(reason)) => {
                    stats.failed += 1;
                    format!("[{}] failed: {}", index, reason)
                }
                Err(e) => {
                    error!("[题库 {}] 任务执行失败: {}", index, e);
                    stats.failed += 1;
                    format!("[{}] failed: {}", index, e)
                }
            };

            if let Err(e) = append_log_line(&self.config.output_log_file, &line) {
                warn!("写入日志文件失败: {}", e);
            }
        }

        stats
    }
}
