//! 导出入口 - 编排层
//!
//! 对外的两个操作：
//! - `export_package`：题库 + 标题 → zip 字节
//! - `download_package`：导出并保存为 `{title}_SCORM.zip`
//!
//! 每次调用独立组装自己的归档，可以安全地并发调用。

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::OnceLock;

use regex::Regex;
use tracing::{info, warn};

use crate::error::PackageError;
use crate::models::quiz::QuizData;
use crate::services::normalizer::DroppedQuestions;
use crate::workflow::package_flow::PackageAssembler;

const PACKAGE_SUFFIX: &str = "_SCORM.zip";

/// 导出结果
#[derive(Debug, Clone)]
pub struct ExportedPackage {
    /// 建议的文件名
    pub file_name: String,
    /// zip 字节
    pub bytes: Vec<u8>,
    /// 播放器可用的题目数
    pub question_count: usize,
    /// 因题型不支持而跳过的题目（非致命警告）
    pub dropped: DroppedQuestions,
    /// 清单中声明的文件
    pub files: Vec<String>,
}

impl ExportedPackage {
    pub fn has_warnings(&self) -> bool {
        !self.dropped.is_empty()
    }
}

/// 导出 SCORM 包
///
/// 失败时不返回任何部分结果。
pub async fn export_package(quiz: &QuizData, title: &str) -> Result<ExportedPackage, PackageError> {
    let assembled = PackageAssembler::new(title).assemble(quiz)?;

    let question_count = assembled.normalized.questions.len();
    let dropped = assembled.normalized.dropped.clone();
    let files = assembled.manifest.resource_files().to_vec();

    let bytes = assembled.compress().await?;

    if !dropped.is_empty() {
        warn!(
            "⚠️ [{}] 有 {} 道题因题型不支持未放入播放器",
            title, dropped.total
        );
    }
    info!("✓ [{}] 导出完成: {} 道题, {} 字节", title, question_count, bytes.len());

    Ok(ExportedPackage {
        file_name: package_file_name(title),
        bytes,
        question_count,
        dropped,
        files,
    })
}

/// 导出并保存到目录，返回文件路径
pub async fn download_package(
    quiz: &QuizData,
    title: &str,
    output_dir: &Path,
) -> Result<PathBuf, PackageError> {
    let package = export_package(quiz, title).await?;
    save_package(&package, output_dir).await
}

/// 把导出结果保存为 `output_dir/{file_name}`
///
/// 先写临时文件再改名，目标路径上不会出现不完整的包。
/// 每次调用的临时文件名都不同，同名目标上后完成的写入覆盖先完成的。
pub async fn save_package(
    package: &ExportedPackage,
    output_dir: &Path,
) -> Result<PathBuf, PackageError> {
    static NEXT_PART: AtomicU64 = AtomicU64::new(0);

    tokio::fs::create_dir_all(output_dir).await?;
    let target = output_dir.join(&package.file_name);
    let partial = output_dir.join(format!(
        "{}.{}-{}.part",
        package.file_name,
        std::process::id(),
        NEXT_PART.fetch_add(1, Ordering::Relaxed)
    ));

    tokio::fs::write(&partial, &package.bytes).await?;
    if let Err(e) = tokio::fs::rename(&partial, &target).await {
        let _ = tokio::fs::remove_file(&partial).await;
        return Err(e.into());
    }

    info!("💾 已保存: {}", target.display());
    Ok(target)
}

/// 包文件名：`{title}_SCORM.zip`
///
/// 标题中的路径分隔符和文件系统保留字符替换为 `_`。
pub fn package_file_name(title: &str) -> String {
    format!("{}{}", safe_file_stem(title), PACKAGE_SUFFIX)
}

/// 为一批标题分配互不相同的包文件名，顺序与输入一致
///
/// 清理后重名（不区分大小写）的标题依次加 `_2`、`_3` 后缀。
pub fn unique_package_file_names<'a>(titles: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut taken = HashSet::new();
    titles
        .into_iter()
        .map(|title| {
            let stem = safe_file_stem(title);
            let mut candidate = stem.clone();
            let mut n = 1;
            while !taken.insert(candidate.to_lowercase()) {
                n += 1;
                candidate = format!("{}_{}", stem, n);
            }
            format!("{}{}", candidate, PACKAGE_SUFFIX)
        })
        .collect()
}

fn safe_file_stem(title: &str) -> String {
    static RESERVED: OnceLock<Option<Regex>> = OnceLock::new();
    RESERVED
        .get_or_init(|| Regex::new(r#"[/\\:*?"<>|\x00-\x1f]"#).ok())
        .as_ref()
        .map(|re| re.replace_all(title, "_").into_owned())
        .unwrap_or_else(|| title.to_string())
}
