//! 批量导出的日志辅助函数

use anyhow::Result;
use std::fs;
use tracing::info;

use crate::config::Config;

/// 创建导出日志文件，写入开始时间和输出目录
pub fn init_log_file(log_file_path: &str, output_dir: &str) -> Result<()> {
    let rule = "=".repeat(60);
    let started = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
    fs::write(
        log_file_path,
        format!("{rule}\nSCORM 导出日志 - {started}\n输出目录: {output_dir}\n{rule}\n\n"),
    )?;
    Ok(())
}

/// 追加一行到日志文件
pub fn append_log_line(log_file_path: &str, line: &str) -> Result<()> {
    use std::io::Write;

    let mut file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file_path)?;
    writeln!(file, "{}", line)?;
    Ok(())
}

pub fn log_startup(config: &Config) {
    info!("🚀 SCORM 批量导出启动");
    info!("📂 题库目录: {} → 输出目录: {}", config.quiz_folder, config.output_dir);
    info!("📊 最大并发数: {}", config.max_concurrent_exports);
}

pub fn log_quizzes_loaded(total: usize, max_concurrent: usize) {
    info!("✓ 找到 {} 个待导出的题库，最多同时导出 {} 个", total, max_concurrent);
}

/// 打印最终统计；`warnings` 是有题目被跳过的包数量
pub fn print_final_stats(
    success: usize,
    failed: usize,
    warnings: usize,
    total: usize,
    log_file_path: &str,
) {
    info!("{}", "=".repeat(60));
    info!(
        "📊 导出完成 ({})",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("✅ 成功: {}/{}", success, total);
    if warnings > 0 {
        info!("⚠️ 含跳过题目: {}", warnings);
    }
    if failed > 0 {
        info!("❌ 失败: {}", failed);
    }
    info!("日志已保存至: {}", log_file_path);
}

/// 日志中的标题最多显示 `max_chars` 个字符
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncates_by_chars() {
        assert_eq!(truncate_text("光合作用的产物", 4), "光合作用...");
        assert_eq!(truncate_text("short", 10), "short");
        assert_eq!(truncate_text("exact", 5), "exact");
    }

    #[test]
    fn log_file_gets_header_and_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log.txt");
        let path = path.to_str().unwrap();

        init_log_file(path, "packages").unwrap();
        append_log_line(path, "ok: Cells").unwrap();

        let content = std::fs::read_to_string(path).unwrap();
        assert!(content.contains("SCORM 导出日志"));
        assert!(content.contains("输出目录: packages"));
        assert!(content.ends_with("ok: Cells\n"));
    }
}
