//! 包预览 - 编排层
//!
//! 不需要浏览器和 LMS：从已导出的 zip 中读出 `questions.json`，
//! 用内存运行时驱动播放器状态机，行为与包内脚本一致。

use crate::error::{AppResult, PackageError, PlayerError};
use crate::infrastructure::archive::{read_archive, QUESTIONS_PATH};
use crate::services::quiz_player::QuizPlayer;
use crate::services::runtime_api::{InMemoryRuntime, RuntimeApi};

/// 从 zip 字节构造已装载题目的播放器，使用内存运行时
pub fn preview_package(bytes: &[u8]) -> AppResult<QuizPlayer<InMemoryRuntime>> {
    preview_package_with(bytes, InMemoryRuntime::new())
}

/// 从 zip 字节构造已装载题目的播放器，使用调用方提供的运行时
pub fn preview_package_with<R: RuntimeApi>(bytes: &[u8], runtime: R) -> AppResult<QuizPlayer<R>> {
    let files = read_archive(bytes)?;
    let raw = files
        .get(QUESTIONS_PATH)
        .ok_or_else(|| PackageError::MissingEntry {
            path: QUESTIONS_PATH.to_string(),
        })?;
    let text = std::str::from_utf8(raw).map_err(|e| PlayerError::InvalidData(e.to_string()))?;

    let mut player = QuizPlayer::new(runtime);
    player.load_json(text)?;
    Ok(player)
}
