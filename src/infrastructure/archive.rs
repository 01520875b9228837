//! 归档 - 基础设施层
//!
//! 内存中的"路径 → 内容"映射，最终压缩为一个 zip。
//! 只做存取和压缩，不认识清单、题目等业务概念。

use std::collections::BTreeMap;
use std::io::{Cursor, Read, Write};

use tracing::debug;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::error::PackageError;

// ========== 包内固定路径（区分大小写） ==========

pub const MANIFEST_PATH: &str = "imsmanifest.xml";
pub const LAUNCH_PAGE_PATH: &str = "index.html";
pub const PLAYER_PATH: &str = "quiz.js";
pub const RUNTIME_API_PATH: &str = "scorm-api.js";
pub const STYLES_PATH: &str = "styles.css";
pub const QUESTIONS_PATH: &str = "content/questions.json";

/// 完整的包内文件布局
pub const PACKAGE_LAYOUT: [&str; 6] = [
    MANIFEST_PATH,
    LAUNCH_PAGE_PATH,
    PLAYER_PATH,
    RUNTIME_API_PATH,
    STYLES_PATH,
    QUESTIONS_PATH,
];

/// 内存归档
///
/// 路径唯一，按写入顺序保存。每次导出独占一个实例。
#[derive(Debug, Default)]
pub struct Archive {
    entries: Vec<(String, Vec<u8>)>,
}

impl Archive {
    pub fn new() -> Self {
        Self::default()
    }

    /// 写入一个文件，路径重复时报错
    pub fn insert(
        &mut self,
        path: impl Into<String>,
        content: impl Into<Vec<u8>>,
    ) -> Result<(), PackageError> {
        let path = path.into();
        if self.contains(&path) {
            return Err(PackageError::DuplicateEntry { path });
        }
        let content = content.into();
        debug!("归档写入 {} ({} 字节)", path, content.len());
        self.entries.push((path, content));
        Ok(())
    }

    pub fn contains(&self, path: &str) -> bool {
        self.entries.iter().any(|(p, _)| p == path)
    }

    pub fn get(&self, path: &str) -> Option<&[u8]> {
        self.entries
            .iter()
            .find(|(p, _)| p == path)
            .map(|(_, content)| content.as_slice())
    }

    /// 按写入顺序返回所有路径
    pub fn paths(&self) -> Vec<String> {
        self.entries.iter().map(|(p, _)| p.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 同步压缩为 zip 字节
    ///
    /// 不写目录条目，zip 中的条目与 `paths()` 一一对应。
    pub fn compress(&self) -> Result<Vec<u8>, PackageError> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

        for (path, content) in &self.entries {
            writer.start_file(path.as_str(), options)?;
            writer.write_all(content)?;
        }

        let cursor = writer.finish()?;
        Ok(cursor.into_inner())
    }

    /// 在阻塞线程池中压缩，调用方只等待一次完成
    pub async fn compress_async(self) -> Result<Vec<u8>, PackageError> {
        tokio::task::spawn_blocking(move || self.compress()).await?
    }
}

/// 解开 zip 字节，返回"路径 → 内容"
pub fn read_archive(bytes: &[u8]) -> Result<BTreeMap<String, Vec<u8>>, PackageError> {
    let mut zip = ZipArchive::new(Cursor::new(bytes))?;
    let mut files = BTreeMap::new();

    for i in 0..zip.len() {
        let mut file = zip.by_index(i)?;
        if file.is_dir() {
            continue;
        }
        let mut content = Vec::new();
        file.read_to_end(&mut content)?;
        files.insert(file.name().to_string(), content);
    }

    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_duplicate_paths() {
        let mut archive = Archive::new();
        archive.insert("a.txt", "one").unwrap();
        let err = archive.insert("a.txt", "two").unwrap_err();
        assert!(matches!(err, PackageError::DuplicateEntry { path } if path == "a.txt"));
        assert_eq!(archive.get("a.txt"), Some("one".as_bytes()));
        assert_eq!(archive.len(), 1);
    }

    #[test]
    fn paths_keep_insertion_order() {
        let mut archive = Archive::new();
        for path in ["z.txt", "content/a.json", "b.txt"] {
            archive.insert(path, Vec::<u8>::new()).unwrap();
        }
        assert_eq!(archive.paths(), ["z.txt", "content/a.json", "b.txt"]);
    }

    #[test]
    fn compress_then_read_gives_same_files() {
        let mut archive = Archive::new();
        archive.insert("index.html", "<html></html>").unwrap();
        archive
            .insert("content/questions.json", "{\"easy\":{}}".repeat(100))
            .unwrap();

        let bytes = archive.compress().unwrap();
        let files = read_archive(&bytes).unwrap();
        assert_eq!(files.len(), 2);
        assert_eq!(files["index.html"], b"<html></html>");
        assert!(!files.contains_key("content/"));
    }

    #[test]
    fn compression_is_deterministic() {
        let mut archive = Archive::new();
        archive.insert("a.txt", "same").unwrap();
        assert_eq!(archive.compress().unwrap(), archive.compress().unwrap());
    }

    #[tokio::test]
    async fn compress_async_runs_on_blocking_pool() {
        let mut archive = Archive::new();
        archive.insert("a.txt", "payload").unwrap();
        let expected = archive.compress().unwrap();
        assert_eq!(archive.compress_async().await.unwrap(), expected);
    }

    #[test]
    fn garbage_bytes_are_rejected() {
        assert!(matches!(
            read_archive(b"not a zip"),
            Err(PackageError::Compression(_))
        ));
    }
}
