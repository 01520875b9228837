//! 打包流程 - 流程层
//!
//! 核心职责：定义"一个包"的完整组装流程
//!
//! 流程顺序：
//! 1. 规范化题库（统计不支持的题型）
//! 2. 写入启动页、运行时 API、播放器、样式表、题目数据
//! 3. 按归档实际内容生成清单并写入
//! 4. 校验清单文件列表与归档一致
//!
//! 压缩是单独的一步，见 `AssembledPackage::compress`。

use tracing::{debug, info};

use crate::error::PackageError;
use crate::infrastructure::archive::{
    Archive, LAUNCH_PAGE_PATH, MANIFEST_PATH, PLAYER_PATH, QUESTIONS_PATH, RUNTIME_API_PATH,
    STYLES_PATH,
};
use crate::models::quiz::QuizData;
use crate::services::launch_page::{launch_page, stylesheet};
use crate::services::manifest::PackageManifest;
use crate::services::normalizer::{normalize, NormalizedQuiz};
use crate::services::quiz_player::player_script;
use crate::services::runtime_api::runtime_api_script;

/// 组装完成、尚未压缩的包
#[derive(Debug)]
pub struct AssembledPackage {
    pub archive: Archive,
    pub manifest: PackageManifest,
    pub normalized: NormalizedQuiz,
}

impl AssembledPackage {
    /// 压缩为 zip 字节
    pub async fn compress(self) -> Result<Vec<u8>, PackageError> {
        self.archive.compress_async().await
    }
}

/// 包组装器
///
/// 每次导出新建一个，不在多次导出之间共享可变状态。
pub struct PackageAssembler {
    title: String,
}

impl PackageAssembler {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// 组装归档
    pub fn assemble(&self, quiz: &QuizData) -> Result<AssembledPackage, PackageError> {
        let normalized = normalize(quiz);
        info!(
            "📦 组装包 [{}]: {} 道题",
            self.title,
            normalized.questions.len()
        );

        // 题目数据原样写入，由播放器在加载时自行规范化
        let questions_json = serde_json::to_string_pretty(quiz)?;

        let mut archive = Archive::new();
        archive.insert(LAUNCH_PAGE_PATH, launch_page(&self.title))?;
        archive.insert(RUNTIME_API_PATH, runtime_api_script())?;
        archive.insert(PLAYER_PATH, player_script())?;
        archive.insert(STYLES_PATH, stylesheet())?;
        archive.insert(QUESTIONS_PATH, questions_json)?;

        let mut files = archive.paths();
        files.push(MANIFEST_PATH.to_string());
        let manifest = PackageManifest::new(self.title.clone(), files);
        archive.insert(MANIFEST_PATH, manifest.to_xml())?;

        verify_manifest(&manifest, &archive)?;
        debug!("清单标识符: {}", manifest.identifier());

        Ok(AssembledPackage {
            archive,
            manifest,
            normalized,
        })
    }
}

/// 清单声明的文件必须与归档内容逐项一致
fn verify_manifest(manifest: &PackageManifest, archive: &Archive) -> Result<(), PackageError> {
    let actual = archive.paths();
    if manifest.resource_files() != actual.as_slice() {
        return Err(PackageError::ManifestMismatch {
            declared: manifest.resource_files().to_vec(),
            actual,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::archive::PACKAGE_LAYOUT;
    use crate::models::question::Difficulty;
    use crate::models::quiz::TrueFalseItem;
    use std::collections::BTreeSet;

    #[test]
    fn archive_holds_exactly_the_fixed_layout() {
        let assembled = PackageAssembler::new("Empty").assemble(&QuizData::default()).unwrap();
        let paths: BTreeSet<_> = assembled.archive.paths().into_iter().collect();
        let layout: BTreeSet<_> = PACKAGE_LAYOUT.iter().map(|s| s.to_string()).collect();
        assert_eq!(paths, layout);
        assert_eq!(assembled.manifest.resource_files(), assembled.archive.paths().as_slice());
    }

    #[test]
    fn questions_json_is_the_input_verbatim() {
        let mut quiz = QuizData::default();
        quiz.category_mut(Difficulty::Normal).true_false.push(TrueFalseItem {
            statement: "Sound travels faster in water".to_string(),
            is_true: true,
            explanation: Some("Denser medium".to_string()),
        });

        let assembled = PackageAssembler::new("t").assemble(&quiz).unwrap();
        let raw = assembled.archive.get(QUESTIONS_PATH).unwrap();
        let back: QuizData = serde_json::from_slice(raw).unwrap();
        assert_eq!(back, quiz);
        assert_eq!(assembled.normalized.questions.len(), 1);
    }

    #[test]
    fn static_assets_are_shared_text() {
        let assembled = PackageAssembler::new("t").assemble(&QuizData::default()).unwrap();
        assert_eq!(
            assembled.archive.get(RUNTIME_API_PATH).unwrap(),
            runtime_api_script().as_bytes()
        );
        assert_eq!(
            assembled.archive.get(PLAYER_PATH).unwrap(),
            player_script().as_bytes()
        );
    }

    #[test]
    fn mismatch_is_detected() {
        let mut archive = Archive::new();
        archive.insert("index.html", "x").unwrap();
        let manifest = PackageManifest::new("t", vec!["other.html".to_string()]);
        assert!(matches!(
            verify_manifest(&manifest, &archive),
            Err(PackageError::ManifestMismatch { .. })
        ));
    }
}
