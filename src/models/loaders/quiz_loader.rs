use crate::error::LoadError;
use crate::models::quiz::QuizDocument;
use std::path::{Path, PathBuf};
use tokio::fs;

/// 从 JSON / TOML 文件加载题库文档
pub async fn load_quiz_document(path: &Path) -> Result<QuizDocument, LoadError> {
    let display = path.display().to_string();
    let content = fs::read_to_string(path)
        .await
        .map_err(|source| LoadError::ReadFailed {
            path: display.clone(),
            source,
        })?;

    let mut document: QuizDocument = match extension_of(path) {
        Some("json") => serde_json::from_str(&content).map_err(|source| {
            LoadError::JsonParseFailed {
                path: display.clone(),
                source,
            }
        })?,
        Some("toml") => toml::from_str(&content).map_err(|source| LoadError::TomlParseFailed {
            path: display.clone(),
            source,
        })?,
        _ => return Err(LoadError::UnsupportedExtension { path: display }),
    };

    // 设置文件路径
    document.file_path = Some(path.to_string_lossy().to_string());

    Ok(document)
}

/// 从文件夹中加载所有题库文件
///
/// 单个文件加载失败只记录警告，不影响其他文件。结果按文件名排序。
pub async fn load_all_quiz_files(folder_path: &str) -> Result<Vec<QuizDocument>, LoadError> {
    let folder = PathBuf::from(folder_path);

    if !folder.exists() {
        return Err(LoadError::DirectoryNotFound {
            path: folder_path.to_string(),
        });
    }

    let mut entries = fs::read_dir(&folder)
        .await
        .map_err(|source| LoadError::ReadFailed {
            path: folder_path.to_string(),
            source,
        })?;

    let mut paths = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|source| LoadError::ReadFailed {
            path: folder_path.to_string(),
            source,
        })?
    {
        let path = entry.path();
        if matches!(extension_of(&path), Some("json") | Some("toml")) {
            paths.push(path);
        }
    }
    paths.sort();

    let mut documents = Vec::with_capacity(paths.len());
    for path in paths {
        tracing::info!(
            "正在加载: {}",
            path.file_name().unwrap_or_default().to_string_lossy()
        );

        match load_quiz_document(&path).await {
            Ok(document) => {
                tracing::info!("成功加载题库: {}", document.display_title());
                documents.push(document);
            }
            Err(e) => {
                tracing::warn!("加载文件失败 {}: {}", path.display(), e);
            }
        }
    }

    Ok(documents)
}

fn extension_of(path: &Path) -> Option<&str> {
    path.extension().and_then(|s| s.to_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn loads_json_and_toml_and_skips_broken_files() {
        let dir = tempfile::tempdir().unwrap();

        let mut json = std::fs::File::create(dir.path().join("a_cells.json")).unwrap();
        write!(
            json,
            r#"{{"title":"Cells","quiz":{{"easy":{{"trueFalse":[{{"statement":"Cells divide","isTrue":true}}]}}}}}}"#
        )
        .unwrap();

        let mut toml_file = std::fs::File::create(dir.path().join("b_orbits.toml")).unwrap();
        write!(
            toml_file,
            "[[quiz.normal.multipleChoice]]\nquestion = \"Closest planet?\"\noptions = [\"Venus\", \"Mercury\"]\ncorrectAnswer = 1\n"
        )
        .unwrap();

        std::fs::write(dir.path().join("c_broken.json"), "{ not json").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let docs = load_all_quiz_files(dir.path().to_str().unwrap()).await.unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].display_title(), "Cells");
        assert_eq!(docs[1].display_title(), "b_orbits");
        let normal = docs[1].quiz.normal.as_ref().unwrap();
        assert_eq!(normal.multiple_choice[0].correct_answer, 1);
    }

    #[tokio::test]
    async fn missing_folder_is_an_error() {
        let err = load_all_quiz_files("/definitely/not/here").await.unwrap_err();
        assert!(matches!(err, LoadError::DirectoryNotFound { .. }));
    }
}
