use std::fs;
use std::path::{Path, PathBuf};

/// 항목 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    /// 일반 파일
    File,
    /// 폴더
    Folder,
}

/// 저장소 항목 (파일 또는 폴더)
///
/// 작업 하나가 진행되는 동안만 유지되는 일시적인 참조입니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageItem {
    /// 파일/폴더 이름
    pub name: String,
    /// 전체 경로
    pub path: PathBuf,
    /// 항목 종류
    pub kind: ItemKind,
}

impl StorageItem {
    /// 경로에서 항목 생성
    ///
    /// 존재하지 않거나 이름이 없는 경로면 None.
    /// 심볼릭 링크는 따라가지 않고 링크 자체를 파일로 취급합니다.
    pub fn from_path(path: &Path) -> Option<Self> {
        let metadata = fs::symlink_metadata(path).ok()?;
        let name = path.file_name()?.to_string_lossy().to_string();
        let kind = if metadata.is_dir() {
            ItemKind::Folder
        } else {
            ItemKind::File
        };
        Some(Self {
            name,
            path: path.to_path_buf(),
            kind,
        })
    }

    /// 폴더 여부 확인
    pub fn is_folder(&self) -> bool {
        self.kind == ItemKind::Folder
    }

    /// 파일 여부 확인
    pub fn is_file(&self) -> bool {
        self.kind == ItemKind::File
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_from_path_detects_kind() {
        let temp = tempdir().expect("create tempdir");
        let file = temp.path().join("a.txt");
        let folder = temp.path().join("Notes");
        fs::write(&file, b"a").expect("write file");
        fs::create_dir(&folder).expect("create folder");

        let file_item = StorageItem::from_path(&file).expect("file item");
        assert!(file_item.is_file());
        assert_eq!(file_item.name, "a.txt");

        let folder_item = StorageItem::from_path(&folder).expect("folder item");
        assert!(folder_item.is_folder());
        assert_eq!(folder_item.name, "Notes");
    }

    #[test]
    fn test_from_path_missing_returns_none() {
        let temp = tempdir().expect("create tempdir");
        assert!(StorageItem::from_path(&temp.path().join("missing")).is_none());
    }
}
