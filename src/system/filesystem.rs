use crate::models::entry::StorageItem;
use crate::models::operation::DeleteMode;
use crate::utils::error::{ArchiveExtractError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// 파일 시스템 모듈
///
/// 존재 확인과 부모 조회는 에러 대신 `bool`/`Option`을 반환합니다.
pub struct FileSystem;

impl FileSystem {
    /// 새 파일 시스템 인스턴스 생성
    pub fn new() -> Self {
        Self
    }

    /// 경로 존재 여부 (심볼릭 링크 자체도 존재로 취급)
    #[allow(clippy::unused_self)]
    pub fn probe_exists(&self, path: &Path) -> bool {
        fs::symlink_metadata(path).is_ok()
    }

    /// 부모 폴더 안의 항목 조회
    #[allow(clippy::unused_self)]
    pub fn try_get_item(&self, parent: &Path, name: &str) -> Option<StorageItem> {
        StorageItem::from_path(&parent.join(name))
    }

    /// 선택된 상위 폴더 범위 안에서 부모 폴더 조회
    ///
    /// 부모가 없거나 범위 밖이면 접근 불가로 보고 None.
    #[allow(clippy::unused_self)]
    pub fn try_get_parent(&self, scope_root: &Path, path: &Path) -> Option<PathBuf> {
        let parent = path.parent()?;
        if parent.as_os_str().is_empty() || !parent.starts_with(scope_root) {
            return None;
        }
        if !parent.is_dir() {
            return None;
        }
        Some(parent.to_path_buf())
    }

    /// 새 디렉토리 생성
    #[allow(clippy::unused_self)]
    pub fn create_directory(&self, path: &Path) -> Result<()> {
        if self.probe_exists(path) {
            return Err(ArchiveExtractError::DestinationExists {
                path: path.to_path_buf(),
            });
        }

        fs::create_dir(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::PermissionDenied {
                ArchiveExtractError::PermissionDenied {
                    path: path.to_path_buf(),
                }
            } else {
                ArchiveExtractError::Io(e)
            }
        })
    }

    /// 항목 삭제 (영구 삭제 또는 휴지통)
    pub fn delete_item(&self, item: &StorageItem, mode: DeleteMode) -> Result<()> {
        match mode {
            DeleteMode::Trash => self.trash_items(std::slice::from_ref(&item.path)),
            DeleteMode::Permanent if item.is_folder() => self.delete_directory(&item.path),
            DeleteMode::Permanent => self.delete_file(&item.path),
        }
    }

    /// 파일 삭제
    pub fn delete_file(&self, path: &Path) -> Result<()> {
        if !self.probe_exists(path) {
            return Err(ArchiveExtractError::PathNotFound {
                path: path.to_path_buf(),
            });
        }

        fs::remove_file(path).map_err(|e| delete_error(path, e))?;
        tracing::info!("deleted file {}", path.display());
        Ok(())
    }

    /// 디렉토리 삭제 (재귀적)
    pub fn delete_directory(&self, path: &Path) -> Result<()> {
        if !self.probe_exists(path) {
            return Err(ArchiveExtractError::PathNotFound {
                path: path.to_path_buf(),
            });
        }

        if !path.is_dir() {
            return Err(ArchiveExtractError::NotADirectory {
                path: path.to_path_buf(),
            });
        }

        fs::remove_dir_all(path).map_err(|e| delete_error(path, e))?;
        tracing::info!("deleted folder {}", path.display());
        Ok(())
    }

    /// 휴지통으로 이동
    #[allow(clippy::unused_self)]
    pub fn trash_items(&self, paths: &[PathBuf]) -> Result<()> {
        trash::delete_all(paths).map_err(|e| ArchiveExtractError::DeleteFailed {
            path: paths.first().cloned().unwrap_or_default(),
            reason: e.to_string(),
        })?;
        tracing::info!("moved {} item(s) to trash", paths.len());
        Ok(())
    }

    /// 실패한 압축이 남긴 아카이브 정리 (실패해도 무시)
    #[allow(clippy::unused_self)]
    pub fn remove_partial_output(&self, path: &Path) {
        match fs::remove_file(path) {
            Ok(()) => tracing::debug!("removed partial archive {}", path.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!("could not remove {}: {}", path.display(), e),
        }
    }
}

fn delete_error(path: &Path, e: std::io::Error) -> ArchiveExtractError {
    if e.kind() == std::io::ErrorKind::PermissionDenied {
        ArchiveExtractError::PermissionDenied {
            path: path.to_path_buf(),
        }
    } else {
        ArchiveExtractError::DeleteFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        }
    }
}

impl Default for FileSystem {
    fn default() -> Self {
        Self::new()
    }
}
