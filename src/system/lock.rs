//! 사용 중(잠긴) 항목 감지
//!
//! 파일은 배타적으로 열어 보고, 폴더는 하위 파일을 모두 검사합니다.
//! 검사 중에는 아무것도 수정하지 않습니다.

use std::fs::{self, File, OpenOptions, TryLockError};
use std::io;
use std::path::{Path, PathBuf};

/// 파일 또는 폴더(하위 포함)가 사용 중인지 확인
pub fn is_locked(path: &Path) -> bool {
    find_locked(path).is_some()
}

/// 처음 발견된 잠긴 경로 반환 (폴더는 이름 순 깊이 우선)
pub fn find_locked(path: &Path) -> Option<PathBuf> {
    let Ok(metadata) = fs::symlink_metadata(path) else {
        return Some(path.to_path_buf());
    };
    if metadata.is_dir() {
        find_locked_in_folder(path)
    } else if probe_exclusive(path).is_err() {
        Some(path.to_path_buf())
    } else {
        None
    }
}

fn find_locked_in_folder(folder: &Path) -> Option<PathBuf> {
    let children = match read_sorted_children(folder) {
        Ok(children) => children,
        Err(e) => {
            tracing::debug!("lock check could not read {:?}: {}", folder, e);
            return Some(folder.to_path_buf());
        }
    };

    for child in children {
        let Ok(metadata) = fs::symlink_metadata(&child) else {
            return Some(child);
        };
        let locked = if metadata.is_dir() {
            find_locked_in_folder(&child)
        } else if metadata.is_symlink() {
            // 심볼릭 링크는 따라가지 않음. 압축할 때도 건너뛴다.
            None
        } else if probe_exclusive(&child).is_err() {
            Some(child)
        } else {
            None
        };
        if locked.is_some() {
            return locked;
        }
    }
    None
}

pub(crate) fn read_sorted_children(folder: &Path) -> io::Result<Vec<PathBuf>> {
    let mut children = fs::read_dir(folder)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<io::Result<Vec<_>>>()?;
    children.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(children)
}

/// 배타적 접근 시도. 핸들을 닫으면 잠금이 풀린다.
fn probe_exclusive(path: &Path) -> io::Result<()> {
    let file = open_exclusive(path)?;
    match file.try_lock() {
        Ok(()) => Ok(()),
        Err(TryLockError::WouldBlock) => Err(io::Error::new(
            io::ErrorKind::WouldBlock,
            format!("{} is in use", path.display()),
        )),
        Err(TryLockError::Error(e)) => Err(e),
    }
}

#[cfg(windows)]
fn open_exclusive(path: &Path) -> io::Result<File> {
    use std::os::windows::fs::OpenOptionsExt;
    // 공유 모드 0: 다른 프로세스가 열고 있으면 실패
    OpenOptions::new().read(true).share_mode(0).open(path)
}

#[cfg(not(windows))]
fn open_exclusive(path: &Path) -> io::Result<File> {
    OpenOptions::new().read(true).open(path)
}
