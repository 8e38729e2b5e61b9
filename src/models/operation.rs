//! 압축/해제 작업 모델
//!
//! 작업 결과, 미처리 항목 목록, 압축 수준 등 작업 단위 데이터 구조 정의

use std::path::{Path, PathBuf};
use std::time::Duration;

/// 압축 수준 (아카이브 전체에 동일하게 적용)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompressionLevel {
    /// 압축 없음 (저장만)
    #[default]
    None,
    /// 가장 빠르게
    Fastest,
    /// 속도와 크기의 균형
    Optimal,
}

impl CompressionLevel {
    /// 설정 파일에 저장되는 값
    pub fn store_value(&self) -> &'static str {
        match self {
            CompressionLevel::None => "NoCompression",
            CompressionLevel::Fastest => "Fastest",
            CompressionLevel::Optimal => "Optimal",
        }
    }

    /// 설정 파일 값 파싱 (알 수 없는 값이면 None)
    pub fn from_store_value(value: &str) -> Option<Self> {
        match value {
            "NoCompression" => Some(CompressionLevel::None),
            "Fastest" => Some(CompressionLevel::Fastest),
            "Optimal" => Some(CompressionLevel::Optimal),
            _ => None,
        }
    }

    /// 표시 이름
    pub fn display_name(&self) -> &'static str {
        match self {
            CompressionLevel::None => "no compression",
            CompressionLevel::Fastest => "fastest",
            CompressionLevel::Optimal => "optimal",
        }
    }
}

/// 원본 삭제 방식
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeleteMode {
    /// 영구 삭제
    #[default]
    Permanent,
    /// 휴지통으로 이동
    Trash,
}

impl DeleteMode {
    pub fn store_value(&self) -> &'static str {
        match self {
            DeleteMode::Permanent => "permanent",
            DeleteMode::Trash => "trash",
        }
    }

    pub fn from_store_value(value: &str) -> Option<Self> {
        match value {
            "permanent" => Some(DeleteMode::Permanent),
            "trash" => Some(DeleteMode::Trash),
            _ => None,
        }
    }
}

/// 처리하지 못한 항목 경로 목록
///
/// 작업마다 새로 만들어져 그 작업의 결과로 반환됩니다.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SkippedPaths {
    paths: Vec<PathBuf>,
}

impl SkippedPaths {
    /// 실패한 항목 경로 추가 (순서 유지)
    pub fn push(&mut self, path: impl Into<PathBuf>) {
        self.paths.push(path.into());
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        self.paths.iter().map(PathBuf::as_path)
    }
}

/// 압축/해제 작업 결과
#[derive(Debug, Clone, Default)]
pub struct OperationResult {
    /// 처리 시도한 항목 수 (성공 + 실패)
    pub items_processed: usize,
    /// 처리하지 못한 항목
    pub skipped: SkippedPaths,
    /// 작업 소요 시간
    pub elapsed: Duration,
}

impl OperationResult {
    /// 모든 항목을 처리했는지 여부 (미처리 목록이 비어 있을 때만 true)
    pub fn success(&self) -> bool {
        self.skipped.is_empty()
    }

    /// 실패한 항목 수
    pub fn items_failed(&self) -> usize {
        self.skipped.len()
    }

    pub(crate) fn record_success(&mut self) {
        self.items_processed += 1;
    }

    pub(crate) fn record_failure(&mut self, path: impl Into<PathBuf>) {
        self.items_processed += 1;
        self.skipped.push(path);
    }
}

/// 사용자에게 보여줄 작업 결과
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationOutcome {
    pub success: bool,
    pub message: String,
}

impl OperationOutcome {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}
