//! 액션 시스템
//!
//! 명령줄 하위 명령과 앱 작업이 이 모듈의 액션 정의를 공유합니다.

use crate::models::operation::CompressionLevel;
use std::path::PathBuf;

/// 액션 종류 (데이터 없는 식별자)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    PickParentFolder,
    SetCompressionLevel,
    ArchiveFile,
    ArchiveFolder,
    ExtractArchive,
    ListArchive,
    ShowStatus,
}

/// 실행할 액션
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// 상위 폴더 선택 및 저장
    PickParentFolder { path: PathBuf },
    /// 압축 수준 저장
    SetCompressionLevel { level: CompressionLevel },
    /// 파일 압축
    ArchiveFile { path: PathBuf, keep_source: bool },
    /// 폴더 압축
    ArchiveFolder { path: PathBuf, keep_source: bool },
    /// 아카이브 해제
    ExtractArchive { path: PathBuf, keep_source: bool },
    /// 아카이브 항목 목록
    ListArchive { path: PathBuf },
    /// 현재 설정 표시
    ShowStatus,
}

impl Action {
    pub fn kind(&self) -> ActionKind {
        match self {
            Action::PickParentFolder { .. } => ActionKind::PickParentFolder,
            Action::SetCompressionLevel { .. } => ActionKind::SetCompressionLevel,
            Action::ArchiveFile { .. } => ActionKind::ArchiveFile,
            Action::ArchiveFolder { .. } => ActionKind::ArchiveFolder,
            Action::ExtractArchive { .. } => ActionKind::ExtractArchive,
            Action::ListArchive { .. } => ActionKind::ListArchive,
            Action::ShowStatus => ActionKind::ShowStatus,
        }
    }

    /// 설정을 변경하는 액션인지 여부
    pub fn changes_settings(&self) -> bool {
        action_def(self.kind()).is_some_and(|def| def.category == ActionCategory::Settings)
    }
}

/// 액션 카테고리
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionCategory {
    Settings,
    Archive,
    Query,
}

/// 액션 정의 (메타데이터)
pub struct ActionDef {
    pub kind: ActionKind,
    pub id: &'static str,
    pub label: &'static str,
    pub category: ActionCategory,
}

/// 모든 액션 메타데이터
pub static ACTION_DEFS: &[ActionDef] = &[
    ActionDef {
        kind: ActionKind::PickParentFolder,
        id: "pick",
        label: "Pick parent folder",
        category: ActionCategory::Settings,
    },
    ActionDef {
        kind: ActionKind::SetCompressionLevel,
        id: "level",
        label: "Set compression level",
        category: ActionCategory::Settings,
    },
    ActionDef {
        kind: ActionKind::ArchiveFile,
        id: "archive-file",
        label: "Archive file",
        category: ActionCategory::Archive,
    },
    ActionDef {
        kind: ActionKind::ArchiveFolder,
        id: "archive-folder",
        label: "Archive folder",
        category: ActionCategory::Archive,
    },
    ActionDef {
        kind: ActionKind::ExtractArchive,
        id: "extract",
        label: "Extract archive",
        category: ActionCategory::Archive,
    },
    ActionDef {
        kind: ActionKind::ListArchive,
        id: "list",
        label: "List archive",
        category: ActionCategory::Query,
    },
    ActionDef {
        kind: ActionKind::ShowStatus,
        id: "status",
        label: "Show settings",
        category: ActionCategory::Query,
    },
];

/// 액션 종류로 정의 조회
pub fn action_def(kind: ActionKind) -> Option<&'static ActionDef> {
    ACTION_DEFS.iter().find(|def| def.kind == kind)
}
