//! 이름 규칙 기반 분류
//!
//! 아카이브 이름에 남아 있는 확장자 개수로 원본이 파일이었는지
//! 폴더였는지 판별합니다.
//!
//! - `Notes` (폴더) → `Notes.zip` (확장자 1개)
//! - `Invoice.pdf` (파일) → `Invoice.pdf.zip` (확장자 2개)
//!
//! 확장자가 없는 파일은 아카이브된 폴더와 구별할 수 없으므로
//! 압축 단계에서 거부합니다.

/// 아카이브 파일 확장자
pub const ARCHIVE_SUFFIX: &str = ".zip";

/// 아카이브의 원본 종류
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArchiveOrigin {
    /// 폴더를 압축한 아카이브 (복원할 폴더 이름)
    Folder { name: String },
    /// 파일을 압축한 아카이브 (복원할 파일 이름)
    File { name: String },
}

impl ArchiveOrigin {
    pub fn name(&self) -> &str {
        match self {
            ArchiveOrigin::Folder { name } | ArchiveOrigin::File { name } => name,
        }
    }
}

/// 압축 전 이름 검사 실패 사유
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameRejection {
    /// 이미 아카이브 확장자를 가진 파일
    AlreadyArchived,
    /// 파일의 확장자가 정확히 하나가 아님
    NotExactlyOneExtension,
    /// 폴더 이름에 확장자가 있음
    FolderHasExtension,
}

/// 파일/폴더 구분을 이름에 인코딩하는 방식
pub trait NamingScheme {
    /// 원본 이름으로 아카이브 이름 생성
    fn archive_name(&self, source_name: &str) -> String;

    /// 아카이브 이름인지 여부
    fn is_archive_name(&self, name: &str) -> bool;

    /// 아카이브 이름으로 원본 종류와 복원 이름 판별
    ///
    /// 확장자 앞 이름이 비어 있으면(`.zip`) None.
    fn classify(&self, archive_name: &str) -> Option<ArchiveOrigin>;

    /// 파일을 압축하기 전 이름 검사
    fn validate_file_name(&self, name: &str) -> Result<(), NameRejection>;

    /// 폴더를 압축하기 전 이름 검사
    fn validate_folder_name(&self, name: &str) -> Result<(), NameRejection>;
}

/// 고정 확장자(`.zip`)를 덧붙이는 이름 규칙
#[derive(Debug, Clone, Copy, Default)]
pub struct SuffixNaming;

impl NamingScheme for SuffixNaming {
    fn archive_name(&self, source_name: &str) -> String {
        format!("{}{}", source_name, ARCHIVE_SUFFIX)
    }

    fn is_archive_name(&self, name: &str) -> bool {
        extension(name) == Some(ARCHIVE_SUFFIX)
    }

    fn classify(&self, archive_name: &str) -> Option<ArchiveOrigin> {
        if !self.is_archive_name(archive_name) {
            return None;
        }
        let name = strip_extension(archive_name)?.to_string();
        if name.is_empty() {
            return None;
        }
        if extension_count(&name) == 0 {
            Some(ArchiveOrigin::Folder { name })
        } else {
            Some(ArchiveOrigin::File { name })
        }
    }

    fn validate_file_name(&self, name: &str) -> Result<(), NameRejection> {
        if self.is_archive_name(name) {
            return Err(NameRejection::AlreadyArchived);
        }
        if extension_count(name) != 1 {
            return Err(NameRejection::NotExactlyOneExtension);
        }
        Ok(())
    }

    fn validate_folder_name(&self, name: &str) -> Result<(), NameRejection> {
        if extension_count(name) != 0 {
            return Err(NameRejection::FolderHasExtension);
        }
        Ok(())
    }
}

/// 마지막 확장자 (점 포함). 점이 없으면 None
pub fn extension(name: &str) -> Option<&str> {
    name.rfind('.').map(|idx| &name[idx..])
}

/// 마지막 확장자를 뗀 이름. 점이 없으면 None
pub fn strip_extension(name: &str) -> Option<&str> {
    name.rfind('.').map(|idx| &name[..idx])
}

/// 확장자 개수
///
/// 점이 남지 않을 때까지 마지막 확장자를 반복해서 떼어낸 횟수.
pub fn extension_count(name: &str) -> usize {
    let mut count = 0;
    let mut current = name;
    while let Some(stripped) = strip_extension(current) {
        count += 1;
        current = stripped;
    }
    count
}
