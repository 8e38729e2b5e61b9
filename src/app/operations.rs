use super::*;
use crate::models::entry::StorageItem;
use crate::models::operation::OperationResult;
use crate::system::{
    compress, extract, is_locked, list_entries, ArchiveOrigin, ArchiveProgressEvent,
    CompressRequest, ExtractRequest, NameRejection, NamingScheme,
};
use crate::utils::error::{ArchiveExtractError, Result};
use crate::utils::formatter::{
    format_date, format_elapsed_seconds, format_file_size, format_skipped_report, pluralize,
};
use crate::utils::path_display::display_below;
use std::path::{Component, Path};
use std::sync::mpsc::{self, Sender};

const SELECT_FOLDER_HINT: &str =
    "Select folder that contains folders or files to archive or extract.";

impl App {
    // === 설정 ===
    // 저장은 execute_action이 성공한 설정 액션 뒤에 한 번 수행한다.

    pub(super) fn pick_parent_folder(&mut self, input: &Path) -> OperationOutcome {
        let path = Self::resolve_input_path(input);
        if !path.is_dir() {
            return OperationOutcome::failure(format!(
                "Aborted since could not access selected App folder {}.",
                path.display()
            ));
        }
        self.settings.parent_folder = Some(path.clone());
        OperationOutcome::success(format!("Current parent folder is: {}", path.display()))
    }

    pub(super) fn set_compression_level(&mut self, level: CompressionLevel) -> OperationOutcome {
        self.settings.compression_level = level;
        let message = match level {
            CompressionLevel::None => "Archived folders and files will not be compressed.",
            CompressionLevel::Fastest => {
                "Archived folders and files will be compressed using fast method."
            }
            CompressionLevel::Optimal => {
                "Archived folders and files will be compressed using optimal method."
            }
        };
        OperationOutcome::success(message)
    }

    /// 설정 파일 저장. 실패하면 사용자 메시지로 변환
    pub(super) fn persist_settings(&self) -> std::result::Result<(), String> {
        self.save_persisted_state().map_err(|e| {
            Self::format_user_error(
                "Save settings",
                self.state_store_path().as_deref(),
                &e.to_string(),
                "Check that the settings location is writable.",
            )
        })
    }

    pub(super) fn show_status(&self) -> OperationOutcome {
        let parent = match &self.settings.parent_folder {
            Some(path) if self.filesystem.probe_exists(path) => path.display().to_string(),
            Some(path) => format!("{} (missing)", path.display()),
            None => "(not picked)".to_string(),
        };
        let removal = if self.settings.remove_source {
            self.settings.delete_mode.store_value()
        } else {
            "keep"
        };
        let settings_file = self
            .state_store_path()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(none)".to_string());
        OperationOutcome::success(format!(
            "Parent folder: {}\nCompression level: {}\nSource removal: {}\nSettings file: {}",
            parent,
            self.settings.compression_level.display_name(),
            removal,
            settings_file
        ))
    }

    // === 압축 ===

    pub(super) fn archive_file(&mut self, input: &Path, keep_source: bool) -> OperationOutcome {
        let scope = match self.require_parent_folder() {
            Ok(scope) => scope,
            Err(message) => return OperationOutcome::failure(message),
        };
        let path = Self::resolve_input_path(input);
        let Some(item) = StorageItem::from_path(&path) else {
            return OperationOutcome::failure(format!(
                "Aborted since could not find {}.",
                path.display()
            ));
        };
        if item.is_folder() {
            return OperationOutcome::failure(format!(
                "Aborted since {} is a folder. Use archive-folder to archive folders.",
                item.name
            ));
        }
        let Some(parent_dir) = self.filesystem.try_get_parent(&scope, &item.path) else {
            return OperationOutcome::failure(format!(
                "Aborted since could not get access to parent folder of {}.",
                item.path.display()
            ));
        };
        if let Err(rejection) = self.naming.validate_file_name(&item.name) {
            return OperationOutcome::failure(Self::rejection_message(&item.name, rejection));
        }
        if is_locked(&item.path) {
            return OperationOutcome::failure(format!(
                "Aborted since {} is locked.  Another application may be using file.",
                item.name
            ));
        }
        let archive_name = self.naming.archive_name(&item.name);
        if self.filesystem.try_get_item(&parent_dir, &archive_name).is_some() {
            return OperationOutcome::failure(Self::destination_exists_message(
                "file",
                &archive_name,
                &parent_dir,
            ));
        }

        let archive_path = parent_dir.join(&archive_name);
        tracing::info!("Processing {}.", item.path.display());
        match self.run_compress(&item, &archive_path) {
            Ok(result) if result.success() => {
                let mut message = format!(
                    "Archived {} to {} ({} seconds).",
                    item.name,
                    archive_path.display(),
                    format_elapsed_seconds(result.elapsed)
                );
                self.remove_source_after_success(&item, keep_source, &mut message);
                OperationOutcome::success(message)
            }
            Ok(result) => {
                self.filesystem.remove_partial_output(&archive_path);
                OperationOutcome::failure(format!(
                    "Aborted since could not archive {} to {} ({} seconds).",
                    item.name,
                    archive_path.display(),
                    format_elapsed_seconds(result.elapsed)
                ))
            }
            Err(err) => self.compress_error_outcome(&item, &archive_name, &parent_dir, err),
        }
    }

    pub(super) fn archive_folder(&mut self, input: &Path, keep_source: bool) -> OperationOutcome {
        let scope = match self.require_parent_folder() {
            Ok(scope) => scope,
            Err(message) => return OperationOutcome::failure(message),
        };
        let path = Self::resolve_input_path(input);
        let Some(item) = StorageItem::from_path(&path) else {
            return OperationOutcome::failure(format!(
                "Aborted since could not find {}.",
                path.display()
            ));
        };
        if !item.is_folder() {
            return OperationOutcome::failure(format!(
                "Aborted since {} is not a folder. Use archive-file to archive files.",
                item.name
            ));
        }
        if !item.path.starts_with(&scope) {
            return OperationOutcome::failure(format!(
                "Aborted since could not get access to {}.",
                item.path.display()
            ));
        }
        if let Err(rejection) = self.naming.validate_folder_name(&item.name) {
            return OperationOutcome::failure(Self::rejection_message(&item.name, rejection));
        }
        if is_locked(&item.path) {
            return OperationOutcome::failure(format!(
                "Aborted since {} is locked.  Another application may be using a file in the folder.",
                item.name
            ));
        }
        let Some(parent_dir) = self.filesystem.try_get_parent(&scope, &item.path) else {
            return OperationOutcome::failure(format!(
                "Aborted since could not get access to parent folder of {}.",
                item.path.display()
            ));
        };
        let archive_name = self.naming.archive_name(&item.name);
        if self.filesystem.try_get_item(&parent_dir, &archive_name).is_some() {
            return OperationOutcome::failure(Self::destination_exists_message(
                "file",
                &archive_name,
                &parent_dir,
            ));
        }

        let archive_path = parent_dir.join(&archive_name);
        tracing::info!("Processing {}.", item.path.display());
        match self.run_compress(&item, &archive_path) {
            Ok(result) if result.success() => {
                let mut message = format!(
                    "Archived {} to {} ({} seconds).",
                    item.name,
                    archive_path.display(),
                    format_elapsed_seconds(result.elapsed)
                );
                self.remove_source_after_success(&item, keep_source, &mut message);
                OperationOutcome::success(message)
            }
            // 일부 실패: 아카이브와 원본 모두 유지
            Ok(result) => OperationOutcome::failure(format!(
                "Could not archive all items in {} to {} ({} seconds).\nItems not compressed:\n{}",
                item.name,
                archive_path.display(),
                format_elapsed_seconds(result.elapsed),
                Self::skipped_report(&scope, &result)
            )),
            Err(err) => self.compress_error_outcome(&item, &archive_name, &parent_dir, err),
        }
    }

    // === 해제 ===

    pub(super) fn extract_archive(&mut self, input: &Path, keep_source: bool) -> OperationOutcome {
        let scope = match self.require_parent_folder() {
            Ok(scope) => scope,
            Err(message) => return OperationOutcome::failure(message),
        };
        let path = Self::resolve_input_path(input);
        let Some(item) = StorageItem::from_path(&path).filter(StorageItem::is_file) else {
            return OperationOutcome::failure(format!(
                "Aborted since could not find archive file {}.",
                path.display()
            ));
        };
        let Some(origin) = self.naming.classify(&item.name) else {
            let reason = if self.naming.is_archive_name(&item.name) {
                "has no name before extension of"
            } else {
                "does not have extension of"
            };
            return OperationOutcome::failure(format!(
                "Aborted since {} {} {}.",
                item.name,
                reason,
                crate::system::naming::ARCHIVE_SUFFIX
            ));
        };
        tracing::debug!("{} restores {}", item.name, origin.name());
        let Some(parent_dir) = self.filesystem.try_get_parent(&scope, &item.path) else {
            return OperationOutcome::failure(format!(
                "Aborted since could not get access to parent folder of {}.",
                item.path.display()
            ));
        };
        if is_locked(&item.path) {
            return OperationOutcome::failure(format!(
                "Aborted since {} is locked.  Another application may be using file.",
                item.name
            ));
        }

        match origin {
            ArchiveOrigin::Folder { name } => {
                self.extract_folder_archive(&scope, &item, &parent_dir, &name, keep_source)
            }
            ArchiveOrigin::File { name } => {
                self.extract_file_archive(&item, &parent_dir, &name, keep_source)
            }
        }
    }

    fn extract_folder_archive(
        &mut self,
        scope: &Path,
        item: &StorageItem,
        parent_dir: &Path,
        folder_name: &str,
        keep_source: bool,
    ) -> OperationOutcome {
        if self.filesystem.try_get_item(parent_dir, folder_name).is_some() {
            return OperationOutcome::failure(Self::destination_exists_message(
                "folder",
                folder_name,
                parent_dir,
            ));
        }
        let dest_dir = parent_dir.join(folder_name);
        if let Err(e) = self.filesystem.create_directory(&dest_dir) {
            tracing::warn!("could not create {}: {}", dest_dir.display(), e);
            return OperationOutcome::failure(format!(
                "Aborted since could not create destination folder {}.",
                folder_name
            ));
        }

        tracing::info!("Processing {}.", item.path.display());
        match Self::run_extract(&item.path, &dest_dir) {
            Ok(result) if result.success() => {
                let mut message = format!(
                    "Extracted {} to {} ({} seconds).",
                    item.name,
                    dest_dir.display(),
                    format_elapsed_seconds(result.elapsed)
                );
                self.remove_source_after_success(item, keep_source, &mut message);
                OperationOutcome::success(message)
            }
            Ok(result) => OperationOutcome::failure(format!(
                "Could not extract all items in {} to {} ({} seconds).\nItems not extracted:\n{}",
                item.name,
                dest_dir.display(),
                format_elapsed_seconds(result.elapsed),
                Self::skipped_report(scope, &result)
            )),
            Err(err) => {
                // 비어 있는 경우에만 제거됨
                let _ = fs::remove_dir(&dest_dir);
                OperationOutcome::failure(Self::format_user_error(
                    "Extract archive",
                    Some(&item.path),
                    &err.to_string(),
                    "Check that the archive is a valid zip file.",
                ))
            }
        }
    }

    fn extract_file_archive(
        &mut self,
        item: &StorageItem,
        parent_dir: &Path,
        file_name: &str,
        keep_source: bool,
    ) -> OperationOutcome {
        if self.filesystem.try_get_item(parent_dir, file_name).is_some() {
            return OperationOutcome::failure(Self::destination_exists_message(
                "file",
                file_name,
                parent_dir,
            ));
        }

        tracing::info!("Processing {}.", item.path.display());
        match Self::run_extract(&item.path, parent_dir) {
            Ok(result) if result.success() => {
                let mut message = format!(
                    "Extracted {} to {} ({} seconds).",
                    item.name,
                    parent_dir.join(file_name).display(),
                    format_elapsed_seconds(result.elapsed)
                );
                self.remove_source_after_success(item, keep_source, &mut message);
                OperationOutcome::success(message)
            }
            Ok(result) => OperationOutcome::failure(format!(
                "Aborted since could not extract {} to {} ({} seconds).",
                item.name,
                parent_dir.display(),
                format_elapsed_seconds(result.elapsed)
            )),
            Err(ArchiveExtractError::DestinationExists { path }) => {
                OperationOutcome::failure(Self::destination_exists_message(
                    "file",
                    &path
                        .file_name()
                        .map(|n| n.to_string_lossy().to_string())
                        .unwrap_or_default(),
                    parent_dir,
                ))
            }
            Err(err) => OperationOutcome::failure(Self::format_user_error(
                "Extract archive",
                Some(&item.path),
                &err.to_string(),
                "Check that the archive is a valid zip file.",
            )),
        }
    }

    // === 조회 ===

    pub(super) fn list_archive(&self, input: &Path) -> OperationOutcome {
        let path = Self::resolve_input_path(input);
        match list_entries(&path) {
            Ok(entries) => {
                let mut lines = vec![format!(
                    "{}: {}",
                    path.display(),
                    pluralize(entries.len(), "entry", "entries")
                )];
                for entry in entries {
                    let date = entry
                        .modified
                        .map(format_date)
                        .unwrap_or_else(|| "-".to_string());
                    let size = if entry.is_dir {
                        "<DIR>".to_string()
                    } else {
                        format_file_size(entry.size)
                    };
                    lines.push(format!("{:>10}  {}  {}", size, date, entry.path));
                }
                OperationOutcome::success(lines.join("\n"))
            }
            Err(err) => OperationOutcome::failure(Self::format_user_error(
                "List archive",
                Some(&path),
                &err.to_string(),
                "",
            )),
        }
    }

    // === 작업 실행 ===

    fn run_compress(&self, item: &StorageItem, archive_path: &Path) -> Result<OperationResult> {
        let request = CompressRequest {
            source: item.path.clone(),
            output_path: archive_path.to_path_buf(),
            level: self.settings.compression_level,
        };
        Self::run_worker(move |progress_tx| compress(&request, progress_tx))
    }

    fn run_extract(archive_path: &Path, dest_dir: &Path) -> Result<OperationResult> {
        let request = ExtractRequest {
            archive_path: archive_path.to_path_buf(),
            dest_dir: dest_dir.to_path_buf(),
        };
        Self::run_worker(move |progress_tx| extract(&request, progress_tx))
    }

    /// 작업 스레드에서 엔진 실행, 호출 스레드에서 진행 이벤트 수신
    fn run_worker<F>(job: F) -> Result<OperationResult>
    where
        F: FnOnce(Sender<ArchiveProgressEvent>) -> Result<OperationResult> + Send + 'static,
    {
        let (progress_tx, progress_rx) = mpsc::channel::<ArchiveProgressEvent>();
        let handle = std::thread::spawn(move || job(progress_tx));

        // 작업이 끝나 송신 측이 닫히면 루프 종료
        for event in progress_rx {
            tracing::debug!(
                "{} ({} processed, {} failed, {})",
                event.current_file,
                event.items_processed,
                event.items_failed,
                format_file_size(event.bytes_processed)
            );
        }

        handle
            .join()
            .map_err(|_| ArchiveExtractError::ArchiveCreateFailed {
                path: PathBuf::from("archive"),
                reason: "Archive worker thread panicked".to_string(),
            })
            .and_then(|result| result)
    }

    // === 보조 함수 ===

    fn require_parent_folder(&self) -> std::result::Result<PathBuf, String> {
        let Some(parent) = &self.settings.parent_folder else {
            return Err(format!(
                "Aborted since no parent folder is picked. {}",
                SELECT_FOLDER_HINT
            ));
        };
        if !parent.is_dir() {
            return Err(format!(
                "Could not find {}.  Did you delete, move, or rename this folder while this App was running?",
                parent.display()
            ));
        }
        Ok(parent.clone())
    }

    fn remove_source_after_success(
        &self,
        item: &StorageItem,
        keep_source: bool,
        message: &mut String,
    ) {
        if keep_source || !self.settings.remove_source {
            return;
        }
        if let Err(e) = self
            .filesystem
            .delete_item(item, self.settings.delete_mode)
        {
            tracing::warn!("could not remove {}: {}", item.path.display(), e);
            message.push_str(&format!("\nCould not remove {}: {}", item.name, e));
        }
    }

    fn compress_error_outcome(
        &self,
        item: &StorageItem,
        archive_name: &str,
        parent_dir: &Path,
        err: ArchiveExtractError,
    ) -> OperationOutcome {
        match err {
            // 다른 프로세스가 먼저 만든 파일은 건드리지 않음
            ArchiveExtractError::DestinationExists { .. } => OperationOutcome::failure(
                Self::destination_exists_message("file", archive_name, parent_dir),
            ),
            ArchiveExtractError::ArchiveCreateFailed { .. } => {
                self.filesystem
                    .remove_partial_output(&parent_dir.join(archive_name));
                tracing::warn!("{}", err);
                OperationOutcome::failure(format!(
                    "Aborted since could not create archive file {} in {}.",
                    archive_name,
                    parent_dir.display()
                ))
            }
            other => {
                self.filesystem
                    .remove_partial_output(&parent_dir.join(archive_name));
                OperationOutcome::failure(Self::format_user_error(
                    "Archive",
                    Some(&item.path),
                    &other.to_string(),
                    "",
                ))
            }
        }
    }

    fn rejection_message(name: &str, rejection: NameRejection) -> String {
        match rejection {
            NameRejection::AlreadyArchived => format!("Aborted since {} is already archived.", name),
            NameRejection::NotExactlyOneExtension => format!(
                "Aborted since {} does not have exactly one file extension.",
                name
            ),
            NameRejection::FolderHasExtension => format!(
                "Aborted since {} has extension.  Rename folder to remove extension and try again.",
                name
            ),
        }
    }

    fn destination_exists_message(kind: &str, name: &str, parent_dir: &Path) -> String {
        format!(
            "Aborted since destination {kind} {name} exists in {}. Move or delete existing destination {kind} and try again.",
            parent_dir.display()
        )
    }

    fn skipped_report(scope: &Path, result: &OperationResult) -> String {
        let paths: Vec<String> = result
            .skipped
            .iter()
            .map(|path| display_below(scope, path))
            .collect();
        format_skipped_report(&paths)
    }

    pub(super) fn format_user_error(
        action: &str,
        path: Option<&Path>,
        error: &str,
        hint: &str,
    ) -> String {
        let mut message = format!("{} failed.", action);
        if let Some(p) = path {
            message.push_str(&format!("\nPath: {}", p.display()));
        }
        message.push_str(&format!("\nReason: {}", error));
        if !hint.is_empty() {
            message.push_str(&format!("\nHint: {}", hint));
        }
        message
    }

    /// 입력 경로를 `~` 확장 후 절대 경로로 변환 (`.`/`..` 정리)
    pub(super) fn resolve_input_path(input: &Path) -> PathBuf {
        let expanded = match input.strip_prefix("~") {
            Ok(rest) => match dirs::home_dir() {
                Some(home) => home.join(rest),
                None => input.to_path_buf(),
            },
            Err(_) => input.to_path_buf(),
        };

        let absolute = if expanded.is_absolute() {
            expanded
        } else {
            env::current_dir()
                .map(|cwd| cwd.join(&expanded))
                .unwrap_or(expanded)
        };

        let mut normalized = PathBuf::new();
        for comp in absolute.components() {
            match comp {
                Component::CurDir => {}
                Component::ParentDir => {
                    normalized.pop();
                }
                other => normalized.push(other.as_os_str()),
            }
        }
        normalized
    }
}
