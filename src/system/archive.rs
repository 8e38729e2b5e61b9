use crate::models::operation::{CompressionLevel, OperationResult};
use crate::system::lock::read_sorted_children;
use crate::utils::error::{ArchiveExtractError, Result};
use chrono::{DateTime, Datelike, Local, NaiveDate, TimeZone, Timelike};
use std::collections::BTreeSet;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Read, Seek, Write};
use std::path::{Component, Path, PathBuf};
use std::sync::mpsc::Sender;
use std::time::{Instant, SystemTime};
use zip::write::SimpleFileOptions as ZipFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

const FASTEST_DEFLATE_LEVEL: i64 = 1;
const OPTIMAL_DEFLATE_LEVEL: i64 = 6;

#[derive(Debug, Clone)]
pub struct ArchiveEntry {
    pub path: String,
    pub size: u64,
    pub is_dir: bool,
    pub modified: Option<SystemTime>,
}

#[derive(Debug, Clone)]
pub struct CompressRequest {
    pub source: PathBuf,
    pub output_path: PathBuf,
    pub level: CompressionLevel,
}

#[derive(Debug, Clone)]
pub struct ExtractRequest {
    pub archive_path: PathBuf,
    pub dest_dir: PathBuf,
}

#[derive(Debug, Clone)]
pub struct ArchiveProgressEvent {
    pub current_file: String,
    pub items_processed: usize,
    pub items_failed: usize,
    pub bytes_processed: u64,
}

struct WalkContext<'a, W: Write + Seek> {
    writer: ZipWriter<W>,
    options: ZipFileOptions,
    output_path: &'a Path,
    progress_tx: &'a Sender<ArchiveProgressEvent>,
    result: OperationResult,
    bytes_processed: u64,
}

impl<W: Write + Seek> WalkContext<'_, W> {
    fn succeeded(&mut self, name: &str, copied: u64) {
        self.bytes_processed = self.bytes_processed.saturating_add(copied);
        self.result.record_success();
        tracing::debug!("archived {}", name);
        send_progress(
            self.progress_tx,
            name.to_string(),
            &self.result,
            self.bytes_processed,
        );
    }

    fn failed(&mut self, source: &Path, reason: impl std::fmt::Display) {
        tracing::warn!("skipped {}: {}", source.display(), reason);
        self.result.record_failure(source);
    }
}

pub fn compress(
    request: &CompressRequest,
    progress_tx: Sender<ArchiveProgressEvent>,
) -> Result<OperationResult> {
    let started = Instant::now();
    let source_meta = fs::symlink_metadata(&request.source)
        .map_err(|e| ArchiveExtractError::from_io(&request.source, e))?;

    let file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&request.output_path)
        .map_err(|e| match e.kind() {
            io::ErrorKind::AlreadyExists => ArchiveExtractError::DestinationExists {
                path: request.output_path.clone(),
            },
            _ => ArchiveExtractError::ArchiveCreateFailed {
                path: request.output_path.clone(),
                reason: e.to_string(),
            },
        })?;

    tracing::info!(
        "compressing {} into {} ({})",
        request.source.display(),
        request.output_path.display(),
        request.level.display_name()
    );

    let mut ctx = WalkContext {
        writer: ZipWriter::new(BufWriter::new(file)),
        options: zip_options(request.level),
        output_path: &request.output_path,
        progress_tx: &progress_tx,
        result: OperationResult::default(),
        bytes_processed: 0,
    };

    if source_meta.is_dir() {
        add_folder_entries(&mut ctx, &request.source, "");
    } else {
        let name = request
            .source
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .ok_or_else(|| ArchiveExtractError::ArchiveCreateFailed {
                path: request.output_path.clone(),
                reason: "Invalid source name".to_string(),
            })?;
        match add_file_entry(&mut ctx.writer, &request.source, &name, ctx.options) {
            Ok(copied) => ctx.succeeded(&name, copied),
            Err(e) => ctx.failed(&request.source, e),
        }
    }

    let WalkContext {
        writer, mut result, ..
    } = ctx;
    writer
        .finish()
        .map_err(|e| e.to_string())
        .and_then(|mut out| out.flush().map_err(|e| e.to_string()))
        .map_err(|reason| ArchiveExtractError::ArchiveCreateFailed {
            path: request.output_path.clone(),
            reason,
        })?;

    result.elapsed = started.elapsed();
    tracing::info!(
        "compressed {} entries, {} skipped",
        result.items_processed,
        result.items_failed()
    );
    Ok(result)
}

pub fn extract(
    request: &ExtractRequest,
    progress_tx: Sender<ArchiveProgressEvent>,
) -> Result<OperationResult> {
    let started = Instant::now();
    if !request.dest_dir.is_dir() {
        return Err(ArchiveExtractError::ArchiveExtractFailed {
            path: request.archive_path.clone(),
            reason: format!(
                "Destination directory does not exist: {}",
                request.dest_dir.display()
            ),
        });
    }

    let conflicts = list_extract_conflicts(&request.archive_path, &request.dest_dir)?;
    if let Some(first) = conflicts.first() {
        return Err(ArchiveExtractError::DestinationExists {
            path: request.dest_dir.join(first),
        });
    }

    let mut archive = open_archive(&request.archive_path)?;
    tracing::info!(
        "extracting {} into {}",
        request.archive_path.display(),
        request.dest_dir.display()
    );

    let mut result = OperationResult::default();
    let mut bytes_processed = 0u64;
    for idx in 0..archive.len() {
        let name = archive
            .name_for_index(idx)
            .map(str::to_string)
            .unwrap_or_else(|| format!("#{}", idx));

        let Some(dest_path) = sanitize_extract_path(&request.dest_dir, Path::new(&name)) else {
            tracing::warn!("skipped {}: blocked unsafe path", name);
            result.record_failure(&name);
            continue;
        };

        let mut entry = match archive.by_index(idx) {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!("skipped {}: {}", name, e);
                result.record_failure(dest_path);
                continue;
            }
        };

        let outcome = if entry.is_dir() {
            fs::create_dir_all(&dest_path).map(|_| 0u64)
        } else {
            let stamp: Option<zip::DateTime> = entry.last_modified().into();
            let modified = stamp.and_then(system_time_from_zip);
            write_new_file(&mut entry, &dest_path, modified)
        };

        match outcome {
            Ok(copied) => {
                bytes_processed = bytes_processed.saturating_add(copied);
                result.record_success();
                tracing::debug!("extracted {}", name);
                send_progress(&progress_tx, name, &result, bytes_processed);
            }
            Err(e) => {
                tracing::warn!("skipped {}: {}", name, e);
                result.record_failure(dest_path);
            }
        }
    }

    result.elapsed = started.elapsed();
    tracing::info!(
        "extracted {} entries, {} skipped",
        result.items_processed,
        result.items_failed()
    );
    Ok(result)
}

pub fn list_entries(path: &Path) -> Result<Vec<ArchiveEntry>> {
    let mut archive = open_archive(path)?;

    let mut entries = Vec::new();
    for i in 0..archive.len() {
        let entry = archive
            .by_index(i)
            .map_err(|e| ArchiveExtractError::ArchiveExtractFailed {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
        let stamp: Option<zip::DateTime> = entry.last_modified().into();
        entries.push(ArchiveEntry {
            path: entry.name().to_string(),
            size: entry.size(),
            is_dir: entry.is_dir(),
            modified: stamp.and_then(system_time_from_zip),
        });
    }
    Ok(entries)
}

pub fn list_extract_conflicts(archive_path: &Path, dest_dir: &Path) -> Result<Vec<String>> {
    let entries = list_entries(archive_path)?;
    let mut conflicts = BTreeSet::new();

    for entry in entries {
        let raw_path = PathBuf::from(&entry.path);
        let Some(dest_path) = sanitize_extract_path(dest_dir, &raw_path) else {
            continue;
        };
        if dest_path.exists() && !(entry.is_dir && dest_path.is_dir()) {
            conflicts.insert(entry.path);
        }
    }

    Ok(conflicts.into_iter().collect())
}

fn open_archive(path: &Path) -> Result<ZipArchive<File>> {
    let file = File::open(path).map_err(|e| ArchiveExtractError::from_io(path, e))?;
    ZipArchive::new(file).map_err(|e| ArchiveExtractError::ArchiveExtractFailed {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

fn zip_options(level: CompressionLevel) -> ZipFileOptions {
    match level {
        CompressionLevel::None => {
            ZipFileOptions::default().compression_method(CompressionMethod::Stored)
        }
        CompressionLevel::Fastest => ZipFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .compression_level(Some(FASTEST_DEFLATE_LEVEL)),
        CompressionLevel::Optimal => ZipFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .compression_level(Some(OPTIMAL_DEFLATE_LEVEL)),
    }
}

fn add_folder_entries<W: Write + Seek>(ctx: &mut WalkContext<'_, W>, folder: &Path, prefix: &str) {
    match read_sorted_children(folder) {
        Ok(children) => add_children(ctx, children, prefix),
        Err(e) => ctx.failed(folder, e),
    }
}

/// 정렬된 자식 목록을 순서대로 기록한다.
///
/// 하위 폴더는 내용을 먼저 읽은 뒤에 디렉터리 레코드를 쓴다. 읽지 못한 폴더는
/// 레코드 없이 건너뛴 항목으로만 남는다. 심볼릭 링크는 파일이든 폴더든
/// 따라가지 않는다. 잠금 검사를 거치지 않은 파일은 읽지 않는다.
fn add_children<W: Write + Seek>(
    ctx: &mut WalkContext<'_, W>,
    children: Vec<PathBuf>,
    prefix: &str,
) {
    for child in children {
        if child == ctx.output_path {
            continue;
        }
        let file_name = child
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let name = if prefix.is_empty() {
            file_name
        } else {
            format!("{}/{}", prefix, file_name)
        };

        let meta = match fs::symlink_metadata(&child) {
            Ok(meta) => meta,
            Err(e) => {
                ctx.failed(&child, e);
                continue;
            }
        };

        if meta.is_dir() {
            let grandchildren = match read_sorted_children(&child) {
                Ok(grandchildren) => grandchildren,
                Err(e) => {
                    ctx.failed(&child, e);
                    continue;
                }
            };
            let options = with_modified(ctx.options, meta.modified().ok());
            match ctx.writer.add_directory(format!("{}/", name), options) {
                Ok(()) => {
                    ctx.succeeded(&name, 0);
                    add_children(ctx, grandchildren, &name);
                }
                Err(e) => ctx.failed(&child, e),
            }
        } else if meta.is_symlink() {
            ctx.failed(&child, "symbolic link is not followed");
        } else {
            match add_file_entry(&mut ctx.writer, &child, &name, ctx.options) {
                Ok(copied) => ctx.succeeded(&name, copied),
                Err(e) => ctx.failed(&child, e),
            }
        }
    }
}

fn add_file_entry<W: Write + Seek>(
    writer: &mut ZipWriter<W>,
    source: &Path,
    name: &str,
    options: ZipFileOptions,
) -> std::result::Result<u64, String> {
    let mut src = File::open(source).map_err(|e| e.to_string())?;
    let modified = src.metadata().and_then(|m| m.modified()).ok();
    writer
        .start_file(name, with_modified(options, modified))
        .map_err(|e| e.to_string())?;
    match io::copy(&mut src, writer) {
        Ok(copied) => Ok(copied),
        Err(e) => {
            // 잘린 레코드가 남지 않도록 현재 항목 폐기
            let _ = writer.abort_file();
            Err(e.to_string())
        }
    }
}

fn write_new_file<R: Read>(
    entry: &mut R,
    dest_path: &Path,
    modified: Option<SystemTime>,
) -> io::Result<u64> {
    if let Some(parent) = dest_path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut out = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(dest_path)?;
    match io::copy(entry, &mut out) {
        Ok(copied) => {
            if let Some(time) = modified {
                let _ = out.set_modified(time);
            }
            Ok(copied)
        }
        Err(e) => {
            drop(out);
            let _ = fs::remove_file(dest_path);
            Err(e)
        }
    }
}

fn with_modified(options: ZipFileOptions, modified: Option<SystemTime>) -> ZipFileOptions {
    match modified.and_then(zip_time_from_system) {
        Some(stamp) => options.last_modified_time(stamp),
        None => options,
    }
}

fn zip_time_from_system(time: SystemTime) -> Option<zip::DateTime> {
    let local: DateTime<Local> = time.into();
    zip::DateTime::from_date_and_time(
        u16::try_from(local.year()).ok()?,
        local.month() as u8,
        local.day() as u8,
        local.hour() as u8,
        local.minute() as u8,
        local.second() as u8,
    )
    .ok()
}

fn system_time_from_zip(stamp: zip::DateTime) -> Option<SystemTime> {
    let naive = NaiveDate::from_ymd_opt(
        i32::from(stamp.year()),
        u32::from(stamp.month()),
        u32::from(stamp.day()),
    )?
    .and_hms_opt(
        u32::from(stamp.hour()),
        u32::from(stamp.minute()),
        u32::from(stamp.second()),
    )?;
    let local = Local.from_local_datetime(&naive).earliest()?;
    Some(local.into())
}

fn send_progress(
    progress_tx: &Sender<ArchiveProgressEvent>,
    current_file: String,
    result: &OperationResult,
    bytes_processed: u64,
) {
    let _ = progress_tx.send(ArchiveProgressEvent {
        current_file,
        items_processed: result.items_processed,
        items_failed: result.items_failed(),
        bytes_processed,
    });
}

fn sanitize_extract_path(dest_root: &Path, raw_path: &Path) -> Option<PathBuf> {
    let mut clean = PathBuf::new();
    for comp in raw_path.components() {
        match comp {
            Component::Normal(v) => clean.push(v),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    if clean.as_os_str().is_empty() {
        return None;
    }
    let out = dest_root.join(clean);
    if out.starts_with(dest_root) {
        Some(out)
    } else {
        None
    }
}
