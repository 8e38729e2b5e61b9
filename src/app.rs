use crate::core::actions::{action_def, Action};
use crate::models::operation::{CompressionLevel, DeleteMode, OperationOutcome};
use crate::system::{FileSystem, SuffixNaming};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;

mod operations;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct PersistedSettings {
    version: u32,
    compression_level: String,
    parent_folder: Option<PathBuf>,
    #[serde(default = "default_remove_source")]
    remove_source: bool,
    #[serde(default)]
    delete_mode: String,
}

fn default_remove_source() -> bool {
    true
}

/// 저장되는 사용자 설정
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// 새 아카이브에 적용할 압축 수준
    pub compression_level: CompressionLevel,
    /// 선택된 상위 폴더 (모든 작업은 이 폴더 안에서만 수행)
    pub parent_folder: Option<PathBuf>,
    /// 성공한 작업의 원본 삭제 여부
    pub remove_source: bool,
    /// 원본 삭제 방식
    pub delete_mode: DeleteMode,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            compression_level: CompressionLevel::default(),
            parent_folder: None,
            remove_source: true,
            delete_mode: DeleteMode::default(),
        }
    }
}

/// 애플리케이션 상태
pub struct App {
    pub settings: Settings,
    filesystem: FileSystem,
    naming: SuffixNaming,
    /// 설정 저장 경로 override (명령줄 옵션 또는 테스트)
    state_store_override: Option<PathBuf>,
}

impl App {
    const APP_STATE_VERSION: u32 = 1;
    const SETTINGS_ENV: &'static str = "ARCHIVE_EXTRACT_SETTINGS_FILE";

    pub fn new(settings_override: Option<PathBuf>) -> Self {
        let mut app = Self {
            settings: Settings::default(),
            filesystem: FileSystem::new(),
            naming: SuffixNaming,
            state_store_override: settings_override,
        };
        app.load_persisted_state();
        app
    }

    #[cfg(test)]
    pub(crate) fn new_for_test() -> Self {
        use std::sync::atomic::{AtomicUsize, Ordering};

        static TEST_APP_COUNTER: AtomicUsize = AtomicUsize::new(0);
        let suffix = TEST_APP_COUNTER.fetch_add(1, Ordering::Relaxed);
        let state_store_override = std::env::temp_dir().join(format!(
            "archive-extract-test-settings-{}-{}.toml",
            std::process::id(),
            suffix
        ));
        let _ = fs::remove_file(&state_store_override);

        Self {
            settings: Settings::default(),
            filesystem: FileSystem::new(),
            naming: SuffixNaming,
            state_store_override: Some(state_store_override),
        }
    }

    /// 액션 실행
    pub fn execute_action(&mut self, action: Action) -> OperationOutcome {
        if let Some(def) = action_def(action.kind()) {
            tracing::debug!("executing action {} ({})", def.id, def.label);
        }
        let changes_settings = action.changes_settings();
        let mut outcome = match action {
            Action::PickParentFolder { path } => self.pick_parent_folder(&path),
            Action::SetCompressionLevel { level } => self.set_compression_level(level),
            Action::ArchiveFile { path, keep_source } => self.archive_file(&path, keep_source),
            Action::ArchiveFolder { path, keep_source } => self.archive_folder(&path, keep_source),
            Action::ExtractArchive { path, keep_source } => {
                self.extract_archive(&path, keep_source)
            }
            Action::ListArchive { path } => self.list_archive(&path),
            Action::ShowStatus => self.show_status(),
        };
        if changes_settings && outcome.success {
            if let Err(message) = self.persist_settings() {
                outcome = OperationOutcome::failure(message);
            }
        }
        if outcome.success {
            tracing::info!("{}", outcome.message);
        } else {
            tracing::warn!("{}", outcome.message);
        }
        outcome
    }

    /// 설정 파일 경로
    pub fn state_store_path(&self) -> Option<PathBuf> {
        if let Some(path) = &self.state_store_override {
            return Some(path.clone());
        }
        if let Ok(custom) = env::var(Self::SETTINGS_ENV) {
            let trimmed = custom.trim();
            if !trimmed.is_empty() {
                return Some(PathBuf::from(trimmed));
            }
        }
        dirs::home_dir().map(|home| home.join(".archive-extract").join("settings.toml"))
    }

    fn encode_app_state(&self) -> std::result::Result<String, toml::ser::Error> {
        let payload = PersistedSettings {
            version: Self::APP_STATE_VERSION,
            compression_level: self.settings.compression_level.store_value().to_string(),
            parent_folder: self.settings.parent_folder.clone(),
            remove_source: self.settings.remove_source,
            delete_mode: self.settings.delete_mode.store_value().to_string(),
        };
        toml::to_string_pretty(&payload)
    }

    fn decode_app_state(data: &str) -> Option<PersistedSettings> {
        let parsed: PersistedSettings = toml::from_str(data).ok()?;
        if parsed.version != Self::APP_STATE_VERSION {
            return None;
        }
        Some(parsed)
    }

    pub(crate) fn save_persisted_state(&self) -> std::io::Result<()> {
        let Some(path) = self.state_store_path() else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = self
            .encode_app_state()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        fs::write(path, data)
    }

    pub(crate) fn load_persisted_state(&mut self) {
        let Some(path) = self.state_store_path() else {
            return;
        };
        let Ok(data) = fs::read_to_string(&path) else {
            return;
        };
        let Some(state) = Self::decode_app_state(&data) else {
            tracing::warn!("ignoring unreadable settings file {}", path.display());
            return;
        };

        self.settings.parent_folder = state.parent_folder;
        self.settings.remove_source = state.remove_source;
        self.settings.delete_mode =
            DeleteMode::from_store_value(&state.delete_mode).unwrap_or_default();
        match CompressionLevel::from_store_value(&state.compression_level) {
            Some(level) => self.settings.compression_level = level,
            None => {
                // 알 수 없는 값은 압축 없음으로 되돌리고 다시 저장
                self.settings.compression_level = CompressionLevel::None;
                if let Err(e) = self.save_persisted_state() {
                    tracing::warn!("could not rewrite settings: {}", e);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests;
