use super::*;
use crate::system::list_entries;
use std::fs::{self, File};
use std::path::Path;
use tempfile::TempDir;

fn make_test_app(parent: &Path) -> App {
    let mut app = App::new_for_test();
    app.settings.parent_folder = Some(parent.to_path_buf());
    app
}

fn entry_names(archive: &Path) -> Vec<String> {
    list_entries(archive)
        .expect("list entries")
        .into_iter()
        .map(|e| e.path)
        .collect()
}

fn prepare_notes(base: &Path) -> PathBuf {
    let notes = base.join("Notes");
    fs::create_dir_all(&notes).expect("create notes");
    fs::write(notes.join("a.txt"), b"alpha").expect("write a");
    fs::write(notes.join("b.txt"), b"bravo").expect("write b");
    notes
}

#[test]
fn test_archive_file_rejects_two_extensions() {
    let temp = TempDir::new().expect("create tempdir");
    let source = temp.path().join("report.tar.gz");
    fs::write(&source, b"tarball").expect("write source");
    let mut app = make_test_app(temp.path());

    let outcome = app.execute_action(Action::ArchiveFile {
        path: source.clone(),
        keep_source: false,
    });

    assert!(!outcome.success);
    assert_eq!(
        outcome.message,
        "Aborted since report.tar.gz does not have exactly one file extension."
    );
    assert!(!temp.path().join("report.tar.gz.zip").exists());
    assert!(source.exists());
}

#[test]
fn test_archive_file_rejects_already_archived() {
    let temp = TempDir::new().expect("create tempdir");
    let source = temp.path().join("Photos.zip");
    fs::write(&source, b"zip").expect("write source");
    let mut app = make_test_app(temp.path());

    let outcome = app.execute_action(Action::ArchiveFile {
        path: source,
        keep_source: false,
    });
    assert!(!outcome.success);
    assert_eq!(outcome.message, "Aborted since Photos.zip is already archived.");
}

#[test]
fn test_archive_file_then_extract_restores_file_in_parent() {
    let temp = TempDir::new().expect("create tempdir");
    let source = temp.path().join("Invoice.pdf");
    fs::write(&source, b"%PDF-1.4 invoice").expect("write source");
    let mut app = make_test_app(temp.path());

    let archived = app.execute_action(Action::ArchiveFile {
        path: source.clone(),
        keep_source: false,
    });
    let archive = temp.path().join("Invoice.pdf.zip");
    assert!(archived.success, "{}", archived.message);
    assert!(archived.message.starts_with(&format!(
        "Archived Invoice.pdf to {} (",
        archive.display()
    )));
    assert!(archived.message.ends_with(" seconds)."));
    assert!(!source.exists());
    assert_eq!(entry_names(&archive), vec!["Invoice.pdf"]);

    let extracted = app.execute_action(Action::ExtractArchive {
        path: archive.clone(),
        keep_source: false,
    });
    assert!(extracted.success, "{}", extracted.message);
    assert!(extracted.message.starts_with(&format!(
        "Extracted Invoice.pdf.zip to {} (",
        source.display()
    )));
    assert!(source.is_file());
    assert!(!temp.path().join("Invoice.pdf").is_dir());
    assert_eq!(fs::read(&source).expect("read restored"), b"%PDF-1.4 invoice");
    assert!(!archive.exists());
}

#[test]
fn test_archive_folder_then_extract_notes() {
    let temp = TempDir::new().expect("create tempdir");
    let notes = prepare_notes(temp.path());
    let mut app = make_test_app(temp.path());
    app.settings.compression_level = CompressionLevel::Optimal;

    let archived = app.execute_action(Action::ArchiveFolder {
        path: notes.clone(),
        keep_source: false,
    });
    let archive = temp.path().join("Notes.zip");
    assert!(archived.success, "{}", archived.message);
    assert_eq!(entry_names(&archive), vec!["a.txt", "b.txt"]);
    assert!(!notes.exists());

    let extracted = app.execute_action(Action::ExtractArchive {
        path: archive.clone(),
        keep_source: false,
    });
    assert!(extracted.success, "{}", extracted.message);
    assert!(extracted
        .message
        .starts_with(&format!("Extracted Notes.zip to {} (", notes.display())));
    assert_eq!(fs::read(notes.join("a.txt")).expect("read a"), b"alpha");
    assert_eq!(fs::read(notes.join("b.txt")).expect("read b"), b"bravo");
    assert!(!archive.exists());
}

#[test]
fn test_keep_source_overrides_removal() {
    let temp = TempDir::new().expect("create tempdir");
    let notes = prepare_notes(temp.path());
    let mut app = make_test_app(temp.path());

    let outcome = app.execute_action(Action::ArchiveFolder {
        path: notes.clone(),
        keep_source: true,
    });
    assert!(outcome.success, "{}", outcome.message);
    assert!(notes.join("a.txt").exists());
    assert!(temp.path().join("Notes.zip").exists());

    app.settings.remove_source = false;
    fs::remove_dir_all(&notes).expect("remove notes");
    let outcome = app.execute_action(Action::ExtractArchive {
        path: temp.path().join("Notes.zip"),
        keep_source: false,
    });
    assert!(outcome.success, "{}", outcome.message);
    assert!(temp.path().join("Notes.zip").exists());
}

#[test]
fn test_archive_folder_rejects_extension() {
    let temp = TempDir::new().expect("create tempdir");
    let folder = temp.path().join("Notes.old");
    fs::create_dir(&folder).expect("create folder");
    let mut app = make_test_app(temp.path());

    let outcome = app.execute_action(Action::ArchiveFolder {
        path: folder,
        keep_source: false,
    });
    assert!(!outcome.success);
    assert_eq!(
        outcome.message,
        "Aborted since Notes.old has extension.  Rename folder to remove extension and try again."
    );
}

#[test]
fn test_archive_folder_destination_exists() {
    let temp = TempDir::new().expect("create tempdir");
    let notes = prepare_notes(temp.path());
    fs::write(temp.path().join("Notes.zip"), b"older").expect("write existing");
    let mut app = make_test_app(temp.path());

    let outcome = app.execute_action(Action::ArchiveFolder {
        path: notes.clone(),
        keep_source: false,
    });
    assert!(!outcome.success);
    assert_eq!(
        outcome.message,
        format!(
            "Aborted since destination file Notes.zip exists in {}. Move or delete existing destination file and try again.",
            temp.path().display()
        )
    );
    assert_eq!(
        fs::read(temp.path().join("Notes.zip")).expect("read existing"),
        b"older"
    );
    assert!(notes.exists());
}

#[test]
fn test_extract_folder_destination_exists() {
    let temp = TempDir::new().expect("create tempdir");
    let notes = prepare_notes(temp.path());
    let mut app = make_test_app(temp.path());
    let archived = app.execute_action(Action::ArchiveFolder {
        path: notes.clone(),
        keep_source: true,
    });
    assert!(archived.success, "{}", archived.message);

    let outcome = app.execute_action(Action::ExtractArchive {
        path: temp.path().join("Notes.zip"),
        keep_source: false,
    });
    assert!(!outcome.success);
    assert_eq!(
        outcome.message,
        format!(
            "Aborted since destination folder Notes exists in {}. Move or delete existing destination folder and try again.",
            temp.path().display()
        )
    );
    assert!(temp.path().join("Notes.zip").exists());
}

#[test]
fn test_extract_rejects_non_archive_name() {
    let temp = TempDir::new().expect("create tempdir");
    let file = temp.path().join("Invoice.pdf");
    fs::write(&file, b"pdf").expect("write file");
    let mut app = make_test_app(temp.path());

    let outcome = app.execute_action(Action::ExtractArchive {
        path: file,
        keep_source: false,
    });
    assert!(!outcome.success);
    assert_eq!(
        outcome.message,
        "Aborted since Invoice.pdf does not have extension of .zip."
    );
}

#[test]
fn test_extract_rejects_archive_without_name() {
    let temp = TempDir::new().expect("create tempdir");
    let file = temp.path().join(".zip");
    fs::write(&file, b"zip").expect("write file");
    let mut app = make_test_app(temp.path());

    let outcome = app.execute_action(Action::ExtractArchive {
        path: file.clone(),
        keep_source: false,
    });
    assert!(!outcome.success);
    assert_eq!(
        outcome.message,
        "Aborted since .zip has no name before extension of .zip."
    );
    assert!(file.exists());
}

#[test]
fn test_locked_item_aborts_without_side_effects() {
    let temp = TempDir::new().expect("create tempdir");
    let notes = prepare_notes(temp.path());
    let holder = File::open(notes.join("b.txt")).expect("open holder");
    holder.lock().expect("hold exclusive lock");
    let mut app = make_test_app(temp.path());

    let outcome = app.execute_action(Action::ArchiveFolder {
        path: notes.clone(),
        keep_source: false,
    });
    assert!(!outcome.success);
    assert_eq!(
        outcome.message,
        "Aborted since Notes is locked.  Another application may be using a file in the folder."
    );
    assert!(!temp.path().join("Notes.zip").exists());
    assert!(notes.join("a.txt").exists());

    drop(holder);
    let outcome = app.execute_action(Action::ArchiveFolder {
        path: notes,
        keep_source: true,
    });
    assert!(outcome.success, "{}", outcome.message);
}

#[test]
fn test_requires_picked_parent_folder() {
    let temp = TempDir::new().expect("create tempdir");
    let source = temp.path().join("a.txt");
    fs::write(&source, b"a").expect("write source");

    let mut app = App::new_for_test();
    let outcome = app.execute_action(Action::ArchiveFile {
        path: source.clone(),
        keep_source: false,
    });
    assert!(!outcome.success);
    assert!(outcome.message.starts_with("Aborted since no parent folder is picked."));

    let missing = temp.path().join("gone");
    app.settings.parent_folder = Some(missing.clone());
    let outcome = app.execute_action(Action::ArchiveFile {
        path: source,
        keep_source: false,
    });
    assert_eq!(
        outcome.message,
        format!(
            "Could not find {}.  Did you delete, move, or rename this folder while this App was running?",
            missing.display()
        )
    );
}

#[test]
fn test_item_outside_parent_folder_is_refused() {
    let temp = TempDir::new().expect("create tempdir");
    let scope = temp.path().join("scope");
    fs::create_dir(&scope).expect("create scope");
    let outside = temp.path().join("outside.txt");
    fs::write(&outside, b"out").expect("write outside");
    let mut app = make_test_app(&scope);

    let outcome = app.execute_action(Action::ArchiveFile {
        path: outside.clone(),
        keep_source: false,
    });
    assert!(!outcome.success);
    assert_eq!(
        outcome.message,
        format!(
            "Aborted since could not get access to parent folder of {}.",
            outside.display()
        )
    );
    assert!(!temp.path().join("outside.txt.zip").exists());
}

#[cfg(unix)]
#[test]
fn test_archive_folder_partial_failure_keeps_archive_and_source() {
    let temp = TempDir::new().expect("create tempdir");
    let notes = prepare_notes(temp.path());
    let other = temp.path().join("Other");
    fs::create_dir(&other).expect("create other");
    std::os::unix::fs::symlink(&other, notes.join("link")).expect("create symlink");
    let mut app = make_test_app(temp.path());

    let outcome = app.execute_action(Action::ArchiveFolder {
        path: notes.clone(),
        keep_source: false,
    });
    let archive = temp.path().join("Notes.zip");

    assert!(!outcome.success);
    assert!(outcome.message.starts_with(&format!(
        "Could not archive all items in Notes to {} (",
        archive.display()
    )));
    assert!(outcome
        .message
        .ends_with("seconds).\nItems not compressed:\n1 item not processed\nNotes/link"));
    assert!(archive.exists());
    assert!(notes.join("a.txt").exists());
    assert_eq!(entry_names(&archive), vec!["a.txt", "b.txt"]);
}

#[test]
fn test_settings_persist_across_instances() {
    let temp = TempDir::new().expect("create tempdir");
    let settings_file = temp.path().join("config").join("settings.toml");

    let mut app = App::new(Some(settings_file.clone()));
    assert_eq!(app.settings, Settings::default());
    let picked = app.execute_action(Action::PickParentFolder {
        path: temp.path().to_path_buf(),
    });
    assert!(picked.success, "{}", picked.message);
    let level = app.execute_action(Action::SetCompressionLevel {
        level: CompressionLevel::Fastest,
    });
    assert_eq!(
        level.message,
        "Archived folders and files will be compressed using fast method."
    );

    let reloaded = App::new(Some(settings_file.clone()));
    assert_eq!(
        reloaded.settings.parent_folder.as_deref(),
        Some(temp.path())
    );
    assert_eq!(reloaded.settings.compression_level, CompressionLevel::Fastest);
    assert!(reloaded.settings.remove_source);

    let data = fs::read_to_string(&settings_file).expect("read settings");
    assert!(data.contains("compression_level = \"Fastest\""));
}

#[test]
fn test_settings_save_failure_fails_settings_action() {
    let temp = TempDir::new().expect("create tempdir");
    let blocker = temp.path().join("blocker");
    fs::write(&blocker, b"plain file").expect("write blocker");
    let mut app = App::new(Some(blocker.join("settings.toml")));

    let outcome = app.execute_action(Action::SetCompressionLevel {
        level: CompressionLevel::Optimal,
    });
    assert!(!outcome.success);
    assert!(
        outcome.message.starts_with("Save settings failed."),
        "{}",
        outcome.message
    );
}

#[test]
fn test_only_settings_actions_write_settings() {
    let temp = TempDir::new().expect("create tempdir");
    let settings_file = temp.path().join("settings.toml");
    let mut app = App::new(Some(settings_file.clone()));

    let status = app.execute_action(Action::ShowStatus);
    assert!(status.success, "{}", status.message);
    assert!(!settings_file.exists());

    let refused = app.execute_action(Action::PickParentFolder {
        path: temp.path().join("missing"),
    });
    assert!(!refused.success);
    assert!(!settings_file.exists());

    let picked = app.execute_action(Action::PickParentFolder {
        path: temp.path().to_path_buf(),
    });
    assert!(picked.success, "{}", picked.message);
    assert!(settings_file.exists());
}

#[test]
fn test_unknown_compression_level_falls_back_and_rewrites() {
    let temp = TempDir::new().expect("create tempdir");
    let settings_file = temp.path().join("settings.toml");
    fs::write(
        &settings_file,
        "version = 1\ncompression_level = \"Maximum\"\ndelete_mode = \"trash\"\n",
    )
    .expect("write settings");

    let app = App::new(Some(settings_file.clone()));
    assert_eq!(app.settings.compression_level, CompressionLevel::None);
    assert_eq!(app.settings.delete_mode, DeleteMode::Trash);
    assert!(app.settings.remove_source);

    let data = fs::read_to_string(&settings_file).expect("read settings");
    assert!(data.contains("compression_level = \"NoCompression\""));
}

#[test]
fn test_settings_version_mismatch_uses_defaults() {
    let temp = TempDir::new().expect("create tempdir");
    let settings_file = temp.path().join("settings.toml");
    fs::write(
        &settings_file,
        "version = 99\ncompression_level = \"Optimal\"\n",
    )
    .expect("write settings");

    let app = App::new(Some(settings_file));
    assert_eq!(app.settings, Settings::default());
}

#[test]
fn test_pick_parent_folder_requires_directory() {
    let temp = TempDir::new().expect("create tempdir");
    let mut app = App::new_for_test();
    let missing = temp.path().join("missing");

    let outcome = app.execute_action(Action::PickParentFolder {
        path: missing.clone(),
    });
    assert!(!outcome.success);
    assert_eq!(
        outcome.message,
        format!(
            "Aborted since could not access selected App folder {}.",
            missing.display()
        )
    );
    assert!(app.settings.parent_folder.is_none());
}

#[test]
fn test_list_archive_reports_entries() {
    let temp = TempDir::new().expect("create tempdir");
    let notes = prepare_notes(temp.path());
    let mut app = make_test_app(temp.path());
    app.execute_action(Action::ArchiveFolder {
        path: notes,
        keep_source: true,
    });

    let outcome = app.execute_action(Action::ListArchive {
        path: temp.path().join("Notes.zip"),
    });
    assert!(outcome.success, "{}", outcome.message);
    assert!(outcome.message.contains("2 entries"));
    assert!(outcome.message.contains("a.txt"));
    assert!(outcome.message.contains("b.txt"));
}

#[test]
fn test_resolve_input_path_normalizes_dots() {
    let resolved = App::resolve_input_path(Path::new("/tmp/base/./sub/../file.txt"));
    assert_eq!(resolved, PathBuf::from("/tmp/base/file.txt"));
    assert!(App::resolve_input_path(Path::new("relative.txt")).is_absolute());
}
