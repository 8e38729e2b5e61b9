use crate::core::actions::Action;
use crate::models::operation::CompressionLevel;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Settings file to use instead of the default location.
    #[arg(long, global = true)]
    pub settings: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Clone, Debug)]
pub enum Commands {
    /// Pick the parent folder. Archive and extract only work inside it.
    Pick {
        /// Folder that contains folders or files to archive or extract.
        folder: PathBuf,
    },

    /// Set the compression level used for new archives.
    Level {
        #[arg(value_enum)]
        level: LevelArg,
    },

    /// Archive a file into <name>.zip next to it.
    #[command(alias = "af")]
    ArchiveFile {
        file: PathBuf,

        /// Keep the source file after a successful archive.
        #[arg(long)]
        keep_source: bool,
    },

    /// Archive a folder into <name>.zip next to it.
    #[command(alias = "ad")]
    ArchiveFolder {
        folder: PathBuf,

        /// Keep the source folder after a successful archive.
        #[arg(long)]
        keep_source: bool,
    },

    /// Extract an archive back into the file or folder it came from.
    #[command(alias = "x")]
    Extract {
        archive: PathBuf,

        /// Keep the archive after a successful extract.
        #[arg(long)]
        keep_source: bool,
    },

    /// List the records of an archive.
    #[command(alias = "l")]
    List { archive: PathBuf },

    /// Show the current settings.
    Status,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum LevelArg {
    /// Store only.
    None,
    /// Fastest deflate.
    Fastest,
    /// Balanced deflate.
    Optimal,
}

impl From<LevelArg> for CompressionLevel {
    fn from(value: LevelArg) -> Self {
        match value {
            LevelArg::None => CompressionLevel::None,
            LevelArg::Fastest => CompressionLevel::Fastest,
            LevelArg::Optimal => CompressionLevel::Optimal,
        }
    }
}

impl From<Commands> for Action {
    fn from(command: Commands) -> Self {
        match command {
            Commands::Pick { folder } => Action::PickParentFolder { path: folder },
            Commands::Level { level } => Action::SetCompressionLevel {
                level: level.into(),
            },
            Commands::ArchiveFile { file, keep_source } => Action::ArchiveFile {
                path: file,
                keep_source,
            },
            Commands::ArchiveFolder {
                folder,
                keep_source,
            } => Action::ArchiveFolder {
                path: folder,
                keep_source,
            },
            Commands::Extract {
                archive,
                keep_source,
            } => Action::ExtractArchive {
                path: archive,
                keep_source,
            },
            Commands::List { archive } => Action::ListArchive { path: archive },
            Commands::Status => Action::ShowStatus,
        }
    }
}
