// System Layer
pub mod archive;
pub mod filesystem;
pub mod lock;
pub mod naming;

pub use archive::{
    compress, extract, list_entries, ArchiveProgressEvent, CompressRequest, ExtractRequest,
};
pub use filesystem::FileSystem;
pub use lock::is_locked;
pub use naming::{ArchiveOrigin, NameRejection, NamingScheme, SuffixNaming};
