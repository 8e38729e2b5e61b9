// Data Models
pub mod entry;
pub mod operation;
