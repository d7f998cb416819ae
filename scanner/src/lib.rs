//! Import table scanner for PE (Portable Executable) binaries.
//!
//! The scanner answers two questions about a file: is it a PE image, and
//! which DLLs does its import table name. Images are loaded fully into
//! memory and every header field is read through a bounds-checked cursor,
//! so truncated or hostile input surfaces as an [`Error`] instead of a panic.
//!
//! ```no_run
//! let names = scanner::list_imported_libraries("stage/Performous.exe")?;
//! for name in &names {
//!     println!("{name}");
//! }
//! # Ok::<(), scanner::Error>(())
//! ```

pub use dto::ImportReport;
pub use error::{Error, Result};
pub use image::Image;
pub use pe::{Section, is_portable_executable, list_imported_libraries};

mod dto;
mod error;
mod image;
pub mod pe;
