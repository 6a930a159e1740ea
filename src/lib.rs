//! # Lupe
//!
//! A metadata inspector for [tantivy](https://crates.io/crates/tantivy)
//! full-text indexes, in the spirit of Luke for Lucene.
//!
//! ## Features
//!
//! - Eager collection of cheap index metadata (path, size, directory kind,
//!   commit version, on-disk format, field names)
//! - Lazy, cached whole-index statistics (per-field distinct term counts,
//!   top terms by document frequency)
//! - Read-only: never writes to or closes the inspected index
//!
//! ## Example
//!
//! ```no_run
//! use lupe::info::IndexInfo;
//!
//! # fn main() -> lupe::error::Result<()> {
//! let info = IndexInfo::open_in_dir("/path/to/index")?;
//! println!("fields: {:?}", info.field_names());
//! println!("distinct terms: {}", info.num_terms()?);
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod error;
pub mod format;
pub mod info;
pub mod terms;

pub use error::{LupeError, Result};
pub use format::FormatDetails;
pub use info::{FieldTermCount, IndexInfo, TermStats};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
