//! Document sources.
//!
//! A [DocumentSource] hands the loader its documents together with a
//! modification marker used to decide whether a persisted cache is still
//! valid. [FileSource] reads a multi-document text file; [MemorySource]
//! serves documents parsed elsewhere.

mod document_source;
mod file_source;

pub use document_source::*;
pub use file_source::*;
