//! # srcfuse
//!
//! Collapses a multi-file C/C++ library into one combined header and one
//! combined source file, so the library can be vendored as two files.
//!
//! ## How it works
//!
//! - The interface pass starts at the header seed and replaces every
//!   `#include "unittest/..."` line with the referenced header, each header
//!   inlined once.
//! - The implementation pass starts at the source seed, inlines every
//!   `#include "src/..."` and the auxiliary header, and collapses all other
//!   header includes into a single `#include` of the fused header.
//! - Every other line is copied byte-for-byte. There is no preprocessing
//!   beyond that: conditional compilation and macros are left alone.
//!
//! ## Usage
//!
//! ### As a Library
//!
//! ```no_run
//! use srcfuse::{Layout, fuse_implementation, fuse_interface};
//! use std::path::Path;
//!
//! let layout = Layout::default();
//! let root = Path::new("third_party/unittest");
//! let mut header: Vec<u8> = Vec::new();
//! let mut source: Vec<u8> = Vec::new();
//!
//! fuse_interface(root, &layout, &mut header)?;
//! fuse_implementation(root, &layout, &mut source)?;
//! # Ok::<(), srcfuse::FuseError>(())
//! ```
//!
//! ### As a CLI Tool
//!
//! ```bash
//! # Fuse the library the binary was installed into
//! srcfuse fused_unittest
//!
//! # Fuse a library checked out elsewhere
//! srcfuse path/to/unittest fused_unittest
//!
//! # Show what would be inlined
//! srcfuse path/to/unittest fused_unittest --list=json
//! ```

pub mod amalgamate;
pub mod directive;
pub mod error;
pub mod fs_utils;
pub mod fuse;
pub mod layout;
pub mod visited;

pub use amalgamate::{AmalgamateOptions, Amalgamation, Artifacts, amalgamate, dry_run};
pub use directive::{Directive, DirectiveClassifier};
pub use error::{FuseError, Result};
pub use fuse::{FuseReport, fuse, fuse_implementation, fuse_interface};
pub use layout::Layout;
