//! Directive resolution and inlining.
//!
//! Both passes share one depth-first traversal over an explicit stack of open
//! files. A [`DirectivePolicy`] decides what each recognized directive turns
//! into; ordinary lines are always copied byte-for-byte.

use crate::directive::{Directive, DirectiveClassifier};
use crate::error::{FuseError, Result};
use crate::fs_utils::read_source;
use crate::layout::Layout;
use crate::visited::VisitedSet;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;

/// What to do with one classified line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Copy the line unchanged
    Copy,
    /// Replace the line with the given root-relative file, unless it was
    /// already visited in this pass
    Inline(String),
    /// Replace the line with this text
    Emit(String),
    /// Drop the line
    Drop,
}

/// Per-pass rules for turning directives into actions
pub trait DirectivePolicy {
    fn resolve(&mut self, directive: Directive<'_>) -> Action;

    /// Whether the pass has emitted its reference to the interface artifact
    fn interface_reference_emitted(&self) -> bool {
        false
    }
}

/// Rules of the interface pass: follow interface directives, copy the rest
#[derive(Debug)]
pub struct InterfacePolicy<'a> {
    layout: &'a Layout,
}

impl<'a> InterfacePolicy<'a> {
    /// Rules for the interface pass over `layout`
    pub fn new(layout: &'a Layout) -> Self {
        Self { layout }
    }
}

impl DirectivePolicy for InterfacePolicy<'_> {
    fn resolve(&mut self, directive: Directive<'_>) -> Action {
        match directive {
            Directive::Interface(path) => Action::Inline(self.layout.interface_path(path)),
            Directive::Implementation(_) | Directive::Ordinary => Action::Copy,
        }
    }
}

/// Rules of the implementation pass.
///
/// Implementation directives and the auxiliary header are inlined. Every
/// other interface directive collapses into one reference to the interface
/// artifact, emitted at the first such directive and never again.
#[derive(Debug)]
pub struct ImplementationPolicy<'a> {
    layout: &'a Layout,
    interface_emitted: bool,
}

impl<'a> ImplementationPolicy<'a> {
    /// Rules for the implementation pass, with no reference emitted yet
    pub fn new(layout: &'a Layout) -> Self {
        Self {
            layout,
            interface_emitted: false,
        }
    }
}

impl DirectivePolicy for ImplementationPolicy<'_> {
    fn resolve(&mut self, directive: Directive<'_>) -> Action {
        match directive {
            Directive::Interface(path) => {
                let path = self.layout.interface_path(path);
                if path == self.layout.auxiliary_interface {
                    Action::Inline(path)
                } else if self.interface_emitted {
                    tracing::trace!(%path, "interface directive collapsed");
                    Action::Drop
                } else {
                    self.interface_emitted = true;
                    tracing::trace!(%path, "interface directive replaced by artifact reference");
                    Action::Emit(self.layout.interface_reference())
                }
            }
            Directive::Implementation(path) => Action::Inline(path.to_string()),
            Directive::Ordinary => Action::Copy,
        }
    }

    fn interface_reference_emitted(&self) -> bool {
        self.interface_emitted
    }
}

/// Outcome of one fusion pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FuseReport {
    /// Entry point of the pass
    pub seed: String,
    /// Every file whose body was inlined, in first-discovery order
    pub inlined: Vec<String>,
    /// Whether a reference to the interface artifact was written
    pub interface_reference_emitted: bool,
    /// Lines written to the sink
    pub lines_written: usize,
}

/// A file being read, with a cursor at the next unread line
struct OpenFile {
    path: String,
    contents: Vec<u8>,
    pos: usize,
}

impl OpenFile {
    fn next_line(&mut self) -> Option<&[u8]> {
        if self.pos >= self.contents.len() {
            return None;
        }
        let rest = &self.contents[self.pos..];
        let len = rest
            .iter()
            .position(|&b| b == b'\n')
            .map_or(rest.len(), |newline| newline + 1);
        let start = self.pos;
        self.pos += len;
        Some(&self.contents[start..self.pos])
    }
}

fn open_seed(root: &Path, seed: &str) -> Result<OpenFile> {
    let contents = read_source(root, seed)?.ok_or_else(|| FuseError::MissingSeed {
        path: seed.to_string(),
        root: root.to_path_buf(),
    })?;
    Ok(OpenFile {
        path: seed.to_string(),
        contents,
        pos: 0,
    })
}

fn open_include(root: &Path, path: String, included_from: &str) -> Result<OpenFile> {
    let contents = read_source(root, &path)?.ok_or_else(|| FuseError::MissingInclude {
        path: path.clone(),
        included_from: included_from.to_string(),
    })?;
    Ok(OpenFile {
        path,
        contents,
        pos: 0,
    })
}

/// Runs one fusion pass from `seed`, writing the fused text to `out`.
///
/// Output order is depth-first pre-order: an inlined file's body appears
/// exactly where the directive that first reached it stood.
///
/// # Errors
///
/// - `FuseError::MissingSeed` if `seed` is not a file under `root`.
/// - `FuseError::MissingInclude` if a directive names a file that does not exist.
/// - `FuseError::Io` on read or write failures.
pub fn fuse<P, W>(
    root: &Path,
    seed: &str,
    classifier: &DirectiveClassifier,
    policy: &mut P,
    out: &mut W,
) -> Result<FuseReport>
where
    P: DirectivePolicy + ?Sized,
    W: Write + ?Sized,
{
    let mut visited = VisitedSet::new();
    let mut lines_written = 0;
    let mut stack = Vec::new();

    visited.insert(seed);
    stack.push(open_seed(root, seed)?);

    while let Some(file) = stack.last_mut() {
        let Some(line) = file.next_line() else {
            stack.pop();
            continue;
        };

        match policy.resolve(classifier.classify(line)) {
            Action::Copy => {
                out.write_all(line)?;
                lines_written += 1;
            }
            Action::Emit(text) => {
                out.write_all(text.as_bytes())?;
                lines_written += 1;
            }
            Action::Drop => {}
            Action::Inline(path) => {
                if visited.insert(&path) {
                    tracing::debug!(%path, from = %file.path, "inlining");
                    let included = open_include(root, path, &file.path)?;
                    stack.push(included);
                }
            }
        }
    }

    out.flush()?;
    Ok(FuseReport {
        seed: seed.to_string(),
        inlined: visited.into_order(),
        interface_reference_emitted: policy.interface_reference_emitted(),
        lines_written,
    })
}

/// Fuses the interface seed and every header it reaches into one header
///
/// # Errors
///
/// See [`fuse`].
pub fn fuse_interface<W: Write + ?Sized>(
    root: &Path,
    layout: &Layout,
    out: &mut W,
) -> Result<FuseReport> {
    let classifier = DirectiveClassifier::new(layout)?;
    let mut policy = InterfacePolicy::new(layout);
    fuse(root, &layout.interface_seed, &classifier, &mut policy, out)
}

/// Fuses the implementation seed into one source file that depends only on
/// the interface artifact
///
/// # Errors
///
/// See [`fuse`].
pub fn fuse_implementation<W: Write + ?Sized>(
    root: &Path,
    layout: &Layout,
    out: &mut W,
) -> Result<FuseReport> {
    let classifier = DirectiveClassifier::new(layout)?;
    let mut policy = ImplementationPolicy::new(layout);
    fuse(root, &layout.implementation_seed, &classifier, &mut policy, out)
}
