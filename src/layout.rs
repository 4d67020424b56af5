/// Directive prefix of public headers, e.g. `#include "unittest/foo.h"`
pub const INTERFACE_PREFIX: &str = "unittest/";
/// Directive prefix of implementation sources, e.g. `#include "src/foo.cc"`
pub const IMPLEMENTATION_PREFIX: &str = "src/";
/// Directory under the root that public header directives resolve against
pub const INCLUDE_DIR: &str = "include/";

pub const INTERFACE_SEED: &str = "include/unittest/unittest.h";
pub const AUXILIARY_INTERFACE: &str = "include/unittest/unittest-spi.h";
pub const IMPLEMENTATION_SEED: &str = "src/unittest-all.cc";

pub const INTERFACE_OUTPUT: &str = "unittest/unittest.h";
pub const IMPLEMENTATION_OUTPUT: &str = "unittest/unittest-all.cc";

/// Where the seeds live, which directives are recognized, and where the
/// fused artifacts go. All paths are relative and compared textually.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    /// Quoted-path prefix that marks an interface directive
    pub interface_prefix: String,
    /// Quoted-path prefix that marks an implementation directive
    pub implementation_prefix: String,
    /// Prepended to interface directive paths to locate them under the root
    pub include_dir: String,
    /// Entry point of the interface pass
    pub interface_seed: String,
    /// Public header not reachable from the interface seed
    pub auxiliary_interface: String,
    /// Entry point of the implementation pass
    pub implementation_seed: String,
    /// Interface artifact, relative to the output directory
    pub interface_output: String,
    /// Implementation artifact, relative to the output directory
    pub implementation_output: String,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            interface_prefix: INTERFACE_PREFIX.to_string(),
            implementation_prefix: IMPLEMENTATION_PREFIX.to_string(),
            include_dir: INCLUDE_DIR.to_string(),
            interface_seed: INTERFACE_SEED.to_string(),
            auxiliary_interface: AUXILIARY_INTERFACE.to_string(),
            implementation_seed: IMPLEMENTATION_SEED.to_string(),
            interface_output: INTERFACE_OUTPUT.to_string(),
            implementation_output: IMPLEMENTATION_OUTPUT.to_string(),
        }
    }
}

impl Layout {
    /// Root-relative path of a header named by an interface directive
    pub fn interface_path(&self, directive_path: &str) -> String {
        format!("{}{directive_path}", self.include_dir)
    }

    /// The single line that stands in for the whole interface artifact
    pub fn interface_reference(&self) -> String {
        format!("#include \"{}\"\n", self.interface_output)
    }
}
