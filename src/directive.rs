use crate::error::Result;
use crate::layout::Layout;
use regex::bytes::Regex;

/// What a single source line turned out to be
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive<'a> {
    /// `#include "<interface prefix>..."`, carrying the quoted path
    Interface(&'a str),
    /// `#include "<implementation prefix>..."`, carrying the quoted path
    Implementation(&'a str),
    /// Anything else, copied as-is
    Ordinary,
}

/// Recognizes the two kinds of include directives by their quoted-path prefix.
///
/// Only the start of the line is inspected: optional whitespace, `#`,
/// optional whitespace, `include`, optional whitespace and a double-quoted
/// path. Everything after the closing quote is ignored.
#[derive(Debug, Clone)]
pub struct DirectiveClassifier {
    interface: Regex,
    implementation: Regex,
}

impl DirectiveClassifier {
    /// Builds the classifier for the prefixes of `layout`
    ///
    /// # Errors
    ///
    /// Returns `FuseError::Regex` if a pattern fails to compile.
    pub fn new(layout: &Layout) -> Result<Self> {
        Ok(Self {
            interface: include_pattern(&layout.interface_prefix)?,
            implementation: include_pattern(&layout.implementation_prefix)?,
        })
    }

    /// Classifies one line. The interface pattern wins when both would match.
    pub fn classify<'a>(&self, line: &'a [u8]) -> Directive<'a> {
        if let Some(path) = captured_path(&self.interface, line) {
            Directive::Interface(path)
        } else if let Some(path) = captured_path(&self.implementation, line) {
            Directive::Implementation(path)
        } else {
            Directive::Ordinary
        }
    }
}

fn include_pattern(prefix: &str) -> Result<Regex> {
    let pattern = format!(r#"^\s*#\s*include\s*"({}.+)""#, regex::escape(prefix));
    Ok(Regex::new(&pattern)?)
}

fn captured_path<'a>(pattern: &Regex, line: &'a [u8]) -> Option<&'a str> {
    let captures = pattern.captures(line)?;
    std::str::from_utf8(captures.get(1)?.as_bytes()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> DirectiveClassifier {
        DirectiveClassifier::new(&Layout::default()).unwrap()
    }

    #[test]
    fn test_classify_interface() {
        let c = classifier();
        assert_eq!(
            c.classify(b"#include \"unittest/internal/port.h\"\n"),
            Directive::Interface("unittest/internal/port.h")
        );
        assert_eq!(
            c.classify(b"  #  include   \"unittest/a.h\"  // trailing\n"),
            Directive::Interface("unittest/a.h")
        );
        assert_eq!(
            c.classify(b"\t#include\"unittest/a.h\""),
            Directive::Interface("unittest/a.h")
        );
    }

    #[test]
    fn test_classify_implementation() {
        let c = classifier();
        assert_eq!(
            c.classify(b"#include \"src/unittest.cc\"\n"),
            Directive::Implementation("src/unittest.cc")
        );
    }

    #[test]
    fn test_classify_ordinary() {
        let c = classifier();
        let lines: [&[u8]; 8] = [
            b"int main() { return 0; }\n",
            b"#include <vector>\n",
            b"#include \"other/lib.h\"\n",
            b"// #include \"unittest/a.h\"\n",
            b"#include \"unittest/\"\n",
            b"#import \"unittest/a.h\"\n",
            b"",
            b"\n",
        ];
        for line in lines {
            assert_eq!(c.classify(line), Directive::Ordinary, "{line:?}");
        }
    }

    #[test]
    fn test_prefix_must_lead_the_path() {
        let c = classifier();
        assert_eq!(
            c.classify(b"#include \"include/unittest/a.h\"\n"),
            Directive::Ordinary
        );
        assert_eq!(
            c.classify(b"#include \"lib/src/a.cc\"\n"),
            Directive::Ordinary
        );
    }

    #[test]
    fn test_non_utf8_path_is_ordinary() {
        let c = classifier();
        assert_eq!(
            c.classify(b"#include \"src/\xff\xfe.cc\"\n"),
            Directive::Ordinary
        );
    }

    #[test]
    fn test_custom_prefixes_are_escaped() {
        let layout = Layout {
            interface_prefix: "lib.h/".to_string(),
            implementation_prefix: "impl+/".to_string(),
            ..Layout::default()
        };
        let c = DirectiveClassifier::new(&layout).unwrap();
        assert_eq!(
            c.classify(b"#include \"lib.h/x.h\""),
            Directive::Interface("lib.h/x.h")
        );
        assert_eq!(c.classify(b"#include \"libxh/x.h\""), Directive::Ordinary);
        assert_eq!(
            c.classify(b"#include \"impl+/x.c\""),
            Directive::Implementation("impl+/x.c")
        );
    }
}
