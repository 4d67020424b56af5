use crate::error::Result;
use crate::fs_utils::{prepare_output, stage, verify_seed};
use crate::fuse::{FuseReport, fuse_implementation, fuse_interface};
use crate::layout::Layout;
use serde::{Deserialize, Serialize};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

/// Options for a full amalgamation run
#[derive(Debug, Clone, Default)]
pub struct AmalgamateOptions {
    /// Overwrite existing artifacts without asking
    pub force: bool,
}

/// Reports of both passes, in the order they ran
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Amalgamation {
    pub interface: FuseReport,
    pub implementation: FuseReport,
}

/// Where a run wrote its artifacts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifacts {
    pub interface: PathBuf,
    pub implementation: PathBuf,
    pub reports: Amalgamation,
}

/// Fuses the library under `root` into two files under `output_dir`.
///
/// Both seeds are checked and both outputs confirmed before anything is
/// written. Both artifacts are fused into temporary files first and only
/// moved into place once both passes succeeded, so a failed run never
/// leaves a new header next to a stale source. Existing outputs are confirmed through `input`/`prompt` unless
/// `options.force` is set.
///
/// # Errors
///
/// - `FuseError::MissingSeed` if a seed file is absent.
/// - `FuseError::Aborted` if the user declines an overwrite.
/// - `FuseError::MissingInclude` if a directive names a missing file. Neither
///   artifact is replaced.
/// - `FuseError::Io` / `FuseError::Persist` on file system failures.
pub fn amalgamate<R, W>(
    root: &Path,
    output_dir: &Path,
    layout: &Layout,
    options: &AmalgamateOptions,
    input: &mut R,
    prompt: &mut W,
) -> Result<Artifacts>
where
    R: BufRead + ?Sized,
    W: Write + ?Sized,
{
    verify_seed(root, &layout.interface_seed)?;
    verify_seed(root, &layout.implementation_seed)?;

    let interface_path = prepare_output(
        output_dir,
        &layout.interface_output,
        options.force,
        input,
        prompt,
    )?;
    let implementation_path = prepare_output(
        output_dir,
        &layout.implementation_output,
        options.force,
        input,
        prompt,
    )?;

    let (staged_interface, interface) =
        stage(&interface_path, |out| fuse_interface(root, layout, out))?;
    let (staged_implementation, implementation) =
        stage(&implementation_path, |out| fuse_implementation(root, layout, out))?;

    // both passes succeeded: only now replace the previous pair
    staged_interface.commit()?;
    tracing::info!(
        path = %interface_path.display(),
        files = interface.inlined.len(),
        lines = interface.lines_written,
        "wrote interface artifact"
    );
    staged_implementation.commit()?;
    tracing::info!(
        path = %implementation_path.display(),
        files = implementation.inlined.len(),
        lines = implementation.lines_written,
        "wrote implementation artifact"
    );

    Ok(Artifacts {
        interface: interface_path,
        implementation: implementation_path,
        reports: Amalgamation {
            interface,
            implementation,
        },
    })
}

/// Runs both passes without writing anything and returns what they would
/// inline
///
/// # Errors
///
/// Same as [`amalgamate`], minus the output-related ones.
pub fn dry_run(root: &Path, layout: &Layout) -> Result<Amalgamation> {
    verify_seed(root, &layout.interface_seed)?;
    verify_seed(root, &layout.implementation_seed)?;

    let interface = fuse_interface(root, layout, &mut io::sink())?;
    let implementation = fuse_implementation(root, layout, &mut io::sink())?;
    Ok(Amalgamation {
        interface,
        implementation,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FuseError;
    use std::fs;
    use std::io::Cursor;
    use tempfile::TempDir;

    fn create_library() -> TempDir {
        let temp_dir = TempDir::new().unwrap();
        for (path, contents) in [
            (
                "include/unittest/unittest.h",
                "#pragma once\n#include \"unittest/internal/port.h\"\nvoid run();\n",
            ),
            ("include/unittest/internal/port.h", "#define PORT 1\n"),
            ("include/unittest/unittest-spi.h", "void spi();\n"),
            (
                "src/unittest-all.cc",
                "#include \"unittest/unittest.h\"\n#include \"unittest/unittest-spi.h\"\n#include \"src/unittest.cc\"\n",
            ),
            (
                "src/unittest.cc",
                "#include \"unittest/internal/port.h\"\nvoid run() {}\n",
            ),
        ] {
            let full = temp_dir.path().join(path);
            fs::create_dir_all(full.parent().unwrap()).unwrap();
            fs::write(full, contents).unwrap();
        }
        temp_dir
    }

    fn run(root: &Path, out: &Path, force: bool, answers: &str) -> Result<Artifacts> {
        amalgamate(
            root,
            out,
            &Layout::default(),
            &AmalgamateOptions { force },
            &mut Cursor::new(answers.to_string()),
            &mut Vec::<u8>::new(),
        )
    }

    #[test]
    fn test_amalgamate_writes_both_artifacts() {
        let lib = create_library();
        let out = TempDir::new().unwrap();
        let target = out.path().join("fused");

        let artifacts = run(lib.path(), &target, false, "").unwrap();

        assert_eq!(
            fs::read_to_string(&artifacts.interface).unwrap(),
            "#pragma once\n#define PORT 1\nvoid run();\n"
        );
        assert_eq!(
            fs::read_to_string(&artifacts.implementation).unwrap(),
            "#include \"unittest/unittest.h\"\nvoid spi();\nvoid run() {}\n"
        );
        assert_eq!(artifacts.interface, target.join("unittest/unittest.h"));
        assert_eq!(
            artifacts.implementation,
            target.join("unittest/unittest-all.cc")
        );
        assert!(artifacts.reports.implementation.interface_reference_emitted);
    }

    #[test]
    fn test_missing_seed_aborts_before_writing() {
        let lib = create_library();
        fs::remove_file(lib.path().join("src/unittest-all.cc")).unwrap();
        let out = TempDir::new().unwrap();

        let result = run(lib.path(), out.path(), false, "");
        assert!(matches!(
            result,
            Err(FuseError::MissingSeed { ref path, .. }) if path == "src/unittest-all.cc"
        ));
        assert!(!out.path().join("unittest").exists());
    }

    #[test]
    fn test_declined_overwrite_keeps_existing_output() {
        let lib = create_library();
        let out = TempDir::new().unwrap();
        fs::create_dir_all(out.path().join("unittest")).unwrap();
        fs::write(out.path().join("unittest/unittest.h"), "mine").unwrap();

        let result = run(lib.path(), out.path(), false, "n\n");
        assert!(matches!(result, Err(FuseError::Aborted { .. })));
        assert_eq!(
            fs::read_to_string(out.path().join("unittest/unittest.h")).unwrap(),
            "mine"
        );
        assert!(!out.path().join("unittest/unittest-all.cc").exists());
    }

    #[test]
    fn test_accepted_and_forced_overwrite() {
        let lib = create_library();
        let out = TempDir::new().unwrap();
        run(lib.path(), out.path(), false, "").unwrap();

        // both outputs exist now: one answer per file
        run(lib.path(), out.path(), false, "y\nY\n").unwrap();
        run(lib.path(), out.path(), true, "").unwrap();

        let result = run(lib.path(), out.path(), false, "y\nn\n");
        assert!(matches!(result, Err(FuseError::Aborted { .. })));
    }

    #[test]
    fn test_missing_include_leaves_no_artifact() {
        let lib = create_library();
        fs::write(
            lib.path().join("src/unittest.cc"),
            "#include \"src/gone.cc\"\n",
        )
        .unwrap();
        let out = TempDir::new().unwrap();

        let result = run(lib.path(), out.path(), false, "");
        assert!(matches!(result, Err(FuseError::MissingInclude { .. })));
        assert!(!out.path().join("unittest/unittest.h").exists());
        assert!(!out.path().join("unittest/unittest-all.cc").exists());
        assert_eq!(
            fs::read_dir(out.path().join("unittest")).unwrap().count(),
            0
        );
    }

    #[test]
    fn test_failed_rerun_keeps_previous_pair() {
        let lib = create_library();
        let out = TempDir::new().unwrap();
        let first = run(lib.path(), out.path(), true, "").unwrap();
        let header = fs::read_to_string(&first.interface).unwrap();
        let source = fs::read_to_string(&first.implementation).unwrap();

        fs::write(lib.path().join("include/unittest/unittest.h"), "V2\n").unwrap();
        fs::write(
            lib.path().join("src/unittest-all.cc"),
            "#include \"unittest/unittest.h\"\n#include \"src/gone.cc\"\n",
        )
        .unwrap();

        let result = run(lib.path(), out.path(), true, "");
        assert!(matches!(result, Err(FuseError::MissingInclude { .. })));
        assert_eq!(fs::read_to_string(&first.interface).unwrap(), header);
        assert_eq!(fs::read_to_string(&first.implementation).unwrap(), source);
        assert_eq!(
            fs::read_dir(out.path().join("unittest")).unwrap().count(),
            2
        );
    }

    #[test]
    fn test_dry_run_touches_nothing() {
        let lib = create_library();
        let reports = dry_run(lib.path(), &Layout::default()).unwrap();

        assert_eq!(
            reports.interface.inlined,
            vec![
                "include/unittest/unittest.h",
                "include/unittest/internal/port.h"
            ]
        );
        assert_eq!(
            reports.implementation.inlined,
            vec![
                "src/unittest-all.cc",
                "include/unittest/unittest-spi.h",
                "src/unittest.cc"
            ]
        );
        assert_eq!(reports.implementation.lines_written, 3);
    }
}
