use crate::error::{FuseError, Result};
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Reads the root-relative file `relative_path` as raw bytes.
///
/// Returns `Ok(None)` if the path doesn't exist or isn't a file.
///
/// # Errors
///
/// `FuseError::Io` if the file exists but can't be read.
pub fn read_source(root: &Path, relative_path: &str) -> Result<Option<Vec<u8>>> {
    let path = root.join(relative_path);
    if !path.is_file() {
        return Ok(None);
    }
    Ok(Some(fs::read(path)?))
}

/// Verifies that the given seed file exists under `root`
///
/// # Errors
///
/// `FuseError::MissingSeed` if it doesn't.
pub fn verify_seed(root: &Path, relative_path: &str) -> Result<()> {
    if root.join(relative_path).is_file() {
        Ok(())
    } else {
        Err(FuseError::MissingSeed {
            path: relative_path.to_string(),
            root: root.to_path_buf(),
        })
    }
}

/// Makes sure `output_dir/relative_path` can be written.
///
/// An existing file is only replaced if `force` is set or the user answers
/// `y`/`Y` on `input` when asked on `prompt`. The parent directory and all its
/// ancestors are created.
///
/// # Errors
///
/// - `FuseError::Aborted` if the user declines.
/// - `FuseError::Io` if asking or creating directories fails.
pub fn prepare_output<R, W>(
    output_dir: &Path,
    relative_path: &str,
    force: bool,
    input: &mut R,
    prompt: &mut W,
) -> Result<PathBuf>
where
    R: BufRead + ?Sized,
    W: Write + ?Sized,
{
    let output_file = output_dir.join(relative_path);

    if output_file.exists() && !force {
        write!(
            prompt,
            "{relative_path} already exists in directory {} - overwrite it? (y/N) ",
            output_dir.display()
        )?;
        prompt.flush()?;

        let mut answer = String::new();
        input.read_line(&mut answer)?;
        if !matches!(answer.trim(), "y" | "Y") {
            return Err(FuseError::Aborted { path: output_file });
        }
    }

    if let Some(parent) = output_file.parent()
        && !parent.is_dir()
    {
        fs::create_dir_all(parent)?;
    }

    Ok(output_file)
}

/// A finished artifact waiting in a temporary file next to its destination.
///
/// Dropping it without calling [`StagedFile::commit`] deletes the temporary
/// file and leaves the destination untouched.
#[derive(Debug)]
pub struct StagedFile {
    temp: NamedTempFile,
    destination: PathBuf,
}

impl StagedFile {
    /// Where the file lands on commit
    pub fn destination(&self) -> &Path {
        &self.destination
    }

    /// Moves the file into place, replacing whatever is there
    ///
    /// # Errors
    ///
    /// `FuseError::Persist` if the rename fails.
    pub fn commit(self) -> Result<PathBuf> {
        self.temp.persist(&self.destination)?;
        Ok(self.destination)
    }
}

/// Fills a temporary file in the directory of `path` without touching `path`.
///
/// The temporary file gets the mode of the file it will replace, or `0o666`
/// minus the umask when there is none, as a plain `File::create` would.
///
/// # Errors
///
/// Whatever `write` returns, or `FuseError::Io` if the temporary file can't
/// be created. The temporary file is deleted on error.
pub fn stage<T, F>(path: &Path, write: F) -> Result<(StagedFile, T)>
where
    F: FnOnce(&mut io::BufWriter<&mut NamedTempFile>) -> Result<T>,
{
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut temp = create_temp_in(dir, path)?;

    let value = {
        let mut writer = io::BufWriter::new(&mut temp);
        let value = write(&mut writer)?;
        writer.flush()?;
        value
    };

    Ok((
        StagedFile {
            temp,
            destination: path.to_path_buf(),
        },
        value,
    ))
}

fn create_temp_in(dir: &Path, destination: &Path) -> Result<NamedTempFile> {
    let mut builder = tempfile::Builder::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        // handed to open(2), so the umask applies
        builder.permissions(fs::Permissions::from_mode(0o666));
    }
    let temp = builder.tempfile_in(dir)?;

    if let Ok(existing) = fs::metadata(destination)
        && existing.is_file()
    {
        temp.as_file().set_permissions(existing.permissions())?;
    }
    Ok(temp)
}

/// Library root used when none is given: the parent of the directory
/// holding the executable
///
/// # Errors
///
/// `FuseError::Io` if the executable path can't be determined.
pub fn default_root() -> Result<PathBuf> {
    let exe = std::env::current_exe()?;
    let exe_dir = exe.parent().unwrap_or_else(|| Path::new("."));
    Ok(exe_dir.join(".."))
}
