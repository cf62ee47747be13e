//! Copy and zip helpers shared by the backup units.

use crate::error::{Error, Result};
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::warn;
use walkdir::WalkDir;
use zip::ZipWriter;
use zip::write::{FileOptions, SimpleFileOptions};

/// Creates the backup directory if it does not exist yet.
pub fn ensure_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))
}

/// Copy `src` into `dir`, keeping its file name. An existing copy is replaced.
pub fn copy_into(src: &Path, dir: &Path) -> Result<PathBuf> {
    let file_name = src
        .file_name()
        .ok_or_else(|| Error::io(src, io::Error::other("Invalid file name")))?;
    let dest = dir.join(file_name);
    fs::copy(src, &dest).map_err(|e| Error::io(src, e))?;
    Ok(dest)
}

/// Zip the given files flat into `dest`, each stored under its own file name.
///
/// Unreadable files are logged and left out. On any other failure `dest` is
/// removed so no partial archive stays behind.
pub fn zip_files(files: &[PathBuf], dest: &Path) -> Result<()> {
    write_zip(dest, |zip, options| {
        for path in files {
            let Some(name) = path.file_name() else {
                continue;
            };
            add_file(zip, path, name.to_string_lossy().into_owned(), options)?;
        }
        Ok(())
    })
}

/// Zip the directory `src` into `dest`; entries are stored under `src`'s own name.
///
/// Unreadable entries below `src` are logged and left out, like in [`zip_files`].
pub fn zip_dir(src: &Path, dest: &Path) -> Result<()> {
    let prefix = src.parent().unwrap_or_else(|| Path::new(""));

    write_zip(dest, |zip, options| {
        for entry in WalkDir::new(src).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) if e.depth() == 0 => return Err(e.into()),
                Err(e) => {
                    warn!("Skipping unreadable entry in {}: {e}", src.display());
                    continue;
                }
            };
            let path = entry.path();
            let Ok(rel) = path.strip_prefix(prefix) else {
                continue;
            };
            let name = rel.to_string_lossy().replace('\\', "/");
            if entry.file_type().is_dir() {
                zip.add_directory(name, options)?;
            } else if entry.file_type().is_file() {
                add_file(zip, path, name, options)?;
            }
        }
        Ok(())
    })
}

fn write_zip<F>(dest: &Path, fill: F) -> Result<()>
where
    F: FnOnce(&mut ZipWriter<File>, SimpleFileOptions) -> Result<()>,
{
    let file = File::create(dest).map_err(|e| Error::io(dest, e))?;
    let mut zip = ZipWriter::new(file);

    let written = match fill(&mut zip, FileOptions::<()>::default()) {
        Ok(()) => zip.finish().map(drop).map_err(Error::from),
        Err(e) => {
            drop(zip);
            Err(e)
        }
    };
    if written.is_err()
        && let Err(e) = fs::remove_file(dest)
    {
        warn!("Cannot remove partial archive {}: {e}", dest.display());
    }
    written
}

/// Adds `path` as `name`; an unreadable file is logged and skipped before its
/// entry is started.
fn add_file(
    zip: &mut ZipWriter<File>,
    path: &Path,
    name: String,
    options: SimpleFileOptions,
) -> Result<()> {
    let data = match fs::read(path) {
        Ok(data) => data,
        Err(e) => {
            warn!("Skipping unreadable {}: {e}", path.display());
            return Ok(());
        }
    };
    zip.start_file(name, options)?;
    zip.write_all(&data).map_err(|e| Error::io(path, e))
}

/// `dir/stem.ext`, or `dir/stem_N.ext` with the first free `N` if taken.
pub fn unique_path(dir: &Path, stem: &str, ext: &str) -> PathBuf {
    let candidate = dir.join(format!("{stem}.{ext}"));
    if !candidate.exists() {
        return candidate;
    }
    (1u32..)
        .map(|n| dir.join(format!("{stem}_{n}.{ext}")))
        .find(|p| !p.exists())
        .unwrap_or(candidate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use tempfile::TempDir;
    use zip::ZipArchive;

    fn entry_names(archive: &Path) -> Vec<String> {
        let mut zip = ZipArchive::new(File::open(archive).unwrap()).unwrap();
        (0..zip.len())
            .map(|i| zip.by_index(i).unwrap().name().to_string())
            .collect()
    }

    #[test]
    fn test_zip_dir_keeps_dir_name() -> Result<()> {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("kitty");
        fs::create_dir_all(src.join("themes")).unwrap();
        fs::write(src.join("kitty.conf"), "font_size 13").unwrap();
        fs::write(src.join("themes/dark.conf"), "bg #000").unwrap();

        let dest = temp.path().join("out.zip");
        zip_dir(&src, &dest)?;

        let names = entry_names(&dest);
        assert!(names.contains(&"kitty/kitty.conf".to_string()));
        assert!(names.contains(&"kitty/themes/dark.conf".to_string()));

        let mut zip = ZipArchive::new(File::open(&dest).unwrap()).unwrap();
        let mut content = String::new();
        zip.by_name("kitty/kitty.conf")
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        assert_eq!(content, "font_size 13");
        Ok(())
    }

    #[test]
    fn test_zip_files_flat() -> Result<()> {
        let temp = TempDir::new().unwrap();
        let a = temp.path().join(".zshrc");
        let b = temp.path().join(".vimrc");
        fs::write(&a, "export A=1").unwrap();
        fs::write(&b, "set nu").unwrap();

        let dest = temp.path().join("dot.zip");
        zip_files(&[a, b], &dest)?;
        assert_eq!(entry_names(&dest), vec![".zshrc", ".vimrc"]);
        Ok(())
    }

    #[test]
    fn test_copy_into_overwrites() -> Result<()> {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join(".gitconfig");
        let dir = temp.path().join("backup");
        ensure_dir(&dir)?;

        fs::write(&src, "v1").unwrap();
        copy_into(&src, &dir)?;
        fs::write(&src, "v2").unwrap();
        let dest = copy_into(&src, &dir)?;
        assert_eq!(fs::read_to_string(dest).unwrap(), "v2");
        Ok(())
    }

    #[test]
    fn test_unique_path() {
        let temp = TempDir::new().unwrap();
        let first = unique_path(temp.path(), "dotfiles_backup_x", "zip");
        assert_eq!(first, temp.path().join("dotfiles_backup_x.zip"));
        fs::write(&first, "").unwrap();
        let second = unique_path(temp.path(), "dotfiles_backup_x", "zip");
        assert_eq!(second, temp.path().join("dotfiles_backup_x_1.zip"));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_zip_files_skips_unreadable() -> Result<()> {
        let temp = TempDir::new().unwrap();
        let good = temp.path().join(".zshrc");
        let bad = temp.path().join(".broken");
        fs::write(&good, "export A=1").unwrap();
        std::os::unix::fs::symlink("/proc/self/mem", &bad).unwrap();

        let dest = temp.path().join("dot.zip");
        zip_files(&[bad, good], &dest)?;
        assert_eq!(entry_names(&dest), vec![".zshrc"]);
        Ok(())
    }

    #[test]
    fn test_failed_zip_leaves_nothing_behind() {
        let temp = TempDir::new().unwrap();
        let a = temp.path().join("a/.zshrc");
        let b = temp.path().join("b/.zshrc");
        fs::create_dir_all(a.parent().unwrap()).unwrap();
        fs::create_dir_all(b.parent().unwrap()).unwrap();
        fs::write(&a, "one").unwrap();
        fs::write(&b, "two").unwrap();

        let dest = temp.path().join("dot.zip");
        assert!(zip_files(&[a, b], &dest).is_err());
        assert!(!dest.exists());
    }

    #[test]
    fn test_zip_dir_missing_source_fails_cleanly() {
        let temp = TempDir::new().unwrap();
        let dest = temp.path().join("out.zip");
        assert!(zip_dir(&temp.path().join("missing"), &dest).is_err());
        assert!(!dest.exists());
    }
}
