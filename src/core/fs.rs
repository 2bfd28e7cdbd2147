use std::io;
use std::path::{Path, PathBuf};

/// What a path currently points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathKind {
    File,
    Directory,
    NotFound,
}

/// The filesystem queries the scanner needs.
///
/// Implementations must be shareable across scan tasks.
pub trait FileSystem: Send + Sync + 'static {
    fn path_kind(&self, path: &Path) -> PathKind;

    fn file_size(&self, path: &Path) -> io::Result<u64>;

    /// Immediate children of a directory.
    fn list_entries(&self, path: &Path) -> io::Result<Vec<PathBuf>>;
}

/// [`FileSystem`] backed by `std::fs`. Symlinks are followed.
///
/// Anything that exists but is not a directory reports as [`PathKind::File`],
/// including dangling symlinks, sockets, FIFOs and device nodes. Only regular
/// files have a readable size; the rest fail in [`FileSystem::file_size`] and
/// are dropped from the totals like any other unreadable entry.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFs;

impl FileSystem for LocalFs {
    fn path_kind(&self, path: &Path) -> PathKind {
        match std::fs::metadata(path) {
            Ok(meta) if meta.is_dir() => PathKind::Directory,
            Ok(_) => PathKind::File,
            Err(_) => match std::fs::symlink_metadata(path) {
                Err(e) if e.kind() == io::ErrorKind::NotFound => PathKind::NotFound,
                _ => PathKind::File,
            },
        }
    }

    fn file_size(&self, path: &Path) -> io::Result<u64> {
        let meta = std::fs::metadata(path)?;
        if !meta.is_file() {
            // Never open these: opening a FIFO blocks until a writer shows up.
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("not a regular file: {}", path.display()),
            ));
        }
        // Opening the file surfaces permission errors that a bare stat would not.
        let file = std::fs::File::open(path)?;
        Ok(file.metadata()?.len())
    }

    fn list_entries(&self, path: &Path) -> io::Result<Vec<PathBuf>> {
        let mut entries = std::fs::read_dir(path)?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<io::Result<Vec<_>>>()?;
        entries.sort();
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_fs_kinds_and_listing() {
        let dir = std::env::temp_dir().join("dustat_fs_unit");
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(dir.join("sub")).unwrap();
        std::fs::write(dir.join("b.txt"), b"12345").unwrap();

        let fs = LocalFs;
        assert_eq!(fs.path_kind(&dir), PathKind::Directory);
        assert_eq!(fs.path_kind(&dir.join("b.txt")), PathKind::File);
        assert_eq!(fs.path_kind(&dir.join("missing")), PathKind::NotFound);
        assert_eq!(fs.file_size(&dir.join("b.txt")).unwrap(), 5);
        assert!(fs.file_size(&dir.join("missing")).is_err());
        assert_eq!(
            fs.list_entries(&dir).unwrap(),
            vec![dir.join("b.txt"), dir.join("sub")]
        );
        assert!(fs.list_entries(&dir.join("missing")).is_err());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[cfg(unix)]
    #[test]
    fn local_fs_special_entries_are_unreadable_files() {
        let dir = std::env::temp_dir().join("dustat_fs_unit_special");
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        let link = dir.join("dangling");
        std::os::unix::fs::symlink(dir.join("nowhere"), &link).unwrap();
        let sock = dir.join("sock");
        let _listener = std::os::unix::net::UnixListener::bind(&sock).unwrap();

        let fs = LocalFs;
        for path in [&link, &sock] {
            assert_eq!(fs.path_kind(path), PathKind::File, "{}", path.display());
            assert!(fs.file_size(path).is_err(), "{}", path.display());
        }
        assert_eq!(fs.path_kind(&dir.join("nowhere")), PathKind::NotFound);

        let _ = std::fs::remove_dir_all(&dir);
    }
}
