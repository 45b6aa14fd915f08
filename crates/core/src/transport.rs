//! File-based transport of a [`PropertyStore`] from the parent to a worker
//!
//! The parent persists the store into a scoped directory and passes only the
//! resulting path to the worker. Each launch gets its own file, named after
//! the parent's process id and a per-launch sequence number.

use std::ffi::OsStr;
use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::properties::PropertyStore;

const DEFAULT_PREFIX: &str = "forkboot";
const EXTENSION: &str = "properties";
/// How many sequence numbers to try before giving up on a crowded directory.
const MAX_NAME_ATTEMPTS: u32 = 64;

/// Where a persisted store lives. Passed to the worker as one argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportHandle {
    path: PathBuf,
    launch_id: u64,
}

impl TransportHandle {
    /// Handle for a file persisted elsewhere, e.g. by another process.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            launch_id: 0,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn launch_id(&self) -> u64 {
        self.launch_id
    }

    pub fn as_arg(&self) -> &OsStr {
        self.path.as_os_str()
    }

    pub fn into_path(self) -> PathBuf {
        self.path
    }
}

impl fmt::Display for TransportHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

#[derive(Debug)]
pub struct ForkTransport {
    directory: PathBuf,
    prefix: String,
    sequence: AtomicU64,
}

impl ForkTransport {
    /// Use `directory` for transport files, creating it when needed.
    pub fn new(directory: impl Into<PathBuf>) -> Result<Self> {
        Self::with_prefix(directory, DEFAULT_PREFIX)
    }

    pub fn with_prefix(directory: impl Into<PathBuf>, prefix: impl Into<String>) -> Result<Self> {
        let directory = directory.into();
        fs::create_dir_all(&directory).map_err(|e| Error::transport(&directory, e))?;
        Ok(Self {
            directory,
            prefix: prefix.into(),
            sequence: AtomicU64::new(0),
        })
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    fn next_launch_id(&self) -> u64 {
        self.sequence.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn file_name(&self, launch_id: u64) -> String {
        format!(
            "{}-{}-{}.{}",
            self.prefix,
            std::process::id(),
            launch_id,
            EXTENSION
        )
    }

    /// Write `store` to a new, uniquely named file.
    ///
    /// Files are created exclusively, so concurrent launches never write to
    /// the same file even if a stale file with the same name exists.
    pub fn persist(&self, store: &PropertyStore) -> Result<TransportHandle> {
        for _ in 0..MAX_NAME_ATTEMPTS {
            let launch_id = self.next_launch_id();
            let path = self.directory.join(self.file_name(launch_id));

            let file = match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(file) => file,
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                    debug!("Transport file {:?} already exists, trying next id", path);
                    continue;
                }
                Err(e) => return Err(Error::transport(&path, e)),
            };

            if let Err(e) = write_store(file, store) {
                // Never leave a half-written file behind for a worker to read.
                let _ = fs::remove_file(&path);
                return Err(Error::transport(&path, e));
            }

            info!("Persisted {} keys to {:?}", store.len(), path);
            return Ok(TransportHandle { path, launch_id });
        }

        Err(Error::transport(
            &self.directory,
            io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("no free transport file name after {MAX_NAME_ATTEMPTS} attempts"),
            ),
        ))
    }

    /// Read a store persisted by [`persist`](Self::persist).
    pub fn load(path: impl AsRef<Path>) -> Result<PropertyStore> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| Error::transport(path, e))?;
        let store = PropertyStore::load(BufReader::new(file)).map_err(|e| match e {
            Error::Io(source) => Error::transport(path, source),
            other => other,
        })?;
        debug!("Loaded {} keys from {:?}", store.len(), path);
        Ok(store)
    }

    /// Remove a transport file. A file that is already gone is not an error.
    pub fn cleanup(&self, handle: &TransportHandle) -> Result<()> {
        remove_transport_file(handle.path())
    }
}

/// Idempotent removal of a transport file.
pub fn remove_transport_file(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => {
            debug!("Removed transport file {:?}", path);
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!("Transport file {:?} already removed", path);
            Ok(())
        }
        Err(e) => Err(Error::transport(path, e)),
    }
}

fn write_store(file: File, store: &PropertyStore) -> io::Result<()> {
    let mut writer = BufWriter::new(file);
    writer.write_all(store.render().as_bytes())?;
    writer.flush()?;
    writer.get_ref().sync_all()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use tempfile::TempDir;

    fn sample_store() -> PropertyStore {
        let mut store = PropertyStore::new();
        store.set_string("startup.providerClassName", "com.provider").unwrap();
        store.set_string_list("cp", &["CP1", "CP2"]).unwrap();
        store
    }

    #[test]
    fn test_persist_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let transport = ForkTransport::new(temp_dir.path().join("forks")).unwrap();

        let handle = transport.persist(&sample_store()).unwrap();
        assert!(handle.path().starts_with(temp_dir.path().join("forks")));
        assert_eq!(handle.launch_id(), 1);

        let loaded = ForkTransport::load(handle.path()).unwrap();
        assert_eq!(loaded, sample_store());
    }

    #[test]
    fn test_each_persist_gets_a_new_file() {
        let temp_dir = TempDir::new().unwrap();
        let transport = ForkTransport::new(temp_dir.path()).unwrap();

        let first = transport.persist(&sample_store()).unwrap();
        let second = transport.persist(&sample_store()).unwrap();
        assert_ne!(first.path(), second.path());
        assert!(second.launch_id() > first.launch_id());
    }

    #[test]
    fn test_skips_names_already_taken() {
        let temp_dir = TempDir::new().unwrap();
        let transport = ForkTransport::new(temp_dir.path()).unwrap();

        let stale = temp_dir.path().join(transport.file_name(1));
        fs::write(&stale, "stale=1\n").unwrap();

        let handle = transport.persist(&sample_store()).unwrap();
        assert_eq!(handle.launch_id(), 2);
        assert_eq!(fs::read_to_string(&stale).unwrap(), "stale=1\n");
    }

    #[test]
    fn test_concurrent_persists_do_not_collide() {
        let temp_dir = TempDir::new().unwrap();
        let transport = ForkTransport::new(temp_dir.path()).unwrap();

        let paths: Vec<PathBuf> = std::thread::scope(|scope| {
            let workers: Vec<_> = (0..8)
                .map(|_| scope.spawn(|| transport.persist(&sample_store()).unwrap().into_path()))
                .collect();
            workers.into_iter().map(|w| w.join().unwrap()).collect()
        });

        let unique: HashSet<&PathBuf> = paths.iter().collect();
        assert_eq!(unique.len(), 8);
        for path in &paths {
            assert_eq!(ForkTransport::load(path).unwrap(), sample_store());
        }
    }

    #[test]
    fn test_cleanup_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let transport = ForkTransport::new(temp_dir.path()).unwrap();
        let handle = transport.persist(&sample_store()).unwrap();

        transport.cleanup(&handle).unwrap();
        assert!(!handle.path().exists());
        transport.cleanup(&handle).unwrap();

        let external = transport.persist(&sample_store()).unwrap();
        fs::remove_file(external.path()).unwrap();
        transport.cleanup(&external).unwrap();
    }

    #[test]
    fn test_load_missing_file_is_transport_error() {
        let temp_dir = TempDir::new().unwrap();
        let err = ForkTransport::load(temp_dir.path().join("nope.properties")).unwrap_err();
        assert!(matches!(err, Error::Transport { .. }));
        assert_eq!(err.exit_code(), crate::error::EXIT_TRANSPORT);
    }

    #[test]
    fn test_unreadable_path_is_transport_error() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("not-a-file.properties");
        fs::create_dir(&dir).unwrap();

        let err = ForkTransport::load(&dir).unwrap_err();
        assert!(matches!(err, Error::Transport { ref path, .. } if *path == dir));
    }

    #[test]
    fn test_load_corrupt_file_is_format_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("corrupt.properties");
        fs::write(&path, "ok=1\nthis line is broken\n").unwrap();

        assert!(matches!(
            ForkTransport::load(&path),
            Err(Error::Format { line: 2, .. })
        ));

        fs::write(&path, [0xff, 0xfe, b'=', b'1']).unwrap();
        assert!(matches!(ForkTransport::load(&path), Err(Error::Format { .. })));
    }
}
