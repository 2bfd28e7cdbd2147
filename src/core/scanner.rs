use std::collections::VecDeque;
use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::Arc;
use std::time::{Duration, Instant};

use smallvec::{smallvec, SmallVec};
use tokio::sync::Semaphore;
use tracing::{debug, info};

use crate::config::settings::Settings;
use crate::error::{DuError, Result};
use crate::models::result::{DuResult, FileCountResult, ImageCountResult, Mode, TaggedResult};

use super::events::{Event, EventSender};
use super::fs::{FileSystem, LocalFs, PathKind};
use super::image::is_image_file;

/// Results of one `calculate` call: one entry, or two for [`Mode::Both`].
pub type ScanResults = SmallVec<[TaggedResult; 2]>;

pub struct Scanner {
    shared: Arc<Shared>,
}

/// State handed to every scan task.
struct Shared {
    fs: Arc<dyn FileSystem>,
    semaphore: Semaphore,
    event_tx: EventSender,
}

impl Shared {
    fn entry_skipped(&self, path: &Path, err: &io::Error) {
        debug!(path = %path.display(), error = %err, "skipping unreadable entry");
        let _ = self.event_tx.send(Event::EntrySkipped {
            path: path.to_path_buf(),
            error: err.to_string(),
        });
    }
}

impl Scanner {
    pub fn new(settings: Settings, event_tx: EventSender) -> Self {
        Self::with_fs(settings, event_tx, Arc::new(LocalFs))
    }

    pub fn with_fs(settings: Settings, event_tx: EventSender, fs: Arc<dyn FileSystem>) -> Self {
        let max_io = settings.max_concurrent_io.max(1);
        Self {
            shared: Arc::new(Shared {
                fs,
                semaphore: Semaphore::new(max_io),
                event_tx,
            }),
        }
    }

    /// Fails with [`DuError::PathNotFound`] unless `path` is an existing file
    /// or directory.
    pub async fn check_path_exists(&self, path: &Path) -> Result<()> {
        let fs = Arc::clone(&self.shared.fs);
        let target = path.to_path_buf();
        let kind = tokio::task::spawn_blocking(move || fs.path_kind(&target)).await?;
        match kind {
            PathKind::File | PathKind::Directory => Ok(()),
            PathKind::NotFound => Err(DuError::PathNotFound(path.to_path_buf())),
        }
    }

    /// Runs the strategy (or strategies) selected by `mode` over `root`.
    ///
    /// For [`Mode::Both`] the parallel result comes first, then the
    /// sequential one. The two are never merged.
    pub async fn calculate(&self, mode: Mode, root: PathBuf) -> Result<ScanResults> {
        self.check_path_exists(&root).await?;
        let results = match mode {
            Mode::SingleThreaded => smallvec![self.run_sequential(root).await?],
            Mode::MultiThreaded => smallvec![self.run_parallel(root).await?],
            Mode::Both => {
                let [parallel, sequential] = self.run_both(root).await?;
                smallvec![parallel, sequential]
            }
        };
        Ok(results)
    }

    pub async fn sequential_scan(&self, root: PathBuf) -> Result<TaggedResult> {
        self.check_path_exists(&root).await?;
        self.run_sequential(root).await
    }

    pub async fn parallel_scan(&self, root: PathBuf) -> Result<TaggedResult> {
        self.check_path_exists(&root).await?;
        self.run_parallel(root).await
    }

    pub async fn both_scan(&self, root: PathBuf) -> Result<[TaggedResult; 2]> {
        self.check_path_exists(&root).await?;
        self.run_both(root).await
    }

    async fn run_both(&self, root: PathBuf) -> Result<[TaggedResult; 2]> {
        let parallel = self.run_parallel(root.clone()).await?;
        let sequential = self.run_sequential(root).await?;
        Ok([parallel, sequential])
    }

    async fn run_sequential(&self, root: PathBuf) -> Result<TaggedResult> {
        self.started(&root, Mode::SingleThreaded);
        let shared = Arc::clone(&self.shared);
        let result = tokio::task::spawn_blocking(move || walk_queue(&shared, root)).await?;
        Ok(self.completed(result, Mode::SingleThreaded))
    }

    async fn run_parallel(&self, root: PathBuf) -> Result<TaggedResult> {
        self.started(&root, Mode::MultiThreaded);
        let start = Instant::now();
        let counts = visit(root, Arc::clone(&self.shared)).await?;
        let result = counts.with_elapsed(start.elapsed().as_secs_f64());
        Ok(self.completed(result, Mode::MultiThreaded))
    }

    fn started(&self, root: &Path, mode: Mode) {
        info!(path = %root.display(), %mode, "scan started");
        let _ = self.shared.event_tx.send(Event::ScanStarted {
            path: root.to_path_buf(),
            mode,
        });
    }

    fn completed(&self, result: DuResult, mode: Mode) -> TaggedResult {
        info!(
            %mode,
            folders = result.file_counts.folders,
            files = result.file_counts.files,
            bytes = result.file_counts.bytes,
            elapsed = result.elapsed_seconds,
            "scan completed"
        );
        let _ = self.shared.event_tx.send(Event::ScanCompleted {
            mode,
            total_files: result.file_counts.files,
            total_size: result.file_counts.bytes,
            duration_ms: Duration::from_secs_f64(result.elapsed_seconds).as_millis() as u64,
        });
        TaggedResult::new(result, mode)
    }
}

/// Outcome of looking at one path: its kind plus the read that kind needs.
enum Probe {
    File(io::Result<u64>),
    Directory(io::Result<Vec<PathBuf>>),
    Missing,
}

fn probe(fs: &dyn FileSystem, path: &Path) -> Probe {
    match fs.path_kind(path) {
        PathKind::File => Probe::File(fs.file_size(path)),
        PathKind::Directory => Probe::Directory(fs.list_entries(path)),
        PathKind::NotFound => Probe::Missing,
    }
}

/// Breadth-first walk over an explicit FIFO queue. Unreadable files and
/// directories are dropped from the totals; paths that vanished are ignored.
fn walk_queue(shared: &Shared, root: PathBuf) -> DuResult {
    let mut folders: u64 = 0;
    let mut files: u64 = 0;
    let mut bytes: u64 = 0;
    let mut images: u64 = 0;
    let mut image_bytes: u64 = 0;

    let start = Instant::now();
    let mut queue = VecDeque::from([root]);

    while let Some(path) = queue.pop_front() {
        match probe(shared.fs.as_ref(), &path) {
            Probe::File(Ok(size)) => {
                files += 1;
                bytes += size;
                if is_image_file(&path) {
                    images += 1;
                    image_bytes += size;
                }
            }
            Probe::Directory(Ok(entries)) => {
                queue.extend(entries);
                folders += 1;
            }
            Probe::File(Err(e)) | Probe::Directory(Err(e)) => shared.entry_skipped(&path, &e),
            Probe::Missing => {}
        }
    }

    let elapsed = start.elapsed().as_secs_f64();
    DuResult::new(
        FileCountResult::new(folders, files, bytes),
        ImageCountResult::new(images, image_bytes),
    )
    .with_elapsed(elapsed)
}

/// Probe `path` on the blocking pool. The semaphore permit is held only for
/// the filesystem calls.
async fn probe_blocking(shared: &Arc<Shared>, path: PathBuf) -> Result<Probe> {
    let _permit = shared.semaphore.acquire().await?;
    let fs = Arc::clone(&shared.fs);
    Ok(tokio::task::spawn_blocking(move || probe(fs.as_ref(), &path)).await?)
}

/// Recursive fan-out: one task per directory entry, joined before combining.
///
/// Unreadable entries contribute the empty result. A path that is neither a
/// file nor a directory when visited fails the whole scan with
/// [`DuError::NotAValidPath`].
fn visit(path: PathBuf, shared: Arc<Shared>) -> Pin<Box<dyn Future<Output = Result<DuResult>> + Send>> {
    Box::pin(async move {
        match probe_blocking(&shared, path.clone()).await? {
            Probe::File(Ok(size)) => Ok(DuResult::file(size, is_image_file(&path))),
            Probe::File(Err(e)) | Probe::Directory(Err(e)) => {
                shared.entry_skipped(&path, &e);
                Ok(DuResult::empty())
            }
            Probe::Directory(Ok(entries)) if entries.is_empty() => Ok(DuResult::folder()),
            Probe::Directory(Ok(entries)) => {
                let handles: Vec<_> = entries
                    .into_iter()
                    .map(|child| tokio::spawn(visit(child, Arc::clone(&shared))))
                    .collect();

                // Join every child before looking at any of their results
                let mut children = Vec::with_capacity(handles.len());
                for handle in handles {
                    children.push(handle.await?);
                }

                let total = children.into_iter().sum::<Result<DuResult>>()?;
                Ok(total.plus_folder())
            }
            Probe::Missing => Err(DuError::NotAValidPath(path)),
        }
    })
}
