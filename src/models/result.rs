use std::fmt;
use std::iter::Sum;
use std::ops::Add;

use serde::{Deserialize, Serialize};

/// Cumulative folder, file and byte counts over a subtree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileCountResult {
    pub folders: u64,
    pub files: u64,
    pub bytes: u64,
}

impl FileCountResult {
    pub fn new(folders: u64, files: u64, bytes: u64) -> Self {
        Self { folders, files, bytes }
    }

    pub fn combine(self, other: Self) -> Self {
        Self {
            folders: self.folders + other.folders,
            files: self.files + other.files,
            bytes: self.bytes + other.bytes,
        }
    }
}

/// Image subset of a subtree's files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageCountResult {
    pub images: u64,
    pub bytes: u64,
}

impl ImageCountResult {
    pub fn new(images: u64, bytes: u64) -> Self {
        Self { images, bytes }
    }

    pub fn combine(self, other: Self) -> Self {
        Self {
            images: self.images + other.images,
            bytes: self.bytes + other.bytes,
        }
    }
}

/// Counts for one scan plus the wall-clock time it took.
///
/// `combine` sums `elapsed_seconds` along with the counts. The engine only
/// combines untimed partial results and stamps the final value with
/// [`DuResult::with_elapsed`], so the reported time is never a sum of
/// subtree timings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DuResult {
    pub elapsed_seconds: f64,
    pub file_counts: FileCountResult,
    pub image_counts: ImageCountResult,
}

impl DuResult {
    /// The identity for [`DuResult::combine`].
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn new(file_counts: FileCountResult, image_counts: ImageCountResult) -> Self {
        Self {
            elapsed_seconds: 0.0,
            file_counts,
            image_counts,
        }
    }

    /// A single readable file of `size` bytes.
    pub fn file(size: u64, is_image: bool) -> Self {
        let image_counts = if is_image {
            ImageCountResult::new(1, size)
        } else {
            ImageCountResult::default()
        };
        Self::new(FileCountResult::new(0, 1, size), image_counts)
    }

    /// An empty, readable directory.
    pub fn folder() -> Self {
        Self::new(FileCountResult::new(1, 0, 0), ImageCountResult::default())
    }

    pub fn combine(self, other: Self) -> Self {
        Self {
            elapsed_seconds: self.elapsed_seconds + other.elapsed_seconds,
            file_counts: self.file_counts.combine(other.file_counts),
            image_counts: self.image_counts.combine(other.image_counts),
        }
    }

    /// Copy of `self` with one more folder counted.
    pub fn plus_folder(self) -> Self {
        Self {
            file_counts: FileCountResult {
                folders: self.file_counts.folders + 1,
                ..self.file_counts
            },
            ..self
        }
    }

    /// Copy of `self` with the elapsed time replaced.
    pub fn with_elapsed(self, elapsed_seconds: f64) -> Self {
        Self {
            elapsed_seconds,
            ..self
        }
    }
}

impl Add for DuResult {
    type Output = DuResult;

    fn add(self, rhs: Self) -> Self::Output {
        self.combine(rhs)
    }
}

impl Sum for DuResult {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(DuResult::empty(), DuResult::combine)
    }
}

/// Which traversal strategy to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mode {
    SingleThreaded,
    MultiThreaded,
    Both,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Mode::SingleThreaded => "single-threaded",
            Mode::MultiThreaded => "multi-threaded",
            Mode::Both => "both",
        };
        f.write_str(label)
    }
}

/// A result labelled with the strategy that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TaggedResult {
    pub result: DuResult,
    pub mode: Mode,
}

impl TaggedResult {
    pub fn new(result: DuResult, mode: Mode) -> Self {
        Self { result, mode }
    }
}
