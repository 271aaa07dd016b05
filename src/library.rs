//! Photo-library collaborator.
//!
//! The library accepts one finished bitmap per call and reports success or
//! failure asynchronously. Failures are opaque: the caller only learns that
//! the write did not happen (permissions, disk, ...).

use image::{ImageFormat, RgbImage};
use std::future::Future;
use std::path::{Path, PathBuf};

/// A sink for exported compositions.
pub trait PhotoLibrary {
    /// Persist `bitmap`; resolves to `true` on success.
    fn save(&self, bitmap: RgbImage) -> impl Future<Output = bool> + Send;
}

/// A photo library backed by a directory of numbered PNG files
/// (`shotframe-0001.png`, `shotframe-0002.png`, ...).
///
/// The directory is created on first save. Names are claimed with
/// `create_new`, so concurrent saves never overwrite each other.
#[derive(Debug, Clone)]
pub struct DirectoryLibrary {
    dir: PathBuf,
}

const FILE_PREFIX: &str = "shotframe-";

impl DirectoryLibrary {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Exported files currently in the library, sorted by name.
    pub fn entries(&self) -> std::io::Result<Vec<PathBuf>> {
        let mut files: Vec<PathBuf> = std::fs::read_dir(&self.dir)?
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| {
                p.file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.starts_with(FILE_PREFIX) && n.ends_with(".png"))
            })
            .collect();
        files.sort();
        Ok(files)
    }
}

/// Claim the next free `shotframe-NNNN.png` in `dir`.
fn claim_next_file(dir: &Path) -> std::io::Result<(std::fs::File, PathBuf)> {
    std::fs::create_dir_all(dir)?;
    let mut n = 1u32;
    loop {
        let path = dir.join(format!("{FILE_PREFIX}{n:04}.png"));
        match std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
        {
            Ok(file) => return Ok((file, path)),
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => n += 1,
            Err(e) => return Err(e),
        }
    }
}

fn write_png(dir: &Path, bitmap: &RgbImage) -> Result<PathBuf, String> {
    let (file, path) = claim_next_file(dir).map_err(|e| e.to_string())?;
    let mut writer = std::io::BufWriter::new(file);
    let result = bitmap
        .write_to(&mut writer, ImageFormat::Png)
        .map_err(|e| e.to_string());
    if result.is_err() {
        let _ = std::fs::remove_file(&path);
    }
    result.map(|()| path)
}

impl PhotoLibrary for DirectoryLibrary {
    fn save(&self, bitmap: RgbImage) -> impl Future<Output = bool> + Send {
        let dir = self.dir.clone();
        async move {
            let written = tokio::task::spawn_blocking(move || write_png(&dir, &bitmap)).await;
            match written {
                Ok(Ok(path)) => {
                    log::info!("saved {}", path.display());
                    true
                }
                Ok(Err(e)) => {
                    log::warn!("photo library write failed: {e}");
                    false
                }
                Err(e) => {
                    log::warn!("photo library writer panicked: {e}");
                    false
                }
            }
        }
    }
}
