//! Path utilities for input discovery and output naming

use std::path::{Component, Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::domain::model::SUPPORTED_EXTENSIONS;
use crate::error::{VidWebpError, VidWebpResult};

/// Path helpers shared by the planner and the CLI
pub struct PathUtils;

impl PathUtils {
    /// Lowercase extension of `path`, if any
    pub fn extension(path: &Path) -> Option<String> {
        path.extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
    }

    /// Whether the input is a GIF, judged by extension
    pub fn is_gif(path: &Path) -> bool {
        Self::extension(path).as_deref() == Some("gif")
    }

    /// Whether the extension is one the converter offers
    pub fn is_supported(path: &Path) -> bool {
        Self::extension(path)
            .map(|ext| SUPPORTED_EXTENSIONS.contains(&ext.as_str()))
            .unwrap_or(false)
    }

    /// Lexically normalize a path: drop `.` components and fold `dir/..`.
    ///
    /// Leading `..` components of a relative path are kept; the filesystem is
    /// never consulted.
    pub fn normalize(path: &Path) -> PathBuf {
        let mut out: Vec<Component<'_>> = Vec::new();
        for component in path.components() {
            match component {
                Component::CurDir => {}
                Component::ParentDir => match out.last() {
                    Some(Component::Normal(_)) => {
                        out.pop();
                    }
                    Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                    _ => out.push(component),
                },
                other => out.push(other),
            }
        }
        if out.is_empty() {
            return PathBuf::from(".");
        }
        out.iter().collect()
    }

    /// Expand user-supplied paths into the ordered list of inputs.
    ///
    /// Files are kept verbatim and in order, duplicates included. Directories
    /// contribute their supported files sorted by path; `recursive` descends
    /// into subdirectories.
    pub fn collect_inputs(paths: &[PathBuf], recursive: bool) -> VidWebpResult<Vec<PathBuf>> {
        let mut inputs = Vec::new();
        for path in paths {
            if path.is_dir() {
                let found = Self::scan_directory(path, recursive)?;
                debug!("Found {} supported files in {}", found.len(), path.display());
                inputs.extend(found);
            } else {
                if !Self::is_supported(path) {
                    warn!("Unsupported input extension, trying anyway: {}", path.display());
                }
                inputs.push(path.clone());
            }
        }
        Ok(inputs)
    }

    fn scan_directory(dir: &Path, recursive: bool) -> VidWebpResult<Vec<PathBuf>> {
        let max_depth = if recursive { usize::MAX } else { 1 };
        let mut files = Vec::new();
        for entry in WalkDir::new(dir).min_depth(1).max_depth(max_depth) {
            let entry = entry.map_err(|e| VidWebpError::Orchestration {
                message: format!("failed to scan {}: {}", dir.display(), e),
            })?;
            if entry.file_type().is_file() && Self::is_supported(entry.path()) {
                files.push(entry.into_path());
            }
        }
        files.sort();
        Ok(files)
    }
}
