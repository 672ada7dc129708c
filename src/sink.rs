//! Destinations for generated documents.

use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use tracing::{debug, info};

use crate::error::SinkError;

/// Directories never searched for existing documents.
const SKIPPED_DIRS: &[&str] = &["node_modules", ".git", "bin", "obj"];

/// A generated file, addressed by project-relative folders plus a name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedDocument {
    pub name: String,
    pub folders: Vec<String>,
    pub text: String,
}

impl GeneratedDocument {
    /// `folder` is `/`-separated, e.g. `Scripts/typings/hubs`.
    pub fn new(name: impl Into<String>, folder: &str, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            folders: folder_segments(folder),
            text: text.into(),
        }
    }

    /// Project-relative path with `/` separators.
    pub fn path(&self) -> String {
        let mut path = self.folders.join("/");
        if !path.is_empty() {
            path.push('/');
        }
        path.push_str(&self.name);
        path
    }
}

pub fn folder_segments(folder: &str) -> Vec<String> {
    folder
        .split(['/', '\\'])
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Path from a document in `from` to the file `name` in `to`, for
/// `/// <reference path="..." />`.
pub fn relative_path(from: &[String], to: &[String], name: &str) -> String {
    let common = from.iter().zip(to).take_while(|(a, b)| a == b).count();
    let mut parts: Vec<&str> = vec![".."; from.len() - common];
    parts.extend(to[common..].iter().map(String::as_str));
    parts.push(name);
    parts.join("/")
}

/// Where a generation run puts its documents.
pub trait OutputSink {
    /// An existing document with this file name, in any folder.
    fn find(&self, name: &str) -> Result<Option<GeneratedDocument>, SinkError>;

    /// Add a document, replacing one at the same path.
    fn add_document(&mut self, document: GeneratedDocument) -> Result<(), SinkError>;
}

/// An in-memory project, for hosts that persist documents themselves.
#[derive(Debug, Clone, Default)]
pub struct MemoryProject {
    documents: IndexMap<String, GeneratedDocument>,
}

impl MemoryProject {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn documents(&self) -> impl Iterator<Item = &GeneratedDocument> {
        self.documents.values()
    }

    pub fn get(&self, path: &str) -> Option<&GeneratedDocument> {
        self.documents.get(path)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

impl OutputSink for MemoryProject {
    fn find(&self, name: &str) -> Result<Option<GeneratedDocument>, SinkError> {
        Ok(self.documents.values().find(|d| d.name == name).cloned())
    }

    fn add_document(&mut self, document: GeneratedDocument) -> Result<(), SinkError> {
        debug!(path = %document.path(), "adding document");
        self.documents.insert(document.path(), document);
        Ok(())
    }
}

/// Writes documents below a project directory.
///
/// Each document goes to a temporary sibling first and is renamed into
/// place, so a failed write never leaves a truncated file behind.
#[derive(Debug, Clone)]
pub struct DirectoryProject {
    root: PathBuf,
}

impl DirectoryProject {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute location of a document.
    pub fn location(&self, document: &GeneratedDocument) -> Result<PathBuf, SinkError> {
        let mut path = self.root.clone();
        for segment in document.folders.iter().chain(std::iter::once(&document.name)) {
            validate_segment(segment)?;
            path.push(segment);
        }
        Ok(path)
    }

    fn search(&self, dir: &Path, name: &str) -> Result<Option<PathBuf>, SinkError> {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(io_error(dir, source)),
        };
        let mut paths: Vec<PathBuf> = entries
            .map(|entry| entry.map(|e| e.path()))
            .collect::<Result<_, _>>()
            .map_err(|source| io_error(dir, source))?;
        paths.sort();

        let mut subdirs = Vec::new();
        for path in paths {
            let file_name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
            if path.is_dir() {
                if !SKIPPED_DIRS.contains(&file_name) {
                    subdirs.push(path);
                }
            } else if file_name == name {
                return Ok(Some(path));
            }
        }
        for subdir in subdirs {
            if let Some(found) = self.search(&subdir, name)? {
                return Ok(Some(found));
            }
        }
        Ok(None)
    }
}

impl OutputSink for DirectoryProject {
    fn find(&self, name: &str) -> Result<Option<GeneratedDocument>, SinkError> {
        let Some(path) = self.search(&self.root, name)? else {
            return Ok(None);
        };
        debug!(path = %path.display(), "found existing document");
        let text = fs::read_to_string(&path).map_err(|source| io_error(&path, source))?;
        let folders = path
            .parent()
            .and_then(|parent| parent.strip_prefix(&self.root).ok())
            .map(|relative| {
                relative
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy().into_owned())
                    .collect()
            })
            .unwrap_or_default();
        Ok(Some(GeneratedDocument {
            name: name.to_string(),
            folders,
            text,
        }))
    }

    fn add_document(&mut self, document: GeneratedDocument) -> Result<(), SinkError> {
        let path = self.location(&document)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| io_error(parent, source))?;
        }

        let tmp = path.with_file_name(format!(".{}.tmp", document.name));
        fs::write(&tmp, &document.text).map_err(|source| io_error(&tmp, source))?;
        if let Err(source) = fs::rename(&tmp, &path) {
            let _ = fs::remove_file(&tmp);
            return Err(io_error(&path, source));
        }

        info!(path = %path.display(), "wrote document");
        Ok(())
    }
}

fn validate_segment(segment: &str) -> Result<(), SinkError> {
    if segment.is_empty()
        || segment == "."
        || segment == ".."
        || segment.contains(['/', '\\', ':'])
    {
        return Err(SinkError::InvalidPath(segment.to_string()));
    }
    Ok(())
}

fn io_error(path: &Path, source: std::io::Error) -> SinkError {
    SinkError::Io {
        path: path.display().to_string(),
        source,
    }
}
