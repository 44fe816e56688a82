//! Import resolution for Solidity files

use std::collections::HashMap;
use std::fs;
use std::path::{Component, Path, PathBuf};

use log::debug;

use crate::error::{DocError, Result};

/// Source text of an imported file and the path identifying it.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedImport {
    pub source: String,
    pub path: String,
}

/// Turns an import path, as written in `from_file`, into the imported source.
pub trait ImportResolver {
    fn resolve(&self, import_path: &str, from_file: Option<&str>) -> Result<ResolvedImport>;

    /// The form of `path` this resolver reports in [`ResolvedImport::path`],
    /// used to recognise a file however it was reached.
    fn canonical_path(&self, path: &str) -> String {
        normalize(path)
    }
}

impl<F> ImportResolver for F
where
    F: Fn(&str, Option<&str>) -> Result<ResolvedImport>,
{
    fn resolve(&self, import_path: &str, from_file: Option<&str>) -> Result<ResolvedImport> {
        self(import_path, from_file)
    }
}

fn is_relative(import_path: &str) -> bool {
    import_path.starts_with("./") || import_path.starts_with("../")
}

fn not_found(import_path: &str, from_file: Option<&str>) -> DocError {
    DocError::ImportNotFound {
        import: import_path.to_string(),
        from: from_file.unwrap_or("<root>").to_string(),
    }
}

/// Resolves imports on disk.
///
/// Relative imports (`./`, `../`) are looked up next to the importing file.
/// Other imports are tried against each include path, then the base directory,
/// then the importing file's directory. The returned path is canonical so the
/// same file reached through different import strings is recognised.
#[derive(Debug, Clone)]
pub struct FsImportResolver {
    base_dir: PathBuf,
    include_paths: Vec<PathBuf>,
}

impl Default for FsImportResolver {
    fn default() -> Self {
        Self::new(".")
    }
}

impl FsImportResolver {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            include_paths: Vec::new(),
        }
    }

    pub fn with_include_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.include_paths.push(path.into());
        self
    }

    fn candidates(&self, import_path: &str, from_file: Option<&str>) -> Vec<PathBuf> {
        let from_dir = from_file
            .and_then(|file| Path::new(file).parent())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.base_dir.clone());

        if is_relative(import_path) {
            return vec![from_dir.join(import_path)];
        }

        let mut candidates: Vec<PathBuf> = self
            .include_paths
            .iter()
            .map(|root| root.join(import_path))
            .collect();
        candidates.push(self.base_dir.join(import_path));
        candidates.push(from_dir.join(import_path));
        candidates
    }
}

impl ImportResolver for FsImportResolver {
    fn canonical_path(&self, path: &str) -> String {
        fs::canonicalize(path)
            .map(|canonical| canonical.display().to_string())
            .unwrap_or_else(|_| normalize(path))
    }

    fn resolve(&self, import_path: &str, from_file: Option<&str>) -> Result<ResolvedImport> {
        let path = self
            .candidates(import_path, from_file)
            .into_iter()
            .find(|candidate| candidate.is_file())
            .ok_or_else(|| not_found(import_path, from_file))?;

        let source = fs::read_to_string(&path).map_err(|source| DocError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let canonical = fs::canonicalize(&path).unwrap_or(path);

        debug!("Resolved import {} to {}", import_path, canonical.display());
        Ok(ResolvedImport {
            source,
            path: canonical.display().to_string(),
        })
    }
}

/// Resolves imports from sources held in memory, keyed by normalized path.
#[derive(Debug, Clone, Default)]
pub struct MemoryImportResolver {
    sources: HashMap<String, String>,
}

impl MemoryImportResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_source(mut self, path: &str, source: impl Into<String>) -> Self {
        self.insert(path, source);
        self
    }

    pub fn insert(&mut self, path: &str, source: impl Into<String>) {
        self.sources.insert(normalize(path), source.into());
    }
}

impl ImportResolver for MemoryImportResolver {
    fn resolve(&self, import_path: &str, from_file: Option<&str>) -> Result<ResolvedImport> {
        let path = join_import(import_path, from_file);
        let source = self
            .sources
            .get(&path)
            .ok_or_else(|| not_found(import_path, from_file))?;

        debug!("Resolved import {} to {} (memory)", import_path, path);
        Ok(ResolvedImport {
            source: source.clone(),
            path,
        })
    }
}

/// Joins a relative import onto the importing file's directory and normalizes
/// the result; non-relative imports are only normalized.
pub fn join_import(import_path: &str, from_file: Option<&str>) -> String {
    match from_file.and_then(|file| Path::new(file).parent()) {
        Some(dir) if is_relative(import_path) => normalize(&dir.join(import_path).to_string_lossy()),
        _ => normalize(import_path),
    }
}

/// Lexically resolves `.` and `..` components, keeping `/` separators.
pub fn normalize(path: &str) -> String {
    let mut parts: Vec<String> = Vec::new();
    let mut absolute = false;

    for component in Path::new(path).components() {
        match component {
            Component::RootDir => absolute = true,
            Component::CurDir => {}
            Component::ParentDir => {
                if matches!(parts.last(), Some(last) if last != "..") {
                    parts.pop();
                } else if !absolute {
                    parts.push("..".to_string());
                }
            }
            Component::Normal(part) => parts.push(part.to_string_lossy().into_owned()),
            Component::Prefix(prefix) => parts.push(prefix.as_os_str().to_string_lossy().into_owned()),
        }
    }

    let joined = parts.join("/");
    if absolute {
        format!("/{}", joined)
    } else {
        joined
    }
}
