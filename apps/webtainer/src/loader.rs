//! File-backed servlet loading.

use std::io;
use std::path::{Path, PathBuf};
use webtainer_core::{
    LoadError, MappingFormat, MappingLoader, ServletFactory, ServletLoader, ServletMappings,
    ServletRegistry,
};

/// Read and parse a mapping file; the format follows the extension.
pub fn read_mappings(path: &Path) -> Result<ServletMappings, LoadError> {
    let text = std::fs::read_to_string(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => LoadError::NotFound(path.to_path_buf()),
        _ => LoadError::Io {
            path: path.to_path_buf(),
            source,
        },
    })?;
    Ok(ServletMappings::parse(&text, MappingFormat::from_path(path))?)
}

/// Loads servlets named in a mapping file.
#[derive(Debug, Clone)]
pub struct FileServletLoader {
    path: PathBuf,
    factory: ServletFactory,
}

impl FileServletLoader {
    pub fn new(path: impl Into<PathBuf>, factory: ServletFactory) -> Self {
        Self {
            path: path.into(),
            factory,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ServletLoader for FileServletLoader {
    fn load(&self, registry: &dyn ServletRegistry) -> Result<usize, LoadError> {
        let mappings = read_mappings(&self.path)?;
        tracing::info!(
            path = %self.path.display(),
            mappings = mappings.len(),
            "loading servlets"
        );
        MappingLoader::new(&mappings, &self.factory).load(registry)
    }
}
