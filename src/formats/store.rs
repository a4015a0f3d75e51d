use super::json::{finish_load, to_json_string};
use crate::error::{Result, StructureError};
use crate::structure::Structure;
use log::debug;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

const EXTENSION: &str = "json";

/// A directory holding one `<id>.json` file per structure.
#[derive(Debug, Clone)]
pub struct StructureStore {
    dir: PathBuf,
}

impl StructureStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        StructureStore { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File backing `id`. Ids that could escape the directory are refused.
    pub fn path_for(&self, id: &str) -> Result<PathBuf> {
        if id.trim().is_empty() || id.contains(['/', '\\']) || id.contains("..") {
            return Err(StructureError::InvalidId(id.to_string()));
        }
        Ok(self.dir.join(format!("{}.{}", id, EXTENSION)))
    }

    pub fn save(&self, structure: &Structure) -> Result<PathBuf> {
        let path = self.path_for(&structure.id)?;
        fs::create_dir_all(&self.dir)?;
        fs::write(&path, to_json_string(structure)?)?;
        debug!("Saved structure '{}' to {}", structure.id, path.display());
        Ok(path)
    }

    pub fn load(&self, id: &str) -> Result<Structure> {
        let path = self.path_for(id)?;
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                return Err(StructureError::NotFound(id.to_string()))
            }
            Err(err) => return Err(err.into()),
        };
        let structure: Structure =
            serde_json::from_str(&text).map_err(|source| StructureError::File { path, source })?;
        finish_load(structure)
    }

    pub fn exists(&self, id: &str) -> bool {
        self.path_for(id).map(|path| path.is_file()).unwrap_or(false)
    }

    /// Ids of every stored structure, sorted. A missing directory holds none.
    pub fn list_ids(&self) -> Result<Vec<String>> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };

        let mut ids = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                ids.push(stem.to_string());
            }
        }
        ids.sort();
        Ok(ids)
    }

    pub fn delete(&self, id: &str) -> Result<()> {
        let path = self.path_for(id)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                Err(StructureError::NotFound(id.to_string()))
            }
            Err(err) => Err(err.into()),
        }
    }
}
