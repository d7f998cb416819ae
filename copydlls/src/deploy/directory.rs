use crate::error::{Error, Result};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// File names of one directory, non-recursive, sorted. Lookups ignore ASCII
/// case the way Windows resolves DLL names.
#[derive(Debug, Clone)]
pub struct Directory {
    path: PathBuf,
    names: Vec<String>,
}

impl Directory {
    pub fn list<P: Into<PathBuf>>(path: P) -> Result<Self> {
        let path = path.into();
        if !path.is_dir() {
            return Err(Error::NotADirectory(path));
        }

        let mut names = fs::read_dir(&path)?
            .map(|entry| entry.map(|entry| entry.file_name().to_string_lossy().into_owned()))
            .collect::<std::io::Result<Vec<_>>>()?;
        names.sort();

        Ok(Self { path, names })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn join(&self, name: &str) -> PathBuf {
        self.path.join(name)
    }

    /// The entry spelled like `name` up to ASCII case, first in listing order.
    pub fn find(&self, name: &str) -> Option<&str> {
        self.names
            .iter()
            .find(|entry| entry.eq_ignore_ascii_case(name))
            .map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.find(name).is_some()
    }

    pub fn insert(&mut self, name: String) {
        self.names.push(name);
    }
}
