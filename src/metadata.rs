//! The metadata store: a collection of directories keyed by kind, with at
//! most one instance per kind. "Get-or-create" is the only way directories
//! are added, matching the collaborator interface spec.md §6 names.

use super::directory::{Directory, DirectoryKind};
use std::collections::HashMap;

#[derive(Clone, Debug, Default)]
pub struct MetadataStore {
    directories: HashMap<DirectoryKind, Directory>,
}

impl MetadataStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Idempotent: returns the existing directory for `kind` if one was
    /// already created, otherwise inserts and returns a fresh one.
    pub fn get_or_create_directory(&mut self, kind: DirectoryKind) -> &mut Directory {
        self.directories.entry(kind).or_insert_with(Directory::new)
    }

    #[must_use]
    pub fn get_directory(&self, kind: DirectoryKind) -> Option<&Directory> {
        self.directories.get(&kind)
    }

    #[must_use]
    pub fn directories(&self) -> impl Iterator<Item = (&DirectoryKind, &Directory)> {
        self.directories.iter()
    }
}
