use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use conddb_types::ObjectId;

use crate::error::{RefError, Result};
use crate::names::{validate_branch_name, validate_tag_name};
use crate::traits::RefStore;
use crate::types::{Head, Ref};

#[derive(Debug, Default)]
struct Table {
    refs: BTreeMap<String, Ref>,
    head: Option<Head>,
}

/// [`RefStore`] kept in process memory, used by the in-memory backend.
#[derive(Debug, Default)]
pub struct InMemoryRefStore {
    table: RwLock<Table>,
}

impl InMemoryRefStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn reader(&self) -> Result<RwLockReadGuard<'_, Table>> {
        self.table
            .read()
            .map_err(|e| RefError::Poisoned(e.to_string()))
    }

    fn writer(&self) -> Result<RwLockWriteGuard<'_, Table>> {
        self.table
            .write()
            .map_err(|e| RefError::Poisoned(e.to_string()))
    }
}

impl RefStore for InMemoryRefStore {
    fn read_ref(&self, name: &str) -> Result<Option<Ref>> {
        Ok(self.reader()?.refs.get(name).cloned())
    }

    fn write_ref(&self, reference: &Ref) -> Result<()> {
        let canonical = reference.canonical_name();
        match reference {
            Ref::Branch { name, .. } => validate_branch_name(name)?,
            Ref::Tag { name, .. } => validate_tag_name(name)?,
        }
        let mut table = self.writer()?;
        let exists = table.refs.contains_key(&canonical);
        if reference.is_tag() && exists {
            return Err(RefError::TagImmutable { name: canonical });
        }
        tracing::trace!(name = %canonical, target = %reference.target(), "ref written");
        table.refs.insert(canonical, reference.clone());
        Ok(())
    }

    fn list_refs(&self, prefix: &str) -> Result<Vec<(String, Ref)>> {
        let table = self.reader()?;
        Ok(table
            .refs
            .range(prefix.to_string()..)
            .take_while(|(name, _)| name.starts_with(prefix))
            .map(|(name, r)| (name.clone(), r.clone()))
            .collect())
    }

    fn head(&self) -> Result<Option<Head>> {
        Ok(self.reader()?.head.clone())
    }

    fn set_head(&self, branch: &str) -> Result<()> {
        validate_branch_name(branch)?;
        self.writer()?.head = Some(Head::Symbolic(branch.to_string()));
        Ok(())
    }

    fn set_head_detached(&self, target: ObjectId) -> Result<()> {
        self.writer()?.head = Some(Head::Detached(target));
        Ok(())
    }
}
