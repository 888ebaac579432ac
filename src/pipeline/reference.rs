//! Runtime table mapping old entity ids to their recreated counterparts.

use std::collections::HashMap;

use crate::error::PipelineError;
use crate::model::{Category, PermissionOverwrite, Role};
use crate::ports::platform::OverwriteApply;

/// A recreated role: its id on the target guild plus the serialized
/// record it was created from.
#[derive(Debug, Clone)]
pub struct RoleRef {
    /// Id of the role on the target guild.
    pub new_id: String,
    /// The serialized record it was created from.
    pub record: Role,
}

/// A recreated category: its id on the target guild plus the serialized
/// record it was created from.
#[derive(Debug, Clone)]
pub struct CategoryRef {
    /// Id of the category on the target guild.
    pub new_id: String,
    /// The serialized record it was created from.
    pub record: Category,
}

/// Lookup table built incrementally during reconstruction: roles first,
/// then categories. Channels resolve both. Never persisted; lives for
/// one reconstruction pass.
#[derive(Debug, Default)]
pub struct ReferenceMap {
    roles: HashMap<String, RoleRef>,
    categories: HashMap<String, CategoryRef>,
}

impl ReferenceMap {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a recreated role under its old id.
    pub fn insert_role(&mut self, record: Role, new_id: String) {
        self.roles.insert(record.id.clone(), RoleRef { new_id, record });
    }

    /// Records a recreated category under its old id.
    pub fn insert_category(&mut self, record: Category, new_id: String) {
        self.categories.insert(record.id.clone(), CategoryRef { new_id, record });
    }

    /// Looks up a role by its old id.
    #[must_use]
    pub fn role(&self, old_id: &str) -> Option<&RoleRef> {
        self.roles.get(old_id)
    }

    /// Looks up a category by its old id.
    #[must_use]
    pub fn category(&self, old_id: &str) -> Option<&CategoryRef> {
        self.categories.get(old_id)
    }

    /// Number of recorded roles.
    #[must_use]
    pub fn role_count(&self) -> usize {
        self.roles.len()
    }

    /// Number of recorded categories.
    #[must_use]
    pub fn category_count(&self) -> usize {
        self.categories.len()
    }

    /// Resolves a channel's parent-category old id to its new id.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Persistence`] when the snapshot names a
    /// category this run never created; that only happens with a
    /// hand-edited or truncated snapshot file.
    pub fn resolve_parent(&self, parent: Option<&str>) -> Result<Option<String>, PipelineError> {
        match parent {
            None => Ok(None),
            Some(old_id) => self
                .category(old_id)
                .map(|c| Some(c.new_id.clone()))
                .ok_or_else(|| {
                    PipelineError::Persistence(format!(
                        "snapshot references unknown parent category {old_id}"
                    ))
                }),
        }
    }

    /// Translates serialized overwrites into target-guild overwrites.
    ///
    /// Overwrites whose role was never recreated are skipped; the
    /// serializer already filtered stale entries, so a miss here means a
    /// snapshot captured before that role was deleted.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Persistence`] when a bitfield string is
    /// not a valid decimal number.
    pub fn translate_overwrites(
        &self,
        overwrites: &[PermissionOverwrite],
    ) -> Result<Vec<OverwriteApply>, PipelineError> {
        let mut applied = Vec::with_capacity(overwrites.len());
        for overwrite in overwrites {
            let Some(role) = self.role(&overwrite.role_id) else {
                continue;
            };
            applied.push(OverwriteApply {
                role_id: role.new_id.clone(),
                allow: parse_bitfield(&overwrite.allow)?,
                deny: parse_bitfield(&overwrite.deny)?,
            });
        }
        Ok(applied)
    }
}

/// Parses a decimal bitfield string from a snapshot.
///
/// # Errors
///
/// Returns [`PipelineError::Persistence`] for anything that is not a
/// decimal u64.
pub fn parse_bitfield(value: &str) -> Result<u64, PipelineError> {
    value.parse::<u64>().map_err(|_| {
        PipelineError::Persistence(format!("invalid permission bitfield `{value}` in snapshot"))
    })
}
