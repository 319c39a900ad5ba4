// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Ownership checks for user-scoped records.

use crate::auth::AuthenticatedUser;

use super::{StorageError, StorageResult};

/// A record that belongs to exactly one user.
pub trait OwnedResource {
    fn owner_user_id(&self) -> &str;

    /// Human-readable name used in permission errors.
    fn resource_label(&self) -> String;
}

/// Verification of record ownership against the caller.
pub trait OwnershipEnforcer {
    /// # Errors
    /// Returns `StorageError::PermissionDenied` if the user doesn't own the resource.
    fn verify_ownership(&self, user: &AuthenticatedUser) -> StorageResult<()>;
}

impl<T: OwnedResource> OwnershipEnforcer for T {
    fn verify_ownership(&self, user: &AuthenticatedUser) -> StorageResult<()> {
        if self.owner_user_id() == user.user_id {
            Ok(())
        } else {
            Err(StorageError::PermissionDenied {
                user_id: user.user_id.clone(),
                resource: self.resource_label(),
            })
        }
    }
}

/// Ownership check chained onto a lookup that may have found nothing.
pub trait OwnershipCheck<T> {
    fn verify_owner(self, user: &AuthenticatedUser) -> StorageResult<T>;
}

impl<T: OwnedResource> OwnershipCheck<T> for StorageResult<Option<T>> {
    fn verify_owner(self, user: &AuthenticatedUser) -> StorageResult<T> {
        match self? {
            Some(resource) => {
                resource.verify_ownership(user)?;
                Ok(resource)
            }
            None => Err(StorageError::NotFound("resource".to_string())),
        }
    }
}
