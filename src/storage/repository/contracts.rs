// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Contract deployment registry.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::super::{
    paths::is_safe_component, FileStorage, OwnedResource, StorageError, StorageResult,
};

/// Deployment stored in `contracts/{name}.json`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct ContractDeployment {
    /// Registry key, e.g. `RairToken`
    pub name: String,
    pub chain_id: u64,
    /// Lowercase `0x` address
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tx_hash: Option<String>,
    /// User id of whoever registered the deployment
    pub deployed_by: String,
    pub deployed_at: DateTime<Utc>,
}

impl OwnedResource for ContractDeployment {
    fn owner_user_id(&self) -> &str {
        &self.deployed_by
    }

    fn resource_label(&self) -> String {
        format!("contract {}", self.name)
    }
}

pub struct ContractRepository<'a> {
    storage: &'a FileStorage,
}

impl<'a> ContractRepository<'a> {
    pub fn new(storage: &'a FileStorage) -> Self {
        Self { storage }
    }

    pub fn list(&self) -> StorageResult<Vec<ContractDeployment>> {
        let names = self
            .storage
            .list_files(self.storage.paths().contracts_dir(), "json")?;

        let mut deployments = Vec::with_capacity(names.len());
        for name in names {
            if let Some(deployment) = self.get(&name)? {
                deployments.push(deployment);
            }
        }
        Ok(deployments)
    }

    pub fn get(&self, name: &str) -> StorageResult<Option<ContractDeployment>> {
        check_name(name)?;
        self.storage
            .read_json_opt(self.storage.paths().contract(name))
    }

    /// Register a deployment.
    ///
    /// A name is claimed by whoever registers it first. Later registrations
    /// under that name replace the entry only when they come from the same
    /// user; anyone else gets `StorageError::PermissionDenied`.
    pub fn register(&self, deployment: &ContractDeployment) -> StorageResult<()> {
        check_name(&deployment.name)?;
        let path = self.storage.paths().contract(&deployment.name);

        match self.storage.create_json(&path, deployment) {
            Err(StorageError::AlreadyExists(_)) => {}
            other => return other,
        }

        let existing: ContractDeployment = self.storage.read_json(&path)?;
        if existing.owner_user_id() != deployment.deployed_by {
            return Err(StorageError::PermissionDenied {
                user_id: deployment.deployed_by.clone(),
                resource: existing.resource_label(),
            });
        }
        self.storage.write_json(path, deployment)
    }
}

fn check_name(name: &str) -> StorageResult<()> {
    if is_safe_component(name) {
        Ok(())
    } else {
        Err(StorageError::InvalidId(format!("contract name {name}")))
    }
}
