// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! NFT collections shown in the marketplace.
//!
//! Collections are operator-provided files in `collections/{slug}.json`;
//! the API only reads them.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::super::{paths::is_safe_component, FileStorage, StorageResult};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct NftItem {
    pub token_id: String,
    pub name: String,
    pub image_url: Option<String>,
    /// Listing price in the collection's native currency
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct NftCollection {
    pub slug: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    pub contract_address: String,
    /// Chain name, e.g. `ethereum` or `base`
    pub chain: String,
    #[serde(default)]
    pub items: Vec<NftItem>,
}

pub struct CollectionRepository<'a> {
    storage: &'a FileStorage,
}

impl<'a> CollectionRepository<'a> {
    pub fn new(storage: &'a FileStorage) -> Self {
        Self { storage }
    }

    /// All collections, ordered by slug. Unreadable files are skipped.
    pub fn list(&self) -> StorageResult<Vec<NftCollection>> {
        let slugs = self
            .storage
            .list_files(self.storage.paths().collections_dir(), "json")?;

        let mut collections = Vec::with_capacity(slugs.len());
        for slug in slugs {
            match self.get_by_slug(&slug) {
                Ok(Some(collection)) => collections.push(collection),
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!(slug = %slug, error = %e, "Skipping unreadable collection")
                }
            }
        }
        Ok(collections)
    }

    /// Look up a collection. Slugs that could not name a file are `None`.
    pub fn get_by_slug(&self, slug: &str) -> StorageResult<Option<NftCollection>> {
        if !is_safe_component(slug) {
            return Ok(None);
        }
        self.storage
            .read_json_opt(self.storage.paths().collection(slug))
    }
}
