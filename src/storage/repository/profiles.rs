// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User profile repository.
//!
//! Profiles are keyed by the identity provider's user id and created lazily
//! the first time a user opens their profile. Creation goes through
//! [`FileStorage::create_json`], so the store guarantees one profile per
//! user even when two first visits race.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::super::{paths::is_safe_component, FileStorage, StorageError, StorageResult};
use crate::models::{is_valid_username, ProfileChanges};

const USERNAME_MAX_LEN: usize = 32;

/// Profile stored in `profiles/{user_id}.json`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct Profile {
    /// Identity provider user id.
    pub id: String,
    pub username: String,
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
    pub profile_picture: Option<String>,
    pub about_me: Option<String>,
    pub bio: Option<String>,
    pub is_public: bool,
    pub email_verified: bool,
    pub onboarding_completed: bool,
    pub updated_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub last_active_at: DateTime<Utc>,
}

impl Profile {
    /// Defaults for a first visit.
    ///
    /// The username is the email local-part reduced to `[A-Za-z0-9_.-]` and
    /// cut to the username length limit. When that is too short it falls
    /// back to `user_` plus the start of the user id. The display name is
    /// the username with its first letter capitalized.
    pub fn new_default(
        user_id: &str,
        email: Option<&str>,
        email_verified: bool,
        now: DateTime<Utc>,
    ) -> Self {
        let mut from_email: String = email
            .and_then(|e| e.split('@').next())
            .unwrap_or_default()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
            .collect();
        from_email.truncate(USERNAME_MAX_LEN);

        let username = if is_valid_username(&from_email) {
            from_email
        } else {
            format!("user_{}", id_fragment(user_id, 8))
        };

        Self {
            id: user_id.to_string(),
            full_name: Some(capitalize(&username)),
            username,
            email: email.map(str::to_string),
            avatar_url: None,
            profile_picture: None,
            about_me: None,
            bio: None,
            is_public: false,
            email_verified,
            onboarding_completed: false,
            updated_at: now,
            created_at: now,
            last_active_at: now,
        }
    }

    /// Field merge: only fields present in `changes` are written.
    pub fn merge(&mut self, changes: ProfileChanges, now: DateTime<Utc>) {
        let ProfileChanges {
            username,
            full_name,
            avatar_url,
            profile_picture,
            about_me,
            bio,
            is_public,
            onboarding_completed,
        } = changes;

        if let Some(username) = username {
            self.username = username;
        }
        if let Some(full_name) = full_name {
            self.full_name = Some(full_name);
        }
        if let Some(avatar_url) = avatar_url {
            self.avatar_url = Some(avatar_url);
        }
        if let Some(profile_picture) = profile_picture {
            self.profile_picture = Some(profile_picture);
        }
        if let Some(about_me) = about_me {
            self.about_me = Some(about_me);
        }
        if let Some(bio) = bio {
            self.bio = Some(bio);
        }
        if let Some(is_public) = is_public {
            self.is_public = is_public;
        }
        if let Some(onboarding_completed) = onboarding_completed {
            self.onboarding_completed = onboarding_completed;
        }

        self.updated_at = now;
        self.last_active_at = now;
    }
}

/// Up to `len` lowercase alphanumerics from the start of a user id.
fn id_fragment(user_id: &str, len: usize) -> String {
    user_id
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .take(len)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// `base` with `suffix` appended, trimming `base` so the result stays
/// within the username length limit.
fn with_suffix(base: &str, suffix: &str) -> String {
    let keep = USERNAME_MAX_LEN.saturating_sub(suffix.len()).min(base.len());
    format!("{}{suffix}", &base[..keep])
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub struct ProfileRepository<'a> {
    storage: &'a FileStorage,
}

impl<'a> ProfileRepository<'a> {
    pub fn new(storage: &'a FileStorage) -> Self {
        Self { storage }
    }

    pub fn get(&self, user_id: &str) -> StorageResult<Option<Profile>> {
        check_id(user_id)?;
        self.storage.read_json_opt(self.storage.paths().profile(user_id))
    }

    /// Return the user's profile, creating it from `defaults` if absent.
    ///
    /// The boolean is `true` when this call created the profile.
    pub fn get_or_create(&self, defaults: Profile) -> StorageResult<(Profile, bool)> {
        check_id(&defaults.id)?;
        if let Some(existing) = self.get(&defaults.id)? {
            return Ok((existing, false));
        }

        let mut defaults = defaults;
        defaults.username = self.unclaimed_username(&defaults.username, &defaults.id)?;

        let path = self.storage.paths().profile(&defaults.id);
        match self.storage.create_json(&path, &defaults) {
            Ok(()) => Ok((defaults, true)),
            Err(StorageError::AlreadyExists(_)) => Ok((self.storage.read_json(path)?, false)),
            Err(e) => Err(e),
        }
    }

    /// Replace an existing profile.
    pub fn update(&self, profile: &Profile) -> StorageResult<()> {
        check_id(&profile.id)?;
        let path = self.storage.paths().profile(&profile.id);
        if !self.storage.exists(&path) {
            return Err(StorageError::NotFound(format!("Profile {}", profile.id)));
        }
        self.storage.write_json(path, profile)
    }

    /// Whether a profile other than `owner_id`'s uses `username`
    /// (case-insensitive).
    pub fn is_username_taken(&self, username: &str, owner_id: &str) -> StorageResult<bool> {
        Ok(self
            .find_by_username(username, |profile| profile.id != owner_id)?
            .is_some())
    }

    /// Find the public profile using `username` (case-insensitive).
    pub fn find_public_by_username(&self, username: &str) -> StorageResult<Option<Profile>> {
        self.find_by_username(username, |profile| profile.is_public)
    }

    fn find_by_username(
        &self,
        username: &str,
        accept: impl Fn(&Profile) -> bool,
    ) -> StorageResult<Option<Profile>> {
        let ids = self
            .storage
            .list_files(self.storage.paths().profiles_dir(), "json")?;

        for id in ids {
            if let Some(profile) = self.get(&id)? {
                if profile.username.eq_ignore_ascii_case(username) && accept(&profile) {
                    return Ok(Some(profile));
                }
            }
        }
        Ok(None)
    }

    /// `wanted` if no other profile uses it, otherwise `wanted` with a
    /// suffix taken from the user id, then a counter.
    fn unclaimed_username(&self, wanted: &str, user_id: &str) -> StorageResult<String> {
        if !self.is_username_taken(wanted, user_id)? {
            return Ok(wanted.to_string());
        }

        let fragment = id_fragment(user_id, 6);
        if !fragment.is_empty() {
            let candidate = with_suffix(wanted, &format!("_{fragment}"));
            if !self.is_username_taken(&candidate, user_id)? {
                return Ok(candidate);
            }
        }

        let mut n: u32 = 2;
        loop {
            let candidate = with_suffix(wanted, &format!("_{n}"));
            if !self.is_username_taken(&candidate, user_id)? {
                return Ok(candidate);
            }
            n += 1;
        }
    }
}

fn check_id(user_id: &str) -> StorageResult<()> {
    if is_safe_component(user_id) {
        Ok(())
    } else {
        Err(StorageError::InvalidId(format!("user id {user_id}")))
    }
}
