// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Mutuals Contributors

//! In-memory user store.
//!
//! Holds user records, posts, and pending password reset codes. Handlers
//! reach it through `AppState` behind a `tokio::sync::RwLock`; taking the
//! write lock is the transactional boundary for every mutation, including
//! the two-record relationship transitions in [`crate::relationship`].

use std::collections::HashMap;

use chrono::{Duration, Utc};
use rand::Rng;
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::{
    Post, ResetCode, SearchEntry, SearchHistoryEntry, User, UserSummary, DEFAULT_AVATAR_URL,
};
use crate::validation::username_slug;

const DEFAULT_RESET_CODE_TTL_SECS: i64 = 15 * 60;

/// Input for [`UserStore::create_user`]. The password arrives pre-hashed;
/// the store never sees plaintext credentials.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    /// Seed for username derivation; defaults to first + last name.
    pub username_seed: Option<String>,
    pub birth_year: i32,
    pub birth_month: u32,
    pub birth_day: u32,
    pub gender: String,
}

pub struct UserStore {
    users: HashMap<Uuid, User>,
    posts: HashMap<Uuid, Post>,
    reset_codes: HashMap<Uuid, ResetCode>,
    reset_code_ttl: Duration,
}

impl Default for UserStore {
    fn default() -> Self {
        Self::new(DEFAULT_RESET_CODE_TTL_SECS)
    }
}

impl UserStore {
    pub fn new(reset_code_ttl_secs: i64) -> Self {
        Self {
            users: HashMap::new(),
            posts: HashMap::new(),
            reset_codes: HashMap::new(),
            reset_code_ttl: Duration::seconds(reset_code_ttl_secs),
        }
    }

    // -------------------------------------------------------------------------
    // Users
    // -------------------------------------------------------------------------

    pub fn user(&self, id: Uuid) -> Result<&User, ApiError> {
        self.users
            .get(&id)
            .ok_or_else(|| ApiError::not_found("User not found"))
    }

    pub fn user_mut(&mut self, id: Uuid) -> Result<&mut User, ApiError> {
        self.users
            .get_mut(&id)
            .ok_or_else(|| ApiError::not_found("User not found"))
    }

    pub fn user_by_email(&self, email: &str) -> Option<&User> {
        self.users.values().find(|user| user.email == email)
    }

    pub fn user_by_username(&self, username: &str) -> Option<&User> {
        self.users.values().find(|user| user.username == username)
    }

    pub fn is_email_taken(&self, email: &str) -> bool {
        self.user_by_email(email).is_some()
    }

    /// Create a user with a derived, collision-free username.
    pub fn create_user(&mut self, new_user: NewUser) -> User {
        let seed = new_user
            .username_seed
            .filter(|seed| !seed.trim().is_empty())
            .unwrap_or_else(|| format!("{}{}", new_user.first_name, new_user.last_name));
        let username = self.unique_username(&seed);

        let user = User {
            id: Uuid::new_v4(),
            first_name: new_user.first_name,
            last_name: new_user.last_name,
            username,
            email: new_user.email,
            password_hash: new_user.password_hash,
            verified: false,
            birth_year: new_user.birth_year,
            birth_month: new_user.birth_month,
            birth_day: new_user.birth_day,
            gender: new_user.gender,
            picture: DEFAULT_AVATAR_URL.to_string(),
            cover: None,
            details: serde_json::json!({}),
            friends: Vec::new(),
            following: Vec::new(),
            followers: Vec::new(),
            requests: Vec::new(),
            search: Vec::new(),
            created_at: Utc::now(),
        };
        self.users.insert(user.id, user.clone());
        user
    }

    /// Normalize the seed and append a random numeric suffix until the
    /// handle is free.
    fn unique_username(&self, seed: &str) -> String {
        let base = username_slug(seed);
        if self.user_by_username(&base).is_none() {
            return base;
        }

        let mut rng = rand::thread_rng();
        loop {
            let candidate = format!("{base}{}", rng.gen_range(1000..10000));
            if self.user_by_username(&candidate).is_none() {
                return candidate;
            }
        }
    }

    pub fn set_verified(&mut self, id: Uuid) -> Result<(), ApiError> {
        self.user_mut(id)?.verified = true;
        Ok(())
    }

    pub fn update_password(&mut self, email: &str, password_hash: String) -> Result<(), ApiError> {
        let id = self
            .user_by_email(email)
            .map(|user| user.id)
            .ok_or_else(|| ApiError::not_found("User not found"))?;
        self.user_mut(id)?.password_hash = password_hash;
        Ok(())
    }

    pub fn set_picture(&mut self, id: Uuid, url: String) -> Result<(), ApiError> {
        self.user_mut(id)?.picture = url;
        Ok(())
    }

    pub fn set_cover(&mut self, id: Uuid, url: String) -> Result<(), ApiError> {
        self.user_mut(id)?.cover = Some(url);
        Ok(())
    }

    pub fn set_details(
        &mut self,
        id: Uuid,
        infos: serde_json::Value,
    ) -> Result<serde_json::Value, ApiError> {
        let user = self.user_mut(id)?;
        user.details = infos;
        Ok(user.details.clone())
    }

    /// Resolve ids to public summaries, skipping any dangling references.
    pub fn summaries(&self, ids: &[Uuid]) -> Vec<UserSummary> {
        ids.iter()
            .filter_map(|id| self.users.get(id))
            .map(UserSummary::from)
            .collect()
    }

    /// Users with a pending request from `sender`.
    pub fn sent_requests(&self, sender: Uuid) -> Vec<UserSummary> {
        self.users
            .values()
            .filter(|user| user.requests.contains(&sender))
            .map(UserSummary::from)
            .collect()
    }

    // -------------------------------------------------------------------------
    // Search
    // -------------------------------------------------------------------------

    /// Case-insensitive substring search over names and usernames.
    pub fn search_users(&self, term: &str) -> Vec<UserSummary> {
        let needle = term.to_lowercase();
        self.users
            .values()
            .filter(|user| {
                user.first_name.to_lowercase().contains(&needle)
                    || user.last_name.to_lowercase().contains(&needle)
                    || user.username.to_lowercase().contains(&needle)
            })
            .map(UserSummary::from)
            .collect()
    }

    /// Upsert a search history entry keyed by the referenced user: an
    /// existing entry gets its timestamp refreshed, otherwise a new entry
    /// is appended.
    pub fn add_search_entry(&mut self, viewer: Uuid, target: Uuid) -> Result<(), ApiError> {
        self.user(target)?;
        let user = self.user_mut(viewer)?;

        let now = Utc::now();
        match user.search.iter_mut().find(|entry| entry.user == target) {
            Some(entry) => entry.created_at = now,
            None => user.search.push(SearchEntry {
                user: target,
                created_at: now,
            }),
        }
        Ok(())
    }

    /// The viewer's search history, most recent first, populated with user
    /// summaries. Entries for since-removed users are skipped.
    pub fn search_history(&self, viewer: Uuid) -> Result<Vec<SearchHistoryEntry>, ApiError> {
        let user = self.user(viewer)?;

        let mut entries: Vec<&SearchEntry> = user.search.iter().collect();
        entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(entries
            .into_iter()
            .filter_map(|entry| {
                self.users.get(&entry.user).map(|target| SearchHistoryEntry {
                    user: UserSummary::from(target),
                    created_at: entry.created_at,
                })
            })
            .collect())
    }

    pub fn remove_search_entry(&mut self, viewer: Uuid, target: Uuid) -> Result<(), ApiError> {
        let user = self.user_mut(viewer)?;
        let before = user.search.len();
        user.search.retain(|entry| entry.user != target);
        if user.search.len() == before {
            return Err(ApiError::not_found("Search entry not found"));
        }
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Reset Codes
    // -------------------------------------------------------------------------

    /// Issue a fresh 5-digit reset code, superseding any previous one.
    pub fn issue_reset_code(&mut self, user_id: Uuid) -> Result<String, ApiError> {
        self.user(user_id)?;
        let code = format!("{}", rand::thread_rng().gen_range(10000..100000));
        self.reset_codes.insert(
            user_id,
            ResetCode {
                code: code.clone(),
                created_at: Utc::now(),
            },
        );
        Ok(code)
    }

    /// Validate a reset code. A correct, unexpired code is consumed; a
    /// wrong or expired code leaves nothing usable behind.
    pub fn validate_reset_code(&mut self, user_id: Uuid, code: &str) -> Result<(), ApiError> {
        let stored = self
            .reset_codes
            .get(&user_id)
            .ok_or_else(|| ApiError::bad_request("Verification code is wrong."))?;

        if Utc::now() - stored.created_at > self.reset_code_ttl {
            self.reset_codes.remove(&user_id);
            return Err(ApiError::bad_request("Verification code has expired."));
        }
        if stored.code != code {
            return Err(ApiError::bad_request("Verification code is wrong."));
        }

        self.reset_codes.remove(&user_id);
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Posts
    // -------------------------------------------------------------------------

    pub fn create_post(
        &mut self,
        user: Uuid,
        text: impl Into<String>,
        images: Vec<String>,
    ) -> Result<Post, ApiError> {
        self.user(user)?;
        let post = Post {
            id: Uuid::new_v4(),
            user,
            text: text.into(),
            images,
            created_at: Utc::now(),
        };
        self.posts.insert(post.id, post.clone());
        Ok(post)
    }

    /// A user's posts, most recent first.
    pub fn posts_by_user(&self, user: Uuid) -> Vec<Post> {
        let mut posts: Vec<Post> = self
            .posts
            .values()
            .filter(|post| post.user == user)
            .cloned()
            .collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        posts
    }
}

#[cfg(test)]
impl UserStore {
    /// The currently issued reset code for a user, if any.
    pub(crate) fn reset_code_for_tests(&self, user_id: Uuid) -> Option<String> {
        self.reset_codes.get(&user_id).map(|rc| rc.code.clone())
    }
}

/// Test helper shared with the relationship engine tests.
#[cfg(test)]
pub(crate) fn sample_user(store: &mut UserStore, first: &str, last: &str) -> User {
    store.create_user(NewUser {
        first_name: first.to_string(),
        last_name: last.to_string(),
        email: format!(
            "{}.{}@example.com",
            first.to_lowercase(),
            last.to_lowercase()
        ),
        password_hash: "$argon2id$test".to_string(),
        username_seed: None,
        birth_year: 1995,
        birth_month: 6,
        birth_day: 1,
        gender: "other".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usernames_are_derived_and_disambiguated() {
        let mut store = UserStore::default();
        let first = sample_user(&mut store, "Alice", "Stone");
        assert_eq!(first.username, "alicestone");

        let second = store.create_user(NewUser {
            first_name: "Alice".into(),
            last_name: "Stone".into(),
            email: "other@example.com".into(),
            password_hash: "$argon2id$test".into(),
            username_seed: None,
            birth_year: 1990,
            birth_month: 1,
            birth_day: 1,
            gender: "female".into(),
        });
        assert_ne!(second.username, first.username);
        assert!(second.username.starts_with("alicestone"));

        // Explicit seed wins over the name-derived slug.
        let seeded = store.create_user(NewUser {
            first_name: "Ann".into(),
            last_name: "Lee".into(),
            email: "third@example.com".into(),
            password_hash: "$argon2id$test".into(),
            username_seed: Some("Custom Handle".into()),
            birth_year: 1990,
            birth_month: 1,
            birth_day: 1,
            gender: "female".into(),
        });
        assert_eq!(seeded.username, "customhandle");
    }

    #[test]
    fn email_lookup_and_uniqueness() {
        let mut store = UserStore::default();
        let user = sample_user(&mut store, "Bob", "Reed");
        assert!(store.is_email_taken(&user.email));
        assert!(!store.is_email_taken("nobody@example.com"));
        assert_eq!(store.user_by_email(&user.email).unwrap().id, user.id);
    }

    #[test]
    fn search_history_upsert_keeps_one_entry_with_later_timestamp() {
        let mut store = UserStore::default();
        let viewer = sample_user(&mut store, "Ann", "Low");
        let target = sample_user(&mut store, "Zed", "Fox");

        store.add_search_entry(viewer.id, target.id).unwrap();
        let first_ts = store.user(viewer.id).unwrap().search[0].created_at;

        store.add_search_entry(viewer.id, target.id).unwrap();
        let entries = &store.user(viewer.id).unwrap().search;
        assert_eq!(entries.len(), 1);
        assert!(entries[0].created_at >= first_ts);
    }

    #[test]
    fn search_history_is_most_recent_first() {
        let mut store = UserStore::default();
        let viewer = sample_user(&mut store, "Ann", "Low");
        let older = sample_user(&mut store, "One", "One");
        let newer = sample_user(&mut store, "Two", "Two");

        store.add_search_entry(viewer.id, older.id).unwrap();
        store.add_search_entry(viewer.id, newer.id).unwrap();
        // Refreshing the first entry moves it to the front.
        store.add_search_entry(viewer.id, older.id).unwrap();

        let history = store.search_history(viewer.id).unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].user.id, older.id);
    }

    #[test]
    fn remove_search_entry_missing_is_not_found() {
        let mut store = UserStore::default();
        let viewer = sample_user(&mut store, "Ann", "Low");
        let target = sample_user(&mut store, "Zed", "Fox");

        let err = store.remove_search_entry(viewer.id, target.id).unwrap_err();
        assert_eq!(err.status, axum::http::StatusCode::NOT_FOUND);

        store.add_search_entry(viewer.id, target.id).unwrap();
        store.remove_search_entry(viewer.id, target.id).unwrap();
        assert!(store.user(viewer.id).unwrap().search.is_empty());
    }

    #[test]
    fn reset_code_is_superseded_and_consumed() {
        let mut store = UserStore::default();
        let user = sample_user(&mut store, "Ann", "Low");

        let old_code = store.issue_reset_code(user.id).unwrap();
        let new_code = store.issue_reset_code(user.id).unwrap();

        if old_code != new_code {
            let err = store.validate_reset_code(user.id, &old_code).unwrap_err();
            assert_eq!(err.status, axum::http::StatusCode::BAD_REQUEST);
        }

        store.validate_reset_code(user.id, &new_code).unwrap();
        // Consumed: a second validation fails.
        let err = store.validate_reset_code(user.id, &new_code).unwrap_err();
        assert_eq!(err.status, axum::http::StatusCode::BAD_REQUEST);
    }

    #[test]
    fn expired_reset_code_is_rejected() {
        let mut store = UserStore::new(0);
        let user = sample_user(&mut store, "Ann", "Low");

        let code = store.issue_reset_code(user.id).unwrap();
        std::thread::sleep(std::time::Duration::from_millis(5));
        let err = store.validate_reset_code(user.id, &code).unwrap_err();
        assert_eq!(err.message, "Verification code has expired.");
    }

    #[test]
    fn posts_are_listed_most_recent_first() {
        let mut store = UserStore::default();
        let author = sample_user(&mut store, "Ann", "Low");

        let first = store.create_post(author.id, "first", vec![]).unwrap();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let second = store.create_post(author.id, "second", vec![]).unwrap();

        let posts = store.posts_by_user(author.id);
        assert_eq!(posts.len(), 2);
        assert_eq!(posts[0].id, second.id);
        assert_eq!(posts[1].id, first.id);
    }

    #[test]
    fn search_users_matches_names_case_insensitively() {
        let mut store = UserStore::default();
        let alice = sample_user(&mut store, "Alice", "Stone");
        sample_user(&mut store, "Bob", "Reed");

        let hits = store.search_users("ALIC");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, alice.id);

        assert!(store.search_users("nobody").is_empty());
    }
}
