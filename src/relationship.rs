// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Mutuals Contributors

//! Relationship engine: legal transitions of the friend/follow graph.
//!
//! Every operation acts on an ordered pair of distinct users, `self_id`
//! (the authenticated caller) and `other_id` (the path parameter), and is
//! expressed as a symmetric pair of array updates across both records.
//! Preconditions are evaluated before the first mutation and both records
//! are mutated under one `&mut UserStore` borrow, which the caller holds
//! through the store's write lock, so a transition is applied to both
//! sides or to neither.
//!
//! Maintained invariants:
//!
//! - `A ∈ B.friends ⇔ B ∈ A.friends`
//! - `A ∈ B.followers ⇔ B ∈ A.following`
//! - a user never appears in their own arrays (self-targeting is rejected
//!   up front)

use uuid::Uuid;

use crate::error::ApiError;
use crate::models::FriendshipStatus;
use crate::store::UserStore;

fn add(list: &mut Vec<Uuid>, id: Uuid) {
    if !list.contains(&id) {
        list.push(id);
    }
}

fn remove(list: &mut Vec<Uuid>, id: Uuid) {
    list.retain(|member| *member != id);
}

impl UserStore {
    /// Reject self-targeting and verify both records exist before any
    /// precondition is evaluated.
    fn check_pair(&self, self_id: Uuid, other_id: Uuid, action: &str) -> Result<(), ApiError> {
        if self_id == other_id {
            return Err(ApiError::bad_request(format!(
                "You can't {action} yourself"
            )));
        }
        self.user(self_id)?;
        self.user(other_id)?;
        Ok(())
    }

    /// Send a friend request: `other` gains a pending request and a
    /// follower, `self` starts following `other`.
    pub fn send_friend_request(&mut self, self_id: Uuid, other_id: Uuid) -> Result<(), ApiError> {
        self.check_pair(self_id, other_id, "send a request to")?;

        let other = self.user(other_id)?;
        if other.requests.contains(&self_id) || other.friends.contains(&self_id) {
            return Err(ApiError::bad_request("Already sent or friends"));
        }

        let other = self.user_mut(other_id)?;
        add(&mut other.requests, self_id);
        add(&mut other.followers, self_id);
        let me = self.user_mut(self_id)?;
        add(&mut me.following, other_id);
        Ok(())
    }

    /// Withdraw a pending friend request, undoing the implicit follow.
    pub fn cancel_friend_request(&mut self, self_id: Uuid, other_id: Uuid) -> Result<(), ApiError> {
        self.check_pair(self_id, other_id, "cancel a request to")?;

        let other = self.user(other_id)?;
        if !other.requests.contains(&self_id) || other.friends.contains(&self_id) {
            return Err(ApiError::bad_request("Request not found or already friends"));
        }

        let other = self.user_mut(other_id)?;
        remove(&mut other.requests, self_id);
        remove(&mut other.followers, self_id);
        let me = self.user_mut(self_id)?;
        remove(&mut me.following, other_id);
        Ok(())
    }

    /// Follow without a friend request; unilateral, no acceptance needed.
    pub fn follow(&mut self, self_id: Uuid, other_id: Uuid) -> Result<(), ApiError> {
        self.check_pair(self_id, other_id, "follow")?;

        let me = self.user(self_id)?;
        let other = self.user(other_id)?;
        if other.followers.contains(&self_id) || me.following.contains(&other_id) {
            return Err(ApiError::bad_request("Already following"));
        }

        let other = self.user_mut(other_id)?;
        add(&mut other.followers, self_id);
        let me = self.user_mut(self_id)?;
        add(&mut me.following, other_id);
        Ok(())
    }

    pub fn unfollow(&mut self, self_id: Uuid, other_id: Uuid) -> Result<(), ApiError> {
        self.check_pair(self_id, other_id, "unfollow")?;

        let me = self.user(self_id)?;
        let other = self.user(other_id)?;
        if !other.followers.contains(&self_id) || !me.following.contains(&other_id) {
            return Err(ApiError::bad_request("Not following"));
        }

        let other = self.user_mut(other_id)?;
        remove(&mut other.followers, self_id);
        let me = self.user_mut(self_id)?;
        remove(&mut me.following, other_id);
        Ok(())
    }

    /// Accept a pending request from `other`: both become mutual friends,
    /// the pending request is cleared, and the follow edges complete in
    /// both directions.
    pub fn accept_friend_request(&mut self, self_id: Uuid, other_id: Uuid) -> Result<(), ApiError> {
        self.check_pair(self_id, other_id, "accept a request from")?;

        let me = self.user(self_id)?;
        if !me.requests.contains(&other_id) {
            return Err(ApiError::bad_request("No request found"));
        }

        let me = self.user_mut(self_id)?;
        add(&mut me.friends, other_id);
        add(&mut me.following, other_id);
        remove(&mut me.requests, other_id);
        let other = self.user_mut(other_id)?;
        add(&mut other.friends, self_id);
        add(&mut other.followers, self_id);
        Ok(())
    }

    /// Decline a pending request from `other`, undoing the sender's
    /// implicit follow.
    pub fn delete_friend_request(&mut self, self_id: Uuid, other_id: Uuid) -> Result<(), ApiError> {
        self.check_pair(self_id, other_id, "delete a request from")?;

        let me = self.user(self_id)?;
        if !me.requests.contains(&other_id) {
            return Err(ApiError::bad_request("No request found"));
        }

        let me = self.user_mut(self_id)?;
        remove(&mut me.requests, other_id);
        remove(&mut me.followers, other_id);
        let other = self.user_mut(other_id)?;
        remove(&mut other.following, self_id);
        Ok(())
    }

    /// Dissolve a mutual friendship, removing every edge between the pair.
    pub fn unfriend(&mut self, self_id: Uuid, other_id: Uuid) -> Result<(), ApiError> {
        self.check_pair(self_id, other_id, "unfriend")?;

        let me = self.user(self_id)?;
        let other = self.user(other_id)?;
        if !me.friends.contains(&other_id) || !other.friends.contains(&self_id) {
            return Err(ApiError::bad_request("Not friends"));
        }

        let me = self.user_mut(self_id)?;
        remove(&mut me.friends, other_id);
        remove(&mut me.following, other_id);
        remove(&mut me.followers, other_id);
        let other = self.user_mut(other_id)?;
        remove(&mut other.friends, self_id);
        remove(&mut other.following, self_id);
        remove(&mut other.followers, self_id);
        Ok(())
    }

    /// Relationship status between a viewer and a target profile. The four
    /// predicates match the relationship state model exactly.
    pub fn friendship(&self, viewer_id: Uuid, target_id: Uuid) -> Result<FriendshipStatus, ApiError> {
        let viewer = self.user(viewer_id)?;
        let target = self.user(target_id)?;
        Ok(FriendshipStatus {
            friends: viewer.friends.contains(&target_id) && target.friends.contains(&viewer_id),
            following: viewer.following.contains(&target_id),
            request_sent: target.requests.contains(&viewer_id),
            request_received: viewer.requests.contains(&target_id),
        })
    }
}
