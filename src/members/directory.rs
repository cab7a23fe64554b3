use anyhow::{Context, Result};
use async_trait::async_trait;
use dashmap::DashMap;
use std::path::Path;

use crate::models::{MemberId, MemberProfile};

/// Lookup service for host-owned member data
#[async_trait]
pub trait MemberDirectory: Send + Sync {
    /// Resolve a member by id
    async fn get(&self, member_id: MemberId) -> Option<MemberProfile>;

    /// Ids of members whose first name and surname contain the given
    /// fragments (case-insensitive). Empty fragments don't constrain.
    async fn search(
        &self,
        first_contains: Option<&str>,
        last_contains: Option<&str>,
    ) -> Vec<MemberId>;
}

/// Member profiles pushed by the host, held in memory
#[derive(Default)]
pub struct InMemoryMemberDirectory {
    members: DashMap<MemberId, MemberProfile>,
}

impl InMemoryMemberDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a JSON array of member profiles
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read members file {}", path.display()))?;
        let profiles: Vec<MemberProfile> = serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse members file {}", path.display()))?;

        let directory = Self::new();
        for profile in profiles {
            directory.upsert(profile);
        }
        Ok(directory)
    }

    /// Insert or replace a profile. Returns true if the member was new.
    pub fn upsert(&self, profile: MemberProfile) -> bool {
        self.members.insert(profile.id, profile).is_none()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

#[async_trait]
impl MemberDirectory for InMemoryMemberDirectory {
    async fn get(&self, member_id: MemberId) -> Option<MemberProfile> {
        self.members.get(&member_id).map(|entry| entry.value().clone())
    }

    async fn search(
        &self,
        first_contains: Option<&str>,
        last_contains: Option<&str>,
    ) -> Vec<MemberId> {
        let mut ids = self
            .members
            .iter()
            .filter(|entry| entry.value().matches_name(first_contains, last_contains))
            .map(|entry| *entry.key())
            .collect::<Vec<_>>();
        ids.sort_unstable();
        ids
    }
}
