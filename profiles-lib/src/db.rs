use crate::error::ProfileError;
use crate::profile::{Profile, ProfileInput};
use async_trait::async_trait;
use sled;
use tracing::{event, Level};

const PROFILES_TREE: &[u8] = b"profiles";
const ID_COUNTER: &[u8] = b"profile_id";

/// Storage contract for profile records.
///
/// Ids are generated by the store and never reused. `all_profiles` returns
/// records in creation order.
#[async_trait]
pub trait DB: Send + Sync {
    async fn new(db_file: String) -> anyhow::Result<Self>
    where
        Self: Sized;
    async fn insert_profile(&self, input: &ProfileInput) -> Result<Profile, ProfileError>;
    async fn get_profile(&self, id: u64) -> Result<Option<Profile>, ProfileError>;
    async fn all_profiles(&self) -> Result<Vec<Profile>, ProfileError>;
    /// Overwrites name and email of an existing record. `None` when the id is absent.
    async fn update_profile(
        &self,
        id: u64,
        input: &ProfileInput,
    ) -> Result<Option<Profile>, ProfileError>;
    async fn remove_profile(&self, id: u64) -> Result<Option<Profile>, ProfileError>;
}

#[derive(Clone, Debug)]
pub struct ProfileDb {
    pub db: sled::Db,
    profiles: sled::Tree,
}

impl ProfileDb {
    /// A throwaway store that lives only as long as the handle.
    pub fn temporary() -> Result<Self, ProfileError> {
        let db = sled::Config::new().temporary(true).open()?;
        Self::from_db(db)
    }

    fn from_db(db: sled::Db) -> Result<Self, ProfileError> {
        let profiles = db.open_tree(PROFILES_TREE)?;
        Ok(ProfileDb { db, profiles })
    }

    /// Ids start at one and only ever grow, deleted ids are not handed out again.
    fn next_id(&self) -> Result<u64, ProfileError> {
        let current = self.db.update_and_fetch(ID_COUNTER, increment)?;
        Ok(current.as_deref().map(read_id).unwrap_or(1))
    }
}

fn read_id(bytes: &[u8]) -> u64 {
    <[u8; 8]>::try_from(bytes)
        .map(u64::from_be_bytes)
        .unwrap_or(0)
}

fn increment(old: Option<&[u8]>) -> Option<Vec<u8>> {
    let last = old.map(read_id).unwrap_or(0);
    Some((last + 1).to_be_bytes().to_vec())
}

fn key(id: u64) -> [u8; 8] {
    // Big-endian so the tree's key order is id order
    id.to_be_bytes()
}

fn decode(bytes: &[u8]) -> Result<Profile, ProfileError> {
    Ok(bincode::deserialize(bytes)?)
}

#[async_trait]
impl DB for ProfileDb {
    async fn new(db_file: String) -> anyhow::Result<Self> {
        let db: sled::Db = sled::open(&db_file)?;
        event!(Level::INFO, db_file = %db_file, "Opened profile store");
        Ok(ProfileDb::from_db(db)?)
    }

    async fn insert_profile(&self, input: &ProfileInput) -> Result<Profile, ProfileError> {
        let id = self.next_id()?;
        let profile = Profile::new(id, input.clone());
        self.profiles
            .insert(key(id), bincode::serialize(&profile)?)?;
        self.profiles.flush()?;
        Ok(profile)
    }

    async fn get_profile(&self, id: u64) -> Result<Option<Profile>, ProfileError> {
        let profile = self.profiles.get(key(id))?;
        profile.map(|e| decode(&e)).transpose()
    }

    async fn all_profiles(&self) -> Result<Vec<Profile>, ProfileError> {
        self.profiles
            .iter()
            .values()
            .map(|value| decode(&value?))
            .collect()
    }

    async fn update_profile(
        &self,
        id: u64,
        input: &ProfileInput,
    ) -> Result<Option<Profile>, ProfileError> {
        let profile = Profile::new(id, input.clone());
        let bytes = bincode::serialize(&profile)?;

        // Only replaces a record that still exists, so a concurrent delete is not undone
        let updated = self
            .profiles
            .update_and_fetch(key(id), |old| old.map(|_| bytes.clone()))?;
        if updated.is_none() {
            return Ok(None);
        }
        self.profiles.flush()?;
        Ok(Some(profile))
    }

    async fn remove_profile(&self, id: u64) -> Result<Option<Profile>, ProfileError> {
        let prev_val = self.profiles.remove(key(id))?;
        if prev_val.is_some() {
            self.profiles.flush()?;
        }
        prev_val.map(|e| decode(&e)).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn ids_are_unique_and_listed_in_creation_order() {
        let db = ProfileDb::temporary().unwrap();
        let a = db
            .insert_profile(&ProfileInput::new("A", "a@example.com"))
            .await
            .unwrap();
        let b = db
            .insert_profile(&ProfileInput::new("B", "b@example.com"))
            .await
            .unwrap();
        assert_eq!((a.id, b.id), (1, 2));

        let all = db.all_profiles().await.unwrap();
        assert_eq!(all, vec![a, b]);
    }

    #[tokio::test]
    async fn ids_are_not_reused_after_delete() {
        let db = ProfileDb::temporary().unwrap();
        let a = db
            .insert_profile(&ProfileInput::new("A", "a@example.com"))
            .await
            .unwrap();
        db.remove_profile(a.id).await.unwrap();
        let b = db
            .insert_profile(&ProfileInput::new("B", "b@example.com"))
            .await
            .unwrap();
        assert!(b.id > a.id);
    }

    #[tokio::test]
    async fn update_of_missing_record_does_not_create_it() {
        let db = ProfileDb::temporary().unwrap();
        let updated = db
            .update_profile(42, &ProfileInput::new("Ghost", "ghost@example.com"))
            .await
            .unwrap();
        assert_eq!(updated, None);
        assert_eq!(db.get_profile(42).await.unwrap(), None);
    }

    #[tokio::test]
    async fn remove_returns_previous_record() {
        let db = ProfileDb::temporary().unwrap();
        let a = db
            .insert_profile(&ProfileInput::new("A", "a@example.com"))
            .await
            .unwrap();
        assert_eq!(db.remove_profile(a.id).await.unwrap(), Some(a.clone()));
        assert_eq!(db.remove_profile(a.id).await.unwrap(), None);
    }
}
