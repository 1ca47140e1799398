use crate::db::DB;
use crate::error::ProfileError;
use crate::notice::Notice;
use crate::profile::{Profile, ProfileForm, ProfileInput};
use tracing::{event, instrument, Level};

/// Validates form input and turns each page action into one storage call.
#[derive(Debug)]
pub struct ProfileService<T: DB> {
    dbconn: T,
}

impl<T: DB> ProfileService<T> {
    pub fn new(dbconn: T) -> Self {
        Self { dbconn }
    }

    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Profile>, ProfileError> {
        let profiles = self.dbconn.all_profiles().await?;
        event!(Level::DEBUG, count = profiles.len(), "Listed profiles");
        Ok(profiles)
    }

    pub fn create_form(&self) -> ProfileForm {
        ProfileForm::empty()
    }

    #[instrument(skip(self, input))]
    pub async fn create(&self, input: ProfileInput) -> Result<(Profile, Notice), ProfileError> {
        input.check()?;
        let profile = self.dbconn.insert_profile(&input).await?;
        event!(Level::INFO, id = profile.id, "Profile created");
        Ok((profile, Notice::Added))
    }

    #[instrument(skip(self))]
    pub async fn edit_form(&self, id: u64) -> Result<Profile, ProfileError> {
        self.dbconn
            .get_profile(id)
            .await?
            .ok_or(ProfileError::NotFound(id))
    }

    #[instrument(skip(self, input))]
    pub async fn update(
        &self,
        id: u64,
        input: ProfileInput,
    ) -> Result<(Profile, Notice), ProfileError> {
        // An unknown id wins over bad input
        self.edit_form(id).await?;
        input.check()?;

        let profile = self
            .dbconn
            .update_profile(id, &input)
            .await?
            .ok_or(ProfileError::NotFound(id))?;
        event!(Level::INFO, id, "Profile updated");
        Ok((profile, Notice::Updated))
    }

    /// Deleting an id that is already gone still counts as success.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: u64) -> Result<Notice, ProfileError> {
        match self.dbconn.remove_profile(id).await? {
            Some(_) => event!(Level::INFO, id, "Profile deleted"),
            None => event!(Level::DEBUG, id, "Delete of absent profile ignored"),
        }
        Ok(Notice::Deleted)
    }
}
