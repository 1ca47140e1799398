use crate::profile::FieldErrors;

#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    #[error("Profile input rejected: {0}")]
    Validation(FieldErrors),
    #[error("No profile with id {0}")]
    NotFound(u64),
    #[error("Error in sled storage layer")]
    Storage {
        #[from]
        source: sled::Error,
    },
    #[error("Stored profile could not be decoded")]
    Codec {
        #[from]
        source: bincode::Error,
    },
}

impl From<FieldErrors> for ProfileError {
    fn from(errors: FieldErrors) -> Self {
        ProfileError::Validation(errors)
    }
}
