//! Profile records: validation, storage and the operations behind each page.

pub mod db;
pub mod error;
pub mod notice;
pub mod profile;
pub mod service;

pub use db::{ProfileDb, DB};
pub use error::ProfileError;
pub use notice::Notice;
pub use profile::{FieldErrors, Profile, ProfileForm, ProfileInput};
pub use service::ProfileService;
