use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use validator::{Validate, ValidationErrors};

pub const NAME_REQUIRED: &str = "The name field is required.";
pub const EMAIL_REQUIRED: &str = "The email field is required.";
pub const EMAIL_INVALID: &str = "The email field must be a valid email address.";

#[derive(Serialize, Deserialize, PartialEq, Eq, Hash, Debug, Clone)]
pub struct Profile {
    pub id: u64,
    pub name: String,
    pub email: String,
}

impl Profile {
    pub fn new(id: u64, input: ProfileInput) -> Self {
        Self {
            id,
            name: input.name,
            email: input.email,
        }
    }
}

/// The fields a form submission is allowed to set on a profile.
///
/// Anything else in the request body never reaches the record, and the id is
/// only ever assigned by storage.
#[derive(Serialize, Validate, PartialEq, Eq, Debug, Clone, Default)]
pub struct ProfileInput {
    #[validate(length(min = 1, message = "The name field is required."))]
    name: String,
    #[validate(
        length(min = 1, message = "The email field is required."),
        email(message = "The email field must be a valid email address.")
    )]
    email: String,
}

impl ProfileInput {
    /// Surrounding whitespace is dropped, so a blank value counts as missing.
    pub fn new(name: impl AsRef<str>, email: impl AsRef<str>) -> Self {
        Self {
            name: name.as_ref().trim().to_string(),
            email: email.as_ref().trim().to_string(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn check(&self) -> Result<(), FieldErrors> {
        self.validate().map_err(FieldErrors::from)
    }
}

impl From<&Profile> for ProfileInput {
    fn from(profile: &Profile) -> Self {
        Self::new(&profile.name, &profile.email)
    }
}

/// Validation messages keyed by form field, in field-name order.
#[derive(Serialize, PartialEq, Eq, Debug, Clone, Default)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn add(&mut self, field: &str, message: &str) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.to_string());
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl From<ValidationErrors> for FieldErrors {
    fn from(errors: ValidationErrors) -> Self {
        let mut fields = FieldErrors::default();
        for (field, errs) in errors.field_errors() {
            // An empty value only reports that it is required
            let required = errs.iter().find(|e| e.code == "length");
            let shown: Vec<_> = match required {
                Some(e) => vec![e],
                None => errs.iter().collect(),
            };
            for e in shown {
                let message = e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("The {} field is invalid.", field));
                fields.add(&field, &message);
            }
        }
        fields
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = self.0.values().flatten().map(String::as_str).collect();
        write!(f, "{}", messages.join(" "))
    }
}

/// What a create or edit page needs to render its form.
#[derive(Serialize, PartialEq, Eq, Debug, Clone, Default)]
pub struct ProfileForm {
    pub id: Option<u64>,
    pub input: ProfileInput,
    pub errors: FieldErrors,
}

impl ProfileForm {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn rejected(id: Option<u64>, input: ProfileInput, errors: FieldErrors) -> Self {
        Self { id, input, errors }
    }
}

impl From<&Profile> for ProfileForm {
    fn from(profile: &Profile) -> Self {
        Self {
            id: Some(profile.id),
            input: ProfileInput::from(profile),
            errors: FieldErrors::default(),
        }
    }
}
