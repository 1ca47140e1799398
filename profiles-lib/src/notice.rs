use std::fmt;
use std::str::FromStr;

/// One-time confirmation shown on the list page after a successful change.
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum Notice {
    Added,
    Updated,
    Deleted,
}

impl Notice {
    pub fn message(&self) -> &'static str {
        match self {
            Notice::Added => "Profile added successfully",
            Notice::Updated => "Profile updated successfully",
            Notice::Deleted => "Profile deleted successfully",
        }
    }

    /// Short tag used when the notice has to travel between two requests.
    pub fn as_str(&self) -> &'static str {
        match self {
            Notice::Added => "added",
            Notice::Updated => "updated",
            Notice::Deleted => "deleted",
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
#[error("Unknown notice {0:?}")]
pub struct UnknownNotice(String);

impl FromStr for Notice {
    type Err = UnknownNotice;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "added" => Ok(Notice::Added),
            "updated" => Ok(Notice::Updated),
            "deleted" => Ok(Notice::Deleted),
            other => Err(UnknownNotice(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_parse_back() {
        for notice in [Notice::Added, Notice::Updated, Notice::Deleted] {
            assert_eq!(notice.as_str().parse::<Notice>(), Ok(notice));
        }
    }

    #[test]
    fn free_text_is_not_a_notice() {
        assert!("<script>".parse::<Notice>().is_err());
        assert!("Profile added successfully".parse::<Notice>().is_err());
    }
}
