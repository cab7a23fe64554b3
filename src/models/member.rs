use serde::{Deserialize, Serialize};

use super::MemberId;

/// Member data as held by the host system. Read-only from this crate's side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberProfile {
    pub id: MemberId,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub surname: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub groups: Vec<String>,
}

impl MemberProfile {
    /// "First Surname", falling back to the email address and then the id
    pub fn display_name(&self) -> String {
        let name = [self.first_name.trim(), self.surname.trim()]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        if !name.is_empty() {
            return name;
        }

        match self.email.as_deref() {
            Some(email) if !email.is_empty() => email.to_string(),
            _ => format!("Member #{}", self.id),
        }
    }

    /// Path of the host's member edit page
    pub fn edit_link(id: MemberId) -> String {
        format!("/admin/security/EditForm/field/Members/item/{}/edit", id)
    }

    /// Case-insensitive partial match on first name and surname.
    /// Absent or empty needles don't constrain.
    pub fn matches_name(&self, first_contains: Option<&str>, last_contains: Option<&str>) -> bool {
        fn contains(haystack: &str, needle: Option<&str>) -> bool {
            match needle.map(str::trim) {
                None | Some("") => true,
                Some(needle) => haystack.to_lowercase().contains(&needle.to_lowercase()),
            }
        }

        contains(&self.first_name, first_contains) && contains(&self.surname, last_contains)
    }
}

/// Body of the host's member sync request
#[derive(Debug, Deserialize)]
pub struct UpsertMemberRequest {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub surname: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub groups: Vec<String>,
}

impl UpsertMemberRequest {
    pub fn into_profile(self, id: MemberId) -> MemberProfile {
        MemberProfile {
            id,
            first_name: self.first_name,
            surname: self.surname,
            email: self.email,
            groups: self.groups,
        }
    }
}
