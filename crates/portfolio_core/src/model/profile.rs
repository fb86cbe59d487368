//! Profile singleton.
//!
//! Exactly one profile exists per deployment. It has no id-keyed semantics;
//! callers only patch fields.

use super::list::{deserialize_list, normalize_list, ListInput};
use super::validation::{clean_optional, require_text_if_set};
use super::{defaults, ResourceKind, ValidationError};
use serde::{Deserialize, Serialize};

const KIND: ResourceKind = ResourceKind::Profile;

/// Owner profile shown on the landing and contact sections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub name: String,
    /// Headline, e.g. `Full-Stack Developer`.
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub profile_picture: Option<String>,
    #[serde(default)]
    pub resume_url: Option<String>,
    #[serde(default)]
    pub github_url: Option<String>,
    #[serde(default)]
    pub linkedin_url: Option<String>,
    #[serde(default)]
    pub twitter_url: Option<String>,
    #[serde(default, deserialize_with = "deserialize_list")]
    pub skills: Vec<String>,
}

impl Profile {
    /// Built-in profile used when nothing is stored anywhere.
    pub fn builtin() -> Self {
        defaults::default_profile()
    }

    /// Applies a prepared patch in place.
    pub fn apply_patch(&mut self, patch: &ProfilePatch) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(title) = &patch.title {
            self.title = title.clone();
        }
        if let Some(bio) = &patch.bio {
            self.bio = bio.clone();
        }
        if let Some(email) = &patch.email {
            self.email = Some(email.clone());
        }
        if let Some(phone) = &patch.phone {
            self.phone = Some(phone.clone());
        }
        if let Some(location) = &patch.location {
            self.location = Some(location.clone());
        }
        if let Some(profile_picture) = &patch.profile_picture {
            self.profile_picture = Some(profile_picture.clone());
        }
        if let Some(resume_url) = &patch.resume_url {
            self.resume_url = Some(resume_url.clone());
        }
        if let Some(github_url) = &patch.github_url {
            self.github_url = Some(github_url.clone());
        }
        if let Some(linkedin_url) = &patch.linkedin_url {
            self.linkedin_url = Some(linkedin_url.clone());
        }
        if let Some(twitter_url) = &patch.twitter_url {
            self.twitter_url = Some(twitter_url.clone());
        }
        if let Some(skills) = patch.skill_list() {
            self.skills = skills.to_vec();
        }
    }

    pub(crate) fn normalize(&mut self) {
        self.skills = normalize_list(std::mem::take(&mut self.skills));
    }
}

/// Field-level profile update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfilePatch {
    pub name: Option<String>,
    pub title: Option<String>,
    pub bio: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub profile_picture: Option<String>,
    pub resume_url: Option<String>,
    pub github_url: Option<String>,
    pub linkedin_url: Option<String>,
    pub twitter_url: Option<String>,
    pub skills: Option<ListInput>,
}

impl ProfilePatch {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn bio(mut self, bio: impl Into<String>) -> Self {
        self.bio = Some(bio.into());
        self
    }

    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn profile_picture(mut self, url: impl Into<String>) -> Self {
        self.profile_picture = Some(url.into());
        self
    }

    pub fn skills(mut self, skills: impl Into<ListInput>) -> Self {
        self.skills = Some(skills.into());
        self
    }

    /// Canonical skills, valid after `prepare`.
    pub fn skill_list(&self) -> Option<&[String]> {
        match &self.skills {
            Some(ListInput::Items(items)) => Some(items.as_slice()),
            _ => None,
        }
    }

    /// Normalizes list fields and rejects a blank name.
    pub fn prepare(mut self) -> Result<Self, ValidationError> {
        self.name = self.name.map(|value| value.trim().to_string());
        self.email = clean_optional(self.email);
        self.skills = self
            .skills
            .map(|value| ListInput::Items(value.into_canonical()));

        require_text_if_set(KIND, "name", self.name.as_deref())?;
        if let Some(email) = &self.email {
            if !email.contains('@') {
                return Err(ValidationError::invalid(
                    KIND,
                    "email",
                    "expected an address containing `@`",
                ));
            }
        }
        Ok(self)
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}
