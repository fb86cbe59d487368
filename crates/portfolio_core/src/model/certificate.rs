//! Certificate records.
//!
//! # Invariants
//! - `skills` is canonical; it may be empty.
//! - `title`, `issuer`, `platform` and `date_issued` are never blank after
//!   `prepare`.

use super::list::{deserialize_list, normalize_list, ListInput};
use super::validation::{clean_optional, require_text, require_text_if_set};
use super::{
    defaults, InsertPosition, Resource, ResourceDraft, ResourceId, ResourceKind, ResourcePatch,
    ValidationError,
};
use serde::{Deserialize, Serialize};

const KIND: ResourceKind = ResourceKind::Certificate;

/// One earned certificate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Certificate {
    pub id: ResourceId,
    pub title: String,
    pub issuer: String,
    /// Learning platform, e.g. `Coursera`.
    #[serde(default)]
    pub platform: String,
    /// `YYYY-MM-DD` or `YYYY-MM`.
    #[serde(default)]
    pub date_issued: String,
    #[serde(default)]
    pub credential_id: Option<String>,
    #[serde(default)]
    pub verify_url: Option<String>,
    #[serde(default)]
    pub badge_url: Option<String>,
    #[serde(default, deserialize_with = "deserialize_list")]
    pub skills: Vec<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub featured: bool,
}

/// Creation input for a certificate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CertificateDraft {
    pub title: String,
    pub issuer: String,
    pub platform: String,
    pub date_issued: String,
    pub credential_id: Option<String>,
    pub verify_url: Option<String>,
    pub badge_url: Option<String>,
    #[serde(deserialize_with = "deserialize_list")]
    pub skills: Vec<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub featured: Option<bool>,
}

impl CertificateDraft {
    pub fn new(
        title: impl Into<String>,
        issuer: impl Into<String>,
        platform: impl Into<String>,
        date_issued: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            issuer: issuer.into(),
            platform: platform.into(),
            date_issued: date_issued.into(),
            ..Self::default()
        }
    }

    pub fn with_skills(mut self, skills: impl Into<ListInput>) -> Self {
        self.skills = skills.into().into_canonical();
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_featured(mut self, featured: bool) -> Self {
        self.featured = Some(featured);
        self
    }
}

impl ResourceDraft for CertificateDraft {
    fn prepare(mut self) -> Result<Self, ValidationError> {
        self.title = self.title.trim().to_string();
        self.issuer = self.issuer.trim().to_string();
        self.platform = self.platform.trim().to_string();
        self.date_issued = self.date_issued.trim().to_string();
        self.skills = normalize_list(self.skills);
        self.credential_id = clean_optional(self.credential_id);
        self.verify_url = clean_optional(self.verify_url);
        self.badge_url = clean_optional(self.badge_url);
        self.description = clean_optional(self.description);
        self.category = clean_optional(self.category);

        require_text(KIND, "title", &self.title)?;
        require_text(KIND, "issuer", &self.issuer)?;
        require_text(KIND, "platform", &self.platform)?;
        require_text(KIND, "dateIssued", &self.date_issued)?;
        Ok(self)
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn set_title(&mut self, title: String) {
        self.title = title;
    }
}

/// Partial update for a certificate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CertificatePatch {
    pub title: Option<String>,
    pub issuer: Option<String>,
    pub platform: Option<String>,
    pub date_issued: Option<String>,
    pub credential_id: Option<String>,
    pub verify_url: Option<String>,
    pub badge_url: Option<String>,
    pub skills: Option<ListInput>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub featured: Option<bool>,
}

impl CertificatePatch {
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = Some(issuer.into());
        self
    }

    pub fn skills(mut self, skills: impl Into<ListInput>) -> Self {
        self.skills = Some(skills.into());
        self
    }

    pub fn badge_url(mut self, badge_url: impl Into<String>) -> Self {
        self.badge_url = Some(badge_url.into());
        self
    }

    pub fn featured(mut self, featured: bool) -> Self {
        self.featured = Some(featured);
        self
    }

    /// Canonical skills, valid after `prepare`.
    pub fn skill_list(&self) -> Option<&[String]> {
        match &self.skills {
            Some(ListInput::Items(items)) => Some(items.as_slice()),
            _ => None,
        }
    }
}

impl ResourcePatch for CertificatePatch {
    fn prepare(mut self) -> Result<Self, ValidationError> {
        self.title = self.title.map(|value| value.trim().to_string());
        self.issuer = self.issuer.map(|value| value.trim().to_string());
        self.platform = self.platform.map(|value| value.trim().to_string());
        self.date_issued = self.date_issued.map(|value| value.trim().to_string());
        self.skills = self
            .skills
            .map(|value| ListInput::Items(value.into_canonical()));

        require_text_if_set(KIND, "title", self.title.as_deref())?;
        require_text_if_set(KIND, "issuer", self.issuer.as_deref())?;
        require_text_if_set(KIND, "platform", self.platform.as_deref())?;
        require_text_if_set(KIND, "dateIssued", self.date_issued.as_deref())?;
        Ok(self)
    }

    fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

impl Resource for Certificate {
    type Draft = CertificateDraft;
    type Patch = CertificatePatch;

    const KIND: ResourceKind = KIND;
    const INSERT_AT: InsertPosition = InsertPosition::Back;

    fn id(&self) -> &ResourceId {
        &self.id
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn is_featured(&self) -> bool {
        self.featured
    }

    fn from_draft(id: ResourceId, draft: CertificateDraft) -> Self {
        Self {
            id,
            title: draft.title,
            issuer: draft.issuer,
            platform: draft.platform,
            date_issued: draft.date_issued,
            credential_id: draft.credential_id,
            verify_url: draft.verify_url,
            badge_url: draft.badge_url,
            skills: draft.skills,
            description: draft.description,
            category: draft.category,
            featured: draft.featured.unwrap_or(false),
        }
    }

    fn to_draft(&self) -> CertificateDraft {
        CertificateDraft {
            title: self.title.clone(),
            issuer: self.issuer.clone(),
            platform: self.platform.clone(),
            date_issued: self.date_issued.clone(),
            credential_id: self.credential_id.clone(),
            verify_url: self.verify_url.clone(),
            badge_url: self.badge_url.clone(),
            skills: self.skills.clone(),
            description: self.description.clone(),
            category: self.category.clone(),
            featured: Some(self.featured),
        }
    }

    fn apply_patch(&mut self, patch: &CertificatePatch) {
        if let Some(title) = &patch.title {
            self.title = title.clone();
        }
        if let Some(issuer) = &patch.issuer {
            self.issuer = issuer.clone();
        }
        if let Some(platform) = &patch.platform {
            self.platform = platform.clone();
        }
        if let Some(date_issued) = &patch.date_issued {
            self.date_issued = date_issued.clone();
        }
        if let Some(credential_id) = &patch.credential_id {
            self.credential_id = Some(credential_id.clone());
        }
        if let Some(verify_url) = &patch.verify_url {
            self.verify_url = Some(verify_url.clone());
        }
        if let Some(badge_url) = &patch.badge_url {
            self.badge_url = Some(badge_url.clone());
        }
        if let Some(skills) = patch.skill_list() {
            self.skills = skills.to_vec();
        }
        if let Some(description) = &patch.description {
            self.description = Some(description.clone());
        }
        if let Some(category) = &patch.category {
            self.category = Some(category.clone());
        }
        if let Some(featured) = patch.featured {
            self.featured = featured;
        }
    }

    fn featured_patch(featured: bool) -> CertificatePatch {
        CertificatePatch::default().featured(featured)
    }

    fn defaults() -> Vec<Self> {
        defaults::default_certificates()
    }

    fn normalize(&mut self) {
        self.skills = normalize_list(std::mem::take(&mut self.skills));
    }
}

#[cfg(test)]
mod tests {
    use super::{Certificate, CertificateDraft};
    use crate::model::{Resource, ResourceDraft, ResourceId};

    #[test]
    fn draft_reports_first_missing_required_field() {
        let err = CertificateDraft::new("AWS", "Amazon", "", "2024-01-10")
            .prepare()
            .unwrap_err();
        assert_eq!(err.field(), "platform");

        let err = CertificateDraft::new("AWS", "Amazon", "Udemy", " ")
            .prepare()
            .unwrap_err();
        assert_eq!(err.field(), "dateIssued");
    }

    #[test]
    fn to_draft_keeps_every_user_field() {
        let draft = CertificateDraft::new("AWS", "Amazon", "Udemy", "2024-01-10")
            .with_skills(vec!["Cloud", "IAM"])
            .with_featured(true)
            .prepare()
            .unwrap();
        let certificate = Certificate::from_draft(ResourceId::from("abc"), draft.clone());
        assert_eq!(certificate.to_draft(), draft);
    }
}
