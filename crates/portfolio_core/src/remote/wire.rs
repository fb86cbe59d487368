//! Wire shapes for the remote REST service.
//!
//! The service speaks snake_case column names (`date_issued`, `verify_url`,
//! `profile_picture`, `badge_url`); in-memory records and snapshots use
//! camelCase. Rows decode into domain records here and drafts/patches encode
//! into request bodies here, so no other module sees wire naming.

use crate::model::certificate::{Certificate, CertificateDraft, CertificatePatch};
use crate::model::list::deserialize_list;
use crate::model::profile::{Profile, ProfilePatch};
use crate::model::project::{Project, ProjectDraft, ProjectPatch};
use crate::model::ResourceId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
pub struct ProjectRow {
    pub id: ResourceId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub long_description: Option<String>,
    #[serde(default, deserialize_with = "deserialize_list")]
    pub technologies: Vec<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub github_url: Option<String>,
    #[serde(default)]
    pub live_url: Option<String>,
    #[serde(default)]
    pub featured: Option<bool>,
    #[serde(default)]
    pub date: Option<String>,
}

impl From<ProjectRow> for Project {
    fn from(row: ProjectRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            description: row.description.unwrap_or_default(),
            long_description: row.long_description,
            technologies: row.technologies,
            category: row.category.unwrap_or_default(),
            image: row.image,
            github_url: row.github_url,
            live_url: row.live_url,
            featured: row.featured.unwrap_or(false),
            date: row.date,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProjectInsert<'a> {
    pub title: &'a str,
    pub description: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub long_description: Option<&'a str>,
    pub technologies: &'a [String],
    pub category: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github_url: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub live_url: Option<&'a str>,
    pub featured: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<&'a str>,
}

impl<'a> From<&'a ProjectDraft> for ProjectInsert<'a> {
    fn from(draft: &'a ProjectDraft) -> Self {
        Self {
            title: &draft.title,
            description: &draft.description,
            long_description: draft.long_description.as_deref(),
            technologies: &draft.technologies,
            category: &draft.category,
            image: draft.image.as_deref(),
            github_url: draft.github_url.as_deref(),
            live_url: draft.live_url.as_deref(),
            featured: draft.featured.unwrap_or(false),
            date: draft.date.as_deref(),
        }
    }
}

#[derive(Debug, Default, Serialize)]
pub struct ProjectChanges<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub long_description: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub technologies: Option<&'a [String]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github_url: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub live_url: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub featured: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<&'a str>,
}

impl<'a> From<&'a ProjectPatch> for ProjectChanges<'a> {
    fn from(patch: &'a ProjectPatch) -> Self {
        Self {
            title: patch.title.as_deref(),
            description: patch.description.as_deref(),
            long_description: patch.long_description.as_deref(),
            technologies: patch.technology_list(),
            category: patch.category.as_deref(),
            image: patch.image.as_deref(),
            github_url: patch.github_url.as_deref(),
            live_url: patch.live_url.as_deref(),
            featured: patch.featured,
            date: patch.date.as_deref(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CertificateRow {
    pub id: ResourceId,
    pub title: String,
    #[serde(default)]
    pub issuer: Option<String>,
    #[serde(default)]
    pub platform: Option<String>,
    #[serde(default)]
    pub date_issued: Option<String>,
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
    pub featured: Option<bool>,
}

impl From<CertificateRow> for Certificate {
    fn from(row: CertificateRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            issuer: row.issuer.unwrap_or_default(),
            platform: row.platform.unwrap_or_default(),
            date_issued: row.date_issued.unwrap_or_default(),
            credential_id: row.credential_id,
            verify_url: row.verify_url,
            badge_url: row.badge_url,
            skills: row.skills,
            description: row.description,
            category: row.category,
            featured: row.featured.unwrap_or(false),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CertificateInsert<'a> {
    pub title: &'a str,
    pub issuer: &'a str,
    pub platform: &'a str,
    pub date_issued: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credential_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verify_url: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub badge_url: Option<&'a str>,
    pub skills: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<&'a str>,
    pub featured: bool,
}

impl<'a> From<&'a CertificateDraft> for CertificateInsert<'a> {
    fn from(draft: &'a CertificateDraft) -> Self {
        Self {
            title: &draft.title,
            issuer: &draft.issuer,
            platform: &draft.platform,
            date_issued: &draft.date_issued,
            credential_id: draft.credential_id.as_deref(),
            verify_url: draft.verify_url.as_deref(),
            badge_url: draft.badge_url.as_deref(),
            skills: &draft.skills,
            description: draft.description.as_deref(),
            category: draft.category.as_deref(),
            featured: draft.featured.unwrap_or(false),
        }
    }
}

#[derive(Debug, Default, Serialize)]
pub struct CertificateChanges<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issuer: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_issued: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credential_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verify_url: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub badge_url: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skills: Option<&'a [String]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub featured: Option<bool>,
}

impl<'a> From<&'a CertificatePatch> for CertificateChanges<'a> {
    fn from(patch: &'a CertificatePatch) -> Self {
        Self {
            title: patch.title.as_deref(),
            issuer: patch.issuer.as_deref(),
            platform: patch.platform.as_deref(),
            date_issued: patch.date_issued.as_deref(),
            credential_id: patch.credential_id.as_deref(),
            verify_url: patch.verify_url.as_deref(),
            badge_url: patch.badge_url.as_deref(),
            skills: patch.skill_list(),
            description: patch.description.as_deref(),
            category: patch.category.as_deref(),
            featured: patch.featured,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProfileRow {
    /// Row key; only used to address the singleton for updates.
    #[serde(default)]
    pub id: Option<ResourceId>,
    pub name: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
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

impl From<ProfileRow> for Profile {
    fn from(row: ProfileRow) -> Self {
        Self {
            name: row.name,
            title: row.title.unwrap_or_default(),
            bio: row.bio.unwrap_or_default(),
            email: row.email,
            phone: row.phone,
            location: row.location,
            profile_picture: row.profile_picture,
            resume_url: row.resume_url,
            github_url: row.github_url,
            linkedin_url: row.linkedin_url,
            twitter_url: row.twitter_url,
            skills: row.skills,
        }
    }
}

#[derive(Debug, Default, Serialize)]
pub struct ProfileChanges<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_picture: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resume_url: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github_url: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linkedin_url: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub twitter_url: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skills: Option<&'a [String]>,
}

impl<'a> From<&'a ProfilePatch> for ProfileChanges<'a> {
    fn from(patch: &'a ProfilePatch) -> Self {
        Self {
            name: patch.name.as_deref(),
            title: patch.title.as_deref(),
            bio: patch.bio.as_deref(),
            email: patch.email.as_deref(),
            phone: patch.phone.as_deref(),
            location: patch.location.as_deref(),
            profile_picture: patch.profile_picture.as_deref(),
            resume_url: patch.resume_url.as_deref(),
            github_url: patch.github_url.as_deref(),
            linkedin_url: patch.linkedin_url.as_deref(),
            twitter_url: patch.twitter_url.as_deref(),
            skills: patch.skill_list(),
        }
    }
}

/// Full profile body: creates the singleton row, and as a PATCH body replaces
/// every column, writing `null` for empty optionals.
#[derive(Debug, Serialize)]
pub struct ProfileInsert<'a> {
    pub name: &'a str,
    pub title: &'a str,
    pub bio: &'a str,
    pub email: Option<&'a str>,
    pub phone: Option<&'a str>,
    pub location: Option<&'a str>,
    pub profile_picture: Option<&'a str>,
    pub resume_url: Option<&'a str>,
    pub github_url: Option<&'a str>,
    pub linkedin_url: Option<&'a str>,
    pub twitter_url: Option<&'a str>,
    pub skills: &'a [String],
}

impl<'a> From<&'a Profile> for ProfileInsert<'a> {
    fn from(profile: &'a Profile) -> Self {
        Self {
            name: &profile.name,
            title: &profile.title,
            bio: &profile.bio,
            email: profile.email.as_deref(),
            phone: profile.phone.as_deref(),
            location: profile.location.as_deref(),
            profile_picture: profile.profile_picture.as_deref(),
            resume_url: profile.resume_url.as_deref(),
            github_url: profile.github_url.as_deref(),
            linkedin_url: profile.linkedin_url.as_deref(),
            twitter_url: profile.twitter_url.as_deref(),
            skills: &profile.skills,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{CertificateChanges, CertificateRow, ProfileInsert, ProjectInsert};
    use crate::model::certificate::{Certificate, CertificatePatch};
    use crate::model::profile::Profile;
    use crate::model::project::ProjectDraft;
    use crate::model::{ResourceDraft, ResourcePatch};
    use serde_json::json;

    #[test]
    fn certificate_row_translates_snake_case_columns() {
        let row: CertificateRow = serde_json::from_value(json!({
            "id": 12,
            "title": "Rust Fundamentals",
            "issuer": "Linux Foundation",
            "platform": "edX",
            "date_issued": "2024-05-02",
            "verify_url": "https://verify.example/abc",
            "badge_url": "https://cdn.example/badge.png",
            "skills": "Rust, Ownership",
            "featured": null
        }))
        .expect("row decodes");
        let certificate = Certificate::from(row);
        assert_eq!(certificate.id.as_str(), "12");
        assert_eq!(certificate.date_issued, "2024-05-02");
        assert_eq!(certificate.verify_url.as_deref(), Some("https://verify.example/abc"));
        assert_eq!(certificate.skills, vec!["Rust", "Ownership"]);
        assert!(!certificate.featured);

        let camel = serde_json::to_value(&certificate).unwrap();
        assert_eq!(camel["dateIssued"], "2024-05-02");
        assert_eq!(camel["badgeUrl"], "https://cdn.example/badge.png");
    }

    #[test]
    fn insert_body_uses_snake_case_and_skips_unset_fields() {
        let draft = ProjectDraft::new("CLI", "Terminal tool", "Rust", "tools")
            .with_links(Some("https://github.com/x/cli".to_string()), None)
            .prepare()
            .unwrap();
        let body = serde_json::to_value(ProjectInsert::from(&draft)).unwrap();
        assert_eq!(body["github_url"], "https://github.com/x/cli");
        assert!(body.get("live_url").is_none());
        assert_eq!(body["featured"], false);
    }

    #[test]
    fn changes_body_contains_only_patched_fields() {
        let patch = CertificatePatch::default()
            .badge_url("https://cdn.example/new.png")
            .prepare()
            .unwrap();
        let body = serde_json::to_value(CertificateChanges::from(&patch)).unwrap();
        assert_eq!(body, json!({ "badge_url": "https://cdn.example/new.png" }));
    }

    #[test]
    fn profile_body_writes_null_for_cleared_fields() {
        let body = serde_json::to_value(ProfileInsert::from(&Profile::builtin())).unwrap();
        assert_eq!(body["name"], "Alex Rivera");
        assert!(body["profile_picture"].is_null());
        assert!(body["phone"].is_null());
        assert!(body["linkedin_url"].is_null());
        assert!(body.get("linkedin_url").is_some());
    }
}
