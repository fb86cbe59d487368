//! Project records.
//!
//! # Invariants
//! - `technologies` is canonical and, for validated input, non-empty.
//! - `title`, `description` and `category` are never blank after `prepare`.

use super::list::{deserialize_list, normalize_list, ListInput};
use super::validation::{clean_optional, require_text, require_text_if_set};
use super::{
    defaults, InsertPosition, Resource, ResourceDraft, ResourceId, ResourceKind, ResourcePatch,
    ValidationError,
};
use serde::{Deserialize, Serialize};

const KIND: ResourceKind = ResourceKind::Project;

/// One portfolio project.
///
/// Serialized in camelCase; this is the snapshot and view shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: ResourceId,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub long_description: Option<String>,
    #[serde(default, deserialize_with = "deserialize_list")]
    pub technologies: Vec<String>,
    #[serde(default)]
    pub category: String,
    /// Cover image URL.
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub github_url: Option<String>,
    #[serde(default)]
    pub live_url: Option<String>,
    #[serde(default)]
    pub featured: bool,
    /// `YYYY-MM-DD` or `YYYY-MM`.
    #[serde(default)]
    pub date: Option<String>,
}

/// Creation input for a project.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectDraft {
    pub title: String,
    pub description: String,
    pub long_description: Option<String>,
    #[serde(deserialize_with = "deserialize_list")]
    pub technologies: Vec<String>,
    pub category: String,
    pub image: Option<String>,
    pub github_url: Option<String>,
    pub live_url: Option<String>,
    pub featured: Option<bool>,
    pub date: Option<String>,
}

impl ProjectDraft {
    /// Creates a draft with the four required fields.
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        technologies: impl Into<ListInput>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            technologies: technologies.into().into_canonical(),
            category: category.into(),
            ..Self::default()
        }
    }

    pub fn with_technologies(mut self, technologies: impl Into<ListInput>) -> Self {
        self.technologies = technologies.into().into_canonical();
        self
    }

    pub fn with_featured(mut self, featured: bool) -> Self {
        self.featured = Some(featured);
        self
    }

    pub fn with_links(mut self, github_url: Option<String>, live_url: Option<String>) -> Self {
        self.github_url = github_url;
        self.live_url = live_url;
        self
    }
}

impl ResourceDraft for ProjectDraft {
    fn prepare(mut self) -> Result<Self, ValidationError> {
        self.title = self.title.trim().to_string();
        self.description = self.description.trim().to_string();
        self.category = self.category.trim().to_string();
        self.technologies = normalize_list(self.technologies);
        self.long_description = clean_optional(self.long_description);
        self.image = clean_optional(self.image);
        self.github_url = clean_optional(self.github_url);
        self.live_url = clean_optional(self.live_url);
        self.date = clean_optional(self.date);

        require_text(KIND, "title", &self.title)?;
        require_text(KIND, "description", &self.description)?;
        if self.technologies.is_empty() {
            return Err(ValidationError::missing(KIND, "technologies"));
        }
        require_text(KIND, "category", &self.category)?;
        Ok(self)
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn set_title(&mut self, title: String) {
        self.title = title;
    }
}

/// Partial update for a project. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub long_description: Option<String>,
    pub technologies: Option<ListInput>,
    pub category: Option<String>,
    pub image: Option<String>,
    pub github_url: Option<String>,
    pub live_url: Option<String>,
    pub featured: Option<bool>,
    pub date: Option<String>,
}

impl ProjectPatch {
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn technologies(mut self, technologies: impl Into<ListInput>) -> Self {
        self.technologies = Some(technologies.into());
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    pub fn featured(mut self, featured: bool) -> Self {
        self.featured = Some(featured);
        self
    }

    /// Canonical technologies, valid after `prepare`.
    pub fn technology_list(&self) -> Option<&[String]> {
        match &self.technologies {
            Some(ListInput::Items(items)) => Some(items.as_slice()),
            _ => None,
        }
    }
}

impl ResourcePatch for ProjectPatch {
    fn prepare(mut self) -> Result<Self, ValidationError> {
        self.title = self.title.map(|value| value.trim().to_string());
        self.description = self.description.map(|value| value.trim().to_string());
        self.category = self.category.map(|value| value.trim().to_string());
        self.technologies = self
            .technologies
            .map(|value| ListInput::Items(value.into_canonical()));

        require_text_if_set(KIND, "title", self.title.as_deref())?;
        require_text_if_set(KIND, "description", self.description.as_deref())?;
        require_text_if_set(KIND, "category", self.category.as_deref())?;
        if matches!(self.technology_list(), Some([])) {
            return Err(ValidationError::missing(KIND, "technologies"));
        }
        Ok(self)
    }

    fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

impl Resource for Project {
    type Draft = ProjectDraft;
    type Patch = ProjectPatch;

    const KIND: ResourceKind = KIND;
    const INSERT_AT: InsertPosition = InsertPosition::Front;

    fn id(&self) -> &ResourceId {
        &self.id
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn is_featured(&self) -> bool {
        self.featured
    }

    fn from_draft(id: ResourceId, draft: ProjectDraft) -> Self {
        Self {
            id,
            title: draft.title,
            description: draft.description,
            long_description: draft.long_description,
            technologies: draft.technologies,
            category: draft.category,
            image: draft.image,
            github_url: draft.github_url,
            live_url: draft.live_url,
            featured: draft.featured.unwrap_or(false),
            date: draft.date,
        }
    }

    fn to_draft(&self) -> ProjectDraft {
        ProjectDraft {
            title: self.title.clone(),
            description: self.description.clone(),
            long_description: self.long_description.clone(),
            technologies: self.technologies.clone(),
            category: self.category.clone(),
            image: self.image.clone(),
            github_url: self.github_url.clone(),
            live_url: self.live_url.clone(),
            featured: Some(self.featured),
            date: self.date.clone(),
        }
    }

    fn apply_patch(&mut self, patch: &ProjectPatch) {
        if let Some(title) = &patch.title {
            self.title = title.clone();
        }
        if let Some(description) = &patch.description {
            self.description = description.clone();
        }
        if let Some(long_description) = &patch.long_description {
            self.long_description = Some(long_description.clone());
        }
        if let Some(technologies) = patch.technology_list() {
            self.technologies = technologies.to_vec();
        }
        if let Some(category) = &patch.category {
            self.category = category.clone();
        }
        if let Some(image) = &patch.image {
            self.image = Some(image.clone());
        }
        if let Some(github_url) = &patch.github_url {
            self.github_url = Some(github_url.clone());
        }
        if let Some(live_url) = &patch.live_url {
            self.live_url = Some(live_url.clone());
        }
        if let Some(featured) = patch.featured {
            self.featured = featured;
        }
        if let Some(date) = &patch.date {
            self.date = Some(date.clone());
        }
    }

    fn featured_patch(featured: bool) -> ProjectPatch {
        ProjectPatch::default().featured(featured)
    }

    fn defaults() -> Vec<Self> {
        defaults::default_projects()
    }

    fn normalize(&mut self) {
        self.technologies = normalize_list(std::mem::take(&mut self.technologies));
    }
}
