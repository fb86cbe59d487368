//! REST adapter for the remote data service.
//!
//! Talks to a PostgREST-style API (`/rest/v1/<table>`) and an object storage
//! API (`/storage/v1/object/<bucket>/<path>`). Every call short-circuits with
//! `RemoteError::NotConfigured` when the endpoint or key is a placeholder, so
//! a fresh checkout runs in degraded mode without touching the network.

use super::wire::{
    CertificateChanges, CertificateInsert, CertificateRow, ProfileChanges, ProfileInsert,
    ProfileRow, ProjectChanges, ProjectInsert, ProjectRow,
};
use super::{
    AssetStore, AssetUpload, CollectionRemote, ProfileRemote, RemoteError, RemoteResult,
};
use crate::config::RemoteConfig;
use crate::model::certificate::{Certificate, CertificateDraft, CertificatePatch};
use crate::model::profile::{Profile, ProfilePatch};
use crate::model::project::{Project, ProjectDraft, ProjectPatch};
use crate::model::{ResourceId, ResourceKind};
use async_trait::async_trait;
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use uuid::Uuid;

static UNSAFE_FILE_CHARS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^A-Za-z0-9._-]+").expect("valid file name regex"));

const MAX_ERROR_BODY_CHARS: usize = 200;
const APIKEY_HEADER: &str = "apikey";
const PREFER_HEADER: &str = "prefer";
const UPSERT_HEADER: &str = "x-upsert";

/// HTTP client for the remote data service.
#[derive(Debug, Clone)]
pub struct HttpRemote {
    client: reqwest::Client,
    config: RemoteConfig,
}

impl HttpRemote {
    pub fn new(config: RemoteConfig, timeout: Duration) -> RemoteResult<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, config })
    }

    pub fn is_configured(&self) -> bool {
        self.config.is_configured()
    }

    fn ensure_configured(&self) -> RemoteResult<()> {
        if self.config.is_configured() {
            Ok(())
        } else {
            Err(RemoteError::NotConfigured)
        }
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{table}", self.config.endpoint_url)
    }

    fn row_url(&self, table: &str, id: &ResourceId) -> String {
        format!(
            "{}?id=eq.{}",
            self.table_url(table),
            urlencoding::encode(id.as_str())
        )
    }

    fn public_object_url(&self, bucket: &str, path: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{bucket}/{path}",
            self.config.endpoint_url
        )
    }

    fn headers(&self, return_rows: bool) -> RemoteResult<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let key = HeaderValue::from_str(&self.config.access_key)
            .map_err(|_| RemoteError::Decode("access key is not a valid header value".into()))?;
        let bearer = HeaderValue::from_str(&format!("Bearer {}", self.config.access_key))
            .map_err(|_| RemoteError::Decode("access key is not a valid header value".into()))?;
        headers.insert(HeaderName::from_static(APIKEY_HEADER), key);
        headers.insert(AUTHORIZATION, bearer);
        if return_rows {
            headers.insert(
                HeaderName::from_static(PREFER_HEADER),
                HeaderValue::from_static("return=representation"),
            );
        }
        Ok(headers)
    }

    async fn parse_response<T: DeserializeOwned>(response: reqwest::Response) -> RemoteResult<T> {
        let status = response.status();
        let body = response.text().await?;
        debug!(
            "event=remote_response module=remote status={} bytes={}",
            status.as_u16(),
            body.len()
        );

        if !status.is_success() {
            let message: String = body.chars().take(MAX_ERROR_BODY_CHARS).collect();
            return Err(RemoteError::status(status.as_u16(), message));
        }

        serde_json::from_str(&body).map_err(|err| RemoteError::Decode(err.to_string()))
    }

    async fn select_rows<T: DeserializeOwned>(&self, table: &str, order: &str) -> RemoteResult<T> {
        self.ensure_configured()?;
        let url = format!("{}?select=*&order={order}", self.table_url(table));
        let response = self
            .client
            .get(&url)
            .headers(self.headers(false)?)
            .send()
            .await?;
        Self::parse_response(response).await
    }

    async fn insert_row<B, T>(&self, table: &str, body: &B) -> RemoteResult<T>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        self.ensure_configured()?;
        let response = self
            .client
            .post(self.table_url(table))
            .headers(self.headers(true)?)
            .json(body)
            .send()
            .await?;
        let mut rows: Vec<T> = Self::parse_response(response).await?;
        first_row(&mut rows, "insert")
    }

    async fn update_row<B, T>(&self, table: &str, id: &ResourceId, body: &B) -> RemoteResult<T>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        self.ensure_configured()?;
        let response = self
            .client
            .patch(self.row_url(table, id))
            .headers(self.headers(true)?)
            .json(body)
            .send()
            .await?;
        let mut rows: Vec<T> = Self::parse_response(response).await?;
        first_row(&mut rows, "update")
    }

    async fn delete_row(&self, table: &str, id: &ResourceId) -> RemoteResult<bool> {
        self.ensure_configured()?;
        let response = self
            .client
            .delete(self.row_url(table, id))
            .headers(self.headers(true)?)
            .send()
            .await?;
        let rows: Vec<serde_json::Value> = Self::parse_response(response).await?;
        Ok(!rows.is_empty())
    }

    async fn profile_row(&self) -> RemoteResult<Option<ProfileRow>> {
        self.ensure_configured()?;
        let url = format!("{}?select=*&limit=1", self.table_url(ResourceKind::Profile.table()));
        let response = self
            .client
            .get(&url)
            .headers(self.headers(false)?)
            .send()
            .await?;
        let mut rows: Vec<ProfileRow> = Self::parse_response(response).await?;
        Ok(if rows.is_empty() {
            None
        } else {
            Some(rows.swap_remove(0))
        })
    }
}

fn first_row<T>(rows: &mut Vec<T>, operation: &'static str) -> RemoteResult<T> {
    if rows.is_empty() {
        return Err(RemoteError::EmptyResponse(operation));
    }
    Ok(rows.swap_remove(0))
}

/// Builds a collision-free storage object path from a user file name.
fn object_path(file_name: &str) -> String {
    let sanitized = UNSAFE_FILE_CHARS_RE.replace_all(file_name.trim(), "-");
    let sanitized = sanitized.trim_matches('-');
    if sanitized.is_empty() {
        Uuid::new_v4().to_string()
    } else {
        format!("{}-{sanitized}", Uuid::new_v4())
    }
}

#[async_trait]
impl CollectionRemote<Project> for HttpRemote {
    async fn get_all(&self) -> RemoteResult<Vec<Project>> {
        let rows: Vec<ProjectRow> = self
            .select_rows(ResourceKind::Project.table(), "id.desc")
            .await?;
        Ok(rows.into_iter().map(Project::from).collect())
    }

    async fn add(&self, draft: &ProjectDraft) -> RemoteResult<Project> {
        let row: ProjectRow = self
            .insert_row(ResourceKind::Project.table(), &ProjectInsert::from(draft))
            .await?;
        Ok(row.into())
    }

    async fn update(&self, id: &ResourceId, patch: &ProjectPatch) -> RemoteResult<Project> {
        let row: ProjectRow = self
            .update_row(
                ResourceKind::Project.table(),
                id,
                &ProjectChanges::from(patch),
            )
            .await?;
        Ok(row.into())
    }

    async fn delete(&self, id: &ResourceId) -> RemoteResult<bool> {
        self.delete_row(ResourceKind::Project.table(), id).await
    }
}

#[async_trait]
impl CollectionRemote<Certificate> for HttpRemote {
    async fn get_all(&self) -> RemoteResult<Vec<Certificate>> {
        let rows: Vec<CertificateRow> = self
            .select_rows(ResourceKind::Certificate.table(), "id.asc")
            .await?;
        Ok(rows.into_iter().map(Certificate::from).collect())
    }

    async fn add(&self, draft: &CertificateDraft) -> RemoteResult<Certificate> {
        let row: CertificateRow = self
            .insert_row(
                ResourceKind::Certificate.table(),
                &CertificateInsert::from(draft),
            )
            .await?;
        Ok(row.into())
    }

    async fn update(
        &self,
        id: &ResourceId,
        patch: &CertificatePatch,
    ) -> RemoteResult<Certificate> {
        let row: CertificateRow = self
            .update_row(
                ResourceKind::Certificate.table(),
                id,
                &CertificateChanges::from(patch),
            )
            .await?;
        Ok(row.into())
    }

    async fn delete(&self, id: &ResourceId) -> RemoteResult<bool> {
        self.delete_row(ResourceKind::Certificate.table(), id).await
    }
}

#[async_trait]
impl ProfileRemote for HttpRemote {
    async fn get_profile(&self) -> RemoteResult<Option<Profile>> {
        Ok(self.profile_row().await?.map(Profile::from))
    }

    async fn update_profile(&self, patch: &ProfilePatch) -> RemoteResult<Profile> {
        let table = ResourceKind::Profile.table();
        match self.profile_row().await? {
            Some(ProfileRow { id: Some(id), .. }) => {
                let row: ProfileRow = self
                    .update_row(table, &id, &ProfileChanges::from(patch))
                    .await?;
                Ok(row.into())
            }
            existing => {
                // No addressable row yet: create the singleton from what we know.
                let mut profile = existing.map(Profile::from).unwrap_or_else(Profile::builtin);
                profile.apply_patch(patch);
                let row: ProfileRow = self
                    .insert_row(table, &ProfileInsert::from(&profile))
                    .await?;
                Ok(row.into())
            }
        }
    }

    async fn replace_profile(&self, profile: &Profile) -> RemoteResult<Profile> {
        let table = ResourceKind::Profile.table();
        // Why: the insert body serializes empty optionals as null, which is
        // what clears them on PATCH; the sparse changes body would skip them.
        let body = ProfileInsert::from(profile);
        let row: ProfileRow = match self.profile_row().await? {
            Some(ProfileRow { id: Some(id), .. }) => self.update_row(table, &id, &body).await?,
            _ => self.insert_row(table, &body).await?,
        };
        Ok(row.into())
    }
}

#[async_trait]
impl AssetStore for HttpRemote {
    async fn upload_asset(&self, kind: ResourceKind, upload: &AssetUpload) -> RemoteResult<String> {
        self.ensure_configured()?;
        let bucket = kind.asset_bucket();
        let path = object_path(&upload.file_name);
        let url = format!(
            "{}/storage/v1/object/{bucket}/{path}",
            self.config.endpoint_url
        );

        let mut headers = self.headers(false)?;
        let content_type = HeaderValue::from_str(&upload.content_type)
            .unwrap_or_else(|_| HeaderValue::from_static("application/octet-stream"));
        headers.insert(CONTENT_TYPE, content_type);
        headers.insert(
            HeaderName::from_static(UPSERT_HEADER),
            HeaderValue::from_static("true"),
        );

        let response = self
            .client
            .post(&url)
            .headers(headers)
            .body(upload.bytes.clone())
            .send()
            .await?;
        let _: serde_json::Value = Self::parse_response(response).await?;
        Ok(self.public_object_url(bucket, &path))
    }
}
