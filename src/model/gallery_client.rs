//! Photobooth gallery API client

use std::sync::Arc;
use std::time::Duration;

use anyhow::bail;
use futures::future::BoxFuture;
use futures::FutureExt;
use reqwest::Url;

use super::error::FetchError;
use super::gallery::{Cursor, ManifestBody, Page, SessionManifest, SessionPageBody, SubjectId};
use crate::{log_api_request, log_api_result};

/// The remote side of the gallery: paged session thumbnails and per-session
/// manifests. Futures are `'static` so callers can spawn them.
pub trait GallerySource: Send + Sync {
    fn fetch_page(
        &self,
        subject: &SubjectId,
        cursor: Option<&Cursor>,
        limit: usize,
    ) -> BoxFuture<'static, Result<Page, FetchError>>;

    fn fetch_manifest(&self, session_id: &str) -> BoxFuture<'static, Result<SessionManifest, FetchError>>;
}

/// HTTP implementation of [`GallerySource`]
#[derive(Clone)]
pub struct GalleryClient {
    http: reqwest::Client,
    api: Url,
    base_url: Arc<str>,
}

impl GalleryClient {
    pub fn new(base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("booth-gallery/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let api = Url::parse(base_url)?;
        if api.cannot_be_a_base() {
            bail!("API base URL cannot carry a path: {base_url}");
        }

        Ok(Self {
            http,
            api,
            base_url: Arc::from(base_url.trim_end_matches('/')),
        })
    }

    /// API URL with `segments` appended, each percent-encoded as a single segment
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.api.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        http: reqwest::Client,
        url: Url,
        query: Vec<(&'static str, String)>,
    ) -> Result<T, FetchError> {
        let response = http.get(url.clone()).query(&query).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        Ok(response.json::<T>().await?)
    }
}

impl GallerySource for GalleryClient {
    fn fetch_page(
        &self,
        subject: &SubjectId,
        cursor: Option<&Cursor>,
        limit: usize,
    ) -> BoxFuture<'static, Result<Page, FetchError>> {
        let http = self.http.clone();
        let base_url = self.base_url.clone();
        let url = self.endpoint(&["events", subject.as_str(), "sessions"]);

        let mut query = vec![("limit", limit.to_string())];
        if let Some(cursor) = cursor {
            query.push(("cursor", cursor.as_str().to_string()));
        }

        log_api_request!("fetch_page", event_id = subject.as_str(), cursor = ?cursor.map(Cursor::as_str), limit);

        async move {
            let result = Self::get_json::<SessionPageBody>(http, url, query)
                .await
                .and_then(|body| body.into_page(&base_url));
            log_api_result!("fetch_page", result);
            result
        }
        .boxed()
    }

    fn fetch_manifest(&self, session_id: &str) -> BoxFuture<'static, Result<SessionManifest, FetchError>> {
        let http = self.http.clone();
        let base_url = self.base_url.clone();
        let session_id = session_id.to_string();
        let url = self.endpoint(&["sessions", session_id.as_str(), "manifest"]);

        log_api_request!("fetch_manifest", session_id = session_id.as_str());

        async move {
            let result = Self::get_json::<ManifestBody>(http, url, Vec::new())
                .await
                .map(|body| body.into_manifest(&session_id, &base_url));
            log_api_result!("fetch_manifest", result);
            result
        }
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> GalleryClient {
        GalleryClient::new(base, Duration::from_secs(1)).unwrap()
    }

    #[test]
    fn endpoints_extend_base_path() {
        let api = client("http://booth.local/api");
        assert_eq!(
            api.endpoint(&["events", "wedding", "sessions"]).as_str(),
            "http://booth.local/api/events/wedding/sessions"
        );

        let trailing = client("http://booth.local/api/");
        assert_eq!(
            trailing.endpoint(&["sessions", "s1", "manifest"]).as_str(),
            "http://booth.local/api/sessions/s1/manifest"
        );
    }

    #[test]
    fn typed_ids_stay_inside_one_segment() {
        let api = client("http://booth.local/api");
        let url = api.endpoint(&["events", "a/b?c#d", "sessions"]);
        assert_eq!(url.as_str(), "http://booth.local/api/events/a%2Fb%3Fc%23d/sessions");
        assert_eq!(url.query(), None);
        assert_eq!(url.fragment(), None);
    }

    #[test]
    fn non_hierarchical_base_is_rejected() {
        assert!(GalleryClient::new("mailto:booth@example.com", Duration::from_secs(1)).is_err());
        assert!(GalleryClient::new("not a url", Duration::from_secs(1)).is_err());
    }
}
