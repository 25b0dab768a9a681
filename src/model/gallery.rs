//! Gallery data types and the wire shapes they are decoded from

use std::fmt;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;

use super::error::FetchError;

/// Identifier of the collection being browsed (an event id)
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SubjectId(String);

impl SubjectId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SubjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque continuation token returned by the paged source
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cursor(String);

impl Cursor {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// One thumbnail in an event gallery. Immutable once fetched.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GalleryItem {
    pub id: String,
    pub media_url: String,
    pub created_at: DateTime<Utc>,
}

/// One fetched batch of items plus pagination metadata
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Page {
    pub items: Vec<GalleryItem>,
    pub next_cursor: Option<Cursor>,
    pub has_more: bool,
}

/// Kind of media stored for a session
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetKind {
    Image,
    Video,
    StripVideo,
}

impl AssetKind {
    pub fn label(self) -> &'static str {
        match self {
            AssetKind::Image => "photo",
            AssetKind::Video => "video",
            AssetKind::StripVideo => "strip",
        }
    }

    pub fn is_video(self) -> bool {
        matches!(self, AssetKind::Video | AssetKind::StripVideo)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionAsset {
    pub path: String,
    pub kind: AssetKind,
    pub url: String,
}

/// Everything captured during one photobooth session, in capture order
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionManifest {
    pub session_id: String,
    pub assets: Vec<SessionAsset>,
}

// ============================================================================
// Wire format
// ============================================================================

#[derive(Debug, Deserialize)]
pub(crate) struct SessionRecord {
    pub session_id: String,
    pub thumb_path: String,
    pub created_at: String,
}

/// `GET /events/{id}/sessions` body.
///
/// The pagination fields default so that an unpaginated event document is
/// read as a single, final page.
#[derive(Debug, Deserialize)]
pub(crate) struct SessionPageBody {
    #[serde(default)]
    pub sessions: Vec<SessionRecord>,
    #[serde(default)]
    pub next_cursor: Option<String>,
    #[serde(default)]
    pub has_more: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AssetRecord {
    pub path: String,
    pub kind: AssetKind,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ManifestBody {
    #[serde(default)]
    pub assets: Vec<AssetRecord>,
}

/// Build the public URL of a stored asset
pub fn asset_url(base_url: &str, path: &str) -> String {
    format!(
        "{}/assets/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Accepts RFC 3339, or a naive ISO timestamp which is taken as UTC
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, FetchError> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
        .map(|naive| naive.and_utc())
        .map_err(|_| FetchError::Malformed(format!("invalid created_at timestamp: {raw}")))
}

impl SessionPageBody {
    pub(crate) fn into_page(self, base_url: &str) -> Result<Page, FetchError> {
        let items = self
            .sessions
            .into_iter()
            .map(|record| {
                Ok(GalleryItem {
                    media_url: asset_url(base_url, &record.thumb_path),
                    created_at: parse_timestamp(&record.created_at)?,
                    id: record.session_id,
                })
            })
            .collect::<Result<Vec<_>, FetchError>>()?;

        Ok(Page {
            items,
            next_cursor: self.next_cursor.filter(|c| !c.is_empty()).map(Cursor::new),
            has_more: self.has_more,
        })
    }
}

impl ManifestBody {
    pub(crate) fn into_manifest(self, session_id: &str, base_url: &str) -> SessionManifest {
        SessionManifest {
            session_id: session_id.to_string(),
            assets: self
                .assets
                .into_iter()
                .map(|a| SessionAsset {
                    url: asset_url(base_url, &a.path),
                    path: a.path,
                    kind: a.kind,
                })
                .collect(),
        }
    }
}
