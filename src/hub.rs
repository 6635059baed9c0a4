//! Pitch Hub resources.
//!
//! Every resource list lives under its pitch, so cache keys and API paths share
//! one layout:
//!
//! | Resource | Base key | Path |
//! |----------|----------|------|
//! | proposals | `["pitches", id, "proposals"]` | `/pitches/{id}/proposals` |
//! | documents | `["pitches", id, "documents"]` | `/pitches/{id}/documents` |
//! | videos | `["pitches", id, "videos"]` | `/pitches/{id}/videos` |
//! | meeting notes | `["pitches", id, "meeting-notes"]` | `/pitches/{id}/meeting-notes` |
//! | threads | `["pitches", id, "threads"]` | `/pitches/{id}/threads` |
//! | engagement | `["pitches", id, "engagement"]` | `/pitches/{id}/engagement` |

use crate::client::{QueryClient, QueryRequest};
use crate::error::{Error, ErrorContext};
use crate::query::{QueryKey, QueryParams};
use crate::Result;
use serde::de::DeserializeOwned;
use std::fmt;
use std::str::FromStr;
use tracing::info;

const PITCHES: &str = "pitches";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Proposals,
    Documents,
    Videos,
    MeetingNotes,
    Threads,
    Engagement,
}

impl Resource {
    pub const ALL: [Resource; 6] = [
        Resource::Proposals,
        Resource::Documents,
        Resource::Videos,
        Resource::MeetingNotes,
        Resource::Threads,
        Resource::Engagement,
    ];

    pub fn segment(&self) -> &'static str {
        match self {
            Resource::Proposals => "proposals",
            Resource::Documents => "documents",
            Resource::Videos => "videos",
            Resource::MeetingNotes => "meeting-notes",
            Resource::Threads => "threads",
            Resource::Engagement => "engagement",
        }
    }

    pub fn base_key(&self, pitch_id: &str) -> QueryKey {
        pitch_key(pitch_id).child(self.segment())
    }

    pub fn key(&self, pitch_id: &str, params: Option<&QueryParams>) -> Result<QueryKey> {
        self.base_key(pitch_id).with_params(params)
    }

    pub fn path(&self, pitch_id: &str) -> String {
        format!(
            "/{}/{}/{}",
            PITCHES,
            encode_segment(pitch_id),
            self.segment()
        )
    }

    pub fn request(&self, pitch_id: &str, params: Option<QueryParams>) -> QueryRequest {
        let request = QueryRequest::new(self.base_key(pitch_id), self.path(pitch_id));
        match params {
            Some(p) => request.with_params(p),
            None => request,
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.segment())
    }
}

impl FromStr for Resource {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Resource::ALL
            .into_iter()
            .find(|r| r.segment() == s || r.segment().replace('-', "_") == s)
            .ok_or_else(|| {
                Error::validation_with_context(
                    format!("unknown resource '{}'", s),
                    ErrorContext::new().with_details(
                        Resource::ALL
                            .iter()
                            .map(|r| r.segment())
                            .collect::<Vec<_>>()
                            .join(", "),
                    ),
                )
            })
    }
}

/// Prefix shared by everything cached for one pitch.
pub fn pitch_key(pitch_id: &str) -> QueryKey {
    QueryKey::new([PITCHES, pitch_id])
}

fn encode_segment(segment: &str) -> String {
    url::form_urlencoded::byte_serialize(segment.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

/// Resource-level reads on top of a [`QueryClient`].
#[derive(Clone)]
pub struct PitchHub {
    client: QueryClient,
}

impl PitchHub {
    pub fn new(client: QueryClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &QueryClient {
        &self.client
    }

    pub async fn list<T: DeserializeOwned>(
        &self,
        resource: Resource,
        pitch_id: &str,
        params: Option<QueryParams>,
    ) -> Result<T> {
        self.client
            .fetch_query(&resource.request(pitch_id, params))
            .await
    }

    /// Forgets every cached list of one pitch.
    pub async fn invalidate_pitch(&self, pitch_id: &str) -> Result<usize> {
        let removed = self.client.invalidate(&pitch_key(pitch_id)).await?;
        info!(pitch_id, removed, "pitch cache invalidated");
        Ok(removed)
    }

    pub async fn invalidate_resource(&self, resource: Resource, pitch_id: &str) -> Result<usize> {
        self.client.invalidate(&resource.base_key(pitch_id)).await
    }
}
