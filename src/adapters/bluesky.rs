//! Minimal AT Protocol client: one session per publisher, one
//! `app.bsky.feed.post` record per post.

use crate::core::Publisher;
use crate::utils::error::{BotError, Result};
use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use regex::Regex;
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::Mutex;

pub const DEFAULT_SERVICE: &str = "https://bsky.social";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

const POST_COLLECTION: &str = "app.bsky.feed.post";
const LINK_PATTERN: &str = r"(?:^|\s|\()(https?://\S+)";
const TAG_PATTERN: &str = r"(?:^|\s)([#＃])(\S+)";
const TRAILING_PUNCTUATION: &str = r"\p{P}+$";
// a tag needs at least one character that is not a digit or punctuation
const TAG_WORD: &str = r"[^\d\s\p{P}]";
const MAX_TAG_CHARS: usize = 64;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Session {
    access_jwt: String,
    did: String,
}

#[derive(Debug, Deserialize)]
struct XrpcError {
    error: Option<String>,
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CreatedRecord {
    uri: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ByteSlice {
    pub byte_start: usize,
    pub byte_end: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "$type")]
pub enum FacetFeature {
    #[serde(rename = "app.bsky.richtext.facet#link")]
    Link { uri: String },
    #[serde(rename = "app.bsky.richtext.facet#tag")]
    Tag { tag: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Facet {
    pub index: ByteSlice,
    pub features: Vec<FacetFeature>,
}

impl Facet {
    fn new(byte_start: usize, byte_end: usize, feature: FacetFeature) -> Self {
        Self {
            index: ByteSlice {
                byte_start,
                byte_end,
            },
            features: vec![feature],
        }
    }
}

/// Drop one trailing sentence mark, then a `)` that closes nothing in the URI.
fn trim_uri(uri: &str) -> &str {
    let uri = uri
        .strip_suffix(|c: char| ".,;:!?".contains(c))
        .unwrap_or(uri);
    match uri.strip_suffix(')') {
        Some(stripped) if !uri.contains('(') => stripped,
        _ => uri,
    }
}

/// Finds link and hashtag facets the way the Bluesky app does without
/// resolving mentions. Offsets are UTF-8 byte positions.
#[derive(Debug, Clone)]
pub struct FacetDetector {
    link: Regex,
    tag: Regex,
    trailing_punctuation: Regex,
    tag_word: Regex,
}

impl FacetDetector {
    pub fn new() -> Result<Self> {
        let compile = |pattern: &str| {
            Regex::new(pattern).map_err(|e| BotError::ProcessingError {
                message: format!("facet pattern {}: {}", pattern, e),
            })
        };

        Ok(Self {
            link: compile(LINK_PATTERN)?,
            tag: compile(TAG_PATTERN)?,
            trailing_punctuation: compile(TRAILING_PUNCTUATION)?,
            tag_word: compile(TAG_WORD)?,
        })
    }

    pub fn detect(&self, text: &str) -> Vec<Facet> {
        let mut facets = Vec::new();

        for caps in self.link.captures_iter(text) {
            let Some(span) = caps.get(1) else { continue };
            let uri = trim_uri(span.as_str());
            facets.push(Facet::new(
                span.start(),
                span.start() + uri.len(),
                FacetFeature::Link {
                    uri: uri.to_string(),
                },
            ));
        }

        for caps in self.tag.captures_iter(text) {
            let (Some(hash), Some(body)) = (caps.get(1), caps.get(2)) else {
                continue;
            };
            let tag = self.trailing_punctuation.replace(body.as_str(), "");
            if tag.is_empty()
                || tag.starts_with('\u{fe0f}')
                || tag.chars().count() > MAX_TAG_CHARS
                || !self.tag_word.is_match(&tag)
            {
                continue;
            }
            facets.push(Facet::new(
                hash.start(),
                body.start() + tag.len(),
                FacetFeature::Tag {
                    tag: tag.into_owned(),
                },
            ));
        }

        facets.sort_by_key(|facet| facet.index.byte_start);
        facets
    }
}

pub struct BlueskyPublisher {
    client: Client,
    service: String,
    handle: String,
    app_password: String,
    timeout: Duration,
    facets: FacetDetector,
    session: Mutex<Option<Session>>,
}

impl BlueskyPublisher {
    pub fn new(
        service: impl Into<String>,
        handle: impl Into<String>,
        app_password: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        Ok(Self {
            client: Client::new(),
            service: service.into().trim_end_matches('/').to_string(),
            handle: handle.into(),
            app_password: app_password.into(),
            timeout,
            facets: FacetDetector::new()?,
            session: Mutex::new(None),
        })
    }

    fn xrpc_url(&self, method: &str) -> String {
        format!("{}/xrpc/{}", self.service, method)
    }

    async fn session(&self) -> Result<Session> {
        let mut guard = self.session.lock().await;
        if let Some(session) = guard.as_ref() {
            return Ok(session.clone());
        }

        tracing::debug!("Creating session for {}", self.handle);
        let response = self
            .client
            .post(self.xrpc_url("com.atproto.server.createSession"))
            .timeout(self.timeout)
            .json(&serde_json::json!({
                "identifier": self.handle,
                "password": self.app_password,
            }))
            .send()
            .await?;

        let session: Session = check_status(response).await?.json().await?;
        tracing::debug!("Session created for {}", session.did);
        *guard = Some(session.clone());
        Ok(session)
    }
}

async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = match serde_json::from_str::<XrpcError>(&body) {
        Ok(XrpcError {
            message: Some(message),
            ..
        }) => message,
        Ok(XrpcError {
            error: Some(error), ..
        }) => error,
        _ => body,
    };

    Err(BotError::PublishError {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl Publisher for BlueskyPublisher {
    async fn publish(&self, text: &str) -> Result<()> {
        let session = self.session().await?;
        let facets = self.facets.detect(text);

        let body = serde_json::json!({
            "repo": session.did,
            "collection": POST_COLLECTION,
            "record": {
                "$type": POST_COLLECTION,
                "text": text,
                "createdAt": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
                "facets": facets,
            },
        });

        let response = self
            .client
            .post(self.xrpc_url("com.atproto.repo.createRecord"))
            .timeout(self.timeout)
            .bearer_auth(&session.access_jwt)
            .json(&body)
            .send()
            .await?;

        let created: CreatedRecord = check_status(response).await?.json().await?;
        tracing::info!("Posted successfully: {} ({})", text, created.uri);
        Ok(())
    }
}
