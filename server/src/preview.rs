use log::debug;
use regex::Regex;
use serde::Serialize;
use warp::{reject, reply::Json};

const PREVIEW_PATTERN: &str = r#""audioPreview"\s*:\s*\{\s*"url"\s*:\s*"([^"]+)""#;

/// Looks a track's 30-second preview up on the public catalog by scraping
/// its embed page. Anything that goes wrong on the way, network included,
/// collapses to `None`.
#[derive(Clone)]
pub struct PreviewResolver {
    base: String,
    client: reqwest::Client,
    pattern: Regex,
}

impl PreviewResolver {
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            base: base.into().trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
            pattern: Regex::new(PREVIEW_PATTERN).unwrap(),
        }
    }

    pub async fn resolve(&self, track_id: &str) -> Option<String> {
        let url = format!("{}/embed/track/{}", self.base, track_id);
        let body = self.client.get(&url).send().await.ok()?.text().await.ok()?;
        self.extract(&body)
    }

    fn extract(&self, body: &str) -> Option<String> {
        self.pattern
            .captures(body)
            .and_then(|caps| caps.get(1))
            .map(|url| url.as_str().replace("\\/", "/"))
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PreviewReply {
    preview_url: Option<String>,
}

/// `GET /api/preview/{trackId}`. Always answers 200 with a nullable url.
pub async fn preview_handle(
    track_id: String,
    resolver: PreviewResolver,
) -> Result<Json, reject::Rejection> {
    let preview_url = resolver.resolve(&track_id).await;
    if preview_url.is_none() {
        debug!("no preview found for track {}", track_id);
    }
    Ok(warp::reply::json(&PreviewReply { preview_url }))
}
