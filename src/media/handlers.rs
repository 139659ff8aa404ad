//! Route handlers.
//!
//! Each handler validates caller input, makes one upstream call and returns
//! shaped JSON. Only `GET` and `HEAD` are served; method filtering happens in
//! [`handle`] before any handler runs.

use std::collections::HashMap;

use axum::{
    http::{Method, Uri},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use url::form_urlencoded;

use crate::media::client::UpstreamClient;
use crate::media::error::HandlerError;
use crate::media::types::{
    MediaDetails, MediaKind, MediaSummary, Page, RawDetails, RawMedia, RawPage, Suggestion,
};
use crate::routing::{Resolved, Route};

/// Upstream page limit.
const MAX_PAGE: u32 = 500;
const MAX_SUGGESTIONS: usize = 8;

const MOVIE_CATEGORIES: &[&str] = &["popular", "top_rated", "now_playing", "upcoming", "trending"];
const TV_CATEGORIES: &[&str] = &["popular", "top_rated", "on_the_air", "airing_today", "trending"];

/// Decoded query string; the first occurrence of a name wins.
#[derive(Debug, Default, Clone)]
pub struct QueryParams(HashMap<String, String>);

impl QueryParams {
    pub fn from_uri(uri: &Uri) -> Self {
        let mut params = HashMap::new();
        if let Some(query) = uri.query() {
            for (name, value) in form_urlencoded::parse(query.as_bytes()) {
                params.entry(name.into_owned()).or_insert_with(|| value.into_owned());
            }
        }
        Self(params)
    }

    /// Trimmed, non-empty value.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(|v| v.trim()).filter(|v| !v.is_empty())
    }

    fn page(&self) -> Result<u32, HandlerError> {
        match self.get("page") {
            None => Ok(1),
            Some(raw) => raw
                .parse::<u32>()
                .ok()
                .filter(|p| (1..=MAX_PAGE).contains(p))
                .ok_or_else(|| {
                    HandlerError::BadRequest(format!(
                        "page must be an integer between 1 and {}",
                        MAX_PAGE
                    ))
                }),
        }
    }
}

/// Service index returned by the home route.
#[derive(Debug, Serialize)]
pub struct ServiceIndex {
    pub name: &'static str,
    pub version: &'static str,
    pub routes: Vec<String>,
}

/// Run the handler for an already-admitted, already-resolved request.
pub async fn handle(
    client: &UpstreamClient,
    method: &Method,
    resolved: Resolved<'_>,
    params: &QueryParams,
    routes: &[&str],
) -> Result<Response, HandlerError> {
    if *method != Method::GET && *method != Method::HEAD {
        return Err(HandlerError::MethodNotAllowed);
    }

    let remainder = resolved.remainder;
    match resolved.route {
        Route::Home => home(remainder, routes).map(json),
        Route::Search => search(client, params).await.map(json),
        Route::Movie => details(client, MediaKind::Movie, remainder).await.map(json),
        Route::Tv => details(client, MediaKind::Tv, remainder).await.map(json),
        Route::Movies => listing(client, MediaKind::Movie, remainder, params).await.map(json),
        Route::TvShows => listing(client, MediaKind::Tv, remainder, params).await.map(json),
        Route::Suggestions => suggestions(client, params).await.map(json),
    }
}

fn json<T: Serialize>(value: T) -> Response {
    Json(value).into_response()
}

fn home(path: &str, routes: &[&str]) -> Result<ServiceIndex, HandlerError> {
    if !path.is_empty() && path != "/" {
        return Err(HandlerError::NotFound(path.to_string()));
    }
    Ok(ServiceIndex {
        name: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        routes: routes.iter().map(|r| r.to_string()).collect(),
    })
}

async fn search(
    client: &UpstreamClient,
    params: &QueryParams,
) -> Result<Page<MediaSummary>, HandlerError> {
    let query = params
        .get("query")
        .ok_or_else(|| HandlerError::BadRequest("query parameter is required".into()))?;
    let page = params.page()?;

    let raw: RawPage<RawMedia> = client
        .get_json(
            "search/multi",
            &[
                ("query", query.to_string()),
                ("page", page.to_string()),
                ("include_adult", "false".to_string()),
            ],
        )
        .await?;

    Ok(Page::from_raw(raw, None))
}

/// Single path segment after the mount point, e.g. `/603` or `/603/`.
fn single_segment(remainder: &str) -> Option<&str> {
    let segment = remainder.trim_matches('/');
    (!segment.is_empty() && !segment.contains('/')).then_some(segment)
}

fn parse_id(remainder: &str) -> Result<u64, HandlerError> {
    single_segment(remainder)
        .and_then(|s| s.parse::<u64>().ok())
        .ok_or_else(|| HandlerError::BadRequest("a numeric id is required, e.g. /movie/603".into()))
}

async fn details(
    client: &UpstreamClient,
    kind: MediaKind,
    remainder: &str,
) -> Result<MediaDetails, HandlerError> {
    let id = parse_id(remainder)?;
    let raw: RawDetails = client
        .get_json(&format!("{}/{}", kind.as_str(), id), &[])
        .await?;
    Ok(MediaDetails::from_raw(raw, kind))
}

/// Upstream path for a listing category, validated against the known set.
fn listing_path(kind: MediaKind, category: &str) -> Result<String, HandlerError> {
    let allowed = match kind {
        MediaKind::Movie => MOVIE_CATEGORIES,
        MediaKind::Tv => TV_CATEGORIES,
    };
    if !allowed.contains(&category) {
        return Err(HandlerError::BadRequest(format!(
            "unknown category '{}', expected one of: {}",
            category,
            allowed.join(", ")
        )));
    }

    Ok(if category == "trending" {
        format!("trending/{}/week", kind.as_str())
    } else {
        format!("{}/{}", kind.as_str(), category)
    })
}

async fn listing(
    client: &UpstreamClient,
    kind: MediaKind,
    remainder: &str,
    params: &QueryParams,
) -> Result<Page<MediaSummary>, HandlerError> {
    let category = match remainder.trim_matches('/') {
        "" => params.get("category").unwrap_or("popular"),
        _ => single_segment(remainder)
            .ok_or_else(|| HandlerError::NotFound(remainder.to_string()))?,
    };
    let path = listing_path(kind, category)?;
    let page = params.page()?;

    let raw: RawPage<RawMedia> = client
        .get_json(&path, &[("page", page.to_string())])
        .await?;

    Ok(Page::from_raw(raw, Some(kind)))
}

async fn suggestions(
    client: &UpstreamClient,
    params: &QueryParams,
) -> Result<Vec<Suggestion>, HandlerError> {
    let raw: RawPage<RawMedia> = match params.get("query") {
        Some(query) => {
            client
                .get_json(
                    "search/multi",
                    &[("query", query.to_string()), ("include_adult", "false".to_string())],
                )
                .await?
        }
        None => client.get_json("trending/all/day", &[]).await?,
    };

    Ok(Page::from_raw(raw, None)
        .results
        .into_iter()
        .take(MAX_SUGGESTIONS)
        .map(Suggestion::from)
        .collect())
}
