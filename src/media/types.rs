//! Upstream payloads and the shaped JSON the gateway returns.
//!
//! Upstream objects are deserialized leniently (every field optional beyond
//! `id`) and reduced to a stable, provider-independent shape.

use serde::{Deserialize, Serialize};

/// Movie or TV show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Movie,
    Tv,
}

impl MediaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Movie => "movie",
            MediaKind::Tv => "tv",
        }
    }

    fn parse(kind: &str) -> Option<Self> {
        match kind {
            "movie" => Some(MediaKind::Movie),
            "tv" => Some(MediaKind::Tv),
            _ => None,
        }
    }
}

/// Paged listing as returned upstream.
#[derive(Debug, Clone, Deserialize)]
pub struct RawPage<T> {
    #[serde(default = "first_page")]
    pub page: u32,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_results: u64,
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
}

fn first_page() -> u32 {
    1
}

/// Movie, show or person as it appears in listings.
#[derive(Debug, Clone, Deserialize)]
pub struct RawMedia {
    pub id: u64,
    #[serde(default)]
    pub media_type: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub first_air_date: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub popularity: Option<f64>,
}

impl RawMedia {
    /// Resolve the kind from the payload, or from the listing it came from.
    /// People and unknown types resolve to `None`.
    fn kind(&self, listing_kind: Option<MediaKind>) -> Option<MediaKind> {
        match self.media_type.as_deref() {
            Some(kind) => MediaKind::parse(kind),
            None => listing_kind,
        }
    }

    fn display_title(&self) -> String {
        self.title
            .clone()
            .or_else(|| self.name.clone())
            .unwrap_or_default()
    }

    fn date(&self) -> Option<String> {
        self.release_date
            .clone()
            .or_else(|| self.first_air_date.clone())
            .filter(|d| !d.is_empty())
    }
}

/// Shaped listing entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MediaSummary {
    pub id: u64,
    pub media_type: MediaKind,
    pub title: String,
    pub overview: String,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub release_date: Option<String>,
    pub vote_average: f64,
}

impl MediaSummary {
    pub fn from_raw(raw: RawMedia, listing_kind: Option<MediaKind>) -> Option<Self> {
        let media_type = raw.kind(listing_kind)?;
        Some(Self {
            id: raw.id,
            media_type,
            title: raw.display_title(),
            release_date: raw.date(),
            overview: raw.overview.unwrap_or_default(),
            poster_path: raw.poster_path,
            backdrop_path: raw.backdrop_path,
            vote_average: raw.vote_average.unwrap_or_default(),
        })
    }
}

/// Shaped paged listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub page: u32,
    pub total_pages: u32,
    pub total_results: u64,
    pub results: Vec<T>,
}

impl Page<MediaSummary> {
    /// Shape a listing, dropping entries that are neither movies nor shows.
    pub fn from_raw(raw: RawPage<RawMedia>, listing_kind: Option<MediaKind>) -> Self {
        Self {
            page: raw.page,
            total_pages: raw.total_pages,
            total_results: raw.total_results,
            results: raw
                .results
                .into_iter()
                .filter_map(|m| MediaSummary::from_raw(m, listing_kind))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawGenre {
    pub name: String,
}

/// Single movie or show as returned upstream.
#[derive(Debug, Clone, Deserialize)]
pub struct RawDetails {
    pub id: u64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub tagline: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub first_air_date: Option<String>,
    #[serde(default)]
    pub runtime: Option<u32>,
    #[serde(default)]
    pub episode_run_time: Option<Vec<u32>>,
    #[serde(default)]
    pub number_of_seasons: Option<u32>,
    #[serde(default)]
    pub genres: Vec<RawGenre>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub vote_count: Option<u64>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub homepage: Option<String>,
}

/// Shaped detail view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MediaDetails {
    pub id: u64,
    pub media_type: MediaKind,
    pub title: String,
    pub tagline: Option<String>,
    pub overview: String,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub release_date: Option<String>,
    /// Minutes; for shows, the first listed episode length.
    pub runtime: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number_of_seasons: Option<u32>,
    pub genres: Vec<String>,
    pub vote_average: f64,
    pub vote_count: u64,
    pub status: Option<String>,
    pub homepage: Option<String>,
}

impl MediaDetails {
    pub fn from_raw(raw: RawDetails, media_type: MediaKind) -> Self {
        let non_empty = |s: Option<String>| s.filter(|s| !s.is_empty());
        Self {
            id: raw.id,
            media_type,
            title: raw.title.or(raw.name).unwrap_or_default(),
            tagline: non_empty(raw.tagline),
            overview: raw.overview.unwrap_or_default(),
            poster_path: raw.poster_path,
            backdrop_path: raw.backdrop_path,
            release_date: non_empty(raw.release_date.or(raw.first_air_date)),
            runtime: raw
                .runtime
                .or_else(|| raw.episode_run_time.and_then(|t| t.first().copied())),
            number_of_seasons: raw.number_of_seasons,
            genres: raw.genres.into_iter().map(|g| g.name).collect(),
            vote_average: raw.vote_average.unwrap_or_default(),
            vote_count: raw.vote_count.unwrap_or_default(),
            status: non_empty(raw.status),
            homepage: non_empty(raw.homepage),
        }
    }
}

/// Compact autocomplete entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Suggestion {
    pub id: u64,
    pub media_type: MediaKind,
    pub title: String,
    pub year: Option<u16>,
}

impl From<MediaSummary> for Suggestion {
    fn from(summary: MediaSummary) -> Self {
        let year = summary
            .release_date
            .as_deref()
            .and_then(|d| d.get(..4))
            .and_then(|y| y.parse().ok());
        Self {
            id: summary.id,
            media_type: summary.media_type,
            title: summary.title,
            year,
        }
    }
}
