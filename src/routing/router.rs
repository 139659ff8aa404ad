//! Route lookup and dispatch.
//!
//! # Responsibilities
//! - Store the static route table
//! - Resolve a request path to a route and the path remainder
//! - Fall back to the home route when nothing else matches
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - O(n) path prefix scan over a handful of entries
//! - First match wins, in table order

use std::fmt;

use crate::routing::matcher::PathPrefixMatcher;

/// Handler capability a path resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Search,
    Movie,
    Movies,
    Tv,
    TvShows,
    Suggestions,
    Home,
}

impl Route {
    /// Label used in logs and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            Route::Search => "search",
            Route::Movie => "movie",
            Route::Movies => "movies",
            Route::Tv => "tv",
            Route::TvShows => "tv-shows",
            Route::Suggestions => "suggestions",
            Route::Home => "home",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of resolving a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolved<'a> {
    pub route: Route,
    /// Path after the mount prefix; empty or starting with `/`.
    pub remainder: &'a str,
}

/// Static prefix table mapping paths to routes.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    table: Vec<(PathPrefixMatcher, Route)>,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Dispatcher {
    /// The gateway's route table.
    pub fn new() -> Self {
        Self::with_table(vec![
            ("/search", Route::Search),
            ("/movie", Route::Movie),
            ("/movies", Route::Movies),
            ("/tv", Route::Tv),
            ("/tv-shows", Route::TvShows),
            ("/suggestions", Route::Suggestions),
        ])
    }

    pub fn with_table(table: Vec<(&str, Route)>) -> Self {
        Self {
            table: table
                .into_iter()
                .map(|(prefix, route)| (PathPrefixMatcher::new(prefix), route))
                .collect(),
        }
    }

    /// Resolve `path`, falling back to [`Route::Home`] with the whole path as remainder.
    pub fn resolve<'a>(&self, path: &'a str) -> Resolved<'a> {
        self.table
            .iter()
            .find_map(|(matcher, route)| {
                matcher.strip(path).map(|remainder| Resolved {
                    route: *route,
                    remainder,
                })
            })
            .unwrap_or(Resolved {
                route: Route::Home,
                remainder: path,
            })
    }

    /// Mount prefixes in table order, home last.
    pub fn prefixes(&self) -> Vec<&str> {
        let mut prefixes: Vec<&str> = self.table.iter().map(|(m, _)| m.prefix()).collect();
        prefixes.push("/");
        prefixes
    }
}
