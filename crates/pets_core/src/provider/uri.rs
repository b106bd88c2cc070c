//! Content URI routing table.
//!
//! # Responsibility
//! - Register URI shapes (`authority` + path pattern) against route codes.
//! - Match incoming URIs exactly against the registered shapes.
//! - Define the typed pets resource identifier (`PetUri`).
//!
//! # Invariants
//! - Matching is exact-shape: no prefix matches, no empty segments.
//! - `#` matches one unsigned decimal segment that fits in `i64`.
//! - The URI is matched as given; surrounding whitespace is not stripped.

use crate::contract::{content_uri, item_uri, CONTENT_SCHEME, PATH_PETS};
use crate::model::pet::PetId;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt::{Display, Formatter};

static CONTENT_URI_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([A-Za-z][A-Za-z0-9+.\-]*)://([^/?#]+)(/[^?#]*)?$")
        .expect("valid content uri regex")
});

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Number,
}

impl Segment {
    fn matches(&self, value: &str) -> bool {
        match self {
            Self::Literal(literal) => literal == value,
            Self::Number => {
                !value.is_empty()
                    && value.bytes().all(|b| b.is_ascii_digit())
                    && value.parse::<i64>().is_ok()
            }
        }
    }
}

#[derive(Debug, Clone)]
struct Route<C> {
    authority: String,
    segments: Vec<Segment>,
    code: C,
}

/// Successful match: route code plus the URI path segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UriMatch<'u, C> {
    pub code: C,
    pub segments: Vec<&'u str>,
}

impl<C> UriMatch<'_, C> {
    /// Parses the last path segment as an id.
    pub fn last_id(&self) -> Option<i64> {
        self.segments.last()?.parse().ok()
    }
}

/// Builder collecting routes before the table is frozen.
#[derive(Debug, Clone)]
pub struct UriMatcherBuilder<C> {
    scheme: String,
    routes: Vec<Route<C>>,
}

impl<C: Copy> UriMatcherBuilder<C> {
    pub fn new() -> Self {
        Self {
            scheme: CONTENT_SCHEME.to_string(),
            routes: Vec::new(),
        }
    }

    /// Registers `authority` + `pattern` (e.g. `pets/#`) under `code`.
    pub fn add(mut self, authority: &str, pattern: &str, code: C) -> Self {
        let segments = pattern
            .trim_matches('/')
            .split('/')
            .filter(|segment| !segment.is_empty())
            .map(|segment| match segment {
                "#" => Segment::Number,
                literal => Segment::Literal(literal.to_string()),
            })
            .collect();
        self.routes.push(Route {
            authority: authority.to_string(),
            segments,
            code,
        });
        self
    }

    pub fn build(self) -> UriMatcher<C> {
        UriMatcher {
            scheme: self.scheme,
            routes: self.routes,
        }
    }
}

impl<C: Copy> Default for UriMatcherBuilder<C> {
    fn default() -> Self {
        Self::new()
    }
}

/// Immutable URI routing table.
#[derive(Debug, Clone)]
pub struct UriMatcher<C> {
    scheme: String,
    routes: Vec<Route<C>>,
}

impl<C: Copy> UriMatcher<C> {
    pub fn builder() -> UriMatcherBuilder<C> {
        UriMatcherBuilder::new()
    }

    /// Returns the first registered route matching `uri` exactly.
    pub fn match_uri<'u>(&self, uri: &'u str) -> Option<UriMatch<'u, C>> {
        let captures = CONTENT_URI_RE.captures(uri)?;
        let scheme = captures.get(1)?.as_str();
        if !scheme.eq_ignore_ascii_case(&self.scheme) {
            return None;
        }
        let authority = captures.get(2)?.as_str();
        let segments: Vec<&'u str> = match captures.get(3) {
            Some(path) => path.as_str()[1..].split('/').collect(),
            None => Vec::new(),
        };
        if segments.iter().any(|segment| segment.is_empty()) {
            return None;
        }

        self.routes
            .iter()
            .find(|route| {
                route.authority == authority
                    && route.segments.len() == segments.len()
                    && route
                        .segments
                        .iter()
                        .zip(&segments)
                        .all(|(pattern, value)| pattern.matches(value))
            })
            .map(|route| UriMatch {
                code: route.code,
                segments,
            })
    }
}

/// Route codes registered for the pets authority.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PetRoute {
    Pets,
    PetId,
}

/// Builds the pets routing table for `authority`.
pub fn pet_uri_matcher(authority: &str) -> UriMatcher<PetRoute> {
    UriMatcher::builder()
        .add(authority, PATH_PETS, PetRoute::Pets)
        .add(authority, &format!("{PATH_PETS}/#"), PetRoute::PetId)
        .build()
}

/// Resolved pets resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PetUri {
    /// Every pet record.
    Collection,
    /// One pet record by id.
    Item(PetId),
}

impl PetUri {
    /// Returns whether a change on `changed` must reach an observer of `self`.
    ///
    /// A collection overlaps every pets resource; two items overlap only
    /// when they name the same id.
    pub fn overlaps(self, changed: PetUri) -> bool {
        match (self, changed) {
            (Self::Collection, _) | (_, Self::Collection) => true,
            (Self::Item(observed), Self::Item(changed)) => observed == changed,
        }
    }

    /// Renders the URI string under `authority`.
    pub fn to_uri_string(self, authority: &str) -> String {
        match self {
            Self::Collection => content_uri(authority),
            Self::Item(id) => item_uri(authority, id),
        }
    }
}

impl Display for PetUri {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Collection => write!(f, "{PATH_PETS}"),
            Self::Item(id) => write!(f, "{PATH_PETS}/{id}"),
        }
    }
}
