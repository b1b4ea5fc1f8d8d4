//! Facet (info set) selection
//!
//! A facet names an optional subset of title metadata to retrieve. The base
//! facet `main` is always requested; `news` and `soundtrack` are never
//! selectable.

use std::collections::BTreeSet;
use std::fmt;
use tracing::warn;

/// Facet included in every request
pub const BASE_FACET: &str = "main";

/// Facets excluded from user selection
pub const UNSELECTABLE_FACETS: [&str; 3] = ["main", "news", "soundtrack"];

/// Movie facets known to the metadata service
pub const KNOWN_FACETS: &[&str] = &[
    "airing",
    "akas",
    "alternate versions",
    "awards",
    "connections",
    "crazy credits",
    "critic reviews",
    "episodes",
    "external reviews",
    "external sites",
    "faqs",
    "full credits",
    "goofs",
    "keywords",
    "locations",
    "main",
    "misc sites",
    "news",
    "official sites",
    "parents guide",
    "photo sites",
    "plot",
    "quotes",
    "release dates",
    "release info",
    "reviews",
    "sound clips",
    "soundtrack",
    "synopsis",
    "taglines",
    "technical",
    "trivia",
    "tv schedule",
    "video clips",
    "vote details",
];

/// Facets a user may add on top of the base facet
pub fn selectable_facets() -> impl Iterator<Item = &'static str> {
    KNOWN_FACETS
        .iter()
        .copied()
        .filter(|f| !UNSELECTABLE_FACETS.contains(f))
}

pub fn is_selectable(name: &str) -> bool {
    selectable_facets().any(|f| f == name)
}

/// Requested facets; always a superset of `{main}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FacetSet(BTreeSet<String>);

impl FacetSet {
    /// Only the base facet
    pub fn base() -> Self {
        let mut set = BTreeSet::new();
        set.insert(BASE_FACET.to_string());
        Self(set)
    }

    /// Base facet plus extras; `news` and `soundtrack` are skipped
    pub fn with_extras<I, S>(extras: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::base();
        for extra in extras {
            let extra = extra.as_ref().trim();
            if extra.is_empty() || extra == BASE_FACET {
                continue;
            }
            if UNSELECTABLE_FACETS.contains(&extra) {
                warn!(facet = extra, "Facet is not selectable, skipping");
                continue;
            }
            set.0.insert(extra.to_string());
        }
        set
    }

    pub fn contains(&self, facet: &str) -> bool {
        self.0.contains(facet)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Comma-joined list, base facet first
    pub fn to_query(&self) -> String {
        std::iter::once(BASE_FACET)
            .chain(self.iter().filter(|f| *f != BASE_FACET))
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl Default for FacetSet {
    fn default() -> Self {
        Self::base()
    }
}

impl fmt::Display for FacetSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_query().replace(',', ", "))
    }
}
