//! Known releases, in chronological order.
//!
//! Ordering and offsets always follow the position of a release in
//! [`Release::ALL`], never the lexical value of its single-letter code.

use crate::error::{DeprecationError, Result};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// A named release of the project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum Release {
    Austin,
    Bexar,
    Cactus,
    Diablo,
    Essex,
    Folsom,
    Grizzly,
    Havana,
    Icehouse,
    Juno,
    Kilo,
    Liberty,
}

impl Release {
    /// Every known release, oldest first.
    ///
    /// New releases are appended here; this array is the single source of
    /// truth for comparisons and removal offsets.
    pub const ALL: [Release; 12] = [
        Release::Austin,
        Release::Bexar,
        Release::Cactus,
        Release::Diablo,
        Release::Essex,
        Release::Folsom,
        Release::Grizzly,
        Release::Havana,
        Release::Icehouse,
        Release::Juno,
        Release::Kilo,
        Release::Liberty,
    ];

    /// Symbolic name, e.g. `ICEHOUSE`.
    pub fn name(self) -> &'static str {
        match self {
            Release::Austin => "AUSTIN",
            Release::Bexar => "BEXAR",
            Release::Cactus => "CACTUS",
            Release::Diablo => "DIABLO",
            Release::Essex => "ESSEX",
            Release::Folsom => "FOLSOM",
            Release::Grizzly => "GRIZZLY",
            Release::Havana => "HAVANA",
            Release::Icehouse => "ICEHOUSE",
            Release::Juno => "JUNO",
            Release::Kilo => "KILO",
            Release::Liberty => "LIBERTY",
        }
    }

    /// Canonical single-character code, e.g. `I`.
    pub fn code(self) -> char {
        match self {
            Release::Austin => 'A',
            Release::Bexar => 'B',
            Release::Cactus => 'C',
            Release::Diablo => 'D',
            Release::Essex => 'E',
            Release::Folsom => 'F',
            Release::Grizzly => 'G',
            Release::Havana => 'H',
            Release::Icehouse => 'I',
            Release::Juno => 'J',
            Release::Kilo => 'K',
            Release::Liberty => 'L',
        }
    }

    /// Position of this release in [`Release::ALL`].
    pub fn index(self) -> usize {
        Self::ALL
            .iter()
            .position(|r| *r == self)
            .unwrap_or_else(|| unreachable!("{:?} is missing from Release::ALL", self))
    }

    /// The oldest known release.
    pub fn first() -> Release {
        Self::ALL[0]
    }

    /// The newest known release.
    pub fn latest() -> Release {
        Self::ALL[Self::ALL.len() - 1]
    }

    /// Iterate over all releases in chronological order.
    pub fn iter() -> impl Iterator<Item = Release> {
        Self::ALL.into_iter()
    }

    /// Case-insensitive match of `text` against every release's name or code.
    ///
    /// Returns the first match in release order, or `None`. Only whole-string
    /// matches count.
    pub fn resolve(text: &str) -> Option<Release> {
        let text_lower = text.to_lowercase();
        Self::iter().find(|release| {
            release.name().to_lowercase() == text_lower
                || release.code().to_lowercase().eq(text_lower.chars())
        })
    }

    /// The release `delta` positions after this one.
    ///
    /// `offset(0)` is the release itself. Walking past [`Release::latest`]
    /// fails with [`DeprecationError::OutOfRange`].
    pub fn offset(self, delta: usize) -> Result<Release> {
        self.index()
            .checked_add(delta)
            .and_then(|idx| Self::ALL.get(idx).copied())
            .ok_or(DeprecationError::OutOfRange {
                release: self,
                delta,
            })
    }
}

impl PartialOrd for Release {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Release {
    fn cmp(&self, other: &Self) -> Ordering {
        self.index().cmp(&other.index())
    }
}

impl fmt::Display for Release {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Release {
    type Err = DeprecationError;

    fn from_str(s: &str) -> Result<Self> {
        Release::resolve(s).ok_or_else(|| DeprecationError::UnknownRelease {
            text: s.to_string(),
        })
    }
}

impl TryFrom<String> for Release {
    type Error = DeprecationError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Release> for &'static str {
    fn from(release: Release) -> Self {
        release.name()
    }
}

pub const AUSTIN: Release = Release::Austin;
pub const BEXAR: Release = Release::Bexar;
pub const CACTUS: Release = Release::Cactus;
pub const DIABLO: Release = Release::Diablo;
pub const ESSEX: Release = Release::Essex;
pub const FOLSOM: Release = Release::Folsom;
pub const GRIZZLY: Release = Release::Grizzly;
pub const HAVANA: Release = Release::Havana;
pub const ICEHOUSE: Release = Release::Icehouse;
pub const JUNO: Release = Release::Juno;
pub const KILO: Release = Release::Kilo;
pub const LIBERTY: Release = Release::Liberty;
