//! Search query construction.
//!
//! The search endpoint accepts field filters (`artist:`, `year:`, ...)
//! inside the query string. [`SearchQuery`] builds such strings without
//! the caller having to remember the syntax; a plain string converts
//! into a filter-free query, so client search methods accept either.

use std::fmt;

/// Seed genres accepted by the `genre:` filter.
///
/// The filter is an open vocabulary server-side; [`Genre::Custom`]
/// covers anything not listed here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Genre {
    Acoustic,
    Ambient,
    Blues,
    Classical,
    Country,
    Dance,
    Disco,
    DrumAndBass,
    Dubstep,
    Edm,
    Electronic,
    Folk,
    Funk,
    Gospel,
    HipHop,
    House,
    Indie,
    Jazz,
    KPop,
    Latin,
    Metal,
    Pop,
    Punk,
    RnB,
    Reggae,
    Reggaeton,
    Rock,
    Soul,
    Techno,
    Trance,
    /// Any other seed genre, passed through as written.
    Custom(String),
}

impl Genre {
    /// The value sent in the `genre:` filter.
    pub fn as_str(&self) -> &str {
        match self {
            Genre::Acoustic => "acoustic",
            Genre::Ambient => "ambient",
            Genre::Blues => "blues",
            Genre::Classical => "classical",
            Genre::Country => "country",
            Genre::Dance => "dance",
            Genre::Disco => "disco",
            Genre::DrumAndBass => "drum-and-bass",
            Genre::Dubstep => "dubstep",
            Genre::Edm => "edm",
            Genre::Electronic => "electronic",
            Genre::Folk => "folk",
            Genre::Funk => "funk",
            Genre::Gospel => "gospel",
            Genre::HipHop => "hip-hop",
            Genre::House => "house",
            Genre::Indie => "indie",
            Genre::Jazz => "jazz",
            Genre::KPop => "k-pop",
            Genre::Latin => "latin",
            Genre::Metal => "metal",
            Genre::Pop => "pop",
            Genre::Punk => "punk",
            Genre::RnB => "r-n-b",
            Genre::Reggae => "reggae",
            Genre::Reggaeton => "reggaeton",
            Genre::Rock => "rock",
            Genre::Soul => "soul",
            Genre::Techno => "techno",
            Genre::Trance => "trance",
            Genre::Custom(s) => s,
        }
    }
}

impl fmt::Display for Genre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Builder for search query strings.
///
/// ```
/// use spotlas::search::{Genre, SearchQuery};
///
/// let query = SearchQuery::new("higher ground")
///     .artist("Stevie Wonder")
///     .year_range(1970, 1979)
///     .genre(Genre::Funk);
/// assert_eq!(
///     query.build(),
///     "higher ground artist:Stevie Wonder year:1970-1979 genre:funk"
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchQuery {
    text: Option<String>,
    album: Option<String>,
    artist: Option<String>,
    track: Option<String>,
    year: Option<String>,
    upc: Option<String>,
    isrc: Option<String>,
    genre: Option<Genre>,
    hipster: bool,
    new_releases: bool,
}

impl SearchQuery {
    /// Start a query from free text.
    pub fn new<S: Into<String>>(text: S) -> Self {
        Self {
            text: Some(text.into()),
            ..Default::default()
        }
    }

    /// Match on the album name.
    pub fn album<S: Into<String>>(mut self, album: S) -> Self {
        self.album = Some(album.into());
        self
    }

    /// Match on the artist name.
    pub fn artist<S: Into<String>>(mut self, artist: S) -> Self {
        self.artist = Some(artist.into());
        self
    }

    /// Match on the track name.
    pub fn track<S: Into<String>>(mut self, track: S) -> Self {
        self.track = Some(track.into());
        self
    }

    /// Match a single release year.
    pub fn year(mut self, year: u16) -> Self {
        self.year = Some(year.to_string());
        self
    }

    /// Match an inclusive range of release years.
    pub fn year_range(mut self, from: u16, to: u16) -> Self {
        self.year = Some(format!("{from}-{to}"));
        self
    }

    /// Match the album's Universal Product Code.
    pub fn upc<S: Into<String>>(mut self, upc: S) -> Self {
        self.upc = Some(upc.into());
        self
    }

    /// Match the track's International Standard Recording Code.
    pub fn isrc<S: Into<String>>(mut self, isrc: S) -> Self {
        self.isrc = Some(isrc.into());
        self
    }

    /// Match a seed genre.
    pub fn genre(mut self, genre: Genre) -> Self {
        self.genre = Some(genre);
        self
    }

    /// Only albums in the lowest 10% of popularity (`tag:hipster`).
    pub fn hipster(mut self) -> Self {
        self.hipster = true;
        self
    }

    /// Only albums released in the last two weeks (`tag:new`).
    pub fn new_releases(mut self) -> Self {
        self.new_releases = true;
        self
    }

    /// Render the query string sent to the search endpoint.
    pub fn build(&self) -> String {
        let mut parts: Vec<String> = Vec::new();

        if let Some(text) = &self.text {
            if !text.is_empty() {
                parts.push(text.clone());
            }
        }
        if let Some(album) = &self.album {
            parts.push(format!("album:{album}"));
        }
        if let Some(artist) = &self.artist {
            parts.push(format!("artist:{artist}"));
        }
        if let Some(track) = &self.track {
            parts.push(format!("track:{track}"));
        }
        if let Some(year) = &self.year {
            parts.push(format!("year:{year}"));
        }
        if let Some(upc) = &self.upc {
            parts.push(format!("upc:{upc}"));
        }
        if let Some(isrc) = &self.isrc {
            parts.push(format!("isrc:{isrc}"));
        }
        if let Some(genre) = &self.genre {
            parts.push(format!("genre:{genre}"));
        }
        if self.hipster {
            parts.push("tag:hipster".to_string());
        }
        if self.new_releases {
            parts.push("tag:new".to_string());
        }

        parts.join(" ")
    }
}

impl fmt::Display for SearchQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.build())
    }
}

impl From<&str> for SearchQuery {
    fn from(text: &str) -> Self {
        SearchQuery::new(text)
    }
}

impl From<String> for SearchQuery {
    fn from(text: String) -> Self {
        SearchQuery::new(text)
    }
}
