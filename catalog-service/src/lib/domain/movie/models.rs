use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use chrono::DateTime;
use chrono::Datelike;
use chrono::Utc;
use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::Serializer;

use crate::domain::movie::errors::FilterError;
use crate::domain::movie::errors::GenresError;
use crate::domain::movie::errors::RuntimeError;
use crate::domain::movie::errors::TitleError;
use crate::domain::movie::errors::YearError;

/// A catalog entry. `version` fences concurrent writers.
#[derive(Debug, Clone, PartialEq)]
pub struct Movie {
    pub id: MovieId,
    pub created_at: DateTime<Utc>,
    pub title: Title,
    pub year: Year,
    pub runtime: Runtime,
    pub genres: Genres,
    pub version: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MovieId(pub i64);

impl fmt::Display for MovieId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Title(String);

impl Title {
    const MAX_BYTES: usize = 500;

    pub fn new(title: String) -> Result<Self, TitleError> {
        if title.trim().is_empty() {
            return Err(TitleError::Empty);
        }
        if title.len() > Self::MAX_BYTES {
            return Err(TitleError::TooLong {
                max: Self::MAX_BYTES,
            });
        }
        Ok(Self(title))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Release year, no earlier than the first films and no later than now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Year(i32);

impl Year {
    const EARLIEST: i32 = 1888;

    pub fn new(year: i32) -> Result<Self, YearError> {
        if year < Self::EARLIEST {
            return Err(YearError::TooEarly { min: Self::EARLIEST });
        }
        if year > Utc::now().year() {
            return Err(YearError::InFuture);
        }
        Ok(Self(year))
    }

    pub fn value(&self) -> i32 {
        self.0
    }
}

/// Running time in minutes. Travels over the wire as `"<n> mins"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Runtime(i32);

impl Runtime {
    pub fn new(minutes: i32) -> Result<Self, RuntimeError> {
        if minutes <= 0 {
            return Err(RuntimeError::NotPositive);
        }
        Ok(Self(minutes))
    }

    pub fn minutes(&self) -> i32 {
        self.0
    }
}

impl fmt::Display for Runtime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} mins", self.0)
    }
}

impl FromStr for Runtime {
    type Err = RuntimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let minutes = s
            .strip_suffix(" mins")
            .ok_or(RuntimeError::Format)?
            .parse::<i32>()
            .map_err(|_| RuntimeError::Format)?;
        Self::new(minutes)
    }
}

impl Serialize for Runtime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Runtime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Genres(Vec<String>);

impl Genres {
    const MAX: usize = 5;

    pub fn new(genres: Vec<String>) -> Result<Self, GenresError> {
        if genres.is_empty() {
            return Err(GenresError::Empty);
        }
        if genres.len() > Self::MAX {
            return Err(GenresError::TooMany { max: Self::MAX });
        }
        if genres.iter().any(|g| g.trim().is_empty()) {
            return Err(GenresError::Blank);
        }
        let unique: HashSet<&str> = genres.iter().map(String::as_str).collect();
        if unique.len() != genres.len() {
            return Err(GenresError::Duplicate);
        }
        Ok(Self(genres))
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn into_inner(self) -> Vec<String> {
        self.0
    }
}

/// Validated fields of a movie that has not been stored yet
#[derive(Debug, Clone, PartialEq)]
pub struct NewMovie {
    pub title: Title,
    pub year: Year,
    pub runtime: Runtime,
    pub genres: Genres,
}

/// Changes to apply to a stored movie.
///
/// Absent fields keep their stored value; the merged record replaces the
/// stored one as a whole. `expected_version`, when present, must match the
/// version read before the write.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateMovieCommand {
    pub title: Option<Title>,
    pub year: Option<Year>,
    pub runtime: Option<Runtime>,
    pub genres: Option<Genres>,
    pub expected_version: Option<i32>,
}

impl UpdateMovieCommand {
    pub fn apply_to(self, mut movie: Movie) -> Movie {
        if let Some(title) = self.title {
            movie.title = title;
        }
        if let Some(year) = self.year {
            movie.year = year;
        }
        if let Some(runtime) = self.runtime {
            movie.runtime = runtime;
        }
        if let Some(genres) = self.genres {
            movie.genres = genres;
        }
        movie
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortColumn {
    Id,
    Title,
    Year,
    Runtime,
}

impl SortColumn {
    pub fn as_column(&self) -> &'static str {
        match self {
            SortColumn::Id => "id",
            SortColumn::Title => "title",
            SortColumn::Year => "year",
            SortColumn::Runtime => "runtime",
        }
    }
}

/// Sort key for listings, `-` prefix meaning descending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sort {
    pub column: SortColumn,
    pub descending: bool,
}

impl Default for Sort {
    fn default() -> Self {
        Self {
            column: SortColumn::Id,
            descending: false,
        }
    }
}

impl FromStr for Sort {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (descending, name) = match s.strip_prefix('-') {
            Some(name) => (true, name),
            None => (false, s),
        };
        let column = match name {
            "id" => SortColumn::Id,
            "title" => SortColumn::Title,
            "year" => SortColumn::Year,
            "runtime" => SortColumn::Runtime,
            _ => return Err(FilterError::Sort(s.to_string())),
        };
        Ok(Self { column, descending })
    }
}

/// Listing filter with pagination
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovieFilter {
    pub title: Option<String>,
    pub genres: Vec<String>,
    pub page: u32,
    pub page_size: u32,
    pub sort: Sort,
}

impl MovieFilter {
    pub const MAX_PAGE: u32 = 10_000_000;
    pub const MAX_PAGE_SIZE: u32 = 100;

    pub fn new(
        title: Option<String>,
        genres: Vec<String>,
        page: u32,
        page_size: u32,
        sort: Sort,
    ) -> Result<Self, FilterError> {
        if page == 0 || page > Self::MAX_PAGE {
            return Err(FilterError::Page {
                max: Self::MAX_PAGE,
            });
        }
        if page_size == 0 || page_size > Self::MAX_PAGE_SIZE {
            return Err(FilterError::PageSize {
                max: Self::MAX_PAGE_SIZE,
            });
        }
        Ok(Self {
            title: title.filter(|t| !t.trim().is_empty()),
            genres,
            page,
            page_size,
            sort,
        })
    }

    pub fn limit(&self) -> i64 {
        i64::from(self.page_size)
    }

    pub fn offset(&self) -> i64 {
        i64::from(self.page - 1) * i64::from(self.page_size)
    }
}

impl Default for MovieFilter {
    fn default() -> Self {
        Self {
            title: None,
            genres: Vec::new(),
            page: 1,
            page_size: 20,
            sort: Sort::default(),
        }
    }
}

/// Pagination summary for a listing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PageMetadata {
    pub current_page: u32,
    pub page_size: u32,
    pub first_page: u32,
    pub last_page: u32,
    pub total_records: u64,
}

impl PageMetadata {
    pub fn new(total_records: u64, page: u32, page_size: u32) -> Self {
        if total_records == 0 {
            return Self::default();
        }
        let last_page = total_records.div_ceil(u64::from(page_size));
        Self {
            current_page: page,
            page_size,
            first_page: 1,
            last_page: u32::try_from(last_page).unwrap_or(u32::MAX),
            total_records,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MoviePage {
    pub movies: Vec<Movie>,
    pub metadata: PageMetadata,
}
