use std::collections::HashSet;

/// Read access to the movie catalog.
pub const MOVIES_READ: &str = "movies:read";

/// Write access to the movie catalog.
pub const MOVIES_WRITE: &str = "movies:write";

/// Permission codes granted to one user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Permissions(HashSet<String>);

impl Permissions {
    pub fn new<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(codes.into_iter().map(Into::into).collect())
    }

    pub fn includes(&self, code: &str) -> bool {
        self.0.contains(code)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Type-level permission requirement, used by route extractors.
pub trait RequiredPermission: Send + Sync + 'static {
    const CODE: &'static str;
}

#[derive(Debug, Clone, Copy)]
pub struct MoviesRead;

impl RequiredPermission for MoviesRead {
    const CODE: &'static str = MOVIES_READ;
}

#[derive(Debug, Clone, Copy)]
pub struct MoviesWrite;

impl RequiredPermission for MoviesWrite {
    const CODE: &'static str = MOVIES_WRITE;
}
