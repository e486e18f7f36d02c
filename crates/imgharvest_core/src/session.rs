use std::fmt;
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdultFilter {
    On,
    Off,
}

impl AdultFilter {
    /// Value sent in the `adlt` query parameter.
    pub fn as_param(self) -> &'static str {
        match self {
            AdultFilter::On => "on",
            AdultFilter::Off => "off",
        }
    }

    pub fn from_filter_off(filter_off: bool) -> Self {
        if filter_off {
            AdultFilter::Off
        } else {
            AdultFilter::On
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeFilter {
    Line,
    Photo,
    Clipart,
    Gif,
    Transparent,
}

impl TypeFilter {
    /// Parses the user-facing shorthand. Unknown or empty input means "no filter".
    pub fn from_shorthand(shorthand: &str) -> Option<Self> {
        match shorthand.trim() {
            "line" | "linedrawing" => Some(TypeFilter::Line),
            "photo" => Some(TypeFilter::Photo),
            "clipart" => Some(TypeFilter::Clipart),
            "gif" | "animatedgif" => Some(TypeFilter::Gif),
            "transparent" => Some(TypeFilter::Transparent),
            _ => None,
        }
    }

    /// Filter code sent in the `qft` query parameter.
    pub fn code(self) -> &'static str {
        match self {
            TypeFilter::Line => "+filterui:photo-linedrawing",
            TypeFilter::Photo => "+filterui:photo-photo",
            TypeFilter::Clipart => "+filterui:photo-clipart",
            TypeFilter::Gif => "+filterui:photo-animatedgif",
            TypeFilter::Transparent => "+filterui:photo-transparent",
        }
    }
}

impl fmt::Display for TypeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TypeFilter::Line => "line",
            TypeFilter::Photo => "photo",
            TypeFilter::Clipart => "clipart",
            TypeFilter::Gif => "gif",
            TypeFilter::Transparent => "transparent",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("limit must be a positive integer")]
    ZeroLimit,
    #[error("query must not be empty")]
    EmptyQuery,
}

/// Parameters of one download invocation. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchSession {
    query: String,
    limit: usize,
    adult: AdultFilter,
    type_filter: Option<TypeFilter>,
    badsites: Vec<String>,
    timeout: Duration,
    image_prefix: String,
}

impl SearchSession {
    pub fn new(query: impl Into<String>, limit: usize) -> Result<Self, SessionError> {
        let query = query.into();
        if query.trim().is_empty() {
            return Err(SessionError::EmptyQuery);
        }
        if limit == 0 {
            return Err(SessionError::ZeroLimit);
        }
        Ok(Self {
            query,
            limit,
            adult: AdultFilter::Off,
            type_filter: None,
            badsites: Vec::new(),
            timeout: Duration::from_secs(60),
            image_prefix: "Image".to_string(),
        })
    }

    pub fn with_adult(mut self, adult: AdultFilter) -> Self {
        self.adult = adult;
        self
    }

    pub fn with_type_filter(mut self, type_filter: Option<TypeFilter>) -> Self {
        self.type_filter = type_filter;
        self
    }

    /// Empty entries are dropped: an empty substring would match every URL.
    pub fn with_badsites<I, S>(mut self, badsites: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.badsites = badsites
            .into_iter()
            .map(Into::into)
            .filter(|site: &String| !site.is_empty())
            .collect();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_image_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.image_prefix = prefix.into();
        self
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn adult(&self) -> AdultFilter {
        self.adult
    }

    pub fn type_filter(&self) -> Option<TypeFilter> {
        self.type_filter
    }

    pub fn badsites(&self) -> &[String] {
        &self.badsites
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn image_prefix(&self) -> &str {
        &self.image_prefix
    }
}
