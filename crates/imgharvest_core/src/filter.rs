use std::collections::HashSet;

/// URLs already dispatched in this session. Insertion-only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeenSet {
    urls: HashSet<String>,
}

impl SeenSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, url: &str) -> bool {
        self.urls.contains(url)
    }

    /// Returns `true` if the URL was not seen before.
    pub fn insert(&mut self, url: &str) -> bool {
        if self.urls.contains(url) {
            return false;
        }
        self.urls.insert(url.to_string())
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}

/// Verdict for a single candidate link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Admission {
    Admitted,
    AlreadySeen,
    Badsite(String),
}

impl Admission {
    pub fn is_admitted(&self) -> bool {
        matches!(self, Admission::Admitted)
    }
}

/// Badsite exclusion plus seen-URL dedup.
///
/// Badsites are matched as case-sensitive literal substrings of the full URL,
/// so a badsite string may also hit a path or query of an unrelated host.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkFilter {
    badsites: Vec<String>,
}

impl LinkFilter {
    pub fn new(badsites: Vec<String>) -> Self {
        Self { badsites }
    }

    pub fn badsites(&self) -> &[String] {
        &self.badsites
    }

    /// Checks a URL against the badsites and `seen`; admitted URLs are recorded in `seen`.
    pub fn check(&self, url: &str, seen: &mut SeenSet) -> Admission {
        if let Some(site) = self.matching_badsite(url) {
            return Admission::Badsite(site.to_string());
        }
        if !seen.insert(url) {
            return Admission::AlreadySeen;
        }
        Admission::Admitted
    }

    pub fn admit(&self, url: &str, seen: &mut SeenSet) -> bool {
        self.check(url, seen).is_admitted()
    }

    /// Filters a page worth of links, keeping extraction order.
    ///
    /// A link repeated within the same page is admitted once.
    pub fn admit_all<I, S>(&self, links: I, seen: &mut SeenSet) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        links
            .into_iter()
            .filter(|link| self.admit(link.as_ref(), seen))
            .map(|link| link.as_ref().to_string())
            .collect()
    }

    fn matching_badsite(&self, url: &str) -> Option<&str> {
        self.badsites
            .iter()
            .map(String::as_str)
            .find(|site| url.contains(site))
    }
}
