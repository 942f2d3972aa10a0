use crate::error::{Result, SarError};
use memchr::memmem::Finder;

/// What a search job looks for. At least one filter is always set.
#[derive(Clone, Debug)]
pub struct SearchQuery {
    filename: Option<String>,
    keyword: Option<String>,
    /// Compiled once, shared by every worker.
    finder: Option<Finder<'static>>,
}

impl SearchQuery {
    /// Empty strings count as "not given".
    pub fn new(filename: Option<String>, keyword: Option<String>) -> Result<Self> {
        let filename = filename.filter(|s| !s.is_empty());
        let keyword = keyword.filter(|s| !s.is_empty());
        if filename.is_none() && keyword.is_none() {
            return Err(SarError::Argument(
                "specify a file name or a keyword to search for".into(),
            ));
        }
        let finder = keyword.as_deref().map(|k| Finder::new(k.as_bytes()).into_owned());
        Ok(Self {
            filename,
            keyword,
            finder,
        })
    }

    pub fn filename(&self) -> Option<&str> {
        self.filename.as_deref()
    }

    pub fn keyword(&self) -> Option<&str> {
        self.keyword.as_deref()
    }

    /// Exact, case-sensitive name check. Always true without a name filter.
    pub fn admits_name(&self, name: &str) -> bool {
        self.filename.as_deref().is_none_or(|f| f == name)
    }

    /// Case-sensitive byte containment of the keyword. Always true without
    /// a keyword filter.
    pub fn admits_contents(&self, haystack: &[u8]) -> bool {
        match &self.finder {
            None => true,
            Some(f) if f.needle().is_empty() => true,
            Some(f) => f.find(haystack).is_some(),
        }
    }
}
