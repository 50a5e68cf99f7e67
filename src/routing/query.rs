//! Query normalization and keyword matching

/// Lowercased query with whitespace runs collapsed to single spaces.
///
/// All intent matching runs against this form, which is what makes routing
/// case-insensitive and indifferent to stray spacing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedQuery(String);

impl NormalizedQuery {
    /// Returns `None` for an empty or whitespace-only query
    pub fn parse(raw: &str) -> Option<Self> {
        let normalized = raw
            .split_whitespace()
            .map(|word| word.to_lowercase())
            .collect::<Vec<_>>()
            .join(" ");

        if normalized.is_empty() {
            None
        } else {
            Some(Self(normalized))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.0.contains(needle)
    }

    /// Byte offset of the first occurrence of `needle`
    pub fn position(&self, needle: &str) -> Option<usize> {
        self.0.find(needle)
    }

    /// Text following the first occurrence of `phrase`
    pub fn after(&self, phrase: &str) -> Option<&str> {
        self.position(phrase)
            .map(|index| &self.0[index + phrase.len()..])
    }

    /// The whole word directly in front of the first occurrence of `needle`.
    ///
    /// `needle` must start a word, so "seafood" has no word before "food".
    /// Only alphabetic words count.
    pub fn word_before(&self, needle: &str) -> Option<&str> {
        let index = self.position(needle)?;
        let head = self.0[..index].strip_suffix(' ')?;
        let word = head.rsplit(' ').next()?;

        if !word.is_empty() && word.chars().all(char::is_alphabetic) {
            Some(word)
        } else {
            None
        }
    }
}

/// Case-insensitive substring keyword list. Keywords are normalized the
/// same way queries are, so configured `Road  Conditions` matches.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KeywordSet {
    keywords: Vec<String>,
}

impl KeywordSet {
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keywords = keywords
            .into_iter()
            .filter_map(|k| NormalizedQuery::parse(k.as_ref()))
            .map(|k| k.0)
            .collect();
        Self { keywords }
    }

    /// First keyword, in declaration order, contained in the query
    pub fn find_in(&self, query: &NormalizedQuery) -> Option<&str> {
        self.keywords
            .iter()
            .find(|keyword| query.contains(keyword.as_str()))
            .map(String::as_str)
    }

    /// Keyword whose occurrence starts earliest in the query. Ties go to
    /// declaration order.
    pub fn earliest_in(&self, query: &NormalizedQuery) -> Option<&str> {
        self.keywords
            .iter()
            .filter_map(|keyword| query.position(keyword).map(|index| (index, keyword)))
            .min_by_key(|(index, _)| *index)
            .map(|(_, keyword)| keyword.as_str())
    }

    pub fn matches(&self, query: &NormalizedQuery) -> bool {
        self.find_in(query).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.keywords.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }
}
