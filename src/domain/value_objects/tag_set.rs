/// An ordered set of tags.
///
/// Membership ignores order, but the order tags were first given in is kept
/// for display. Tags are trimmed; blanks and duplicates are dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct TagSet(Vec<String>);

impl TagSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Split a comma-separated form value into a tag set
    pub fn parse(raw: &str) -> Self {
        raw.split(',').map(str::to_string).collect()
    }

    /// Add a tag, returning false if it was blank or already present
    pub fn insert(&mut self, tag: &str) -> bool {
        let tag = tag.trim();
        if tag.is_empty() || self.contains(tag) {
            return false;
        }
        self.0.push(tag.to_string());
        true
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.0.iter().any(|t| t == tag)
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

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl FromIterator<String> for TagSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        let mut set = TagSet::new();
        for tag in iter {
            set.insert(&tag);
        }
        set
    }
}

impl<'a> Extend<&'a str> for TagSet {
    fn extend<I: IntoIterator<Item = &'a str>>(&mut self, iter: I) {
        for tag in iter {
            self.insert(tag);
        }
    }
}

impl From<Vec<String>> for TagSet {
    fn from(tags: Vec<String>) -> Self {
        tags.into_iter().collect()
    }
}

impl From<TagSet> for Vec<String> {
    fn from(set: TagSet) -> Self {
        set.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trims_and_dedupes() {
        let tags = TagSet::parse(" 飲料, 食品 ,,飲料, ");
        assert_eq!(tags.as_slice(), &["飲料".to_string(), "食品".to_string()]);
    }

    #[test]
    fn test_parse_empty() {
        assert!(TagSet::parse("").is_empty());
        assert!(TagSet::parse(" , ").is_empty());
    }

    #[test]
    fn test_insert_reports_duplicates() {
        let mut tags = TagSet::new();
        assert!(tags.insert("auto"));
        assert!(!tags.insert("auto"));
        assert!(!tags.insert("  "));
        assert_eq!(tags.len(), 1);
    }
}
