use std::collections::HashSet;

/// URLs already captured or chosen as the next page.
///
/// Membership is exact string equality: no normalization of trailing
/// slashes, fragments or queries. The set only ever grows.
#[derive(Debug, Default, Clone)]
pub struct VisitedSet {
    seen: HashSet<String>,
    order: Vec<String>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a URL as visited. Returns false if it already was.
    pub fn insert(&mut self, url: &str) -> bool {
        if self.seen.contains(url) {
            ::log::trace!("Already visited: {}", url);
            return false;
        }
        self.seen.insert(url.to_string());
        self.order.push(url.to_string());
        true
    }

    pub fn contains(&self, url: &str) -> bool {
        self.seen.contains(url)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Visited URLs in the order they were added
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn into_vec(self) -> Vec<String> {
        self.order
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_membership() {
        let mut visited = VisitedSet::new();
        assert!(visited.is_empty());
        assert!(visited.insert("https://a.test/"));
        assert!(!visited.insert("https://a.test/"));

        // Near-duplicates are distinct entries
        assert!(visited.insert("https://a.test"));
        assert!(visited.insert("https://a.test/#top"));
        assert!(visited.insert("https://a.test/?q=1"));

        assert_eq!(visited.len(), 4);
        assert!(visited.contains("https://a.test"));
        assert!(!visited.contains("https://A.test/"));
    }

    #[test]
    fn test_insertion_order() {
        let mut visited = VisitedSet::new();
        for url in ["c", "a", "b", "a"] {
            visited.insert(url);
        }
        assert_eq!(visited.iter().collect::<Vec<_>>(), vec!["c", "a", "b"]);
        assert_eq!(visited.into_vec(), vec!["c", "a", "b"]);
    }
}
