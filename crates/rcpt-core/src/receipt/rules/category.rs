//! Category hint matching.

use crate::models::config::CategoryKeyword;

use super::FieldExtractor;

/// Keyword-based category matcher.
///
/// Keywords are tried in list order; the first keyword found anywhere in
/// the text (case-insensitive) decides the label, regardless of where in the
/// text it occurs.
pub struct CategoryMatcher {
    keywords: Vec<(String, String)>,
}

impl CategoryMatcher {
    pub fn new(keywords: &[CategoryKeyword]) -> Self {
        Self {
            keywords: keywords
                .iter()
                .filter(|k| !k.keyword.trim().is_empty())
                .map(|k| (k.keyword.trim().to_lowercase(), k.label.clone()))
                .collect(),
        }
    }

    fn matching<'a>(&'a self, haystack: &'a str) -> impl Iterator<Item = &'a String> + 'a {
        self.keywords
            .iter()
            .filter(move |(keyword, _)| haystack.contains(keyword.as_str()))
            .map(|(_, label)| label)
    }
}

impl FieldExtractor for CategoryMatcher {
    type Output = String;

    /// Label of the first matching keyword.
    fn extract(&self, text: &str) -> Option<String> {
        let haystack = text.to_lowercase();
        self.matching(&haystack).next().cloned()
    }

    /// Labels of every matching keyword, in keyword order.
    fn extract_all(&self, text: &str) -> Vec<String> {
        let haystack = text.to_lowercase();
        let mut labels: Vec<String> = Vec::new();
        for label in self.matching(&haystack) {
            if !labels.contains(label) {
                labels.push(label.clone());
            }
        }
        labels
    }
}

impl Default for CategoryMatcher {
    fn default() -> Self {
        Self::new(&crate::models::config::ExtractionConfig::default().category_keywords)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_list_order_not_position() {
        let matcher = CategoryMatcher::default();
        // "travel" appears first in the text, but "food" is earlier in the list.
        let text = "Travel Plaza\nFood court\nRs 300";
        assert_eq!(matcher.extract(text), Some("Food".to_string()));
    }

    #[test]
    fn test_case_insensitive() {
        let matcher = CategoryMatcher::default();
        assert_eq!(matcher.extract("CITY FUEL STATION"), Some("Fuel".to_string()));
    }

    #[test]
    fn test_no_keyword() {
        let matcher = CategoryMatcher::default();
        assert_eq!(matcher.extract("SuperMart Grocers"), None);
    }

    #[test]
    fn test_extract_all_in_keyword_order() {
        let matcher = CategoryMatcher::default();
        let text = "Travel Plaza Food court, fuel pump";
        assert_eq!(
            matcher.extract_all(text),
            vec!["Fuel".to_string(), "Food".to_string(), "Travel".to_string()]
        );
        assert!(matcher.extract_all("nothing here").is_empty());
    }

    #[test]
    fn test_custom_keywords() {
        let matcher = CategoryMatcher::new(&[
            CategoryKeyword::new("pharmacy", "Health"),
            CategoryKeyword::new("  ", "Ignored"),
        ]);
        assert_eq!(matcher.extract("City Pharmacy"), Some("Health".to_string()));
        assert_eq!(matcher.extract("anything"), None);
    }
}
