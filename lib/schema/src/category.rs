//! Cardinality capping for categorical columns
//!
//! One-hot encoding a column with thousands of distinct values (IP addresses,
//! user agents) would explode the feature space. Only the most frequent
//! values survive; everything else collapses into [`OTHER_CATEGORY`].

use ahash::{AHashMap, AHashSet};

/// Number of distinct values kept per categorical column
pub const DEFAULT_TOP_K: usize = 20;

/// Sentinel replacing every value outside the retained set
pub const OTHER_CATEGORY: &str = "Other";

/// The retained value set of one categorical column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryCap {
    retained: AHashSet<String>,
}

impl CategoryCap {
    /// Keep the `top_k` most frequent values of `values`.
    ///
    /// Ranking is by count, descending; equal counts keep the value seen
    /// first. Missing cells are not counted.
    pub fn from_frequencies(values: &[Option<String>], top_k: usize) -> Self {
        let retained = most_frequent(values, top_k)
            .into_iter()
            .map(str::to_string)
            .collect();
        Self { retained }
    }

    /// A cap with a fixed retained set, captured at training time
    pub fn frozen(values: &[String]) -> Self {
        Self {
            retained: values.iter().cloned().collect(),
        }
    }

    /// The category a cell is encoded under. Missing cells fall into
    /// [`OTHER_CATEGORY`] like any other unretained value.
    #[inline]
    pub fn apply<'a>(&self, value: Option<&'a str>) -> &'a str {
        match value {
            Some(v) if self.retained.contains(v) => v,
            _ => OTHER_CATEGORY,
        }
    }

    pub fn len(&self) -> usize {
        self.retained.len()
    }

    pub fn is_empty(&self) -> bool {
        self.retained.is_empty()
    }

    pub fn contains(&self, value: &str) -> bool {
        self.retained.contains(value)
    }
}

/// The `k` most frequent present values, most frequent first
pub fn most_frequent(values: &[Option<String>], k: usize) -> Vec<&str> {
    // value -> (count, first position)
    let mut counts: AHashMap<&str, (usize, usize)> = AHashMap::new();
    for (pos, value) in values.iter().enumerate() {
        if let Some(v) = value {
            counts.entry(v.as_str()).or_insert((0, pos)).0 += 1;
        }
    }

    let mut ranked: Vec<(&str, usize, usize)> = counts
        .into_iter()
        .map(|(value, (count, first))| (value, count, first))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));
    ranked.truncate(k);
    ranked.into_iter().map(|(value, _, _)| value).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column(values: &[&str]) -> Vec<Option<String>> {
        values.iter().map(|v| Some(v.to_string())).collect()
    }

    #[test]
    fn test_most_frequent_order() {
        let values = column(&["b", "a", "a", "c", "b", "a"]);
        assert_eq!(most_frequent(&values, 3), vec!["a", "b", "c"]);
        assert_eq!(most_frequent(&values, 1), vec!["a"]);
    }

    #[test]
    fn test_ties_break_by_first_seen() {
        let values = column(&["z", "y", "x", "y", "z", "x"]);
        assert_eq!(most_frequent(&values, 2), vec!["z", "y"]);
    }

    #[test]
    fn test_missing_not_counted() {
        let values = vec![None, None, None, Some("a".to_string())];
        assert_eq!(most_frequent(&values, 5), vec!["a"]);
    }

    #[test]
    fn test_cap_collapses_tail_into_other() {
        // 25 distinct values, the first five appear twice
        let mut raw: Vec<String> = (0..25).map(|i| format!("v{}", i)).collect();
        raw.extend((0..5).map(|i| format!("v{}", i)));
        let values: Vec<Option<String>> = raw.into_iter().map(Some).collect();

        let cap = CategoryCap::from_frequencies(&values, DEFAULT_TOP_K);
        assert_eq!(cap.len(), 20);
        for i in 0..20 {
            assert_eq!(cap.apply(Some(&format!("v{}", i))), format!("v{}", i));
        }
        for i in 20..25 {
            assert_eq!(cap.apply(Some(&format!("v{}", i))), OTHER_CATEGORY);
        }
        assert_eq!(cap.apply(None), OTHER_CATEGORY);
    }

    #[test]
    fn test_small_columns_untouched() {
        let values = column(&["GET", "POST", "GET"]);
        let cap = CategoryCap::from_frequencies(&values, DEFAULT_TOP_K);
        assert_eq!(cap.apply(Some("POST")), "POST");
        assert_eq!(cap.apply(Some("PUT")), OTHER_CATEGORY);
    }

    #[test]
    fn test_frozen() {
        let cap = CategoryCap::frozen(&["GET".to_string()]);
        assert_eq!(cap.apply(Some("GET")), "GET");
        assert_eq!(cap.apply(Some("POST")), OTHER_CATEGORY);
    }
}
