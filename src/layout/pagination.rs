//! Splits the scope feature list into fixed-size slide pages.

use serde::Serialize;

use crate::models::ScopeFeature;

/// Number of feature cards that fit on one scope slide.
pub const FEATURES_PER_PAGE: usize = 4;

/// The features assigned to one scope slide.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeaturePage<'a> {
    pub features: &'a [ScopeFeature],
    /// 0-based index of this page.
    pub page_index: usize,
    pub page_count: usize,
}

impl FeaturePage<'_> {
    /// Title suffix such as ` (2/3)`, empty when everything fits on one page.
    pub fn counter_suffix(&self) -> String {
        if self.page_count > 1 {
            format!(" ({}/{})", self.page_index + 1, self.page_count)
        } else {
            String::new()
        }
    }
}

/// Split `features` into pages of at most `page_size` items, preserving order.
///
/// Feature `i` always lands on page `i / page_size`, so a preview that only
/// shows the first page and an export that emits every page agree on page
/// membership. An empty list yields no pages; a `page_size` of zero is
/// treated as one.
pub fn paginate(features: &[ScopeFeature], page_size: usize) -> Vec<FeaturePage<'_>> {
    let page_size = page_size.max(1);
    let page_count = features.len().div_ceil(page_size);
    features
        .chunks(page_size)
        .enumerate()
        .map(|(page_index, chunk)| FeaturePage {
            features: chunk,
            page_index,
            page_count,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn features(n: usize) -> Vec<ScopeFeature> {
        (0..n)
            .map(|i| ScopeFeature::new(format!("Feature {}", i), ""))
            .collect()
    }

    #[test]
    fn empty_input_yields_no_pages() {
        assert!(paginate(&[], FEATURES_PER_PAGE).is_empty());
    }

    #[test]
    fn nine_features_fill_four_four_one() {
        let input = features(9);
        let pages = paginate(&input, FEATURES_PER_PAGE);
        let sizes: Vec<usize> = pages.iter().map(|p| p.features.len()).collect();
        assert_eq!(sizes, vec![4, 4, 1]);
        assert!(pages.iter().all(|p| p.page_count == 3));
        assert_eq!(pages[2].features[0].header, "Feature 8");
    }

    #[test]
    fn exact_multiple_has_no_trailing_page() {
        let input = features(8);
        assert_eq!(paginate(&input, FEATURES_PER_PAGE).len(), 2);
    }

    #[test]
    fn counter_suffix_only_when_paginated() {
        let one = features(3);
        assert_eq!(paginate(&one, 4)[0].counter_suffix(), "");

        let many = features(5);
        let pages = paginate(&many, 4);
        assert_eq!(pages[0].counter_suffix(), " (1/2)");
        assert_eq!(pages[1].counter_suffix(), " (2/2)");
    }

    #[test]
    fn zero_page_size_is_treated_as_one() {
        let input = features(3);
        assert_eq!(paginate(&input, 0).len(), 3);
    }
}
