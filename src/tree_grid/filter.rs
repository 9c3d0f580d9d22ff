use ahash::HashSet;

use super::types::{DataItem, DataItemRow, ItemId};

/// Grid-wide search box semantics: every whitespace-separated word of the search text must occur
/// (case-insensitively) somewhere in the row's searchable text.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QuickFilter {
    words: Vec<String>,
}

impl QuickFilter {
    pub fn new(search: &str) -> Self {
        Self {
            words: search.split_whitespace().map(str::to_lowercase).collect(),
        }
    }

    /// True if the filter lets everything through.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn matches(&self, item: &DataItem) -> bool {
        if self.words.is_empty() {
            return true;
        }
        let text = quick_filter_text(item).to_lowercase();
        self.words.iter().all(|word| text.contains(word.as_str()))
    }

    /// Ids to show for a tree: every matching row plus all of its ancestors.
    pub fn retained_ids(&self, rows: &[DataItemRow]) -> HashSet<ItemId> {
        let mut keep = HashSet::default();
        for row in rows.iter().filter(|row| self.matches(&row.item)) {
            keep.extend(row.path.iter().cloned());
        }
        keep
    }
}

/// The searchable text of one item.
///
/// The id is wrapped as `id:(<id>)` so a search for `id:(grp:1)` finds exactly that item.
pub fn quick_filter_text(item: &DataItem) -> String {
    format!(
        "{} id:({}) {} {} {} {}",
        item.label, item.id, item.kind, item.source, item.count, item.description
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree_builder::ForestBuilder;
    use crate::tree_grid::flatten::flatten_rows;

    fn item(id: &str, label: &str) -> DataItem {
        DataItem {
            description: "Quarterly numbers".to_owned(),
            ..DataItem::new(id, label)
        }
    }

    #[test]
    fn all_words_must_match_case_insensitively() {
        let it = item("grp:12", "Sales Europe");
        assert!(QuickFilter::new("").matches(&it));
        assert!(QuickFilter::new("  sales  ").matches(&it));
        assert!(QuickFilter::new("EUROPE quarterly").matches(&it));
        assert!(!QuickFilter::new("europe asia").matches(&it));
    }

    #[test]
    fn id_search_is_exact_with_parentheses() {
        let one = item("grp:1", "One");
        let twelve = item("grp:12", "Twelve");
        let filter = QuickFilter::new("id:(grp:1)");
        assert!(filter.matches(&one));
        assert!(!filter.matches(&twelve));
        // Without the closing parenthesis it is a prefix search.
        assert!(QuickFilter::new("id:(grp:1").matches(&twelve));
    }

    #[test]
    fn ancestors_of_matches_are_retained() {
        let mut b = ForestBuilder::new();
        let a = b.group(None, "A");
        let bb = b.group(Some(&a), "B");
        b.item(Some(&bb), DataItem::new("needle", "Needle"));
        b.group(Some(&a), "C");
        b.group(None, "D");
        let rows = flatten_rows(&b.build());

        let keep = QuickFilter::new("needle").retained_ids(&rows);
        let mut kept: Vec<_> = keep.iter().map(ItemId::as_str).collect();
        kept.sort_unstable();
        assert_eq!(kept, ["A", "B", "needle"]);
    }
}
