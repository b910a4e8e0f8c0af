// src/application/list_state.rs
use crate::domain::{DomainError, Listable};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    Newest,
    Oldest,
    MostLiked,
    TitleAz,
    TitleZa,
}

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Newest => "newest",
            SortKey::Oldest => "oldest",
            SortKey::MostLiked => "mostLiked",
            SortKey::TitleAz => "titleAZ",
            SortKey::TitleZa => "titleZA",
        }
    }

    /// Unknown keys sort newest first, the same as an unset sort box.
    pub fn lenient(value: &str) -> Self {
        value.parse().unwrap_or_default()
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "newest" => Ok(SortKey::Newest),
            "oldest" => Ok(SortKey::Oldest),
            "mostliked" => Ok(SortKey::MostLiked),
            "titleaz" => Ok(SortKey::TitleAz),
            "titleza" => Ok(SortKey::TitleZa),
            _ => Err(DomainError::InvalidInput(format!("Unknown sort key: {s}"))),
        }
    }
}

/// Case-insensitive substring match over title and description.
///
/// An empty or whitespace-only term keeps every item.
pub fn filter_items<'a, T: Listable>(items: &'a [T], term: &str) -> Vec<&'a T> {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return items.iter().collect();
    }
    items
        .iter()
        .filter(|item| {
            item.title().to_lowercase().contains(&needle)
                || item.description().to_lowercase().contains(&needle)
        })
        .collect()
}

fn compare_titles<T: Listable>(a: &T, b: &T) -> Ordering {
    a.title()
        .to_lowercase()
        .cmp(&b.title().to_lowercase())
        .then_with(|| a.title().cmp(b.title()))
}

/// Stable reorder; items comparing equal keep their relative order.
pub fn sort_items<T: Listable>(mut items: Vec<&T>, key: SortKey) -> Vec<&T> {
    match key {
        SortKey::Newest => items.sort_by(|a, b| b.created_at().cmp(&a.created_at())),
        SortKey::Oldest => items.sort_by(|a, b| a.created_at().cmp(&b.created_at())),
        SortKey::MostLiked => items.sort_by(|a, b| b.likes().cmp(&a.likes())),
        SortKey::TitleAz => items.sort_by(|a, b| compare_titles(*a, *b)),
        SortKey::TitleZa => items.sort_by(|a, b| compare_titles(*b, *a)),
    }
    items
}

/// Last successfully fetched collection plus the message of the last failed fetch.
#[derive(Debug, Clone, PartialEq)]
pub struct ListState<T> {
    snapshot: Vec<T>,
    last_error: Option<String>,
    loaded: bool,
}

impl<T> Default for ListState<T> {
    fn default() -> Self {
        Self {
            snapshot: Vec::new(),
            last_error: None,
            loaded: false,
        }
    }
}

impl<T: Listable> ListState<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole snapshot with a fresh fetch result.
    pub fn replace(&mut self, items: Vec<T>) {
        self.snapshot = items;
        self.last_error = None;
        self.loaded = true;
    }

    /// Keep the previous snapshot and remember why the fetch failed.
    pub fn record_failure(&mut self, message: impl Into<String>) {
        self.last_error = Some(message.into());
    }

    pub fn snapshot(&self) -> &[T] {
        &self.snapshot
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn len(&self) -> usize {
        self.snapshot.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.snapshot.iter().find(|item| item.id() == id)
    }

    /// Swap in a server-confirmed copy of one record. Returns false if it is not in the snapshot.
    pub fn replace_item(&mut self, item: T) -> bool {
        match self.snapshot.iter_mut().find(|existing| existing.id() == item.id()) {
            Some(slot) => {
                *slot = item;
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: &str) -> Option<T> {
        let position = self.snapshot.iter().position(|item| item.id() == id)?;
        Some(self.snapshot.remove(position))
    }

    pub fn filter(&self, term: &str) -> Vec<&T> {
        filter_items(&self.snapshot, term)
    }

    pub fn sort(&self, key: SortKey) -> Vec<&T> {
        sort_items(self.snapshot.iter().collect(), key)
    }

    /// Filter, then sort. Never touches the snapshot.
    pub fn view(&self, term: &str, key: SortKey) -> Vec<&T> {
        sort_items(self.filter(term), key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Idea;
    use crate::util::testing::idea;
    use rstest::rstest;

    fn ids(items: &[&Idea]) -> Vec<String> {
        items.iter().map(|i| i.id.clone()).collect()
    }

    fn sample_state() -> ListState<Idea> {
        let mut state = ListState::new();
        state.replace(vec![
            idea("1", "Learn Rust", "Ownership and borrowing", 10, 2),
            idea("2", "Guitar basics", "Chords for beginners", 30, 5),
            idea("3", "baking bread", "Sourdough starter in RUST colored pot", 20, 5),
        ]);
        state
    }

    #[test]
    fn given_empty_term_when_filtering_then_returns_full_snapshot_unchanged() {
        let state = sample_state();

        let result = state.filter("");

        assert_eq!(ids(&result), vec!["1", "2", "3"]);
        assert_eq!(ids(&state.filter("   ")), vec!["1", "2", "3"]);
    }

    #[test]
    fn given_unmatched_term_when_filtering_then_returns_empty() {
        let state = sample_state();
        assert!(state.filter("quantum").is_empty());
    }

    #[test]
    fn given_mixed_case_term_when_filtering_then_matches_title_or_description() {
        let state = sample_state();

        let result = state.filter("rUsT");

        assert_eq!(ids(&result), vec!["1", "3"]);
    }

    #[rstest]
    #[case(SortKey::Newest, vec!["2", "3", "1"])]
    #[case(SortKey::Oldest, vec!["1", "3", "2"])]
    #[case(SortKey::MostLiked, vec!["2", "3", "1"])]
    #[case(SortKey::TitleAz, vec!["3", "2", "1"])]
    #[case(SortKey::TitleZa, vec!["1", "2", "3"])]
    fn given_snapshot_when_sorting_then_orders_by_key(
        #[case] key: SortKey,
        #[case] expected: Vec<&str>,
    ) {
        let state = sample_state();
        assert_eq!(ids(&state.sort(key)), expected);
    }

    #[test]
    fn given_equal_like_counts_when_sorting_most_liked_then_keeps_snapshot_order() {
        let mut state = ListState::new();
        state.replace(vec![
            idea("a", "A", "", 1, 3),
            idea("b", "B", "", 2, 3),
            idea("c", "C", "", 3, 3),
        ]);

        assert_eq!(ids(&state.sort(SortKey::MostLiked)), vec!["a", "b", "c"]);
    }

    #[test]
    fn given_distinct_titles_when_sorting_az_then_za_then_orders_are_reversed() {
        let state = sample_state();

        let az = ids(&state.sort(SortKey::TitleAz));
        let mut za = ids(&state.sort(SortKey::TitleZa));
        za.reverse();

        assert_eq!(az, za);
    }

    #[test]
    fn given_filter_and_sort_when_viewing_then_snapshot_is_untouched() {
        let state = sample_state();

        let view = state.view("rust", SortKey::TitleAz);

        assert_eq!(ids(&view), vec!["3", "1"]);
        let snapshot: Vec<&str> = state.snapshot().iter().map(|i| i.id.as_str()).collect();
        assert_eq!(snapshot, vec!["1", "2", "3"]);
    }

    #[test]
    fn given_loaded_snapshot_when_fetch_fails_then_keeps_items_and_records_message() {
        let mut state = sample_state();

        state.record_failure("Error loading ideas");

        assert_eq!(state.len(), 3);
        assert_eq!(state.last_error(), Some("Error loading ideas"));
    }

    #[test]
    fn given_recorded_failure_when_replacing_then_clears_error() {
        let mut state = sample_state();
        state.record_failure("boom");

        state.replace(vec![idea("9", "Only", "", 0, 0)]);

        assert_eq!(state.len(), 1);
        assert!(state.last_error().is_none());
    }

    #[rstest]
    #[case("newest", SortKey::Newest)]
    #[case("mostLiked", SortKey::MostLiked)]
    #[case("titleAZ", SortKey::TitleAz)]
    #[case("title-za", SortKey::TitleZa)]
    #[case("OLDEST", SortKey::Oldest)]
    fn given_sort_option_text_when_parsing_then_maps_key(#[case] text: &str, #[case] key: SortKey) {
        assert_eq!(text.parse::<SortKey>().unwrap(), key);
    }

    #[test]
    fn given_unknown_sort_option_when_parsing_leniently_then_defaults_to_newest() {
        assert!("random".parse::<SortKey>().is_err());
        assert_eq!(SortKey::lenient("random"), SortKey::Newest);
    }

    #[test]
    fn given_confirmed_item_when_replacing_item_then_updates_in_place() {
        let mut state = sample_state();

        let updated = state.replace_item(idea("2", "Guitar basics", "", 30, 6));

        assert!(updated);
        assert_eq!(state.get("2").map(|i| i.likes_count), Some(6));
        assert!(!state.replace_item(idea("404", "Ghost", "", 0, 0)));
    }
}
