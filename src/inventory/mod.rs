//! Inventory view state: the listing collection and its name filter.

use std::sync::Arc;

use crate::models::Listing;

/// The listing collection as last fetched.
///
/// Only the fetch routine writes it, and always wholesale.
#[derive(Debug, Clone, Default)]
pub struct Inventory {
    listings: Arc<Vec<Listing>>,
    load_error: Option<String>,
    issued: u64,
    applied: u64,
}

impl Inventory {
    /// Number the next fetch so an older response never overwrites a newer one.
    pub fn issue_ticket(&mut self) -> u64 {
        self.issued += 1;
        self.issued
    }

    /// Apply a fetch result unless a later fetch already landed.
    pub fn apply(&mut self, ticket: u64, listings: Vec<Listing>) -> bool {
        if ticket <= self.applied {
            return false;
        }
        self.applied = ticket;
        self.replace(listings);
        true
    }

    /// Record a failed fetch unless a later fetch already landed.
    pub fn apply_failure(&mut self, ticket: u64, message: String) -> bool {
        if ticket <= self.applied {
            return false;
        }
        self.applied = ticket;
        self.record_failure(message);
        true
    }

    /// Replace the collection with a fresh fetch and clear any load error.
    pub fn replace(&mut self, listings: Vec<Listing>) {
        self.listings = Arc::new(listings);
        self.load_error = None;
    }

    /// Keep the current collection and remember why the refresh failed.
    pub fn record_failure(&mut self, message: String) {
        self.load_error = Some(message);
    }

    #[cfg(test)]
    pub fn listings(&self) -> Arc<Vec<Listing>> {
        Arc::clone(&self.listings)
    }

    pub fn load_error(&self) -> Option<&str> {
        self.load_error.as_deref()
    }

    pub fn get(&self, id: i64) -> Option<&Listing> {
        self.listings.iter().find(|l| l.id == id)
    }

    /// Listings whose name contains `query`, ignoring case.
    pub fn filter(&self, query: &str) -> Vec<&Listing> {
        filter_by_name(&self.listings, query)
    }
}

/// Case-insensitive substring match on `name`; an empty query matches everything.
pub fn filter_by_name<'a>(listings: &'a [Listing], query: &str) -> Vec<&'a Listing> {
    let needle = query.to_lowercase();
    listings
        .iter()
        .filter(|l| l.name.to_lowercase().contains(&needle))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Condition;

    fn listing(id: i64, name: &str) -> Listing {
        Listing {
            id,
            name: name.to_string(),
            price: "1".to_string(),
            year: Some(2020),
            condition: Condition::Tokunbo,
            image_url: String::new(),
        }
    }

    fn inventory() -> Inventory {
        let mut inv = Inventory::default();
        inv.replace(vec![
            listing(3, "Toyota Camry"),
            listing(2, "Lexus RX 350"),
            listing(1, "Toyota Corolla"),
        ]);
        inv
    }

    #[test]
    fn test_empty_query_returns_everything() {
        let inv = inventory();
        assert_eq!(inv.filter("").len(), 3);
    }

    #[test]
    fn test_case_variant_substrings_match() {
        let inv = inventory();
        for query in ["camry", "CAMRY", "a Ca", "Toyota Camry", "oTa cAm"] {
            let ids: Vec<i64> = inv.filter(query).iter().map(|l| l.id).collect();
            assert_eq!(ids, vec![3], "query {:?}", query);
        }
    }

    #[test]
    fn test_filter_keeps_order() {
        let inv = inventory();
        let ids: Vec<i64> = inv.filter("toyota").iter().map(|l| l.id).collect();
        assert_eq!(ids, vec![3, 1]);
    }

    #[test]
    fn test_no_match_is_empty() {
        let inv = inventory();
        assert!(inv.filter("Mercedes").is_empty());
    }

    #[test]
    fn test_failure_keeps_listings() {
        let mut inv = inventory();
        inv.record_failure("connection refused".to_string());

        assert_eq!(inv.listings().len(), 3);
        assert_eq!(inv.load_error(), Some("connection refused"));

        inv.replace(vec![listing(9, "Venza")]);
        assert_eq!(inv.load_error(), None);
        assert_eq!(inv.get(9).map(|l| l.name.as_str()), Some("Venza"));
        assert!(inv.get(3).is_none());
    }

    #[test]
    fn test_stale_fetch_is_dropped() {
        let mut inv = Inventory::default();
        let older = inv.issue_ticket();
        let newer = inv.issue_ticket();

        assert!(inv.apply(newer, vec![listing(2, "Venza")]));
        assert!(!inv.apply(older, vec![listing(1, "Camry")]));
        assert!(!inv.apply_failure(older, "timeout".to_string()));

        assert_eq!(inv.listings().len(), 1);
        assert_eq!(inv.listings()[0].name, "Venza");
        assert_eq!(inv.load_error(), None);
    }
}
