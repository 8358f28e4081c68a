use serde::{Deserialize, Serialize};
use crate::models::store::StoreId;

/// Unordered partnership between two stores of different categories.
///
/// Always stored in canonical orientation: `store_a < store_b`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Affiliation {
    pub store_a: StoreId,
    pub store_b: StoreId,
}

impl Affiliation {
    /// Canonicalize a pair. Returns `None` for a self-pair.
    pub fn canonical(x: StoreId, y: StoreId) -> Option<Self> {
        match x.cmp(&y) {
            std::cmp::Ordering::Less => Some(Self { store_a: x, store_b: y }),
            std::cmp::Ordering::Greater => Some(Self { store_a: y, store_b: x }),
            std::cmp::Ordering::Equal => None,
        }
    }

    pub fn involves(&self, id: &StoreId) -> bool {
        &self.store_a == id || &self.store_b == id
    }

    /// The other side of the pair, if `id` is part of it.
    pub fn partner_of(&self, id: &StoreId) -> Option<&StoreId> {
        if &self.store_a == id {
            Some(&self.store_b)
        } else if &self.store_b == id {
            Some(&self.store_a)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_orders_pair() {
        let pair = Affiliation::canonical("b".into(), "a".into()).unwrap();
        assert_eq!(pair.store_a, StoreId::from("a"));
        assert_eq!(pair.store_b, StoreId::from("b"));
        assert_eq!(Affiliation::canonical("a".into(), "b".into()), Some(pair));
    }

    #[test]
    fn test_self_pair_rejected() {
        assert!(Affiliation::canonical("a".into(), "a".into()).is_none());
    }

    #[test]
    fn test_partner_of() {
        let pair = Affiliation::canonical("a".into(), "b".into()).unwrap();
        assert_eq!(pair.partner_of(&"a".into()), Some(&StoreId::from("b")));
        assert_eq!(pair.partner_of(&"b".into()), Some(&StoreId::from("a")));
        assert_eq!(pair.partner_of(&"c".into()), None);
    }
}
