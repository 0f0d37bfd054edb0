//! Next-item selection.
//!
//! Coverage by uniform random sampling over the unanswered items, with a
//! fixed chance of serving a validity-check item whenever one is left. This
//! is not information-maximizing selection.

use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::model::{Item, ItemId};

/// Probability of drawing from the validity-check pool when it is non-empty.
pub const VALIDITY_INJECTION_RATE: f64 = 0.2;

/// Pick the next item from `catalog`, skipping everything in `answered`.
///
/// Returns `None` if and only if every catalog item has been answered.
pub fn select_next_item<R: Rng + ?Sized>(
    catalog: &[Item],
    answered: &HashSet<ItemId>,
    rng: &mut R,
) -> Option<Item> {
    let pool: Vec<&Item> = catalog
        .iter()
        .filter(|item| !answered.contains(&item.id))
        .collect();

    if pool.is_empty() {
        return None;
    }

    let validity_pool: Vec<&Item> = pool
        .iter()
        .copied()
        .filter(|item| item.is_validity_check)
        .collect();

    if !validity_pool.is_empty() && rng.gen::<f64>() < VALIDITY_INJECTION_RATE {
        return validity_pool.choose(rng).map(|item| (*item).clone());
    }

    // The full pool may itself yield a validity item.
    pool.choose(rng).map(|item| (*item).clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Keying, Trait};
    use rand::rngs::mock::StepRng;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn item(id: ItemId, validity: bool) -> Item {
        Item {
            id,
            text: format!("item {id}"),
            scale: Trait::ALL[(id as usize) % 5],
            keyed: Keying::Plus,
            is_validity_check: validity,
        }
    }

    fn catalog(regular: u32, validity: u32) -> Vec<Item> {
        (1..=regular)
            .map(|id| item(id, false))
            .chain((regular + 1..=regular + validity).map(|id| item(id, true)))
            .collect()
    }

    #[test]
    fn never_returns_answered_item() {
        let items = catalog(10, 2);
        let mut rng = StdRng::seed_from_u64(7);
        let answered: HashSet<ItemId> = (1..=9).collect();
        for _ in 0..200 {
            let next = select_next_item(&items, &answered, &mut rng).unwrap();
            assert!(!answered.contains(&next.id));
        }
    }

    #[test]
    fn none_only_when_pool_is_empty() {
        let items = catalog(3, 1);
        let mut rng = StdRng::seed_from_u64(1);
        let mut answered = HashSet::new();
        while let Some(next) = select_next_item(&items, &answered, &mut rng) {
            assert!(answered.insert(next.id), "item {} served twice", next.id);
        }
        assert_eq!(answered.len(), items.len());
        assert!(select_next_item(&[], &HashSet::new(), &mut rng).is_none());
    }

    #[test]
    fn low_draw_serves_validity_item() {
        let items = catalog(20, 2);
        // StepRng(0, 0) always draws 0.0, below the injection rate.
        let mut rng = StepRng::new(0, 0);
        let next = select_next_item(&items, &HashSet::new(), &mut rng).unwrap();
        assert!(next.is_validity_check);
    }

    #[test]
    fn validity_rate_is_roughly_twenty_percent() {
        // One trap among 100 items: P = 0.2 + 0.8 * 1/100 = 0.208.
        let items = catalog(99, 1);
        let mut rng = StdRng::seed_from_u64(2024);
        let trials = 10_000;
        let hits = (0..trials)
            .filter(|_| {
                select_next_item(&items, &HashSet::new(), &mut rng)
                    .is_some_and(|i| i.is_validity_check)
            })
            .count();
        let rate = hits as f64 / trials as f64;
        assert!((0.18..0.24).contains(&rate), "validity rate {rate}");
    }

    #[test]
    fn answered_validity_items_are_not_reoffered() {
        let items = catalog(2, 1);
        let answered: HashSet<ItemId> = [3].into_iter().collect();
        let mut rng = StepRng::new(0, 0);
        let next = select_next_item(&items, &answered, &mut rng).unwrap();
        assert!(!next.is_validity_check);
    }
}
