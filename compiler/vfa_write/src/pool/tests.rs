use pretty_assertions::assert_eq;
use proptest::prelude::*;

use super::*;

#[test]
fn absent_is_zero_and_ids_start_at_one() {
    let mut pool = IdPool::new("test");
    assert_eq!(pool.id_for(None::<u32>), 0);
    assert_eq!(pool.id_for(Some(40)), 1);
    assert_eq!(pool.id_for(Some(7)), 2);
    assert_eq!(pool.id_for(Some(40)), 1);
    assert_eq!(pool.len(), 2);
}

#[test]
fn ptr_for_inverts_id_for() {
    let mut pool = IdPool::new("test");
    pool.record('x');
    pool.record('y');
    assert_eq!(pool.ptr_for(0).ok(), Some(None));
    assert_eq!(pool.ptr_for(2).ok(), Some(Some('y')));
    assert_eq!(pool.get(1), Some('x'));
    assert_eq!(pool.get(0), None);
}

#[test]
fn ptr_for_past_the_end_is_a_violation() {
    let mut pool = IdPool::new("values");
    pool.record(1_u8);
    let err = pool
        .ptr_for(5)
        .err()
        .unwrap_or_else(|| panic!("id 5 should be out of range"));
    assert_eq!(
        err.violation(),
        Some(&Violation::IdOutOfRange {
            pool: "values",
            id: 5,
            len: 1,
        })
    );
}

#[test]
fn iter_follows_assignment_order() {
    let mut pool = IdPool::new("test");
    for item in [9, 3, 9, 5] {
        pool.record(item);
    }
    assert_eq!(pool.iter().collect::<Vec<_>>(), vec![(1, 9), (2, 3), (3, 5)]);
    assert_eq!(pool.lookup(5), Some(3));
    assert_eq!(pool.lookup(4), None);
}

proptest! {
    #[test]
    fn ids_are_stable_injective_and_nonzero(items in prop::collection::vec(0u32..64, 0..200)) {
        let mut pool = IdPool::new("prop");
        let first: Vec<usize> = items.iter().map(|&i| pool.id(i)).collect();
        let second: Vec<usize> = items.iter().map(|&i| pool.id(i)).collect();
        prop_assert_eq!(&first, &second);

        for (a, &ia) in items.iter().zip(&first) {
            prop_assert!(ia >= 1);
            prop_assert!(ia <= pool.len());
            for (b, &ib) in items.iter().zip(&first) {
                prop_assert_eq!(a == b, ia == ib);
            }
        }
    }

    #[test]
    fn ids_are_dense_in_first_seen_order(items in prop::collection::vec(0u32..16, 0..64)) {
        let mut pool = IdPool::new("prop");
        let mut seen = Vec::new();
        for &item in &items {
            let id = pool.id(item);
            if !seen.contains(&item) {
                seen.push(item);
                prop_assert_eq!(id, seen.len());
            }
        }
        for (id, item) in pool.iter() {
            prop_assert_eq!(pool.ptr_for(id).ok(), Some(Some(item)));
        }
    }
}
