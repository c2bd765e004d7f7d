//! Property tests over random memberships.

use proptest::prelude::*;
use slotring::{HashFunction, Member, Ring};

fn membership() -> impl Strategy<Value = Vec<Member<u32>>> {
    prop::collection::btree_map("[a-z]{1,8}", 1u32..24, 1..8).prop_map(|nodes| {
        nodes
            .into_iter()
            .enumerate()
            .map(|(i, (id, weight))| Member::new(id, i as u32, weight))
            .collect()
    })
}

fn hash_function() -> impl Strategy<Value = HashFunction> {
    prop::sample::select(vec![
        HashFunction::Md5,
        HashFunction::Sha1,
        HashFunction::Xxh3,
        HashFunction::Sip13,
        HashFunction::Blake3,
    ])
}

fn build(kind: HashFunction, hash_range: usize) -> Ring<u32> {
    Ring::builder()
        .hash_range(hash_range)
        .hash_function(kind)
        .build()
        .expect("valid ring parameters")
}

fn owners(ring: &Ring<u32>) -> Vec<Option<String>> {
    ring.snapshot()
        .owners()
        .map(|owner| owner.map(|id| id.to_string()))
        .collect()
}

proptest! {
    /// Property: no slot is empty after rebuilding with at least one node
    #[test]
    fn prop_full_coverage(
        kind in hash_function(),
        hash_range in 1usize..2048,
        members in membership()
    ) {
        let ring = build(kind, hash_range);
        ring.rebuild(members).unwrap();
        prop_assert!(ring.snapshot().owners().all(|owner| owner.is_some()));
    }

    /// Property: same membership, same slot array
    #[test]
    fn prop_deterministic_rebuild(
        kind in hash_function(),
        hash_range in 1usize..2048,
        members in membership()
    ) {
        let first = build(kind, hash_range);
        let second = build(kind, hash_range);
        first.rebuild(members.clone()).unwrap();
        second.rebuild(members).unwrap();
        prop_assert_eq!(owners(&first), owners(&second));
    }

    /// Property: removing one node only moves the slots it owned
    #[test]
    fn prop_minimal_disruption(
        kind in hash_function(),
        hash_range in 1usize..2048,
        members in membership(),
        pick in any::<prop::sample::Index>()
    ) {
        prop_assume!(members.len() >= 2);
        let removed = members[pick.index(members.len())].node.id.to_string();

        let ring = build(kind, hash_range);
        ring.rebuild(members.clone()).unwrap();
        let before = owners(&ring);
        ring.rebuild(members.into_iter().filter(|m| m.node.id.as_str() != removed)).unwrap();
        let after = owners(&ring);

        for (old, new) in before.iter().zip(&after) {
            if old.as_deref() != Some(removed.as_str()) {
                prop_assert_eq!(old, new);
            }
        }
    }

    /// Property: dispatch agrees with the owner of the key's slot
    #[test]
    fn prop_dispatch_reads_slot(
        members in membership(),
        keys in prop::collection::vec(any::<Vec<u8>>(), 1..32)
    ) {
        let ring = build(HashFunction::Xxh3, 1024);
        ring.rebuild(members).unwrap();
        let snapshot = ring.snapshot();
        for key in keys {
            let expected = snapshot.owner(snapshot.slot_for(&key)).map(|node| node.payload);
            prop_assert_eq!(ring.dispatch(&key).ok(), expected);
            prop_assert_eq!(ring.dispatch(&key), ring.dispatch(&key));
        }
    }
}
