use std::collections::HashSet;

use proptest::prelude::*;

use diamond_core::{FacetAddress, Registry, Selector};

#[derive(Debug, Clone)]
enum Op {
    Register(u8, u8),
    Reassign(u8, u8),
    Unregister(u8),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0u8..24, 1u8..6).prop_map(|(s, f)| Op::Register(s, f)),
        (0u8..24, 1u8..6).prop_map(|(s, f)| Op::Reassign(s, f)),
        (0u8..24).prop_map(Op::Unregister),
    ]
}

fn sel(n: u8) -> Selector {
    Selector::from_u32(0x1000_0000 | n as u32)
}

fn facet(n: u8) -> FacetAddress {
    FacetAddress::from_low_u64(n as u64)
}

/// Vec model of one facet's selector list under swap-and-pop.
fn model_remove(list: &mut Vec<Selector>, s: Selector) {
    if let Some(i) = list.iter().position(|x| *x == s) {
        list.swap_remove(i);
    }
}

proptest! {
    #[test]
    fn registry_stays_consistent(ops in prop::collection::vec(op(), 0..80)) {
        let mut registry = Registry::new();

        for op in ops {
            // Errors are expected for unmet preconditions; they must not mutate.
            let before = registry.clone();
            let result = match op {
                Op::Register(s, f) => registry.register(sel(s), facet(f)).map(|_| ()),
                Op::Reassign(s, f) => registry.reassign(sel(s), facet(f)).map(|_| ()),
                Op::Unregister(s) => registry.unregister(sel(s)).map(|_| ()),
            };
            if result.is_err() {
                prop_assert_eq!(&registry, &before);
            }
            prop_assert!(registry.check_invariants().is_ok());
        }

        // Consistency: owner_of(s) == f iff s in selectors_of(f).
        for n in 0..24u8 {
            let s = sel(n);
            match registry.owner_of(s) {
                Some(f) => prop_assert!(registry.selectors_of(f).contains(&s)),
                None => {
                    for f in registry.all_facets() {
                        prop_assert!(!registry.selectors_of(*f).contains(&s));
                    }
                }
            }
        }

        // Partition: disjoint sets whose sizes sum to the registered count.
        let mut seen = HashSet::new();
        let mut total = 0;
        for f in registry.all_facets() {
            let selectors = registry.selectors_of(*f);
            prop_assert!(!selectors.is_empty());
            for s in selectors {
                prop_assert!(seen.insert(*s));
            }
            total += selectors.len();
        }
        prop_assert_eq!(total, registry.selector_count());
    }

    #[test]
    fn removal_follows_swap_and_pop(
        count in 1usize..16,
        removals in prop::collection::vec(0usize..16, 0..16),
    ) {
        let owner = facet(1);
        let mut registry = Registry::new();
        let mut model: Vec<Selector> = Vec::new();
        for n in 0..count {
            registry.register(sel(n as u8), owner).unwrap();
            model.push(sel(n as u8));
        }

        for r in removals {
            if model.is_empty() {
                break;
            }
            let i = r % model.len();
            let k = model.len();
            let last = model[k - 1];
            let victim = model[i];

            registry.unregister(victim).unwrap();
            model_remove(&mut model, victim);

            let now = registry.selectors_of(owner);
            prop_assert_eq!(now.len(), k - 1);
            if i < k - 1 {
                prop_assert_eq!(now[i], last);
            }
            prop_assert_eq!(now, model.as_slice());
        }

        prop_assert_eq!(registry.all_facets().is_empty(), model.is_empty());
    }
}
