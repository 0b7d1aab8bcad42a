use proptest::prelude::*;

use diamond_abi::calls::{self, DiamondCutCall};
use diamond_core::{FacetAddress, FacetCut, Selector};

fn word(n: u64) -> [u8; 32] {
    let mut w = [0u8; 32];
    w[24..].copy_from_slice(&n.to_be_bytes());
    w
}

/// A `diamondCut` call whose `changes` items all point at one shared tuple
/// holding `selectors` entries.
fn aliased_cut(changes: u64, selectors: u64) -> Vec<u8> {
    let items_start = 4 * 32;
    let tuple_at = changes * 32;
    let payload_at = items_start + tuple_at + 4 * 32 + selectors * 32;

    let mut input = calls::DIAMOND_CUT.as_bytes().to_vec();
    input.extend_from_slice(&word(0x60));
    input.extend_from_slice(&word(0));
    input.extend_from_slice(&word(payload_at));
    input.extend_from_slice(&word(changes));
    for _ in 0..changes {
        input.extend_from_slice(&word(tuple_at));
    }
    input.extend_from_slice(&word(0x42));
    input.extend_from_slice(&word(0));
    input.extend_from_slice(&word(0x60));
    input.extend_from_slice(&word(selectors));
    for n in 0..selectors {
        let mut w = [0u8; 32];
        w[..4].copy_from_slice(&(n as u32 + 1).to_be_bytes());
        input.extend_from_slice(&w);
    }
    input.extend_from_slice(&word(0));
    input
}

#[test]
fn shared_change_bodies_are_rejected() {
    let input = aliased_cut(64, 64);
    assert!(DiamondCutCall::decode(&input).is_err());

    // A single change referencing the body once is well formed.
    let single = aliased_cut(1, 64);
    let call = DiamondCutCall::decode(&single).unwrap();
    assert_eq!(call.changes.len(), 1);
    assert_eq!(call.changes[0].function_selectors.len(), 64);
    assert_eq!(call.changes[0].facet_address, FacetAddress::from_low_u64(0x42));
}

fn cut_call() -> impl Strategy<Value = DiamondCutCall> {
    let change = (
        1u64..8,
        0u8..3,
        prop::collection::vec(any::<u32>().prop_map(Selector::from_u32), 1..5),
    )
        .prop_map(|(f, action, selectors)| match action {
            0 => FacetCut::add(FacetAddress::from_low_u64(f), selectors),
            1 => FacetCut::replace(FacetAddress::from_low_u64(f), selectors),
            _ => FacetCut::remove(selectors),
        });
    (
        prop::collection::vec(change, 0..4),
        0u64..3,
        prop::collection::vec(any::<u8>(), 0..70),
    )
        .prop_map(|(changes, init, payload)| {
            DiamondCutCall::new(changes, FacetAddress::from_low_u64(init), payload)
        })
}

proptest! {
    #[test]
    fn arbitrary_input_never_panics(data in prop::collection::vec(any::<u8>(), 0..400)) {
        let _ = DiamondCutCall::decode(&data);
        let _ = calls::decode_facets(&data);
        let _ = calls::decode_error_string(&data);
    }

    #[test]
    fn truncated_cut_calls_are_rejected(call in cut_call(), cut in 1usize..32) {
        let input = call.encode();
        prop_assert_eq!(DiamondCutCall::decode(&input).unwrap(), call);

        let keep = input.len().saturating_sub(cut);
        prop_assert!(DiamondCutCall::decode(&input[..keep]).is_err());
    }
}
