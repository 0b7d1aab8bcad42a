//! Diamond cut validation.
//!
//! [`apply`] runs a whole batch against a staged copy of the registry. The
//! caller installs the copy only if every change applied, so a failure at
//! change `k + 1` leaves the live registry exactly as it was.

use diamond_core::{FacetAddress, FacetCut, FacetCutAction, Registry, RegistryError};

use crate::error::Error;

/// Apply `changes` in order to `registry`.
///
/// `has_code` answers whether an address refers to deployed code; Add
/// requires it.
pub(crate) fn apply(
    registry: &mut Registry,
    changes: &[FacetCut],
    has_code: impl Fn(FacetAddress) -> bool,
) -> Result<(), Error> {
    if changes.is_empty() {
        return Err(Error::EmptyCut);
    }

    for (index, change) in changes.iter().enumerate() {
        let facet = change.facet_address;
        if change.function_selectors.is_empty() {
            return Err(Error::EmptySelectors { index });
        }

        match change.action {
            FacetCutAction::Add => {
                if facet.is_zero() {
                    return Err(Error::ZeroFacet {
                        index,
                        action: change.action,
                    });
                }
                if !has_code(facet) {
                    return Err(Error::NoCode { index, facet });
                }
                for selector in &change.function_selectors {
                    registry
                        .register(*selector, facet)
                        .map_err(|e| conflict(index, change.action, e))?;
                }
            }
            FacetCutAction::Replace => {
                if facet.is_zero() {
                    return Err(Error::ZeroFacet {
                        index,
                        action: change.action,
                    });
                }
                for selector in &change.function_selectors {
                    registry
                        .reassign(*selector, facet)
                        .map_err(|e| conflict(index, change.action, e))?;
                }
            }
            FacetCutAction::Remove => {
                if !facet.is_zero() {
                    return Err(Error::NonZeroRemoveFacet { index, facet });
                }
                for selector in &change.function_selectors {
                    registry
                        .unregister(*selector)
                        .map_err(|e| conflict(index, change.action, e))?;
                }
            }
        }
    }

    Ok(())
}

/// Check the initializer arguments before anything is applied.
pub(crate) fn check_init(
    init: FacetAddress,
    payload: &[u8],
    has_code: impl Fn(FacetAddress) -> bool,
) -> Result<(), Error> {
    if init.is_zero() {
        if !payload.is_empty() {
            return Err(Error::PayloadWithoutInit { len: payload.len() });
        }
        return Ok(());
    }
    if payload.is_empty() {
        return Err(Error::InitEmptyPayload { facet: init });
    }
    if !has_code(init) {
        return Err(Error::InitNoCode { facet: init });
    }
    Ok(())
}

fn conflict(index: usize, action: FacetCutAction, e: RegistryError) -> Error {
    match e {
        RegistryError::AlreadyRegistered { selector, facet } => Error::AlreadyRegistered {
            index,
            selector,
            owner: facet,
        },
        RegistryError::NotRegistered(selector) => Error::NotFound {
            selector,
            change: Some(index),
        },
        RegistryError::SameFacet { selector, facet } => Error::SameFacet {
            index,
            selector,
            facet,
        },
        RegistryError::ZeroFacet(_) => Error::ZeroFacet { index, action },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use diamond_core::Selector;

    fn s(n: u32) -> Selector {
        Selector::from_u32(n)
    }

    fn f(n: u64) -> FacetAddress {
        FacetAddress::from_low_u64(n)
    }

    fn any_code(_: FacetAddress) -> bool {
        true
    }

    #[test]
    fn empty_batch_is_invalid() {
        let mut r = Registry::new();
        assert!(matches!(apply(&mut r, &[], any_code), Err(Error::EmptyCut)));
    }

    #[test]
    fn empty_selector_list_is_invalid() {
        let mut r = Registry::new();
        let changes = [FacetCut::add(f(1), vec![])];
        assert!(matches!(
            apply(&mut r, &changes, any_code),
            Err(Error::EmptySelectors { index: 0 })
        ));
    }

    #[test]
    fn add_requires_code_and_non_zero_facet() {
        let mut r = Registry::new();
        let changes = [FacetCut::add(FacetAddress::ZERO, vec![s(1)])];
        assert!(matches!(
            apply(&mut r, &changes, any_code),
            Err(Error::ZeroFacet {
                index: 0,
                action: FacetCutAction::Add
            })
        ));

        let changes = [FacetCut::add(f(1), vec![s(1)])];
        assert!(matches!(
            apply(&mut r, &changes, |_| false),
            Err(Error::NoCode { index: 0, .. })
        ));
    }

    #[test]
    fn duplicate_within_batch_conflicts() {
        let mut r = Registry::new();
        let changes = [
            FacetCut::add(f(1), vec![s(1), s(2)]),
            FacetCut::add(f(2), vec![s(3), s(2)]),
        ];
        match apply(&mut r, &changes, any_code) {
            Err(Error::AlreadyRegistered {
                index,
                selector,
                owner,
            }) => {
                assert_eq!(index, 1);
                assert_eq!(selector, s(2));
                assert_eq!(owner, f(1));
            }
            other => panic!("unexpected: {:?}", other),
        }

        let mut r = Registry::new();
        let changes = [FacetCut::add(f(1), vec![s(7), s(7)])];
        assert!(matches!(
            apply(&mut r, &changes, any_code),
            Err(Error::AlreadyRegistered { index: 0, .. })
        ));
    }

    #[test]
    fn replace_rules() {
        let mut r = Registry::new();
        r.register(s(1), f(1)).unwrap();

        let same = [FacetCut::replace(f(1), vec![s(1)])];
        assert!(matches!(
            apply(&mut r.clone(), &same, any_code),
            Err(Error::SameFacet { index: 0, .. })
        ));

        let missing = [FacetCut::replace(f(2), vec![s(9)])];
        assert!(matches!(
            apply(&mut r.clone(), &missing, any_code),
            Err(Error::NotFound {
                change: Some(0),
                ..
            })
        ));

        let zero = [FacetCut::replace(FacetAddress::ZERO, vec![s(1)])];
        assert!(matches!(
            apply(&mut r.clone(), &zero, any_code),
            Err(Error::ZeroFacet {
                action: FacetCutAction::Replace,
                ..
            })
        ));

        apply(&mut r, &[FacetCut::replace(f(2), vec![s(1)])], any_code).unwrap();
        assert_eq!(r.owner_of(s(1)), Some(f(2)));
        assert_eq!(r.all_facets(), &[f(2)]);
    }

    #[test]
    fn remove_rules() {
        let mut r = Registry::new();
        r.register(s(1), f(1)).unwrap();

        let wrong_target = [FacetCut {
            facet_address: f(1),
            action: FacetCutAction::Remove,
            function_selectors: vec![s(1)],
        }];
        assert!(matches!(
            apply(&mut r.clone(), &wrong_target, any_code),
            Err(Error::NonZeroRemoveFacet { index: 0, .. })
        ));

        let missing = [FacetCut::remove(vec![s(2)])];
        assert!(matches!(
            apply(&mut r.clone(), &missing, any_code),
            Err(Error::NotFound { .. })
        ));

        apply(&mut r, &[FacetCut::remove(vec![s(1)])], any_code).unwrap();
        assert!(r.all_facets().is_empty());
    }

    #[test]
    fn add_then_remove_in_one_batch() {
        let mut r = Registry::new();
        let changes = [
            FacetCut::add(f(1), vec![s(1), s(2)]),
            FacetCut::remove(vec![s(1)]),
            FacetCut::add(f(2), vec![s(1)]),
        ];
        apply(&mut r, &changes, any_code).unwrap();
        assert_eq!(r.selectors_of(f(1)), &[s(2)]);
        assert_eq!(r.selectors_of(f(2)), &[s(1)]);
    }

    #[test]
    fn init_argument_rules() {
        assert!(check_init(FacetAddress::ZERO, &[], any_code).is_ok());
        assert!(matches!(
            check_init(FacetAddress::ZERO, &[1], any_code),
            Err(Error::PayloadWithoutInit { len: 1 })
        ));
        assert!(matches!(
            check_init(f(1), &[], any_code),
            Err(Error::InitEmptyPayload { .. })
        ));
        assert!(matches!(
            check_init(f(1), &[1], |_| false),
            Err(Error::InitNoCode { .. })
        ));
        assert!(check_init(f(1), &[1], any_code).is_ok());
    }
}
