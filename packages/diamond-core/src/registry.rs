//! The selector routing table.
//!
//! Three structures are kept in lockstep:
//! - `selector_to_facet`: which facet owns each registered selector
//! - `facet_selectors`: each facet's selectors, densely, in swap-and-pop order
//! - `facets`: every facet that owns at least one selector, in swap-and-pop order
//!
//! A facet appears in `facets` exactly while its selector set is non-empty.
//! Nothing here validates batches; the cut processor decides which operation
//! to call and maps precondition failures to its own error taxonomy.

use std::collections::HashMap;

use crate::address::FacetAddress;
use crate::cut::Facet;
use crate::dense::DenseSet;
use crate::error::{InvariantViolation, RegistryError};
use crate::selector::Selector;

#[derive(Debug, Clone, Default)]
pub struct Registry {
    selector_to_facet: HashMap<Selector, FacetAddress>,
    facet_selectors: HashMap<FacetAddress, DenseSet<Selector>>,
    facets: DenseSet<FacetAddress>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn owner_of(&self, selector: Selector) -> Option<FacetAddress> {
        self.selector_to_facet.get(&selector).copied()
    }

    pub fn is_registered(&self, selector: Selector) -> bool {
        self.selector_to_facet.contains_key(&selector)
    }

    /// Route an unregistered `selector` to `facet`.
    pub fn register(&mut self, selector: Selector, facet: FacetAddress) -> Result<(), RegistryError> {
        if facet.is_zero() {
            return Err(RegistryError::ZeroFacet(selector));
        }
        if let Some(owner) = self.owner_of(selector) {
            return Err(RegistryError::AlreadyRegistered {
                selector,
                facet: owner,
            });
        }
        self.attach(selector, facet);
        Ok(())
    }

    /// Move a registered `selector` to a different facet. Returns the old owner.
    pub fn reassign(
        &mut self,
        selector: Selector,
        new_facet: FacetAddress,
    ) -> Result<FacetAddress, RegistryError> {
        if new_facet.is_zero() {
            return Err(RegistryError::ZeroFacet(selector));
        }
        let old = self
            .owner_of(selector)
            .ok_or(RegistryError::NotRegistered(selector))?;
        if old == new_facet {
            return Err(RegistryError::SameFacet {
                selector,
                facet: old,
            });
        }
        self.detach(selector, old);
        self.attach(selector, new_facet);
        Ok(old)
    }

    /// Drop a registered `selector`. Returns the facet that owned it.
    pub fn unregister(&mut self, selector: Selector) -> Result<FacetAddress, RegistryError> {
        let old = self
            .owner_of(selector)
            .ok_or(RegistryError::NotRegistered(selector))?;
        self.detach(selector, old);
        self.selector_to_facet.remove(&selector);
        Ok(old)
    }

    /// Selectors owned by `facet`, empty if it owns none.
    pub fn selectors_of(&self, facet: FacetAddress) -> &[Selector] {
        self.facet_selectors
            .get(&facet)
            .map(DenseSet::as_slice)
            .unwrap_or(&[])
    }

    pub fn all_facets(&self) -> &[FacetAddress] {
        self.facets.as_slice()
    }

    pub fn selector_count(&self) -> usize {
        self.selector_to_facet.len()
    }

    /// Every facet with its selectors, in `all_facets` order.
    pub fn snapshot(&self) -> Vec<Facet> {
        self.facets
            .iter()
            .map(|facet| Facet {
                facet_address: *facet,
                function_selectors: self.selectors_of(*facet).to_vec(),
            })
            .collect()
    }

    fn attach(&mut self, selector: Selector, facet: FacetAddress) {
        self.facet_selectors
            .entry(facet)
            .or_default()
            .insert(selector);
        self.facets.insert(facet);
        self.selector_to_facet.insert(selector, facet);
    }

    fn detach(&mut self, selector: Selector, facet: FacetAddress) {
        let now_empty = match self.facet_selectors.get_mut(&facet) {
            Some(set) => {
                set.swap_remove(&selector);
                set.is_empty()
            }
            None => false,
        };
        if now_empty {
            self.facet_selectors.remove(&facet);
            self.facets.swap_remove(&facet);
        }
    }

    /// Verify the routing table is internally consistent.
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        if let Some(pos) = self.facets.index_drift() {
            return Err(InvariantViolation::IndexDrift(pos));
        }

        for (selector, facet) in &self.selector_to_facet {
            let listed = self
                .facet_selectors
                .get(facet)
                .is_some_and(|set| set.contains(selector));
            if !listed {
                return Err(InvariantViolation::MissingMember {
                    selector: *selector,
                    facet: *facet,
                });
            }
        }

        for (facet, set) in &self.facet_selectors {
            if set.is_empty() {
                return Err(InvariantViolation::EmptyFacetListed(*facet));
            }
            if !self.facets.contains(facet) {
                return Err(InvariantViolation::UnlistedFacet(*facet));
            }
            if let Some(pos) = set.index_drift() {
                return Err(InvariantViolation::IndexDrift(pos));
            }
            for selector in set {
                let routed = self.owner_of(*selector);
                if routed != Some(*facet) {
                    return Err(InvariantViolation::Misrouted {
                        selector: *selector,
                        listed: *facet,
                        routed,
                    });
                }
            }
        }

        if let Some(facet) = self
            .facets
            .iter()
            .find(|f| !self.facet_selectors.contains_key(*f))
        {
            return Err(InvariantViolation::EmptyFacetListed(*facet));
        }

        Ok(())
    }
}

impl PartialEq for Registry {
    fn eq(&self, other: &Self) -> bool {
        self.facets == other.facets
            && self.selector_to_facet == other.selector_to_facet
            && self.facet_selectors == other.facet_selectors
    }
}

impl Eq for Registry {}
