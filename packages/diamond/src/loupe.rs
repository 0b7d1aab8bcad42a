//! Read-only introspection over the registry.

use diamond_core::{Facet, FacetAddress, Registry, Selector};

/// A borrowed view answering the loupe queries. Every query succeeds.
#[derive(Debug, Clone, Copy)]
pub struct Loupe<'a> {
    registry: &'a Registry,
}

impl<'a> Loupe<'a> {
    pub fn new(registry: &'a Registry) -> Self {
        Self { registry }
    }

    /// Facets owning at least one selector, in registry order.
    pub fn facet_addresses(&self) -> &'a [FacetAddress] {
        self.registry.all_facets()
    }

    /// Selectors owned by `facet`, in registry order; empty if it owns none.
    pub fn facet_function_selectors(&self, facet: FacetAddress) -> &'a [Selector] {
        self.registry.selectors_of(facet)
    }

    pub fn facets(&self) -> Vec<Facet> {
        self.registry.snapshot()
    }

    /// The owner of `selector`, or [`FacetAddress::ZERO`] if unregistered.
    pub fn facet_address(&self, selector: Selector) -> FacetAddress {
        self.registry
            .owner_of(selector)
            .unwrap_or(FacetAddress::ZERO)
    }
}
