//! An in-process executor backed by native Rust facet code.

use std::collections::HashMap;
use std::sync::Arc;

use bytes::Bytes;
use diamond_core::FacetAddress;

use crate::context::{Executor, InPlace};
use crate::error::Revert;

/// Facet code runnable by [`MemoryHost`].
pub trait FacetCode: Send + Sync {
    fn execute(&self, ctx: &mut InPlace<'_>, input: &[u8]) -> Result<Bytes, Revert>;
}

impl<F> FacetCode for F
where
    F: Fn(&mut InPlace<'_>, &[u8]) -> Result<Bytes, Revert> + Send + Sync,
{
    fn execute(&self, ctx: &mut InPlace<'_>, input: &[u8]) -> Result<Bytes, Revert> {
        self(ctx, input)
    }
}

/// Maps addresses to deployed [`FacetCode`].
///
/// Calling an address with nothing deployed reverts without data.
#[derive(Default, Clone)]
pub struct MemoryHost {
    code: HashMap<FacetAddress, Arc<dyn FacetCode>>,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deploy `code` at `address`, replacing whatever was there.
    pub fn deploy(&mut self, address: FacetAddress, code: impl FacetCode + 'static) {
        self.code.insert(address, Arc::new(code));
    }

    /// Deploy a closure. Unlike [`deploy`](Self::deploy), the argument types
    /// of `f` need no annotations.
    pub fn deploy_fn<F>(&mut self, address: FacetAddress, f: F)
    where
        F: Fn(&mut InPlace<'_>, &[u8]) -> Result<Bytes, Revert> + Send + Sync + 'static,
    {
        self.deploy(address, f);
    }

    pub fn with_fn<F>(mut self, address: FacetAddress, f: F) -> Self
    where
        F: Fn(&mut InPlace<'_>, &[u8]) -> Result<Bytes, Revert> + Send + Sync + 'static,
    {
        self.deploy_fn(address, f);
        self
    }

    /// Remove the code at `address`. Selectors routed to it stay registered
    /// and revert when called.
    pub fn destroy(&mut self, address: FacetAddress) -> bool {
        self.code.remove(&address).is_some()
    }
}

impl std::fmt::Debug for MemoryHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut deployed: Vec<_> = self.code.keys().collect();
        deployed.sort();
        f.debug_struct("MemoryHost")
            .field("deployed", &deployed)
            .finish()
    }
}

impl Executor for MemoryHost {
    fn has_code(&self, facet: FacetAddress) -> bool {
        self.code.contains_key(&facet)
    }

    fn execute_in_place(
        &self,
        facet: FacetAddress,
        ctx: &mut InPlace<'_>,
        input: &[u8],
    ) -> Result<Bytes, Revert> {
        match self.code.get(&facet) {
            Some(code) => code.execute(ctx, input),
            None => Err(Revert::empty()),
        }
    }
}
