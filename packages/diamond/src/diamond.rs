//! The diamond aggregate: one owner for routing, storage and audit state.

use bytes::Bytes;
use diamond_core::{FacetAddress, FacetCut, Registry};

use crate::builtin::BuiltinFacets;
use crate::config::DiamondConfig;
use crate::context::{Executor, InPlace};
use crate::error::Error;
use crate::event::DiamondCutEvent;
use crate::journal::State;
use crate::loupe::Loupe;

/// An upgradeable dispatch proxy.
///
/// `cut` and `call` are each atomic: on error every change made since the
/// invocation began is undone, including registry swaps, storage writes,
/// interface declarations and events.
pub struct Diamond<E> {
    address: FacetAddress,
    builtins: Option<BuiltinFacets>,
    host: E,
    state: State,
}

impl<E: Executor> Diamond<E> {
    /// Construct a diamond and register its constructor facets.
    ///
    /// Built-ins (if configured) are registered first, followed by
    /// `config.facets` in order; the whole constructor cut is atomic and
    /// emits a single [`DiamondCutEvent`].
    pub fn new(config: DiamondConfig, host: E) -> Result<Self, Error> {
        config.validate()?;

        let changes = config.constructor_cut();
        let mut interfaces: Vec<[u8; 4]> = Vec::new();
        if config.builtins.is_some() {
            interfaces.extend(BuiltinFacets::interfaces());
        }
        interfaces.extend(config.interfaces.iter().map(|id| *id.as_bytes()));

        let mut diamond = Self {
            address: config.address,
            builtins: config.builtins,
            host,
            state: State::default(),
        };
        diamond.transact("construct", |ctx| {
            if !changes.is_empty() {
                ctx.diamond_cut(&changes, FacetAddress::ZERO, &[])?;
            }
            for id in interfaces {
                ctx.set_interface(id, true);
            }
            Ok(())
        })?;
        Ok(diamond)
    }

    /// Apply a batch of changes, then run `init` with `payload`.
    ///
    /// `init` is the zero address to skip initialization, in which case
    /// `payload` must be empty.
    pub fn cut(
        &mut self,
        changes: &[FacetCut],
        init: FacetAddress,
        payload: &[u8],
    ) -> Result<(), Error> {
        self.transact("diamond cut", |ctx| ctx.diamond_cut(changes, init, payload))
    }

    /// Route `input` to the facet owning its leading selector.
    ///
    /// The facet's output, or its revert data, is returned unchanged.
    pub fn call(&mut self, input: &[u8]) -> Result<Bytes, Error> {
        self.transact("call", |ctx| ctx.dispatch(input))
    }

    pub fn loupe(&self) -> Loupe<'_> {
        Loupe::new(self.state.registry())
    }

    pub fn registry(&self) -> &Registry {
        self.state.registry()
    }

    pub fn supports_interface(&self, id: [u8; 4]) -> bool {
        self.state.supports_interface(id)
    }

    pub fn storage(&self, key: &[u8]) -> Option<&Bytes> {
        self.state.load(key)
    }

    /// Audit records of every successful cut, oldest first.
    pub fn events(&self) -> &[DiamondCutEvent] {
        self.state.events()
    }

    pub fn take_events(&mut self) -> Vec<DiamondCutEvent> {
        self.state.take_events()
    }

    pub fn address(&self) -> FacetAddress {
        self.address
    }

    pub fn builtins(&self) -> Option<&BuiltinFacets> {
        self.builtins.as_ref()
    }

    pub fn host(&self) -> &E {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut E {
        &mut self.host
    }

    fn transact<T>(
        &mut self,
        what: &str,
        f: impl FnOnce(&mut InPlace<'_>) -> Result<T, Error>,
    ) -> Result<T, Error> {
        let mark = self.state.checkpoint();
        let result = {
            let mut ctx = InPlace::new(
                &mut self.state,
                &self.host,
                self.builtins.as_ref(),
                self.address,
            );
            f(&mut ctx)
        };
        match result {
            Ok(value) => {
                self.state.commit();
                Ok(value)
            }
            Err(e) => {
                log::warn!("{} rolled back: {}", what, e);
                self.state.rollback(mark);
                Err(e)
            }
        }
    }
}

impl<E: std::fmt::Debug> std::fmt::Debug for Diamond<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Diamond")
            .field("address", &self.address)
            .field("builtins", &self.builtins)
            .field("registry", self.state.registry())
            .field("host", &self.host)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ErrorKind, Revert};
    use crate::host::MemoryHost;
    use diamond_core::Selector;

    fn s(n: u32) -> Selector {
        Selector::from_u32(n)
    }

    fn f(n: u64) -> FacetAddress {
        FacetAddress::from_low_u64(n)
    }

    fn echo_host(facets: &[u64]) -> MemoryHost {
        let mut host = MemoryHost::new();
        for &n in facets {
            host.deploy_fn(f(n), move |_, input| {
                let mut out = n.to_be_bytes().to_vec();
                out.extend_from_slice(input);
                Ok(Bytes::from(out))
            });
        }
        host
    }

    fn bare(host: MemoryHost) -> Diamond<MemoryHost> {
        Diamond::new(DiamondConfig::new(f(0xd1)), host).unwrap()
    }

    #[test]
    fn bare_diamond_routes_nothing() {
        let mut d = bare(echo_host(&[1]));
        assert!(d.loupe().facet_addresses().is_empty());
        assert!(d.events().is_empty());
        let err = d.call(&[0, 0, 0, 1]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn dispatch_passes_full_input() {
        let mut d = bare(echo_host(&[1]));
        d.cut(&[FacetCut::add(f(1), vec![s(0xaabbccdd)])], FacetAddress::ZERO, &[])
            .unwrap();
        let out = d.call(&[0xaa, 0xbb, 0xcc, 0xdd, 9]).unwrap();
        assert_eq!(&out[..8], &1u64.to_be_bytes());
        assert_eq!(&out[8..], &[0xaa, 0xbb, 0xcc, 0xdd, 9]);
    }

    #[test]
    fn short_input_has_no_selector() {
        let mut d = bare(echo_host(&[]));
        assert!(matches!(
            d.call(&[1, 2, 3]),
            Err(Error::MissingSelector { len: 3 })
        ));
    }

    #[test]
    fn constructor_facets_need_code() {
        let config = DiamondConfig::new(f(0xd1)).with_facet(f(2), vec![s(1)]);
        let err = Diamond::new(config, MemoryHost::new()).unwrap_err();
        assert!(matches!(err, Error::NoCode { index: 0, .. }));
    }

    #[test]
    fn failed_call_leaves_storage_untouched() {
        let mut host = MemoryHost::new();
        host.deploy_fn(f(1), |ctx, _| {
            ctx.store(&b"k"[..], &b"v"[..]);
            Err(Revert::message("no"))
        });
        let mut d = bare(host);
        d.cut(&[FacetCut::add(f(1), vec![s(1)])], FacetAddress::ZERO, &[])
            .unwrap();
        let err = d.call(&s(1).as_bytes()[..]).unwrap_err();
        match err {
            Error::Reverted(revert) => assert_eq!(revert.reason().as_deref(), Some("no")),
            other => panic!("unexpected: {other:?}"),
        }
        assert_eq!(d.storage(b"k"), None);
    }
}
