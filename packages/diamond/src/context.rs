//! In-place execution: the host capability and the context facets run in.

use bytes::Bytes;
use diamond_core::{FacetAddress, FacetCut, Selector};

use crate::builtin::{self, BuiltinFacets};
use crate::cut;
use crate::error::{Error, Revert};
use crate::event::DiamondCutEvent;
use crate::journal::State;
use crate::loupe::Loupe;

/// Deepest allowed chain of nested calls.
pub const MAX_CALL_DEPTH: usize = 256;

/// Runs facet code on behalf of the diamond.
///
/// `execute_in_place` must run `facet`'s code against `input` with the
/// diamond's own identity and persistent state, which the code reaches only
/// through `ctx`. Nothing else is assumed about the host.
pub trait Executor: Send + Sync {
    /// Whether `facet` refers to deployed code.
    fn has_code(&self, facet: FacetAddress) -> bool;

    fn execute_in_place(
        &self,
        facet: FacetAddress,
        ctx: &mut InPlace<'_>,
        input: &[u8],
    ) -> Result<Bytes, Revert>;
}

impl<E: Executor + ?Sized> Executor for &E {
    fn has_code(&self, facet: FacetAddress) -> bool {
        (**self).has_code(facet)
    }

    fn execute_in_place(
        &self,
        facet: FacetAddress,
        ctx: &mut InPlace<'_>,
        input: &[u8],
    ) -> Result<Bytes, Revert> {
        (**self).execute_in_place(facet, ctx, input)
    }
}

impl<E: Executor + ?Sized> Executor for Box<E> {
    fn has_code(&self, facet: FacetAddress) -> bool {
        self.as_ref().has_code(facet)
    }

    fn execute_in_place(
        &self,
        facet: FacetAddress,
        ctx: &mut InPlace<'_>,
        input: &[u8],
    ) -> Result<Bytes, Revert> {
        self.as_ref().execute_in_place(facet, ctx, input)
    }
}

/// The diamond as seen from inside facet code.
///
/// Storage writes, interface declarations and nested calls made through an
/// `InPlace` belong to the enclosing invocation and are undone if it fails.
pub struct InPlace<'a> {
    state: &'a mut State,
    host: &'a dyn Executor,
    builtins: Option<&'a BuiltinFacets>,
    address: FacetAddress,
    depth: usize,
}

impl<'a> InPlace<'a> {
    pub(crate) fn new(
        state: &'a mut State,
        host: &'a dyn Executor,
        builtins: Option<&'a BuiltinFacets>,
        address: FacetAddress,
    ) -> Self {
        Self {
            state,
            host,
            builtins,
            address,
            depth: 0,
        }
    }

    /// The diamond's own address.
    pub fn address(&self) -> FacetAddress {
        self.address
    }

    /// How many calls deep this frame is; 0 for the outermost invocation.
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn load(&self, key: &[u8]) -> Option<Bytes> {
        self.state.load(key).cloned()
    }

    pub fn store(&mut self, key: impl Into<Bytes>, value: impl Into<Bytes>) {
        self.state.store(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &[u8]) -> Option<Bytes> {
        self.state.remove(key)
    }

    pub fn loupe(&self) -> Loupe<'_> {
        Loupe::new(self.state.registry())
    }

    pub fn supports_interface(&self, id: [u8; 4]) -> bool {
        self.state.supports_interface(id)
    }

    /// Declare (or withdraw) support for an interface id.
    pub fn set_interface(&mut self, id: [u8; 4], supported: bool) {
        self.state.set_interface(id, supported);
    }

    /// Call the diamond itself, routing `input` by its selector.
    ///
    /// The nested call is its own rollback unit: if it fails, its effects are
    /// undone and the failure comes back as a [`Revert`]. Propagating that
    /// revert fails the caller in turn.
    pub fn call(&mut self, input: &[u8]) -> Result<Bytes, Revert> {
        let mark = self.state.checkpoint();
        match self.dispatch(input) {
            Ok(output) => Ok(output),
            Err(e) => {
                self.state.rollback(mark);
                Err(e.into_revert())
            }
        }
    }

    /// Route `input` to the facet owning its selector.
    pub(crate) fn dispatch(&mut self, input: &[u8]) -> Result<Bytes, Error> {
        let selector =
            Selector::from_input(input).ok_or(Error::MissingSelector { len: input.len() })?;
        let facet = self
            .state
            .registry()
            .owner_of(selector)
            .ok_or(Error::NotFound {
                selector,
                change: None,
            })?;
        log::debug!("dispatch {} -> {} (depth {})", selector, facet, self.depth);
        self.execute(facet, input)
    }

    /// Run `facet`'s code against `input` one level down.
    pub(crate) fn execute(&mut self, facet: FacetAddress, input: &[u8]) -> Result<Bytes, Error> {
        if self.depth >= MAX_CALL_DEPTH {
            return Err(Error::CallDepthExceeded(MAX_CALL_DEPTH));
        }
        if let Some(kind) = self.builtins.and_then(|b| b.kind_of(facet)) {
            return builtin::handle(self, kind, facet, input);
        }
        let host = self.host;
        let mut inner = self.descend();
        host.execute_in_place(facet, &mut inner, input)
            .map_err(Error::Reverted)
    }

    pub(crate) fn has_code(&self, facet: FacetAddress) -> bool {
        self.builtins.is_some_and(|b| b.kind_of(facet).is_some()) || self.host.has_code(facet)
    }

    /// Validate and apply a batch, then run the initializer.
    ///
    /// On error the caller must roll back to its checkpoint; the registry may
    /// already have been swapped when the initializer fails.
    pub(crate) fn diamond_cut(
        &mut self,
        changes: &[FacetCut],
        init: FacetAddress,
        payload: &[u8],
    ) -> Result<(), Error> {
        cut::check_init(init, payload, |f| self.has_code(f))?;

        let mut staged = self.state.registry().clone();
        cut::apply(&mut staged, changes, |f| self.has_code(f))?;
        self.state.install_registry(staged);

        if !init.is_zero() {
            self.execute(init, payload).map_err(|e| {
                let revert = e.into_revert();
                log::warn!("initializer {} failed: {}", init, revert);
                Error::Initialization {
                    facet: init,
                    revert,
                }
            })?;
        }

        log::info!(
            "diamond cut applied: {} change(s), init {}",
            changes.len(),
            init
        );
        self.state.emit(DiamondCutEvent {
            changes: changes.to_vec(),
            init,
            payload: Bytes::copy_from_slice(payload),
        });
        Ok(())
    }

    fn descend(&mut self) -> InPlace<'_> {
        InPlace {
            state: &mut *self.state,
            host: self.host,
            builtins: self.builtins,
            address: self.address,
            depth: self.depth + 1,
        }
    }
}
