//! Construction-time configuration.
//!
//! ```json
//! {
//!   "address": "0x00000000000000000000000000000000000000d1",
//!   "builtins": {
//!     "cut": "0x00000000000000000000000000000000000000c0",
//!     "loupe": "0x00000000000000000000000000000000000000c1",
//!     "introspection": "0x00000000000000000000000000000000000000c2"
//!   },
//!   "facets": [
//!     { "facet": "0x0000000000000000000000000000000000000101", "selectors": ["0xa9059cbb"] }
//!   ],
//!   "interfaces": ["0x80ac58cd"]
//! }
//! ```

use std::path::{Path, PathBuf};

use diamond_core::{FacetAddress, FacetCut, Selector};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::builtin::BuiltinFacets;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("built-in {role} facet has the zero address")]
    ZeroBuiltin { role: &'static str },

    #[error("built-in facets share address {0}")]
    DuplicateBuiltin(FacetAddress),
}

/// A facet registered when the diamond is constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstructorFacet {
    pub facet: FacetAddress,
    pub selectors: Vec<Selector>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiamondConfig {
    /// The diamond's own address, visible to facet code.
    #[serde(default)]
    pub address: FacetAddress,

    /// `None` constructs a diamond without native cut, loupe or
    /// introspection entry points.
    #[serde(default)]
    pub builtins: Option<BuiltinFacets>,

    /// Registered in order with Add semantics.
    #[serde(default)]
    pub facets: Vec<ConstructorFacet>,

    /// Extra interface ids declared at construction.
    #[serde(default)]
    pub interfaces: Vec<Selector>,
}

impl DiamondConfig {
    pub fn new(address: FacetAddress) -> Self {
        Self {
            address,
            ..Self::default()
        }
    }

    pub fn with_builtins(mut self, builtins: BuiltinFacets) -> Self {
        self.builtins = Some(builtins);
        self
    }

    pub fn with_facet(mut self, facet: FacetAddress, selectors: Vec<Selector>) -> Self {
        self.facets.push(ConstructorFacet { facet, selectors });
        self
    }

    pub fn with_interface(mut self, id: Selector) -> Self {
        self.interfaces.push(id);
        self
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let Some(b) = &self.builtins else {
            return Ok(());
        };
        for (role, facet) in [
            ("cut", b.cut),
            ("loupe", b.loupe),
            ("introspection", b.introspection),
        ] {
            if facet.is_zero() {
                return Err(ConfigError::ZeroBuiltin { role });
            }
        }
        if b.cut == b.loupe || b.cut == b.introspection {
            return Err(ConfigError::DuplicateBuiltin(b.cut));
        }
        if b.loupe == b.introspection {
            return Err(ConfigError::DuplicateBuiltin(b.loupe));
        }
        Ok(())
    }

    /// The constructor cut: built-ins first, then configured facets.
    pub(crate) fn constructor_cut(&self) -> Vec<FacetCut> {
        let builtins = self
            .builtins
            .iter()
            .flat_map(|b| b.selectors())
            .map(|(facet, selectors)| FacetCut::add(facet, selectors));
        let facets = self
            .facets
            .iter()
            .map(|f| FacetCut::add(f.facet, f.selectors.clone()));
        builtins.chain(facets).collect()
    }
}
