//! Geographic entity graph
//!
//! Macroregion → State → Mesoregion → Microregion → Municipality.
//!
//! Entities are built from a natural key with one blocking lookup. Child
//! collections load on first access and are cached for the instance's
//! lifetime. Upward references hold the parent's key and become a full entity
//! on demand, so no two instances ever share state.

mod identity;
mod lazy;
mod macroregion;
mod mesoregion;
mod microregion;
mod municipality;
mod resolve;
mod state;

pub use identity::{EntityKind, GeoEntity, NaturalKey};
pub use macroregion::{Macroregion, MacroregionKey, MACROREGIONS};
pub use mesoregion::{Mesoregion, MesoregionKey};
pub use microregion::{Microregion, MicroregionKey};
pub use municipality::Municipality;
pub use state::{State, StateKey};
