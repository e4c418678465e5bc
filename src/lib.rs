//! IBGE geographic hierarchy
//!
//! Navigable model of Brazil's administrative divisions:
//! - Macroregions, states, mesoregions, microregions and municipalities
//! - Lookup by natural key (code, abbreviation or name)
//! - Lazily loaded, memoized children and parents
//! - Name disambiguation for non-unique mesoregion and microregion names
//! - Read-only SQLite store, or an in-memory extract for fixtures

pub mod atlas;
pub mod config;
pub mod error;
pub mod geo;
pub mod store;

// Re-exports for convenience
pub use atlas::Atlas;
pub use config::GeoConfig;
pub use error::{GeoError, Result};
pub use geo::{
    EntityKind, GeoEntity, Macroregion, MacroregionKey, Mesoregion, MesoregionKey, Microregion,
    MicroregionKey, Municipality, NaturalKey, State, StateKey,
};
pub use store::{GeoStore, MemoryStore, SharedStore, SqliteStore};
