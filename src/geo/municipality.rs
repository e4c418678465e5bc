//! Municipalities, keyed by the 7-digit IBGE code.
//!
//! Construction only validates the code's shape. Scalars and parents are
//! read from the store on first access.

use std::fmt;
use std::hash::{Hash, Hasher};

use super::lazy::Memo;
use super::{EntityKind, GeoEntity, Macroregion, Mesoregion, Microregion, NaturalKey, State};
use crate::error::{GeoError, Result};
use crate::store::{CityFilter, CityRow, MicroregionFilter, SharedStore};

pub const CODE_LEN: usize = 7;

#[derive(Clone)]
pub struct Municipality {
    store: SharedStore,
    code: u32,
    details: Memo<CityRow>,
    microregion: Memo<Microregion>,
}

impl Municipality {
    /// Accepts anything that renders as the code, e.g. `3304557` or `"3304557"`.
    pub fn new(store: SharedStore, code: impl fmt::Display) -> Result<Self> {
        let code = parse_code(&code.to_string())?;
        Ok(Self {
            store,
            code,
            details: Memo::new(),
            microregion: Memo::new(),
        })
    }

    pub(crate) fn from_row(store: SharedStore, row: CityRow, parent: Option<Microregion>) -> Self {
        Self {
            store,
            code: row.id,
            details: Memo::preloaded(row),
            microregion: parent.map(Memo::preloaded).unwrap_or_default(),
        }
    }

    pub fn code(&self) -> u32 {
        self.code
    }

    /// The `cities` row for this code. `NotFound` if the store lacks it.
    pub fn details(&self) -> Result<&CityRow> {
        self.details.get_or_load("municipality.details", || {
            self.store
                .cities(&CityFilter::Code(self.code))?
                .into_iter()
                .next()
                .ok_or_else(|| GeoError::not_found(EntityKind::Municipality, self.code))
        })
    }

    pub fn name(&self) -> Result<&str> {
        Ok(&self.details()?.name)
    }

    pub fn latitude(&self) -> Result<f64> {
        Ok(self.details()?.latitude)
    }

    pub fn longitude(&self) -> Result<f64> {
        Ok(self.details()?.longitude)
    }

    pub fn timezone(&self) -> Result<&str> {
        Ok(&self.details()?.timezone)
    }

    pub fn microregion(&self) -> Result<&Microregion> {
        self.microregion.get_or_load("municipality.microregion", || {
            let id = self.details()?.microregion;
            let row = self
                .store
                .microregions(&MicroregionFilter::Id(id))?
                .into_iter()
                .next()
                .ok_or_else(|| GeoError::not_found(EntityKind::Microregion, id))?;
            Ok(Microregion::from_row(self.store.clone(), row, None))
        })
    }

    pub fn mesoregion(&self) -> Result<&Mesoregion> {
        self.microregion()?.mesoregion()
    }

    pub fn state(&self) -> Result<&State> {
        self.microregion()?.state()
    }

    pub fn macroregion(&self) -> Result<&Macroregion> {
        self.microregion()?.macroregion()
    }
}

fn parse_code(raw: &str) -> Result<u32> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(GeoError::invalid_format(
            EntityKind::Municipality,
            raw,
            "the code must contain only digits",
        ));
    }
    if raw.len() != CODE_LEN {
        return Err(GeoError::invalid_format(
            EntityKind::Municipality,
            raw,
            "the code must follow the 7-digit IBGE format, e.g. 3304557",
        ));
    }
    if raw.starts_with('0') {
        return Err(GeoError::invalid_format(
            EntityKind::Municipality,
            raw,
            "the code must start with a state code, e.g. 3304557",
        ));
    }
    raw.parse()
        .map_err(|_| GeoError::invalid_format(EntityKind::Municipality, raw, "the code must contain only digits"))
}

impl GeoEntity for Municipality {
    fn kind(&self) -> EntityKind {
        EntityKind::Municipality
    }

    fn natural_key(&self) -> NaturalKey {
        NaturalKey::Code(self.code)
    }
}

impl PartialEq for Municipality {
    fn eq(&self, other: &Self) -> bool {
        self.code == other.code
    }
}

impl Eq for Municipality {}

impl Hash for Municipality {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.code.hash(state);
    }
}

/// The name once details are loaded, the code before that.
impl fmt::Display for Municipality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.details.get() {
            Some(row) => f.write_str(&row.name),
            None => write!(f, "{}", self.code),
        }
    }
}

impl fmt::Debug for Municipality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Municipality")
            .field("code", &self.code)
            .field("details", &self.details.get())
            .finish_non_exhaustive()
    }
}
