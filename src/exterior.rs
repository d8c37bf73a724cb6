//! Finalization of raw rows into domain objects
//!
//! A record table does not know what it produces. It is handed a
//! [`Finalizer`] at construction and applies it to every row it returns.

use std::sync::Arc;

use serde::Serialize;

use crate::name::{Filling, KnotName};
use crate::table::row::{serialize_triangulation, RawRow};

/// Per-row transformation from a raw row to the table's item type
pub type Finalizer<T> = Arc<dyn Fn(RawRow) -> T + Send + Sync>;

/// The contract a link exterior type must satisfy to be built from a row.
pub trait LinkExterior {
    /// Build a fresh object from the stored triangulation
    fn from_triangulation(encoded: &[u8]) -> Self;

    fn set_name(&mut self, name: &str);

    /// Attach the Dewey–Thistlethwaite code of the associated link
    fn set_dt_code(&mut self, code: &str);

    /// Apply Dehn fillings requested by a lookup key such as `K6a3(1,0)`.
    /// Types without filling support ignore them.
    fn dehn_fill(&mut self, _fillings: &[Filling]) {}
}

/// Returns rows unchanged
pub fn raw_rows() -> Finalizer<RawRow> {
    Arc::new(|row| row)
}

/// Builds `M` from the triangulation, then sets its name and DT code
pub fn link_exteriors<M: LinkExterior + 'static>() -> Finalizer<M> {
    Arc::new(|row: RawRow| {
        let mut exterior = M::from_triangulation(&row.triangulation);
        exterior.set_name(&row.name);
        exterior.set_dt_code(&row.dt_code);
        if !row.fillings.is_empty() {
            exterior.dehn_fill(&row.fillings);
        }
        exterior
    })
}

/// A plain link exterior record: the stored triangulation plus the data the
/// table attaches to it.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct KnotExterior {
    name: String,
    #[serde(rename = "DT")]
    dt_code: String,
    #[serde(serialize_with = "serialize_triangulation")]
    triangulation: Vec<u8>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    fillings: Vec<Filling>,
}

impl KnotExterior {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dt_code(&self) -> &str {
        &self.dt_code
    }

    pub fn triangulation(&self) -> &[u8] {
        &self.triangulation
    }

    pub fn fillings(&self) -> &[Filling] {
        &self.fillings
    }

    /// The parsed name, when it follows the dataset's naming scheme
    pub fn knot_name(&self) -> Option<KnotName> {
        KnotName::parse(&self.name)
    }
}

impl LinkExterior for KnotExterior {
    fn from_triangulation(encoded: &[u8]) -> Self {
        Self {
            triangulation: encoded.to_vec(),
            ..Self::default()
        }
    }

    fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }

    fn set_dt_code(&mut self, code: &str) {
        self.dt_code = code.to_string();
    }

    fn dehn_fill(&mut self, fillings: &[Filling]) {
        self.fillings = fillings.to_vec();
    }
}
