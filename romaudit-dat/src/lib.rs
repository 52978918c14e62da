pub mod algorithm;
pub mod catalog;
pub mod dat;
pub mod error;

pub use algorithm::HashAlgorithm;
pub use catalog::{Catalog, CatalogGame, CatalogRom, GameId, NameMatch, RomId};
pub use dat::{DatFile, DatGame, DatRom};
pub use error::DatError;
