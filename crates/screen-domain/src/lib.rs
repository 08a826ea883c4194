// screen-domain library entry point
pub mod element;
pub mod errors;
pub mod molecule;
pub mod ring;
pub mod smiles;

pub use errors::DomainError;
pub use molecule::{Bond, BondOrder, MolAtom, Molecule};
pub use smiles::{parse_batch, parse_smiles};
