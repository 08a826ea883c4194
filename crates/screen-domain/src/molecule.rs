//! Grafo molecular: la representación en memoria de una estructura ya
//! validada. Todo lo que llega a los cálculos de descriptores pasó por el
//! parser; aquí no hay estados intermedios.

use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Orden de enlace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BondOrder {
    Single,
    Double,
    Triple,
    Aromatic,
}

impl BondOrder {
    /// Orden numérico para sumas de valencia (aromático cuenta 1.5).
    pub fn as_f64(self) -> f64 {
        match self {
            BondOrder::Single => 1.0,
            BondOrder::Double => 2.0,
            BondOrder::Triple => 3.0,
            BondOrder::Aromatic => 1.5,
        }
    }
}

/// Átomo del grafo. Los hidrógenos implícitos se asignan al terminar el
/// parseo y no cambian después.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MolAtom {
    pub atomic_number: u8,
    pub formal_charge: i8,
    pub isotope: Option<u16>,
    pub is_aromatic: bool,
    pub implicit_hydrogens: u8,
}

/// Enlace entre dos átomos (índices dentro de `Molecule::atoms`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Bond {
    pub atom1: usize,
    pub atom2: usize,
    pub order: BondOrder,
    pub is_aromatic: bool,
}

/// Estructura molecular parseada: átomos, enlaces y lista de adyacencia.
///
/// Invariante: toda instancia proviene de un SMILES que parseó con éxito;
/// `smiles` conserva la cadena original tal como la escribió el usuario.
#[derive(Debug, Clone)]
pub struct Molecule {
    smiles: String,
    pub atoms: Vec<MolAtom>,
    pub bonds: Vec<Bond>,
    /// adjacency[i] = [(vecino, índice de enlace)]
    pub adjacency: Vec<Vec<(usize, usize)>>,
}

impl Molecule {
    pub(crate) fn new(smiles: &str, atoms: Vec<MolAtom>, bonds: Vec<Bond>) -> Self {
        let mut adjacency = vec![Vec::new(); atoms.len()];
        for (bi, bond) in bonds.iter().enumerate() {
            adjacency[bond.atom1].push((bond.atom2, bi));
            adjacency[bond.atom2].push((bond.atom1, bi));
        }
        Molecule { smiles: smiles.to_string(), atoms, bonds, adjacency }
    }

    /// SMILES original de entrada.
    pub fn smiles(&self) -> &str {
        &self.smiles
    }

    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    pub fn bond_count(&self) -> usize {
        self.bonds.len()
    }

    /// Átomos distintos de hidrógeno.
    pub fn heavy_atom_count(&self) -> usize {
        self.atoms.iter().filter(|a| a.atomic_number != 1).count()
    }

    /// Heteroátomos: pesados que no son carbono.
    pub fn hetero_atom_count(&self) -> usize {
        self.atoms.iter().filter(|a| a.atomic_number != 1 && a.atomic_number != 6).count()
    }

    /// Grado del átomo en el grafo (enlaces explícitos).
    pub fn degree(&self, atom_idx: usize) -> usize {
        self.adjacency[atom_idx].len()
    }

    /// Vecinos de un átomo.
    pub fn neighbors(&self, atom_idx: usize) -> impl Iterator<Item = usize> + '_ {
        self.adjacency[atom_idx].iter().map(|&(n, _)| n)
    }

    /// Enlace entre dos átomos, si existe.
    pub fn bond_between(&self, a1: usize, a2: usize) -> Option<&Bond> {
        self.adjacency[a1].iter().find(|&&(n, _)| n == a2).map(|&(_, bi)| &self.bonds[bi])
    }

    /// Hidrógenos totales: explícitos en el grafo + implícitos.
    pub fn total_hydrogen_count(&self) -> usize {
        let explicit = self.atoms.iter().filter(|a| a.atomic_number == 1).count();
        let implicit: usize = self.atoms.iter().map(|a| a.implicit_hydrogens as usize).sum();
        explicit + implicit
    }

    /// Carga formal neta.
    pub fn net_formal_charge(&self) -> i32 {
        self.atoms.iter().map(|a| a.formal_charge as i32).sum()
    }

    /// Suma de órdenes de enlace incidentes a un átomo.
    pub fn bond_order_sum(&self, atom_idx: usize) -> f64 {
        self.adjacency[atom_idx].iter().map(|&(_, bi)| self.bonds[bi].order.as_f64()).sum()
    }

    /// Hash determinista del grafo canónico, la identidad de la molécula
    /// dentro del proceso.
    pub fn content_hash(&self) -> String {
        let mut hasher = Sha256::new();
        let mut sorted_atoms: Vec<_> = self.atoms.iter().collect();
        sorted_atoms.sort_by_key(|a| {
            (a.atomic_number, a.formal_charge, a.isotope, a.is_aromatic, a.implicit_hydrogens)
        });
        for atom in &sorted_atoms {
            hasher.update([atom.atomic_number]);
            hasher.update(atom.formal_charge.to_le_bytes());
            hasher.update(atom.isotope.unwrap_or(0).to_le_bytes());
            hasher.update([atom.is_aromatic as u8, atom.implicit_hydrogens]);
        }
        let mut sorted_bonds: Vec<(usize, usize, u8)> = self
            .bonds
            .iter()
            .map(|b| {
                let (lo, hi) = if b.atom1 <= b.atom2 { (b.atom1, b.atom2) } else { (b.atom2, b.atom1) };
                (lo, hi, b.order as u8)
            })
            .collect();
        sorted_bonds.sort_unstable();
        for (lo, hi, order) in sorted_bonds {
            hasher.update(lo.to_le_bytes());
            hasher.update(hi.to_le_bytes());
            hasher.update([order]);
        }
        format!("{:x}", hasher.finalize())
    }
}

impl fmt::Display for Molecule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<smiles: {}, {} atoms>", self.smiles, self.atom_count())
    }
}
