//! Propiedades moleculares básicas: peso, donantes/aceptores de puente de
//! hidrógeno y enlaces rotables. Son la materia prima del resto de
//! descriptores y de las métricas de drug-likeness.

use screen_domain::element::element_by_number;
use screen_domain::ring;
use screen_domain::{BondOrder, Molecule};

const H_WEIGHT: f64 = 1.008;

/// Peso molecular: suma de pesos atómicos estándar, hidrógenos implícitos
/// incluidos.
pub fn molecular_weight(mol: &Molecule) -> f64 {
    let mut mw = 0.0;
    for atom in &mol.atoms {
        if let Some(elem) = element_by_number(atom.atomic_number) {
            mw += elem.atomic_weight;
        }
        mw += atom.implicit_hydrogens as f64 * H_WEIGHT;
    }
    mw
}

/// Donantes de puente de hidrógeno: N u O con al menos un H.
pub fn hbd_count(mol: &Molecule) -> usize {
    mol.atoms
        .iter()
        .filter(|a| (a.atomic_number == 7 || a.atomic_number == 8) && a.implicit_hydrogens > 0)
        .count()
}

/// Aceptores de puente de hidrógeno: todo N u O.
pub fn hba_count(mol: &Molecule) -> usize {
    mol.atoms
        .iter()
        .filter(|a| a.atomic_number == 7 || a.atomic_number == 8)
        .count()
}

/// Enlaces rotables: simples, fuera de anillo, no terminales y que no sean
/// el C-N de una amida.
pub fn rotatable_bond_count(mol: &Molecule, rings: &[Vec<usize>]) -> usize {
    let ring_bond = ring::bonds_in_rings(mol, rings);
    mol.bonds
        .iter()
        .enumerate()
        .filter(|&(bi, bond)| {
            bond.order == BondOrder::Single
                && !ring_bond[bi]
                && mol.degree(bond.atom1) > 1
                && mol.degree(bond.atom2) > 1
                && !is_amide_bond(mol, bond.atom1, bond.atom2)
        })
        .count()
}

/// Enlace amida C(=O)-N.
fn is_amide_bond(mol: &Molecule, a1: usize, a2: usize) -> bool {
    let (c, n) = match (mol.atoms[a1].atomic_number, mol.atoms[a2].atomic_number) {
        (6, 7) => (a1, a2),
        (7, 6) => (a2, a1),
        _ => return false,
    };
    mol.adjacency[c].iter().any(|&(nb, bi)| {
        nb != n && mol.atoms[nb].atomic_number == 8 && mol.bonds[bi].order == BondOrder::Double
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use screen_domain::parse_smiles;
    use screen_domain::ring::find_sssr;

    #[test]
    fn mw_of_ethanol() {
        let mol = parse_smiles("CCO").unwrap();
        // C2H6O = 2*12.011 + 6*1.008 + 15.999
        assert!((molecular_weight(&mol) - 46.069).abs() < 0.01);
    }

    #[test]
    fn mw_of_aspirin() {
        let mol = parse_smiles("CC(=O)Oc1ccccc1C(=O)O").unwrap();
        assert!((molecular_weight(&mol) - 180.16).abs() < 0.1);
    }

    #[test]
    fn hbd_hba_of_phenol() {
        let mol = parse_smiles("c1ccccc1O").unwrap();
        assert_eq!(hbd_count(&mol), 1);
        assert_eq!(hba_count(&mol), 1);
    }

    #[test]
    fn pyridine_accepts_but_does_not_donate() {
        let mol = parse_smiles("c1ccncc1").unwrap();
        assert_eq!(hbd_count(&mol), 0);
        assert_eq!(hba_count(&mol), 1);
    }

    #[test]
    fn rotatable_bonds_of_butane() {
        let mol = parse_smiles("CCCC").unwrap();
        let rings = find_sssr(&mol);
        assert_eq!(rotatable_bond_count(&mol, &rings), 1);
    }

    #[test]
    fn ring_bonds_do_not_rotate() {
        let mol = parse_smiles("C1CCCCC1").unwrap();
        let rings = find_sssr(&mol);
        assert_eq!(rotatable_bond_count(&mol, &rings), 0);
    }

    #[test]
    fn amide_bond_excluded() {
        // N-methylacetamide: CC(=O)NC — único candidato no terminal es el C-N amídico
        let mol = parse_smiles("CC(=O)NC").unwrap();
        let rings = find_sssr(&mol);
        assert_eq!(rotatable_bond_count(&mol, &rings), 0);
    }
}
