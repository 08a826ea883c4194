//! Métricas de drug-likeness: peso molecular, logP de Crippen, QED, TPSA y
//! violaciones de la regla de cinco de Lipinski.
//!
//! QED sigue a Bickerton 2012: media geométrica ponderada de ocho funciones
//! de deseabilidad (MW, logP, HBA, HBD, TPSA, enlaces rotables, anillos
//! aromáticos, alertas estructurales). Las alertas se detectan con
//! predicados directos sobre el grafo en lugar de patrones SMARTS; cubren
//! el mismo subconjunto de grupos reactivos.

use serde::Serialize;

use screen_domain::ring;
use screen_domain::{BondOrder, Molecule};

use crate::descriptors::{crippen_logp_mr, tpsa};
use crate::properties::{hba_count, hbd_count, molecular_weight, rotatable_bond_count};

/// Las cinco métricas que acompañan a cada predicción.
#[derive(Debug, Clone, Serialize)]
pub struct DruglikenessMetrics {
    pub mw: f64,
    pub logp: f64,
    pub qed: f64,
    pub tpsa: f64,
    /// Entero en [0,4]: una por condición de Lipinski incumplida.
    pub ro5_violations: u8,
}

/// Pesos de QED (Bickerton 2012, tabla 1), en el orden
/// MW, logP, HBA, HBD, TPSA, rotables, anillos aromáticos, alertas.
const QED_WEIGHTS: [f64; 8] = [0.66, 0.46, 0.05, 0.61, 0.06, 0.65, 0.48, 0.95];

/// Calcula las métricas completas. Total para cualquier estructura parseada.
pub fn druglikeness_metrics(mol: &Molecule) -> DruglikenessMetrics {
    let rings = ring::find_sssr(mol);

    let mw = molecular_weight(mol);
    let (logp, _mr) = crippen_logp_mr(mol, &rings);
    let hbd = hbd_count(mol);
    let hba = hba_count(mol);
    let t = tpsa(mol);
    let rot = rotatable_bond_count(mol, &rings);
    let aromatic_rings = ring::aromatic_ring_count(mol, &rings);
    let alerts = structural_alert_count(mol, &rings);

    let mut violations = 0u8;
    if mw > 500.0 {
        violations += 1;
    }
    if logp > 5.0 {
        violations += 1;
    }
    if hbd > 5 {
        violations += 1;
    }
    if hba > 10 {
        violations += 1;
    }

    let qed = qed_score(&[
        mw,
        logp,
        hba as f64,
        hbd as f64,
        t,
        rot as f64,
        aromatic_rings as f64,
        alerts as f64,
    ]);

    DruglikenessMetrics { mw, logp, qed, tpsa: t, ro5_violations: violations }
}

/// Media geométrica ponderada de las deseabilidades, recortada a [0,1].
fn qed_score(properties: &[f64; 8]) -> f64 {
    let mut log_sum = 0.0;
    let mut weight_sum = 0.0;
    for (i, &x) in properties.iter().enumerate() {
        let d = desirability(x, i).max(1e-10);
        log_sum += QED_WEIGHTS[i] * d.ln();
        weight_sum += QED_WEIGHTS[i];
    }
    if weight_sum > 0.0 {
        (log_sum / weight_sum).exp().clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Deseabilidad gaussiana asimétrica por propiedad: centro en el valor
/// típico de fármaco y anchuras distintas a cada lado.
fn desirability(x: f64, idx: usize) -> f64 {
    let (center, sigma_left, sigma_right): (f64, f64, f64) = match idx {
        0 => (300.0, 120.0, 200.0), // MW
        1 => (2.5, 2.5, 2.5),       // logP
        2 => (4.0, 4.0, 6.0),       // HBA
        3 => (1.0, 1.0, 4.0),       // HBD
        4 => (60.0, 40.0, 80.0),    // TPSA
        5 => (3.0, 3.0, 7.0),       // rotables
        6 => (2.0, 2.0, 2.0),       // anillos aromáticos
        7 => (0.0, 0.5, 0.5),       // alertas
        _ => return 0.5,
    };
    let sigma = if x <= center { sigma_left } else { sigma_right };
    let z = (x - center) / sigma;
    (-0.5 * z * z).exp()
}

/// Cuenta de grupos de alerta presentes (cada predicado suma como mucho 1).
fn structural_alert_count(mol: &Molecule, rings: &[Vec<usize>]) -> usize {
    let predicates: [fn(&Molecule, &[Vec<usize>]) -> bool; 9] = [
        has_acyl_halide,
        has_small_hetero_ring,
        has_thiol,
        has_aldehyde,
        has_isocyanate_like,
        has_alpha_diketone,
        has_peroxide,
        has_hydrazine,
        has_sulfonyl_halide,
    ];
    predicates.iter().filter(|p| p(mol, rings)).count()
}

/// C(=O)-X con X = Cl/Br/I.
fn has_acyl_halide(mol: &Molecule, _rings: &[Vec<usize>]) -> bool {
    mol.atoms.iter().enumerate().any(|(i, a)| {
        a.atomic_number == 6
            && has_double_bond_to(mol, i, 8)
            && mol.neighbors(i).any(|n| matches!(mol.atoms[n].atomic_number, 17 | 35 | 53))
    })
}

/// Epóxido o aziridina: anillo de 3 con O o N.
fn has_small_hetero_ring(mol: &Molecule, rings: &[Vec<usize>]) -> bool {
    rings.iter().any(|r| {
        r.len() == 3 && r.iter().any(|&i| matches!(mol.atoms[i].atomic_number, 7 | 8))
    })
}

/// S-H libre.
fn has_thiol(mol: &Molecule, _rings: &[Vec<usize>]) -> bool {
    mol.atoms.iter().any(|a| a.atomic_number == 16 && a.implicit_hydrogens > 0)
}

/// Aldehído: C con =O y al menos un H.
fn has_aldehyde(mol: &Molecule, _rings: &[Vec<usize>]) -> bool {
    mol.atoms.iter().enumerate().any(|(i, a)| {
        a.atomic_number == 6 && a.implicit_hydrogens >= 1 && has_double_bond_to(mol, i, 8)
    })
}

/// Isocianato / isotiocianato: C con =N y =O o =S acumulados.
fn has_isocyanate_like(mol: &Molecule, _rings: &[Vec<usize>]) -> bool {
    mol.atoms.iter().enumerate().any(|(i, a)| {
        a.atomic_number == 6
            && has_double_bond_to(mol, i, 7)
            && (has_double_bond_to(mol, i, 8) || has_double_bond_to(mol, i, 16))
    })
}

/// Dicetona alfa: dos carbonilos contiguos.
fn has_alpha_diketone(mol: &Molecule, _rings: &[Vec<usize>]) -> bool {
    mol.bonds.iter().any(|b| {
        b.order == BondOrder::Single
            && mol.atoms[b.atom1].atomic_number == 6
            && mol.atoms[b.atom2].atomic_number == 6
            && has_double_bond_to(mol, b.atom1, 8)
            && has_double_bond_to(mol, b.atom2, 8)
    })
}

/// O-O simple.
fn has_peroxide(mol: &Molecule, _rings: &[Vec<usize>]) -> bool {
    mol.bonds.iter().any(|b| {
        b.order == BondOrder::Single
            && mol.atoms[b.atom1].atomic_number == 8
            && mol.atoms[b.atom2].atomic_number == 8
    })
}

/// N-N simple no aromático.
fn has_hydrazine(mol: &Molecule, _rings: &[Vec<usize>]) -> bool {
    mol.bonds.iter().any(|b| {
        b.order == BondOrder::Single
            && mol.atoms[b.atom1].atomic_number == 7
            && mol.atoms[b.atom2].atomic_number == 7
            && !mol.atoms[b.atom1].is_aromatic
            && !mol.atoms[b.atom2].is_aromatic
    })
}

/// S(=O)(=O)-Cl.
fn has_sulfonyl_halide(mol: &Molecule, _rings: &[Vec<usize>]) -> bool {
    mol.atoms.iter().enumerate().any(|(i, a)| {
        a.atomic_number == 16
            && double_bond_count_to(mol, i, 8) >= 2
            && mol.neighbors(i).any(|n| matches!(mol.atoms[n].atomic_number, 17 | 35))
    })
}

fn has_double_bond_to(mol: &Molecule, idx: usize, atomic_number: u8) -> bool {
    double_bond_count_to(mol, idx, atomic_number) >= 1
}

fn double_bond_count_to(mol: &Molecule, idx: usize, atomic_number: u8) -> usize {
    mol.adjacency[idx]
        .iter()
        .filter(|&&(n, bi)| {
            mol.atoms[n].atomic_number == atomic_number
                && mol.bonds[bi].order == BondOrder::Double
        })
        .count()
}
