//! Motor de descriptores 2D.
//!
//! Todos los descriptores se calculan sobre el grafo molecular (distancias
//! topológicas por BFS, nada de geometría 3D). `compute_descriptors` produce
//! el conjunto completo con nombre, en orden canónico y con la política de
//! relleno: cualquier valor no finito sale como 0.0.

use std::collections::{HashMap, VecDeque};

use indexmap::IndexMap;
use screen_domain::element::element_by_number;
use screen_domain::ring;
use screen_domain::{BondOrder, Molecule};

use crate::properties::{hba_count, hbd_count, molecular_weight, rotatable_bond_count};

/// Registro nombre→valor de una molécula. El orden de inserción es el orden
/// canónico del motor.
pub type DescriptorRecord = IndexMap<String, f64>;

/// Nombres canónicos, en el orden en que `compute_descriptors` los emite.
const DESCRIPTOR_NAMES: &[&str] = &[
    "MolWt",
    "HeavyAtomCount",
    "HeteroAtomCount",
    "NumHDonors",
    "NumHAcceptors",
    "NumRotatableBonds",
    "RingCount",
    "NumAromaticRings",
    "FractionCSP3",
    "TotalFormalCharge",
    "WienerIndex",
    "ZagrebM1",
    "ZagrebM2",
    "BalabanJ",
    "BertzCT",
    "Kappa1",
    "Kappa2",
    "Kappa3",
    "Chi0",
    "Chi1",
    "Chi2",
    "Chi3",
    "MaxEStateIndex",
    "MinEStateIndex",
    "SumEStateIndices",
    "MolLogP",
    "MolMR",
    "TPSA",
    "ATS1",
    "ATS2",
    "ATS3",
    "ATS4",
    "ATS5",
    "ATS6",
    "ATS7",
    "ATS8",
];

/// Lista canónica de nombres de descriptor.
pub fn descriptor_names() -> Vec<String> {
    DESCRIPTOR_NAMES.iter().map(|s| s.to_string()).collect()
}

/// Calcula el conjunto completo para una molécula. Total: nunca falla para
/// una estructura parseada; lo no computable sale como 0.0.
pub fn compute_descriptors(mol: &Molecule) -> DescriptorRecord {
    let rings = ring::find_sssr(mol);
    let dist = distance_matrix(mol);

    let mut values: Vec<f64> = Vec::with_capacity(DESCRIPTOR_NAMES.len());

    values.push(molecular_weight(mol));
    values.push(mol.heavy_atom_count() as f64);
    values.push(mol.hetero_atom_count() as f64);
    values.push(hbd_count(mol) as f64);
    values.push(hba_count(mol) as f64);
    values.push(rotatable_bond_count(mol, &rings) as f64);
    values.push(rings.len() as f64);
    values.push(ring::aromatic_ring_count(mol, &rings) as f64);
    values.push(fraction_csp3(mol));
    values.push(mol.net_formal_charge() as f64);
    values.push(wiener_index(mol, &dist));

    let (m1, m2) = zagreb_indices(mol);
    values.push(m1);
    values.push(m2);
    values.push(balaban_j(mol, &dist));
    values.push(bertz_ct(mol));

    let (k1, k2, k3) = kappa_shape_indices(mol);
    values.push(k1);
    values.push(k2);
    values.push(k3);
    for order in 0..=3 {
        values.push(chi_connectivity(mol, order));
    }

    let estates = estate_indices(mol, &dist);
    let (emax, emin, esum) = estate_aggregates(&estates);
    values.push(emax);
    values.push(emin);
    values.push(esum);

    let (logp, mr) = crippen_logp_mr(mol, &rings);
    values.push(logp);
    values.push(mr);
    values.push(tpsa(mol));

    for v in mass_autocorrelation(mol, &dist) {
        values.push(v);
    }

    debug_assert_eq!(values.len(), DESCRIPTOR_NAMES.len());
    DESCRIPTOR_NAMES
        .iter()
        .zip(values)
        .map(|(name, v)| (name.to_string(), finite_or_zero(v)))
        .collect()
}

/// Versión por lotes, orden de entrada preservado.
pub fn compute_descriptor_batch(mols: &[Molecule]) -> Vec<DescriptorRecord> {
    mols.iter().map(compute_descriptors).collect()
}

fn finite_or_zero(v: f64) -> f64 {
    if v.is_finite() {
        v
    } else {
        0.0
    }
}

// ---------------------------------------------------------------------------
// Distancias topológicas
// ---------------------------------------------------------------------------

/// Matriz de distancias (BFS desde cada átomo); `usize::MAX` = inalcanzable.
fn distance_matrix(mol: &Molecule) -> Vec<Vec<usize>> {
    let n = mol.atom_count();
    let mut dist = vec![vec![usize::MAX; n]; n];
    for start in 0..n {
        dist[start][start] = 0;
        let mut queue = VecDeque::from([start]);
        while let Some(u) = queue.pop_front() {
            for &(v, _) in &mol.adjacency[u] {
                if dist[start][v] == usize::MAX {
                    dist[start][v] = dist[start][u] + 1;
                    queue.push_back(v);
                }
            }
        }
    }
    dist
}

/// Suma de distancias entre pares (índice de Wiener).
fn wiener_index(mol: &Molecule, dist: &[Vec<usize>]) -> f64 {
    let n = mol.atom_count();
    let mut sum = 0u64;
    for i in 0..n {
        for j in (i + 1)..n {
            if dist[i][j] != usize::MAX {
                sum += dist[i][j] as u64;
            }
        }
    }
    sum as f64
}

/// M1 = Σ d(i)², M2 = Σ d(i)·d(j) sobre enlaces.
fn zagreb_indices(mol: &Molecule) -> (f64, f64) {
    let m1 = (0..mol.atom_count())
        .map(|i| {
            let d = mol.degree(i) as f64;
            d * d
        })
        .sum();
    let m2 = mol
        .bonds
        .iter()
        .map(|b| mol.degree(b.atom1) as f64 * mol.degree(b.atom2) as f64)
        .sum();
    (m1, m2)
}

/// J de Balaban: m/(μ+1) · Σ (s_i·s_j)^(-1/2) sobre enlaces, con s_i la suma
/// de distancias del átomo i y μ el número ciclomático.
fn balaban_j(mol: &Molecule, dist: &[Vec<usize>]) -> f64 {
    let n = mol.atom_count();
    let m = mol.bond_count();
    if n < 2 || m == 0 {
        return 0.0;
    }
    let s: Vec<f64> = (0..n)
        .map(|i| {
            (0..n)
                .filter(|&j| j != i && dist[i][j] != usize::MAX)
                .map(|j| dist[i][j] as f64)
                .sum()
        })
        .collect();
    let mu = ring::ring_count(mol) as f64;
    let edge_sum: f64 = mol
        .bonds
        .iter()
        .filter(|b| s[b.atom1] > 0.0 && s[b.atom2] > 0.0)
        .map(|b| (s[b.atom1] * s[b.atom2]).powf(-0.5))
        .sum();
    m as f64 / (mu + 1.0) * edge_sum
}

// ---------------------------------------------------------------------------
// Complejidad e índices de forma
// ---------------------------------------------------------------------------

/// CT de Bertz: 2·(I_enlaces + I_átomos), entropías de Shannon sobre las
/// clases de enlace y los entornos atómicos (elemento, grado, aromaticidad).
fn bertz_ct(mol: &Molecule) -> f64 {
    if mol.bond_count() == 0 {
        return 0.0;
    }
    let mut bond_classes = [0usize; 4];
    for bond in &mol.bonds {
        let k = match bond.order {
            BondOrder::Single => 0,
            BondOrder::Double => 1,
            BondOrder::Triple => 2,
            BondOrder::Aromatic => 3,
        };
        bond_classes[k] += 1;
    }

    let mut atom_classes: HashMap<(u8, u8, bool), usize> = HashMap::new();
    for (i, atom) in mol.atoms.iter().enumerate() {
        *atom_classes
            .entry((atom.atomic_number, mol.degree(i) as u8, atom.is_aromatic))
            .or_insert(0) += 1;
    }
    let atom_counts: Vec<usize> = atom_classes.values().copied().collect();

    2.0 * (shannon_information(&bond_classes) + shannon_information(&atom_counts))
}

/// Contenido de información n·H(p) de una distribución de conteos.
fn shannon_information(counts: &[usize]) -> f64 {
    let total: usize = counts.iter().sum();
    if total == 0 {
        return 0.0;
    }
    let n = total as f64;
    counts
        .iter()
        .filter(|&&c| c > 0)
        .map(|&c| {
            let p = c as f64 / n;
            -p * p.log2()
        })
        .sum::<f64>()
        * n
}

/// Caminos simples de longitud dada (cada camino contado una vez).
fn count_paths(mol: &Molecule, length: usize) -> usize {
    if length == 0 {
        return mol.atom_count();
    }
    let mut count = 0usize;
    let mut visited = vec![false; mol.atom_count()];
    for start in 0..mol.atom_count() {
        visited[start] = true;
        paths_from(mol, start, length, &mut visited, &mut |_| count += 1);
        visited[start] = false;
    }
    count / 2
}

/// DFS sobre caminos simples; invoca `sink` con el último átomo al llegar a
/// la longitud pedida.
fn paths_from(
    mol: &Molecule,
    current: usize,
    remaining: usize,
    visited: &mut Vec<bool>,
    sink: &mut impl FnMut(usize),
) {
    if remaining == 0 {
        sink(current);
        return;
    }
    for &(next, _) in &mol.adjacency[current] {
        if !visited[next] {
            visited[next] = true;
            paths_from(mol, next, remaining - 1, visited, sink);
            visited[next] = false;
        }
    }
}

/// Índices de forma κ1–κ3 de Kier, sobre conteos de caminos P1–P3.
fn kappa_shape_indices(mol: &Molecule) -> (f64, f64, f64) {
    let n = mol.atom_count() as f64;
    if n == 0.0 {
        return (0.0, 0.0, 0.0);
    }
    let p1 = count_paths(mol, 1) as f64;
    let p2 = count_paths(mol, 2) as f64;
    let p3 = count_paths(mol, 3) as f64;

    let k1 = if p1 > 0.0 { n * (n - 1.0).powi(2) / p1.powi(2) } else { 0.0 };
    let k2 = if p2 > 0.0 && n >= 2.0 {
        (n - 1.0).powi(2) * (n - 2.0).powi(2) / p2.powi(2)
    } else {
        0.0
    };
    let k3 = if p3 > 0.0 && n >= 3.0 {
        if (mol.atom_count()) % 2 == 1 {
            (n - 1.0).powi(2) * (n - 3.0).powi(2) / p3.powi(2)
        } else {
            (n - 1.0) * (n - 2.0).powi(2) * (n - 3.0) / p3.powi(2)
        }
    } else {
        0.0
    };
    (k1, k2, k3)
}

/// χ de conectividad (Randić/Kier-Hall) de orden 0–3: suma sobre caminos
/// simples de esa longitud de 1/√(producto de grados).
fn chi_connectivity(mol: &Molecule, order: usize) -> f64 {
    let n = mol.atom_count();
    let degrees: Vec<usize> = (0..n).map(|i| mol.degree(i)).collect();

    if order == 0 {
        return degrees
            .iter()
            .filter(|&&d| d > 0)
            .map(|&d| 1.0 / (d as f64).sqrt())
            .sum();
    }

    let mut total = 0.0;
    let mut visited = vec![false; n];
    let mut path: Vec<usize> = Vec::with_capacity(order + 1);
    for start in 0..n {
        visited[start] = true;
        path.push(start);
        chi_paths(mol, start, order, &degrees, &mut visited, &mut path, &mut total);
        path.pop();
        visited[start] = false;
    }
    // Cada camino aparece una vez por extremo.
    total / 2.0
}

fn chi_paths(
    mol: &Molecule,
    current: usize,
    remaining: usize,
    degrees: &[usize],
    visited: &mut Vec<bool>,
    path: &mut Vec<usize>,
    total: &mut f64,
) {
    if remaining == 0 {
        let product: f64 = path.iter().map(|&i| degrees[i] as f64).product();
        if product > 0.0 {
            *total += 1.0 / product.sqrt();
        }
        return;
    }
    for &(next, _) in &mol.adjacency[current] {
        if !visited[next] {
            visited[next] = true;
            path.push(next);
            chi_paths(mol, next, remaining - 1, degrees, visited, path, total);
            path.pop();
            visited[next] = false;
        }
    }
}

/// Fracción de carbonos sp3.
fn fraction_csp3(mol: &Molecule) -> f64 {
    let carbons = mol.atoms.iter().filter(|a| a.atomic_number == 6).count();
    if carbons == 0 {
        return 0.0;
    }
    let sp3 = mol
        .atoms
        .iter()
        .enumerate()
        .filter(|(i, a)| {
            a.atomic_number == 6
                && !a.is_aromatic
                && !mol.adjacency[*i].iter().any(|&(_, bi)| {
                    matches!(mol.bonds[bi].order, BondOrder::Double | BondOrder::Triple)
                })
        })
        .count();
    sp3 as f64 / carbons as f64
}

// ---------------------------------------------------------------------------
// Estados electrotopológicos
// ---------------------------------------------------------------------------

/// E-state por átomo: S_i = I_i + Σ_j (I_i − I_j)/d_ij², con estado
/// intrínseco I = (δv + 1)/δ y δv = electrones de valencia − H.
fn estate_indices(mol: &Molecule, dist: &[Vec<usize>]) -> Vec<f64> {
    let n = mol.atom_count();
    let intrinsic: Vec<f64> = (0..n)
        .map(|i| {
            let atom = &mol.atoms[i];
            let delta = mol.degree(i) as f64;
            if delta == 0.0 {
                return 0.0;
            }
            let valence_electrons = match atom.atomic_number {
                5 => 3,
                6 | 14 => 4,
                7 | 15 => 5,
                8 | 16 | 34 => 6,
                9 | 17 | 35 | 53 => 7,
                z => z as usize,
            };
            let delta_v = valence_electrons as f64 - atom.implicit_hydrogens as f64;
            (delta_v + 1.0) / delta
        })
        .collect();

    (0..n)
        .map(|i| {
            let perturbation: f64 = (0..n)
                .filter(|&j| j != i && dist[i][j] != usize::MAX)
                .map(|j| (intrinsic[i] - intrinsic[j]) / (dist[i][j] as f64).powi(2))
                .sum();
            intrinsic[i] + perturbation
        })
        .collect()
}

fn estate_aggregates(estates: &[f64]) -> (f64, f64, f64) {
    if estates.is_empty() {
        return (0.0, 0.0, 0.0);
    }
    let max = estates.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let min = estates.iter().cloned().fold(f64::INFINITY, f64::min);
    let sum = estates.iter().sum();
    (max, min, sum)
}

// ---------------------------------------------------------------------------
// Crippen logP/MR y TPSA
// ---------------------------------------------------------------------------

/// LogP y refractividad molar por contribuciones atómicas (Wildman-Crippen,
/// tipificación simplificada). Incluye los H implícitos.
pub fn crippen_logp_mr(mol: &Molecule, rings: &[Vec<usize>]) -> (f64, f64) {
    let in_ring = ring::atoms_in_rings(mol, rings);
    let mut logp = 0.0;
    let mut mr = 0.0;
    for i in 0..mol.atom_count() {
        let (lp, m) = crippen_contribution(mol, i, in_ring[i]);
        logp += lp;
        mr += m;
    }
    for atom in &mol.atoms {
        let h = atom.implicit_hydrogens as f64;
        if h == 0.0 {
            continue;
        }
        // H sobre carbono vs. sobre heteroátomo.
        logp += h * if atom.atomic_number == 6 { 0.1230 } else { -0.2677 };
        mr += h * 1.057;
    }
    (logp, mr)
}

fn crippen_contribution(mol: &Molecule, idx: usize, in_ring: bool) -> (f64, f64) {
    let atom = &mol.atoms[idx];
    let degree = mol.degree(idx);
    let has_double = mol.adjacency[idx]
        .iter()
        .any(|&(_, bi)| mol.bonds[bi].order == BondOrder::Double);
    let hetero_neighbor = mol
        .neighbors(idx)
        .any(|n| mol.atoms[n].atomic_number != 6 && mol.atoms[n].atomic_number != 1);

    match atom.atomic_number {
        6 => {
            if atom.is_aromatic {
                if hetero_neighbor {
                    (-0.14, 3.509)
                } else {
                    (0.296, 3.509)
                }
            } else if has_double {
                if hetero_neighbor {
                    (-0.03, 3.509)
                } else {
                    (0.08, 3.509)
                }
            } else if in_ring {
                (0.1441, 3.509)
            } else {
                match degree {
                    0..=2 => (0.1441, 3.509),
                    3 => (0.0, 3.509),
                    _ => (-0.04, 3.509),
                }
            }
        }
        7 => {
            if atom.is_aromatic {
                (-0.3187, 2.188)
            } else if atom.formal_charge > 0 {
                (-1.0190, 2.188)
            } else if has_double {
                (-0.5262, 2.188)
            } else {
                (-0.4458, 2.262)
            }
        }
        8 => {
            if atom.formal_charge < 0 {
                (-1.189, 1.476)
            } else if has_double {
                (-0.3339, 1.476)
            } else if degree >= 2 {
                (-0.2893, 1.476)
            } else {
                (-0.3567, 1.476)
            }
        }
        9 => (0.4118, 1.108),
        15 => (0.2836, 6.920),
        16 => {
            if has_double {
                (-0.1084, 7.365)
            } else if atom.formal_charge != 0 {
                (-0.5188, 7.365)
            } else {
                (0.6237, 7.365)
            }
        }
        17 => (0.6895, 5.853),
        35 => (0.8813, 8.927),
        53 => (1.050, 13.940),
        _ => (0.0, 0.0),
    }
}

/// Área polar topológica por contribuciones de fragmento (Ertl 2000).
pub fn tpsa(mol: &Molecule) -> f64 {
    (0..mol.atom_count()).map(|i| tpsa_contribution(mol, i)).sum()
}

fn tpsa_contribution(mol: &Molecule, idx: usize) -> f64 {
    let atom = &mol.atoms[idx];
    let degree = mol.degree(idx);
    let h = atom.implicit_hydrogens;
    let has_double = mol.adjacency[idx]
        .iter()
        .any(|&(_, bi)| mol.bonds[bi].order == BondOrder::Double);

    match atom.atomic_number {
        7 => {
            if atom.formal_charge > 0 {
                return match h {
                    0 => 0.0,
                    1 => 23.47,
                    2 => 25.59,
                    _ => 27.64,
                };
            }
            if atom.is_aromatic {
                return if h >= 1 { 15.79 } else { 12.89 };
            }
            match (degree, h, has_double) {
                (1, 2, _) => 26.02,
                (2, 1, false) => 19.15,
                (2, 1, true) => 23.85,
                (2, 0, true) => 12.36,
                (2, 0, false) => 19.15,
                (3, 0, _) => 3.24,
                (1, 0, true) => 23.79, // nitrilo
                _ => {
                    if h >= 2 {
                        26.02
                    } else if h == 1 {
                        19.15
                    } else {
                        3.24
                    }
                }
            }
        }
        8 => {
            if atom.formal_charge < 0 {
                return 23.06;
            }
            if atom.is_aromatic {
                return 13.14;
            }
            match (degree, h, has_double) {
                (1, 1, false) => 20.23,
                (1, 0, _) => 17.07,
                (2, 0, false) => 9.23,
                _ => {
                    if h >= 1 {
                        20.23
                    } else if has_double {
                        17.07
                    } else {
                        9.23
                    }
                }
            }
        }
        16 => {
            if h >= 1 {
                38.80
            } else if has_double || degree >= 2 {
                25.30
            } else {
                0.0
            }
        }
        15 => {
            if has_double {
                34.14
            } else if h >= 1 {
                23.47
            } else {
                9.81
            }
        }
        _ => 0.0,
    }
}

// ---------------------------------------------------------------------------
// Autocorrelaciones
// ---------------------------------------------------------------------------

/// Autocorrelaciones de Moreau-Broto ATS1–ATS8 con la masa atómica como
/// propiedad: ATS_k = Σ m_i·m_j sobre pares a distancia k.
fn mass_autocorrelation(mol: &Molecule, dist: &[Vec<usize>]) -> [f64; 8] {
    let n = mol.atom_count();
    let mut ats = [0.0; 8];
    if n < 2 {
        return ats;
    }
    let mass: Vec<f64> = mol
        .atoms
        .iter()
        .map(|a| element_by_number(a.atomic_number).map(|e| e.atomic_weight).unwrap_or(0.0))
        .collect();
    for i in 0..n {
        for j in (i + 1)..n {
            let d = dist[i][j];
            if d >= 1 && d <= 8 {
                ats[d - 1] += mass[i] * mass[j];
            }
        }
    }
    ats
}

#[cfg(test)]
mod tests {
    use super::*;
    use screen_domain::parse_smiles;

    #[test]
    fn names_are_unique_and_match_record_order() {
        let names = descriptor_names();
        let mut sorted = names.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), names.len());

        let mol = parse_smiles("CCO").unwrap();
        let record = compute_descriptors(&mol);
        let record_names: Vec<String> = record.keys().cloned().collect();
        assert_eq!(record_names, names);
    }

    #[test]
    fn all_values_are_finite() {
        for s in ["CCO", "c1ccccc1", "CC(=O)Oc1ccccc1C(=O)O", "C", "[NH4+]"] {
            let mol = parse_smiles(s).unwrap();
            let record = compute_descriptors(&mol);
            for (name, v) in &record {
                assert!(v.is_finite(), "{name} not finite for {s}");
            }
        }
    }

    #[test]
    fn wiener_of_hexane() {
        // Cadena de 6: W = 35
        let mol = parse_smiles("CCCCCC").unwrap();
        let record = compute_descriptors(&mol);
        assert!((record["WienerIndex"] - 35.0).abs() < 1e-9);
    }

    #[test]
    fn zagreb_m1_of_benzene() {
        // 6 átomos de grado 2 → M1 = 24
        let mol = parse_smiles("c1ccccc1").unwrap();
        let record = compute_descriptors(&mol);
        assert!((record["ZagrebM1"] - 24.0).abs() < 1e-9);
        assert!((record["NumAromaticRings"] - 1.0).abs() < 1e-9);
    }

    #[test]
    fn tpsa_of_ethanol() {
        // Un solo -OH: 20.23
        let mol = parse_smiles("CCO").unwrap();
        assert!((tpsa(&mol) - 20.23).abs() < 1e-9);
    }

    #[test]
    fn fraction_csp3_extremes() {
        let hexane = parse_smiles("C1CCCCC1").unwrap();
        assert!((compute_descriptors(&hexane)["FractionCSP3"] - 1.0).abs() < 1e-9);
        let benzene = parse_smiles("c1ccccc1").unwrap();
        assert!(compute_descriptors(&benzene)["FractionCSP3"].abs() < 1e-9);
    }

    #[test]
    fn chi_zero_of_butane() {
        // Grados 1,2,2,1 → χ0 = 2·1 + 2/√2
        let mol = parse_smiles("CCCC").unwrap();
        let record = compute_descriptors(&mol);
        let expected = 2.0 + 2.0 / 2.0_f64.sqrt();
        assert!((record["Chi0"] - expected).abs() < 1e-9);
        assert!(record["Chi1"] > 0.0);
    }

    #[test]
    fn single_atom_is_all_zero_topology() {
        let mol = parse_smiles("C").unwrap();
        let record = compute_descriptors(&mol);
        assert!(record["WienerIndex"].abs() < 1e-9);
        assert!(record["ATS1"].abs() < 1e-9);
        assert!((record["MolWt"] - 16.043).abs() < 0.01);
    }

    #[test]
    fn batch_preserves_order() {
        let mols: Vec<_> =
            ["CCO", "c1ccccc1"].iter().map(|s| parse_smiles(s).unwrap()).collect();
        let records = compute_descriptor_batch(&mols);
        assert_eq!(records.len(), 2);
        assert!(records[0]["MolWt"] < records[1]["MolWt"]);
    }

    #[test]
    fn ats_of_ethane() {
        // Dos carbonos a distancia 1: ATS1 = 12.011²
        let mol = parse_smiles("CC").unwrap();
        let record = compute_descriptors(&mol);
        assert!((record["ATS1"] - 12.011 * 12.011).abs() < 1e-6);
        assert!(record["ATS2"].abs() < 1e-9);
    }
}
