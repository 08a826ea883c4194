//! Percepción de anillos (SSSR aproximado).
//!
//! Árbol de expansión por BFS; cada arista fuera del árbol (cuerda) cierra un
//! ciclo, y para cada cuerda se toma el ciclo más corto que la contiene. El
//! número de anillos coincide con el número ciclomático `enlaces - átomos +
//! componentes`, que es lo que necesitan RingCount y los descriptores
//! topológicos.

use std::collections::{HashSet, VecDeque};

use crate::molecule::Molecule;

/// Anillos del grafo como listas de índices de átomo. El orden dentro de
/// cada anillo sigue el ciclo; el orden entre anillos es por tamaño.
pub fn find_sssr(mol: &Molecule) -> Vec<Vec<usize>> {
    let n = mol.atom_count();
    if n == 0 || mol.bond_count() == 0 {
        return Vec::new();
    }

    // Bosque de expansión; lo que sobra son cuerdas.
    let mut visited = vec![false; n];
    let mut tree_bonds = vec![false; mol.bond_count()];
    for start in 0..n {
        if visited[start] {
            continue;
        }
        visited[start] = true;
        let mut queue = VecDeque::from([start]);
        while let Some(u) = queue.pop_front() {
            for &(v, bi) in &mol.adjacency[u] {
                if !visited[v] {
                    visited[v] = true;
                    tree_bonds[bi] = true;
                    queue.push_back(v);
                }
            }
        }
    }

    let mut rings: Vec<Vec<usize>> = Vec::new();
    let mut seen: HashSet<Vec<usize>> = HashSet::new();
    for (bi, bond) in mol.bonds.iter().enumerate() {
        if tree_bonds[bi] {
            continue;
        }
        // Camino más corto entre los extremos sin usar la cuerda.
        if let Some(path) = shortest_path_avoiding(mol, bond.atom1, bond.atom2, bi) {
            let mut key = path.clone();
            key.sort_unstable();
            if seen.insert(key) {
                rings.push(path);
            }
        }
    }

    rings.sort_by_key(|r| r.len());
    rings
}

/// Número ciclomático: `enlaces - átomos + componentes`.
pub fn ring_count(mol: &Molecule) -> usize {
    let n = mol.atom_count();
    if n == 0 {
        return 0;
    }
    let mut visited = vec![false; n];
    let mut components = 0usize;
    for start in 0..n {
        if visited[start] {
            continue;
        }
        components += 1;
        visited[start] = true;
        let mut queue = VecDeque::from([start]);
        while let Some(u) = queue.pop_front() {
            for &(v, _) in &mol.adjacency[u] {
                if !visited[v] {
                    visited[v] = true;
                    queue.push_back(v);
                }
            }
        }
    }
    mol.bond_count() + components - n
}

/// Máscara de pertenencia a anillo por átomo.
pub fn atoms_in_rings(mol: &Molecule, rings: &[Vec<usize>]) -> Vec<bool> {
    let mut mask = vec![false; mol.atom_count()];
    for ring in rings {
        for &a in ring {
            mask[a] = true;
        }
    }
    mask
}

/// Máscara de pertenencia a anillo por enlace.
pub fn bonds_in_rings(mol: &Molecule, rings: &[Vec<usize>]) -> Vec<bool> {
    let mut mask = vec![false; mol.bond_count()];
    for ring in rings {
        for w in 0..ring.len() {
            let a = ring[w];
            let b = ring[(w + 1) % ring.len()];
            if let Some(pos) = mol.adjacency[a].iter().find(|&&(nb, _)| nb == b) {
                mask[pos.1] = true;
            }
        }
    }
    mask
}

/// Anillos con todos sus átomos aromáticos.
pub fn aromatic_ring_count(mol: &Molecule, rings: &[Vec<usize>]) -> usize {
    rings.iter().filter(|ring| ring.iter().all(|&a| mol.atoms[a].is_aromatic)).count()
}

fn shortest_path_avoiding(
    mol: &Molecule,
    from: usize,
    to: usize,
    skip_bond: usize,
) -> Option<Vec<usize>> {
    let n = mol.atom_count();
    let mut prev: Vec<Option<usize>> = vec![None; n];
    let mut visited = vec![false; n];
    visited[from] = true;
    let mut queue = VecDeque::from([from]);
    while let Some(u) = queue.pop_front() {
        if u == to {
            break;
        }
        for &(v, bi) in &mol.adjacency[u] {
            if bi == skip_bond || visited[v] {
                continue;
            }
            visited[v] = true;
            prev[v] = Some(u);
            queue.push_back(v);
        }
    }
    if !visited[to] {
        return None;
    }
    let mut path = vec![to];
    let mut cur = to;
    while let Some(p) = prev[cur] {
        path.push(p);
        cur = p;
    }
    path.reverse();
    Some(path)
}
