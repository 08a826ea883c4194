//! Tabla de elementos usada por el parser y los cálculos de propiedades.
//!
//! Pesos atómicos estándar (IUPAC, abreviados) y valencias por defecto para
//! la asignación de hidrógenos implícitos. Sólo cubre los elementos que
//! aparecen en química orgánica de screening; cualquier otro símbolo se
//! rechaza en el parser con `DomainError::UnknownElement`.

use std::collections::HashMap;

use once_cell::sync::Lazy;

/// Datos estáticos de un elemento.
#[derive(Debug, Clone, Copy)]
pub struct ElementInfo {
    pub symbol: &'static str,
    pub atomic_number: u8,
    /// Peso atómico estándar (no monoisotópico).
    pub atomic_weight: f64,
    /// Valencias admitidas, de menor a mayor (la menor que cubra los enlaces
    /// explícitos decide los H implícitos).
    pub valences: &'static [u8],
}

const ELEMENTS: &[ElementInfo] = &[
    ElementInfo { symbol: "H", atomic_number: 1, atomic_weight: 1.008, valences: &[1] },
    ElementInfo { symbol: "B", atomic_number: 5, atomic_weight: 10.811, valences: &[3] },
    ElementInfo { symbol: "C", atomic_number: 6, atomic_weight: 12.011, valences: &[4] },
    ElementInfo { symbol: "N", atomic_number: 7, atomic_weight: 14.007, valences: &[3, 5] },
    ElementInfo { symbol: "O", atomic_number: 8, atomic_weight: 15.999, valences: &[2] },
    ElementInfo { symbol: "F", atomic_number: 9, atomic_weight: 18.998, valences: &[1] },
    ElementInfo { symbol: "Si", atomic_number: 14, atomic_weight: 28.086, valences: &[4] },
    ElementInfo { symbol: "P", atomic_number: 15, atomic_weight: 30.974, valences: &[3, 5] },
    ElementInfo { symbol: "S", atomic_number: 16, atomic_weight: 32.065, valences: &[2, 4, 6] },
    ElementInfo { symbol: "Cl", atomic_number: 17, atomic_weight: 35.453, valences: &[1] },
    ElementInfo { symbol: "Se", atomic_number: 34, atomic_weight: 78.971, valences: &[2] },
    ElementInfo { symbol: "Br", atomic_number: 35, atomic_weight: 79.904, valences: &[1] },
    ElementInfo { symbol: "I", atomic_number: 53, atomic_weight: 126.904, valences: &[1] },
];

static BY_SYMBOL: Lazy<HashMap<&'static str, &'static ElementInfo>> =
    Lazy::new(|| ELEMENTS.iter().map(|e| (e.symbol, e)).collect());

static BY_NUMBER: Lazy<HashMap<u8, &'static ElementInfo>> =
    Lazy::new(|| ELEMENTS.iter().map(|e| (e.atomic_number, e)).collect());

/// Búsqueda por símbolo ("Cl", "C", ...). Sensible a mayúsculas.
pub fn element_by_symbol(symbol: &str) -> Option<&'static ElementInfo> {
    BY_SYMBOL.get(symbol).copied()
}

/// Búsqueda por número atómico.
pub fn element_by_number(atomic_number: u8) -> Option<&'static ElementInfo> {
    BY_NUMBER.get(&atomic_number).copied()
}

/// Subconjunto orgánico de SMILES: símbolos que pueden aparecer fuera de
/// corchetes (con H implícitos calculados por valencia).
pub fn is_organic_subset(symbol: &str) -> bool {
    matches!(symbol, "B" | "C" | "N" | "O" | "P" | "S" | "F" | "Cl" | "Br" | "I")
}

/// Elementos que admiten forma aromática en minúscula fuera de corchetes.
pub fn aromatic_symbol(ch: char) -> Option<&'static str> {
    match ch {
        'b' => Some("B"),
        'c' => Some("C"),
        'n' => Some("N"),
        'o' => Some("O"),
        'p' => Some("P"),
        's' => Some("S"),
        _ => None,
    }
}

/// Hidrógenos implícitos para un átomo dado la suma de órdenes de enlace.
///
/// Toma la menor valencia admitida que cubra los enlaces; si ninguna lo
/// hace (hipervalencia no modelada), devuelve 0. La carga formal ajusta la
/// valencia en +carga para N/P y -|carga| en el resto, el convenio simple
/// que cubre amonios y alcóxidos.
pub fn implicit_hydrogens(info: &ElementInfo, bond_order_sum: f64, formal_charge: i8) -> u8 {
    let bonds = bond_order_sum.round() as i32;
    for &v in info.valences {
        let adjusted = match info.atomic_number {
            7 | 15 => v as i32 + formal_charge as i32,
            _ => v as i32 - formal_charge.abs() as i32,
        };
        if adjusted >= bonds {
            return (adjusted - bonds) as u8;
        }
    }
    0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_by_symbol_and_number() {
        let c = element_by_symbol("C").unwrap();
        assert_eq!(c.atomic_number, 6);
        assert_eq!(element_by_number(6).unwrap().symbol, "C");
        assert!(element_by_symbol("Xx").is_none());
    }

    #[test]
    fn chlorine_is_two_letter() {
        let cl = element_by_symbol("Cl").unwrap();
        assert_eq!(cl.atomic_number, 17);
        assert!((cl.atomic_weight - 35.453).abs() < 1e-9);
    }

    #[test]
    fn implicit_h_for_neutral_atoms() {
        let c = element_by_symbol("C").unwrap();
        assert_eq!(implicit_hydrogens(c, 1.0, 0), 3); // CH3-
        assert_eq!(implicit_hydrogens(c, 4.0, 0), 0);
        let n = element_by_symbol("N").unwrap();
        assert_eq!(implicit_hydrogens(n, 3.0, 0), 0); // pyridine-like
        let o = element_by_symbol("O").unwrap();
        assert_eq!(implicit_hydrogens(o, 1.0, 0), 1); // hydroxyl
    }

    #[test]
    fn implicit_h_with_charge() {
        let n = element_by_symbol("N").unwrap();
        // [NH4+]: sin enlaces explícitos, valencia 3 + 1 de carga
        assert_eq!(implicit_hydrogens(n, 0.0, 1), 4);
        let o = element_by_symbol("O").unwrap();
        // [O-] con un enlace: valencia 2 - 1 → 0 H
        assert_eq!(implicit_hydrogens(o, 1.0, -1), 0);
    }

    #[test]
    fn sulfur_multiple_valences() {
        let s = element_by_symbol("S").unwrap();
        assert_eq!(implicit_hydrogens(s, 1.0, 0), 1); // thiol
        assert_eq!(implicit_hydrogens(s, 4.0, 0), 0); // sulfoxide-like, valence 4
        assert_eq!(implicit_hydrogens(s, 6.0, 0), 0);
    }
}
