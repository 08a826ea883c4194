//! Lector de SMILES → grafo molecular.
//!
//! Cubre el subconjunto que aparece en screening 2D: átomos del subconjunto
//! orgánico y entre corchetes (isótopo, carga, H explícitos), enlaces
//! simple/doble/triple/aromático, ramas, cierres de anillo (incluido `%NN`),
//! aromáticos en minúscula y fragmentos separados por `.`. Las marcas de
//! estereoquímica (`/`, `\`, `@`) se aceptan y se ignoran: sólo importa la
//! conectividad. Los hidrógenos implícitos se asignan al final por valencia,
//! contando los enlaces aromáticos como 1.5.

use std::collections::HashMap;

use crate::element::{self, aromatic_symbol, element_by_symbol, implicit_hydrogens};
use crate::errors::DomainError;
use crate::molecule::{Bond, BondOrder, MolAtom, Molecule};

/// Parsea un SMILES a `Molecule`, o rechaza la línea completa.
pub fn parse_smiles(input: &str) -> Result<Molecule, DomainError> {
    let smiles = input.trim();
    if smiles.is_empty() {
        return Err(DomainError::ParseError("empty SMILES".to_string()));
    }

    let mut atoms: Vec<MolAtom> = Vec::new();
    // H explícitos por átomo: Some(n) sólo para átomos entre corchetes.
    let mut explicit_h: Vec<Option<u8>> = Vec::new();
    let mut bonds: Vec<Bond> = Vec::new();

    let mut current: Option<usize> = None;
    let mut pending_bond: Option<BondOrder> = None;
    // La pila de ramas guarda el átomo al que se vuelve con ')'.
    let mut branch_stack: Vec<Option<usize>> = Vec::new();
    // ring number -> (átomo que abrió, orden explícito al abrir si lo hubo)
    let mut ring_map: HashMap<u32, (usize, Option<BondOrder>)> = HashMap::new();

    let chars: Vec<char> = smiles.chars().collect();
    let mut i = 0usize;

    while i < chars.len() {
        let ch = chars[i];
        match ch {
            '-' => {
                pending_bond = Some(BondOrder::Single);
                i += 1;
            }
            '=' => {
                pending_bond = Some(BondOrder::Double);
                i += 1;
            }
            '#' => {
                pending_bond = Some(BondOrder::Triple);
                i += 1;
            }
            ':' => {
                pending_bond = Some(BondOrder::Aromatic);
                i += 1;
            }
            // Estéreo de doble enlace: conectividad simple.
            '/' | '\\' => {
                pending_bond = Some(BondOrder::Single);
                i += 1;
            }
            '(' => {
                if current.is_none() {
                    return Err(DomainError::ParseError(format!("branch before any atom: {smiles}")));
                }
                branch_stack.push(current);
                i += 1;
            }
            ')' => {
                current = branch_stack
                    .pop()
                    .ok_or_else(|| DomainError::ParseError(format!("unmatched ')': {smiles}")))?;
                pending_bond = None;
                i += 1;
            }
            '.' => {
                current = None;
                pending_bond = None;
                i += 1;
            }
            '%' => {
                // Cierre de anillo de dos dígitos.
                if i + 2 >= chars.len() {
                    return Err(DomainError::ParseError(format!("malformed %NN ring closure: {smiles}")));
                }
                let (Some(d1), Some(d2)) = (chars[i + 1].to_digit(10), chars[i + 2].to_digit(10))
                else {
                    return Err(DomainError::ParseError(format!("malformed %NN ring closure: {smiles}")));
                };
                let n = d1 * 10 + d2;
                close_or_open_ring(n, smiles, &mut ring_map, current, &mut pending_bond, &atoms, &mut bonds)?;
                i += 3;
            }
            d if d.is_ascii_digit() => {
                let n = d as u32 - '0' as u32;
                close_or_open_ring(n, smiles, &mut ring_map, current, &mut pending_bond, &atoms, &mut bonds)?;
                i += 1;
            }
            '[' => {
                let close = chars[i + 1..]
                    .iter()
                    .position(|&c| c == ']')
                    .ok_or_else(|| DomainError::ParseError(format!("unclosed bracket: {smiles}")))?;
                let content: String = chars[i + 1..i + 1 + close].iter().collect();
                let (atom, h) = parse_bracket_atom(&content, smiles)?;
                let idx = push_atom(atom, Some(h), &mut atoms, &mut explicit_h, &mut bonds, current, &mut pending_bond, smiles)?;
                current = Some(idx);
                i += close + 2;
            }
            c if c.is_ascii_uppercase() => {
                // Símbolo de una o dos letras del subconjunto orgánico.
                let mut sym = c.to_string();
                if i + 1 < chars.len() && chars[i + 1].is_ascii_lowercase() {
                    let two: String = [c, chars[i + 1]].iter().collect();
                    if element_by_symbol(&two).is_some() {
                        sym = two;
                    }
                }
                let info = element_by_symbol(&sym)
                    .ok_or_else(|| DomainError::UnknownElement(sym.clone()))?;
                if !element::is_organic_subset(&sym) {
                    return Err(DomainError::ParseError(format!(
                        "element {sym} requires brackets: {smiles}"
                    )));
                }
                let atom = MolAtom {
                    atomic_number: info.atomic_number,
                    formal_charge: 0,
                    isotope: None,
                    is_aromatic: false,
                    implicit_hydrogens: 0,
                };
                let idx = push_atom(atom, None, &mut atoms, &mut explicit_h, &mut bonds, current, &mut pending_bond, smiles)?;
                current = Some(idx);
                i += sym.len();
            }
            c if c.is_ascii_lowercase() => {
                let sym = aromatic_symbol(c).ok_or_else(|| {
                    DomainError::ParseError(format!("unexpected character '{c}' in SMILES: {smiles}"))
                })?;
                let info = element_by_symbol(sym)
                    .ok_or_else(|| DomainError::UnknownElement(sym.to_string()))?;
                let atom = MolAtom {
                    atomic_number: info.atomic_number,
                    formal_charge: 0,
                    isotope: None,
                    is_aromatic: true,
                    implicit_hydrogens: 0,
                };
                let idx = push_atom(atom, None, &mut atoms, &mut explicit_h, &mut bonds, current, &mut pending_bond, smiles)?;
                current = Some(idx);
                i += 1;
            }
            other => {
                return Err(DomainError::ParseError(format!(
                    "unexpected character '{other}' in SMILES: {smiles}"
                )));
            }
        }
    }

    if !branch_stack.is_empty() {
        return Err(DomainError::ParseError(format!("unmatched '(': {smiles}")));
    }
    if !ring_map.is_empty() {
        return Err(DomainError::ParseError(format!("unclosed ring bond: {smiles}")));
    }
    if atoms.is_empty() {
        return Err(DomainError::ParseError(format!("no atoms in SMILES: {smiles}")));
    }

    let mut mol = Molecule::new(smiles, atoms, bonds);
    assign_implicit_hydrogens(&mut mol, &explicit_h)?;
    Ok(mol)
}

/// Parser por lotes (el Structure Parser del pipeline): líneas en blanco se
/// descartan antes, las que no parsean desaparecen en silencio. Devuelve dos
/// secuencias paralelas 1:1 que conservan el orden de entrada.
pub fn parse_batch(text: &str) -> (Vec<String>, Vec<Molecule>) {
    let mut surviving = Vec::new();
    let mut molecules = Vec::new();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if let Ok(mol) = parse_smiles(line) {
            surviving.push(line.to_string());
            molecules.push(mol);
        }
    }
    (surviving, molecules)
}

#[allow(clippy::too_many_arguments)]
fn push_atom(
    atom: MolAtom,
    h: Option<u8>,
    atoms: &mut Vec<MolAtom>,
    explicit_h: &mut Vec<Option<u8>>,
    bonds: &mut Vec<Bond>,
    current: Option<usize>,
    pending_bond: &mut Option<BondOrder>,
    smiles: &str,
) -> Result<usize, DomainError> {
    let idx = atoms.len();
    if let Some(prev) = current {
        let order = match pending_bond.take() {
            Some(o) => o,
            // Dos aromáticos consecutivos comparten enlace aromático implícito.
            None if atoms[prev].is_aromatic && atom.is_aromatic => BondOrder::Aromatic,
            None => BondOrder::Single,
        };
        bonds.push(Bond {
            atom1: prev,
            atom2: idx,
            order,
            is_aromatic: order == BondOrder::Aromatic,
        });
    } else if pending_bond.take().is_some() {
        return Err(DomainError::ParseError(format!("dangling bond symbol: {smiles}")));
    }
    atoms.push(atom);
    explicit_h.push(h);
    Ok(idx)
}

fn close_or_open_ring(
    n: u32,
    smiles: &str,
    ring_map: &mut HashMap<u32, (usize, Option<BondOrder>)>,
    current: Option<usize>,
    pending_bond: &mut Option<BondOrder>,
    atoms: &[MolAtom],
    bonds: &mut Vec<Bond>,
) -> Result<(), DomainError> {
    let here = current
        .ok_or_else(|| DomainError::ParseError(format!("ring digit before any atom: {smiles}")))?;
    match ring_map.remove(&n) {
        Some((opener, open_order)) => {
            if opener == here {
                return Err(DomainError::ParseError(format!("ring bond to itself: {smiles}")));
            }
            let order = match pending_bond.take().or(open_order) {
                Some(o) => o,
                None if atoms[opener].is_aromatic && atoms[here].is_aromatic => BondOrder::Aromatic,
                None => BondOrder::Single,
            };
            bonds.push(Bond {
                atom1: opener,
                atom2: here,
                order,
                is_aromatic: order == BondOrder::Aromatic,
            });
        }
        None => {
            ring_map.insert(n, (here, pending_bond.take()));
        }
    }
    Ok(())
}

/// Átomo entre corchetes: `[isotopo? simbolo @* Hn? carga?]`.
fn parse_bracket_atom(content: &str, smiles: &str) -> Result<(MolAtom, u8), DomainError> {
    let chars: Vec<char> = content.chars().collect();
    let mut i = 0usize;

    let mut isotope: Option<u16> = None;
    let iso_digits: String = chars.iter().take_while(|c| c.is_ascii_digit()).collect();
    if !iso_digits.is_empty() {
        isotope = Some(iso_digits.parse().map_err(|_| {
            DomainError::ParseError(format!("bad isotope in bracket atom: {smiles}"))
        })?);
        i += iso_digits.len();
    }

    if i >= chars.len() {
        return Err(DomainError::ParseError(format!("empty bracket atom: {smiles}")));
    }

    // Símbolo: mayúscula (+ minúscula opcional) o aromático en minúscula.
    let (symbol, is_aromatic) = if chars[i].is_ascii_uppercase() {
        let mut sym = chars[i].to_string();
        if i + 1 < chars.len() && chars[i + 1].is_ascii_lowercase() {
            let two: String = [chars[i], chars[i + 1]].iter().collect();
            // Sólo se extiende a dos letras si el símbolo existe en la tabla.
            if element_by_symbol(&two).is_some() {
                sym = two;
            }
        }
        (sym, false)
    } else if let Some(sym) = aromatic_symbol(chars[i]) {
        (sym.to_string(), true)
    } else {
        return Err(DomainError::ParseError(format!("bad bracket atom [{content}]: {smiles}")));
    };
    i += symbol.len();

    let info = element_by_symbol(&symbol)
        .ok_or_else(|| DomainError::UnknownElement(symbol.clone()))?;

    // Quiralidad: se ignora.
    while i < chars.len() && chars[i] == '@' {
        i += 1;
    }

    // H explícitos.
    let mut h_count: u8 = 0;
    if i < chars.len() && chars[i] == 'H' {
        i += 1;
        let digits: String = chars[i..].iter().take_while(|c| c.is_ascii_digit()).collect();
        if digits.is_empty() {
            h_count = 1;
        } else {
            h_count = digits.parse().map_err(|_| {
                DomainError::ParseError(format!("bad H count in bracket atom: {smiles}"))
            })?;
            i += digits.len();
        }
    }

    // Carga formal: `+`, `-`, `++`, `+2`, ...
    let mut charge: i8 = 0;
    if i < chars.len() && (chars[i] == '+' || chars[i] == '-') {
        let sign: i8 = if chars[i] == '+' { 1 } else { -1 };
        let symbol_char = chars[i];
        i += 1;
        let digits: String = chars[i..].iter().take_while(|c| c.is_ascii_digit()).collect();
        if !digits.is_empty() {
            let n: i8 = digits.parse().map_err(|_| {
                DomainError::ParseError(format!("bad charge in bracket atom: {smiles}"))
            })?;
            charge = sign * n;
            i += digits.len();
        } else {
            // Acumular en i32: una tirada absurda de signos no debe
            // desbordar la carga, debe rechazar la línea.
            let mut magnitude: i32 = 1;
            while i < chars.len() && chars[i] == symbol_char {
                magnitude += 1;
                i += 1;
            }
            charge = i8::try_from(sign as i32 * magnitude).map_err(|_| {
                DomainError::ParseError(format!("bad charge in bracket atom: {smiles}"))
            })?;
        }
    }

    if i != chars.len() {
        return Err(DomainError::ParseError(format!("bad bracket atom [{content}]: {smiles}")));
    }

    Ok((
        MolAtom {
            atomic_number: info.atomic_number,
            formal_charge: charge,
            isotope,
            is_aromatic,
            implicit_hydrogens: 0,
        },
        h_count,
    ))
}

/// Asigna H implícitos: los átomos de corchete llevan su cuenta explícita,
/// el resto se completa por valencia.
fn assign_implicit_hydrogens(mol: &mut Molecule, explicit_h: &[Option<u8>]) -> Result<(), DomainError> {
    for idx in 0..mol.atoms.len() {
        let h = match explicit_h[idx] {
            Some(n) => n,
            None => {
                let atom = &mol.atoms[idx];
                let info = crate::element::element_by_number(atom.atomic_number)
                    .ok_or_else(|| DomainError::UnknownElement(atom.atomic_number.to_string()))?;
                implicit_hydrogens(info, mol.bond_order_sum(idx), atom.formal_charge)
            }
        };
        mol.atoms[idx].implicit_hydrogens = h;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ethanol_parses() {
        let mol = parse_smiles("CCO").unwrap();
        assert_eq!(mol.atom_count(), 3);
        assert_eq!(mol.bond_count(), 2);
        // CH3-CH2-OH
        assert_eq!(mol.atoms[0].implicit_hydrogens, 3);
        assert_eq!(mol.atoms[1].implicit_hydrogens, 2);
        assert_eq!(mol.atoms[2].implicit_hydrogens, 1);
        assert_eq!(mol.total_hydrogen_count(), 6);
    }

    #[test]
    fn benzene_aromatic_ring() {
        let mol = parse_smiles("c1ccccc1").unwrap();
        assert_eq!(mol.atom_count(), 6);
        assert_eq!(mol.bond_count(), 6);
        assert!(mol.atoms.iter().all(|a| a.is_aromatic));
        assert!(mol.bonds.iter().all(|b| b.order == BondOrder::Aromatic));
        // Cada carbono aromático con 2 enlaces de anillo lleva 1 H.
        assert!(mol.atoms.iter().all(|a| a.implicit_hydrogens == 1));
    }

    #[test]
    fn phenol_substitution() {
        let mol = parse_smiles("c1ccccc1O").unwrap();
        assert_eq!(mol.atom_count(), 7);
        assert_eq!(mol.bond_count(), 7);
        // El carbono sustituido pierde su H; el oxígeno lleva uno.
        let o = mol.atoms.iter().position(|a| a.atomic_number == 8).unwrap();
        assert_eq!(mol.atoms[o].implicit_hydrogens, 1);
        assert_eq!(mol.total_hydrogen_count(), 6);
    }

    #[test]
    fn branches_and_double_bonds() {
        // Ácido acético
        let mol = parse_smiles("CC(=O)O").unwrap();
        assert_eq!(mol.atom_count(), 4);
        assert_eq!(mol.bond_count(), 3);
        let dbl = mol.bonds.iter().filter(|b| b.order == BondOrder::Double).count();
        assert_eq!(dbl, 1);
        assert_eq!(mol.total_hydrogen_count(), 4);
    }

    #[test]
    fn bracket_atoms_and_charges() {
        let mol = parse_smiles("[NH4+]").unwrap();
        assert_eq!(mol.atoms[0].formal_charge, 1);
        assert_eq!(mol.atoms[0].implicit_hydrogens, 4);

        let mol = parse_smiles("[13CH4]").unwrap();
        assert_eq!(mol.atoms[0].isotope, Some(13));
        assert_eq!(mol.atoms[0].implicit_hydrogens, 4);

        let mol = parse_smiles("C[O-]").unwrap();
        assert_eq!(mol.atoms[1].formal_charge, -1);
        assert_eq!(mol.atoms[1].implicit_hydrogens, 0);
    }

    #[test]
    fn two_letter_elements() {
        let mol = parse_smiles("ClCCl").unwrap();
        assert_eq!(mol.atom_count(), 3);
        assert_eq!(mol.atoms[0].atomic_number, 17);
        assert_eq!(mol.atoms[1].atomic_number, 6);
    }

    #[test]
    fn dot_separated_fragments() {
        let mol = parse_smiles("C.C").unwrap();
        assert_eq!(mol.atom_count(), 2);
        assert_eq!(mol.bond_count(), 0);
    }

    #[test]
    fn pyridine_nitrogen_has_no_h() {
        let mol = parse_smiles("c1ccncc1").unwrap();
        let n = mol.atoms.iter().position(|a| a.atomic_number == 7).unwrap();
        assert_eq!(mol.atoms[n].implicit_hydrogens, 0);
    }

    #[test]
    fn pyrrole_nh_is_explicit() {
        let mol = parse_smiles("c1cc[nH]c1").unwrap();
        let n = mol.atoms.iter().position(|a| a.atomic_number == 7).unwrap();
        assert_eq!(mol.atoms[n].implicit_hydrogens, 1);
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_smiles("notasmiles").is_err());
        assert!(parse_smiles("").is_err());
        assert!(parse_smiles("C(").is_err());
        assert!(parse_smiles("C1CC").is_err());
        assert!(parse_smiles("C)").is_err());
        assert!(parse_smiles("[]").is_err());
        assert!(parse_smiles("=C").is_err());
    }

    #[test]
    fn repeated_sign_charges_accumulate() {
        let mol = parse_smiles("[O--]").unwrap();
        assert_eq!(mol.atoms[0].formal_charge, -2);
        let mol = parse_smiles("[N++]").unwrap();
        assert_eq!(mol.atoms[0].formal_charge, 2);
    }

    #[test]
    fn absurd_charge_runs_are_rejected_not_crashed() {
        let pathological = format!("[N{}]", "+".repeat(200));
        assert!(parse_smiles(&pathological).is_err());
        // En lote la línea desaparece en silencio, como cualquier otra
        // línea no parseable.
        let (smiles, mols) = parse_batch(&format!("CCO\n{pathological}\n"));
        assert_eq!(smiles, vec!["CCO".to_string()]);
        assert_eq!(mols.len(), 1);
    }

    #[test]
    fn stereo_marks_are_ignored() {
        let mol = parse_smiles("C/C=C/C").unwrap();
        assert_eq!(mol.atom_count(), 4);
        let mol = parse_smiles("N[C@@H](C)C(=O)O").unwrap(); // alanine
        assert_eq!(mol.atom_count(), 6);
    }

    #[test]
    fn percent_ring_closure() {
        let a = parse_smiles("C%12CCCCC%12").unwrap();
        let b = parse_smiles("C1CCCCC1").unwrap();
        assert_eq!(a.content_hash(), b.content_hash());
    }

    #[test]
    fn batch_drops_invalid_lines_silently() {
        let (smiles, mols) = parse_batch("CCO\nnotasmiles\nc1ccccc1O\n\n   \n");
        assert_eq!(smiles, vec!["CCO".to_string(), "c1ccccc1O".to_string()]);
        assert_eq!(mols.len(), 2);
        assert_eq!(mols[0].atom_count(), 3);
        assert_eq!(mols[1].atom_count(), 7);
    }

    #[test]
    fn batch_of_nothing_is_empty() {
        let (smiles, mols) = parse_batch("\n  \n\t\n");
        assert!(smiles.is_empty());
        assert!(mols.is_empty());
    }
}
