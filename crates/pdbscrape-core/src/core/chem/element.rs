use phf::{Map, phf_map};
use std::fmt;

/// Single-bond covalent radii in Angstroms (Cordero et al., 2008), keyed by canonical symbol.
static COVALENT_RADII: Map<&'static str, f64> = phf_map! {
    "H" => 0.31, "D" => 0.31,
    "Li" => 1.28, "Be" => 0.96, "B" => 0.84, "C" => 0.76, "N" => 0.71, "O" => 0.66, "F" => 0.57,
    "Na" => 1.66, "Mg" => 1.41, "Al" => 1.21, "Si" => 1.11, "P" => 1.07, "S" => 1.05, "Cl" => 1.02,
    "K" => 2.03, "Ca" => 1.76, "V" => 1.53, "Cr" => 1.39, "Mn" => 1.39, "Fe" => 1.32, "Co" => 1.26,
    "Ni" => 1.24, "Cu" => 1.32, "Zn" => 1.22, "Ga" => 1.22, "Ge" => 1.20, "As" => 1.19, "Se" => 1.20,
    "Br" => 1.20, "Rb" => 2.20, "Sr" => 1.95, "Mo" => 1.54, "Ru" => 1.46, "Rh" => 1.42, "Pd" => 1.39,
    "Ag" => 1.45, "Cd" => 1.44, "Sn" => 1.39, "Sb" => 1.39, "Te" => 1.38, "I" => 1.39, "Cs" => 2.44,
    "Ba" => 2.15, "W" => 1.62, "Re" => 1.51, "Os" => 1.44, "Ir" => 1.41, "Pt" => 1.36, "Au" => 1.36,
    "Hg" => 1.32, "Pb" => 1.46, "Bi" => 1.48, "U" => 1.96, "X" => 0.0,
};

/// Two-letter prefixes that, in a ligand atom name without an element column, denote an
/// element other than the single leading letter (e.g. `CL1` is chlorine, not carbon).
static TWO_LETTER_NAME_PREFIXES: Map<&'static str, &'static str> = phf_map! {
    "CL" => "Cl", "BR" => "Br", "FE" => "Fe", "ZN" => "Zn", "MG" => "Mg", "MN" => "Mn",
    "SE" => "Se", "SI" => "Si", "NA" => "Na", "CU" => "Cu", "NI" => "Ni", "LI" => "Li",
    "AL" => "Al", "PT" => "Pt", "RU" => "Ru", "IR" => "Ir", "AU" => "Au", "AG" => "Ag",
};

/// A chemical element, identified by its canonical symbol (`C`, `Cl`, `Fe`, ...).
///
/// The unknown/dummy atom `X` used by some ligand definitions is accepted so that it can be
/// compared like any other atom type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Element(&'static str);

impl Element {
    /// Looks an element up by symbol, ignoring case and surrounding whitespace.
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        let canonical = canonicalize_symbol(symbol)?;
        COVALENT_RADII
            .get_entry(canonical.as_str())
            .map(|(symbol, _)| Element(*symbol))
    }

    /// Infers the element from an atom name such as `C12`, `CL3` or `O1'`.
    ///
    /// Used only when a coordinate file leaves the element column blank.
    pub fn infer_from_atom_name(name: &str) -> Option<Self> {
        let letters: String = name
            .trim()
            .chars()
            .skip_while(|c| c.is_ascii_digit())
            .take_while(|c| c.is_ascii_alphabetic())
            .take(2)
            .collect::<String>()
            .to_ascii_uppercase();
        if letters.is_empty() {
            return None;
        }
        if let Some(symbol) = TWO_LETTER_NAME_PREFIXES.get(letters.as_str()) {
            return Self::from_symbol(symbol);
        }
        Self::from_symbol(&letters[..1])
    }

    pub fn symbol(&self) -> &'static str {
        self.0
    }

    pub fn covalent_radius(&self) -> f64 {
        COVALENT_RADII.get(self.0).copied().unwrap_or(0.0)
    }

    /// Hydrogen and deuterium.
    pub fn is_hydrogen(&self) -> bool {
        matches!(self.0, "H" | "D")
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

fn canonicalize_symbol(symbol: &str) -> Option<String> {
    let trimmed = symbol.trim();
    let mut chars = trimmed.chars();
    let first = chars.next()?;
    if !first.is_ascii_alphabetic() || trimmed.len() > 2 {
        return None;
    }
    let mut canonical = first.to_ascii_uppercase().to_string();
    canonical.extend(chars.map(|c| c.to_ascii_lowercase()));
    Some(canonical)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_symbol_is_case_insensitive() {
        assert_eq!(Element::from_symbol("CL").unwrap().symbol(), "Cl");
        assert_eq!(Element::from_symbol("cl").unwrap().symbol(), "Cl");
        assert_eq!(Element::from_symbol(" C ").unwrap().symbol(), "C");
        assert_eq!(Element::from_symbol("fe").unwrap().symbol(), "Fe");
    }

    #[test]
    fn from_symbol_rejects_unknown_or_malformed_symbols() {
        assert!(Element::from_symbol("").is_none());
        assert!(Element::from_symbol("Qq").is_none());
        assert!(Element::from_symbol("CAL").is_none());
        assert!(Element::from_symbol("1C").is_none());
    }

    #[test]
    fn infer_from_atom_name_prefers_known_two_letter_prefixes() {
        assert_eq!(Element::infer_from_atom_name("CL1").unwrap().symbol(), "Cl");
        assert_eq!(Element::infer_from_atom_name("BR12").unwrap().symbol(), "Br");
        assert_eq!(Element::infer_from_atom_name("C12").unwrap().symbol(), "C");
        assert_eq!(Element::infer_from_atom_name("CA").unwrap().symbol(), "C");
        assert_eq!(Element::infer_from_atom_name("O1'").unwrap().symbol(), "O");
        assert_eq!(Element::infer_from_atom_name("1HB").unwrap().symbol(), "H");
        assert!(Element::infer_from_atom_name("123").is_none());
    }

    #[test]
    fn hydrogen_and_deuterium_are_hydrogens() {
        assert!(Element::from_symbol("H").unwrap().is_hydrogen());
        assert!(Element::from_symbol("D").unwrap().is_hydrogen());
        assert!(!Element::from_symbol("Hg").unwrap().is_hydrogen());
    }

    #[test]
    fn covalent_radius_is_looked_up_by_symbol() {
        assert_eq!(Element::from_symbol("C").unwrap().covalent_radius(), 0.76);
        assert_eq!(Element::from_symbol("Cl").unwrap().covalent_radius(), 1.02);
    }

    #[test]
    fn elements_order_by_symbol() {
        let c = Element::from_symbol("C").unwrap();
        let cl = Element::from_symbol("Cl").unwrap();
        let n = Element::from_symbol("N").unwrap();
        assert!(c < cl && cl < n);
    }
}
