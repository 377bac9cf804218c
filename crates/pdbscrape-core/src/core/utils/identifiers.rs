use phf::{Set, phf_set};
use std::collections::BTreeSet;

/// Residues removed from every structure before renaming (crystallization buffer components).
pub const DEFAULT_REMOVE_RESIDUES: &str = "EDO MPD DMS PEG ETG PO4";

/// Codes never considered as the ligand of interest: the removal list plus common
/// crystallization additives, cryoprotectants and ions.
pub const DEFAULT_IGNORE_CODES: &str = "EDO MPD DMS PEG ETG PO4 SO4 GOL ACT FMT PGE 1PE P6G PG4 \
    TRS EPE MES IMD NO3 SCN CL NA MG ZN CA K IOD BR NI MN CD CU CO";

static WATER_RESIDUE_NAMES: Set<&'static str> = phf_set! {
    "HOH", "DOD", "WAT", "H2O", "TIP", "TIP3", "SOL",
};

static STANDARD_POLYMER_RESIDUE_NAMES: Set<&'static str> = phf_set! {
    // Amino acids
    "ALA", "ARG", "ASN", "ASP", "CYS", "GLN", "GLU", "GLY", "HIS", "ILE",
    "LEU", "LYS", "MET", "PHE", "PRO", "SER", "THR", "TRP", "TYR", "VAL",
    // Common modified / non-canonical amino acids written as HETATM
    "MSE", "SEC", "PYL", "HYP", "SEP", "TPO", "PTR", "CSO", "KCX", "MLY", "LLP",
    // Nucleotides
    "A", "C", "G", "U", "I", "DA", "DC", "DG", "DT", "DI",
    // Caps
    "ACE", "NH2", "NME",
};

pub fn is_water_residue(name: &str) -> bool {
    WATER_RESIDUE_NAMES.contains(name.trim())
}

pub fn is_standard_polymer_residue(name: &str) -> bool {
    STANDARD_POLYMER_RESIDUE_NAMES.contains(name.trim())
}

/// Parses a space-delimited list of residue codes into an upper-cased, de-duplicated set.
pub fn parse_code_list(list: &str) -> BTreeSet<String> {
    list.split_whitespace()
        .map(|code| code.to_ascii_uppercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn water_names_are_recognized_after_trimming() {
        assert!(is_water_residue("HOH"));
        assert!(is_water_residue(" DOD "));
        assert!(!is_water_residue("hoh"));
        assert!(!is_water_residue("EDO"));
    }

    #[test]
    fn standard_polymer_names_cover_amino_acids_and_nucleotides() {
        assert!(is_standard_polymer_residue("GLY"));
        assert!(is_standard_polymer_residue("MSE"));
        assert!(is_standard_polymer_residue("DA"));
        assert!(!is_standard_polymer_residue("LZA"));
        assert!(!is_standard_polymer_residue(""));
    }

    #[test]
    fn parse_code_list_uppercases_and_deduplicates() {
        let codes = parse_code_list("edo  PEG\tedo\n po4");
        let expected: BTreeSet<String> =
            ["EDO", "PEG", "PO4"].iter().map(|s| s.to_string()).collect();
        assert_eq!(codes, expected);
    }

    #[test]
    fn parse_code_list_of_blank_string_is_empty() {
        assert!(parse_code_list("   ").is_empty());
    }

    #[test]
    fn default_ignore_codes_include_the_removal_list() {
        let ignore = parse_code_list(DEFAULT_IGNORE_CODES);
        let remove = parse_code_list(DEFAULT_REMOVE_RESIDUES);
        assert!(remove.is_subset(&ignore));
    }
}
