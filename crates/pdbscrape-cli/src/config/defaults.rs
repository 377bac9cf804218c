use pdbscrape::core::utils::identifiers::{DEFAULT_IGNORE_CODES, DEFAULT_REMOVE_RESIDUES};

pub struct DefaultsConfig {
    pub output_dir: String,
    pub remove_residues: String,
    pub ignore_codes: String,
    pub fetch_reflections: bool,
    pub timeout_secs: u64,
    pub pdb_url: String,
    pub mmcif_url: String,
    pub reflections_url: String,
    pub ligand_url: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            output_dir: "output".to_string(),
            remove_residues: DEFAULT_REMOVE_RESIDUES.to_string(),
            ignore_codes: DEFAULT_IGNORE_CODES.to_string(),
            fetch_reflections: true,
            timeout_secs: 60,
            pdb_url: "https://files.rcsb.org/download/{id}.pdb".to_string(),
            mmcif_url: "https://files.rcsb.org/download/{id}.cif".to_string(),
            reflections_url: "https://edmaps.rcsb.org/coefficients/{id}.mtz".to_string(),
            ligand_url: "https://files.rcsb.org/ligands/download/{CODE}.cif".to_string(),
        }
    }
}
