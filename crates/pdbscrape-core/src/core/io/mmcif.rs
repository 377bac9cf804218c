use super::cif::{CifDocument, CifError, CifTable, is_null_value};
use crate::core::io::traits::StructureReader;
use crate::core::models::atom::Atom;
use crate::core::models::residue::Residue;
use crate::core::models::structure::StructuralModel;
use crate::core::utils::identifiers::is_water_residue;
use nalgebra::Point3;
use std::io::{self, BufRead};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum MmcifError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("CIF error: {0}")]
    Cif(#[from] CifError),
    #[error("Missing category: {0}")]
    MissingCategory(&'static str),
    #[error("Missing field '{0}' in _atom_site")]
    MissingField(&'static str),
    #[error("Invalid value '{value}' for {field} in _atom_site row {row}")]
    InvalidValue {
        row: usize,
        field: &'static str,
        value: String,
    },
}

/// Reader for the macromolecular CIF coordinate format.
///
/// The first data block's `_atom_site` category is read into a model using the author
/// numbering (falling back to the label numbering). Only the first model is kept; alternate
/// conformers within it are all read. Non-polymer entity names are turned into synthetic `HETNAM`
/// header lines so the model carries the same ligand inventory a PDB file would.
pub struct MmcifFile;

impl StructureReader for MmcifFile {
    type Error = MmcifError;

    fn read_from(reader: &mut impl BufRead) -> Result<StructuralModel, Self::Error> {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;
        let document = CifDocument::parse(&text)?;
        let block = document.blocks.first().ok_or(CifError::NoDataBlock)?;

        let mut model = StructuralModel::new();
        if let Some(entities) = block.category("_pdbx_entity_nonpoly") {
            for row in &entities.rows {
                let (Some(code), Some(name)) =
                    (entities.value(row, "comp_id"), entities.value(row, "name"))
                else {
                    continue;
                };
                if is_water_residue(code) {
                    continue;
                }
                model.push_header_line(format!(
                    "HETNAM     {:>3} {}",
                    code.to_ascii_uppercase(),
                    name.to_ascii_uppercase()
                ));
            }
        }

        let sites = block
            .category("_atom_site")
            .ok_or(MmcifError::MissingCategory("_atom_site"))?;
        let columns = AtomSiteColumns::locate(&sites)?;

        let mut current: Option<((char, isize, Option<char>, String), _)> = None;
        let mut first_model: Option<String> = None;

        for (index, row) in sites.rows.iter().enumerate() {
            let field = |column: Option<usize>| {
                column
                    .and_then(|c| row.get(c))
                    .map(String::as_str)
                    .filter(|v| !is_null_value(v))
            };

            if let Some(model_num) = field(columns.model) {
                match &first_model {
                    None => first_model = Some(model_num.to_string()),
                    Some(first) if first != model_num => continue,
                    Some(_) => {}
                }
            }

            let alt_loc = field(columns.alt_id).and_then(|v| v.chars().next());

            let invalid = |field: &'static str, value: &str| MmcifError::InvalidValue {
                row: index,
                field,
                value: value.to_string(),
            };

            let name = field(columns.atom_name).ok_or(MmcifError::MissingField("atom_id"))?;
            let res_name = field(columns.comp_id).ok_or(MmcifError::MissingField("comp_id"))?;
            let chain_id = field(columns.chain).and_then(|v| v.chars().next()).unwrap_or(' ');
            let seq = field(columns.auth_seq)
                .or_else(|| field(columns.label_seq))
                .ok_or(MmcifError::MissingField("seq_id"))?;
            let number: isize = seq.parse().map_err(|_| invalid("seq_id", seq))?;
            let insertion_code = field(columns.ins_code).and_then(|v| v.chars().next());
            let serial = match field(columns.serial) {
                Some(v) => v.parse().map_err(|_| invalid("id", v))?,
                None => index + 1,
            };

            let mut coords = [0.0; 3];
            for (slot, (column, label)) in coords.iter_mut().zip([
                (columns.x, "Cartn_x"),
                (columns.y, "Cartn_y"),
                (columns.z, "Cartn_z"),
            ]) {
                let raw = field(Some(column)).ok_or(MmcifError::MissingField(label))?;
                *slot = raw.parse().map_err(|_| invalid(label, raw))?;
            }

            let key = (chain_id, number, insertion_code, res_name.to_string());
            let residue_id = match &current {
                Some((current_key, id)) if *current_key == key => *id,
                _ => {
                    let is_hetero = field(columns.group).is_some_and(|g| g == "HETATM");
                    let mut residue = Residue::new(res_name, number, chain_id, is_hetero);
                    residue.insertion_code = insertion_code;
                    let id = model.add_residue(residue);
                    current = Some((key, id));
                    id
                }
            };

            let mut atom = Atom::new(
                serial,
                name,
                residue_id,
                Point3::new(coords[0], coords[1], coords[2]),
            )
            .with_element(field(columns.element).unwrap_or(""));
            atom.alt_loc = alt_loc;
            atom.occupancy = field(columns.occupancy)
                .and_then(|v| v.parse().ok())
                .unwrap_or(1.0);
            atom.b_factor = field(columns.b_factor)
                .and_then(|v| v.parse().ok())
                .unwrap_or(0.0);
            atom.charge = field(columns.charge).map(pdb_charge).unwrap_or_default();
            model.add_atom(residue_id, atom);
        }

        if model.atom_count() == 0 {
            return Err(MmcifError::MissingCategory("_atom_site rows"));
        }
        debug!(
            "Read {} atoms in {} residues from mmCIF block '{}'",
            model.atom_count(),
            model.residue_count(),
            block.name
        );
        Ok(model)
    }
}

struct AtomSiteColumns {
    group: Option<usize>,
    serial: Option<usize>,
    element: Option<usize>,
    atom_name: Option<usize>,
    alt_id: Option<usize>,
    comp_id: Option<usize>,
    chain: Option<usize>,
    auth_seq: Option<usize>,
    label_seq: Option<usize>,
    ins_code: Option<usize>,
    x: usize,
    y: usize,
    z: usize,
    occupancy: Option<usize>,
    b_factor: Option<usize>,
    charge: Option<usize>,
    model: Option<usize>,
}

impl AtomSiteColumns {
    fn locate(table: &CifTable) -> Result<Self, MmcifError> {
        let either = |a: &str, b: &str| table.column(a).or_else(|| table.column(b));
        Ok(Self {
            group: table.column("group_PDB"),
            serial: table.column("id"),
            element: table.column("type_symbol"),
            atom_name: either("auth_atom_id", "label_atom_id"),
            alt_id: table.column("label_alt_id"),
            comp_id: either("auth_comp_id", "label_comp_id"),
            chain: either("auth_asym_id", "label_asym_id"),
            auth_seq: table.column("auth_seq_id"),
            label_seq: table.column("label_seq_id"),
            ins_code: table.column("pdbx_PDB_ins_code"),
            x: table.column("Cartn_x").ok_or(MmcifError::MissingField("Cartn_x"))?,
            y: table.column("Cartn_y").ok_or(MmcifError::MissingField("Cartn_y"))?,
            z: table.column("Cartn_z").ok_or(MmcifError::MissingField("Cartn_z"))?,
            occupancy: table.column("occupancy"),
            b_factor: table.column("B_iso_or_equiv"),
            charge: table.column("pdbx_formal_charge"),
            model: table.column("pdbx_PDB_model_num"),
        })
    }
}

/// Converts a signed integer charge ("-1", "2") to the PDB column form ("1-", "2+").
fn pdb_charge(value: &str) -> String {
    match value.parse::<i32>() {
        Ok(0) | Err(_) => String::new(),
        Ok(charge) if charge < 0 => format!("{}-", -charge),
        Ok(charge) => format!("{}+", charge),
    }
}
