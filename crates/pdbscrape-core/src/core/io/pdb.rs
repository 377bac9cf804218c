use crate::core::io::hybrid36;
use crate::core::io::traits::{StructureReader, StructureWriter};
use crate::core::models::atom::Atom;
use crate::core::models::ids::{AtomId, ResidueId};
use crate::core::models::residue::Residue;
use crate::core::models::structure::StructuralModel;
use crate::core::models::topology::BondOrder;
use nalgebra::Point3;
use std::collections::{BTreeMap, HashMap};
use std::io::{self, BufRead, Write};
use thiserror::Error;
use tracing::{debug, trace};

/// Records that belong to the coordinate section and are therefore never kept as headers.
const COORDINATE_RECORDS: &[&str] = &[
    "ATOM", "HETATM", "ANISOU", "SIGATM", "SIGUIJ", "TER", "MODEL", "ENDMDL", "CONECT", "MASTER",
    "END",
];

/// Minimum line length of an ATOM/HETATM record (through the z coordinate).
const MIN_ATOM_RECORD_LEN: usize = 54;

#[derive(Debug, Error)]
pub enum PdbError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse { line: usize, kind: PdbParseErrorKind },
    #[error("Inconsistent data: {0}")]
    Inconsistency(String),
    #[error("Missing required record: {0}")]
    MissingRecord(String),
    #[error("Value '{value}' does not fit the {field} columns of a PDB record")]
    FieldOverflow { field: &'static str, value: String },
}

#[derive(Debug, Error)]
pub enum PdbParseErrorKind {
    #[error("Invalid integer format in columns {columns} (value: '{value}')")]
    InvalidInt { columns: &'static str, value: String },
    #[error("Invalid float format in columns {columns} (value: '{value}')")]
    InvalidFloat { columns: &'static str, value: String },
    #[error("Required field in columns {columns} is empty")]
    MissingRequiredField { columns: &'static str },
    #[error("Line is too short for ATOM/HETATM record (must be at least {MIN_ATOM_RECORD_LEN} chars)")]
    LineTooShort,
}

fn slice_and_trim(line: &str, start: usize, end: usize) -> &str {
    let end = end.min(line.len());
    line.get(start..end).unwrap_or("").trim()
}

fn column_char(line: &str, index: usize) -> Option<char> {
    line.get(index..index + 1)
        .and_then(|s| s.chars().next())
        .filter(|c| !c.is_whitespace())
}

fn parse_float(
    line: &str,
    line_num: usize,
    start: usize,
    end: usize,
    columns: &'static str,
) -> Result<f64, PdbError> {
    let value = slice_and_trim(line, start, end);
    value.parse().map_err(|_| PdbError::Parse {
        line: line_num,
        kind: PdbParseErrorKind::InvalidFloat {
            columns,
            value: value.into(),
        },
    })
}

fn parse_hybrid36(
    line: &str,
    line_num: usize,
    start: usize,
    end: usize,
    columns: &'static str,
) -> Result<i64, PdbError> {
    let value = slice_and_trim(line, start, end);
    hybrid36::decode(value, end - start).ok_or_else(|| PdbError::Parse {
        line: line_num,
        kind: PdbParseErrorKind::InvalidInt {
            columns,
            value: value.into(),
        },
    })
}

fn parse_serial(line: &str, line_num: usize) -> Result<usize, PdbError> {
    let serial = parse_hybrid36(line, line_num, 6, 11, "7-11")?;
    usize::try_from(serial).map_err(|_| PdbError::Parse {
        line: line_num,
        kind: PdbParseErrorKind::InvalidInt {
            columns: "7-11",
            value: serial.to_string(),
        },
    })
}

fn parse_optional_float(line: &str, start: usize, end: usize, default: f64) -> f64 {
    slice_and_trim(line, start, end).parse().unwrap_or(default)
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ResidueKey {
    chain_id: char,
    number: isize,
    insertion_code: Option<char>,
    name: String,
}

/// Reader/writer for the fixed-column Protein Data Bank format.
///
/// Reading keeps every non-coordinate record (REMARK, HETNAM, CRYST1, ...) as a raw header
/// line on the model. Only the first MODEL of an ensemble is read; within it every atom is
/// kept, alternate conformers and `ANISOU` tensors included, so that writing the model back
/// reproduces its coordinate section. Serial and residue numbers beyond the decimal range of
/// their columns are read and written in hybrid-36.
pub struct PdbFile;

impl StructureReader for PdbFile {
    type Error = PdbError;

    fn read_from(reader: &mut impl BufRead) -> Result<StructuralModel, Self::Error> {
        let mut model = StructuralModel::new();
        let mut serial_map: HashMap<usize, AtomId> = HashMap::new();
        let mut temp_conect: Vec<(i64, i64)> = Vec::new();

        let mut current: Option<(ResidueKey, ResidueId)> = None;
        let mut first_model_done = false;

        for (line_num, line_res) in reader.lines().enumerate() {
            let line = line_res?;
            let line_num = line_num + 1;
            let record_type = slice_and_trim(&line, 0, 6);

            match record_type {
                "ATOM" | "HETATM" => {
                    if first_model_done {
                        continue;
                    }
                    if line.len() < MIN_ATOM_RECORD_LEN {
                        return Err(PdbError::Parse {
                            line: line_num,
                            kind: PdbParseErrorKind::LineTooShort,
                        });
                    }

                    let alt_loc = column_char(&line, 16);
                    let serial = parse_serial(&line, line_num)?;
                    let name = slice_and_trim(&line, 12, 16);
                    if name.is_empty() {
                        return Err(PdbError::Parse {
                            line: line_num,
                            kind: PdbParseErrorKind::MissingRequiredField { columns: "13-16" },
                        });
                    }
                    let res_name = slice_and_trim(&line, 17, 20);
                    if res_name.is_empty() {
                        return Err(PdbError::Parse {
                            line: line_num,
                            kind: PdbParseErrorKind::MissingRequiredField { columns: "18-20" },
                        });
                    }
                    let chain_id = column_char(&line, 21).unwrap_or(' ');
                    let res_seq = parse_hybrid36(&line, line_num, 22, 26, "23-26")? as isize;
                    let insertion_code = column_char(&line, 26);
                    let x = parse_float(&line, line_num, 30, 38, "31-38")?;
                    let y = parse_float(&line, line_num, 38, 46, "39-46")?;
                    let z = parse_float(&line, line_num, 46, 54, "47-54")?;

                    let key = ResidueKey {
                        chain_id,
                        number: res_seq,
                        insertion_code,
                        name: res_name.to_string(),
                    };
                    let residue_id = match &current {
                        Some((current_key, id)) if *current_key == key => *id,
                        _ => {
                            let mut residue =
                                Residue::new(res_name, res_seq, chain_id, record_type == "HETATM");
                            residue.insertion_code = insertion_code;
                            let id = model.add_residue(residue);
                            current = Some((key, id));
                            id
                        }
                    };

                    let mut atom = Atom::new(serial, name, residue_id, Point3::new(x, y, z))
                        .with_element(slice_and_trim(&line, 76, 78));
                    atom.alt_loc = alt_loc;
                    atom.occupancy = parse_optional_float(&line, 54, 60, 1.0);
                    atom.b_factor = parse_optional_float(&line, 60, 66, 0.0);
                    atom.charge = slice_and_trim(&line, 78, 80).to_string();

                    let atom_id = model.add_atom(residue_id, atom).ok_or_else(|| {
                        PdbError::Inconsistency(format!("Residue for atom {} vanished", serial))
                    })?;
                    if serial_map.insert(serial, atom_id).is_some() {
                        return Err(PdbError::Inconsistency(format!(
                            "Duplicate atom serial: {}",
                            serial
                        )));
                    }
                }
                "ANISOU" => {
                    if first_model_done {
                        continue;
                    }
                    let serial = parse_serial(&line, line_num)?;
                    let mut tensor = [0i32; 6];
                    for (slot, start) in tensor.iter_mut().zip((28..70).step_by(7)) {
                        let value = slice_and_trim(&line, start, start + 7);
                        *slot = value.parse().map_err(|_| PdbError::Parse {
                            line: line_num,
                            kind: PdbParseErrorKind::InvalidInt {
                                columns: "29-70",
                                value: value.into(),
                            },
                        })?;
                    }
                    match serial_map.get(&serial).and_then(|&id| model.atom_mut(id)) {
                        Some(atom) => atom.anisou = Some(tensor),
                        None => trace!("ANISOU on line {} has no matching atom", line_num),
                    }
                }
                "CONECT" => {
                    let Some(origin) = hybrid36::decode(slice_and_trim(&line, 6, 11), 5) else {
                        debug!("Ignoring malformed CONECT record on line {}", line_num);
                        continue;
                    };
                    for start in [11, 16, 21, 26] {
                        let partner = hybrid36::decode(slice_and_trim(&line, start, start + 5), 5);
                        if let Some(partner) = partner {
                            temp_conect.push((origin.min(partner), origin.max(partner)));
                        }
                    }
                }
                "ENDMDL" => first_model_done = true,
                "END" => break,
                _ if COORDINATE_RECORDS.contains(&record_type) => {}
                _ => {
                    if !line.trim().is_empty() {
                        model.push_header_line(line.trim_end());
                    }
                }
            }
        }

        if serial_map.is_empty() {
            return Err(PdbError::MissingRecord("ATOM/HETATM records".into()));
        }

        temp_conect.sort_unstable();
        temp_conect.dedup();
        for (a1_serial, a2_serial) in temp_conect {
            // CONECT records may reference atoms of skipped models.
            let lookup = |serial: i64| {
                usize::try_from(serial)
                    .ok()
                    .and_then(|serial| serial_map.get(&serial))
            };
            if let (Some(&a1), Some(&a2)) = (lookup(a1_serial), lookup(a2_serial))
            {
                model.add_bond(a1, a2, BondOrder::Single);
            }
        }

        Ok(model)
    }
}

impl StructureWriter for PdbFile {
    type Error = PdbError;

    fn write_to(model: &StructuralModel, writer: &mut impl Write) -> Result<(), Self::Error> {
        for line in model.header_lines() {
            writeln!(writer, "{}", line)?;
        }

        for (residue_id, residue) in model.residues() {
            for (_, atom) in model.residue_atoms(residue_id) {
                writeln!(writer, "{}", format_atom_record(atom, residue)?)?;
                if let Some(line) = format_anisou_record(atom, residue)? {
                    writeln!(writer, "{}", line)?;
                }
            }
        }

        let mut bond_map: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
        for bond in model.bonds() {
            let atom1 = model.atom(bond.atom1_id).ok_or_else(|| {
                PdbError::Inconsistency(format!("Bond atom {:?} not found", bond.atom1_id))
            })?;
            let atom2 = model.atom(bond.atom2_id).ok_or_else(|| {
                PdbError::Inconsistency(format!("Bond atom {:?} not found", bond.atom2_id))
            })?;
            bond_map.entry(atom1.serial).or_default().push(atom2.serial);
            bond_map.entry(atom2.serial).or_default().push(atom1.serial);
        }
        for (origin, partners) in &mut bond_map {
            partners.sort_unstable();
            for chunk in partners.chunks(4) {
                write!(writer, "CONECT{}", encode_serial(*origin)?)?;
                for partner in chunk {
                    write!(writer, "{}", encode_serial(*partner)?)?;
                }
                writeln!(writer)?;
            }
        }

        writeln!(writer, "END")?;
        Ok(())
    }
}

fn encode_serial(serial: usize) -> Result<String, PdbError> {
    i64::try_from(serial)
        .ok()
        .and_then(|value| hybrid36::encode(value, 5))
        .ok_or_else(|| PdbError::FieldOverflow {
            field: "serial",
            value: serial.to_string(),
        })
}

/// Columns 1-27 shared by ATOM, HETATM and ANISOU records.
fn format_atom_prefix(
    record_type: &str,
    atom: &Atom,
    residue: &Residue,
) -> Result<String, PdbError> {
    if residue.name.len() > 3 {
        return Err(PdbError::FieldOverflow {
            field: "residue name",
            value: residue.name.clone(),
        });
    }
    if atom.name.len() > 4 {
        return Err(PdbError::FieldOverflow {
            field: "atom name",
            value: atom.name.clone(),
        });
    }
    let res_seq =
        hybrid36::encode(residue.number as i64, 4).ok_or_else(|| PdbError::FieldOverflow {
            field: "residue number",
            value: residue.number.to_string(),
        })?;

    Ok(format!(
        "{:<6}{} {}{}{:>3} {}{}{}",
        record_type,
        encode_serial(atom.serial)?,
        format_atom_name(&atom.name, &atom.element),
        atom.alt_loc.unwrap_or(' '),
        residue.name,
        residue.chain_id,
        res_seq,
        residue.insertion_code.unwrap_or(' '),
    ))
}

/// Formats one ATOM/HETATM record in the standard 80-column layout.
///
/// Serial and residue numbers that outgrow their columns are hybrid-36 encoded; a name that
/// cannot fit is a [`PdbError::FieldOverflow`].
pub fn format_atom_record(atom: &Atom, residue: &Residue) -> Result<String, PdbError> {
    let record_type = if residue.is_hetero { "HETATM" } else { "ATOM" };
    Ok(format!(
        "{}   {:>8.3}{:>8.3}{:>8.3}{:>6.2}{:>6.2}          {:>2}{:<2}",
        format_atom_prefix(record_type, atom, residue)?,
        atom.position.x,
        atom.position.y,
        atom.position.z,
        atom.occupancy,
        atom.b_factor,
        atom.element.to_ascii_uppercase(),
        atom.charge,
    ))
}

fn format_anisou_record(atom: &Atom, residue: &Residue) -> Result<Option<String>, PdbError> {
    let Some(u) = atom.anisou else {
        return Ok(None);
    };
    Ok(Some(format!(
        "{} {:>7}{:>7}{:>7}{:>7}{:>7}{:>7}      {:>2}{:<2}",
        format_atom_prefix("ANISOU", atom, residue)?,
        u[0],
        u[1],
        u[2],
        u[3],
        u[4],
        u[5],
        atom.element.to_ascii_uppercase(),
        atom.charge,
    )))
}

/// Aligns an atom name in columns 13-16: four-character names and names of two-letter
/// elements start in column 13, everything else in column 14.
fn format_atom_name(name: &str, element: &str) -> String {
    if name.len() >= 4 || element.trim().len() == 2 {
        format!("{:<4.4}", name)
    } else {
        format!(" {:<3}", name)
    }
}
