use super::error::RecordError;
use crate::core::io::cif::CifDocument;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Replaces every literal occurrence of `code` in a definition text with `placeholder`.
///
/// The substitution is purely textual: the block name, `comp_id` columns and any other
/// occurrence are rewritten alike, and nothing else in the text changes.
pub fn rewrite_code(text: &str, code: &str, placeholder: &str) -> String {
    text.replace(code, placeholder)
}

/// Rewrites the definition at `source` and writes the result to `dest`.
pub fn rewrite_definition_file(
    source: &Path,
    code: &str,
    placeholder: &str,
    dest: &Path,
) -> Result<(), RecordError> {
    let text = fs::read_to_string(source)?;
    let occurrences = text.matches(code).count();
    fs::write(dest, rewrite_code(&text, code, placeholder))?;
    debug!(
        "Rewrote {} occurrence(s) of {} as {} into {}",
        occurrences,
        code,
        placeholder,
        dest.display()
    );
    Ok(())
}

/// Merges per-ligand definitions into one document.
///
/// Each `(placeholder, path)` source must hold exactly one data block. Blocks are written in
/// placeholder order, so the merged file does not depend on the order of `sources`.
///
/// # Errors
///
/// Returns [`RecordError::Validation`] for fewer than two sources and
/// [`RecordError::DefinitionParse`] when a source is not a single-block CIF document.
pub fn merge_definitions(sources: &[(String, PathBuf)], dest: &Path) -> Result<(), RecordError> {
    if sources.len() < 2 {
        return Err(RecordError::Validation(format!(
            "merging needs at least two definitions, got {}",
            sources.len()
        )));
    }

    let mut ordered: Vec<&(String, PathBuf)> = sources.iter().collect();
    ordered.sort_by(|a, b| a.0.cmp(&b.0));

    let mut merged = CifDocument::new();
    for (placeholder, path) in ordered {
        let document = CifDocument::read_from_path(path)?;
        let [block] = <[_; 1]>::try_from(document.blocks).map_err(|blocks: Vec<_>| {
            RecordError::DefinitionParse(format!(
                "{} holds {} data blocks, expected one",
                path.display(),
                blocks.len()
            ))
        })?;
        if block.name != *placeholder {
            warn!(
                "Definition block '{}' in {} does not match placeholder {}",
                block.name,
                path.display(),
                placeholder
            );
        }
        merged.blocks.push(block);
    }

    merged.write_to_path(dest)?;
    info!(
        "Merged {} ligand definitions into {}",
        merged.blocks.len(),
        dest.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn definition(code: &str, atom: &str) -> String {
        format!(
            "data_{code}\n_chem_comp.id {code}\nloop_\n_chem_comp_atom.comp_id\n\
             _chem_comp_atom.atom_id\n_chem_comp_atom.type_symbol\n{code} {atom} C\n"
        )
    }

    #[test]
    fn rewrite_code_replaces_every_occurrence_in_place() {
        let text = definition("LZA", "C1");
        let rewritten = rewrite_code(&text, "LZA", "LIG");
        assert_eq!(rewritten, definition("LIG", "C1"));

        let before: Vec<usize> = text.match_indices("LZA").map(|(i, _)| i).collect();
        let after: Vec<usize> = rewritten.match_indices("LIG").map(|(i, _)| i).collect();
        assert_eq!(before, after);
        assert_eq!(rewritten.len(), text.len());
    }

    #[test]
    fn rewrite_code_leaves_text_without_the_code_untouched() {
        let text = "data_ABC\n_chem_comp.id ABC\n";
        assert_eq!(rewrite_code(text, "LZA", "LIG"), text);
    }

    #[test]
    fn rewrite_definition_file_writes_destination() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("1abc_LZA_rcsb.cif");
        let dest = dir.path().join("1abc.cif");
        fs::write(&source, definition("LZA", "C1")).unwrap();

        rewrite_definition_file(&source, "LZA", "LIG", &dest).unwrap();
        assert_eq!(fs::read_to_string(&dest).unwrap(), definition("LIG", "C1"));
    }

    #[test]
    fn merge_orders_blocks_by_placeholder() {
        let dir = tempfile::tempdir().unwrap();
        let lg1 = dir.path().join("1abc_LG1.cif");
        let lg2 = dir.path().join("1abc_LG2.cif");
        fs::write(&lg1, definition("LG1", "C1")).unwrap();
        fs::write(&lg2, definition("LG2", "N1")).unwrap();
        let dest_a = dir.path().join("a.cif");
        let dest_b = dir.path().join("b.cif");

        merge_definitions(&[("LG2".into(), lg2.clone()), ("LG1".into(), lg1.clone())], &dest_a)
            .unwrap();
        merge_definitions(&[("LG1".into(), lg1), ("LG2".into(), lg2)], &dest_b).unwrap();

        let merged = CifDocument::read_from_path(&dest_a).unwrap();
        let names: Vec<_> = merged.blocks.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, vec!["LG1", "LG2"]);
        assert_eq!(
            fs::read_to_string(&dest_a).unwrap(),
            fs::read_to_string(&dest_b).unwrap()
        );
    }

    #[test]
    fn merge_keeps_mismatched_block_names() {
        let dir = tempfile::tempdir().unwrap();
        let lg1 = dir.path().join("x1.cif");
        let lg2 = dir.path().join("x2.cif");
        fs::write(&lg1, definition("AAA", "C1")).unwrap();
        fs::write(&lg2, definition("LG2", "C1")).unwrap();
        let dest = dir.path().join("merged.cif");

        merge_definitions(&[("LG1".into(), lg1), ("LG2".into(), lg2)], &dest).unwrap();
        let merged = CifDocument::read_from_path(&dest).unwrap();
        assert_eq!(merged.blocks[0].name, "AAA");
    }

    #[test]
    fn merge_rejects_too_few_or_multi_block_sources() {
        let dir = tempfile::tempdir().unwrap();
        let single = dir.path().join("one.cif");
        fs::write(&single, definition("LG1", "C1")).unwrap();
        let dest = dir.path().join("merged.cif");
        assert!(matches!(
            merge_definitions(&[("LG1".into(), single.clone())], &dest),
            Err(RecordError::Validation(_))
        ));

        let double = dir.path().join("two.cif");
        fs::write(&double, definition("LG2", "C1") + &definition("LG3", "C1")).unwrap();
        assert!(matches!(
            merge_definitions(&[("LG1".into(), single), ("LG2".into(), double)], &dest),
            Err(RecordError::DefinitionParse(_))
        ));
        assert!(!dest.exists());
    }
}
