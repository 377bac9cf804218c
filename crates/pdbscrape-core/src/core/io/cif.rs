//! A small CIF 1.1 document model.
//!
//! Documents are parsed into data blocks holding key/value pairs and loops, in file order.
//! The model is deliberately value-agnostic: every value is kept as text (including the
//! `?` and `.` placeholders) so that blocks can be filtered, merged and written back without
//! reinterpreting anything.

use std::fmt::Write as _;
use std::io;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CifError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Syntax error on line {line}: {message}")]
    Syntax { line: usize, message: String },
    #[error("Loop on line {line} has {values} values for {tags} tags")]
    LoopMismatch {
        line: usize,
        tags: usize,
        values: usize,
    },
    #[error("Document contains no data block")]
    NoDataBlock,
}

/// A category rendered as a table, regardless of whether it was written as a loop or as
/// single-row key/value pairs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CifTable {
    /// Field names without the category prefix (e.g. `atom_id` for `_chem_comp_atom.atom_id`).
    pub fields: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl CifTable {
    pub fn column(&self, field: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.eq_ignore_ascii_case(field))
    }

    /// Returns the value of `field` in `row`, if both exist.
    pub fn value<'a>(&'a self, row: &'a [String], field: &str) -> Option<&'a str> {
        self.column(field)
            .and_then(|index| row.get(index))
            .map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CifLoop {
    pub tags: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CifItem {
    Pair { tag: String, value: String },
    Loop(CifLoop),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CifBlock {
    pub name: String,
    pub items: Vec<CifItem>,
}

impl CifBlock {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            items: Vec::new(),
        }
    }

    /// Returns the value of a key/value pair, if present.
    pub fn find_value(&self, tag: &str) -> Option<&str> {
        self.items.iter().find_map(|item| match item {
            CifItem::Pair { tag: t, value } if t.eq_ignore_ascii_case(tag) => Some(value.as_str()),
            _ => None,
        })
    }

    /// Collects a category (e.g. `_chem_comp_atom`) into a table.
    ///
    /// A looped category yields all its rows; a category written as pairs yields one row.
    pub fn category(&self, category: &str) -> Option<CifTable> {
        let prefix = category_prefix(category);

        for item in &self.items {
            if let CifItem::Loop(lp) = item {
                if lp.tags.first().is_some_and(|t| starts_with_ignore_case(t, &prefix)) {
                    return Some(CifTable {
                        fields: lp.tags.iter().map(|t| t[prefix.len()..].to_string()).collect(),
                        rows: lp.rows.clone(),
                    });
                }
            }
        }

        let mut fields = Vec::new();
        let mut row = Vec::new();
        for item in &self.items {
            if let CifItem::Pair { tag, value } = item {
                if starts_with_ignore_case(tag, &prefix) {
                    fields.push(tag[prefix.len()..].to_string());
                    row.push(value.clone());
                }
            }
        }
        if fields.is_empty() {
            None
        } else {
            Some(CifTable {
                fields,
                rows: vec![row],
            })
        }
    }

    /// Keeps only the rows of `category` for which `keep` returns true.
    ///
    /// The predicate receives the category as a table and the candidate row. A loop left
    /// without rows, or a pair-form category whose only row is rejected, is removed from the
    /// block entirely.
    ///
    /// # Return
    ///
    /// The number of rows removed.
    pub fn retain_category_rows(
        &mut self,
        category: &str,
        mut keep: impl FnMut(&CifTable, &[String]) -> bool,
    ) -> usize {
        let Some(table) = self.category(category) else {
            return 0;
        };
        let prefix = category_prefix(category);
        let mut removed = 0;

        let looped = self.items.iter().any(|item| {
            matches!(item, CifItem::Loop(lp) if lp.tags.first().is_some_and(|t| starts_with_ignore_case(t, &prefix)))
        });

        if looped {
            for item in &mut self.items {
                if let CifItem::Loop(lp) = item {
                    if lp.tags.first().is_some_and(|t| starts_with_ignore_case(t, &prefix)) {
                        let before = lp.rows.len();
                        lp.rows.retain(|row| keep(&table, row.as_slice()));
                        removed = before - lp.rows.len();
                        break;
                    }
                }
            }
            self.items
                .retain(|item| !matches!(item, CifItem::Loop(lp) if lp.rows.is_empty()));
        } else if !keep(&table, table.rows[0].as_slice()) {
            self.items.retain(|item| {
                !matches!(item, CifItem::Pair { tag, .. } if starts_with_ignore_case(tag, &prefix))
            });
            removed = 1;
        }

        removed
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CifDocument {
    pub blocks: Vec<CifBlock>,
}

impl CifDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a CIF document from text.
    ///
    /// # Errors
    ///
    /// Returns a syntax error for malformed quoting or structure, a loop mismatch when a
    /// loop's value count is not a multiple of its tag count, and `NoDataBlock` when the text
    /// contains no `data_` header.
    pub fn parse(text: &str) -> Result<Self, CifError> {
        let tokens = tokenize(text)?;
        let mut document = CifDocument::new();
        let mut index = 0;

        while index < tokens.len() {
            let (line, token) = &tokens[index];
            index += 1;
            match token {
                Token::DataBlock(name) => document.blocks.push(CifBlock::new(name.clone())),
                Token::Loop => {
                    let block = current_block(&mut document, *line)?;
                    let mut tags = Vec::new();
                    while let Some((_, Token::Tag(tag))) = tokens.get(index) {
                        tags.push(tag.clone());
                        index += 1;
                    }
                    if tags.is_empty() {
                        return Err(CifError::Syntax {
                            line: *line,
                            message: "loop_ without tags".into(),
                        });
                    }
                    let mut values = Vec::new();
                    while let Some((_, Token::Value(value))) = tokens.get(index) {
                        values.push(value.clone());
                        index += 1;
                    }
                    if values.len() % tags.len() != 0 {
                        return Err(CifError::LoopMismatch {
                            line: *line,
                            tags: tags.len(),
                            values: values.len(),
                        });
                    }
                    let rows = values.chunks(tags.len()).map(<[String]>::to_vec).collect();
                    block.items.push(CifItem::Loop(CifLoop { tags, rows }));
                }
                Token::Tag(tag) => {
                    let block = current_block(&mut document, *line)?;
                    match tokens.get(index) {
                        Some((_, Token::Value(value))) => {
                            block.items.push(CifItem::Pair {
                                tag: tag.clone(),
                                value: value.clone(),
                            });
                            index += 1;
                        }
                        _ => {
                            return Err(CifError::Syntax {
                                line: *line,
                                message: format!("tag '{}' has no value", tag),
                            });
                        }
                    }
                }
                Token::Value(value) => {
                    return Err(CifError::Syntax {
                        line: *line,
                        message: format!("unexpected value '{}'", value),
                    });
                }
            }
        }

        if document.blocks.is_empty() {
            return Err(CifError::NoDataBlock);
        }
        Ok(document)
    }

    /// Reads and parses a CIF document from a file.
    pub fn read_from_path<P: AsRef<Path>>(path: P) -> Result<Self, CifError> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }

    /// Serializes the document to CIF text.
    pub fn to_cif_string(&self) -> String {
        let mut out = String::new();
        for block in &self.blocks {
            let _ = writeln!(out, "data_{}", block.name);
            out.push_str("#\n");
            let pair_width = block
                .items
                .iter()
                .filter_map(|item| match item {
                    CifItem::Pair { tag, .. } => Some(tag.len()),
                    CifItem::Loop(_) => None,
                })
                .max()
                .unwrap_or(0);

            let mut previous_was_pair = false;
            for item in &block.items {
                match item {
                    CifItem::Pair { tag, value } => {
                        let formatted = format_value(value);
                        if formatted.starts_with('\n') {
                            let _ = writeln!(out, "{}{}", tag, formatted);
                        } else {
                            let _ = writeln!(out, "{:<width$} {}", tag, formatted, width = pair_width);
                        }
                        previous_was_pair = true;
                    }
                    CifItem::Loop(lp) => {
                        if previous_was_pair {
                            out.push_str("#\n");
                        }
                        out.push_str("loop_\n");
                        for tag in &lp.tags {
                            let _ = writeln!(out, "{}", tag);
                        }
                        for row in &lp.rows {
                            write_loop_row(&mut out, row);
                        }
                        out.push_str("#\n");
                        previous_was_pair = false;
                    }
                }
            }
            if previous_was_pair {
                out.push_str("#\n");
            }
        }
        out
    }

    /// Writes the serialized document to a file.
    pub fn write_to_path<P: AsRef<Path>>(&self, path: P) -> Result<(), CifError> {
        std::fs::write(path, self.to_cif_string())?;
        Ok(())
    }
}

/// Returns true for the CIF placeholders `?` (unknown) and `.` (not applicable).
pub fn is_null_value(value: &str) -> bool {
    matches!(value, "?" | ".")
}

fn current_block(document: &mut CifDocument, line: usize) -> Result<&mut CifBlock, CifError> {
    document.blocks.last_mut().ok_or(CifError::Syntax {
        line,
        message: "content before the first data block".into(),
    })
}

fn category_prefix(category: &str) -> String {
    let trimmed = category.trim_end_matches('.');
    format!("{}.", trimmed)
}

fn starts_with_ignore_case(text: &str, prefix: &str) -> bool {
    text.len() >= prefix.len()
        && text.is_char_boundary(prefix.len())
        && text[..prefix.len()].eq_ignore_ascii_case(prefix)
}

fn write_loop_row(out: &mut String, row: &[String]) {
    let mut line = String::new();
    for value in row {
        let formatted = format_value(value);
        if formatted.starts_with('\n') {
            if !line.is_empty() {
                out.push_str(line.trim_end());
                line.clear();
            }
            out.push_str(&formatted);
            out.push('\n');
        } else {
            line.push_str(&formatted);
            line.push(' ');
        }
    }
    if !line.is_empty() {
        out.push_str(line.trim_end());
        out.push('\n');
    }
}

/// Quotes a value as needed. Multi-line values (and values containing both quote
/// characters) become semicolon text fields, returned with a leading newline.
fn format_value(value: &str) -> String {
    if value.contains('\n') || (value.contains('\'') && value.contains('"')) {
        return format!("\n;{}\n;", value);
    }
    let needs_quotes = value.is_empty()
        || value.chars().any(char::is_whitespace)
        || value.starts_with(['_', '#', '$', '\'', '"', '[', ']', ';'])
        || is_reserved_word(value);
    if !needs_quotes {
        value.to_string()
    } else if value.contains('\'') {
        format!("\"{}\"", value)
    } else {
        format!("'{}'", value)
    }
}

fn is_reserved_word(value: &str) -> bool {
    let lower = value.to_ascii_lowercase();
    lower.starts_with("data_")
        || lower.starts_with("save_")
        || lower == "loop_"
        || lower == "global_"
        || lower == "stop_"
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    DataBlock(String),
    Loop,
    Tag(String),
    Value(String),
}

fn tokenize(text: &str) -> Result<Vec<(usize, Token)>, CifError> {
    let mut tokens = Vec::new();
    let mut lines = text.lines().enumerate();

    while let Some((index, line)) = lines.next() {
        let line_num = index + 1;

        if let Some(first) = line.strip_prefix(';') {
            let mut field = first.to_string();
            let mut closed = false;
            for (_, next) in lines.by_ref() {
                if next.starts_with(';') {
                    closed = true;
                    break;
                }
                field.push('\n');
                field.push_str(next);
            }
            if !closed {
                return Err(CifError::Syntax {
                    line: line_num,
                    message: "unterminated text field".into(),
                });
            }
            let field = field.strip_prefix('\n').unwrap_or(&field).to_string();
            tokens.push((line_num, Token::Value(field)));
            continue;
        }

        tokenize_line(line, line_num, &mut tokens)?;
    }

    Ok(tokens)
}

fn tokenize_line(line: &str, line_num: usize, tokens: &mut Vec<(usize, Token)>) -> Result<(), CifError> {
    let chars: Vec<char> = line.chars().collect();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if c.is_whitespace() {
            i += 1;
            continue;
        }
        if c == '#' {
            break;
        }
        if c == '\'' || c == '"' {
            // A quote only closes when followed by whitespace or end of line.
            let mut j = i + 1;
            loop {
                if j >= chars.len() {
                    return Err(CifError::Syntax {
                        line: line_num,
                        message: "unterminated quoted string".into(),
                    });
                }
                if chars[j] == c && chars.get(j + 1).is_none_or(|n| n.is_whitespace()) {
                    break;
                }
                j += 1;
            }
            let value: String = chars[i + 1..j].iter().collect();
            tokens.push((line_num, Token::Value(value)));
            i = j + 1;
            continue;
        }

        let start = i;
        while i < chars.len() && !chars[i].is_whitespace() {
            i += 1;
        }
        let word: String = chars[start..i].iter().collect();
        let lower = word.to_ascii_lowercase();
        let token = if lower.starts_with("data_") {
            Token::DataBlock(word[5..].to_string())
        } else if lower == "loop_" {
            Token::Loop
        } else if word.starts_with('_') {
            Token::Tag(word)
        } else if lower == "global_" || lower.starts_with("save_") || lower == "stop_" {
            return Err(CifError::Syntax {
                line: line_num,
                message: format!("unsupported construct '{}'", word),
            });
        } else {
            Token::Value(word)
        };
        tokens.push((line_num, token));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEFINITION: &str = "\
data_LZA
#
_chem_comp.id                                    LZA
_chem_comp.name                                  \"2-chloro-ethanolamine\"
_chem_comp.pdbx_synonyms                         ?
_chem_comp.type                                  NON-POLYMER
#
loop_
_chem_comp_atom.comp_id
_chem_comp_atom.atom_id
_chem_comp_atom.type_symbol
LZA C1  C
LZA C2  C
LZA CL1 CL
LZA H1  H
#
loop_
_chem_comp_bond.comp_id
_chem_comp_bond.atom_id_1
_chem_comp_bond.atom_id_2
_chem_comp_bond.value_order
LZA C1 C2  SING
LZA C1 CL1 SING
LZA C2 H1  SING
#
_pdbx_chem_comp_descriptor.comp_id      LZA
_pdbx_chem_comp_descriptor.descriptor
;NCCCl
;
";

    #[test]
    fn parse_reads_pairs_loops_and_text_fields() {
        let doc = CifDocument::parse(DEFINITION).unwrap();
        assert_eq!(doc.blocks.len(), 1);
        let block = &doc.blocks[0];
        assert_eq!(block.name, "LZA");
        assert_eq!(block.find_value("_chem_comp.id"), Some("LZA"));
        assert_eq!(block.find_value("_chem_comp.name"), Some("2-chloro-ethanolamine"));
        assert_eq!(block.find_value("_chem_comp.pdbx_synonyms"), Some("?"));
        assert_eq!(
            block.find_value("_pdbx_chem_comp_descriptor.descriptor"),
            Some("NCCCl")
        );

        let atoms = block.category("_chem_comp_atom").unwrap();
        assert_eq!(atoms.fields, vec!["comp_id", "atom_id", "type_symbol"]);
        assert_eq!(atoms.rows.len(), 4);
        assert_eq!(atoms.value(&atoms.rows[2], "atom_id"), Some("CL1"));
    }

    #[test]
    fn category_in_pair_form_is_a_single_row_table() {
        let doc = CifDocument::parse(DEFINITION).unwrap();
        let table = doc.blocks[0].category("_chem_comp").unwrap();
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.value(&table.rows[0], "type"), Some("NON-POLYMER"));
        assert!(doc.blocks[0].category("_chem_comp_angle").is_none());
    }

    #[test]
    fn quotes_close_only_before_whitespace() {
        let doc = CifDocument::parse("data_X\n_a.b 'O1'B'\n_a.c \"it's\"\n").unwrap();
        assert_eq!(doc.blocks[0].find_value("_a.b"), Some("O1'B"));
        assert_eq!(doc.blocks[0].find_value("_a.c"), Some("it's"));
    }

    #[test]
    fn comments_are_ignored() {
        let doc = CifDocument::parse("# leading\ndata_X # trailing\n_a.b 1 # note\n").unwrap();
        assert_eq!(doc.blocks[0].find_value("_a.b"), Some("1"));
    }

    #[test]
    fn parse_rejects_loop_value_count_mismatch() {
        let text = "data_X\nloop_\n_a.b\n_a.c\n1 2 3\n";
        assert!(matches!(
            CifDocument::parse(text),
            Err(CifError::LoopMismatch {
                tags: 2,
                values: 3,
                ..
            })
        ));
    }

    #[test]
    fn parse_rejects_text_without_data_block() {
        assert!(matches!(CifDocument::parse("# nothing\n"), Err(CifError::NoDataBlock)));
        assert!(matches!(
            CifDocument::parse("_a.b 1\n"),
            Err(CifError::Syntax { line: 1, .. })
        ));
    }

    #[test]
    fn parse_rejects_unterminated_constructs() {
        assert!(matches!(
            CifDocument::parse("data_X\n_a.b 'open\n"),
            Err(CifError::Syntax { .. })
        ));
        assert!(matches!(
            CifDocument::parse("data_X\n_a.b\n;never closed\n"),
            Err(CifError::Syntax { .. })
        ));
        assert!(matches!(
            CifDocument::parse("data_X\n_a.b\n"),
            Err(CifError::Syntax { .. })
        ));
    }

    #[test]
    fn retain_category_rows_filters_loops() {
        let mut doc = CifDocument::parse(DEFINITION).unwrap();
        let block = &mut doc.blocks[0];
        let removed = block.retain_category_rows("_chem_comp_atom", |table, row| {
            table.value(row, "type_symbol") != Some("CL")
        });
        assert_eq!(removed, 1);
        assert_eq!(block.category("_chem_comp_atom").unwrap().rows.len(), 3);
    }

    #[test]
    fn retain_category_rows_drops_emptied_categories() {
        let mut doc = CifDocument::parse(DEFINITION).unwrap();
        let block = &mut doc.blocks[0];
        assert_eq!(block.retain_category_rows("_chem_comp_bond", |_, _| false), 3);
        assert!(block.category("_chem_comp_bond").is_none());
        assert_eq!(block.retain_category_rows("_chem_comp", |_, _| false), 1);
        assert!(block.find_value("_chem_comp.id").is_none());
        assert_eq!(block.retain_category_rows("_missing", |_, _| false), 0);
    }

    #[test]
    fn serialized_document_parses_back_to_the_same_model() {
        let doc = CifDocument::parse(DEFINITION).unwrap();
        let text = doc.to_cif_string();
        assert!(text.starts_with("data_LZA\n"));
        let reparsed = CifDocument::parse(&text).unwrap();
        assert_eq!(reparsed, doc);
    }

    #[test]
    fn format_value_quotes_only_when_needed() {
        assert_eq!(format_value("C1"), "C1");
        assert_eq!(format_value("two words"), "'two words'");
        assert_eq!(format_value("O1'"), "O1'");
        assert_eq!(format_value("it's here"), "\"it's here\"");
        assert_eq!(format_value("_tag"), "'_tag'");
        assert_eq!(format_value(""), "''");
        assert_eq!(format_value("line1\nline2"), "\n;line1\nline2\n;");
    }
}
