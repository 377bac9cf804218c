use crate::core::models::structure::StructuralModel;
use std::error::Error;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Defines the interface for reading a coordinate file format into a structural model.
///
/// Implementors handle format-specific parsing; header metadata that the format carries
/// is preserved on the returned model.
pub trait StructureReader {
    /// The error type for parsing operations.
    type Error: Error + From<io::Error>;

    /// Reads a structural model from a buffered reader.
    ///
    /// # Errors
    ///
    /// Returns an error if parsing fails or I/O operations encounter issues.
    fn read_from(reader: &mut impl BufRead) -> Result<StructuralModel, Self::Error>;

    /// Reads a structural model from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or parsing fails.
    fn read_from_path<P: AsRef<Path>>(path: P) -> Result<StructuralModel, Self::Error> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        Self::read_from(&mut reader)
    }
}

/// Defines the interface for serializing a structural model back to disk.
pub trait StructureWriter {
    /// The error type for serialization operations.
    type Error: Error + From<io::Error>;

    /// Writes a structural model, including its header records, to a writer.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails or the model is internally inconsistent.
    fn write_to(model: &StructuralModel, writer: &mut impl Write) -> Result<(), Self::Error>;

    /// Writes a structural model to a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or writing fails.
    fn write_to_path<P: AsRef<Path>>(model: &StructuralModel, path: P) -> Result<(), Self::Error> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        Self::write_to(model, &mut writer)?;
        writer.flush()?;
        Ok(())
    }
}
