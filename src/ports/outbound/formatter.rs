use crate::sbom_generation::domain::Bom;
use crate::shared::Result;

/// SbomFormatter port for serializing an assembled BOM
///
/// Each implementation is an independent, pure projection of the same
/// [`Bom`]; no formatter derives its output from another's.
pub trait SbomFormatter {
    /// Serializes the BOM
    ///
    /// # Errors
    /// Returns an error if serialization fails
    fn format(&self, bom: &Bom) -> Result<String>;
}
