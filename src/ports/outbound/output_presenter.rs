use crate::shared::Result;

/// OutputPresenter port for delivering the serialized BOM
///
/// Abstracts the destination (stdout, a file...).
pub trait OutputPresenter {
    /// Presents the serialized BOM
    ///
    /// # Errors
    /// Returns an error if writing to the destination fails
    fn present(&self, content: &str) -> Result<()>;
}
