use crate::adapters::outbound::formatters::{CycloneDxJsonFormatter, CycloneDxXmlFormatter};
use crate::application::dto::OutputFormat;
use crate::ports::outbound::SbomFormatter;

/// Factory for creating BOM serializers
///
/// Selects the serialization adapter for the requested output format.
pub struct FormatterFactory;

impl FormatterFactory {
    /// Creates a formatter instance for the specified output format
    ///
    /// # Examples
    /// ```
    /// use sbom_assembler::application::dto::OutputFormat;
    /// use sbom_assembler::application::factories::FormatterFactory;
    ///
    /// let formatter = FormatterFactory::create(OutputFormat::Xml);
    /// ```
    pub fn create(format: OutputFormat) -> Box<dyn SbomFormatter> {
        match format {
            OutputFormat::Json => Box::new(CycloneDxJsonFormatter::new()),
            OutputFormat::Xml => Box::new(CycloneDxXmlFormatter::new()),
        }
    }

    /// Returns the progress message for the specified output format
    ///
    /// # Examples
    /// ```
    /// use sbom_assembler::application::dto::OutputFormat;
    /// use sbom_assembler::application::factories::FormatterFactory;
    ///
    /// let message = FormatterFactory::progress_message(OutputFormat::Json);
    /// assert_eq!(message, "📝 Generating CycloneDX JSON output...");
    /// ```
    pub fn progress_message(format: OutputFormat) -> &'static str {
        match format {
            OutputFormat::Json => "📝 Generating CycloneDX JSON output...",
            OutputFormat::Xml => "📝 Generating CycloneDX XML output...",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sbom_generation::domain::{Bom, SbomMetadata, SpecVersion, ToolIdentity};

    fn empty_bom() -> Bom {
        let metadata = SbomMetadata::new(
            "2024-01-01T00:00:00Z".to_string(),
            "urn:uuid:factory".to_string(),
            ToolIdentity::default(),
            Vec::new(),
        );
        Bom::new(SpecVersion::V1_6, metadata, vec![], vec![], vec![])
    }

    #[test]
    fn test_create_json_formatter() {
        let output = FormatterFactory::create(OutputFormat::Json)
            .format(&empty_bom())
            .unwrap();
        assert!(output.trim_start().starts_with('{'));
    }

    #[test]
    fn test_create_xml_formatter() {
        let output = FormatterFactory::create(OutputFormat::Xml)
            .format(&empty_bom())
            .unwrap();
        assert!(output.starts_with("<?xml"));
    }

    #[test]
    fn test_progress_message_xml() {
        let message = FormatterFactory::progress_message(OutputFormat::Xml);
        assert_eq!(message, "📝 Generating CycloneDX XML output...");
    }
}
