/// Outbound ports (Driven ports) - Infrastructure interfaces
///
/// These ports define the interfaces that the application core uses
/// to reach scan inputs, serializers, output destinations and the console.
pub mod formatter;
pub mod output_presenter;
pub mod progress_reporter;
pub mod scan_source;

pub use formatter::SbomFormatter;
pub use output_presenter::OutputPresenter;
pub use progress_reporter::ProgressReporter;
pub use scan_source::{ScanResult, ScanSource};
