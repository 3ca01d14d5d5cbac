/// Adapters layer - Infrastructure implementations
///
/// Concrete implementations of the outbound ports: scan readers, BOM
/// serializers, output sinks and progress reporting.
pub mod outbound;
