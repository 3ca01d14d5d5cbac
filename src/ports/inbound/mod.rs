/// Inbound ports (Driving ports) - Use case interfaces
///
/// These ports define the interfaces that external adapters (e.g., CLI)
/// use to interact with the application core.
pub mod bom_generation_port;

pub use bom_generation_port::BomGenerationPort;
