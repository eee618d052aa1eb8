pub mod console;
pub mod scan;
pub mod target;

pub use console::Console;
pub use scan::{Discovery, DiscoveryKind, ScanEvent, ScanSummary, Scanner, execute_scan};
pub use target::{ArchiveEndpoints, ScanRequest, TargetSpec, ValidationError};
