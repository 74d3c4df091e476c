// Common test utilities and fixtures

pub mod fixtures;

// Re-export commonly used items
// Note: These may appear unused in some test binaries
#[allow(unused_imports)]
pub use fixtures::{object_path, study_xml, write_dicom, TestArchive};
#[allow(unused_imports)]
pub use helpers::{create_test_services, scan_all, url_for};
