pub mod extraction;
pub mod measurements;
pub mod risk;
pub mod processor;
pub mod diagnostic; // Extraction and report dumps (FOOTSCAN_DUMP_DIR override)
