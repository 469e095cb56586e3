//! Crosswalk from resolved controls to the NIST AI RMF hierarchy.

pub mod coverage;
pub mod export;
pub mod mapper;
pub mod taxonomy;

pub use coverage::{CategoryCoverage, CoverageReport, FunctionCoverage, SubcategoryBadge, Tally};
pub use export::write_mapping_csv;
pub use mapper::{map_to_taxonomy, MappingEntry};
pub use taxonomy::{
    normalize_ref, Category, FunctionNode, Location, NistFunction, NistHierarchy, Subcategory,
};
