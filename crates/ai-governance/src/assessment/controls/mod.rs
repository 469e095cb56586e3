pub mod catalog;
pub mod resolver;

pub use catalog::{Control, ControlCatalog, ImplementationLevel};
pub use resolver::{
    resolve_controls, split_for_recompute, ControlResolver, ResolvedControl, ResolverConfig,
    Suggestion, DEFAULT_MAX_SUGGESTIONS, GENERIC_GUIDANCE,
};
