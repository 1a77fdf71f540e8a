//! Selector configuration sourced from the analysis provider
//!
//! A separate analysis pass inspects the target site's DOM and records its
//! findings in a JSON artifact. This module loads the newest artifact and
//! folds it into a [`SelectorConfig`], the immutable selector snapshot the
//! crawler runs with. Absence of the artifact, or of any individual field,
//! is never fatal: built-in defaults cover every slot.

mod artifact;
mod selectors;

pub use artifact::{load_latest_artifact, AnalysisArtifact};
pub use selectors::SelectorConfig;
