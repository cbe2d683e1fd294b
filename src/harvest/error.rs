use thiserror::Error;

/// Configuration failures surfaced by a harvest patch.
///
/// Stale collect requests and missing collaborators are not errors here: they
/// are logged and skipped by the node itself.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HarvestError {
    #[error("patch has no plant template to spawn from")]
    MissingTemplate,
}
