use std::path::Path;

use super::source::StateSource;
use super::state::StateDocument;

/// Resolves state for a directory tree.
///
/// A directory whose pull succeeds is a state root and is not descended
/// into. A directory whose pull fails is searched one level down, and so on
/// recursively. Symlink cycles are not detected.
#[derive(Debug)]
pub struct Aggregator<S> {
    source: S,
}

impl<S: StateSource> Aggregator<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn resolve(&self, location: &Path) -> StateDocument {
        let bytes = match self.source.pull(location) {
            Ok(bytes) => bytes,
            Err(err) => {
                tracing::warn!(dir = %location.display(), error = %err, "state pull failed, attempting to recurse");
                return self.resolve_children(location);
            }
        };

        match StateDocument::parse(&bytes) {
            Ok(doc) => {
                tracing::info!(
                    dir = %location.display(),
                    modules = doc.modules.len(),
                    resources = doc.resource_count(),
                    "state pulled"
                );
                doc
            }
            Err(err) => {
                tracing::warn!(dir = %location.display(), error = %err, "pulled state is unreadable");
                StateDocument::default()
            }
        }
    }

    fn resolve_children(&self, location: &Path) -> StateDocument {
        let mut doc = StateDocument::default();

        let children = match self.source.subdirectories(location) {
            Ok(children) => children,
            Err(err) => {
                tracing::warn!(dir = %location.display(), error = %err, "cannot read directory");
                return doc;
            }
        };

        for child in children {
            doc.merge(self.resolve(&child));
        }

        doc
    }
}
