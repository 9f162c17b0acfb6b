//! Discovery of a [`CachedRepository`] inside a chain of decorators.

use std::any::Any;

use readcache_core::entity::Entity;
use readcache_core::storage::ReadRepository;

use super::CachedRepository;

/// Maximum number of `parent()` hops followed by [`locate`].
pub const MAX_CHAIN_DEPTH: usize = 32;

/// Finds the cached repository in a decorator chain.
///
/// Starts at `repo` and follows [`ReadRepository::parent`] until a
/// [`CachedRepository<E>`] is found, the chain ends, or
/// [`MAX_CHAIN_DEPTH`] repositories have been inspected. The depth limit
/// makes an accidental cycle in the chain end the walk instead of looping.
pub fn locate<E: Entity>(repo: &dyn ReadRepository<E>) -> Option<&CachedRepository<E>> {
    let mut current = Some(repo);

    for _ in 0..MAX_CHAIN_DEPTH {
        let repo = current?;

        let any: &dyn Any = repo;
        if let Some(cached) = any.downcast_ref::<CachedRepository<E>>() {
            return Some(cached);
        }

        current = repo.parent();
    }

    tracing::warn!(
        max_depth = MAX_CHAIN_DEPTH,
        "Repository chain is deeper than the limit, possible cycle"
    );
    None
}
