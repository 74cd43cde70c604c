//! Remote repository boundary for update queries.
//!
//! The update tracker only ever asks one question of the outside world:
//! what is the latest published tag for a repository. [`ModRepositoryClient`]
//! is that seam; [`GithubReleaseClient`] is the production implementation
//! backed by the GitHub releases API. Tests drive the tracker with in-memory
//! clients instead.

mod error;
mod github;

pub use error::RemoteError;
pub use github::GithubReleaseClient;

use std::future::Future;

/// Client answering "latest published tag" queries for a repository.
///
/// Implementations are responsible for bounding their own network time;
/// callers apply no timeout of their own.
pub trait ModRepositoryClient: Send + Sync {
    /// Fetch the latest release tag for `repository` ("owner/name").
    ///
    /// Returns `Ok(None)` when the repository exists but has no published
    /// release; network and protocol failures surface as [`RemoteError`].
    fn latest_tag(
        &self,
        repository: &str,
    ) -> impl Future<Output = Result<Option<String>, RemoteError>> + Send;
}
