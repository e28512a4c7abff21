/// Errors that might occur when using the library.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The API answered a comment fetch with a non-success status that the
    /// retry policy could not recover from. Kept distinct from an empty page
    /// so the caller never mistakes a broken server for a drained queue.
    #[error("comment fetch failed (HTTP {status}): {body}")]
    Fetch {
        /// Status code of the failed response.
        status: reqwest::StatusCode,
        /// Error body returned by the API.
        body: String,
    },

    /// An HTTP client error (including transport failures).
    #[error("request error: {0}")]
    Request(#[from] reqwest::Error),
}
