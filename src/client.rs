use crate::sweep::MAX_WORKERS;
use crate::{Comment, CommentId, DeleteOutcome, Error, RetryPolicy};
use reqwest::{RequestBuilder, StatusCode};
use std::fmt::{self, Debug};

/// Path prefix of the WP REST API, relative to the site root.
const API_PREFIX: &str = "wp-json/wp/v2/";

macro_rules! request_impl {
    ($($f:ident),* $(,)*) => {
        $(
            #[inline]
            pub(crate) fn $f(&self, path: &str) -> RequestBuilder {
                tracing::debug!(path, concat!("Client::", stringify!($f)));
                self.client
                    .$f(format!("{}{}{}", self.base_url, API_PREFIX, path))
                    .basic_auth(&self.username, Some(&self.password))
            }
        )*
    };
}

/// HTTP client for one WordPress site, authenticated with HTTP Basic
/// credentials (an administrator account or application password).
///
/// Cloning is cheap and all clones share one connection pool, so a `Client`
/// can be handed to any number of concurrent workers.
#[derive(Clone)]
pub struct Client {
    base_url: String,
    username: String,
    password: String,
    retry: RetryPolicy,
    client: reqwest::Client,
}

impl Client {
    /// Creates a new `Client` for the site at `site_url`. Pass the site
    /// root, not the API root; `wp-json/wp/v2/` is appended per request.
    ///
    /// Securely storing the password is an exercise left to the caller.
    #[must_use]
    #[allow(clippy::missing_panics_doc)] // tested to not panic
    pub fn new(
        site_url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Client {
        const USER_AGENT: &str = concat!(
            "modbroom/",
            env!("CARGO_PKG_VERSION"),
            " (https://github.com/modbroom/modbroom)",
        );

        let mut base_url = site_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }

        Client {
            base_url,
            username: username.into(),
            password: password.into(),
            retry: RetryPolicy::default(),
            client: reqwest::Client::builder()
                .user_agent(USER_AGENT)
                .pool_max_idle_per_host(MAX_WORKERS)
                .build()
                .unwrap(),
        }
    }

    /// Replaces the default [`RetryPolicy`].
    #[must_use]
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Client {
        self.retry = retry;
        self
    }

    pub(crate) fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Fetches one page of pending comments.
    ///
    /// Pages start at 1. An empty page means nothing is held at or past that
    /// index right now; it does not prove the queue is drained, because
    /// deletions shift the remaining comments toward the front of the
    /// collection. Comments come back in API order, unaltered.
    ///
    /// A non-success status that survives the retry policy is an error, never
    /// an empty page.
    #[tracing::instrument(skip(self))]
    pub async fn fetch_page(&self, page: u64, per_page: u32) -> Result<Vec<Comment>, Error> {
        let response = self
            .send_with_retry(|| {
                self.get("comments").query(&[
                    ("page", page.to_string()),
                    ("per_page", per_page.to_string()),
                    // "hold" = awaiting moderation; the edit context is
                    // required to see unpublished comments at all
                    ("status", "hold".to_string()),
                    ("context", "edit".to_string()),
                ])
            })
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Fetch { status, body });
        }
        Ok(response.json().await?)
    }

    /// Deletes a single comment.
    ///
    /// Without `force` the comment is moved to the trash and stays
    /// recoverable; with it, the comment is erased permanently.
    ///
    /// Never fails hard: every response maps to a [`DeleteOutcome`], and an
    /// already-deleted comment (HTTP 410) counts as success.
    #[tracing::instrument(skip(self))]
    pub async fn delete_comment(&self, id: CommentId, force: bool) -> DeleteOutcome {
        let result = self
            .send_with_retry(|| {
                self.delete(&format!("comments/{id}"))
                    .query(&[("force", force)])
            })
            .await;

        match result {
            Ok(response) => match response.status() {
                StatusCode::OK => DeleteOutcome::Deleted,
                StatusCode::GONE => DeleteOutcome::AlreadyGone,
                status => {
                    let body = response.text().await.unwrap_or_default();
                    DeleteOutcome::Failed(format!("HTTP {status}: {body}"))
                }
            },
            Err(e) => DeleteOutcome::Failed(e.to_string()),
        }
    }

    /// Sends a request, retrying transient failures within the policy bounds.
    ///
    /// `build` is called once per attempt since a `RequestBuilder` is
    /// consumed by `send`.
    async fn send_with_retry<F>(&self, build: F) -> Result<reqwest::Response, Error>
    where
        F: Fn() -> RequestBuilder,
    {
        let mut attempt = 0;
        loop {
            let result = build().send().await;
            let transient = match &result {
                Ok(response) => RetryPolicy::is_transient(response.status()),
                Err(e) => e.is_timeout() || e.is_connect(),
            };
            if transient && attempt < self.retry.max_attempts {
                let delay = self.retry.delay_for(attempt);
                attempt += 1;
                match &result {
                    Ok(response) => tracing::warn!(
                        status = %response.status(),
                        attempt,
                        max_attempts = self.retry.max_attempts,
                        delay_ms = delay.as_millis(),
                        "transient response, retrying"
                    ),
                    Err(e) => tracing::warn!(
                        error = %e,
                        attempt,
                        max_attempts = self.retry.max_attempts,
                        delay_ms = delay.as_millis(),
                        "transport failure, retrying"
                    ),
                }
                tokio::time::sleep(delay).await;
                continue;
            }
            return Ok(result?);
        }
    }

    request_impl!(delete, get);
}

// Hand-written so the password never reaches logs.
impl Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}
