use std::time::Duration;

use reqwest::Client;
use reqwest::header::LOCATION;
use url::Url;

use crate::application::ports::ResolverError;

pub const MAX_REDIRECTS: usize = 10;
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(3);

/// Follows redirects by hand with HEAD probes until a 2xx answer.
///
/// `client` must have automatic redirects disabled. At most `max_redirects`
/// hops are followed, so a location that keeps redirecting is probed
/// `max_redirects + 1` times before giving up.
#[tracing::instrument(skip(client, start_url))]
pub async fn follow_redirects(
    client: &Client,
    start_url: &str,
    max_redirects: usize,
    probe_timeout: Duration,
) -> Result<String, ResolverError> {
    let mut current = start_url.to_string();
    let mut followed = 0;

    loop {
        let response = client
            .head(&current)
            .timeout(probe_timeout)
            .send()
            .await
            .map_err(|e| ResolverError::UpstreamUnavailable(format!("header request: {}", e)))?;

        let status = response.status();

        if status.is_redirection() {
            if followed >= max_redirects {
                tracing::warn!(followed, "Exceeded redirect maximum");
                return Err(ResolverError::RedirectLoopExceeded(max_redirects));
            }

            let location = response
                .headers()
                .get(LOCATION)
                .and_then(|v| v.to_str().ok())
                .ok_or_else(|| {
                    ResolverError::UpstreamMalformed(format!(
                        "redirect status {} without a location header",
                        status
                    ))
                })?;

            current = resolve_location(&current, location)?;
            followed += 1;
            tracing::debug!(hop = followed, "Following stream redirect");
            continue;
        }

        if status.is_success() {
            tracing::debug!(redirects = followed, "Stream url resolved");
            return Ok(current);
        }

        return Err(ResolverError::UpstreamRejected(format!(
            "header response status: {}",
            status
        )));
    }
}

fn resolve_location(current: &str, location: &str) -> Result<String, ResolverError> {
    let base = Url::parse(current)
        .map_err(|e| ResolverError::UpstreamMalformed(format!("invalid url {}: {}", current, e)))?;
    base.join(location)
        .map(String::from)
        .map_err(|e| ResolverError::UpstreamMalformed(format!("invalid redirect location: {}", e)))
}
