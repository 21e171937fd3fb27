//! One logical download request with the auth retry policy applied.

use crate::core::YhClient;
use crate::core::error::YhError;
use reqwest::StatusCode;
use url::Url;

/// Fetch one symbol's CSV payload.
///
/// 404 is the provider's way of signalling an unknown symbol and is never
/// retried. A 401 means the crumb expired: the shared session is invalidated
/// and the request retried exactly once with a fresh one; a second 401 is
/// fatal for this call. Anything else non-success maps to [`YhError::Status`].
pub(crate) async fn fetch_csv(
    client: &YhClient,
    symbol: &str,
    url: &Url,
) -> Result<String, YhError> {
    let mut invalidated = false;

    loop {
        let session = client.session().await?;

        let mut url = url.clone();
        url.query_pairs_mut().append_pair("crumb", session.crumb());

        let resp = session.http().get(url.clone()).send().await?;
        let status = resp.status();

        if status == StatusCode::NOT_FOUND {
            return Err(YhError::SymbolNotFound(symbol.to_string()));
        }

        if status == StatusCode::UNAUTHORIZED {
            if invalidated {
                return Err(YhError::Status {
                    status: status.as_u16(),
                    url: url.to_string(),
                });
            }
            #[cfg(feature = "tracing")]
            tracing::debug!(symbol, "unauthorized, refreshing session and retrying");
            client.invalidate_session().await;
            invalidated = true;
            continue;
        }

        if !status.is_success() {
            return Err(YhError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        return Ok(resp.text().await?);
    }
}
