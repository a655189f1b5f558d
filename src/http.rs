use std::time::Duration;

use reqwest::{RequestBuilder, Response, StatusCode};
use tokio::time::sleep;

use crate::{platform::PlatformError, warning};

const BAD_GATEWAY_DELAY: Duration = Duration::from_secs(10);
const MAX_RETRY_AFTER_SECS: u64 = 120;
const MAX_ATTEMPTS: u32 = 5;

/// Sends the request built by `make`, retrying on 502 and on 429 responses.
///
/// A 429 is retried after the server's `Retry-After` delay as long as it is
/// at most 120 seconds; longer waits are returned to the caller so a quota
/// halt is not turned into a silent multi-minute stall. Any other response,
/// successful or not, is handed back untouched for the caller to classify.
pub async fn send_with_retry<F>(make: F) -> Result<Response, PlatformError>
where
    F: Fn() -> RequestBuilder,
{
    let mut attempt = 0;

    loop {
        attempt += 1;
        let response = make().send().await?;

        match response.status() {
            StatusCode::BAD_GATEWAY if attempt < MAX_ATTEMPTS => {
                sleep(BAD_GATEWAY_DELAY).await;
                continue;
            }
            StatusCode::TOO_MANY_REQUESTS if attempt < MAX_ATTEMPTS => {
                let retry_after = response
                    .headers()
                    .get("Retry-After")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse::<u64>().ok())
                    .unwrap_or(1);

                if retry_after > MAX_RETRY_AFTER_SECS {
                    warning!(
                        "Rate limited for {} seconds, giving up on this request",
                        retry_after
                    );
                    return Ok(response);
                }

                sleep(Duration::from_secs(retry_after)).await;
                continue;
            }
            _ => return Ok(response),
        }
    }
}
