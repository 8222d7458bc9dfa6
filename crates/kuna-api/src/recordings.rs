// Recording media resolution
//
// A recording's `mp4` field is not the media itself: the endpoint answers
// with a redirect whose `Location` header carries the signed, short-lived
// download URL. The link is resolved lazily and never cached.

use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::Recording;

impl ApiClient {
    /// Resolve the signed download URL for a recording.
    ///
    /// Issues the media GET with redirect-following disabled and returns
    /// the `Location` header. The signed URL expires server-side, so
    /// callers should consume it promptly.
    pub async fn get_download_link(&self, recording: &Recording) -> Result<String, Error> {
        let Some(media) = recording.mp4.as_deref() else {
            return Err(Error::MissingRedirect {
                url: format!("recording {} (no media url)", recording.id),
            });
        };

        debug!(id = recording.id, "resolving recording download link");
        self.get_location(&self.media_path(media)).await
    }

    /// Reduce a media URL to an API path: the vendor returns absolute URLs
    /// rooted at the API base, which must be re-requested through the
    /// authenticated client.
    fn media_path(&self, media_url: &str) -> String {
        let base = self.base_url().as_str().trim_end_matches('/');
        media_url
            .strip_prefix(base)
            .unwrap_or(media_url)
            .trim_matches('/')
            .to_owned()
    }
}
