//! Streaming banner firehose.

use async_trait::async_trait;
use reqwest::Method;
use shodan_core::{Chunk, ShodanError, StreamApi, StreamHandle};
use tokio::sync::mpsc;

use crate::Client;

/// Path of the all-banners stream on the streaming API.
pub const BANNERS_PATH: &str = "/shodan/banners";

impl Client {
    /// Subscribes to every banner Shodan collects, one JSON document per
    /// chunk.
    ///
    /// See [`Client::execute_stream_request`] for delivery and termination
    /// semantics.
    ///
    /// ## Errors
    ///
    /// [`ShodanError::InvalidUrl`] if the streaming base is malformed, or a
    /// [`ShodanError::StreamSetup`] error when the connection cannot be opened.
    pub async fn stream_banners(
        &self,
        output: mpsc::Sender<Chunk>,
    ) -> Result<StreamHandle, ShodanError> {
        let url = self.build_stream_base_url(BANNERS_PATH, None)?;
        self.execute_stream_request(Method::GET, &url, output).await
    }
}

#[async_trait]
impl StreamApi for Client {
    async fn stream_banners(
        &self,
        output: mpsc::Sender<Chunk>,
    ) -> Result<StreamHandle, ShodanError> {
        Client::stream_banners(self, output).await
    }
}
