//! Port traits implemented by the infrastructure client.
//!
//! Applications depend on these traits rather than on the concrete
//! `shodan-client` type so they can substitute fakes in their own tests.

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::{Chunk, Profile, ShodanError, StreamHandle};

/// Account information lookups.
#[async_trait]
pub trait AccountApi: Send + Sync {
    /// Returns the profile of the account that owns the API token.
    async fn account_profile(&self) -> Result<Profile, ShodanError>;
}

/// Long-lived streaming endpoints.
#[async_trait]
pub trait StreamApi: Send + Sync {
    /// Opens the banner firehose and forwards each line to `output`.
    ///
    /// Returns once the connection is confirmed open. On error the channel is
    /// never written to.
    async fn stream_banners(
        &self,
        output: mpsc::Sender<Chunk>,
    ) -> Result<StreamHandle, ShodanError>;
}
