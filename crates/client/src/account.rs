//! Account endpoints.

use async_trait::async_trait;
use reqwest::Method;
use shodan_core::{AccountApi, Profile, ShodanError};

use crate::Client;

/// Path of the account-profile endpoint on the standard API.
pub const PROFILE_PATH: &str = "/account/profile";

impl Client {
    /// Returns information about the account linked to the API token.
    ///
    /// ## Errors
    ///
    /// Any error from URL building or request execution, unchanged.
    pub async fn account_profile(&self) -> Result<Profile, ShodanError> {
        let url = self.build_base_url(PROFILE_PATH, None)?;
        self.execute_request(Method::GET, &url, None).await
    }
}

#[async_trait]
impl AccountApi for Client {
    async fn account_profile(&self) -> Result<Profile, ShodanError> {
        Client::account_profile(self).await
    }
}
