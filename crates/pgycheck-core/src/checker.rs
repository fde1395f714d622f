use crate::client::FailoverClient;
use crate::error::CheckError;
use crate::model::UpdateInfo;
use crate::params::CheckParameters;

/// Update checker bound to one API key.
///
/// ```no_run
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// use pgycheck_core::{FailoverClient, HostList, ReqwestTransport, UpdateChecker};
///
/// let client = FailoverClient::new(HostList::default(), ReqwestTransport::new()?);
/// let checker = UpdateChecker::new("<API_KEY>", client);
/// let info = checker.check("<APP_KEY>", Some("1.0.0"), None, None).await?;
/// println!("latest version: {}", info.build_version);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct UpdateChecker {
    api_key: String,
    client: FailoverClient,
}

impl UpdateChecker {
    pub fn new(api_key: impl Into<String>, client: FailoverClient) -> Self {
        Self {
            api_key: api_key.into(),
            client,
        }
    }

    /// Check whether `app_key` has a newer build than the one described by the
    /// optional version hints.
    ///
    /// # Errors
    /// Returns the service's `(code, message)` rejection, or the exhaustion
    /// error when no host could be reached.
    pub async fn check(
        &self,
        app_key: &str,
        build_version: Option<&str>,
        build_build_version: Option<i64>,
        channel_key: Option<&str>,
    ) -> Result<UpdateInfo, CheckError> {
        self.client
            .check(&self.parameters(app_key, build_version, build_build_version, channel_key))
            .await
    }

    #[must_use]
    pub fn parameters(
        &self,
        app_key: &str,
        build_version: Option<&str>,
        build_build_version: Option<i64>,
        channel_key: Option<&str>,
    ) -> CheckParameters {
        CheckParameters::new(self.api_key.as_str(), app_key)
            .with_build_version(build_version.unwrap_or_default())
            .with_build_build_version(build_build_version.unwrap_or_default())
            .with_channel_key(channel_key.unwrap_or_default())
    }

    #[must_use]
    pub fn client(&self) -> &FailoverClient {
        &self.client
    }
}
