/// Inputs of one update check.
///
/// Keys are not validated locally: an empty or wrong key reaches the service
/// and comes back as a business error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckParameters {
    pub api_key: String,
    pub app_key: String,
    pub build_version: String,
    pub build_build_version: i64,
    pub channel_key: String,
}

impl CheckParameters {
    pub fn new(api_key: impl Into<String>, app_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            app_key: app_key.into(),
            ..Self::default()
        }
    }

    /// Version string of the running build, as shown to users (`1.2.0`).
    #[must_use]
    pub fn with_build_version(mut self, build_version: impl Into<String>) -> Self {
        self.build_version = build_version.into();
        self
    }

    /// Auto-incremented build number assigned by the service.
    #[must_use]
    pub fn with_build_build_version(mut self, build_build_version: i64) -> Self {
        self.build_build_version = build_build_version;
        self
    }

    #[must_use]
    pub fn with_channel_key(mut self, channel_key: impl Into<String>) -> Self {
        self.channel_key = channel_key.into();
        self
    }

    /// Form fields in the order they are written to the request body.
    pub(crate) fn form_fields(&self) -> [(&'static str, String); 5] {
        [
            ("_api_key", self.api_key.clone()),
            ("appKey", self.app_key.clone()),
            ("buildVersion", self.build_version.clone()),
            ("buildBuildVersion", self.build_build_version.to_string()),
            ("channelKey", self.channel_key.clone()),
        ]
    }
}
