use thiserror::Error;
use url::Url;
use url::form_urlencoded;

use crate::params::CheckParameters;

pub const CHECK_PATH: &str = "/apiv2/app/check";

/// A fully built request for one host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckRequest {
    pub url: Url,
    /// `application/x-www-form-urlencoded` body.
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestBuildError {
    #[error("invalid host {host:?}: {reason}")]
    InvalidHost { host: String, reason: String },
}

impl RequestBuildError {
    fn invalid_host(host: &str, reason: impl Into<String>) -> Self {
        Self::InvalidHost {
            host: host.to_string(),
            reason: reason.into(),
        }
    }
}

/// Build the check request for `host`.
///
/// # Errors
/// Returns [`RequestBuildError::InvalidHost`] when `host` does not form a URL
/// of the shape `https://{host}/apiv2/app/check`.
pub fn build_request(
    host: &str,
    params: &CheckParameters,
) -> Result<CheckRequest, RequestBuildError> {
    Ok(CheckRequest {
        url: check_url(host)?,
        body: encode_form(params),
    })
}

fn check_url(host: &str) -> Result<Url, RequestBuildError> {
    if host.is_empty() {
        return Err(RequestBuildError::invalid_host(host, "host is empty"));
    }

    let url = Url::parse(&format!("https://{host}{CHECK_PATH}"))
        .map_err(|error| RequestBuildError::invalid_host(host, error.to_string()))?;

    // Characters such as '/', '?', '#' or '@' parse fine but move parts of the
    // host into the path, query or credentials.
    if url.path() != CHECK_PATH
        || url.query().is_some()
        || url.fragment().is_some()
        || !url.username().is_empty()
        || url.password().is_some()
    {
        return Err(RequestBuildError::invalid_host(
            host,
            "host must not contain a path, query, fragment or credentials",
        ));
    }

    if url.host_str().is_none() {
        return Err(RequestBuildError::invalid_host(host, "missing host name"));
    }

    Ok(url)
}

fn encode_form(params: &CheckParameters) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, value) in params.form_fields() {
        serializer.append_pair(key, &value);
    }
    serializer.finish()
}
