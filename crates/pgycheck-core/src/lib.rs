//! Client for the Pgyer "check for update" endpoint.
//!
//! A check is a form-encoded `POST` to `https://{host}/apiv2/app/check`,
//! tried against an ordered list of hosts:
//! - Transport failures, bad statuses and unusable payloads move on to the
//!   next host.
//! - A non-zero `code` in the response envelope is the service rejecting the
//!   parameters and ends the check immediately.
//! - The nested `data` object decodes leniently into [`UpdateInfo`].

mod checker;
mod classify;
mod client;
mod error;
mod hosts;
mod model;
mod params;
mod request;
mod transport;

/// API-key bound facade over [`FailoverClient`].
pub use checker::UpdateChecker;
/// Per-attempt outcome classification.
pub use classify::{AttemptOutcome, UNKNOWN_ERROR_MESSAGE, classify};
/// Sequential host fallback.
pub use client::FailoverClient;
/// Caller-facing failures.
pub use error::{CheckError, EXHAUSTED_CODE, EXHAUSTED_MESSAGE, HostListError};
pub use hosts::{DEFAULT_HOSTS, HostList};
/// Update descriptor and the lenient field decoder it is built with.
pub use model::{UpdateInfo, lenient};
pub use params::CheckParameters;
/// Request construction for a single host.
pub use request::{CHECK_PATH, CheckRequest, RequestBuildError, build_request};
/// HTTP seam and its reqwest implementation.
pub use transport::{RawResponse, ReqwestTransport, Transport, TransportError};
