use std::ops::ControlFlow;
use std::sync::Arc;

use log::{debug, info, warn};
use tokio_util::sync::CancellationToken;

use crate::classify::{AttemptOutcome, classify};
use crate::error::CheckError;
use crate::hosts::HostList;
use crate::model::UpdateInfo;
use crate::params::CheckParameters;
use crate::request::build_request;
use crate::transport::Transport;

/// Runs one update check across an ordered list of hosts.
///
/// Hosts are tried strictly one after another. The first decoded payload or
/// the first service rejection ends the check; any other failure moves on to
/// the next host. Each host is attempted at most once per check.
#[derive(Clone)]
pub struct FailoverClient {
    hosts: HostList,
    transport: Arc<dyn Transport>,
}

impl FailoverClient {
    pub fn new(hosts: HostList, transport: impl Transport + 'static) -> Self {
        Self::with_shared_transport(hosts, Arc::new(transport))
    }

    #[must_use]
    pub fn with_shared_transport(hosts: HostList, transport: Arc<dyn Transport>) -> Self {
        Self { hosts, transport }
    }

    #[must_use]
    pub fn hosts(&self) -> &HostList {
        &self.hosts
    }

    /// Check for an update, falling back through the host list.
    ///
    /// # Errors
    /// Returns [`CheckError::Business`] when a host rejects the parameters and
    /// [`CheckError::Exhausted`] when every host failed.
    pub async fn check(&self, params: &CheckParameters) -> Result<UpdateInfo, CheckError> {
        for host in self.hosts.iter() {
            let outcome = self.attempt(host, params).await;
            if let ControlFlow::Break(result) = settle(host, outcome) {
                return result;
            }
        }

        Err(self.exhausted())
    }

    /// Like [`FailoverClient::check`], but gives up as soon as `cancel` fires.
    ///
    /// Returns `None` when cancelled; no further host is contacted after that.
    pub async fn check_until_cancelled(
        &self,
        params: &CheckParameters,
        cancel: &CancellationToken,
    ) -> Option<Result<UpdateInfo, CheckError>> {
        for host in self.hosts.iter() {
            if cancel.is_cancelled() {
                debug!("Update check cancelled before contacting {host}");
                return None;
            }

            let outcome = tokio::select! {
                biased;
                () = cancel.cancelled() => {
                    debug!("Update check cancelled while waiting on {host}");
                    return None;
                }
                outcome = self.attempt(host, params) => outcome,
            };

            if let ControlFlow::Break(result) = settle(host, outcome) {
                return Some(result);
            }
        }

        Some(Err(self.exhausted()))
    }

    async fn attempt(&self, host: &str, params: &CheckParameters) -> AttemptOutcome {
        let request = match build_request(host, params) {
            Ok(request) => request,
            Err(error) => return AttemptOutcome::NetworkError(error.to_string()),
        };

        debug!("Checking for update at {}", request.url);
        classify(&self.transport.send(&request).await)
    }

    fn exhausted(&self) -> CheckError {
        warn!("Update check failed on all {} host(s)", self.hosts.len());
        CheckError::Exhausted {
            attempts: self.hosts.len(),
        }
    }
}

fn settle(host: &str, outcome: AttemptOutcome) -> ControlFlow<Result<UpdateInfo, CheckError>> {
    let summary = outcome.to_string();
    match outcome.into_terminal() {
        Some(result) => {
            info!("Update check via {host} finished: {summary}");
            ControlFlow::Break(result)
        }
        None => {
            warn!("Update check via {host} failed: {summary}");
            ControlFlow::Continue(())
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use reqwest::StatusCode;
    use tokio_util::sync::CancellationToken;

    use super::{FailoverClient, settle};
    use crate::classify::AttemptOutcome;
    use crate::error::CheckError;
    use crate::hosts::HostList;
    use crate::model::UpdateInfo;
    use crate::params::CheckParameters;
    use crate::request::CheckRequest;
    use crate::transport::{RawResponse, Transport, TransportError};

    enum Reply {
        Body(&'static str),
        Status(StatusCode),
        Fail,
        Hang,
    }

    #[derive(Clone)]
    struct ScriptedTransport {
        replies: Arc<Mutex<VecDeque<Reply>>>,
        seen: Arc<Mutex<Vec<String>>>,
    }

    impl ScriptedTransport {
        fn new(replies: Vec<Reply>) -> Self {
            Self {
                replies: Arc::new(Mutex::new(replies.into())),
                seen: Arc::new(Mutex::new(Vec::new())),
            }
        }

        fn seen_hosts(&self) -> Vec<String> {
            self.seen.lock().expect("seen lock").clone()
        }
    }

    #[async_trait]
    impl Transport for ScriptedTransport {
        async fn send(&self, request: &CheckRequest) -> Result<RawResponse, TransportError> {
            self.seen
                .lock()
                .expect("seen lock")
                .push(request.url.host_str().unwrap_or_default().to_string());
            let reply = self
                .replies
                .lock()
                .expect("replies lock")
                .pop_front()
                .expect("transport called more often than scripted");
            match reply {
                Reply::Body(body) => Ok(RawResponse::new(StatusCode::OK, body.as_bytes().to_vec())),
                Reply::Status(status) => Ok(RawResponse::new(status, Vec::new())),
                Reply::Fail => Err(TransportError::Other("connection refused".to_string())),
                Reply::Hang => std::future::pending().await,
            }
        }
    }

    fn client(hosts: &[&str], transport: &ScriptedTransport) -> FailoverClient {
        FailoverClient::new(
            HostList::new(hosts.iter().copied()).expect("test hosts are non-empty"),
            transport.clone(),
        )
    }

    fn params() -> CheckParameters {
        CheckParameters::new("K", "A")
    }

    #[tokio::test]
    async fn first_host_success_skips_the_rest() {
        let transport = ScriptedTransport::new(vec![Reply::Body(
            r#"{"code":0,"data":{"buildVersion":"2.0"}}"#,
        )]);

        let info = client(&["a.example", "b.example"], &transport)
            .check(&params())
            .await
            .expect("first host should succeed");

        assert_eq!(info.build_version, "2.0");
        assert_eq!(transport.seen_hosts(), vec!["a.example"]);
    }

    #[tokio::test]
    async fn every_retryable_outcome_advances_to_next_host() {
        let transport = ScriptedTransport::new(vec![
            Reply::Fail,
            Reply::Status(StatusCode::SERVICE_UNAVAILABLE),
            Reply::Status(StatusCode::OK),
            Reply::Body("not json"),
            Reply::Body(r#"{"code":0}"#),
            Reply::Body(r#"{"code":0,"data":{}}"#),
        ]);
        let hosts = ["h1.example", "h2.example", "h3.example", "h4.example", "h5.example", "h6.example"];

        let info = client(&hosts, &transport)
            .check(&params())
            .await
            .expect("last host should succeed");

        assert_eq!(info, UpdateInfo::default());
        assert_eq!(transport.seen_hosts(), hosts.to_vec());
    }

    #[tokio::test]
    async fn business_error_stops_the_check() {
        let transport = ScriptedTransport::new(vec![Reply::Body(
            r#"{"code":1001,"message":"invalid api key"}"#,
        )]);

        let error = client(&["a.example", "b.example"], &transport)
            .check(&params())
            .await
            .expect_err("business error should be terminal");

        assert_eq!(
            error,
            CheckError::Business {
                code: 1001,
                message: "invalid api key".to_string(),
            }
        );
        assert_eq!(transport.seen_hosts(), vec!["a.example"]);
    }

    #[tokio::test]
    async fn exhaustion_tries_each_host_exactly_once() {
        let transport = ScriptedTransport::new(vec![Reply::Fail, Reply::Fail, Reply::Fail]);

        let error = client(&["a.example", "b.example", "c.example"], &transport)
            .check(&params())
            .await
            .expect_err("all hosts fail");

        assert_eq!(error, CheckError::Exhausted { attempts: 3 });
        assert_eq!(error.code(), 503);
        assert_eq!(
            transport.seen_hosts(),
            vec!["a.example", "b.example", "c.example"]
        );
    }

    #[tokio::test]
    async fn invalid_host_is_skipped_like_a_network_error() {
        let transport = ScriptedTransport::new(vec![Reply::Body(
            r#"{"code":0,"data":{"buildVersion":"3.1"}}"#,
        )]);

        let info = client(&["bad host", "good.example"], &transport)
            .check(&params())
            .await
            .expect("valid host should be used after the invalid one");

        assert_eq!(info.build_version, "3.1");
        assert_eq!(transport.seen_hosts(), vec!["good.example"]);
    }

    #[tokio::test]
    async fn single_invalid_host_exhausts_without_sending() {
        let transport = ScriptedTransport::new(Vec::new());

        let error = FailoverClient::new(HostList::single("a/b"), transport.clone())
            .check(&params())
            .await
            .expect_err("invalid host cannot succeed");

        assert_eq!(error, CheckError::Exhausted { attempts: 1 });
        assert!(transport.seen_hosts().is_empty());
    }

    #[tokio::test]
    async fn cancelled_token_prevents_any_attempt() {
        let transport = ScriptedTransport::new(Vec::new());
        let cancel = CancellationToken::new();
        cancel.cancel();

        let result = client(&["a.example"], &transport)
            .check_until_cancelled(&params(), &cancel)
            .await;

        assert!(result.is_none());
        assert!(transport.seen_hosts().is_empty());
    }

    #[tokio::test]
    async fn cancelling_in_flight_attempt_stops_fallback() {
        let transport = ScriptedTransport::new(vec![Reply::Hang, Reply::Fail]);
        let cancel = CancellationToken::new();
        let client = client(&["a.example", "b.example"], &transport);

        let task = {
            let cancel = cancel.clone();
            tokio::spawn(async move { client.check_until_cancelled(&params(), &cancel).await })
        };
        while transport.seen_hosts().is_empty() {
            tokio::task::yield_now().await;
        }
        cancel.cancel();

        let result = task.await.expect("check task should not panic");

        assert!(result.is_none());
        assert_eq!(transport.seen_hosts(), vec!["a.example"]);
    }

    #[tokio::test]
    async fn uncancelled_check_reports_result() {
        let transport = ScriptedTransport::new(vec![Reply::Fail]);

        let result = client(&["a.example"], &transport)
            .check_until_cancelled(&params(), &CancellationToken::new())
            .await;

        assert_eq!(result, Some(Err(CheckError::Exhausted { attempts: 1 })));
    }

    #[test]
    fn settle_moves_on_exactly_for_retryable_outcomes() {
        let outcomes = [
            AttemptOutcome::NetworkError("refused".to_string()),
            AttemptOutcome::HttpStatusError(StatusCode::INTERNAL_SERVER_ERROR),
            AttemptOutcome::BodyMissing,
            AttemptOutcome::ParseError("eof".to_string()),
            AttemptOutcome::MissingDataError,
            AttemptOutcome::BusinessError {
                code: 1,
                message: "denied".to_string(),
            },
            AttemptOutcome::Decoded(UpdateInfo::default()),
        ];

        for outcome in outcomes {
            let retryable = outcome.is_retryable();
            assert_eq!(
                settle("a.example", outcome).is_continue(),
                retryable
            );
        }
    }

    #[test]
    fn hosts_are_exposed_in_order() {
        let transport = ScriptedTransport::new(Vec::new());

        let client = client(&["a.example", "b.example"], &transport);

        assert_eq!(
            client.hosts().iter().collect::<Vec<_>>(),
            vec!["a.example", "b.example"]
        );
        assert_eq!(client.hosts().len(), 2);
    }
}
