use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::api::{ApiError, PortalClient};
use crate::scheduler::{Connectivity, JobOutcome, JobScheduler, JobSpec, PeriodicJob};

/// Unique name of the keep-alive job; registration under this name replaces
/// any pending instance.
pub const KEEP_ALIVE_JOB_NAME: &str = "session-keep-alive";

/// Nominal refresh interval. ~15 minutes keeps two consecutive successful
/// refreshes well inside the portal's session-expiry window even with up to
/// ~30 minutes of scheduler drift.
pub const KEEP_ALIVE_INTERVAL: Duration = Duration::from_secs(15 * 60);

/// The portal's view of who the current session belongs to.
#[derive(Debug, Clone, Deserialize)]
pub struct UserSession {
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
    #[serde(rename = "userEid", default)]
    pub user_eid: Option<String>,
}

impl UserSession {
    /// A session without a user id has expired server-side.
    pub fn is_valid(&self) -> bool {
        self.user_id.is_some()
    }
}

/// Session side of the portal, as seen by the keep-alive job.
///
/// The implementation is passed in pre-built at registration time; the job
/// itself carries no transport construction.
pub trait SessionService: Send + Sync + 'static {
    fn logged_in_user(&self) -> impl Future<Output = Result<UserSession, ApiError>> + Send;

    /// Exercise the session. `Some` payload signals liveness.
    fn refresh_session(&self) -> impl Future<Output = Result<Option<String>, ApiError>> + Send;
}

impl SessionService for PortalClient {
    fn logged_in_user(&self) -> impl Future<Output = Result<UserSession, ApiError>> + Send {
        self.current_session()
    }

    fn refresh_session(&self) -> impl Future<Output = Result<Option<String>, ApiError>> + Send {
        self.refresh_portal()
    }
}

impl<S: SessionService> SessionService for Arc<S> {
    fn logged_in_user(&self) -> impl Future<Output = Result<UserSession, ApiError>> + Send {
        S::logged_in_user(self)
    }

    fn refresh_session(&self) -> impl Future<Output = Result<Option<String>, ApiError>> + Send {
        S::refresh_session(self)
    }
}

/// One keep-alive invocation:
///
/// ```text
/// START -> CHECK_SESSION --(user present)--> REFRESH --(live)--> SUCCEEDED
///          CHECK_SESSION --(user absent)---> FAILED
///          REFRESH --(error / empty page)--> FAILED
/// ```
///
/// Nothing persists across invocations; the session state is re-derived
/// fresh from the portal every run.
pub struct KeepAliveJob<S> {
    service: S,
}

impl<S: SessionService> KeepAliveJob<S> {
    pub fn new(service: S) -> Self {
        Self { service }
    }

    pub async fn run_once(&self) -> JobOutcome {
        let user = match self.service.logged_in_user().await {
            Ok(user) => user,
            Err(err) => {
                warn!(error = %err, "Session check failed");
                return JobOutcome::Failure;
            }
        };

        // An expired session is not recoverable here; re-authentication has
        // to go through the login flow.
        if !user.is_valid() {
            warn!("Portal session has expired");
            return JobOutcome::Failure;
        }

        // The backend ties session liveness to ordinary page access, so the
        // refresh requests the portal page like a real client would. The
        // payload itself is discarded; only its presence matters.
        match self.service.refresh_session().await {
            Ok(Some(_)) => {
                debug!(user_id = ?user.user_id, "Session refreshed");
                JobOutcome::Success
            }
            Ok(None) => {
                warn!("Session refresh returned an empty page");
                JobOutcome::Failure
            }
            Err(err) => {
                warn!(error = %err, "Session refresh failed");
                JobOutcome::Failure
            }
        }
    }
}

impl<S: SessionService> PeriodicJob for KeepAliveJob<S> {
    fn run(&self) -> impl Future<Output = JobOutcome> + Send {
        self.run_once()
    }
}

/// Register the keep-alive job with its standard parameters: fixed name,
/// 15-minute interval, network connectivity required.
pub fn register_keep_alive<C, S>(scheduler: &mut JobScheduler<C>, service: S)
where
    C: Connectivity,
    S: SessionService,
{
    scheduler.register(
        JobSpec {
            name: KEEP_ALIVE_JOB_NAME.to_string(),
            interval: KEEP_ALIVE_INTERVAL,
            requires_network: true,
        },
        KeepAliveJob::new(service),
    );
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::scheduler::AlwaysOnline;

    use super::*;

    struct FakeSession {
        user_id: Option<String>,
        refresh_result: Result<Option<String>, ()>,
        refresh_calls: AtomicUsize,
    }

    impl FakeSession {
        fn new(user_id: Option<&str>, refresh_result: Result<Option<String>, ()>) -> Self {
            Self {
                user_id: user_id.map(str::to_string),
                refresh_result,
                refresh_calls: AtomicUsize::new(0),
            }
        }
    }

    impl SessionService for FakeSession {
        fn logged_in_user(&self) -> impl Future<Output = Result<UserSession, ApiError>> + Send {
            std::future::ready(Ok(UserSession {
                user_id: self.user_id.clone(),
                user_eid: None,
            }))
        }

        fn refresh_session(&self) -> impl Future<Output = Result<Option<String>, ApiError>> + Send {
            self.refresh_calls.fetch_add(1, Ordering::SeqCst);
            let result = match &self.refresh_result {
                Ok(body) => Ok(body.clone()),
                Err(()) => Err(ApiError::RemoteRejected {
                    status: 502,
                    body: "gateway timeout".to_string(),
                }),
            };
            std::future::ready(result)
        }
    }

    #[tokio::test]
    async fn expired_session_fails_without_calling_refresh() {
        let service = Arc::new(FakeSession::new(None, Ok(Some("<html/>".to_string()))));
        let job = KeepAliveJob::new(Arc::clone(&service));

        assert_eq!(job.run_once().await, JobOutcome::Failure);
        assert_eq!(service.refresh_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn live_session_with_page_payload_succeeds() {
        let service = Arc::new(FakeSession::new(
            Some("abc"),
            Ok(Some("<html>portal</html>".to_string())),
        ));
        let job = KeepAliveJob::new(Arc::clone(&service));

        assert_eq!(job.run_once().await, JobOutcome::Success);
        assert_eq!(service.refresh_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn empty_refresh_payload_is_a_failure() {
        let service = FakeSession::new(Some("abc"), Ok(None));
        let job = KeepAliveJob::new(service);

        assert_eq!(job.run_once().await, JobOutcome::Failure);
    }

    #[tokio::test]
    async fn refresh_error_is_a_failure() {
        let service = FakeSession::new(Some("abc"), Err(()));
        let job = KeepAliveJob::new(service);

        assert_eq!(job.run_once().await, JobOutcome::Failure);
    }

    #[tokio::test]
    async fn session_check_error_is_a_failure() {
        struct BrokenSession;

        impl SessionService for BrokenSession {
            fn logged_in_user(
                &self,
            ) -> impl Future<Output = Result<UserSession, ApiError>> + Send {
                std::future::ready(Err(ApiError::RemoteRejected {
                    status: 500,
                    body: "boom".to_string(),
                }))
            }

            fn refresh_session(
                &self,
            ) -> impl Future<Output = Result<Option<String>, ApiError>> + Send {
                std::future::ready(Ok(None))
            }
        }

        let job = KeepAliveJob::new(BrokenSession);
        assert_eq!(job.run_once().await, JobOutcome::Failure);
    }

    #[tokio::test]
    async fn registration_is_unique_per_name() {
        let mut scheduler = JobScheduler::new(AlwaysOnline);
        register_keep_alive(&mut scheduler, FakeSession::new(Some("abc"), Ok(None)));
        register_keep_alive(&mut scheduler, FakeSession::new(Some("abc"), Ok(None)));

        assert_eq!(scheduler.pending_jobs(), 1);
        assert!(scheduler.is_registered(KEEP_ALIVE_JOB_NAME));
    }

    #[test]
    fn user_session_validity_follows_user_id() {
        let valid: UserSession = serde_json::from_str(r#"{"userId": "abc"}"#).unwrap();
        assert!(valid.is_valid());

        let expired: UserSession = serde_json::from_str(r#"{"userId": null}"#).unwrap();
        assert!(!expired.is_valid());
    }
}
