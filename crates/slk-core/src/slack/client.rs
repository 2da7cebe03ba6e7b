//! Slack Web API client.
//!
//! Every read endpoint follows the same path: attach the `token` parameter,
//! send a GET through the [`Transport`], open the response envelope, then
//! decode the endpoint's payload shape. The first failure along that path is
//! returned and later stages never run.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::CoreError;
use crate::config::AppConfig;
use crate::error::Result;
use crate::slack::collections::take_first;
use crate::slack::envelope;
use crate::slack::models::{Presence, User, UserGroup};
use crate::slack::transport::{CallContext, HttpRequest, ReqwestTransport, Transport};

/// Default Web API base URL.
pub const DEFAULT_BASE_URL: &str = "https://slack.com/api";

/// Bearer token used for every Web API call.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Wrap a pre-obtained token.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The token text.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

/// Web API methods this client calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// `users.list`
    UsersList,
    /// `users.info`
    UsersInfo,
    /// `users.getPresence`
    UsersGetPresence,
    /// `usergroups.list`
    UserGroupsList,
}

impl Endpoint {
    /// Every endpoint, in declaration order.
    pub const ALL: [Self; 4] = [
        Self::UsersList,
        Self::UsersInfo,
        Self::UsersGetPresence,
        Self::UserGroupsList,
    ];

    /// Method path appended to the base URL.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::UsersList => "users.list",
            Self::UsersInfo => "users.info",
            Self::UsersGetPresence => "users.getPresence",
            Self::UserGroupsList => "usergroups.list",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Response of `users.list`.
#[derive(Debug, Deserialize)]
struct UsersListResponse {
    members: Vec<User>,
}

/// Response of `users.info`.
#[derive(Debug, Deserialize)]
struct UsersInfoResponse {
    user: User,
}

/// Response of `usergroups.list`.
#[derive(Debug, Deserialize)]
struct UserGroupsListResponse {
    usergroups: Vec<UserGroup>,
}

/// Slack Web API client.
///
/// Read-only after construction and cheap to clone; one instance can serve
/// concurrent calls from many tasks.
#[derive(Clone)]
pub struct SlackClient {
    credential: Credential,
    base_url: String,
    transport: Arc<dyn Transport>,
}

impl fmt::Debug for SlackClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SlackClient")
            .field("credential", &self.credential)
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl SlackClient {
    /// Create a client over an existing transport, using [`DEFAULT_BASE_URL`].
    #[must_use]
    pub fn new(credential: Credential, transport: Arc<dyn Transport>) -> Self {
        Self {
            credential,
            base_url: DEFAULT_BASE_URL.to_string(),
            transport,
        }
    }

    /// Point the client at another API root.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Create a client from configuration, using the `reqwest` transport.
    ///
    /// # Errors
    ///
    /// Returns an error if no token is configured or the HTTP client cannot
    /// be created.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let token = config
            .api
            .token
            .as_deref()
            .filter(|token| !token.is_empty())
            .ok_or_else(|| {
                CoreError::Config("no API token configured (api.token or SLK_API__TOKEN)".to_string())
            })?;

        let transport = default_transport(config)?;
        Ok(Self::new(Credential::new(token), transport).with_base_url(config.api.base_url.clone()))
    }

    /// API root this client sends to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL of an endpoint.
    #[must_use]
    pub fn endpoint_url(&self, endpoint: Endpoint) -> String {
        format!("{}/{}", self.base_url, endpoint.path())
    }

    /// List all users in the workspace (`users.list`).
    ///
    /// # Errors
    ///
    /// Returns a transport, decode, or API error.
    pub async fn users_list(&self, cx: &CallContext) -> Result<Vec<User>> {
        let response: UsersListResponse = self.call(Endpoint::UsersList, &[], cx).await?;
        Ok(response.members)
    }

    /// Get one user by ID (`users.info`).
    ///
    /// # Errors
    ///
    /// Returns a transport, decode, or API error.
    pub async fn users_info(&self, user_id: &str, cx: &CallContext) -> Result<User> {
        let response: UsersInfoResponse = self
            .call(Endpoint::UsersInfo, &[("user", user_id)], cx)
            .await?;
        Ok(response.user)
    }

    /// Get a user's presence (`users.getPresence`).
    ///
    /// # Errors
    ///
    /// Returns a transport, decode, or API error.
    pub async fn user_presence(&self, user: &str, cx: &CallContext) -> Result<Presence> {
        self.call(Endpoint::UsersGetPresence, &[("user", user)], cx)
            .await
    }

    /// List all user groups in the workspace (`usergroups.list`).
    ///
    /// # Errors
    ///
    /// Returns a transport, decode, or API error.
    pub async fn usergroups_list(&self, cx: &CallContext) -> Result<Vec<UserGroup>> {
        let response: UserGroupsListResponse =
            self.call(Endpoint::UserGroupsList, &[], cx).await?;
        Ok(response.usergroups)
    }

    /// Fetch the user list and return the first user matching `predicate`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::NotFound`] if no user matches, or any error from
    /// [`Self::users_list`].
    pub async fn find_user<P>(&self, predicate: P, cx: &CallContext) -> Result<User>
    where
        P: FnMut(&User) -> bool + Send,
    {
        let members = self.users_list(cx).await?;
        take_first(members, "user matching predicate", predicate)
    }

    /// Fetch the user list and return the user whose `name` is exactly `name`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::NotFound`] if no user has that name, or any error
    /// from [`Self::users_list`].
    pub async fn find_user_by_name(&self, name: &str, cx: &CallContext) -> Result<User> {
        let members = self.users_list(cx).await?;
        take_first(members, &format!("user named {name}"), |user| user.name == name)
    }

    async fn call<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        params: &[(&'static str, &str)],
        cx: &CallContext,
    ) -> Result<T> {
        let url = self.endpoint_url(endpoint);
        log::debug!("GET {url}");

        let mut query = Vec::with_capacity(params.len() + 1);
        query.push(("token", self.credential.expose().to_string()));
        query.extend(params.iter().map(|(key, value)| (*key, (*value).to_string())));

        let request = HttpRequest::get(url, query).with_context(cx.clone());
        let body = self.transport.send(request).await?;
        log::trace!("{endpoint} returned {} bytes", body.len());

        envelope::decode(endpoint.path(), &body)
    }
}

/// Build the `reqwest` transport described by `config`.
///
/// # Errors
///
/// Returns an error if the HTTP client cannot be created.
pub fn default_transport(config: &AppConfig) -> Result<Arc<dyn Transport>> {
    let timeout = Duration::from_secs(config.runtime.timeout);
    let transport = ReqwestTransport::new(timeout, &config.api.user_agent)?;
    Ok(Arc::new(transport))
}
