//! Client for the lambda deployment API

use crate::config::{EnvironmentConfig, LambdaObject};
use crate::error::HookError;
use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use serde::Serialize;
use std::fmt;
use std::sync::OnceLock;
use std::time::Duration;
use tracing::debug;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Basic-auth credential entered by the operator
///
/// `user:secret` splits into user and password at the first colon; anything
/// else is a user with no password.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    username: String,
    password: Option<String>,
}

impl Credential {
    /// Parse operator input
    ///
    /// # Errors
    ///
    /// Returns a deploy error if the input is blank
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();
        if input.is_empty() {
            return Err(HookError::deploy("No API key entered").into());
        }

        let credential = match input.split_once(':') {
            Some((username, password)) => Self {
                username: username.to_owned(),
                password: Some(password.to_owned()),
            },
            None => Self {
                username: input.to_owned(),
                password: None,
            },
        };

        Ok(credential)
    }

    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    #[must_use]
    pub fn password(&self) -> Option<&str> {
        self.password.as_deref()
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Request body: the lambda wrapped under `lambda_action`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LambdaAction {
    pub lambda_action: LambdaObject,
}

/// A fully resolved PATCH request
#[derive(Debug, Clone, PartialEq)]
pub struct PatchRequest {
    url: String,
    body: LambdaAction,
}

impl PatchRequest {
    /// Build the request for an environment whose object is already final
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the object has no usable `id`
    pub fn for_environment(env: &EnvironmentConfig) -> Result<Self> {
        let id = env.object.id().ok_or_else(|| {
            HookError::configuration("The lambda object has no 'id'; cannot build the endpoint URL")
        })?;

        Ok(Self {
            url: format!(
                "https://{}/api/v1/accounts/{}/lambdas/{id}",
                env.host, env.account
            ),
            body: LambdaAction {
                lambda_action: env.object.clone(),
            },
        })
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    #[must_use]
    pub const fn body(&self) -> &LambdaAction {
        &self.body
    }

    /// The wrapped lambda object
    #[must_use]
    pub const fn object(&self) -> &LambdaObject {
        &self.body.lambda_action
    }
}

/// Response status and body from the deployment API
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    /// Whether the status is 2xx
    #[must_use]
    #[inline]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// Seam over the remote deployment API
pub trait LambdaApi {
    /// Send one PATCH request; a non-2xx status is still `Ok`
    ///
    /// # Errors
    ///
    /// Returns an error if no response was received
    fn patch_lambda(&self, request: &PatchRequest, credential: &Credential) -> Result<ApiResponse>;
}

/// `LambdaApi` over HTTPS with a blocking `reqwest` client
///
/// The client is built on the first request.
#[derive(Debug, Default)]
pub struct HttpLambdaApi {
    client: OnceLock<Client>,
}

impl HttpLambdaApi {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            client: OnceLock::new(),
        }
    }

    fn client(&self) -> Result<&Client> {
        if let Some(client) = self.client.get() {
            return Ok(client);
        }

        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| HookError::deploy(format!("Failed to create HTTP client: {e}")))?;

        Ok(self.client.get_or_init(|| client))
    }

    fn describe_error(err: &reqwest::Error) -> String {
        if err.is_timeout() {
            format!("Request timed out after {}s", REQUEST_TIMEOUT.as_secs())
        } else if err.is_connect() {
            format!("Cannot connect to the deployment API: {err}")
        } else {
            format!("Request failed: {err}")
        }
    }
}

impl LambdaApi for HttpLambdaApi {
    fn patch_lambda(&self, request: &PatchRequest, credential: &Credential) -> Result<ApiResponse> {
        debug!("PATCH {}", request.url());
        let client = self.client()?;

        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
            spinner.set_style(style);
        }
        spinner.set_message(format!("Deploying to {}", request.url()));
        spinner.enable_steady_tick(Duration::from_millis(100));

        let result = client
            .patch(request.url())
            .basic_auth(credential.username(), credential.password())
            .header(CONTENT_TYPE, "application/json")
            .json(request.body())
            .send()
            .and_then(|response| {
                let status = response.status().as_u16();
                response.text().map(|body| ApiResponse { status, body })
            });

        spinner.finish_and_clear();

        result.map_err(|e| HookError::deploy(Self::describe_error(&e)).into())
    }
}
