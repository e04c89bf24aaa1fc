//! Client layer: orchestrates transport calls and maps transport ↔ domain.

use std::error::Error as StdError;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::domain::{DeliveryReceipt, Destination, Email, MessageText, Password, ValidationError};
use crate::sender::{BoxFuture, Provider, Session};
use crate::transport::{
    GALX_FIELD, SendOutcome, decode_send_sms_json_response, encode_login_form,
    encode_send_sms_form, scrape_input_value, scrape_rnr_se,
};

const DEFAULT_LOGIN_PAGE_ENDPOINT: &str =
    "https://accounts.google.com/ServiceLogin?service=grandcentral";
const DEFAULT_LOGIN_ENDPOINT: &str =
    "https://accounts.google.com/ServiceLoginAuth?service=grandcentral";
const DEFAULT_SEND_ENDPOINT: &str = "https://www.google.com/voice/sms/send/";
const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

#[derive(Debug, Clone)]
struct HttpResponse {
    status: u16,
    body: String,
}

trait HttpTransport: Send + Sync {
    fn get<'a>(
        &'a self,
        url: &'a str,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>>;

    fn post_form<'a>(
        &'a self,
        url: &'a str,
        params: Vec<(String, String)>,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>>;
}

#[derive(Debug, Clone)]
struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    async fn read(
        response: reqwest::Response,
    ) -> Result<HttpResponse, Box<dyn StdError + Send + Sync>> {
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(HttpResponse { status, body })
    }
}

impl HttpTransport for ReqwestTransport {
    fn get<'a>(
        &'a self,
        url: &'a str,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>> {
        Box::pin(async move {
            let response = self.client.get(url).send().await?;
            Self::read(response).await
        })
    }

    fn post_form<'a>(
        &'a self,
        url: &'a str,
        params: Vec<(String, String)>,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>> {
        Box::pin(async move {
            let response = self.client.post(url).form(&params).send().await?;
            Self::read(response).await
        })
    }
}

#[derive(Debug, thiserror::Error)]
/// Errors returned by [`GoogleVoiceClient`] and, through [`Provider`], by the sender.
///
/// This error preserves:
/// - HTTP-level failures (non-2xx status or transport failures),
/// - login failures and send rejections,
/// - validation/parse failures.
pub enum GoogleVoiceError {
    /// HTTP client / transport failure (DNS, TLS, timeouts, etc).
    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn StdError + Send + Sync>),

    /// Non-successful HTTP status code returned by the server.
    #[error("unexpected HTTP status: {status}")]
    HttpStatus { status: u16, body: Option<String> },

    /// The login flow did not yield an authenticated Voice session.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// Google Voice answered the send call with `ok: false`.
    #[error("message rejected by Google Voice{}", describe_code(.code))]
    Rejected { code: Option<i64> },

    /// Response body could not be parsed as the expected format.
    #[error("parse error: {0}")]
    Parse(#[source] Box<dyn StdError + Send + Sync>),

    /// An endpoint override is not a valid absolute URL.
    #[error("invalid endpoint {endpoint:?}: {source}")]
    InvalidEndpoint {
        endpoint: String,
        #[source]
        source: url::ParseError,
    },

    /// One of the domain constructors rejected an invalid value.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
}

fn describe_code(code: &Option<i64>) -> String {
    match code {
        Some(code) => format!(" (code {code})"),
        None => String::new(),
    }
}

#[derive(Debug, Clone)]
/// Builder for [`GoogleVoiceClient`].
///
/// Use this when you need to customize endpoints, timeout, or user-agent.
pub struct GoogleVoiceClientBuilder {
    login_page_endpoint: String,
    login_endpoint: String,
    send_endpoint: String,
    timeout: Option<Duration>,
    user_agent: String,
}

impl Default for GoogleVoiceClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl GoogleVoiceClientBuilder {
    /// Create a builder with the default Google endpoints, no timeout and a browser-like user-agent.
    pub fn new() -> Self {
        Self {
            login_page_endpoint: DEFAULT_LOGIN_PAGE_ENDPOINT.to_owned(),
            login_endpoint: DEFAULT_LOGIN_ENDPOINT.to_owned(),
            send_endpoint: DEFAULT_SEND_ENDPOINT.to_owned(),
            timeout: None,
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }

    /// Override the URL of the login form page (fetched for its hidden fields).
    pub fn login_page_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.login_page_endpoint = endpoint.into();
        self
    }

    /// Override the URL the login form is posted to.
    pub fn login_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.login_endpoint = endpoint.into();
        self
    }

    /// Override the Voice `sms/send` URL.
    pub fn send_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.send_endpoint = endpoint.into();
        self
    }

    /// Set an HTTP client timeout applied to each request.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Override the HTTP `User-Agent` header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Build a [`GoogleVoiceClient`].
    pub fn build(self) -> Result<GoogleVoiceClient, GoogleVoiceError> {
        for endpoint in [
            &self.login_page_endpoint,
            &self.login_endpoint,
            &self.send_endpoint,
        ] {
            url::Url::parse(endpoint).map_err(|source| GoogleVoiceError::InvalidEndpoint {
                endpoint: endpoint.clone(),
                source,
            })?;
        }

        let mut builder = reqwest::Client::builder()
            .cookie_store(true)
            .user_agent(self.user_agent);
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder
            .build()
            .map_err(|err| GoogleVoiceError::Transport(Box::new(err)))?;

        Ok(GoogleVoiceClient {
            login_page_endpoint: self.login_page_endpoint,
            login_endpoint: self.login_endpoint,
            send_endpoint: self.send_endpoint,
            http: Arc::new(ReqwestTransport { client }),
        })
    }
}

#[derive(Clone)]
/// Google Voice client.
///
/// Logging in fetches the login form for its hidden `GALX` field, posts the credentials
/// and scrapes the `_rnr_se` token from the Voice page the login redirects to. Cookies
/// set along the way are kept for the send call.
pub struct GoogleVoiceClient {
    login_page_endpoint: String,
    login_endpoint: String,
    send_endpoint: String,
    http: Arc<dyn HttpTransport>,
}

impl GoogleVoiceClient {
    /// Create a client with default settings.
    ///
    /// For more customization, use [`GoogleVoiceClient::builder`].
    pub fn new() -> Result<Self, GoogleVoiceError> {
        GoogleVoiceClientBuilder::new().build()
    }

    /// Start building a client with custom settings.
    pub fn builder() -> GoogleVoiceClientBuilder {
        GoogleVoiceClientBuilder::new()
    }

    /// Sign in and return a session usable for one send.
    ///
    /// Errors:
    /// - [`GoogleVoiceError::HttpStatus`] for non-2xx HTTP responses,
    /// - [`GoogleVoiceError::Auth`] when the final page carries no `_rnr_se` token
    ///   (wrong credentials, extra verification required, etc).
    pub async fn login(
        &self,
        email: &Email,
        password: &Password,
    ) -> Result<Session, GoogleVoiceError> {
        debug!(endpoint = %self.login_page_endpoint, "fetching login form");
        let page = self
            .http
            .get(&self.login_page_endpoint)
            .await
            .map_err(GoogleVoiceError::Transport)?;
        let page = success_body(page)?;

        let galx = scrape_input_value(&page, GALX_FIELD);
        if galx.is_none() {
            debug!("login form has no GALX field");
        }

        debug!(endpoint = %self.login_endpoint, email = email.as_str(), "posting credentials");
        let params = encode_login_form(email, password, galx.as_deref());
        let response = self
            .http
            .post_form(&self.login_endpoint, params)
            .await
            .map_err(GoogleVoiceError::Transport)?;
        let landing = success_body(response)?;

        match scrape_rnr_se(&landing) {
            Some(token) => Ok(Session::new(token)),
            None => {
                warn!(email = email.as_str(), "login did not reach Google Voice");
                Err(GoogleVoiceError::Auth(
                    "Google Voice session token not found; check the email and password"
                        .to_owned(),
                ))
            }
        }
    }

    /// Send one SMS under `session`.
    ///
    /// Errors:
    /// - [`GoogleVoiceError::HttpStatus`] for non-2xx HTTP responses,
    /// - [`GoogleVoiceError::Rejected`] when Google Voice answers `ok: false`,
    /// - [`GoogleVoiceError::Parse`] when the reply is not JSON.
    pub async fn send_sms(
        &self,
        session: &Session,
        destination: &Destination,
        text: &MessageText,
    ) -> Result<DeliveryReceipt, GoogleVoiceError> {
        debug!(endpoint = %self.send_endpoint, to = destination.raw(), "sending sms");
        let params = encode_send_sms_form(session.token(), destination, text);
        let response = self
            .http
            .post_form(&self.send_endpoint, params)
            .await
            .map_err(GoogleVoiceError::Transport)?;
        let body = success_body(response)?;

        match decode_send_sms_json_response(&body)
            .map_err(|err| GoogleVoiceError::Parse(Box::new(err)))?
        {
            SendOutcome::Accepted(receipt) => Ok(receipt),
            SendOutcome::Rejected { code } => Err(GoogleVoiceError::Rejected { code }),
        }
    }
}

impl Provider for GoogleVoiceClient {
    fn authenticate<'a>(
        &'a self,
        email: &'a Email,
        password: &'a Password,
    ) -> BoxFuture<'a, Result<Session, GoogleVoiceError>> {
        Box::pin(self.login(email, password))
    }

    fn dispatch<'a>(
        &'a self,
        session: &'a Session,
        destination: &'a Destination,
        body: &'a MessageText,
    ) -> BoxFuture<'a, Result<DeliveryReceipt, GoogleVoiceError>> {
        Box::pin(self.send_sms(session, destination, body))
    }
}

fn success_body(response: HttpResponse) -> Result<String, GoogleVoiceError> {
    if !(200..=299).contains(&response.status) {
        let body = if response.body.trim().is_empty() {
            None
        } else {
            Some(response.body)
        };
        return Err(GoogleVoiceError::HttpStatus {
            status: response.status,
            body,
        });
    }
    Ok(response.body)
}
