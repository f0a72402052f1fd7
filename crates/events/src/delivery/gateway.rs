//! Multi-service gateway delivery.
//!
//! A user's gateway URL names a service by its scheme and carries the
//! service's address and credentials in the rest of the URL:
//!
//! | Scheme                    | Request                                              |
//! |---------------------------|------------------------------------------------------|
//! | `json://`, `jsons://`     | POST JSON `{version, title, message, type}`          |
//! | `form://`, `forms://`     | POST form `title, message, type`                     |
//! | `ntfy://`, `ntfys://`     | POST body to `[host/]topic` with a `Title` header    |
//! | `gotify://`, `gotifys://` | POST JSON to `host[/path]/message?token=…`           |
//! | `discord://id/token`      | POST JSON `{content}` to the Discord webhook API     |
//! | `slack://a/b/c`           | POST JSON `{text}` to the Slack incoming webhook     |
//! | `pover://user@token`      | Pushover message API                                 |
//!
//! For the json, form, ntfy and gotify schemes, `user:password@` becomes
//! HTTP basic auth and any query string is kept on the request URL.
//!
//! URLs embed secrets, so only the scheme ever reaches the logs.

use async_trait::async_trait;
use helpdesk_core::channels::Channel;
use helpdesk_core::recipient::DeliveryTarget;
use helpdesk_core::template::OutboundMessage;
use reqwest::Url;

use crate::delivery::push::{PushError, PushSender};
use crate::delivery::{log_misrouted, Notifier};

/// ntfy server used when the URL names only a topic.
const NTFY_DEFAULT_HOST: &str = "ntfy.sh";

const DISCORD_WEBHOOK_BASE: &str = "https://discord.com/api/webhooks";
const SLACK_WEBHOOK_BASE: &str = "https://hooks.slack.com/services";

/// Gotify message priority for notifications.
const GOTIFY_PRIORITY: u8 = 5;

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Error type for gateway delivery failures.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// The URL is malformed or names no supported service.
    #[error("Invalid gateway URL: {0}")]
    InvalidUrl(&'static str),

    /// The underlying HTTP request failed (network, DNS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The service returned a non-2xx status code.
    #[error("Gateway service returned HTTP {0}")]
    HttpStatus(u16),

    /// Delivery through the push service failed.
    #[error(transparent)]
    Push(#[from] PushError),
}

// ---------------------------------------------------------------------------
// URL parsing
// ---------------------------------------------------------------------------

/// Basic auth credentials taken from a gateway URL's userinfo.
#[derive(Clone, PartialEq, Eq)]
pub struct BasicAuth {
    pub username: String,
    pub password: Option<String>,
}

impl BasicAuth {
    fn from_url(url: &Url) -> Option<Self> {
        if url.username().is_empty() {
            return None;
        }
        Some(Self {
            username: url.username().to_string(),
            password: url.password().map(str::to_string),
        })
    }
}

/// A parsed gateway URL: where to send and in which shape.
#[derive(Clone, PartialEq, Eq)]
pub enum GatewayRoute {
    Json { url: String, auth: Option<BasicAuth> },
    Form { url: String, auth: Option<BasicAuth> },
    Ntfy { url: String, auth: Option<BasicAuth> },
    Gotify { url: String, token: String, auth: Option<BasicAuth> },
    Discord { url: String },
    Slack { url: String },
    Pushover { user_key: String, api_token: String },
}

impl GatewayRoute {
    /// Service name, safe to log.
    pub fn service(&self) -> &'static str {
        match self {
            GatewayRoute::Json { .. } => "json",
            GatewayRoute::Form { .. } => "form",
            GatewayRoute::Ntfy { .. } => "ntfy",
            GatewayRoute::Gotify { .. } => "gotify",
            GatewayRoute::Discord { .. } => "discord",
            GatewayRoute::Slack { .. } => "slack",
            GatewayRoute::Pushover { .. } => "pover",
        }
    }
}

impl std::fmt::Debug for GatewayRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayRoute")
            .field("service", &self.service())
            .finish_non_exhaustive()
    }
}

/// Parse a gateway URL into a route.
pub fn parse_gateway_url(raw: &str) -> Result<GatewayRoute, GatewayError> {
    let url = Url::parse(raw.trim()).map_err(|_| GatewayError::InvalidUrl("malformed URL"))?;
    let host = url
        .host_str()
        .filter(|h| !h.is_empty())
        .ok_or(GatewayError::InvalidUrl("missing host"))?;
    let authority = match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    };
    let segments: Vec<&str> = url
        .path_segments()
        .map(|s| s.filter(|seg| !seg.is_empty()).collect())
        .unwrap_or_default();
    let auth = BasicAuth::from_url(&url);
    let query = url.query();

    let route = match url.scheme() {
        "json" | "jsons" => GatewayRoute::Json {
            url: http_url(url.scheme() == "jsons", &authority, &segments, query),
            auth,
        },
        "form" | "forms" => GatewayRoute::Form {
            url: http_url(url.scheme() == "forms", &authority, &segments, query),
            auth,
        },
        "ntfy" | "ntfys" => {
            let secure = url.scheme() == "ntfys";
            if segments.is_empty() {
                // `ntfy://topic` publishes to the public server.
                GatewayRoute::Ntfy {
                    url: http_url(true, NTFY_DEFAULT_HOST, &[host], query),
                    auth,
                }
            } else {
                GatewayRoute::Ntfy {
                    url: http_url(secure, &authority, &segments, query),
                    auth,
                }
            }
        }
        "gotify" | "gotifys" => {
            let (token, prefix) = segments
                .split_last()
                .ok_or(GatewayError::InvalidUrl("gotify URL needs an application token"))?;
            let mut path = prefix.to_vec();
            path.push("message");
            GatewayRoute::Gotify {
                url: http_url(url.scheme() == "gotifys", &authority, &path, query),
                token: (*token).to_string(),
                auth,
            }
        }
        "discord" => match segments.as_slice() {
            [token] => GatewayRoute::Discord {
                url: format!("{DISCORD_WEBHOOK_BASE}/{host}/{token}"),
            },
            _ => return Err(GatewayError::InvalidUrl("discord URL must be discord://id/token")),
        },
        "slack" => match segments.as_slice() {
            [b, c] => GatewayRoute::Slack {
                url: format!("{SLACK_WEBHOOK_BASE}/{host}/{b}/{c}"),
            },
            _ => return Err(GatewayError::InvalidUrl("slack URL must be slack://a/b/c")),
        },
        "pover" => {
            let user_key = url.username();
            if user_key.is_empty() {
                return Err(GatewayError::InvalidUrl("pover URL must be pover://user_key@api_token"));
            }
            GatewayRoute::Pushover {
                user_key: user_key.to_string(),
                api_token: host.to_string(),
            }
        }
        _ => return Err(GatewayError::InvalidUrl("unsupported scheme")),
    };

    Ok(route)
}

fn http_url(secure: bool, authority: &str, segments: &[&str], query: Option<&str>) -> String {
    let scheme = if secure { "https" } else { "http" };
    let mut url = format!("{scheme}://{authority}/{}", segments.join("/"));
    if let Some(query) = query.filter(|q| !q.is_empty()) {
        url.push('?');
        url.push_str(query);
    }
    url
}

fn post(client: &reqwest::Client, url: &str, auth: &Option<BasicAuth>) -> reqwest::RequestBuilder {
    let request = client.post(url);
    match auth {
        Some(auth) => request.basic_auth(&auth.username, auth.password.as_deref()),
        None => request,
    }
}

// ---------------------------------------------------------------------------
// GatewaySender
// ---------------------------------------------------------------------------

/// Sends notifications to the service named by a gateway URL.
pub struct GatewaySender {
    client: reqwest::Client,
    push: PushSender,
}

impl GatewaySender {
    /// `push` handles `pover://` URLs.
    pub fn new(client: reqwest::Client, push: PushSender) -> Self {
        Self { client, push }
    }

    /// Parse `gateway_url` and send one message to the service it names.
    pub async fn deliver(&self, gateway_url: &str, message: &OutboundMessage) -> Result<(), GatewayError> {
        let route = parse_gateway_url(gateway_url)?;
        let title = message.subject.as_str();
        let body = message.body.as_str();

        let request = match &route {
            GatewayRoute::Pushover { user_key, api_token } => {
                self.push.deliver(user_key, api_token, message).await?;
                tracing::info!(service = route.service(), "Gateway notification sent");
                return Ok(());
            }
            GatewayRoute::Json { url, auth } => {
                post(&self.client, url, auth).json(&serde_json::json!({
                    "version": "1.0",
                    "title": title,
                    "message": body,
                    "type": "info",
                }))
            }
            GatewayRoute::Form { url, auth } => post(&self.client, url, auth)
                .form(&[("title", title), ("message", body), ("type", "info")]),
            GatewayRoute::Ntfy { url, auth } => post(&self.client, url, auth)
                .header("Title", title)
                .body(body.to_string()),
            GatewayRoute::Gotify { url, token, auth } => post(&self.client, url, auth)
                .query(&[("token", token.as_str())])
                .json(&serde_json::json!({
                    "title": title,
                    "message": body,
                    "priority": GOTIFY_PRIORITY,
                })),
            GatewayRoute::Discord { url } => self
                .client
                .post(url)
                .json(&serde_json::json!({ "content": format!("**{title}**\n{body}") })),
            GatewayRoute::Slack { url } => self
                .client
                .post(url)
                .json(&serde_json::json!({ "text": format!("*{title}*\n{body}") })),
        };

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(GatewayError::HttpStatus(status.as_u16()));
        }

        tracing::info!(service = route.service(), "Gateway notification sent");
        Ok(())
    }
}

#[async_trait]
impl Notifier for GatewaySender {
    fn channel(&self) -> Channel {
        Channel::Gateway
    }

    async fn send(&self, target: DeliveryTarget, message: OutboundMessage) {
        let DeliveryTarget::Gateway { url } = &target else {
            log_misrouted(Channel::Gateway, &target);
            return;
        };

        if let Err(e) = self.deliver(url, &message).await {
            let scheme = url.split_once("://").map_or("<none>", |(scheme, _)| scheme);
            // reqwest errors can echo the request URL.
            let error = match e {
                GatewayError::Request(re) => re.without_url().to_string(),
                other => other.to_string(),
            };
            tracing::error!(scheme, title = %message.subject, error = %error, "Failed to send gateway notification");
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::delivery::http_client;
    use crate::test_support::spawn_capture_server;

    fn message() -> OutboundMessage {
        OutboundMessage::new("Gateway Test", "Your gateway notification settings have been updated.")
    }

    fn sender() -> GatewaySender {
        let client = http_client().unwrap();
        GatewaySender::new(client.clone(), PushSender::new(client))
    }

    #[test]
    fn parses_json_with_port_and_path() {
        let route = parse_gateway_url("json://hooks.local:8080/notify/in").unwrap();
        assert_eq!(
            route,
            GatewayRoute::Json {
                url: "http://hooks.local:8080/notify/in".to_string(),
                auth: None,
            }
        );
        let secure = parse_gateway_url("jsons://hooks.local/in").unwrap();
        assert_eq!(
            secure,
            GatewayRoute::Json {
                url: "https://hooks.local/in".to_string(),
                auth: None,
            }
        );
    }

    #[test]
    fn keeps_userinfo_and_query() {
        let route = parse_gateway_url("json://user:pw@hooks.local/in?foo=bar").unwrap();
        assert_eq!(
            route,
            GatewayRoute::Json {
                url: "http://hooks.local/in?foo=bar".to_string(),
                auth: Some(BasicAuth {
                    username: "user".to_string(),
                    password: Some("pw".to_string()),
                }),
            }
        );
    }

    #[test]
    fn ntfy_topic_only_uses_public_server() {
        let route = parse_gateway_url("ntfy://helpdesk-alerts").unwrap();
        assert_eq!(
            route,
            GatewayRoute::Ntfy {
                url: "https://ntfy.sh/helpdesk-alerts".to_string(),
                auth: None,
            }
        );
        let own = parse_gateway_url("ntfys://ntfy.internal/alerts").unwrap();
        assert_eq!(
            own,
            GatewayRoute::Ntfy {
                url: "https://ntfy.internal/alerts".to_string(),
                auth: None,
            }
        );
    }

    #[test]
    fn gotify_token_is_last_segment() {
        let route = parse_gateway_url("gotifys://push.example.com/gotify/AbCdEf").unwrap();
        assert_eq!(
            route,
            GatewayRoute::Gotify {
                url: "https://push.example.com/gotify/message".to_string(),
                token: "AbCdEf".to_string(),
                auth: None,
            }
        );
        assert_matches!(
            parse_gateway_url("gotify://push.example.com"),
            Err(GatewayError::InvalidUrl(_))
        );
    }

    #[test]
    fn parses_webhook_services() {
        assert_eq!(
            parse_gateway_url("discord://1234/tokenXYZ").unwrap(),
            GatewayRoute::Discord {
                url: "https://discord.com/api/webhooks/1234/tokenXYZ".to_string()
            }
        );
        assert_eq!(
            parse_gateway_url("slack://T000/B000/XXXX").unwrap(),
            GatewayRoute::Slack {
                url: "https://hooks.slack.com/services/T000/B000/XXXX".to_string()
            }
        );
        assert_matches!(
            parse_gateway_url("discord://1234"),
            Err(GatewayError::InvalidUrl(_))
        );
    }

    #[test]
    fn parses_pushover_credentials() {
        assert_eq!(
            parse_gateway_url("pover://ukey@atoken").unwrap(),
            GatewayRoute::Pushover {
                user_key: "ukey".to_string(),
                api_token: "atoken".to_string(),
            }
        );
        assert_matches!(
            parse_gateway_url("pover://atoken"),
            Err(GatewayError::InvalidUrl(_))
        );
    }

    #[test]
    fn rejects_unknown_and_malformed_urls() {
        assert_matches!(
            parse_gateway_url("bogus://x"),
            Err(GatewayError::InvalidUrl("unsupported scheme"))
        );
        assert_matches!(
            parse_gateway_url("not a url"),
            Err(GatewayError::InvalidUrl("malformed URL"))
        );
    }

    #[test]
    fn route_debug_hides_credentials() {
        let route = parse_gateway_url("pover://ukey@atoken").unwrap();
        let printed = format!("{route:?}");
        assert!(!printed.contains("atoken"));
        assert!(printed.contains("pover"));
    }

    #[tokio::test]
    async fn json_route_posts_payload() {
        let capture = spawn_capture_server(200).await;
        let url = capture.base_url.replacen("http://", "json://", 1) + "/hook";

        sender().deliver(&url, &message()).await.unwrap();

        let requests = capture.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].path, "/hook");
        let body: serde_json::Value = serde_json::from_str(&requests[0].body).unwrap();
        assert_eq!(body["title"], "Gateway Test");
        assert_eq!(body["type"], "info");
    }

    #[tokio::test]
    async fn json_route_sends_basic_auth_and_query() {
        let capture = spawn_capture_server(200).await;
        let url = capture.base_url.replacen("http://", "json://user:pw@", 1) + "/hook?foo=bar";

        sender().deliver(&url, &message()).await.unwrap();

        let requests = capture.requests();
        assert_eq!(requests[0].path, "/hook");
        assert_eq!(requests[0].query.as_deref(), Some("foo=bar"));
        // base64("user:pw")
        assert_eq!(
            requests[0].header("authorization").as_deref(),
            Some("Basic dXNlcjpwdw==")
        );
    }

    #[tokio::test]
    async fn ntfy_route_sets_title_header() {
        let capture = spawn_capture_server(200).await;
        let url = capture.base_url.replacen("http://", "ntfy://", 1) + "/alerts";

        sender().deliver(&url, &message()).await.unwrap();

        let requests = capture.requests();
        assert_eq!(requests[0].path, "/alerts");
        assert_eq!(requests[0].header("title").as_deref(), Some("Gateway Test"));
        assert_eq!(requests[0].body, message().body);
    }

    #[tokio::test]
    async fn gotify_route_passes_token_in_query() {
        let capture = spawn_capture_server(200).await;
        let url = capture.base_url.replacen("http://", "gotify://", 1) + "/tok123";

        sender().deliver(&url, &message()).await.unwrap();

        let requests = capture.requests();
        assert_eq!(requests[0].path, "/message");
        assert_eq!(requests[0].query.as_deref(), Some("token=tok123"));
        let body: serde_json::Value = serde_json::from_str(&requests[0].body).unwrap();
        assert_eq!(body["priority"], 5);
    }

    #[tokio::test]
    async fn pover_route_uses_push_sender() {
        let capture = spawn_capture_server(200).await;
        let client = http_client().unwrap();
        let push = PushSender::new(client.clone()).with_endpoint(capture.base_url.clone());
        let sender = GatewaySender::new(client, push);

        sender.deliver("pover://ukey@atoken", &message()).await.unwrap();

        let requests = capture.requests();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].body.contains("user=ukey"));
    }

    #[tokio::test]
    async fn rejected_delivery_is_http_status() {
        let capture = spawn_capture_server(503).await;
        let url = capture.base_url.replacen("http://", "form://", 1) + "/in";

        let result = sender().deliver(&url, &message()).await;
        assert_matches!(result, Err(GatewayError::HttpStatus(503)));
    }

    #[tokio::test]
    async fn send_swallows_invalid_url() {
        sender()
            .send(
                DeliveryTarget::Gateway {
                    url: "bogus://x".to_string(),
                },
                message(),
            )
            .await;
    }
}
