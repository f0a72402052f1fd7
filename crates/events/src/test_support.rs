//! In-memory fakes and throwaway local servers for unit tests.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use async_trait::async_trait;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::Router;
use helpdesk_core::channels::Channel;
use helpdesk_core::recipient::{DeliveryTarget, Recipient};
use helpdesk_core::template::OutboundMessage;
use helpdesk_core::ticket::TicketSnapshot;
use helpdesk_core::types::DbId;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use crate::delivery::Notifier;
use crate::ports::{DirectoryError, SettingsError, SettingsSource, TicketDirectory};

// ---------------------------------------------------------------------------
// Logs
// ---------------------------------------------------------------------------

/// Collects formatted log lines emitted on the current thread.
#[derive(Clone, Default)]
pub struct LogCapture(Arc<Mutex<Vec<u8>>>);

impl LogCapture {
    /// Install as the thread's default subscriber until the guard drops.
    pub fn install(&self) -> tracing::subscriber::DefaultGuard {
        let writer = self.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::DEBUG)
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl std::io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// Mutable settings map that counts reads.
#[derive(Default)]
pub struct StaticSettings {
    values: RwLock<HashMap<String, String>>,
    loads: AtomicUsize,
}

impl StaticSettings {
    pub fn from_pairs(pairs: &[(&str, &str)]) -> Arc<Self> {
        let values = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Arc::new(Self {
            values: RwLock::new(values),
            loads: AtomicUsize::new(0),
        })
    }

    pub fn set(&self, key: &str, value: &str) {
        self.values
            .write()
            .unwrap()
            .insert(key.to_string(), value.to_string());
    }

    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SettingsSource for StaticSettings {
    async fn load(&self, keys: &[&str]) -> Result<HashMap<String, String>, SettingsError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        let values = self.values.read().unwrap();
        Ok(keys
            .iter()
            .filter_map(|k| values.get(*k).map(|v| (k.to_string(), v.clone())))
            .collect())
    }
}

// ---------------------------------------------------------------------------
// Directory
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct FakeDirectory {
    pub tickets: HashMap<DbId, TicketSnapshot>,
    pub recipients: HashMap<DbId, Recipient>,
    pub fail: bool,
}

impl FakeDirectory {
    pub fn with(ticket: TicketSnapshot, recipient: Recipient) -> Self {
        let mut directory = Self::default();
        directory.tickets.insert(ticket.id, ticket);
        directory.recipients.insert(recipient.id, recipient);
        directory
    }
}

#[async_trait]
impl TicketDirectory for FakeDirectory {
    async fn ticket(&self, ticket_id: DbId) -> Result<Option<TicketSnapshot>, DirectoryError> {
        if self.fail {
            return Err(DirectoryError::Unavailable("fake outage".to_string()));
        }
        Ok(self.tickets.get(&ticket_id).cloned())
    }

    async fn recipient(&self, user_id: DbId) -> Result<Option<Recipient>, DirectoryError> {
        if self.fail {
            return Err(DirectoryError::Unavailable("fake outage".to_string()));
        }
        Ok(self.recipients.get(&user_id).cloned())
    }
}

// ---------------------------------------------------------------------------
// Notifiers
// ---------------------------------------------------------------------------

pub type Sent = Arc<Mutex<Vec<(DeliveryTarget, OutboundMessage)>>>;

/// Records every send instead of delivering it.
pub struct RecordingNotifier {
    channel: Channel,
    pub sent: Sent,
}

impl RecordingNotifier {
    pub fn new(channel: Channel) -> Arc<Self> {
        Arc::new(Self {
            channel,
            sent: Sent::default(),
        })
    }

    pub fn sent(&self) -> Vec<(DeliveryTarget, OutboundMessage)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    fn channel(&self) -> Channel {
        self.channel
    }

    async fn send(&self, target: DeliveryTarget, message: OutboundMessage) {
        self.sent.lock().unwrap().push((target, message));
    }
}

/// Panics on every send.
pub struct PanickingNotifier(pub Channel);

#[async_trait]
impl Notifier for PanickingNotifier {
    fn channel(&self) -> Channel {
        self.0
    }

    async fn send(&self, _target: DeliveryTarget, _message: OutboundMessage) {
        panic!("{} sender blew up", self.0);
    }
}

// ---------------------------------------------------------------------------
// Local servers
// ---------------------------------------------------------------------------

/// A port nothing is listening on.
pub async fn unused_local_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap().port()
}

/// Minimal scripted SMTP server accepting one session.
///
/// Advertises `AUTH PLAIN LOGIN`; `accept_auth` decides between 235 and
/// 535. The handle resolves to every line the client sent once the client
/// disconnects.
pub async fn spawn_smtp_peer(accept_auth: bool) -> (SocketAddr, JoinHandle<Vec<String>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = tokio::spawn(async move {
        let mut transcript = Vec::new();
        let Ok((stream, _)) = listener.accept().await else {
            return transcript;
        };
        let (read, mut write) = stream.into_split();
        let mut lines = BufReader::new(read).lines();

        if write.write_all(b"220 localhost ESMTP test\r\n").await.is_err() {
            return transcript;
        }

        let mut in_data = false;
        while let Ok(Some(line)) = lines.next_line().await {
            transcript.push(line.clone());

            let reply = if in_data {
                if line != "." {
                    continue;
                }
                in_data = false;
                "250 2.0.0 Queued"
            } else {
                let verb = line
                    .split_whitespace()
                    .next()
                    .unwrap_or("")
                    .to_ascii_uppercase();
                match verb.as_str() {
                    "EHLO" | "HELO" => "250-localhost\r\n250 AUTH PLAIN LOGIN",
                    "AUTH" if accept_auth => "235 2.7.0 Authentication successful",
                    "AUTH" => "535 5.7.8 Authentication credentials invalid",
                    "DATA" => {
                        in_data = true;
                        "354 End data with <CR><LF>.<CR><LF>"
                    }
                    "QUIT" => "221 2.0.0 Bye",
                    _ => "250 2.0.0 OK",
                }
            };

            let closing = reply.starts_with("221");
            if write.write_all(format!("{reply}\r\n").as_bytes()).await.is_err() || closing {
                break;
            }
        }
        transcript
    });

    (addr, handle)
}

/// One request seen by the capture server.
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub body: String,
}

impl CapturedRequest {
    pub fn header(&self, name: &str) -> Option<String> {
        self.headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    }
}

/// HTTP server that records every request and answers with one status.
pub struct CaptureServer {
    pub base_url: String,
    requests: Arc<Mutex<Vec<CapturedRequest>>>,
}

impl CaptureServer {
    pub fn requests(&self) -> Vec<CapturedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[derive(Clone)]
struct CaptureState {
    status: StatusCode,
    requests: Arc<Mutex<Vec<CapturedRequest>>>,
}

async fn capture(
    State(state): State<CaptureState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> StatusCode {
    state.requests.lock().unwrap().push(CapturedRequest {
        method: method.to_string(),
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        headers,
        body,
    });
    state.status
}

pub async fn spawn_capture_server(status: u16) -> CaptureServer {
    let requests = Arc::new(Mutex::new(Vec::new()));
    let state = CaptureState {
        status: StatusCode::from_u16(status).unwrap(),
        requests: Arc::clone(&requests),
    };
    let app = Router::new().fallback(capture).with_state(state);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    CaptureServer {
        base_url: format!("http://{addr}"),
        requests,
    }
}
