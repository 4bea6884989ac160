use crate::core::app::App;
use crate::core::dispatcher::RequestDispatcher;
use crate::core::mode::Mode;
use crate::core::session::SessionStore;
use crate::core::storage::MemoryStorage;
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Mutex;

pub const TEST_STORAGE_KEY: &str = "flavaAI_chatHistory";

#[derive(Clone, Debug)]
pub struct CapturedRequest {
    pub request_line: String,
    pub content_type: String,
    pub body: Vec<u8>,
}

#[derive(Clone, Debug)]
pub struct MockReply {
    pub status: u16,
    pub body: String,
}

impl MockReply {
    pub fn json(status: u16, body: &str) -> Self {
        Self {
            status,
            body: body.to_string(),
        }
    }
}

pub struct MockBackend {
    route: String,
    captured: Arc<Mutex<Vec<CapturedRequest>>>,
}

impl MockBackend {
    pub fn route(&self) -> String {
        self.route.clone()
    }

    pub async fn requests(&self) -> Vec<CapturedRequest> {
        self.captured.lock().await.clone()
    }
}

/// Client that ignores proxy settings from the environment.
pub fn test_client() -> reqwest::Client {
    reqwest::Client::builder()
        .no_proxy()
        .build()
        .expect("test client should build")
}

/// Serve `replies` in order, one per connection, recording each request.
pub async fn spawn_mock_backend(replies: Vec<MockReply>) -> MockBackend {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("listener should bind");
    let addr = listener.local_addr().expect("local addr should resolve");
    let captured: Arc<Mutex<Vec<CapturedRequest>>> = Arc::new(Mutex::new(Vec::new()));
    let captured_for_server = Arc::clone(&captured);

    tokio::spawn(async move {
        for reply in replies {
            let (mut stream, _) = listener.accept().await.map_err(|err| err.to_string())?;
            let (request_line, headers, body) = read_http_request(&mut stream).await?;
            let content_type = headers
                .iter()
                .find(|(name, _)| name.eq_ignore_ascii_case("content-type"))
                .map(|(_, value)| value.clone())
                .unwrap_or_default();
            captured_for_server.lock().await.push(CapturedRequest {
                request_line,
                content_type,
                body,
            });

            let response = format!(
                "HTTP/1.1 {} {}\r\ncontent-type: application/json\r\nconnection: close\r\ncontent-length: {}\r\n\r\n{}",
                reply.status,
                reason_phrase(reply.status),
                reply.body.len(),
                reply.body
            );
            stream
                .write_all(response.as_bytes())
                .await
                .map_err(|err| err.to_string())?;
            stream.shutdown().await.map_err(|err| err.to_string())?;
        }
        Ok::<(), String>(())
    });

    MockBackend {
        route: format!("http://{addr}/api/routes/chat/"),
        captured,
    }
}

fn reason_phrase(status: u16) -> &'static str {
    match status {
        200 => "OK",
        400 => "Bad Request",
        404 => "Not Found",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "Unknown",
    }
}

type ParsedRequest = (String, Vec<(String, String)>, Vec<u8>);

async fn read_http_request(stream: &mut TcpStream) -> Result<ParsedRequest, String> {
    let mut buffer = Vec::new();
    let header_end = loop {
        let mut chunk = [0_u8; 1024];
        let read = stream
            .read(&mut chunk)
            .await
            .map_err(|err| err.to_string())?;
        if read == 0 {
            return Err("Unexpected EOF while reading HTTP headers".to_string());
        }
        buffer.extend_from_slice(&chunk[..read]);
        if let Some(pos) = buffer.windows(4).position(|window| window == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buffer[..header_end]).to_string();
    let mut lines = head.split("\r\n");
    let request_line = lines.next().unwrap_or_default().to_string();
    let mut headers = Vec::new();
    let mut content_length = 0_usize;
    for line in lines.filter(|line| !line.is_empty()) {
        let Some((name, value)) = line.split_once(':') else {
            continue;
        };
        let value = value.trim().to_string();
        if name.eq_ignore_ascii_case("content-length") {
            content_length = value.parse::<usize>().map_err(|err| err.to_string())?;
        }
        headers.push((name.to_string(), value));
    }

    let mut body = buffer[header_end..].to_vec();
    while body.len() < content_length {
        let mut chunk = vec![0_u8; content_length.saturating_sub(body.len())];
        let read = stream
            .read(&mut chunk)
            .await
            .map_err(|err| err.to_string())?;
        if read == 0 {
            return Err("Unexpected EOF while reading HTTP body".to_string());
        }
        body.extend_from_slice(&chunk[..read]);
    }
    body.truncate(content_length);

    Ok((request_line, headers, body))
}

/// App over in-memory storage. The returned handle sees everything persisted.
pub fn create_test_app(backend_route: &str) -> (App, MemoryStorage) {
    let storage = MemoryStorage::new();
    let session = SessionStore::load(Box::new(storage.clone()), TEST_STORAGE_KEY, Mode::Rag)
        .expect("in-memory session should load");
    let dispatcher = RequestDispatcher::with_client(test_client(), backend_route);
    (App::new(session, dispatcher), storage)
}
