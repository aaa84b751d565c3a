use std::sync::{Arc, Mutex};
use std::time::Duration;

use litemon::core::driver::{AttemptOutcome, HttpTransport, MirrorDownloadRace};
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Minimal HTTP/1.1 server: one request per connection, routed by path
async fn serve(listener: TcpListener, user_agents: Arc<Mutex<Vec<String>>>) {
    loop {
        let Ok((mut socket, _)) = listener.accept().await else {
            return;
        };
        let user_agents = Arc::clone(&user_agents);

        tokio::spawn(async move {
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                match socket.read(&mut buf).await {
                    Ok(0) | Err(_) => return,
                    Ok(n) => request.extend_from_slice(&buf[..n]),
                }
            }

            let request = String::from_utf8_lossy(&request).to_string();
            let path = request.split_whitespace().nth(1).unwrap_or("/").to_string();
            if let Some(ua) = request
                .lines()
                .find_map(|line| line.strip_prefix("user-agent: "))
            {
                user_agents.lock().unwrap().push(ua.trim().to_string());
            }

            let (status, body) = match path.as_str() {
                "/big" => ("200 OK", vec![b'x'; 2048]),
                "/small" => ("200 OK", vec![b'x'; 10]),
                "/hang" => {
                    tokio::time::sleep(Duration::from_secs(30)).await;
                    return;
                }
                _ => ("404 Not Found", b"not found".to_vec()),
            };

            let header = format!(
                "HTTP/1.1 {}\r\ncontent-length: {}\r\nconnection: close\r\n\r\n",
                status,
                body.len()
            );
            let _ = socket.write_all(header.as_bytes()).await;
            let _ = socket.write_all(&body).await;
            let _ = socket.shutdown().await;
        });
    }
}

#[tokio::test]
async fn test_http_mirrors_are_tried_in_order_until_one_is_valid() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    let user_agents = Arc::new(Mutex::new(Vec::new()));
    tokio::spawn(serve(listener, Arc::clone(&user_agents)));

    let client = reqwest::Client::builder()
        .user_agent("LiteMon-AutoUpdater")
        .no_proxy()
        .build()
        .unwrap();
    let temp_dir = TempDir::new().unwrap();
    let artifact = temp_dir.path().join("LiteMon_Driver.exe");
    let race = MirrorDownloadRace::new(HttpTransport::from_client(client), &artifact);

    let mirrors = vec![
        format!("{}/hang", base),
        format!("{}/missing", base),
        format!("{}/small", base),
        format!("{}/big", base),
        format!("{}/never-contacted", base),
    ];

    let download = race
        .fetch(&mirrors, Duration::from_millis(500), 1024)
        .await
        .unwrap();

    let outcomes: Vec<_> = download.attempts.iter().map(|a| a.outcome.clone()).collect();
    assert_eq!(
        outcomes,
        vec![
            AttemptOutcome::Timeout,
            AttemptOutcome::HttpError("HTTP 404".to_string()),
            AttemptOutcome::TooSmall { bytes: 10 },
            AttemptOutcome::Accepted { bytes: 2048 },
        ]
    );
    assert_eq!(download.url, mirrors[3]);
    assert_eq!(std::fs::read(&artifact).unwrap().len(), 2048);

    let user_agents = user_agents.lock().unwrap();
    assert!(user_agents.iter().all(|ua| ua == "LiteMon-AutoUpdater"));
    assert_eq!(user_agents.len(), 4);
}

#[tokio::test]
async fn test_unreachable_mirror_is_a_network_error() {
    // Bind then drop to get a port nothing listens on
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let temp_dir = TempDir::new().unwrap();
    let client = reqwest::Client::builder().no_proxy().build().unwrap();
    let race = MirrorDownloadRace::new(
        HttpTransport::from_client(client),
        temp_dir.path().join("driver.exe"),
    );

    let exhausted = race
        .fetch(&[format!("http://{}/driver.exe", addr)], Duration::from_secs(5), 1024)
        .await
        .unwrap_err();

    assert_eq!(exhausted.attempts.len(), 1);
    assert!(matches!(
        exhausted.attempts[0].outcome,
        AttemptOutcome::HttpError(_)
    ));
}
