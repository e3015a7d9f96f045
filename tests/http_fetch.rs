use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use player_stats_terminal::config::Category;
use player_stats_terminal::fetch::{FetchError, HttpStatsSource, StatsSource};
use player_stats_terminal::provider::{self, Delta, ProviderCommand};
use player_stats_terminal::record::PlayerRecord;

/// Serves one canned response per accepted connection and reports the request
/// line it saw.
fn serve(responses: Vec<(u16, &'static str)>) -> (String, mpsc::Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind stub server");
    let addr = listener.local_addr().expect("local addr");
    let (seen_tx, seen_rx) = mpsc::channel();
    thread::spawn(move || {
        for (status, body) in responses {
            let Ok((mut stream, _)) = listener.accept() else {
                return;
            };
            let mut buf = [0u8; 4096];
            let n = stream.read(&mut buf).unwrap_or(0);
            let request = String::from_utf8_lossy(&buf[..n]).to_string();
            let line = request.lines().next().unwrap_or_default().to_string();
            let _ = seen_tx.send(line);
            let reply = format!(
                "HTTP/1.1 {status} X\r\n\
                 Content-Type: application/json\r\n\
                 Content-Length: {}\r\n\
                 Connection: close\r\n\r\n{body}",
                body.len()
            );
            let _ = stream.write_all(reply.as_bytes());
        }
    });
    (format!("http://{addr}"), seen_rx)
}

#[test]
fn fetches_records_from_endpoint() {
    let (base, seen) = serve(vec![(
        200,
        r#"[{"name":"Byron Buxton","avg":".290","hr":28,"ops":".850"}]"#,
    )]);
    let source = HttpStatsSource::new(format!("{base}/"), None);
    let rows = source.fetch("hitters").expect("fetch should succeed");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].display("hr").as_deref(), Some("28"));
    assert_eq!(seen.recv().unwrap(), "GET /hitters HTTP/1.1");
}

#[test]
fn non_success_status_is_http_error() {
    let (base, _seen) = serve(vec![(500, "oops")]);
    let source = HttpStatsSource::new(base, None);
    let err = source.fetch("pitchers").unwrap_err();
    assert!(matches!(err, FetchError::Http { status: 500 }));
}

#[test]
fn malformed_body_is_decode_error() {
    let (base, _seen) = serve(vec![(200, "{not json")]);
    let source = HttpStatsSource::new(base, None);
    let err = source.fetch("hitters").unwrap_err();
    assert!(matches!(err, FetchError::Decode(_)));
}

#[test]
fn unreachable_host_is_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let source = HttpStatsSource::new(format!("http://{addr}"), None);
    let err = source.fetch("hitters").unwrap_err();
    assert!(matches!(err, FetchError::Transport(_)));
}

#[test]
fn worker_reports_each_category() {
    let source = |endpoint: &str| -> Result<Vec<PlayerRecord>, FetchError> {
        match endpoint {
            "hitters" => Ok(Vec::new()),
            _ => Err(FetchError::Http { status: 503 }),
        }
    };
    let (tx, rx) = mpsc::channel();
    let (cmd_tx, cmd_rx) = mpsc::channel();
    provider::spawn_fetch_worker(Arc::new(source), tx, cmd_rx);

    for category in [Category::Hitters, Category::Pitchers] {
        cmd_tx.send(ProviderCommand::Fetch { category }).unwrap();
    }

    let mut hitters_ok = false;
    let mut pitchers_failed = false;
    for _ in 0..2 {
        let Delta::Fetched { category, result } =
            rx.recv_timeout(Duration::from_secs(5)).expect("delta");
        match category {
            Category::Hitters => hitters_ok = result.is_ok(),
            Category::Pitchers => {
                pitchers_failed = matches!(result, Err(FetchError::Http { status: 503 }))
            }
        }
    }
    assert!(hitters_ok);
    assert!(pitchers_failed);
}
