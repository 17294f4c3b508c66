use super::*;
use crate::config::{RunConfig, Targets, build_header_map};
use futures_util::StreamExt;
use std::future::Future;
use std::io::{Read, Write};
use std::net::{Shutdown, TcpListener};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

fn run_async_test<F>(future: F) -> Result<(), String>
where
    F: Future<Output = Result<(), String>>,
{
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|err| format!("Failed to build runtime: {}", err))?;
    runtime.block_on(future)
}

/// Serves exactly one request with the given status and body, then hands the
/// raw request head back to the test.
fn serve_once(status_line: &'static str, body: &'static str) -> Result<(String, mpsc::Receiver<String>), String> {
    let listener = TcpListener::bind("127.0.0.1:0")
        .map_err(|err| format!("bind test server failed: {}", err))?;
    let addr = listener
        .local_addr()
        .map_err(|err| format!("server addr failed: {}", err))?;
    let (head_tx, head_rx) = mpsc::channel();

    thread::spawn(move || {
        let Ok((mut stream, _)) = listener.accept() else {
            return;
        };
        let mut buffer = [0u8; 4096];
        let read = stream.read(&mut buffer).unwrap_or(0);
        let head = String::from_utf8_lossy(buffer.get(..read).unwrap_or_default()).into_owned();
        drop(head_tx.send(head));
        let response = format!(
            "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status_line,
            body.len(),
            body
        );
        if stream.write_all(response.as_bytes()).is_err() {
            return;
        }
        drop(stream.flush());
        drop(stream.shutdown(Shutdown::Both));
    });

    Ok((format!("http://{}/probe", addr), head_rx))
}

fn config_for(url: &str) -> Result<RunConfig, String> {
    let targets = Targets::parse(&[url]).map_err(|err| err.to_string())?;
    Ok(RunConfig::new(targets))
}

#[test]
fn build_client_accepts_http2_and_timeouts() -> Result<(), String> {
    let mut config = config_for("http://localhost")?;
    config.http2 = true;
    config.request_timeout = Some(Duration::from_secs(5));
    config.connect_timeout = Some(Duration::from_secs(1));
    build_client(&config).map_err(|err| err.to_string())?;
    Ok(())
}

#[test]
fn reqwest_transport_returns_status_and_drainable_body() -> Result<(), String> {
    run_async_test(async {
        let (url, head_rx) = serve_once("503 Service Unavailable", "busy!")?;
        let config = config_for(&url)?;
        let transport = ReqwestTransport::from_config(&config).map_err(|err| err.to_string())?;
        let headers = build_header_map(&[
            ("X-Trace".to_owned(), "one".to_owned()),
            ("X-Trace".to_owned(), "two".to_owned()),
        ])
        .map_err(|err| err.to_string())?;

        let request = TransportRequest {
            url: config.targets.select(0).clone(),
            headers,
        };
        let mut response = transport
            .send(request)
            .await
            .map_err(|err| err.to_string())?;
        if response.status != 503 {
            return Err(format!("Expected 503, got {}", response.status));
        }

        let mut total: u64 = 0;
        while let Some(chunk) = response.body.next().await {
            total = total.saturating_add(chunk.map_err(|err| err.to_string())?);
        }
        if total != 5 {
            return Err(format!("Expected 5 body bytes, got {}", total));
        }

        let head = head_rx
            .recv_timeout(Duration::from_secs(2))
            .map_err(|err| format!("No request head: {}", err))?
            .to_ascii_lowercase();
        if !head.starts_with("get /probe") {
            return Err(format!("Unexpected request line: {}", head));
        }
        if !(head.contains("x-trace: one") && head.contains("x-trace: two")) {
            return Err(format!("Expected both header values: {}", head));
        }
        if head.contains("connection: close") {
            return Err("Request must not ask to close the connection".to_owned());
        }
        Ok(())
    })
}

#[test]
fn reqwest_transport_reports_connection_failure() -> Result<(), String> {
    run_async_test(async {
        let listener = TcpListener::bind("127.0.0.1:0")
            .map_err(|err| format!("bind failed: {}", err))?;
        let addr = listener
            .local_addr()
            .map_err(|err| format!("addr failed: {}", err))?;
        drop(listener);

        let url = format!("http://{}/", addr);
        let config = config_for(&url)?;
        let transport = ReqwestTransport::from_config(&config).map_err(|err| err.to_string())?;
        let request = TransportRequest {
            url: config.targets.select(0).clone(),
            headers: config.request_headers(),
        };
        match transport.send(request).await {
            Ok(response) => Err(format!("Expected failure, got {}", response.status)),
            Err(err) => {
                if err.to_string().contains(&addr.to_string()) {
                    Ok(())
                } else {
                    Err(format!("Error should name the target: {}", err))
                }
            }
        }
    })
}
