mod support_single;

use std::process::Output;

use support_single::{run_hammer, spawn_http_server};

fn describe(output: &Output) -> String {
    format!(
        "stdout: {}\nstderr: {}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    )
}

#[test]
fn e2e_bounded_run_reports_progress() -> Result<(), String> {
    let (url, _server) = spawn_http_server("200 OK")?;

    let output = run_hammer(["-c", "4", "-n", "20", url.as_str()])?;
    if !output.status.success() {
        return Err(describe(&output));
    }
    let stdout = String::from_utf8_lossy(&output.stdout);
    if !stdout.contains("max concurrent requests: 4") {
        return Err(format!("Missing startup line\n{}", describe(&output)));
    }
    if !stdout.contains("Completed 20 total requests") {
        return Err(format!("Missing final progress line\n{}", describe(&output)));
    }
    if stdout.contains("Received non-200 response") {
        return Err(format!("Unexpected warning\n{}", describe(&output)));
    }
    Ok(())
}

#[test]
fn e2e_unexpected_status_warns_per_request() -> Result<(), String> {
    let (url, _server) = spawn_http_server("503 Service Unavailable")?;

    let output = run_hammer(["-c", "2", "-n", "5", url.as_str(), url.as_str()])?;
    if !output.status.success() {
        return Err(describe(&output));
    }
    let stdout = String::from_utf8_lossy(&output.stdout);
    let warnings = stdout.matches("Received non-200 response: 503").count();
    if warnings != 5 {
        return Err(format!("Expected 5 warnings, got {}\n{}", warnings, describe(&output)));
    }
    Ok(())
}

#[test]
fn e2e_missing_url_is_usage_error() -> Result<(), String> {
    let output = run_hammer(["-c", "2"])?;
    if output.status.success() {
        return Err(format!("Expected failure\n{}", describe(&output)));
    }
    let stderr = String::from_utf8_lossy(&output.stderr);
    if !stderr.contains("Must specify at least one url") {
        return Err(format!("Missing usage error\n{}", describe(&output)));
    }
    if !(stderr.contains("--concurrency") && stderr.contains("[default: 0]")) {
        return Err(format!("Expected flag help with defaults\n{}", describe(&output)));
    }
    Ok(())
}

#[test]
fn e2e_refused_connection_is_reported_not_fatal() -> Result<(), String> {
    let listener = std::net::TcpListener::bind("127.0.0.1:0")
        .map_err(|err| format!("bind failed: {}", err))?;
    let addr = listener
        .local_addr()
        .map_err(|err| format!("addr failed: {}", err))?;
    drop(listener);
    let url = format!("http://{}/", addr);

    let output = run_hammer(["-c", "1", "-n", "3", url.as_str()])?;
    if !output.status.success() {
        return Err(describe(&output));
    }
    let stdout = String::from_utf8_lossy(&output.stdout);
    let failures = stdout.matches(&format!("Get \"{}\"", url)).count();
    if failures != 3 {
        return Err(format!("Expected 3 error lines, got {}\n{}", failures, describe(&output)));
    }
    Ok(())
}
