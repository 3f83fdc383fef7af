//! Client against a throwaway local HTTP responder.

use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use wbi_africa::error::FetchError;
use wbi_africa::fetch::{IndicatorFetcher, IndicatorSource};
use wbi_africa::{Client, Config};

/// Serve every connection with `respond(request_target) -> (status, body)`.
/// Returns the base URL and the list of request targets seen so far.
fn serve<F>(respond: F) -> (String, Arc<Mutex<Vec<String>>>)
where
    F: Fn(&str) -> (u16, String) + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let seen_cl = Arc::clone(&seen);

    thread::spawn(move || {
        for stream in listener.incoming() {
            let Ok(mut stream) = stream else { break };
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut request_line = String::new();
            if reader.read_line(&mut request_line).is_err() {
                continue;
            }
            // drain headers
            let mut line = String::new();
            while reader.read_line(&mut line).map(|n| n > 2).unwrap_or(false) {
                line.clear();
            }
            let target = request_line
                .split_whitespace()
                .nth(1)
                .unwrap_or("")
                .to_string();
            seen_cl.lock().unwrap().push(target.clone());

            let (status, body) = respond(&target);
            let reason = if status == 200 { "OK" } else { "Error" };
            let resp = format!(
                "HTTP/1.1 {status} {reason}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            let _ = stream.write_all(resp.as_bytes());
            let _ = stream.flush();
        }
    });

    (format!("http://{addr}"), seen)
}

fn client(base_url: &str) -> Client {
    let cfg = Config {
        base_url: base_url.to_string(),
        per_page: 2,
        timeout_secs: 5,
        connect_timeout_secs: 2,
        ..Config::default()
    };
    Client::from_config(&cfg).unwrap()
}

#[test]
fn follows_pages_and_merges_sorted() {
    let (base, seen) = serve(|target| {
        let body = if target.contains("page=2") {
            r#"[{"page":2,"pages":2,"per_page":"2","total":3},[{"date":"2018","value":12.0}]]"#
        } else {
            r#"[{"page":1,"pages":2,"per_page":"2","total":3},[{"date":"2020","value":30.0},{"date":"2019","value":null}]]"#
        };
        (200, body.to_string())
    });

    let series = client(&base).fetch_series("KEN", "IT.NET.USER.ZS").unwrap();
    let years: Vec<i32> = series.points().iter().map(|p| p.year).collect();
    assert_eq!(years, [2018, 2020]);

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 2);
    assert!(seen[0].starts_with("/country/KEN/indicator/IT.NET.USER.ZS?"));
    assert!(seen[0].contains("format=json"));
    assert!(seen[0].contains("per_page=2"));
}

#[test]
fn http_error_status_is_reported() {
    let (base, _) = serve(|_| (404, "not found".to_string()));
    let err = client(&base)
        .fetch_series("KEN", "IT.NET.USER.ZS")
        .unwrap_err();
    assert!(matches!(err, FetchError::Status(404)));
}

#[test]
fn malformed_body_is_a_decode_error() {
    let (base, _) = serve(|_| (200, "<html>maintenance</html>".to_string()));
    let err = client(&base)
        .fetch_series("KEN", "IT.NET.USER.ZS")
        .unwrap_err();
    assert!(matches!(err, FetchError::Decode(_)));
}

#[test]
fn fetcher_swallows_server_errors() {
    let hits = Arc::new(AtomicUsize::new(0));
    let hits_cl = Arc::clone(&hits);
    let (base, _) = serve(move |_| {
        hits_cl.fetch_add(1, Ordering::SeqCst);
        (500, "boom".to_string())
    });
    let fetcher = IndicatorFetcher::new(client(&base));
    assert!(fetcher.fetch("NGA", "IT.NET.USER.ZS").is_empty());
    assert!(fetcher.fetch("NGA", "IT.NET.USER.ZS").is_empty());
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[test]
fn max_pages_caps_the_walk() {
    let (base, seen) = serve(|_| {
        (
            200,
            r#"[{"page":1,"pages":9,"per_page":"2","total":18},[{"date":"2020","value":1.0}]]"#
                .to_string(),
        )
    });
    let cfg = Config {
        base_url: base,
        max_pages: 3,
        ..Config::default()
    };
    let series = Client::from_config(&cfg)
        .unwrap()
        .fetch_series("GHA", "IT.NET.USER.ZS")
        .unwrap();
    assert_eq!(series.len(), 3);
    assert_eq!(seen.lock().unwrap().len(), 3);
}

#[test]
fn base_url_trailing_slash_is_trimmed() {
    let c = client("http://127.0.0.1:9/v2/");
    assert_eq!(
        c.series_url("ZAF", "IT.NET.USER.ZS", 1),
        "http://127.0.0.1:9/v2/country/ZAF/indicator/IT.NET.USER.ZS?format=json&per_page=2&page=1"
    );
}
