//! Integration tests for the chain engine
//!
//! These tests use wiremock to create mock HTTP servers and run full chains
//! through the real HTTP fetcher and HTML extractor.

use getter::config::{parse_config, StepDescriptor};
use getter::crawler::{crawl, DelayPolicy, HtmlExtractor, HttpFetcher, Sequencer};
use getter::GetterError;
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PAGE: &str = r#"
<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <title></title>
</head>
<body>
  hello mock server
</body>
</html>
"#;

fn sequencer() -> Sequencer<HttpFetcher, HtmlExtractor> {
    let fetcher = HttpFetcher::new(Duration::from_secs(5)).expect("Failed to build client");
    Sequencer::new(fetcher, HtmlExtractor, DelayPolicy::disabled())
}

async fn mount_page(server: &MockServer, at: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(at))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html"),
        )
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_meta_charset_propagates_to_next_step() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(&server, "/index", PAGE).await;
    mount_page(&server, "/final/utf-8", "done").await;

    let dir = TempDir::new().unwrap();
    let out = dir.path().join("final.html");

    let steps = vec![
        StepDescriptor {
            elem: "meta".to_string(),
            attr: "charset".to_string(),
            ..StepDescriptor::new(format!("{}/index", base))
        },
        StepDescriptor {
            out: out.to_string_lossy().into_owned(),
            ..StepDescriptor::new(format!("{}/final", base))
        },
    ];

    let written = sequencer().run(&steps).await.expect("Chain failed");

    assert_eq!(written, Some(out.clone()));
    assert_eq!(std::fs::read_to_string(&out).unwrap(), "done");
}

#[tokio::test]
async fn test_grep_selects_link_basename() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(
        &server,
        "/releases",
        r#"<html><body>
            <a href="/releases/tag/v1.0.0/notes.html">notes</a>
            <a href="/downloads/app-1.0.0.tar.gz">tarball</a>
            <a href="/downloads/app-0.9.0.tar.gz">old tarball</a>
        </body></html>"#,
    )
    .await;
    mount_page(&server, "/files/app-1.0.0.tar.gz", "tarball bytes").await;

    let dir = TempDir::new().unwrap();
    let steps = vec![
        StepDescriptor {
            elem: "a".to_string(),
            attr: "href".to_string(),
            grep: ".tar.gz".to_string(),
            ..StepDescriptor::new(format!("{}/releases", base))
        },
        StepDescriptor {
            outdir: dir.path().to_string_lossy().into_owned(),
            ..StepDescriptor::new(format!("{}/files", base))
        },
    ];

    let written = sequencer().run(&steps).await.expect("Chain failed");

    let expected = dir.path().join("app-1.0.0.tar.gz");
    assert_eq!(written, Some(expected.clone()));
    assert_eq!(std::fs::read(&expected).unwrap(), b"tarball bytes");
}

#[tokio::test]
async fn test_failed_step_keeps_earlier_output() {
    let server = MockServer::start().await;
    mount_page(&server, "/first", PAGE).await;

    // A port with nothing listening behind it
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let dead = format!("http://{}/second", listener.local_addr().unwrap());
    drop(listener);

    let dir = TempDir::new().unwrap();
    let out = dir.path().join("first.html");

    let steps = vec![
        StepDescriptor {
            out: out.to_string_lossy().into_owned(),
            ..StepDescriptor::new(format!("{}/first", server.uri()))
        },
        StepDescriptor::new(dead.clone()),
    ];

    let err = sequencer().run(&steps).await.unwrap_err();

    match err {
        GetterError::Http { url, .. } => assert_eq!(url, dead),
        other => panic!("Expected network error, got {:?}", other),
    }
    assert_eq!(std::fs::read_to_string(&out).unwrap(), PAGE);
}

#[tokio::test]
async fn test_error_status_body_is_saved() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(500).set_body_string("server trouble"))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let out = dir.path().join("gone.txt");
    let step = StepDescriptor {
        out: out.to_string_lossy().into_owned(),
        ..StepDescriptor::new(format!("{}/gone", server.uri()))
    };

    sequencer().run(&[step]).await.expect("Chain failed");

    assert_eq!(std::fs::read_to_string(&out).unwrap(), "server trouble");
}

#[tokio::test]
async fn test_write_into_missing_directory_fails() {
    let server = MockServer::start().await;
    mount_page(&server, "/page", PAGE).await;

    let dir = TempDir::new().unwrap();
    let step = StepDescriptor {
        outdir: dir.path().join("missing").to_string_lossy().into_owned(),
        ..StepDescriptor::new(format!("{}/page", server.uri()))
    };

    let err = sequencer().run(&[step]).await.unwrap_err();
    assert!(matches!(err, GetterError::Output { .. }));
}

#[tokio::test]
async fn test_crawl_from_config() {
    let server = MockServer::start().await;
    mount_page(&server, "/start", r#"<a href="next-page">next</a>"#).await;
    mount_page(&server, "/pages/next-page", "end of chain").await;

    let dir = TempDir::new().unwrap();
    let out = dir.path().join("end.txt");

    let config = parse_config(&format!(
        r#"
[crawl]
timeout = 5
delay = false

[[step]]
url = "{base}/start"
elem = "a"
attr = "href"

[[step]]
url = "{base}/pages"
out = "{out}"
"#,
        base = server.uri(),
        out = out.to_string_lossy().replace('\\', "\\\\"),
    ))
    .expect("Invalid config");

    let written = crawl(&config).await.expect("Crawl failed");

    assert_eq!(written, Some(out.clone()));
    assert_eq!(std::fs::read_to_string(&out).unwrap(), "end of chain");
}
