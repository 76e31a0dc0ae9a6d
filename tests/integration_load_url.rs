#![cfg(feature = "fetch")]

use rfenhance::{EnhancerConfig, Error, Page, RecordingChartRenderer};
use std::fs;
use tiny_http::{Response, Server};

#[test]
fn test_load_url_enhances_served_page() {
    let page_html = fs::read_to_string("tests/fixtures/recommendation.html").expect("read fixture");

    let server = Server::http("127.0.0.1:0").unwrap();
    let addr = server.server_addr();
    std::thread::spawn(move || {
        if let Ok(request) = server.recv() {
            let response = Response::from_string(page_html).with_header(
                "Content-Type: text/html; charset=utf-8"
                    .parse::<tiny_http::Header>()
                    .unwrap(),
            );
            let _ = request.respond(response);
        }
    });

    let url = format!("http://{}/recommendation?floor_count=12", addr);
    let mut page = Page::load_url(&url, EnhancerConfig::default()).expect("Failed to load URL");
    assert_eq!(page.location(), Some(url.as_str()));

    let charts = RecordingChartRenderer::new();
    let report = page.on_ready(&charts).expect("on_ready failed");
    assert_eq!(report.scores_filled, 2);
    assert_eq!(charts.charts().len(), 1);

    let nav = page.click("#download-pdf-btn").unwrap().expect("navigation");
    assert_eq!(nav.resolved, format!("http://{}/download_pdf", addr));

    let snap = page.text_snapshot();
    assert_eq!(snap.title, "Facade Material Recommendation");
    assert_eq!(snap.url, nav.resolved);
}

#[test]
fn test_load_url_reports_http_errors() {
    let server = Server::http("127.0.0.1:0").unwrap();
    let addr = server.server_addr();
    std::thread::spawn(move || {
        if let Ok(request) = server.recv() {
            let _ = request.respond(Response::from_string("PDF not found").with_status_code(404));
        }
    });

    let url = format!("http://{}/missing", addr);
    let res = Page::load_url(&url, EnhancerConfig::default());
    assert!(matches!(res, Err(Error::LoadError(_))));
}
