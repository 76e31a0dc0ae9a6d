use std::fs;
use std::path::PathBuf;

use rfenhance::{EmbeddedConfigRenderer, EnhancerConfig, NoopChartRenderer};
use sha2::{Digest, Sha256};

fn golden_path(name: &str) -> PathBuf {
    let mut p = PathBuf::from("tests/goldens/expected");
    p.push(name);
    p
}

fn fixture() -> String {
    fs::read_to_string("tests/fixtures/recommendation.html").expect("read fixture")
}

fn enhanced_digest() -> String {
    let html = rfenhance::enhance_html(&fixture(), EnhancerConfig::default(), &EmbeddedConfigRenderer)
        .expect("enhance fixture");
    hex::encode(Sha256::digest(html.as_bytes()))
}

#[test]
fn enhanced_output_is_deterministic() {
    assert_eq!(enhanced_digest(), enhanced_digest());
}

#[test]
fn golden_output_matches_fixture() {
    let html = rfenhance::enhance_html(&fixture(), EnhancerConfig::default(), &NoopChartRenderer)
        .expect("enhance fixture");

    let expected_path = golden_path("recommendation.html");
    if std::env::var("UPDATE_GOLDENS").is_ok() {
        fs::create_dir_all("tests/goldens/expected").ok();
        fs::write(&expected_path, &html).expect("write golden");
        println!("Updated golden: {:?}", expected_path);
        return;
    }

    let expected = fs::read_to_string(&expected_path).expect("unable to read golden");
    assert_eq!(html, expected.trim_end());
}
