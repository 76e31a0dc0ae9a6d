use criterion::{criterion_group, criterion_main, Criterion};
use rfenhance::{EmbeddedConfigRenderer, EnhancerConfig, NoopChartRenderer, Page};

fn report_page(bars: usize) -> String {
    let mut body = String::new();
    for i in 0..bars {
        body.push_str(&format!(
            r#"<div class="score-bar"><div class="score-fill" data-value="{}"></div></div>"#,
            i % 101
        ));
        body.push_str(r#"<div class="chart-container"><img data-base64="iVBORw0KGgo="></div>"#);
    }
    format!(
        r#"<html><head><title>Bench</title></head><body>{}<canvas id="materialChart" data-labels='["A","B","C"]' data-suitability='[1,2,3]' data-thermal='[4,5,6]' data-cost='[7,8,9]'></canvas><button id="download-pdf-btn" data-url="/download_pdf">PDF</button></body></html>"#,
        body
    )
}

fn bench_on_ready(c: &mut Criterion) {
    let html = report_page(50);
    c.bench_function("on_ready_50_bars", |b| {
        b.iter(|| {
            let mut page = Page::from_html(&html, None, EnhancerConfig::default()).unwrap();
            page.on_ready(&NoopChartRenderer).unwrap();
        })
    });
}

fn bench_enhance_html(c: &mut Criterion) {
    let html = report_page(50);
    c.bench_function("enhance_html_50_bars", |b| {
        b.iter(|| {
            let _ = rfenhance::enhance_html(&html, EnhancerConfig::default(), &EmbeddedConfigRenderer).unwrap();
        })
    });
}

criterion_group!(benches, bench_on_ready, bench_enhance_html);
criterion_main!(benches);
