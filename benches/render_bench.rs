use std::path::Path;

use criterion::{criterion_group, criterion_main, Criterion};
use linkcard::rendering::Template;
use linkcard::services::MemoryFetcher;
use linkcard::{CardRenderer, EmbeddedImage, Post, RenderOptions};

fn templates() -> &'static Path {
    Path::new(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/templates"))
}

fn bench_template_parse(c: &mut Criterion) {
    let source = std::fs::read_to_string(templates().join("media/light.svg"))
        .expect("fixture template");

    c.bench_function("parse_media_template", |b| {
        b.iter(|| Template::parse("media/light.svg", &source))
    });
}

fn bench_render_post(c: &mut Criterion) {
    let post = Post::parse(
        r#"{"url": "https://example.com/p/1", "text": "Bench",
            "author": {"first_name": "Ada", "last_name": "Lovelace", "profile_picture": "a"},
            "posted_at": {"timestamp": 1, "relative": "3h"},
            "stats": {"total_reactions": 1, "comments": 1},
            "media": {"type": "images", "images": ["x", "y", "z", "w"]}}"#,
    )
    .expect("bench post");

    let mut fetcher = MemoryFetcher::new();
    for url in ["a", "x", "y", "z", "w"] {
        fetcher.insert(url, EmbeddedImage::from_bytes("image/png", &[0u8; 2048]));
    }
    let renderer = CardRenderer::new(fetcher);
    let options = RenderOptions::default();
    let out = tempfile::tempdir().expect("tempdir");
    let rt = tokio::runtime::Runtime::new().expect("runtime");

    c.bench_function("render_gallery_post", |b| {
        b.iter(|| {
            rt.block_on(renderer.render_post(&post, out.path(), templates(), &options))
                .unwrap()
        })
    });
}

criterion_group!(benches, bench_template_parse, bench_render_post);
criterion_main!(benches);
