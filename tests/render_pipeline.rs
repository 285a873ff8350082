use std::io::Cursor;

use httpmock::prelude::*;
use newsreel::assets::font::load_fallback_font;
use newsreel::assets::store::AssetStore;
use newsreel::{
    CopyBundle, Fps, InMemorySink, Mood, MoodThemes, NewsItem, NewsreelError, RenderOpts, Renderer,
    SAFE_ZONE_Y, Skin, is_ffmpeg_on_path,
};
use rand::SeedableRng;
use rand::rngs::StdRng;

fn wide_jpeg_bytes() -> Vec<u8> {
    let img = image::RgbImage::from_fn(1600, 900, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, ((x * y) % 256) as u8])
    });
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Jpeg)
        .unwrap();
    buf
}

fn news_item(image_url: String) -> NewsItem {
    NewsItem {
        title: "Markets Rally After Rate Cut".to_string(),
        url: "https://example.com/markets".to_string(),
        image_url,
        source_name: "Reuters".to_string(),
        description: String::new(),
    }
}

fn tech_copy() -> CopyBundle {
    CopyBundle {
        mood: Mood::Tech,
        headline: "MARKETS SURGE ON RATE CUT".to_string(),
        summary: "Stocks jump as central bank lowers rates for third time this year.".to_string(),
    }
}

fn renderer(asset_root: &std::path::Path) -> Option<Renderer> {
    let store = AssetStore::new(asset_root, vec![]).unwrap();
    match Renderer::new(store, MoodThemes::default()) {
        Ok(r) => Some(r),
        Err(_) => {
            eprintln!("skipping: no system font available");
            None
        }
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

#[test]
fn http_404_aborts_with_image_unusable_and_no_output() {
    init_tracing();
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/gone.jpg");
        then.status(404);
    });

    let tmp = tempfile::tempdir().unwrap();
    let Some(renderer) = renderer(tmp.path()) else {
        return;
    };
    let out = tmp.path().join("final.mp4");
    let opts = RenderOpts::new(&out);

    let err = renderer
        .render_video(&news_item(server.url("/gone.jpg")), &tech_copy(), &opts)
        .unwrap_err();
    assert!(matches!(err, NewsreelError::ImageUnusable(_)), "{err}");
    assert!(!out.exists(), "failed job must leave no output file");
}

#[test]
fn garbage_image_body_aborts_with_image_unusable() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/noise.jpg");
        then.status(200).body(vec![0u8; 5000]);
    });

    let tmp = tempfile::tempdir().unwrap();
    let Some(renderer) = renderer(tmp.path()) else {
        return;
    };
    let opts = RenderOpts::new(tmp.path().join("final.mp4"));

    let err = renderer
        .render_video(&news_item(server.url("/noise.jpg")), &tech_copy(), &opts)
        .unwrap_err();
    assert!(matches!(err, NewsreelError::ImageUnusable(_)));
}

// Frame-level end-to-end without ffmpeg: normalize a real wide JPEG, compose
// the tech skin, animate, and collect frames in memory.
#[test]
fn wide_jpeg_becomes_portrait_frames_with_overlay() {
    let Ok(font) = load_fallback_font() else {
        eprintln!("skipping: no system font available");
        return;
    };

    let base = newsreel::normalize::normalize(&wide_jpeg_bytes()).unwrap();
    assert_eq!(base.dimensions(), (1080, 1920));

    let composer = newsreel::skin::SkinComposer::new(font);
    let themes = MoodThemes::default();
    let accent = themes.theme(Mood::Tech).accent;
    let mut rng = StdRng::seed_from_u64(7);
    let overlay = composer.compose(Skin::Classic, &tech_copy(), "Reuters", accent, &mut rng);

    // Tech accent (cyan) must appear in the overlay...
    let cyan = overlay
        .pixels()
        .filter(|p| p.0[3] > 200 && p.0[2] > 200 && p.0[1] > 180 && p.0[0] < 60)
        .count();
    assert!(cyan > 100, "expected cyan headline pixels, found {cyan}");

    // ...and nothing but the black scrim may sit below the safe zone.
    for y in SAFE_ZONE_Y..1920 {
        for x in 0..1080 {
            let p = overlay.get_pixel(x, y).0;
            assert!(
                p[0] == 0 && p[1] == 0 && p[2] == 0,
                "non-scrim pixel {p:?} below safe zone at ({x}, {y})"
            );
        }
    }

    let path = newsreel::motion::CameraPath {
        zoom_from: 1.0,
        zoom_to: 1.12,
        ease: newsreel::motion::Ease::Linear,
        pan_px: 30.0,
        pan_cycles: 1.0,
    };
    let job = newsreel::pipeline::RenderJob {
        sampler: newsreel::motion::MotionSampler::new(base, path, 1.0).unwrap(),
        overlay,
        audio: None,
        duration_sec: 1.0,
    };
    let mut sink = InMemorySink::new();
    job.stream_into(Fps { num: 24, den: 1 }, false, 8, &mut sink)
        .unwrap();

    assert_eq!(sink.frames().len(), 24);
    for frame in sink.frames() {
        assert_eq!(frame.dimensions(), (1080, 1920));
    }
}

// Full end-to-end through ffmpeg. Skipped on machines without the tool.
#[test]
fn renders_an_mp4_when_ffmpeg_is_available() {
    init_tracing();
    if !is_ffmpeg_on_path() {
        eprintln!("skipping: ffmpeg not on PATH");
        return;
    }

    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/article.jpg");
        then.status(200).body(wide_jpeg_bytes());
    });

    let tmp = tempfile::tempdir().unwrap();
    let Some(renderer) = renderer(tmp.path()) else {
        return;
    };

    let out = tmp.path().join("final.mp4");
    let mut opts = RenderOpts::new(&out);
    opts.seed = Some(99);
    opts.duration_range = (1.0, 1.0);
    opts.bitrate_range_kbps = (3000, 3000);

    let produced = renderer
        .render_video(&news_item(server.url("/article.jpg")), &tech_copy(), &opts)
        .unwrap();

    assert_eq!(produced, out);
    let meta = std::fs::metadata(&out).unwrap();
    assert!(meta.len() > 0, "mp4 should not be empty");
    // The audio side file and the .part temp must both be gone.
    assert!(!tmp.path().join("final.f32le").exists());
    assert!(!tmp.path().join("final.part.mp4").exists());
}

#[test]
fn missing_font_with_unreachable_network_still_composes() {
    // Asset store rooted in an empty dir, manifest pointing at a dead server:
    // the composer must come up on the system fallback font alone.
    let tmp = tempfile::tempdir().unwrap();
    let store = AssetStore::new(
        tmp.path(),
        vec![newsreel::assets::store::AssetSpec::new(
            "Anton.ttf",
            "http://127.0.0.1:1/Anton.ttf",
        )],
    )
    .unwrap();

    match Renderer::new(store, MoodThemes::default()) {
        Err(_) => eprintln!("skipping: no system font available"),
        Ok(_) => {
            let Ok(font) = load_fallback_font() else {
                return;
            };
            let composer = newsreel::skin::SkinComposer::new(font);
            let mut rng = StdRng::seed_from_u64(3);
            let overlay = composer.compose(
                Skin::Minimal,
                &tech_copy(),
                "Reuters",
                MoodThemes::default().theme(Mood::General).accent,
                &mut rng,
            );
            assert!(overlay.pixels().any(|p| p.0[3] > 0));
        }
    }
}
