use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use dtx_lib::{DtxOutput, PlatformKind, ThemeDocument, MOCK_CAPTURE_ENV};
use image::RgbaImage;
use tempfile::TempDir;

const URL: &str = "https://fixture.test/";

struct Fixture {
    _fixtures: TempDir,
    fixtures_dir: PathBuf,
    workspace: TempDir,
}

impl Fixture {
    fn new(raw_json: &str, pixel: [u8; 4]) -> Self {
        let fixtures = TempDir::new().expect("tempdir");
        fs::write(fixtures.path().join("raw.json"), raw_json).expect("write raw.json");
        RgbaImage::from_pixel(32, 32, image::Rgba(pixel))
            .save(fixtures.path().join("source.png"))
            .expect("write source.png");
        Self {
            fixtures_dir: fixtures.path().to_path_buf(),
            _fixtures: fixtures,
            workspace: TempDir::new().expect("tempdir"),
        }
    }

    fn root(&self) -> &Path {
        self.workspace.path()
    }

    fn dtx(&self, args: &[&str]) -> Output {
        let output = Command::new(env!("CARGO_BIN_EXE_dtx"))
            .arg("--root")
            .arg(self.root())
            .args(args)
            .env(MOCK_CAPTURE_ENV, &self.fixtures_dir)
            .env_remove("DTX_LOG")
            .output()
            .expect("run dtx");
        assert!(
            output.status.success(),
            "dtx {:?} failed: {}\n{}",
            args,
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
        output
    }

    fn latest(&self) -> ThemeDocument {
        let text = fs::read_to_string(self.root().join("data/themes/latest.json"))
            .expect("read latest.json");
        serde_json::from_str(&text).expect("parse latest.json")
    }
}

fn parse(output: &Output) -> DtxOutput {
    serde_json::from_slice(&output.stdout).expect("stdout should be JSON")
}

#[test]
fn run_on_gray_page_falls_back_to_default_brand() {
    let fx = Fixture::new(
        r#"{"url":"https://fixture.test/","title":"Fixture","radii":["10px"],"fonts":[],"shadows":[],"colors":[]}"#,
        [128, 128, 128, 255],
    );

    let output = fx.dtx(&["run", URL]);
    match parse(&output) {
        DtxOutput::Run(out) => {
            assert_eq!(out.tokens.radius, "10px");
            assert_eq!(out.tokens.brand.triplet(), "124 58 237");
            assert_eq!(out.tokens.bg.triplet(), "255 255 255");
            assert_eq!(out.tokens.fg.triplet(), "17 24 39");
            let built: Vec<_> = out.build.produced.iter().map(|p| p.platform).collect();
            assert_eq!(
                built,
                vec![PlatformKind::Tistory, PlatformKind::Wordpress, PlatformKind::Pages]
            );
        }
        other => panic!("expected run output, got {other:?}"),
    }

    let latest = fx.latest();
    assert_eq!(latest.meta.source, URL);
    assert_eq!(latest.meta.title, "Fixture");
    assert_eq!(latest.tokens.radius, "10px");

    let root = fx.root();
    assert!(root.join("reports/raw.json").exists());
    assert!(root.join("reports/source.png").exists());
    assert!(root.join("reports/audit.json").exists());
    let css = fs::read_to_string(root.join("styles/tokens.css")).unwrap();
    assert!(css.starts_with(":root {"));
    assert!(css.contains("--brand: 124 58 237;"));

    let snippet = fs::read_to_string(root.join("dist/tistory-snippet.html")).unwrap();
    assert!(snippet.contains("<style>"));
    assert!(snippet.contains("#app:not(#_) {"));
    let wp = fs::read_to_string(root.join("dist/wp-additional-css.css")).unwrap();
    assert!(wp.starts_with("body {"));
    assert!(root.join("dist/pages/index.html").exists());
}

#[test]
fn stages_run_independently_and_skip_unknown_platform() {
    let fx = Fixture::new(
        r#"{"url":"","title":"Dark","radii":["4px","16px","0px"],"fonts":["\"Inter\", sans-serif"],"colors":["rgb(15, 23, 42)","rgb(248, 250, 252)","rgba(0, 0, 0, 0)"]}"#,
        [30, 64, 175, 255],
    );

    match parse(&fx.dtx(&["capture", URL])) {
        DtxOutput::Capture(out) => {
            assert_eq!(out.url, URL);
            assert_eq!(out.signals.radii, 3);
            assert_eq!(out.signals.colors, 3);
        }
        other => panic!("expected capture output, got {other:?}"),
    }

    match parse(&fx.dtx(&["extract"])) {
        DtxOutput::Extract(out) => {
            assert_eq!(out.history.seq, 1);
            assert_eq!(out.tokens.radius, "16px");
            assert_eq!(out.tokens.font_sans, "\"Inter\", sans-serif");
        }
        other => panic!("expected extract output, got {other:?}"),
    }

    fx.dtx(&["tokens"]);
    match parse(&fx.dtx(&["audit"])) {
        DtxOutput::Audit(out) => assert_eq!(out.report.pairs.len(), 3),
        other => panic!("expected audit output, got {other:?}"),
    }

    let build = fx.dtx(&["build", "tistory,foo,wordpress"]);
    let log = String::from_utf8_lossy(&build.stderr);
    assert!(log.contains("WARN"), "stderr: {log}");
    assert!(log.contains("Unknown platform: foo"), "stderr: {log}");
    match parse(&build) {
        DtxOutput::Build(out) => {
            assert_eq!(out.report.produced.len(), 2);
            assert_eq!(out.report.skipped, vec!["foo".to_string()]);
        }
        other => panic!("expected build output, got {other:?}"),
    }
    assert!(fx.root().join("dist/tistory-snippet.html").exists());
    assert!(fx.root().join("dist/wp-additional-css.css").exists());
    assert!(!fx.root().join("dist/pages").exists());
}

#[test]
fn adapt_uses_positional_scope_and_boost() {
    let fx = Fixture::new(r#"{"url":"","title":"T"}"#, [200, 40, 40, 255]);
    fx.dtx(&["capture", URL]);
    fx.dtx(&["extract"]);
    fx.dtx(&["tokens"]);

    match parse(&fx.dtx(&["adapt", "tistory", "#content", "2"])) {
        DtxOutput::Adapt(out) => {
            assert_eq!(out.scope_selector, "#content");
            assert_eq!(out.specificity_boost, 2);
        }
        other => panic!("expected adapt output, got {other:?}"),
    }
    let snippet = fs::read_to_string(fx.root().join("dist/tistory-snippet.html")).unwrap();
    assert!(snippet.contains("#content:not(#_):not(#_) {"));
    assert!(snippet.contains("#content { color: rgb(var(--fg));"));
}

#[test]
fn platform_config_file_overrides_defaults() {
    let fx = Fixture::new(r#"{"url":"","title":"T"}"#, [10, 120, 60, 255]);
    fs::create_dir_all(fx.root().join("config")).unwrap();
    fs::write(
        fx.root().join("config/platforms.json"),
        r#"{ "wordpress": { "scopeSelector": ".entry-content", "specificityBoost": 1 } }"#,
    )
    .unwrap();

    match parse(&fx.dtx(&["run", URL, "--platforms", "wordpress,tistory"])) {
        DtxOutput::Run(out) => {
            assert_eq!(out.build.produced.len(), 1);
            assert_eq!(out.build.skipped, vec!["tistory".to_string()]);
        }
        other => panic!("expected run output, got {other:?}"),
    }
    let wp = fs::read_to_string(fx.root().join("dist/wp-additional-css.css")).unwrap();
    assert!(wp.starts_with(".entry-content:not(#_) {"));
}

#[test]
fn repeated_runs_append_history() {
    let fx = Fixture::new(r#"{"url":"","title":"T"}"#, [90, 90, 200, 255]);
    fx.dtx(&["run", URL, "--platforms", "pages"]);
    fx.dtx(&["run", URL, "--platforms", "pages"]);

    match parse(&fx.dtx(&["history"])) {
        DtxOutput::History(out) => {
            let seqs: Vec<_> = out.entries.iter().map(|e| e.seq).collect();
            assert_eq!(seqs, vec![1, 2]);
            assert!(out.entries.iter().all(|e| e.source == URL));
        }
        other => panic!("expected history output, got {other:?}"),
    }
}
