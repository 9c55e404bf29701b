//! End-to-end rendering tests using a fake renderer.
//!
//! The fake is a shell one-liner standing in for `plantuml`: it echoes its
//! argument vector on the first output line and its stdin afterwards, so
//! tests can assert on flag selection and source passthrough without a Java
//! toolchain.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use tempfile::TempDir;

use plum_diagrams::{
    DiagramCache, DiagramKey, DiagramProcessor, DiagramRenderer, HtmlImageFormat, OutputFormat,
    PlantUmlCommand, RenderError,
};

/// Echoes `%fake <argv>` on the first output line, then stdin.
const FAKE_RENDERER: &str = r#"printf '%%fake %s\n' "$*"; cat"#;

fn fake_command(script: &str) -> Vec<String> {
    vec![
        "sh".to_owned(),
        "-c".to_owned(),
        script.to_owned(),
        "plantuml-fake".to_owned(),
    ]
}

fn renderer_with(script: &str, cache_dir: &Path) -> DiagramRenderer {
    DiagramRenderer::new(
        PlantUmlCommand::default().plantuml(fake_command(script)),
        DiagramCache::new(cache_dir),
    )
}

#[test]
fn test_render_png_writes_cache_file() {
    let tmp = TempDir::new().unwrap();
    let renderer = renderer_with(FAKE_RENDERER, tmp.path());

    let path = renderer.render("Hello", OutputFormat::Png).unwrap();

    assert!(path.exists());
    let name = path.file_name().unwrap().to_str().unwrap();
    assert!(name.starts_with("plantuml-"));
    assert!(name.ends_with(".png"));

    let content = fs::read_to_string(&path).unwrap();
    let first_line = content.lines().next().unwrap();
    assert!(first_line.contains("-pipe"));
    assert!(first_line.contains("-charset utf-8"));
    assert!(!first_line.contains("-tsvg"));
    assert!(content.contains("Hello"));
}

#[test]
fn test_render_svg_selects_tsvg_flag() {
    let tmp = TempDir::new().unwrap();
    let renderer = renderer_with(FAKE_RENDERER, tmp.path());

    let path = renderer.render("Hello", OutputFormat::Svg).unwrap();

    let content = fs::read_to_string(&path).unwrap();
    assert!(content.lines().next().unwrap().contains("-tsvg"));
}

#[test]
fn test_render_eps_selects_teps_flag() {
    let tmp = TempDir::new().unwrap();
    let renderer = renderer_with(FAKE_RENDERER, tmp.path());

    let path = renderer.render("Hello", OutputFormat::Eps).unwrap();

    let content = fs::read_to_string(&path).unwrap();
    assert!(content.lines().next().unwrap().contains("-teps"));
}

#[test]
fn test_same_source_reuses_cache_without_reinvoking() {
    let tmp = TempDir::new().unwrap();
    let count_file = tmp.path().join("invocations");
    let script = format!("echo run >> '{}'; {FAKE_RENDERER}", count_file.display());
    let renderer = renderer_with(&script, &tmp.path().join("images"));

    let first = renderer.render("Hello", OutputFormat::Png).unwrap();
    let second = renderer.render("Hello", OutputFormat::Png).unwrap();

    assert_eq!(first, second);
    let runs = fs::read_to_string(&count_file).unwrap();
    assert_eq!(runs.lines().count(), 1);
}

#[test]
fn test_distinct_sources_get_distinct_files() {
    let tmp = TempDir::new().unwrap();
    let renderer = renderer_with(FAKE_RENDERER, tmp.path());

    let a = renderer.render("Alice -> Bob", OutputFormat::Png).unwrap();
    let b = renderer.render("Bob -> Alice", OutputFormat::Png).unwrap();

    assert_ne!(a, b);
}

#[test]
fn test_non_ascii_source_passes_through_as_utf8() {
    let tmp = TempDir::new().unwrap();
    let renderer = renderer_with(FAKE_RENDERER, tmp.path());

    let path = renderer.render("\u{3042}", OutputFormat::Png).unwrap();

    let content = fs::read_to_string(&path).unwrap();
    assert!(content.contains('\u{3042}'));
}

#[test]
fn test_nonzero_exit_is_reported_with_stderr() {
    let tmp = TempDir::new().unwrap();
    let renderer = renderer_with("echo boom >&2; exit 3", tmp.path());

    let result = renderer.render("Hello", OutputFormat::Png);

    match result {
        Err(RenderError::Exit { stderr, .. }) => assert!(stderr.contains("boom")),
        other => panic!("expected Exit error, got {other:?}"),
    }
    // Nothing lands in the cache on failure
    let entries = fs::read_dir(tmp.path()).map(Iterator::count).unwrap_or(0);
    assert_eq!(entries, 0);
}

#[test]
fn test_empty_output_is_an_error() {
    let tmp = TempDir::new().unwrap();
    let renderer = renderer_with("cat > /dev/null", tmp.path());

    let result = renderer.render("Hello", OutputFormat::Png);

    assert!(matches!(result, Err(RenderError::EmptyOutput)));
}

#[test]
fn test_pdf_renders_eps_then_converts() {
    let tmp = TempDir::new().unwrap();
    let epstopdf = vec![
        "sh".to_owned(),
        "-c".to_owned(),
        r#"out=; for a in "$@"; do case "$a" in --outfile=*) out=${a#--outfile=};; esac; done; printf 'PDF' > "$out""#.to_owned(),
        "epstopdf-fake".to_owned(),
    ];
    let renderer = DiagramRenderer::new(
        PlantUmlCommand::default()
            .plantuml(fake_command(FAKE_RENDERER))
            .epstopdf(epstopdf),
        DiagramCache::new(tmp.path()),
    );

    let pdf = renderer.render("Hello", OutputFormat::Pdf).unwrap();

    assert!(pdf.exists());
    assert_eq!(fs::read_to_string(&pdf).unwrap(), "PDF");

    // The intermediate EPS is cached alongside
    let eps = DiagramKey {
        source: "Hello",
        format: OutputFormat::Eps,
    };
    assert!(tmp.path().join(eps.filename()).exists());
}

#[test]
fn test_processor_svg_mode_emits_object_with_extracted_style() {
    let tmp = TempDir::new().unwrap();
    // Emits a real SVG root for -tsvg, a raster stand-in otherwise
    let script = r#"case "$*" in *-tsvg*) printf '<svg style="width:42px;"><g/></svg>';; *) printf 'PNG';; esac; cat > /dev/null"#;
    let renderer = renderer_with(script, &tmp.path().join("images"));
    let mut processor = DiagramProcessor::new(renderer)
        .html_format(HtmlImageFormat::Svg)
        .url_prefix("_images/");

    let mut html = String::from("<h1>Doc</h1>{{DIAGRAM_0}}");
    processor.process("plantuml", &HashMap::new(), "Alice -> Bob", 0);
    processor.post_process(&mut html);

    let png_name = DiagramKey {
        source: "Alice -> Bob",
        format: OutputFormat::Png,
    }
    .filename();
    let svg_name = DiagramKey {
        source: "Alice -> Bob",
        format: OutputFormat::Svg,
    }
    .filename();
    assert!(html.contains(&format!(
        r#"<object data="_images/{svg_name}" type="image/svg+xml" style="width:42px;">"#
    )));
    assert!(html.contains(&format!(r#"<img src="_images/{png_name}" alt="diagram">"#)));
    assert!(processor.warnings().is_empty());
}

#[test]
fn test_processor_same_diagram_twice_same_file() {
    let tmp = TempDir::new().unwrap();
    let renderer = renderer_with(FAKE_RENDERER, &tmp.path().join("images"));
    let mut processor = DiagramProcessor::new(renderer).url_prefix("_images/");

    let mut html = String::from("{{DIAGRAM_0}} and {{DIAGRAM_1}}");
    processor.process("plantuml", &HashMap::new(), "Hello", 0);
    processor.process("plantuml", &HashMap::new(), "Hello", 1);
    processor.post_process(&mut html);

    let name = DiagramKey {
        source: "Hello",
        format: OutputFormat::Png,
    }
    .filename();
    assert_eq!(html.matches(&name).count(), 2);
    assert_eq!(
        fs::read_dir(tmp.path().join("images"))
            .map(Iterator::count)
            .unwrap_or(0),
        1
    );
}

#[test]
fn test_processor_failure_skips_diagram_and_continues() {
    let tmp = TempDir::new().unwrap();
    // Fails only for sources containing FAIL
    let script = r#"input=$(cat); case "$input" in *FAIL*) echo bad >&2; exit 1;; esac; printf 'IMG %s' "$input""#;
    let renderer = renderer_with(script, &tmp.path().join("images"));
    let mut processor = DiagramProcessor::new(renderer).url_prefix("_images/");

    let mut html = String::from("{{DIAGRAM_0}}{{DIAGRAM_1}}");
    processor.process("plantuml", &HashMap::new(), "good diagram", 0);
    processor.process("plantuml", &HashMap::new(), "FAIL diagram", 1);
    processor.post_process(&mut html);

    // The healthy diagram rendered, the broken one became an error figure
    assert!(html.contains(r#"<figure class="diagram">"#));
    assert!(html.contains(r#"<figure class="diagram diagram-error">"#));
    assert!(html.contains("bad"));
    assert_eq!(processor.warnings().len(), 1);
    assert!(processor.warnings()[0].starts_with("diagram 1:"));
}
