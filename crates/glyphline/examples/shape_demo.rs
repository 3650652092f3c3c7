//! Shape a string with a font file and print the positioned glyphs.
//!
//! Usage: cargo run --example shape_demo -- <font.ttf> [text]

use std::sync::Arc;

use glyphline::{BuiltinUnicode, BuzzEngine, FontLibrary, FontSpec, Point, RunCollector, Shaper};

fn main() {
    let mut args = std::env::args().skip(1);
    let Some(font_path) = args.next() else {
        eprintln!("usage: shape_demo <font.ttf> [text]");
        std::process::exit(1);
    };
    let text = args
        .next()
        .unwrap_or_else(|| "Hello, \u{05E9}\u{05DC}\u{05D5}\u{05DD} world!".to_string());

    let mut library = FontLibrary::new();
    if let Err(err) = library.load(&font_path, 0) {
        eprintln!("failed to load {font_path}: {err}");
        std::process::exit(1);
    }

    let mut shaper = Shaper::new(
        BuzzEngine::new(),
        Arc::new(BuiltinUnicode::new()),
        Arc::new(library),
        None,
    )
    .expect("shaper construction");

    let mut collector = RunCollector::new();
    let pen = shaper.shape(
        &mut collector,
        FontSpec::new(16.0),
        text.as_bytes(),
        true,
        Point::ZERO,
        200.0,
    );

    for run in collector.runs() {
        println!("line {}, {} glyphs:", run.line_index, run.glyphs.len());
        for (glyph, position) in run.glyphs.iter().zip(&run.positions) {
            println!("  #{glyph} at ({:.1}, {:.1})", position.x, position.y);
        }
    }
    println!("pen: ({:.1}, {:.1})", pen.x, pen.y);
}
