use citecorpus_core::{Document, RecordStream, decode_document, encode_document};
use std::io::Cursor;
use std::path::Path;

fn synthetic_lines(n: usize) -> String {
    let mut out = String::new();
    for i in 0..n {
        let citations: Vec<String> = (0..20).map(|c| ((i * 7 + c * 13) % 5000).to_string()).collect();
        let line = serde_json::json!({
            "paper_id": i.to_string(),
            "title": format!("Title for paper {i}"),
            "abstract": "word ".repeat(200),
            "authors": ["Ann Author", "Bob Builder"],
            "out_citations": citations,
            "year": 1990 + (i % 30),
        });
        out.push_str(&line.to_string());
        out.push('\n');
    }
    out
}

#[divan::bench]
fn parse_and_normalize(bencher: divan::Bencher) {
    let text = synthetic_lines(4096);
    bencher.bench(|| {
        RecordStream::new(Cursor::new(text.as_bytes()), Path::new("bench"))
            .map(|r| r.unwrap())
            .count()
    });
}

#[divan::bench]
fn payload_decode(bencher: divan::Bencher) {
    let payloads: Vec<Vec<u8>> = RecordStream::new(
        Cursor::new(synthetic_lines(4096).into_bytes()),
        Path::new("bench"),
    )
    .map(|r| encode_document(&r.unwrap().document).unwrap())
    .collect();
    bencher.bench(|| {
        payloads
            .iter()
            .map(|p| decode_document(p).unwrap())
            .collect::<Vec<Document>>()
    });
}

fn main() {
    divan::main();
}
