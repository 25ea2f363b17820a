use criterion::{black_box, criterion_group, criterion_main, Criterion};
use nodeprint_core::{parse, serialize};

fn indented_document(items: usize) -> String {
    let mut xml = String::from("<catalog>\n");
    for i in 0..items {
        xml.push_str(&format!(
            "    <item id=\"{i}\">\n        <name>Item {i}</name>\n        <note>  mixed <b>content</b> here  </note>\n    </item>\n"
        ));
    }
    xml.push_str("</catalog>\n");
    xml
}

fn serialize_benchmark(c: &mut Criterion) {
    let xml = indented_document(500);

    c.bench_function("serialize_compact", |b| {
        b.iter(|| {
            let mut doc = parse(black_box(&xml)).unwrap();
            let root = doc.root();
            black_box(serialize(&mut doc, root, true, false).unwrap())
        })
    });

    c.bench_function("serialize_pretty", |b| {
        b.iter(|| {
            let mut doc = parse(black_box(&xml)).unwrap();
            let root = doc.root();
            black_box(serialize(&mut doc, root, false, true).unwrap())
        })
    });
}

criterion_group!(benches, serialize_benchmark);
criterion_main!(benches);
