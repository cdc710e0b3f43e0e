// Copyright 2025 the Glyphspec Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Benchmarks for `glyphspec_property`: assignment and materialization.

use criterion::{BatchSize, BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use std::rc::Rc;
use std::sync::Once;

use glyphspec_property::{
    ArrayData, ClassInfo, ColumnDataSource, GEOMETRY, HAS_PROPS, HasProps, Kind, NdArray,
    PropertyDef, Schema, SchemaBuilder, SpecKind, VISUALS, Value,
};

static GLYPH: ClassInfo = ClassInfo::extends("Glyph", &HAS_PROPS);

fn schema() -> Rc<Schema> {
    SchemaBuilder::new(&GLYPH)
        .spec("x", SpecKind::coordinate())
        .spec("y", SpecKind::coordinate())
        .define(
            PropertyDef::spec("size", SpecKind::distance())
                .with_default(4.0)
                .affects(GEOMETRY),
        )
        .define(PropertyDef::spec("angle", SpecKind::angle()).with_default(0.0))
        .define(
            PropertyDef::spec("fill_color", SpecKind::color())
                .with_default("gray")
                .affects(VISUALS),
        )
        .define(PropertyDef::plain("visible", Kind::Boolean).with_default(true))
        .build()
}

fn source(rows: usize) -> ColumnDataSource {
    let xs: Vec<f64> = (0..rows).map(|i| i as f64).collect();
    let rgba: Vec<u8> = (0..rows * 4).map(|i| (i % 256) as u8).collect();
    let colors = NdArray::new(ArrayData::Uint8(rgba), &[rows, 4]).expect("shape matches data");
    let names: Vec<Value> = (0..rows)
        .map(|i| Value::from(if i % 2 == 0 { "red" } else { "#336699" }))
        .collect();
    ColumnDataSource::new()
        .with_column("xs", NdArray::from(xs.clone()))
        .with_column("angles", NdArray::from(xs))
        .with_column("rgba", colors)
        .with_column("names", names)
}

fn bench_property(c: &mut Criterion) {
    static PRINT_SIZES: Once = Once::new();
    PRINT_SIZES.call_once(|| {
        eprintln!(
            "sizes: Value={} HasProps={}",
            size_of::<Value>(),
            size_of::<HasProps>(),
        );
    });

    let mut group = c.benchmark_group("property/assign");

    group.bench_function("plain", |b| {
        let mut glyph = HasProps::new(schema(), [("x", 0.0)]).expect("valid attributes");
        b.iter(|| black_box(glyph.set("visible", false)))
    });

    group.bench_function("color_spec", |b| {
        let mut glyph = HasProps::new(schema(), [("x", 0.0)]).expect("valid attributes");
        b.iter(|| black_box(glyph.set("fill_color", "rgba(10, 20, 30, 0.5)")))
    });

    group.bench_function("field_spec_with_observer", |b| {
        b.iter_batched(
            || {
                let mut glyph =
                    HasProps::new(schema(), [("x", 0.0)]).expect("valid attributes");
                glyph
                    .connect("x", |event| {
                        black_box(&event.value);
                    })
                    .expect("declared property");
                glyph
            },
            |mut glyph| {
                let result = glyph.set("x", Value::map([("field", "xs")]));
                black_box(result);
                black_box(glyph);
            },
            BatchSize::SmallInput,
        )
    });

    group.finish();

    let mut group = c.benchmark_group("property/array");

    for rows in [100_usize, 10_000] {
        let data = source(rows);
        let glyph = HasProps::new(
            schema(),
            [
                ("x", Value::map([("field", "xs")])),
                (
                    "angle",
                    Value::map([("field", Value::from("angles")), ("units", "deg".into())]),
                ),
            ],
        )
        .expect("valid attributes");

        group.bench_function(BenchmarkId::new("field", rows), |b| {
            let x = glyph.property("x").expect("declared property");
            b.iter(|| black_box(x.array(&data)))
        });

        group.bench_function(BenchmarkId::new("broadcast", rows), |b| {
            let size = glyph.property("size").expect("declared property");
            b.iter(|| black_box(size.array(&data)))
        });

        group.bench_function(BenchmarkId::new("angle_deg", rows), |b| {
            let angle = glyph.property("angle").expect("declared property");
            b.iter(|| black_box(angle.array(&data)))
        });

        for column in ["rgba", "names"] {
            let glyph = HasProps::new(schema(), [("fill_color", Value::map([("field", column)]))])
                .expect("valid attributes");
            group.bench_function(BenchmarkId::new(format!("color/{column}"), rows), |b| {
                let fill = glyph.property("fill_color").expect("declared property");
                b.iter(|| black_box(fill.array(&data)))
            });
        }
    }

    group.finish();
}

criterion_group!(benches, bench_property);
criterion_main!(benches);
