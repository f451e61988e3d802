//! Frame layout: fixed width, stable height, padding over a taller previous frame.

mod common;

use chrono::{DateTime, Local, TimeZone};
use common::MIB;
use stacktop::config::Config;
use stacktop::host::{CpuSample, MemSample};
use stacktop::providers::{cpu, gpu, mem};
use stacktop::types::{
    ColorClass, Fields, MemUnit, MetricReading, ProviderId, ProviderKind, Snapshot, Value,
};
use stacktop::ui::header::{FOOTER_LINES, HEADER_LINES};
use stacktop::ui::render::Renderer;
use stacktop::ui;

fn noon() -> DateTime<Local> {
    Local.with_ymd_and_hms(2026, 3, 14, 12, 0, 0).unwrap()
}

fn process_kind(inference: bool) -> ProviderKind {
    ProviderKind::Process {
        inference,
        color: ColorClass::Magenta,
        units: MemUnit::GiB,
    }
}

fn healthy() -> Snapshot {
    let mut snap = Snapshot::new();
    snap.push(
        ProviderId::new("GPU"),
        ProviderKind::Gpu,
        MetricReading::Available(
            gpu::parse_csv("NVIDIA GeForce RTX 4070, 72, 6144, 12288, 61, 150.0, 200.0").unwrap(),
        ),
    );
    snap.push(
        ProviderId::new("CPU"),
        ProviderKind::Cpu,
        MetricReading::Available(cpu::fields(&CpuSample {
            usage_pct: 25.0,
            load: [2.0, 1.5, 1.0],
            cores: 8,
            model: "Intel Core i7".into(),
        })),
    );
    snap.push(
        ProviderId::new("Memory"),
        ProviderKind::Memory,
        MetricReading::Available(
            mem::fields(&MemSample {
                total: 16384 * MIB,
                used: 8192 * MIB,
                free: 2048 * MIB,
                available: 8192 * MIB,
            })
            .unwrap(),
        ),
    );
    snap.push(
        ProviderId::new("Model runner"),
        process_kind(true),
        MetricReading::Available(
            Fields::new()
                .with("pid", Value::Count(4242))
                .with("cpu", Value::Percent(40.0))
                .with("rss", Value::Bytes(4096 * MIB)),
        ),
    );
    snap.push(
        ProviderId::new("Qdrant"),
        ProviderKind::Container {
            color: ColorClass::Yellow,
        },
        MetricReading::Available(
            Fields::new()
                .with("id", Value::Label("3f2a1b".into()))
                .with("status", Value::Label("Up 3 hours".into())),
        ),
    );
    snap
}

/// Same providers, every one of them down.
fn all_down() -> Snapshot {
    let mut snap = Snapshot::new();
    for e in healthy().entries() {
        snap.push(
            e.id.clone(),
            e.kind,
            MetricReading::unavailable("nvidia-smi not installed"),
        );
    }
    snap
}

fn renderer() -> Renderer {
    Renderer::new(&Config::default(), "gpu-box")
}

#[test]
fn every_line_is_exactly_the_configured_width() {
    let r = renderer();
    let width = Config::default().width;
    for snap in [healthy(), all_down()] {
        let frame = r.render(&snap, 0, noon());
        for line in frame.lines() {
            assert_eq!(line.width(), width, "line {:?}", line.text());
        }
    }
}

#[test]
fn height_does_not_depend_on_availability() {
    let r = renderer();
    let up = r.render(&healthy(), 0, noon());
    let down = r.render(&all_down(), 0, noon());
    assert_eq!(up.len(), down.len());
}

#[test]
fn height_is_the_sum_of_fixed_section_heights() {
    let expected = HEADER_LINES
        + ui::gpu::LINES
        + ui::cpu::LINES
        + ui::mem::LINES
        + 2 // blank + "Services"
        + 2 // one row per service
        + 2 // blank + status
        + FOOTER_LINES;
    assert_eq!(renderer().render(&healthy(), 0, noon()).len(), expected);
    assert_eq!(renderer().render(&all_down(), 0, noon()).len(), expected);
}

#[test]
fn memory_gauge_shows_half_full() {
    let frame = renderer().render(&healthy(), 0, noon());
    let plain = frame.to_plain();
    let line = plain
        .lines()
        .find(|l| l.contains("Used"))
        .expect("memory gauge line");
    assert!(line.contains("8G / 16G"), "{line}");
    assert_eq!(line.chars().filter(|&c| c == '█').count(), 15);
    assert!(line.contains(" 50%"), "{line}");
}

#[test]
fn gpu_outage_leaves_other_sections_rendered() {
    let mut snap = Snapshot::new();
    for e in healthy().entries() {
        let reading = if e.kind == ProviderKind::Gpu {
            MetricReading::unavailable("unexpected output: utilization: \"N/A\"")
        } else {
            e.reading.clone()
        };
        snap.push(e.id.clone(), e.kind, reading);
    }
    let plain = renderer().render(&snap, 0, noon()).to_plain();
    assert!(plain.contains("GPU  unavailable"));
    assert!(plain.contains("8G / 16G"));
    assert!(plain.contains("Intel Core i7"));
    assert!(plain.contains("Up 3 hours"));
    // Inference process is up at 40% and the GPU is unknown
    assert!(plain.contains("ready, idle"));
}

#[test]
fn services_show_running_and_absent_rows() {
    let plain = renderer().render(&healthy(), 0, noon()).to_plain();
    assert!(plain.contains("Services"));
    assert!(plain.contains("● Model runner"));
    assert!(plain.contains("pid 4242"));
    assert!(plain.contains("GPU-primary inference"));

    let down = renderer().render(&all_down(), 0, noon()).to_plain();
    assert!(down.contains("○ Model runner"));
    assert!(down.contains("no model loaded"));
}

#[test]
fn shorter_frame_is_padded_to_previous_height() {
    let r = renderer();
    let natural = r.render(&healthy(), 0, noon()).len();
    let padded = r.render(&healthy(), natural + 5, noon());
    assert_eq!(padded.len(), natural + 5);
    let tail = &padded.lines()[natural..];
    assert!(tail.iter().all(|l| l.text().trim().is_empty()));

    // Never cut below the natural height
    assert_eq!(r.render(&healthy(), 3, noon()).len(), natural);
}

#[test]
fn header_carries_host_and_clock() {
    let frame = renderer().render(&Snapshot::new(), 0, noon());
    let first = frame.lines()[0].text();
    assert!(first.contains("stacktop"));
    assert!(first.contains("gpu-box"));
    assert!(first.contains("12:00:00"));
    assert!(frame.to_plain().contains("Ctrl+C to exit"));
}
