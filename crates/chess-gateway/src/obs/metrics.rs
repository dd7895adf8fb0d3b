//! Minimal metrics registry for the gateway.
//!
//! No external dependencies are used for the metrics themselves; counter and
//! gauge types with dynamic labels are backed by `DashMap`. Labels are
//! flattened into sorted key vectors to keep deterministic ordering.

use std::fmt::Write;
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};

use dashmap::DashMap;

fn escape_label(v: &str) -> String {
    v.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
}

fn sorted_key(labels: &[(&str, &str)]) -> Vec<(String, String)> {
    let mut key: Vec<(String, String)> = labels.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
    key.sort();
    key
}

#[derive(Default)]
pub struct CounterVec {
    map: DashMap<Vec<(String, String)>, AtomicU64>,
}

impl CounterVec {
    pub fn inc(&self, labels: &[(&str, &str)]) {
        self.add(labels, 1);
    }

    pub fn add(&self, labels: &[(&str, &str)], v: u64) {
        let key = sorted_key(labels);
        self.map.entry(key).or_insert_with(|| AtomicU64::new(0)).fetch_add(v, Ordering::Relaxed);
    }

    fn render(&self, name: &str, out: &mut String) {
        let _ = writeln!(out, "# TYPE {name} counter");
        for r in self.map.iter() {
            let label_str = label_str(r.key());
            let _ = writeln!(out, "{name}{{{label_str}}} {}", r.value().load(Ordering::Relaxed));
        }
    }
}

#[derive(Default)]
pub struct GaugeVec {
    map: DashMap<Vec<(String, String)>, AtomicI64>,
}

impl GaugeVec {
    pub fn inc(&self, labels: &[(&str, &str)]) {
        self.add(labels, 1);
    }

    pub fn dec(&self, labels: &[(&str, &str)]) {
        self.add(labels, -1);
    }

    pub fn add(&self, labels: &[(&str, &str)], v: i64) {
        let key = sorted_key(labels);
        self.map.entry(key).or_insert_with(|| AtomicI64::new(0)).fetch_add(v, Ordering::Relaxed);
    }

    fn render(&self, name: &str, out: &mut String) {
        let _ = writeln!(out, "# TYPE {name} gauge");
        for r in self.map.iter() {
            let label_str = label_str(r.key());
            let _ = writeln!(out, "{name}{{{label_str}}} {}", r.value().load(Ordering::Relaxed));
        }
    }
}

fn label_str(key: &[(String, String)]) -> String {
    key.iter().map(|(k, v)| format!("{k}=\"{}\"", escape_label(v))).collect::<Vec<_>>().join(",")
}

/// Process-wide counters and gauges for the session layer. `sessions_active`
/// and `rooms_active` track live state; `events_total` is labeled by event
/// type; `egress_drops_total` counts slow-consumer failures surfaced to a
/// client's supervisor.
#[derive(Default)]
pub struct GatewayMetrics {
    pub sessions_active: GaugeVec,
    pub rooms_active: GaugeVec,
    pub events_total: CounterVec,
    pub egress_drops_total: CounterVec,
}

impl GatewayMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        self.sessions_active.render("chess_relay_ws_sessions_active", &mut out);
        self.rooms_active.render("chess_relay_rooms_active", &mut out);
        self.events_total.render("chess_relay_events_total", &mut out);
        self.egress_drops_total.render("chess_relay_egress_drops_total", &mut out);
        out
    }
}
