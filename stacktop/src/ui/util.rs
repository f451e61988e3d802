//! Small UI helpers: human-readable sizes, truncation.

const KIB: f64 = 1024.0;
const MIB: f64 = KIB * 1024.0;
const GIB: f64 = MIB * 1024.0;

pub fn gib(b: u64) -> f64 {
    b as f64 / GIB
}

pub fn mib(b: u64) -> f64 {
    b as f64 / MIB
}

pub fn fmt_bytes(b: u64) -> String {
    let fb = b as f64;
    if fb >= GIB {
        format!("{:.1}G", fb / GIB)
    } else if fb >= MIB {
        format!("{:.1}M", fb / MIB)
    } else if fb >= KIB {
        format!("{:.1}K", fb / KIB)
    } else {
        format!("{b}B")
    }
}

/// "8G / 16G": whole GiB, for totals where a decimal is noise.
pub fn used_of_total(used: u64, total: u64) -> String {
    format!("{:.0}G / {:.0}G", gib(used), gib(total))
}

pub fn truncate_middle(s: &str, max: usize) -> String {
    let n = s.chars().count();
    if n <= max { return s.to_string(); }
    if max <= 3 { return ".".repeat(max); }
    let keep = max - 3;
    let left = keep / 2;
    let right = keep - left;
    let head: String = s.chars().take(left).collect();
    let tail: String = s.chars().skip(n - right).collect();
    format!("{head}...{tail}")
}

pub fn pad_right(s: &str, width: usize) -> String {
    let n = s.chars().count();
    if n >= width {
        s.to_string()
    } else {
        format!("{s}{}", " ".repeat(width - n))
    }
}
