use std::fs;

use separator::Separatable;

/// Resident memory of this process in KiB, `None` where `/proc` isn't available.
pub(crate) fn resident_kib() -> Option<u64> {
    let status = fs::read_to_string("/proc/self/status").ok()?;
    parse_vm_rss(&status)
}

fn parse_vm_rss(status: &str) -> Option<u64> {
    status
        .lines()
        .find(|line| line.starts_with("VmRSS:"))?
        .split_whitespace()
        .nth(1)?
        .parse()
        .ok()
}

pub(crate) fn format_mib(kib: Option<u64>) -> String {
    match kib {
        Some(kib) => format!("{} MiB", (kib / 1024).separated_string()),
        None => "unknown".to_string(),
    }
}
