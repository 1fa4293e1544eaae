//! Small shared helpers.

/// Render a byte count with binary (1024-based) units.
///
/// Counts below 1 KiB print as an integer (`"512 B"`); everything larger
/// prints with two decimals and a single-letter unit (`"1.00 KB"`,
/// `"3.42 GB"`).
pub fn format_bytes(bytes: u64) -> String {
    const UNIT: u64 = 1024;
    const SUFFIXES: [&str; 6] = ["KB", "MB", "GB", "TB", "PB", "EB"];

    if bytes < UNIT {
        return format!("{bytes} B");
    }
    let mut div = UNIT;
    let mut exp = 0;
    let mut n = bytes / UNIT;
    while n >= UNIT {
        div *= UNIT;
        exp += 1;
        n /= UNIT;
    }
    format!("{:.2} {}", bytes as f64 / div as f64, SUFFIXES[exp])
}
