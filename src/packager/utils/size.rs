//! Human-readable byte sizes.

/// Decimal digits used when the caller has no preference.
pub const DEFAULT_PRECISION: usize = 1;

const KIB: f64 = 1024.0;
const MIB: f64 = 1_048_576.0;
const GIB: f64 = 1_073_741_824.0;

/// Convert a byte count to a human-readable size
///
/// Counts below 1024 print as whole bytes with the correct singular/plural
/// unit; larger counts use KB, MB or GB with `precision` decimal digits.
///
/// # Examples
/// - `format_bytes(1, 1)` → "1 byte"
/// - `format_bytes(2048, 1)` → "2.0 KB"
/// - `format_bytes(3_145_728, 2)` → "3.00 MB"
pub fn format_bytes(bytes: u64, precision: usize) -> String {
    let value = bytes as f64;

    if value < KIB {
        let unit = if bytes == 1 { "byte" } else { "bytes" };
        format!("{} {}", bytes, unit)
    } else if value < MIB {
        format!("{:.*} KB", precision, value / KIB)
    } else if value < GIB {
        format!("{:.*} MB", precision, value / MIB)
    } else {
        format!("{:.*} GB", precision, value / GIB)
    }
}
