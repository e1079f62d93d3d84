const KIB: u64 = 1024;
const MIB: u64 = 1024 * 1024;

/// Format an integer with a comma every three digits: `1234567` -> `"1,234,567"`.
pub fn format_number(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);

    if n < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Format a byte count as `B`, `KB` or `MB`.
///
/// Zero and `None` render as an empty string so a missing size leaves no
/// trace in the output.
pub fn format_file_size(bytes: impl Into<Option<u64>>) -> String {
    match bytes.into() {
        None | Some(0) => String::new(),
        Some(b) if b < KIB => format!("{} B", b),
        Some(b) if b < MIB => format!("{} KB", one_decimal(b, KIB)),
        Some(b) => format!("{} MB", one_decimal(b, MIB)),
    }
}

/// `bytes / unit` to one decimal place, exact halves rounded up.
fn one_decimal(bytes: u64, unit: u64) -> String {
    let unit = u128::from(unit);
    let tenths = (u128::from(bytes) * 10 + unit / 2) / unit;
    format!("{}.{}", tenths / 10, tenths % 10)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_thousands() {
        assert_eq!(format_number(1234567), "1,234,567");
        assert_eq!(format_number(12), "12");
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(1000), "1,000");
        assert_eq!(format_number(100000), "100,000");
        assert_eq!(format_number(-1234), "-1,234");
        assert_eq!(format_number(i64::MIN), "-9,223,372,036,854,775,808");
    }

    #[test]
    fn file_sizes() {
        assert_eq!(format_file_size(0u64), "");
        assert_eq!(format_file_size(None::<u64>), "");
        assert_eq!(format_file_size(512u64), "512 B");
        assert_eq!(format_file_size(1023u64), "1023 B");
        assert_eq!(format_file_size(1024u64), "1.0 KB");
        assert_eq!(format_file_size(2048u64), "2.0 KB");
        assert_eq!(format_file_size(1536u64), "1.5 KB");
        assert_eq!(format_file_size(5_242_880u64), "5.0 MB");
        assert_eq!(format_file_size(1_048_575u64), "1024.0 KB");
        assert_eq!(format_file_size(u64::MAX), "17592186044416.0 MB");
        assert_eq!(format_file_size(Some(3 * 1024 * 1024 * 1024u64)), "3072.0 MB");
    }

    #[test]
    fn exact_halves_round_up() {
        assert_eq!(format_file_size(1280u64), "1.3 KB");
        assert_eq!(format_file_size(2304u64), "2.3 KB");
        assert_eq!(format_file_size(1_310_720u64), "1.3 MB");
        // 1.24 KB stays below the tie
        assert_eq!(format_file_size(1270u64), "1.2 KB");
    }
}
