// Formatters - 파일 크기, 날짜, 소요 시간, 미처리 항목 보고서 포맷팅

use chrono::{DateTime, Local};
use std::time::{Duration, SystemTime};

/// 파일 크기를 읽기 쉬운 형식으로 포맷팅 (숫자와 단위 사이 공백)
///
/// # Examples
/// ```ignore
/// assert_eq!(format_file_size(0), "0 B");
/// assert_eq!(format_file_size(512), "512 B");
/// assert_eq!(format_file_size(1536), "1.5 KB");
/// assert_eq!(format_file_size(1_048_576), "1.0 MB");
/// ```
pub fn format_file_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes == 0 {
        "0 B".to_string()
    } else if bytes < KB {
        format!("{} B", bytes)
    } else if bytes < MB {
        let kb = bytes as f64 / KB as f64;
        format!("{:.1} KB", kb)
    } else if bytes < GB {
        let mb = bytes as f64 / MB as f64;
        format!("{:.1} MB", mb)
    } else {
        let gb = bytes as f64 / GB as f64;
        format!("{:.1} GB", gb)
    }
}

/// 시스템 시간을 통일된 날짜 형식으로 포맷팅
///
/// 항상 "YYYY-MM-DD HH:MM" 형식 (16자 고정)
pub fn format_date(time: SystemTime) -> String {
    let datetime: DateTime<Local> = time.into();
    datetime.format("%Y-%m-%d %H:%M").to_string()
}

/// 개수에 따라 단수/복수형 반환
///
/// # Examples
/// ```ignore
/// assert_eq!(pluralize(1, "file", "files"), "1 file");
/// assert_eq!(pluralize(3, "file", "files"), "3 files");
/// assert_eq!(pluralize(0, "item", "items"), "0 items");
/// ```
pub fn pluralize(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{} {}", count, singular)
    } else {
        format!("{} {}", count, plural)
    }
}

/// 숫자를 천단위 콤마로 포맷팅
pub fn format_number_with_commas(n: u64) -> String {
    let s = n.to_string();
    let bytes = s.as_bytes();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    for (i, &b) in bytes.iter().enumerate() {
        if i > 0 && (bytes.len() - i).is_multiple_of(3) {
            result.push(',');
        }
        result.push(b as char);
    }
    result
}

/// 소요 시간을 초 단위 소수 둘째 자리까지 포맷팅 (천단위 콤마 포함)
///
/// 예: 0.5초 → "0.50", 1234.567초 → "1,234.57"
pub fn format_elapsed_seconds(elapsed: Duration) -> String {
    let centis = (elapsed.as_secs_f64() * 100.0).round() as u64;
    format!(
        "{}.{:02}",
        format_number_with_commas(centis / 100),
        centis % 100
    )
}

/// 처리하지 못한 항목 목록 보고서
///
/// 첫 줄은 "<N> item(s) not processed", 이후 한 줄에 경로 하나.
/// 목록이 비어 있으면 빈 문자열.
pub fn format_skipped_report<S: AsRef<str>>(paths: &[S]) -> String {
    if paths.is_empty() {
        return String::new();
    }
    let mut report = pluralize(paths.len(), "item not processed", "items not processed");
    for path in paths {
        report.push('\n');
        report.push_str(path.as_ref());
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_file_size_zero() {
        assert_eq!(format_file_size(0), "0 B");
    }

    #[test]
    fn test_format_file_size_units() {
        assert_eq!(format_file_size(512), "512 B");
        assert_eq!(format_file_size(1536), "1.5 KB");
        assert_eq!(format_file_size(3_670_016), "3.5 MB");
        assert_eq!(format_file_size(2_147_483_648), "2.0 GB");
    }

    #[test]
    fn test_format_date() {
        let formatted = format_date(SystemTime::now());
        // 항상 "YYYY-MM-DD HH:MM" 형식 (16자)
        assert_eq!(formatted.len(), 16);
    }

    #[test]
    fn test_pluralize() {
        assert_eq!(pluralize(0, "file", "files"), "0 files");
        assert_eq!(pluralize(1, "file", "files"), "1 file");
        assert_eq!(pluralize(2, "file", "files"), "2 files");
    }

    #[test]
    fn test_format_number_with_commas() {
        assert_eq!(format_number_with_commas(0), "0");
        assert_eq!(format_number_with_commas(999), "999");
        assert_eq!(format_number_with_commas(1234567), "1,234,567");
    }

    #[test]
    fn test_format_elapsed_seconds() {
        assert_eq!(format_elapsed_seconds(Duration::ZERO), "0.00");
        assert_eq!(format_elapsed_seconds(Duration::from_millis(500)), "0.50");
        assert_eq!(format_elapsed_seconds(Duration::from_millis(2_006)), "2.01");
        assert_eq!(
            format_elapsed_seconds(Duration::from_millis(1_234_567)),
            "1,234.57"
        );
    }

    #[test]
    fn test_format_skipped_report_singular() {
        let report = format_skipped_report(&["Notes/a.txt"]);
        assert_eq!(report, "1 item not processed\nNotes/a.txt");
    }

    #[test]
    fn test_format_skipped_report_plural() {
        let report = format_skipped_report(&["a.txt".to_string(), "sub/b.txt".to_string()]);
        assert_eq!(report, "2 items not processed\na.txt\nsub/b.txt");
    }

    #[test]
    fn test_format_skipped_report_empty() {
        let empty: [&str; 0] = [];
        assert_eq!(format_skipped_report(&empty), "");
    }
}
