//! 통계 및 유틸리티 모듈
//!
//! 처리 통계 수집 및 포맷팅을 담당합니다.

use colored::Colorize;
use std::cell::Cell;
use std::time::{Duration, Instant};

/// 처리 통계 구조체
///
/// 분류 루프가 있는 스레드 안에서만 사용합니다 (`Sync` 아님).
#[derive(Debug, Default)]
pub struct Statistics {
    /// 총 파일 수
    pub total_files: usize,
    /// 이동(복사)된 파일 수
    pub transferred_count: Cell<usize>,
    /// 조건에 맞지 않아 건너뛴 파일 수
    pub unmatched_count: Cell<usize>,
    /// 대상 파일이 이미 있어 건너뛴 수
    pub existing_count: Cell<usize>,
    /// 에러 발생 수
    pub error_count: Cell<usize>,
    /// 이동(복사)된 총 바이트
    pub total_bytes_transferred: Cell<u64>,
    /// 처리 시작 시간
    start_time: Option<Instant>,
}

impl Statistics {
    /// 새 통계 인스턴스 생성
    pub fn new(total_files: usize) -> Self {
        Self {
            total_files,
            start_time: Some(Instant::now()),
            ..Default::default()
        }
    }

    pub fn increment_transferred(&self) {
        bump(&self.transferred_count, 1);
    }

    pub fn increment_unmatched(&self) {
        bump(&self.unmatched_count, 1);
    }

    pub fn increment_existing(&self) {
        bump(&self.existing_count, 1);
    }

    pub fn increment_error(&self) {
        bump(&self.error_count, 1);
    }

    pub fn add_bytes_transferred(&self, bytes: u64) {
        bump(&self.total_bytes_transferred, bytes);
    }

    pub fn get_transferred_count(&self) -> usize {
        self.transferred_count.get()
    }

    pub fn get_unmatched_count(&self) -> usize {
        self.unmatched_count.get()
    }

    pub fn get_existing_count(&self) -> usize {
        self.existing_count.get()
    }

    pub fn get_error_count(&self) -> usize {
        self.error_count.get()
    }

    pub fn get_bytes_transferred(&self) -> u64 {
        self.total_bytes_transferred.get()
    }

    /// 경과 시간 반환
    pub fn elapsed(&self) -> Duration {
        self.start_time
            .map(|t| t.elapsed())
            .unwrap_or(Duration::ZERO)
    }

    /// 분류 결과 요약 출력
    ///
    /// `action`은 "이동" 또는 "복사"처럼 전송 방식을 나타냅니다.
    pub fn print_summary(&self, action: &str) {
        let transferred = self.get_transferred_count();
        let unmatched = self.get_unmatched_count();
        let existing = self.get_existing_count();
        let errors = self.get_error_count();

        println!("\n{}", "═".repeat(50).bright_blue());
        println!("{}", " 📊 분류 결과".bright_white().bold());
        println!("{}", "═".repeat(50).bright_blue());

        println!(
            "  {} 전체 파일:    {}",
            "📁".bright_cyan(),
            self.total_files
        );
        println!(
            "  {} {}:         {}",
            "✅".bright_green(),
            action,
            transferred.to_string().green()
        );
        println!(
            "  {} 미매칭:       {}",
            "⏭️".bright_yellow(),
            unmatched.to_string().yellow()
        );

        if existing > 0 {
            println!(
                "  {} 기존 파일:    {}",
                "📎".bright_white(),
                existing.to_string().yellow()
            );
        }

        if errors > 0 {
            println!(
                "  {} 실패:         {}",
                "❌".bright_red(),
                errors.to_string().red()
            );
        } else {
            println!("  {} 실패:         {}", "✅".bright_green(), "0".green());
        }

        println!(
            "  {} {} 용량:    {}",
            "📦".bright_magenta(),
            action,
            format_bytes(self.get_bytes_transferred())
        );

        if self.total_files > 0 {
            let match_rate = (transferred as f64 / self.total_files as f64) * 100.0;
            println!("  {} 분류율:       {:.1}%", "📈".bright_white(), match_rate);
        }

        println!(
            "  {} 처리 시간:    {}",
            "⏱️".bright_cyan(),
            format_duration(self.elapsed())
        );

        println!("{}", "═".repeat(50).bright_blue());
    }
}

fn bump<T: Copy + std::ops::Add<Output = T>>(cell: &Cell<T>, amount: T) {
    cell.set(cell.get() + amount);
}

/// 바이트를 읽기 쉬운 형식으로 변환
///
/// # Examples
/// ```
/// use jsorter::stats::format_bytes;
///
/// assert_eq!(format_bytes(500), "500 B");
/// assert_eq!(format_bytes(1024), "1.00 KB");
/// assert_eq!(format_bytes(1048576), "1.00 MB");
/// ```
pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

/// 경과 시간을 읽기 쉬운 형식으로 변환
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    let millis = duration.subsec_millis();

    if secs >= 3600 {
        let hours = secs / 3600;
        let mins = (secs % 3600) / 60;
        format!("{}시간 {}분", hours, mins)
    } else if secs >= 60 {
        let mins = secs / 60;
        let remaining_secs = secs % 60;
        format!("{}분 {}초", mins, remaining_secs)
    } else if secs > 0 {
        format!("{}.{:03}초", secs, millis)
    } else {
        format!("{}ms", millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(0), "0 B");
        assert_eq!(format_bytes(1023), "1023 B");
        assert_eq!(format_bytes(1536), "1.50 KB");
        assert_eq!(format_bytes(1073741824), "1.00 GB");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_millis(500)), "500ms");
        assert_eq!(format_duration(Duration::from_secs(5)), "5.000초");
        assert_eq!(format_duration(Duration::from_secs(65)), "1분 5초");
        assert_eq!(format_duration(Duration::from_secs(3665)), "1시간 1분");
    }

    #[test]
    fn test_statistics_counters() {
        let stats = Statistics::new(10);

        stats.increment_transferred();
        stats.increment_transferred();
        stats.increment_unmatched();
        stats.increment_existing();
        stats.increment_error();
        stats.add_bytes_transferred(1024);

        assert_eq!(stats.get_transferred_count(), 2);
        assert_eq!(stats.get_unmatched_count(), 1);
        assert_eq!(stats.get_existing_count(), 1);
        assert_eq!(stats.get_error_count(), 1);
        assert_eq!(stats.get_bytes_transferred(), 1024);
    }
}
