//! 時間格式工具
//!
//! 字幕用 `HH:MM:SS,mmm`，ffmpeg seek 用 `HH:MM:SS`（無條件捨去）。

/// 將秒數格式化為字幕時間戳 `HH:MM:SS,mmm`
///
/// 先四捨五入到毫秒再拆分，避免 `59.9996` 變成 `00:00:60,000`
#[must_use]
pub fn format_srt_timestamp(seconds: f64) -> String {
    let total_millis = if seconds.is_finite() && seconds > 0.0 {
        (seconds * 1000.0).round() as u64
    } else {
        0
    };

    let hours = total_millis / 3_600_000;
    let minutes = (total_millis % 3_600_000) / 60_000;
    let secs = (total_millis % 60_000) / 1000;
    let millis = total_millis % 1000;

    format!("{hours:02}:{minutes:02}:{secs:02},{millis:03}")
}

/// 將秒數格式化為 seek 用的 `HH:MM:SS`，小數部分直接捨去
#[must_use]
pub fn format_seek_timestamp(seconds: f64) -> String {
    let whole = if seconds.is_finite() && seconds > 0.0 {
        seconds.trunc() as u64
    } else {
        0
    };

    let hours = whole / 3600;
    let minutes = (whole % 3600) / 60;
    let secs = whole % 60;

    format!("{hours:02}:{minutes:02}:{secs:02}")
}

/// 產生 `count` 個取樣時間點，第 i 個為 `i * interval_seconds`
#[must_use]
pub fn timemarks(count: usize, interval_seconds: f64) -> Vec<String> {
    (0..count)
        .map(|i| format_seek_timestamp(i as f64 * interval_seconds))
        .collect()
}

/// 依影片長度與取樣間隔計算縮圖數量
///
/// 長度先捨去到整數秒，0 秒視為 1 秒；結果至少為 1
#[must_use]
pub fn thumbnail_count(duration_seconds: f64, interval_seconds: f64) -> usize {
    let duration = if duration_seconds.is_finite() && duration_seconds >= 1.0 {
        duration_seconds.trunc()
    } else {
        1.0
    };

    if interval_seconds <= 0.0 || !interval_seconds.is_finite() {
        return 1;
    }

    ((duration / interval_seconds).ceil() as usize).max(1)
}
