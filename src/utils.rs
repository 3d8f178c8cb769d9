use chrono::Utc;

/// Seconds since epoch, the unit unlock times are reported in
pub fn unix_now() -> i64 {
    Utc::now().timestamp()
}

/// Lowercased file name of a process or path, used for case-insensitive matching
pub fn normalize_process_name(name: &str) -> String {
    let file_name = name.rsplit(['\\', '/']).next().unwrap_or(name);
    file_name.to_lowercase()
}
