use chrono::Local;

/// Local time in the classic `ctime` layout, e.g. `Sat Oct 18 09:41:07 2026`
pub fn ctime_now() -> String {
    Local::now().format("%a %b %e %H:%M:%S %Y").to_string()
}
