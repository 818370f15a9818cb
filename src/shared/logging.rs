use super::paths::StatePaths;
use std::fs;
use std::io::Write;
use std::path::Path;

pub fn now_secs() -> i64 {
    chrono::Utc::now().timestamp()
}

pub fn append_wizard_log(paths: &StatePaths, level: &str, event: &str, message: &str) {
    append_json_line(&paths.wizard_log_path(), level, event, message);
}

pub fn append_access_log(paths: &StatePaths, level: &str, event: &str, message: &str) {
    append_json_line(&paths.access_log_path(), level, event, message);
}

fn append_json_line(path: &Path, level: &str, event: &str, message: &str) {
    let payload = serde_json::json!({
        "timestamp": now_secs(),
        "level": level,
        "event": event,
        "message": message,
    });

    let Ok(line) = serde_json::to_string(&payload) else {
        return;
    };

    if let Some(parent) = path.parent() {
        if fs::create_dir_all(parent).is_err() {
            return;
        }
    }
    let Ok(mut file) = fs::OpenOptions::new().create(true).append(true).open(path) else {
        return;
    };
    let _ = writeln!(file, "{line}");
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn wizard_log_lines_are_json_objects() {
        let dir = tempdir().expect("tempdir");
        let paths = StatePaths::new(dir.path());

        append_wizard_log(&paths, "info", "wizard.open", "okta-saml opened");
        append_wizard_log(&paths, "warn", "wizard.advance_rejected", "step 3 not reachable");

        let raw = fs::read_to_string(paths.wizard_log_path()).expect("log");
        let lines: Vec<serde_json::Value> = raw
            .lines()
            .map(|line| serde_json::from_str(line).expect("json line"))
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["event"], "wizard.open");
        assert_eq!(lines[1]["level"], "warn");
        assert!(lines[1]["timestamp"].as_i64().is_some());
    }
}
