use std::fmt::Write as _;

use pgycheck_core::UpdateInfo;

pub fn render_json(info: &UpdateInfo) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(info)
}

pub fn render_summary(info: &UpdateInfo) -> String {
    let mut out = String::new();

    if info.build_have_new_version {
        let _ = writeln!(
            out,
            "New version available: {} (build {})",
            display_or_unknown(&info.build_version),
            info.build_build_version
        );
    } else {
        let _ = writeln!(out, "No new version available");
    }

    if info.requires_forced_update() {
        let _ = writeln!(
            out,
            "Forced update required to {}",
            display_or_unknown(&info.force_update_version)
        );
    }

    if !info.download_url.is_empty() {
        let _ = writeln!(out, "Download: {}", info.download_url);
    }

    if !info.build_update_description.is_empty() {
        let _ = writeln!(out, "\n{}", info.build_update_description.trim_end());
    }

    out
}

fn display_or_unknown(value: &str) -> &str {
    if value.is_empty() { "unknown" } else { value }
}
