use serde::Serialize;
use serde_json::{Map, Value};

/// Update descriptor returned by a successful check.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
#[allow(clippy::struct_excessive_bools)]
pub struct UpdateInfo {
    /// Build number generated by the service to tell historical builds apart.
    pub build_build_version: i64,
    /// Version that must be installed, empty when no forced update is set.
    pub force_update_version: String,
    /// Build number of the forced update version.
    pub force_update_version_no: String,
    pub need_force_update: bool,
    /// Install page of the application.
    #[serde(rename = "downloadURL")]
    pub download_url: String,
    pub build_have_new_version: bool,
    /// Build number of the uploaded package (`versionCode` on Android).
    pub build_version_no: String,
    /// User-facing version string, for example `8.2.1`.
    pub build_version: String,
    /// Short link to the application page.
    pub build_shortcut_url: String,
    /// Release notes of the latest build.
    pub build_update_description: String,
}

impl UpdateInfo {
    /// Decode the nested `data` object of a successful response.
    ///
    /// Never fails: absent or mistyped fields fall back to their defaults.
    #[must_use]
    pub fn from_data(data: &Map<String, Value>) -> Self {
        Self {
            build_build_version: lenient(data, "buildBuildVersion", build_number),
            force_update_version: lenient(data, "forceUpdateVersion", string),
            force_update_version_no: lenient(data, "forceUpdateVersionNo", string),
            need_force_update: lenient(data, "needForceUpdate", Value::as_bool),
            download_url: lenient(data, "downloadURL", string),
            build_have_new_version: lenient(data, "buildHaveNewVersion", Value::as_bool),
            build_version_no: lenient(data, "buildVersionNo", string),
            build_version: lenient(data, "buildVersion", string),
            build_shortcut_url: lenient(data, "buildShortcutUrl", string),
            build_update_description: lenient(data, "buildUpdateDescription", string),
        }
    }

    #[must_use]
    pub fn requires_forced_update(&self) -> bool {
        self.need_force_update
    }
}

/// Read `key` from `object`, falling back to `T::default()` when the field is
/// absent or `extract` rejects its value.
pub fn lenient<T, F>(object: &Map<String, Value>, key: &str, extract: F) -> T
where
    T: Default,
    F: FnOnce(&Value) -> Option<T>,
{
    object.get(key).and_then(extract).unwrap_or_default()
}

fn string(value: &Value) -> Option<String> {
    value.as_str().map(str::to_string)
}

// The service sends the build number as a string.
fn build_number(value: &Value) -> Option<i64> {
    match value {
        Value::String(text) => text.trim().parse().ok(),
        Value::Number(number) => number.as_i64(),
        _ => None,
    }
}
