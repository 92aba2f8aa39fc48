//! Default value generators for field documentation metadata.

use super::super::AppName;

/// Generates the default field ID for help or `long_help`.
pub(super) fn default_field_id(app_name: &AppName, field: &str, suffix: &str) -> String {
    format!("{}.fields.{field}.{suffix}", &**app_name)
}

/// Generates the default environment variable name from prefix and field.
///
/// Inserts an underscore between prefix and field when joining (unless the prefix
/// already ends with '_' or the field starts with '_') to produce names like
/// `APP_URL` instead of `APPURL`.
pub(super) fn default_env_name(prefix: Option<&str>, field: &str) -> String {
    let mut name = String::new();
    if let Some(prefix_value) = prefix {
        name.push_str(prefix_value);
        // Insert underscore separator if needed
        let prefix_ends_with_underscore = prefix_value.ends_with('_');
        let field_starts_with_underscore = field.starts_with('_');
        if !prefix_ends_with_underscore && !field_starts_with_underscore {
            name.push('_');
        }
    }
    name.push_str(field);
    name.chars()
        .map(|ch| {
            if ch.is_ascii_alphanumeric() {
                ch.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect()
}
