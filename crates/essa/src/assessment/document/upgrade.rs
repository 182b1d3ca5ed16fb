use super::{ImportError, CURRENT_SCHEMA_VERSION};
use serde_json::{Map, Value};
use tracing::warn;

/// Documents without `schema_version` were written by the first release.
const LEGACY_SCHEMA_VERSION: u64 = 1;

/// Top-level fields that fall back to their defaults when null.
const OPTIONAL_FIELDS: [&str; 12] = [
    "description",
    "trl",
    "scoping_notes",
    "core_function",
    "functional_unit",
    "lifecycle_stages",
    "lifecycle_changed",
    "stage_sections",
    "selected_factors",
    "grid",
    "scale",
    "averages",
];

type Step = fn(&mut Map<String, Value>) -> Result<(), ImportError>;

fn step_from(version: u64) -> Option<Step> {
    match version {
        1 => Some(legacy_to_v2),
        _ => None,
    }
}

/// Upgrades `map` to the current schema, returning it with the version it started at.
pub(super) fn to_current(
    mut map: Map<String, Value>,
) -> Result<(Map<String, Value>, u64), ImportError> {
    let source_version = match map.get("schema_version") {
        None | Some(Value::Null) => LEGACY_SCHEMA_VERSION,
        Some(value) => value.as_u64().ok_or_else(|| ImportError::InvalidField {
            field: "schema_version".to_string(),
            reason: format!("expected a positive integer, found {value}"),
        })?,
    };

    if source_version > CURRENT_SCHEMA_VERSION {
        return Err(ImportError::UnsupportedVersion(source_version));
    }

    let mut version = source_version.max(LEGACY_SCHEMA_VERSION);
    while version < CURRENT_SCHEMA_VERSION {
        let step = step_from(version).ok_or(ImportError::UnsupportedVersion(version))?;
        step(&mut map)?;
        version += 1;
    }

    for field in OPTIONAL_FIELDS {
        if matches!(map.get(field), Some(Value::Null)) {
            map.remove(field);
        }
    }
    map.insert("schema_version".to_string(), Value::from(CURRENT_SCHEMA_VERSION));

    Ok((map, source_version))
}

/// First-release documents: results exports keyed the name as `project`, and the
/// scale orientation was never recorded.
fn legacy_to_v2(map: &mut Map<String, Value>) -> Result<(), ImportError> {
    let has_name = matches!(map.get("name"), Some(Value::String(_)));
    if !has_name {
        if let Some(Value::String(name)) = map.remove("project") {
            map.insert("name".to_string(), Value::String(name));
        }
    }

    if !map.contains_key("scale") {
        let name = map
            .get("name")
            .and_then(serde_json::Value::as_str)
            .unwrap_or_default();
        warn!(
            project = name,
            "legacy document has no scale orientation, scores kept as stored"
        );
        map.insert("scale".to_string(), Value::from("unconfirmed"));
    }

    Ok(())
}
