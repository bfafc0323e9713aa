//! Naming helpers shared by adapters, the builder and generators.

/// Derive a node name from a raw definition key.
///
/// The module path (everything up to the last `.`) is dropped, then a leading
/// `<scope>_` prefix. File-module keys (`cmip6.ocean_grid`, `ocean_grid`) and
/// in-line keys (`grid`) therefore yield the same name.
pub fn strip_module_namespace(key: &str, scope: &str) -> String {
    let last = key.rsplit('.').next().unwrap_or(key);
    if scope.is_empty() {
        return last.to_string();
    }

    let prefix = format!("{}_", scope);
    match last.strip_prefix(&prefix) {
        Some(rest) if !rest.is_empty() => rest.to_string(),
        _ => last.to_string(),
    }
}

/// Human readable label for a snake_case name (`sea_ice` -> `Sea Ice`).
pub fn to_label(name: &str) -> String {
    name.split('_')
        .filter(|part| !part.is_empty())
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

/// CamelCase form of a snake_case name (`sea_ice` -> `SeaIce`).
pub fn to_camel_case(name: &str) -> String {
    name.split('_')
        .filter(|part| !part.is_empty())
        .map(capitalize)
        .collect()
}

/// Label for a full identifier: every segment after the namespace, labelled and
/// joined with ` > `.
pub fn id_label(id: &str) -> String {
    id.split('.')
        .skip(1)
        .map(to_label)
        .collect::<Vec<_>>()
        .join(" > ")
}

fn capitalize(part: &str) -> String {
    let mut chars = part.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
