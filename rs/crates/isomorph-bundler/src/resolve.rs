/// Resolve a relative `require` specifier against the requiring module.
///
/// Returns the canonical id (`./dir/file.js`), or `None` when the specifier
/// is not relative or climbs above the module root. A missing extension
/// defaults to `.js`.
pub fn resolve(from: &str, spec: &str) -> Option<String> {
    if !is_relative(spec) {
        return None;
    }

    let mut segments: Vec<&str> = from
        .trim_start_matches("./")
        .split('/')
        .filter(|s| !s.is_empty())
        .collect();
    // Drop the requiring file's own name.
    segments.pop();

    for part in spec.split('/') {
        match part {
            "" | "." => {}
            ".." => {
                segments.pop()?;
            }
            name => segments.push(name),
        }
    }

    let last = segments.last()?;
    let mut id = format!("./{}", segments.join("/"));
    if !last.contains('.') {
        id.push_str(".js");
    }
    Some(id)
}

/// Canonical id for an entry given relative to the module root.
pub fn entry_id(entry: &str) -> Option<String> {
    let spec = if is_relative(entry) {
        entry.to_string()
    } else {
        format!("./{}", entry)
    };
    resolve("./", &spec)
}

pub fn is_relative(spec: &str) -> bool {
    spec.starts_with("./") || spec.starts_with("../")
}
