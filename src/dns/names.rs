//! Domain name helpers.

/// Removes one trailing root-zone dot.
///
/// A bare `"."` is returned unchanged.
pub fn strip_root_dot(name: &str) -> &str {
    if name.len() > 1 && name.ends_with('.') {
        &name[..name.len() - 1]
    } else {
        name
    }
}

/// Owner name of the TLSA RRset for a TCP service: `_PORT._tcp.NAME`.
pub fn tlsa_name(name: &str, port: u16) -> String {
    format!("_{port}._tcp.{}", strip_root_dot(name))
}

/// Top-level label of a name, used as the `zone` column.
///
/// A single-label name is its own zone.
pub fn zone_of(name: &str) -> &str {
    let name = strip_root_dot(name);
    name.rsplit('.').next().unwrap_or(name)
}
