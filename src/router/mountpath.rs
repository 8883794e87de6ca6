//! Mount path prefixing.
//!
//! An application is served under a mount path (`/blog`, or the site root). Every
//! configured route is prefixed with the normalized mount path once, when its
//! [`Route`](super::Route) is built.

/// Normalize a mount path: leading `/`, no trailing `/`, root collapses to `""`
///
/// ```
/// use waypost::router::normalize_mountpath;
///
/// assert_eq!(normalize_mountpath(None), "");
/// assert_eq!(normalize_mountpath(Some("/")), "");
/// assert_eq!(normalize_mountpath(Some("blog/")), "/blog");
/// ```
#[must_use]
pub fn normalize_mountpath(mountpath: Option<&str>) -> String {
    let root = mountpath.unwrap_or("");
    let mut root = if root.starts_with('/') {
        root.to_string()
    } else {
        format!("/{root}")
    };
    // Every trailing slash goes, so normalizing an already normalized value is a no-op.
    while root.ends_with('/') {
        root.pop();
    }
    root
}

/// Prefix a route path with a mount path
///
/// The result always begins with `/`; a missing route path mounts the page on the
/// mount path's root.
///
/// ```
/// use waypost::router::normalize;
///
/// assert_eq!(normalize(None, Some("blahblah")), "/blahblah");
/// assert_eq!(normalize(Some("/"), Some("/blahblah")), "/blahblah");
/// assert_eq!(normalize(Some("mountpath/"), Some("/blahblah")), "/mountpath/blahblah");
/// ```
#[must_use]
pub fn normalize(mountpath: Option<&str>, route_path: Option<&str>) -> String {
    let root = normalize_mountpath(mountpath);
    let path = route_path.unwrap_or("");
    if path.starts_with('/') {
        format!("{root}{path}")
    } else {
        format!("{root}/{path}")
    }
}
