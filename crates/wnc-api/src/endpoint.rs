// RESTCONF URL construction.
//
// Endpoint strings come from domain accessors and are treated as opaque
// data: the only transformations are leading-slash normalization and
// prefixing bare data-resource paths with the RESTCONF data root.

use std::borrow::Cow;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

use crate::config::Protocol;

/// Root of the RESTCONF data resource tree.
pub const DATA_ROOT: &str = "/restconf/data";

/// Root of the RESTCONF operations (RPC) resource.
pub const OPERATIONS_ROOT: &str = "/restconf/operations";

/// Characters left untouched in list-key values: RFC 3986 unreserved.
const KEY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Compose `<scheme>://<host><path>`, adding a single leading `/` to
/// `endpoint` when it has none.
pub fn build_url(protocol: Protocol, host: &str, endpoint: &str) -> String {
    let scheme = protocol.scheme();
    if endpoint.starts_with('/') {
        format!("{scheme}://{host}{endpoint}")
    } else {
        format!("{scheme}://{host}/{endpoint}")
    }
}

/// Map a caller-supplied endpoint onto a RESTCONF path.
///
/// Paths already rooted at `/restconf` pass through unchanged; anything
/// else is a data-resource suffix such as
/// `Cisco-IOS-XE-wireless-access-point-oper:access-point-oper-data`.
pub fn resolve(endpoint: &str) -> Cow<'_, str> {
    let bare = endpoint.strip_prefix('/').unwrap_or(endpoint);
    if bare == "restconf" || bare.starts_with("restconf/") {
        Cow::Borrowed(endpoint)
    } else {
        Cow::Owned(data_path(bare))
    }
}

/// `/restconf/data/<suffix>`
pub fn data_path(suffix: &str) -> String {
    join(DATA_ROOT, suffix)
}

/// `/restconf/operations/<rpc>`
pub fn operations_path(rpc: &str) -> String {
    join(OPERATIONS_ROOT, rpc)
}

/// Module-qualified node name: `<module>:<node>`.
pub fn qualified(module: &str, node: &str) -> String {
    format!("{module}:{node}")
}

/// Address one entry of a YANG list: `<path>/<list>=<k1>,<k2>`.
///
/// Key values are percent-encoded so separators inside them (`,`, `/`,
/// `:` in MAC addresses) cannot be confused with path syntax.
pub fn list_entry(path: &str, list: &str, keys: &[&str]) -> String {
    let keys = keys
        .iter()
        .map(|k| utf8_percent_encode(k, KEY_VALUE).to_string())
        .collect::<Vec<_>>()
        .join(",");
    format!("{}/{list}={keys}", path.trim_end_matches('/'))
}

fn join(root: &str, suffix: &str) -> String {
    let suffix = suffix.trim_start_matches('/');
    if suffix.is_empty() {
        root.to_owned()
    } else {
        format!("{root}/{suffix}")
    }
}
