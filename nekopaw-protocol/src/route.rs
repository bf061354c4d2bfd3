//! Route table mapping HTTP method and path to bridge operations

use heapless::Vec;

/// Common prefix of every bridge route
pub const API_PREFIX: &str = "/api/bridge";

/// Maximum number of path segments after the prefix
const MAX_SEGMENTS: usize = 4;

/// HTTP request method
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Method {
    Get,
    Post,
}

impl Method {
    /// Parse a request-line method token
    pub fn parse(token: &str) -> Option<Self> {
        if token.eq_ignore_ascii_case("GET") {
            Some(Method::Get)
        } else if token.eq_ignore_ascii_case("POST") {
            Some(Method::Post)
        } else {
            None
        }
    }
}

/// A resolved bridge operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Route<'r> {
    /// Device info and runtime counters
    Device,
    /// List registered capabilities
    Capabilities,
    /// Read every sensor
    Sensors,
    /// Read one sensor by id
    Sensor(&'r str),
    /// Execute a command on an output by id
    Output(&'r str),
    /// Display session snapshot
    DisplayState,
    /// Show text content
    DisplayText,
    /// Show a raw bitmap
    DisplayBitmap,
    /// Show a confirmation prompt
    DisplayConfirm,
    /// Query the status of a confirmation ticket
    ConfirmStatus(u32),
    /// Resolve the pending confirmation
    ResolveConfirm,
    /// Clear the display
    DisplayClear,
    /// Drain queued input events
    Events,
}

impl<'r> Route<'r> {
    /// Resolve a method and path (without query string)
    ///
    /// Returns `None` for unknown paths and for known paths used with the
    /// wrong method.
    pub fn parse(method: Method, path: &'r str) -> Option<Self> {
        let rest = path.strip_prefix(API_PREFIX)?;
        if !rest.is_empty() && !rest.starts_with('/') {
            return None;
        }

        let mut parts: Vec<&'r str, MAX_SEGMENTS> = Vec::new();
        for segment in rest.split('/').filter(|s| !s.is_empty()) {
            parts.push(segment).ok()?;
        }

        use Method::*;
        match (method, parts.as_slice()) {
            (Get, ["device"]) => Some(Route::Device),
            (Get, ["capabilities"]) => Some(Route::Capabilities),
            (Get, ["sensors"]) => Some(Route::Sensors),
            (Get, ["sensors", id]) => Some(Route::Sensor(*id)),
            (Post, ["outputs", id]) => Some(Route::Output(*id)),
            (Get, ["display"]) => Some(Route::DisplayState),
            (Post, ["display", "text"]) => Some(Route::DisplayText),
            (Post, ["display", "bitmap"]) => Some(Route::DisplayBitmap),
            (Post, ["display", "confirm"]) => Some(Route::DisplayConfirm),
            (Post, ["display", "confirm", "resolve"]) => Some(Route::ResolveConfirm),
            (Get, ["display", "confirm", ticket]) => ticket.parse().ok().map(Route::ConfirmStatus),
            (Post, ["display", "clear"]) => Some(Route::DisplayClear),
            (Get, ["events"]) => Some(Route::Events),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_parse() {
        assert_eq!(Method::parse("GET"), Some(Method::Get));
        assert_eq!(Method::parse("post"), Some(Method::Post));
        assert_eq!(Method::parse("DELETE"), None);
    }

    #[test]
    fn test_static_routes() {
        assert_eq!(
            Route::parse(Method::Get, "/api/bridge/device"),
            Some(Route::Device)
        );
        assert_eq!(
            Route::parse(Method::Post, "/api/bridge/display/text"),
            Some(Route::DisplayText)
        );
        assert_eq!(
            Route::parse(Method::Post, "/api/bridge/display/confirm/resolve"),
            Some(Route::ResolveConfirm)
        );
    }

    #[test]
    fn test_parameterized_routes() {
        assert_eq!(
            Route::parse(Method::Get, "/api/bridge/sensors/battery"),
            Some(Route::Sensor("battery"))
        );
        assert_eq!(
            Route::parse(Method::Post, "/api/bridge/outputs/led_rgb"),
            Some(Route::Output("led_rgb"))
        );
        assert_eq!(
            Route::parse(Method::Get, "/api/bridge/display/confirm/7"),
            Some(Route::ConfirmStatus(7))
        );
    }

    #[test]
    fn test_trailing_slash() {
        assert_eq!(
            Route::parse(Method::Get, "/api/bridge/sensors/"),
            Some(Route::Sensors)
        );
    }

    #[test]
    fn test_wrong_method() {
        assert_eq!(Route::parse(Method::Get, "/api/bridge/display/text"), None);
        assert_eq!(Route::parse(Method::Post, "/api/bridge/device"), None);
    }

    #[test]
    fn test_unknown_paths() {
        assert_eq!(Route::parse(Method::Get, "/api/other/device"), None);
        assert_eq!(Route::parse(Method::Get, "/api/bridgedevice"), None);
        assert_eq!(Route::parse(Method::Get, "/api/bridge/display/confirm/abc"), None);
        assert_eq!(Route::parse(Method::Get, "/api/bridge/a/b/c/d/e"), None);
    }

    proptest::proptest! {
        #[test]
        fn prop_foreign_prefix_never_routes(path in "/[a-z/]{0,40}") {
            if !path.starts_with(API_PREFIX) {
                proptest::prop_assert!(Route::parse(Method::Get, &path).is_none());
                proptest::prop_assert!(Route::parse(Method::Post, &path).is_none());
            }
        }

        #[test]
        fn prop_sensor_id_is_preserved(id in "[a-z0-9_]{1,16}") {
            let path = alloc::format!("{}/sensors/{}", API_PREFIX, id);
            proptest::prop_assert_eq!(Route::parse(Method::Get, &path), Some(Route::Sensor(&id)));
        }
    }
}
