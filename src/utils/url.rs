//! URL utilities for building backend endpoints.

use crate::core::mode::Mode;

/// The endpoint a mode posts to. RAG uses the route exactly as configured;
/// consensus appends its suffix directly, so the route should end with `/`.
///
/// # Examples
///
/// ```
/// use flava::core::mode::Mode;
/// use flava::utils::url::mode_endpoint;
///
/// assert_eq!(
///     mode_endpoint("http://localhost:8080/api/routes/chat/", Mode::Consensus),
///     "http://localhost:8080/api/routes/chat/consensus"
/// );
/// ```
pub fn mode_endpoint(backend_route: &str, mode: Mode) -> String {
    match mode.endpoint_suffix() {
        None => backend_route.to_string(),
        Some(suffix) => format!("{backend_route}{suffix}"),
    }
}
