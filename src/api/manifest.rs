//! Web application manifest endpoint.

use axum::extract::Request;
use serde::{Deserialize, Serialize};

use super::{method_not_allowed, send_json};
use crate::servlet::{Servlet, ServletResponse, is_get_or_head};

/// Content type of the manifest and repository list responses.
pub const MANIFEST_CONTENT_TYPE: &str = "application/manifest+json";

/// The web application manifest document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebManifest {
    /// Full application name.
    pub name: String,
    /// Name used where space is limited.
    pub short_name: String,
    /// Page opened when the application is launched.
    pub start_url: String,
}

impl Default for WebManifest {
    fn default() -> Self {
        Self {
            name: "HgDash".to_string(),
            short_name: "HgDash".to_string(),
            start_url: "index.html".to_string(),
        }
    }
}

/// Servlet answering GET and HEAD with a fixed manifest document.
#[derive(Debug, Clone)]
pub struct Manifest {
    manifest: WebManifest,
}

impl Default for Manifest {
    fn default() -> Self {
        Self::new()
    }
}

impl Manifest {
    /// Creates the servlet for the default HgDash manifest.
    #[must_use]
    pub fn new() -> Self {
        Self::with_manifest(&WebManifest::default())
    }

    /// Creates the servlet for a custom manifest.
    #[must_use]
    pub fn with_manifest(manifest: &WebManifest) -> Self {
        Self {
            manifest: manifest.clone(),
        }
    }
}

impl Servlet for Manifest {
    fn service(&self, request: &Request, response: &mut ServletResponse) {
        if is_get_or_head(request.method()) {
            send_json(response, &self.manifest);
        } else {
            method_not_allowed(response);
        }
    }
}
