//! Repository list endpoint.

use std::sync::Arc;

use axum::extract::Request;

use super::{method_not_allowed, send_json};
use crate::repository::RepositoryProvider;
use crate::servlet::{Servlet, ServletResponse, is_get_or_head};

/// Servlet answering GET and HEAD with the JSON array of repository paths.
///
/// The provider is queried on every request.
pub struct RepositoryList {
    provider: Arc<dyn RepositoryProvider>,
}

impl RepositoryList {
    /// Creates the servlet over `provider`.
    #[must_use]
    pub fn new(provider: Arc<dyn RepositoryProvider>) -> Self {
        Self { provider }
    }
}

impl Servlet for RepositoryList {
    fn service(&self, request: &Request, response: &mut ServletResponse) {
        if !is_get_or_head(request.method()) {
            method_not_allowed(response);
            return;
        }

        let paths = self.provider.list_paths();
        log::debug!("Listing {} repositories", paths.len());
        send_json(response, &paths);
    }
}
