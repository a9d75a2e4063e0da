//! Browser-side service worker script.
//!
//! The script is rendered from [`WorkerConfig`] so the cache name and the
//! precache list have a single source shared with the server.

use crate::config::WorkerConfig;
use crate::error::Result;

/// Path the worker script is served at. Pages register it relative to the root.
pub const SERVICE_WORKER_PATH: &str = "/service.js";

/// Returns the service worker JavaScript for `config`.
///
/// # Errors
///
/// Returns an error if the cache name or precache list cannot be encoded
/// as JSON literals.
pub fn service_worker_js(config: &WorkerConfig) -> Result<String> {
    let cache_name = serde_json::to_string(&config.cache_name)?;
    let precache = serde_json::to_string(&config.precache)?;

    Ok(format!(
        r##"// hgdash service worker
"use strict";

const CACHE_NAME = {cache_name};

const CACHE_CONTENTS = {precache};

self.addEventListener("install", (event) => {{
    event.waitUntil(
        caches.open(CACHE_NAME).then((cache) => cache.addAll(CACHE_CONTENTS))
    );
}});

self.addEventListener("activate", (event) => {{
    event.waitUntil(
        caches.keys().then((keys) => Promise.all(
            keys.filter((key) => key !== CACHE_NAME)
                .map((key) => caches.delete(key))
        ))
    );
}});

self.addEventListener("fetch", (event) => {{
    if (event.request.method !== "GET") {{
        return;
    }}
    event.respondWith(
        caches.open(CACHE_NAME).then(async (cache) => {{
            const cached = await cache.match(event.request);
            if (cached != null) {{
                return cached;
            }}
            return fetch(event.request);
        }})
    );
}});
"##
    ))
}
