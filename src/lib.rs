//! Card deck in-browser WASM server.
//!
//! Exports `handle_request(method, path, query, body)` for the Web Worker
//! bridge to call. Uses `matchit` for URL routing — the same router
//! engine that powers Axum.
//!
//! The deck lives in WASM memory for the browser session and is mirrored to
//! `sessionStorage` through the bridge: every response may end with a
//! `<script>` replaying the storage writes the request made.

use wasm_bindgen::prelude::*;

pub mod config;
pub mod deck;
pub mod logger;
pub mod routes;
pub mod storage;

use crate::config::DeckConfig;
use crate::deck::session::{self, SessionStore};
use crate::routes::cards;
use crate::storage::bridge::persist_script;

/// Process an HTTP-like request against the session deck and return an
/// HTML fragment.
///
/// Called from JavaScript (Web Worker) via wasm-bindgen.
///
/// # Arguments
/// * `method` — HTTP method ("GET" or "POST")
/// * `path`   — URL path (e.g., "/api/cards/shuffle")
/// * `query`  — Query string (e.g., "?id=3")
/// * `body`   — Request body (form data, or JSON for `/api/cards/replace`).
///   Empty string for GET requests.
#[wasm_bindgen]
pub fn handle_request(method: &str, path: &str, query: &str, body: &str) -> String {
    session::with_store_mut(|store| dispatch(store, method, path, query, body))
}

/// Reset the session deck with a JSON `DeckConfig`. Invalid JSON keeps the
/// defaults. Call before the first `/api/cards/restore`.
#[wasm_bindgen]
pub fn configure(config_json: &str) {
    session::reset_store(DeckConfig::from_json_or_default(config_json));
}

/// Install the buffered logger at `level` ("trace" … "error", "off").
#[wasm_bindgen]
pub fn init_logging(level: &str) {
    logger::init(level);
}

/// Take buffered log lines for the bridge to print.
#[wasm_bindgen]
pub fn drain_logs() -> String {
    logger::drain()
}

/// Route a request to its handler against an explicit store, then append
/// any storage writes the handler queued.
pub fn dispatch(store: &mut SessionStore, method: &str, path: &str, query: &str, body: &str) -> String {
    // Build the router. matchit compiles route patterns into a radix tree.
    let mut router = matchit::Router::new();

    router.insert("/api/cards", "deck").ok();
    router.insert("/api/cards/shuffled", "shuffled").ok();
    router.insert("/api/cards/state", "state").ok();
    router.insert("/api/cards/export", "export").ok();
    router.insert("/api/cards/restore", "restore").ok();
    router.insert("/api/cards/create", "create").ok();
    router.insert("/api/cards/shuffle", "shuffle").ok();
    router.insert("/api/cards/discard", "discard").ok();
    router.insert("/api/cards/infect", "infect").ok();
    router.insert("/api/cards/destroy", "destroy").ok();
    router.insert("/api/cards/clear", "clear").ok();
    router.insert("/api/cards/replace", "replace").ok();
    router.insert("/api/cards/import", "import").ok();

    let mut response = match router.at(path) {
        Ok(matched) => match (*matched.value, method) {
            // GET routes
            ("deck", "GET") => cards::handle_deck_get(store, query),
            ("shuffled", "GET") => cards::handle_shuffled_get(store, query),
            ("state", "GET") => cards::handle_state_get(store, query),
            ("export", "GET") => cards::handle_export_get(store, query),

            // POST routes
            ("restore", "POST") => cards::handle_restore_post(store, body),
            ("create", "POST") => cards::handle_create_post(store, body),
            ("shuffle", "POST") => cards::handle_shuffle_post(store, body),
            ("discard", "POST") => cards::handle_discard_post(store, body),
            ("infect", "POST") => cards::handle_infect_post(store, body),
            ("destroy", "POST") => cards::handle_destroy_post(store, body),
            ("clear", "POST") => cards::handle_clear_post(store, body),
            ("replace", "POST") => cards::handle_replace_post(store, body),
            ("import", "POST") => cards::handle_import_post(store, body),

            _ => method_not_allowed(),
        },
        Err(_) => not_found(),
    };

    let writes = store.storage_mut().take_pending();
    if !writes.is_empty() {
        log::debug!("{} {} queued {} storage writes", method, path, writes.len());
        response.push_str(&persist_script(&writes));
    }
    response
}

fn not_found() -> String {
    r#"<span class="text-red-700">404 — route not found</span>"#.to_string()
}

fn method_not_allowed() -> String {
    r#"<span class="text-red-700">405 — method not allowed</span>"#.to_string()
}
