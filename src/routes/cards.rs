//! `/api/cards/*` routes — the deck panel and its mutations.
//!
//! Every handler receives the session store from the router. Mutations
//! re-render the deck panel; the router appends the `sessionStorage` writes
//! they queued.

use crate::deck::render::{error_html, render_deck};
use crate::deck::session::SessionStore;
use crate::deck::{Card, StoreError};
use crate::routes::util::{get_card_id, get_param, parse_form_body};

fn render(store: &SessionStore) -> String {
    render_deck(&store.view(), &store.config().deleted_label)
}

/// Re-render the deck, prefixed with an error line if the mutation failed.
fn render_after<T>(store: &SessionStore, result: Result<T, StoreError>) -> String {
    match result {
        Ok(_) => render(store),
        Err(e) => {
            log::warn!("Deck update failed: {}", e);
            let mut html = error_html(&e.to_string());
            html.push_str(&render(store));
            html
        }
    }
}

// ── GET /api/cards ─────────────────────────────────────────────────

/// Handle GET /api/cards
/// Returns the deck panel HTML.
pub fn handle_deck_get(store: &SessionStore, _query: &str) -> String {
    render(store)
}

// ── GET /api/cards/shuffled ────────────────────────────────────────

/// Handle GET /api/cards/shuffled
/// Returns "true" if any card is in play.
pub fn handle_shuffled_get(store: &SessionStore, _query: &str) -> String {
    store.is_shuffled().to_string()
}

// ── GET /api/cards/state ───────────────────────────────────────────

/// Handle GET /api/cards/state
/// Returns the deck as the JSON array stored in `sessionStorage`.
pub fn handle_state_get(store: &SessionStore, _query: &str) -> String {
    store.export_json().unwrap_or_else(|e| {
        log::warn!("Cannot export deck state: {}", e);
        "[]".to_string()
    })
}

// ── GET /api/cards/export ──────────────────────────────────────────

/// Handle GET /api/cards/export
/// Returns a <script> tag that downloads the deck as a base64 text file.
pub fn handle_export_get(store: &SessionStore, _query: &str) -> String {
    let state = match store.export_encoded() {
        Ok(s) => s,
        Err(e) => return error_html(&format!("Export failed: {}", e)),
    };
    format!(
        r#"<script>
(function() {{
  var b = new Blob(['{state}'], {{type: 'text/plain'}});
  var a = document.createElement('a');
  a.href = URL.createObjectURL(b);
  a.download = 'card-deck.txt';
  a.click();
  URL.revokeObjectURL(a.href);
  console.log('[card-deck] Deck exported');
}})();
</script>"#,
        state = state
    )
}

// ── POST /api/cards/restore ────────────────────────────────────────

/// Handle POST /api/cards/restore
/// Body carries the raw `sessionStorage` values under their own keys, e.g.
/// `cards=<json>&cards_next_id=<n>`. A missing key means `getItem` returned
/// null. Returns "ok" or "error: ...".
pub fn handle_restore_post(store: &mut SessionStore, body: &str) -> String {
    let params = parse_form_body(body);
    let keys = [
        store.config().storage_key.clone(),
        store.config().counter_key.clone(),
    ];
    for key in &keys {
        store.storage_mut().seed(key, get_param(&params, key));
    }
    match store.initialize() {
        Ok(()) => "ok".to_string(),
        Err(e) => format!("error: {}", e),
    }
}

// ── POST /api/cards/create ─────────────────────────────────────────

/// Handle POST /api/cards/create
/// Body: description={text}. An empty or missing description is ignored.
pub fn handle_create_post(store: &mut SessionStore, body: &str) -> String {
    let params = parse_form_body(body);
    let description = get_param(&params, "description").unwrap_or("");
    let result = store.create_card(description);
    render_after(store, result)
}

// ── POST /api/cards/shuffle ────────────────────────────────────────

/// Handle POST /api/cards/shuffle
pub fn handle_shuffle_post(store: &mut SessionStore, _body: &str) -> String {
    let result = store.shuffle();
    render_after(store, result)
}

// ── POST /api/cards/{discard,infect,destroy} ───────────────────────

/// Handle POST /api/cards/discard
/// Body: id={n}. Missing or non-numeric ids leave the deck unchanged.
pub fn handle_discard_post(store: &mut SessionStore, body: &str) -> String {
    match get_card_id(&parse_form_body(body)) {
        Some(id) => {
            let result = store.discard(id);
            render_after(store, result)
        }
        None => render(store),
    }
}

/// Handle POST /api/cards/infect
/// Body: id={n}. Missing or non-numeric ids leave the deck unchanged.
pub fn handle_infect_post(store: &mut SessionStore, body: &str) -> String {
    match get_card_id(&parse_form_body(body)) {
        Some(id) => {
            let result = store.infect(id);
            render_after(store, result)
        }
        None => render(store),
    }
}

/// Handle POST /api/cards/destroy
/// Body: id={n}. Missing or non-numeric ids leave the deck unchanged.
pub fn handle_destroy_post(store: &mut SessionStore, body: &str) -> String {
    match get_card_id(&parse_form_body(body)) {
        Some(id) => {
            let result = store.destroy(id);
            render_after(store, result)
        }
        None => render(store),
    }
}

// ── POST /api/cards/clear ──────────────────────────────────────────

/// Handle POST /api/cards/clear
pub fn handle_clear_post(store: &mut SessionStore, _body: &str) -> String {
    let result = store.clear_all();
    render_after(store, result)
}

// ── POST /api/cards/replace ────────────────────────────────────────

/// Handle POST /api/cards/replace
/// Body: the full deck as a JSON array. Replaces the deck wholesale.
pub fn handle_replace_post(store: &mut SessionStore, body: &str) -> String {
    let cards: Vec<Card> = match serde_json::from_str(body) {
        Ok(cards) => cards,
        Err(e) => {
            let result: Result<(), StoreError> = Err(StoreError::Corrupt(e));
            return render_after(store, result);
        }
    };
    let result = store.replace_cards(cards);
    render_after(store, result)
}

// ── POST /api/cards/import ─────────────────────────────────────────

/// Handle POST /api/cards/import
/// Accepts the base64 text of an exported deck file, either as `state=...`
/// or as the raw body.
pub fn handle_import_post(store: &mut SessionStore, body: &str) -> String {
    let params = parse_form_body(body);
    let encoded = get_param(&params, "state").unwrap_or(body.trim());
    match store.import_encoded(encoded) {
        Ok(count) => {
            let mut html = format!(
                r#"<span class="text-emerald-600">Imported {} cards successfully</span>"#,
                count
            );
            html.push_str(&render(store));
            html
        }
        Err(e) => {
            log::warn!("Deck import failed: {}", e);
            let mut html = error_html(&format!("Import failed: {}", e));
            html.push_str(&render(store));
            html
        }
    }
}
