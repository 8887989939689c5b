//! HTML fragments for the deck panel.
//!
//! Buttons post back to `/api/cards/*` with HTMX and swap the response into
//! `#deck`. The card id travels in `hx-vals`, so a button never needs to read
//! its own DOM id.

use crate::deck::card::Card;
use crate::deck::store::DeckView;

/// Escape text for use in element content and double-quoted attributes.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn error_html(msg: &str) -> String {
    format!(
        r#"<span class="text-red-700">{}</span>"#,
        escape_html(msg)
    )
}

/// Render the whole deck panel.
pub fn render_deck(view: &DeckView<'_>, deleted_label: &str) -> String {
    let mut html = String::with_capacity(1024 + view.cards.len() * 512);

    html.push_str(r#"<div id="deck-inner" class="p-3 text-stone-800">"#);

    // Summary
    html.push_str(&format!(
        r#"<p class="text-sm mb-2"><strong>{}</strong> cards · {} in play · {} discarded</p>"#,
        view.cards.len(),
        view.active,
        view.discarded
    ));

    // New card form
    html.push_str(
        r##"<form class="flex gap-2 mb-2" hx-post="/api/cards/create" hx-target="#deck" hx-swap="innerHTML">"##,
    );
    html.push_str(
        r#"<input type="text" name="description" placeholder="Card description" maxlength="120" class="flex-1 border rounded px-2 py-1 text-sm">"#,
    );
    html.push_str(
        r#"<button type="submit" class="bg-emerald-600 hover:bg-emerald-700 text-white font-bold py-1 px-3 rounded text-sm">Add Card</button>"#,
    );
    html.push_str(r#"</form>"#);

    // Deck controls
    let shuffle_label = if view.shuffled { "Reshuffle" } else { "Shuffle" };
    html.push_str(r#"<div class="flex gap-2 mb-3">"#);
    html.push_str(&format!(
        r##"<button class="bg-stone-700 hover:bg-stone-800 text-white py-1 px-3 rounded text-sm" hx-post="/api/cards/shuffle" hx-target="#deck" hx-swap="innerHTML">{}</button>"##,
        shuffle_label
    ));
    html.push_str(
        r##"<button class="bg-red-700 hover:bg-red-800 text-white py-1 px-3 rounded text-sm" hx-post="/api/cards/clear" hx-target="#deck" hx-swap="innerHTML" hx-confirm="Remove every card?">Clear All</button>"##,
    );
    html.push_str(r#"</div>"#);

    if view.cards.is_empty() {
        html.push_str(r#"<p class="text-sm text-stone-500">No cards yet.</p>"#);
    } else {
        html.push_str(r#"<ul class="grid grid-cols-1 gap-1">"#);
        for card in view.cards {
            html.push_str(&render_card(card, deleted_label));
        }
        html.push_str(r#"</ul>"#);
    }

    html.push_str(r#"</div>"#);
    html
}

/// Render one card row.
pub fn render_card(card: &Card, deleted_label: &str) -> String {
    let destroyed = card.description == deleted_label;
    let mut html = String::with_capacity(512);

    let bg = if card.discarded {
        "bg-stone-100 border-stone-300"
    } else {
        "bg-lime-50 border-lime-400"
    };
    html.push_str(&format!(
        r#"<li id="card-{}" class="flex items-center justify-between border rounded px-2 py-1 {}">"#,
        card.id, bg
    ));

    // Left: description, state, stack
    html.push_str(r#"<div class="flex items-center gap-2">"#);
    let text_class = if destroyed {
        "text-sm line-through text-stone-400"
    } else {
        "text-sm font-medium"
    };
    html.push_str(&format!(
        r#"<span class="{}">{}</span>"#,
        text_class,
        escape_html(&card.description)
    ));
    let state = if card.discarded { "Discarded" } else { "In play" };
    html.push_str(&format!(
        r#"<span class="text-xs text-stone-500">{}</span>"#,
        state
    ));
    if card.stack > 1 {
        html.push_str(&format!(
            r#"<span class="text-xs font-bold text-lime-700">×{}</span>"#,
            card.stack
        ));
    }
    html.push_str(r#"</div>"#);

    // Right: actions
    html.push_str(r#"<div class="flex items-center gap-1">"#);
    if card.discarded {
        html.push_str(&action_button("infect", "Infect", card.id));
    } else {
        html.push_str(&action_button("discard", "Discard", card.id));
    }
    if !destroyed {
        html.push_str(&action_button("destroy", "Destroy", card.id));
    }
    html.push_str(r#"</div>"#);

    html.push_str(r#"</li>"#);
    html
}

fn action_button(action: &str, label: &str, id: u32) -> String {
    format!(
        "<button class=\"text-xs border rounded px-2 py-0.5 hover:bg-stone-200\" hx-post=\"/api/cards/{}\" hx-vals='{{\"id\":\"{}\"}}' hx-target=\"#deck\" hx-swap=\"innerHTML\">{}</button>",
        action, id, label
    )
}
