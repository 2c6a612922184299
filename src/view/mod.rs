//! HTML rendering for the storefront page.
//!
//! Uses plain `format!` templates with Tailwind from the CDN. Every
//! interaction is a small form posting back to the server.

mod components;
mod modals;

use crate::session::{Modal, Notice, SessionState};
use crate::storefront::Storefront;

/// Render the whole page for a session.
pub fn render_page(state: &SessionState, notice: Option<&Notice>, storefront: &Storefront) -> String {
    let dark = state.theme.is_dark();

    let overlay = match &state.modal {
        Modal::None => String::new(),
        Modal::AdminLogin => modals::admin_login(state),
        Modal::ListingEditor => modals::listing_editor(state),
        Modal::ImageViewer(url) => modals::image_viewer(url),
        Modal::ConfirmDelete(id) => modals::confirm_delete(state, *id),
    };

    let body = format!(
        r##"{navbar}
{menu}
{notice}
{load_error}
{header}
{search}
{inventory}
{overlay}"##,
        navbar = components::navbar(state),
        menu = components::mobile_menu(state),
        notice = notice.map(|n| modals::notice_banner(n, dark)).unwrap_or_default(),
        load_error = state
            .inventory
            .load_error()
            .map(|e| modals::load_error_banner(e, dark))
            .unwrap_or_default(),
        header = components::hero(dark),
        search = components::search_box(state),
        inventory = components::inventory(state, storefront),
        overlay = overlay,
    );

    layout(dark, &body)
}

fn layout(dark: bool, body: &str) -> String {
    format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>DEMOLA KBJ AUTOS</title>
    <script src="https://cdn.tailwindcss.com"></script>
</head>
<body class="min-h-screen font-sans relative {text}">
    <div class="fixed inset-0 -z-20 bg-gradient-to-br from-red-900 via-slate-900 to-blue-900"></div>
    <div class="fixed inset-0 -z-10 backdrop-blur-2xl {veil}"></div>
    {body}
</body>
</html>"##,
        text = if dark { "text-white" } else { "text-slate-900" },
        veil = if dark { "bg-black/80" } else { "bg-white/60" },
        body = body,
    )
}

/// A one-button form posting to `action`.
fn post_button(action: &str, class: &str, label: &str) -> String {
    format!(
        r##"<form method="post" action="{action}" class="inline"><button type="submit" class="{class}">{label}</button></form>"##,
        action = html_escape(action),
        class = class,
        label = label,
    )
}

pub(crate) fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
