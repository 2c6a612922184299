//! Page sections: navigation, hero, search and the inventory grid.

use super::{html_escape, post_button};
use crate::models::Listing;
use crate::session::SessionState;
use crate::storefront::Storefront;

pub fn navbar(state: &SessionState) -> String {
    let dark = state.theme.is_dark();

    let access = if state.admin {
        post_button(
            "/admin/logout",
            "text-[10px] font-black uppercase px-4 py-2 rounded-lg border border-blue-100 bg-white/80 text-blue-800",
            "Logout",
        )
    } else {
        post_button(
            "/admin",
            "text-[10px] font-black uppercase px-4 py-2 rounded-lg border border-blue-100 bg-white/80 text-blue-800",
            "Dealer Access",
        )
    };

    format!(
        r##"<nav class="p-4 sticky top-0 z-50 flex justify-between items-center px-6 border-b {bar}">
    <h1 class="text-lg font-black italic tracking-tighter {brand}">DEMOLA KBJ<span class="{brand_tail}">AUTOS</span></h1>
    <div class="flex items-center gap-3">
        {theme}
        <div class="md:hidden">{menu}</div>
        <div class="hidden md:block">{access}</div>
    </div>
</nav>"##,
        bar = if dark { "bg-black/40 border-white/10" } else { "bg-white/20 border-white/40" },
        brand = if dark { "text-blue-400" } else { "text-blue-700" },
        brand_tail = if dark { "text-white" } else { "text-black" },
        theme = post_button(
            "/theme",
            "p-2 rounded-lg bg-white/10 border border-white/20",
            if dark { "&#9728;" } else { "&#9790;" },
        ),
        menu = post_button("/menu", "p-2", "&#9776;"),
        access = access,
    )
}

pub fn mobile_menu(state: &SessionState) -> String {
    if !state.mobile_menu {
        return String::new();
    }

    let logout = if state.admin {
        post_button(
            "/admin/logout",
            "w-full mt-2 py-4 text-red-500 text-xs font-black uppercase",
            "Logout",
        )
    } else {
        String::new()
    };

    format!(
        r##"<div class="absolute top-16 left-0 w-full p-6 z-40 border-b shadow-2xl md:hidden {panel}">
    <form method="post" action="/admin"><button type="submit" class="w-full py-4 text-center font-black uppercase text-xs tracking-widest border rounded-xl">{label}</button></form>
    {logout}
</div>"##,
        panel = if state.theme.is_dark() { "bg-slate-900 border-white/10" } else { "bg-white border-slate-100" },
        label = if state.admin { "Admin Active" } else { "Dealer Access" },
        logout = logout,
    )
}

pub fn hero(dark: bool) -> String {
    format!(
        r##"<header class="px-6 py-8 text-center">
    <div class="inline-flex items-center gap-2 px-3 py-1 rounded-full text-[9px] font-bold mb-3 border uppercase tracking-tighter {badge}">&#10003; Verified Dealer</div>
    <h2 class="text-3xl font-black leading-tight {title}">Luxury Wheels. <br> <span class="text-blue-500">Pure Excellence.</span></h2>
</header>"##,
        badge = if dark { "bg-blue-900/40 text-blue-300 border-blue-800" } else { "bg-blue-50 text-blue-600 border-blue-100" },
        title = if dark { "text-white" } else { "text-slate-900" },
    )
}

pub fn search_box(state: &SessionState) -> String {
    format!(
        r##"<div class="px-6 max-w-3xl mx-auto mb-6">
    <form method="post" action="/search">
        <input type="text" name="q" placeholder="Search showroom..." value="{query}" autocomplete="off"
            class="w-full p-4 rounded-xl outline-none font-bold text-sm shadow-md {input}">
    </form>
</div>"##,
        query = html_escape(&state.search),
        input = if state.theme.is_dark() { "bg-white/10 border-white/10 text-white" } else { "bg-white/80 border-white text-slate-900" },
    )
}

pub fn inventory(state: &SessionState, storefront: &Storefront) -> String {
    let dark = state.theme.is_dark();

    let new_button = if state.admin {
        post_button(
            "/listings/new",
            "bg-blue-600 text-white px-4 py-1.5 rounded-full font-bold text-xs",
            "+ New",
        )
    } else {
        String::new()
    };

    let cards: String = state
        .inventory
        .filter(&state.search)
        .into_iter()
        .map(|listing| card(listing, state, storefront))
        .collect();

    format!(
        r##"<main class="p-3 max-w-4xl mx-auto pb-32">
    <div class="flex justify-between items-center px-2 mb-6">
        <h3 class="font-bold text-[10px] uppercase tracking-[0.2em] {muted}">Inventory</h3>
        {new_button}
    </div>
    <div class="grid grid-cols-2 gap-3 md:gap-6">{cards}</div>
</main>"##,
        muted = if dark { "text-white/40" } else { "text-slate-500" },
        new_button = new_button,
        cards = cards,
    )
}

fn card(listing: &Listing, state: &SessionState, storefront: &Storefront) -> String {
    let dark = state.theme.is_dark();

    let action = if state.admin {
        let deleting = state.in_flight.is_deleting(listing.id);
        format!(
            r##"<form method="post" action="/listings/{id}/delete"><button type="submit" {disabled} class="w-full bg-red-500/10 text-red-500 py-2 rounded-lg font-black text-[8px] uppercase border border-red-500/20">{label}</button></form>"##,
            id = listing.id,
            disabled = if deleting { "disabled" } else { "" },
            label = if deleting { "Deleting..." } else { "Delete" },
        )
    } else {
        format!(
            r##"<a href="{link}" target="_blank" rel="noopener" class="w-full py-2 rounded-xl font-black text-[8px] uppercase flex items-center justify-center gap-1 {button}">Enquiry</a>"##,
            link = html_escape(&storefront.contact_link(listing)),
            button = if dark { "bg-white text-black" } else { "bg-slate-900 text-white" },
        )
    };

    format!(
        r##"<div class="p-2.5 rounded-[1.8rem] shadow-lg border {shell}">
    <form method="post" action="/listings/{id}/view" class="aspect-[4/3] rounded-[1.4rem] overflow-hidden relative mb-3">
        <button type="submit" class="w-full h-full cursor-zoom-in">
            <img src="{image}" class="w-full h-full object-cover" alt="car" onerror="this.src='{fallback}'">
        </button>
        <div class="absolute top-2 right-2 bg-blue-600 px-2 py-0.5 rounded-full text-[7px] font-black uppercase text-white shadow-md">{condition}</div>
    </form>
    <div class="px-1 text-center">
        <p class="text-[7px] font-black uppercase mb-0.5 {muted}">{year}</p>
        <h4 class="text-[11px] font-black mb-0.5 uppercase truncate">{name}</h4>
        <p class="text-[10px] font-black text-blue-500 mb-3 italic">&#8358;{price}</p>
        {action}
    </div>
</div>"##,
        shell = if dark { "bg-white/5 border-white/10" } else { "bg-white/70 border-white" },
        id = listing.id,
        image = html_escape(listing.display_image()),
        fallback = crate::models::FALLBACK_IMAGE_URL,
        condition = html_escape(listing.condition.as_str()),
        muted = if dark { "text-white/40" } else { "text-slate-400" },
        year = listing.year_label(),
        name = html_escape(&listing.name),
        price = html_escape(&listing.price),
        action = action,
    )
}
