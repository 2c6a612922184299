//! Overlays and banners.

use super::{html_escape, post_button};
use crate::editor::EditorStage;
use crate::models::Condition;
use crate::session::{Notice, NoticeKind, SessionState};

pub fn admin_login(state: &SessionState) -> String {
    let dark = state.theme.is_dark();
    let verifying = state.in_flight.verifying;

    format!(
        r##"<div class="fixed inset-0 z-[100] flex items-center justify-center p-6 bg-black/40 backdrop-blur-sm">
    <div class="p-6 rounded-[2rem] w-full max-w-xs shadow-2xl {panel}">
        <h2 class="text-xl font-black mb-6 text-center uppercase italic text-blue-600">Admin</h2>
        <form method="post" action="/admin/login">
            <input type="password" name="code" placeholder="&#8226;&#8226;&#8226;&#8226;" autofocus
                class="w-full p-4 rounded-xl mb-4 text-center text-xl font-black outline-none border-2 {input}">
            <button type="submit" {disabled} class="w-full bg-blue-600 text-white py-4 rounded-xl font-black uppercase text-xs tracking-widest">{label}</button>
        </form>
        {cancel}
    </div>
</div>"##,
        panel = if dark { "bg-slate-900 border border-white/10" } else { "bg-white" },
        input = if dark { "bg-white/5 border-white/10 text-white" } else { "bg-slate-100" },
        disabled = if verifying { "disabled" } else { "" },
        label = if verifying { "Verifying..." } else { "Login" },
        cancel = cancel_button(),
    )
}

pub fn listing_editor(state: &SessionState) -> String {
    let dark = state.theme.is_dark();
    let Some(editor) = state.editor.as_ref() else {
        return String::new();
    };

    let content = match (editor.stage(), editor.photo()) {
        (EditorStage::FormActive, Some(photo)) => {
            let field = if dark { "bg-white/10 border-white/10" } else { "bg-slate-50" };
            let uploading = state.in_flight.uploading;
            let options: String = Condition::OPTIONS
                .iter()
                .map(|c| {
                    format!(
                        r#"<option{selected}>{label}</option>"#,
                        selected = if *c == editor.form.condition { " selected" } else { "" },
                        label = c.as_str(),
                    )
                })
                .collect();

            format!(
                r##"<form method="post" action="/listings" enctype="multipart/form-data" class="space-y-4">
    <img src="{preview}" class="aspect-video w-full object-cover rounded-2xl" alt="preview">
    <input type="text" name="name" placeholder="Model" value="{name}" class="w-full p-4 rounded-xl font-bold text-sm {field}">
    <div class="grid grid-cols-2 gap-4">
        <input type="number" name="year" placeholder="Year" value="{year}" class="w-full p-4 rounded-xl font-bold text-sm {field}">
        <input type="text" name="price" placeholder="Price" value="{price}" class="w-full p-4 rounded-xl font-bold text-blue-500 text-sm {field}">
    </div>
    <select name="condition" class="w-full p-4 rounded-xl font-bold text-sm {select}">{options}</select>
    <button type="submit" {disabled} class="w-full bg-blue-600 text-white py-4 rounded-xl font-black text-sm uppercase">{label}</button>
</form>"##,
                preview = html_escape(&photo.preview_data_url()),
                name = html_escape(&editor.form.name),
                year = html_escape(&editor.form.year),
                price = html_escape(&editor.form.price),
                field = field,
                select = if dark { "bg-slate-800 text-white" } else { "bg-slate-50 text-black" },
                options = options,
                disabled = if uploading { "disabled" } else { "" },
                label = if uploading { "Uploading..." } else { "Upload" },
            )
        }
        _ => r##"<form method="post" action="/listings/photo" enctype="multipart/form-data">
    <label class="aspect-video border-2 border-dashed rounded-3xl flex flex-col items-center justify-center cursor-pointer bg-white/5 border-white/20">
        <input type="file" name="photo" accept="image/*" class="hidden" onchange="this.form.submit()">
        <span class="text-blue-600 text-3xl mb-2">&#128247;</span>
        <p class="font-black uppercase text-[10px]">Add Photo</p>
    </label>
    <noscript><button type="submit" class="mt-4 w-full border rounded-xl py-2 text-xs font-black uppercase">Use Photo</button></noscript>
</form>"##
            .to_string(),
    };

    format!(
        r##"<div class="fixed inset-0 z-[200] p-6 overflow-y-auto {panel}">
    <div class="max-w-md mx-auto py-6">
        <div class="flex justify-between items-center mb-8">
            <h2 class="text-2xl font-black italic text-blue-600 uppercase">New Unit</h2>
            {close}
        </div>
        {content}
    </div>
</div>"##,
        panel = if dark { "bg-slate-950 text-white" } else { "bg-white" },
        close = post_button("/modal/close", "p-2 rounded-full bg-slate-100 text-black", "&#10005;"),
        content = content,
    )
}

pub fn image_viewer(url: &str) -> String {
    format!(
        r##"<div class="fixed inset-0 z-[300] bg-black/95 backdrop-blur-xl flex items-center justify-center p-4">
    <div class="absolute top-6 right-6">{close}</div>
    <img src="{url}" class="max-w-full max-h-[80vh] rounded-2xl object-contain" alt="car">
</div>"##,
        close = post_button("/modal/close", "text-white bg-white/10 p-3 rounded-full", "&#10005;"),
        url = html_escape(url),
    )
}

pub fn confirm_delete(state: &SessionState, id: i64) -> String {
    format!(
        r##"<div class="fixed inset-0 z-[100] flex items-center justify-center p-6 bg-black/40 backdrop-blur-sm">
    <div class="p-6 rounded-[2rem] w-full max-w-xs shadow-2xl text-center {panel}">
        <h2 class="text-xl font-black mb-6 uppercase italic text-red-500">Sold?</h2>
        <form method="post" action="/listings/{id}/delete/confirm" class="grid grid-cols-2 gap-3">
            <button type="submit" name="answer" value="no" class="py-3 rounded-xl border font-black uppercase text-xs">No</button>
            <button type="submit" name="answer" value="yes" class="py-3 rounded-xl bg-red-500 text-white font-black uppercase text-xs">Yes</button>
        </form>
    </div>
</div>"##,
        panel = if state.theme.is_dark() { "bg-slate-900 border border-white/10" } else { "bg-white" },
        id = id,
    )
}

pub fn notice_banner(notice: &Notice, dark: bool) -> String {
    let tone = match (notice.kind, dark) {
        (NoticeKind::Error, _) => "bg-red-500 text-white",
        (NoticeKind::Info, true) => "bg-slate-800 text-white",
        (NoticeKind::Info, false) => "bg-white text-slate-900",
    };
    format!(
        r##"<div role="alert" class="mx-6 mt-4 p-4 rounded-xl shadow-lg font-bold text-sm text-center {tone}">{message}</div>"##,
        tone = tone,
        message = html_escape(&notice.message),
    )
}

pub fn load_error_banner(message: &str, dark: bool) -> String {
    format!(
        r##"<div class="mx-6 mt-4 p-4 rounded-xl border flex items-center justify-between gap-4 text-sm {tone}">
    <span>Could not refresh the showroom: {message}</span>
    {retry}
</div>"##,
        tone = if dark { "border-yellow-700 bg-yellow-900/40 text-yellow-200" } else { "border-yellow-300 bg-yellow-50 text-yellow-800" },
        message = html_escape(message),
        retry = post_button("/refresh", "px-3 py-1 rounded-lg border font-black uppercase text-xs", "Retry"),
    )
}

fn cancel_button() -> String {
    post_button(
        "/modal/close",
        "w-full text-slate-400 mt-4 text-[9px] font-black uppercase text-center",
        "Cancel",
    )
}
