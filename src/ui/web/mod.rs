//! HTML pages for upload mode and error reporting.
//!
//! Pages are static templates with `{{name}}` slots. Every value placed into
//! a slot is HTML-escaped except page fragments produced here.

use axum::http::header;

const BASE: &str = include_str!("base.html");
const UPLOAD_FORM: &str = include_str!("upload.html");
const ERROR: &str = include_str!("error.html");
const MESSAGE: &str = include_str!("message.html");

const CONTENT_SECURITY_POLICY: &str = "default-src 'none'; style-src 'unsafe-inline'; form-action 'self'; base-uri 'none'; frame-ancestors 'none'";

pub fn hardening_headers() -> [(header::HeaderName, &'static str); 4] {
    [
        (header::CONTENT_SECURITY_POLICY, CONTENT_SECURITY_POLICY),
        (header::X_FRAME_OPTIONS, "DENY"),
        (header::X_CONTENT_TYPE_OPTIONS, "nosniff"),
        (header::REFERRER_POLICY, "no-referrer"),
    ]
}

/// What the upload form needs to know about the session.
#[derive(Debug, Clone, Copy)]
pub struct UploadFormContext {
    pub allow_multiple: bool,
}

//-- PAGES
pub fn render_upload_form(ctx: &UploadFormContext) -> String {
    let (what, multiple) = if ctx.allow_multiple {
        ("files", " multiple")
    } else {
        ("a file", "")
    };
    let content = fill(UPLOAD_FORM, &[("what", what), ("multiple", multiple)]);
    page("RUFF - Upload Form", &content)
}

pub fn render_error(message: &str) -> String {
    let content = fill(ERROR, &[("message", &escape_html(message))]);
    page("RUFF - Upload Error", &content)
}

pub fn render_message(message: &str) -> String {
    let content = fill(MESSAGE, &[("message", &escape_html(message))]);
    page(&format!("RUFF - {message}"), &content)
}

//-- HELPER FUNCS
fn page(title: &str, content: &str) -> String {
    fill(BASE, &[("title", &escape_html(title)), ("content", content)])
}

/// Single-pass slot substitution, so slot syntax inside a value is never re-expanded.
fn fill(template: &str, slots: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else {
            out.push_str(&rest[start..]);
            return out;
        };

        let key = &after[..end];
        match slots.iter().find(|(name, _)| *name == key) {
            Some((_, value)) => out.push_str(value),
            None => out.push_str(&rest[start..start + 2 + end + 2]),
        }
        rest = &after[end + 2..];
    }

    out.push_str(rest);
    out
}

pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&#34;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
