use axum::http::StatusCode;
use profiles_lib::{Notice, Profile, ProfileForm};
use tera::{Context, Tera};

const TEMPLATES: [(&str, &str); 3] = [
    ("base.html", include_str!("../templates/base.html")),
    ("profiles/index.html", include_str!("../templates/profiles/index.html")),
    ("profiles/form.html", include_str!("../templates/profiles/form.html")),
];

const ERROR_TEMPLATE: &str = include_str!("../templates/error.html");

/// Compiled page templates. Values are HTML-escaped on render.
#[derive(Debug)]
pub struct Views {
    tera: Tera,
}

impl Views {
    pub fn new() -> Result<Self, tera::Error> {
        let mut tera = Tera::default();
        tera.add_raw_templates(TEMPLATES)?;
        Ok(Views { tera })
    }

    pub fn list(&self, profiles: &[Profile], notice: Option<Notice>) -> Result<String, tera::Error> {
        let mut context = Context::new();
        context.insert("profiles", profiles);
        context.insert("notice", &notice.map(|n| n.message()));
        self.tera.render("profiles/index.html", &context)
    }

    pub fn create(&self, form: &ProfileForm, csrf_token: &str) -> Result<String, tera::Error> {
        let mut context = form_context(form, csrf_token);
        context.insert("heading", "Add Profile");
        context.insert("header_class", "bg-primary text-white");
        context.insert("action", "/profiles/store");
        context.insert("submit", "Save");
        self.tera.render("profiles/form.html", &context)
    }

    pub fn edit(&self, id: u64, form: &ProfileForm, csrf_token: &str) -> Result<String, tera::Error> {
        let mut context = form_context(form, csrf_token);
        context.insert("heading", "Edit Profile");
        context.insert("header_class", "bg-warning text-dark");
        context.insert("action", &format!("/profiles/update/{}", id));
        context.insert("submit", "Update");
        self.tera.render("profiles/form.html", &context)
    }
}

fn form_context(form: &ProfileForm, csrf_token: &str) -> Context {
    let mut context = Context::new();
    context.insert("csrf_token", csrf_token);
    context.insert("name", form.input.name());
    context.insert("email", form.input.email());
    context.insert("name_errors", form.errors.get("name").unwrap_or(&[]));
    context.insert("email_errors", form.errors.get("email").unwrap_or(&[]));
    context
}

/// Standalone error page, usable without a `Views` instance.
pub fn error_page(status: StatusCode, message: &str) -> Result<String, tera::Error> {
    let mut context = Context::new();
    context.insert("status", &status.as_u16());
    context.insert("reason", status.canonical_reason().unwrap_or(""));
    context.insert("message", message);
    Tera::one_off(ERROR_TEMPLATE, &context, true)
}
