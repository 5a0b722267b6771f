//! Message template rendering engine.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::types::Contact;

/// Simple template renderer using {{variable}} syntax.
///
/// Variables are seeded from the contact being written to; missing
/// variables render as empty rather than failing, since template authors
/// iterate on copy far more often than on the variable set.
pub struct TemplateRenderer {
    vars: HashMap<String, String>,
}

impl TemplateRenderer {
    pub fn new() -> Self {
        Self {
            vars: HashMap::new(),
        }
    }

    /// Renderer pre-seeded with the standard contact variables:
    /// `recruiter_name`, `recruiter_company`, `recruiter_email`.
    pub fn for_contact(contact: &Contact) -> Self {
        let mut renderer = Self::new();
        renderer.set_var("recruiter_name", &contact.name);
        renderer.set_var("recruiter_company", &contact.company);
        renderer.set_var("recruiter_email", &contact.email);
        renderer
    }

    pub fn set_var(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(name.into(), value.into());
    }

    /// Substitute every `{{name}}` placeholder in `template`.
    pub fn render(&self, template: &str) -> String {
        let mut out = String::with_capacity(template.len());
        let mut rest = template;
        while let Some(open) = rest.find("{{") {
            out.push_str(&rest[..open]);
            let after = &rest[open + 2..];
            match after.find("}}") {
                Some(close) => {
                    let name = after[..close].trim();
                    if let Some(value) = self.vars.get(name) {
                        out.push_str(value);
                    }
                    rest = &after[close + 2..];
                }
                None => {
                    // Unterminated placeholder, emit verbatim.
                    out.push_str(&rest[open..]);
                    rest = "";
                }
            }
        }
        out.push_str(rest);
        out
    }

    /// Render a subject and body pair in one pass.
    pub fn render_message(&self, subject_template: &str, body_template: &str) -> RenderedMessage {
        RenderedMessage {
            subject: self.render(subject_template),
            body: self.render(body_template),
            rendered_at: Utc::now(),
        }
    }
}

impl Default for TemplateRenderer {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone)]
pub struct RenderedMessage {
    pub subject: String,
    pub body: String,
    pub rendered_at: DateTime<Utc>,
}
