//! Server-side page rendering.

use super::nav::{sidebar_links, NavLink};
use crate::middleware::auth::Identity;
use handlebars::{Handlebars, RenderError, TemplateError};
use serde::Serialize;

const TEMPLATES: &[(&str, &str)] = &[
    ("admin_layout", include_str!("../../templates/admin_layout.hbs")),
    ("dashboard", include_str!("../../templates/dashboard.hbs")),
    ("announcements", include_str!("../../templates/announcements.hbs")),
    ("cache_clear", include_str!("../../templates/cache_clear.hbs")),
    ("new_user", include_str!("../../templates/new_user.hbs")),
    ("job_new", include_str!("../../templates/job_new.hbs")),
    ("home", include_str!("../../templates/home.hbs")),
];

#[derive(Serialize)]
struct Viewer<'a> {
    name: &'a str,
    role: Option<&'static str>,
    image: Option<&'a str>,
    logo: Option<&'a str>,
}

#[derive(Serialize)]
struct LayoutContext<'a> {
    title: &'a str,
    viewer: Viewer<'a>,
    links: Vec<NavLink>,
    content: String,
}

/// Template registry, built once at startup.
pub struct PageRenderer {
    handlebars: Handlebars<'static>,
}

impl PageRenderer {
    pub fn new() -> Result<Self, TemplateError> {
        let mut handlebars = Handlebars::new();
        handlebars.set_strict_mode(true);

        for (name, source) in TEMPLATES {
            handlebars.register_template_string(name, source)?;
        }

        Ok(Self { handlebars })
    }

    /// Render a standalone template.
    pub fn render<T: Serialize>(&self, template: &str, data: &T) -> Result<String, RenderError> {
        self.handlebars.render(template, data)
    }

    /// Render `template` inside the admin layout.
    ///
    /// The sidebar is filtered by the viewer's role.
    pub fn render_admin<T: Serialize>(
        &self,
        viewer: &Identity,
        path: &str,
        title: &str,
        template: &str,
        data: &T,
    ) -> Result<String, RenderError> {
        let content = self.render(template, data)?;

        let context = LayoutContext {
            title,
            viewer: Viewer {
                name: &viewer.name,
                role: viewer.role.map(|r| r.as_str()),
                image: viewer.image.as_deref(),
                logo: viewer.logo.as_deref(),
            },
            links: sidebar_links(viewer.role, path),
            content,
        };

        self.render("admin_layout", &context)
    }
}
