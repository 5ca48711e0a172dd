use std::sync::Arc;

use tera::Tera;
use tracing::info;

/// Templates are compiled into the binary so the UI doesn't depend on its working directory.
const TEMPLATES: [(&str, &str); 1] = [(
    "html/home.html",
    include_str!("../templates/html/home.html"),
)];

#[derive(Debug, Clone)]
pub struct TemplateManager {
    tera: Arc<Tera>,
}

impl TemplateManager {
    pub fn init() -> Result<Self, tera::Error> {
        info!(
            "{:<20} - Initializing the Template manager",
            "templ manager"
        );
        let mut tera = Tera::default();
        tera.add_raw_templates(TEMPLATES)?;
        tera.autoescape_on(vec![".html"]);

        Ok(Self {
            tera: Arc::new(tera),
        })
    }

    /// A helper function to render a template file from 'html/' directory to String.
    pub fn render_html_to_string(
        &self,
        ctx: &tera::Context,
        template_file: &str,
    ) -> Result<String, tera::Error> {
        let template = format!("html/{template_file}");
        self.tera.render(&template, ctx)
    }
}
