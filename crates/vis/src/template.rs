use std::fs::File;
use std::io::Write;
use std::path::Path;

use serde::Serialize;
use tinytemplate::TinyTemplate;
use tinytemplate::format_unescaped;

use crate::chart::Chart;
use crate::error::Result;

pub(crate) struct TemplateEngine<'a> {
    path: &'a Path,
}

impl<'a> TemplateEngine<'a> {
    const INDEX_TEMPLATE_NAME: &'static str = "index";

    pub fn new(path: &'a Path) -> TemplateEngine<'a> {
        Self { path }
    }

    pub fn render(&self, title: &str, charts: &[Chart]) -> Result<()> {
        let mut template = TinyTemplate::new();
        // The chart scripts carry JSON and quoted strings; HTML-escaping
        // them would corrupt the page.
        template.set_default_formatter(&format_unescaped);
        template.add_template(
            Self::INDEX_TEMPLATE_NAME,
            include_str!("./template/index.html.tt"),
        )?;

        let context = Context {
            title: title.to_owned(),
            charts,
        };
        let text = template.render(Self::INDEX_TEMPLATE_NAME, &context)?;

        let mut file = File::create(self.path)?;

        file.write_all(text.as_bytes())?;
        file.flush()?;

        Ok(())
    }
}

#[derive(Serialize)]
struct Context<'c> {
    title: String,
    charts: &'c [Chart],
}
