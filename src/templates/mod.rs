// src/templates/mod.rs
//! HTML pages, compiled into the binary.

use minijinja::{Environment, context};

use crate::catalog::AppInfo;
use crate::progress::ProgressView;

pub const APP_JS: &str = include_str!("app.js");

pub struct Templates {
    env: Environment<'static>,
}

impl Templates {
    pub fn load() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        env.add_template("base.html", include_str!("base.html"))?;
        env.add_template("index.html", include_str!("index.html"))?;
        env.add_template("progress.html", include_str!("progress.html"))?;
        Ok(Self { env })
    }

    pub fn render_index(&self, app: &AppInfo, llm_available: bool) -> Result<String, minijinja::Error> {
        self.env
            .get_template("index.html")?
            .render(context! { app => app, llm_available => llm_available })
    }

    pub fn render_progress(&self, app: &AppInfo, view: &ProgressView) -> Result<String, minijinja::Error> {
        self.env
            .get_template("progress.html")?
            .render(context! { app => app, progress => view })
    }
}
