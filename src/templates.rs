//! Template store backed by minijinja.
//!
//! Templates are addressed by file name (`index.html`, `work.html`, …).
//! Files are read lazily from the template directory and cached by the
//! environment after the first render.

use std::path::Path;

use minijinja::{Environment, ErrorKind, Value};

/// Why a render did not produce a body.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("template `{0}` not found")]
    Missing(String),

    #[error("template `{name}` failed to render: {source}")]
    Failed {
        name: String,
        #[source]
        source: minijinja::Error,
    },
}

pub struct Templates {
    env: Environment<'static>,
}

impl Templates {
    /// Serves templates from files under `dir`.
    pub fn from_dir(dir: impl AsRef<Path>) -> Self {
        let mut env = Environment::new();
        env.set_loader(minijinja::path_loader(dir.as_ref()));
        Self { env }
    }

    /// Serves a fixed set of in-memory templates.
    pub fn from_sources<N, S>(sources: impl IntoIterator<Item = (N, S)>) -> Result<Self, minijinja::Error>
    where
        N: Into<String>,
        S: Into<String>,
    {
        let mut env = Environment::new();
        for (name, source) in sources {
            let (name, source): (String, String) = (name.into(), source.into());
            env.add_template_owned(name, source)?;
        }
        Ok(Self { env })
    }

    /// Renders `name` with `ctx`. Use `minijinja::context!` to build the
    /// context, or `context! {}` for none.
    pub fn render(&self, name: &str, ctx: Value) -> Result<String, RenderError> {
        let template = self.env.get_template(name).map_err(|e| match e.kind() {
            ErrorKind::TemplateNotFound => RenderError::Missing(name.to_owned()),
            _ => RenderError::Failed { name: name.to_owned(), source: e },
        })?;
        template
            .render(ctx)
            .map_err(|source| RenderError::Failed { name: name.to_owned(), source })
    }
}
