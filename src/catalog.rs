//! Project catalog: slug → display record for the `/work/{slug}` pages.
//!
//! The catalog is a plain value built once at startup and handed to the
//! [`Site`](crate::site::Site). Nothing mutates it afterwards.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Display fields for one portfolio project.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Project {
    pub title: String,
    pub hero: String,
    pub images: Vec<String>,
    pub summary: String,
    pub role: String,
}

/// Immutable mapping from slug to [`Project`].
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Catalog {
    projects: BTreeMap<String, Project>,
}

impl Catalog {
    pub fn new(projects: impl IntoIterator<Item = (String, Project)>) -> Self {
        Self { projects: projects.into_iter().collect() }
    }

    /// The three projects the site ships with.
    pub fn builtin() -> Self {
        let gallery = || {
            vec![
                "assets/images/work001-02.jpg".to_owned(),
                "assets/images/work001-03.jpg".to_owned(),
                "assets/images/work001-04.jpg".to_owned(),
            ]
        };
        let project = |title: &str, summary: &str, role: &str| Project {
            title: title.to_owned(),
            hero: "assets/images/work001-01.jpg".to_owned(),
            images: gallery(),
            summary: summary.to_owned(),
            role: role.to_owned(),
        };

        Self::new([
            (
                "datacom".to_owned(),
                project(
                    "DATACOM — Web Portal & Android App",
                    "Backend with Python/FastAPI, web portal, Android app, and automations.",
                    "Python & Android Developer",
                ),
            ),
            (
                "printify".to_owned(),
                project(
                    "Printify — Automations & API",
                    "Shipping & tracking setup, REST integrations (Postman), logic & data analysis.",
                    "Automations Engineer",
                ),
            ),
            (
                "dynatech".to_owned(),
                project(
                    "Dynatech — Web Components & SEO",
                    "Reusable components, gamification module, analytics & SEO improvements.",
                    "Web Developer",
                ),
            ),
        ])
    }

    /// Loads a catalog from a JSON object mapping slug to project record.
    pub fn from_json_file(path: &Path) -> Result<Self, Error> {
        let raw = std::fs::read(path)?;
        Ok(serde_json::from_slice(&raw)?)
    }

    pub fn lookup(&self, slug: &str) -> Option<&Project> {
        self.projects.get(slug)
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }
}
