//! Static definition catalog and syllabus gate.
//!
//! The definition table and syllabus topic list are immutable after
//! startup: built from compiled-in defaults, optionally overridden by a
//! YAML file. Definitions are matched by exact key, the syllabus gate by
//! case-insensitive substring.

use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use tutor_core::{AppError, AppResult};

/// Immutable topic catalog.
#[derive(Debug, Clone)]
pub struct Catalog {
    definitions: HashMap<String, String>,
    syllabus: Vec<String>,
}

/// YAML override file structure.
#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    definitions: HashMap<String, String>,
    #[serde(default)]
    syllabus: Vec<String>,
}

impl Default for Catalog {
    fn default() -> Self {
        let definitions = [
            (
                "real_numbers",
                "Real numbers include all rational and irrational numbers.",
            ),
            (
                "order_of_operations",
                "The order of operations follows PEMDAS: Parentheses, Exponents, Multiplication & Division (left to right), Addition & Subtraction (left to right).",
            ),
            (
                "absolute_value",
                "Absolute value represents the distance of a number from zero on the number line.",
            ),
            (
                "exponents",
                "An exponent refers to the number of times a base number is multiplied by itself.",
            ),
            (
                "linear_equations",
                "A linear equation is an equation that makes a straight line when graphed.",
            ),
            (
                "graphing_lines",
                "Graphing lines involves plotting points that satisfy a linear equation on a coordinate plane.",
            ),
            (
                "inequalities",
                "Inequalities express a range of values that satisfy an equation, using <, >, ≤, or ≥ symbols.",
            ),
            (
                "scientific_notation",
                "Scientific notation is a way of writing very large or very small numbers using powers of 10.",
            ),
            (
                "polynomials",
                "A polynomial is an expression consisting of variables, coefficients, and exponents combined using addition, subtraction, and multiplication.",
            ),
            (
                "factoring",
                "Factoring is breaking down a complex expression into simpler terms that, when multiplied together, give the original expression.",
            ),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let syllabus = [
            "Real Numbers",
            "Order of Operations",
            "Absolute Value",
            "Exponents",
            "Linear Equations",
            "Graphing Lines",
            "Inequalities",
            "Scientific Notation",
            "Polynomials",
            "Factoring",
            "Coordinate System",
            "Slopes",
            "Intercepts",
            "Simplifying Expressions",
        ]
        .into_iter()
        .map(|s| s.to_string())
        .collect();

        Self {
            definitions,
            syllabus,
        }
    }
}

impl Catalog {
    /// Load the catalog, applying an optional YAML override file.
    ///
    /// An unreadable override file is a startup error: better to refuse to
    /// boot than to silently serve the defaults.
    pub fn load(path: Option<&Path>) -> AppResult<Self> {
        let mut catalog = Self::default();

        if let Some(path) = path {
            let contents = std::fs::read_to_string(path).map_err(|e| {
                AppError::Config(format!("Failed to read catalog file {:?}: {}", path, e))
            })?;
            let file: CatalogFile = serde_yaml::from_str(&contents).map_err(|e| {
                AppError::Config(format!("Failed to parse catalog file {:?}: {}", path, e))
            })?;

            if !file.definitions.is_empty() {
                catalog.definitions = file.definitions;
            }
            if !file.syllabus.is_empty() {
                catalog.syllabus = file.syllabus;
            }

            tracing::info!(
                "Loaded catalog from {:?}: {} definitions, {} syllabus topics",
                path,
                catalog.definitions.len(),
                catalog.syllabus.len()
            );
        }

        Ok(catalog)
    }

    /// Exact-key definition lookup.
    pub fn definition(&self, topic: &str) -> Option<&str> {
        self.definitions.get(topic).map(String::as_str)
    }

    /// Whether a query mentions any syllabus topic (case-insensitive
    /// substring match).
    pub fn in_syllabus(&self, query: &str) -> bool {
        let query_lower = query.to_lowercase();
        self.syllabus
            .iter()
            .any(|topic| query_lower.contains(&topic.to_lowercase()))
    }
}
