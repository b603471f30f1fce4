//! Statement templating
//!
//! Operators write administrative statements as Handlebars templates
//! (`{{username}}`, `{{password}}`, `{{expiration}}`). A rendered template is
//! split on `;` into a [`StatementSet`] that the provider executes in order.
//!
//! Rendering is non-strict: a variable the template references but the call
//! does not supply renders as the empty string. `{{expiration}}` in a
//! revocation template therefore silently disappears; operators should only
//! reference the variables listed on each [`StatementKind`].

use std::fmt;

use handlebars::Handlebars;
use serde::Serialize;

use crate::error::ValidationError;

/// Statement delimiter
pub const STATEMENT_SEPARATOR: char = ';';

/// Whether substituted values are HTML-escaped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// Values are inserted byte for byte
    Raw,
    /// Handlebars' default HTML escaping (`& < > " ' ` =`)
    Escaped,
}

/// The three operator-supplied templates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatementKind {
    /// Variables: `username`, `password`, `expiration`
    Creation,
    /// Variables: `username`, `expiration`
    Renewal,
    /// Variables: `username`
    Revocation,
}

impl StatementKind {
    /// Render mode for this template.
    ///
    /// Creation statements embed the password as a SQL literal and must render
    /// raw. Renewal and revocation only substitute alphanumeric usernames and
    /// ISO-8601 timestamps, which escaping leaves untouched.
    pub const fn render_mode(self) -> RenderMode {
        match self {
            Self::Creation => RenderMode::Raw,
            Self::Renewal | Self::Revocation => RenderMode::Escaped,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Creation => "creation",
            Self::Renewal => "renewal",
            Self::Revocation => "revocation",
        }
    }
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Values substituted into a statement template
#[derive(Debug, Default, Serialize)]
pub struct StatementVariables<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiration: Option<&'a str>,
}

/// Ordered statements derived from one rendered template.
///
/// `Debug` only shows the count: creation statements contain the generated
/// password.
#[derive(Clone, PartialEq, Eq)]
pub struct StatementSet {
    statements: Vec<String>,
}

impl StatementSet {
    /// Split on `;`, trimming each segment and dropping empty ones.
    pub fn split(rendered: &str) -> Self {
        let statements = rendered
            .split(STATEMENT_SEPARATOR)
            .map(str::trim)
            .filter(|segment| !segment.is_empty())
            .map(str::to_owned)
            .collect();
        Self { statements }
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.statements.iter()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.statements
    }
}

impl<'a> IntoIterator for &'a StatementSet {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Debug for StatementSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StatementSet")
            .field("len", &self.statements.len())
            .finish()
    }
}

/// Renders operator templates. One registry per render mode.
pub struct StatementTemplater {
    raw: Handlebars<'static>,
    escaped: Handlebars<'static>,
}

impl StatementTemplater {
    pub fn new() -> Self {
        let mut raw = Handlebars::new();
        raw.register_escape_fn(handlebars::no_escape);
        Self {
            raw,
            escaped: Handlebars::new(),
        }
    }

    /// Render `source` against `variables`.
    pub fn render<T: Serialize>(
        &self,
        source: &str,
        variables: &T,
        mode: RenderMode,
    ) -> Result<String, handlebars::RenderError> {
        let registry = match mode {
            RenderMode::Raw => &self.raw,
            RenderMode::Escaped => &self.escaped,
        };
        registry.render_template(source, variables)
    }

    /// Render the template for `kind` in its mode and split it.
    ///
    /// Fails when the template does not parse or when it renders to no
    /// statement at all.
    pub fn statements(
        &self,
        kind: StatementKind,
        source: &str,
        variables: &StatementVariables<'_>,
    ) -> Result<StatementSet, ValidationError> {
        let rendered = self
            .render(source, variables, kind.render_mode())
            .map_err(|e| ValidationError::Template {
                kind,
                reason: e.to_string(),
            })?;

        let set = StatementSet::split(&rendered);
        if set.is_empty() {
            return Err(ValidationError::Template {
                kind,
                reason: "template renders to no statements".into(),
            });
        }
        Ok(set)
    }
}

impl Default for StatementTemplater {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for StatementTemplater {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StatementTemplater").finish_non_exhaustive()
    }
}
