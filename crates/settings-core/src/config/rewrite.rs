//! Backward-compatibility rewrite rules for JSON settings files
//!
//! Rules run in a fixed order. Each one inspects the accumulated document
//! and either produces a replacement (`Some`) or leaves it alone (`None`).

use serde_json::Value;

use super::ConfigDocument;

/// A single rewrite step.
pub type RewriteRule = fn(&ConfigDocument) -> Option<ConfigDocument>;

/// The rules, in application order.
pub const RULES: [(&str, RewriteRule); 4] = [
    ("unwrap-cypress", unwrap_cypress),
    ("visitTimeout->pageLoadTimeout", rename_visit_timeout),
    ("commandTimeout->defaultCommandTimeout", rename_command_timeout),
    ("supportFolder->supportFile", rename_support_folder),
];

/// Result of running every rule over a document.
#[derive(Debug, Clone, PartialEq)]
pub struct Migration {
    pub document: ConfigDocument,
    /// Names of the rules that produced a replacement, in order.
    pub applied: Vec<&'static str>,
}

/// Fold [`RULES`] over a copy of `doc`.
pub fn migrate(doc: &ConfigDocument) -> Migration {
    let mut applied = Vec::new();
    let document = RULES
        .iter()
        .fold(doc.clone(), |memo, (name, rule)| match rule(&memo) {
            Some(next) => {
                applied.push(*name);
                next
            }
            None => memo,
        });
    Migration { document, applied }
}

/// Fold [`RULES`] over a copy of `doc`, returning only the document.
pub fn apply(doc: &ConfigDocument) -> ConfigDocument {
    migrate(doc).document
}

/// JavaScript truthiness of a JSON value.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// A `cypress` wrapper object replaces the whole document.
///
/// Wrappers nested inside the wrapper are peeled in the same step, so the
/// result never holds a `cypress` object.
fn unwrap_cypress(doc: &ConfigDocument) -> Option<ConfigDocument> {
    let mut inner = doc.get("cypress")?.as_object()?;
    while let Some(Value::Object(nested)) = inner.get("cypress") {
        inner = nested;
    }
    Some(ConfigDocument::from(inner.clone()))
}

fn rename_key(doc: &ConfigDocument, from: &str, to: &str) -> Option<ConfigDocument> {
    let value = doc.get(from).filter(|v| is_truthy(v))?;
    let mut next = doc.clone();
    let value = value.clone();
    next.remove(from);
    next.insert(to, value);
    Some(next)
}

fn rename_visit_timeout(doc: &ConfigDocument) -> Option<ConfigDocument> {
    rename_key(doc, "visitTimeout", "pageLoadTimeout")
}

fn rename_command_timeout(doc: &ConfigDocument) -> Option<ConfigDocument> {
    rename_key(doc, "commandTimeout", "defaultCommandTimeout")
}

fn rename_support_folder(doc: &ConfigDocument) -> Option<ConfigDocument> {
    rename_key(doc, "supportFolder", "supportFile")
}
