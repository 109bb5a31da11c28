//! # Template Schema Validation
//!
//! Validates template-shaped JSON before it crosses the store boundary
//! (import, export, save). The history core never calls into this module.
//!
//! Validation works on raw [`serde_json::Value`] rather than on typed
//! structs so that every problem in a file is reported at once, each with a
//! JSON-ish path (`document[2].geometry.width`), instead of stopping at the
//! first serde error.

use crate::error::{CardifyError, Result};
use crate::model::Template;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use uuid::Uuid;

const NODE_TYPES: &[&str] = &["text", "image", "shape", "logo"];
const SHAPES: &[&str] = &["rect", "ellipse", "line"];
const ALIGNS: &[&str] = &["left", "center", "right"];
const FITS: &[&str] = &["cover", "contain", "fill"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    pub field: String,
    pub message: String,
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn summary(&self) -> String {
        if self.valid {
            return "valid".to_string();
        }
        let details: Vec<String> = self
            .errors
            .iter()
            .map(|e| format!("{}: {}", display_path(&e.path), e.message))
            .collect();
        format!("{} error(s): {}", self.errors.len(), details.join("; "))
    }
}

fn display_path(path: &str) -> &str {
    if path.is_empty() {
        "<root>"
    } else {
        path
    }
}

#[derive(Default)]
struct Collector {
    errors: Vec<ValidationIssue>,
}

impl Collector {
    fn push(&mut self, path: &str, field: &str, message: impl Into<String>) {
        self.errors.push(ValidationIssue {
            field: field.to_string(),
            message: message.into(),
            path: path.to_string(),
        });
    }

    fn finish(self) -> ValidationReport {
        ValidationReport {
            valid: self.errors.is_empty(),
            errors: self.errors,
        }
    }

    fn number(
        &mut self,
        obj: &Map<String, Value>,
        parent: &str,
        key: &str,
        required: bool,
    ) -> Option<f64> {
        let path = join(parent, key);
        match obj.get(key) {
            None if !required => None,
            None => {
                self.push(&path, key, "is required");
                None
            }
            Some(value) => match value.as_f64() {
                Some(n) if n.is_finite() => Some(n),
                _ => {
                    self.push(&path, key, "must be a finite number");
                    None
                }
            },
        }
    }

    fn string<'a>(
        &mut self,
        obj: &'a Map<String, Value>,
        parent: &str,
        key: &str,
        required: bool,
    ) -> Option<&'a str> {
        let path = join(parent, key);
        match obj.get(key) {
            None if !required => None,
            None => {
                self.push(&path, key, "is required");
                None
            }
            Some(Value::String(s)) => Some(s.as_str()),
            Some(_) => {
                self.push(&path, key, "must be a string");
                None
            }
        }
    }

    /// An optional string that may also be spelled out as `null`.
    fn nullable_string(&mut self, obj: &Map<String, Value>, parent: &str, key: &str) {
        match obj.get(key) {
            None | Some(Value::Null) | Some(Value::String(_)) => {}
            Some(_) => self.push(&join(parent, key), key, "must be a string or null"),
        }
    }

    fn boolean(&mut self, obj: &Map<String, Value>, parent: &str, key: &str) {
        match obj.get(key) {
            None | Some(Value::Bool(_)) => {}
            Some(_) => self.push(&join(parent, key), key, "must be a boolean"),
        }
    }

    fn one_of(&mut self, obj: &Map<String, Value>, parent: &str, key: &str, allowed: &[&str]) {
        if let Some(value) = self.string(obj, parent, key, false) {
            if !allowed.contains(&value) {
                self.push(
                    &join(parent, key),
                    key,
                    format!("must be one of: {}", allowed.join(", ")),
                );
            }
        }
    }
}

fn join(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", parent, key)
    }
}

/// Validates a template-shaped object.
pub fn validate(value: &Value) -> ValidationReport {
    let mut c = Collector::default();

    let Some(root) = value.as_object() else {
        c.push("", "", "template must be a JSON object");
        return c.finish();
    };

    match root.get("metadata") {
        Some(Value::Object(meta)) => check_metadata(&mut c, meta),
        Some(_) => c.push("metadata", "metadata", "must be an object"),
        None => c.push("metadata", "metadata", "is required"),
    }

    match root.get("document") {
        None => {}
        Some(Value::Array(nodes)) => {
            for (i, node) in nodes.iter().enumerate() {
                check_node(&mut c, &format!("document[{}]", i), node);
            }
        }
        Some(_) => c.push("document", "document", "must be an array of nodes"),
    }

    c.finish()
}

pub fn validate_template(template: &Template) -> ValidationReport {
    match serde_json::to_value(template) {
        Ok(value) => validate(&value),
        Err(e) => {
            let mut c = Collector::default();
            c.push("", "", format!("cannot be serialized: {}", e));
            c.finish()
        }
    }
}

/// Validates and decodes a template from JSON text.
///
/// Missing `id`, `created_at` and `updated_at` are filled in, so hand-written
/// templates only need a name, a size and their nodes.
pub fn parse_template(json: &str) -> Result<Template> {
    let mut value: Value = serde_json::from_str(json).map_err(CardifyError::Serialization)?;
    let report = validate(&value);
    if !report.valid {
        return Err(CardifyError::Validation(report));
    }

    if let Some(Value::Object(meta)) = value.get_mut("metadata") {
        let now = Utc::now().to_rfc3339();
        meta.entry("id")
            .or_insert_with(|| Value::String(Uuid::new_v4().to_string()));
        meta.entry("created_at")
            .or_insert_with(|| Value::String(now.clone()));
        meta.entry("updated_at")
            .or_insert_with(|| Value::String(now.clone()));
    }

    serde_json::from_value(value).map_err(CardifyError::Serialization)
}

fn check_metadata(c: &mut Collector, meta: &Map<String, Value>) {
    match c.string(meta, "metadata", "name", true) {
        Some(name) if name.trim().is_empty() => c.push("metadata.name", "name", "must not be empty"),
        _ => {}
    }

    for key in ["width", "height"] {
        if let Some(n) = c.number(meta, "metadata", key, true) {
            if n <= 0.0 {
                c.push(&join("metadata", key), key, "must be greater than zero");
            }
        }
    }

    c.boolean(meta, "metadata", "relative");

    if let Some(id) = c.string(meta, "metadata", "id", false) {
        if Uuid::parse_str(id).is_err() {
            c.push("metadata.id", "id", "must be a UUID");
        }
    }

    for key in ["created_at", "updated_at"] {
        if let Some(ts) = c.string(meta, "metadata", key, false) {
            if DateTime::parse_from_rfc3339(ts).is_err() {
                c.push(&join("metadata", key), key, "must be an RFC 3339 timestamp");
            }
        }
    }
}

fn check_node(c: &mut Collector, path: &str, node: &Value) {
    let Some(obj) = node.as_object() else {
        c.push(path, "", "node must be an object");
        return;
    };

    let kind = c.string(obj, path, "type", true);
    if let Some(kind) = kind {
        if !NODE_TYPES.contains(&kind) {
            c.push(
                &join(path, "type"),
                "type",
                format!("unknown node type '{}'", kind),
            );
        }
    }

    check_geometry(c, path, obj);

    match kind {
        Some("text") => {
            c.string(obj, path, "content", true);
            match obj.get("style") {
                None => {}
                Some(Value::Object(style)) => {
                    let style_path = join(path, "style");
                    c.string(style, &style_path, "font_family", false);
                    c.string(style, &style_path, "color", false);
                    if let Some(size) = c.number(style, &style_path, "font_size", false) {
                        if size <= 0.0 {
                            c.push(&join(&style_path, "font_size"), "font_size", "must be greater than zero");
                        }
                    }
                    if let Some(weight) = c.number(style, &style_path, "font_weight", false) {
                        if weight.fract() != 0.0 || !(1.0..=1000.0).contains(&weight) {
                            c.push(
                                &join(&style_path, "font_weight"),
                                "font_weight",
                                "must be an integer between 1 and 1000",
                            );
                        }
                    }
                    c.one_of(style, &style_path, "align", ALIGNS);
                }
                Some(_) => c.push(&join(path, "style"), "style", "must be an object"),
            }
        }
        Some(kind @ ("image" | "logo")) => {
            if let Some(src) = c.string(obj, path, "src", true) {
                if src.trim().is_empty() {
                    c.push(&join(path, "src"), "src", "must not be empty");
                }
            }
            if let Some(opacity) = c.number(obj, path, "opacity", false) {
                if !(0.0..=1.0).contains(&opacity) {
                    c.push(&join(path, "opacity"), "opacity", "must be between 0 and 1");
                }
            }
            if kind == "image" {
                c.one_of(obj, path, "fit", FITS);
            } else {
                c.boolean(obj, path, "grayscale");
            }
        }
        Some("shape") => {
            c.one_of(obj, path, "shape", SHAPES);
            if let Some(width) = c.number(obj, path, "stroke_width", false) {
                if width < 0.0 {
                    c.push(&join(path, "stroke_width"), "stroke_width", "must not be negative");
                }
            }
            c.number(obj, path, "corner_radius", false);
            c.nullable_string(obj, path, "fill");
            c.nullable_string(obj, path, "stroke");
        }
        _ => {}
    }
}

fn check_geometry(c: &mut Collector, path: &str, node: &Map<String, Value>) {
    let geo_path = join(path, "geometry");
    let geometry = match node.get("geometry") {
        Some(Value::Object(g)) => g,
        Some(_) => {
            c.push(&geo_path, "geometry", "must be an object");
            return;
        }
        None => {
            c.push(&geo_path, "geometry", "is required");
            return;
        }
    };

    c.number(geometry, &geo_path, "x", true);
    c.number(geometry, &geo_path, "y", true);
    for key in ["width", "height"] {
        if let Some(n) = c.number(geometry, &geo_path, key, true) {
            if n < 0.0 {
                c.push(&join(&geo_path, key), key, "must not be negative");
            }
        }
    }
    c.number(geometry, &geo_path, "rotation", false);
}
