//! Terminal rendering.
//!
//! Every `render_*` function returns a `String` so output can be tested
//! without a terminal. With `use_color == false` the result is plain text;
//! otherwise `colored` decides whether ANSI codes are emitted (it stays plain
//! when stdout is not a terminal or `NO_COLOR` is set).

use cardify::api::{CmdMessage, MessageLevel, ValidationEntry};
use cardify::config::{CardifyConfig, CONFIG_KEYS};
use cardify::coords::PlacedNode;
use cardify::index::DisplayTemplate;
use cardify::model::Geometry;
use chrono::{DateTime, Utc};
use colored::{ColoredString, Colorize};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub const LINE_WIDTH: usize = 100;
pub const TIME_WIDTH: usize = 14;

type Style = fn(ColoredString) -> ColoredString;

fn paint(text: &str, use_color: bool, style: Style) -> String {
    if use_color {
        style(text.normal()).to_string()
    } else {
        text.to_string()
    }
}

pub fn render_template_list(templates: &[DisplayTemplate], use_color: bool) -> String {
    if templates.is_empty() {
        return "No templates found.\n".to_string();
    }

    let mut out = String::new();
    for dt in templates {
        let meta = &dt.template.metadata;
        let idx = format!("{}. ", dt.index);
        let summary = format!(
            "{} ({} x {}{}, {} node{})",
            meta.name,
            fmt_num(meta.width),
            fmt_num(meta.height),
            if meta.relative { " rel" } else { "" },
            dt.template.document.len(),
            if dt.template.document.len() == 1 { "" } else { "s" }
        );

        let left = "  ";
        let fixed = left.width() + idx.width() + TIME_WIDTH;
        let available = LINE_WIDTH.saturating_sub(fixed);
        let shown = truncate_to_width(&summary, available);
        let padding = available.saturating_sub(shown.width());

        out.push_str(&format!(
            "{}{}{}{}{}\n",
            left,
            paint(&idx, use_color, |s| s.yellow()),
            shown,
            " ".repeat(padding),
            paint(&format_time_ago(meta.updated_at), use_color, |s| s.dimmed()),
        ));
    }
    out
}

pub fn render_full_templates(templates: &[DisplayTemplate], use_color: bool) -> String {
    let mut out = String::new();
    for (i, dt) in templates.iter().enumerate() {
        if i > 0 {
            out.push_str("\n================================\n\n");
        }
        let meta = &dt.template.metadata;
        out.push_str(&format!(
            "{} {}\n",
            paint(&dt.index.to_string(), use_color, |s| s.yellow()),
            paint(&meta.name, use_color, |s| s.bold()),
        ));
        out.push_str(&format!(
            "{} x {} px{}  id {}\n",
            fmt_num(meta.width),
            fmt_num(meta.height),
            if meta.relative { " (relative)" } else { "" },
            meta.id
        ));
        out.push_str("--------------------------------\n");
        if dt.template.document.is_empty() {
            out.push_str("(no nodes)\n");
        }
        for (n, node) in dt.template.document.iter().enumerate() {
            out.push_str(&format!(
                "  [{}] {:<6} {:<28} {}\n",
                n,
                node.kind(),
                fmt_geometry(node.geometry()),
                node.label()
            ));
        }
    }
    out
}

pub fn render_layout(placed: &[PlacedNode], use_color: bool) -> String {
    if placed.is_empty() {
        return "No nodes.\n".to_string();
    }
    placed
        .iter()
        .map(|p| {
            format!(
                "  {} {:<6} {:<28} {}\n",
                paint(&format!("{:>2}.", p.index), use_color, |s| s.yellow()),
                p.kind,
                fmt_geometry(&p.bounds),
                paint(&p.label, use_color, |s| s.dimmed()),
            )
        })
        .collect()
}

pub fn render_validations(entries: &[ValidationEntry], use_color: bool) -> String {
    let mut out = String::new();
    for entry in entries {
        if entry.report.valid {
            out.push_str(&format!(
                "{} {}\n",
                paint("ok", use_color, |s| s.green()),
                entry.label
            ));
            continue;
        }
        out.push_str(&format!(
            "{} {}\n",
            paint("invalid", use_color, |s| s.red()),
            entry.label
        ));
        for issue in &entry.report.errors {
            let path = if issue.path.is_empty() {
                "<root>"
            } else {
                issue.path.as_str()
            };
            out.push_str(&format!("    {}: {}\n", path, issue.message));
        }
    }
    out
}

pub fn render_config(config: &CardifyConfig) -> String {
    let lines: Vec<String> = CONFIG_KEYS
        .iter()
        .filter_map(|key| config.get(key).map(|value| format!("{} = {}", key, value)))
        .collect();
    render_text_list(&lines, "No configuration values.")
}

pub fn render_text_list(lines: &[String], empty_message: &str) -> String {
    if lines.is_empty() {
        return format!("{}\n", empty_message);
    }
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

pub fn render_messages(messages: &[CmdMessage], use_color: bool) -> String {
    messages
        .iter()
        .map(|message| {
            let style: Style = match message.level {
                MessageLevel::Info => |s| s.dimmed(),
                MessageLevel::Success => |s| s.green(),
                MessageLevel::Warning => |s| s.yellow(),
                MessageLevel::Error => |s| s.red(),
            };
            format!("{}\n", paint(&message.content, use_color, style))
        })
        .collect()
}

pub fn print_messages(messages: &[CmdMessage]) {
    let output = render_messages(messages, true);
    if !output.is_empty() {
        print!("{}", output);
    }
}

fn fmt_geometry(g: &Geometry) -> String {
    let mut s = format!(
        "{},{} {}x{}",
        fmt_num(g.x),
        fmt_num(g.y),
        fmt_num(g.width),
        fmt_num(g.height)
    );
    if g.rotation != 0.0 {
        s.push_str(&format!(" rot {}", fmt_num(g.rotation)));
    }
    s
}

/// Two decimals at most, trailing zeros dropped: `12.50` -> `12.5`, `100.00` -> `100`.
fn fmt_num(n: f64) -> String {
    let s = format!("{:.2}", n);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" {
        "0".to_string()
    } else {
        s.to_string()
    }
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }

    let mut result = String::new();
    let mut current_width = 0;
    let limit = max_width.saturating_sub(1);

    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > limit {
            break;
        }
        result.push(c);
        current_width += char_width;
    }
    result.push('…');
    result
}

fn format_time_ago(timestamp: DateTime<Utc>) -> String {
    let duration = Utc::now().signed_duration_since(timestamp);
    let formatter = timeago::Formatter::new();
    let time_str = formatter.convert(duration.to_std().unwrap_or_default());
    format!("{:>width$}", time_str, width = TIME_WIDTH)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cardify::coords::{layout, Surface};
    use cardify::index::index_templates;
    use cardify::model::{Document, Node, Template};
    use cardify::validation::{ValidationIssue, ValidationReport};

    fn listed(names: &[&str]) -> Vec<DisplayTemplate> {
        index_templates(
            names
                .iter()
                .map(|n| Template::new(n.to_string(), 1050.0, 600.0, false))
                .collect(),
        )
    }

    #[test]
    fn test_render_empty_list() {
        assert_eq!(render_template_list(&[], false), "No templates found.\n");
    }

    #[test]
    fn test_render_list_line() {
        let out = render_template_list(&listed(&["Badge"]), false);
        assert!(out.starts_with("  1. Badge (1050 x 600, 0 nodes)"));
        assert!(out.trim_end().ends_with("ago") || out.trim_end().ends_with("now"));
        assert_eq!(out.lines().next().unwrap().width(), LINE_WIDTH);
    }

    #[test]
    fn test_long_names_are_truncated() {
        let long = "x".repeat(200);
        let out = render_template_list(&listed(&[long.as_str()]), false);
        assert!(out.contains('…'));
        assert_eq!(out.lines().next().unwrap().width(), LINE_WIDTH);
    }

    #[test]
    fn test_render_full_template() {
        let mut dts = listed(&["Badge"]);
        dts[0].template.document = Document::from_nodes(vec![Node::text(
            Geometry::new(10.0, 20.5, 300.0, 40.0).with_rotation(90.0),
            "Ada",
        )]);
        let out = render_full_templates(&dts, false);
        assert!(out.starts_with("1 Badge\n1050 x 600 px  id "));
        assert!(out.contains("[0] text   10,20.5 300x40 rot 90"));
        assert!(out.contains("\"Ada\""));
    }

    #[test]
    fn test_render_layout_uses_pixels() {
        let doc = Document::from_nodes(vec![Node::text(
            Geometry::new(10.0, 20.0, 50.0, 10.0),
            "Rel",
        )]);
        let out = render_layout(&layout(&doc, Surface::new(1000.0, 500.0, true)), false);
        assert!(out.contains(" 0. text   100,100 500x50"));
    }

    #[test]
    fn test_render_validations() {
        let entries = vec![
            ValidationEntry {
                label: "1. Good".into(),
                report: ValidationReport {
                    valid: true,
                    errors: vec![],
                },
            },
            ValidationEntry {
                label: "2. Bad".into(),
                report: ValidationReport {
                    valid: false,
                    errors: vec![ValidationIssue {
                        field: "width".into(),
                        message: "must be greater than zero".into(),
                        path: "metadata.width".into(),
                    }],
                },
            },
        ];
        let out = render_validations(&entries, false);
        assert_eq!(
            out,
            "ok 1. Good\ninvalid 2. Bad\n    metadata.width: must be greater than zero\n"
        );
    }

    #[test]
    fn test_render_config_lists_every_key() {
        let out = render_config(&CardifyConfig::default());
        assert!(out.contains("default-width = 1050\n"));
        assert!(out.contains("history-limit = unlimited\n"));
        assert_eq!(out.lines().count(), CONFIG_KEYS.len());
    }

    #[test]
    fn test_render_messages_plain() {
        let out = render_messages(
            &[CmdMessage::success("Saved"), CmdMessage::error("Oops")],
            false,
        );
        assert_eq!(out, "Saved\nOops\n");
    }

    #[test]
    fn test_fmt_num() {
        assert_eq!(fmt_num(100.0), "100");
        assert_eq!(fmt_num(12.5), "12.5");
        assert_eq!(fmt_num(1.0 / 3.0), "0.33");
        assert_eq!(fmt_num(-0.001), "0");
        assert_eq!(fmt_num(0.0), "0");
    }
}
