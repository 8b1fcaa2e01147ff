//! JSON renderer — structured output for tooling integration.
//!
//! Serializes the ProjectDocument as one `project.json` page. Useful for
//! custom rendering pipelines and CI checks.

use crate::model::*;
use crate::render::{Page, Renderer};

pub struct JsonRenderer;

impl Renderer for JsonRenderer {
    fn render(&self, doc: &ProjectDocument) -> Vec<Page> {
        let mut out = String::new();
        out.push_str("{\n");

        out.push_str("  \"project\": {\n");
        out.push_str(&format!(
            "    \"name\": \"{}\",\n",
            json_escape(&doc.info.name)
        ));
        out.push_str(&format!(
            "    \"description\": \"{}\",\n",
            json_escape(&doc.info.description)
        ));
        out.push_str(&format!(
            "    \"version\": \"{}\",\n",
            json_escape(&doc.info.version)
        ));
        out.push_str(&format!(
            "    \"author\": \"{}\"\n",
            json_escape(&doc.info.author)
        ));
        out.push_str("  },\n");

        out.push_str("  \"pous\": [\n");
        for (i, pou) in doc.pous.iter().enumerate() {
            out.push_str(&render_pou(pou));
            push_separator(&mut out, i, doc.pous.len());
        }
        out.push_str("  ],\n");

        out.push_str("  \"duts\": [\n");
        for (i, dut) in doc.duts.iter().enumerate() {
            out.push_str(&render_dut(dut));
            push_separator(&mut out, i, doc.duts.len());
        }
        out.push_str("  ],\n");

        out.push_str("  \"gvls\": [\n");
        for (i, gvl) in doc.gvls.iter().enumerate() {
            out.push_str(&render_gvl(gvl));
            push_separator(&mut out, i, doc.gvls.len());
        }
        out.push_str("  ]\n");
        out.push_str("}\n");

        vec![Page::new("project", out)]
    }

    fn file_extension(&self) -> &str {
        "json"
    }
}

fn render_pou(pou: &Pou) -> String {
    let mut out = String::new();
    out.push_str("    {\n");
    out.push_str(&format!("      \"name\": \"{}\",\n", json_escape(&pou.name)));
    out.push_str(&format!(
        "      \"type\": \"{}\",\n",
        json_escape(&pou.subtype)
    ));
    out.push_str(&format!("      \"file\": \"{}\",\n", json_escape(&pou.path)));
    out.push_str(&render_docs(&pou.docs));
    out.push_str(&render_fields("variables", &pou.variables));
    out.push_str(&format!(
        "      \"implementation\": \"{}\"\n",
        json_escape(&pou.implementation)
    ));
    out.push_str("    }");
    out
}

fn render_dut(dut: &Dut) -> String {
    let mut out = String::new();
    out.push_str("    {\n");
    out.push_str(&format!("      \"name\": \"{}\",\n", json_escape(&dut.name)));
    out.push_str(&format!("      \"type\": \"{}\",\n", dut.kind.as_str()));
    out.push_str(&format!("      \"file\": \"{}\",\n", json_escape(&dut.path)));
    out.push_str(&render_docs(&dut.docs));
    out.push_str(&render_fields("members", &dut.members));
    // strip the trailing comma left by render_fields
    truncate_trailing_comma(&mut out);
    out.push_str("    }");
    out
}

fn render_gvl(gvl: &Gvl) -> String {
    let mut out = String::new();
    out.push_str("    {\n");
    out.push_str(&format!("      \"name\": \"{}\",\n", json_escape(&gvl.name)));
    out.push_str(&format!("      \"file\": \"{}\",\n", json_escape(&gvl.path)));
    out.push_str(&render_docs(&gvl.docs));
    out.push_str(&render_fields("variables", &gvl.variables));
    truncate_trailing_comma(&mut out);
    out.push_str("    }");
    out
}

fn render_docs(docs: &Documentation) -> String {
    let mut out = String::new();
    out.push_str("      \"documentation\": {\n");
    out.push_str(&format!(
        "        \"description\": \"{}\",\n",
        json_escape(&docs.description)
    ));
    out.push_str(&format!(
        "        \"author\": \"{}\",\n",
        json_escape(&docs.author)
    ));
    out.push_str(&format!(
        "        \"version\": \"{}\",\n",
        json_escape(&docs.version)
    ));
    out.push_str(&format!(
        "        \"date\": \"{}\"\n",
        json_escape(&docs.date)
    ));
    out.push_str("      },\n");
    out
}

fn render_fields(name: &str, fields: &[Field]) -> String {
    let mut out = String::new();
    out.push_str(&format!("      \"{}\": [\n", name));
    for (i, field) in fields.iter().enumerate() {
        let comma = if i < fields.len() - 1 { "," } else { "" };
        out.push_str(&format!(
            "        {{ \"name\": \"{}\", \"type\": \"{}\", \"default\": \"{}\", \"comment\": \"{}\" }}{}",
            json_escape(&field.name),
            json_escape(&field.ty),
            json_escape(&field.default),
            json_escape(&field.comment),
            comma
        ));
        out.push('\n');
    }
    out.push_str("      ],\n");
    out
}

fn push_separator(out: &mut String, index: usize, len: usize) {
    if index < len - 1 {
        out.push_str(",\n");
    } else {
        out.push('\n');
    }
}

fn truncate_trailing_comma(out: &mut String) {
    let trimmed = out.trim_end().trim_end_matches(',').to_string();
    *out = trimmed;
    out.push('\n');
}

fn json_escape(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_single_project_page() {
        let doc = ProjectDocument::default();
        let pages = JsonRenderer.render(&doc);
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].name, "project");
        assert!(pages[0].content.contains("\"name\": \"TwinCAT Project\""));
        assert!(pages[0].content.contains("\"pous\": [\n  ]"));
    }

    #[test]
    fn escapes_special_characters() {
        let mut doc = ProjectDocument::default();
        doc.pous.push(Pou {
            name: "MAIN".to_string(),
            subtype: "PROGRAM".to_string(),
            path: "POUs/MAIN.TcPOU".to_string(),
            implementation: "s := 'a\"b';\nRETURN;".to_string(),
            ..Default::default()
        });
        let pages = JsonRenderer.render(&doc);
        assert!(pages[0]
            .content
            .contains("\"implementation\": \"s := 'a\\\"b';\\nRETURN;\""));
    }

    #[test]
    fn fields_render_inline_objects() {
        let mut doc = ProjectDocument::default();
        doc.gvls.push(Gvl {
            name: "GVL_IO".to_string(),
            path: "GVLs/GVL_IO.TcGVL".to_string(),
            variables: vec![Field {
                name: "bRun".to_string(),
                ty: "BOOL".to_string(),
                default: "FALSE".to_string(),
                comment: "start".to_string(),
            }],
            ..Default::default()
        });
        let pages = JsonRenderer.render(&doc);
        assert!(pages[0].content.contains(
            r#"{ "name": "bRun", "type": "BOOL", "default": "FALSE", "comment": "start" }"#
        ));
    }

    #[test]
    fn no_trailing_comma_before_closing_brace() {
        let mut doc = ProjectDocument::default();
        doc.duts.push(Dut {
            name: "ST_X".to_string(),
            ..Default::default()
        });
        let pages = JsonRenderer.render(&doc);
        assert!(!pages[0].content.contains(",\n    }"));
    }
}
