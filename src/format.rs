//! Rendering the shape catalogue as JSON or XML text.

use crate::catalogue::ShapeSpec;
use crate::error::{Error, Result};
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use std::io::{self, Write};
use std::str::FromStr;

/// Text formats the catalogue can be rendered in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CatalogueFormat {
    #[default]
    Json,
    Xml,
}

impl CatalogueFormat {
    /// Infer the format from a file name ending in `.json` or `.xml`.
    pub fn from_file_name(name: &str) -> Result<Self> {
        let lower = name.to_ascii_lowercase();
        if lower.ends_with(".xml") {
            Ok(CatalogueFormat::Xml)
        } else if lower.ends_with(".json") {
            Ok(CatalogueFormat::Json)
        } else {
            Err(Error::UnsupportedFormat(name.to_string()))
        }
    }
}

impl FromStr for CatalogueFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(CatalogueFormat::Json),
            "xml" => Ok(CatalogueFormat::Xml),
            _ => Err(Error::UnsupportedFormat(s.to_string())),
        }
    }
}

#[derive(Serialize)]
struct Catalogue<'a> {
    shapes: &'a [ShapeSpec],
}

/// Render `shapes` in catalogue order.
pub fn format_catalogue(shapes: &[ShapeSpec], format: CatalogueFormat) -> Result<String> {
    let mut buf = Vec::new();
    match format {
        CatalogueFormat::Json => write_json(shapes, &mut buf)?,
        CatalogueFormat::Xml => write_xml(shapes, &mut buf)?,
    }
    String::from_utf8(buf).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e).into())
}

/// Like [`format_catalogue`], with the format given by name (`json` or `xml`).
pub fn format_catalogue_named(shapes: &[ShapeSpec], format: &str) -> Result<String> {
    format_catalogue(shapes, format.parse()?)
}

/// `{"shapes": [...]}` with four-space indentation.
fn write_json<W: Write>(shapes: &[ShapeSpec], writer: &mut W) -> io::Result<()> {
    let mut ser = Serializer::with_formatter(&mut *writer, PrettyFormatter::with_indent(b"    "));
    Catalogue { shapes }.serialize(&mut ser).map_err(io::Error::from)
}

fn write_xml<W: Write>(shapes: &[ShapeSpec], writer: &mut W) -> io::Result<()> {
    write!(writer, "<shapes>")?;
    for shape in shapes {
        write!(writer, r#"<shape name="{}">"#, escape(&shape.name))?;
        for param in &shape.parameters {
            write!(writer, "<parameter>{}</parameter>", escape(param))?;
        }
        write!(writer, "</shape>")?;
    }
    write!(writer, "</shapes>")
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalogue::list_shapes;

    #[test]
    fn json_uses_four_space_indent() {
        let text = format_catalogue(&list_shapes(), CatalogueFormat::Json).unwrap();
        assert!(text.starts_with("{\n    \"shapes\": [\n        {\n"));
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["shapes"][2]["name"], "cylinder");
        assert_eq!(value["shapes"][2]["parameters"][1], "height");
    }

    #[test]
    fn xml_layout() {
        let text = format_catalogue(&list_shapes()[..1], CatalogueFormat::Xml).unwrap();
        assert_eq!(
            text,
            r#"<shapes><shape name="cube"><parameter>size</parameter></shape></shapes>"#
        );
    }

    #[test]
    fn xml_escapes_markup() {
        let shapes = [ShapeSpec {
            name: "a<b".to_string(),
            parameters: vec!["x&\"y\"".to_string()],
        }];
        let text = format_catalogue(&shapes, CatalogueFormat::Xml).unwrap();
        assert!(text.contains(r#"name="a&lt;b""#));
        assert!(text.contains("<parameter>x&amp;&quot;y&quot;</parameter>"));
    }

    #[test]
    fn format_selection() {
        assert_eq!(
            CatalogueFormat::from_file_name("Shapes.XML").unwrap(),
            CatalogueFormat::Xml
        );
        assert!(matches!(
            CatalogueFormat::from_file_name("shapes.yaml"),
            Err(Error::UnsupportedFormat(_))
        ));
        assert!(matches!(
            format_catalogue_named(&list_shapes(), "csv"),
            Err(Error::UnsupportedFormat(_))
        ));
    }
}
