//! Widget metadata from `Contents/widget.xml`

use crate::error::{ErrorExt, PackagerError, Result};
use crate::project::WIDGET_EXTENSION;
use std::path::Path;

/// Root element of a widget manifest.
const ROOT_ELEMENT: &str = "metadata";

/// Identity fields read from a widget manifest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetManifest {
    /// Reverse-DNS widget identifier (e.g., "com.example.widget")
    pub identifier: String,

    /// Widget version string (e.g., "1.2")
    pub version: String,
}

impl WidgetManifest {
    /// Archive filename derived from the manifest: `<identifier>-<version>.widget`
    pub fn output_filename(&self) -> String {
        format!("{}-{}.{}", self.identifier, self.version, WIDGET_EXTENSION)
    }
}

/// Read and parse the manifest at `path`.
pub fn load_manifest(path: &Path) -> Result<WidgetManifest> {
    let content = std::fs::read_to_string(path).fs_context("reading widget.xml", path)?;
    parse_manifest(&content, path)
}

/// Parse manifest XML. `path` is only used in error messages.
///
/// `identifier` and `version` are both looked up as direct children of the
/// `<metadata>` root element; surrounding whitespace in their text is
/// trimmed and an empty value counts as missing.
pub fn parse_manifest(content: &str, path: &Path) -> Result<WidgetManifest> {
    let doc = roxmltree::Document::parse(content).map_err(|source| PackagerError::ManifestParse {
        path: path.to_path_buf(),
        source,
    })?;

    let root = doc.root_element();
    if root.tag_name().name() != ROOT_ELEMENT {
        return Err(PackagerError::ManifestRoot {
            path: path.to_path_buf(),
            found: root.tag_name().name().to_string(),
        });
    }

    let field = |name: &'static str| -> Result<String> {
        root.children()
            .filter(|n| n.is_element() && n.tag_name().name() == name)
            .find_map(|n| {
                let text = n.text().unwrap_or("").trim();
                (!text.is_empty()).then(|| text.to_string())
            })
            .ok_or_else(|| PackagerError::MissingManifestField {
                field: name,
                path: path.to_path_buf(),
            })
    };

    let identifier = field("identifier")?;
    let version = field("version")?;

    log::debug!("Read widget manifest: {} {}", identifier, version);

    Ok(WidgetManifest {
        identifier,
        version,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(xml: &str) -> Result<WidgetManifest> {
        parse_manifest(xml, Path::new("Contents/widget.xml"))
    }

    #[test]
    fn derives_output_filename() {
        let manifest = parse(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<metadata>
  <identifier>com.example.widget</identifier>
  <version>1.2</version>
  <name>Example</name>
</metadata>"#,
        )
        .unwrap();

        assert_eq!(manifest.identifier, "com.example.widget");
        assert_eq!(manifest.version, "1.2");
        assert_eq!(manifest.output_filename(), "com.example.widget-1.2.widget");
    }

    #[test]
    fn trims_field_text() {
        let manifest =
            parse("<metadata><identifier>\n  a.b  \n</identifier><version> 3 </version></metadata>")
                .unwrap();
        assert_eq!(manifest.output_filename(), "a.b-3.widget");
    }

    #[test]
    fn missing_identifier() {
        let err = parse("<metadata><version>1.0</version></metadata>").unwrap_err();
        assert!(matches!(
            err,
            PackagerError::MissingManifestField { field: "identifier", .. }
        ));
    }

    #[test]
    fn missing_or_empty_version() {
        let err = parse("<metadata><identifier>a.b</identifier></metadata>").unwrap_err();
        assert!(matches!(err, PackagerError::MissingManifestField { field: "version", .. }));

        let err =
            parse("<metadata><identifier>a.b</identifier><version/></metadata>").unwrap_err();
        assert!(matches!(err, PackagerError::MissingManifestField { field: "version", .. }));
    }

    #[test]
    fn nested_fields_are_not_picked_up() {
        let err = parse(
            "<metadata><info><identifier>a.b</identifier></info><version>1</version></metadata>",
        )
        .unwrap_err();
        assert!(matches!(
            err,
            PackagerError::MissingManifestField { field: "identifier", .. }
        ));
    }

    #[test]
    fn wrong_root_element() {
        let err = parse("<widget><identifier>a</identifier><version>1</version></widget>")
            .unwrap_err();
        assert!(matches!(err, PackagerError::ManifestRoot { ref found, .. } if found == "widget"));
    }

    #[test]
    fn malformed_xml() {
        let err = parse("<metadata><identifier>").unwrap_err();
        assert!(matches!(err, PackagerError::ManifestParse { .. }));
    }
}
