//! Reading GIBS colormap XML documents.
//!
//! A document holds one or more `<ColorMap>` schemes. Each scheme carries a
//! title, an `<Entries>` block of `<ColorMapEntry>` elements and a `<Legend>`
//! whose `type` attribute tells continuous schemes from classified ones.
//! Attribute texts are kept raw here; interpreting them is the builder's job.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use tracing::debug;

use crate::error::{GibsError, Result};

/// Legend type of schemes that can become a continuous colormap
pub const CONTINUOUS_LEGEND: &str = "continuous";

/// Title of the scheme describing no-data pixels
pub const NO_DATA_TITLE: &str = "No Data";

/// The raw attributes of one `<ColorMapEntry>`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawEntry {
    /// `rgb="r,g,b"`
    pub rgb: Option<String>,
    /// `value="[low,high)"`
    pub value: Option<String>,
    /// `ref="..."`
    pub reference: Option<String>,
}

/// One `<ColorMap>` block
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColorScheme {
    pub title: Option<String>,
    pub units: Option<String>,
    pub legend_type: Option<String>,
    pub entries: Vec<RawEntry>,
}

impl ColorScheme {
    /// Whether this scheme describes no-data pixels
    pub fn is_no_data(&self) -> bool {
        self.title.as_deref() == Some(NO_DATA_TITLE)
    }

    /// Whether the legend declares a continuous scheme
    pub fn is_continuous(&self) -> bool {
        self.legend_type.as_deref() == Some(CONTINUOUS_LEGEND)
    }
}

/// A parsed colormap document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColorMapDocument {
    pub schemes: Vec<ColorScheme>,
}

impl ColorMapDocument {
    /// The scheme a colormap is built from: the first one that is not the
    /// no-data scheme
    pub fn primary_scheme(&self) -> Option<&ColorScheme> {
        self.schemes.iter().find(|s| !s.is_no_data())
    }
}

/// Collect the attributes of a start tag into `(key, value)` pairs.
///
/// Values that fail to unescape are kept verbatim.
pub(crate) fn collect_attributes(tag: &BytesStart<'_>, html: bool) -> Vec<(String, String)> {
    let attributes = if html {
        tag.html_attributes()
    } else {
        tag.attributes()
    };

    attributes
        .filter_map(|attr| attr.ok())
        .map(|attr| {
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = match attr.unescape_value() {
                Ok(v) => v.into_owned(),
                Err(_) => String::from_utf8_lossy(&attr.value).into_owned(),
            };
            (key, value)
        })
        .collect()
}

fn attribute(attributes: &[(String, String)], key: &str) -> Option<String> {
    attributes
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.clone())
}

/// Parse a colormap document
pub fn parse_document(xml: &str) -> Result<ColorMapDocument> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut document = ColorMapDocument::default();
    let mut current: Option<ColorScheme> = None;

    loop {
        let event = reader.read_event().map_err(|e| GibsError::Xml {
            message: format!("at byte {}: {}", reader.buffer_position(), e),
        })?;

        match event {
            Event::Start(ref tag) | Event::Empty(ref tag) => {
                let is_empty = matches!(event, Event::Empty(_));
                match tag.name().as_ref() {
                    b"ColorMap" => {
                        let attributes = collect_attributes(tag, false);
                        let scheme = ColorScheme {
                            title: attribute(&attributes, "title"),
                            units: attribute(&attributes, "units"),
                            ..Default::default()
                        };
                        if is_empty {
                            document.schemes.push(scheme);
                        } else {
                            current = Some(scheme);
                        }
                    }
                    b"ColorMapEntry" => {
                        if let Some(scheme) = current.as_mut() {
                            let attributes = collect_attributes(tag, false);
                            scheme.entries.push(RawEntry {
                                rgb: attribute(&attributes, "rgb"),
                                value: attribute(&attributes, "value"),
                                reference: attribute(&attributes, "ref"),
                            });
                        }
                    }
                    b"Legend" => {
                        if let Some(scheme) = current.as_mut() {
                            let attributes = collect_attributes(tag, false);
                            scheme.legend_type = attribute(&attributes, "type");
                        }
                    }
                    _ => {}
                }
            }
            Event::End(ref tag) => {
                if tag.name().as_ref() == b"ColorMap" {
                    if let Some(scheme) = current.take() {
                        document.schemes.push(scheme);
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(scheme) = current.take() {
        return Err(GibsError::Xml {
            message: format!(
                "unterminated ColorMap element (title {:?})",
                scheme.title.unwrap_or_default()
            ),
        });
    }

    debug!(schemes = document.schemes.len(), "Parsed colormap document");
    Ok(document)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOCUMENT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<ColorMaps xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">
  <ColorMap title="No Data">
    <Entries>
      <ColorMapEntry rgb="0,0,0" transparent="true" nodata="true" sourceValue="[0]" label="No Data"/>
    </Entries>
    <Legend type="classification">
      <LegendEntry rgb="0,0,0" tooltip="No Data" id="0"/>
    </Legend>
  </ColorMap>
  <ColorMap title="Sea Surface Temperature" units="C">
    <Entries>
      <ColorMapEntry rgb="0,0,255" transparent="false" value="[-INF,0)" ref="1"/>
      <ColorMapEntry rgb="0,255,0" transparent="false" value="[0,10)" ref="2"/>
      <ColorMapEntry rgb="255,0,0" transparent="false" value="[10,INF)" ref="3"/>
    </Entries>
    <Legend type="continuous" minLabel="0" maxLabel="10">
      <LegendEntry rgb="0,0,255" tooltip="&lt;0" id="1"/>
    </Legend>
  </ColorMap>
</ColorMaps>"#;

    #[test]
    fn test_parse_document() {
        let doc = parse_document(DOCUMENT).unwrap();
        assert_eq!(doc.schemes.len(), 2);

        let no_data = &doc.schemes[0];
        assert!(no_data.is_no_data());
        assert_eq!(no_data.legend_type.as_deref(), Some("classification"));
        assert_eq!(no_data.entries.len(), 1);
        assert_eq!(no_data.entries[0].value, None);

        let primary = doc.primary_scheme().unwrap();
        assert_eq!(primary.title.as_deref(), Some("Sea Surface Temperature"));
        assert_eq!(primary.units.as_deref(), Some("C"));
        assert!(primary.is_continuous());
        assert_eq!(primary.entries.len(), 3);
        assert_eq!(
            primary.entries[1],
            RawEntry {
                rgb: Some("0,255,0".to_string()),
                value: Some("[0,10)".to_string()),
                reference: Some("2".to_string()),
            }
        );
    }

    #[test]
    fn test_legend_entries_are_not_range_entries() {
        let doc = parse_document(DOCUMENT).unwrap();
        let total: usize = doc.schemes.iter().map(|s| s.entries.len()).sum();
        assert_eq!(total, 4);
    }

    #[test]
    fn test_single_colormap_root() {
        let xml = r#"<ColorMap title="Solo"><Entries>
            <ColorMapEntry rgb="1,2,3" value="[0,1)"/>
        </Entries><Legend type="continuous"/></ColorMap>"#;
        let doc = parse_document(xml).unwrap();
        assert_eq!(doc.schemes.len(), 1);
        assert!(doc.schemes[0].is_continuous());
    }

    #[test]
    fn test_malformed_document() {
        assert!(parse_document("<ColorMaps><ColorMap title=\"x\"></ColorMaps>").is_err());
        assert!(parse_document("<ColorMap title=\"x\">").is_err());
    }

    #[test]
    fn test_reader_errors_carry_position() {
        match parse_document("<ColorMaps><ColorMap title=\"x\"></ColorMaps>") {
            Err(GibsError::Xml { message }) => assert!(message.starts_with("at byte "), "{}", message),
            other => panic!("expected an XML error, got {:?}", other),
        }
    }

    #[test]
    fn test_only_no_data_has_no_primary() {
        let xml = r#"<ColorMaps><ColorMap title="No Data"><Legend type="continuous"/></ColorMap></ColorMaps>"#;
        let doc = parse_document(xml).unwrap();
        assert!(doc.primary_scheme().is_none());
    }
}
