use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::data::geometry::Placemark;
use crate::errors::Result;

pub const KML_NAMESPACE: &str = "http://www.opengis.net/kml/2.2";

/// Serializes placemarks into a KML document. The same placemarks always give the same bytes.
pub fn render_kml(placemarks: &[Placemark]) -> Result<Vec<u8>> {
    let mut output = Vec::new();
    let mut writer = Writer::new(&mut output);

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    newline(&mut writer)?;
    writer.write_event(Event::Start(
        BytesStart::new("kml").with_attributes([("xmlns", KML_NAMESPACE)]),
    ))?;
    newline(&mut writer)?;
    writer.write_event(Event::Start(BytesStart::new("Document")))?;
    newline(&mut writer)?;

    for placemark in placemarks {
        write_placemark(&mut writer, placemark)?;
    }

    writer.write_event(Event::End(BytesEnd::new("Document")))?;
    newline(&mut writer)?;
    writer.write_event(Event::End(BytesEnd::new("kml")))?;
    newline(&mut writer)?;

    Ok(output)
}

fn write_placemark(writer: &mut Writer<&mut Vec<u8>>, placemark: &Placemark) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new("Placemark")))?;

    writer.write_event(Event::Start(BytesStart::new("name")))?;
    writer.write_event(Event::Text(BytesText::new(&placemark.label)))?;
    writer.write_event(Event::End(BytesEnd::new("name")))?;

    writer.write_event(Event::Start(BytesStart::new("description")))?;
    for section in cdata_sections(&placemark.description) {
        writer.write_event(Event::CData(BytesCData::new(section)))?;
    }
    writer.write_event(Event::End(BytesEnd::new("description")))?;
    newline(writer)?;

    writer.write_event(Event::Start(BytesStart::new("LineString")))?;
    writer.write_event(Event::Start(BytesStart::new("coordinates")))?;
    writer.write_event(Event::Text(BytesText::new(&placemark.coordinates_text())))?;
    writer.write_event(Event::End(BytesEnd::new("coordinates")))?;
    writer.write_event(Event::End(BytesEnd::new("LineString")))?;
    newline(writer)?;

    writer.write_event(Event::End(BytesEnd::new("Placemark")))?;
    newline(writer)?;
    Ok(())
}

/// Splits `text` so that no section contains `]]>`; each terminator is broken across two
/// consecutive CDATA sections.
fn cdata_sections(text: &str) -> Vec<String> {
    let pieces: Vec<&str> = text.split("]]>").collect();
    let last = pieces.len() - 1;
    pieces
        .iter()
        .enumerate()
        .map(|(i, piece)| {
            let mut section = String::with_capacity(piece.len() + 3);
            if i > 0 {
                section.push('>');
            }
            section.push_str(piece);
            if i < last {
                section.push_str("]]");
            }
            section
        })
        .collect()
}

fn newline(writer: &mut Writer<&mut Vec<u8>>) -> Result<()> {
    writer.write_event(Event::Text(BytesText::new("\n")))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::osm::NodeCoord;
    use pretty_assertions::assert_eq;
    use quick_xml::reader::Reader;

    fn placemark(label: &str, coords: &[(&str, &str)]) -> Placemark {
        Placemark {
            label: label.into(),
            description: format!("<img src=\"tj/{}.png\" /> ", label),
            coordinates: coords
                .iter()
                .map(|(lon, lat)| NodeCoord { lon: lon.to_string(), lat: lat.to_string() })
                .collect(),
        }
    }

    #[test]
    fn renders_placemarks_line_by_line() {
        let kml = render_kml(&[placemark("M1", &[("0", "0"), ("1", "1")])]).unwrap();

        let expected = concat!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n",
            "<kml xmlns=\"http://www.opengis.net/kml/2.2\">\n",
            "<Document>\n",
            "<Placemark><name>M1</name><description><![CDATA[<img src=\"tj/M1.png\" /> ]]></description>\n",
            "<LineString><coordinates>0,0 1,1</coordinates></LineString>\n",
            "</Placemark>\n",
            "</Document>\n",
            "</kml>\n",
        );
        assert_eq!(String::from_utf8(kml).unwrap(), expected);
    }

    #[test]
    fn empty_document_still_has_envelope() {
        let kml = String::from_utf8(render_kml(&[]).unwrap()).unwrap();
        assert!(kml.contains("<Document>\n</Document>\n"));
    }

    #[test]
    fn labels_are_escaped() {
        let kml = String::from_utf8(render_kml(&[placemark("P&Z", &[])]).unwrap()).unwrap();
        assert!(kml.contains("<name>P&amp;Z</name>"));
        assert!(kml.contains("<coordinates></coordinates>"));
    }

    #[test]
    fn cdata_terminator_in_description_stays_well_formed() {
        let kml = render_kml(&[placemark("a]]>b", &[("1", "2")])]).unwrap();

        let mut reader = Reader::from_reader(kml.as_slice());
        let mut buf = Vec::new();
        let mut description = Vec::new();
        let mut names = Vec::new();
        loop {
            match reader.read_event_into(&mut buf).unwrap() {
                Event::CData(e) => description.extend_from_slice(&e.into_inner()),
                Event::Text(e) => {
                    let text = e.unescape().unwrap().into_owned();
                    if !text.trim().is_empty() {
                        names.push(text);
                    }
                }
                Event::Eof => break,
                _ => (),
            }
            buf.clear();
        }

        assert_eq!(
            String::from_utf8(description).unwrap(),
            "<img src=\"tj/a]]>b.png\" /> "
        );
        assert_eq!(names, vec!["a]]>b".to_string(), "1,2".to_string()]);
    }

    #[test]
    fn cdata_sections_split_every_terminator() {
        assert_eq!(cdata_sections("plain"), vec!["plain"]);
        assert_eq!(cdata_sections("a]]>b]]>"), vec!["a]]", ">b]]", ">"]);
    }
}
