//! KML track document generation.

use crate::gps::GpsPoint;

/// Renders an ordered point sequence as a KML document with a
/// single `LineString` placemark. Coordinates are lon,lat,ele.
pub fn generate_kml(points: &[GpsPoint], name: &str) -> String {
    let mut doc = String::new();
    doc.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    doc.push_str("<kml xmlns=\"http://www.opengis.net/kml/2.2\">\n");
    doc.push_str("  <Document>\n");
    doc.push_str(&format!("    <name>{name}</name>\n"));
    doc.push_str("    <Placemark>\n");
    doc.push_str(&format!("      <name>{name}</name>\n"));
    doc.push_str("      <LineString>\n");
    doc.push_str("        <tessellate>1</tessellate>\n");
    doc.push_str("        <altitudeMode>absolute</altitudeMode>\n");
    doc.push_str("        <coordinates>\n");

    for point in points {
        doc.push_str(&format!(
            "          {},{},{}\n",
            point.longitude, point.latitude, point.elevation
        ));
    }

    doc.push_str("        </coordinates>\n");
    doc.push_str("      </LineString>\n");
    doc.push_str("    </Placemark>\n");
    doc.push_str("  </Document>\n");
    doc.push_str("</kml>\n");

    doc
}
