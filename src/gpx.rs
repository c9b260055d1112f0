//! GPX 1.1 track document generation.

use time::format_description::well_known::Rfc3339;

use crate::errors::GpmfError;
use crate::gps::GpsPoint;

/// Renders an ordered point sequence as a GPX 1.1 document
/// with a single track segment.
pub fn generate_gpx(points: &[GpsPoint], track_name: &str) -> Result<String, GpmfError> {
    let mut doc = String::new();
    doc.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    doc.push_str(concat!(
        "<gpx version=\"1.1\" creator=\"gopro2gpx\"",
        " xmlns=\"http://www.topografix.com/GPX/1/1\"",
        " xmlns:xsi=\"http://www.w3.org/2001/XMLSchema-instance\"",
        " xsi:schemaLocation=\"http://www.topografix.com/GPX/1/1",
        " http://www.topografix.com/GPX/1/1/gpx.xsd\">\n",
    ));
    doc.push_str("  <trk>\n");
    doc.push_str(&format!("    <name>{track_name}</name>\n"));
    doc.push_str("    <trkseg>\n");

    for point in points {
        let time = point.time.format(&Rfc3339)?;
        doc.push_str(&format!(
            "      <trkpt lat=\"{}\" lon=\"{}\">\n",
            point.latitude, point.longitude
        ));
        doc.push_str(&format!("        <ele>{}</ele>\n", point.elevation));
        doc.push_str(&format!("        <time>{time}</time>\n"));
        doc.push_str("      </trkpt>\n");
    }

    doc.push_str("    </trkseg>\n");
    doc.push_str("  </trk>\n");
    doc.push_str("</gpx>\n");

    Ok(doc)
}
