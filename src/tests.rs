#[cfg(test)]
mod tests {
    use crate::errors::GpmfError;
    use crate::ffmpeg::{gpmd_stream, parse_time_range};
    use crate::gpmf::{Content, FourCC, Gpmf, Values};
    use crate::gps::{Diagnostics, GpsFix, GpsPoint, RunStats, Track, TrackBuilder};
    use crate::stitch::Stitcher;
    use crate::support::parse_gpsu;
    use crate::{gpx, kml};

    use time::macros::datetime;
    use time::{Duration, OffsetDateTime};

    /// Diagnostics sink that captures everything for assertions.
    #[derive(Debug, Default)]
    struct TestSink {
        transitions: Vec<(GpsFix, GpsFix)>,
        stats: Option<RunStats>,
    }

    impl Diagnostics for TestSink {
        fn record_transition(&mut self, from: GpsFix, to: GpsFix) {
            self.transitions.push((from, to));
        }

        fn record_stats(&mut self, stats: &RunStats) {
            self.stats = Some(*stats);
        }
    }

    /// One KLV record: 8-byte header + payload padded to 32 bits.
    fn klv(fourcc: &[u8; 4], type_code: u8, size: u8, repeat: u16, payload: &[u8]) -> Vec<u8> {
        assert_eq!(payload.len(), size as usize * repeat as usize);
        let mut buf = Vec::with_capacity(8 + payload.len());
        buf.extend_from_slice(fourcc);
        buf.push(type_code);
        buf.push(size);
        buf.extend_from_slice(&repeat.to_be_bytes());
        buf.extend_from_slice(payload);
        while buf.len() % 4 != 0 {
            buf.push(0);
        }
        buf
    }

    fn i32s(values: &[i32]) -> Vec<u8> {
        values.iter().flat_map(|v| v.to_be_bytes()).collect()
    }

    fn scal(divisors: &[i32]) -> Vec<u8> {
        klv(b"SCAL", b'l', 4, divisors.len() as u16, &i32s(divisors))
    }

    fn gpsu(raw: &str) -> Vec<u8> {
        klv(b"GPSU", b'U', raw.len() as u8, 1, raw.as_bytes())
    }

    fn gpsf(fix: u32) -> Vec<u8> {
        klv(b"GPSF", b'L', 4, 1, &fix.to_be_bytes())
    }

    fn gps5(samples: &[[i32; 5]]) -> Vec<u8> {
        let flat: Vec<u8> = samples.iter().flat_map(|s| i32s(s)).collect();
        klv(b"GPS5", b'l', 20, samples.len() as u16, &flat)
    }

    fn gpri(samples: &[[i32; 5]]) -> Vec<u8> {
        let flat: Vec<u8> = samples.iter().flat_map(|s| i32s(s)).collect();
        klv(b"GPRI", b'l', 20, samples.len() as u16, &flat)
    }

    fn syst(seconds: u64, milliseconds: u64) -> Vec<u8> {
        let mut payload = seconds.to_be_bytes().to_vec();
        payload.extend_from_slice(&milliseconds.to_be_bytes());
        klv(b"SYST", b'J', 8, 2, &payload)
    }

    fn build(buf: &[u8], skip_bad_fix: bool) -> Result<(Track, TestSink), GpmfError> {
        let gpmf = Gpmf::from_slice(buf)?;
        let mut sink = TestSink::default();
        let track = TrackBuilder::new(skip_bad_fix, &mut sink).build(&gpmf)?;
        Ok((track, sink))
    }

    fn point_at(time: OffsetDateTime) -> GpsPoint {
        GpsPoint {
            latitude: 57.1,
            longitude: 12.3,
            elevation: 42.0,
            time,
            speed: 5.0,
        }
    }

    const T0: OffsetDateTime = datetime!(2020-02-15 10:00:00 UTC);

    #[test]
    fn padding_advances_to_next_record() {
        // 5-byte payload pads to 8, GPSF must be found right after
        let mut buf = klv(b"STNM", b'c', 1, 5, b"GoPro");
        buf.extend(gpsf(3));

        let gpmf = Gpmf::from_slice(&buf).unwrap();
        assert_eq!(gpmf.len(), 2);
        assert_eq!(gpmf.records()[0].text(), Some("GoPro"));
        assert_eq!(gpmf.records()[1].fourcc, FourCC::Gpsf);
    }

    #[test]
    fn scale_divides_fields_in_order() {
        let mut buf = scal(&[2, 4, 5]);
        buf.extend(gpsu("200215160831.000"));
        buf.extend(gpsf(3));
        buf.extend(gps5(&[[10, 20, 15, 0, 0]]));

        let (track, _) = build(&buf, false).unwrap();
        assert_eq!(track.len(), 1);
        let point = &track.points[0];
        assert_eq!(point.latitude, 5.0);
        assert_eq!(point.longitude, 5.0);
        assert_eq!(point.elevation, 3.0);
        assert_eq!(point.time, datetime!(2020-02-15 16:08:31 UTC));
        assert_eq!(track.stats.ok, 1);
    }

    #[test]
    fn bad_fix_point_kept_without_skip() {
        let mut buf = gpsf(0);
        buf.extend(gpsu("200215160831.000"));
        buf.extend(gps5(&[[10, 20, 15, 0, 0]]));

        let (track, _) = build(&buf, false).unwrap();
        assert_eq!(track.len(), 1);
        assert_eq!(track.stats.ok, 1);
        assert_eq!(track.stats.bad_fix, 1);
        assert_eq!(track.stats.bad_fix_skipped, 0);
    }

    #[test]
    fn bad_fix_point_discarded_with_skip() {
        let mut buf = gpsf(0);
        buf.extend(gpsu("200215160831.000"));
        buf.extend(gps5(&[[10, 20, 15, 0, 0]]));

        let (track, _) = build(&buf, true).unwrap();
        assert!(track.is_empty());
        assert_eq!(track.stats.ok, 0);
        assert_eq!(track.stats.bad_fix, 1);
        assert_eq!(track.stats.bad_fix_skipped, 1);
    }

    #[test]
    fn empty_coordinates_always_rejected() {
        let mut buf = gpsf(3);
        buf.extend(gpsu("200215160831.000"));
        buf.extend(gps5(&[[0, 0, 0, 5, 7]]));

        for skip in [false, true] {
            let (track, _) = build(&buf, skip).unwrap();
            assert!(track.is_empty());
            assert_eq!(track.stats.empty, 1);
            assert_eq!(track.stats.ok, 0);
            assert_eq!(track.stats.bad_fix, 0);
        }
    }

    #[test]
    fn unsupported_type_does_not_halt_stream() {
        let mut buf = klv(b"FACE", b'x', 4, 1, &[1, 2, 3, 4]);
        buf.extend(gpsf(3));

        let gpmf = Gpmf::from_slice(&buf).unwrap();
        // offending record dropped, following record intact
        assert_eq!(gpmf.len(), 1);
        assert_eq!(gpmf.records()[0].fourcc, FourCC::Gpsf);
    }

    #[test]
    fn truncated_record_is_fatal() {
        let mut buf = Vec::new();
        buf.extend_from_slice(b"GPS5");
        buf.push(b'l');
        buf.push(20);
        buf.extend_from_slice(&1_u16.to_be_bytes());
        // payload declares 20 bytes, provide 10
        buf.extend_from_slice(&[0_u8; 10]);

        let result = Gpmf::from_slice(&buf);
        assert!(matches!(result, Err(GpmfError::TruncatedRecord{..})));
    }

    #[test]
    fn short_header_is_fatal() {
        let result = Gpmf::from_slice(b"GPS5");
        assert!(matches!(result, Err(GpmfError::TruncatedRecord{..})));
    }

    #[test]
    fn decode_is_idempotent() {
        let mut buf = scal(&[2, 4, 5]);
        buf.extend(gpsu("200215160831.000"));
        buf.extend(gpsf(0));
        buf.extend(gps5(&[[10, 20, 15, 0, 0], [0, 0, 0, 0, 0]]));

        let first = build(&buf, false).unwrap().0;
        let second = build(&buf, false).unwrap().0;
        assert_eq!(first, second);
    }

    #[test]
    fn nested_containers_flatten_in_stream_order() {
        let mut stream = scal(&[1, 1, 1]);
        stream.extend(gpsu("200215160831.000"));
        stream.extend(gpsf(3));
        stream.extend(gps5(&[[10, 20, 15, 0, 0]]));
        let strm = klv(b"STRM", 0, 1, stream.len() as u16, &stream);

        let mut inner = klv(b"DVID", b'L', 4, 1, &1_u32.to_be_bytes());
        inner.extend(strm);
        let devc = klv(b"DEVC", 0, 1, inner.len() as u16, &inner);

        let gpmf = Gpmf::from_slice(&devc).unwrap();
        assert_eq!(gpmf.len(), 1);
        assert!(matches!(gpmf.records()[0].content, Content::Container(_)));

        let order: Vec<&str> = gpmf.iter().map(|r| r.fourcc.to_str()).collect();
        assert_eq!(order, ["DEVC", "DVID", "STRM", "SCAL", "GPSU", "GPSF", "GPS5"]);

        let mut sink = TestSink::default();
        let track = TrackBuilder::new(false, &mut sink).build(&gpmf).unwrap();
        assert_eq!(track.len(), 1);
        assert_eq!(track.points[0].latitude, 10.0);
    }

    #[test]
    fn multi_sample_record_emits_point_per_element() {
        let mut buf = gpsu("200215160831.000");
        buf.extend(gpsf(3));
        buf.extend(gps5(&[[10, 20, 15, 0, 0], [11, 21, 16, 0, 0]]));

        let (track, _) = build(&buf, false).unwrap();
        assert_eq!(track.len(), 2);
        assert_eq!(track.stats.ok, 2);
        assert_eq!(track.points[1].latitude, 11.0);
    }

    #[test]
    fn fix_transitions_reported_once_per_change() {
        let mut buf = gpsf(2);
        buf.extend(gpsf(2));
        buf.extend(gpsf(3));

        let (_, sink) = build(&buf, false).unwrap();
        assert_eq!(
            sink.transitions,
            [(GpsFix::NoLock, GpsFix::Fix2D), (GpsFix::Fix2D, GpsFix::Fix3D)]
        );
    }

    #[test]
    fn stats_reported_to_sink() {
        let mut buf = gpsu("200215160831.000");
        buf.extend(gpsf(3));
        buf.extend(gps5(&[[10, 20, 15, 0, 0], [0, 0, 0, 0, 0]]));

        let (track, sink) = build(&buf, false).unwrap();
        let stats = sink.stats.unwrap();
        assert_eq!(stats, track.stats);
        assert_eq!(stats.ok, 1);
        assert_eq!(stats.empty, 1);
        assert_eq!(stats.total(), 2);
    }

    #[test]
    fn gps5_before_timestamp_fails() {
        let mut buf = gpsf(3);
        buf.extend(gps5(&[[10, 20, 15, 0, 0]]));

        let result = build(&buf, false);
        assert!(matches!(result, Err(GpmfError::MissingTimestamp("GPS5"))));
    }

    #[test]
    fn gpri_before_any_syst_fails() {
        let mut buf = gpsf(3);
        buf.extend(gpri(&[[10, 20, 15, 0, 0]]));

        let result = build(&buf, false);
        assert!(matches!(result, Err(GpmfError::MissingTimestamp("GPRI"))));
    }

    #[test]
    fn gpri_timed_by_system_clock() {
        let epoch = 1_581_782_911_u64;
        let mut buf = gpsf(3);
        // all-zero sentinel must not become the clock
        buf.extend(syst(0, 0));
        buf.extend(gpri(&[[10, 20, 15, 0, 0]]));
        buf.extend(syst(1_000, epoch));
        buf.extend(gpri(&[[11, 21, 16, 0, 0]]));

        let (track, _) = build(&buf, false).unwrap();
        // first sample withheld: only sentinel clocks seen so far
        assert_eq!(track.len(), 1);
        assert_eq!(track.points[0].latitude, 11.0);
        assert_eq!(
            track.points[0].time,
            OffsetDateTime::from_unix_timestamp(epoch as i64).unwrap()
        );
        assert_eq!(track.stats.ok, 1);
    }

    #[test]
    fn empty_stream_yields_empty_track() {
        let (track, sink) = build(&[], false).unwrap();
        assert!(track.is_empty());
        assert_eq!(sink.stats, Some(RunStats::default()));
    }

    #[test]
    fn stitcher_anchors_first_file() {
        let points = vec![point_at(T0), point_at(T0 + Duration::seconds(2))];
        let mut stitcher = Stitcher::new();
        stitcher.append(points.clone(), T0, T0 + Duration::seconds(60));

        assert_eq!(stitcher.points(), points.as_slice());
        assert_eq!(stitcher.total_duration(), Duration::seconds(60));
    }

    #[test]
    fn stitcher_builds_continuous_timeline() {
        let t1 = T0 + Duration::seconds(60); // file 1 end
        let t2 = T0 + Duration::seconds(300); // file 2 start
        let t3 = t2 + Duration::seconds(30); // file 2 end

        let file1 = vec![
            point_at(T0),
            point_at(T0 + Duration::seconds(1)),
            point_at(T0 + Duration::seconds(2)),
        ];
        let file2 = vec![point_at(t2), point_at(t2 + Duration::seconds(1))];

        let mut stitcher = Stitcher::new();
        stitcher.append(file1, T0, t1);
        stitcher.append(file2, t2, t3);

        let points = stitcher.points();
        assert_eq!(points.len(), 5);
        // file 2's first point lands at file 1's end
        assert_eq!(points[3].time, t2 + (t1 - t2));
        assert_eq!(points[3].time, t1);
        assert_eq!(points[4].time, t1 + Duration::seconds(1));
        assert!(points[4].time <= T0 + (t1 - T0) + (t3 - t2));
        assert_eq!(stitcher.total_duration(), Duration::seconds(90));
    }

    #[test]
    fn gpsu_parses_wall_clock() {
        assert_eq!(
            parse_gpsu("200215160831.123").unwrap(),
            datetime!(2020-02-15 16:08:31.123 UTC)
        );
        assert_eq!(
            parse_gpsu("200215160831").unwrap(),
            datetime!(2020-02-15 16:08:31 UTC)
        );
        assert!(matches!(
            parse_gpsu("not a date"),
            Err(GpmfError::TimestampParse(_))
        ));
    }

    #[test]
    fn q_formats_normalised() {
        let q1516 = Values::decode(b'q', &98_304_i32.to_be_bytes()).unwrap();
        assert_eq!(q1516.floats(), Some(vec![1.5]));

        let q3132 = Values::decode(b'Q', &(3_i64 << 31).to_be_bytes()).unwrap();
        assert_eq!(q3132.floats(), Some(vec![1.5]));
    }

    #[test]
    fn character_data_drops_null_padding() {
        let values = Values::decode(b'c', b"GoPro MET\0\0\0").unwrap();
        assert_eq!(values.text(), Some("GoPro MET"));
    }

    #[test]
    fn gpmd_stream_found_in_probe_output() {
        let probe = "\
Input #0, mov,mp4,m4a,3gp,3g2,mj2, from 'GH010039.MP4':
    Stream #0:1(eng): Audio: aac (LC) (mp4a / 0x6134706D), 48000 Hz, stereo, fltp, 189 kb/s (default)
    Stream #0:2(eng): Data: none (tmcd / 0x64636D74), 0 kb/s (default)
    Stream #0:3(eng): Data: none (gpmd / 0x646D7067), 29 kb/s (default)
    Stream #0:4(eng): Data: none (fdsc / 0x63736466), 12 kb/s (default)";

        let (track, line) = gpmd_stream(probe).unwrap();
        assert_eq!(track, 3);
        assert!(line.starts_with("Stream #0:3"));

        assert!(gpmd_stream("Stream #0:1(eng): Audio: aac").is_none());
    }

    #[test]
    fn time_range_from_probe_output() {
        let probe = "\
    creation_time   : 2020-02-15T16:08:31.000000Z
  Duration: 00:01:02.55, start: 0.000000, bitrate: 60131 kb/s";

        let (start, end) = parse_time_range(probe).unwrap();
        assert_eq!(start, datetime!(2020-02-15 16:08:31 UTC));
        let span_ms = (end - start).whole_milliseconds();
        assert!((62_549 ..= 62_551).contains(&span_ms));

        assert!(parse_time_range("Duration: 00:01:02.55").is_none());
    }

    #[test]
    fn gpx_document_lists_points() {
        let mut point = point_at(datetime!(2020-02-15 16:08:31 UTC));
        point.latitude = 5.0;
        point.longitude = 6.0;
        point.elevation = 3.0;

        let doc = gpx::generate_gpx(&[point], "gopro-track-test").unwrap();
        assert!(doc.starts_with("<?xml"));
        assert!(doc.contains("<name>gopro-track-test</name>"));
        assert!(doc.contains("<trkpt lat=\"5\" lon=\"6\">"));
        assert!(doc.contains("<ele>3</ele>"));
        assert!(doc.contains("<time>2020-02-15T16:08:31Z</time>"));
        assert!(doc.ends_with("</gpx>\n"));
    }

    #[test]
    fn kml_document_lists_coordinates() {
        let mut point = point_at(datetime!(2020-02-15 16:08:31 UTC));
        point.latitude = 5.0;
        point.longitude = 6.0;
        point.elevation = 3.0;

        let doc = kml::generate_kml(&[point], "gopro-track-test");
        assert!(doc.contains("<name>gopro-track-test</name>"));
        assert!(doc.contains("6,5,3"));
        assert!(doc.ends_with("</kml>\n"));
    }
}
