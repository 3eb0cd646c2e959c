// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::io;
use std::str::from_utf8;

use quick_xml::events::{BytesStart, Event};

use crate::Location;

/// Parser is a trait for objects which can parse XML.
///
/// This trait only exists to fix the mismatch of
/// [quick_xml::Reader::read_event] when working on buffered data
/// and [quick_xml::Reader::read_event_into] when working on IO.
pub(super) trait Parser {
    fn read_event<'a>(&'a mut self) -> quick_xml::Result<Event<'a>>;
}

/// IoParser implements [Parser] over an [std::io::BufRead].
pub(super) struct IoParser<R: io::BufRead>(quick_xml::Reader<R>, Vec<u8>);

impl<R: io::BufRead> IoParser<R> {
    #[inline]
    fn new(reader: R) -> Self {
        Self(quick_xml::Reader::from_reader(reader), Vec::default())
    }
}

impl<R: io::BufRead> Parser for IoParser<R> {
    #[inline]
    fn read_event<'a>(&'a mut self) -> quick_xml::Result<Event<'a>> {
        self.1.clear();
        self.0.read_event_into(&mut self.1)
    }
}

/// BufParser implements [Parser] over a slice of bytes (`&[u8]`).
pub(super) struct BufParser<'a>(quick_xml::Reader<&'a [u8]>);

impl<'a> BufParser<'a> {
    #[inline]
    fn new(data: &'a [u8]) -> Self {
        Self(quick_xml::Reader::from_reader(data))
    }
}

impl<'a> Parser for BufParser<'a> {
    #[inline]
    fn read_event<'b>(&'b mut self) -> quick_xml::Result<Event<'b>> {
        self.0.read_event()
    }
}

/// Reader reads [Locations](Location) from `<location>` elements of an XML document.
///
/// Invalid elements are skipped (with a warning), the structure around
/// `<location>` elements is ignored.
pub(super) struct Reader<P: Parser> {
    parser: P,
    eof: bool,
}

impl<P: Parser> Reader<P> {
    #[inline]
    fn new(parser: P) -> Self {
        Self { parser, eof: false }
    }
}

impl<P: Parser> Iterator for Reader<P> {
    type Item = Result<Location, quick_xml::Error>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.eof {
            let event = match self.parser.read_event() {
                Ok(e) => e,
                Err(e) => return Some(Err(e)),
            };

            match event {
                Event::Empty(start) | Event::Start(start) => {
                    if start.local_name().as_ref() == b"location" {
                        if let Some(loc) = parse_location(&start) {
                            return Some(Ok(loc));
                        }
                    }
                }

                Event::Eof => self.eof = true,

                _ => {}
            }
        }

        None
    }
}

impl<'a> Reader<BufParser<'a>> {
    #[inline]
    pub(super) fn from_buffer(data: &'a [u8]) -> Self {
        Self::new(BufParser::new(data))
    }
}

impl<R: io::BufRead> Reader<IoParser<R>> {
    #[inline]
    pub(super) fn from_io(reader: R) -> Self {
        Self::new(IoParser::new(reader))
    }
}

fn parse_location(start: &BytesStart<'_>) -> Option<Location> {
    let mut name: Option<String> = None;
    let mut lat = f64::NAN;
    let mut lon = f64::NAN;
    let mut traffic = 0.0;

    for attr in start.attributes() {
        let attr = match attr {
            Ok(attr) => attr,
            Err(e) => {
                log::warn!("skipping <location> with malformed attributes: {}", e);
                return None;
            }
        };

        match attr.key.as_ref() {
            b"name" => match attr.unescape_value() {
                Ok(v) => name = Some(v.into_owned()),
                Err(e) => {
                    log::warn!("skipping <location> with malformed name: {}", e);
                    return None;
                }
            },
            b"lat" => lat = parse_number(&attr.value).unwrap_or(f64::NAN),
            b"lon" => lon = parse_number(&attr.value).unwrap_or(f64::NAN),
            b"traffic" => traffic = parse_number(&attr.value).unwrap_or(f64::NAN),
            _ => {}
        }
    }

    let Some(name) = name.filter(|n| !n.is_empty()) else {
        log::warn!("skipping <location> without a name");
        return None;
    };

    if !lat.is_finite() || !lon.is_finite() {
        log::warn!("skipping location {:?}: invalid position", name);
        return None;
    }

    if !(0.0..=1.0).contains(&traffic) {
        log::warn!("skipping location {:?}: traffic outside of [0, 1]", name);
        return None;
    }

    Some(Location::new(name, lat, lon, traffic))
}

fn parse_number(value: &[u8]) -> Option<f64> {
    from_utf8(value).ok()?.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const KARACHI_XML: &[u8] = include_bytes!("test_fixtures/karachi.xml");

    fn collect_all<I: Iterator<Item = Result<Location, quick_xml::Error>>>(
        locations: I,
    ) -> Result<Vec<Location>, quick_xml::Error> {
        locations.collect()
    }

    fn check_against_expected(locations: Vec<Location>) {
        assert_eq!(locations.len(), 13);
        assert_eq!(
            locations[0],
            Location::new("Nagan Chowrangi", 24.96504, 67.06686, 0.0)
        );
        assert_eq!(
            locations[6],
            Location::new("Maskan Chowrangi", 24.9340, 67.1053, 0.5)
        );
        assert_eq!(locations[12].name, "Kalaboard & Co");
    }

    #[test]
    fn parse_from_buf() -> Result<(), quick_xml::Error> {
        check_against_expected(collect_all(Reader::from_buffer(KARACHI_XML))?);
        Ok(())
    }

    #[test]
    fn parse_from_io() -> Result<(), quick_xml::Error> {
        check_against_expected(collect_all(Reader::from_io(io::Cursor::new(KARACHI_XML)))?);
        Ok(())
    }

    #[test]
    fn skips_invalid_locations() -> Result<(), quick_xml::Error> {
        const DATA: &[u8] = br#"<locations>
            <location lat="1" lon="1"/>
            <location name="" lat="1" lon="1"/>
            <location name="NoLat" lon="1"/>
            <location name="BadLon" lat="1" lon="east"/>
            <location name="Jammed" lat="1" lon="1" traffic="1.5"/>
            <location name="Fine" lat="1" lon="2"></location>
        </locations>"#;

        let locations = collect_all(Reader::from_buffer(DATA))?;
        assert_eq!(locations, [Location::new("Fine", 1.0, 2.0, 0.0)]);
        Ok(())
    }

    #[test]
    fn malformed_document() {
        const DATA: &[u8] = b"<locations><location name=\"A\" lat=\"1\" lon=\"1\"></oops>";
        assert!(collect_all(Reader::from_buffer(DATA)).is_err());
    }
}
