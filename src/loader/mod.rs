// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

//! Reading [Locations](crate::Location) from XML files.
//!
//! The expected document looks like this (the root element name is not checked):
//!
//! ```xml
//! <locations>
//!   <location name="NIPA" lat="24.92081" lon="67.09913" traffic="0.0"/>
//! </locations>
//! ```
//!
//! `traffic` defaults to zero. Locations without a name, without a finite position
//! or with traffic outside of `[0, 1]` are skipped with a warning.

use std::fs::File;
use std::io::{self, BufRead};
use std::path::Path;

use crate::Registry;

mod xml;

/// Format of the input locations file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    /// Unknown format - guess the format based on the content
    Unknown,

    /// Force uncompressed XML
    Xml,

    /// Force XML with [gzip](https://en.wikipedia.org/wiki/Gzip) compression
    XmlGz,

    /// Force XML with [bzip2](https://en.wikipedia.org/wiki/Bzip2) compression
    XmlBz2,
}

/// Error conditions which may occur when loading locations.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("io: {0}")]
    Io(#[from] io::Error),

    #[error("xml: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("unrecognized file format")]
    UnknownFormat,
}

/// Guesses the [FileFormat] based on the first bytes of a file.
pub fn detect_format(head: &[u8]) -> Option<FileFormat> {
    const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

    if head.starts_with(b"\x1F\x8B") {
        Some(FileFormat::XmlGz)
    } else if head.starts_with(b"BZh") {
        Some(FileFormat::XmlBz2)
    } else if head
        .strip_prefix(UTF8_BOM)
        .unwrap_or(head)
        .trim_ascii_start()
        .starts_with(b"<")
    {
        Some(FileFormat::Xml)
    } else {
        None
    }
}

/// Parse locations from a reader into a [Registry].
/// Locations with names already present in the registry replace the old entries.
/// On error, the registry is left unchanged.
///
/// The provided stream will be automatically wrapped in a buffered reader when needed.
/// Returns the number of parsed locations.
pub fn add_locations_from_io<R: io::Read>(
    registry: &mut Registry,
    format: FileFormat,
    reader: R,
) -> Result<usize, LoadError> {
    let mut b = io::BufReader::new(reader);
    let format = match format {
        FileFormat::Unknown => detect_format(b.fill_buf()?).ok_or(LoadError::UnknownFormat)?,
        known => known,
    };
    log::debug!("reading locations as {:?}", format);

    match format {
        FileFormat::Unknown => Err(LoadError::UnknownFormat),

        FileFormat::Xml => add_locations(registry, xml::Reader::from_io(b)),

        FileFormat::XmlGz => {
            let d = flate2::read::MultiGzDecoder::new(b);
            add_locations(registry, xml::Reader::from_io(io::BufReader::new(d)))
        }

        FileFormat::XmlBz2 => {
            let d = bzip2::read::MultiBzDecoder::new(b);
            add_locations(registry, xml::Reader::from_io(io::BufReader::new(d)))
        }
    }
}

/// Parse locations from a file at the provided path into a [Registry].
pub fn add_locations_from_file<P: AsRef<Path>>(
    registry: &mut Registry,
    format: FileFormat,
    path: P,
) -> Result<usize, LoadError> {
    let f = File::open(path)?;
    add_locations_from_io(registry, format, f)
}

/// Parse locations from a static buffer into a [Registry].
pub fn add_locations_from_buffer(
    registry: &mut Registry,
    format: FileFormat,
    data: &[u8],
) -> Result<usize, LoadError> {
    let format = match format {
        FileFormat::Unknown => detect_format(data).ok_or(LoadError::UnknownFormat)?,
        known => known,
    };

    if format == FileFormat::Xml {
        // Fast path is available for in-memory XML data
        add_locations(registry, xml::Reader::from_buffer(data))
    } else {
        add_locations_from_io(registry, format, io::Cursor::new(data))
    }
}

fn add_locations<I>(registry: &mut Registry, locations: I) -> Result<usize, LoadError>
where
    I: Iterator<Item = Result<crate::Location, quick_xml::Error>>,
{
    // The registry is only touched once the whole document was parsed
    let locations = locations.collect::<Result<Vec<_>, _>>()?;
    let count = locations.len();
    for loc in locations {
        if let Some(old) = registry.insert(loc) {
            log::warn!("location {:?} defined more than once, using the last definition", old.name);
        }
    }
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{find_route, Options};

    const KARACHI_XML: &[u8] = include_bytes!("test_fixtures/karachi.xml");
    const KARACHI_XML_GZ: &[u8] = include_bytes!("test_fixtures/karachi.xml.gz");
    const KARACHI_XML_BZ2: &[u8] = include_bytes!("test_fixtures/karachi.xml.bz2");

    fn check_karachi(r: &Registry) {
        assert_eq!(r.len(), 13);
        assert_eq!(r.get("Johar").unwrap().lat, 24.90566);

        let route = find_route(r, "Safora", "Kalaboard & Co", &Options::default()).unwrap();
        assert_eq!(
            route.to_string(),
            "Safora -> NED University -> Millennium Mall -> Drig Road -> Kalaboard & Co"
        );
    }

    #[test]
    fn load_xml() {
        let mut r = Registry::new();
        let count = add_locations_from_buffer(&mut r, FileFormat::Xml, KARACHI_XML).unwrap();
        assert_eq!(count, 13);
        check_karachi(&r);
    }

    #[test]
    fn load_xml_io() {
        let mut r = Registry::new();
        add_locations_from_io(&mut r, FileFormat::Xml, KARACHI_XML).unwrap();
        check_karachi(&r);
    }

    #[test]
    fn load_gz() {
        let mut r = Registry::new();
        add_locations_from_buffer(&mut r, FileFormat::XmlGz, KARACHI_XML_GZ).unwrap();
        check_karachi(&r);
    }

    #[test]
    fn load_bz2() {
        let mut r = Registry::new();
        add_locations_from_buffer(&mut r, FileFormat::XmlBz2, KARACHI_XML_BZ2).unwrap();
        check_karachi(&r);
    }

    #[test]
    fn load_detected() {
        for data in [KARACHI_XML, KARACHI_XML_GZ, KARACHI_XML_BZ2] {
            let mut r = Registry::new();
            add_locations_from_buffer(&mut r, FileFormat::Unknown, data).unwrap();
            check_karachi(&r);

            let mut r = Registry::new();
            add_locations_from_io(&mut r, FileFormat::Unknown, data).unwrap();
            check_karachi(&r);
        }
    }

    #[test]
    fn detect() {
        assert_eq!(detect_format(b"  \n<locations/>"), Some(FileFormat::Xml));
        assert_eq!(detect_format(b"\xEF\xBB\xBF<?xml?>"), Some(FileFormat::Xml));
        assert_eq!(detect_format(KARACHI_XML_GZ), Some(FileFormat::XmlGz));
        assert_eq!(detect_format(KARACHI_XML_BZ2), Some(FileFormat::XmlBz2));
        assert_eq!(detect_format(b"name,lat,lon"), None);
    }

    #[test]
    fn unknown_format() {
        let mut r = Registry::new();
        assert!(matches!(
            add_locations_from_buffer(&mut r, FileFormat::Unknown, b"name,lat,lon"),
            Err(LoadError::UnknownFormat)
        ));
        assert!(r.is_empty());
    }

    #[test]
    fn malformed_document_leaves_registry_unchanged() {
        const DATA: &[u8] =
            b"<locations><location name=\"A\" lat=\"1\" lon=\"1\"/></oops></locations>";

        let mut r = Registry::new();
        r.insert(crate::Location::new("B", 2.0, 2.0, 0.0));
        let before = r.clone();

        for format in [FileFormat::Xml, FileFormat::Unknown] {
            assert!(matches!(
                add_locations_from_buffer(&mut r, format, DATA),
                Err(LoadError::Xml(_))
            ));
            assert!(matches!(
                add_locations_from_io(&mut r, format, DATA),
                Err(LoadError::Xml(_))
            ));
        }
        assert_eq!(r, before);
    }

    #[test]
    fn missing_file() {
        let mut r = Registry::new();
        assert!(matches!(
            add_locations_from_file(&mut r, FileFormat::Xml, "does/not/exist.xml"),
            Err(LoadError::Io(_))
        ));
    }
}
