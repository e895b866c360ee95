use anyhow::{Result, anyhow, bail};
use exif::{Exif, In, Tag, Value};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::models::GpsCoordinates;
use crate::utils::gps::{Dms, Hemisphere};

/// Result of looking for GPS coordinates in an image's EXIF block.
#[derive(Debug, Clone, PartialEq)]
pub enum GpsExtraction {
    Found(GpsCoordinates),
    /// No EXIF block, or EXIF without latitude/longitude tags.
    NoGpsData,
    /// GPS tags exist but could not be turned into coordinates.
    ParseFailure(String),
}

pub struct MetadataService;

impl MetadataService {
    pub fn extract_gps(path: &Path) -> GpsExtraction {
        let file = match File::open(path) {
            Ok(file) => file,
            Err(e) => {
                return GpsExtraction::ParseFailure(format!(
                    "unable to open {}: {}",
                    path.display(),
                    e
                ));
            }
        };

        let exif_reader = exif::Reader::new();
        match exif_reader.read_from_container(&mut BufReader::new(file)) {
            Ok(exif) => Self::gps_from_exif(&exif),
            Err(exif::Error::NotFound(_)) => GpsExtraction::NoGpsData,
            Err(e) => GpsExtraction::ParseFailure(e.to_string()),
        }
    }

    pub fn gps_from_exif(exif: &Exif) -> GpsExtraction {
        let has_lat = exif.get_field(Tag::GPSLatitude, In::PRIMARY).is_some();
        let has_lon = exif.get_field(Tag::GPSLongitude, In::PRIMARY).is_some();
        if !has_lat && !has_lon {
            return GpsExtraction::NoGpsData;
        }

        match Self::coordinates(exif) {
            Ok(coordinates) => GpsExtraction::Found(coordinates),
            Err(e) => GpsExtraction::ParseFailure(format!("{:#}", e)),
        }
    }

    fn coordinates(exif: &Exif) -> Result<GpsCoordinates> {
        let lat = Self::coordinate(exif, Tag::GPSLatitudeRef, Tag::GPSLatitude, true)?;
        let lon = Self::coordinate(exif, Tag::GPSLongitudeRef, Tag::GPSLongitude, false)?;
        Ok(GpsCoordinates { lat, lon })
    }

    fn coordinate(exif: &Exif, ref_tag: Tag, value_tag: Tag, latitude: bool) -> Result<f64> {
        let reference = exif
            .get_field(ref_tag, In::PRIMARY)
            .ok_or_else(|| anyhow!("missing {}", ref_tag))?;
        let hemisphere: Hemisphere = match &reference.value {
            Value::Ascii(parts) => parts
                .first()
                .map(|p| String::from_utf8_lossy(p).into_owned())
                .unwrap_or_default()
                .parse()?,
            other => bail!("{} has unexpected value {:?}", ref_tag, other),
        };
        if hemisphere.is_latitude() != latitude {
            bail!("{} reference {} is on the wrong axis", ref_tag, hemisphere);
        }

        let field = exif
            .get_field(value_tag, In::PRIMARY)
            .ok_or_else(|| anyhow!("missing {}", value_tag))?;
        let dms = match &field.value {
            Value::Rational(parts) => {
                let parts: Vec<(u32, u32)> = parts.iter().map(|r| (r.num, r.denom)).collect();
                Dms::from_rationals(&parts)?
            }
            // Some writers store the DMS triplet as text
            Value::Ascii(parts) => parts
                .first()
                .map(|p| String::from_utf8_lossy(p).into_owned())
                .unwrap_or_default()
                .parse()?,
            other => bail!("{} has unexpected value {:?}", value_tag, other),
        };

        dms.to_decimal(hemisphere)
    }
}
