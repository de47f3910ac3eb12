//! Zip code to coordinates.
//!
//! Lookups are served from the US zip code table bundled with the `zipcodes`
//! crate, so resolving a location never touches the network.

use std::fmt::Debug;

use crate::model::{GeoLocation, ZipCode};

pub trait ZipGeocoder: Send + Sync + Debug {
    /// Resolve a zip code, or `None` if it is not a known zip code.
    fn lookup(&self, zip: &ZipCode) -> Option<GeoLocation>;
}

/// Geocoder backed by the bundled US zip code table.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZipTable;

impl ZipGeocoder for ZipTable {
    fn lookup(&self, zip: &ZipCode) -> Option<GeoLocation> {
        let code = zip.as_str();
        let matches_code = |z: &zipcodes::Zipcode| z.zip_code == code;
        let results = match zipcodes::filter_by(vec![matches_code], None) {
            Ok(results) => results,
            Err(e) => {
                tracing::warn!("Zip code table lookup for {code} failed: {e:?}");
                return None;
            }
        };
        let info = results.first()?;

        let (Some(latitude), Some(longitude)) = (coordinate(&info.lat), coordinate(&info.long))
        else {
            tracing::warn!("Zip code {code} has no usable coordinates");
            return None;
        };

        tracing::debug!("Resolved {code} to {}, {}", info.city, info.state);

        Some(GeoLocation {
            city: info.city.clone(),
            region: info.state.clone(),
            latitude,
            longitude,
        })
    }
}

/// The table stores coordinates as text; anything unparseable counts as missing.
fn coordinate(raw: &impl ToString) -> Option<f64> {
    raw.to_string().trim().parse::<f64>().ok().filter(|v| v.is_finite())
}
