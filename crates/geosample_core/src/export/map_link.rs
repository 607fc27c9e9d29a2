//! External map-search links for sample coordinates.
//!
//! # Invariants
//! - Coordinates are passed through verbatim; only emptiness is checked.
//! - Nothing is opened when either coordinate is empty.

use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Base of the map-search URL; coordinates go into the `query` parameter.
pub const MAP_SEARCH_BASE_URL: &str = "https://www.google.com/maps/search/?api=1";

/// Errors from map lookups.
#[derive(Debug)]
pub enum MapLinkError {
    /// Latitude or longitude is empty.
    InvalidCoordinates,
    /// The host failed to open the URL.
    Open(std::io::Error),
}

impl Display for MapLinkError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidCoordinates => write!(f, "latitude and longitude are required"),
            Self::Open(err) => write!(f, "failed to open map url: {err}"),
        }
    }
}

impl Error for MapLinkError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidCoordinates => None,
            Self::Open(err) => Some(err),
        }
    }
}

/// Opens URLs in a new browsing context (tab, system browser, ...).
pub trait UrlOpener {
    fn open_url(&self, url: &str) -> std::io::Result<()>;
}

/// Builds the map-search URL for a coordinate pair.
pub fn map_search_url(latitud: &str, longitud: &str) -> Result<String, MapLinkError> {
    if latitud.is_empty() || longitud.is_empty() {
        return Err(MapLinkError::InvalidCoordinates);
    }
    Ok(format!("{MAP_SEARCH_BASE_URL}&query={latitud},{longitud}"))
}

/// Opens the map-search URL for a coordinate pair.
///
/// Returns the opened URL.
pub fn open_on_map<O: UrlOpener + ?Sized>(
    opener: &O,
    latitud: &str,
    longitud: &str,
) -> Result<String, MapLinkError> {
    let url = match map_search_url(latitud, longitud) {
        Ok(url) => url,
        Err(err) => {
            warn!("event=map_open module=export status=rejected error_code=invalid_coordinates");
            return Err(err);
        }
    };
    opener.open_url(&url).map_err(MapLinkError::Open)?;
    info!("event=map_open module=export status=ok");
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::{map_search_url, open_on_map, MapLinkError, UrlOpener};
    use std::cell::RefCell;

    #[derive(Default)]
    struct RecordingOpener {
        opened: RefCell<Vec<String>>,
    }

    impl UrlOpener for RecordingOpener {
        fn open_url(&self, url: &str) -> std::io::Result<()> {
            self.opened.borrow_mut().push(url.to_string());
            Ok(())
        }
    }

    #[test]
    fn url_templates_query_with_raw_coordinates() {
        assert_eq!(
            map_search_url("10", "20").unwrap(),
            "https://www.google.com/maps/search/?api=1&query=10,20"
        );
        assert_eq!(
            map_search_url("not a number", "x").unwrap(),
            "https://www.google.com/maps/search/?api=1&query=not a number,x"
        );
    }

    #[test]
    fn empty_latitude_opens_nothing() {
        let opener = RecordingOpener::default();
        let err = open_on_map(&opener, "", "20").unwrap_err();

        assert!(matches!(err, MapLinkError::InvalidCoordinates));
        assert!(opener.opened.borrow().is_empty());
    }

    #[test]
    fn valid_coordinates_open_one_url() {
        let opener = RecordingOpener::default();
        let url = open_on_map(&opener, "-33.4", "-70.6").unwrap();

        assert_eq!(opener.opened.borrow().as_slice(), [url]);
    }
}
