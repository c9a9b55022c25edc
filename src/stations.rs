/// Station registry for the coastal monitoring dashboard.
///
/// Defines the canonical list of marine stations whose readings feed the
/// engine, along with their location and provider. This is the single
/// source of truth for station ids; other modules should look stations up
/// here rather than hardcoding them.
///
/// NDBC buoys double as weather stations, so an id may appear once per
/// station type.

pub use crate::model::{DataSource, ParameterKind, StationType};

// ---------------------------------------------------------------------------
// Station metadata
// ---------------------------------------------------------------------------

/// Metadata for a single marine station.
pub struct Station {
    /// Provider station id (NOAA 7-digit, NDBC 5-digit, USGS 8-digit).
    pub id: &'static str,
    pub name: &'static str,
    pub region: &'static str,
    pub country: &'static str,
    /// WGS84 latitude.
    pub latitude: f64,
    /// WGS84 longitude.
    pub longitude: f64,
    pub station_type: StationType,
    pub source: DataSource,
    /// Disabled stations stay in the registry but are skipped by lookups
    /// that serve the dashboard.
    pub enabled: bool,
}

impl Station {
    /// Parameter this station's readings are classified under by default.
    pub fn parameter(&self) -> ParameterKind {
        self.station_type.default_parameter()
    }
}

/// All monitored stations, grouped by provider and type.
pub static STATION_REGISTRY: &[Station] = &[
    // NOAA tide gauges
    Station {
        id: "9447130",
        name: "Seattle, WA",
        region: "Pacific Northwest",
        country: "USA",
        latitude: 47.6026,
        longitude: -122.3393,
        station_type: StationType::TideGauge,
        source: DataSource::Noaa,
        enabled: true,
    },
    Station {
        id: "8727520",
        name: "Miami, FL",
        region: "Southeast",
        country: "USA",
        latitude: 25.7617,
        longitude: -80.1918,
        station_type: StationType::TideGauge,
        source: DataSource::Noaa,
        enabled: true,
    },
    Station {
        id: "9410230",
        name: "San Diego, CA",
        region: "Southwest",
        country: "USA",
        latitude: 32.7157,
        longitude: -117.1611,
        station_type: StationType::TideGauge,
        source: DataSource::Noaa,
        enabled: true,
    },
    Station {
        id: "9443090",
        name: "Neah Bay, WA",
        region: "Pacific Northwest",
        country: "USA",
        latitude: 48.3708,
        longitude: -124.6241,
        station_type: StationType::TideGauge,
        source: DataSource::Noaa,
        enabled: true,
    },
    // NDBC wave buoys
    Station {
        id: "46088",
        name: "Kerala Coast",
        region: "West Coast",
        country: "India",
        latitude: 9.9312,
        longitude: 76.2673,
        station_type: StationType::WaveBuoy,
        source: DataSource::Ndbc,
        enabled: true,
    },
    Station {
        id: "41012",
        name: "Goa Offshore",
        region: "West Coast",
        country: "India",
        latitude: 15.2993,
        longitude: 73.9872,
        station_type: StationType::WaveBuoy,
        source: DataSource::Ndbc,
        enabled: true,
    },
    Station {
        id: "46042",
        name: "Mumbai Offshore",
        region: "West Coast",
        country: "India",
        latitude: 18.9217,
        longitude: 72.8347,
        station_type: StationType::WaveBuoy,
        source: DataSource::Ndbc,
        enabled: true,
    },
    Station {
        id: "41008",
        name: "Chennai Offshore",
        region: "East Coast",
        country: "India",
        latitude: 13.0827,
        longitude: 80.2707,
        station_type: StationType::WaveBuoy,
        source: DataSource::Ndbc,
        enabled: true,
    },
    // USGS water quality
    Station {
        id: "12345678",
        name: "Mumbai Harbor Water Quality",
        region: "West Coast",
        country: "India",
        latitude: 18.9217,
        longitude: 72.8347,
        station_type: StationType::WaterQuality,
        source: DataSource::Usgs,
        enabled: true,
    },
    Station {
        id: "8764227",
        name: "Chennai Coast Water Quality",
        region: "East Coast",
        country: "India",
        latitude: 13.0827,
        longitude: 80.2707,
        station_type: StationType::WaterQuality,
        source: DataSource::Usgs,
        enabled: true,
    },
    // NDBC buoys reporting as weather stations
    Station {
        id: "41012",
        name: "Goa Beach Weather Station",
        region: "West Coast",
        country: "India",
        latitude: 15.2993,
        longitude: 73.9872,
        station_type: StationType::WeatherStation,
        source: DataSource::Ndbc,
        enabled: true,
    },
    Station {
        id: "46042",
        name: "Mumbai Harbor Weather Station",
        region: "West Coast",
        country: "India",
        latitude: 18.9217,
        longitude: 72.8347,
        station_type: StationType::WeatherStation,
        source: DataSource::Ndbc,
        enabled: true,
    },
];

/// Returns every enabled station.
pub fn enabled_stations() -> Vec<&'static Station> {
    STATION_REGISTRY.iter().filter(|s| s.enabled).collect()
}

/// Enabled stations of one type.
pub fn stations_by_type(station_type: StationType) -> Vec<&'static Station> {
    STATION_REGISTRY
        .iter()
        .filter(|s| s.enabled && s.station_type == station_type)
        .collect()
}

/// Enabled stations served by one provider.
pub fn stations_by_source(source: DataSource) -> Vec<&'static Station> {
    STATION_REGISTRY
        .iter()
        .filter(|s| s.enabled && s.source == source)
        .collect()
}

/// Enabled stations in a region. Region names match exactly.
pub fn stations_by_region(region: &str) -> Vec<&'static Station> {
    STATION_REGISTRY
        .iter()
        .filter(|s| s.enabled && s.region == region)
        .collect()
}

/// Enabled stations in a country. Country names match exactly.
pub fn stations_by_country(country: &str) -> Vec<&'static Station> {
    STATION_REGISTRY
        .iter()
        .filter(|s| s.enabled && s.country == country)
        .collect()
}

/// Looks up a station by id. Where an id is registered under several
/// types, the first entry wins. Returns `None` if not found.
pub fn find_station(id: &str) -> Option<&'static Station> {
    STATION_REGISTRY.iter().find(|s| s.id == id)
}

/// Looks up the entry for an id under a specific station type.
pub fn find_station_of_type(id: &str, station_type: StationType) -> Option<&'static Station> {
    STATION_REGISTRY
        .iter()
        .find(|s| s.id == id && s.station_type == station_type)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
