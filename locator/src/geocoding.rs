use venuekit_geocode::Address;

/// City label used when an address carries no locality at all.
pub const UNKNOWN_CITY: &str = "Unknown";

/// City and region picked out of a reverse-geocoded address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ResolvedPlace {
    pub(crate) city: String,
    pub(crate) state: Option<String>,
}

impl ResolvedPlace {
    pub(crate) fn from_address(address: &Address) -> Self {
        Self {
            city: resolve_city(address),
            state: address
                .region
                .clone()
                .filter(|region| !region.trim().is_empty()),
        }
    }

    pub(crate) fn is_unknown(&self) -> bool {
        self.city == UNKNOWN_CITY
    }
}

/// Picks the locality to show for an address.
///
/// Fields are tried in order city, district, subregion, place name, postal
/// code; blank values are skipped. Returns [`UNKNOWN_CITY`] when all are empty.
#[must_use]
pub fn resolve_city(address: &Address) -> String {
    [
        &address.city,
        &address.district,
        &address.subregion,
        &address.name,
        &address.postal_code,
    ]
    .into_iter()
    .flatten()
    .find(|value| !value.trim().is_empty())
    .map_or_else(|| UNKNOWN_CITY.to_owned(), String::clone)
}
