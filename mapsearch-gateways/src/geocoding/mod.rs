mod forward;

pub use self::forward::*;
pub use ::geocoding::{Opencage, Openstreetmap};

/// Public Nominatim instance used when no endpoint is configured.
pub const DEFAULT_NOMINATIM_ENDPOINT: &str = "https://nominatim.openstreetmap.org/";

pub fn nominatim(endpoint: Option<&str>) -> ForwardGeocoder<Openstreetmap> {
    let endpoint = endpoint.unwrap_or(DEFAULT_NOMINATIM_ENDPOINT);
    ForwardGeocoder::new(
        "Nominatim",
        Openstreetmap::new_with_endpoint(endpoint.to_string()),
    )
}

pub fn opencage(api_key: String) -> ForwardGeocoder<Opencage<'static>> {
    ForwardGeocoder::new("OpenCage", Opencage::new(api_key))
}
