//! Nominatim / OpenStreetMap reverse geocoder client.
//!
//! Converts a coordinate pair into best-effort address parts. Nominatim has
//! strict rate limits: **1 request per second** maximum for the public
//! instance (see `rate_limit_ms` in the service TOML configuration).
//!
//! See <https://nominatim.org/release-docs/develop/api/Reverse/>

use samadhan_report_models::Coordinates;

use crate::{GeoError, ResolvedAddress};

/// Reverse geocodes a coordinate pair using the Nominatim reverse endpoint.
///
/// The caller is responsible for rate limiting between calls (the
/// [`crate::session::LocationSession`] handles this, along with caching of
/// repeated coordinates).
///
/// # Errors
///
/// Returns [`GeoError`] if the HTTP request or response parsing fails.
pub async fn reverse_geocode(
    client: &reqwest::Client,
    base_url: &str,
    coords: Coordinates,
) -> Result<ResolvedAddress, GeoError> {
    let resp = client
        .get(base_url)
        .query(&[
            ("lat", coords.lat.to_string().as_str()),
            ("lon", coords.lng.to_string().as_str()),
            ("format", "json"),
        ])
        .send()
        .await?;

    if resp.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
        return Err(GeoError::RateLimited);
    }

    let body: serde_json::Value = resp.json().await?;
    Ok(parse_response(&body))
}

/// Parses a Nominatim reverse response into address parts.
///
/// Every field is best-effort: a missing or malformed component yields an
/// empty string, and a completely unusable body yields empty parts. City
/// falls back through town and village, district through county and
/// state district, mirroring what the portal displayed.
fn parse_response(body: &serde_json::Value) -> ResolvedAddress {
    let address = &body["address"];

    let city = first_string(address, &["city", "town", "village"]);
    let district = first_string(address, &["county", "state_district"]);
    let state = first_string(address, &["state"]);
    let display_address = body["display_name"].as_str().unwrap_or_default().to_string();

    ResolvedAddress {
        city,
        district,
        state,
        display_address,
    }
}

/// Returns the first present string among `keys`, or an empty string.
fn first_string(value: &serde_json::Value, keys: &[&str]) -> String {
    keys.iter()
        .find_map(|k| value[*k].as_str())
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_response() {
        let body = serde_json::json!({
            "display_name": "MG Road, Bengaluru, Bengaluru Urban, Karnataka, India",
            "address": {
                "city": "Bengaluru",
                "county": "Bengaluru Urban",
                "state": "Karnataka"
            }
        });
        let addr = parse_response(&body);
        assert_eq!(addr.city, "Bengaluru");
        assert_eq!(addr.district, "Bengaluru Urban");
        assert_eq!(addr.state, "Karnataka");
        assert!(addr.display_address.starts_with("MG Road"));
    }

    #[test]
    fn falls_back_through_town_and_village() {
        let body = serde_json::json!({
            "display_name": "Somewhere",
            "address": { "village": "Khandala", "state_district": "Pune" }
        });
        let addr = parse_response(&body);
        assert_eq!(addr.city, "Khandala");
        assert_eq!(addr.district, "Pune");
        assert_eq!(addr.state, "");
    }

    #[test]
    fn malformed_body_yields_empty_fields() {
        for body in [
            serde_json::json!({}),
            serde_json::json!({ "error": "Unable to geocode" }),
            serde_json::json!([1, 2, 3]),
            serde_json::json!("not an object"),
        ] {
            let addr = parse_response(&body);
            assert_eq!(addr.city, "");
            assert_eq!(addr.district, "");
            assert_eq!(addr.state, "");
            assert_eq!(addr.display_address, "");
        }
    }
}
