use regex::Regex;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::DiscoveryError;
use crate::models::restaurant::{Location, Restaurant};
use crate::models::search::DEFAULT_CENTER;

/// A normalized result set plus the map center resolved for it.
#[derive(Clone, Debug)]
pub struct SearchOutcome {
    pub restaurants: Vec<Restaurant>,
    pub center: Location,
}

/// Turns the raw text answer of the search service into typed restaurants.
///
/// The JSON payload may sit inside a fenced code block (with or without a
/// language tag) or be the whole text. Candidates missing a name or valid
/// coordinates are dropped one by one; only an unparseable payload fails
/// the attempt as a whole. Upstream ordering is preserved.
///
/// Center resolution: an explicitly requested location always wins, then
/// the first valid restaurant, then the Paris default.
pub fn parse_search_response(
    raw: &str,
    requested: Option<Location>,
) -> Result<SearchOutcome, DiscoveryError> {
    let payload = extract_json_block(raw);

    let parsed: Value = match serde_json::from_str(payload) {
        Ok(parsed) => parsed,
        Err(e) => {
            warn!("Failed to parse search response as JSON due to: {}, raw text: {}", e, raw);
            return Err(DiscoveryError::MalformedResponse);
        }
    };
    let Some(candidates) = parsed.as_array() else {
        warn!("Search response JSON is not an array, raw text: {}", raw);
        return Err(DiscoveryError::MalformedResponse);
    };

    let mut restaurants = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        match normalize_candidate(candidate) {
            Some(restaurant) => restaurants.push(restaurant),
            None => debug!("Dropping invalid restaurant candidate: {}", candidate),
        }
    }

    let center = requested
        .or_else(|| restaurants.first().map(Restaurant::location))
        .unwrap_or(DEFAULT_CENTER);

    Ok(SearchOutcome {
        restaurants,
        center,
    })
}

/// Fenced-with-tag match wins, then fenced-without-tag, then the whole
/// trimmed text as a last resort.
fn extract_json_block(raw: &str) -> &str {
    let tagged = Regex::new(r"(?s)```json\n(.*?)\n```").expect("valid tagged fence regex");
    if let Some(block) = tagged.captures(raw).and_then(|captures| captures.get(1)) {
        return block.as_str();
    }

    let untagged = Regex::new(r"(?s)```\n(.*?)\n```").expect("valid untagged fence regex");
    if let Some(block) = untagged.captures(raw).and_then(|captures| captures.get(1)) {
        return block.as_str();
    }

    raw.trim()
}

fn normalize_candidate(candidate: &Value) -> Option<Restaurant> {
    let lat = coerce_coordinate(candidate.get("lat"))?;
    let lng = coerce_coordinate(candidate.get("lng"))?;

    let name = candidate.get("name")?.as_str()?;
    if name.trim().is_empty() {
        return None;
    }

    let mut patched = candidate.clone();
    let fields = patched.as_object_mut()?;
    fields.insert("lat".to_string(), Value::from(lat));
    fields.insert("lng".to_string(), Value::from(lng));

    // Upstream sometimes numbers the ids despite being asked for strings.
    if let Some(id) = fields.get("id").filter(|id| id.is_number()) {
        let id = id.to_string();
        fields.insert("id".to_string(), Value::String(id));
    }

    serde_json::from_value(patched).ok()
}

/// Numbers pass through, numeric strings are coerced, anything else
/// (including NaN and infinities) disqualifies the candidate.
fn coerce_coordinate(value: Option<&Value>) -> Option<f64> {
    let coordinate = match value? {
        Value::Number(number) => number.as_f64()?,
        Value::String(text) => text.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    coordinate.is_finite().then_some(coordinate)
}
