use serde::{Deserialize, Serialize};

/// A restaurant as returned by the search service, keyed by its upstream id.
///
/// Field names on the wire are camelCase (`reviewCount`, `priceLevel`);
/// the same shape is used for the persisted favorites blob.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Restaurant {
    pub id: String,
    pub name: String,
    pub rating: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review_count: Option<u32>,
    #[serde(default)]
    pub cuisine: String,
    #[serde(default)]
    pub price_level: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub description: String,
    pub lat: f64,
    pub lng: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reviews: Vec<Review>,
}

impl Restaurant {
    pub fn location(&self) -> Location {
        Location::new(self.lat, self.lng)
    }
}

#[derive(Clone, Serialize, Deserialize, Debug, Default, PartialEq)]
pub struct Review {
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub text: String,
}

impl Review {
    /// Number of filled stars to render, rating rounded to the nearest
    /// integer and clamped to 0..=5.
    pub fn star_count(&self) -> u8 {
        self.rating.round().clamp(0.0, 5.0) as u8
    }
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq)]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
}

impl Location {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn star_count_rounds_to_nearest() {
        let review = Review {
            rating: 3.5,
            ..Review::default()
        };
        assert_eq!(review.star_count(), 4);

        let review = Review {
            rating: 4.4,
            ..Review::default()
        };
        assert_eq!(review.star_count(), 4);
    }

    #[test]
    fn star_count_clamps_out_of_range_ratings() {
        let review = Review {
            rating: 11.0,
            ..Review::default()
        };
        assert_eq!(review.star_count(), 5);

        let review = Review {
            rating: -2.0,
            ..Review::default()
        };
        assert_eq!(review.star_count(), 0);
    }

    #[test]
    fn restaurant_uses_camel_case_wire_names() {
        let parsed: Restaurant = serde_json::from_str(
            r#"{
                "id": "1",
                "name": "Chez Louise",
                "rating": 4.5,
                "reviewCount": 120,
                "cuisine": "Français",
                "priceLevel": "€€",
                "address": "1 Rue X",
                "description": "d",
                "lat": 48.85,
                "lng": 2.35
            }"#,
        )
        .unwrap();
        assert_eq!(parsed.review_count, Some(120));
        assert_eq!(parsed.price_level, "€€");
        assert!(parsed.reviews.is_empty());

        let serialized = serde_json::to_string(&parsed).unwrap();
        assert!(serialized.contains("\"reviewCount\":120"));
        assert!(serialized.contains("\"priceLevel\":\"€€\""));
    }
}
