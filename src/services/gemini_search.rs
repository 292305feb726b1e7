use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::Config;
use crate::error::DiscoveryError;
use crate::models::restaurant::Location;
use crate::services::response_parser::{parse_search_response, SearchOutcome};

/// One search request as issued by the orchestrator.
#[derive(Clone, Debug)]
pub struct SearchQuery {
    pub address: String,
    pub radius_km: f64,
    /// Precise device coordinates, when geolocation resolved them.
    pub location: Option<Location>,
}

/// Capabilities the generative service may be asked to use.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CapabilityTag {
    MapsGrounding,
}

/// Closed request configuration for the generative call. Built explicitly,
/// never assembled field by field from untyped values.
#[derive(Clone, Debug)]
pub struct GenerationOptions {
    pub tools: Vec<CapabilityTag>,
    pub temperature: f64,
    pub precision_hint: Option<Location>,
}

impl GenerationOptions {
    pub fn for_search(query: &SearchQuery) -> Self {
        Self {
            tools: vec![CapabilityTag::MapsGrounding],
            temperature: 0.7,
            precision_hint: query.location,
        }
    }
}

/// Port over the AI/mapping search service.
#[async_trait]
pub trait RestaurantSearchService: Send + Sync {
    async fn search_restaurants(
        &self,
        query: &SearchQuery,
    ) -> Result<SearchOutcome, DiscoveryError>;
}

/// Gemini-backed implementation. The model grounds itself on Google Maps
/// and answers with a JSON block the response parser normalizes.
pub struct GeminiSearchService {
    http: Client,
    config: Config,
}

impl GeminiSearchService {
    pub fn new(config: Config) -> Self {
        Self {
            http: Client::new(),
            config,
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.gemini_api_url.trim_end_matches('/'),
            self.config.gemini_model,
        )
    }
}

#[async_trait]
impl RestaurantSearchService for GeminiSearchService {
    async fn search_restaurants(
        &self,
        query: &SearchQuery,
    ) -> Result<SearchOutcome, DiscoveryError> {
        let options = GenerationOptions::for_search(query);
        let request = GenerateContentRequest::build(build_search_prompt(query), &options);

        let response = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", &self.config.gemini_api_key)
            .json(&request)
            .send()
            .await?
            .error_for_status()?;

        let body: GenerateContentResponse = response.json().await?;
        let text = body.text();
        debug!("Search service answered with {} characters", text.len());

        parse_search_response(&text, query.location)
    }
}

/// French prompt mirroring the product copy: real top-rated restaurants in
/// the zone, strict JSON-only answer, up to 15 reviews per restaurant,
/// rating-descending order requested from upstream (never re-sorted here).
pub fn build_search_prompt(query: &SearchQuery) -> String {
    let location_text = match query.location {
        Some(location) => format!(
            "ma position actuelle (Latitude : {}, Longitude : {})",
            location.lat, location.lng
        ),
        None => format!("l'adresse suivante : \"{}\"", query.address),
    };

    format!(
        r#"Je cherche des restaurants près de {location_text}.
Rayon de recherche : {radius} km.

Utilise l'outil Google Maps pour trouver les vrais restaurants les mieux notés dans cette zone.

IMPORTANT : Ta réponse doit contenir UNIQUEMENT un bloc de code JSON valide.
N'écris pas de texte avant ou après le bloc JSON.

Le JSON doit être une liste d'objets avec la structure suivante :
[
  {{
    "id": "identifiant_unique",
    "name": "Nom du restaurant",
    "rating": 4.5,
    "reviewCount": 120,
    "cuisine": "Type de cuisine (ex: Italien, Japonais, Burger, Français...)",
    "priceLevel": "€€ ou €€€",
    "address": "Adresse complète",
    "description": "Une courte description attrayante du menu et de l'ambiance (max 20 mots).",
    "lat": 48.8566,
    "lng": 2.3522,
    "reviews": [
      {{ "author": "Prénom", "rating": 5, "text": "Le texte de l'avis..." }}
    ]
  }}
]

"lat" et "lng" sont des nombres. Si tu ne trouves pas de coordonnées exactes, estime-les à partir de l'adresse.
Inclus jusqu'à 15 avis pertinents et détaillés par restaurant dans le tableau "reviews".
Trie les résultats par note (rating) décroissante."#,
        radius = query.radius_km,
    )
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    tools: Vec<Tool>,
    generation_config: WireGenerationConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_config: Option<ToolConfig>,
}

impl GenerateContentRequest {
    fn build(prompt: String, options: &GenerationOptions) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
            tools: options
                .tools
                .iter()
                .map(|tag| match tag {
                    CapabilityTag::MapsGrounding => Tool {
                        google_maps: EmptyObject {},
                    },
                })
                .collect(),
            generation_config: WireGenerationConfig {
                temperature: options.temperature,
            },
            tool_config: options.precision_hint.map(|location| ToolConfig {
                retrieval_config: RetrievalConfig {
                    lat_lng: LatLng {
                        latitude: location.lat,
                        longitude: location.lng,
                    },
                },
            }),
        }
    }
}

#[derive(Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Tool {
    google_maps: EmptyObject,
}

#[derive(Serialize)]
struct EmptyObject {}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WireGenerationConfig {
    temperature: f64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ToolConfig {
    retrieval_config: RetrievalConfig,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RetrievalConfig {
    lat_lng: LatLng,
}

#[derive(Serialize)]
struct LatLng {
    latitude: f64,
    longitude: f64,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<Content>,
}

impl GenerateContentResponse {
    fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|candidate| candidate.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .map(|part| part.text.as_str())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }
}
