// src/integrations/catalog_api/client.rs
//
// Catalog REST API Integration
//
// ARCHITECTURE:
// - Two requests only: paginated list (offset/limit) and detail by id
// - Maps wire payloads -> domain records (NO business logic)
// - Used by the pagination engine and the detail coordinator
//
// CRITICAL RULES:
// - This is INFRASTRUCTURE, not DOMAIN
// - Never retries; callers own the retry policy
// - Returns AppError::Network / UpstreamStatus for every I/O failure

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::{header, Client};
use serde::Deserialize;

use crate::config::ExplorerConfig;
use crate::domain::{parse_item_id, Ability, DomainError, DetailRecord, ItemId, ItemType, ListItem, Stat};
use crate::error::{AppError, AppResult};

/// One page of the upstream listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListPage {
    /// Total number of items upstream, across all pages
    pub count: u32,

    /// Upstream signalled a `next` page
    pub has_next_page: bool,

    pub items: Vec<ListItem>,
}

/// The Remote Data Client seam
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogApi: Send + Sync {
    async fn fetch_page(&self, offset: u32, limit: u32) -> AppResult<ListPage>;

    async fn fetch_detail(&self, id: ItemId) -> AppResult<DetailRecord>;
}

// ============================================================================
// WIRE FORMAT
// ============================================================================

#[derive(Debug, Deserialize)]
struct ListResponse {
    count: u32,
    next: Option<String>,
    #[allow(dead_code)] // Part of the upstream list schema
    previous: Option<String>,
    results: Vec<ListResult>,
}

#[derive(Debug, Deserialize)]
struct ListResult {
    name: String,
    url: String,
}

#[derive(Debug, Deserialize)]
struct DetailData {
    id: ItemId,
    name: String,
    height: u32,
    weight: u32,
    #[serde(default)]
    abilities: Vec<AbilitySlotData>,
    #[serde(default)]
    types: Vec<TypeSlotData>,
    #[serde(default)]
    stats: Vec<StatData>,
    #[serde(default)]
    sprites: Option<SpritesData>,
}

#[derive(Debug, Deserialize)]
struct NamedResource {
    name: String,
}

#[derive(Debug, Deserialize)]
struct AbilitySlotData {
    ability: NamedResource,
    #[serde(default)]
    is_hidden: bool,
}

#[derive(Debug, Deserialize)]
struct TypeSlotData {
    #[serde(rename = "type")]
    kind: NamedResource,
}

#[derive(Debug, Deserialize)]
struct StatData {
    base_stat: u32,
    stat: NamedResource,
}

#[derive(Debug, Deserialize)]
struct SpritesData {
    front_default: Option<String>,
    #[serde(default)]
    other: Option<OtherSpritesData>,
}

#[derive(Debug, Deserialize)]
struct OtherSpritesData {
    #[serde(rename = "official-artwork", default)]
    official_artwork: Option<ArtworkData>,
}

#[derive(Debug, Deserialize)]
struct ArtworkData {
    front_default: Option<String>,
}

// ============================================================================
// HTTP CLIENT
// ============================================================================

/// reqwest-backed catalog client
pub struct HttpCatalogClient {
    base_url: String,
    list_path: String,
    http_client: Client,
}

impl HttpCatalogClient {
    pub fn new(config: &ExplorerConfig) -> AppResult<Self> {
        let http_client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| AppError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            list_path: config.list_path.trim_matches('/').to_string(),
            http_client,
        })
    }

    fn list_url(&self) -> String {
        format!("{}/{}", self.base_url, self.list_path)
    }

    fn detail_url(&self, id: ItemId) -> String {
        format!("{}/{}/{}", self.base_url, self.list_path, id)
    }

    async fn get_json<T>(&self, request: reqwest::RequestBuilder, url: &str) -> AppResult<T>
    where
        T: for<'de> Deserialize<'de>,
    {
        let response = request
            .header(header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| AppError::Network(format!("Catalog request to {} failed: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::UpstreamStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| AppError::Network(format!("Failed to parse catalog response: {}", e)))
    }

    fn map_list_response(response: ListResponse) -> ListPage {
        let items = response
            .results
            .into_iter()
            .filter_map(|result| match parse_item_id(&result.url) {
                Ok(id) => Some(ListItem::new(id, result.name, result.url)),
                Err(e) => {
                    warn!("Dropping list entry '{}': {}", result.name, e);
                    None
                }
            })
            .collect();

        ListPage {
            count: response.count,
            has_next_page: response.next.is_some(),
            items,
        }
    }

    fn map_detail(data: DetailData) -> DetailRecord {
        let image_url = data.sprites.and_then(|sprites| {
            sprites
                .other
                .and_then(|other| other.official_artwork)
                .and_then(|artwork| artwork.front_default)
                .or(sprites.front_default)
        });

        DetailRecord {
            id: data.id,
            name: data.name,
            height: data.height,
            weight: data.weight,
            abilities: data
                .abilities
                .into_iter()
                .map(|slot| Ability::new(slot.ability.name, slot.is_hidden))
                .collect(),
            types: data
                .types
                .into_iter()
                .map(|slot| ItemType {
                    name: slot.kind.name,
                })
                .collect(),
            stats: data
                .stats
                .into_iter()
                .map(|stat| Stat {
                    name: stat.stat.name,
                    base_value: stat.base_stat,
                })
                .collect(),
            image_url,
        }
    }
}

#[async_trait]
impl CatalogApi for HttpCatalogClient {
    async fn fetch_page(&self, offset: u32, limit: u32) -> AppResult<ListPage> {
        let url = self.list_url();
        debug!("Fetching catalog page offset={} limit={}", offset, limit);

        let request = self
            .http_client
            .get(&url)
            .query(&[("offset", offset), ("limit", limit)]);

        let response: ListResponse = self.get_json(request, &url).await?;
        Ok(Self::map_list_response(response))
    }

    async fn fetch_detail(&self, id: ItemId) -> AppResult<DetailRecord> {
        let url = self.detail_url(id);
        debug!("Fetching catalog detail id={}", id);

        let data: DetailData = self.get_json(self.http_client.get(&url), &url).await?;

        if data.id != id {
            return Err(AppError::Domain(DomainError::InvariantViolation(format!(
                "Detail for id {} came back with id {}",
                id, data.id
            ))));
        }

        Ok(Self::map_detail(data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn client_for(server: &MockServer) -> HttpCatalogClient {
        let config = ExplorerConfig {
            base_url: server.base_url(),
            ..ExplorerConfig::default()
        };
        HttpCatalogClient::new(&config).unwrap()
    }

    #[test]
    fn test_urls_are_built_from_config() {
        let config = ExplorerConfig {
            base_url: "https://example.test/api/".to_string(),
            list_path: "/items/".to_string(),
            ..ExplorerConfig::default()
        };
        let client = HttpCatalogClient::new(&config).unwrap();
        assert_eq!(client.list_url(), "https://example.test/api/items");
        assert_eq!(client.detail_url(25), "https://example.test/api/items/25");
    }

    #[tokio::test]
    async fn test_fetch_page_derives_ids_and_next_flag() {
        let server = MockServer::start_async().await;
        let base = server.base_url();
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/pokemon")
                    .query_param("offset", "20")
                    .query_param("limit", "20");
                then.status(200).json_body(json!({
                    "count": 1302,
                    "next": format!("{}/pokemon?offset=40&limit=20", base),
                    "previous": format!("{}/pokemon?offset=0&limit=20", base),
                    "results": [
                        { "name": "spearow", "url": format!("{}/pokemon/21/", base) },
                        { "name": "fearow", "url": format!("{}/pokemon/22/", base) }
                    ]
                }));
            })
            .await;

        let page = client_for(&server).fetch_page(20, 20).await.unwrap();

        mock.assert_async().await;
        assert_eq!(page.count, 1302);
        assert!(page.has_next_page);
        assert_eq!(
            page.items.iter().map(|i| i.id).collect::<Vec<_>>(),
            vec![21, 22]
        );
        assert_eq!(page.items[0].name, "spearow");
    }

    #[tokio::test]
    async fn test_fetch_page_drops_unparseable_urls() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/pokemon");
                then.status(200).json_body(json!({
                    "count": 2,
                    "next": null,
                    "previous": null,
                    "results": [
                        { "name": "good", "url": "https://example.test/pokemon/1/" },
                        { "name": "bad", "url": "https://example.test/pokemon/bad/" }
                    ]
                }));
            })
            .await;

        let page = client_for(&server).fetch_page(0, 20).await.unwrap();
        assert!(!page.has_next_page);
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].name, "good");
    }

    #[tokio::test]
    async fn test_fetch_detail_maps_wire_format() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/pokemon/1");
                then.status(200).json_body(json!({
                    "id": 1,
                    "name": "bulbasaur",
                    "height": 7,
                    "weight": 69,
                    "abilities": [
                        { "ability": { "name": "overgrow", "url": "x" }, "is_hidden": false, "slot": 1 },
                        { "ability": { "name": "chlorophyll", "url": "x" }, "is_hidden": true, "slot": 3 }
                    ],
                    "types": [
                        { "slot": 1, "type": { "name": "grass", "url": "x" } },
                        { "slot": 2, "type": { "name": "poison", "url": "x" } }
                    ],
                    "stats": [
                        { "base_stat": 45, "effort": 0, "stat": { "name": "hp", "url": "x" } }
                    ],
                    "sprites": {
                        "front_default": "https://img.test/1.png",
                        "other": { "official-artwork": { "front_default": "https://img.test/art/1.png" } }
                    }
                }));
            })
            .await;

        let detail = client_for(&server).fetch_detail(1).await.unwrap();
        assert_eq!(detail.name, "bulbasaur");
        assert_eq!(detail.height, 7);
        assert_eq!(detail.weight, 69);
        assert_eq!(detail.abilities[1], Ability::new("chlorophyll", true));
        assert_eq!(detail.types.len(), 2);
        assert_eq!(detail.stats[0].base_value, 45);
        assert_eq!(detail.image_url.as_deref(), Some("https://img.test/art/1.png"));
    }

    #[tokio::test]
    async fn test_error_status_is_reported() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/pokemon/9999");
                then.status(404);
            })
            .await;

        let err = client_for(&server).fetch_detail(9999).await.unwrap_err();
        assert!(matches!(err, AppError::UpstreamStatus { status: 404, .. }));
        assert!(err.is_network());
    }

    #[tokio::test]
    async fn test_detail_with_wrong_id_is_rejected() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/pokemon/2");
                then.status(200).json_body(json!({
                    "id": 3, "name": "venusaur", "height": 20, "weight": 1000
                }));
            })
            .await;

        let err = client_for(&server).fetch_detail(2).await.unwrap_err();
        assert!(matches!(
            err,
            AppError::Domain(DomainError::InvariantViolation(_))
        ));
        assert!(!err.is_network());
    }
}
