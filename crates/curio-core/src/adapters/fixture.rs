//! Deterministic in-memory collection source for offline tests.

use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use crate::collection::{CapabilitySet, CollectionSource, HealthState, HealthStatus};
use crate::domain::{ArtworkDetail, ArtworkId, ImageRef, SearchPage, SearchQuery};
use crate::outcome::CallError;
use crate::source::SourceId;

/// Scriptable offline adapter backed by a small catalog of well-known works.
///
/// Detail requests for ids outside the catalog synthesize a deterministic
/// record, so tests can hydrate arbitrary identifier lists. Latency and
/// failures are scripted per id to pin down completion-order behavior.
#[derive(Debug, Clone, Default)]
pub struct FixtureAdapter {
    detail_delays: HashMap<u64, Duration>,
    failing_ids: HashSet<u64>,
    search_delay: Option<Duration>,
    search_error: Option<CallError>,
    health_state: Option<HealthState>,
}

impl FixtureAdapter {
    pub fn with_detail_delay(mut self, id: u64, delay: Duration) -> Self {
        self.detail_delays.insert(id, delay);
        self
    }

    /// Scripted per-item failure; surfaces as an upstream 503.
    pub fn with_failing_id(mut self, id: u64) -> Self {
        self.failing_ids.insert(id);
        self
    }

    pub fn with_search_delay(mut self, delay: Duration) -> Self {
        self.search_delay = Some(delay);
        self
    }

    /// Scripted page-level failure for the search endpoint.
    pub fn with_search_error(mut self, error: CallError) -> Self {
        self.search_error = Some(error);
        self
    }

    pub fn with_health_state(mut self, state: HealthState) -> Self {
        self.health_state = Some(state);
        self
    }

    async fn run_search(&self, query: &SearchQuery) -> Result<SearchPage, CallError> {
        if let Some(delay) = self.search_delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(error) = &self.search_error {
            return Err(error.clone());
        }

        let needle = query.text().to_ascii_lowercase();
        let matches: Vec<u64> = catalog()
            .iter()
            .filter(|entry| {
                entry.title.to_ascii_lowercase().contains(&needle)
                    || entry.artist.to_ascii_lowercase().contains(&needle)
                    || entry
                        .terms
                        .iter()
                        .any(|term| term.to_ascii_lowercase().contains(&needle))
            })
            .map(|entry| entry.id)
            .collect();

        let total = matches.len() as u64;
        let page_size = query.page_size();
        let total_pages = matches.len().div_ceil(page_size) as u32;
        let offset = (query.page() as usize - 1) * page_size;
        let ids = matches
            .into_iter()
            .skip(offset)
            .take(page_size)
            .map(|id| ArtworkId::new(id as i64).expect("catalog ids are valid"))
            .collect();

        Ok(SearchPage {
            total,
            page: query.page(),
            page_size,
            total_pages,
            ids,
        })
    }

    async fn run_detail(&self, id: ArtworkId) -> Result<ArtworkDetail, CallError> {
        if let Some(delay) = self.detail_delays.get(&id.value()) {
            tokio::time::sleep(*delay).await;
        }
        if self.failing_ids.contains(&id.value()) {
            return Err(CallError::HttpStatus { status: 503 });
        }

        if let Some(entry) = catalog().iter().find(|entry| entry.id == id.value()) {
            return Ok(entry.to_detail());
        }

        // Synthesized record for ids outside the catalog.
        Ok(ArtworkDetail {
            id,
            title: format!("Study no. {}", id.value()),
            artist: String::from("Unknown artist"),
            date_line: String::from("n.d."),
            medium: String::from("Medium not recorded"),
            credit_line: String::from("Fixture collection"),
            department: None,
            terms: Vec::new(),
            image: None,
        })
    }
}

impl CollectionSource for FixtureAdapter {
    fn id(&self) -> SourceId {
        SourceId::Fixture
    }

    fn capabilities(&self) -> CapabilitySet {
        CapabilitySet::new(true, true, false)
    }

    fn search<'a>(
        &'a self,
        query: &'a SearchQuery,
    ) -> Pin<Box<dyn Future<Output = Result<SearchPage, CallError>> + Send + 'a>> {
        Box::pin(self.run_search(query))
    }

    fn detail<'a>(
        &'a self,
        id: ArtworkId,
    ) -> Pin<Box<dyn Future<Output = Result<ArtworkDetail, CallError>> + Send + 'a>> {
        Box::pin(self.run_detail(id))
    }

    fn health(&self) -> HealthStatus {
        HealthStatus::new(self.health_state.unwrap_or(HealthState::Healthy), true)
    }
}

struct CatalogEntry {
    id: u64,
    title: &'static str,
    artist: &'static str,
    date_line: &'static str,
    medium: &'static str,
    credit_line: &'static str,
    department: &'static str,
    terms: &'static [&'static str],
    image_id: Option<&'static str>,
}

impl CatalogEntry {
    fn to_detail(&self) -> ArtworkDetail {
        ArtworkDetail {
            id: ArtworkId::new(self.id as i64).expect("catalog ids are valid"),
            title: self.title.to_owned(),
            artist: self.artist.to_owned(),
            date_line: self.date_line.to_owned(),
            medium: self.medium.to_owned(),
            credit_line: self.credit_line.to_owned(),
            department: Some(self.department.to_owned()),
            terms: self.terms.iter().map(|term| (*term).to_owned()).collect(),
            image: self
                .image_id
                .map(|image_id| ImageRef::new(image_id).expect("catalog image ids are valid")),
        }
    }
}

fn catalog() -> &'static [CatalogEntry] {
    &[
        CatalogEntry {
            id: 27992,
            title: "A Sunday on La Grande Jatte — 1884",
            artist: "Georges Seurat",
            date_line: "1884–86",
            medium: "Oil on canvas",
            credit_line: "Helen Birch Bartlett Memorial Collection",
            department: "Painting and Sculpture of Europe",
            terms: &["pointillism", "landscape"],
            image_id: Some("2d484387-2509-5e8e-2c43-22f9981972eb"),
        },
        CatalogEntry {
            id: 28560,
            title: "The Bedroom",
            artist: "Vincent van Gogh",
            date_line: "1889",
            medium: "Oil on canvas",
            credit_line: "Helen Birch Bartlett Memorial Collection",
            department: "Painting and Sculpture of Europe",
            terms: &["post-impressionism", "interior"],
            image_id: Some("25c31d8d-21a4-9ea1-1d73-6a2eca4dda7e"),
        },
        CatalogEntry {
            id: 6565,
            title: "American Gothic",
            artist: "Grant Wood",
            date_line: "1930",
            medium: "Oil on Beaver Board",
            credit_line: "Friends of American Art Collection",
            department: "Arts of the Americas",
            terms: &["portrait", "regionalism"],
            image_id: Some("b272df73-a965-ac37-4172-be4e99483637"),
        },
        CatalogEntry {
            id: 16568,
            title: "Water Lilies",
            artist: "Claude Monet",
            date_line: "1906",
            medium: "Oil on canvas",
            credit_line: "Mr. and Mrs. Martin A. Ryerson Collection",
            department: "Painting and Sculpture of Europe",
            terms: &["impressionism", "landscape"],
            image_id: Some("3c27b499-af56-f0d5-93b5-a7f2f1ad5813"),
        },
        CatalogEntry {
            id: 111628,
            title: "Nighthawks",
            artist: "Edward Hopper",
            date_line: "1942",
            medium: "Oil on canvas",
            credit_line: "Friends of American Art Collection",
            department: "Arts of the Americas",
            terms: &["cityscape", "realism"],
            image_id: Some("831a05de-d3f6-f4fa-a460-23008dd58dda"),
        },
        CatalogEntry {
            id: 28067,
            title: "The Old Guitarist",
            artist: "Pablo Picasso",
            date_line: "late 1903–early 1904",
            medium: "Oil on panel",
            credit_line: "Helen Birch Bartlett Memorial Collection",
            department: "Painting and Sculpture of Europe",
            terms: &["blue period", "portrait"],
            image_id: Some("ee0d8b8d-0cbd-6fd6-4f7c-6b19a20b2e3b"),
        },
        CatalogEntry {
            id: 20684,
            title: "Paris Street; Rainy Day",
            artist: "Gustave Caillebotte",
            date_line: "1877",
            medium: "Oil on canvas",
            credit_line: "Charles H. and Mary F. S. Worcester Collection",
            department: "Painting and Sculpture of Europe",
            terms: &["impressionism", "cityscape"],
            image_id: Some("1adf2696-8489-499b-cad2-821d7fde4b33"),
        },
        CatalogEntry {
            id: 14598,
            title: "The Child's Bath",
            artist: "Mary Cassatt",
            date_line: "1893",
            medium: "Oil on canvas",
            credit_line: "Robert A. Waller Fund",
            department: "Arts of the Americas",
            terms: &["impressionism", "portrait"],
            image_id: Some("8458ecd3-9b4d-24b5-5cbc-0c5056d153d5"),
        },
    ]
}
