use nt_auth::{AuthGate, Outcome};
use nt_core::{Article, Category, PageRequest};
use nt_storage::FallbackReader;
use serde::Serialize;

/// Response envelope for a category listing.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryResponse {
    pub success: bool,
    pub category: Category,
    pub count: usize,
    pub page: usize,
    pub limit: usize,
    pub data: Vec<Article>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub demo: Option<bool>,
}

/// Entry point for category reads: key checks plus paged, fallback-backed
/// listings. Data-layer failures never surface as errors here.
#[derive(Clone)]
pub struct CategoryService {
    gate: AuthGate,
    reader: FallbackReader,
}

impl CategoryService {
    pub fn new(gate: AuthGate, reader: FallbackReader) -> Self {
        Self { gate, reader }
    }

    pub fn gate(&self) -> &AuthGate {
        &self.gate
    }

    pub fn reader(&self) -> &FallbackReader {
        &self.reader
    }

    pub async fn authenticate(&self, provided_key: Option<&str>) -> Outcome {
        self.gate.authenticate(provided_key).await
    }

    pub async fn get_category(
        &self,
        category: Category,
        raw_limit: Option<&str>,
        raw_page: Option<&str>,
    ) -> CategoryResponse {
        let page = PageRequest::parse(raw_limit, raw_page);
        let read = self.reader.read(category, page.limit, page.offset()).await;
        let demo = read.is_demo().then_some(true);

        CategoryResponse {
            success: true,
            category,
            count: read.articles.len(),
            page: page.page,
            limit: page.limit,
            data: read.articles,
            demo,
        }
    }
}
