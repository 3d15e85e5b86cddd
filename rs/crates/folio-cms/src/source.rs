use async_trait::async_trait;
use folio_grid::model::Page;
use folio_grid::pagination::PageRequest;

use crate::client::StrapiClient;
use crate::detail::ProjectDetail;
use crate::error::CmsResult;
use crate::richtext::Block;

/// Where projects come from.
#[async_trait]
pub trait ContentSource: Send + Sync {
    async fn fetch_page(&self, request: PageRequest) -> CmsResult<Page>;

    /// `Ok(None)` when no visible project has this document id.
    async fn fetch_detail(&self, document_id: &str) -> CmsResult<Option<ProjectDetail>>;

    async fn fetch_about(&self) -> CmsResult<Vec<Block>>;
}

#[async_trait]
impl ContentSource for StrapiClient {
    async fn fetch_page(&self, request: PageRequest) -> CmsResult<Page> {
        self.fetch_projects(request.page, request.page_size).await
    }

    async fn fetch_detail(&self, document_id: &str) -> CmsResult<Option<ProjectDetail>> {
        self.fetch_project(document_id).await
    }

    async fn fetch_about(&self) -> CmsResult<Vec<Block>> {
        StrapiClient::fetch_about(self).await
    }
}
