//! client.rs — Strapi REST client
//!
//! Fetches project listings, single projects and the about page, retrying
//! transient failures with exponential backoff (200ms, 400ms, 800ms...).

use std::future::Future;

use folio_grid::model::Page;
use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::config::CmsConfig;
use crate::detail::ProjectDetail;
use crate::dto::{AboutDto, ListResponse, ProjectDto, SingleResponse};
use crate::error::{CmsError, CmsResult};
use crate::richtext::Block;

#[derive(Debug, Clone)]
pub struct StrapiClient {
    http: reqwest::Client,
    config: CmsConfig,
}

impl StrapiClient {
    pub fn new(config: CmsConfig) -> CmsResult<Self> {
        config.validate()?;
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| CmsError::Config(format!("building HTTP client: {}", e)))?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &CmsConfig {
        &self.config
    }

    // ── URLs ────────────────────────────────────────────────────────

    fn api(&self, path: &str) -> String {
        format!("{}/{}", self.config.api_url.trim_end_matches('/'), path)
    }

    pub fn projects_url(&self, page: u32, page_size: u32) -> String {
        self.api(&format!(
            "projects?sort=Year:desc&populate=Thumbnail&pagination[page]={}&pagination[pageSize]={}",
            page, page_size
        ))
    }

    /// The id is pushed as a single path segment, so `/`, `?` and `#` in it
    /// are percent-encoded rather than changing the request.
    pub fn project_url(&self, document_id: &str) -> CmsResult<String> {
        let mut url = Url::parse(&self.api("projects"))
            .map_err(|e| CmsError::Config(format!("api_url: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| CmsError::Config("api_url cannot carry a path".into()))?
            .push(document_id);
        url.set_query(Some("populate[]=Thumbnail&populate[]=Media&populate[]=HeroMedia"));
        Ok(url.into())
    }

    pub fn about_url(&self) -> String {
        self.api("about")
    }

    // ── Endpoints ───────────────────────────────────────────────────

    pub async fn fetch_projects(&self, page: u32, page_size: u32) -> CmsResult<Page> {
        let url = self.projects_url(page, page_size);
        let resp: ListResponse<ProjectDto> = self
            .get_json(&url)
            .await?
            .ok_or(CmsError::Status { url: url.clone(), status: StatusCode::NOT_FOUND })?;
        let page = resp.into_page(page, &self.config);
        info!(
            target: "folio::cms",
            page = page.page_number,
            page_count = page.page_count,
            items = page.items.len(),
            "projects fetched"
        );
        Ok(page)
    }

    /// One project with its media. `None` when the CMS does not know it.
    pub async fn fetch_project(&self, document_id: &str) -> CmsResult<Option<ProjectDetail>> {
        if matches!(document_id, "" | "." | "..") {
            debug!(target: "folio::cms", document_id, "not a document id");
            return Ok(None);
        }
        let url = self.project_url(document_id)?;
        let resp: Option<SingleResponse<ProjectDto>> = self.get_json(&url).await?;
        let detail = resp
            .and_then(|r| r.data)
            .filter(ProjectDto::is_visible)
            .map(|dto| dto.to_detail(&self.config));
        if detail.is_none() {
            debug!(target: "folio::cms", document_id, "project not found");
        }
        Ok(detail)
    }

    pub async fn fetch_about(&self) -> CmsResult<Vec<Block>> {
        let url = self.about_url();
        let resp: Option<SingleResponse<AboutDto>> = self.get_json(&url).await?;
        Ok(resp.and_then(|r| r.data).map(|a| a.description).unwrap_or_default())
    }

    // ── Transport ───────────────────────────────────────────────────

    /// GET and decode. `Ok(None)` on 404.
    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> CmsResult<Option<T>> {
        self.with_retry(url, || async {
            let resp = self
                .http
                .get(url)
                .header("Accept", "application/json")
                .send()
                .await
                .map_err(|source| CmsError::Http { url: url.to_string(), source })?;

            let status = resp.status();
            if status == StatusCode::NOT_FOUND {
                return Ok(None);
            }
            if !status.is_success() {
                return Err(CmsError::Status { url: url.to_string(), status });
            }

            let body = resp
                .bytes()
                .await
                .map_err(|source| CmsError::Http { url: url.to_string(), source })?;
            serde_json::from_slice(&body)
                .map(Some)
                .map_err(|source| CmsError::Decode { url: url.to_string(), source })
        })
        .await
    }

    async fn with_retry<F, Fut, T>(&self, url: &str, mut action: F) -> CmsResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = CmsResult<T>>,
    {
        let mut attempt = 0;
        loop {
            if attempt == 0 {
                debug!(target: "folio::cms", url, "fetching");
            }
            match action().await {
                Ok(value) => return Ok(value),
                Err(err) if attempt < self.config.retries && err.should_retry() => {
                    attempt += 1;
                    let backoff = self.config.backoff(attempt);
                    warn!(
                        target: "folio::cms",
                        url,
                        attempt,
                        backoff_ms = backoff.as_millis() as u64,
                        error = %err,
                        "retrying"
                    );
                    sleep(backoff).await;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};
    use std::time::Duration;

    fn client(server: &Server, retries: u32) -> StrapiClient {
        StrapiClient::new(CmsConfig {
            api_url: format!("{}/api", server.url()),
            media_url: server.url(),
            page_size: 2,
            timeout: Duration::from_secs(5),
            retries,
            retry_backoff: Duration::from_millis(1),
        })
        .unwrap()
    }

    #[test]
    fn test_urls() {
        let c = StrapiClient::new(CmsConfig::default()).unwrap();
        assert_eq!(
            c.projects_url(2, 12),
            "http://localhost:1337/api/projects?sort=Year:desc&populate=Thumbnail&pagination[page]=2&pagination[pageSize]=12"
        );
        assert_eq!(
            c.project_url("k2x").unwrap(),
            "http://localhost:1337/api/projects/k2x?populate[]=Thumbnail&populate[]=Media&populate[]=HeroMedia"
        );
        assert_eq!(c.about_url(), "http://localhost:1337/api/about");
    }

    #[test]
    fn test_project_id_stays_one_segment() {
        let c = StrapiClient::new(CmsConfig::default()).unwrap();
        let url = c.project_url("../x").unwrap();
        assert!(url.starts_with("http://localhost:1337/api/projects/..%2Fx?populate[]=Thumbnail"), "{}", url);

        let url = c.project_url("a?b#c").unwrap();
        assert!(url.starts_with("http://localhost:1337/api/projects/a%3Fb%23c?populate[]="), "{}", url);
    }

    #[tokio::test]
    async fn test_dot_segments_are_not_fetched() {
        let server = Server::new_async().await;
        let c = client(&server, 0);
        assert!(c.fetch_project("..").await.unwrap().is_none());
        assert!(c.fetch_project(".").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_fetch_projects_page() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/api/projects")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("sort".into(), "Year:desc".into()),
                Matcher::UrlEncoded("pagination[page]".into(), "2".into()),
                Matcher::UrlEncoded("pagination[pageSize]".into(), "2".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"data":[{"id":7,"documentId":"a7","Title":"Seven","Type":"Music",
                   "Thumbnail":{"id":1,"url":"/uploads/7.png","width":10,"height":20}}],
                   "meta":{"pagination":{"page":2,"pageSize":2,"pageCount":2,"total":3}}}"#,
            )
            .create_async()
            .await;

        let c = client(&server, 0);
        let page = c.fetch_projects(2, 2).await.unwrap();
        mock.assert_async().await;

        assert_eq!(page.page_number, 2);
        assert_eq!(page.page_count, 2);
        assert_eq!(page.items.len(), 1);
        let thumb = page.items[0].thumbnail.as_ref().unwrap();
        assert_eq!(thumb.url, format!("{}/uploads/7.png", server.url()));
    }

    #[tokio::test]
    async fn test_missing_project_is_none() {
        let mut server = Server::new_async().await;
        let _gone = server
            .mock("GET", "/api/projects/gone")
            .match_query(Matcher::Any)
            .with_status(404)
            .create_async()
            .await;
        let _null = server
            .mock("GET", "/api/projects/null")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"data":null,"meta":{}}"#)
            .create_async()
            .await;

        let c = client(&server, 0);
        assert!(c.fetch_project("gone").await.unwrap().is_none());
        assert!(c.fetch_project("null").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_server_error_is_retried() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/api/about")
            .with_status(503)
            .expect(3)
            .create_async()
            .await;

        let c = client(&server, 2);
        let err = c.fetch_about().await.unwrap_err();
        mock.assert_async().await;
        assert!(matches!(err, CmsError::Status { status, .. } if status == StatusCode::SERVICE_UNAVAILABLE));
    }

    #[tokio::test]
    async fn test_bad_json_is_decode_error() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/api/about")
            .with_status(200)
            .with_body("<html>")
            .expect(1)
            .create_async()
            .await;

        let c = client(&server, 3);
        let err = c.fetch_about().await.unwrap_err();
        mock.assert_async().await;
        assert!(matches!(err, CmsError::Decode { .. }));
    }

    #[tokio::test]
    async fn test_about_blocks() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/api/about")
            .with_status(200)
            .with_body(r#"{"data":{"id":1,"documentId":"x","description":[
                {"type":"paragraph","children":[{"type":"text","text":"Hello"}]}]}}"#)
            .create_async()
            .await;

        let blocks = client(&server, 0).fetch_about().await.unwrap();
        assert_eq!(blocks.len(), 1);
    }
}
