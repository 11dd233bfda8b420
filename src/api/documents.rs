use eyre::Result;
use reqwest::Method;

use crate::api::HttpApi;
use crate::models::{DocumentFile, LibraryStats, SearchHit, SearchQuery};

impl HttpApi {
    pub async fn list_documents(&self) -> Result<Vec<DocumentFile>> {
        let req = self.request(Method::GET, self.url("/rag/files"));
        self.fetch(req, "listing documents").await
    }

    pub async fn delete_document(&self, id: i64) -> Result<()> {
        let req = self.request(Method::DELETE, self.url(&format!("/rag/files/{}", id)));
        self.execute(req, "deleting document").await
    }

    pub async fn search_documents(&self, query: &SearchQuery) -> Result<Vec<SearchHit>> {
        log::debug!("Searching documents: {:?}", query);
        let req = self
            .request(Method::POST, self.url("/rag/search"))
            .json(query);
        self.fetch(req, "searching documents").await
    }

    pub async fn library_stats(&self) -> Result<LibraryStats> {
        let req = self.request(Method::GET, self.url("/rag/stats"));
        self.fetch(req, "getting library stats").await
    }
}
