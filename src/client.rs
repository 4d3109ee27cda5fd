// src/client.rs
//
// Cliente HTTP para operações orquestradas do lado do cliente,
// como apagar todos os registros de um recurso.

use reqwest::StatusCode;
use serde::Deserialize;

use crate::services::BulkDeleteReport;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Falha na requisição HTTP: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Resposta inesperada {status} em {url}")]
    UnexpectedStatus { status: StatusCode, url: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    /// 404: outra requisição já removeu
    Missing,
    /// 409: ainda há dependentes
    Blocked,
}

#[derive(Deserialize)]
struct IdOnly {
    id: i64,
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, reqwest::Client::new())
    }

    pub fn with_client(base_url: impl Into<String>, http: reqwest::Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, http }
    }

    fn collection_url(&self, resource: &str) -> String {
        format!("{}/{}/", self.base_url, resource)
    }

    pub async fn list_ids(&self, resource: &str) -> Result<Vec<i64>, ClientError> {
        let url = self.collection_url(resource);
        let res = self.http.get(&url).send().await?;
        if res.status() != StatusCode::OK {
            return Err(ClientError::UnexpectedStatus { status: res.status(), url });
        }
        let rows: Vec<IdOnly> = res.json().await?;
        Ok(rows.into_iter().map(|row| row.id).collect())
    }

    pub async fn delete(&self, resource: &str, id: i64) -> Result<DeleteOutcome, ClientError> {
        let url = format!("{}{}/", self.collection_url(resource), id);
        let res = self.http.delete(&url).send().await?;
        match res.status() {
            StatusCode::NO_CONTENT | StatusCode::OK => Ok(DeleteOutcome::Deleted),
            StatusCode::NOT_FOUND => Ok(DeleteOutcome::Missing),
            StatusCode::CONFLICT => Ok(DeleteOutcome::Blocked),
            status => Err(ClientError::UnexpectedStatus { status, url }),
        }
    }

    /// Apaga todos os registros de `resource`.
    ///
    /// Cada passada lista os ids e remove um a um; a lista é refeita até
    /// ficar vazia ou até `max_passes`. Ids bloqueados (409) ou que ainda
    /// existam no fim vão para `failed`.
    pub async fn bulk_delete_all(
        &self,
        resource: &str,
        max_passes: usize,
    ) -> Result<BulkDeleteReport, ClientError> {
        let mut report = BulkDeleteReport::default();

        for pass in 1..=max_passes {
            let pending = self.pending_ids(resource, &report).await?;
            if pending.is_empty() {
                return Ok(report);
            }
            tracing::debug!(resource, pass, pending = pending.len(), "Passada de remoção em lote");

            for id in pending {
                match self.delete(resource, id).await? {
                    DeleteOutcome::Deleted => report.deleted += 1,
                    DeleteOutcome::Missing => report.skipped += 1,
                    DeleteOutcome::Blocked => report.failed.push(id),
                }
            }
        }

        let leftover = self.pending_ids(resource, &report).await?;
        if !leftover.is_empty() {
            tracing::warn!(resource, remaining = leftover.len(), "Registros restantes após o limite de passadas");
            report.failed.extend(leftover);
        }
        Ok(report)
    }

    async fn pending_ids(&self, resource: &str, report: &BulkDeleteReport) -> Result<Vec<i64>, ClientError> {
        Ok(self
            .list_ids(resource)
            .await?
            .into_iter()
            .filter(|id| !report.failed.contains(id))
            .collect())
    }
}
