use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::index::model::{Language, SubjectData};
use crate::query::filter::{browse, ExamTypeFilter, Projection, Selection};

#[derive(Deserialize)]
pub struct BrowseParams {
    pub subject: String,
    /// "chi" / "eng"；缺省为 chi（分支缺失时投影自行回退）
    pub lang: Option<Language>,
    /// 类别 tab；缺省或 "All" 直通
    #[serde(rename = "type")]
    pub exam_type: Option<String>,
    pub q: Option<String>,
}

#[derive(Serialize)]
pub struct SubjectSummary {
    pub name: String,
    pub chinese: bool,
    pub english: bool,
}

#[derive(Serialize)]
pub struct StatusResponse {
    pub subject_count: usize,
}

/// 浏览 API：不可变快照上的只读投影服务
pub struct BrowseServer {
    pub subjects: Arc<Vec<SubjectData>>,
}

impl BrowseServer {
    pub fn new(subjects: Arc<Vec<SubjectData>>) -> Self {
        Self { subjects }
    }

    pub async fn run(self, port: u16) -> anyhow::Result<()> {
        let app = Router::new()
            .route("/subjects", get(subjects_handler))
            .route("/browse", get(browse_handler))
            .route("/status", get(status_handler))
            .with_state(self.subjects);

        let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;
        tracing::info!("browse server listening on port {}", port);
        axum::serve(listener, app).await?;
        Ok(())
    }
}

async fn subjects_handler(
    State(subjects): State<Arc<Vec<SubjectData>>>,
) -> Json<Vec<SubjectSummary>> {
    let list = subjects
        .iter()
        .map(|s| SubjectSummary {
            name: s.name.clone(),
            chinese: s.chinese.is_some(),
            english: s.english.is_some(),
        })
        .collect();
    Json(list)
}

async fn browse_handler(
    Query(params): Query<BrowseParams>,
    State(subjects): State<Arc<Vec<SubjectData>>>,
) -> Json<Projection> {
    Json(browse(&subjects, &selection_from(params)))
}

async fn status_handler(State(subjects): State<Arc<Vec<SubjectData>>>) -> Json<StatusResponse> {
    Json(StatusResponse {
        subject_count: subjects.len(),
    })
}

fn selection_from(params: BrowseParams) -> Selection {
    Selection {
        subject: params.subject,
        language: params.lang.unwrap_or(Language::Chinese),
        exam_type: match params.exam_type {
            None => ExamTypeFilter::All,
            Some(kind) if kind == "All" => ExamTypeFilter::All,
            Some(kind) => ExamTypeFilter::Only(kind),
        },
        query: params.q.unwrap_or_default(),
    }
}
