//! Bulk data dumps
//!
//! Dump paths have the form `{time_window}/{file_type}/{date}`, e.g.
//! `days/api/20260101`:
//! - `time_window`: `days`, `hours` or `minutes`
//! - `file_type`: `api`, `search`, `screenshots` or `dom`
//! - `date`: `YYYYMMDD`

use crate::error::Result;
use crate::http::{ApiRequest, HttpClient};
use crate::types::JsonValue;
use tokio::io::AsyncWrite;

const LIST_PATH: &str = "/api/v1/datadump/list/";
const LINK_PATH: &str = "/api/v1/datadump/link/";

/// Data dump API
#[derive(Debug, Clone, Copy)]
pub struct DataDump<'a> {
    http: &'a HttpClient,
}

impl<'a> DataDump<'a> {
    pub(crate) fn new(http: &'a HttpClient) -> Self {
        Self { http }
    }

    /// List the files available under a dump path
    pub async fn get_list(&self, path: &str) -> Result<JsonValue> {
        self.http.get_json(&dump_path(LIST_PATH, path)).await
    }

    /// Download one dump file into `writer`
    ///
    /// The archive is written as served; nothing is decompressed.
    pub async fn download_file<W>(&self, path: &str, writer: &mut W) -> Result<u64>
    where
        W: AsyncWrite + Unpin + ?Sized,
    {
        let request = ApiRequest::get(dump_path(LINK_PATH, path));
        self.http.download(&request, writer).await
    }
}

fn dump_path(prefix: &str, path: &str) -> String {
    format!("{prefix}{}", path.trim_start_matches('/'))
}
