//! Response envelopes and paging parameters shared by every endpoint.

use super::error::ApiError;
use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};

/// The `{success, message, data}` wrapper of every backend response
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ApiResponse<T> {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

/// Envelope of a call whose payload is discarded, whatever its shape
pub type Ack = ApiResponse<IgnoredAny>;

impl<T> ApiResponse<T> {
    /// Envelope for an empty 2xx body
    pub fn empty() -> Self {
        Self {
            success: true,
            message: String::new(),
            data: None,
            timestamp: None,
        }
    }

    /// Take the payload of a successful envelope
    pub fn into_data(self) -> Result<T, ApiError> {
        if !self.success {
            return Err(ApiError::Rejected(self.message));
        }
        self.data
            .ok_or_else(|| ApiError::Rejected("response carried no data".to_string()))
    }

    /// Accept a successful envelope whose payload is irrelevant, keeping
    /// its message
    pub fn into_ack(self) -> Result<String, ApiError> {
        if self.success {
            Ok(self.message)
        } else {
            Err(ApiError::Rejected(self.message))
        }
    }
}

/// Page envelope used by paginated endpoints
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", bound(deserialize = "T: Deserialize<'de>"))]
pub struct Page<T> {
    #[serde(default)]
    pub content: Vec<T>,
    #[serde(default)]
    pub total_elements: u64,
    #[serde(default)]
    pub total_pages: u32,
    /// Zero-based page index
    #[serde(default)]
    pub number: u32,
    #[serde(default)]
    pub size: u32,
    #[serde(default)]
    pub first: bool,
    #[serde(default)]
    pub last: bool,
    #[serde(default)]
    pub empty: bool,
}

impl<T> Page<T> {
    pub fn summary(&self) -> String {
        let pages = self.total_pages.max(1);
        format!(
            "page {}/{} ({} total)",
            self.number + 1,
            pages,
            self.total_elements
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortDir {
    #[serde(rename = "ASC")]
    Asc,
    #[default]
    #[serde(rename = "DESC")]
    Desc,
}

impl SortDir {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "asc" => Some(Self::Asc),
            "desc" => Some(Self::Desc),
            _ => None,
        }
    }
}

/// Ordered query-string parameters
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query(Vec<(String, String)>);

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: impl ToString) -> Self {
        self.0.push((key.to_string(), value.to_string()));
        self
    }

    pub fn with_opt<V: ToString>(self, key: &str, value: Option<V>) -> Self {
        match value {
            Some(v) => self.with(key, v),
            None => self,
        }
    }

    pub fn into_pairs(self) -> Vec<(String, String)> {
        self.0
    }
}

/// Paging parameters; each endpoint supplies its own defaults
#[derive(Debug, Clone, PartialEq)]
pub struct PageQuery {
    pub page: u32,
    pub size: u32,
    pub sort_by: Option<String>,
    pub sort_dir: Option<SortDir>,
}

impl PageQuery {
    pub fn new(page: u32, size: u32) -> Self {
        Self {
            page,
            size,
            sort_by: None,
            sort_dir: None,
        }
    }

    pub fn sorted(mut self, sort_by: &str, dir: SortDir) -> Self {
        self.sort_by = Some(sort_by.to_string());
        self.sort_dir = Some(dir);
        self
    }

    pub fn to_query(&self) -> Query {
        Query::new()
            .with("page", self.page)
            .with("size", self.size)
            .with_opt("sortBy", self.sort_by.as_deref())
            .with_opt("sortDir", self.sort_dir.map(|d| d.as_str()))
    }
}

/// Pull the `message` out of an error body, if it is an envelope at all
pub fn envelope_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("message")
                .and_then(|m| m.as_str())
                .map(|m| m.to_string())
        })
        .unwrap_or_default()
}
