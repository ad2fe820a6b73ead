use serde_json::Value;
use std::collections::HashMap;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Paging {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub tags: HashMap<String, Value>,
}

impl Paging {
    pub fn new(page: u32, limit: u32) -> Paging {
        Paging {
            page,
            limit,
            total: 0,
            tags: HashMap::new(),
        }
    }
}

impl From<PagingParameters> for Paging {
    fn from(received: PagingParameters) -> Self {
        Paging {
            page: received.page(),
            limit: received.limit(),
            total: 0,
            tags: received.tags,
        }
    }
}

/// Response envelope for list endpoints.
#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub struct Payload<T> {
    pub data: Vec<T>,
    pub paging: Paging,
}

impl<T> Payload<T> {
    pub fn new(data: Vec<T>, mut paging: Paging, total: i64) -> Payload<T> {
        paging.total = total as u64;
        Payload { data, paging }
    }

    pub fn empty(paging: Paging) -> Payload<T> {
        let mut payload = Payload { data: vec![], paging };
        payload.paging.total = 0;
        payload
    }
}

/// Query-string shape for paged endpoints. Endpoint-specific filters ride
/// along in `tags` and are read out with `get_tag`.
#[derive(Serialize, Deserialize, Clone)]
pub struct PagingParameters {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    #[serde(flatten)]
    pub tags: HashMap<String, Value>,
}

impl PagingParameters {
    pub fn page(&self) -> u32 {
        self.page.unwrap_or(0)
    }

    pub fn limit(&self) -> u32 {
        self.limit.unwrap_or(50)
    }

    pub fn get_tag(&self, tag: &'static str) -> Option<String> {
        self.tags.get(tag).map(|v| v.as_str().unwrap_or("").to_string())
    }
}
