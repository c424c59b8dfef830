//! JSON body written for failed requests.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Every error response carries `error`; `code` and `details` are added when known.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    #[schema(example = "Todo not found")]
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    #[schema(example = "ERR_NOT_FOUND")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub details: Vec<String>,
}
