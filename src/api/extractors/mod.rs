//! Custom request extractors.

mod uuid_path;
mod validated_json;
mod validated_query;

pub use uuid_path::UuidParam;
pub use validated_json::ValidatedJson;
pub use validated_query::ValidatedQuery;
