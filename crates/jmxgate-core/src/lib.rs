pub mod error;
pub mod object_name;
pub mod request;
pub mod wildcard;

pub use error::{CoreError, Result};
pub use object_name::ObjectName;
pub use request::{HttpMethod, RequestType};
pub use wildcard::wildcard_match;
