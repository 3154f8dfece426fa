mod claims;

pub use claims::{ClaimSink, ClaimsExtractor, RequestClaims};
