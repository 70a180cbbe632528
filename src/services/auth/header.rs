//! Header-based raw token extraction (`Authorization: <type> <token>`).
//!
//! Rules:
//! - header missing or blank → no credential
//! - first word not an accepted type → no credential (another scheme may own it)
//! - accepted type but not exactly two space-delimited values → error

use axum::http::{HeaderMap, HeaderName};

use crate::services::auth::error::AuthError;

#[derive(Debug, Clone)]
pub struct HeaderTokenExtractor {
    header_name: HeaderName,
    header_types: Vec<Vec<u8>>,
}

impl HeaderTokenExtractor {
    pub fn new(header_name: HeaderName, header_types: &[String]) -> Self {
        Self {
            header_name,
            header_types: header_types
                .iter()
                .map(|t| t.as_bytes().to_vec())
                .collect(),
        }
    }

    pub fn extract(&self, headers: &HeaderMap) -> Result<Option<Vec<u8>>, AuthError> {
        let Some(value) = headers.get(&self.header_name) else {
            return Ok(None);
        };

        let parts: Vec<&[u8]> = value
            .as_bytes()
            .split(|b| b.is_ascii_whitespace())
            .filter(|p| !p.is_empty())
            .collect();

        let Some(scheme) = parts.first() else {
            return Ok(None);
        };

        if !self.header_types.iter().any(|t| t.as_slice() == *scheme) {
            return Ok(None);
        }

        if parts.len() != 2 {
            return Err(AuthError::BadAuthorizationHeader);
        }

        Ok(Some(parts[1].to_vec()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderValue, header};

    fn extractor() -> HeaderTokenExtractor {
        HeaderTokenExtractor::new(
            header::AUTHORIZATION,
            &["Bearer".to_string(), "JWT".to_string()],
        )
    }

    fn headers(value: &'static str) -> HeaderMap {
        let mut map = HeaderMap::new();
        map.insert(header::AUTHORIZATION, HeaderValue::from_static(value));
        map
    }

    #[test]
    fn missing_header_is_anonymous() {
        assert_eq!(extractor().extract(&HeaderMap::new()).unwrap(), None);
    }

    #[test]
    fn extracts_bearer_and_jwt_schemes() {
        assert_eq!(
            extractor().extract(&headers("Bearer abc.def.ghi")).unwrap(),
            Some(b"abc.def.ghi".to_vec())
        );
        assert_eq!(
            extractor().extract(&headers("JWT abc.def.ghi")).unwrap(),
            Some(b"abc.def.ghi".to_vec())
        );
    }

    #[test]
    fn foreign_scheme_is_ignored() {
        assert_eq!(extractor().extract(&headers("Basic dXNlcjpwYXNz")).unwrap(), None);
        // scheme match is case-sensitive
        assert_eq!(extractor().extract(&headers("bearer abc")).unwrap(), None);
        assert_eq!(extractor().extract(&headers("   ")).unwrap(), None);
    }

    #[test]
    fn wrong_part_count_is_rejected() {
        assert!(matches!(
            extractor().extract(&headers("Bearer")),
            Err(AuthError::BadAuthorizationHeader)
        ));
        assert!(matches!(
            extractor().extract(&headers("Bearer a b")),
            Err(AuthError::BadAuthorizationHeader)
        ));
    }

    #[test]
    fn custom_header_name() {
        let extractor = HeaderTokenExtractor::new(
            HeaderName::from_static("x-odm-token"),
            &["Bearer".to_string()],
        );
        let mut map = HeaderMap::new();
        map.insert("x-odm-token", HeaderValue::from_static("Bearer tok"));
        map.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer other"));

        assert_eq!(extractor.extract(&map).unwrap(), Some(b"tok".to_vec()));
    }
}
