/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Free-text entity filter.
//!
//! A single query string cascades through every hierarchy level; each
//! level matches against its own field projection (see
//! [`Searchable`](crate::model::Searchable)). Inclusion by default: a
//! blank query matches everything.

use crate::model::Searchable;

/// Case-insensitive substring match of `query` against `fields`.
///
/// Returns true when the query is blank (empty or whitespace-only) or
/// when any present field contains the query. Absent fields are
/// skipped, not errors.
pub fn matches(query: &str, fields: &[Option<&str>]) -> bool {
    let query = query.trim();
    if query.is_empty() {
        return true;
    }
    let needle = query.to_lowercase();
    fields
        .iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(&needle))
}

/// [`matches`] applied to an entity's own field projection.
pub fn matches_entity<S: Searchable>(query: &str, entity: &S) -> bool {
    matches(query, &entity.search_fields())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Service;

    // Blank queries match any field set, including an empty one.
    #[test]
    fn blank_query_always_matches() {
        assert!(matches("", &[]));
        assert!(matches("", &[None]));
        assert!(matches("   ", &[Some("anything")]));
    }

    // Containment is case-insensitive in both query and field.
    #[test]
    fn match_is_case_insensitive() {
        assert!(matches("FRONT", &[Some("frontend")]));
        assert!(matches("front", &[Some("FRONTEND")]));
    }

    // Any single matching field is sufficient.
    #[test]
    fn any_field_match_suffices() {
        assert!(matches("web", &[Some("api"), Some("web_1")]));
        assert!(!matches("web", &[Some("api"), Some("worker")]));
    }

    // Absent fields are tolerated and never match.
    #[test]
    fn absent_fields_are_skipped() {
        assert!(!matches("web", &[None, None]));
        assert!(matches("web", &[None, Some("web")]));
    }

    // Entity projection: a service matches on its container name too.
    #[test]
    fn service_matches_on_container_name() {
        let svc: Service = serde_json::from_str(
            r#"{"name": "web", "container": {"name": "web_1", "state": "running"}}"#,
        )
        .unwrap();
        assert!(matches_entity("web_1", &svc));
        assert!(matches_entity("web", &svc));
        assert!(!matches_entity("db", &svc));
    }
}
