use atlas::prelude::*;
use atlas::router::View;
use atlas::storage::MemoryStorage;
use atlas::store::MAX_COMPARE_TOOLS;
use atlas::types::{CreateToolInputBuilder, Features, Role};
use serde_json::json;
use std::sync::Arc;

#[cfg(test)]
mod tests {
    use super::*;

    fn tool(id: ToolId, slug: &str) -> Tool {
        Tool {
            id,
            slug: slug.to_string(),
            name: slug.to_string(),
            ..Default::default()
        }
    }

    fn user(role: Role) -> User {
        User {
            id: 1,
            email: "a@b.com".to_string(),
            display_name: None,
            role,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_create_tool_input_builder() {
        let input = CreateToolInputBuilder::default()
            .slug("midjourney")
            .name("Midjourney")
            .tagline(Some("Image generation".to_string()))
            .primary_category_id(4u64)
            .build()
            .unwrap();

        let body = serde_json::to_value(&input).unwrap();
        assert_eq!(body["slug"], "midjourney");
        assert_eq!(body["tagline"], "Image generation");
        assert_eq!(body["has_free_tier"], false);
        assert!(body.get("logo_url").is_none());
    }

    #[test]
    fn test_builder_requires_slug() {
        let result = CreateToolInputBuilder::default().name("No slug").build();
        assert!(result.is_err());
    }

    #[test]
    fn test_tool_from_backend_json() {
        let tool: Tool = serde_json::from_value(json!({
            "id": 2,
            "slug": "whisper",
            "name": "Whisper",
            "has_free_tier": true,
            "primary_category_id": 3,
            "avg_rating_overall": 4.6,
            "tags": [{ "id": 1, "slug": "speech", "name": "Speech" }],
            "media": [{ "id": 1, "tool_id": 2, "type": "screenshot", "url": "https://x/1.png" }],
            "features": "Transcription, translation"
        }))
        .unwrap();

        assert_eq!(tool.tags[0].slug, "speech");
        assert_eq!(tool.media.len(), 1);
        assert!(matches!(tool.features, Some(Features::Text(_))));
        assert!(tool.archived_at.is_none());
    }

    #[test]
    fn test_comparison_capacity_and_duplicates() {
        let compare = ComparisonStore::new(Arc::new(MemoryStorage::new()));
        for id in 0..MAX_COMPARE_TOOLS as ToolId {
            assert!(compare.add_tool(tool(id, &format!("t{}", id))));
        }

        let full = compare.selected_tools();
        assert!(!compare.add_tool(tool(99, "extra")));
        assert_eq!(compare.selected_tools(), full);

        compare.remove_tool(0);
        assert!(!compare.add_tool(tool(1, "t1-again")));
        assert_eq!(compare.count(), MAX_COMPARE_TOOLS - 1);
    }

    #[test]
    fn test_compare_url() {
        let compare = ComparisonStore::new(Arc::new(MemoryStorage::new()));
        assert_eq!(compare.compare_url(), "/compare");

        compare.add_tool(tool(1, "a"));
        compare.add_tool(tool(2, "b"));
        assert!(compare.compare_url().contains("tools=a,b"));
    }

    #[test]
    fn test_clear_filters_then_sort() {
        let filters = FiltersStore::new();
        filters.set_filter(FilterUpdate::Query("agents".to_string()));
        filters.set_filter(FilterUpdate::Platform(Some("web".to_string())));

        filters.clear_filters();
        filters.set_filter(FilterUpdate::Sort(SortKey::Newest));

        let expected = Filters {
            sort: SortKey::Newest,
            ..Filters::default()
        };
        assert_eq!(filters.snapshot(), expected);
    }

    #[test]
    fn test_router_guards_admin_views() {
        let router = Router::shared();

        let matched = router.resolve("/admin/analytics").unwrap();
        assert_eq!(matched.route.view, View::AdminAnalytics);
        assert_eq!(matched.route.meta.check(None), Access::LoginRequired);
        assert_eq!(matched.route.meta.check(Some(&user(Role::User))), Access::Forbidden);
        assert_eq!(matched.route.meta.check(Some(&user(Role::Admin))), Access::Allowed);

        let compare = router.resolve("/compare?tools=a,b").unwrap();
        assert_eq!(compare.route.name, RouteName::Compare);
        assert!(compare.params.is_empty());
    }

    #[test]
    fn test_error_handling() {
        let error = atlas::Error::parse("unexpected shape");
        assert!(error.to_string().contains("unexpected shape"));
        assert!(error.status().is_none());
    }
}
