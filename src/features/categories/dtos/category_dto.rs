use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::categories::models::Category;

/// Response DTO for category
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CategoryResponseDto {
    pub id: Uuid,
    pub parent_id: Option<Uuid>,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub sort_order: i32,
}

impl From<Category> for CategoryResponseDto {
    fn from(c: Category) -> Self {
        Self {
            id: c.id,
            parent_id: c.parent_id,
            name: c.name,
            slug: c.slug,
            description: c.description,
            sort_order: c.sort_order,
        }
    }
}

/// Response DTO for category tree (hierarchical structure)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(no_recursion)]
pub struct CategoryTreeDto {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub sort_order: i32,
    pub children: Vec<CategoryTreeDto>,
}

impl CategoryTreeDto {
    /// Build the navigation tree from a flat list: roots with their direct
    /// children, one level deep. Deeper descendants are not nested.
    pub fn build_tree(categories: Vec<Category>) -> Vec<CategoryTreeDto> {
        categories
            .iter()
            .filter(|c| c.parent_id.is_none())
            .map(|root| {
                let children = categories
                    .iter()
                    .filter(|c| c.parent_id == Some(root.id))
                    .map(Self::leaf)
                    .collect();
                CategoryTreeDto {
                    children,
                    ..Self::leaf(root)
                }
            })
            .collect()
    }

    fn leaf(category: &Category) -> CategoryTreeDto {
        CategoryTreeDto {
            id: category.id,
            name: category.name.clone(),
            slug: category.slug.clone(),
            description: category.description.clone(),
            sort_order: category.sort_order,
            children: Vec::new(),
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCategoryDto {
    #[validate(length(min = 1, max = 200, message = "Name is required"))]
    pub name: String,

    #[validate(length(min = 1, max = 200, message = "Slug is required"))]
    pub slug: String,

    pub description: Option<String>,
    pub parent_id: Option<Uuid>,

    #[serde(default)]
    pub sort_order: i32,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateCategoryDto {
    #[validate(length(min = 1, max = 200, message = "Name must not be empty"))]
    pub name: Option<String>,

    pub description: Option<String>,
    pub parent_id: Option<Uuid>,
    pub is_active: Option<bool>,
    pub sort_order: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn category(id: u128, parent: Option<u128>, name: &str) -> Category {
        Category {
            id: Uuid::from_u128(id),
            parent_id: parent.map(Uuid::from_u128),
            name: name.to_string(),
            slug: name.to_lowercase().replace(' ', "-"),
            description: None,
            is_active: true,
            sort_order: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn build_tree_nests_children_under_roots() {
        let tree = CategoryTreeDto::build_tree(vec![
            category(1, None, "Laptop"),
            category(2, Some(1), "Gaming Laptop"),
            category(3, Some(1), "OLED Laptop"),
            category(4, None, "Components"),
        ]);

        assert_eq!(tree.len(), 2);
        let laptop = tree.iter().find(|n| n.name == "Laptop").unwrap();
        assert_eq!(laptop.children.len(), 2);
        let components = tree.iter().find(|n| n.name == "Components").unwrap();
        assert!(components.children.is_empty());
    }

    #[test]
    fn build_tree_stops_at_direct_children() {
        let tree = CategoryTreeDto::build_tree(vec![
            category(1, None, "Components"),
            category(2, Some(1), "Graphics Cards"),
            category(3, Some(2), "RTX Cards"),
        ]);

        assert_eq!(tree.len(), 1);
        let components = &tree[0];
        assert_eq!(components.children.len(), 1);
        assert_eq!(components.children[0].name, "Graphics Cards");
        assert!(components.children[0].children.is_empty());
    }
}
