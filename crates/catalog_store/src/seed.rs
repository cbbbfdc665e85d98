//! Demo catalog data.

use entities::{NewItem, NewUser};

use crate::{CatalogStore, CatalogStoreResult};

const DEMO_CATEGORIES: &[&str] = &[
    "Soccer",
    "Basketball",
    "Baseball",
    "Frisbee",
    "Snowboarding",
    "Rock Climbing",
    "Foosball",
    "Skating",
    "Hockey",
];

/// (category, name, description)
const DEMO_ITEMS: &[(&str, &str, &str)] = &[
    (
        "Frisbee",
        "Frisbee Disc",
        "A plastic flying disc. Perfect for a game of ultimate frisbee.",
    ),
    ("Soccer", "Soccer Ball", "An inflatable soccer ball. Size 4."),
    (
        "Soccer",
        "Junior's Soccer Cleats",
        "Green and black soccer cleats for 4-8 year olds.",
    ),
    (
        "Soccer",
        "Adult Soccer Cleats",
        "Soccer cleats with a synthetic upper and rubber molded cleats.",
    ),
    (
        "Basketball",
        "Basketball Shorts",
        "Mesh panels with a knee length hem. Machine wash cold.",
    ),
    (
        "Baseball",
        "Wooden Baseball Bat",
        "Wooden bat made of series 3X Ash with a Natural finish. Dimensions: 35 x 3 x 3 inches",
    ),
    (
        "Hockey",
        "Hockey Stick",
        "60\" reinforced laminated shaft with a wrapped carbon blade. Ideal street and ice hockey",
    ),
    (
        "Skating",
        "Inline Skates",
        "High quality skates with a triple buckle closure and indoor/outdoor wheels.",
    ),
    (
        "Foosball",
        "Foosball Table",
        "A popular and classic arcade game. Standard size (56\") with very little assembly.",
    ),
    (
        "Snowboarding",
        "Snowboard",
        "A snowboard with a trendy design. Has adjustable stepin bindings. Very user friendly.",
    ),
    (
        "Rock Climbing",
        "Climbing Harness",
        "Made of polyester. Fits waists from 20\" to 53\". Harness weight limited to 300KG. \
         Perfect for rock climbing and indoor climbing. Backed by a 12 month warranty.",
    ),
];

/// What [`seed_demo_catalog`] inserted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    pub user_id: i64,
    pub categories: usize,
    pub items: usize,
}

/// Fills the store with the demo owner, categories and items.
///
/// Running it twice inserts a second copy; callers seed a fresh database.
pub async fn seed_demo_catalog<S: CatalogStore + ?Sized>(store: &S) -> CatalogStoreResult<SeedSummary> {
    let owner = store
        .create_user(
            NewUser::new("Robo Barista", "tinnyTim@udacity.com").with_picture(
                "https://pbs.twimg.com/profile_images/2671170543/18debd694829ed78203a5a36dd364160_400x400.png",
            ),
        )
        .await?;

    let mut categories = Vec::with_capacity(DEMO_CATEGORIES.len());
    for name in DEMO_CATEGORIES {
        categories.push(store.create_category(name).await?);
    }

    for (category_name, name, description) in DEMO_ITEMS {
        let category = categories
            .iter()
            .find(|c| c.name == *category_name)
            .ok_or_else(|| crate::CatalogStoreError::not_found("Category", category_name))?;
        store
            .create_item(NewItem::new(*name, category.id, owner.id).with_description(*description))
            .await?;
    }

    tracing::info!(
        categories = categories.len(),
        items = DEMO_ITEMS.len(),
        "Demo catalog seeded"
    );

    Ok(SeedSummary {
        user_id: owner.id,
        categories: categories.len(),
        items: DEMO_ITEMS.len(),
    })
}
