//! Flattening of raw TheMealDB records

use crate::mealdb::types::{NormalizedMeal, RawMeal, MAX_INGREDIENTS};

/// Restructure a raw meal into the flat shape the agent reads.
///
/// The parallel `strIngredientN` / `strMeasureN` fields are merged into a
/// single ordered list. An index is kept only when its ingredient is
/// non-blank; a missing measure leaves just the ingredient.
pub fn normalize(raw: &RawMeal) -> NormalizedMeal {
    if raw.is_empty() {
        return NormalizedMeal::default();
    }

    let ingredients = (1..=MAX_INGREDIENTS)
        .filter_map(|i| {
            let ingredient = raw.ingredient(i)?.trim();
            if ingredient.is_empty() {
                return None;
            }
            let measure = raw.measure(i).unwrap_or("").trim();
            Some(format!("{} {}", measure, ingredient).trim().to_string())
        })
        .collect();

    NormalizedMeal {
        id: raw.id().map(String::from),
        name: raw.name().map(String::from),
        category: raw.category().map(String::from),
        area: raw.area().map(String::from),
        instructions: raw.instructions().map(String::from),
        ingredients,
        tags: raw.tags().map(String::from),
        video_link: raw.video_link().map(String::from),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_record() {
        let meal = normalize(&RawMeal::default());
        assert_eq!(meal, NormalizedMeal::default());
        assert!(meal.ingredients.is_empty());
        assert!(meal.name.is_none());
    }

    #[test]
    fn test_arrabiata() {
        let raw = RawMeal::from_pairs([
            ("idMeal", "52771"),
            ("strMeal", "Spicy Arrabiata Penne"),
            ("strCategory", "Vegetarian"),
            ("strArea", "Italian"),
            ("strIngredient1", "penne"),
            ("strMeasure1", "1 lb"),
            ("strYoutube", "https://www.youtube.com/watch?v=1IszT_guI08"),
        ]);

        let meal = normalize(&raw);
        assert_eq!(meal.ingredients, vec!["1 lb penne"]);
        assert_eq!(meal.name.as_deref(), Some("Spicy Arrabiata Penne"));
        assert_eq!(
            meal.video_link.as_deref(),
            Some("https://www.youtube.com/watch?v=1IszT_guI08")
        );
        assert!(meal.tags.is_none());
    }

    #[test]
    fn test_missing_measure_has_no_leading_space() {
        let raw = RawMeal::from_pairs([("strIngredient1", "  Salt ")]);
        assert_eq!(normalize(&raw).ingredients, vec!["Salt"]);

        let raw = RawMeal::from_pairs([("strIngredient1", "Salt"), ("strMeasure1", "   ")]);
        assert_eq!(normalize(&raw).ingredients, vec!["Salt"]);
    }

    #[test]
    fn test_blank_ingredients_skipped_in_order() {
        let raw = RawMeal::from_pairs([
            ("strIngredient1", "olive oil"),
            ("strMeasure1", "1/4 cup "),
            ("strIngredient2", " "),
            ("strMeasure2", "3 cloves"),
            ("strIngredient3", ""),
            ("strIngredient4", "garlic"),
            ("strMeasure4", "3 cloves"),
        ]);

        assert_eq!(
            normalize(&raw).ingredients,
            vec!["1/4 cup olive oil", "3 cloves garlic"]
        );
    }

    #[test]
    fn test_ignores_indices_past_twenty() {
        let mut pairs: Vec<(String, String)> = (1..=25)
            .map(|i| (format!("strIngredient{}", i), format!("item {}", i)))
            .collect();
        pairs.push(("strMeasure20".to_string(), "2 tbsp".to_string()));

        let meal = normalize(&RawMeal::from_pairs(pairs));
        assert_eq!(meal.ingredients.len(), MAX_INGREDIENTS);
        assert_eq!(meal.ingredients[0], "item 1");
        assert_eq!(meal.ingredients[19], "2 tbsp item 20");
    }

    #[test]
    fn test_passthrough_fields_unchanged() {
        let raw = RawMeal::from_pairs([
            ("strInstructions", "  Boil water.\r\nAdd pasta.  "),
            ("strTags", "Pasta,Curry"),
        ]);
        let meal = normalize(&raw);
        assert_eq!(
            meal.instructions.as_deref(),
            Some("  Boil water.\r\nAdd pasta.  ")
        );
        assert_eq!(meal.tags.as_deref(), Some("Pasta,Curry"));
    }
}
