use cucumber::{then, when};
use drinks_engine::{
    db_types::{Ingredient, NewDrink},
    CatalogError,
};

use crate::cucumber::CatalogWorld;

/// Parses "water:blue:1, milk:white:2" into a list of ingredients
fn ingredients(list: &str) -> Vec<Ingredient> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            let parts = s.split(':').collect::<Vec<_>>();
            assert_eq!(parts.len(), 3, "Ingredients are written as name:color:parts, got {s}");
            let amount = parts[2].parse::<i64>().expect("parts must be an integer");
            Ingredient::new(parts[0], parts[1], amount)
        })
        .collect()
}

#[when(expr = "I add a drink called {string} made of {string}")]
async fn add_drink(world: &mut CatalogWorld, title: String, recipe: String) {
    let drink = NewDrink::new(title.clone(), ingredients(&recipe));
    let result = world.api().create(drink).await;
    match result {
        Ok(id) => {
            world.ids.insert(title, id);
            world.last_error = None;
        },
        Err(e) => world.last_error = Some(e),
    }
}

#[when(expr = "I change {string} into {string} made of {string}")]
async fn change_drink(world: &mut CatalogWorld, old_title: String, title: String, recipe: String) {
    let id = world.id_of(&old_title);
    let drink = NewDrink::new(title.clone(), ingredients(&recipe));
    let result = world.api().update(id, drink).await;
    match result {
        Ok(_) => {
            world.ids.remove(&old_title);
            world.ids.insert(title, id);
            world.last_error = None;
        },
        Err(e) => world.last_error = Some(e),
    }
}

#[when(expr = "I change drink #{int} into {string} made of {string}")]
async fn change_drink_by_id(world: &mut CatalogWorld, id: i64, title: String, recipe: String) {
    let drink = NewDrink::new(title, ingredients(&recipe));
    world.last_error = world.api().update(id, drink).await.err();
}

#[when(expr = "I remove {string}")]
async fn remove_drink(world: &mut CatalogWorld, title: String) {
    let id = world.id_of(&title);
    world.last_error = world.api().delete(id).await.err();
}

#[then(expr = "the menu lists {int} drink(s)")]
async fn menu_size(world: &mut CatalogWorld, count: usize) {
    let menu = world.api().list_short().await.expect("Error fetching menu");
    assert_eq!(menu.len(), count, "Menu was {menu:?}");
}

#[then(expr = "the menu shows {string} with a {string} {string} ingredient")]
async fn menu_shows(world: &mut CatalogWorld, title: String, color: String, name: String) {
    let menu = world.api().list_short().await.expect("Error fetching menu");
    let drink = menu.iter().find(|d| d.title == title).unwrap_or_else(|| panic!("{title} is not on the menu"));
    assert!(drink.recipe.iter().any(|i| i.name == name && i.color == color), "Recipe was {:?}", drink.recipe);
}

#[then(expr = "the detailed menu shows {string} with {int} part(s) of {string}")]
async fn detail_shows(world: &mut CatalogWorld, title: String, parts: i64, name: String) {
    let menu = world.api().list_long().await.expect("Error fetching detailed menu");
    let drink = menu.iter().find(|d| d.title == title).unwrap_or_else(|| panic!("{title} is not on the menu"));
    let ingredient = drink
        .recipe
        .ingredients()
        .iter()
        .find(|i| i.name == name)
        .unwrap_or_else(|| panic!("{title} has no {name}"));
    assert_eq!(ingredient.parts, parts);
}

#[then(expr = "the request is rejected as {word}")]
async fn rejected_as(world: &mut CatalogWorld, kind: String) {
    let err = world.last_error.take().expect("The last request should have failed");
    let matched = match kind.as_str() {
        "invalid" => matches!(err, CatalogError::InvalidDrink(_)),
        "missing" => matches!(err, CatalogError::DrinkNotFound(_)),
        "duplicate" => matches!(err, CatalogError::DuplicateTitle(_)),
        other => panic!("Unknown rejection kind: {other}"),
    };
    assert!(matched, "Expected a {kind} error, got {err}");
}
