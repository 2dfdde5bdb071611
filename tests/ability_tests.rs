//! Species abilities exercised through real purchases, sales, and battles.
//!
//! Scripted single-item catalogs keep the shop deterministic so each
//! scenario isolates one ability.

use pet_arena::{FoodKind, Game, ShopCatalog, Species};

fn catalog(pet: Species, food: Option<FoodKind>) -> ShopCatalog {
    let mut c = ShopCatalog::empty();
    c.add_pet(1, pet, 1.0);
    if let Some(kind) = food {
        c.add_food(1, kind, 1.0);
    }
    c
}

#[test]
fn test_otter_feeds_its_only_friend() {
    let mut game = Game::builder()
        .seed(1)
        .catalog(catalog(Species::Otter, None))
        .pet(0, Species::Fish) // 2/3
        .build();

    assert!(game.buy(0, 1));
    let fish = game.deck().get(0).unwrap();
    assert_eq!(fish.attack(), 3);
    assert_eq!(fish.health(), 4);
    // The otter never buffs itself
    let otter = game.deck().get(1).unwrap();
    assert_eq!(otter.attack(), 1);
}

#[test]
fn test_pig_pays_out_on_sale() {
    let mut game = Game::builder().seed(1).pet(0, Species::Pig).build();
    assert!(game.sell(0));
    // Resale 3 plus the pig's own 1 gold per level
    assert_eq!(game.economy().gold(), 14);
}

#[test]
fn test_horse_buffs_every_arrival() {
    let mut game = Game::builder()
        .seed(1)
        .catalog(catalog(Species::Fish, None))
        .pet(0, Species::Horse)
        .build();

    assert!(game.buy(0, 1));
    assert!(game.buy(1, 2));
    assert_eq!(game.deck().get(1).unwrap().attack_buff(), 1);
    assert_eq!(game.deck().get(2).unwrap().attack_buff(), 1);
    assert_eq!(game.deck().get(0).unwrap().attack_buff(), 0);
}

#[test]
fn test_beaver_parting_gift() {
    let mut game = Game::builder()
        .seed(1)
        .pet(0, Species::Fish) // 2/3
        .pet(1, Species::Beaver)
        .pet(2, Species::Sloth) // 1/1
        .build();

    assert!(game.sell(1));
    // Two random friends is everyone else here
    assert_eq!(game.deck().get(0).unwrap().health(), 4);
    assert_eq!(game.deck().get(2).unwrap().health(), 2);
}

#[test]
fn test_shrimp_toasts_the_departed() {
    let mut game = Game::builder()
        .seed(1)
        .pet(0, Species::Fish) // 2/3
        .pet(1, Species::Shrimp)
        .pet(2, Species::Pig)
        .build();

    assert!(game.sell(2));
    assert_eq!(game.deck().get(0).unwrap().health(), 4);
    // The shrimp never drinks to itself
    assert_eq!(game.deck().get(1).unwrap().health(), 3);
}

#[test]
fn test_chocolate_levels_the_pig() {
    let mut game = Game::builder()
        .seed(1)
        .catalog(catalog(Species::Sloth, Some(FoodKind::Chocolate)))
        .pet(0, Species::Pig)
        .build();

    assert!(game.buy(3, 0));
    assert!(game.roll());
    assert!(game.buy(3, 0));
    let pig = game.deck().get(0).unwrap();
    assert_eq!(pig.level(), 2);
    // Leveling raises the resale value
    assert_eq!(pig.resale_value(), 4);
}

#[test]
fn test_fish_level_up_feeds_the_school() {
    let mut game = Game::builder()
        .seed(1)
        .catalog(catalog(Species::Sloth, Some(FoodKind::Chocolate)))
        .pet(0, Species::Fish)
        .pet(1, Species::Sloth) // 1/1
        .build();

    // One chocolate short of level 2
    assert!(game.buy(3, 0));
    assert_eq!(game.deck().get(0).unwrap().level(), 1);
    assert!(game.roll());
    assert!(game.buy(3, 0));

    assert_eq!(game.deck().get(0).unwrap().level(), 2);
    // The school grows by the new level
    let sloth = game.deck().get(1).unwrap();
    assert_eq!(sloth.attack(), 3);
    assert_eq!(sloth.health(), 3);
}

#[test]
fn test_cat_doubles_food() {
    let mut game = Game::builder()
        .seed(1)
        .catalog(catalog(Species::Cat, Some(FoodKind::Apple)))
        .build();

    assert!(game.buy(0, 0));
    // A level-1 cat doubles stat food
    assert!(game.buy(3, 0));
    let cat = game.deck().get(0).unwrap();
    assert_eq!(cat.attack(), 6);
    assert_eq!(cat.health(), 7);
}

#[test]
fn test_selling_the_cat_ends_the_discount() {
    let mut game = Game::builder()
        .seed(1)
        .catalog(catalog(Species::Cat, Some(FoodKind::Apple)))
        .pet(1, Species::Fish) // 2/3
        .build();

    assert!(game.buy(0, 0));
    assert!(game.sell(0));
    assert!(game.buy(3, 1));
    let fish = game.deck().get(1).unwrap();
    assert_eq!(fish.attack(), 3);
    assert_eq!(fish.health(), 4);
}

#[test]
fn test_swan_collects_at_dawn() {
    let mut a = Game::builder().seed(1).pet(0, Species::Swan).build();
    let mut b = Game::builder().seed(2).build();
    let _ = a.challenge(&mut b);
    // New turn allowance plus the swan's level in gold
    assert_eq!(a.economy().gold(), 11);
}

#[test]
fn test_giraffe_trains_at_dusk() {
    let mut a = Game::builder()
        .seed(1)
        .pet(0, Species::Fish) // 2/3
        .pet(1, Species::Giraffe)
        .build();
    let mut b = Game::builder().seed(2).build();

    let _ = a.challenge(&mut b);
    // Turn-end fires on the persistent deck, so the buff sticks
    let fish = a.deck().get(0).unwrap();
    assert_eq!(fish.attack(), 3);
    assert_eq!(fish.health(), 4);
}

#[test]
fn test_rabbit_rewards_every_diner() {
    let mut game = Game::builder()
        .seed(1)
        .catalog(catalog(Species::Sloth, Some(FoodKind::Apple)))
        .pet(0, Species::Rabbit) // 3/2
        .build();

    // The rabbit reacts to its own meal too
    assert!(game.buy(3, 0));
    let rabbit = game.deck().get(0).unwrap();
    assert_eq!(rabbit.attack(), 4);
    // +1 apple, +1 rabbit
    assert_eq!(rabbit.health(), 4);
}

#[test]
fn test_worm_savors_its_meal() {
    let mut game = Game::builder()
        .seed(1)
        .catalog(catalog(Species::Sloth, Some(FoodKind::Apple)))
        .pet(0, Species::Worm) // 2/2
        .build();

    assert!(game.buy(3, 0));
    let worm = game.deck().get(0).unwrap();
    // +1 apple, +1 own ability
    assert_eq!(worm.attack(), 4);
    assert_eq!(worm.health(), 4);
}
