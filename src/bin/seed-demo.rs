//! Demo data seed script
//!
//! Wipes and reseeds the database with demo data:
//! - 12 restaurants covering the cuisine and dietary vocabulary
//! - 4 demo profiles with preferences and favorites
//! - A default "Lunch Squad" group containing everyone
//!
//! Usage:
//!   DATABASE_URL=... ./seed-demo [--keep-profiles]
//!
//! Environment variables:
//!   DATABASE_URL — PostgreSQL connection string (required)

use anyhow::{Context, Result};
use clap::Parser;
use sqlx::postgres::PgPoolOptions;
use std::env;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "seed-demo", about = "Wipe and reseed LunchSquad demo data")]
struct Args {
    /// Keep existing profiles (and their preferences/attendance); reseed
    /// restaurants only. Favorites are cleared either way since they
    /// cascade from the restaurant wipe.
    #[arg(long)]
    keep_profiles: bool,
}

// (name, description, cuisine_types, dietary_restrictions, rating)
const RESTAURANTS: &[(&str, &str, &[&str], &[&str], f64)] = &[
    ("Bella Napoli", "Wood-fired pizza and fresh pasta", &["italian"], &["vegetarian"], 4.5),
    ("Golden Dragon", "Dim sum and Cantonese classics", &["chinese"], &[], 4.0),
    ("Sakura Sushi", "Omakase counter and bento boxes", &["japanese"], &["gluten_free"], 4.6),
    ("El Camino", "Tacos, tortas and agua fresca", &["mexican"], &["vegetarian", "gluten_free"], 4.2),
    ("Taj Palace", "North Indian curries and tandoor", &["indian"], &["halal", "vegetarian", "vegan"], 4.3),
    ("Burger Barn", "Smash burgers and hand-cut fries", &["american"], &[], 3.8),
    ("Olive & Thyme", "Mezze platters and grilled fish", &["mediterranean"], &["vegetarian", "vegan", "halal"], 4.4),
    ("Green Bowl", "Salads, grain bowls and smoothies", &["american", "mediterranean"], &["vegan", "vegetarian", "gluten_free"], 4.1),
    ("Mendel's Deli", "Pastrami on rye since forever", &["american"], &["kosher"], 4.0),
    ("Little Italy", "Red-sauce joint with giant portions", &["italian"], &["vegetarian"], 3.9),
    ("Shalom Grill", "Skewers and fresh-baked laffa", &["mediterranean"], &["kosher", "halal"], 4.2),
    ("Spice Route", "Thali plates and dosa", &["indian"], &["vegetarian", "vegan", "gluten_free"], 4.4),
];

// (name, cuisine prefs, dietary prefs, favorite restaurant indices)
const PROFILES: &[(&str, &[&str], &[&str], &[usize])] = &[
    ("Alice", &["italian", "japanese"], &[], &[0, 2, 9]),
    ("Ben", &["american", "mexican"], &[], &[3, 5, 8]),
    ("Chloe", &["mediterranean", "indian"], &["vegetarian"], &[4, 6, 7, 11]),
    ("Dmitri", &["italian", "mediterranean"], &["halal"], &[4, 6, 10]),
];

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let args = Args::parse();
    let database_url = env::var("DATABASE_URL").context("DATABASE_URL required")?;

    println!("=== Seed Demo Data ===");

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .context("Failed to connect to database")?;

    // 1. Clean existing data
    println!("Cleaning existing data...");
    sqlx::query("DELETE FROM daily_restaurant_selection")
        .execute(&pool)
        .await?;
    // Cascades user_favorites
    sqlx::query("DELETE FROM restaurants").execute(&pool).await?;
    if !args.keep_profiles {
        // Cascades preferences, attendance and group memberships
        sqlx::query("DELETE FROM profiles").execute(&pool).await?;
        sqlx::query("DELETE FROM groups").execute(&pool).await?;
    }

    // 2. Restaurants
    println!("Seeding restaurants...");
    let mut restaurant_ids: Vec<Uuid> = Vec::with_capacity(RESTAURANTS.len());
    for (name, description, cuisines, dietary, rating) in RESTAURANTS {
        let cuisines: Vec<String> = cuisines.iter().map(|s| s.to_string()).collect();
        let dietary: Vec<String> = dietary.iter().map(|s| s.to_string()).collect();
        let id: Uuid = sqlx::query_scalar(
            "INSERT INTO restaurants (name, description, cuisine_types, dietary_restrictions, rating)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id",
        )
        .bind(name)
        .bind(description)
        .bind(&cuisines)
        .bind(&dietary)
        .bind(rating)
        .fetch_one(&pool)
        .await
        .with_context(|| format!("Failed to insert restaurant {name}"))?;
        restaurant_ids.push(id);
        println!("  {name}");
    }

    if args.keep_profiles {
        println!("Done. Seeded {} restaurants (profiles kept).", restaurant_ids.len());
        return Ok(());
    }

    // 3. Profiles with preferences and favorites
    println!("Seeding profiles...");
    let mut profile_ids: Vec<Uuid> = Vec::with_capacity(PROFILES.len());
    for (name, cuisines, dietary, favorites) in PROFILES {
        let user_id: Uuid =
            sqlx::query_scalar("INSERT INTO profiles (name) VALUES ($1) RETURNING id")
                .bind(name)
                .fetch_one(&pool)
                .await
                .with_context(|| format!("Failed to insert profile {name}"))?;
        profile_ids.push(user_id);

        for value in *cuisines {
            sqlx::query(
                "INSERT INTO user_preferences (user_id, preference_type, preference_value)
                 VALUES ($1, 'cuisine', $2)",
            )
            .bind(user_id)
            .bind(value)
            .execute(&pool)
            .await?;
        }
        for value in *dietary {
            sqlx::query(
                "INSERT INTO user_preferences (user_id, preference_type, preference_value)
                 VALUES ($1, 'dietary', $2)",
            )
            .bind(user_id)
            .bind(value)
            .execute(&pool)
            .await?;
        }
        for &idx in *favorites {
            sqlx::query(
                "INSERT INTO user_favorites (user_id, restaurant_id) VALUES ($1, $2)",
            )
            .bind(user_id)
            .bind(restaurant_ids[idx])
            .execute(&pool)
            .await?;
        }
        println!("  {name}: {} favorites", favorites.len());
    }

    // 4. Default group with everyone in it
    println!("Seeding default group...");
    let group_id: Uuid = sqlx::query_scalar(
        "INSERT INTO groups (name, is_default) VALUES ('Lunch Squad', TRUE) RETURNING id",
    )
    .fetch_one(&pool)
    .await?;
    for user_id in &profile_ids {
        sqlx::query("INSERT INTO group_members (group_id, user_id) VALUES ($1, $2)")
            .bind(group_id)
            .bind(user_id)
            .execute(&pool)
            .await?;
    }

    println!(
        "Done. Seeded {} restaurants and {} profiles.",
        restaurant_ids.len(),
        profile_ids.len()
    );
    Ok(())
}
