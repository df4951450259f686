//! CLI tool to backfill missing product slugs.
//!
//! Scans for products whose slug is NULL or empty, derives a slug from the
//! product name and writes it back, avoiding collisions with existing slugs.
//!
//! Usage:
//!   cargo run --bin backfill-slugs
//!   cargo run --bin backfill-slugs -- --dry-run

use std::collections::HashSet;
use std::env;

use minimall_admin_lib::config::Config;
use minimall_admin_lib::db::{DbPool, products};
use minimall_admin_lib::services::slug;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let args: Vec<String> = env::args().collect();

    let mut dry_run = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--dry-run" | "-n" => {
                dry_run = true;
            }
            "--help" | "-h" => {
                print_usage();
                return;
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
                print_usage();
                std::process::exit(1);
            }
        }
        i += 1;
    }

    // Load config and connect
    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            std::process::exit(1);
        }
    };

    let pool = match DbPool::new(&config).await {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Error connecting to database: {}", e);
            std::process::exit(1);
        }
    };

    let missing = match products::find_missing_slugs(pool.connection()).await {
        Ok(list) => list,
        Err(e) => {
            eprintln!("Error scanning products: {}", e);
            std::process::exit(1);
        }
    };

    if missing.is_empty() {
        println!("All products already have slugs.");
        return;
    }

    let existing = match products::list_slugs(pool.connection()).await {
        Ok(list) => list,
        Err(e) => {
            eprintln!("Error loading existing slugs: {}", e);
            std::process::exit(1);
        }
    };
    let mut taken: HashSet<String> = existing.into_iter().collect();

    println!(
        "{} product(s) without a slug{}",
        missing.len(),
        if dry_run { " (dry run, nothing written)" } else { "" }
    );
    println!();

    let mut assigned = 0usize;
    let mut failed = 0usize;

    for product in &missing {
        let chosen = slug::slug_for_product(&product.name, &product.id, &taken);
        taken.insert(chosen.clone());

        if dry_run {
            println!("  {} -> {}", product.name, chosen);
            assigned += 1;
            continue;
        }

        match products::set_slug(pool.connection(), &product.id, &chosen).await {
            Ok(1) => {
                println!("  {} -> {}", product.name, chosen);
                assigned += 1;
            }
            Ok(_) => {
                eprintln!("  {}: product disappeared mid-run, skipped", product.id);
                failed += 1;
            }
            Err(e) => {
                eprintln!("  {}: update failed: {}", product.id, e);
                failed += 1;
            }
        }
    }

    println!();
    println!("════════════════════════════════════════════════════════════════");
    println!("  Slug Backfill Complete");
    println!("════════════════════════════════════════════════════════════════");
    println!();
    println!("  Scanned:  {}", missing.len());
    println!("  Assigned: {}", assigned);
    println!("  Failed:   {}", failed);
    if dry_run {
        println!();
        println!("  Dry run - no changes were written.");
    }
    println!();

    if failed > 0 {
        std::process::exit(1);
    }
}

fn print_usage() {
    eprintln!();
    eprintln!("Usage: backfill-slugs [--dry-run]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --dry-run, -n  Print the slugs that would be assigned without writing");
    eprintln!("  --help, -h     Show this help");
    eprintln!();
}
