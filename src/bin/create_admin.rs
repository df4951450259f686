//! CLI tool to create an admin user.
//!
//! Usage:
//!   cargo run --bin create-admin -- --username alice --password s3cret

use std::env;

use minimall_admin_lib::auth::password;
use minimall_admin_lib::config::Config;
use minimall_admin_lib::db::{DbPool, users};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let args: Vec<String> = env::args().collect();

    // Parse arguments
    let mut username: Option<String> = None;
    let mut password: Option<String> = None;
    let mut email: Option<String> = None;
    let mut role = "admin".to_string();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--username" | "-u" => {
                i += 1;
                if i < args.len() {
                    username = Some(args[i].clone());
                }
            }
            "--password" | "-p" => {
                i += 1;
                if i < args.len() {
                    password = Some(args[i].clone());
                }
            }
            "--email" | "-e" => {
                i += 1;
                if i < args.len() {
                    email = Some(args[i].clone());
                }
            }
            "--role" | "-r" => {
                i += 1;
                if i < args.len() {
                    role = args[i].clone();
                }
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

    // Validate required arguments
    let username = match username {
        Some(u) => u,
        None => {
            eprintln!("Error: --username is required");
            print_usage();
            std::process::exit(1);
        }
    };

    let password = match password {
        Some(p) => p,
        None => {
            eprintln!("Error: --password is required");
            print_usage();
            std::process::exit(1);
        }
    };

    if role != "admin" {
        eprintln!(
            "Note: role '{}' will not pass the admin page gate; only 'admin' opens /admin pages.",
            role
        );
    }

    // Load config and initialize database
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

    // Run migrations
    if let Err(e) = pool.run_migrations().await {
        eprintln!("Error running migrations: {}", e);
        std::process::exit(1);
    }

    // Hash the password and create the user
    let password_hash = match password::hash_password(&password) {
        Ok(h) => h,
        Err(e) => {
            eprintln!("Error hashing password: {}", e);
            std::process::exit(1);
        }
    };

    let user = match users::create(
        pool.connection(),
        &username,
        &password_hash,
        email.as_deref(),
        Some(&role),
    )
    .await
    {
        Ok(u) => u,
        Err(e) => {
            eprintln!("Error creating user: {}", e);
            std::process::exit(1);
        }
    };

    // Output
    println!();
    println!("════════════════════════════════════════════════════════════════");
    println!("  Admin User Created");
    println!("════════════════════════════════════════════════════════════════");
    println!();
    println!("  ID:       {}", user.id);
    println!("  Username: {}", user.username);
    println!("  Role:     {}", user.role.as_deref().unwrap_or(""));
    if let Some(e) = user.email {
        println!("  Email:    {}", e);
    }
    println!();
    println!("════════════════════════════════════════════════════════════════");
    println!();
}

fn print_usage() {
    eprintln!();
    eprintln!("Usage: create-admin --username <name> --password <password> [--email <email>] [--role <role>]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --username, -u  Login name (required)");
    eprintln!("  --password, -p  Password (required)");
    eprintln!("  --email, -e     Email address");
    eprintln!("  --role, -r      Role string (default: admin)");
    eprintln!("  --help, -h      Show this help");
    eprintln!();
    eprintln!("Examples:");
    eprintln!("  create-admin --username alice --password s3cret");
    eprintln!("  create-admin --username bob --password hunter2 --email bob@example.com");
    eprintln!();
}
