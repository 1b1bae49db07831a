use anyhow::{anyhow, Context, Result};
use group_admin_bot::config::DEFAULT_DATABASE_URL;
use group_admin_bot::database::connection::{sqlite_file_path, DatabaseManager};
use group_admin_bot::database::models::{
    Channel, ChannelSeed, Group, GroupSeed, KeywordResponse, UpsertOutcome,
};
use group_admin_bot::keywords::load_overrides;
use std::env;
use std::io;
use std::path::Path;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize basic logging for the migration
    env_logger::init();
    dotenvy::dotenv().ok();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();
    let command = args.get(1).map(|s| s.as_str()).unwrap_or("migrate");
    let file_arg = args.get(2).map(Path::new);

    match (command, file_arg) {
        ("migrate" | "up", _) => run_migrations().await,
        ("check", _) => check_database().await,
        ("reset", _) => reset_database().await,
        ("seed-keywords", Some(path)) => seed_keywords(path).await,
        ("seed-groups", Some(path)) => seed_groups(path).await,
        ("seed-channels", Some(path)) => seed_channels(path).await,
        ("seed-keywords" | "seed-groups" | "seed-channels", None) => {
            eprintln!("Missing file argument for {command}");
            print_help();
            std::process::exit(1);
        }
        ("help" | "--help" | "-h", _) => {
            print_help();
            Ok(())
        }
        _ => {
            eprintln!("Unknown command: {command}");
            print_help();
            std::process::exit(1);
        }
    }
}

fn database_url() -> String {
    env::var("DATABASE_URL")
        .ok()
        .filter(|url| !url.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string())
}

async fn connect() -> Result<DatabaseManager> {
    let url = database_url();
    println!("📊 Database URL: {}", mask_url(&url));
    DatabaseManager::new(&url)
        .await
        .map_err(|e| anyhow!("Failed to connect to database: {}", e))
}

async fn run_migrations() -> Result<()> {
    println!("🔧 Group Admin Bot - Database Migration Tool");
    println!("============================================");

    let db_manager = connect().await?;

    println!("🚀 Running database migrations...");
    match db_manager.run_migrations().await {
        Ok(_) => {
            println!("✅ Migrations completed successfully!");
            println!("\n🎯 Your Group Admin Bot database is ready!");
        }
        Err(e) => {
            eprintln!("❌ Migration failed: {e}");
            std::process::exit(1);
        }
    }

    Ok(())
}

async fn check_database() -> Result<()> {
    println!("🔍 Checking database connection and schema...");

    let db_manager = connect().await?;

    match check_tables(&db_manager).await {
        Ok(tables) => {
            println!("✅ Database connection successful!");
            println!("📋 Found tables:");
            for table in tables {
                println!("  • {table}");
            }
        }
        Err(e) => {
            println!("⚠️  Database check failed: {e}");
            println!("💡 Try running 'migrate up' to create the schema");
        }
    }

    Ok(())
}

async fn reset_database() -> Result<()> {
    println!("⚠️  WARNING: This will delete ALL data in the database!");
    println!("🤔 Are you sure you want to continue? (yes/no)");

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    if input.trim().to_lowercase() != "yes" {
        println!("❌ Reset cancelled.");
        return Ok(());
    }

    let url = database_url();
    let Some(db_path) = sqlite_file_path(&url) else {
        return Err(anyhow!("Reset is only supported for file-backed SQLite databases"));
    };

    if Path::new(db_path).exists() {
        std::fs::remove_file(db_path)?;
        println!("🗑️  Deleted database file: {db_path}");
    }

    println!("🔄 Recreating database schema...");
    run_migrations().await?;

    println!("✅ Database reset completed!");
    Ok(())
}

async fn seed_keywords(path: &Path) -> Result<()> {
    let overrides = load_overrides(path)?;
    let db_manager = connect().await?;
    db_manager.run_migrations().await?;

    let (mut inserted, mut updated) = (0, 0);
    for entry in &overrides {
        match KeywordResponse::upsert(&db_manager.pool, &entry.keyword, &entry.response)
            .await
            .with_context(|| format!("Failed to save keyword '{}'", entry.keyword))?
        {
            UpsertOutcome::Inserted => inserted += 1,
            UpsertOutcome::Updated => updated += 1,
        }
    }

    println!("✅ Keyword responses seeded: {inserted} added, {updated} updated");
    Ok(())
}

async fn seed_groups(path: &Path) -> Result<()> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read group file {}", path.display()))?;
    let seeds: Vec<GroupSeed> = serde_json::from_str(&raw)
        .with_context(|| format!("Invalid group file {}", path.display()))?;

    let db_manager = connect().await?;
    db_manager.run_migrations().await?;

    for seed in &seeds {
        let group = Group::upsert(&db_manager.pool, seed)
            .await
            .with_context(|| format!("Failed to save group {}", seed.number))?;
        println!("  • {} {} ({} keywords)", group.group_number, group.name, seed.keywords.len());
    }

    println!("✅ {} directory groups seeded", seeds.len());
    Ok(())
}

async fn seed_channels(path: &Path) -> Result<()> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read channel file {}", path.display()))?;
    let seeds: Vec<ChannelSeed> = serde_json::from_str(&raw)
        .with_context(|| format!("Invalid channel file {}", path.display()))?;

    let db_manager = connect().await?;
    db_manager.run_migrations().await?;

    for seed in &seeds {
        let channel = Channel::upsert(&db_manager.pool, seed)
            .await
            .with_context(|| format!("Failed to save channel @{}", seed.username))?;
        println!("  • #{} {} (@{})", channel.display_order, channel.name, channel.username);
    }

    println!("✅ {} channels seeded", seeds.len());
    Ok(())
}

async fn check_tables(db_manager: &DatabaseManager) -> Result<Vec<String>> {
    let rows: Vec<(String,)> =
        sqlx::query_as("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
            .fetch_all(&db_manager.pool)
            .await?;

    Ok(rows.into_iter().map(|(name,)| name).collect())
}

fn mask_url(url: &str) -> String {
    match sqlite_file_path(url).and_then(|path| Path::new(path).file_name()) {
        Some(filename) => format!("sqlite:.../{}", filename.to_string_lossy()),
        None => url.to_string(),
    }
}

fn print_help() {
    println!("🤖 Group Admin Bot - Database Migration Tool");
    println!();
    println!("USAGE:");
    println!("    migrate [COMMAND] [FILE]");
    println!();
    println!("COMMANDS:");
    println!("    migrate, up            Run database migrations (default)");
    println!("    check                  Check database connection and schema");
    println!("    reset                  Reset database (SQLite only) - DESTRUCTIVE!");
    println!("    seed-keywords <FILE>   Add or update keyword replies from a JSON file");
    println!("    seed-groups <FILE>     Add or update directory groups from a JSON file");
    println!("    seed-channels <FILE>   Add or update official channels from a JSON file");
    println!("    help                   Show this help message");
    println!();
    println!("ENVIRONMENT:");
    println!("    DATABASE_URL   Database connection string (default: {DEFAULT_DATABASE_URL})");
    println!();
    println!("FILES:");
    println!("    keywords: [{{\"keyword\": \"你好\", \"response\": \"您好！\"}}]");
    println!("    groups:   [{{\"number\": \"621\", \"name\": \"...\", \"link\": \"https://t.me/...\", \"description\": \"...\", \"keywords\": [\"承兑\"]}}]");
    println!("    channels: [{{\"name\": \"好旺公群\", \"username\": \"hwgq\", \"link\": \"https://t.me/hwgq\", \"display_order\": 1}}]");
    println!();
    println!("EXAMPLES:");
    println!("    migrate                              # Run migrations");
    println!("    migrate check                        # Check database status");
    println!("    migrate seed-keywords keywords.json  # Load keyword replies");
    println!("    migrate reset                        # Reset database (careful!)");
    println!();
}
