use anyhow::Context;
use clap::Parser;
use sea_orm::Database;
use sea_orm_migration::MigratorTrait;
use tracing_subscriber::EnvFilter;

use wardrobe::config::{Cli, Command};
use wardrobe::{Migrator, build_app, seed};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("wardrobe=info,tower_http=info")),
        )
        .init();

    let cli = Cli::parse();
    let db = Database::connect(&cli.database_url)
        .await
        .with_context(|| format!("connecting to {}", cli.database_url))?;
    Migrator::up(&db, None).await.context("running migrations")?;

    match cli.command() {
        Command::Migrate => {
            tracing::info!("Migrations applied");
        }
        Command::Seed => {
            let summary = seed::run(&db).await.context("seeding database")?;
            tracing::info!(
                user_id = summary.user_id,
                categories = summary.categories,
                tags = summary.tags,
                clothing_items = summary.clothing_items,
                "Database seeded, demo login {} / {}",
                seed::DEMO_EMAIL,
                seed::DEMO_PASSWORD
            );
        }
        Command::Serve => {
            let app = build_app(&db, &cli.cors_origins());
            let listener = tokio::net::TcpListener::bind(cli.bind)
                .await
                .with_context(|| format!("binding {}", cli.bind))?;
            tracing::info!("Listening on http://{}, API docs at /docs", cli.bind);
            axum::serve(listener, app).await.context("serving HTTP")?;
        }
    }

    Ok(())
}
