use clap::{Parser, ValueEnum};
use tracing::info;

use blog_migrate::config::Config;
use blog_migrate::contentful::{ManagementClient, PreviewClient};
use blog_migrate::legacy::LegacyDb;
use blog_migrate::migrate::{self, MigrateError, MigrationContext};

#[derive(Parser)]
#[command(
    name = "blog-migrate",
    version,
    about = "Migrate legacy blog content into the hosted content platform"
)]
struct Cli {
    /// Entity type to migrate
    #[arg(value_enum)]
    entity: Entity,
    /// Migrate a single legacy record instead of the full set
    id: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Entity {
    Posts,
    Authors,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("ERROR: {}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), MigrateError> {
    let config = Config::from_env()?;

    let legacy = LegacyDb::connect(&config.mysql_url).await?;
    let management = ManagementClient::new(&config);
    let preview = PreviewClient::new(&config);
    let mut ctx = MigrationContext::new(config, legacy, management, preview);

    match (cli.entity, cli.id) {
        (Entity::Posts, Some(id)) => migrate::posts::create_one(&mut ctx, id).await?,
        (Entity::Posts, None) => migrate::posts::create_all(&mut ctx).await?,
        (Entity::Authors, Some(id)) => migrate::authors::create_one(&mut ctx, id).await?,
        (Entity::Authors, None) => migrate::authors::create_all(&mut ctx).await?,
    }

    info!("Migration run complete");
    Ok(())
}
