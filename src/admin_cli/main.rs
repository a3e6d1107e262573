use anyhow::{Context, Result, bail};
use chrono::Utc;
use clap::{Parser, Subcommand};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};

use fieldtrack::api::{admin::functions::load_system_stats, validation};
use fieldtrack::config::Config;
use fieldtrack::database::{
    self,
    models::users,
    schema,
    types::{LogLevel, Role, SubscriptionStatus},
};
use fieldtrack::services::{
    audit,
    auth::AuthService,
    seed::{SeedOutcome, ensure_admin},
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None, verbatim_doc_comment)]
/// Command line administration for FieldTrack.
/// Creates the schema, seeds accounts and prints platform stats.
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Creates every table that does not exist yet.
    Schema,
    /// Creates the bootstrap admin from SEED_ADMIN_* (no-op when it exists).
    SeedAdmin,
    /// Creates an owner account with an active subscription.
    CreateOwner {
        #[arg(short, long)]
        name: String,

        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        password: String,
    },
    /// Prints platform-wide counters as JSON.
    Stats,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("warn"));

    let cli = Cli::parse();
    let config = Config::from_env().context("Failed to load configuration")?;
    let db = database::connect().await.context("Failed to connect to database")?;

    match cli.command {
        Commands::Schema => {
            schema::create_tables(&db).await?;
            println!("Schema is up to date");
        }
        Commands::SeedAdmin => {
            schema::create_tables(&db).await?;
            let auth = AuthService::from_config(&config)?;
            let seed = config.seed_admin();
            match ensure_admin(&db, &auth, &seed).await? {
                SeedOutcome::Created(id) => println!("Created admin {} (id {})", seed.email, id),
                SeedOutcome::AlreadyExists(id) => {
                    println!("Admin {} already exists (id {})", seed.email, id)
                }
            }
        }
        Commands::CreateOwner {
            name,
            email,
            password,
        } => {
            let email = validation::require_email(Some(&email))?;
            let name = validation::require_text("name", Some(&name), validation::MAX_NAME_LEN)?;
            let password = validation::require_password(Some(&password))?;

            let exists = users::Entity::find()
                .filter(users::Column::Email.eq(email.clone()))
                .one(&db)
                .await?
                .is_some();
            if exists {
                bail!("User with email {} already exists", email);
            }

            let auth = AuthService::from_config(&config)?;
            let owner = users::ActiveModel {
                name: Set(name),
                email: Set(email),
                password_hash: Set(auth.hash_password(&password)?),
                role: Set(Role::Owner),
                is_on_duty: Set(false),
                subscription_status: Set(Some(SubscriptionStatus::Active)),
                created_at: Set(Utc::now()),
                ..Default::default()
            }
            .insert(&db)
            .await?;

            audit::record(
                &db,
                LogLevel::Info,
                format!("Owner {} created from admin CLI", owner.email),
                None,
            )
            .await?;
            println!("Created owner {} (id {})", owner.email, owner.id);
        }
        Commands::Stats => {
            let stats = load_system_stats(&db).await?;
            println!(
                "{}",
                serde_json::to_string_pretty(&stats).context("Failed to render stats")?
            );
        }
    }

    Ok(())
}
