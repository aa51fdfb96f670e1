use dotenvy::dotenv;
use postpartum_ease::{app::App, config, core::mood::mood_description, errors::Result};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; env vars can also be set externally
    dotenv().ok();

    // 3. Load configuration (file is optional)
    let app_config = config::load_default_config()
        .inspect_err(|e| error!("Failed to load configuration: {}", e))?;

    // 4. Open the primary store; without it nothing else can run
    let app = App::open(&app_config)
        .await
        .inspect(|_| info!("Local store opened successfully."))
        .inspect_err(|e| error!("Failed to open local store: {}", e))?;

    if !app.store().onboarding_completed().await? {
        info!("Onboarding has not been completed yet.");
        return Ok(());
    }

    // 5. Log what the home screen would show
    if let Some(summary) = app.home_loader().refresh().await? {
        match &summary.user {
            Some(user) => info!(
                "{}: day {} postpartum, {} of {} milestones reached",
                user.name,
                summary.days_postpartum,
                summary.milestones.iter().filter(|m| m.completed).count(),
                summary.milestones.len()
            ),
            None => info!("No active profile."),
        }
        if let Some(mood) = &summary.latest_mood {
            info!(
                "Latest mood: {} ({}) on {}",
                mood_description(mood.mood_rating),
                mood.mood_rating,
                mood.date
            );
        }
    }

    Ok(())
}
