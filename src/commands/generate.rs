//! Generate static files from the CMS

use anyhow::Result;

use crate::cms::CmsClient;
use crate::generator::Generator;
use crate::Comet;

/// Generate the static site
pub async fn run(comet: &Comet, preview_ref: Option<&str>) -> Result<()> {
    let start = std::time::Instant::now();

    if comet.config.api.endpoint.is_empty() {
        anyhow::bail!("api.endpoint is not configured; set it in _config.yml");
    }

    let client = CmsClient::connect(&comet.config.api).await?;
    tracing::info!(
        "Connected to {} (ref {})",
        comet.config.api.endpoint,
        preview_ref.unwrap_or_else(|| client.master_ref())
    );
    if preview_ref.is_some() {
        tracing::info!("Preview mode: rendering draft content");
    }

    let generator = Generator::new(comet)?;
    let stats = generator.generate(&client, preview_ref).await?;

    let duration = start.elapsed();
    tracing::info!(
        "Generated index and {} posts in {:.2}s",
        stats.posts,
        duration.as_secs_f64()
    );

    Ok(())
}
