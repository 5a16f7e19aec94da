//! Advertisement slides and publisher branding.
//!
//! The engine does not render anything; it only needs to know whether an
//! ad gates the main menu, for how long, and which publisher logo to
//! show next to the current question. Hosts implement [`BrandingSource`]
//! and the orchestrator caches logo lookups per publisher.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::source::SourceError;

/// One advertisement slide.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdSlide {
    pub id: u32,
    pub name: String,
    /// Creative asset location. Blank slides are undisplayable.
    pub file_url: String,
    /// Optional click-through target.
    pub link_url: Option<String>,
    /// How long the slide holds the screen.
    pub duration_seconds: u32,
}

impl AdSlide {
    /// Whether this slide can actually hold the screen.
    #[must_use]
    pub fn is_displayable(&self) -> bool {
        !self.file_url.trim().is_empty() && self.duration_seconds > 0
    }
}

/// Host-side supplier of ads and publisher logos.
pub trait BrandingSource {
    /// Slides to show before the main menu.
    fn advertisements(&mut self) -> Result<Vec<AdSlide>, SourceError>;

    /// Logo URL for a content publisher, if the platform has one.
    fn publisher_logo(&mut self, publisher_id: u32) -> Result<Option<String>, SourceError>;
}

/// Branding source with no ads and no logos. Default for offline play.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoBranding;

impl BrandingSource for NoBranding {
    fn advertisements(&mut self) -> Result<Vec<AdSlide>, SourceError> {
        Ok(Vec::new())
    }

    fn publisher_logo(&mut self, _publisher_id: u32) -> Result<Option<String>, SourceError> {
        Ok(None)
    }
}

/// Load the displayable ad slides, degrading to none on failure.
pub fn displayable_ads(source: &mut dyn BrandingSource) -> Vec<AdSlide> {
    match source.advertisements() {
        Ok(slides) => {
            let displayable: Vec<AdSlide> =
                slides.into_iter().filter(AdSlide::is_displayable).collect();
            debug!(count = displayable.len(), "loaded advertisement slides");
            displayable
        }
        Err(error) => {
            warn!(error = %error, "advertisement load failed, starting without ads");
            Vec::new()
        }
    }
}
