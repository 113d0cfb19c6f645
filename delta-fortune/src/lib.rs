//! Delta Fortune Engine
//!
//! Deterministic five-element fortune scoring for operators, containers, map
//! zones and skin draws. This crate holds every rule and lookup table without
//! any I/O; reference data reaches it through a [`DataLoader`].

pub mod calendar;
pub mod constants;
pub mod containers;
pub mod data;
pub mod divination;
pub mod draw;
pub mod element;
pub mod numbers;
pub mod report;
pub mod wealth;
pub mod zones;

// Re-exports for convenience
pub use calendar::{CalendarFacets, LunarDate, StemBranch, StemBranchReading, TimeSlot};
pub use containers::{ContainerAnalysis, ContainerFortune, ContainerScore, recommend_containers};
pub use data::{
    BundledLoader, Container, ContainerCatalog, GameMap, MapCatalog, MapZone, Operator,
    OperatorRoster, ReferenceData,
};
pub use divination::{PalaceReading, PlumBlossomReading};
pub use draw::{ConfigError, SkinDrawConfig, SkinFortune};
pub use element::{BonusTier, Element, ElementInteraction, compatibility};
pub use report::{AnalysisCategory, CategoryAnalysis, ComprehensiveAnalysis, FortuneReport};
pub use wealth::WealthAnalysis;
pub use zones::{ZoneRanking, ZoneRecommendation, ZoneScore, ZoneTier};

use chrono::NaiveDateTime;
use log::{debug, error, warn};
use thiserror::Error;

/// Trait for abstracting reference data loading
/// Platform-specific implementations should provide this
pub trait DataLoader {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load the operator roster
    ///
    /// # Errors
    ///
    /// Returns an error if the roster cannot be loaded or parsed.
    fn load_operators(&self) -> Result<OperatorRoster, Self::Error>;

    /// Load maps and their zones
    ///
    /// # Errors
    ///
    /// Returns an error if the map catalog cannot be loaded or parsed.
    fn load_maps(&self) -> Result<MapCatalog, Self::Error>;

    /// Load the container catalog
    ///
    /// # Errors
    ///
    /// Returns an error if the container catalog cannot be loaded or parsed.
    fn load_containers(&self) -> Result<ContainerCatalog, Self::Error>;

    /// Load a draw configuration override, if the source has one
    ///
    /// # Errors
    ///
    /// Returns an error if an override exists but cannot be read.
    fn load_draw_config(&self) -> Result<Option<SkinDrawConfig>, Self::Error> {
        Ok(None)
    }
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to load {dataset}: {source}")]
    Dataset {
        dataset: &'static str,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    #[error(transparent)]
    InvalidConfig(#[from] ConfigError),
}

impl LoadError {
    fn dataset<E>(dataset: &'static str) -> impl FnOnce(E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        move |source| Self::Dataset {
            dataset,
            source: Box::new(source),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FortuneError {
    #[error("reference data is not loaded")]
    DataNotReady,
    #[error("no operator with codename `{codename}`")]
    EntityNotFound { codename: String },
}

/// Read-only inputs shared by every scorer for one call.
#[derive(Debug, Clone, Copy)]
pub struct FortuneContext<'a> {
    pub data: &'a ReferenceData,
    pub draw: &'a SkinDrawConfig,
}

type ReadyListener = Box<dyn FnMut(&ReferenceData)>;

/// Main engine: loads reference data once, then answers fortune queries
pub struct FortuneEngine<L>
where
    L: DataLoader,
{
    loader: L,
    data: Option<ReferenceData>,
    draw: SkinDrawConfig,
    ready_listeners: Vec<ReadyListener>,
}

impl<L> FortuneEngine<L>
where
    L: DataLoader,
{
    /// Create an engine that has not loaded anything yet
    pub fn new(loader: L) -> Self {
        Self {
            loader,
            data: None,
            draw: SkinDrawConfig::default(),
            ready_listeners: Vec::new(),
        }
    }

    /// Load every dataset and mark the engine ready
    ///
    /// On failure the previous state is kept; a never-loaded engine stays not
    /// ready until a later `load` succeeds.
    ///
    /// # Errors
    ///
    /// Returns the first dataset that failed to load, or an invalid draw
    /// configuration.
    pub fn load(&mut self) -> Result<(), LoadError> {
        match self.fetch() {
            Ok((data, draw)) => {
                debug!(
                    "loaded {} operators, {} zones, {} containers",
                    data.operators.operators.len(),
                    data.maps.zone_count(),
                    data.containers.containers.len()
                );
                let data: &ReferenceData = self.data.insert(data);
                self.draw = draw;
                for listener in &mut self.ready_listeners {
                    listener(data);
                }
                Ok(())
            }
            Err(err) => {
                error!("fortune data load failed: {err}");
                Err(err)
            }
        }
    }

    fn fetch(&self) -> Result<(ReferenceData, SkinDrawConfig), LoadError> {
        let operators = self
            .loader
            .load_operators()
            .map_err(LoadError::dataset("operators"))?;
        let maps = self.loader.load_maps().map_err(LoadError::dataset("maps"))?;
        let containers = self
            .loader
            .load_containers()
            .map_err(LoadError::dataset("containers"))?;
        let draw = self
            .loader
            .load_draw_config()
            .map_err(LoadError::dataset("skin draw config"))?
            .unwrap_or_default();
        draw.validate()?;
        Ok((ReferenceData::new(operators, maps, containers), draw))
    }

    #[must_use]
    pub const fn is_ready(&self) -> bool {
        self.data.is_some()
    }

    /// Register a callback run after every successful load
    pub fn on_ready<F>(&mut self, listener: F)
    where
        F: FnMut(&ReferenceData) + 'static,
    {
        self.ready_listeners.push(Box::new(listener));
    }

    #[must_use]
    pub const fn data(&self) -> Option<&ReferenceData> {
        self.data.as_ref()
    }

    #[must_use]
    pub const fn draw_config(&self) -> &SkinDrawConfig {
        &self.draw
    }

    /// Borrow the loaded data as a scoring context
    ///
    /// # Errors
    ///
    /// Returns [`FortuneError::DataNotReady`] before a successful load.
    pub fn context(&self) -> Result<FortuneContext<'_>, FortuneError> {
        match &self.data {
            Some(data) => Ok(FortuneContext {
                data,
                draw: &self.draw,
            }),
            None => {
                warn!("fortune requested before reference data was loaded");
                Err(FortuneError::DataNotReady)
            }
        }
    }

    /// Full daily report for one operator
    ///
    /// # Errors
    ///
    /// Returns an error if data is not loaded or the operator is unknown.
    pub fn compute_daily_fortune(
        &self,
        codename: &str,
        category: AnalysisCategory,
        at: NaiveDateTime,
    ) -> Result<FortuneReport, FortuneError> {
        let ctx = self.context()?;
        report::build_report(&ctx, codename, category, at).inspect_err(|err| warn!("{err}"))
    }

    /// Container analysis and top picks for an element
    ///
    /// # Errors
    ///
    /// Returns [`FortuneError::DataNotReady`] before a successful load.
    pub fn container_recommendations(
        &self,
        entity: Element,
        at: NaiveDateTime,
    ) -> Result<ContainerFortune, FortuneError> {
        let ctx = self.context()?;
        let facets = CalendarFacets::derive(at);
        Ok(containers::container_fortune(
            entity,
            &facets,
            &ctx.data.containers.containers,
        ))
    }

    /// Skin draw odds for an element
    ///
    /// # Errors
    ///
    /// Returns [`FortuneError::DataNotReady`] before a successful load.
    pub fn skin_fortune(
        &self,
        entity: Element,
        at: NaiveDateTime,
    ) -> Result<SkinFortune, FortuneError> {
        let ctx = self.context()?;
        Ok(draw::skin_fortune(ctx.draw, entity, &CalendarFacets::derive(at)))
    }
}
