//! The engine: one initialization phase, then read-only requests.
//!
//! [`Engine::initialize`] fetches the price panel and classifies the universe
//! into volatility tiers. The result is immutable and shared through `Arc`,
//! so an `Engine` is cheap to clone and safe to use from many tasks.

use crate::analyzer::PortfolioAnalyzer;
use crate::config::EngineConfig;
use crate::error::{AnalysisError, Result};
use crate::universe::{StaticUniverse, Universe};
use hearth_data::{PanelBuilder, PricePanel, PriceSource};
use hearth_factors::{HistoricalVolatility, VolatilityClassifier, VolatilityTier, VolatilityTiers};
use hearth_output::AnalysisResult;
use hearth_risk::{Household, RiskProfile};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

type AnalysisOutcome<T> = std::result::Result<T, AnalysisError>;

/// Classifies households and analyzes the matching tier portfolios.
#[derive(Debug, Clone)]
pub struct Engine {
    config: Arc<EngineConfig>,
    tiers: Arc<VolatilityTiers>,
    analyzer: PortfolioAnalyzer,
}

impl Engine {
    /// Fetch prices for the configured universe and build the engine.
    pub async fn initialize<S>(source: &S, config: EngineConfig) -> Result<Self>
    where
        S: PriceSource + ?Sized,
    {
        Self::initialize_with_progress(source, config, |_, _| {}).await
    }

    /// Like [`Self::initialize`], reporting each fetched ticker to `progress`.
    pub async fn initialize_with_progress<S, F>(
        source: &S,
        config: EngineConfig,
        progress: F,
    ) -> Result<Self>
    where
        S: PriceSource + ?Sized,
        F: Fn(&str, bool),
    {
        config.validate()?;

        let universe = universe_for(&config);
        let panel = PanelBuilder::new(config.window.start, config.window.end, &config.market_ticker)
            .with_concurrency(config.fetch.concurrency)
            .with_retries(config.fetch.max_retries, config.fetch.retry_delay())
            .build_with_progress(source, &universe.symbols(), progress)
            .await?;

        Self::from_panel(panel, config)
    }

    /// Build the engine from an already-assembled panel.
    pub fn from_panel(panel: PricePanel, config: EngineConfig) -> Result<Self> {
        config.validate()?;

        let classifier = VolatilityClassifier::new(
            HistoricalVolatility::with_config(config.volatility),
            config.tiers,
        )?;
        let tiers = classifier.classify(&panel)?;

        for tier in VolatilityTier::ALL {
            info!(tier = %tier, tickers = tiers.members(tier).len(), "tier classified");
        }
        if !tiers.unclassified().is_empty() {
            warn!(
                tickers = ?tiers.unclassified(),
                "tickers left unclassified for lack of price history"
            );
        }
        if !panel.unavailable().is_empty() {
            warn!(tickers = ?panel.unavailable(), "tickers excluded as unavailable");
        }

        let panel = Arc::new(panel);
        let analyzer = PortfolioAnalyzer::new(panel, &config);
        Ok(Self {
            config: Arc::new(config),
            tiers: Arc::new(tiers),
            analyzer,
        })
    }

    /// The configuration the engine was built with.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The shared price panel.
    pub fn panel(&self) -> &PricePanel {
        self.analyzer.panel()
    }

    /// All three tiers.
    pub fn tiers(&self) -> &VolatilityTiers {
        &self.tiers
    }

    /// Classify a household into a risk profile.
    pub fn classify(&self, household: &Household) -> RiskProfile {
        hearth_risk::classify(household)
    }

    /// Analyze the portfolio for a tier, or for a profile's tier.
    pub fn analyze(&self, tier: impl Into<VolatilityTier>) -> AnalysisOutcome<AnalysisResult> {
        let tier = tier.into();
        let tickers = self.tiers.tickers(tier);
        self.analyzer.analyze(portfolio_name(tier), &tickers)
    }

    /// Analyze the portfolio for a profile label such as `"moderate"`.
    ///
    /// An unrecognized label is analyzed as the stable tier.
    pub fn analyze_label(&self, label: &str) -> AnalysisOutcome<AnalysisResult> {
        self.analyze(resolve_label(label))
    }

    /// Classify a household and analyze its portfolio.
    pub fn analyze_household(
        &self,
        household: &Household,
    ) -> AnalysisOutcome<(RiskProfile, AnalysisResult)> {
        let profile = self.classify(household);
        info!(profile = %profile, "household classified");
        Ok((profile, self.analyze(profile)?))
    }

    /// Analyze under the configured timeout, if one is set.
    pub async fn analyze_bounded(
        &self,
        tier: impl Into<VolatilityTier>,
    ) -> AnalysisOutcome<AnalysisResult> {
        match self.config.analysis_timeout() {
            Some(limit) => self.analyze_with_timeout(tier, limit).await,
            None => self.analyze(tier),
        }
    }

    /// Analyze on the blocking pool, giving up after `limit`.
    pub async fn analyze_with_timeout(
        &self,
        tier: impl Into<VolatilityTier>,
        limit: Duration,
    ) -> AnalysisOutcome<AnalysisResult> {
        let tier = tier.into();
        let engine = self.clone();
        let task = tokio::task::spawn_blocking(move || engine.analyze(tier));

        match tokio::time::timeout(limit, task).await {
            Ok(Ok(result)) => result,
            Ok(Err(e)) => Err(AnalysisError::Task(e.to_string())),
            Err(_) => Err(AnalysisError::Timeout(limit)),
        }
    }
}

/// Profile for a label such as `"moderate"`; unrecognized labels resolve to
/// conservative.
pub fn resolve_label(label: &str) -> RiskProfile {
    label.parse::<RiskProfile>().unwrap_or_else(|e| {
        warn!(label, error = %e, "falling back to conservative portfolio");
        RiskProfile::Conservative
    })
}

/// Display name of the portfolio built from a tier.
pub const fn portfolio_name(tier: VolatilityTier) -> &'static str {
    match tier {
        VolatilityTier::Stable => RiskProfile::Conservative.title(),
        VolatilityTier::Middle => RiskProfile::Moderate.title(),
        VolatilityTier::Growth => RiskProfile::Aggressive.title(),
    }
}

fn universe_for(config: &EngineConfig) -> StaticUniverse {
    config.universe.as_ref().map_or_else(StaticUniverse::large_cap, |symbols| {
        StaticUniverse::from_symbols(symbols)
    })
}
