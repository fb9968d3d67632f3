use std::cmp::Ordering;

use rayon::prelude::*;
use tracing::{debug, warn};

use super::types::{RecommendationRequest, RecommendationResponse, RecommendationWarning};
use crate::{
    config::{Config, RankingConfig},
    error::{LibraryError, Result},
    features::{EnergyDirection, TrackFeatures},
    library::{CandidateFilter, KeyFilter, LibraryStore},
    scoring::{BpmWindow, CompatibilityScorer, ScoredCandidate},
};

/// Ranks library tracks as candidates to play after a source track
///
/// The ranker holds no mutable state: every call reads one candidate pool from the
/// store, scores it and returns a fresh response.
pub struct CandidateRanker<L: LibraryStore> {
    library: L,
    scorer: CompatibilityScorer,
    config: RankingConfig,
}

impl<L: LibraryStore> CandidateRanker<L> {
    /// Create a ranker over `library`, validating the configuration
    pub fn new(library: L, config: &Config) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            library,
            scorer: CompatibilityScorer::new(config.scoring.clone())?,
            config: config.ranking.clone(),
        })
    }

    pub fn library(&self) -> &L {
        &self.library
    }

    pub fn scorer(&self) -> &CompatibilityScorer {
        &self.scorer
    }

    /// Rank candidates for the request's source track
    ///
    /// Fails with a request error for malformed requests and with
    /// [`LibraryError::TrackNotFound`] when the source id is unknown. Missing
    /// features never fail: they score neutral and mark the response degraded.
    pub fn recommend(&self, request: &RecommendationRequest) -> Result<RecommendationResponse> {
        request.validate()?;

        let mut warnings = Vec::new();
        let limit = self.effective_limit(request, &mut warnings);
        let tolerance = request
            .bpm_tolerance_percent
            .unwrap_or(self.scorer.config().bpm_tolerance_percent);

        let source = self
            .library
            .get_track_features(&request.source_track_id)?
            .ok_or_else(|| LibraryError::TrackNotFound {
                id: request.source_track_id.clone(),
            })?;

        let source_missing = source.missing_features();
        if !source_missing.is_empty() {
            debug!("Source track {} is missing {:?}", source.id, source_missing);
            warnings.push(RecommendationWarning::SourceIncomplete {
                missing: source_missing,
            });
        }

        let filter = self.build_filter(request, &source, tolerance, &mut warnings);
        debug!(
            "Candidate filter for {}: {} excluded, key {:?}, bpm window {:?}",
            source.id,
            filter.exclude_ids.len(),
            filter.key_filter,
            filter.bpm_window
        );
        let mut pool = self.library.get_candidate_pool(&filter)?;
        pool.retain(|candidate| filter.matches(candidate));

        let mut scored = self.score_pool(&source, &pool, request.energy_direction, tolerance);
        let degraded = !source.is_complete() || scored.iter().any(ScoredCandidate::is_degraded);

        scored.sort_by(rank_order);
        scored.truncate(limit);

        debug!(
            "Ranked {} candidates for {} ({}), returning {}",
            pool.len(),
            source.id,
            request.energy_direction,
            scored.len()
        );

        Ok(RecommendationResponse {
            source_track_id: source.id,
            recommendations: scored,
            degraded,
            pool_size: pool.len(),
            warnings,
        })
    }

    fn effective_limit(
        &self,
        request: &RecommendationRequest,
        warnings: &mut Vec<RecommendationWarning>,
    ) -> usize {
        let requested = request.limit.unwrap_or(self.config.default_limit);
        if requested > self.config.max_limit {
            warnings.push(RecommendationWarning::LimitClamped {
                requested,
                applied: self.config.max_limit,
            });
            return self.config.max_limit;
        }
        requested
    }

    fn build_filter(
        &self,
        request: &RecommendationRequest,
        source: &TrackFeatures,
        tolerance: f64,
        warnings: &mut Vec<RecommendationWarning>,
    ) -> CandidateFilter {
        let mut filter = CandidateFilter::excluding(
            std::iter::once(source.id.clone()).chain(request.exclude_track_ids.iter().cloned()),
        );

        if request.same_key_only || request.harmonic_only {
            match source.key {
                Some(key) if request.same_key_only => filter = filter.with_key_filter(KeyFilter::Exact(key)),
                Some(key) => filter = filter.with_key_filter(KeyFilter::Harmonic(key)),
                None if request.same_key_only => {
                    warn!("Source track {} has no key, skipping same-key filter", source.id);
                    warnings.push(RecommendationWarning::SameKeyFilterSkipped);
                }
                None => {
                    warn!("Source track {} has no key, skipping harmonic filter", source.id);
                    warnings.push(RecommendationWarning::HarmonicFilterSkipped);
                }
            }
        }

        if request.bpm_window_only {
            match source.bpm {
                Some(bpm) => {
                    let window = BpmWindow::new(bpm, tolerance, self.scorer.config().half_double_time);
                    filter = filter.with_bpm_window(window);
                }
                None => {
                    warn!("Source track {} has no BPM, skipping BPM window", source.id);
                    warnings.push(RecommendationWarning::BpmWindowSkipped);
                }
            }
        }

        filter
    }

    fn score_pool(
        &self,
        source: &TrackFeatures,
        pool: &[TrackFeatures],
        direction: EnergyDirection,
        tolerance: f64,
    ) -> Vec<ScoredCandidate> {
        let score = |candidate: &TrackFeatures| {
            self.scorer.score_with_tolerance(source, candidate, direction, tolerance)
        };

        if pool.len() >= self.config.parallel_threshold {
            debug!("Scoring {} candidates in parallel", pool.len());
            pool.par_iter().map(score).collect()
        } else {
            pool.iter().map(score).collect()
        }
    }
}

/// Ranking order: composite, then BPM, then key score (all descending), then track id
pub fn rank_order(a: &ScoredCandidate, b: &ScoredCandidate) -> Ordering {
    b.composite_score
        .total_cmp(&a.composite_score)
        .then_with(|| b.bpm_score.total_cmp(&a.bpm_score))
        .then_with(|| b.key_score.total_cmp(&a.key_score))
        .then_with(|| a.track_id.cmp(&b.track_id))
}
