//! End-to-end document analysis
//!
//! Ingestion, OCR, field extraction, scoring, cross-reference and decision run
//! in sequence for each document. [`Pipeline::analyze`] always returns a
//! complete report: a stage failure becomes the conservative fallback report.

use crate::cross_reference::{CrossReference, CrossReferenceInput, FraudSignal};
use crate::decision::{decide, final_recommendation, requires_manual_review, risk_level};
use crate::error::PipelineError;
use crate::extractors::{extract_fields, ExtractedRecord};
use crate::ocr::{OcrEngine, ProgressFn, TextExtractor};
use crate::policy::Policy;
use crate::schema::DocumentTypeSchema;
use crate::scoring::{ScoreCard, Scorer};
use chrono::{DateTime, Utc};
use shared_pdf::{NormalizedPage, Normalizer};
use shared_types::{
    AnalysisReport, AnalysisResult, DocumentInput, ExtractionResult, FraudResult, KeyFieldMap,
    ListingRecord, VerificationStatus,
};
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{debug, info, instrument, warn};

/// One document plus the listing it was uploaded against
pub type BatchJob = (DocumentInput, Option<ListingRecord>);

#[derive(Clone)]
pub struct Pipeline {
    normalizer: Normalizer,
    extractor: TextExtractor,
    policy: Arc<Policy>,
}

impl Pipeline {
    pub fn new(normalizer: Normalizer, engine: Arc<dyn OcrEngine>, policy: Policy) -> Self {
        let normalizer = normalizer.with_render_scale(policy.ingest.render_scale);
        let extractor = TextExtractor::new(engine, &policy.ocr);
        Self {
            normalizer,
            extractor,
            policy: Arc::new(policy),
        }
    }

    pub fn policy(&self) -> &Policy {
        &self.policy
    }

    /// Analyze one document against the current time
    pub async fn analyze(
        &self,
        input: &DocumentInput,
        listing: Option<&ListingRecord>,
    ) -> AnalysisReport {
        self.analyze_with(input, listing, Utc::now(), None).await
    }

    /// Analyze one document with an explicit reference time and OCR progress callback
    #[instrument(skip_all, fields(document_type = %input.document_type, mime = %input.mime_type))]
    pub async fn analyze_with(
        &self,
        input: &DocumentInput,
        listing: Option<&ListingRecord>,
        now: DateTime<Utc>,
        progress: Option<ProgressFn>,
    ) -> AnalysisReport {
        match self.run(input, listing, now, progress).await {
            Ok(report) => report,
            Err(e) => {
                warn!(error = %e, "analysis failed, returning fallback report");
                self.fallback_report(&e.to_string())
            }
        }
    }

    /// Analyze many documents concurrently; reports come back in input order
    #[instrument(skip_all, fields(jobs = jobs.len()))]
    pub async fn analyze_batch(&self, jobs: Vec<BatchJob>) -> Vec<AnalysisReport> {
        let now = Utc::now();
        let total = jobs.len();
        let mut set = JoinSet::new();

        for (index, (input, listing)) in jobs.into_iter().enumerate() {
            let pipeline = self.clone();
            set.spawn(async move {
                let report = pipeline
                    .analyze_with(&input, listing.as_ref(), now, None)
                    .await;
                (index, report)
            });
        }

        let mut reports: Vec<Option<AnalysisReport>> = (0..total).map(|_| None).collect();
        while let Some(joined) = set.join_next().await {
            match joined {
                Ok((index, report)) => reports[index] = Some(report),
                Err(e) => warn!(error = %e, "batch analysis task failed"),
            }
        }

        reports
            .into_iter()
            .map(|report| {
                report.unwrap_or_else(|| self.fallback_report("Analysis task did not complete"))
            })
            .collect()
    }

    async fn run(
        &self,
        input: &DocumentInput,
        listing: Option<&ListingRecord>,
        now: DateTime<Utc>,
        progress: Option<ProgressFn>,
    ) -> Result<AnalysisReport, PipelineError> {
        // PDF parsing and rendering are CPU-bound, keep them off the executor
        let normalizer = self.normalizer.clone();
        let bytes = input.file_bytes.clone();
        let mime_type = input.mime_type.clone();
        let page_number = input.page_number;
        let NormalizedPage { raster, metadata } = tokio::task::spawn_blocking(move || {
            normalizer.normalize(&bytes, &mime_type, page_number)
        })
        .await
        .map_err(|e| PipelineError::WorkerFailed(e.to_string()))??;
        debug!(
            page_count = metadata.page_count,
            width = raster.width(),
            height = raster.height(),
            "normalized upload"
        );

        let extraction = self.extractor.extract(raster, progress).await;
        let record = extract_fields(&extraction, &input.document_type);
        let schema = DocumentTypeSchema::for_type(&input.document_type);

        let card = Scorer::new(&self.policy).score(&input.declared_fields, &record, &schema, now);
        let signals = CrossReference::check(
            &CrossReferenceInput {
                record: &record,
                declared: &input.declared_fields,
                listing,
                modified_at: input.last_modified.or(metadata.modified_at),
                now,
            },
            &self.policy.checks,
        );

        Ok(self.assemble(extraction, record, card, signals))
    }

    fn assemble(
        &self,
        extraction: ExtractionResult,
        record: ExtractedRecord,
        card: ScoreCard,
        signals: Vec<FraudSignal>,
    ) -> AnalysisReport {
        let ScoreCard { scores, findings } = card;
        let (status, rule) = decide(&scores, &self.policy.decision);
        let risk_score = scores.fraud_risk;
        let level = risk_level(risk_score, &self.policy.risk_buckets);

        let mut fraud_recommendations: Vec<String> = Vec::new();
        for recommendation in signals.iter().filter_map(FraudSignal::recommendation) {
            if !fraud_recommendations.iter().any(|r| r == recommendation) {
                fraud_recommendations.push(recommendation.to_string());
            }
        }

        debug!(%rule, "decision rule fired");
        info!(
            status = %status,
            risk = %level,
            confidence = scores.confidence,
            indicators = signals.len(),
            "document analyzed"
        );

        AnalysisReport {
            extracted_text: extraction,
            key_fields: record.key_fields,
            analysis: AnalysisResult {
                authenticity: scores.authenticity,
                completeness: scores.completeness,
                fraud_risk: scores.fraud_risk,
                confidence: scores.confidence,
                weighted_score: scores.weighted_score,
                issues: findings.issues,
                recommendations: findings.recommendations,
                verification_status: status,
            },
            fraud: FraudResult {
                risk_level: level,
                risk_score,
                fraud_indicators: signals.iter().map(FraudSignal::indicator).collect(),
                recommendations: fraud_recommendations,
                requires_manual_review: requires_manual_review(risk_score, &self.policy.decision),
            },
            final_recommendation: final_recommendation(status, level).to_string(),
        }
    }

    /// Conservative report used whenever a run cannot complete
    pub fn fallback_report(&self, reason: &str) -> AnalysisReport {
        let risk_score = 100;
        let level = risk_level(risk_score, &self.policy.risk_buckets);
        let status = VerificationStatus::NeedsReview;

        AnalysisReport {
            extracted_text: ExtractionResult::default(),
            key_fields: KeyFieldMap::new(),
            analysis: AnalysisResult {
                authenticity: 0,
                completeness: 0,
                fraud_risk: 100,
                confidence: 0,
                weighted_score: 0,
                issues: vec![format!("Analysis failed: {}", reason)],
                recommendations: vec!["Manually review the original document".to_string()],
                verification_status: status,
            },
            fraud: FraudResult {
                risk_level: level,
                risk_score,
                fraud_indicators: Vec::new(),
                recommendations: Vec::new(),
                requires_manual_review: true,
            },
            final_recommendation: final_recommendation(status, level).to_string(),
        }
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("normalizer", &self.normalizer)
            .field("extractor", &self.extractor)
            .finish()
    }
}
