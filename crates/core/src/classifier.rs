//! Image-based screening.
//!
//! [`SkinClassifier`] is the seam a real model would plug into. The only implementation today,
//! [`FakeClassifier`], ignores the picture and draws one of three canned findings at random
//! (30% high, 30% medium, 40% low). Questionnaire logic never depends on this module.
//!
//! Uploads are checked before classification: [`SkinImage::from_bytes`] rejects empty files,
//! files over the configured size limit, and anything whose sniffed media type is not `image/*`.

use crate::risk::RiskLevel;
use crate::{CoreError, CoreResult};
use rand::Rng;
use serde::Serialize;

/// What a classifier reports about a skin photo.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ImageFinding {
    risk_level: RiskLevel,
    confidence: f32,
    findings: Vec<String>,
}

impl ImageFinding {
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidInput`] if `confidence` is outside `[0, 1]`.
    pub fn new(risk_level: RiskLevel, confidence: f32, findings: Vec<String>) -> CoreResult<Self> {
        if !(0.0..=1.0).contains(&confidence) {
            return Err(CoreError::InvalidInput(format!(
                "confidence must be within [0, 1], got {confidence}"
            )));
        }
        Ok(Self {
            risk_level,
            confidence,
            findings,
        })
    }

    pub fn risk_level(&self) -> RiskLevel {
        self.risk_level
    }

    pub fn confidence(&self) -> f32 {
        self.confidence
    }

    pub fn findings(&self) -> &[String] {
        &self.findings
    }
}

/// An uploaded photo that passed size and media-type checks.
#[derive(Clone, Debug)]
pub struct SkinImage {
    bytes: Vec<u8>,
    media_type: &'static str,
}

impl SkinImage {
    /// Validate raw upload bytes.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidImage`] if the upload is empty, larger than `max_bytes`, or
    /// not recognisable as an image.
    pub fn from_bytes(bytes: Vec<u8>, max_bytes: usize) -> CoreResult<Self> {
        if bytes.is_empty() {
            return Err(CoreError::InvalidImage("upload is empty".into()));
        }
        if bytes.len() > max_bytes {
            return Err(CoreError::InvalidImage(format!(
                "upload is {} bytes; the limit is {} bytes",
                bytes.len(),
                max_bytes
            )));
        }

        let kind = infer::get(&bytes).ok_or_else(|| {
            CoreError::InvalidImage("unrecognised file type; upload a JPG, PNG or similar".into())
        })?;
        if kind.matcher_type() != infer::MatcherType::Image {
            return Err(CoreError::InvalidImage(format!(
                "expected an image, got {}",
                kind.mime_type()
            )));
        }

        Ok(Self {
            bytes,
            media_type: kind.mime_type(),
        })
    }

    pub fn media_type(&self) -> &'static str {
        self.media_type
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// Something that can turn a skin photo into a finding.
pub trait SkinClassifier {
    fn classify(&self, image: &SkinImage) -> CoreResult<ImageFinding>;
}

/// Stand-in classifier: one unconditioned random draw per call.
#[derive(Clone, Copy, Debug, Default)]
pub struct FakeClassifier;

impl FakeClassifier {
    const HIGH_BAND: f64 = 0.3;
    const MEDIUM_BAND: f64 = 0.6;

    pub fn new() -> Self {
        Self
    }

    /// Map a uniform draw in `[0, 1)` to one of the canned findings.
    pub fn finding_for_draw(draw: f64) -> ImageFinding {
        if draw < Self::HIGH_BAND {
            canned(
                RiskLevel::High,
                0.85,
                &[
                    "Hypopigmented patches detected",
                    "Possible nerve involvement areas",
                    "Irregular skin texture patterns",
                ],
            )
        } else if draw < Self::MEDIUM_BAND {
            canned(
                RiskLevel::Medium,
                0.72,
                &[
                    "Slight skin discoloration observed",
                    "Texture changes in localized areas",
                    "Requires professional evaluation",
                ],
            )
        } else {
            canned(
                RiskLevel::Low,
                0.91,
                &[
                    "Normal skin pigmentation",
                    "No obvious lesions detected",
                    "Regular monitoring recommended",
                ],
            )
        }
    }

    /// Draw a finding from the supplied generator.
    pub fn classify_with<R: Rng + ?Sized>(&self, rng: &mut R) -> ImageFinding {
        Self::finding_for_draw(rng.gen::<f64>())
    }
}

impl SkinClassifier for FakeClassifier {
    fn classify(&self, image: &SkinImage) -> CoreResult<ImageFinding> {
        let finding = self.classify_with(&mut rand::thread_rng());
        tracing::debug!(
            media_type = image.media_type(),
            bytes = image.len(),
            risk_level = %finding.risk_level(),
            "fake classifier produced finding"
        );
        Ok(finding)
    }
}

fn canned(risk_level: RiskLevel, confidence: f32, findings: &[&str]) -> ImageFinding {
    ImageFinding {
        risk_level,
        confidence,
        findings: findings.iter().map(|f| f.to_string()).collect(),
    }
}
