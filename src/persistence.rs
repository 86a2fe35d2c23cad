//! Model serialization and persistence
//!
//! This module provides functionality to save and load trained SVM models
//! for use with the CLI application and other scenarios where model persistence is needed.

use crate::classifier::MultiClassModel;
use crate::core::{Classifier, Label, OptimizerConfig, Result, SVMError};
use crate::kernel::KernelSpec;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// A trained model together with the metadata written next to it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerializableModel<L> {
    /// Model metadata
    pub metadata: ModelMetadata,
    /// The one-vs-one ensemble
    pub model: MultiClassModel<L>,
}

/// Model metadata for tracking and validation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMetadata {
    /// Library version used to create the model
    pub library_version: String,
    /// Creation timestamp
    pub created_at: String,
    /// Number of classes
    pub n_classes: usize,
    /// Number of support vectors, summed over pairwise models
    pub n_support_vectors: usize,
    /// Training parameters used
    pub training_params: TrainingParams,
}

/// Training parameters for reference
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingParams {
    pub kernel: KernelSpec,
    pub c: f64,
    pub epsilon: f64,
    pub max_iterations: usize,
    pub sv_tolerance: f64,
}

impl<L: Label> SerializableModel<L> {
    /// Wrap a trained model, recording the settings it was trained with
    pub fn from_trained_model(model: MultiClassModel<L>, config: &OptimizerConfig) -> Self {
        let (kernel, c) = model
            .pairs()
            .first()
            .map(|p| (*p.model.kernel(), p.model.cost()))
            .unwrap_or_default();

        Self {
            metadata: ModelMetadata {
                library_version: env!("CARGO_PKG_VERSION").to_string(),
                created_at: chrono::Utc::now().to_rfc3339(),
                n_classes: model.n_classes(),
                n_support_vectors: model.n_support_vectors(),
                training_params: TrainingParams {
                    kernel,
                    c,
                    epsilon: config.epsilon,
                    max_iterations: config.max_iterations,
                    sv_tolerance: config.sv_tolerance,
                },
            },
            model,
        }
    }

    pub fn into_model(self) -> MultiClassModel<L> {
        self.model
    }
}

impl<L: Label + Serialize> SerializableModel<L> {
    /// Save model to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path).map_err(SVMError::IoError)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)
            .map_err(|e| SVMError::SerializationError(e.to_string()))?;
        Ok(())
    }
}

impl<L: Label + DeserializeOwned> SerializableModel<L> {
    /// Load model from file
    ///
    /// The pair layout is checked so a hand-edited file cannot make
    /// prediction index out of bounds.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path).map_err(SVMError::IoError)?;
        let reader = BufReader::new(file);
        let model: Self = serde_json::from_reader(reader)
            .map_err(|e| SVMError::SerializationError(e.to_string()))?;
        model
            .model
            .validate()
            .map_err(|e| SVMError::SerializationError(format!("Invalid model: {e}")))?;
        Ok(model)
    }
}

impl<L: Label + Display> SerializableModel<L> {
    /// Print model summary
    pub fn print_summary(&self) {
        let params = &self.metadata.training_params;
        println!("=== SVM Model Summary ===");
        println!("Kernel: {}", params.kernel);
        println!("Classes: {}", join(self.model.classes()));
        println!("Pairwise Models: {}", self.model.n_models());
        println!("Support Vectors: {}", self.metadata.n_support_vectors);
        println!("Library Version: {}", self.metadata.library_version);
        println!("Created: {}", self.metadata.created_at);
        println!("Training Parameters:");
        println!("  C: {}", params.c);
        println!("  Epsilon: {}", params.epsilon);
        println!("  Max Iterations: {}", params.max_iterations);
        println!("  SV Tolerance: {:e}", params.sv_tolerance);
    }
}

fn join<L: Display>(labels: &[L]) -> String {
    labels
        .iter()
        .map(|l| l.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
