use crate::api::EchoAnalysis;
use crate::error::NotApplicable;
use crate::types::MetadataRecord;
use std::fmt;
use std::path::Path;

/// Text report formatter for one analyzed file
pub struct TextReport<'a> {
    metadata: &'a MetadataRecord,
    analysis: &'a EchoAnalysis,
    path: Option<&'a Path>,
}

impl<'a> TextReport<'a> {
    /// Creates a new text report
    pub fn new(metadata: &'a MetadataRecord, analysis: &'a EchoAnalysis) -> Self {
        Self {
            metadata,
            analysis,
            path: None,
        }
    }

    /// Builder: Show the source file
    pub fn with_path(mut self, path: &'a Path) -> Self {
        self.path = Some(path);
        self
    }
}

fn not_applicable(f: &mut fmt::Formatter<'_>, reason: &NotApplicable) -> fmt::Result {
    writeln!(f, "Not applicable: {}", reason)
}

impl<'a> fmt::Display for TextReport<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let classification = &self.analysis.classification;

        writeln!(f, "Echo Analysis")?;
        writeln!(f, "=============")?;
        writeln!(f)?;
        if let Some(path) = self.path {
            writeln!(f, "File:           {}", path.display())?;
        }
        writeln!(
            f,
            "Modality:       {}",
            self.metadata.modality.as_deref().unwrap_or("unknown")
        )?;
        writeln!(f, "Image Type:     {}", self.metadata.image_type)?;
        writeln!(
            f,
            "Frames:         {}",
            self.metadata.number_of_frames.unwrap_or(1)
        )?;
        writeln!(
            f,
            "Manufacturer:   {}",
            self.metadata.manufacturer.as_deref().unwrap_or("unknown")
        )?;
        writeln!(f, "Regions:        {}", self.metadata.regions.len())?;
        for (i, region) in self.metadata.regions.iter().enumerate() {
            writeln!(f, "  [{}] {} {}", i, region.kind, region.bounds)?;
        }
        writeln!(f)?;

        writeln!(f, "Classification")?;
        writeln!(f, "--------------")?;
        writeln!(
            f,
            "Category:       {}",
            classification.category.simple_name()
        )?;
        writeln!(
            f,
            "Description:    {}",
            classification.category.description()
        )?;
        writeln!(f, "Confidence:     {:.2}", classification.confidence)?;
        writeln!(
            f,
            "Rule:           {}",
            classification.rule.unwrap_or("fallback")
        )?;
        writeln!(f, "Reasoning:      {}", classification.reasoning_line())?;
        writeln!(f)?;

        writeln!(f, "Linear Measurement")?;
        writeln!(f, "------------------")?;
        match &self.analysis.linear {
            Ok(params) => {
                writeln!(f, "Region:         {}", params.region_index)?;
                writeln!(f, "Scale X:        {}", params.scale_string_x())?;
                writeln!(f, "Scale Y:        {}", params.scale_string_y())?;
            }
            Err(reason) => not_applicable(f, reason)?,
        }
        writeln!(f)?;

        writeln!(f, "Velocity Measurement")?;
        writeln!(f, "--------------------")?;
        match &self.analysis.velocity {
            Ok(params) => {
                writeln!(f, "Region:         {}", params.region_index)?;
                writeln!(f, "Formula:        {}", params.formula())?;
                if let Some(axis) = params.time {
                    writeln!(f, "Time Scale:     {} {}/pixel", axis.delta_x, axis.units)?;
                }
            }
            Err(reason) => not_applicable(f, reason)?,
        }
        writeln!(f)?;

        writeln!(f, "Cardiac Phases")?;
        writeln!(f, "--------------")?;
        match &self.analysis.phases {
            Ok(phases) => {
                writeln!(f, "Phases:         {}", phases)?;
                writeln!(f, "Cycles:         {}", phases.cycle_count())?;
                writeln!(f, "Polarity:       {}", phases.polarity)?;
            }
            Err(reason) => not_applicable(f, reason)?,
        }

        Ok(())
    }
}
