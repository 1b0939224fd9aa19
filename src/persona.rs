//! Persona preamble used as the model's system instruction.
//!
//! The preamble is rendered from a JSON document describing identity, voice
//! and behavioural anchors. A missing or malformed file is not fatal: the
//! loader logs a warning and returns [`FALLBACK_PERSONA`].

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

pub const FALLBACK_PERSONA: &str = "You are RaNEMOS Agent Writer. Deliver signal, not noise.";

#[derive(Debug, Default, Deserialize)]
struct PersonaFile {
    #[serde(default)]
    instructions: Instructions,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Instructions {
    identity: Identity,
    mission: String,
    tone_and_style: ToneAndStyle,
    behavioral_anchors: BehavioralAnchors,
    forbidden: Vec<String>,
    mission_tagline: String,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct Identity {
    role: String,
    context: String,
}

impl Default for Identity {
    fn default() -> Self {
        Self {
            role: "RaNemoOS".to_string(),
            context: String::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct ToneAndStyle {
    voice: String,
    persona: String,
    attitude: String,
    core: Vec<String>,
}

impl Default for ToneAndStyle {
    fn default() -> Self {
        Self {
            voice: "Philosopher × Operator × Coach".to_string(),
            persona: "Builder energy".to_string(),
            attitude: String::new(),
            core: Vec::new(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct BehavioralAnchors {
    focus: Vec<String>,
    motivation: String,
}

/// Load and render the persona, falling back on any error.
pub fn load_persona(path: &Path) -> String {
    match read_persona(path) {
        Ok(persona) => persona,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "could not load persona, using fallback");
            FALLBACK_PERSONA.to_string()
        }
    }
}

fn read_persona(path: &Path) -> Result<String> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let file: PersonaFile = serde_json::from_str(&contents).context("invalid persona JSON")?;
    Ok(render(&file.instructions))
}

fn render(i: &Instructions) -> String {
    let style = &i.tone_and_style;
    let anchors = &i.behavioral_anchors;

    let mut lines = vec![
        format!("IDENTITY: {}", i.identity.role),
        format!("CONTEXT: {}", i.identity.context),
        format!("\nMISSION: {}", i.mission),
        format!("\nVOICE: {}", style.voice),
        format!("PERSONA: {}", style.persona),
        format!("ATTITUDE: {}", style.attitude),
    ];
    if !style.core.is_empty() {
        lines.push(format!("\nCORE TRAITS: {}", style.core.join(", ")));
    }
    if !anchors.focus.is_empty() {
        lines.push(format!("\nFOCUS: {}", anchors.focus.join(", ")));
    }
    lines.push(format!("\nMOTIVATION: {}", anchors.motivation));
    if !i.forbidden.is_empty() {
        lines.push(format!("\nFORBIDDEN: {}", i.forbidden.join(", ")));
    }
    lines.push(format!("\n{}", i.mission_tagline));
    lines.join("\n")
}
