//! Config validation: unknown-key detection with Levenshtein suggestions
//! and plausibility checks.
//!
//! Two-pass parse approach: first deserialize raw TOML into `toml::Value`,
//! walk the key tree, compare against known field names, and emit warnings
//! with "did you mean?" suggestions. Then proceed with normal serde
//! deserialization. Warnings never break existing configs.

use std::collections::HashSet;

use super::ServiceConfig;

/// A non-fatal config warning (typo, suspicious value).
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub field: String,
    pub message: String,
    pub suggestion: Option<String>,
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(ref s) = self.suggestion {
            write!(f, " (did you mean '{s}'?)")?;
        }
        Ok(())
    }
}

// ============================================================================
// Known Config Keys
// ============================================================================

/// Returns the complete set of valid dotted key paths for ServiceConfig.
///
/// Any new field added to ServiceConfig must be added here too.
pub fn known_config_keys() -> HashSet<&'static str> {
    let keys: &[&str] = &[
        // [server]
        "server",
        "server.addr",
        "server.cors_origins",
        "server.request_timeout_secs",
        "server.max_body_bytes",
        // [analysis]
        "analysis",
        "analysis.sampling_rate_hz",
        "analysis.derive_sampling_rate",
        "analysis.entropy_embedding_dim",
        "analysis.entropy_tolerance_ratio",
        "analysis.wavelet_min_scale",
        "analysis.wavelet_max_scale",
        "analysis.wavelet_family",
        "analysis.min_samples",
        "analysis.max_samples",
    ];
    keys.iter().copied().collect()
}

/// Collect every dotted key path in a TOML value tree.
pub fn walk_toml_keys(value: &toml::Value, prefix: &str) -> Vec<String> {
    let mut keys = Vec::new();
    if let Some(table) = value.as_table() {
        for (k, v) in table {
            let path = if prefix.is_empty() {
                k.clone()
            } else {
                format!("{prefix}.{k}")
            };
            keys.push(path.clone());
            if v.is_table() {
                keys.extend(walk_toml_keys(v, &path));
            }
        }
    }
    keys
}

// ============================================================================
// Levenshtein Distance
// ============================================================================

/// Compute the Levenshtein edit distance between two strings.
fn levenshtein(a: &str, b: &str) -> usize {
    let b_chars: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b_chars.len();
    }
    if b_chars.is_empty() {
        return a.chars().count();
    }

    let mut prev: Vec<usize> = (0..=b_chars.len()).collect();
    let mut curr = vec![0; b_chars.len() + 1];

    for (i, ca) in a.chars().enumerate() {
        curr[0] = i + 1;
        for (j, &cb) in b_chars.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b_chars.len()]
}

/// Suggest the closest known key for an unknown key, if within edit distance 3.
pub fn suggest_correction(unknown: &str, known: &HashSet<&str>) -> Option<String> {
    known
        .iter()
        .map(|&k| (k, levenshtein(unknown, k)))
        .filter(|&(_, dist)| dist <= 3)
        .min_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(b.0)))
        .map(|(k, _)| k.to_string())
}

// ============================================================================
// Unknown Key Validation (entry point)
// ============================================================================

/// Parse a raw TOML string and return warnings for any unknown config keys.
///
/// This does NOT fail on unknown keys; it only warns.
pub fn validate_unknown_keys(raw_toml: &str) -> Vec<ValidationWarning> {
    let value: toml::Value = match raw_toml.parse() {
        Ok(v) => v,
        Err(_) => return Vec::new(), // parse errors are handled by serde later
    };

    let known = known_config_keys();
    walk_toml_keys(&value, "")
        .into_iter()
        .filter(|key| !known.contains(key.as_str()))
        .map(|key| ValidationWarning {
            suggestion: suggest_correction(&key, &known),
            message: format!("Unknown config key '{key}'"),
            field: key,
        })
        .collect()
}

// ============================================================================
// Plausibility Checks
// ============================================================================

/// Non-fatal warnings for values that parse and validate but look wrong.
pub fn validate_ranges(config: &ServiceConfig) -> Vec<ValidationWarning> {
    let a = &config.analysis;
    let mut warnings = Vec::new();

    if a.sampling_rate_hz.is_finite() && !(1.0..=1000.0).contains(&a.sampling_rate_hz) {
        warnings.push(ValidationWarning {
            field: "analysis.sampling_rate_hz".to_string(),
            message: format!(
                "analysis.sampling_rate_hz = {} is outside the usual wearable range (1-1000 Hz)",
                a.sampling_rate_hz
            ),
            suggestion: None,
        });
    }

    if a.entropy_tolerance_ratio.is_finite() && a.entropy_tolerance_ratio > 1.0 {
        warnings.push(ValidationWarning {
            field: "analysis.entropy_tolerance_ratio".to_string(),
            message: format!(
                "analysis.entropy_tolerance_ratio = {} matches nearly every template; 0.1-0.25 is typical",
                a.entropy_tolerance_ratio
            ),
            suggestion: None,
        });
    }

    if a.min_samples <= a.entropy_embedding_dim + 1 {
        warnings.push(ValidationWarning {
            field: "analysis.min_samples".to_string(),
            message: format!(
                "analysis.min_samples = {} is below m + 2 = {}; shorter windows will still be rejected",
                a.min_samples,
                a.entropy_embedding_dim + 2
            ),
            suggestion: None,
        });
    }

    warnings
}
