//! Sniff presets and config-driven construction.

use crate::{
    DocCommentSpacing, ForbiddenArrayTrailingComma, FunctionComment, StrictDeclaration,
    YodaCondition, YodaStyle,
};
use php_standards_core::{Config, RuleConfig, SniffBox};
use tracing::warn;

/// Preset configurations for php-standards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    /// Every sniff with its default settings.
    Standard,
    /// Only `strict-declaration`, for gradual adoption.
    Minimal,
}

impl Preset {
    /// Looks up a preset by name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "standard" | "recommended" => Some(Self::Standard),
            "minimal" => Some(Self::Minimal),
            _ => None,
        }
    }

    /// Returns the sniffs for this preset.
    #[must_use]
    pub fn sniffs(self) -> Vec<SniffBox> {
        match self {
            Self::Standard => all_sniffs(),
            Self::Minimal => minimal_sniffs(),
        }
    }
}

/// Returns every available sniff with default settings.
///
/// - `strict-declaration` (PS001)
/// - `function-comment` (PS002)
/// - `doc-comment-spacing` (PS003)
/// - `forbidden-array-trailing-comma` (PS004)
/// - `yoda-condition` (PS005)
#[must_use]
pub fn all_sniffs() -> Vec<SniffBox> {
    vec![
        Box::new(StrictDeclaration::new()),
        Box::new(FunctionComment::new()),
        Box::new(DocCommentSpacing::new()),
        Box::new(ForbiddenArrayTrailingComma::new()),
        Box::new(YodaCondition::new()),
    ]
}

/// Returns the minimal set of sniffs.
#[must_use]
pub fn minimal_sniffs() -> Vec<SniffBox> {
    vec![Box::new(StrictDeclaration::new())]
}

/// Builds the sniffs selected by `config`, applying their options.
///
/// The preset defaults to `standard`; an unknown preset name falls back to
/// it with a warning. Enabled state and severity overrides are applied
/// later by the analyzer.
#[must_use]
pub fn sniffs_from_config(config: &Config) -> Vec<SniffBox> {
    let preset = match config.preset.as_deref() {
        None => Preset::Standard,
        Some(name) => Preset::from_name(name).unwrap_or_else(|| {
            warn!(preset = name, "Unknown preset, using standard");
            Preset::Standard
        }),
    };

    let mut sniffs: Vec<SniffBox> = Vec::new();
    let selected = preset.sniffs();
    for sniff in selected {
        let Some(rule) = config.rule(sniff.name()) else {
            sniffs.push(sniff);
            continue;
        };
        sniffs.push(configure(sniff.name(), rule).unwrap_or(sniff));
    }
    sniffs
}

/// Rebuilds a configurable sniff from its `[rules.<name>]` options.
fn configure(name: &str, rule: &RuleConfig) -> Option<SniffBox> {
    match name {
        crate::function_comment::NAME => {
            let classes = rule.get_str_array("test_classes");
            let sniff = if classes.is_empty() {
                FunctionComment::new()
            } else {
                FunctionComment::new().test_classes(classes)
            };
            Some(Box::new(sniff))
        }
        crate::doc_comment_spacing::NAME => {
            let mut sniff = DocCommentSpacing::new();
            sniff.lines_before_first_content =
                line_count(rule, "lines_before_first_content", sniff.lines_before_first_content);
            sniff.lines_between_description_and_annotations = line_count(
                rule,
                "lines_between_description_and_annotations",
                sniff.lines_between_description_and_annotations,
            );
            sniff.lines_between_different_annotations = line_count(
                rule,
                "lines_between_different_annotations",
                sniff.lines_between_different_annotations,
            );
            sniff.lines_between_same_annotations = line_count(
                rule,
                "lines_between_same_annotations",
                sniff.lines_between_same_annotations,
            );
            sniff.lines_after_last_content =
                line_count(rule, "lines_after_last_content", sniff.lines_after_last_content);
            Some(Box::new(sniff))
        }
        crate::yoda_condition::NAME => {
            let style = match rule.get_str("style", "require").parse::<YodaStyle>() {
                Ok(style) => style,
                Err(message) => {
                    warn!(rule = name, "{message}");
                    YodaStyle::default()
                }
            };
            Some(Box::new(YodaCondition::new().style(style)))
        }
        _ => None,
    }
}

fn line_count(rule: &RuleConfig, key: &str, default: usize) -> usize {
    let fallback = i64::try_from(default).unwrap_or(i64::MAX);
    let value = rule.get_int(key, fallback);
    usize::try_from(value).unwrap_or_else(|_| {
        warn!(option = key, value, "Negative line count, using default");
        default
    })
}
