//! Ad-break duration validation for campaign configuration.
//!
//! Each campaign carries a nominal spot length embedded in its display label,
//! e.g. `"Monsoon Magic (1:00m)"` → 60 seconds. A requested ad-break duration
//! is valid for the campaign when it is a positive whole multiple of that base.
//! Durations are picked from a fixed ladder: every multiple of 15 seconds from
//! `"00:15m"` to `"05:00m"`.
//!
//! A label without a parseable `(M:SSm)` suffix has no known base, and every
//! ladder entry is accepted for it. Selecting such a campaign logs at `warn`.
//!
//! [`AdCampaignForm`] holds the in-progress selection. It clears the duration
//! whenever the campaign changes, and on submit reports every field problem at
//! once through [`FieldErrors`].

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::error::EpgError;

static CAMPAIGN_BASE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\((\d+):([0-5]\d)m\)").expect("campaign base pattern is a valid regex")
});

// ── Ladder ──────────────────────────────────────────────────────────────────

/// Upper bound on the number of entries a configured ladder may have.
pub const MAX_LADDER_ENTRIES: u32 = 1000;

/// Shape of the duration ladder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LadderConfig {
    pub step_secs: u32,
    pub max_secs: u32,
}

impl Default for LadderConfig {
    fn default() -> Self {
        Self {
            step_secs: 15,
            max_secs: 300,
        }
    }
}

impl LadderConfig {
    /// Check the ladder shape without building it.
    ///
    /// # Errors
    ///
    /// Returns [`EpgError::InvalidCatalog`] when the step is zero, larger than
    /// the maximum, or yields more than [`MAX_LADDER_ENTRIES`] entries.
    pub fn check(&self) -> Result<(), EpgError> {
        if self.step_secs == 0 || self.step_secs > self.max_secs {
            return Err(EpgError::InvalidCatalog(format!(
                "ladder step {}s must be between 1 and max {}s",
                self.step_secs, self.max_secs
            )));
        }
        let entries = self.max_secs / self.step_secs;
        if entries > MAX_LADDER_ENTRIES {
            return Err(EpgError::InvalidCatalog(format!(
                "ladder of {entries} entries exceeds the limit of {MAX_LADDER_ENTRIES}"
            )));
        }
        Ok(())
    }

    /// Every multiple of `step_secs` from `step_secs` up to `max_secs`.
    ///
    /// # Errors
    ///
    /// Same as [`check`](Self::check).
    pub fn build(&self) -> Result<Vec<LadderEntry>, EpgError> {
        self.check()?;
        Ok((1..=self.max_secs / self.step_secs)
            .map(|n| LadderEntry::from_seconds(n * self.step_secs))
            .collect())
    }
}

/// One selectable ad-break duration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LadderEntry {
    pub seconds: u32,
    /// `MM:SS` followed by a literal `m`, e.g. `"01:30m"`.
    pub label: String,
}

impl LadderEntry {
    pub fn from_seconds(seconds: u32) -> Self {
        Self {
            seconds,
            label: format_ladder_label(seconds),
        }
    }
}

/// The default 15 s … 300 s ladder.
pub fn standard_ladder() -> Vec<LadderEntry> {
    LadderConfig::default().build().unwrap_or_default()
}

/// Format seconds as a ladder label: `75` → `"01:15m"`.
pub fn format_ladder_label(seconds: u32) -> String {
    format!("{:02}:{:02}m", seconds / 60, seconds % 60)
}

/// Parse a ladder label such as `"01:15m"` into seconds.
///
/// # Errors
///
/// Returns [`EpgError::InvalidAdDuration`] if the label is not `MM:SSm`.
pub fn parse_ladder_label(label: &str) -> Result<u32, EpgError> {
    let invalid = || EpgError::InvalidAdDuration(format!("'{label}': expected MM:SSm"));
    let body = label.trim().strip_suffix('m').ok_or_else(invalid)?;
    let (minutes, seconds) = body.split_once(':').ok_or_else(invalid)?;
    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if !all_digits(minutes) || seconds.len() != 2 || !all_digits(seconds) {
        return Err(invalid());
    }
    let minutes: u32 = minutes.parse().map_err(|_| invalid())?;
    let seconds: u32 = seconds.parse().map_err(|_| invalid())?;
    if seconds >= 60 {
        return Err(invalid());
    }
    minutes
        .checked_mul(60)
        .and_then(|m| m.checked_add(seconds))
        .ok_or_else(invalid)
}

// ── Campaign base ───────────────────────────────────────────────────────────

/// Extract the base spot length, in seconds, from a campaign label.
///
/// Returns `None` when the label has no `(M:SSm)` group.
///
/// ```
/// use epg_engine::ad::campaign_base_seconds;
///
/// assert_eq!(campaign_base_seconds("Monsoon Magic (1:00m)"), Some(60));
/// assert_eq!(campaign_base_seconds("House Ad"), None);
/// ```
pub fn campaign_base_seconds(label: &str) -> Option<u32> {
    let caps = CAMPAIGN_BASE.captures(label)?;
    let minutes: u32 = caps.get(1)?.as_str().parse().ok()?;
    let seconds: u32 = caps.get(2)?.as_str().parse().ok()?;
    minutes.checked_mul(60)?.checked_add(seconds)
}

/// Whether `seconds` is a positive whole multiple of `base`.
///
/// An unknown base accepts everything. A zero base accepts nothing.
pub fn is_valid_for_base(seconds: u32, base: Option<u32>) -> bool {
    match base {
        None => true,
        Some(0) => false,
        Some(base) => seconds > 0 && seconds % base == 0,
    }
}

/// Ladder entries that are valid for `base`, in ladder order.
pub fn valid_durations(ladder: &[LadderEntry], base: Option<u32>) -> Vec<&LadderEntry> {
    ladder
        .iter()
        .filter(|entry| is_valid_for_base(entry.seconds, base))
        .collect()
}

// ── Catalog ─────────────────────────────────────────────────────────────────

/// A campaign that ad breaks can be booked against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Campaign {
    pub id: String,
    /// Display label, normally `"<name> (<M:SS>m)"`.
    pub label: String,
}

impl Campaign {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }

    pub fn base_seconds(&self) -> Option<u32> {
        campaign_base_seconds(&self.label)
    }
}

/// The fixed lists offered by the ad campaign picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdCatalog {
    pub campaigns: Vec<Campaign>,
    pub frequencies: Vec<String>,
    pub ladder: LadderConfig,
}

impl Default for AdCatalog {
    fn default() -> Self {
        Self {
            campaigns: vec![
                Campaign::new("monsoon-magic", "Monsoon Magic (1:00m)"),
                Campaign::new("festive-fiesta", "Festive Fiesta (0:30m)"),
                Campaign::new("summer-splash", "Summer Splash (0:45m)"),
                Campaign::new("cricket-carnival", "Cricket Carnival (0:15m)"),
                Campaign::new("prime-time-promo", "Prime Time Promo (2:00m)"),
            ],
            frequencies: [
                "Every 15 minutes",
                "Every 30 minutes",
                "Every hour",
                "Every 2 hours",
                "Once per program",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            ladder: LadderConfig::default(),
        }
    }
}

impl AdCatalog {
    /// Load a catalog from JSON. Omitted sections keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`EpgError::InvalidCatalog`] for malformed JSON or an unusable
    /// ladder.
    pub fn from_json(json: &str) -> Result<Self, EpgError> {
        let catalog: AdCatalog =
            serde_json::from_str(json).map_err(|e| EpgError::InvalidCatalog(e.to_string()))?;
        catalog.ladder.check()?;
        Ok(catalog)
    }

    /// Look up a campaign by id, falling back to an exact label match.
    pub fn find_campaign(&self, key: &str) -> Result<&Campaign, EpgError> {
        self.campaigns
            .iter()
            .find(|c| c.id == key)
            .or_else(|| self.campaigns.iter().find(|c| c.label == key))
            .ok_or_else(|| EpgError::UnknownCampaign(format!("'{key}'")))
    }
}

// ── Field errors ────────────────────────────────────────────────────────────

/// The form fields that can carry an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AdField {
    Campaign,
    Duration,
    Frequency,
}

/// A validation failure attached to one form field.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    #[error("Please select a campaign")]
    MissingCampaign,

    #[error("Please select ad duration")]
    MissingDuration,

    #[error("Selected duration is not valid for the chosen campaign")]
    InvalidDuration,

    #[error("Please select ad frequency")]
    MissingFrequency,
}

/// Per-field errors from one submit attempt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    pub campaign: Option<FieldError>,
    pub duration: Option<FieldError>,
    pub frequency: Option<FieldError>,
}

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.campaign.is_none() && self.duration.is_none() && self.frequency.is_none()
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn get(&self, field: AdField) -> Option<&FieldError> {
        match field {
            AdField::Campaign => self.campaign.as_ref(),
            AdField::Duration => self.duration.as_ref(),
            AdField::Frequency => self.frequency.as_ref(),
        }
    }

    /// Errors in form order.
    pub fn iter(&self) -> impl Iterator<Item = (AdField, &FieldError)> {
        [
            (AdField::Campaign, self.campaign.as_ref()),
            (AdField::Duration, self.duration.as_ref()),
            (AdField::Frequency, self.frequency.as_ref()),
        ]
        .into_iter()
        .filter_map(|(field, error)| error.map(|e| (field, e)))
    }

    pub fn messages(&self) -> Vec<String> {
        self.iter().map(|(_, e)| e.to_string()).collect()
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.messages().join("; "))
    }
}

impl std::error::Error for FieldErrors {}

// ── Form ────────────────────────────────────────────────────────────────────

/// A ladder entry as shown in the duration picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DurationOption {
    #[serde(flatten)]
    pub entry: LadderEntry,
    /// False when the entry is not a multiple of the campaign's base.
    pub enabled: bool,
}

/// A fully validated campaign booking, handed to [`SaveCampaign`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdCampaignSelection {
    pub campaign: Campaign,
    pub duration: LadderEntry,
    pub frequency: String,
}

/// Receives a selection once every field validates.
pub trait SaveCampaign {
    fn save(&mut self, selection: AdCampaignSelection);
}

impl<F: FnMut(AdCampaignSelection)> SaveCampaign for F {
    fn save(&mut self, selection: AdCampaignSelection) {
        self(selection)
    }
}

/// In-progress ad campaign configuration.
#[derive(Debug, Clone)]
pub struct AdCampaignForm {
    ladder: Vec<LadderEntry>,
    campaign: Option<Campaign>,
    duration: Option<String>,
    frequency: Option<String>,
    errors: FieldErrors,
}

impl Default for AdCampaignForm {
    fn default() -> Self {
        Self::new(standard_ladder())
    }
}

impl AdCampaignForm {
    pub fn new(ladder: Vec<LadderEntry>) -> Self {
        Self {
            ladder,
            campaign: None,
            duration: None,
            frequency: None,
            errors: FieldErrors::default(),
        }
    }

    pub fn from_catalog(catalog: &AdCatalog) -> Result<Self, EpgError> {
        Ok(Self::new(catalog.ladder.build()?))
    }

    /// Choose a campaign. Any chosen duration and its error are cleared.
    pub fn select_campaign(&mut self, campaign: Campaign) {
        if campaign.base_seconds().is_none() {
            warn!(
                label = %campaign.label,
                "campaign label has no (M:SSm) base; accepting every duration"
            );
        }
        debug!(campaign = %campaign.id, "campaign selected, clearing duration");
        self.campaign = Some(campaign);
        self.duration = None;
        self.errors.campaign = None;
        self.errors.duration = None;
    }

    /// Choose a duration by ladder label. An empty label clears it.
    ///
    /// Labels are matched by value on submit, so `"1:00m"` selects `"01:00m"`.
    pub fn select_duration(&mut self, label: &str) {
        self.duration = non_empty(label);
        self.errors.duration = None;
    }

    /// Choose a frequency. An empty value clears it.
    pub fn select_frequency(&mut self, frequency: &str) {
        self.frequency = non_empty(frequency);
        self.errors.frequency = None;
    }

    pub fn campaign(&self) -> Option<&Campaign> {
        self.campaign.as_ref()
    }

    pub fn duration(&self) -> Option<&str> {
        self.duration.as_deref()
    }

    pub fn frequency(&self) -> Option<&str> {
        self.frequency.as_deref()
    }

    /// Errors from the most recent submit, minus any fields edited since.
    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// Base of the selected campaign; `None` if no campaign or no base.
    pub fn base_seconds(&self) -> Option<u32> {
        self.campaign.as_ref().and_then(Campaign::base_seconds)
    }

    /// The whole ladder, with entries invalid for the campaign disabled.
    pub fn duration_options(&self) -> Vec<DurationOption> {
        let base = self.base_seconds();
        self.ladder
            .iter()
            .map(|entry| DurationOption {
                entry: entry.clone(),
                enabled: is_valid_for_base(entry.seconds, base),
            })
            .collect()
    }

    pub fn valid_durations(&self) -> Vec<&LadderEntry> {
        valid_durations(&self.ladder, self.base_seconds())
    }

    /// Check every field and build the selection.
    ///
    /// All field errors are collected; validation never stops at the first.
    pub fn validate(&self) -> Result<AdCampaignSelection, FieldErrors> {
        let mut errors = FieldErrors::default();
        let base = self.base_seconds();

        if self.campaign.is_none() {
            errors.campaign = Some(FieldError::MissingCampaign);
        }

        let duration = match self.duration.as_deref() {
            None => {
                errors.duration = Some(FieldError::MissingDuration);
                None
            }
            Some(label) => {
                let seconds = parse_ladder_label(label).ok();
                let entry = self
                    .ladder
                    .iter()
                    .find(|entry| Some(entry.seconds) == seconds || entry.label == label);
                match entry {
                    Some(entry) if is_valid_for_base(entry.seconds, base) => Some(entry),
                    _ => {
                        errors.duration = Some(FieldError::InvalidDuration);
                        None
                    }
                }
            }
        };

        if self.frequency.is_none() {
            errors.frequency = Some(FieldError::MissingFrequency);
        }

        match (&self.campaign, duration, &self.frequency) {
            (Some(campaign), Some(duration), Some(frequency)) if errors.is_empty() => {
                Ok(AdCampaignSelection {
                    campaign: campaign.clone(),
                    duration: duration.clone(),
                    frequency: frequency.clone(),
                })
            }
            _ => Err(errors),
        }
    }

    /// Validate and, only if every field passes, hand the selection to `sink`.
    ///
    /// On failure the errors are also kept on the form (see [`errors`](Self::errors)).
    pub fn submit<S: SaveCampaign + ?Sized>(&mut self, sink: &mut S) -> Result<(), FieldErrors> {
        match self.validate() {
            Ok(selection) => {
                debug!(
                    campaign = %selection.campaign.id,
                    duration = %selection.duration.label,
                    frequency = %selection.frequency,
                    "ad campaign submitted"
                );
                self.errors = FieldErrors::default();
                sink.save(selection);
                Ok(())
            }
            Err(errors) => {
                debug!(count = errors.len(), "ad campaign rejected");
                self.errors = errors.clone();
                Err(errors)
            }
        }
    }
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

// ── Tests ───────────────────────────────────────────────────────────────────
