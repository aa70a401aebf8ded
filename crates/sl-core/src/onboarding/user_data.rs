use serde::{Deserialize, Serialize};

use crate::analysis::Analysis;
use crate::ids::AnalysisId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Gender {
    Female,
    Male,
    NonBinary,
    PreferNotToSay,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AgeRange {
    #[serde(rename = "under-18")]
    Under18,
    #[serde(rename = "18-24")]
    From18To24,
    #[serde(rename = "25-34")]
    From25To34,
    #[serde(rename = "35-44")]
    From35To44,
    #[serde(rename = "45-54")]
    From45To54,
    #[serde(rename = "55+")]
    Over55,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SkinType {
    Dry,
    Oily,
    Combination,
    Normal,
    Sensitive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SensitivityLevel {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SunExposure {
    Rarely,
    Sometimes,
    Daily,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SkinConcern {
    Acne,
    Wrinkles,
    DarkSpots,
    Redness,
    Pores,
    Dryness,
    Oiliness,
    DarkCircles,
    Texture,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RoutineTime {
    Morning,
    Evening,
    Both,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RoutineComplexity {
    Minimal,
    Moderate,
    Extensive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Budget {
    Low,
    Medium,
    High,
}

/// Onboarding accumulator.
///
/// 引导流程累积的用户数据。只由导航控制器持有和修改。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserData {
    pub photo_uri: Option<String>,
    pub gender: Option<Gender>,
    pub age_range: Option<AgeRange>,
    pub skin_type: Option<SkinType>,
    pub sensitivity: Option<SensitivityLevel>,
    pub sun_exposure: Option<SunExposure>,
    pub sleep_hours: Option<u8>,
    pub water_glasses: Option<u8>,
    pub diet: Option<String>,
    pub stress_level: Option<u8>,
    pub current_routine: Option<Vec<String>>,
    pub products_used: Option<Vec<String>>,
    pub skin_goals: Option<Vec<String>>,
    pub top_concern: Option<SkinConcern>,
    pub concern_details: Option<String>,
    pub routine_time: Option<RoutineTime>,
    pub routine_complexity: Option<RoutineComplexity>,
    pub budget: Option<Budget>,
    pub notifications_enabled: Option<bool>,
    pub analysis: Option<Analysis>,
}

/// Partial update for [`UserData`]. `None` fields leave the target untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserDataPatch {
    pub photo_uri: Option<String>,
    pub gender: Option<Gender>,
    pub age_range: Option<AgeRange>,
    pub skin_type: Option<SkinType>,
    pub sensitivity: Option<SensitivityLevel>,
    pub sun_exposure: Option<SunExposure>,
    pub sleep_hours: Option<u8>,
    pub water_glasses: Option<u8>,
    pub diet: Option<String>,
    pub stress_level: Option<u8>,
    pub current_routine: Option<Vec<String>>,
    pub products_used: Option<Vec<String>>,
    pub skin_goals: Option<Vec<String>>,
    pub top_concern: Option<SkinConcern>,
    pub concern_details: Option<String>,
    pub routine_time: Option<RoutineTime>,
    pub routine_complexity: Option<RoutineComplexity>,
    pub budget: Option<Budget>,
    pub notifications_enabled: Option<bool>,
    pub analysis: Option<Analysis>,
}

macro_rules! merge_fields {
    ($target:expr, $patch:expr; $($field:ident),* $(,)?) => {
        $(
            if let Some(value) = $patch.$field {
                $target.$field = Some(value);
            }
        )*
    };
}

impl UserData {
    /// Applies every field present in `patch`, leaving the others as they are.
    pub fn merge(&mut self, patch: UserDataPatch) {
        merge_fields!(self, patch;
            photo_uri,
            gender,
            age_range,
            skin_type,
            sensitivity,
            sun_exposure,
            sleep_hours,
            water_glasses,
            diet,
            stress_level,
            current_routine,
            products_used,
            skin_goals,
            top_concern,
            concern_details,
            routine_time,
            routine_complexity,
            budget,
            notifications_enabled,
            analysis,
        );
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn has_analysis(&self) -> bool {
        self.analysis.is_some()
    }
}

impl UserDataPatch {
    pub fn photo(uri: impl Into<String>) -> Self {
        Self {
            photo_uri: Some(uri.into()),
            ..Default::default()
        }
    }

    pub fn analysis(analysis: Analysis) -> Self {
        Self {
            analysis: Some(analysis),
            ..Default::default()
        }
    }

    pub fn top_concern(concern: SkinConcern) -> Self {
        Self {
            top_concern: Some(concern),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Payload for the onboarding endpoint. References the analysis by id
/// instead of embedding it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OnboardingSubmission {
    #[serde(flatten)]
    pub answers: UserData,
    pub analysis_id: Option<AnalysisId>,
}

impl From<&UserData> for OnboardingSubmission {
    fn from(data: &UserData) -> Self {
        let analysis_id = data.analysis.as_ref().map(|a| a.id.clone());
        let mut answers = data.clone();
        answers.analysis = None;
        Self {
            answers,
            analysis_id,
        }
    }
}
