use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow};
use uuid::Uuid;

/// Court positions a shooting target can be placed at.
///
/// Wire names are the identifiers the academy staff use on the drill sheets.
/// Anything unrecognised decodes to [`CourtZone::Other`] so that a stale client
/// never makes a stored session unreadable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CourtZone {
    #[serde(rename = "esquina_izq")]
    CornerLeft,
    #[serde(rename = "lateral_izq")]
    WingLeft,
    #[serde(rename = "medio")]
    Top,
    #[serde(rename = "lateral_der")]
    WingRight,
    #[serde(rename = "esquina_der")]
    CornerRight,
    #[serde(rename = "tiro_libre")]
    FreeThrow,
    #[serde(rename = "poste_bajo")]
    LowPost,
    #[serde(rename = "triple_frontal")]
    TopThree,
    #[serde(rename = "otra", other)]
    Other,
}

impl CourtZone {
    pub fn as_str(&self) -> &'static str {
        match self {
            CourtZone::CornerLeft => "esquina_izq",
            CourtZone::WingLeft => "lateral_izq",
            CourtZone::Top => "medio",
            CourtZone::WingRight => "lateral_der",
            CourtZone::CornerRight => "esquina_der",
            CourtZone::FreeThrow => "tiro_libre",
            CourtZone::LowPost => "poste_bajo",
            CourtZone::TopThree => "triple_frontal",
            CourtZone::Other => "otra",
        }
    }
}

/// A make target at one court position, as recorded in a session result.
///
/// The numeric fields are optional because older session sheets omit them;
/// use the accessor methods, which default missing values to zero. Sheets
/// exported by the old web client use camelCase keys, accepted as aliases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShotPoint {
    pub zone: CourtZone,
    #[serde(default, alias = "targetMakes")]
    pub target_makes: Option<u32>,
    #[serde(default, alias = "bothSides")]
    pub both_sides: bool,
    #[serde(default, alias = "attemptsLeft")]
    pub attempts_left: Option<u32>,
    #[serde(default, alias = "attemptsRight")]
    pub attempts_right: Option<u32>,
}

impl ShotPoint {
    pub fn one_side(zone: CourtZone, target_makes: u32, attempts: u32) -> Self {
        Self {
            zone,
            target_makes: Some(target_makes),
            both_sides: false,
            attempts_left: Some(attempts),
            attempts_right: None,
        }
    }

    pub fn both_sides(zone: CourtZone, target_makes: u32, attempts_left: u32, attempts_right: u32) -> Self {
        Self {
            zone,
            target_makes: Some(target_makes),
            both_sides: true,
            attempts_left: Some(attempts_left),
            attempts_right: Some(attempts_right),
        }
    }

    /// Makes required per side.
    pub fn makes(&self) -> u32 {
        self.target_makes.unwrap_or(0)
    }

    pub fn left_attempts(&self) -> u32 {
        self.attempts_left.unwrap_or(0)
    }

    /// Right-side attempts only count for two-sided targets.
    pub fn right_attempts(&self) -> u32 {
        if self.both_sides {
            self.attempts_right.unwrap_or(0)
        } else {
            0
        }
    }

    pub fn total_makes(&self) -> u64 {
        let makes = u64::from(self.makes());
        if self.both_sides {
            makes * 2
        } else {
            makes
        }
    }

    pub fn total_attempts(&self) -> u64 {
        u64::from(self.left_attempts()) + u64::from(self.right_attempts())
    }
}

/// Target definition inside a shooting exercise template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShotTarget {
    pub zone: CourtZone,
    pub target_makes: u32,
    #[serde(default)]
    pub both_sides: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ShootingExercise {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub targets: Json<Vec<ShotTarget>>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateShootingExercise {
    pub title: String,
    pub description: Option<String>,
    pub targets: Vec<ShotTarget>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct UpdateShootingExercise {
    pub title: Option<String>,
    pub description: Option<String>,
    pub targets: Option<Vec<ShotTarget>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zone_wire_names() {
        let zone: CourtZone = serde_json::from_str("\"esquina_izq\"").unwrap();
        assert_eq!(zone, CourtZone::CornerLeft);
        assert_eq!(serde_json::to_string(&CourtZone::Top).unwrap(), "\"medio\"");
        assert_eq!(CourtZone::FreeThrow.as_str(), "tiro_libre");
    }

    #[test]
    fn test_unknown_zone_decodes_to_other() {
        let zone: CourtZone = serde_json::from_str("\"media_cancha\"").unwrap();
        assert_eq!(zone, CourtZone::Other);
    }

    #[test]
    fn test_missing_numbers_default_to_zero() {
        let point: ShotPoint = serde_json::from_str(r#"{"zone":"medio"}"#).unwrap();
        assert_eq!(point.makes(), 0);
        assert_eq!(point.left_attempts(), 0);
        assert_eq!(point.right_attempts(), 0);
        assert!(!point.both_sides);
    }

    #[test]
    fn test_camel_case_sheets_decode() {
        let point: ShotPoint = serde_json::from_str(
            r#"{"zone":"medio","targetMakes":8,"bothSides":true,"attemptsLeft":20,"attemptsRight":16}"#,
        )
        .unwrap();
        assert_eq!(point, ShotPoint::both_sides(CourtZone::Top, 8, 20, 16));
    }

    #[test]
    fn test_right_attempts_ignored_for_single_side() {
        let mut point = ShotPoint::one_side(CourtZone::WingLeft, 5, 10);
        point.attempts_right = Some(40);
        assert_eq!(point.total_attempts(), 10);
        assert_eq!(point.total_makes(), 5);
    }
}
