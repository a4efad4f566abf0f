use serde::{Deserialize, Serialize};
use sqlx::Type;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Type)]
pub(crate) enum Grade {
    A,
    B,
    C,
    D,
    F,
}

impl Grade {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
            Self::F => "F",
        }
    }

    pub(crate) fn label(self) -> &'static str {
        match self {
            Self::A => "Excellent",
            Self::B => "Very Good",
            Self::C => "Good",
            Self::D => "Average",
            Self::F => "Fail",
        }
    }

    pub(crate) fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "A" => Some(Self::A),
            "B" => Some(Self::B),
            "C" => Some(Self::C),
            "D" => Some(Self::D),
            "F" => Some(Self::F),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
pub(crate) enum Gender {
    #[serde(rename = "M", alias = "male", alias = "m")]
    #[sqlx(rename = "M")]
    Male,
    #[serde(rename = "F", alias = "female", alias = "f")]
    #[sqlx(rename = "F")]
    Female,
    #[serde(rename = "O", alias = "other", alias = "o")]
    #[sqlx(rename = "O")]
    Other,
}

impl Gender {
    pub(crate) fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "m" | "male" => Some(Self::Male),
            "f" | "female" => Some(Self::Female),
            "o" | "other" => Some(Self::Other),
            _ => None,
        }
    }
}

/// Stored as single-letter codes, exchanged over JSON as lowercase words.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[serde(rename_all = "lowercase")]
pub(crate) enum AttendanceStatus {
    #[serde(alias = "P")]
    #[sqlx(rename = "P")]
    Present,
    #[serde(alias = "A")]
    #[sqlx(rename = "A")]
    Absent,
    #[serde(alias = "L")]
    #[sqlx(rename = "L")]
    Late,
    #[serde(alias = "E")]
    #[sqlx(rename = "E")]
    Excused,
}

impl AttendanceStatus {
    pub(crate) fn code(self) -> &'static str {
        match self {
            Self::Present => "P",
            Self::Absent => "A",
            Self::Late => "L",
            Self::Excused => "E",
        }
    }

    pub(crate) fn label(self) -> &'static str {
        match self {
            Self::Present => "Present",
            Self::Absent => "Absent",
            Self::Late => "Late",
            Self::Excused => "Excused",
        }
    }

    pub(crate) fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "p" | "present" => Some(Self::Present),
            "a" | "absent" => Some(Self::Absent),
            "l" | "late" => Some(Self::Late),
            "e" | "excused" => Some(Self::Excused),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(rename_all = "UPPERCASE")]
pub(crate) enum NotificationType {
    #[default]
    Info,
    Success,
    Warning,
    Error,
    Assignment,
    Grade,
    Attendance,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attendance_status_accepts_codes_and_words() {
        let from_code: AttendanceStatus = serde_json::from_str("\"P\"").unwrap();
        let from_word: AttendanceStatus = serde_json::from_str("\"excused\"").unwrap();
        assert_eq!(from_code, AttendanceStatus::Present);
        assert_eq!(from_word, AttendanceStatus::Excused);
        assert_eq!(serde_json::to_string(&AttendanceStatus::Late).unwrap(), "\"late\"");
        assert_eq!(AttendanceStatus::parse(" A "), Some(AttendanceStatus::Absent));
    }

    #[test]
    fn notification_type_is_uppercase_on_the_wire() {
        assert_eq!(serde_json::to_string(&NotificationType::Grade).unwrap(), "\"GRADE\"");
        assert_eq!(NotificationType::default(), NotificationType::Info);
    }

    #[test]
    fn grade_labels() {
        assert_eq!(Grade::A.label(), "Excellent");
        assert_eq!(Grade::F.label(), "Fail");
        assert_eq!(Grade::parse("b"), Some(Grade::B));
        assert_eq!(Grade::parse("E"), None);
    }

    #[test]
    fn gender_accepts_words() {
        let parsed: Gender = serde_json::from_str("\"female\"").unwrap();
        assert_eq!(parsed, Gender::Female);
        assert_eq!(Gender::parse("O"), Some(Gender::Other));
    }
}
