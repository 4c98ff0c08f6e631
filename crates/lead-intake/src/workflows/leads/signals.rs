use serde::{Deserialize, Serialize};

/// Tri-state reading of a yes/no style answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum YesNo {
    Yes,
    No,
    Unknown,
}

impl YesNo {
    /// Free-form answers ("we rent for now") land on `Unknown`, never an error.
    pub fn parse(value: Option<&str>) -> Self {
        let Some(value) = value else {
            return Self::Unknown;
        };

        match value.trim().to_lowercase().as_str() {
            "yes" | "y" | "true" | "1" | "checked" | "on" => Self::Yes,
            "no" | "n" | "false" | "0" | "off" => Self::No,
            _ => Self::Unknown,
        }
    }

    pub fn is_yes(self) -> bool {
        self == Self::Yes
    }
}

/// Answer to a question that may be typed as a number or picked as a bucket label.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Measure {
    Amount(f64),
    /// Lowercased original text; the numeric read produced nothing usable.
    Label(String),
    Missing,
}

impl Measure {
    /// Drops everything except digits and dots before parsing, so "$310/mo"
    /// reads as 310. Zero or unparsable text falls back to `Label`. Digit runs
    /// too long for `f64` read as an infinite amount, which every upper
    /// bucket accepts.
    pub(crate) fn read(value: Option<&str>) -> Self {
        let Some(value) = value else {
            return Self::Missing;
        };

        let digits: String = value
            .chars()
            .filter(|c| c.is_ascii_digit() || *c == '.')
            .collect();

        match digits.parse::<f64>() {
            Ok(amount) if amount > 0.0 => Self::Amount(amount),
            _ => Self::Label(value.to_lowercase()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yes_no_recognises_both_vocabularies() {
        for raw in ["yes", "Y", " TRUE ", "1", "checked", "On"] {
            assert_eq!(YesNo::parse(Some(raw)), YesNo::Yes, "{raw}");
        }
        for raw in ["no", "N", "False", "0", "off"] {
            assert_eq!(YesNo::parse(Some(raw)), YesNo::No, "{raw}");
        }
    }

    #[test]
    fn yes_no_treats_free_text_and_absence_as_unknown() {
        assert_eq!(YesNo::parse(None), YesNo::Unknown);
        assert_eq!(YesNo::parse(Some("")), YesNo::Unknown);
        assert_eq!(YesNo::parse(Some("yes, with my spouse")), YesNo::Unknown);
        assert_eq!(YesNo::parse(Some("unchecked")), YesNo::Unknown);
    }

    #[test]
    fn measure_strips_currency_and_units() {
        assert_eq!(Measure::read(Some("$310/mo")), Measure::Amount(310.0));
        assert_eq!(Measure::read(Some("12.5 yrs")), Measure::Amount(12.5));
    }

    #[test]
    fn measure_keeps_overflowing_digits_numeric() {
        let huge = "9".repeat(340);
        assert_eq!(Measure::read(Some(&huge)), Measure::Amount(f64::INFINITY));
    }

    #[test]
    fn measure_falls_back_to_label() {
        assert_eq!(
            Measure::read(Some("Not sure")),
            Measure::Label("not sure".to_string())
        );
        assert_eq!(Measure::read(Some("$0")), Measure::Label("$0".to_string()));
        assert_eq!(
            Measure::read(Some("1.2.3")),
            Measure::Label("1.2.3".to_string())
        );
        assert_eq!(Measure::read(None), Measure::Missing);
    }
}
