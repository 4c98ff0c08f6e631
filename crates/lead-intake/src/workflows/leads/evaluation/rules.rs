use super::super::domain::LeadRecord;
use super::super::fields::LeadField;
use super::super::signals::{Measure, YesNo};

/// One signal's effect on the running score.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Adjustment {
    pub points: i32,
    /// `None` for silent signals that contribute nothing worth reporting.
    pub reason: Option<&'static str>,
}

impl Adjustment {
    fn new(points: i32, reason: &'static str) -> Self {
        Self {
            points,
            reason: Some(reason),
        }
    }

    fn silent() -> Self {
        Self {
            points: 0,
            reason: None,
        }
    }
}

/// Evaluates every scoring signal in reporting order.
pub(crate) fn score_signals(lead: &LeadRecord) -> Vec<Adjustment> {
    vec![
        bill(lead.field(LeadField::AvgMonthlyBill).as_deref()),
        roof_age(lead.field(LeadField::RoofAgeYears).as_deref()),
        sun_exposure(lead.field(LeadField::SunExposure).as_deref()),
        hoa(lead.field(LeadField::Hoa).as_deref()),
        true_up(lead.field(LeadField::AnnualTrueUp).as_deref()),
        property_type(lead.field(LeadField::PropertyType).as_deref()),
    ]
}

fn bill(value: Option<&str>) -> Adjustment {
    match Measure::read(value) {
        Measure::Amount(amount) if amount >= 250.0 => Adjustment::new(18, "High bill"),
        Measure::Amount(amount) if amount >= 150.0 => Adjustment::new(10, "Mid bill"),
        Measure::Amount(_) => Adjustment::new(2, "Low bill"),
        Measure::Label(label) if label.contains("250") => Adjustment::new(18, "High bill"),
        Measure::Label(label) if label.contains("150") => Adjustment::new(10, "Mid bill"),
        Measure::Label(_) => Adjustment::new(4, "Bill provided"),
        Measure::Missing => Adjustment::new(0, "Bill unknown"),
    }
}

fn roof_age(value: Option<&str>) -> Adjustment {
    match Measure::read(value) {
        Measure::Amount(years) if years <= 10.0 => Adjustment::new(12, "Roof <= 10 years"),
        Measure::Amount(years) if years <= 20.0 => {
            Adjustment::new(6, "Roof 10\u{2013}20 years")
        }
        Measure::Amount(_) => Adjustment::new(0, "Roof > 20 years"),
        Measure::Label(label)
            if label.contains("under") || label.contains('<') || label.contains("10") =>
        {
            Adjustment::new(12, "Roof <= 10 years")
        }
        Measure::Label(label) if label.contains("20") => {
            Adjustment::new(6, "Roof 10\u{2013}20 years")
        }
        Measure::Label(_) | Measure::Missing => Adjustment::new(0, "Roof unknown"),
    }
}

fn sun_exposure(value: Option<&str>) -> Adjustment {
    let Some(value) = value else {
        return Adjustment::new(0, "Sun exposure unknown");
    };

    let sun = value.to_lowercase();
    if sun.contains("full") || sun.contains("great") || sun.contains("high") {
        Adjustment::new(10, "Strong sun exposure")
    } else if sun.contains("partial") || sun.contains("medium") {
        Adjustment::new(5, "Partial sun exposure")
    } else {
        Adjustment::new(0, "Low/unknown sun exposure")
    }
}

/// A missing HOA answer costs a little: the lead is incomplete, not disqualified.
fn hoa(value: Option<&str>) -> Adjustment {
    match YesNo::parse(value) {
        YesNo::Yes => Adjustment::new(-8, "HOA present"),
        YesNo::No => Adjustment::new(4, "No HOA"),
        YesNo::Unknown => Adjustment::new(-2, "HOA unknown"),
    }
}

fn true_up(value: Option<&str>) -> Adjustment {
    match Measure::read(value) {
        Measure::Amount(amount) if amount >= 500.0 => Adjustment::new(6, "High true-up"),
        Measure::Amount(_) => Adjustment::new(2, "True-up noted"),
        Measure::Label(label) if label.contains("yes") || label.contains("true") => {
            Adjustment::new(4, "True-up reported")
        }
        Measure::Label(_) | Measure::Missing => Adjustment::silent(),
    }
}

fn property_type(value: Option<&str>) -> Adjustment {
    let Some(value) = value else {
        return Adjustment::silent();
    };

    let kind = value.to_lowercase();
    if kind.contains("single") {
        Adjustment::new(4, "Single-family home")
    } else if kind.contains("mobile") || kind.contains("manufact") {
        Adjustment::new(-6, "Mobile/manufactured home")
    } else {
        Adjustment::new(0, "Property type noted")
    }
}
