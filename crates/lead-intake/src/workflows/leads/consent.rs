use serde::{Deserialize, Serialize};

use super::domain::LeadRecord;
use super::evaluation::{ScoreResult, Tier};
use super::fields::resolve;
use super::signals::YesNo;

const SMS_CONSENT: &[&str] = &["SMS consent", "sms_consent", "consent_sms", "sms_opt_in"];
const EMAIL_CONSENT: &[&str] = &["Email consent", "email_consent", "consent_email", "email_opt_in"];
const CALL_CONSENT: &[&str] = &["Call consent", "call_consent", "consent_call", "tcpa_consent"];

/// Contact permissions captured on the form. Only an explicit yes counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsentSummary {
    pub sms: bool,
    pub email: bool,
    pub call: bool,
    pub contactable: bool,
}

impl ConsentSummary {
    pub fn from_lead(lead: &LeadRecord) -> Self {
        let flag = |aliases: &[&str]| YesNo::parse(resolve(lead, aliases).as_deref()).is_yes();

        let sms = flag(SMS_CONSENT);
        let email = flag(EMAIL_CONSENT);
        let call = flag(CALL_CONSENT);

        Self {
            sms,
            email,
            call,
            contactable: sms || email || call,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoutingQueue {
    Marshall,
    Review,
    Nurture,
    Closed,
}

/// Where the automation platform should send the lead next.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingSummary {
    pub queue: RoutingQueue,
    pub reason: String,
}

impl RoutingSummary {
    pub fn for_verdict(result: &ScoreResult, consent: &ConsentSummary) -> Self {
        let (queue, reason) = match result.tier {
            Tier::QualifiedSendToMarshall if consent.contactable => (
                RoutingQueue::Marshall,
                "qualified and consented to contact".to_string(),
            ),
            Tier::QualifiedSendToMarshall => (
                RoutingQueue::Review,
                "qualified but no contact consent on file".to_string(),
            ),
            Tier::WarmReviewLater => (
                RoutingQueue::Review,
                "warm lead awaiting manual review".to_string(),
            ),
            Tier::EducationalOnly => (
                RoutingQueue::Nurture,
                "educational follow-up only".to_string(),
            ),
            Tier::Disqualified => (
                RoutingQueue::Closed,
                format!("disqualified: {}", result.reject_reasons.join(", ")),
            ),
        };

        Self { queue, reason }
    }
}
