// The 30 named features and their ternary scores

use serde::{Deserialize, Serialize};
use std::fmt;

pub const FEATURE_COUNT: usize = 30;

/// Output positions, in the order the classifier expects its columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Feature {
    HavingIpAddress,
    UrlLength,
    ShortiningService,
    HavingAtSymbol,
    DoubleSlashRedirecting,
    PrefixSuffix,
    HavingSubDomain,
    SslFinalState,
    DomainRegisterationLength,
    Favicon,
    Port,
    HttpsToken,
    RequestUrl,
    UrlOfAnchor,
    LinksInTags,
    Sfh,
    SubmittingToEmail,
    AbnormalUrl,
    Redirect,
    OnMouseover,
    RightClick,
    PopUpWidnow,
    Iframe,
    AgeOfDomain,
    DnsRecord,
    WebTraffic,
    PageRank,
    GoogleIndex,
    LinksPointingToPage,
    StatisticalReport,
}

impl Feature {
    pub const ALL: [Feature; FEATURE_COUNT] = [
        Feature::HavingIpAddress,
        Feature::UrlLength,
        Feature::ShortiningService,
        Feature::HavingAtSymbol,
        Feature::DoubleSlashRedirecting,
        Feature::PrefixSuffix,
        Feature::HavingSubDomain,
        Feature::SslFinalState,
        Feature::DomainRegisterationLength,
        Feature::Favicon,
        Feature::Port,
        Feature::HttpsToken,
        Feature::RequestUrl,
        Feature::UrlOfAnchor,
        Feature::LinksInTags,
        Feature::Sfh,
        Feature::SubmittingToEmail,
        Feature::AbnormalUrl,
        Feature::Redirect,
        Feature::OnMouseover,
        Feature::RightClick,
        Feature::PopUpWidnow,
        Feature::Iframe,
        Feature::AgeOfDomain,
        Feature::DnsRecord,
        Feature::WebTraffic,
        Feature::PageRank,
        Feature::GoogleIndex,
        Feature::LinksPointingToPage,
        Feature::StatisticalReport,
    ];

    /// Column name as used by the training data.
    pub fn name(self) -> &'static str {
        match self {
            Feature::HavingIpAddress => "having_IP_Address",
            Feature::UrlLength => "URL_Length",
            Feature::ShortiningService => "Shortining_Service",
            Feature::HavingAtSymbol => "having_At_Symbol",
            Feature::DoubleSlashRedirecting => "double_slash_redirecting",
            Feature::PrefixSuffix => "Prefix_Suffix",
            Feature::HavingSubDomain => "having_Sub_Domain",
            Feature::SslFinalState => "SSLfinal_State",
            Feature::DomainRegisterationLength => "Domain_registeration_length",
            Feature::Favicon => "Favicon",
            Feature::Port => "port",
            Feature::HttpsToken => "HTTPS_token",
            Feature::RequestUrl => "Request_URL",
            Feature::UrlOfAnchor => "URL_of_Anchor",
            Feature::LinksInTags => "Links_in_tags",
            Feature::Sfh => "SFH",
            Feature::SubmittingToEmail => "Submitting_to_email",
            Feature::AbnormalUrl => "Abnormal_URL",
            Feature::Redirect => "Redirect",
            Feature::OnMouseover => "on_mouseover",
            Feature::RightClick => "RightClick",
            Feature::PopUpWidnow => "popUpWidnow",
            Feature::Iframe => "Iframe",
            Feature::AgeOfDomain => "age_of_domain",
            Feature::DnsRecord => "DNSRecord",
            Feature::WebTraffic => "web_traffic",
            Feature::PageRank => "Page_Rank",
            Feature::GoogleIndex => "Google_Index",
            Feature::LinksPointingToPage => "Links_pointing_to_page",
            Feature::StatisticalReport => "Statistical_report",
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn names() -> impl Iterator<Item = &'static str> {
        Feature::ALL.iter().map(|feature| feature.name())
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// -1 leans phishing, 0 is ambiguous, 1 leans legitimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "i8", try_from = "i8")]
#[repr(i8)]
pub enum Score {
    Phishing = -1,
    Suspicious = 0,
    Legitimate = 1,
}

impl Score {
    pub fn value(self) -> i8 {
        self as i8
    }

    /// Phishing when the indicator was found, legitimate otherwise.
    pub fn from_indicator(found: bool) -> Self {
        if found {
            Score::Phishing
        } else {
            Score::Legitimate
        }
    }

    /// Bucket a ratio: below `legitimate_below` is legitimate, below
    /// `suspicious_below` is suspicious, anything else is phishing.
    pub fn from_ratio(ratio: f64, legitimate_below: f64, suspicious_below: f64) -> Self {
        if ratio < legitimate_below {
            Score::Legitimate
        } else if ratio < suspicious_below {
            Score::Suspicious
        } else {
            Score::Phishing
        }
    }
}

impl From<Score> for i8 {
    fn from(score: Score) -> i8 {
        score.value()
    }
}

impl TryFrom<i8> for Score {
    type Error = String;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        match value {
            -1 => Ok(Score::Phishing),
            0 => Ok(Score::Suspicious),
            1 => Ok(Score::Legitimate),
            other => Err(format!("{} is not a ternary score", other)),
        }
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

/// Exactly 30 scores, position-bound to [`Feature::ALL`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FeatureVector {
    scores: [Score; FEATURE_COUNT],
}

impl FeatureVector {
    /// Every position at -1; the answer for input that cannot be analyzed.
    pub fn phishing() -> Self {
        Self {
            scores: [Score::Phishing; FEATURE_COUNT],
        }
    }

    /// Build from an ordered list, padding with -1 or truncating to 30.
    pub fn from_scores(scores: impl IntoIterator<Item = Score>) -> Self {
        let mut vector = Self::phishing();
        for (slot, score) in vector.scores.iter_mut().zip(scores) {
            *slot = score;
        }
        vector
    }

    pub fn get(&self, feature: Feature) -> Score {
        self.scores[feature.index()]
    }

    pub fn values(&self) -> [i8; FEATURE_COUNT] {
        self.scores.map(Score::value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Feature, Score)> + '_ {
        Feature::ALL.iter().copied().zip(self.scores.iter().copied())
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }
}

impl Serialize for FeatureVector {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.values().serialize(serializer)
    }
}
