// Stand-ins for signals that need services this system does not integrate
// with: traffic rank, page rank, search-index status, backlinks and threat
// reports. Each reports a missing data source, which the extractor scores as
// -1. Replace one function to wire in a real source for that feature alone.

use crate::error::{Analysis, AnalysisError};
use crate::feature::Feature;
use crate::url_context::UrlContext;

pub fn web_traffic(_ctx: &UrlContext) -> Analysis {
    Err(AnalysisError::Unavailable(Feature::WebTraffic))
}

pub fn page_rank(_ctx: &UrlContext) -> Analysis {
    Err(AnalysisError::Unavailable(Feature::PageRank))
}

pub fn google_index(_ctx: &UrlContext) -> Analysis {
    Err(AnalysisError::Unavailable(Feature::GoogleIndex))
}

pub fn links_pointing_to_page(_ctx: &UrlContext) -> Analysis {
    Err(AnalysisError::Unavailable(Feature::LinksPointingToPage))
}

pub fn statistical_report(_ctx: &UrlContext) -> Analysis {
    Err(AnalysisError::Unavailable(Feature::StatisticalReport))
}
