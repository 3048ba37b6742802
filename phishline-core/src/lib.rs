pub mod dom;
pub mod domain;
pub mod error;
pub mod extractor;
pub mod feature;
pub mod lexical;
pub mod report;
pub mod unavailable;
pub mod url_context;

pub use error::{Analysis, AnalysisError, MalformedUrl};
pub use extractor::{ExtractorConfig, FeatureExtractor, extract_features};
pub use feature::{FEATURE_COUNT, Feature, FeatureVector, Score};
pub use url_context::UrlContext;

use colored::Colorize;

pub fn print_banner() {
    let banner = r#"
        __    _      __    ___
   ___ / /   (_)__  / /   / (_)__  ___
  / _ \/ _ \/ (_-< / _ \ / / / _ \/ -_)
 / .__/_//_/_/___//_//_//_/_/_//_/\__/
/_/
"#;
    println!("{}", banner.bright_cyan().bold());
    println!(
        "  {} {}\n",
        "phishline".bright_white().bold(),
        env!("CARGO_PKG_VERSION").bright_black()
    );
}
