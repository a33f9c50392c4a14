//! Classification of open pull requests into named indices.
//!
//! The [`PullRequestScanner`] drives the pipeline: it enriches each pull
//! request once, runs the [`ClassifierSet`] over it, and feeds the
//! [`Aggregator`], which produces the final [`ScanReport`].

pub mod aggregator;
pub mod classifier;
pub mod enrich;
pub mod index;
pub mod scanner;

pub use aggregator::{Aggregator, AuthorEntry, AuthorRanking, RepositoryFailure, ScanReport};
pub use classifier::{Assignment, Classifier, ClassifierSet, MalformedData};
pub use enrich::{EnrichedPullRequest, FileAttribution, GHOST_AUTHOR, OVERFLOW_KEY, resolve_author};
pub use index::{Bucket, ClassificationIndex, IndexName, PullRequestRef};
pub use scanner::{PullRequestScanner, ScanOptions};
