//! Static HTML pages rendered with `minijinja`.
//!
//! One page per index plus a summary page, all sharing a navigation bar
//! that marks the page being viewed. Templates are compiled into the
//! binary; output is HTML-escaped.

use camino::Utf8PathBuf;
use minijinja::{Environment, context};
use serde::Serialize;

use crate::github::TriageError;
use crate::scan::{Bucket, IndexName, ScanReport};

use super::{ReportSink, write_output};

const BASE_TEMPLATE: &str = include_str!("templates/base.html");
const SUMMARY_TEMPLATE: &str = include_str!("templates/summary.html");
const BUCKETS_TEMPLATE: &str = include_str!("templates/buckets.html");

/// One rendered page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    /// File name without the `.html` extension.
    pub stem: &'static str,
    /// Navigation label.
    pub label: &'static str,
    /// Index listed on the page; `None` for the summary.
    pub index: Option<IndexName>,
}

impl Page {
    fn file_name(self) -> String {
        format!("{}.html", self.stem)
    }
}

/// Every page, in navigation order.
pub const PAGES: [Page; 9] = [
    Page {
        stem: "index",
        label: "Summary",
        index: None,
    },
    Page {
        stem: "byfile",
        label: "Files",
        index: Some(IndexName::ByFile),
    },
    Page {
        stem: "bydirectory",
        label: "Directories",
        index: Some(IndexName::ByDirectory),
    },
    Page {
        stem: "byuser",
        label: "Authors",
        index: Some(IndexName::ByAuthor),
    },
    Page {
        stem: "byconflict",
        label: "Conflicts",
        index: Some(IndexName::ByConflict),
    },
    Page {
        stem: "bycifailures",
        label: "CI failures",
        index: Some(IndexName::ByCiFailure),
    },
    Page {
        stem: "bymergecommits",
        label: "Merge commits",
        index: Some(IndexName::ByMergeCommit),
    },
    Page {
        stem: "bymultiauthor",
        label: "Multiple authors",
        index: Some(IndexName::ByMultiAuthor),
    },
    Page {
        stem: "byapprovals",
        label: "Approvals",
        index: Some(IndexName::ByApprovalCount),
    },
];

#[derive(Debug, Serialize)]
struct NavItem {
    href: String,
    label: &'static str,
    active: bool,
}

#[derive(Debug, Serialize)]
struct IndexSize {
    href: String,
    label: &'static str,
    buckets: usize,
}

/// Renders every page into an output directory.
#[derive(Debug, Clone)]
pub struct HtmlReportSink {
    output_dir: Utf8PathBuf,
}

impl HtmlReportSink {
    /// Creates a sink writing into `output_dir`.
    #[must_use]
    pub fn new(output_dir: impl Into<Utf8PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Renders one page to a string.
    ///
    /// # Errors
    ///
    /// Returns [`TriageError::Template`] when rendering fails.
    pub fn render_page(page: Page, report: &ScanReport) -> Result<String, TriageError> {
        let environment = environment()?;
        let nav: Vec<NavItem> = PAGES
            .iter()
            .map(|candidate| NavItem {
                href: candidate.file_name(),
                label: candidate.label,
                active: *candidate == page,
            })
            .collect();
        let generated_at = report.generated_at.format("%Y-%m-%d %H:%M UTC").to_string();

        let rendered = match page.index {
            None => {
                let index_sizes: Vec<IndexSize> = PAGES
                    .iter()
                    .filter_map(|candidate| {
                        let index = report.index(candidate.index?)?;
                        Some(IndexSize {
                            href: candidate.file_name(),
                            label: candidate.label,
                            buckets: index.len(),
                        })
                    })
                    .collect();
                render(
                    &environment,
                    "summary.html",
                    context! {
                        title => &report.title,
                        generated_at => &generated_at,
                        nav => &nav,
                        repositories => &report.repositories,
                        failed_repositories => &report.failed_repositories,
                        pull_request_count => report.pull_request_count,
                        index_sizes => &index_sizes,
                        author_ranking => &report.author_ranking,
                    },
                )?
            }
            Some(name) => {
                let buckets = page_buckets(name, report);
                render(
                    &environment,
                    "buckets.html",
                    context! {
                        title => &report.title,
                        generated_at => &generated_at,
                        nav => &nav,
                        heading => name.title(),
                        buckets => buckets,
                    },
                )?
            }
        };
        Ok(rendered)
    }
}

impl ReportSink for HtmlReportSink {
    fn publish(&self, report: &ScanReport) -> Result<(), TriageError> {
        for page in PAGES {
            let rendered = Self::render_page(page, report)?;
            write_output(&self.output_dir, &page.file_name(), &rendered)?;
        }
        Ok(())
    }
}

/// Buckets listed on an index page. The author page follows the ranking,
/// busiest author first; every other page keeps index order.
fn page_buckets(name: IndexName, report: &ScanReport) -> Vec<Bucket> {
    if name == IndexName::ByAuthor {
        return report
            .author_ranking
            .entries()
            .iter()
            .map(|entry| Bucket {
                key: entry.author.clone(),
                pulls: entry.pulls.clone(),
            })
            .collect();
    }

    report
        .index(name)
        .map(|index| index.buckets().to_vec())
        .unwrap_or_default()
}

fn environment() -> Result<Environment<'static>, TriageError> {
    let mut environment = Environment::new();
    for (name, source) in [
        ("base.html", BASE_TEMPLATE),
        ("summary.html", SUMMARY_TEMPLATE),
        ("buckets.html", BUCKETS_TEMPLATE),
    ] {
        environment
            .add_template(name, source)
            .map_err(|error| TriageError::Template {
                message: format!("invalid template {name}: {error}"),
            })?;
    }
    Ok(environment)
}

fn render(
    environment: &Environment<'_>,
    name: &str,
    context: minijinja::Value,
) -> Result<String, TriageError> {
    environment
        .get_template(name)
        .and_then(|template| template.render(context))
        .map_err(|error| TriageError::Template {
            message: format!("rendering {name} failed: {error}"),
        })
}
