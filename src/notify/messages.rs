//! Message templates keyed by update result

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::update::{ActiveRelease, UpdateResult};

static PLACEHOLDER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\{(\w+)\}").unwrap());

const BANNER: &str = "************************************************************";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
}

/// Rendered lines for one recipient
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub severity: Severity,
    pub lines: Vec<String>,
}

/// Values available to templates.
///
/// `{app}`, `{version}`, `{download}`, `{changelog}` and `{donation}` are
/// recognised. A line naming a placeholder without a value is dropped.
#[derive(Debug, Clone, Default)]
pub struct MessageContext<'a> {
    pub app: &'a str,
    pub version: Option<&'a str>,
    pub download: Option<&'a str>,
    pub changelog: Option<&'a str>,
    pub donation: Option<&'a str>,
}

impl<'a> MessageContext<'a> {
    pub fn new(app: &'a str, active: Option<&'a ActiveRelease>) -> Self {
        let release = active.map(ActiveRelease::release);

        Self {
            app,
            version: release.map(|r| r.version().number()),
            download: release.and_then(|r| r.download_link().value().map(String::as_str)),
            changelog: release.and_then(|r| r.changelog_link().value().map(String::as_str)),
            donation: release.and_then(|r| r.donation_link().value().map(String::as_str)),
        }
    }

    fn lookup(&self, key: &str) -> Option<&'a str> {
        match key {
            "app" => Some(self.app),
            "version" => self.version,
            "download" => self.download,
            "changelog" => self.changelog,
            "donation" => self.donation,
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
struct Template {
    severity: Severity,
    lines: Vec<String>,
}

impl Template {
    fn info(lines: &[&str]) -> Self {
        Self::new(Severity::Info, lines)
    }

    fn warning(lines: &[&str]) -> Self {
        Self::new(Severity::Warning, lines)
    }

    fn new(severity: Severity, lines: &[&str]) -> Self {
        Self {
            severity,
            lines: lines.iter().map(|line| line.to_string()).collect(),
        }
    }

    fn render(&self, context: &MessageContext<'_>) -> Notification {
        Notification {
            severity: self.severity,
            lines: self
                .lines
                .iter()
                .filter_map(|line| interpolate(line, context))
                .collect(),
        }
    }
}

/// Replace placeholders in `line`, or `None` when one has no value
fn interpolate(line: &str, context: &MessageContext<'_>) -> Option<String> {
    let mut complete = true;

    let rendered = PLACEHOLDER_RE.replace_all(line, |caps: &Captures| match &caps[1] {
        key @ ("app" | "version" | "download" | "changelog" | "donation") => {
            context.lookup(key).map(str::to_string).unwrap_or_else(|| {
                complete = false;
                String::new()
            })
        }
        _ => caps[0].to_string(),
    });

    complete.then(|| rendered.into_owned())
}

/// Console and subscriber templates for every [`UpdateResult`]
#[derive(Debug, Clone)]
pub struct MessageCatalog {
    checking: String,
    console: HashMap<UpdateResult, Template>,
    subscriber: HashMap<UpdateResult, Template>,
}

impl Default for MessageCatalog {
    fn default() -> Self {
        let console = HashMap::from([
            (
                UpdateResult::Latest,
                Template::info(&["No updates were found..."]),
            ),
            (
                UpdateResult::Exists,
                Template::info(&[
                    "{app} v{version} is already downloaded, please check your update folder and install it",
                ]),
            ),
            (
                UpdateResult::Downloaded,
                Template::info(&[
                    "Successfully downloaded ({app} v{version}), please install it from your update folder",
                ]),
            ),
            (
                UpdateResult::UpdateAvailable,
                Template::info(&[
                    BANNER,
                    "Version ({version}) is now available for {app}.",
                    "Download: {download}",
                    "Changelog: {changelog}",
                    "Donate: {donation}",
                    BANNER,
                ]),
            ),
            (
                UpdateResult::Disabled,
                Template::warning(&[
                    "The auto updater for {app} is disabled, please enable it to receive update notifications",
                ]),
            ),
            (
                UpdateResult::Unknown,
                Template::warning(&[
                    "The updater returned an unknown result, its severity is also undefined",
                ]),
            ),
        ]);

        let subscriber = HashMap::from([
            (
                UpdateResult::Latest,
                Template::info(&["You have the latest version of {app}"]),
            ),
            (
                UpdateResult::Exists,
                Template::info(&[
                    "The latest version of {app} is already downloaded, please check the update folder",
                ]),
            ),
            (
                UpdateResult::Downloaded,
                Template::info(&[
                    "Successfully downloaded ({app} v{version}), please install it from your update folder",
                ]),
            ),
            (
                UpdateResult::UpdateAvailable,
                Template::info(&[
                    "Version ({version}) is now available for {app}.",
                    "Please refer to the console for more information.",
                ]),
            ),
            (
                UpdateResult::Disabled,
                Template::warning(&[
                    "The auto updater for {app} is disabled, please enable it to receive update notifications",
                ]),
            ),
            (
                UpdateResult::Unknown,
                Template::warning(&[
                    "The updater returned an unknown result, its severity is also undefined",
                ]),
            ),
        ]);

        Self {
            checking: "Checking for a new update...".to_string(),
            console,
            subscriber,
        }
    }
}

impl MessageCatalog {
    /// Replace the console template for `result`
    pub fn with_console(mut self, result: UpdateResult, severity: Severity, lines: &[&str]) -> Self {
        self.console.insert(result, Template::new(severity, lines));
        self
    }

    /// Replace the subscriber template for `result`
    pub fn with_subscriber(
        mut self,
        result: UpdateResult,
        severity: Severity,
        lines: &[&str],
    ) -> Self {
        self.subscriber.insert(result, Template::new(severity, lines));
        self
    }

    pub fn with_checking(mut self, line: impl Into<String>) -> Self {
        self.checking = line.into();
        self
    }

    pub fn checking(&self) -> &str {
        &self.checking
    }

    pub fn console(&self, result: UpdateResult, context: &MessageContext<'_>) -> Notification {
        render(&self.console, result, context)
    }

    pub fn subscriber(&self, result: UpdateResult, context: &MessageContext<'_>) -> Notification {
        render(&self.subscriber, result, context)
    }
}

fn render(
    templates: &HashMap<UpdateResult, Template>,
    result: UpdateResult,
    context: &MessageContext<'_>,
) -> Notification {
    templates
        .get(&result)
        .or_else(|| templates.get(&UpdateResult::Unknown))
        .map(|template| template.render(context))
        .unwrap_or(Notification {
            severity: Severity::Warning,
            lines: Vec::new(),
        })
}
