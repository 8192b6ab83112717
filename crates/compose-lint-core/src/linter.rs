//! Linter facade: prepares rules per file, runs the driver and turns
//! findings into ordered violations.

use std::borrow::Cow;
use std::path::Path;

use rayon::prelude::*;
use rayon::ThreadPool;
use tracing::{debug, info};

use crate::config::Config;
use crate::context::SourceFile;
use crate::driver::{ActiveRule, Driver, Traversal};
use crate::emitter::Finding;
use crate::error::LintError;
use crate::options::resolve;
use crate::rule::{Rule, RuleBox};
use crate::tree::{LineIndex, SyntaxTree};
use crate::types::{FileFailure, FileReport, FixedFile, LintResult, Location, Violation};

/// Builder for configuring a [`Linter`].
#[derive(Default)]
pub struct LinterBuilder {
    rules: Vec<RuleBox>,
    config: Option<Config>,
    parallelism: Option<usize>,
}

impl LinterBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a rule. Registration order breaks ordering ties.
    #[must_use]
    pub fn rule<R: Rule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// Adds a boxed rule.
    #[must_use]
    pub fn rule_box(mut self, rule: RuleBox) -> Self {
        self.rules.push(rule);
        self
    }

    /// Adds several boxed rules.
    #[must_use]
    pub fn rules<I>(mut self, rules: I) -> Self
    where
        I: IntoIterator<Item = RuleBox>,
    {
        self.rules.extend(rules);
        self
    }

    /// Sets the configuration.
    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Runs multi-file operations on a dedicated pool of `threads` threads,
    /// overriding `[linter] parallelism`.
    #[must_use]
    pub fn parallelism(mut self, threads: usize) -> Self {
        self.parallelism = Some(threads);
        self
    }

    /// Builds the linter.
    ///
    /// # Errors
    ///
    /// Returns [`LintError::ThreadPool`] if a dedicated pool was requested
    /// and could not be created.
    pub fn build(self) -> Result<Linter, LintError> {
        let config = self.config.unwrap_or_default();
        let pool = match self.parallelism.or(config.linter.parallelism) {
            Some(threads) => {
                debug!(threads, "building dedicated thread pool");
                Some(
                    rayon::ThreadPoolBuilder::new()
                        .num_threads(threads)
                        .thread_name(|index| format!("compose-lint-{index}"))
                        .build()?,
                )
            }
            None => None,
        };
        Ok(Linter {
            rules: self.rules,
            config,
            pool,
        })
    }
}

/// Runs rules over parsed files.
///
/// Use [`Linter::builder()`] to construct an instance. A linter holds no
/// per-file state and can be shared across threads.
pub struct Linter {
    rules: Vec<RuleBox>,
    config: Config,
    pool: Option<ThreadPool>,
}

impl std::fmt::Debug for Linter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Linter")
            .field(
                "rules",
                &self.rules.iter().map(|rule| rule.name()).collect::<Vec<_>>(),
            )
            .field("config", &self.config)
            .field(
                "threads",
                &self.pool.as_ref().map(ThreadPool::current_num_threads),
            )
            .finish()
    }
}

impl Linter {
    /// Creates a new builder for configuring a linter.
    #[must_use]
    pub fn builder() -> LinterBuilder {
        LinterBuilder::new()
    }

    /// Returns the number of registered rules.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Lints one file without modifying it.
    ///
    /// # Errors
    ///
    /// Returns [`LintError::Config`] if a rule's options fail to resolve;
    /// no rule runs in that case.
    pub fn lint(&self, file: &SourceFile) -> Result<FileReport, LintError> {
        let (report, _) = self.run(file.path(), Cow::Borrowed(file.tree()), false)?;
        Ok(report)
    }

    /// Lints one file and applies the fixes rules offer.
    ///
    /// Violation positions refer to the rewritten text.
    ///
    /// # Errors
    ///
    /// See [`lint`](Self::lint).
    pub fn lint_and_fix(&self, file: SourceFile) -> Result<FixedFile, LintError> {
        let (path, tree) = file.into_parts();
        let (report, tree) = self.run(&path, Cow::Owned(tree), true)?;
        let tree = tree.into_owned();
        let source = tree.text();
        Ok(FixedFile {
            report,
            tree,
            source,
        })
    }

    /// Lints several files in parallel. Reports keep input order.
    #[must_use]
    pub fn lint_all(&self, files: &[SourceFile]) -> LintResult {
        info!("Linting {} files", files.len());
        let outcomes: Vec<Result<FileReport, FileFailure>> = self.install(|| {
            files
                .par_iter()
                .map(|file| {
                    self.lint(file).map_err(|error| FileFailure {
                        path: file.path().to_path_buf(),
                        error,
                    })
                })
                .collect()
        });

        let mut result = LintResult::new();
        for outcome in outcomes {
            match outcome {
                Ok(report) => result.reports.push(report),
                Err(failure) => result.failures.push(failure),
            }
        }
        info!(
            "Lint complete: {} violations in {} files, {} failed",
            result.violation_count(),
            result.reports.len(),
            result.failures.len()
        );
        result
    }

    /// Fixes several files in parallel. Results keep input order.
    #[must_use]
    pub fn fix_all(&self, files: Vec<SourceFile>) -> Vec<Result<FixedFile, FileFailure>> {
        info!("Fixing {} files", files.len());
        self.install(|| {
            files
                .into_par_iter()
                .map(|file| {
                    let path = file.path().to_path_buf();
                    self.lint_and_fix(file)
                        .map_err(|error| FileFailure { path, error })
                })
                .collect()
        })
    }

    fn install<R, F>(&self, op: F) -> R
    where
        R: Send,
        F: FnOnce() -> R + Send,
    {
        match &self.pool {
            Some(pool) => pool.install(op),
            None => op(),
        }
    }

    /// Resolves options and creates fresh visitors for every enabled rule.
    fn prepare(&self) -> Result<Vec<ActiveRule>, LintError> {
        let mut active = Vec::with_capacity(self.rules.len());
        for (index, rule) in self.rules.iter().enumerate() {
            if !self.config.is_rule_enabled(rule.name()) {
                debug!("Skipping disabled rule: {}", rule.name());
                continue;
            }
            let config_error = |source| LintError::Config {
                rule: rule.name().to_string(),
                source,
            };
            let options = resolve(rule.options(), &self.config.settings).map_err(config_error)?;
            let visitor = rule.start_file(&options).map_err(config_error)?;
            active.push(ActiveRule {
                index,
                name: rule.name(),
                hooks: rule.hooks(),
                visitor,
            });
        }
        Ok(active)
    }

    fn run<'t>(
        &self,
        path: &Path,
        tree: Cow<'t, SyntaxTree>,
        fix: bool,
    ) -> Result<(FileReport, Cow<'t, SyntaxTree>), LintError> {
        debug!("Linting: {}", path.display());
        let rules = self.prepare()?;
        let Traversal {
            tree,
            findings,
            aborted,
        } = Driver::new(tree, rules, fix).run();
        let violations = self.violations(&tree, findings);
        debug!(
            "{}: {} violations{}",
            path.display(),
            violations.len(),
            if aborted.is_some() { " (aborted)" } else { "" }
        );
        let report = FileReport {
            path: path.to_path_buf(),
            violations,
            aborted,
        };
        Ok((report, tree))
    }

    /// Converts findings into violations ordered by line, column, rule
    /// registration order and emission order.
    fn violations(&self, tree: &SyntaxTree, findings: Vec<Finding>) -> Vec<Violation> {
        let text = tree.text();
        let index = LineIndex::new(&text);
        let mut located: Vec<(Location, Finding)> = findings
            .into_iter()
            .map(|finding| {
                let (line, column) = index.line_col(finding.offset);
                (Location::new(line, column, finding.offset), finding)
            })
            .collect();
        located.sort_by_key(|(location, finding)| {
            (location.line, location.column, finding.rule, finding.sequence)
        });

        located
            .into_iter()
            .filter_map(|(location, finding)| {
                let rule = self.rules.get(finding.rule)?;
                let severity = self
                    .config
                    .rule_severity(rule.name())
                    .unwrap_or_else(|| rule.default_severity());
                Some(
                    Violation::new(rule.code(), rule.name(), severity, location, finding.message)
                        .with_fix(finding.fixable, finding.auto_fixed),
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ProjectSettings, RuleConfig};
    use crate::emitter::Emitter;
    use crate::error::{ConfigError, RuleError};
    use crate::fixture::{FileBuilder, FunctionBuilder};
    use crate::mutation::MutationHandle;
    use crate::options::{Configuration, OptionSpec};
    use crate::rule::RuleVisitor;
    use crate::tree::FunctionRef;
    use crate::types::Severity;

    const MODE: OptionSpec = OptionSpec::enumeration("mode", &["loud", "quiet"], "loud", "");

    struct Shout;

    struct ShoutVisitor {
        loud: bool,
    }

    impl RuleVisitor for ShoutVisitor {
        fn visit_function(
            &mut self,
            function: &FunctionRef<'_>,
            emitter: &mut Emitter<'_>,
            _: Option<&mut MutationHandle<'_>>,
        ) -> Result<(), RuleError> {
            if self.loud {
                emitter.report(function, format!("{}!", function.name()), false);
            }
            Ok(())
        }
    }

    impl Rule for Shout {
        fn name(&self) -> &'static str {
            "test:shout"
        }
        fn code(&self) -> &'static str {
            "T001"
        }
        fn options(&self) -> &'static [OptionSpec] {
            &[MODE]
        }
        fn start_file(&self, config: &Configuration) -> Result<Box<dyn RuleVisitor>, ConfigError> {
            Ok(Box::new(ShoutVisitor {
                loud: config.require_enum("mode")? == "loud",
            }))
        }
    }

    fn source(names: &[&str]) -> SourceFile {
        names
            .iter()
            .fold(FileBuilder::new(), |file, name| {
                file.function(FunctionBuilder::new(*name))
            })
            .source("Test.kt")
            .expect("fixture")
    }

    #[test]
    fn test_builder() {
        let linter = Linter::builder()
            .rule(Shout)
            .build()
            .expect("Failed to build linter");
        assert_eq!(linter.rule_count(), 1);
    }

    #[test]
    fn test_lint_orders_by_position() {
        let linter = Linter::builder().rule(Shout).rule(Shout).build().expect("linter");
        let report = linter.lint(&source(&["a", "b"])).expect("report");
        let rendered: Vec<String> = report.violations.iter().map(ToString::to_string).collect();
        assert_eq!(
            rendered,
            [
                "1:5: warning [T001] a!",
                "1:5: warning [T001] a!",
                "3:5: warning [T001] b!",
                "3:5: warning [T001] b!",
            ]
        );
    }

    #[test]
    fn test_invalid_option_fails_the_file() {
        let config = Config::with_settings(ProjectSettings::new().with("mode", "whisper"));
        let linter = Linter::builder().rule(Shout).config(config).build().expect("linter");
        let error = linter.lint(&source(&["a"])).expect_err("config error");
        assert!(matches!(
            error,
            LintError::Config {
                source: ConfigError::InvalidValue { .. },
                ..
            }
        ));
    }

    #[test]
    fn test_disabled_rule_and_severity_override() {
        let mut config = Config::with_settings(ProjectSettings::new().with("mode", "loud"));
        config.rules.insert(
            "test:shout".into(),
            RuleConfig {
                enabled: Some(true),
                severity: Some(Severity::Error),
            },
        );
        let linter = Linter::builder().rule(Shout).config(config.clone()).build().expect("linter");
        let report = linter.lint(&source(&["a"])).expect("report");
        assert_eq!(report.violations[0].severity, Severity::Error);

        config.rules.insert(
            "test:shout".into(),
            RuleConfig {
                enabled: Some(false),
                severity: None,
            },
        );
        let linter = Linter::builder().rule(Shout).config(config).build().expect("linter");
        assert!(linter.lint(&source(&["a"])).expect("report").violations.is_empty());
    }

    #[test]
    fn test_lint_all_keeps_input_order_on_dedicated_pool() {
        let linter = Linter::builder()
            .rule(Shout)
            .parallelism(2)
            .build()
            .expect("linter");
        let files: Vec<SourceFile> = (0..8)
            .map(|i| {
                FileBuilder::new()
                    .function(FunctionBuilder::new(format!("f{i}")))
                    .source(format!("File{i}.kt"))
                    .expect("fixture")
            })
            .collect();
        let result = linter.lint_all(&files);
        assert!(result.failures.is_empty());
        let messages: Vec<&str> = result.violations().map(|v| v.message.as_str()).collect();
        let expected: Vec<String> = (0..8).map(|i| format!("f{i}!")).collect();
        assert_eq!(messages, expected);
        assert_eq!(
            result.reports[3].path,
            std::path::PathBuf::from("File3.kt")
        );
    }

    #[test]
    fn test_fix_all_reports_failures_per_file() {
        let config = Config::with_settings(ProjectSettings::new().with("mode", "whisper"));
        let linter = Linter::builder().rule(Shout).config(config).build().expect("linter");
        let results = linter.fix_all(vec![source(&["a"]), source(&["b"])]);
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(Result::is_err));
    }
}
