// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The documentation pipeline: clean, generate, copy static files, publish.
//!
//! Stages run strictly in order and the first failure aborts the rest.
//! Nothing is retried or rolled back.

use crate::commands::docs_config::{DocTree, DocsManifest, RenderContext};
use crate::helpers::*;
use crate::runner::{CommandRunner, Invocation};
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use walkdir::WalkDir;

/// Overrides for the `publish` stage given on the command line.
#[derive(Debug, Default, Clone)]
pub struct PublishOptions {
    pub remote: Option<String>,
    pub branch: Option<String>,
    pub message: Option<String>,
}

type Stage<'a> = (&'static str, &'a dyn Fn() -> Result<()>);

pub struct DocsPipeline<'a> {
    root: PathBuf,
    manifest: DocsManifest,
    runner: &'a dyn CommandRunner,
}

impl<'a> DocsPipeline<'a> {
    /// Creates a pipeline rooted at the workspace directory `root`.
    pub fn new(root: impl Into<PathBuf>, manifest: DocsManifest, runner: &'a dyn CommandRunner) -> Result<Self> {
        let root = root.into();
        manifest.validate()?;
        manifest.check_editions(&root)?;
        Ok(Self {
            root,
            manifest,
            runner,
        })
    }

    fn out_dir(&self) -> PathBuf {
        self.root.join(&self.manifest.out_dir)
    }

    fn tree_out(&self, tree: &DocTree) -> PathBuf {
        self.out_dir().join(&tree.out)
    }

    fn tree_staging(&self, tree: &DocTree) -> PathBuf {
        self.root.join(&self.manifest.staging_dir).join(&tree.out)
    }

    /// Stage 1: removes previous output and staging directories.
    pub fn clean(&self) -> Result<()> {
        print_task_start("Cleaning Output", BROOM, YELLOW);
        for dir in [self.out_dir(), self.root.join(&self.manifest.staging_dir)] {
            if !dir.exists() {
                log::debug!("'{}' does not exist, nothing to clean", dir.display());
                continue;
            }
            if self.runner.is_dry_run() {
                print_info(&format!("Would remove '{}'", dir.display()));
                continue;
            }
            fs::remove_dir_all(&dir)
                .with_context(|| format!("Failed to remove '{}'", dir.display()))?;
            print_success(&format!("Removed '{}'", dir.display()));
        }
        Ok(())
    }

    /// Stage 2: runs the generator once per tree and collects each tree's
    /// pages into its own output directory.
    pub fn generate(&self) -> Result<()> {
        print_task_start("Generating Documentation", BOOKS, BLUE);
        for tree in &self.manifest.trees {
            self.generate_tree(tree)?;
        }
        Ok(())
    }

    fn generate_tree(&self, tree: &DocTree) -> Result<()> {
        let staging = self.tree_staging(tree);
        let out = self.tree_out(tree);
        print_info(&format!(
            "Rendering '{}' from '{}' (theme: {}, edition: {})",
            tree.name,
            tree.source.display(),
            tree.theme,
            tree.edition
        ));

        let ctx = RenderContext {
            tree,
            staging: &staging,
            out: &out,
        };
        let args = self
            .manifest
            .generator
            .args
            .iter()
            .map(|template| DocTree::render(template, &ctx))
            .collect::<Result<Vec<_>>>()?;

        let invocation = Invocation::new(
            format!("Docs for {}", tree.name),
            &self.manifest.generator.program,
            &self.root,
        )
        .args(args);
        self.runner
            .run(&invocation)
            .with_context(|| format!("Documentation generator failed for tree '{}'", tree.name))?;

        if self.runner.is_dry_run() {
            return Ok(());
        }

        let collected = staging.join(&self.manifest.generator.collect);
        if !collected.is_dir() {
            anyhow::bail!(
                "Generator produced no output for tree '{}' at '{}'",
                tree.name,
                collected.display()
            );
        }
        let copied = copy_dir_all(&collected, &out)?;
        print_success(&format!(
            "Collected {} files for '{}' into '{}'",
            copied,
            tree.name,
            out.display()
        ));
        Ok(())
    }

    /// Stage 3: copies the root static files into the site and into every
    /// tree, then writes the landing page.
    pub fn copy_static(&self) -> Result<()> {
        print_task_start("Copying Static Files", PACKAGE, MAGENTA);
        let out_dir = self.out_dir();
        let mut targets = vec![out_dir.clone()];
        targets.extend(self.manifest.trees.iter().map(|t| self.tree_out(t)));

        for file in &self.manifest.static_files {
            let source = self.root.join(file);
            if !source.is_file() {
                anyhow::bail!("Static file '{}' not found", source.display());
            }
            let file_name = source
                .file_name()
                .with_context(|| format!("Static file '{}' has no file name", source.display()))?;

            for target in &targets {
                let dest = target.join(file_name);
                if self.runner.is_dry_run() {
                    print_info(&format!("Would copy '{}' to '{}'", source.display(), dest.display()));
                    continue;
                }
                fs::create_dir_all(target)
                    .with_context(|| format!("Failed to create '{}'", target.display()))?;
                fs::copy(&source, &dest).with_context(|| {
                    format!("Failed to copy '{}' to '{}'", source.display(), dest.display())
                })?;
                log::debug!("Copied '{}' to '{}'", source.display(), dest.display());
            }
        }

        let index = out_dir.join("index.html");
        if self.runner.is_dry_run() {
            print_info(&format!("Would write landing page '{}'", index.display()));
        } else {
            fs::create_dir_all(&out_dir)
                .with_context(|| format!("Failed to create '{}'", out_dir.display()))?;
            fs::write(&index, self.landing_page())
                .with_context(|| format!("Failed to write '{}'", index.display()))?;
        }
        print_success(&format!(
            "Copied {} static files into {} locations",
            self.manifest.static_files.len(),
            targets.len()
        ));
        Ok(())
    }

    fn landing_page(&self) -> String {
        let mut items = String::new();
        for tree in &self.manifest.trees {
            let href = format!("{}/{}", tree.out.display(), tree.entry()).replace('\\', "/");
            items.push_str(&format!(
                "    <li><a href=\"{}\">{}</a></li>\n",
                escape_html(&href),
                escape_html(&tree.name)
            ));
        }
        format!(
            "<!DOCTYPE html>\n<html>\n<head>\n  <meta charset=\"utf-8\">\n  <title>Documentation</title>\n</head>\n<body>\n  <h1>Documentation</h1>\n  <ul>\n{items}  </ul>\n</body>\n</html>\n"
        )
    }

    /// Stage 4: pushes the site to the pages branch of the configured remote.
    pub fn publish(&self, options: &PublishOptions) -> Result<()> {
        print_task_start("Publishing Documentation", ROCKET, CYAN);
        let out_dir = self.out_dir();
        if !self.runner.is_dry_run() && !out_dir.is_dir() {
            anyhow::bail!(
                "Nothing to publish: '{}' does not exist, run the build first",
                out_dir.display()
            );
        }

        let config = &self.manifest.publish;
        let remote = options.remote.as_deref().unwrap_or(&config.remote);
        let branch = options.branch.as_deref().unwrap_or(&config.branch);
        let message = options.message.as_deref().unwrap_or(&config.message);
        let url = self.resolve_remote(remote)?;
        print_info(&format!("Publishing '{}' to {} ({})", out_dir.display(), url, branch));

        let git = |name: &str, args: &[&str]| {
            let invocation = Invocation::new(name, "git", &out_dir).args(args.iter().copied());
            self.runner.run(&invocation)
        };
        git("Init pages repository", &["init", "--quiet"])?;
        git("Switch pages branch", &["checkout", "-B", branch])?;
        git("Stage pages", &["add", "--all"])?;
        git("Commit pages", &["commit", "--quiet", "-m", message])?;
        let refspec = format!("HEAD:{branch}");
        git("Push pages", &["push", "--force", url.as_str(), refspec.as_str()])?;
        Ok(())
    }

    /// Turns a remote name of the workspace repository into its URL.
    /// URLs and local paths (anything with a path separator) pass through.
    fn resolve_remote(&self, remote: &str) -> Result<String> {
        let is_path = remote.contains('/') || remote.contains('\\') || remote == "." || remote == "..";
        if remote.contains("://") || remote.starts_with("git@") || is_path {
            return Ok(remote.to_string());
        }
        let invocation =
            Invocation::new("Resolve remote", "git", &self.root).args(["remote", "get-url", remote]);
        self.runner
            .capture(&invocation)
            .with_context(|| format!("Failed to resolve git remote '{remote}'"))
    }

    /// clean → docs → static.
    pub fn build(&self) -> Result<()> {
        let stages: [Stage<'_>; 3] = [
            ("Clean", &|| self.clean()),
            ("Docs", &|| self.generate()),
            ("Static", &|| self.copy_static()),
        ];
        run_stages(&stages)
    }

    /// clean → docs → static → publish.
    pub fn build_and_publish(&self, options: &PublishOptions) -> Result<()> {
        let stages: [Stage<'_>; 4] = [
            ("Clean", &|| self.clean()),
            ("Docs", &|| self.generate()),
            ("Static", &|| self.copy_static()),
            ("Publish", &|| self.publish(options)),
        ];
        run_stages(&stages)
    }
}

fn run_stages(stages: &[Stage<'_>]) -> Result<()> {
    println!("{}", BANNER);
    let names: Vec<&str> = stages.iter().map(|(name, _)| *name).collect();
    println!("{}💡 Pipeline:{} {}", BOLD, RESET, names.join(" → "));

    let start_time = Instant::now();
    let total = stages.len();
    for (i, (name, stage)) in stages.iter().enumerate() {
        println!("\n{}{}[{}/{}] {} Phase{}", BOLD, BLUE, i + 1, total, name, RESET);
        if let Err(e) = stage() {
            print_error(&format!("{name} stage failed: {e:#}"));
            print_summary(i, total, start_time.elapsed());
            return Err(e.context(format!("Pipeline aborted at the {name} stage")));
        }
    }
    print_summary(total, total, start_time.elapsed());
    Ok(())
}

/// Recursively copies `from` into `to`, returning the number of files copied.
fn copy_dir_all(from: &Path, to: &Path) -> Result<usize> {
    let mut copied = 0;
    for entry in WalkDir::new(from) {
        let entry = entry.with_context(|| format!("Failed to walk '{}'", from.display()))?;
        let relative = entry.path().strip_prefix(from)?;
        let dest = to.join(relative);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&dest)
                .with_context(|| format!("Failed to create '{}'", dest.display()))?;
        } else if entry.file_type().is_file() {
            fs::copy(entry.path(), &dest).with_context(|| {
                format!("Failed to copy '{}' to '{}'", entry.path().display(), dest.display())
            })?;
            copied += 1;
        }
    }
    Ok(copied)
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::testing::RecordingRunner;
    use crate::runner::DryRunRunner;
    use std::collections::HashMap;
    use tempfile::TempDir;

    /// A workspace with the root static files and the manifests of both
    /// documented packages.
    fn workspace() -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("README.md"), "# readme").unwrap();
        fs::write(dir.path().join("LICENSE"), "licence text").unwrap();
        for (source, package) in [("crates/motion-core", "motion-core"), ("xtask", "xtask")] {
            let src = dir.path().join(source).join("src");
            fs::create_dir_all(&src).unwrap();
            fs::write(src.join("lib.rs"), "").unwrap();
            fs::write(
                dir.path().join(source).join("Cargo.toml"),
                format!("[package]\nname = \"{package}\"\nedition = \"2021\"\n"),
            )
            .unwrap();
        }
        dir
    }

    /// Pretends to be the generator: writes a page into `{staging}/doc`.
    fn fake_generator() -> Box<dyn Fn(&Invocation)> {
        Box::new(|inv: &Invocation| {
            let staging = inv
                .args
                .iter()
                .position(|a| a == "--target-dir")
                .map(|i| PathBuf::from(&inv.args[i + 1]))
                .unwrap();
            let package = inv
                .args
                .iter()
                .position(|a| a == "--manifest-path")
                .and_then(|i| Path::new(&inv.args[i + 1]).parent()?.file_name())
                .map(|dir| dir.to_string_lossy().replace('-', "_"))
                .unwrap();
            let page_dir = staging.join("doc").join(&package);
            fs::create_dir_all(&page_dir).unwrap();
            fs::write(page_dir.join("index.html"), format!("<h1>{package}</h1>")).unwrap();
        })
    }

    fn recording_runner() -> RecordingRunner {
        let mut effects: HashMap<String, Box<dyn Fn(&Invocation)>> = HashMap::new();
        effects.insert("Docs for Motion Core API".to_string(), fake_generator());
        effects.insert("Docs for Build Tooling".to_string(), fake_generator());
        RecordingRunner {
            effects,
            ..Default::default()
        }
    }

    #[test]
    fn test_build_produces_independent_trees_with_static_files() {
        // --- 1. ARRANGE ---
        let ws = workspace();
        let runner = recording_runner();
        let pipeline = DocsPipeline::new(ws.path(), DocsManifest::default(), &runner).unwrap();

        // --- 2. ACT ---
        pipeline.build().expect("pipeline should succeed");

        // --- 3. ASSERT ---
        let docs = ws.path().join("docs");
        for (tree, krate) in [("api", "motion_core"), ("tooling", "xtask")] {
            let tree_dir = docs.join(tree);
            assert!(tree_dir.join(krate).join("index.html").is_file());
            assert_eq!(fs::read_to_string(tree_dir.join("README.md")).unwrap(), "# readme");
            assert!(tree_dir.join("LICENSE").is_file());
        }
        // Each tree holds only its own crate.
        assert!(!docs.join("api").join("xtask").exists());
        assert!(!docs.join("tooling").join("motion_core").exists());

        assert!(docs.join("README.md").is_file());
        let index = fs::read_to_string(docs.join("index.html")).unwrap();
        assert!(index.contains("<a href=\"api/motion_core/index.html\">Motion Core API</a>"));
        assert!(index.contains("<a href=\"tooling/xtask/index.html\">Build Tooling</a>"));

        let calls = runner.calls.borrow();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].program, "cargo");
        assert!(calls[0].args.contains(&"light".to_string()));
        assert!(calls[1].args.contains(&"ayu".to_string()));
    }

    #[test]
    fn test_clean_removes_previous_output() {
        let ws = workspace();
        let stale = ws.path().join("docs").join("stale.html");
        fs::create_dir_all(stale.parent().unwrap()).unwrap();
        fs::write(&stale, "old").unwrap();

        let runner = recording_runner();
        let pipeline = DocsPipeline::new(ws.path(), DocsManifest::default(), &runner).unwrap();
        pipeline.build().unwrap();

        assert!(!stale.exists());
    }

    #[test]
    fn test_generator_failure_aborts_before_static_stage() {
        let ws = workspace();
        let mut runner = recording_runner();
        runner.failing.push("Docs for Motion Core API".to_string());
        let pipeline = DocsPipeline::new(ws.path(), DocsManifest::default(), &runner).unwrap();

        let err = pipeline.build().unwrap_err();

        assert!(format!("{err:#}").contains("Docs stage"));
        // The second tree is never attempted and nothing is copied.
        assert_eq!(runner.calls.borrow().len(), 1);
        assert!(!ws.path().join("docs").join("README.md").exists());
    }

    #[test]
    fn test_missing_generator_output_is_an_error() {
        let ws = workspace();
        let runner = RecordingRunner::default();
        let pipeline = DocsPipeline::new(ws.path(), DocsManifest::default(), &runner).unwrap();

        let err = pipeline.generate().unwrap_err();
        assert!(err.to_string().contains("produced no output"));
    }

    #[test]
    fn test_missing_static_file_aborts() {
        let ws = workspace();
        fs::remove_file(ws.path().join("LICENSE")).unwrap();
        let runner = recording_runner();
        let pipeline = DocsPipeline::new(ws.path(), DocsManifest::default(), &runner).unwrap();

        let err = pipeline.build().unwrap_err();
        assert!(format!("{err:#}").contains("LICENSE"));
    }

    #[test]
    fn test_overlapping_trees_are_rejected_up_front() {
        let ws = workspace();
        let mut manifest = DocsManifest::default();
        manifest.trees[1].out = PathBuf::from("api/tooling");
        let runner = RecordingRunner::default();

        assert!(DocsPipeline::new(ws.path(), manifest, &runner).is_err());
        assert!(runner.calls.borrow().is_empty());
    }

    #[test]
    fn test_publish_pushes_to_resolved_remote() {
        let ws = workspace();
        let mut runner = recording_runner();
        runner.outputs.insert(
            "Resolve remote".to_string(),
            "https://example.com/motion-sdk.git".to_string(),
        );
        let pipeline = DocsPipeline::new(ws.path(), DocsManifest::default(), &runner).unwrap();

        pipeline
            .build_and_publish(&PublishOptions::default())
            .expect("publish should succeed");

        let calls = runner.calls.borrow();
        let git: Vec<&Invocation> = calls.iter().filter(|c| c.program == "git").collect();
        assert_eq!(git[0].args, vec!["remote", "get-url", "origin"]);
        assert_eq!(git[0].cwd, ws.path());
        let push = git.last().unwrap();
        assert_eq!(
            push.args,
            vec!["push", "--force", "https://example.com/motion-sdk.git", "HEAD:gh-pages"]
        );
        assert_eq!(push.cwd, ws.path().join("docs"));
    }

    #[test]
    fn test_publish_uses_explicit_url_and_overrides() {
        let ws = workspace();
        fs::create_dir_all(ws.path().join("docs")).unwrap();
        let runner = RecordingRunner::default();
        let pipeline = DocsPipeline::new(ws.path(), DocsManifest::default(), &runner).unwrap();

        let options = PublishOptions {
            remote: Some("git@example.com:motion/sdk.git".to_string()),
            branch: Some("pages".to_string()),
            message: Some("Docs".to_string()),
        };
        pipeline.publish(&options).unwrap();

        let calls = runner.calls.borrow();
        assert!(calls.iter().all(|c| c.task_name != "Resolve remote"));
        assert!(calls
            .iter()
            .any(|c| c.args == vec!["checkout", "-B", "pages"]));
        assert!(calls
            .iter()
            .any(|c| c.args == vec!["commit", "--quiet", "-m", "Docs"]));
    }

    #[test]
    fn test_publish_without_build_output_fails() {
        let ws = workspace();
        let runner = RecordingRunner::default();
        let pipeline = DocsPipeline::new(ws.path(), DocsManifest::default(), &runner).unwrap();
        assert!(pipeline.publish(&PublishOptions::default()).is_err());
    }

    #[test]
    fn test_dry_run_touches_nothing() {
        let ws = workspace();
        let stale = ws.path().join("docs").join("stale.html");
        fs::create_dir_all(stale.parent().unwrap()).unwrap();
        fs::write(&stale, "old").unwrap();

        let pipeline = DocsPipeline::new(ws.path(), DocsManifest::default(), &DryRunRunner).unwrap();
        pipeline.build_and_publish(&PublishOptions::default()).unwrap();

        assert!(stale.exists());
        assert!(!ws.path().join("docs").join("index.html").exists());
    }

    #[test]
    fn test_escapes_landing_page_text() {
        assert_eq!(escape_html("<a & \"b\">"), "&lt;a &amp; &quot;b&quot;&gt;");
    }

    #[test]
    fn test_generator_receives_each_tree_settings() {
        let ws = workspace();
        let mut manifest = DocsManifest::default();
        manifest.trees[1].format = "json".to_string();
        let runner = recording_runner();
        let pipeline = DocsPipeline::new(ws.path(), manifest, &runner).unwrap();

        pipeline.build().unwrap();

        let calls = runner.calls.borrow();
        let flag = |i: usize, name: &str| {
            let args = &calls[i].args;
            let at = args.iter().position(|a| a == name).unwrap();
            args[at + 1].clone()
        };
        assert_eq!(flag(0, "--manifest-path"), "crates/motion-core/Cargo.toml");
        assert_eq!(flag(0, "--output-format"), "html");
        assert_eq!(flag(1, "--manifest-path"), "xtask/Cargo.toml");
        assert_eq!(flag(1, "--output-format"), "json");
    }

    #[test]
    fn test_edition_must_match_package_manifest() {
        let ws = workspace();
        let mut manifest = DocsManifest::default();
        manifest.trees[0].edition = "2018".to_string();
        let runner = RecordingRunner::default();

        let Err(err) = DocsPipeline::new(ws.path(), manifest, &runner) else {
            panic!("mismatched edition should be rejected");
        };

        let err = err.to_string();
        assert!(err.contains("edition 2018"), "unexpected error: {err}");
        assert!(runner.calls.borrow().is_empty());
    }

    #[test]
    fn test_edition_inherited_from_workspace() {
        let ws = workspace();
        fs::write(
            ws.path().join("Cargo.toml"),
            "[workspace]\nmembers = [\"xtask\"]\n\n[workspace.package]\nedition = \"2024\"\n",
        )
        .unwrap();
        fs::write(
            ws.path().join("xtask").join("Cargo.toml"),
            "[package]\nname = \"xtask\"\nedition.workspace = true\n",
        )
        .unwrap();
        let mut manifest = DocsManifest::default();
        let runner = RecordingRunner::default();

        assert!(DocsPipeline::new(ws.path(), manifest.clone(), &runner).is_err());
        manifest.trees[1].edition = "2024".to_string();
        DocsPipeline::new(ws.path(), manifest, &runner).unwrap();
    }

    #[test]
    fn test_output_over_sources_is_rejected_before_clean() {
        // --- 1. ARRANGE ---
        let ws = workspace();
        let sources = ws.path().join("xtask").join("src").join("lib.rs");
        let mut manifest = DocsManifest::default();
        manifest.out_dir = PathBuf::from("xtask");
        let runner = RecordingRunner::default();

        // --- 2. ACT ---
        let result = DocsPipeline::new(ws.path(), manifest, &runner).and_then(|p| p.build());

        // --- 3. ASSERT ---
        let err = result.unwrap_err().to_string();
        assert!(err.contains("sources of tree 'Build Tooling'"), "unexpected error: {err}");
        assert!(sources.is_file());
    }

    #[test]
    fn test_publish_to_relative_path_skips_remote_lookup() {
        let ws = workspace();
        fs::create_dir_all(ws.path().join("docs")).unwrap();
        let runner = RecordingRunner::default();
        let pipeline = DocsPipeline::new(ws.path(), DocsManifest::default(), &runner).unwrap();

        let options = PublishOptions {
            remote: Some("../pages.git".to_string()),
            ..Default::default()
        };
        pipeline.publish(&options).unwrap();

        let calls = runner.calls.borrow();
        assert!(calls.iter().all(|c| c.task_name != "Resolve remote"));
        let push = calls.last().unwrap();
        assert_eq!(push.args, vec!["push", "--force", "../pages.git", "HEAD:gh-pages"]);
    }
}
