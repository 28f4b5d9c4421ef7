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

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::helpers::print_info;

/// Represents the structure of the `Docs.toml` manifest file.
#[derive(Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct DocsManifest {
    /// Where the combined documentation site is written.
    #[serde(default = "default_out_dir")]
    pub out_dir: PathBuf,
    /// Scratch space handed to the generator, one subdirectory per tree.
    #[serde(default = "default_staging_dir")]
    pub staging_dir: PathBuf,
    /// Root-level files copied next to the generated pages.
    #[serde(default = "default_static_files")]
    pub static_files: Vec<PathBuf>,
    #[serde(default)]
    pub generator: GeneratorConfig,
    #[serde(default)]
    pub publish: PublishConfig,
    /// The independent source trees to document.
    #[serde(rename = "tree", default = "default_trees")]
    pub trees: Vec<DocTree>,
}

/// How the external documentation generator is invoked.
#[derive(Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct GeneratorConfig {
    pub program: String,
    /// Argument templates. See [`DocTree::render`] for the placeholders.
    pub args: Vec<String>,
    /// Directory, relative to the tree's staging directory, holding the
    /// rendered pages once the generator exits.
    #[serde(default = "default_collect")]
    pub collect: PathBuf,
}

/// Where `publish` pushes the rendered site.
#[derive(Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct PublishConfig {
    /// A git remote name of this repository, or a URL.
    pub remote: String,
    pub branch: String,
    pub message: String,
}

/// One documentation source tree.
#[derive(Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct DocTree {
    /// Display name, used on the landing page.
    pub name: String,
    /// The cargo package that owns the sources.
    pub package: String,
    /// Source directory, relative to the workspace root.
    pub source: PathBuf,
    /// Output subdirectory inside the manifest's `out_dir`.
    pub out: PathBuf,
    /// Visual theme for the rendered pages.
    pub theme: String,
    /// Target language level of the sources.
    #[serde(default = "default_edition")]
    pub edition: String,
    /// Output format the generator is asked for.
    #[serde(default = "default_format")]
    pub format: String,
    /// Page the landing page links to, relative to the tree's output.
    pub entry: Option<String>,
}

fn default_out_dir() -> PathBuf {
    PathBuf::from("docs")
}

fn default_staging_dir() -> PathBuf {
    PathBuf::from("target/xtask-docs")
}

fn default_static_files() -> Vec<PathBuf> {
    vec![PathBuf::from("README.md"), PathBuf::from("LICENSE")]
}

fn default_collect() -> PathBuf {
    PathBuf::from("doc")
}

fn default_edition() -> String {
    "2021".to_string()
}

fn default_format() -> String {
    "html".to_string()
}

fn default_trees() -> Vec<DocTree> {
    vec![
        DocTree {
            name: "Motion Core API".to_string(),
            package: "motion-core".to_string(),
            source: PathBuf::from("crates/motion-core"),
            out: PathBuf::from("api"),
            theme: "light".to_string(),
            edition: default_edition(),
            format: default_format(),
            entry: None,
        },
        DocTree {
            name: "Build Tooling".to_string(),
            package: "xtask".to_string(),
            source: PathBuf::from("xtask"),
            out: PathBuf::from("tooling"),
            theme: "ayu".to_string(),
            edition: default_edition(),
            format: default_format(),
            entry: None,
        },
    ]
}

impl Default for GeneratorConfig {
    /// `cargo rustdoc` on the tree's manifest, themed and formatted per tree.
    fn default() -> Self {
        let args = [
            "rustdoc",
            "--manifest-path",
            "{source}/Cargo.toml",
            "--target-dir",
            "{staging}",
            "--",
            "--default-theme",
            "{theme}",
            "--output-format",
            "{format}",
        ];
        Self {
            program: "cargo".to_string(),
            args: args.iter().map(|s| s.to_string()).collect(),
            collect: default_collect(),
        }
    }
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            remote: "origin".to_string(),
            branch: "gh-pages".to_string(),
            message: "Update documentation".to_string(),
        }
    }
}

impl Default for DocsManifest {
    /// Provides the configuration used when `Docs.toml` is not found: the
    /// object-model crate and the build tooling, each in its own theme.
    fn default() -> Self {
        Self {
            out_dir: default_out_dir(),
            staging_dir: default_staging_dir(),
            static_files: default_static_files(),
            generator: GeneratorConfig::default(),
            publish: PublishConfig::default(),
            trees: default_trees(),
        }
    }
}

/// Placeholder values for one generator run.
pub struct RenderContext<'a> {
    pub tree: &'a DocTree,
    pub staging: &'a Path,
    pub out: &'a Path,
}

impl DocTree {
    /// Page the landing page links to. Defaults to the crate index rustdoc writes.
    pub fn entry(&self) -> String {
        self.entry
            .clone()
            .unwrap_or_else(|| format!("{}/index.html", self.package.replace('-', "_")))
    }

    /// Substitutes the placeholders in one argument template.
    ///
    /// Known placeholders: `{name}`, `{package}`, `{source}`, `{out}`,
    /// `{staging}`, `{theme}`, `{edition}`, `{format}`. `{{` and `}}` are
    /// literal braces.
    pub fn render(template: &str, ctx: &RenderContext<'_>) -> Result<String> {
        let mut rendered = String::with_capacity(template.len());
        let mut chars = template.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                '{' if chars.peek() == Some(&'{') => {
                    chars.next();
                    rendered.push('{');
                }
                '}' if chars.peek() == Some(&'}') => {
                    chars.next();
                    rendered.push('}');
                }
                '{' => {
                    let mut key = String::new();
                    loop {
                        match chars.next() {
                            Some('}') => break,
                            Some(k) => key.push(k),
                            None => anyhow::bail!("Unterminated placeholder in '{template}'"),
                        }
                    }
                    let value = match key.as_str() {
                        "name" => ctx.tree.name.clone(),
                        "package" => ctx.tree.package.clone(),
                        "source" => ctx.tree.source.display().to_string(),
                        "out" => ctx.out.display().to_string(),
                        "staging" => ctx.staging.display().to_string(),
                        "theme" => ctx.tree.theme.clone(),
                        "edition" => ctx.tree.edition.clone(),
                        "format" => ctx.tree.format.clone(),
                        other => anyhow::bail!("Unknown placeholder '{{{other}}}' in '{template}'"),
                    };
                    rendered.push_str(&value);
                }
                other => rendered.push(other),
            }
        }
        Ok(rendered)
    }
}

impl DocsManifest {
    /// Checks that the trees can be rendered independently.
    ///
    /// Output directories must be distinct and must not nest, otherwise one
    /// tree's pages would land inside (or overwrite) another's. `out_dir` and
    /// `staging_dir` are wiped by the clean stage, so neither may overlap the
    /// other or any tree's sources.
    pub fn validate(&self) -> Result<()> {
        let out_dir = check_relative("out_dir", &self.out_dir)?;
        let staging_dir = check_relative("staging_dir", &self.staging_dir)?;
        if overlaps(&out_dir, &staging_dir) {
            anyhow::bail!(
                "out_dir ('{}') and staging_dir ('{}') overlap",
                self.out_dir.display(),
                self.staging_dir.display()
            );
        }

        if self.trees.is_empty() {
            anyhow::bail!("Docs manifest declares no [[tree]] entries");
        }

        let mut names = HashSet::new();
        let mut outs = Vec::with_capacity(self.trees.len());
        for tree in &self.trees {
            outs.push(check_relative(&format!("tree '{}' out", tree.name), &tree.out)?);
            if !names.insert(tree.name.as_str()) {
                anyhow::bail!("Tree name '{}' is declared more than once", tree.name);
            }

            let source = check_source(tree)?;
            for (what, dir, raw) in [
                ("out_dir", &out_dir, &self.out_dir),
                ("staging_dir", &staging_dir, &self.staging_dir),
            ] {
                // A source at the workspace root contains every output.
                let nested = dir.starts_with(&source) && !source.as_os_str().is_empty();
                if source.starts_with(dir) || nested {
                    anyhow::bail!(
                        "{} ('{}') overlaps the sources of tree '{}' ('{}')",
                        what,
                        raw.display(),
                        tree.name,
                        tree.source.display()
                    );
                }
            }

            for template in &self.generator.args {
                let ctx = RenderContext {
                    tree,
                    staging: Path::new(""),
                    out: Path::new(""),
                };
                DocTree::render(template, &ctx)
                    .with_context(|| format!("Invalid generator argument for tree '{}'", tree.name))?;
            }
        }

        for (i, (a, a_out)) in self.trees.iter().zip(&outs).enumerate() {
            for (b, b_out) in self.trees[i + 1..].iter().zip(&outs[i + 1..]) {
                if overlaps(a_out, b_out) {
                    anyhow::bail!(
                        "Output of tree '{}' ('{}') overlaps output of tree '{}' ('{}')",
                        a.name,
                        a.out.display(),
                        b.name,
                        b.out.display()
                    );
                }
            }
        }
        Ok(())
    }

    /// Checks each tree's `edition` against the one its package declares.
    ///
    /// `cargo rustdoc` already forwards the package edition to rustdoc, so a
    /// configured edition that disagrees would be silently ignored.
    pub fn check_editions(&self, root: &Path) -> Result<()> {
        for tree in &self.trees {
            let declared = package_edition(root, &tree.source)?;
            if declared != tree.edition {
                anyhow::bail!(
                    "Tree '{}' is configured for edition {} but '{}' declares edition {}",
                    tree.name,
                    tree.edition,
                    tree.source.join("Cargo.toml").display(),
                    declared
                );
            }
        }
        Ok(())
    }
}

/// Rejects absolute and parent-relative paths, as well as paths naming the
/// workspace root itself. Returns the path reduced to its normal components,
/// so `./api` and `api` compare equal.
fn check_relative(what: &str, path: &Path) -> Result<PathBuf> {
    let normalized = normalized(what, path)?;
    if normalized.as_os_str().is_empty() {
        anyhow::bail!("{} must name a subdirectory, got '{}'", what, path.display());
    }
    Ok(normalized)
}

/// Like `check_relative`, but a tree may be the workspace root.
fn check_source(tree: &DocTree) -> Result<PathBuf> {
    normalized(&format!("tree '{}' source", tree.name), &tree.source)
}

fn normalized(what: &str, path: &Path) -> Result<PathBuf> {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Normal(part) => normalized.push(part),
            Component::CurDir => {}
            _ => anyhow::bail!(
                "{} must be a relative path inside the workspace, got '{}'",
                what,
                path.display()
            ),
        }
    }
    Ok(normalized)
}

fn overlaps(a: &Path, b: &Path) -> bool {
    a.starts_with(b) || b.starts_with(a)
}

/// Reads `package.edition` from `<root>/<source>/Cargo.toml`, following
/// `edition.workspace = true` to the workspace manifest.
fn package_edition(root: &Path, source: &Path) -> Result<String> {
    let manifest_path = root.join(source).join("Cargo.toml");
    let manifest = read_toml(&manifest_path)?;
    match manifest.get("package").and_then(|p| p.get("edition")) {
        // Cargo's default when the key is absent.
        None => Ok("2015".to_string()),
        Some(toml::Value::String(edition)) => Ok(edition.clone()),
        Some(toml::Value::Table(t)) if t.get("workspace") == Some(&toml::Value::Boolean(true)) => {
            let workspace_path = root.join("Cargo.toml");
            read_toml(&workspace_path)?
                .get("workspace")
                .and_then(|w| w.get("package"))
                .and_then(|p| p.get("edition"))
                .and_then(|e| e.as_str())
                .map(str::to_string)
                .with_context(|| {
                    format!(
                        "'{}' inherits its edition but '{}' declares no [workspace.package] edition",
                        manifest_path.display(),
                        workspace_path.display()
                    )
                })
        }
        Some(other) => anyhow::bail!(
            "Unsupported edition value '{}' in '{}'",
            other,
            manifest_path.display()
        ),
    }
}

fn read_toml(path: &Path) -> Result<toml::Table> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read '{}'", path.display()))?;
    toml::from_str(&text).with_context(|| format!("Failed to parse TOML from '{}'", path.display()))
}

/// Loads the `Docs.toml` manifest.
/// If the file does not exist, it returns the default configuration.
pub fn load_manifest(manifest_path: &Path) -> Result<DocsManifest> {
    let manifest: DocsManifest = if manifest_path.exists() {
        print_info(&format!(
            "Found '{}'. Loading configuration.",
            manifest_path.display()
        ));
        let manifest_str = fs::read_to_string(manifest_path).with_context(|| {
            format!(
                "Failed to read manifest file at '{}'",
                manifest_path.display()
            )
        })?;
        toml::from_str(&manifest_str)
            .with_context(|| format!("Failed to parse TOML from '{}'", manifest_path.display()))?
    } else {
        print_info(&format!(
            "No '{}' found. Using default configuration.",
            manifest_path.display()
        ));
        DocsManifest::default()
    };

    manifest.validate()?;
    Ok(manifest)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree(name: &str, out: &str) -> DocTree {
        DocTree {
            name: name.to_string(),
            package: "motion-core".to_string(),
            source: PathBuf::from("crates/motion-core"),
            out: PathBuf::from(out),
            theme: "light".to_string(),
            edition: default_edition(),
            format: default_format(),
            entry: None,
        }
    }

    #[test]
    fn test_default_manifest_is_valid() {
        let manifest = DocsManifest::default();
        assert_eq!(manifest.trees.len(), 2);
        manifest.validate().expect("default manifest should validate");
    }

    #[test]
    fn test_parses_manifest_with_defaults() {
        let manifest: DocsManifest = toml::from_str(
            r#"
            out_dir = "site"

            [[tree]]
            name = "Core"
            package = "motion-core"
            source = "crates/motion-core"
            out = "core"
            theme = "dark"
            "#,
        )
        .unwrap();
        assert_eq!(manifest.out_dir, PathBuf::from("site"));
        assert_eq!(manifest.trees.len(), 1);
        assert_eq!(manifest.trees[0].edition, "2021");
        assert_eq!(manifest.generator.program, "cargo");
        assert_eq!(manifest.publish.branch, "gh-pages");
        assert_eq!(manifest.static_files.len(), 2);
    }

    #[test]
    fn test_rejects_unknown_keys() {
        let parsed: Result<DocsManifest, _> = toml::from_str("outdir = \"x\"");
        assert!(parsed.is_err());
    }

    #[test]
    fn test_rejects_overlapping_outputs() {
        let mut manifest = DocsManifest::default();
        manifest.trees = vec![tree("A", "api"), tree("B", "api/nested")];
        let err = manifest.validate().unwrap_err().to_string();
        assert!(err.contains("overlaps"), "unexpected error: {err}");

        manifest.trees = vec![tree("A", "api"), tree("B", "api")];
        assert!(manifest.validate().is_err());

        manifest.trees = vec![tree("A", "api"), tree("B", "./api")];
        assert!(manifest.validate().is_err());

        manifest.trees = vec![tree("A", "./api/."), tree("B", "api/nested")];
        assert!(manifest.validate().is_err());

        // Sibling directories sharing a prefix are fine.
        manifest.trees = vec![tree("A", "api"), tree("B", "api2")];
        manifest.validate().unwrap();
    }

    #[test]
    fn test_rejects_duplicate_names_and_escaping_paths() {
        let mut manifest = DocsManifest::default();
        manifest.trees = vec![tree("A", "one"), tree("A", "two")];
        assert!(manifest.validate().is_err());

        manifest.trees = vec![tree("A", "../outside")];
        assert!(manifest.validate().is_err());

        manifest.trees = vec![tree("A", "one")];
        manifest.out_dir = PathBuf::from(".");
        assert!(manifest.validate().is_err());
    }

    #[test]
    fn test_renders_placeholders() {
        let t = tree("Core API", "api");
        let ctx = RenderContext {
            tree: &t,
            staging: Path::new("target/stage/api"),
            out: Path::new("docs/api"),
        };
        assert_eq!(DocTree::render("{package}", &ctx).unwrap(), "motion-core");
        assert_eq!(
            DocTree::render("--title={name}@{theme}", &ctx).unwrap(),
            "--title=Core API@light"
        );
        assert_eq!(DocTree::render("{staging}", &ctx).unwrap(), "target/stage/api");
        assert_eq!(DocTree::render("{{literal}}", &ctx).unwrap(), "{literal}");
        assert!(DocTree::render("{nope}", &ctx).is_err());
        assert!(DocTree::render("{package", &ctx).is_err());
    }

    #[test]
    fn test_entry_defaults_to_crate_index() {
        assert_eq!(tree("A", "a").entry(), "motion_core/index.html");
    }

    #[test]
    fn test_missing_manifest_falls_back_to_default() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = load_manifest(&dir.path().join("Docs.toml")).unwrap();
        assert_eq!(manifest.out_dir, PathBuf::from("docs"));
    }

    #[test]
    fn test_rejects_output_over_sources() {
        let mut manifest = DocsManifest::default();
        for out_dir in ["xtask", "./crates", "crates/motion-core/docs"] {
            manifest.out_dir = PathBuf::from(out_dir);
            let err = manifest.validate().unwrap_err().to_string();
            assert!(err.contains("sources of tree"), "{out_dir}: {err}");
        }

        manifest.out_dir = default_out_dir();
        manifest.staging_dir = PathBuf::from("xtask/target");
        assert!(manifest.validate().is_err());

        // Staging inside the published site, or the other way round.
        manifest.staging_dir = PathBuf::from("docs/.staging");
        let err = manifest.validate().unwrap_err().to_string();
        assert!(err.contains("overlap"), "unexpected error: {err}");
        manifest.staging_dir = PathBuf::from(".");
        assert!(manifest.validate().is_err());
        manifest.staging_dir = PathBuf::from("./docs");
        assert!(manifest.validate().is_err());
    }

    #[test]
    fn test_source_may_be_workspace_root() {
        let mut manifest = DocsManifest::default();
        let mut root_tree = tree("Root", "root");
        root_tree.source = PathBuf::from(".");
        manifest.trees = vec![root_tree];
        manifest.validate().unwrap();

        manifest.trees[0].source = PathBuf::from("../elsewhere");
        assert!(manifest.validate().is_err());
    }

    #[test]
    fn test_checked_in_docs_toml_matches_defaults() {
        let manifest: DocsManifest = toml::from_str(include_str!("../../../Docs.toml")).unwrap();
        manifest.validate().unwrap();

        let root = Path::new(env!("CARGO_MANIFEST_DIR")).parent().unwrap();
        manifest.check_editions(root).unwrap();

        let defaults = DocsManifest::default();
        assert_eq!(manifest.out_dir, defaults.out_dir);
        assert_eq!(manifest.staging_dir, defaults.staging_dir);
        assert_eq!(manifest.static_files, defaults.static_files);
        assert_eq!(manifest.generator.program, defaults.generator.program);
        assert_eq!(manifest.generator.args, defaults.generator.args);
        assert_eq!(manifest.generator.collect, defaults.generator.collect);
        assert_eq!(manifest.publish.remote, defaults.publish.remote);
        assert_eq!(manifest.publish.branch, defaults.publish.branch);
        let summary = |m: &DocsManifest| {
            m.trees
                .iter()
                .map(|t| (t.name.clone(), t.source.clone(), t.out.clone(), t.theme.clone(), t.edition.clone(), t.format.clone()))
                .collect::<Vec<_>>()
        };
        assert_eq!(summary(&manifest), summary(&defaults));
    }

    #[test]
    fn test_rendered_default_args_carry_format() {
        let manifest = DocsManifest::default();
        for t in &manifest.trees {
            let ctx = RenderContext {
                tree: t,
                staging: Path::new("stage"),
                out: Path::new("out"),
            };
            let args = manifest
                .generator
                .args
                .iter()
                .map(|a| DocTree::render(a, &ctx))
                .collect::<Result<Vec<_>>>()
                .unwrap();
            let at = args.iter().position(|a| a == "--output-format").unwrap();
            assert_eq!(args[at + 1], t.format);
            let at = args.iter().position(|a| a == "--manifest-path").unwrap();
            assert_eq!(Path::new(&args[at + 1]), t.source.join("Cargo.toml"));
        }
    }

    #[test]
    fn test_package_edition_follows_workspace_inheritance() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("member")).unwrap();
        fs::write(
            dir.path().join("Cargo.toml"),
            "[workspace.package]\nedition = \"2024\"\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("member/Cargo.toml"),
            "[package]\nname = \"member\"\nedition = { workspace = true }\n",
        )
        .unwrap();
        assert_eq!(package_edition(dir.path(), Path::new("member")).unwrap(), "2024");

        fs::write(dir.path().join("member/Cargo.toml"), "[package]\nname = \"member\"\n").unwrap();
        assert_eq!(package_edition(dir.path(), Path::new("member")).unwrap(), "2015");

        assert!(package_edition(dir.path(), Path::new("missing")).is_err());
    }
}
