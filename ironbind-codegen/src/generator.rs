//! Generation driver.
//!
//! A run checks the hierarchy, validates every hint, renders one unit per
//! declaration in canonical order and only then touches the file system.
//! Units are written to a staging directory that replaces the target
//! directory once every unit is on disk.

use crate::backend::{Backend, RenderOptions, backend_for, find_clash};
use crate::error::CodegenError;
use crate::mapper::TypeMapper;
use crate::target::TargetLanguage;
use crate::view::DeclarationView;
use ironbind_schema::{Schema, canonical_order, check_hierarchy, validate_schema};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration of a generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Directory below which the target directory is created.
    pub output_root: PathBuf,
    /// Prefix of generated identifiers and file names.
    pub prefix: String,
    /// Target language.
    pub target: TargetLanguage,
    /// Whether setters check assigned values at runtime.
    pub safe: bool,
}

impl GeneratorConfig {
    /// Creates a configuration with no prefix and safe setters.
    #[must_use]
    pub fn new(output_root: impl Into<PathBuf>, target: TargetLanguage) -> Self {
        Self {
            output_root: output_root.into(),
            prefix: String::new(),
            target,
            safe: true,
        }
    }

    /// Sets the identifier prefix.
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Enables or disables runtime checks in setters.
    #[must_use]
    pub fn safe(mut self, safe: bool) -> Self {
        self.safe = safe;
        self
    }

    /// Returns the directory units are written to.
    #[must_use]
    pub fn output_dir(&self) -> PathBuf {
        self.output_root.join(self.target.directory())
    }

    /// Checks that the prefix can start identifiers of the target.
    ///
    /// # Errors
    /// Returns `CodegenError::InvalidPrefix` for characters outside
    /// `[A-Za-z0-9_]`, a leading digit, or a prefix that does not start
    /// with an uppercase letter when targeting Haskell, whose module and
    /// type names must be capitalized.
    pub fn validate(&self) -> Result<(), CodegenError> {
        let invalid = |reason| CodegenError::InvalidPrefix {
            prefix: self.prefix.clone(),
            target: self.target,
            reason,
        };
        let Some(first) = self.prefix.chars().next() else {
            return Ok(());
        };
        if !self
            .prefix
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            return Err(invalid("only ASCII letters, digits and '_' are allowed"));
        }
        if first.is_ascii_digit() {
            return Err(invalid("must not start with a digit"));
        }
        if self.target == TargetLanguage::Haskell && !first.is_ascii_uppercase() {
            return Err(invalid("must start with an uppercase letter"));
        }
        Ok(())
    }

    fn render_options(&self) -> RenderOptions<'_> {
        RenderOptions {
            safe: self.safe,
            prefix: &self.prefix,
        }
    }
}

/// Source text of one declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedUnit {
    /// Schema name of the declaration.
    pub declaration: String,
    /// File name below the output directory.
    pub file_name: String,
    /// Generated source text.
    pub contents: String,
}

/// Generates bindings for one schema.
pub struct Generator<'a> {
    schema: &'a Schema,
    config: &'a GeneratorConfig,
}

impl<'a> Generator<'a> {
    /// Creates a new generator.
    #[must_use]
    pub fn new(schema: &'a Schema, config: &'a GeneratorConfig) -> Self {
        Self { schema, config }
    }

    /// Checks the configuration and hierarchy and validates all hints.
    ///
    /// # Errors
    /// Returns `CodegenError::InvalidPrefix` for an unusable prefix,
    /// `CodegenError::Integrity` for a corrupt hierarchy and
    /// `CodegenError::Validation` holding every illegal hint usage.
    pub fn check(&self) -> Result<(), CodegenError> {
        self.config.validate()?;
        check_hierarchy(self.schema)?;
        if let Err(errors) = validate_schema(self.schema) {
            for error in errors.errors() {
                tracing::warn!("{}", error);
            }
            return Err(errors.into());
        }
        Ok(())
    }

    /// Checks the schema and renders every unit in memory.
    ///
    /// # Errors
    /// Returns the errors of [`check`](Self::check) and of building views,
    /// `CodegenError::NameCollision` if two declarations map to the same
    /// file or type name and `CodegenError::MemberCollision` if fields of
    /// one declaration map to the same identifier.
    pub fn render(&self) -> Result<Vec<GeneratedUnit>, CodegenError> {
        self.check()?;

        let target = self.config.target;
        let mapper = TypeMapper::new(self.schema, target, &self.config.prefix);
        let backend = backend_for(target);
        let options = self.config.render_options();

        let views = canonical_order(self.schema)
            .into_iter()
            .map(|id| DeclarationView::build(self.schema, &mapper, id))
            .collect::<Result<Vec<_>, _>>()?;
        check_names(&views, backend, &options)?;

        let mut units = Vec::with_capacity(views.len());
        for view in &views {
            let unit = GeneratedUnit {
                declaration: view.name.clone(),
                file_name: backend.file_name(view, &options),
                contents: backend.render(view, &options),
            };
            tracing::debug!("Rendered {} as {}", unit.declaration, unit.file_name);
            units.push(unit);
        }

        Ok(units)
    }

    /// Renders every unit and writes them to the output directory.
    ///
    /// Nothing is written if checking or rendering fails.
    ///
    /// # Returns
    /// Paths of the written files in canonical order.
    ///
    /// # Errors
    /// Returns the errors of [`render`](Self::render) and `CodegenError::Io`
    /// if the output cannot be written.
    pub fn generate(&self) -> Result<Vec<PathBuf>, CodegenError> {
        tracing::info!(
            "Generating {} bindings for {} declarations",
            self.config.target,
            self.schema.len()
        );
        let units = self.render()?;
        let dir = self.config.output_dir();
        let paths = write_units(&dir, &units)?;
        tracing::info!("Wrote {} units to {}", paths.len(), dir.display());
        Ok(paths)
    }
}

/// Writes units into `dir`, replacing its previous contents.
///
/// Units are first written to a hidden staging directory next to `dir`,
/// which is renamed into place after the last unit was written. On error
/// the staging directory is removed and `dir` is left untouched.
///
/// # Errors
/// Returns `CodegenError::Output` if `dir` has no parent or file name and
/// `CodegenError::Io` if a file operation fails.
pub fn write_units(dir: &Path, units: &[GeneratedUnit]) -> Result<Vec<PathBuf>, CodegenError> {
    let name = dir
        .file_name()
        .ok_or_else(|| CodegenError::output(dir, "output directory has no name"))?
        .to_string_lossy()
        .into_owned();
    let parent = dir
        .parent()
        .ok_or_else(|| CodegenError::output(dir, "output directory has no parent"))?;
    fs::create_dir_all(parent)?;

    let staging = parent.join(format!(".{name}.staging"));
    if staging.exists() {
        fs::remove_dir_all(&staging)?;
    }
    fs::create_dir(&staging)?;

    if let Err(e) = write_all(&staging, units) {
        tracing::error!("Failed to write units: {}", e);
        let _ = fs::remove_dir_all(&staging);
        return Err(e.into());
    }

    if dir.exists() {
        let retired = parent.join(format!(".{name}.old"));
        if retired.exists() {
            fs::remove_dir_all(&retired)?;
        }
        replace_dir(&staging, dir, &retired)?;
        fs::remove_dir_all(&retired)?;
    } else {
        fs::rename(&staging, dir)?;
    }

    Ok(units.iter().map(|unit| dir.join(&unit.file_name)).collect())
}

/// Moves `dir` to `retired` and `staging` to `dir`.
///
/// If the second move fails, `retired` is moved back so `dir` keeps its
/// previous contents.
fn replace_dir(staging: &Path, dir: &Path, retired: &Path) -> std::io::Result<()> {
    fs::rename(dir, retired)?;
    if let Err(e) = fs::rename(staging, dir) {
        tracing::error!("Failed to move {} into place: {}", staging.display(), e);
        fs::rename(retired, dir)?;
        let _ = fs::remove_dir_all(staging);
        return Err(e);
    }
    Ok(())
}

/// Rejects views whose units would overwrite each other or whose members
/// would share an identifier.
fn check_names(
    views: &[DeclarationView],
    backend: &dyn Backend,
    options: &RenderOptions<'_>,
) -> Result<(), CodegenError> {
    let mut files: HashMap<String, &str> = HashMap::with_capacity(views.len());
    let mut idents: HashMap<&str, &str> = HashMap::with_capacity(views.len());

    for view in views {
        let file_name = backend.file_name(view, options);
        if let Some(first) = files.get(&file_name) {
            return Err(CodegenError::NameCollision {
                name: file_name,
                first: (*first).to_string(),
                second: view.name.clone(),
            });
        }
        files.insert(file_name, &view.name);

        if let Some(first) = idents.insert(&view.ident, &view.name) {
            return Err(CodegenError::NameCollision {
                name: view.ident.clone(),
                first: first.to_string(),
                second: view.name.clone(),
            });
        }

        let members = backend.members(view, options);
        if let Some((first, second)) = find_clash(&members) {
            return Err(CodegenError::MemberCollision {
                declaration: view.name.clone(),
                name: second.name.clone(),
                first: first.origin(),
                second: second.origin(),
            });
        }
    }

    Ok(())
}

fn write_all(dir: &Path, units: &[GeneratedUnit]) -> std::io::Result<()> {
    for unit in units {
        fs::write(dir.join(&unit.file_name), &unit.contents)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ironbind_schema::{DeclarationSpec, FieldSpec, Hint, SchemaBuilder};

    fn schema() -> Schema {
        SchemaBuilder::new()
            .declaration(DeclarationSpec::new("Person").field(FieldSpec::new("name", "string")))
            .declaration(
                DeclarationSpec::new("Employee")
                    .extends("Person")
                    .field(FieldSpec::new("salary", "i32")),
            )
            .build()
            .expect("Failed to build")
    }

    #[test]
    fn test_config_builder() {
        let config = GeneratorConfig::new("/tmp/out", TargetLanguage::Haskell)
            .with_prefix("Sk")
            .safe(false);
        assert_eq!(config.prefix, "Sk");
        assert!(!config.safe);
        assert_eq!(config.output_dir(), PathBuf::from("/tmp/out/haskell"));
    }

    #[test]
    fn test_render_in_canonical_order() {
        let schema = schema();
        let config = GeneratorConfig::new("out", TargetLanguage::Rust);
        let units = Generator::new(&schema, &config).render().unwrap();
        let names: Vec<&str> = units.iter().map(|u| u.declaration.as_str()).collect();
        assert_eq!(names, ["Employee", "Person"]);
        assert_eq!(units[0].file_name, "employee.rs");
    }

    #[test]
    fn test_check_reports_all_violations() {
        let schema = SchemaBuilder::new()
            .declaration(DeclarationSpec::new("A").hint(Hint::Distributed))
            .declaration(
                DeclarationSpec::new("B")
                    .extends("A")
                    .hint(Hint::ReadOnly)
                    .field(FieldSpec::new("x", "i8").hint(Hint::Unique)),
            )
            .build()
            .unwrap();
        let config = GeneratorConfig::new("out", TargetLanguage::Cpp);
        match Generator::new(&schema, &config).render() {
            Err(CodegenError::Validation(errors)) => assert_eq!(errors.len(), 3),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_write_units_replaces_directory() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("rust");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("stale.rs"), "// stale").unwrap();

        let units = vec![GeneratedUnit {
            declaration: "A".to_string(),
            file_name: "a.rs".to_string(),
            contents: "// a".to_string(),
        }];
        let paths = write_units(&dir, &units).unwrap();

        assert_eq!(paths, [dir.join("a.rs")]);
        assert_eq!(fs::read_to_string(dir.join("a.rs")).unwrap(), "// a");
        assert!(!dir.join("stale.rs").exists());
        assert!(!root.path().join(".rust.staging").exists());
        assert!(!root.path().join(".rust.old").exists());
    }

    #[test]
    fn test_replace_dir_restores_previous_output() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("cpp");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("Person.h"), "// previous").unwrap();

        let missing = root.path().join(".cpp.staging");
        let retired = root.path().join(".cpp.old");
        assert!(replace_dir(&missing, &dir, &retired).is_err());

        assert_eq!(fs::read_to_string(dir.join("Person.h")).unwrap(), "// previous");
        assert!(!retired.exists());
    }

    #[test]
    fn test_prefix_validation() {
        let haskell = |prefix: &str| {
            GeneratorConfig::new("out", TargetLanguage::Haskell)
                .with_prefix(prefix)
                .validate()
        };
        assert!(haskell("").is_ok());
        assert!(haskell("Sk").is_ok());
        assert!(matches!(
            haskell("sk_"),
            Err(CodegenError::InvalidPrefix {
                reason: "must start with an uppercase letter",
                ..
            })
        ));

        let rust = GeneratorConfig::new("out", TargetLanguage::Rust).with_prefix("sk_");
        assert!(rust.validate().is_ok());
        let digit = GeneratorConfig::new("out", TargetLanguage::Cpp).with_prefix("1x");
        assert!(digit.validate().is_err());
        let dash = GeneratorConfig::new("out", TargetLanguage::Rust).with_prefix("sk-");
        assert!(dash.validate().is_err());
    }

    #[test]
    fn test_member_collision_is_rejected() {
        let schema = SchemaBuilder::new()
            .declaration(DeclarationSpec::new("Node").field(FieldSpec::new("id", "i32")))
            .build()
            .unwrap();
        let config = GeneratorConfig::new("out", TargetLanguage::Rust);
        match Generator::new(&schema, &config).render() {
            Err(CodegenError::MemberCollision {
                declaration,
                name,
                first,
                second,
            }) => {
                assert_eq!(declaration, "Node");
                assert_eq!(name, "id");
                assert_eq!(first, "a generated member");
                assert_eq!(second, "field 'id'");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
