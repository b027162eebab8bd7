//! Reading and writing ESLint configuration files
//!
//! The codec turns a classified [`ConfigArtifact`] into a
//! [`ConfigStructure`] and back. Dispatch happens on
//! [`ConfigEncoding`], computed once when the artifact was classified:
//!
//! | encoding   | load                                   | save                              |
//! |------------|----------------------------------------|-----------------------------------|
//! | `Json`     | JSON (JSONC tolerated)                 | pretty JSON                       |
//! | `Manifest` | `eslintConfig` key of `package.json`   | re-read manifest, replace the key |
//! | `CommonJs` | module evaluator                       | `module.exports = <json>;`        |
//! | `EsModule` | module evaluator, `export default` scan | refused (manual edit)            |
//!
//! Writes are whole-file overwrites. Nothing is written before [`ConfigCodec::save`].

mod evaluator;
pub mod literal;

pub use evaluator::{EvaluatorKind, ModuleEvaluator, ModuleSyntax, NodeEvaluator, StaticEvaluator};

use crate::artifact::{ConfigArtifact, ConfigEncoding, MANIFEST_CONFIG_KEY};
use crate::transform::ConfigStructure;
use crate::{EslintOffError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Codec settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CodecOptions {
    /// How JS config modules are turned into data
    pub evaluator: EvaluatorKind,

    /// Node.js binary used by [`EvaluatorKind::Node`]
    pub node_binary: PathBuf,

    /// Refuse to save when the file changed on disk since it was loaded
    pub guard_concurrent_edits: bool,
}

impl Default for CodecOptions {
    fn default() -> Self {
        Self {
            evaluator: EvaluatorKind::Static,
            node_binary: PathBuf::from("node"),
            guard_concurrent_edits: false,
        }
    }
}

/// Decoded configuration plus the file text it came from
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedConfig {
    pub structure: ConfigStructure,
    /// File content at load time
    pub snapshot: String,
}

/// Loads, renders and saves configuration files
pub struct ConfigCodec {
    options: CodecOptions,
    evaluator: Box<dyn ModuleEvaluator>,
}

impl ConfigCodec {
    pub fn new(options: CodecOptions) -> Self {
        let evaluator: Box<dyn ModuleEvaluator> = match options.evaluator {
            EvaluatorKind::Static => Box::new(StaticEvaluator),
            EvaluatorKind::Node => Box::new(NodeEvaluator::new(options.node_binary.clone())),
        };
        Self::with_evaluator(options, evaluator)
    }

    /// Use a custom module evaluator
    pub fn with_evaluator(options: CodecOptions, evaluator: Box<dyn ModuleEvaluator>) -> Self {
        Self { options, evaluator }
    }

    /// Read and decode the artifact from disk
    ///
    /// The file is read fresh on every call.
    pub fn load(&self, artifact: &ConfigArtifact) -> Result<LoadedConfig> {
        let path = artifact.path();
        debug!("Loading {} as {}", path.display(), artifact.encoding);

        let snapshot = read_file(path)?;
        let value = match artifact.encoding {
            ConfigEncoding::Json => parse_json_document(path, &snapshot)?,
            ConfigEncoding::Manifest => {
                let mut manifest = parse_strict_json(path, &snapshot)?;
                manifest
                    .get_mut(MANIFEST_CONFIG_KEY)
                    .map(Value::take)
                    .ok_or_else(|| {
                        EslintOffError::parse_error(
                            path,
                            format!("no `{MANIFEST_CONFIG_KEY}` key in manifest"),
                        )
                    })?
            }
            ConfigEncoding::CommonJs => {
                self.evaluator
                    .evaluate(path, &snapshot, ModuleSyntax::CommonJs)?
            }
            ConfigEncoding::EsModule => self.load_es_module(path, &snapshot)?,
        };

        let structure = ConfigStructure::from_value(value, path)?;
        debug!("Decoded {} config from {}", structure.shape(), path.display());

        Ok(LoadedConfig {
            structure,
            snapshot,
        })
    }

    /// Evaluate first; on failure accept a plain `export default <json>;`
    fn load_es_module(&self, path: &Path, source: &str) -> Result<Value> {
        match self.evaluator.evaluate(path, source, ModuleSyntax::EsModule) {
            Ok(value) => Ok(value),
            Err(err) => {
                let Some(tail) = literal::esm_export_tail(source) else {
                    return Err(err);
                };
                debug!(
                    "{} evaluator failed for {} ({}), trying textual export",
                    self.evaluator.name(),
                    path.display(),
                    err
                );
                serde_json::from_str(tail)
                    .map_err(|e| EslintOffError::parse_error(path, format!("export default: {e}")))
            }
        }
    }

    /// Fail for encodings that are never rewritten, before anything is read
    pub fn ensure_encoding_writable(&self, artifact: &ConfigArtifact) -> Result<()> {
        match artifact.encoding {
            ConfigEncoding::EsModule => Err(refuse_es_module(artifact)),
            _ => Ok(()),
        }
    }

    /// Check that the artifact may be overwritten with generated content
    ///
    /// ES modules are never rewritten, and neither are `.js`/`.cjs` files
    /// that turn out to use `export default`.
    pub fn ensure_writable(&self, artifact: &ConfigArtifact, loaded: &LoadedConfig) -> Result<()> {
        self.ensure_encoding_writable(artifact)?;

        if artifact.encoding == ConfigEncoding::CommonJs
            && literal::has_default_export(&loaded.snapshot)
        {
            return Err(refuse_es_module(artifact));
        }
        Ok(())
    }

    /// Serialize a structure into the artifact's on-disk encoding
    ///
    /// Manifests are re-read so unrelated keys reflect the file as it is now.
    pub fn render(&self, artifact: &ConfigArtifact, structure: &ConfigStructure) -> Result<String> {
        let path = artifact.path();
        match artifact.encoding {
            ConfigEncoding::Json => pretty_json(path, &structure.as_value()),
            ConfigEncoding::Manifest => {
                let mut manifest = parse_strict_json(path, &read_file(path)?)?;
                let Value::Object(fields) = &mut manifest else {
                    return Err(EslintOffError::parse_error(
                        path,
                        "manifest is not a JSON object",
                    ));
                };
                fields.insert(MANIFEST_CONFIG_KEY.to_string(), structure.as_value());
                pretty_json(path, &manifest)
            }
            ConfigEncoding::CommonJs => Ok(format!(
                "module.exports = {};\n",
                pretty_value(path, &structure.as_value())?
            )),
            ConfigEncoding::EsModule => Ok(format!(
                "export default {};\n",
                pretty_value(path, &structure.as_value())?
            )),
        }
    }

    /// Overwrite the artifact with the loaded (and possibly edited) structure
    pub fn save(&self, artifact: &ConfigArtifact, loaded: &LoadedConfig) -> Result<()> {
        self.ensure_writable(artifact, loaded)?;

        let path = artifact.path();
        if self.options.guard_concurrent_edits && read_file(path)? != loaded.snapshot {
            return Err(EslintOffError::ConcurrentModification {
                path: path.to_path_buf(),
            });
        }

        let content = self.render(artifact, &loaded.structure)?;
        fs::write(path, content).map_err(|e| EslintOffError::io_error(path, e))?;
        info!("Wrote {}", path.display());
        Ok(())
    }
}

impl Default for ConfigCodec {
    fn default() -> Self {
        Self::new(CodecOptions::default())
    }
}

fn refuse_es_module(artifact: &ConfigArtifact) -> EslintOffError {
    warn!(
        "Refusing to rewrite ES module config {}",
        artifact.path().display()
    );
    EslintOffError::EsmWriteUnsupported {
        path: artifact.path.clone(),
        rule_name: None,
    }
}

fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| EslintOffError::io_error(path, e))
}

fn parse_strict_json(path: &Path, content: &str) -> Result<Value> {
    serde_json::from_str(content).map_err(|e| EslintOffError::parse_error(path, e.to_string()))
}

/// JSON config files may carry comments and trailing commas
fn parse_json_document(path: &Path, content: &str) -> Result<Value> {
    match serde_json::from_str(content) {
        Ok(value) => Ok(value),
        Err(strict_err) => match json5::from_str::<Value>(content) {
            Ok(value) => {
                warn!(
                    "{} is not strict JSON; comments will not survive a rewrite",
                    path.display()
                );
                Ok(value)
            }
            Err(_) => Err(EslintOffError::parse_error(path, strict_err.to_string())),
        },
    }
}

fn pretty_value(path: &Path, value: &Value) -> Result<String> {
    serde_json::to_string_pretty(value)
        .map_err(|e| EslintOffError::parse_error(path, format!("failed to serialize: {e}")))
}

fn pretty_json(path: &Path, value: &Value) -> Result<String> {
    let mut content = pretty_value(path, value)?;
    content.push('\n');
    Ok(content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn write(dir: &Path, name: &str, content: &str) -> ConfigArtifact {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        ConfigArtifact::classify(path).unwrap()
    }

    #[test]
    fn test_load_json_legacy() {
        let temp_dir = TempDir::new().unwrap();
        let artifact = write(
            temp_dir.path(),
            ".eslintrc.json",
            r#"{"root": true, "rules": {"no-console": "error"}}"#,
        );

        let loaded = ConfigCodec::default().load(&artifact).unwrap();
        assert_eq!(
            loaded.structure.as_value(),
            json!({ "root": true, "rules": { "no-console": "error" } })
        );
    }

    #[test]
    fn test_load_extensionless_rc_with_comments() {
        let temp_dir = TempDir::new().unwrap();
        let artifact = write(
            temp_dir.path(),
            ".eslintrc",
            "{\n  // keep it strict\n  \"rules\": { \"eqeqeq\": \"error\", },\n}\n",
        );

        let loaded = ConfigCodec::default().load(&artifact).unwrap();
        assert_eq!(loaded.structure.as_value(), json!({ "rules": { "eqeqeq": "error" } }));
    }

    #[test]
    fn test_load_invalid_json() {
        let temp_dir = TempDir::new().unwrap();
        let artifact = write(temp_dir.path(), ".eslintrc.json", "{ rules: ");

        let err = ConfigCodec::default().load(&artifact).unwrap_err();
        assert!(matches!(err, EslintOffError::ParseError { .. }));
    }

    #[test]
    fn test_load_manifest_extracts_config() {
        let temp_dir = TempDir::new().unwrap();
        let artifact = write(
            temp_dir.path(),
            "package.json",
            r#"{"name": "app", "eslintConfig": {"extends": "react-app"}}"#,
        );

        let loaded = ConfigCodec::default().load(&artifact).unwrap();
        assert_eq!(loaded.structure.as_value(), json!({ "extends": "react-app" }));
    }

    #[test]
    fn test_load_manifest_without_config() {
        let temp_dir = TempDir::new().unwrap();
        let artifact = write(temp_dir.path(), "package.json", r#"{"name": "app"}"#);

        let err = ConfigCodec::default().load(&artifact).unwrap_err();
        assert!(err.to_string().contains("eslintConfig"));
    }

    #[test]
    fn test_load_flat_file_decoding_to_object_is_legacy_shape() {
        let temp_dir = TempDir::new().unwrap();
        let artifact = write(
            temp_dir.path(),
            "eslint.config.js",
            "module.exports = { rules: { semi: 'warn' } };\n",
        );

        let loaded = ConfigCodec::default().load(&artifact).unwrap();
        assert_eq!(loaded.structure.shape(), crate::ConfigShape::Legacy);
    }

    #[test]
    fn test_load_es_module_textual_fallback() {
        struct Failing;
        impl ModuleEvaluator for Failing {
            fn evaluate(&self, path: &Path, _: &str, _: ModuleSyntax) -> Result<Value> {
                Err(EslintOffError::evaluation_error(path, "import failed"))
            }
            fn name(&self) -> &'static str {
                "failing"
            }
        }

        let temp_dir = TempDir::new().unwrap();
        let artifact = write(
            temp_dir.path(),
            "eslint.config.mjs",
            "export default [{\"rules\": {\"semi\": \"error\"}}];\n",
        );
        let codec = ConfigCodec::with_evaluator(CodecOptions::default(), Box::new(Failing));

        let loaded = codec.load(&artifact).unwrap();
        assert_eq!(
            loaded.structure.as_value(),
            json!([{ "rules": { "semi": "error" } }])
        );

        let no_export = write(temp_dir.path(), "eslint.config.mjs", "import x from 'y';\n");
        let err = codec.load(&no_export).unwrap_err();
        assert!(err.to_string().contains("import failed"));
    }

    #[test]
    fn test_render_commonjs() {
        let artifact = ConfigArtifact::classify("/w/eslint.config.cjs").unwrap();
        let structure = ConfigStructure::Flat(vec![json!({ "rules": { "a": "off" } })]);

        let rendered = ConfigCodec::default().render(&artifact, &structure).unwrap();
        assert_eq!(
            rendered,
            "module.exports = [\n  {\n    \"rules\": {\n      \"a\": \"off\"\n    }\n  }\n];\n"
        );
    }

    #[test]
    fn test_save_json_round_trip_without_edit() {
        let temp_dir = TempDir::new().unwrap();
        let original = json!({
            "env": { "browser": true },
            "extends": ["eslint:recommended"],
            "rules": { "semi": ["error", "always"], "no-console": 1 }
        });
        let artifact = write(temp_dir.path(), ".eslintrc.json", &original.to_string());

        let codec = ConfigCodec::default();
        let loaded = codec.load(&artifact).unwrap();
        codec.save(&artifact, &loaded).unwrap();

        let written: Value =
            serde_json::from_str(&fs::read_to_string(artifact.path()).unwrap()).unwrap();
        assert_eq!(written, original);
    }

    #[test]
    fn test_save_manifest_preserves_other_keys_and_rereads() {
        let temp_dir = TempDir::new().unwrap();
        let artifact = write(
            temp_dir.path(),
            "package.json",
            r#"{"name": "app", "eslintConfig": {"rules": {}}, "private": true}"#,
        );

        let codec = ConfigCodec::default();
        let mut loaded = codec.load(&artifact).unwrap();
        loaded.structure.disable_rule("no-alert");

        // Changed on disk after load; the save must see the new version
        fs::write(
            artifact.path(),
            r#"{"name": "app", "version": "2.0.0", "eslintConfig": {"rules": {}}, "private": true}"#,
        )
        .unwrap();
        codec.save(&artifact, &loaded).unwrap();

        let written = fs::read_to_string(artifact.path()).unwrap();
        let manifest: Value = serde_json::from_str(&written).unwrap();
        assert_eq!(
            manifest,
            json!({
                "name": "app",
                "version": "2.0.0",
                "eslintConfig": { "rules": { "no-alert": 0 } },
                "private": true
            })
        );
        let keys: Vec<_> = manifest.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, ["name", "version", "eslintConfig", "private"]);
        assert!(written.ends_with("}\n"));
    }

    #[test]
    fn test_save_refuses_es_module() {
        let temp_dir = TempDir::new().unwrap();
        let content = "export default [{ rules: {} }];\n";
        let artifact = write(temp_dir.path(), "eslint.config.mjs", content);

        let codec = ConfigCodec::default();
        let mut loaded = codec.load(&artifact).unwrap();
        loaded.structure.disable_rule("no-var");

        let err = codec.save(&artifact, &loaded).unwrap_err();
        assert!(matches!(err, EslintOffError::EsmWriteUnsupported { .. }));
        assert_eq!(fs::read_to_string(artifact.path()).unwrap(), content);
    }

    #[test]
    fn test_save_refuses_js_file_with_default_export() {
        let artifact = ConfigArtifact::classify("/w/eslint.config.js").unwrap();
        let loaded = LoadedConfig {
            structure: ConfigStructure::Flat(Vec::new()),
            snapshot: "export default [];\n".to_string(),
        };

        let err = ConfigCodec::default()
            .ensure_writable(&artifact, &loaded)
            .unwrap_err();
        assert!(err.is_actionable());
    }

    #[test]
    fn test_save_commonjs_mentioning_export_default_in_comment() {
        let temp_dir = TempDir::new().unwrap();
        let artifact = write(
            temp_dir.path(),
            ".eslintrc.js",
            "// TODO: move to eslint.config.mjs with export default [...]\nmodule.exports = { rules: {} };\n",
        );

        let codec = ConfigCodec::default();
        let mut loaded = codec.load(&artifact).unwrap();
        loaded.structure.disable_rule("no-var");
        codec.save(&artifact, &loaded).unwrap();

        assert_eq!(
            fs::read_to_string(artifact.path()).unwrap(),
            "module.exports = {\n  \"rules\": {\n    \"no-var\": 0\n  }\n};\n"
        );
    }

    #[test]
    fn test_es_module_refused_without_reading() {
        let artifact = ConfigArtifact::classify("/nonexistent/eslint.config.mjs").unwrap();
        let codec = ConfigCodec::default();

        let err = codec.ensure_encoding_writable(&artifact).unwrap_err();
        assert!(matches!(err, EslintOffError::EsmWriteUnsupported { .. }));

        let json = ConfigArtifact::classify("/nonexistent/.eslintrc.json").unwrap();
        assert!(codec.ensure_encoding_writable(&json).is_ok());
    }

    #[test]
    fn test_guard_detects_concurrent_edit() {
        let temp_dir = TempDir::new().unwrap();
        let artifact = write(temp_dir.path(), ".eslintrc.json", r#"{"rules": {}}"#);

        let codec = ConfigCodec::new(CodecOptions {
            guard_concurrent_edits: true,
            ..CodecOptions::default()
        });
        let mut loaded = codec.load(&artifact).unwrap();
        loaded.structure.disable_rule("curly");

        let external = r#"{"rules": {"semi": "error"}}"#;
        fs::write(artifact.path(), external).unwrap();

        let err = codec.save(&artifact, &loaded).unwrap_err();
        assert!(matches!(err, EslintOffError::ConcurrentModification { .. }));
        assert_eq!(fs::read_to_string(artifact.path()).unwrap(), external);
    }

    #[test]
    fn test_options_deserialize_camel_case() {
        let options: CodecOptions =
            serde_json::from_str(r#"{"evaluator": "node", "guardConcurrentEdits": true}"#).unwrap();
        assert_eq!(options.evaluator, EvaluatorKind::Node);
        assert!(options.guard_concurrent_edits);
        assert_eq!(options.node_binary, PathBuf::from("node"));
    }
}
